use crate::{
    models::story::{StoryConfig, StoryMetadata, StoryPage, StoryResponse},
    services::story_parser::ParsedPage,
};

/// What happened to one page's illustration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOutcome {
    Generated(String),
    Failed(String),
    /// Not requested under the active imaging policy
    Skipped,
}

impl ImageOutcome {
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Generated(url) => Some(url),
            Self::Failed(_) | Self::Skipped => None,
        }
    }

    pub fn into_url(self) -> Option<String> {
        match self {
            Self::Generated(url) => Some(url),
            Self::Failed(_) | Self::Skipped => None,
        }
    }
}

/// A written page with its illustration outcome, before serialization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IllustratedPage {
    pub text: String,
    pub image: ImageOutcome,
}

/// Pair pages with outcomes by index; pages without an outcome are `Skipped`
pub fn illustrate(pages: Vec<ParsedPage>, outcomes: Vec<ImageOutcome>) -> Vec<IllustratedPage> {
    let mut outcomes = outcomes.into_iter();
    pages
        .into_iter()
        .map(|page| IllustratedPage {
            text: page.text,
            image: outcomes.next().unwrap_or(ImageOutcome::Skipped),
        })
        .collect()
}

/// Build the response envelope, collapsing outcomes to `imageUrl?`
pub fn assemble_response(config: &StoryConfig, pages: Vec<IllustratedPage>) -> StoryResponse {
    let pages = pages
        .into_iter()
        .map(|page| StoryPage {
            text: page.text,
            image_url: page.image.into_url(),
            audio_url: None,
        })
        .collect();

    StoryResponse {
        pages,
        metadata: StoryMetadata {
            title: config.title(),
            age_range: config.age_range,
            theme: config.theme,
            character_name: config.character_name.clone(),
        },
    }
}
