use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::common::FieldViolation;

/// Target reader age bracket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AgeRange {
    #[serde(rename = "3-5")]
    Preschool,
    #[serde(rename = "6-8")]
    EarlyReader,
    #[serde(rename = "9-12")]
    MiddleGrade,
}

impl AgeRange {
    pub const ALLOWED: [&'static str; 3] = ["3-5", "6-8", "9-12"];

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "3-5" => Some(Self::Preschool),
            "6-8" => Some(Self::EarlyReader),
            "9-12" => Some(Self::MiddleGrade),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Preschool => "3-5",
            Self::EarlyReader => "6-8",
            Self::MiddleGrade => "9-12",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Adventure,
    Friendship,
    Animals,
    Fantasy,
    Learning,
    Nature,
}

impl Theme {
    pub const ALLOWED: [&'static str; 6] = [
        "adventure",
        "friendship",
        "animals",
        "fantasy",
        "learning",
        "nature",
    ];

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "adventure" => Some(Self::Adventure),
            "friendship" => Some(Self::Friendship),
            "animals" => Some(Self::Animals),
            "fantasy" => Some(Self::Fantasy),
            "learning" => Some(Self::Learning),
            "nature" => Some(Self::Nature),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Adventure => "adventure",
            Self::Friendship => "friendship",
            Self::Animals => "animals",
            Self::Fantasy => "fantasy",
            Self::Learning => "learning",
            Self::Nature => "nature",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoryLength {
    Short,
    Medium,
    Long,
}

impl StoryLength {
    pub const ALLOWED: [&'static str; 3] = ["short", "medium", "long"];

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "short" => Some(Self::Short),
            "medium" => Some(Self::Medium),
            "long" => Some(Self::Long),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Medium => "medium",
            Self::Long => "long",
        }
    }

    /// Number of pages the provider is asked to write
    pub fn page_count(&self) -> usize {
        match self {
            Self::Short => 5,
            Self::Medium => 8,
            Self::Long => 12,
        }
    }
}

/// POST /api/story/generate request body, as received.
///
/// String lengths go through `validator`; the enumerated fields are checked
/// by parsing them into their typed form in [`StoryRequest::into_config`].
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StoryRequest {
    #[serde(default)]
    pub age_range: String,
    #[serde(default)]
    pub theme: String,
    #[serde(default)]
    #[validate(length(
        min = 1,
        max = 20,
        message = "characterName must be between 1 and 20 characters"
    ))]
    pub character_name: String,
    #[serde(default)]
    #[validate(length(max = 100, message = "characterTraits must be at most 100 characters"))]
    pub character_traits: String,
    #[serde(default)]
    pub story_length: String,
}

fn enum_violation(field: &str, allowed: &[&str]) -> FieldViolation {
    FieldViolation::new(
        field,
        "invalid_enum_value",
        format!("{} must be one of: {}", field, allowed.join(", ")),
    )
}

impl StoryRequest {
    /// Check every field and produce the typed config, or every violation found
    pub fn into_config(self) -> Result<StoryConfig, Vec<FieldViolation>> {
        let mut violations = self
            .validate()
            .err()
            .map(|errors| FieldViolation::from_errors(&errors))
            .unwrap_or_default();

        let age_range = AgeRange::from_str(&self.age_range);
        if age_range.is_none() {
            violations.push(enum_violation("ageRange", &AgeRange::ALLOWED));
        }
        let theme = Theme::from_str(&self.theme);
        if theme.is_none() {
            violations.push(enum_violation("theme", &Theme::ALLOWED));
        }
        let story_length = StoryLength::from_str(&self.story_length);
        if story_length.is_none() {
            violations.push(enum_violation("storyLength", &StoryLength::ALLOWED));
        }

        match (age_range, theme, story_length) {
            (Some(age_range), Some(theme), Some(story_length)) if violations.is_empty() => {
                Ok(StoryConfig {
                    age_range,
                    theme,
                    character_name: self.character_name,
                    character_traits: self.character_traits,
                    story_length,
                })
            }
            _ => {
                FieldViolation::sort_by_field(&mut violations);
                Err(violations)
            }
        }
    }
}

/// Validated story parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryConfig {
    pub age_range: AgeRange,
    pub theme: Theme,
    pub character_name: String,
    pub character_traits: String,
    pub story_length: StoryLength,
}

impl StoryConfig {
    pub fn page_count(&self) -> usize {
        self.story_length.page_count()
    }

    pub fn title(&self) -> String {
        format!("The Adventures of {}", self.character_name)
    }
}

/// One page of the returned story
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryPage {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    // Reserved for narration; never populated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryMetadata {
    pub title: String,
    pub age_range: AgeRange,
    pub theme: Theme,
    pub character_name: String,
}

/// POST /api/story/generate success body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryResponse {
    pub pages: Vec<StoryPage>,
    pub metadata: StoryMetadata,
}
