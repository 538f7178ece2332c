use crate::models::story::StoryConfig;

/// System instruction for chat-style providers
pub const STORY_SYSTEM_PROMPT: &str = "You are an expert children's story writer who creates engaging, age-appropriate stories. You always respond with valid JSON.";

/// Render the story-writing instruction for a validated config
pub fn build_story_prompt(config: &StoryConfig) -> String {
    let age_range = config.age_range.as_str();
    let page_count = config.page_count();

    format!(
        r#"You are a creative children's story writer. Write an engaging, age-appropriate story with the following specifications:

- Age Range: {age_range} years old
- Theme: {theme}
- Main Character: {name}
- Character Traits: {traits}
- Number of Pages: {page_count}

Requirements:
1. Write exactly {page_count} pages
2. Each page should be 2-3 sentences (appropriate for {age_range} year olds)
3. The story should be imaginative, fun, and teach a positive lesson
4. Include vivid descriptions that would work well with illustrations
5. Make it engaging and easy to understand for the target age group
6. End with a satisfying conclusion

Format your response as a JSON array of objects, where each object has a "text" field containing the page content and a "imagePrompt" field with a detailed image generation prompt for that page.

Example format:
[
  {{
    "text": "Once upon a time...",
    "imagePrompt": "A vibrant illustration of [detailed scene description], children's book style, colorful, warm lighting, digital art"
  }}
]

IMPORTANT: Return ONLY the JSON array, no additional text before or after.

Now write the complete story:"#,
        age_range = age_range,
        theme = config.theme.as_str(),
        name = config.character_name,
        traits = config.character_traits,
        page_count = page_count,
    )
}

/// Append the house illustration style to a scene prompt
pub fn enhance_image_prompt(prompt: &str, character_name: &str, theme: &str) -> String {
    format!(
        "{}. Children's book illustration style, vibrant colors, friendly and engaging, digital art, high quality, whimsical, featuring {} in a {} themed scene. Colorful, detailed, professional children's book art.",
        prompt,
        character_name,
        theme
    )
}

/// Scene prompt for the single cover illustration
pub fn build_cover_prompt(config: &StoryConfig) -> String {
    let mut scene = format!(
        "A cheerful storybook cover showing {}, the hero of a {} story",
        config.character_name,
        config.theme.as_str()
    );

    let traits = config.character_traits.trim();
    if !traits.is_empty() {
        scene.push_str(&format!(", who is {}", traits));
    }

    enhance_image_prompt(&scene, &config.character_name, config.theme.as_str())
}
