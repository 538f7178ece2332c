// Service modules
pub mod assembler;
pub mod prompt_builder;
pub mod providers;
pub mod story_parser;
pub mod story_service;

pub use story_service::StoryService;
