pub mod content;
pub mod input;
pub mod settings;
