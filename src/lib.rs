pub mod catalog;
pub mod recommend;
pub mod settings;
pub mod utils;
pub mod vibe;
