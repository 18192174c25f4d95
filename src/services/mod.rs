pub mod chat;
pub mod enrichment;
pub mod providers;
pub mod recommendations;
pub mod similarity;

pub use chat::ChatResponder;
pub use providers::{GenerativeTextProvider, MusicSearchProvider};
