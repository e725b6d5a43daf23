pub mod client;
pub mod prompt;

pub use client::NarratorClient;
pub use prompt::build_prompt;
