pub mod client;
pub mod prompts;

pub use client::{strip_code_fences, ChatClient};
