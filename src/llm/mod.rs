pub mod gemini;
pub mod interface;
#[cfg(test)]
pub mod mock;

pub use gemini::GeminiModel;
pub use interface::*;
