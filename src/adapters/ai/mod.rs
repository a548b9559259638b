//! AI adapters - OpenAI and test doubles.

mod mock_provider;
mod openai_provider;

pub use mock_provider::{MockAIProvider, MockImageGenerator, DEFAULT_MOCK_RESPONSE};
pub use openai_provider::{OpenAIConfig, OpenAIProvider};
