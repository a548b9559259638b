//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - OpenAI chat and image generation, plus test doubles
//! - `llm` - Prompt contracts built on top of an `AIProvider`
//! - `memory` - In-memory session, conversation, and guide stores
//! - `storage` - Object storage for reference images
//! - `http` - REST API

pub mod ai;
pub mod http;
pub mod llm;
pub mod memory;
pub mod storage;
