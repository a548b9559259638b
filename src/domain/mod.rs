//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (ids, timestamps, errors, state machine)
//! - `exploration` - Topics, groups and the select → confirm session
//! - `drawing` - Topic metadata and per-session drawing guides
//! - `conversation` - Append-only conversation log

pub mod conversation;
pub mod drawing;
pub mod exploration;
pub mod foundation;
