//! Welcome conversation handlers.

mod welcome;

pub use welcome::{WelcomeCommand, WelcomeHandler, WelcomeResult};
