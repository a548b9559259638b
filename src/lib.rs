//! Drawing Companion - Conversational drawing-subject exploration
//!
//! This crate helps an elderly user settle on something to draw. It proposes
//! small samples of topics shaped by what the user has talked about,
//! interprets each reply, and once a topic is confirmed hands over a
//! reference image and a step-by-step drawing guide.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
