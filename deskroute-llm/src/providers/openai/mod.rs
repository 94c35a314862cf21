//! OpenAI provider implementation
//!
//! This module provides the OpenAI-compatible tool-calling generation backend.

pub mod client;
pub mod generation;
pub mod types;

pub use client::OpenAIClient;
pub use generation::OpenAIBackend;
