//! Gemini provider implementation
//!
//! This module provides the Gemini function-calling generation backend.

pub mod client;
pub mod generation;
pub mod types;

pub use client::GeminiClient;
pub use generation::GeminiBackend;
