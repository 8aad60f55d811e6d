//! Core types for hoopchat
//!
//! This crate holds the chat session model and its mutation operations,
//! the theme preference, the contract for the question-answering backend,
//! and the configuration and logging shared by the other hoopchat crates.

pub mod answer;
pub mod config;
pub mod error;
pub mod logging;
pub mod preferences;
pub mod session;
pub mod utils;

pub use answer::{AnswerClient, AnswerResult, RequestFailure};
pub use error::{Error, Result};
