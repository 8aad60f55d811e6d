//! Answer backends for hoopchat
//!
//! This crate provides implementations of
//! [`AnswerClient`](hoopchat_core::answer::AnswerClient).

pub mod http;

pub use http::HttpAnswerClient;
