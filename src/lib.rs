//! Mailpilot — single-pass Gmail inbox → local LLM → reply-draft pipeline.

pub mod config;
pub mod draft;
pub mod error;
pub mod extract;
pub mod llm;
pub mod mail;
pub mod pipeline;
