//! alertdash: a disaster-alert dashboard with a document-grounded chatbot.
//!
//! The binary in `main.rs` is a thin clap front-end over these modules.

pub mod alerts;
pub mod cli;
pub mod config;
pub mod document;
pub mod guide;
pub mod llm;
pub mod session;
pub mod web;
