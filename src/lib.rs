//! Echo - Persona Conversation Sessions
//!
//! This crate runs text conversations with AI personas backed by the Tavus
//! conversational-video API, degrading to in-character canned replies
//! whenever the provider cannot be reached.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
