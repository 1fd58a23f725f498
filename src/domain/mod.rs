//! Domain layer containing the rules and vocabulary of Echo.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (identifiers, timestamps, state machines, errors)
//! - `credential` - Provider API key value object
//! - `persona` - Persona catalog and in-character voice profiles
//! - `conversation` - Messages, session record and session lifecycle
//! - `media` - Capture constraints and peer connection vocabulary
//! - `call` - Video call screen lifecycle and demo mode

pub mod call;
pub mod conversation;
pub mod credential;
pub mod foundation;
pub mod media;
pub mod persona;
