//! Persona module - catalog entries and in-character voice.
//!
//! - `PersonaDescriptor` - immutable catalog entry
//! - `PersonaVariant` / `VoiceProfile` - greeting, canned replies and notices per persona
//! - `FallbackResponder` - seeded pick from a persona's canned pool

mod catalog;
mod descriptor;
mod voice;

pub use catalog::{find_persona, personas_in, prebuilt_personas};
pub use descriptor::{PersonaCategory, PersonaDescriptor};
pub use voice::{FallbackResponder, PersonaVariant, VoiceProfile};
