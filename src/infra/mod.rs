//! Infrastructure layer
//!
//! The side effects live here: spawning external tools, persisting
//! artifact files and delivering notifications.

pub mod artifacts;
pub mod executor;
pub mod notify;
