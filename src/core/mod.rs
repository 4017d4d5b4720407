//! Core build domain
//!
//! Everything that decides what happens during a run lives here: the
//! stage pipelines, task bookkeeping and batch orchestration. Spawning
//! tools and delivering notifications is delegated to [`crate::infra`].
//!
//! # Submodules
//!
//! - [`context`] - Per-invocation run context and tool names
//! - [`workspace`] - Workspace layout for one package build
//! - [`stage`] - Stage identities and per-stage results
//! - [`task`] - One package build and its recorded history
//! - [`pipeline`] - The fixed stage sequences
//! - [`summary`] - Batch outcome reporting
//! - [`orchestrator`] - Batch loop and summary delivery

pub mod context;
pub mod orchestrator;
pub mod pipeline;
pub mod stage;
pub mod summary;
pub mod task;
pub mod workspace;
