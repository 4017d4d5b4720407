//! Mbuild - unattended batch builder for source rpm packages
//!
//! This library drives rpm, yum, rpmbuild and mock through fixed build
//! pipelines, one source package at a time, and keeps a durable artifact
//! trail of every run.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`cli`] - Command-line interface parsing and output formatting
//! - [`core`] - Build pipelines, tasks and batch orchestration
//! - [`infra`] - Infrastructure layer (processes, artifacts, notifications)
//! - [`config`] - Configuration and constants
//! - [`error`] - Error types and handling

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod infra;

#[cfg(test)]
pub mod test_utils;
