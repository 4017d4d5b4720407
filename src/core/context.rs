//! Per-invocation run context
//!
//! Every command receives one `RunContext` when it starts. It fixes the
//! run stamp once, so every artifact written during the invocation shares
//! the same suffix, and carries the knobs that cut across stages.

use chrono::Local;

use crate::config::defaults::STAMP_FORMAT;

/// External tool names resolved through `PATH`
///
/// Kept as plain strings so tests can point individual tools at stand-ins.
#[derive(Debug, Clone)]
pub struct Tools {
    pub rpm: String,
    pub yum: String,
    pub rpmbuild: String,
    pub mock: String,
}

impl Default for Tools {
    fn default() -> Self {
        Self {
            rpm: "rpm".to_string(),
            yum: "yum".to_string(),
            rpmbuild: "rpmbuild".to_string(),
            mock: "mock".to_string(),
        }
    }
}

/// Shared state for one command invocation
#[derive(Debug, Clone)]
pub struct RunContext {
    stamp: String,
    invocation: String,
    /// Mirror child process output to the console while capturing it
    pub echo: bool,
    pub tools: Tools,
}

impl RunContext {
    /// Create a context stamped with the current local time
    pub fn new(invocation: impl Into<String>, echo: bool) -> Self {
        Self::with_stamp(
            Local::now().format(STAMP_FORMAT).to_string(),
            invocation,
            echo,
        )
    }

    /// Create a context with a fixed stamp
    pub fn with_stamp(stamp: impl Into<String>, invocation: impl Into<String>, echo: bool) -> Self {
        Self {
            stamp: stamp.into(),
            invocation: invocation.into(),
            echo,
            tools: Tools::default(),
        }
    }

    /// The run stamp shared by all artifacts of this invocation
    pub fn stamp(&self) -> &str {
        &self.stamp
    }

    /// The command line this invocation was started with
    pub fn invocation(&self) -> &str {
        &self.invocation
    }

    /// Append the run stamp to an artifact name
    pub fn suffixed(&self, name: &str) -> String {
        format!("{name}_{}", self.stamp)
    }
}
