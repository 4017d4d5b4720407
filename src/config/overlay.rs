//! Configuration overlay files
//!
//! Any `*.mbuild` file in the current directory contributes `key = value`
//! pairs that fill in settings the command line left unset. Files are read
//! in name order and the first file to define a key wins; an explicitly
//! passed command-line flag always beats the overlay.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::config::defaults::CONFIG_FILE_SUFFIX;

/// Key/value pairs collected from `*.mbuild` files
#[derive(Debug, Default)]
pub struct Overlay {
    values: BTreeMap<String, String>,
    /// Files the overlay was assembled from, in the order they were read
    pub loaded_files: Vec<PathBuf>,
}

impl Overlay {
    /// Load every `*.mbuild` file found directly under `dir`
    ///
    /// Unreadable files and lines that do not parse are skipped; an overlay
    /// is advisory and never aborts the run.
    pub fn load(dir: &Path) -> Self {
        let mut overlay = Self::default();

        let Ok(entries) = std::fs::read_dir(dir) else {
            return overlay;
        };

        let mut files: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|e| e.path())
            .filter(|p| {
                p.is_file()
                    && p.file_name()
                        .is_some_and(|n| n.to_string_lossy().ends_with(CONFIG_FILE_SUFFIX))
            })
            .collect();
        files.sort();

        for file in files {
            if let Ok(content) = std::fs::read_to_string(&file) {
                overlay.absorb(&content);
                overlay.loaded_files.push(file);
            }
        }

        overlay
    }

    /// Parse `key = value` lines out of one file's content
    ///
    /// Blank lines and `#` comments are skipped. The first definition of a
    /// key sticks; later files cannot override it.
    fn absorb(&mut self, content: &str) {
        // \w key, value limited to word chars plus path punctuation
        let pair = match Regex::new(r"^(\w+)\s*=\s*([\w/.-]+)") {
            Ok(re) => re,
            Err(_) => return,
        };

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(caps) = pair.captures(line) {
                let key = caps[1].to_string();
                let value = caps[2].to_string();
                self.values.entry(key).or_insert(value);
            }
        }
    }

    /// Look up a raw overlay value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Look up a boolean overlay value
    ///
    /// `true`, `yes` and `1` enable; anything else disables.
    pub fn get_flag(&self, key: &str) -> Option<bool> {
        self.get(key)
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "true" | "yes" | "1"))
    }

    /// Number of distinct keys the overlay carries
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the overlay carries no keys at all
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
