//! Workspace layout for one package build
//!
//! Each package builds inside a directory named after it, placed next to
//! the source rpm it came from. Inside that directory every invocation
//! gets its own stamped rpmbuild topdir, so reruns never overwrite an
//! earlier build tree.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::defaults::BUILD_ROOT_PREFIX;
use crate::core::context::RunContext;
use crate::error::WorkspaceError;

#[derive(Debug, Clone)]
pub struct Workspace {
    /// Directory named after the package, next to its source rpm
    pub package_dir: PathBuf,
    /// Stamped build root inside the package directory
    pub build_root: PathBuf,
}

impl Workspace {
    /// Derive the layout without touching the filesystem.
    ///
    /// A blank package name is rejected, it would collapse the layout
    /// into the parent directory.
    pub fn resolve(
        source_path: &Path,
        package_name: &str,
        ctx: &RunContext,
    ) -> Result<Self, WorkspaceError> {
        let name = package_name.trim();
        if name.is_empty() {
            return Err(WorkspaceError::NameUnresolved {
                source_path: source_path.to_path_buf(),
            });
        }

        let base = source_path.parent().unwrap_or_else(|| Path::new("."));
        let package_dir = base.join(name);
        let build_root = package_dir.join(format!("{BUILD_ROOT_PREFIX}{}", ctx.stamp()));

        Ok(Self {
            package_dir,
            build_root,
        })
    }

    /// Create both directories; repeating the call is harmless
    pub fn ensure_created(&self) -> Result<(), WorkspaceError> {
        for dir in [&self.package_dir, &self.build_root] {
            fs::create_dir_all(dir).map_err(|error| WorkspaceError::CreateDir {
                path: dir.clone(),
                error: error.to_string(),
            })?;
        }
        Ok(())
    }

    /// Where spec files land once the source rpm is installed
    pub fn specs_dir(&self) -> PathBuf {
        self.build_root.join("SPECS")
    }
}
