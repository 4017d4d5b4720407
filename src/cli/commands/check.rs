//! CLI implementation for `mbuild check` command
//!
//! Walks the working directory and lists every rpm produced so far,
//! grouped by the directory it sits in.

use std::path::Path;

use anyhow::Result;

use crate::config::Settings;
use crate::infra::artifacts::find_rpm_groups;

/// Execute the check command
pub async fn execute(workdir: &Path, settings: &Settings) -> Result<()> {
    let groups = find_rpm_groups(workdir);

    if settings.quiet {
        return Ok(());
    }

    println!("workdir: {}", workdir.display());
    if groups.is_empty() {
        println!("no rpm files found");
        return Ok(());
    }
    for group in &groups {
        println!("[+] {}", group.dir.display());
        for rpm in &group.rpms {
            println!("\t[-] {rpm}");
        }
    }
    Ok(())
}
