//! Git Integration
//!
//! Thin wrappers over the `git` binary: repository discovery, staged files
//! and pre-commit hook installation.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use crate::constants::hook::SCRIPT_MARKER;
use crate::types::{DocsError, Result};

/// Run `git` in `dir` and return trimmed stdout
fn git(dir: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|e| DocsError::Git(format!("cannot run git: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(DocsError::Git(format!(
            "git {} failed: {}",
            args.join(" "),
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim_end().to_string())
}

/// Top-level directory of the repository containing `dir`
pub fn repo_root(dir: &Path) -> Result<PathBuf> {
    git(dir, &["rev-parse", "--show-toplevel"]).map(PathBuf::from)
}

/// Added, copied, modified and renamed files in the index, as absolute paths
pub fn staged_files(repo_root: &Path) -> Result<Vec<PathBuf>> {
    let output = git(
        repo_root,
        &["diff", "--cached", "--name-only", "--diff-filter=ACMR", "-z"],
    )?;

    let files: Vec<PathBuf> = output
        .split('\0')
        .filter(|line| !line.is_empty())
        .map(|rel| repo_root.join(rel))
        .collect();

    debug!("{} staged files", files.len());
    Ok(files)
}

/// Hooks directory, honoring `core.hooksPath`
pub fn hooks_dir(repo_root: &Path) -> Result<PathBuf> {
    let path = PathBuf::from(git(repo_root, &["rev-parse", "--git-path", "hooks"])?);
    Ok(if path.is_absolute() {
        path
    } else {
        repo_root.join(path)
    })
}

/// Install a pre-commit hook that runs `docsync hook`.
///
/// An existing hook not written by docsync is only replaced with `force`.
pub fn install_pre_commit_hook(repo_root: &Path, force: bool) -> Result<PathBuf> {
    write_pre_commit_hook(&hooks_dir(repo_root)?, force)
}

fn write_pre_commit_hook(hooks_dir: &Path, force: bool) -> Result<PathBuf> {
    let hook = hooks_dir.join("pre-commit");

    if let Ok(existing) = fs::read_to_string(&hook)
        && !existing.contains(SCRIPT_MARKER)
        && !force
    {
        return Err(DocsError::Git(format!(
            "{} already exists. Use --force to replace it.",
            hook.display()
        )));
    }

    fs::create_dir_all(hooks_dir)?;
    fs::write(&hook, hook_script())?;
    make_executable(&hook)?;

    info!("Installed pre-commit hook: {}", hook.display());
    Ok(hook)
}

fn hook_script() -> String {
    format!(
        "#!/bin/sh\n{}\n# Keeps component docs in sync. Never blocks the commit.\ndocsync hook || true\nexit 0\n",
        SCRIPT_MARKER
    )
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms)?;
    Ok(())
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}
