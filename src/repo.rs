use std::path::{Path, PathBuf};

use git2::Repository;

use crate::error::{ReleaseError, Result};

/// Resolve the repository working-tree root by discovering the enclosing
/// git repository from `start`.
///
/// Fails if `start` is not inside a repository, or if the repository is
/// bare (no working tree to patch).
pub fn resolve_repo_root(start: &Path) -> Result<PathBuf> {
    let repo = Repository::discover(start).map_err(|e| {
        ReleaseError::config(format!(
            "Cannot locate repository root from '{}': {}",
            start.display(),
            e
        ))
    })?;

    let workdir = repo
        .workdir()
        .ok_or_else(|| ReleaseError::config("Repository is bare; no working tree to update"))?;

    Ok(workdir.to_path_buf())
}
