//! Read-only git access for re-analyzing files at historical revisions.
//!
//! Files are read straight from blob objects, never from a checkout, so
//! the working tree is untouched and dirty state cannot leak into a
//! historical snapshot.

use std::path::{Path, PathBuf};

use git2::Repository;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("not a git repository: {path}")]
    NotARepository { path: PathBuf },

    #[error("git operation failed: {0}")]
    Git(#[from] git2::Error),
}

/// One commit summary for `history --list`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct CommitInfo {
    pub id: String,
    pub short_id: String,
    pub summary: String,
    pub author: String,
    /// Commit time as seconds since the epoch.
    pub time: i64,
}

/// Read-only handle on a repository.
pub struct HistoryReader {
    repo: Repository,
}

impl HistoryReader {
    pub fn open(path: &Path) -> Result<Self, HistoryError> {
        let repo = Repository::discover(path).map_err(|_| HistoryError::NotARepository {
            path: path.to_path_buf(),
        })?;
        Ok(Self { repo })
    }

    /// The repository working directory, used to rebase absolute paths
    /// onto tree-relative ones.
    pub fn workdir(&self) -> Option<&Path> {
        self.repo.workdir()
    }

    /// Whether a revision spec resolves in this repository.
    pub fn revision_exists(&self, rev: &str) -> bool {
        self.repo.revparse_single(rev).is_ok()
    }

    /// Content of `path` at `rev`, or None when the revision lacks the
    /// file. A missing file in an old commit is expected, not an error.
    pub fn file_at_revision(&self, rev: &str, path: &Path) -> Result<Option<Vec<u8>>, HistoryError> {
        let object = self.repo.revparse_single(rev)?;
        let commit = object.peel_to_commit()?;
        let tree = commit.tree()?;
        let relative = self.tree_relative(path);
        let entry = match tree.get_path(&relative) {
            Ok(entry) => entry,
            Err(err) if err.code() == git2::ErrorCode::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let blob = self.repo.find_blob(entry.id())?;
        Ok(Some(blob.content().to_vec()))
    }

    /// Commits reachable from HEAD, newest first.
    pub fn list_commits(&self) -> Result<Vec<CommitInfo>, HistoryError> {
        let mut walk = self.repo.revwalk()?;
        walk.push_head()?;
        walk.set_sorting(git2::Sort::TOPOLOGICAL | git2::Sort::TIME)?;
        let mut commits = Vec::new();
        for id in walk {
            let id = id?;
            let commit = self.repo.find_commit(id)?;
            let full = id.to_string();
            let short = full[..full.len().min(7)].to_string();
            commits.push(CommitInfo {
                id: full,
                short_id: short,
                summary: commit.summary().unwrap_or("").to_string(),
                author: commit.author().name().unwrap_or("").to_string(),
                time: commit.time().seconds(),
            });
        }
        Ok(commits)
    }

    fn tree_relative(&self, path: &Path) -> PathBuf {
        if path.is_relative() {
            return path.to_path_buf();
        }
        match self.workdir() {
            Some(workdir) => path
                .strip_prefix(workdir)
                .map(Path::to_path_buf)
                .unwrap_or_else(|_| path.to_path_buf()),
            None => path.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_non_repository_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = HistoryReader::open(dir.path());
        assert!(matches!(result, Err(HistoryError::NotARepository { .. })));
    }
}
