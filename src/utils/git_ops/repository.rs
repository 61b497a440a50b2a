use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, warn};

pub struct GitOps;

impl GitOps {
    /// directory gix should start discovery from
    fn discovery_path(path: &Path) -> Option<&Path> {
        if path.is_file() {
            path.parent()
        } else {
            Some(path)
        }
    }

    /// detect root of the repository (path as a result)
    pub fn detect_repository_root<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
        let path = path.as_ref();
        let check_path = Self::discovery_path(path).ok_or_else(|| Error::RepositoryNotFound {
            path: path.to_path_buf(),
        })?;

        let repo = gix::discover(check_path)?;

        // bare repositories have no work tree; fall back to the git dir
        let root_path = match repo.work_dir() {
            Some(work_dir) => work_dir.to_path_buf(),
            None => repo.git_dir().to_path_buf(),
        };

        Ok(root_path)
    }

    /// detect if the given path is inside a repository
    pub fn is_repository<P: AsRef<Path>>(path: P) -> Result<bool> {
        let Some(check_path) = Self::discovery_path(path.as_ref()) else {
            return Ok(false);
        };

        match gix::discover(check_path) {
            Ok(_) => Ok(true),
            Err(_) => Ok(false), // any error means it's not a repository
        }
    }

    /// absolute paths of everything `git status` reports as changed or untracked
    pub fn uncommitted_changes<P: AsRef<Path>>(repo_path: P) -> Result<Vec<PathBuf>> {
        let repo_path = repo_path.as_ref();
        let root = Self::detect_repository_root(repo_path)?;

        let output = Command::new("git")
            .arg("-C")
            .arg(repo_path)
            .arg("status")
            .arg("--porcelain")
            .output()
            .map_err(Error::IoError)?;

        if !output.status.success() {
            return Err(Error::from_git_error(std::io::Error::other(
                "git status failed",
            )));
        }

        // porcelain format: "XY path" or "XY old -> new", relative to the root
        let stdout = String::from_utf8_lossy(&output.stdout);
        let changes = stdout
            .lines()
            .filter(|line| line.len() > 3)
            .map(|line| {
                let entry = &line[3..];
                let entry = entry.rsplit(" -> ").next().unwrap_or(entry);
                root.join(entry.trim().trim_matches('"'))
            })
            .collect();

        Ok(changes)
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// fail when the git work tree around `project_path` has changes other than
/// the changelog itself
///
/// paths outside a git repository always pass
pub fn ensure_clean_work_tree(project_path: &Path, changelog_path: &Path) -> Result<()> {
    if !GitOps::is_repository(project_path)? {
        debug!(path = %project_path.display(), "not a git repository, skipping clean check");
        return Ok(());
    }

    let changes = match GitOps::uncommitted_changes(project_path) {
        Ok(changes) => changes,
        Err(Error::IoError(err)) => {
            warn!(error = %err, "could not run git, skipping clean check");
            return Ok(());
        }
        Err(err) => return Err(err),
    };
    let others: Vec<&PathBuf> = changes
        .iter()
        .filter(|path| !same_file(path, changelog_path))
        .collect();

    debug!(changes = changes.len(), others = others.len(), "checked work tree");

    if others.is_empty() {
        Ok(())
    } else {
        Err(Error::DirtyWorkTree {
            path: project_path.to_path_buf(),
        })
    }
}
