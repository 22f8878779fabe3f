//! Path containment for the listing endpoint.
//!
//! Every candidate is canonicalized (symlinks followed, `.`/`..` removed)
//! before it is compared against the allowed roots, and the comparison is
//! done on path components rather than on raw bytes.

use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum GuardError {
    #[error("no allowed roots configured")]
    NoRoots,
    #[error("invalid root {root:?}: {reason}")]
    InvalidRoot { root: PathBuf, reason: &'static str },
    #[error("cannot resolve path: {0}")]
    Unresolvable(#[source] std::io::Error),
    #[error("path outside allowed roots")]
    OutsideRoots,
}

/// A resolved path that passed the containment check.
///
/// Only [`PathGuard::authorize`] builds one, so anything that takes an
/// `&ApprovedPath` cannot be reached with an unchecked path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovedPath(PathBuf);

impl ApprovedPath {
    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

#[derive(Debug, Clone)]
pub struct PathGuard {
    roots: Vec<PathBuf>,
}

impl PathGuard {
    /// Builds the guard from configured roots.
    ///
    /// Roots must be absolute. Existing roots are canonicalized; a root that
    /// is missing at startup is kept in normalized form so a later mount
    /// still matches.
    pub fn new<P: AsRef<Path>>(roots: &[P]) -> Result<Self, GuardError> {
        if roots.is_empty() {
            return Err(GuardError::NoRoots);
        }
        let mut normalized = Vec::with_capacity(roots.len());
        for root in roots {
            let root = root.as_ref();
            if root.as_os_str().is_empty() {
                return Err(GuardError::InvalidRoot { root: root.to_path_buf(), reason: "empty path" });
            }
            if !root.is_absolute() {
                return Err(GuardError::InvalidRoot { root: root.to_path_buf(), reason: "not absolute" });
            }
            let root = match dunce::canonicalize(root) {
                Ok(c) => c,
                Err(e) => {
                    warn!(root = %root.display(), error = %e, "allowed root not resolvable, keeping normalized form");
                    normalize_lexical(root)
                }
            };
            if !normalized.contains(&root) {
                normalized.push(root);
            }
        }
        Ok(Self { roots: normalized })
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    pub fn is_allowed(&self, candidate: impl AsRef<Path>) -> bool {
        self.authorize(candidate).is_ok()
    }

    pub fn authorize(&self, candidate: impl AsRef<Path>) -> Result<ApprovedPath, GuardError> {
        let resolved = resolve(candidate.as_ref())?;
        if self.roots.iter().any(|root| is_contained(&resolved, root)) {
            Ok(ApprovedPath(resolved))
        } else {
            Err(GuardError::OutsideRoots)
        }
    }
}

fn resolve(candidate: &Path) -> Result<PathBuf, GuardError> {
    if candidate.as_os_str().is_empty() {
        return Err(GuardError::Unresolvable(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "empty path",
        )));
    }
    dunce::canonicalize(candidate).map_err(GuardError::Unresolvable)
}

/// True when `path` equals `root` or lies beneath it. Both must already be
/// absolute and normalized.
pub fn is_contained(path: &Path, root: &Path) -> bool {
    path.starts_with(root)
}

/// Absolute form with `.` dropped and `..` folded, without touching the
/// filesystem. `..` at the root stays at the root.
pub fn normalize_lexical(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(p) => out.push(p.as_os_str()),
            Component::RootDir => out.push(Component::RootDir.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            Component::Normal(name) => out.push(name),
        }
    }
    out
}
