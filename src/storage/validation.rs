//! Path validation
//!
//! Maps untrusted client paths onto the storage root. This is the only place a
//! raw client path is interpreted; everything else works on [`ResolvedPath`].

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use log::warn;
use soft_canonicalize::soft_canonicalize;

use crate::error::{StorageError, display_client_path};

/// The storage root every request is confined to.
///
/// Holds the canonical form of the directory, so symlinks in the configured
/// location are already resolved.
#[derive(Debug, Clone)]
pub struct SandboxRoot {
    root: PathBuf,
}

/// A client path that has been checked against the root.
#[derive(Debug, Clone)]
pub struct ResolvedPath {
    client: String,
    lexical: PathBuf,
    real: PathBuf,
}

impl SandboxRoot {
    /// Open the root directory, creating it if absent.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        fs::create_dir_all(path)?;
        let root = soft_canonicalize(path)?;
        Ok(Self { root })
    }

    /// Canonical root directory.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Resolve a client path to a location inside the root.
    ///
    /// The joined path is normalized lexically, then canonicalized with every
    /// symlink along it resolved, dangling ones included, so a link inside the
    /// root cannot lead outside it. Both forms must stay under the root.
    pub fn resolve(&self, client_path: &str) -> Result<ResolvedPath, StorageError> {
        if client_path.contains('\0') {
            return Err(StorageError::Validation("Invalid path".into()));
        }

        let lexical = match normalize_joined(&self.root, client_path) {
            Some(path) if path.starts_with(&self.root) => path,
            _ => return Err(self.violation(client_path)),
        };

        let real = soft_canonicalize(&lexical)
            .map_err(|e| StorageError::from_io(client_path, e))?;
        if !real.starts_with(&self.root) {
            return Err(self.violation(client_path));
        }

        Ok(ResolvedPath {
            client: client_path.to_string(),
            lexical,
            real,
        })
    }

    fn violation(&self, client_path: &str) -> StorageError {
        warn!(
            target: "security",
            "Rejected path outside storage root: {:?} (root: {})",
            client_path,
            self.root.display()
        );
        StorageError::PathTraversal(display_client_path(client_path))
    }
}

impl ResolvedPath {
    /// The client path this was resolved from.
    pub fn client_path(&self) -> &str {
        &self.client
    }

    /// Absolute path with symlinks resolved.
    pub fn real_path(&self) -> &Path {
        &self.real
    }

    /// Absolute path before symlink resolution.
    ///
    /// Refers to the entry itself when the last component is a link.
    pub fn lexical_path(&self) -> &Path {
        &self.lexical
    }

    /// Whether this is the root directory itself.
    pub fn is_root(&self, root: &SandboxRoot) -> bool {
        self.lexical == root.root
    }
}

/// Join `client_path` onto `root` and collapse `.` and `..`.
///
/// Returns `None` for absolute or prefixed client paths and for `..` that
/// climbs above the filesystem root.
fn normalize_joined(root: &Path, client_path: &str) -> Option<PathBuf> {
    let mut normalized = root.to_path_buf();
    for component in Path::new(client_path).components() {
        match component {
            Component::Normal(part) => normalized.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    return None;
                }
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(normalized)
}

/// Split a client path into its directory and final segment.
///
/// The leaf must be one plain segment; anything else is a violation.
pub fn split_leaf(client_path: &str) -> Result<(&str, &str), StorageError> {
    let trimmed = client_path.trim_end_matches('/');
    let (dir, leaf) = match trimmed.rfind('/') {
        Some(idx) => (&trimmed[..idx], &trimmed[idx + 1..]),
        None => ("", trimmed),
    };

    if leaf.is_empty() || leaf == "." || leaf == ".." || leaf.contains('\\') {
        warn!(target: "security", "Rejected file name in path {:?}", client_path);
        return Err(StorageError::PathTraversal(display_client_path(client_path)));
    }

    Ok((dir, leaf))
}

/// Join a client path and a child name with `/`.
pub fn join_client_path(base: &str, name: &str) -> String {
    let base = base.trim_end_matches('/');
    if base.is_empty() {
        name.to_string()
    } else {
        format!("{base}/{name}")
    }
}
