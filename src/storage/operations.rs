//! Storage operations
//!
//! Handles the mutating file operations: create folder, store upload, delete,
//! and locating files for download.

use std::fs;
use std::io;
use std::path::Path;

use log::{error, info, warn};
use tempfile::NamedTempFile;

use crate::error::{StorageError, display_client_path};
use crate::storage::filesystem::ensure_directory;
use crate::storage::results::{CreateFolderResult, DeleteResult, StoreResult};
use crate::storage::validation::{ResolvedPath, SandboxRoot, join_client_path, split_leaf};
use crate::utils::validation::{sanitize_filename, validate_folder_name};

/// Creates `name` inside `client_path`, including missing parents.
///
/// Creating a folder that already exists succeeds.
pub fn create_folder(
    root: &SandboxRoot,
    client_path: &str,
    name: &str,
) -> Result<CreateFolderResult, StorageError> {
    let name = validate_folder_name(name)?;
    let target = root.resolve(&join_client_path(client_path, name))?;

    ensure_directory(&target).inspect_err(|e| {
        error!("Failed to create folder {}: {}", target.client_path(), e);
    })?;

    info!(
        "Created folder {} (real: {})",
        target.client_path(),
        target.real_path().display()
    );

    Ok(CreateFolderResult {
        client_path: target.client_path().to_string(),
    })
}

/// Moves a staged upload into `client_path` under a sanitized name.
///
/// The destination directory is created if absent and an existing file with
/// the same name is replaced.
pub fn save_upload(
    root: &SandboxRoot,
    client_path: &str,
    filename: &str,
    staged: NamedTempFile,
) -> Result<StoreResult, StorageError> {
    if filename.is_empty() {
        return Err(StorageError::Validation("No selected file".into()));
    }
    let sanitized = sanitize_filename(filename)
        .ok_or_else(|| StorageError::Validation(format!("Invalid filename: {filename}")))?;

    let dest_dir = root.resolve(client_path)?;
    ensure_directory(&dest_dir)?;

    let client_file = join_client_path(client_path, &sanitized);
    let dest = dest_dir.real_path().join(&sanitized);

    persist_staged(staged, dest_dir.real_path(), &dest).map_err(|e| {
        error!(
            "Failed to store {} (real: {}): {}",
            client_file,
            dest.display(),
            e
        );
        StorageError::from_io(&client_file, e)
    })?;

    info!(
        "Stored upload {} as {} (real: {})",
        filename,
        client_file,
        dest.display()
    );

    Ok(StoreResult {
        client_path: client_file,
        filename: sanitized,
    })
}

/// Rename the staged file onto `dest`, copying through `dest_dir` when the
/// staging area is on another filesystem.
fn persist_staged(staged: NamedTempFile, dest_dir: &Path, dest: &Path) -> io::Result<()> {
    match staged.persist(dest) {
        Ok(_) => Ok(()),
        Err(e) => {
            warn!("Rename into {} failed ({}), copying instead", dest.display(), e.error);
            copy_staged(&e.file, dest_dir, dest)
        }
    }
}

/// Copy into a temp file beside `dest`, then rename it into place.
fn copy_staged(staged: &NamedTempFile, dest_dir: &Path, dest: &Path) -> io::Result<()> {
    let mut local = NamedTempFile::new_in(dest_dir)?;
    io::copy(&mut staged.reopen()?, local.as_file_mut())?;
    local.persist(dest).map_err(|e| e.error)?;
    Ok(())
}

/// Deletes a file, a symlink, or an empty directory.
///
/// Non-empty directories are refused rather than removed recursively.
pub fn delete_entry(root: &SandboxRoot, client_path: &str) -> Result<DeleteResult, StorageError> {
    let target = root.resolve(client_path)?;
    if target.is_root(root) {
        return Err(StorageError::Validation(
            "Cannot delete the root folder".into(),
        ));
    }

    let entry = target.lexical_path();
    let metadata = fs::symlink_metadata(entry).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => StorageError::NotFound(display_client_path(client_path)),
        _ => StorageError::from_io(client_path, e),
    })?;

    let was_directory = metadata.is_dir();
    let removed = if was_directory {
        fs::remove_dir(entry)
    } else {
        fs::remove_file(entry)
    };

    if let Err(e) = removed {
        error!(
            "Failed to delete {} (real: {}): {}",
            client_path,
            entry.display(),
            e
        );
        return Err(StorageError::from_io(client_path, e));
    }

    info!("Deleted {} (real: {})", client_path, entry.display());

    Ok(DeleteResult {
        client_path: client_path.to_string(),
        was_directory,
    })
}

/// Locates a regular file for download.
///
/// The final segment must be a plain file name; the directory part and the
/// file itself are both checked against the root.
pub fn locate_download(root: &SandboxRoot, client_path: &str) -> Result<ResolvedPath, StorageError> {
    let (dir, leaf) = split_leaf(client_path)?;
    let directory = root.resolve(dir)?;
    let file = root.resolve(&join_client_path(directory.client_path(), leaf))?;

    if !file.real_path().is_file() {
        return Err(StorageError::NotFound(display_client_path(client_path)));
    }

    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn sandbox() -> (TempDir, SandboxRoot) {
        let dir = TempDir::new().unwrap();
        let root = SandboxRoot::open(dir.path().join("uploads")).unwrap();
        (dir, root)
    }

    fn staged(dir: &TempDir, content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new_in(dir.path()).unwrap();
        file.write_all(content).unwrap();
        file
    }

    #[test]
    fn create_folder_is_idempotent() {
        let (_dir, root) = sandbox();
        create_folder(&root, "", "docs").unwrap();
        create_folder(&root, "", "docs").unwrap();
        assert!(root.path().join("docs").is_dir());
    }

    #[test]
    fn concurrent_create_folder_all_succeed() {
        let (_dir, root) = sandbox();
        let barrier = std::sync::Barrier::new(8);

        let results: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    scope.spawn(|| {
                        barrier.wait();
                        create_folder(&root, "", "docs")
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        for result in results {
            assert_eq!(result.unwrap().client_path, "docs");
        }
        assert!(root.path().join("docs").is_dir());
    }

    #[test]
    fn ensure_directory_tolerates_existing_directory() {
        let (_dir, root) = sandbox();
        let target = root.resolve("a/b").unwrap();
        fs::create_dir_all(root.path().join("a/b")).unwrap();
        ensure_directory(&target).unwrap();
        ensure_directory(&target).unwrap();
    }

    #[test]
    fn create_folder_makes_parents() {
        let (_dir, root) = sandbox();
        let result = create_folder(&root, "a/b", " c ").unwrap();
        assert_eq!(result.client_path, "a/b/c");
        assert!(root.path().join("a/b/c").is_dir());
    }

    #[test]
    fn create_folder_rejects_blank_name() {
        let (_dir, root) = sandbox();
        assert!(matches!(
            create_folder(&root, "", "  "),
            Err(StorageError::Validation(_))
        ));
    }

    #[test]
    fn create_folder_rejects_escape() {
        let (dir, root) = sandbox();
        assert!(matches!(
            create_folder(&root, "..", "evil"),
            Err(StorageError::PathTraversal(_))
        ));
        assert!(matches!(
            create_folder(&root, "", "../evil"),
            Err(StorageError::PathTraversal(_))
        ));
        assert!(!dir.path().join("evil").exists());
    }

    #[test]
    fn create_folder_over_file_is_operational() {
        let (_dir, root) = sandbox();
        fs::write(root.path().join("taken"), b"x").unwrap();
        assert!(matches!(
            create_folder(&root, "", "taken"),
            Err(StorageError::Operational(_))
        ));
    }

    #[test]
    fn upload_writes_sanitized_file() {
        let (dir, root) = sandbox();
        let result = save_upload(&root, "docs", "../../a b.txt", staged(&dir, b"hello")).unwrap();
        assert_eq!(result.filename, "a_b.txt");
        assert_eq!(result.client_path, "docs/a_b.txt");
        assert_eq!(fs::read(root.path().join("docs/a_b.txt")).unwrap(), b"hello");
        assert!(!dir.path().join("a b.txt").exists());
    }

    #[test]
    fn upload_overwrites_existing_file() {
        let (dir, root) = sandbox();
        save_upload(&root, "", "a.txt", staged(&dir, b"first")).unwrap();
        save_upload(&root, "", "a.txt", staged(&dir, b"second")).unwrap();
        assert_eq!(fs::read(root.path().join("a.txt")).unwrap(), b"second");
    }

    #[test]
    fn copy_fallback_places_staged_content() {
        let (_dir, root) = sandbox();
        let staging = TempDir::new().unwrap();
        let upload = staged(&staging, b"copied bytes");
        let dest = root.path().join("copied.txt");
        fs::write(&dest, b"old").unwrap();

        copy_staged(&upload, root.path(), &dest).unwrap();
        assert_eq!(fs::read(&dest).unwrap(), b"copied bytes");
        assert!(upload.path().exists());

        let leftovers = fs::read_dir(root.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn upload_from_separate_staging_dir() {
        let (_dir, root) = sandbox();
        let staging = TempDir::new().unwrap();
        save_upload(&root, "docs", "a.txt", staged(&staging, b"hello")).unwrap();
        assert_eq!(fs::read(root.path().join("docs/a.txt")).unwrap(), b"hello");
        assert_eq!(fs::read_dir(staging.path()).unwrap().count(), 0);
    }

    #[test]
    fn upload_rejects_empty_and_unsafe_names() {
        let (dir, root) = sandbox();
        assert!(matches!(
            save_upload(&root, "", "", staged(&dir, b"x")),
            Err(StorageError::Validation(_))
        ));
        assert!(matches!(
            save_upload(&root, "", "..", staged(&dir, b"x")),
            Err(StorageError::Validation(_))
        ));
    }

    #[test]
    fn upload_rejects_escaping_directory() {
        let (dir, root) = sandbox();
        assert!(matches!(
            save_upload(&root, "../outside", "a.txt", staged(&dir, b"x")),
            Err(StorageError::PathTraversal(_))
        ));
        assert!(!dir.path().join("outside").exists());
    }

    #[test]
    fn delete_file_and_empty_directory() {
        let (_dir, root) = sandbox();
        fs::create_dir_all(root.path().join("docs")).unwrap();
        fs::write(root.path().join("docs/a.txt"), b"x").unwrap();

        let removed = delete_entry(&root, "docs/a.txt").unwrap();
        assert!(!removed.was_directory);
        assert!(!root.path().join("docs/a.txt").exists());

        let removed = delete_entry(&root, "docs").unwrap();
        assert!(removed.was_directory);
        assert!(!root.path().join("docs").exists());
    }

    #[test]
    fn delete_refuses_non_empty_directory() {
        let (_dir, root) = sandbox();
        fs::create_dir_all(root.path().join("docs")).unwrap();
        fs::write(root.path().join("docs/a.txt"), b"x").unwrap();

        assert!(matches!(
            delete_entry(&root, "docs"),
            Err(StorageError::Operational(_))
        ));
        assert!(root.path().join("docs/a.txt").exists());
    }

    #[test]
    fn delete_missing_is_not_found() {
        let (_dir, root) = sandbox();
        assert!(matches!(
            delete_entry(&root, "ghost.txt"),
            Err(StorageError::NotFound(_))
        ));
    }

    #[test]
    fn delete_root_is_refused() {
        let (_dir, root) = sandbox();
        assert!(matches!(delete_entry(&root, ""), Err(StorageError::Validation(_))));
        assert!(matches!(delete_entry(&root, "."), Err(StorageError::Validation(_))));
        assert!(root.path().is_dir());
    }

    #[test]
    fn delete_outside_root_is_violation() {
        let (dir, root) = sandbox();
        fs::write(dir.path().join("keep.txt"), b"x").unwrap();
        assert!(matches!(
            delete_entry(&root, "../keep.txt"),
            Err(StorageError::PathTraversal(_))
        ));
        assert!(dir.path().join("keep.txt").exists());
    }

    #[cfg(unix)]
    #[test]
    fn delete_symlink_removes_link_only() {
        let (_dir, root) = sandbox();
        fs::write(root.path().join("target.txt"), b"x").unwrap();
        std::os::unix::fs::symlink(root.path().join("target.txt"), root.path().join("link.txt"))
            .unwrap();

        delete_entry(&root, "link.txt").unwrap();
        assert!(root.path().join("target.txt").exists());
        assert!(fs::symlink_metadata(root.path().join("link.txt")).is_err());
    }

    #[test]
    fn locate_download_finds_file() {
        let (_dir, root) = sandbox();
        fs::create_dir_all(root.path().join("docs")).unwrap();
        fs::write(root.path().join("docs/a.txt"), b"x").unwrap();
        let found = locate_download(&root, "docs/a.txt").unwrap();
        assert_eq!(found.real_path(), root.path().join("docs/a.txt"));
    }

    #[test]
    fn locate_download_missing_or_directory_is_not_found() {
        let (_dir, root) = sandbox();
        fs::create_dir_all(root.path().join("docs")).unwrap();
        assert!(matches!(
            locate_download(&root, "docs/none.txt"),
            Err(StorageError::NotFound(_))
        ));
        assert!(matches!(
            locate_download(&root, "docs"),
            Err(StorageError::NotFound(_))
        ));
    }

    #[test]
    fn locate_download_rejects_escape() {
        let (dir, root) = sandbox();
        fs::write(dir.path().join("secret.txt"), b"x").unwrap();
        assert!(matches!(
            locate_download(&root, "../secret.txt"),
            Err(StorageError::PathTraversal(_))
        ));
        assert!(matches!(
            locate_download(&root, "docs/.."),
            Err(StorageError::PathTraversal(_))
        ));
    }
}
