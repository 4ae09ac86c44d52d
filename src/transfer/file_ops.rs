//! Module `file_ops`
//!
//! Handles the byte-moving half of uploads and downloads. Upload bodies are
//! written chunk by chunk into a staging file so memory use stays bounded;
//! downloads are opened here and streamed by the HTTP layer.

use std::fmt::Display;
use std::path::Path;

use futures_util::{Stream, TryStreamExt};
use log::{error, info, warn};
use tokio::io::AsyncWriteExt;

use crate::error::StorageError;
use crate::storage::ResolvedPath;
use crate::transfer::results::{DownloadResult, StagedUpload};

const STAGING_PREFIX: &str = ".rax-upload-";

/// Writes an upload body into a fresh file under `staging_dir`.
///
/// Fails with a validation error once more than `max_bytes` have arrived; the
/// partial staging file is removed.
pub async fn stage_upload<S, B, E>(
    mut body: S,
    filename: &str,
    staging_dir: &Path,
    max_bytes: u64,
) -> Result<StagedUpload, StorageError>
where
    S: Stream<Item = Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
    E: Display,
{
    let staged = tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .tempfile_in(staging_dir)
        .map_err(|e| {
            error!("Failed to create staging file in {}: {}", staging_dir.display(), e);
            StorageError::Operational(e.to_string())
        })?;

    let handle = staged
        .as_file()
        .try_clone()
        .map_err(|e| StorageError::Operational(e.to_string()))?;
    let mut writer = tokio::fs::File::from_std(handle);
    let mut total_bytes = 0u64;

    while let Some(chunk) = body
        .try_next()
        .await
        .map_err(|e| StorageError::Validation(format!("Failed to read upload: {e}")))?
    {
        let chunk = chunk.as_ref();
        total_bytes += chunk.len() as u64;
        if total_bytes > max_bytes {
            warn!(
                "Upload {} exceeds limit: {} bytes > {} bytes",
                filename, total_bytes, max_bytes
            );
            return Err(StorageError::Validation(format!(
                "File too large (limit {} bytes)",
                max_bytes
            )));
        }

        writer.write_all(chunk).await.map_err(|e| {
            error!("Failed to write staging file for {}: {}", filename, e);
            StorageError::Operational(e.to_string())
        })?;
    }

    writer
        .flush()
        .await
        .map_err(|e| StorageError::Operational(e.to_string()))?;
    drop(writer);

    info!("Received upload {} ({} bytes)", filename, total_bytes);

    Ok(StagedUpload {
        file: staged,
        filename: filename.to_string(),
        bytes: total_bytes,
    })
}

/// Opens a located file for streaming back to the client.
pub async fn open_download(file: &ResolvedPath) -> Result<DownloadResult, StorageError> {
    let path = file.real_path();
    let handle = tokio::fs::File::open(path)
        .await
        .map_err(|e| StorageError::from_io(file.client_path(), e))?;
    let len = handle
        .metadata()
        .await
        .map_err(|e| StorageError::from_io(file.client_path(), e))?
        .len();

    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();
    let content_type = mime_guess::from_path(path).first_or_octet_stream();

    info!(
        "Serving {} ({} bytes, {})",
        file.client_path(),
        len,
        content_type
    );

    Ok(DownloadResult {
        file: handle,
        filename,
        content_type,
        len,
    })
}
