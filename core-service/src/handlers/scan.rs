//! Recursive scan of the watched folder.

use bridge_traits::storage::{FolderListing, StorageProvider, StorageResult};
use tracing::{info, warn};

/// List everything below `folder_path`.
///
/// When the provider reports the folder as missing, the whole account is
/// scanned from the root instead. A failing root scan is returned as is.
pub async fn scan_watched_folder(
    storage: &dyn StorageProvider,
    folder_path: &str,
) -> StorageResult<FolderListing> {
    match storage.list_folder_recursive(folder_path).await {
        Err(err) if err.is_not_found() && !folder_path.is_empty() => {
            warn!(
                folder_path,
                error = %err,
                "Watched folder not found, scanning from the root"
            );
            let listing = storage.list_folder_recursive("").await?;
            info!(entries = listing.entries.len(), "Scanned from the root");
            Ok(listing)
        }
        result => result,
    }
}
