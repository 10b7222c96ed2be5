use axum::extract::State;
use tracing::{error, info, instrument};

use crate::response::ListingResponse;
use crate::state::AppState;

/// List the configured folder and report the entry names.
///
/// Accepts any method; the request body and query are ignored. Answers 200
/// with the names in provider order, or 500 with the error message and its
/// category.
#[instrument(skip_all, fields(folder_path = %state.config.folder_path))]
pub async fn test_dropbox(State(state): State<AppState>) -> ListingResponse {
    match state.storage.list_folder(&state.config.folder_path).await {
        Ok(listing) => {
            info!(count = listing.entries.len(), "Folder listed");
            ListingResponse::success(listing.names())
        }
        Err(err) => {
            error!(error = %err, error_type = err.error_type(), "Folder listing failed");
            ListingResponse::failure(&err)
        }
    }
}
