use axum::extract::State;
use axum::Json;
use core_runtime::config::describe_secret;
use serde::Serialize;
use tracing::{instrument, warn};

use crate::handlers::scan_watched_folder;
use crate::state::AppState;

/// Number of entry names included in the report
pub const MAX_LISTED_ENTRIES: usize = 10;

/// Configuration report; secrets are described, never echoed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigReport {
    #[serde(rename = "DROPBOX_APP_KEY")]
    pub app_key: String,
    #[serde(rename = "DROPBOX_APP_SECRET")]
    pub app_secret: String,
    #[serde(rename = "DROPBOX_REFRESH_TOKEN")]
    pub refresh_token: String,
    #[serde(rename = "DROPBOX_FOLDER_PATH")]
    pub folder_path: String,
    pub is_client_initialized: bool,
    pub folder_listing: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_found: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_listing: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
}

/// Report which credentials are present and scan the watched folder.
///
/// The scan is recursive and falls back to the root when the folder is
/// missing, like the change notification handler.
#[instrument(skip_all)]
pub async fn debug_config(State(state): State<AppState>) -> Json<ConfigReport> {
    let config = &state.config;
    let mut report = ConfigReport {
        app_key: describe_secret(&config.app_key),
        app_secret: describe_secret(&config.app_secret),
        refresh_token: describe_secret(&config.refresh_token),
        folder_path: config.folder_path.clone(),
        is_client_initialized: state.storage.is_configured(),
        folder_listing: Vec::new(),
        total_found: None,
        error_listing: None,
        error_type: None,
    };

    if report.is_client_initialized {
        match scan_watched_folder(state.storage.as_ref(), &config.folder_path).await {
            Ok(listing) => {
                let names = listing.names();
                report.total_found = Some(names.len());
                report.folder_listing = names.into_iter().take(MAX_LISTED_ENTRIES).collect();
            }
            Err(err) => {
                warn!(error = %err, "Diagnostic listing failed");
                report.error_listing = Some(err.to_string());
                report.error_type = Some(err.error_type().to_string());
            }
        }
    }

    Json(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::{configured, files, state, MockStorage};
    use bridge_traits::storage::StorageError;
    use core_runtime::config::WebhookConfig;
    use serde_json::json;

    #[tokio::test]
    async fn test_report_truncates_listing() {
        let names: Vec<String> = (0..12).map(|i| format!("file-{:02}.pdf", i)).collect();
        let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let listing = files(&name_refs);

        let mut storage = MockStorage::new();
        storage.expect_is_configured().return_const(true);
        storage
            .expect_list_folder_recursive()
            .times(1)
            .returning(move |_| Ok(listing.clone()));

        let Json(report) = debug_config(State(state(configured(), storage))).await;

        assert!(report.is_client_initialized);
        assert_eq!(report.total_found, Some(12));
        assert_eq!(report.folder_listing.len(), MAX_LISTED_ENTRIES);
        assert_eq!(report.folder_listing[0], "file-00.pdf");
        assert_eq!(report.app_key, "set (prefix: app-key..., len: 7)");
        assert_eq!(report.error_listing, None);
    }

    #[tokio::test]
    async fn test_report_without_credentials_skips_listing() {
        let mut storage = MockStorage::new();
        storage.expect_is_configured().return_const(false);
        storage.expect_list_folder_recursive().times(0);

        let config = WebhookConfig::builder().folder_path("/Scans").build().unwrap();
        let Json(report) = debug_config(State(state(config, storage))).await;

        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({
                "DROPBOX_APP_KEY": "missing",
                "DROPBOX_APP_SECRET": "missing",
                "DROPBOX_REFRESH_TOKEN": "missing",
                "DROPBOX_FOLDER_PATH": "/Scans",
                "is_client_initialized": false,
                "folder_listing": []
            })
        );
    }

    #[tokio::test]
    async fn test_report_carries_listing_error() {
        let mut storage = MockStorage::new();
        storage.expect_is_configured().return_const(true);
        storage
            .expect_list_folder_recursive()
            .times(1)
            .returning(|_| Err(StorageError::Auth("invalid_grant".to_string())));

        let Json(report) = debug_config(State(state(configured(), storage))).await;

        assert!(report.folder_listing.is_empty());
        assert_eq!(report.total_found, None);
        assert_eq!(report.error_listing.as_deref(), Some("invalid_grant"));
        assert_eq!(report.error_type.as_deref(), Some("AuthError"));
    }
}
