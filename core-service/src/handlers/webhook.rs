//! Dropbox webhook endpoints.
//!
//! Dropbox first verifies the webhook URL with a `GET` carrying a
//! `challenge`, then sends a `POST` whenever a linked account changes. The
//! notification only says that something changed; the folder is listed again
//! in the background and the request is acknowledged right away.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use bridge_traits::storage::{StorageProvider, StorageResult};
use core_runtime::logging::redact_if_sensitive;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error, info, instrument, warn, Instrument};

use crate::handlers::scan_watched_folder;
use crate::state::AppState;

const SIGNATURE_HEADER: &str = "x-dropbox-signature";

/// Folder holding documents that were already processed
const FINALIZED_MARKER: &str = "/finalized/";

#[derive(Debug, Deserialize)]
pub struct VerificationQuery {
    pub challenge: String,
}

/// Echo the verification challenge as plain text.
pub async fn verify_webhook(Query(query): Query<VerificationQuery>) -> impl IntoResponse {
    debug!("Answering Dropbox webhook verification");
    (
        [
            (header::CONTENT_TYPE, "text/plain"),
            (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
        ],
        query.challenge,
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NotificationAck {
    pub status: &'static str,
}

impl NotificationAck {
    pub const RECEIVED: Self = Self { status: "received" };
    pub const ACCEPTED: Self = Self { status: "accepted" };
}

/// Acknowledge a change notification.
///
/// Bodies mentioning `list_folder` schedule a background listing of the
/// configured folder. The signature header is logged redacted and not
/// verified.
#[instrument(skip_all)]
pub async fn receive_notification(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let signature = signature_for_log(&headers);

    let payload: Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(err) => {
            error!(error = %err, "Unreadable Dropbox notification");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": err.to_string() })),
            )
                .into_response();
        }
    };

    info!(
        signature = signature.as_deref().unwrap_or("absent"),
        payload = %payload,
        "Dropbox notification received"
    );

    if payload.get("list_folder").is_none() {
        return Json(NotificationAck::RECEIVED).into_response();
    }

    let storage = Arc::clone(&state.storage);
    let folder_path = state.config.folder_path.clone();
    tokio::spawn(
        async move {
            if let Err(err) = process_notification(storage.as_ref(), &folder_path).await {
                error!(
                    error = %err,
                    error_type = err.error_type(),
                    "Dropbox change processing failed"
                );
            }
        }
        .in_current_span(),
    );

    Json(NotificationAck::ACCEPTED).into_response()
}

/// Signature header value as it may appear in logs
fn signature_for_log(headers: &HeaderMap) -> Option<String> {
    headers
        .get(SIGNATURE_HEADER)
        .map(|value| redact_if_sensitive(SIGNATURE_HEADER, value.to_str().unwrap_or_default()))
}

/// What a background listing found
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationSummary {
    pub total: usize,
    /// PDF files outside the finalized folder
    pub pending_pdfs: Vec<String>,
}

/// Scan the folder tree after a change notification and log what is there.
///
/// Skipped when the provider lacks credentials. A missing folder is scanned
/// from the root instead.
pub async fn process_notification(
    storage: &dyn StorageProvider,
    folder_path: &str,
) -> StorageResult<NotificationSummary> {
    if !storage.is_configured() {
        warn!("Dropbox not configured, skipping change check");
        return Ok(NotificationSummary::default());
    }

    info!(folder_path, "Checking for changes");
    let listing = scan_watched_folder(storage, folder_path).await?;
    info!("Found {} entries in folder", listing.entries.len());

    let mut summary = NotificationSummary {
        total: listing.entries.len(),
        pending_pdfs: Vec::new(),
    };

    for entry in &listing.entries {
        let path = entry.path_lower.as_deref().unwrap_or_default();
        debug!(name = %entry.name, path, "Checking entry");

        if !entry.is_file() || !entry.name.to_lowercase().ends_with(".pdf") {
            continue;
        }
        if path.contains(FINALIZED_MARKER) {
            debug!(name = %entry.name, "Skipping already finalized file");
            continue;
        }
        summary.pending_pdfs.push(entry.name.clone());
    }

    if !summary.pending_pdfs.is_empty() {
        info!(pending = ?summary.pending_pdfs, "PDF files awaiting processing");
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::{configured, files, state, MockStorage};
    use crate::router;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use bridge_traits::storage::{EntryKind, FolderListing, RemoteEntry, StorageError};
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tower::ServiceExt;

    async fn send(app_state: AppState, request: Request<Body>) -> (StatusCode, String) {
        let response = router(app_state).oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    fn post(body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(crate::DROPBOX_WEBHOOK_ROUTE)
            .header(SIGNATURE_HEADER, "abc123")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_challenge_is_echoed() {
        let request = Request::builder()
            .uri("/api/webhooks/dropbox?challenge=Zh3CqNbTjD")
            .body(Body::empty())
            .unwrap();

        let response = router(state(configured(), MockStorage::new()))
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/plain");
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"Zh3CqNbTjD");
    }

    #[tokio::test]
    async fn test_missing_challenge_is_rejected() {
        let request = Request::builder()
            .uri(crate::DROPBOX_WEBHOOK_ROUTE)
            .body(Body::empty())
            .unwrap();

        let (status, _) = send(state(configured(), MockStorage::new()), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_notification_without_list_folder_is_received() {
        let mut storage = MockStorage::new();
        storage.expect_list_folder_recursive().times(0);

        let (status, body) = send(state(configured(), storage), post(r#"{"delta": {}}"#)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"{"status":"received"}"#);
    }

    #[tokio::test]
    async fn test_list_folder_notification_triggers_listing() {
        let (tx, mut rx) = mpsc::unbounded_channel();

        let mut storage = MockStorage::new();
        storage.expect_is_configured().return_const(true);
        storage.expect_list_folder_recursive().times(1).returning(move |path| {
            tx.send(path.to_string()).unwrap();
            Ok(files(&["scan.pdf"]))
        });

        let (status, body) = send(
            state(configured(), storage),
            post(r#"{"list_folder": {"accounts": ["dbid:AAH4f99T0taONIb-OurWxbNQ6ywGRopQngc"]}}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"{"status":"accepted"}"#);

        let listed = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap();
        assert_eq!(listed.as_deref(), Some(""));
    }

    #[tokio::test]
    async fn test_unparseable_notification() {
        let (status, body) =
            send(state(configured(), MockStorage::new()), post("not json")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let parsed: Value = serde_json::from_str(&body).unwrap();
        assert!(parsed["error"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_process_notification_finds_pending_pdfs() {
        let mut finalized = RemoteEntry::new("done.pdf", EntryKind::File);
        finalized.path_lower = Some("/scans/finalized/done.pdf".to_string());
        let mut fresh = RemoteEntry::new("Invoice.PDF", EntryKind::File);
        fresh.path_lower = Some("/scans/invoice.pdf".to_string());
        let listing = FolderListing::new(vec![
            fresh,
            finalized,
            RemoteEntry::new("finalized", EntryKind::Folder),
            RemoteEntry::new("notes.txt", EntryKind::File),
        ]);

        let mut storage = MockStorage::new();
        storage.expect_is_configured().return_const(true);
        storage
            .expect_list_folder_recursive()
            .times(1)
            .returning(move |_| Ok(listing.clone()));

        let summary = process_notification(&storage, "/Scans").await.unwrap();

        assert_eq!(summary.total, 4);
        assert_eq!(summary.pending_pdfs, vec!["Invoice.PDF"]);
    }

    #[tokio::test]
    async fn test_process_notification_scans_root_when_folder_is_missing() {
        let mut nested = RemoteEntry::new("done.pdf", EntryKind::File);
        nested.path_lower = Some("/archive/finalized/done.pdf".to_string());
        let mut pending = RemoteEntry::new("scan.pdf", EntryKind::File);
        pending.path_lower = Some("/archive/inbox/scan.pdf".to_string());
        let root = FolderListing::new(vec![nested, pending]);

        let mut storage = MockStorage::new();
        storage.expect_is_configured().return_const(true);
        storage
            .expect_list_folder_recursive()
            .times(2)
            .returning(move |path| match path {
                "/Scans" => Err(StorageError::Api {
                    status: 409,
                    summary: "path/not_found/..".to_string(),
                }),
                "" => Ok(root.clone()),
                other => panic!("unexpected path {}", other),
            });

        let summary = process_notification(&storage, "/Scans").await.unwrap();

        assert_eq!(summary.total, 2);
        assert_eq!(summary.pending_pdfs, vec!["scan.pdf"]);
    }

    #[test]
    fn test_signature_is_redacted_for_logging() {
        let mut headers = HeaderMap::new();
        assert_eq!(signature_for_log(&headers), None);

        headers.insert(SIGNATURE_HEADER, "5f1c0a9e".parse().unwrap());
        let logged = signature_for_log(&headers).unwrap();
        assert_eq!(logged, "[REDACTED]");
        assert!(!logged.contains("5f1c0a9e"));
    }

    #[tokio::test]
    async fn test_process_notification_skips_unconfigured_provider() {
        let mut storage = MockStorage::new();
        storage.expect_is_configured().return_const(false);
        storage.expect_list_folder_recursive().times(0);

        let summary = process_notification(&storage, "").await.unwrap();
        assert_eq!(summary, NotificationSummary::default());
    }

    #[tokio::test]
    async fn test_process_notification_propagates_failure() {
        let mut storage = MockStorage::new();
        storage.expect_is_configured().return_const(true);
        storage
            .expect_list_folder_recursive()
            .times(1)
            .returning(|_| Err(StorageError::Network("reset".to_string())));

        let error = process_notification(&storage, "").await.unwrap_err();
        assert_eq!(error.error_type(), "NetworkError");
    }
}
