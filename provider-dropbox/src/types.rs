//! Dropbox API request and response types
//!
//! Data structures for the Dropbox API v2 `files/list_folder` endpoint.

use bridge_traits::storage::{EntryKind, FolderListing, RemoteEntry};
use serde::{Deserialize, Serialize};

/// Arguments of `files/list_folder`
///
/// See: https://www.dropbox.com/developers/documentation/http/documentation#files-list_folder
#[derive(Debug, Clone, Serialize)]
pub struct ListFolderArg {
    /// Folder path; the empty string is the root
    pub path: String,
    pub recursive: bool,
}

impl ListFolderArg {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            recursive: false,
        }
    }

    /// Include the contents of every subfolder
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }
}

/// Result of `files/list_folder`
#[derive(Debug, Deserialize)]
pub struct ListFolderResult {
    pub entries: Vec<Metadata>,
    #[serde(default)]
    pub cursor: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

impl ListFolderResult {
    /// Convert into the provider-agnostic listing, keeping entry order
    pub fn into_listing(self) -> FolderListing {
        FolderListing {
            entries: self.entries.into_iter().map(RemoteEntry::from).collect(),
            cursor: self.cursor,
            has_more: self.has_more,
        }
    }
}

/// Entry metadata, discriminated by the `.tag` field
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = ".tag", rename_all = "lowercase")]
pub enum Metadata {
    File(FileMetadata),
    Folder(FolderMetadata),
    Deleted(DeletedMetadata),
}

impl Metadata {
    pub fn name(&self) -> &str {
        match self {
            Metadata::File(file) => &file.name,
            Metadata::Folder(folder) => &folder.name,
            Metadata::Deleted(deleted) => &deleted.name,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FileMetadata {
    pub name: String,
    pub id: String,
    #[serde(default)]
    pub path_lower: Option<String>,
    #[serde(default)]
    pub path_display: Option<String>,
    /// File size in bytes
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub server_modified: Option<String>,
    #[serde(default)]
    pub rev: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FolderMetadata {
    pub name: String,
    pub id: String,
    #[serde(default)]
    pub path_lower: Option<String>,
    #[serde(default)]
    pub path_display: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeletedMetadata {
    pub name: String,
    #[serde(default)]
    pub path_lower: Option<String>,
    #[serde(default)]
    pub path_display: Option<String>,
}

impl From<Metadata> for RemoteEntry {
    fn from(metadata: Metadata) -> Self {
        match metadata {
            Metadata::File(file) => RemoteEntry {
                name: file.name,
                kind: EntryKind::File,
                id: Some(file.id),
                path_lower: file.path_lower,
                path_display: file.path_display,
            },
            Metadata::Folder(folder) => RemoteEntry {
                name: folder.name,
                kind: EntryKind::Folder,
                id: Some(folder.id),
                path_lower: folder.path_lower,
                path_display: folder.path_display,
            },
            Metadata::Deleted(deleted) => RemoteEntry {
                name: deleted.name,
                kind: EntryKind::Deleted,
                id: None,
                path_lower: deleted.path_lower,
                path_display: deleted.path_display,
            },
        }
    }
}

/// Error body returned with 4xx/409 answers
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub error_summary: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_folder_arg_serialization() {
        let json = serde_json::to_string(&ListFolderArg::new("")).unwrap();
        assert_eq!(json, r#"{"path":"","recursive":false}"#);

        let json = serde_json::to_string(&ListFolderArg::new("/Scans").with_recursive(true)).unwrap();
        assert_eq!(json, r#"{"path":"/Scans","recursive":true}"#);
    }

    #[test]
    fn test_list_folder_result_deserialization() {
        let json = r#"{
            "entries": [
                {
                    ".tag": "file",
                    "name": "report.pdf",
                    "id": "id:a4ayc_80_OEAAAAAAAAAXw",
                    "path_lower": "/docs/report.pdf",
                    "path_display": "/Docs/report.pdf",
                    "size": 7212,
                    "server_modified": "2024-07-12T08:00:00Z",
                    "rev": "a1c10ce0dd78",
                    "is_downloadable": true
                },
                {
                    ".tag": "folder",
                    "name": "Archive",
                    "id": "id:a4ayc_80_OEAAAAAAAAAXz",
                    "path_lower": "/docs/archive",
                    "path_display": "/Docs/Archive"
                },
                {
                    ".tag": "deleted",
                    "name": "old.txt",
                    "path_lower": "/docs/old.txt"
                }
            ],
            "cursor": "ZtkX9_EHj3x7PMkVuFIhwKYXEpwpLwyxp9vMKomUhllil9q7eWiAu",
            "has_more": false
        }"#;

        let result: ListFolderResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.entries.len(), 3);
        assert_eq!(result.entries[0].name(), "report.pdf");

        let listing = result.into_listing();
        assert_eq!(listing.names(), vec!["report.pdf", "Archive", "old.txt"]);
        assert!(listing.entries[0].is_file());
        assert!(listing.entries[1].is_folder());
        assert_eq!(listing.entries[2].kind, EntryKind::Deleted);
        assert_eq!(listing.entries[2].id, None);
        assert!(listing.cursor.is_some());
    }

    #[test]
    fn test_empty_listing() {
        let result: ListFolderResult =
            serde_json::from_str(r#"{"entries": [], "cursor": "c", "has_more": false}"#).unwrap();
        assert!(result.into_listing().entries.is_empty());
    }

    #[test]
    fn test_unknown_tag_is_rejected() {
        let json = r#"{"entries": [{".tag": "shortcut", "name": "x"}]}"#;
        assert!(serde_json::from_str::<ListFolderResult>(json).is_err());
    }

    #[test]
    fn test_api_error_body() {
        let body: ApiErrorBody = serde_json::from_str(
            r#"{"error_summary": "path/not_found/..", "error": {".tag": "path"}}"#,
        )
        .unwrap();
        assert_eq!(body.error_summary, "path/not_found/..");
    }
}
