//! Route handlers.

mod diagnostics;
mod listing;
mod scan;
mod webhook;

pub use diagnostics::{debug_config, ConfigReport, MAX_LISTED_ENTRIES};
pub use listing::test_dropbox;
pub use scan::scan_watched_folder;
pub use webhook::{
    process_notification, receive_notification, verify_webhook, NotificationAck,
    NotificationSummary, VerificationQuery,
};
