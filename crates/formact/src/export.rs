//! Transient file downloads for the `exportFile` directive.
//!
//! The download frame is navigated to the export URL, then cleared and
//! released after a fixed grace period — long enough for the browser to
//! begin the transfer.

use std::sync::Arc;

use crate::services::DownloadFrame;

/// Relative URL prefix of exported files.
pub const EXPORT_URL_PREFIX: &str = "ws/files/data-export/";

/// Grace period before the download frame is cleared.
pub const EXPORT_CLEANUP_MS: u64 = 5000;

/// Begin downloading the file identified by `token` and schedule the
/// frame cleanup.
pub fn download(frame: &Arc<dyn DownloadFrame>, token: &str) {
    frame.open(&format!("{EXPORT_URL_PREFIX}{token}"));
    let frame = Arc::clone(frame);
    tokio::spawn(async move {
        tokio::time::sleep(tokio::time::Duration::from_millis(EXPORT_CLEANUP_MS)).await;
        frame.clear();
    });
}
