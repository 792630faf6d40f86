//! Serving files from the configured static root.
//!
//! Only consulted when no route matched. The request path is appended to the
//! root as is: no URL decoding, no `..` filtering, no directory index.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tracing::{debug, error};

use crate::http::mime;
use crate::http::response::{Response, StatusCode};

/// Joins `root` and `request_path` without doubling the `/` between them.
pub fn static_path(root: &Path, request_path: &str) -> PathBuf {
    let mut full = OsString::from(root.as_os_str());
    let root_has_sep = root.as_os_str().as_encoded_bytes().last() == Some(&b'/');
    let tail = match request_path.strip_prefix('/') {
        Some(stripped) if root_has_sep => stripped,
        _ => request_path,
    };
    full.push(tail);
    PathBuf::from(full)
}

/// An opened regular file about to become a response body.
#[derive(Debug)]
pub struct StaticFile {
    /// Last component of the request path, used to pick the content type
    pub filename: String,
    pub file: File,
    pub size: u64,
}

impl StaticFile {
    /// Opens `root` + `request_path` read-only. Returns `None` when it does
    /// not exist, cannot be opened, or is not a regular file.
    pub async fn open(root: &Path, request_path: &str) -> Option<Self> {
        let full = static_path(root, request_path);
        debug!(path = %full.display(), "Trying static path");

        let file = File::open(&full).await.ok()?;
        let meta = file.metadata().await.ok()?;
        if !meta.is_file() {
            return None;
        }

        let filename = request_path
            .rsplit('/')
            .next()
            .unwrap_or(request_path)
            .to_string();

        Some(Self {
            filename,
            file,
            size: meta.len(),
        })
    }

    /// Replaces the body of `res` with the file contents.
    ///
    /// On a read error the partial body is dropped and the response becomes
    /// `500 Internal Server Error`. The file is closed when `self` drops.
    pub async fn read_into(mut self, res: &mut Response) {
        res.set_content_type(mime::content_type_for(&self.filename));

        let mut body = Vec::with_capacity(usize::try_from(self.size).unwrap_or(0));
        match self.file.read_to_end(&mut body).await {
            Ok(_) => res.body = body,
            Err(e) => {
                error!(file = %self.filename, "Failed to read static file: {}", e);
                res.set_status(StatusCode::InternalServerError);
                res.body.clear();
            }
        }
    }
}
