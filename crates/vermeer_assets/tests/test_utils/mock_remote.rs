//! Remote asset store mock.

use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use vermeer_core::{CancelHandle, RemoteAssetStore, UploadedFile};
use vermeer_error::{RemoteError, RemoteErrorKind};

/// Records uploads and deletions; can be told to fail.
#[derive(Default)]
pub struct MockRemoteStore {
    uploads: AtomicUsize,
    uploaded: Mutex<Vec<(String, String, usize)>>,
    deleted: Mutex<Vec<String>>,
    fail_uploads: AtomicBool,
    fail_deletes: AtomicBool,
    cancel_on_upload: Mutex<Option<CancelHandle>>,
}

impl MockRemoteStore {
    pub fn uploads(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    /// `(mime_type, display_name, size)` per upload.
    pub fn uploaded(&self) -> Vec<(String, String, usize)> {
        self.uploaded.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }

    pub fn fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// Cancel the caller's context once the next upload has been committed.
    pub fn cancel_on_upload(&self, handle: CancelHandle) {
        *self.cancel_on_upload.lock().unwrap() = Some(handle);
    }
}

#[async_trait]
impl RemoteAssetStore for MockRemoteStore {
    async fn upload(
        &self,
        data: &[u8],
        mime_type: &str,
        display_name: &str,
    ) -> Result<UploadedFile, RemoteError> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(RemoteError::new(RemoteErrorKind::HttpError {
                status_code: 400,
                message: "upload rejected".to_string(),
            }));
        }
        let n = self.uploads.fetch_add(1, Ordering::SeqCst) + 1;
        self.uploaded.lock().unwrap().push((
            mime_type.to_string(),
            display_name.to_string(),
            data.len(),
        ));
        if let Some(handle) = self.cancel_on_upload.lock().unwrap().take() {
            handle.cancel();
        }
        Ok(UploadedFile {
            uri: format!("https://files.example/v1beta/files/file-{}", n),
            name: format!("files/file-{}", n),
        })
    }

    async fn delete(&self, name: &str) -> Result<(), RemoteError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(RemoteError::new(RemoteErrorKind::HttpError {
                status_code: 403,
                message: "delete forbidden".to_string(),
            }));
        }
        self.deleted.lock().unwrap().push(name.to_string());
        Ok(())
    }
}
