//! Object URLs backed by `URL.createObjectURL`

use spatial_core::{ObjectUrlFactory, UploadError, UploadKind};
use web_sys::{File, Url};

/// Mints `blob:` URLs for files picked in the page
#[derive(Debug, Default)]
pub struct BrowserObjectUrls;

impl ObjectUrlFactory for BrowserObjectUrls {
    type File = File;

    fn create(&mut self, kind: UploadKind, file: &File) -> Result<String, UploadError> {
        let url = Url::create_object_url_with_blob(file).map_err(|e| UploadError::ObjectUrl {
            kind,
            reason: format!("{:?}", e),
        })?;
        tracing::info!(file = %file.name(), size = file.size(), %kind, "File selected");
        Ok(url)
    }

    fn revoke(&mut self, url: &str) {
        if let Err(e) = Url::revoke_object_url(url) {
            tracing::warn!("Failed to revoke {}: {:?}", url, e);
        }
    }
}
