//! Uploaded file buffers and object-URL lifecycle
//!
//! Every object URL minted for an upload is tracked in one
//! [`ObjectUrlRegistry`] and revoked exactly once: on an explicit reset, on
//! page teardown, or when the registry is dropped.

use thiserror::Error;

use crate::source::{Source, UPLOAD_LABEL};

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Failed to create object URL for {kind}: {reason}")]
    ObjectUrl { kind: UploadKind, reason: String },
}

/// Which of the two upload slots a file goes into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UploadKind {
    /// Default-format asset (binary glTF)
    Primary,
    /// Packaged format for Quick Look style AR (USDZ)
    Alternate,
}

impl UploadKind {
    /// Accept string for the file input element
    pub fn accept(&self) -> &'static str {
        match self {
            UploadKind::Primary => ".glb",
            UploadKind::Alternate => ".usdz",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UploadKind::Primary => "Upload GLB",
            UploadKind::Alternate => "Upload USDZ",
        }
    }
}

impl std::fmt::Display for UploadKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UploadKind::Primary => write!(f, "glb"),
            UploadKind::Alternate => write!(f, "usdz"),
        }
    }
}

/// Platform primitive that turns a file into a revocable URL
pub trait ObjectUrlFactory {
    type File;

    fn create(&mut self, kind: UploadKind, file: &Self::File) -> Result<String, UploadError>;

    fn revoke(&mut self, url: &str);
}

/// Tracks every object URL minted through a factory until it is released
pub struct ObjectUrlRegistry<F: ObjectUrlFactory> {
    factory: F,
    live: Vec<String>,
}

impl<F: ObjectUrlFactory> ObjectUrlRegistry<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            live: Vec::new(),
        }
    }

    /// Mint and track a new handle
    pub fn acquire(&mut self, kind: UploadKind, file: &F::File) -> Result<String, UploadError> {
        let url = self.factory.create(kind, file)?;
        tracing::debug!(%kind, url = %url, "Created object URL");
        self.live.push(url.clone());
        Ok(url)
    }

    /// Revoke every tracked handle. Returns how many were released.
    pub fn release_all(&mut self) -> usize {
        let count = self.live.len();
        for url in self.live.drain(..) {
            self.factory.revoke(&url);
        }
        if count > 0 {
            tracing::debug!(count, "Revoked object URLs");
        }
        count
    }

    /// Handles that have been minted and not yet revoked
    pub fn live(&self) -> &[String] {
        &self.live
    }
}

impl<F: ObjectUrlFactory> Drop for ObjectUrlRegistry<F> {
    fn drop(&mut self) {
        self.release_all();
    }
}

/// Object URLs of the currently active uploads
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileBuffers {
    primary: Option<String>,
    alternate: Option<String>,
}

impl FileBuffers {
    pub fn get(&self, kind: UploadKind) -> Option<&str> {
        match kind {
            UploadKind::Primary => self.primary.as_deref(),
            UploadKind::Alternate => self.alternate.as_deref(),
        }
    }

    /// Store a handle in its slot, keeping the other slot untouched
    pub fn set(&mut self, kind: UploadKind, url: String) {
        match kind {
            UploadKind::Primary => self.primary = Some(url),
            UploadKind::Alternate => self.alternate = Some(url),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_none() && self.alternate.is_none()
    }

    pub fn clear(&mut self) {
        self.primary = None;
        self.alternate = None;
    }

    /// Source derived from the uploads, if any.
    ///
    /// With a primary upload the alternate falls back to it; with only an
    /// alternate upload both locators point at the alternate.
    pub fn source(&self) -> Option<Source> {
        match (&self.primary, &self.alternate) {
            (Some(primary), alternate) => Some(
                Source::new(UPLOAD_LABEL, primary.clone())
                    .with_ios_url(alternate.as_ref().unwrap_or(primary).clone()),
            ),
            (None, Some(alternate)) => {
                Some(Source::new(UPLOAD_LABEL, alternate.clone()).with_ios_url(alternate.clone()))
            }
            (None, None) => None,
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Shared view of what a [`RecordingFactory`] has done
    #[derive(Debug, Default)]
    pub struct UrlLog {
        pub created: Vec<String>,
        pub revoked: Vec<String>,
    }

    /// Test file stand-in: just a name
    pub struct FakeFile(pub &'static str);

    /// Mints `blob:<name>#<n>` handles and records revocations
    pub struct RecordingFactory {
        pub log: Rc<RefCell<UrlLog>>,
        pub fail: bool,
    }

    impl RecordingFactory {
        pub fn new() -> (Self, Rc<RefCell<UrlLog>>) {
            let log = Rc::new(RefCell::new(UrlLog::default()));
            (
                Self {
                    log: log.clone(),
                    fail: false,
                },
                log,
            )
        }
    }

    impl ObjectUrlFactory for RecordingFactory {
        type File = FakeFile;

        fn create(&mut self, kind: UploadKind, file: &FakeFile) -> Result<String, UploadError> {
            if self.fail {
                return Err(UploadError::ObjectUrl {
                    kind,
                    reason: "quota".to_string(),
                });
            }
            let mut log = self.log.borrow_mut();
            let url = format!("blob:{}#{}", file.0, log.created.len());
            log.created.push(url.clone());
            Ok(url)
        }

        fn revoke(&mut self, url: &str) {
            self.log.borrow_mut().revoked.push(url.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    #[test]
    fn test_primary_only_falls_back() {
        let mut buffers = FileBuffers::default();
        buffers.set(UploadKind::Primary, "blob:a".to_string());
        let source = buffers.source().unwrap();
        assert_eq!(source.label(), UPLOAD_LABEL);
        assert_eq!(source.url(), "blob:a");
        assert_eq!(source.ios_url(), Some("blob:a"));
    }

    #[test]
    fn test_alternate_only() {
        let mut buffers = FileBuffers::default();
        buffers.set(UploadKind::Alternate, "blob:b".to_string());
        let source = buffers.source().unwrap();
        assert_eq!(source.url(), "blob:b");
        assert_eq!(source.ios_url(), Some("blob:b"));
    }

    #[test]
    fn test_pair_keeps_both() {
        let mut buffers = FileBuffers::default();
        buffers.set(UploadKind::Alternate, "blob:b".to_string());
        buffers.set(UploadKind::Primary, "blob:a".to_string());
        let source = buffers.source().unwrap();
        assert_eq!(source.url(), "blob:a");
        assert_eq!(source.ios_url(), Some("blob:b"));

        buffers.clear();
        assert!(buffers.is_empty());
        assert!(buffers.source().is_none());
    }

    #[test]
    fn test_registry_releases_once() {
        let (factory, log) = RecordingFactory::new();
        let mut registry = ObjectUrlRegistry::new(factory);
        let a = registry.acquire(UploadKind::Primary, &FakeFile("a.glb")).unwrap();
        let b = registry.acquire(UploadKind::Alternate, &FakeFile("b.usdz")).unwrap();
        assert_eq!(registry.live(), &[a.clone(), b.clone()]);

        assert_eq!(registry.release_all(), 2);
        assert_eq!(registry.release_all(), 0);
        assert_eq!(log.borrow().revoked, vec![a, b]);
    }

    #[test]
    fn test_registry_releases_on_drop() {
        let (factory, log) = RecordingFactory::new();
        {
            let mut registry = ObjectUrlRegistry::new(factory);
            registry.acquire(UploadKind::Primary, &FakeFile("a.glb")).unwrap();
        }
        assert_eq!(log.borrow().revoked.len(), 1);
    }

    #[test]
    fn test_failed_acquire_tracks_nothing() {
        let (mut factory, log) = RecordingFactory::new();
        factory.fail = true;
        let mut registry = ObjectUrlRegistry::new(factory);
        assert!(registry.acquire(UploadKind::Primary, &FakeFile("a.glb")).is_err());
        assert!(registry.live().is_empty());
        drop(registry);
        assert!(log.borrow().revoked.is_empty());
    }

    #[test]
    fn test_kind_accept_strings() {
        assert_eq!(UploadKind::Primary.accept(), ".glb");
        assert_eq!(UploadKind::Alternate.accept(), ".usdz");
    }
}
