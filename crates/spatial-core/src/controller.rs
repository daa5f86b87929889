//! Page controller: all user-facing state and the current-source derivation
//!
//! Three input modes compete for the viewer: a preset from the catalog, a
//! committed custom URL pair, and local uploads. At most one of them is
//! authoritative at a time; committing one clears the others. The current
//! source is derived by precedence: uploads, then preset, then custom URL.

use crate::config::ViewerConfig;
use crate::settings::AppConfig;
use crate::source::{Source, CUSTOM_LABEL};
use crate::uploads::{FileBuffers, ObjectUrlFactory, ObjectUrlRegistry, UploadError, UploadKind};

/// Which input mode currently drives the viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceMode {
    Upload,
    Preset,
    Custom,
}

/// Primary/alternate URL pair as typed into the URL fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomUrl {
    pub primary: String,
    pub alternate: String,
}

impl CustomUrl {
    /// An empty alternate falls back to the primary locator
    fn to_source(&self) -> Source {
        let alternate = if self.alternate.is_empty() {
            &self.primary
        } else {
            &self.alternate
        };
        Source::new(CUSTOM_LABEL, self.primary.clone()).with_ios_url(alternate.clone())
    }
}

pub struct PageController<F: ObjectUrlFactory> {
    catalog: Vec<Source>,
    selected: Option<Source>,
    /// Text currently in the URL fields
    staged: CustomUrl,
    /// Pair committed by the last successful load
    committed: Option<CustomUrl>,
    uploads: FileBuffers,
    urls: ObjectUrlRegistry<F>,
    config: ViewerConfig,
    /// Bumped on every upload reset so the view knows to clear its file inputs
    upload_generation: u64,
}

impl<F: ObjectUrlFactory> PageController<F> {
    pub fn new(factory: F, settings: &AppConfig) -> Self {
        let mut controller = Self {
            catalog: settings.presets.clone(),
            selected: None,
            staged: CustomUrl::default(),
            committed: None,
            uploads: FileBuffers::default(),
            urls: ObjectUrlRegistry::new(factory),
            config: ViewerConfig::from(&settings.viewer),
            upload_generation: 0,
        };
        if let Some(initial) = settings.initial_preset() {
            controller.select_preset(initial);
        }
        controller
    }

    pub fn catalog(&self) -> &[Source] {
        &self.catalog
    }

    pub fn preset(&self, label: &str) -> Option<&Source> {
        self.catalog.iter().find(|p| p.label() == label)
    }

    /// Make a catalog entry the active source
    pub fn select_preset(&mut self, source: &Source) {
        tracing::debug!(source = %source, "Selected preset");
        self.selected = Some(source.clone());
        self.staged = CustomUrl::default();
        self.committed = None;
        // Handles stay in the registry; they are released on reset or teardown
        self.uploads.clear();
    }

    /// Returns `false` when the label is not in the catalog
    pub fn select_preset_by_label(&mut self, label: &str) -> bool {
        match self.preset(label).cloned() {
            Some(source) => {
                self.select_preset(&source);
                true
            }
            None => {
                tracing::warn!(label, "Unknown preset");
                false
            }
        }
    }

    /// Stage both URL fields at once
    pub fn set_custom_url(&mut self, primary: impl Into<String>, alternate: impl Into<String>) {
        self.staged.primary = primary.into();
        self.staged.alternate = alternate.into();
    }

    pub fn set_custom_primary(&mut self, primary: impl Into<String>) {
        self.staged.primary = primary.into();
    }

    pub fn set_custom_alternate(&mut self, alternate: impl Into<String>) {
        self.staged.alternate = alternate.into();
    }

    pub fn staged_url(&self) -> &CustomUrl {
        &self.staged
    }

    /// Commit the staged URL pair. An empty primary URL is ignored.
    pub fn load_custom(&mut self) -> bool {
        let primary = self.staged.primary.trim();
        if primary.is_empty() {
            return false;
        }
        let pair = CustomUrl {
            primary: primary.to_string(),
            alternate: self.staged.alternate.trim().to_string(),
        };
        tracing::debug!(url = %pair.primary, "Loaded custom URL");
        self.committed = Some(pair);
        self.selected = None;
        self.uploads.clear();
        true
    }

    /// Empty the URL fields and drop the preset selection
    pub fn clear_custom_url(&mut self) {
        self.staged = CustomUrl::default();
        self.committed = None;
        self.selected = None;
    }

    /// Register an uploaded file. `None` (empty selection) is a no-op.
    pub fn upload_file(&mut self, kind: UploadKind, file: Option<&F::File>) -> Result<(), UploadError> {
        let Some(file) = file else {
            return Ok(());
        };
        let url = self.urls.acquire(kind, file)?;
        self.uploads.set(kind, url);
        if kind == UploadKind::Primary && self.uploads.get(UploadKind::Alternate).is_none() {
            self.staged.alternate.clear();
        }
        self.selected = None;
        self.staged.primary.clear();
        self.committed = None;
        tracing::debug!(%kind, "Upload active");
        Ok(())
    }

    /// Revoke all tracked object URLs and forget the uploads
    pub fn reset_uploads(&mut self) -> usize {
        let released = self.urls.release_all();
        self.uploads.clear();
        self.upload_generation += 1;
        released
    }

    /// Release every handle still tracked; call when the page goes away.
    ///
    /// The uploads are forgotten too, so a page restored afterwards never
    /// points at a revoked handle.
    pub fn teardown(&mut self) -> usize {
        let released = self.reset_uploads();
        tracing::debug!(released, "Controller teardown");
        released
    }

    pub fn has_uploads(&self) -> bool {
        !self.uploads.is_empty()
    }

    pub fn uploads(&self) -> &FileBuffers {
        &self.uploads
    }

    pub fn upload_generation(&self) -> u64 {
        self.upload_generation
    }

    /// Object URLs minted and not yet revoked
    pub fn live_object_urls(&self) -> &[String] {
        self.urls.live()
    }

    pub fn active_mode(&self) -> Option<SourceMode> {
        if !self.uploads.is_empty() {
            Some(SourceMode::Upload)
        } else if self.selected.is_some() {
            Some(SourceMode::Preset)
        } else if self.committed.is_some() {
            Some(SourceMode::Custom)
        } else {
            None
        }
    }

    /// The source handed to the viewer, by precedence
    pub fn current_source(&self) -> Option<Source> {
        match self.active_mode()? {
            SourceMode::Upload => self.uploads.source(),
            SourceMode::Preset => self.selected.clone(),
            SourceMode::Custom => self.committed.as_ref().map(CustomUrl::to_source),
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn set_ar_modes(&mut self, ar_modes: impl Into<String>) {
        self.config.set_ar_modes(ar_modes);
    }

    pub fn set_camera_controls(&mut self, enabled: bool) {
        self.config.set_camera_controls(enabled);
    }

    pub fn set_auto_rotate(&mut self, enabled: bool) {
        self.config.set_auto_rotate(enabled);
    }

    pub fn set_exposure(&mut self, value: f64) -> f64 {
        self.config.set_exposure(value)
    }

    pub fn set_shadow_intensity(&mut self, value: f64) -> f64 {
        self.config.set_shadow_intensity(value)
    }
}
