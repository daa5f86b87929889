//! Viewer display configuration
//!
//! These settings are independent of the loaded source and survive every
//! source change. Numeric values are clamped to the slider ranges before they
//! are stored, so anything handed to the embedded component is in range.

use crate::settings::ViewerDefaults;

/// Fixed range and step of a numeric slider
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl SliderRange {
    pub const EXPOSURE: SliderRange = SliderRange {
        min: 0.1,
        max: 2.5,
        step: 0.05,
    };

    pub const SHADOW_INTENSITY: SliderRange = SliderRange {
        min: 0.0,
        max: 2.0,
        step: 0.05,
    };

    /// Snap to the step grid anchored at `min`, then clamp into range.
    ///
    /// Returns `None` for NaN or infinite input.
    pub fn clamp(&self, value: f64) -> Option<f64> {
        if !value.is_finite() {
            return None;
        }
        let steps = ((value - self.min) / self.step).round();
        let snapped = self.min + steps * self.step;
        // Strip float noise so attribute strings stay short ("1", not "1.0000000000000002")
        let tidy = (snapped * 1e6).round() / 1e6;
        Some(tidy.clamp(self.min, self.max))
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Live display settings for the embedded viewer
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    ar_modes: String,
    camera_controls: bool,
    auto_rotate: bool,
    exposure: f64,
    shadow_intensity: f64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self::from(&ViewerDefaults::default())
    }
}

impl From<&ViewerDefaults> for ViewerConfig {
    fn from(defaults: &ViewerDefaults) -> Self {
        let exposure = SliderRange::EXPOSURE.clamp(defaults.exposure).unwrap_or(1.0);
        let shadow_intensity = SliderRange::SHADOW_INTENSITY
            .clamp(defaults.shadow_intensity)
            .unwrap_or(1.0);
        Self {
            ar_modes: defaults.ar_modes.clone(),
            camera_controls: defaults.camera_controls,
            auto_rotate: defaults.auto_rotate,
            exposure,
            shadow_intensity,
        }
    }
}

impl ViewerConfig {
    /// AR mode list as typed by the user
    pub fn ar_modes(&self) -> &str {
        &self.ar_modes
    }

    /// AR mode tokens with surrounding and repeated whitespace removed
    pub fn ar_mode_tokens(&self) -> Vec<&str> {
        self.ar_modes.split_whitespace().collect()
    }

    pub fn camera_controls(&self) -> bool {
        self.camera_controls
    }

    pub fn auto_rotate(&self) -> bool {
        self.auto_rotate
    }

    pub fn exposure(&self) -> f64 {
        self.exposure
    }

    pub fn shadow_intensity(&self) -> f64 {
        self.shadow_intensity
    }

    pub fn set_ar_modes(&mut self, ar_modes: impl Into<String>) {
        self.ar_modes = ar_modes.into();
    }

    pub fn set_camera_controls(&mut self, enabled: bool) {
        self.camera_controls = enabled;
    }

    pub fn set_auto_rotate(&mut self, enabled: bool) {
        self.auto_rotate = enabled;
    }

    /// Returns the stored value; non-finite input leaves it unchanged.
    pub fn set_exposure(&mut self, value: f64) -> f64 {
        if let Some(clamped) = SliderRange::EXPOSURE.clamp(value) {
            self.exposure = clamped;
        } else {
            tracing::warn!(value, "Ignoring non-finite exposure");
        }
        self.exposure
    }

    /// Returns the stored value; non-finite input leaves it unchanged.
    pub fn set_shadow_intensity(&mut self, value: f64) -> f64 {
        if let Some(clamped) = SliderRange::SHADOW_INTENSITY.clamp(value) {
            self.shadow_intensity = clamped;
        } else {
            tracing::warn!(value, "Ignoring non-finite shadow intensity");
        }
        self.shadow_intensity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_defaults() {
        let config = ViewerConfig::default();
        assert_eq!(config.ar_modes(), "webxr scene-viewer quick-look");
        assert!(config.camera_controls());
        assert!(config.auto_rotate());
        assert!(approx(config.exposure(), 1.0));
        assert!(approx(config.shadow_intensity(), 1.0));
    }

    #[test]
    fn test_exposure_clamped() {
        let mut config = ViewerConfig::default();
        assert!(approx(config.set_exposure(5.0), 2.5));
        assert!(approx(config.set_exposure(0.0), 0.1));
        assert!(approx(config.set_exposure(-3.0), 0.1));
        assert!(approx(config.set_exposure(1.35), 1.35));
    }

    #[test]
    fn test_shadow_intensity_clamped() {
        let mut config = ViewerConfig::default();
        assert!(approx(config.set_shadow_intensity(2.01), 2.0));
        assert!(approx(config.set_shadow_intensity(-0.5), 0.0));
        assert!(approx(config.set_shadow_intensity(0.7), 0.7));
    }

    #[test]
    fn test_values_snap_to_step() {
        let mut config = ViewerConfig::default();
        assert!(approx(config.set_exposure(1.01), 1.0));
        assert!(approx(config.set_exposure(1.04), 1.05));
        assert!(approx(config.set_shadow_intensity(0.124), 0.1));
    }

    #[test]
    fn test_snapped_values_print_cleanly() {
        let mut config = ViewerConfig::default();
        config.set_exposure(1.0);
        assert_eq!(config.exposure().to_string(), "1");
        config.set_exposure(0.95);
        assert_eq!(config.exposure().to_string(), "0.95");
    }

    #[test]
    fn test_non_finite_ignored() {
        let mut config = ViewerConfig::default();
        config.set_exposure(1.5);
        assert!(approx(config.set_exposure(f64::NAN), 1.5));
        assert!(approx(config.set_shadow_intensity(f64::INFINITY), 1.0));
    }

    #[test]
    fn test_ar_mode_tokens() {
        let mut config = ViewerConfig::default();
        config.set_ar_modes("  webxr   quick-look ");
        assert_eq!(config.ar_modes(), "  webxr   quick-look ");
        assert_eq!(config.ar_mode_tokens(), vec!["webxr", "quick-look"]);
    }

    #[test]
    fn test_range_contains_clamped_output() {
        for raw in [-10.0, 0.0, 0.03, 0.1, 1.234, 2.49, 2.5, 99.0] {
            let exposure = SliderRange::EXPOSURE.clamp(raw).unwrap();
            assert!(SliderRange::EXPOSURE.contains(exposure));
            let shadow = SliderRange::SHADOW_INTENSITY.clamp(raw).unwrap();
            assert!(SliderRange::SHADOW_INTENSITY.contains(shadow));
        }
    }
}
