//! Render plan for the embedded `<model-viewer>` component
//!
//! The component is treated as an external capability with a fixed set of
//! recognised attributes. [`ViewerPlan::plan`] turns the current source and
//! configuration into the exact attribute set the browser adapter applies.
//! Exposure and shadow intensity are additionally pushed as live properties
//! after every render because the component reads them dynamically.

use crate::config::{SliderRange, ViewerConfig};
use crate::settings::ComponentSettings;
use crate::source::Source;

/// Text shown in the stage when nothing is loaded
pub const PLACEHOLDER_TEXT: &str = "Load a GLB or USDZ file to preview it here.";

/// Attributes of `<model-viewer>` this page manages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Src,
    IosSrc,
    Ar,
    ArModes,
    CameraControls,
    AutoRotate,
    Alt,
    RotationPerSecond,
    InteractionPromptThreshold,
    Poster,
    Exposure,
    ShadowIntensity,
}

impl Attribute {
    pub const ALL: [Attribute; 12] = [
        Attribute::Src,
        Attribute::IosSrc,
        Attribute::Ar,
        Attribute::ArModes,
        Attribute::CameraControls,
        Attribute::AutoRotate,
        Attribute::Alt,
        Attribute::RotationPerSecond,
        Attribute::InteractionPromptThreshold,
        Attribute::Poster,
        Attribute::Exposure,
        Attribute::ShadowIntensity,
    ];

    /// HTML attribute name
    pub fn name(&self) -> &'static str {
        match self {
            Attribute::Src => "src",
            Attribute::IosSrc => "ios-src",
            Attribute::Ar => "ar",
            Attribute::ArModes => "ar-modes",
            Attribute::CameraControls => "camera-controls",
            Attribute::AutoRotate => "auto-rotate",
            Attribute::Alt => "alt",
            Attribute::RotationPerSecond => "rotation-per-second",
            Attribute::InteractionPromptThreshold => "interaction-prompt-threshold",
            Attribute::Poster => "poster",
            Attribute::Exposure => "exposure",
            Attribute::ShadowIntensity => "shadow-intensity",
        }
    }
}

/// Values assigned as JS properties after the element renders
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiveProperties {
    pub exposure: f64,
    pub shadow_intensity: f64,
}

impl LiveProperties {
    /// JS property names, in the order the values are applied
    pub const EXPOSURE: &'static str = "exposure";
    pub const SHADOW_INTENSITY: &'static str = "shadowIntensity";
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelProps {
    /// The element is rebuilt whenever this changes
    pub key: String,
    pub attributes: Vec<(Attribute, String)>,
    pub live: LiveProperties,
}

impl ModelProps {
    pub fn get(&self, attribute: Attribute) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(a, _)| *a == attribute)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewerPlan {
    Placeholder,
    Model(ModelProps),
}

impl ViewerPlan {
    pub fn plan(source: Option<&Source>, config: &ViewerConfig, component: &ComponentSettings) -> Self {
        let Some(source) = source else {
            return ViewerPlan::Placeholder;
        };

        let exposure = SliderRange::EXPOSURE.clamp(config.exposure()).unwrap_or(1.0);
        let shadow_intensity = SliderRange::SHADOW_INTENSITY
            .clamp(config.shadow_intensity())
            .unwrap_or(1.0);

        let mut attributes = vec![
            (Attribute::Ar, String::new()),
            (Attribute::ArModes, config.ar_mode_tokens().join(" ")),
            (Attribute::Src, source.url().to_string()),
            (Attribute::IosSrc, source.ios_url_or_url().to_string()),
            (Attribute::Alt, format!("{} model", source.label())),
        ];
        if config.camera_controls() {
            attributes.push((Attribute::CameraControls, String::new()));
        }
        if config.auto_rotate() {
            attributes.push((Attribute::AutoRotate, String::new()));
        }
        attributes.push((Attribute::RotationPerSecond, component.rotation_per_second.clone()));
        attributes.push((
            Attribute::InteractionPromptThreshold,
            component.interaction_prompt_threshold.to_string(),
        ));
        if let Some(poster) = &component.poster {
            attributes.push((Attribute::Poster, poster.clone()));
        }
        attributes.push((Attribute::Exposure, exposure.to_string()));
        attributes.push((Attribute::ShadowIntensity, shadow_intensity.to_string()));

        ViewerPlan::Model(ModelProps {
            key: source.url().to_string(),
            attributes,
            live: LiveProperties {
                exposure,
                shadow_intensity,
            },
        })
    }
}

/// "Open GLB" and "Open in AR" anchors below the preview
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutboundLinks {
    pub open_asset: Option<String>,
    pub open_in_ar: Option<String>,
}

impl OutboundLinks {
    pub fn for_source(source: Option<&Source>) -> Self {
        match source {
            Some(source) => Self {
                open_asset: Some(source.url().to_string()),
                open_in_ar: Some(source.ios_url_or_url().to_string()),
            },
            None => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn astronaut() -> Source {
        Source::new("Astronaut", "A.glb").with_ios_url("A.usdz")
    }

    fn model(plan: ViewerPlan) -> ModelProps {
        match plan {
            ViewerPlan::Model(props) => props,
            ViewerPlan::Placeholder => panic!("expected a model plan"),
        }
    }

    #[test]
    fn test_no_source_is_placeholder() {
        let plan = ViewerPlan::plan(None, &ViewerConfig::default(), &ComponentSettings::default());
        assert_eq!(plan, ViewerPlan::Placeholder);
    }

    #[test]
    fn test_model_attributes() {
        let props = model(ViewerPlan::plan(
            Some(&astronaut()),
            &ViewerConfig::default(),
            &ComponentSettings::default(),
        ));
        assert_eq!(props.key, "A.glb");
        assert_eq!(props.get(Attribute::Src), Some("A.glb"));
        assert_eq!(props.get(Attribute::IosSrc), Some("A.usdz"));
        assert_eq!(props.get(Attribute::Ar), Some(""));
        assert_eq!(props.get(Attribute::ArModes), Some("webxr scene-viewer quick-look"));
        assert_eq!(props.get(Attribute::Alt), Some("Astronaut model"));
        assert_eq!(props.get(Attribute::CameraControls), Some(""));
        assert_eq!(props.get(Attribute::AutoRotate), Some(""));
        assert_eq!(props.get(Attribute::RotationPerSecond), Some("180deg"));
        assert_eq!(props.get(Attribute::InteractionPromptThreshold), Some("2500"));
        assert_eq!(props.get(Attribute::Exposure), Some("1"));
        assert_eq!(props.get(Attribute::ShadowIntensity), Some("1"));
        assert_eq!(props.get(Attribute::Poster), None);
    }

    #[test]
    fn test_disabled_flags_are_absent() {
        let mut config = ViewerConfig::default();
        config.set_camera_controls(false);
        config.set_auto_rotate(false);
        let props = model(ViewerPlan::plan(
            Some(&astronaut()),
            &config,
            &ComponentSettings::default(),
        ));
        assert_eq!(props.get(Attribute::CameraControls), None);
        assert_eq!(props.get(Attribute::AutoRotate), None);
    }

    #[test]
    fn test_ios_src_falls_back_to_src() {
        let props = model(ViewerPlan::plan(
            Some(&Source::new("Chair", "C.glb")),
            &ViewerConfig::default(),
            &ComponentSettings::default(),
        ));
        assert_eq!(props.get(Attribute::IosSrc), Some("C.glb"));
    }

    #[test]
    fn test_poster_and_live_properties() {
        let mut config = ViewerConfig::default();
        config.set_exposure(1.75);
        config.set_shadow_intensity(0.25);
        let component = ComponentSettings {
            poster: Some("poster.webp".to_string()),
            ..ComponentSettings::default()
        };
        let props = model(ViewerPlan::plan(Some(&astronaut()), &config, &component));
        assert_eq!(props.get(Attribute::Poster), Some("poster.webp"));
        assert_eq!(props.get(Attribute::Exposure), Some("1.75"));
        assert_eq!(
            props.live,
            LiveProperties {
                exposure: 1.75,
                shadow_intensity: 0.25
            }
        );
    }

    #[test]
    fn test_key_follows_primary_locator() {
        let config = ViewerConfig::default();
        let component = ComponentSettings::default();
        let a = model(ViewerPlan::plan(Some(&astronaut()), &config, &component));
        let b = model(ViewerPlan::plan(
            Some(&Source::new("Astronaut", "A.glb").with_ios_url("other.usdz")),
            &config,
            &component,
        ));
        let c = model(ViewerPlan::plan(Some(&Source::new("Chair", "C.glb")), &config, &component));
        assert_eq!(a.key, b.key);
        assert_ne!(a.key, c.key);
    }

    #[test]
    fn test_only_recognised_attributes() {
        let props = model(ViewerPlan::plan(
            Some(&astronaut()),
            &ViewerConfig::default(),
            &ComponentSettings::default(),
        ));
        for (attribute, _) in &props.attributes {
            assert!(Attribute::ALL.contains(attribute));
        }
    }

    #[test]
    fn test_links() {
        assert_eq!(OutboundLinks::for_source(None), OutboundLinks::default());
        let links = OutboundLinks::for_source(Some(&Source::new("Chair", "C.glb")));
        assert_eq!(links.open_asset.as_deref(), Some("C.glb"));
        assert_eq!(links.open_in_ar.as_deref(), Some("C.glb"));
        let links = OutboundLinks::for_source(Some(&astronaut()));
        assert_eq!(links.open_in_ar.as_deref(), Some("A.usdz"));
    }
}
