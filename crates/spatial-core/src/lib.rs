//! Spatial Core - Source resolution and viewer state for Spatial Viewer
//!
//! This crate holds everything the page does that is not DOM plumbing:
//! - Preset catalog and application settings loaded from TOML
//! - The page controller that resolves the current source by precedence
//! - Object-URL lifecycle for uploaded files
//! - The attribute plan handed to the embedded `<model-viewer>`

pub mod config;
pub mod controller;
pub mod settings;
pub mod source;
pub mod uploads;
pub mod viewer;

pub use config::{SliderRange, ViewerConfig};
pub use controller::{CustomUrl, PageController, SourceMode};
pub use settings::{AppConfig, ComponentSettings, ConfigError};
pub use source::Source;
pub use uploads::{FileBuffers, ObjectUrlFactory, ObjectUrlRegistry, UploadError, UploadKind};
pub use viewer::{Attribute, LiveProperties, ModelProps, OutboundLinks, ViewerPlan};
