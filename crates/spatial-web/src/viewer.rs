//! Imperative side of the viewer: applies a [`ViewerPlan`] to the DOM

use spatial_core::viewer::PLACEHOLDER_TEXT;
use spatial_core::{Attribute, ModelProps, ViewerPlan};
use wasm_bindgen::JsValue;
use web_sys::{Document, Element};

use crate::error::WebError;

/// Owns the preview stage and the `<model-viewer>` element inside it
pub struct ModelViewerAdapter {
    document: Document,
    stage: Element,
    /// Key of the element currently mounted, with the element itself
    mounted: Option<(String, Element)>,
}

impl ModelViewerAdapter {
    pub fn new(document: Document, stage: Element) -> Self {
        Self {
            document,
            stage,
            mounted: None,
        }
    }

    pub fn apply(&mut self, plan: &ViewerPlan) -> Result<(), WebError> {
        match plan {
            ViewerPlan::Placeholder => self.show_placeholder(),
            ViewerPlan::Model(props) => self.show_model(props),
        }
    }

    fn show_placeholder(&mut self) -> Result<(), WebError> {
        if self.mounted.take().is_none() && self.stage.child_element_count() > 0 {
            return Ok(());
        }
        let placeholder = self.document.create_element("div")?;
        placeholder.set_class_name("placeholder");
        placeholder.set_text_content(Some(PLACEHOLDER_TEXT));
        self.replace_stage(&placeholder)
    }

    fn show_model(&mut self, props: &ModelProps) -> Result<(), WebError> {
        let current = self
            .mounted
            .as_ref()
            .filter(|(key, _)| *key == props.key)
            .map(|(_, element)| element.clone());
        let element = match current {
            Some(element) => element,
            None => {
                // New primary locator: start from a fresh element so no asset state carries over
                let element = self.create_element()?;
                self.replace_stage(&element)?;
                tracing::debug!(key = %props.key, "Mounted viewer");
                self.mounted = Some((props.key.clone(), element.clone()));
                element
            }
        };

        for attribute in Attribute::ALL {
            match props.get(attribute) {
                Some(value) => element.set_attribute(attribute.name(), value)?,
                None => element.remove_attribute(attribute.name())?,
            }
        }

        set_property(&element, spatial_core::LiveProperties::EXPOSURE, props.live.exposure)?;
        set_property(
            &element,
            spatial_core::LiveProperties::SHADOW_INTENSITY,
            props.live.shadow_intensity,
        )?;
        Ok(())
    }

    fn replace_stage(&self, node: &Element) -> Result<(), WebError> {
        self.stage.set_inner_html("");
        self.stage.append_child(node)?;
        Ok(())
    }

    fn create_element(&self) -> Result<Element, WebError> {
        let element = self.document.create_element("model-viewer")?;
        element.set_attribute("style", "width: 100%; height: 100%")?;

        let progress = self.document.create_element("div")?;
        progress.set_attribute("slot", "progress-bar")?;
        progress.set_class_name("progress");
        let bar = self.document.create_element("div")?;
        bar.set_class_name("progress-bar");
        progress.append_child(&bar)?;
        element.append_child(&progress)?;
        Ok(element)
    }
}

fn set_property(element: &Element, name: &str, value: f64) -> Result<(), WebError> {
    js_sys::Reflect::set(element, &JsValue::from_str(name), &JsValue::from_f64(value))?;
    Ok(())
}
