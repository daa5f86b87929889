//! Page assembly and event wiring
//!
//! The page state lives in one `Rc<RefCell<Page>>` shared by every DOM event
//! closure. Each handler mutates the controller and then re-renders the whole
//! view from it, so the DOM never holds state of its own.

use std::cell::RefCell;
use std::rc::Rc;

use spatial_core::{
    AppConfig, ComponentSettings, OutboundLinks, PageController, SliderRange, SourceMode,
    UploadKind, ViewerPlan,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, UrlSearchParams};

use crate::error::{document, window, WebError};
use crate::loader::spawn_component_load;
use crate::object_url::BrowserObjectUrls;
use crate::viewer::ModelViewerAdapter;

struct Page {
    controller: PageController<BrowserObjectUrls>,
    view: PageView,
    adapter: ModelViewerAdapter,
    component: ComponentSettings,
    /// Upload generation the file inputs were last cleared for
    rendered_generation: u64,
}

/// Handles to every control the page renders into
struct PageView {
    presets: Vec<(String, HtmlElement)>,
    primary_url: HtmlInputElement,
    alternate_url: HtmlInputElement,
    load_url: HtmlElement,
    clear_url: HtmlElement,
    primary_file: HtmlInputElement,
    alternate_file: HtmlInputElement,
    remove_uploads: HtmlElement,
    ar_modes: HtmlInputElement,
    exposure: HtmlInputElement,
    exposure_label: Element,
    shadow: HtmlInputElement,
    shadow_label: Element,
    camera_controls: HtmlInputElement,
    auto_rotate: HtmlInputElement,
    stage: Element,
    open_asset: HtmlElement,
    open_in_ar: HtmlElement,
}

pub fn run(settings: AppConfig) -> Result<(), WebError> {
    let document = document()?;
    let root = match document.get_element_by_id("app") {
        Some(root) => root,
        None => Element::from(document.body().ok_or(WebError::MissingElement("body"))?),
    };

    let mut controller = PageController::new(BrowserObjectUrls, &settings);
    apply_query_params(&mut controller);

    let view = PageView::build(&document, &root, &controller)?;
    let adapter = ModelViewerAdapter::new(document.clone(), view.stage.clone());
    let page = Rc::new(RefCell::new(Page {
        rendered_generation: controller.upload_generation(),
        controller,
        view,
        adapter,
        component: settings.component.clone(),
    }));

    wire_events(&page)?;
    page.borrow_mut().render();

    spawn_component_load(settings.component.script_url.clone());
    tracing::info!("Page ready");
    Ok(())
}

/// `?src=<url>&ios-src=<url>` loads a custom URL pair on startup
fn apply_query_params(controller: &mut PageController<BrowserObjectUrls>) {
    let Ok(window) = window() else { return };
    let Ok(search) = window.location().search() else { return };
    let Ok(params) = UrlSearchParams::new_with_str(&search) else { return };

    if let Some(src) = params.get("src") {
        controller.set_custom_url(src, params.get("ios-src").unwrap_or_default());
        if controller.load_custom() {
            tracing::info!("Loaded model from URL parameter");
        }
    }
}

impl Page {
    fn render(&mut self) {
        let source = self.controller.current_source();
        let mode = self.controller.active_mode();
        let config = self.controller.config();
        let view = &self.view;

        for (label, button) in &view.presets {
            let active = mode == Some(SourceMode::Preset)
                && source.as_ref().is_some_and(|s| s.label() == label);
            button.set_class_name(if active { "sample-item active" } else { "sample-item" });
        }

        let staged = self.controller.staged_url();
        sync_value(&view.primary_url, &staged.primary);
        sync_value(&view.alternate_url, &staged.alternate);

        if self.rendered_generation != self.controller.upload_generation() {
            view.primary_file.set_value("");
            view.alternate_file.set_value("");
            self.rendered_generation = self.controller.upload_generation();
        }
        set_visible(&view.remove_uploads, self.controller.has_uploads());

        sync_value(&view.ar_modes, config.ar_modes());
        view.exposure.set_value_as_number(config.exposure());
        view.exposure_label
            .set_text_content(Some(format!("Exposure: {:.2}", config.exposure()).as_str()));
        view.shadow.set_value_as_number(config.shadow_intensity());
        view.shadow_label.set_text_content(Some(
            format!("Shadow Intensity: {:.2}", config.shadow_intensity()).as_str(),
        ));
        view.camera_controls.set_checked(config.camera_controls());
        view.auto_rotate.set_checked(config.auto_rotate());

        let plan = ViewerPlan::plan(source.as_ref(), config, &self.component);
        if let Err(e) = self.adapter.apply(&plan) {
            tracing::error!("Failed to update viewer: {}", e);
        }

        let links = OutboundLinks::for_source(source.as_ref());
        set_link(&view.open_asset, links.open_asset.as_deref());
        set_link(&view.open_in_ar, links.open_in_ar.as_deref());
    }
}

/// Only write when the text differs so the caret does not jump while typing
fn sync_value(input: &HtmlInputElement, value: &str) {
    if input.value() != value {
        input.set_value(value);
    }
}

fn set_visible(element: &HtmlElement, visible: bool) {
    let style = element.style();
    let result = if visible {
        style.remove_property("display").map(|_| ())
    } else {
        style.set_property("display", "none")
    };
    if let Err(e) = result {
        tracing::warn!("Failed to toggle visibility: {:?}", e);
    }
}

fn set_link(anchor: &HtmlElement, href: Option<&str>) {
    match href {
        Some(href) => {
            if let Err(e) = anchor.set_attribute("href", href) {
                tracing::warn!("Failed to set link: {:?}", e);
            }
            set_visible(anchor, true);
        }
        None => {
            anchor.remove_attribute("href").ok();
            set_visible(anchor, false);
        }
    }
}

// ============================================================================
// Event wiring
// ============================================================================

/// Run `handler` against the page on `event`, then re-render
fn on(
    target: &HtmlElement,
    event: &str,
    page: &Rc<RefCell<Page>>,
    handler: impl Fn(&mut Page) + 'static,
) -> Result<(), WebError> {
    let page = page.clone();
    let closure = Closure::wrap(Box::new(move |_event: web_sys::Event| {
        let mut page = page.borrow_mut();
        handler(&mut page);
        page.render();
    }) as Box<dyn FnMut(_)>);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn wire_events(page: &Rc<RefCell<Page>>) -> Result<(), WebError> {
    let borrowed = page.borrow();
    let view = &borrowed.view;

    for (label, button) in &view.presets {
        let label = label.clone();
        on(button, "click", page, move |p| {
            p.controller.select_preset_by_label(&label);
        })?;
    }

    on(&view.primary_url, "input", page, |p| {
        p.controller.set_custom_primary(p.view.primary_url.value());
    })?;
    on(&view.alternate_url, "input", page, |p| {
        p.controller.set_custom_alternate(p.view.alternate_url.value());
    })?;
    on(&view.load_url, "click", page, |p| {
        if !p.controller.load_custom() {
            tracing::debug!("Ignoring empty URL");
        }
    })?;
    on(&view.clear_url, "click", page, |p| p.controller.clear_custom_url())?;

    on(&view.primary_file, "change", page, |p| {
        upload(p, UploadKind::Primary)
    })?;
    on(&view.alternate_file, "change", page, |p| {
        upload(p, UploadKind::Alternate)
    })?;
    on(&view.remove_uploads, "click", page, |p| {
        let released = p.controller.reset_uploads();
        tracing::info!(released, "Removed uploads");
    })?;

    on(&view.ar_modes, "input", page, |p| {
        p.controller.set_ar_modes(p.view.ar_modes.value());
    })?;
    on(&view.exposure, "input", page, |p| {
        p.controller.set_exposure(p.view.exposure.value_as_number());
    })?;
    on(&view.shadow, "input", page, |p| {
        p.controller.set_shadow_intensity(p.view.shadow.value_as_number());
    })?;
    on(&view.camera_controls, "change", page, |p| {
        p.controller.set_camera_controls(p.view.camera_controls.checked());
    })?;
    on(&view.auto_rotate, "change", page, |p| {
        p.controller.set_auto_rotate(p.view.auto_rotate.checked());
    })?;

    // Teardown sweep: release every object URL when the page goes away.
    // Re-render so a page restored from the back/forward cache shows no revoked handle.
    let teardown_page = page.clone();
    let closure = Closure::wrap(Box::new(move |_event: web_sys::Event| {
        if let Ok(mut page) = teardown_page.try_borrow_mut() {
            if page.controller.teardown() > 0 {
                page.render();
            }
        }
    }) as Box<dyn FnMut(_)>);
    window()?.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref())?;
    closure.forget();

    Ok(())
}

fn upload(page: &mut Page, kind: UploadKind) {
    let input = match kind {
        UploadKind::Primary => &page.view.primary_file,
        UploadKind::Alternate => &page.view.alternate_file,
    };
    let file = input.files().and_then(|files| files.get(0));
    if let Err(e) = page.controller.upload_file(kind, file.as_ref()) {
        tracing::error!("{}", e);
    }
}

// ============================================================================
// DOM construction
// ============================================================================

fn element(document: &Document, tag: &str, class: &str) -> Result<Element, WebError> {
    let element = document.create_element(tag)?;
    if !class.is_empty() {
        element.set_class_name(class);
    }
    Ok(element)
}

fn text(document: &Document, tag: &str, content: &str) -> Result<Element, WebError> {
    let element = document.create_element(tag)?;
    element.set_text_content(Some(content));
    Ok(element)
}

fn html_element(document: &Document, tag: &str, class: &str) -> Result<HtmlElement, WebError> {
    element(document, tag, class)?
        .dyn_into::<HtmlElement>()
        .map_err(|_| WebError::Dom(format!("<{}> is not an HtmlElement", tag)))
}

fn button(document: &Document, content: &str, class: &str) -> Result<HtmlElement, WebError> {
    let button = html_element(document, "button", class)?;
    button.set_attribute("type", "button")?;
    button.set_text_content(Some(content));
    Ok(button)
}

fn input(document: &Document, kind: &str) -> Result<HtmlInputElement, WebError> {
    let input = document
        .create_element("input")?
        .dyn_into::<HtmlInputElement>()
        .map_err(|_| WebError::Dom("failed to cast to HtmlInputElement".to_string()))?;
    input.set_type(kind);
    Ok(input)
}

/// `<label>` with a caption followed by the control
fn labeled(document: &Document, caption: &str, control: &Element) -> Result<Element, WebError> {
    let label = document.create_element("label")?;
    label.set_text_content(Some(caption));
    label.append_child(control)?;
    Ok(label)
}

fn slider(document: &Document, range: SliderRange) -> Result<HtmlInputElement, WebError> {
    let slider = input(document, "range")?;
    slider.set_min(&range.min.to_string());
    slider.set_max(&range.max.to_string());
    slider.set_step(&range.step.to_string());
    Ok(slider)
}

fn checkbox_row(document: &Document, id: &str, caption: &str) -> Result<(Element, HtmlInputElement), WebError> {
    let row = element(document, "div", "checkbox-row")?;
    let checkbox = input(document, "checkbox")?;
    checkbox.set_id(id);
    let label = text(document, "label", caption)?;
    label.set_attribute("for", id)?;
    row.append_child(&checkbox)?;
    row.append_child(&label)?;
    Ok((row, checkbox))
}

impl PageView {
    fn build(
        document: &Document,
        root: &Element,
        controller: &PageController<BrowserObjectUrls>,
    ) -> Result<Self, WebError> {
        let container = element(document, "div", "container")?;
        root.append_child(&container)?;

        let badges = element(document, "div", "badges")?;
        for badge in ["AR Ready", "GLB + USDZ", "WebXR"] {
            let span = text(document, "span", badge)?;
            span.set_class_name("badge");
            badges.append_child(&span)?;
        }
        container.append_child(&badges)?;
        container.append_child(&text(document, "h1", "Spatial Viewer for GLB & USDZ")?.into())?;
        container.append_child(&text(
            document,
            "p",
            "Load 3D assets via presets, direct URLs, or local uploads and preview them \
             instantly in the browser or launch full augmented reality on supported devices.",
        )?.into())?;

        let grid = element(document, "div", "grid")?;
        container.append_child(&grid)?;
        let controls_panel = element(document, "div", "panel")?;
        let preview_panel = element(document, "div", "panel")?;
        grid.append_child(&controls_panel)?;
        grid.append_child(&preview_panel)?;

        // Load a Model
        let load_card = element(document, "section", "card")?;
        controls_panel.append_child(&load_card)?;
        load_card.append_child(&text(document, "h2", "Load a Model")?.into())?;

        let samples = element(document, "div", "samples")?;
        load_card.append_child(&samples)?;
        let mut presets = Vec::new();
        for preset in controller.catalog() {
            let item = button(document, "", "sample-item")?;
            let thumb = text(
                document,
                "span",
                &preset.label().chars().next().map(String::from).unwrap_or_default(),
            )?;
            thumb.set_class_name("sample-thumb");
            item.append_child(&thumb)?;
            item.append_child(&text(document, "span", preset.label())?.into())?;
            samples.append_child(&item)?;
            presets.push((preset.label().to_string(), item));
        }

        let url_card = element(document, "div", "card")?;
        load_card.append_child(&url_card)?;
        let primary_url = input(document, "url")?;
        primary_url.set_placeholder("https://example.com/model.glb");
        url_card.append_child(&labeled(document, "Remote GLB / USDZ URL", &primary_url)?.into())?;
        let alternate_url = input(document, "url")?;
        alternate_url.set_placeholder("https://example.com/model.usdz");
        url_card.append_child(&labeled(document, "Optional iOS USDZ URL", &alternate_url)?.into())?;
        let url_actions = element(document, "div", "url-actions")?;
        let load_url = button(document, "Load from URL", "")?;
        let clear_url = button(document, "Clear URL", "secondary")?;
        url_actions.append_child(&load_url)?;
        url_actions.append_child(&clear_url)?;
        url_card.append_child(&url_actions)?;

        let upload_card = element(document, "div", "card")?;
        load_card.append_child(&upload_card)?;
        let primary_file = input(document, "file")?;
        primary_file.set_accept(UploadKind::Primary.accept());
        upload_card.append_child(&labeled(document, UploadKind::Primary.label(), &primary_file)?.into())?;
        let alternate_file = input(document, "file")?;
        alternate_file.set_accept(UploadKind::Alternate.accept());
        upload_card.append_child(&labeled(document, UploadKind::Alternate.label(), &alternate_file)?.into())?;
        let remove_uploads = button(document, "Remove uploads", "secondary")?;
        upload_card.append_child(&remove_uploads)?;

        // Viewer Controls
        let settings_card = element(document, "section", "card")?;
        controls_panel.append_child(&settings_card)?;
        settings_card.append_child(&text(document, "h2", "Viewer Controls")?.into())?;
        let settings_grid = element(document, "div", "settings-grid")?;
        settings_card.append_child(&settings_grid)?;

        let ar_modes = input(document, "text")?;
        settings_grid.append_child(&labeled(document, "AR Modes", &ar_modes)?.into())?;

        let exposure = slider(document, SliderRange::EXPOSURE)?;
        let exposure_label = document.create_element("label")?;
        let exposure_caption = document.create_element("span")?;
        exposure_label.append_child(&exposure_caption)?;
        exposure_label.append_child(&exposure)?;
        settings_grid.append_child(&exposure_label)?;

        let shadow = slider(document, SliderRange::SHADOW_INTENSITY)?;
        let shadow_label = document.create_element("label")?;
        let shadow_caption = document.create_element("span")?;
        shadow_label.append_child(&shadow_caption)?;
        shadow_label.append_child(&shadow)?;
        settings_grid.append_child(&shadow_label)?;

        let (camera_row, camera_controls) =
            checkbox_row(document, "camera-controls", "Enable camera orbit controls")?;
        settings_card.append_child(&camera_row)?;
        let (rotate_row, auto_rotate) = checkbox_row(document, "auto-rotate", "Auto rotate model")?;
        settings_card.append_child(&rotate_row)?;

        // Live Preview
        let preview_card = element(document, "section", "card")?;
        preview_panel.append_child(&preview_card)?;
        preview_card.append_child(&text(document, "h2", "Live Preview")?.into())?;
        let stage = element(document, "div", "model-stage")?;
        preview_card.append_child(&stage)?;

        let link_row = element(document, "div", "url-actions")?;
        preview_card.append_child(&link_row)?;
        let open_asset = html_element(document, "a", "button secondary")?;
        open_asset.set_text_content(Some("Open GLB"));
        open_asset.set_attribute("target", "_blank")?;
        open_asset.set_attribute("rel", "noreferrer")?;
        let open_in_ar = html_element(document, "a", "button")?;
        open_in_ar.set_text_content(Some("Open in AR"));
        open_in_ar.set_attribute("rel", "noreferrer")?;
        link_row.append_child(&open_asset)?;
        link_row.append_child(&open_in_ar)?;

        let tips_card = element(document, "section", "card")?;
        preview_panel.append_child(&tips_card)?;
        tips_card.append_child(&text(document, "h2", "Tips")?.into())?;
        let tips = document.create_element("ul")?;
        for tip in [
            "Use Safari on iOS to launch Quick Look with USDZ files.",
            "On Android, WebXR Scene Viewer opens when using the AR button in the preview.",
            "Provide both GLB and USDZ for best cross-platform AR support.",
            "Adjust exposure and shadows to match your scene lighting conditions.",
        ] {
            tips.append_child(&text(document, "li", tip)?.into())?;
        }
        tips_card.append_child(&tips)?;

        let footer = document.create_element("footer")?;
        footer.append_child(&text(document, "span", "Powered by <model-viewer> and Rust/WebAssembly")?.into())?;
        let docs = text(document, "a", "Docs \u{2197}")?;
        docs.set_attribute("href", "https://github.com/google/model-viewer")?;
        docs.set_attribute("target", "_blank")?;
        docs.set_attribute("rel", "noreferrer")?;
        footer.append_child(&docs)?;
        container.append_child(&footer)?;

        Ok(Self {
            presets,
            primary_url,
            alternate_url,
            load_url,
            clear_url,
            primary_file,
            alternate_file,
            remove_uploads,
            ar_modes,
            exposure,
            exposure_label: exposure_caption,
            shadow,
            shadow_label: shadow_caption,
            camera_controls,
            auto_rotate,
            stage,
            open_asset,
            open_in_ar,
        })
    }
}
