use std::cell::RefCell;
use std::rc::Rc;
use kurbo::Point;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, Element, HtmlAnchorElement, HtmlCanvasElement, HtmlImageElement, MouseEvent, UrlSearchParams, Window};
use crate::config::{AnnotatorConfig, CancelAction, ElementIds};
use crate::engine::Annotator;
use crate::error::{describe_js, AnnotatorError};
use crate::io::image_url;
use crate::services::{DialogService, PageService};
use crate::surface::Surface;
use crate::types::StrokeStyle;

type SharedAnnotator = Rc<RefCell<Annotator<CanvasSurface>>>;

const ROTATION_DISPLAY_STYLE: &str = "position: fixed; right: 10px; bottom: 10px; \
    background-color: rgba(0,0,0,0.7); color: white; padding: 5px 10px; \
    border-radius: 3px; font-family: Arial, sans-serif;";

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, AnnotatorError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(AnnotatorError::surface)?
            .ok_or_else(|| AnnotatorError::Surface("2d context unavailable".to_string()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| AnnotatorError::Surface("2d context has unexpected type".to_string()))?;
        Ok(CanvasSurface { canvas, ctx })
    }
}

impl Surface for CanvasSurface {
    type Image = HtmlImageElement;

    fn width(&self) -> f64 { self.canvas.width() as f64 }
    fn height(&self) -> f64 { self.canvas.height() as f64 }

    fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn clear(&mut self) {
        self.ctx.clear_rect(0.0, 0.0, self.width(), self.height());
    }

    fn save(&mut self) { self.ctx.save(); }
    fn restore(&mut self) { self.ctx.restore(); }

    fn rotate_about(&mut self, angle: f64, center: Point) -> Result<(), AnnotatorError> {
        self.ctx.translate(center.x, center.y).map_err(AnnotatorError::surface)?;
        self.ctx.rotate(angle).map_err(AnnotatorError::surface)?;
        self.ctx.translate(-center.x, -center.y).map_err(AnnotatorError::surface)
    }

    fn draw_image(&mut self, image: &HtmlImageElement) -> Result<(), AnnotatorError> {
        self.ctx
            .draw_image_with_html_image_element_and_dw_and_dh(image, 0.0, 0.0, self.width(), self.height())
            .map_err(AnnotatorError::surface)
    }

    fn begin_path(&mut self) { self.ctx.begin_path(); }
    fn move_to(&mut self, p: Point) { self.ctx.move_to(p.x, p.y); }
    fn line_to(&mut self, p: Point) { self.ctx.line_to(p.x, p.y); }

    fn stroke(&mut self, style: &StrokeStyle) {
        self.ctx.set_stroke_style_str(&style.color);
        self.ctx.set_line_width(style.width);
        self.ctx.stroke();
    }

    fn fill_text(&mut self, text: &str, font: &str, color: &str, at: Point) -> Result<(), AnnotatorError> {
        self.ctx.set_font(font);
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_text(text, at.x, at.y).map_err(AnnotatorError::surface)
    }

    fn measure_text(&mut self, text: &str, font: &str) -> Result<f64, AnnotatorError> {
        self.ctx.set_font(font);
        let metrics = self.ctx.measure_text(text).map_err(AnnotatorError::surface)?;
        Ok(metrics.width())
    }

    fn to_png_data_url(&self) -> Result<String, AnnotatorError> {
        // Throws if the base image came from another origin without CORS.
        self.canvas
            .to_data_url_with_type("image/png")
            .map_err(|e| AnnotatorError::Export(describe_js(&e)))
    }
}

pub struct BrowserDialogs {
    window: Window,
}

impl DialogService for BrowserDialogs {
    fn prompt(&mut self, message: &str) -> Option<String> {
        self.window.prompt_with_message(message).unwrap_or_else(|e| {
            log::warn!("prompt failed: {}", describe_js(&e));
            None
        })
    }

    fn alert(&mut self, message: &str) {
        if let Err(e) = self.window.alert_with_message(message) {
            log::warn!("alert failed: {}", describe_js(&e));
        }
    }

    fn confirm(&mut self, message: &str) -> bool {
        self.window.confirm_with_message(message).unwrap_or(false)
    }
}

pub struct BrowserPage {
    window: Window,
    document: Document,
    rotation_display: Option<Element>,
}

impl BrowserPage {
    fn new(window: Window, document: Document, with_rotation_display: bool) -> Result<Self, AnnotatorError> {
        let rotation_display = if with_rotation_display {
            let div = document.create_element("div").map_err(AnnotatorError::surface)?;
            div.set_attribute("style", ROTATION_DISPLAY_STYLE).map_err(AnnotatorError::surface)?;
            let body = document
                .body()
                .ok_or_else(|| AnnotatorError::MissingElement("body".to_string()))?;
            body.append_child(&div).map_err(AnnotatorError::surface)?;
            Some(div)
        } else {
            None
        };
        Ok(BrowserPage { window, document, rotation_display })
    }
}

impl PageService for BrowserPage {
    fn download(&mut self, filename: &str, data_url: &str) -> Result<(), AnnotatorError> {
        let link = self
            .document
            .create_element("a")
            .map_err(AnnotatorError::surface)?
            .dyn_into::<HtmlAnchorElement>()
            .map_err(|_| AnnotatorError::Export("could not create download link".to_string()))?;
        link.set_href(data_url);
        link.set_download(filename);

        let body = self
            .document
            .body()
            .ok_or_else(|| AnnotatorError::MissingElement("body".to_string()))?;
        body.append_child(&link).map_err(AnnotatorError::surface)?;
        link.click();
        body.remove_child(&link).map_err(AnnotatorError::surface)?;
        Ok(())
    }

    fn leave(&mut self, action: CancelAction) -> Result<(), AnnotatorError> {
        match action {
            CancelAction::Back => self
                .window
                .history()
                .and_then(|history| history.back())
                .map_err(AnnotatorError::surface),
            CancelAction::Close => self.window.close().map_err(AnnotatorError::surface),
        }
    }

    fn show_rotation(&mut self, label: &str) {
        if let Some(display) = &self.rotation_display {
            display.set_text_content(Some(label));
        }
    }
}

/// JS-facing handle returned by [`mount`]. Keeps the editor alive.
#[wasm_bindgen]
pub struct AnnotatorHandle {
    inner: SharedAnnotator,
}

#[wasm_bindgen]
impl AnnotatorHandle {
    pub fn state_json(&self) -> String {
        self.inner.borrow().get_composition_json()
    }

    pub fn composition(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(self.inner.borrow().composition())?)
    }

    pub fn rotation_label(&self) -> String {
        self.inner.borrow().rotation_label()
    }

    pub fn is_not_rotated(&self) -> bool {
        self.inner.borrow().is_not_rotated()
    }

    pub fn rotate_left(&self) -> Result<(), JsValue> {
        Ok(self.inner.borrow_mut().rotate_left()?)
    }

    pub fn rotate_right(&self) -> Result<(), JsValue> {
        Ok(self.inner.borrow_mut().rotate_right()?)
    }

    pub fn reset(&self) -> Result<(), JsValue> {
        Ok(self.inner.borrow_mut().reset()?)
    }

    /// Triggers the download and returns the file name used.
    pub fn export(&self) -> Result<String, JsValue> {
        Ok(self.inner.borrow_mut().export()?.filename)
    }
}

/// Binds the annotator to the current page. `config_json` may be partial.
#[wasm_bindgen]
pub fn mount(config_json: Option<String>) -> Result<AnnotatorHandle, JsValue> {
    console_error_panic_hook::set_once();
    // A second mount on the same page keeps the first logger.
    let _ = console_log::init_with_level(log::Level::Info);

    mount_page(config_json.as_deref().unwrap_or_default()).map_err(|e| {
        log::error!("annotator setup aborted: {}", e);
        JsValue::from(e)
    })
}

fn mount_page(config_json: &str) -> Result<AnnotatorHandle, AnnotatorError> {
    let config = AnnotatorConfig::from_json(config_json)?;
    let window = web_sys::window().ok_or_else(|| AnnotatorError::Surface("no global window".to_string()))?;
    let document = window
        .document()
        .ok_or_else(|| AnnotatorError::Surface("window has no document".to_string()))?;

    let search = window.location().search().map_err(AnnotatorError::surface)?;
    let params = UrlSearchParams::new_with_str(&search).map_err(AnnotatorError::surface)?;
    let file_id = params
        .get("fileId")
        .filter(|id| !id.trim().is_empty())
        .ok_or(AnnotatorError::MissingFileId)?;
    let share = params.get("share");

    // Resolve every element before touching the page.
    let elements = resolve_elements(&config.elements, config.rotation_controls, |id| {
        document.get_element_by_id(id)
    })?;
    let canvas = elements
        .canvas
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| AnnotatorError::MissingElement(config.elements.canvas.clone()))?;

    let encoded_id = String::from(js_sys::encode_uri_component(&file_id));
    let encoded_share = share.as_deref().map(|s| String::from(js_sys::encode_uri_component(s)));
    let url = image_url(&config.api_base, &encoded_id, encoded_share.as_deref());

    let surface = CanvasSurface::new(canvas.clone())?;
    let dialogs = Box::new(BrowserDialogs { window: window.clone() });
    let page = Box::new(BrowserPage::new(window, document, config.rotation_controls)?);
    let annotator = Annotator::new(Some(file_id), surface, dialogs, page, config)?;
    let inner: SharedAnnotator = Rc::new(RefCell::new(annotator));

    bind_pointer(&canvas, &inner)?;
    on_click(&elements.add_text, &inner, "add text", |a| a.add_text().map(|_| ()))?;
    on_click(&elements.save, &inner, "save", |a| a.export().map(|_| ()))?;
    on_click(&elements.cancel, &inner, "cancel", |a| a.cancel().map(|_| ()))?;
    on_click(&elements.reset, &inner, "reset", |a| a.request_reset().map(|_| ()))?;
    if let Some((left, right)) = &elements.rotate {
        on_click(left, &inner, "rotate left", |a| a.rotate_left())?;
        on_click(right, &inner, "rotate right", |a| a.rotate_right())?;
    }

    load_image(&inner, &url)?;
    Ok(AnnotatorHandle { inner })
}

/// Host page controls, looked up by id.
pub struct PageElements<T> {
    pub canvas: T,
    pub add_text: T,
    pub save: T,
    pub cancel: T,
    pub reset: T,
    pub rotate: Option<(T, T)>,
}

/// Looks up every control in order and stops at the first missing one.
pub fn resolve_elements<T>(
    ids: &ElementIds,
    rotation_controls: bool,
    mut lookup: impl FnMut(&str) -> Option<T>,
) -> Result<PageElements<T>, AnnotatorError> {
    let mut required = |id: &str| lookup(id).ok_or_else(|| AnnotatorError::MissingElement(id.to_string()));
    let canvas = required(&ids.canvas)?;
    let add_text = required(&ids.add_text)?;
    let save = required(&ids.save)?;
    let cancel = required(&ids.cancel)?;
    let reset = required(&ids.reset)?;
    let rotate = if rotation_controls {
        Some((required(&ids.rotate_left)?, required(&ids.rotate_right)?))
    } else {
        None
    };
    Ok(PageElements { canvas, add_text, save, cancel, reset, rotate })
}

fn load_image(inner: &SharedAnnotator, url: &str) -> Result<(), AnnotatorError> {
    let img = HtmlImageElement::new().map_err(AnnotatorError::surface)?;
    img.set_cross_origin(Some("anonymous"));
    log::info!("loading image from {}", url);

    {
        let inner = Rc::clone(inner);
        let loaded = img.clone();
        let onload = Closure::wrap(Box::new(move || {
            let Ok(mut annotator) = inner.try_borrow_mut() else {
                log::warn!("image load dropped, annotator busy");
                return;
            };
            let (width, height) = (loaded.natural_width(), loaded.natural_height());
            if let Err(e) = annotator.on_image_loaded(loaded.clone(), width, height) {
                log::error!("first render failed: {}", e);
            }
        }) as Box<dyn FnMut()>);
        img.set_onload(Some(onload.as_ref().unchecked_ref()));
        onload.forget();
    }
    {
        let inner = Rc::clone(inner);
        let source = url.to_string();
        let onerror = Closure::wrap(Box::new(move || {
            match inner.try_borrow_mut() {
                Ok(mut annotator) => annotator.on_image_failed(&source),
                Err(_) => log::warn!("image error for {} dropped, annotator busy", source),
            }
        }) as Box<dyn FnMut()>);
        img.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        onerror.forget();
    }

    img.set_src(url);
    Ok(())
}

fn pointer_position(canvas: &HtmlCanvasElement, event: &MouseEvent) -> Point {
    let rect = canvas.get_bounding_client_rect();
    // The canvas has the image's natural size but may be laid out smaller.
    let scale_x = if rect.width() > 0.0 { canvas.width() as f64 / rect.width() } else { 1.0 };
    let scale_y = if rect.height() > 0.0 { canvas.height() as f64 / rect.height() } else { 1.0 };
    Point::new(
        (event.client_x() as f64 - rect.left()) * scale_x,
        (event.client_y() as f64 - rect.top()) * scale_y,
    )
}

fn bind_pointer(canvas: &HtmlCanvasElement, inner: &SharedAnnotator) -> Result<(), AnnotatorError> {
    {
        let target = canvas.clone();
        add_mouse_listener(canvas, inner, "mousedown", move |a, event| {
            a.pointer_down(pointer_position(&target, &event))
        })?;
    }
    {
        let target = canvas.clone();
        add_mouse_listener(canvas, inner, "mousemove", move |a, event| {
            a.pointer_move(pointer_position(&target, &event))
        })?;
    }
    add_mouse_listener(canvas, inner, "mouseup", |a, _| {
        a.pointer_up();
        Ok(())
    })?;
    add_mouse_listener(canvas, inner, "mouseout", |a, _| {
        a.pointer_leave();
        Ok(())
    })
}

fn add_mouse_listener<F>(canvas: &HtmlCanvasElement, inner: &SharedAnnotator, event_type: &'static str, mut handler: F) -> Result<(), AnnotatorError>
where
    F: 'static + FnMut(&mut Annotator<CanvasSurface>, MouseEvent) -> Result<(), AnnotatorError>,
{
    let inner = Rc::clone(inner);
    let closure = Closure::wrap(Box::new(move |event: MouseEvent| {
        let Ok(mut annotator) = inner.try_borrow_mut() else {
            log::warn!("{} dropped, annotator busy", event_type);
            return;
        };
        if let Err(e) = handler(&mut annotator, event) {
            log::error!("{} failed: {}", event_type, e);
        }
    }) as Box<dyn FnMut(_)>);
    canvas
        .add_event_listener_with_callback(event_type, closure.as_ref().unchecked_ref())
        .map_err(AnnotatorError::surface)?;
    closure.forget();
    Ok(())
}

fn on_click<F>(element: &Element, inner: &SharedAnnotator, action: &'static str, handler: F) -> Result<(), AnnotatorError>
where
    F: 'static + Fn(&mut Annotator<CanvasSurface>) -> Result<(), AnnotatorError>,
{
    let inner = Rc::clone(inner);
    let closure = Closure::wrap(Box::new(move |_event: web_sys::Event| {
        let Ok(mut annotator) = inner.try_borrow_mut() else {
            log::warn!("{} dropped, annotator busy", action);
            return;
        };
        if let Err(e) = handler(&mut annotator) {
            log::error!("{} failed: {}", action, e);
        }
    }) as Box<dyn FnMut(_)>);
    element
        .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
        .map_err(AnnotatorError::surface)?;
    closure.forget();
    Ok(())
}
