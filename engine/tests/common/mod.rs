#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::Cursor;
use std::rc::Rc;

use annotator_engine::config::CancelAction;
use annotator_engine::{Annotator, AnnotatorConfig, AnnotatorError, DialogService, PageService, StrokeStyle, Surface};
use base64::{engine::general_purpose, Engine as _};
use image::{DynamicImage, ImageOutputFormat, RgbaImage};
use kurbo::Point;

pub const CHAR_WIDTH: f64 = 15.0;

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Clear,
    Save,
    Restore,
    Rotate(f64),
    DrawImage(String),
    BeginPath,
    MoveTo(Point),
    LineTo(Point),
    Stroke,
    FillText { text: String, at: Point },
}

/// Surface that records calls instead of drawing. Text is `CHAR_WIDTH` per char.
pub struct RecordingSurface {
    pub width: u32,
    pub height: u32,
    pub ops: Vec<Op>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        RecordingSurface { width: 300, height: 150, ops: Vec::new() }
    }

    /// Ops since the last full clear.
    pub fn frame(&self) -> &[Op] {
        let start = self.ops.iter().rposition(|op| *op == Op::Clear).unwrap_or(0);
        &self.ops[start..]
    }

    pub fn texts(&self) -> Vec<String> {
        self.frame()
            .iter()
            .filter_map(|op| match op {
                Op::FillText { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    type Image = String;

    fn width(&self) -> f64 { self.width as f64 }
    fn height(&self) -> f64 { self.height as f64 }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    fn clear(&mut self) { self.ops.push(Op::Clear); }
    fn save(&mut self) { self.ops.push(Op::Save); }
    fn restore(&mut self) { self.ops.push(Op::Restore); }

    fn rotate_about(&mut self, angle: f64, _center: Point) -> Result<(), AnnotatorError> {
        self.ops.push(Op::Rotate(angle));
        Ok(())
    }

    fn draw_image(&mut self, image: &String) -> Result<(), AnnotatorError> {
        self.ops.push(Op::DrawImage(image.clone()));
        Ok(())
    }

    fn begin_path(&mut self) { self.ops.push(Op::BeginPath); }
    fn move_to(&mut self, p: Point) { self.ops.push(Op::MoveTo(p)); }
    fn line_to(&mut self, p: Point) { self.ops.push(Op::LineTo(p)); }
    fn stroke(&mut self, _style: &StrokeStyle) { self.ops.push(Op::Stroke); }

    fn fill_text(&mut self, text: &str, _font: &str, _color: &str, at: Point) -> Result<(), AnnotatorError> {
        self.ops.push(Op::FillText { text: text.to_string(), at });
        Ok(())
    }

    fn measure_text(&mut self, text: &str, _font: &str) -> Result<f64, AnnotatorError> {
        Ok(text.chars().count() as f64 * CHAR_WIDTH)
    }

    fn to_png_data_url(&self) -> Result<String, AnnotatorError> {
        let mut bytes: Vec<u8> = Vec::new();
        DynamicImage::ImageRgba8(RgbaImage::new(self.width, self.height))
            .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
            .map_err(|e| AnnotatorError::Export(e.to_string()))?;
        Ok(format!("data:image/png;base64,{}", general_purpose::STANDARD.encode(&bytes)))
    }
}

#[derive(Default)]
pub struct DialogLog {
    pub prompts: VecDeque<Option<String>>,
    pub confirms: VecDeque<bool>,
    pub alerts: Vec<String>,
    pub asked: Vec<String>,
}

#[derive(Clone, Default)]
pub struct FakeDialogs(pub Rc<RefCell<DialogLog>>);

impl FakeDialogs {
    pub fn answer_prompt(&self, answer: Option<&str>) {
        self.0.borrow_mut().prompts.push_back(answer.map(str::to_string));
    }

    pub fn answer_confirm(&self, answer: bool) {
        self.0.borrow_mut().confirms.push_back(answer);
    }

    pub fn alerts(&self) -> Vec<String> {
        self.0.borrow().alerts.clone()
    }
}

impl DialogService for FakeDialogs {
    fn prompt(&mut self, message: &str) -> Option<String> {
        let mut log = self.0.borrow_mut();
        log.asked.push(message.to_string());
        log.prompts.pop_front().flatten()
    }

    fn alert(&mut self, message: &str) {
        self.0.borrow_mut().alerts.push(message.to_string());
    }

    fn confirm(&mut self, message: &str) -> bool {
        let mut log = self.0.borrow_mut();
        log.asked.push(message.to_string());
        log.confirms.pop_front().unwrap_or(false)
    }
}

#[derive(Default)]
pub struct PageLog {
    pub downloads: Vec<(String, String)>,
    pub left: Vec<CancelAction>,
    pub rotation: Option<String>,
}

#[derive(Clone, Default)]
pub struct FakePage(pub Rc<RefCell<PageLog>>);

impl PageService for FakePage {
    fn download(&mut self, filename: &str, data_url: &str) -> Result<(), AnnotatorError> {
        self.0.borrow_mut().downloads.push((filename.to_string(), data_url.to_string()));
        Ok(())
    }

    fn leave(&mut self, action: CancelAction) -> Result<(), AnnotatorError> {
        self.0.borrow_mut().left.push(action);
        Ok(())
    }

    fn show_rotation(&mut self, label: &str) {
        self.0.borrow_mut().rotation = Some(label.to_string());
    }
}

pub struct Harness {
    pub annotator: Annotator<RecordingSurface>,
    pub dialogs: FakeDialogs,
    pub page: FakePage,
}

pub fn harness_with(config: AnnotatorConfig) -> Harness {
    let dialogs = FakeDialogs::default();
    let page = FakePage::default();
    let annotator = Annotator::new(
        Some("42".to_string()),
        RecordingSurface::new(),
        Box::new(dialogs.clone()),
        Box::new(page.clone()),
        config,
    )
    .expect("annotator");
    Harness { annotator, dialogs, page }
}

/// File "42" with a loaded `width` x `height` image.
pub fn loaded(width: u32, height: u32) -> Harness {
    loaded_with(AnnotatorConfig::default(), width, height)
}

pub fn loaded_with(config: AnnotatorConfig, width: u32, height: u32) -> Harness {
    let mut h = harness_with(config);
    h.annotator.on_image_loaded("base".to_string(), width, height).unwrap();
    h
}

impl Harness {
    pub fn add_label(&mut self, text: &str) {
        self.dialogs.answer_prompt(Some(text));
        assert!(self.annotator.add_text().unwrap());
    }

    pub fn draw(&mut self, points: &[(f64, f64)]) {
        let (first, rest) = points.split_first().expect("at least one point");
        self.annotator.pointer_down(Point::new(first.0, first.1)).unwrap();
        for &(x, y) in rest {
            self.annotator.pointer_move(Point::new(x, y)).unwrap();
        }
        self.annotator.pointer_up();
    }

    pub fn frame(&self) -> Vec<Op> {
        self.annotator.surface().frame().to_vec()
    }
}
