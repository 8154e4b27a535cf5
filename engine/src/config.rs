use serde::{Serialize, Deserialize};
use kurbo::Point;
use crate::error::AnnotatorError;
use crate::types::StrokeStyle;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum CancelAction {
    Back,
    Close,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LabelAnchor {
    Center,
    Fixed { x: f64, y: f64 },
}

impl LabelAnchor {
    pub fn resolve(&self, width: f64, height: f64) -> Point {
        match *self {
            LabelAnchor::Center => Point::new(width / 2.0, height / 2.0),
            LabelAnchor::Fixed { x, y } => Point::new(x, y),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct LabelDefaults {
    pub color: String,
    pub font_size: f64,
    pub font_family: String,
    pub anchor: LabelAnchor,
}

impl Default for LabelDefaults {
    fn default() -> Self {
        LabelDefaults {
            color: "red".to_string(),
            font_size: 30.0,
            font_family: "Arial".to_string(),
            anchor: LabelAnchor::Center,
        }
    }
}

/// Ids of the host page elements the annotator binds to.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ElementIds {
    pub canvas: String,
    pub add_text: String,
    pub save: String,
    pub cancel: String,
    pub reset: String,
    pub rotate_left: String,
    pub rotate_right: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        ElementIds {
            canvas: "canvas".to_string(),
            add_text: "add-text-button".to_string(),
            save: "save-button".to_string(),
            cancel: "cancel-button".to_string(),
            reset: "reset-button".to_string(),
            rotate_left: "rotate-left-button".to_string(),
            rotate_right: "rotate-right-button".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct AnnotatorConfig {
    pub api_base: String,
    pub rotation_step_degrees: f64,
    // Pointer editing is ignored while the composition is turned.
    pub lock_editing_when_rotated: bool,
    pub confirm_destructive: bool,
    pub cancel_action: CancelAction,
    pub label: LabelDefaults,
    pub stroke: StrokeStyle,
    pub elements: ElementIds,
    pub rotation_controls: bool,
    pub download_fallback_name: String,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        AnnotatorConfig {
            api_base: "../../../api".to_string(),
            rotation_step_degrees: 15.0,
            lock_editing_when_rotated: true,
            confirm_destructive: true,
            cancel_action: CancelAction::Back,
            label: LabelDefaults::default(),
            stroke: StrokeStyle::default(),
            elements: ElementIds::default(),
            rotation_controls: true,
            download_fallback_name: "image".to_string(),
        }
    }
}

impl AnnotatorConfig {
    /// Parses a (possibly partial) JSON config; missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, AnnotatorError> {
        if json.trim().is_empty() {
            return Ok(AnnotatorConfig::default());
        }
        Ok(serde_json::from_str(json)?)
    }

    pub fn rotation_step(&self) -> f64 {
        self.rotation_step_degrees.to_radians()
    }
}
