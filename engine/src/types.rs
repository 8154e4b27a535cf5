use serde::{Serialize, Deserialize};
use kurbo::{Point, Vec2};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct StrokeStyle {
    pub color: String,
    pub width: f64,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        StrokeStyle { color: "black".to_string(), width: 2.0 }
    }
}

/// A finalized freehand line. Points live in the unrotated frame.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct Stroke {
    pub points: Vec<Point>,
}

impl Stroke {
    pub fn new(points: Vec<Point>) -> Self {
        Stroke { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TextLabel {
    pub content: String,
    pub position: Point, // baseline-left anchor
    pub color: String,
    pub font_size: f64,
    pub font_family: String,
}

impl TextLabel {
    /// CSS font shorthand, e.g. `30px Arial`.
    pub fn font(&self) -> String {
        format!("{}px {}", self.font_size, self.font_family)
    }

    /// Box test against `[x, x + width] x [y - font_size, y]`.
    pub fn contains(&self, p: Point, text_width: f64) -> bool {
        let left = self.position.x;
        let top = self.position.y - self.font_size;
        p.x >= left && p.x <= left + text_width && p.y >= top && p.y <= self.position.y
    }
}

/// Everything the user has added on top of the base image.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Composition {
    pub strokes: Vec<Stroke>,
    pub labels: Vec<TextLabel>, // z-order: last is topmost
    pub rotation: f64,          // radians, unbounded
}

impl Composition {
    pub fn clear(&mut self) {
        self.strokes.clear();
        self.labels.clear();
        self.rotation = 0.0;
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Interaction {
    Idle,
    DraggingLabel { offset: Vec2 },
    DrawingStroke { points: Vec<Point> },
}

impl Default for Interaction {
    fn default() -> Self {
        Interaction::Idle
    }
}

impl Interaction {
    pub fn name(&self) -> &'static str {
        match self {
            Interaction::Idle => "idle",
            Interaction::DraggingLabel { .. } => "dragging-label",
            Interaction::DrawingStroke { .. } => "drawing-stroke",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(x: f64, y: f64) -> TextLabel {
        TextLabel {
            content: "Hi".to_string(),
            position: Point::new(x, y),
            color: "red".to_string(),
            font_size: 30.0,
            font_family: "Arial".to_string(),
        }
    }

    #[test]
    fn font_shorthand() {
        assert_eq!(label(0.0, 0.0).font(), "30px Arial");
    }

    #[test]
    fn contains_uses_baseline_box() {
        let l = label(50.0, 50.0);
        assert!(l.contains(Point::new(50.0, 50.0), 40.0));
        assert!(l.contains(Point::new(90.0, 20.0), 40.0));
        assert!(!l.contains(Point::new(91.0, 30.0), 40.0));
        assert!(!l.contains(Point::new(60.0, 51.0), 40.0));
        assert!(!l.contains(Point::new(60.0, 19.0), 40.0));
    }

    #[test]
    fn interaction_names() {
        assert_eq!(Interaction::default().name(), "idle");
        assert_eq!(Interaction::DraggingLabel { offset: Vec2::ZERO }.name(), "dragging-label");
        assert_eq!(Interaction::DrawingStroke { points: Vec::new() }.name(), "drawing-stroke");
    }

    #[test]
    fn clear_zeroes_rotation() {
        let mut c = Composition {
            strokes: vec![Stroke::new(vec![Point::ZERO])],
            labels: vec![label(1.0, 1.0)],
            rotation: 3.0,
        };
        c.clear();
        assert_eq!(c, Composition::default());
    }
}
