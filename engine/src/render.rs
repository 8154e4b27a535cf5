use kurbo::Point;
use crate::engine::Annotator;
use crate::error::AnnotatorError;
use crate::surface::Surface;
use crate::types::{Interaction, StrokeStyle};

impl<S: Surface> Annotator<S> {
    /// Full redraw: base image, finalized strokes, the stroke in progress,
    /// then labels in z-order, all under the current rotation.
    pub fn render(&mut self) -> Result<(), AnnotatorError> {
        let center = self.surface.center();
        self.surface.clear();
        self.surface.save();

        let result = self.render_rotated(center);

        self.surface.restore();
        result
    }

    fn render_rotated(&mut self, center: Point) -> Result<(), AnnotatorError> {
        self.surface.rotate_about(self.composition.rotation, center)?;

        if let Some(image) = &self.image {
            self.surface.draw_image(image)?;
        }

        // All finalized strokes share one path.
        if !self.composition.strokes.is_empty() {
            self.surface.begin_path();
            for stroke in &self.composition.strokes {
                trace_polyline(&mut self.surface, &stroke.points);
            }
            self.surface.stroke(&self.config.stroke);
        }

        if let Interaction::DrawingStroke { points } = &self.interaction {
            if !points.is_empty() {
                self.surface.begin_path();
                trace_polyline(&mut self.surface, points);
                self.surface.stroke(&self.config.stroke);
            }
        }

        for label in &self.composition.labels {
            self.surface.fill_text(&label.content, &label.font(), &label.color, label.position)?;
        }
        Ok(())
    }

    /// Draws just the newest piece of the stroke in progress, without a redraw.
    pub(crate) fn render_segment(&mut self, from: Point, to: Point) -> Result<(), AnnotatorError> {
        let center = self.surface.center();
        self.surface.save();
        let result = self
            .surface
            .rotate_about(self.composition.rotation, center)
            .map(|_| draw_segment(&mut self.surface, from, to, &self.config.stroke));
        self.surface.restore();
        result
    }
}

fn trace_polyline<S: Surface>(surface: &mut S, points: &[Point]) {
    if let Some((first, rest)) = points.split_first() {
        surface.move_to(*first);
        for p in rest {
            surface.line_to(*p);
        }
    }
}

fn draw_segment<S: Surface>(surface: &mut S, from: Point, to: Point, style: &StrokeStyle) {
    surface.begin_path();
    surface.move_to(from);
    surface.line_to(to);
    surface.stroke(style);
}
