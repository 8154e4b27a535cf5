use kurbo::Point;
use crate::engine::Annotator;
use crate::error::AnnotatorError;
use crate::surface::Surface;
use crate::transform;
use crate::types::{Interaction, Stroke};

impl<S: Surface> Annotator<S> {
    /// Index of the topmost label under `p` (unrotated frame).
    pub fn label_at(&mut self, p: Point) -> Result<Option<usize>, AnnotatorError> {
        for i in (0..self.composition.labels.len()).rev() {
            let label = &self.composition.labels[i];
            let width = self.surface.measure_text(&label.content, &label.font())?;
            if label.contains(p, width) {
                return Ok(Some(i));
            }
        }
        Ok(None)
    }

    /// Maps a surface-space pointer position into the unrotated frame.
    pub fn to_canvas_point(&self, p: Point) -> Point {
        transform::to_unrotated(p, self.composition.rotation, self.surface.center())
    }

    pub fn pointer_down(&mut self, p: Point) -> Result<(), AnnotatorError> {
        if !self.editing_allowed() {
            log::debug!("pointer down ignored while rotated");
            return Ok(());
        }
        let p = self.to_canvas_point(p);

        if let Some(index) = self.label_at(p)? {
            // The dragged label stays on top for the whole drag.
            let label = self.composition.labels.remove(index);
            let offset = p - label.position;
            self.composition.labels.push(label);
            self.interaction = Interaction::DraggingLabel { offset };
            log::debug!("{} (label {})", self.interaction.name(), index);
            return self.render();
        }

        self.interaction = Interaction::DrawingStroke { points: vec![p] };
        log::debug!("{}", self.interaction.name());
        Ok(())
    }

    pub fn pointer_move(&mut self, p: Point) -> Result<(), AnnotatorError> {
        if !self.editing_allowed() {
            return Ok(());
        }
        let p = self.to_canvas_point(p);

        match &mut self.interaction {
            Interaction::Idle => Ok(()),
            Interaction::DraggingLabel { offset } => {
                let offset = *offset;
                if let Some(label) = self.composition.labels.last_mut() {
                    label.position = p - offset;
                }
                self.render()
            }
            Interaction::DrawingStroke { points } => {
                let last = points.last().copied();
                points.push(p);
                match last {
                    Some(from) => self.render_segment(from, p),
                    None => Ok(()),
                }
            }
        }
    }

    pub fn pointer_up(&mut self) {
        self.end_interaction();
    }

    pub fn pointer_leave(&mut self) {
        self.end_interaction();
    }

    fn end_interaction(&mut self) {
        let previous = std::mem::take(&mut self.interaction);
        if !matches!(previous, Interaction::Idle) {
            log::debug!("{} -> {}", previous.name(), self.interaction.name());
        }
        match previous {
            Interaction::DrawingStroke { points } if !points.is_empty() => {
                log::debug!("stroke finalized with {} points", points.len());
                self.composition.strokes.push(Stroke::new(points));
            }
            _ => {}
        }
    }
}
