use crate::engine::Annotator;
use crate::error::AnnotatorError;
use crate::surface::Surface;
use crate::types::{Interaction, TextLabel};

impl<S: Surface> Annotator<S> {
    /// Prompts for text and drops a new label at the configured anchor.
    /// Returns whether a label was added.
    pub fn add_text(&mut self) -> Result<bool, AnnotatorError> {
        let content = match self.dialogs.prompt("Enter text:") {
            Some(text) if !text.is_empty() => text,
            _ => return Ok(false),
        };
        let defaults = &self.config.label;
        let position = defaults.anchor.resolve(self.surface.width(), self.surface.height());
        self.composition.labels.push(TextLabel {
            content,
            position,
            color: defaults.color.clone(),
            font_size: defaults.font_size,
            font_family: defaults.font_family.clone(),
        });
        self.render()?;
        Ok(true)
    }

    pub fn rotate_left(&mut self) -> Result<(), AnnotatorError> {
        self.rotate_by(-self.config.rotation_step())
    }

    pub fn rotate_right(&mut self) -> Result<(), AnnotatorError> {
        self.rotate_by(self.config.rotation_step())
    }

    fn rotate_by(&mut self, delta: f64) -> Result<(), AnnotatorError> {
        self.composition.rotation += delta;
        self.page.show_rotation(&self.rotation_label());
        self.render()
    }

    /// Drops every stroke and label and turns the image upright again.
    pub fn reset(&mut self) -> Result<(), AnnotatorError> {
        self.composition.clear();
        self.interaction = Interaction::Idle;
        self.page.show_rotation(&self.rotation_label());
        log::info!("composition reset");
        self.render()
    }

    /// [`reset`](Self::reset) behind a confirmation when configured.
    /// Returns whether the reset happened.
    pub fn request_reset(&mut self) -> Result<bool, AnnotatorError> {
        if self.config.confirm_destructive && !self.dialogs.confirm("Reset all changes?") {
            return Ok(false);
        }
        self.reset()?;
        Ok(true)
    }

    /// Leaves the editor, discarding everything. Returns whether the page was left.
    pub fn cancel(&mut self) -> Result<bool, AnnotatorError> {
        if self.config.confirm_destructive && !self.dialogs.confirm("Discard all changes?") {
            return Ok(false);
        }
        self.page.leave(self.config.cancel_action)?;
        Ok(true)
    }
}
