use crate::config::CancelAction;
use crate::error::AnnotatorError;

/// Modal dialogs. Implementations may block until the user answers.
pub trait DialogService {
    /// `None` when the user cancels.
    fn prompt(&mut self, message: &str) -> Option<String>;
    fn alert(&mut self, message: &str);
    fn confirm(&mut self, message: &str) -> bool;
}

/// Page-level effects outside the drawing surface.
pub trait PageService {
    fn download(&mut self, filename: &str, data_url: &str) -> Result<(), AnnotatorError>;
    fn leave(&mut self, action: CancelAction) -> Result<(), AnnotatorError>;
    fn show_rotation(&mut self, label: &str);
}
