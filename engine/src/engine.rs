use crate::config::AnnotatorConfig;
use crate::error::AnnotatorError;
use crate::services::{DialogService, PageService};
use crate::surface::Surface;
use crate::transform;
use crate::types::{Composition, Interaction};

/// Canvas editor for a single image: freehand strokes, draggable text labels
/// and a global rotation, flattened to PNG on export.
///
/// The host owns the event loop and forwards pointer events, button
/// activations and the image load result to the matching methods.
pub struct Annotator<S: Surface> {
    pub(crate) surface: S,
    pub(crate) config: AnnotatorConfig,
    pub(crate) file_id: String,
    pub(crate) image: Option<S::Image>,
    pub(crate) composition: Composition,
    pub(crate) interaction: Interaction,
    pub(crate) dialogs: Box<dyn DialogService>,
    pub(crate) page: Box<dyn PageService>,
}

impl<S: Surface> Annotator<S> {
    pub fn new(
        file_id: Option<String>,
        surface: S,
        dialogs: Box<dyn DialogService>,
        page: Box<dyn PageService>,
        config: AnnotatorConfig,
    ) -> Result<Self, AnnotatorError> {
        let file_id = match file_id {
            Some(id) if !id.trim().is_empty() => id,
            _ => {
                log::error!("fileId is not defined");
                return Err(AnnotatorError::MissingFileId);
            }
        };
        log::info!("annotator created for file {}", file_id);

        Ok(Annotator {
            surface,
            config,
            file_id,
            image: None,
            composition: Composition::default(),
            interaction: Interaction::Idle,
            dialogs,
            page,
        })
    }

    /// Called once the base image has decoded. Sizes the surface to the
    /// image's natural dimensions and draws the first frame.
    pub fn on_image_loaded(&mut self, image: S::Image, width: u32, height: u32) -> Result<(), AnnotatorError> {
        log::info!("image {} loaded ({}x{})", self.file_id, width, height);
        self.surface.resize(width, height);
        self.image = Some(image);
        self.page.show_rotation(&self.rotation_label());
        self.render()
    }

    /// Editing continues on a blank surface after this.
    pub fn on_image_failed(&mut self, reason: &str) {
        let err = AnnotatorError::ImageLoad(reason.to_string());
        log::warn!("{}", err);
        self.dialogs.alert("Image load failed");
    }

    pub fn file_id(&self) -> &str {
        &self.file_id
    }

    pub fn config(&self) -> &AnnotatorConfig {
        &self.config
    }

    pub fn composition(&self) -> &Composition {
        &self.composition
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    pub fn rotation(&self) -> f64 {
        self.composition.rotation
    }

    pub fn rotation_label(&self) -> String {
        transform::rotation_label(self.composition.rotation)
    }

    pub fn is_not_rotated(&self) -> bool {
        transform::is_upright(self.composition.rotation)
    }

    pub(crate) fn editing_allowed(&self) -> bool {
        !self.config.lock_editing_when_rotated || self.is_not_rotated()
    }

    pub fn get_composition_json(&self) -> String {
        serde_json::to_string(&self.composition).unwrap_or_else(|_| "{}".to_string())
    }
}
