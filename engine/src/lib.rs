pub mod types;
pub mod config;
pub mod error;
pub mod transform;
pub mod surface;
pub mod services;
pub mod engine;
pub mod selection;
pub mod render;
pub mod commands;
pub mod io;
pub mod web;

pub use engine::Annotator;
pub use config::AnnotatorConfig;
pub use error::AnnotatorError;
pub use io::ExportedImage;
pub use services::{DialogService, PageService};
pub use surface::Surface;
pub use types::*;
pub use web::{mount, AnnotatorHandle};
