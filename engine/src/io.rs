use base64::{Engine as _, engine::general_purpose};
use image::ImageFormat;
use crate::engine::Annotator;
use crate::error::AnnotatorError;
use crate::surface::Surface;

const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// What the save button produced.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportedImage {
    pub filename: String,
    pub data_url: String,
    pub width: u32,
    pub height: u32,
}

/// `{base}/file/{id}/data`, plus `?share=` for shared documents.
pub fn image_url(api_base: &str, file_id: &str, share: Option<&str>) -> String {
    let base = api_base.trim_end_matches('/');
    match share {
        Some(share) if !share.is_empty() => format!("{}/file/{}/data?share={}", base, file_id, share),
        _ => format!("{}/file/{}/data", base, file_id),
    }
}

pub fn export_filename(file_id: &str, fallback: &str) -> String {
    let stem = if file_id.is_empty() { fallback } else { file_id };
    format!("edited-{}.png", stem)
}

/// Base64 length of the PNG signature plus the IHDR length, type, width and height.
const PNG_HEADER_BASE64_LEN: usize = 32;

/// Reads the pixel size from a PNG data URL, decoding only the header.
pub fn png_data_url_dimensions(data_url: &str) -> Result<(u32, u32), AnnotatorError> {
    let payload = data_url
        .strip_prefix(PNG_DATA_URL_PREFIX)
        .ok_or_else(|| AnnotatorError::Export("surface did not produce a PNG data URL".to_string()))?;
    let head = payload
        .get(..PNG_HEADER_BASE64_LEN)
        .ok_or_else(|| AnnotatorError::Export("PNG payload is truncated".to_string()))?;
    let bytes = general_purpose::STANDARD
        .decode(head)
        .map_err(|e| AnnotatorError::Export(format!("bad base64 payload: {}", e)))?;
    if image::guess_format(&bytes).ok() != Some(ImageFormat::Png) || &bytes[12..16] != b"IHDR" {
        return Err(AnnotatorError::Export("payload is not a PNG".to_string()));
    }
    let width = u32::from_be_bytes([bytes[16], bytes[17], bytes[18], bytes[19]]);
    let height = u32::from_be_bytes([bytes[20], bytes[21], bytes[22], bytes[23]]);
    Ok((width, height))
}

impl<S: Surface> Annotator<S> {
    pub fn export_filename(&self) -> String {
        export_filename(&self.file_id, &self.config.download_fallback_name)
    }

    /// Saves the last rendered frame as a PNG download.
    pub fn export(&mut self) -> Result<ExportedImage, AnnotatorError> {
        let data_url = self.surface.to_png_data_url()?;
        let (width, height) = png_data_url_dimensions(&data_url)?;
        let filename = self.export_filename();
        self.page.download(&filename, &data_url)?;
        log::info!("exported {} ({}x{})", filename, width, height);
        Ok(ExportedImage { filename, data_url, width, height })
    }
}
