use kurbo::Point;
use crate::error::AnnotatorError;
use crate::types::StrokeStyle;

/// A 2D drawing context the annotator renders into.
///
/// Modeled on the canvas 2D API: path building is stateful (`begin_path`,
/// `move_to`, `line_to`, `stroke`) and `save`/`restore` bracket transforms.
/// The browser binding wraps a `CanvasRenderingContext2d`; tests record calls.
pub trait Surface {
    /// Handle to a decoded raster the surface can blit.
    type Image;

    fn width(&self) -> f64;
    fn height(&self) -> f64;
    fn resize(&mut self, width: u32, height: u32);

    fn clear(&mut self);
    fn save(&mut self);
    fn restore(&mut self);
    fn rotate_about(&mut self, angle: f64, center: Point) -> Result<(), AnnotatorError>;

    /// Draws `image` stretched over the whole surface.
    fn draw_image(&mut self, image: &Self::Image) -> Result<(), AnnotatorError>;

    fn begin_path(&mut self);
    fn move_to(&mut self, p: Point);
    fn line_to(&mut self, p: Point);
    fn stroke(&mut self, style: &StrokeStyle);

    fn fill_text(&mut self, text: &str, font: &str, color: &str, at: Point) -> Result<(), AnnotatorError>;
    fn measure_text(&mut self, text: &str, font: &str) -> Result<f64, AnnotatorError>;

    /// Serializes the current pixels as a `data:image/png;base64,` URI.
    fn to_png_data_url(&self) -> Result<String, AnnotatorError>;

    fn center(&self) -> Point {
        Point::new(self.width() / 2.0, self.height() / 2.0)
    }
}
