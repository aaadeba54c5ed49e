/// Caption overlay drawing
use ab_glyph::{FontVec, PxScale};
use image::Rgba;
use imageproc::drawing::draw_text_mut;
use std::fs;
use std::path::Path;

use crate::capture::Frame;
use crate::error::RenderError;
use crate::fragment::TranslatedFragment;

/// Draws one translated caption onto a frame
pub trait OverlayRenderer {
    fn draw(&mut self, frame: &mut Frame, fragment: &TranslatedFragment);
}

impl<T: OverlayRenderer + ?Sized> OverlayRenderer for Box<T> {
    fn draw(&mut self, frame: &mut Frame, fragment: &TranslatedFragment) {
        (**self).draw(frame, fragment)
    }
}

/// Renders captions with a single TrueType font at a fixed scale and colour
///
/// The fragment's (x, y) is treated as the caption baseline, so the text
/// sits on top of the region it translates.
pub struct GlyphRenderer {
    font: FontVec,
    scale: PxScale,
    color: Rgba<u8>,
}

impl GlyphRenderer {
    pub fn new(font: FontVec, scale: f32, color: [u8; 4]) -> Self {
        Self {
            font,
            scale: PxScale::from(scale),
            color: Rgba(color),
        }
    }

    /// Load the caption font from disk
    pub fn from_file(path: impl AsRef<Path>, scale: f32, color: [u8; 4]) -> Result<Self, RenderError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| RenderError::FontLoadFailed {
            path: path.display().to_string(),
            source,
        })?;
        let font = FontVec::try_from_vec(bytes)
            .map_err(|_| RenderError::InvalidFont(path.display().to_string()))?;

        tracing::info!("✓ Caption font loaded from {}", path.display());
        Ok(Self::new(font, scale, color))
    }

    fn baseline_origin(&self, fragment: &TranslatedFragment) -> (i32, i32) {
        let x = fragment.bounds.x as i32;
        let y = fragment.bounds.y as i32 - self.scale.y.round() as i32;
        (x, y.max(0))
    }
}

impl OverlayRenderer for GlyphRenderer {
    fn draw(&mut self, frame: &mut Frame, fragment: &TranslatedFragment) {
        let (x, y) = self.baseline_origin(fragment);
        draw_text_mut(
            frame,
            self.color,
            x,
            y,
            self.scale,
            &self.font,
            &fragment.translated_text,
        );
    }
}
