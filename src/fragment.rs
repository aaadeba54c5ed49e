/// Fragment types shared by the extractor, orchestrator and renderer.
use crate::error::FragmentError;

/// Pixel rectangle of a detected text region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Check that the box lies inside a `frame_width` x `frame_height` frame
    pub fn check_within(&self, frame_width: u32, frame_height: u32) -> Result<(), FragmentError> {
        let right = self.x.checked_add(self.width);
        let bottom = self.y.checked_add(self.height);

        match (right, bottom) {
            (Some(r), Some(b)) if r <= frame_width && b <= frame_height => Ok(()),
            _ => Err(FragmentError::OutOfBounds {
                x: self.x,
                y: self.y,
                width: self.width,
                height: self.height,
                frame_width,
                frame_height,
            }),
        }
    }
}

/// One detected text region awaiting translation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFragment {
    bounds: BoundingBox,
    source_text: String,
}

impl TextFragment {
    /// Build a fragment, rejecting text that is empty after trimming
    pub fn new(bounds: BoundingBox, source_text: impl Into<String>) -> Result<Self, FragmentError> {
        let source_text = source_text.into();
        if source_text.trim().is_empty() {
            return Err(FragmentError::EmptyText);
        }
        Ok(Self { bounds, source_text })
    }

    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    /// Pair this fragment's geometry with its translation
    pub fn into_translated(self, translated_text: String) -> TranslatedFragment {
        TranslatedFragment {
            bounds: self.bounds,
            translated_text,
        }
    }
}

/// A successfully translated fragment, ready to be drawn once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedFragment {
    pub bounds: BoundingBox,
    pub translated_text: String,
}
