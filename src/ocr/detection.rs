/// Tesseract OCR detection
///
/// This module handles all Tesseract initialization and OCR operations.
/// It manages the Tesseract instance and returns word-level TSV rows for a frame.
use image::ImageFormat;
use leptess::{LepTess, Variable};
use std::io::Cursor;

use super::{DetectorSettings, TextDetector};
use crate::capture::Frame;
use crate::config::SUPPORTED_ENGINE_MODE;
use crate::error::DetectionError;

/// Tesseract OCR detector
///
/// Keeps one Tesseract instance alive for the lifetime of the capture loop.
pub struct TesseractDetector {
    tess: LepTess,
}

impl TesseractDetector {
    /// Create a new Tesseract detector
    ///
    /// # Returns
    /// `Ok(TesseractDetector)` on success, or error if Tesseract initialization fails
    pub fn new(settings: &DetectorSettings) -> Result<Self, DetectionError> {
        tracing::info!("Initializing Tesseract OCR...");

        let mut tess = match settings.tessdata_path.as_deref() {
            Some(path) => {
                tracing::info!("Initializing Tesseract with datapath: {}", path);
                LepTess::new(Some(path), &settings.language)
            }
            None => LepTess::new(None, &settings.language),
        }
        .map_err(|e| DetectionError::InitFailed(Box::new(e)))?;

        tess.set_variable(
            Variable::TesseditPagesegMode,
            &settings.page_seg_mode.to_string(),
        )
        .map_err(|e| DetectionError::InitFailed(Box::new(e)))?;

        if settings.engine_mode != SUPPORTED_ENGINE_MODE {
            tracing::warn!(
                "Engine mode {} requested; Tesseract is initialised with engine mode {}",
                settings.engine_mode,
                SUPPORTED_ENGINE_MODE
            );
        }

        tracing::info!("✓ Tesseract OCR initialized");
        tracing::info!("  Language: {}", settings.language);
        tracing::info!("  Page segmentation mode: {}", settings.page_seg_mode);

        Ok(Self { tess })
    }
}

impl TextDetector for TesseractDetector {
    fn detect(&mut self, frame: &Frame) -> Result<String, DetectionError> {
        let mut png = Vec::new();
        frame
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(DetectionError::EncodeFailed)?;

        self.tess
            .set_image_from_mem(&png)
            .map_err(|e| DetectionError::RecognitionFailed(Box::new(e)))?;

        let tsv = self
            .tess
            .get_tsv_text(0)
            .map_err(|e| DetectionError::RecognitionFailed(Box::new(e)))?;

        tracing::trace!("[ocr-detect] {} rows", tsv.lines().count());

        Ok(tsv)
    }
}
