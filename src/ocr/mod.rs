mod detection;
/// OCR module: text-region detection and fragment extraction
///
/// # Architecture
///
/// The module is split into focused submodules:
/// - `detection`: Tesseract OCR integration (raw TSV rows per frame)
/// - `text_extraction`: Row classification and fragment construction
///
/// # Public API
///
/// The main interface is `FragmentExtractor`, which runs the detector once
/// per frame and returns the fragments worth translating.
pub mod text_extraction;

pub use detection::TesseractDetector;

use crate::capture::Frame;
use crate::error::DetectionError;
use crate::fragment::TextFragment;

/// Text-region detector seam
///
/// One blocking call per frame; output is Tesseract TSV rows.
pub trait TextDetector {
    fn detect(&mut self, frame: &Frame) -> Result<String, DetectionError>;
}

impl<T: TextDetector + ?Sized> TextDetector for Box<T> {
    fn detect(&mut self, frame: &Frame) -> Result<String, DetectionError> {
        (**self).detect(frame)
    }
}

/// Detector configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectorSettings {
    /// Tesseract OCR engine mode; only 3 is honoured, anything else is
    /// logged and ignored
    pub engine_mode: u8,
    /// Tesseract page segmentation mode
    pub page_seg_mode: u8,
    /// Tesseract language model
    pub language: String,
    /// Custom tessdata directory
    pub tessdata_path: Option<String>,
}

impl Default for DetectorSettings {
    fn default() -> Self {
        Self {
            engine_mode: crate::config::SUPPORTED_ENGINE_MODE,
            page_seg_mode: 6,
            language: "eng".to_string(),
            tessdata_path: None,
        }
    }
}

/// Turns one frame into the ordered list of fragments to translate
///
/// # Example
/// ```no_run
/// use live_text_translator::ocr::{DetectorSettings, FragmentExtractor, TesseractDetector};
/// use image::RgbaImage;
///
/// let detector = TesseractDetector::new(&DetectorSettings::default())?;
/// let mut extractor = FragmentExtractor::new(detector);
/// let frame = RgbaImage::new(320, 240);
///
/// for fragment in extractor.extract(&frame)? {
///     tracing::info!("{:?} {}", fragment.bounds(), fragment.source_text());
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct FragmentExtractor<D> {
    detector: D,
}

impl<D: TextDetector> FragmentExtractor<D> {
    pub fn new(detector: D) -> Self {
        Self { detector }
    }

    /// Run the detector once and keep every well-formed, non-empty row
    pub fn extract(&mut self, frame: &Frame) -> Result<Vec<TextFragment>, DetectionError> {
        let output = self.detector.detect(frame)?;
        let fragments: Vec<TextFragment> = text_extraction::fragments_from_rows(&output).collect();

        tracing::debug!("[ocr-extract] {} fragments", fragments.len());

        Ok(fragments)
    }
}
