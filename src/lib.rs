/// Live on-screen text translation
///
/// Captures frames, finds text with Tesseract, translates every detected
/// word concurrently and draws the translations back onto the frame.
pub mod capture;
pub mod capture_loop;
pub mod config;
pub mod display;
pub mod error;
pub mod fragment;
pub mod ocr;
pub mod pipeline;
pub mod render;
pub mod state;
pub mod translation;
pub mod utils;

pub use capture::{CaptureSettings, Frame, FrameSource, ScreenFrameSource};
pub use capture_loop::{CaptureLoop, LoopSummary};
pub use config::Config;
pub use display::{DisplaySink, PreviewWindow};
pub use fragment::{BoundingBox, TextFragment, TranslatedFragment};
pub use ocr::{FragmentExtractor, TesseractDetector, TextDetector};
pub use pipeline::{FragmentOrchestrator, FrameDriver, FrameReport};
pub use render::{GlyphRenderer, OverlayRenderer};
pub use translation::{MyMemoryTranslator, TranslationAdapter, Translator};
