use thiserror::Error;

/// Application-level errors using thiserror for structured error handling.
///
/// Each collaborator of the frame pipeline has its own error type. Only
/// `CaptureError` (and a lost display) ever ends the capture loop; the
/// remaining kinds are contained per frame or per fragment.

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Failed to initialize frame source")]
    InitFailed(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Failed to read frame")]
    ReadFailed(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("No capture devices found")]
    NoDevices,

    #[error("Invalid device index: {0}")]
    InvalidDeviceIndex(usize),

    #[error("Invalid capture settings: {0}")]
    InvalidSettings(String),
}

#[derive(Error, Debug)]
pub enum DetectionError {
    #[error("Failed to initialize OCR engine")]
    InitFailed(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Failed to encode frame for OCR")]
    EncodeFailed(#[source] image::ImageError),

    #[error("Failed to perform OCR on frame")]
    RecognitionFailed(#[source] Box<dyn std::error::Error + Send + Sync>),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslationError {
    #[error("Refusing to translate empty text")]
    EmptyInput,

    #[error("Translation request failed: {0}")]
    Transport(String),

    #[error("Translation provider returned status {status}: {details}")]
    Status { status: u16, details: String },

    #[error("Translation provider rate limit reached: {0}")]
    RateLimited(String),

    #[error("Malformed translation response: {0}")]
    MalformedResponse(String),

    #[error("Translation task panicked: {0}")]
    Panicked(String),

    #[error("Translation worker exited without a result")]
    WorkerLost,
}

/// Per-fragment failures that drop a fragment without touching its siblings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FragmentError {
    #[error("Fragment has no recognized text")]
    EmptyText,

    #[error("Region [{x}, {y}, {width}, {height}] exceeds frame bounds {frame_width}x{frame_height}")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        frame_width: u32,
        frame_height: u32,
    },
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to read font file: {path}")]
    FontLoadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid font data in {0}")]
    InvalidFont(String),
}

#[derive(Error, Debug)]
pub enum DisplayError {
    #[error("Failed to open preview window")]
    WindowFailed(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Failed to present frame")]
    PresentFailed(#[source] Box<dyn std::error::Error + Send + Sync>),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from {path}")]
    LoadFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to save configuration to {path}")]
    SaveFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Could not determine configuration directory")]
    NoConfigDir,
}

/// Fatal outcomes of the capture loop
#[derive(Error, Debug)]
pub enum LoopError {
    #[error("Frame source failed")]
    Capture(#[from] CaptureError),

    #[error("Display sink failed")]
    Display(#[from] DisplayError),

    #[error("Capture loop entered an invalid state: {0}")]
    InvalidTransition(#[from] crate::state::TransitionError),
}

/// Type alias for application Results using anyhow for context chaining
pub type AppResult<T> = anyhow::Result<T>;
