use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::capture::CaptureSettings;
use crate::error::ConfigError;
use crate::ocr::DetectorSettings;

/// Engine mode leptess initialises Tesseract with
pub const SUPPORTED_ENGINE_MODE: u8 = 3;

fn default_font_path() -> String {
    #[cfg(target_os = "windows")]
    {
        "C:\\Windows\\Fonts\\arial.ttf".to_string()
    }
    #[cfg(target_os = "macos")]
    {
        "/System/Library/Fonts/Supplemental/Arial Unicode.ttf".to_string()
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf".to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory containing Tesseract language data (None = system install)
    pub tessdata_path: Option<String>,

    /// Tesseract language model used for recognition
    pub ocr_language: String,

    /// Tesseract OCR engine mode. Only 3 (default, based on what is
    /// available) is supported; other values are rejected by `validate`.
    pub engine_mode: u8,

    /// Tesseract page segmentation mode (6 = single uniform block of text)
    pub page_seg_mode: u8,

    /// Index of the capture device (monitor) to read frames from
    pub device_index: usize,

    /// Requested frame width in pixels
    pub frame_width: u32,

    /// Requested frame height in pixels
    pub frame_height: u32,

    /// Requested frames per second
    pub fps: u32,

    /// Scale applied to each frame before OCR (0.5 = half size)
    pub resize_factor: f32,

    /// Language the detected text is assumed to be written in
    pub source_language: String,

    /// Language every caption is translated into
    pub target_language: String,

    /// Maximum number of translation requests in flight
    pub translation_workers: usize,

    /// Optional per-request timeout for the translation provider
    pub request_timeout_secs: Option<u64>,

    /// Contact address sent to the provider to raise its anonymous quota
    pub provider_email: Option<String>,

    /// TrueType font used for captions (must cover the target script)
    pub font_path: String,

    /// Caption height in pixels
    pub font_scale: f32,

    /// Caption colour as RGBA
    pub caption_color: [u8; 4],

    /// Title of the preview window
    pub window_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tessdata_path: None,
            ocr_language: "eng".to_string(),
            engine_mode: SUPPORTED_ENGINE_MODE,
            page_seg_mode: 6,
            device_index: 0,
            frame_width: 640,
            frame_height: 480,
            fps: 15,
            resize_factor: 0.5,
            source_language: "en".to_string(),
            target_language: "ru".to_string(),
            translation_workers: 8,
            request_timeout_secs: None,
            provider_email: None,
            font_path: default_font_path(),
            font_scale: 24.0,
            caption_color: [255, 255, 255, 255],
            window_name: "Text Detection".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the app's config directory.
    /// Creates default config if file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let config = Self::load_from(&config_path)?;
            tracing::info!("✓ Loaded config from: {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(&config_path)?;
            tracing::info!("✓ Created default config at: {}", config_path.display());
            tracing::info!("  Edit this file to customize settings.");
            Ok(config)
        }
    }

    /// Load and validate configuration from an explicit path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let load_failed = |source: Box<dyn std::error::Error + Send + Sync>| {
            ConfigError::LoadFailed {
                path: path.display().to_string(),
                source,
            }
        };

        let content = fs::read_to_string(path).map_err(|e| load_failed(Box::new(e)))?;
        let config: Config = serde_json::from_str(&content).map_err(|e| load_failed(Box::new(e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to an explicit path, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |source: Box<dyn std::error::Error + Send + Sync>| {
            ConfigError::SaveFailed {
                path: path.display().to_string(),
                source,
            }
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| save_failed(Box::new(e)))?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| save_failed(Box::new(e)))?;
        fs::write(path, json).map_err(|e| save_failed(Box::new(e)))?;

        Ok(())
    }

    /// Reject values the pipeline cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.engine_mode != SUPPORTED_ENGINE_MODE {
            return Err(ConfigError::Invalid(format!(
                "engine_mode {} is not supported, only {} is",
                self.engine_mode, SUPPORTED_ENGINE_MODE
            )));
        }
        if self.frame_width == 0 || self.frame_height == 0 {
            return Err(ConfigError::Invalid(format!(
                "frame size must be positive, got {}x{}",
                self.frame_width, self.frame_height
            )));
        }
        if self.fps == 0 {
            return Err(ConfigError::Invalid("fps must be positive".to_string()));
        }
        if !(self.resize_factor > 0.0 && self.resize_factor <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "resize_factor must be in (0, 1], got {}",
                self.resize_factor
            )));
        }
        if self.translation_workers == 0 {
            return Err(ConfigError::Invalid(
                "translation_workers must be at least 1".to_string(),
            ));
        }
        if self.source_language.trim().is_empty() || self.target_language.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "source and target languages must be set".to_string(),
            ));
        }
        if self.font_scale <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "font_scale must be positive, got {}",
                self.font_scale
            )));
        }
        Ok(())
    }

    pub fn capture_settings(&self) -> CaptureSettings {
        CaptureSettings {
            width: self.frame_width,
            height: self.frame_height,
            fps: self.fps,
        }
    }

    pub fn detector_settings(&self) -> DetectorSettings {
        DetectorSettings {
            engine_mode: self.engine_mode,
            page_seg_mode: self.page_seg_mode,
            language: self.ocr_language.clone(),
            tessdata_path: self.tessdata_path.clone(),
        }
    }

    /// Get the config file path (in app's base directory)
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let exe_path = env::current_exe().map_err(|_| ConfigError::NoConfigDir)?;
        let exe_dir = exe_path.parent().ok_or(ConfigError::NoConfigDir)?;

        Ok(exe_dir.join("config").join("config.json"))
    }
}
