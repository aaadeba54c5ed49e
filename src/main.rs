use anyhow::Context;
use display_info::DisplayInfo;
use std::sync::Arc;
use std::time::Duration;
use sysinfo::System;

use live_text_translator::error::AppResult;
use live_text_translator::ocr::{FragmentExtractor, TesseractDetector};
use live_text_translator::pipeline::{FragmentOrchestrator, FrameDriver};
use live_text_translator::translation::{MyMemoryTranslator, TranslationAdapter};
use live_text_translator::{CaptureLoop, Config, GlyphRenderer, PreviewWindow, ScreenFrameSource};

const LOG_TARGET_STARTUP: &str = "live_text_translator::startup";

/// Initialize tracing with file rotation
///
/// Logs are written to:
/// - macOS: ~/Library/Application Support/LiveTextTranslator/logs/
/// - Windows: %APPDATA%/LiveTextTranslator/logs/
/// - Linux: ~/.config/LiveTextTranslator/logs/
///
/// Log output:
/// - Debug builds: Console + File
/// - Release builds: File only
fn initialize_tracing() {
    use tracing_appender::rolling;
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let log_dir = dirs::config_dir()
        .map(|dir| dir.join("LiveTextTranslator").join("logs"))
        .unwrap_or_else(|| std::path::PathBuf::from("logs"));

    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Warning: Failed to create log directory: {}", e);
    }

    let file_appender = rolling::daily(&log_dir, "live-text-translator.log");

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true);

    #[cfg(debug_assertions)]
    {
        let console_layer = fmt::layer()
            .with_writer(std::io::stdout)
            .with_ansi(true)
            .with_target(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .with(console_layer)
            .init();
    }

    #[cfg(not(debug_assertions))]
    {
        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();
    }

    tracing::info!("Log directory: {}", log_dir.display());
}

fn log_runtime_environment() {
    let version = env!("CARGO_PKG_VERSION");
    let os_name = System::long_os_version()
        .or_else(System::name)
        .unwrap_or_else(|| "Unknown OS".to_string());
    let kernel = System::kernel_version().unwrap_or_else(|| "Unknown Kernel".to_string());
    let architecture = std::env::consts::ARCH;

    tracing::info!(target: LOG_TARGET_STARTUP, "Starting live-text-translator v{} on ({})", version, architecture);
    tracing::info!(target: LOG_TARGET_STARTUP, "Operating System: {} (kernel {})", os_name, kernel);

    if let Ok(displays) = DisplayInfo::all() {
        tracing::info!(
            target: LOG_TARGET_STARTUP,
            "Displays: {} detected",
            displays.len()
        );
        for (index, disp) in displays.iter().enumerate() {
            tracing::debug!(
                target: LOG_TARGET_STARTUP,
                "  Display {}: {}x{}{}",
                index,
                disp.width,
                disp.height,
                if disp.is_primary { " (primary)" } else { "" }
            );
        }
    }
}

fn main() -> AppResult<()> {
    initialize_tracing();
    log_runtime_environment();

    let cfg = Config::load().context("Failed to load configuration")?;
    tracing::info!("✓ Configuration loaded");
    tracing::info!(
        "  Device {} at {}x{} @ {} fps, translating {} -> {}",
        cfg.device_index,
        cfg.frame_width,
        cfg.frame_height,
        cfg.fps,
        cfg.source_language,
        cfg.target_language
    );

    let detector = TesseractDetector::new(&cfg.detector_settings()).context(
        "Failed to initialize OCR. Install Tesseract:\n  \
         macOS: brew install tesseract\n  \
         Linux: sudo apt-get install tesseract-ocr",
    )?;

    let translator = MyMemoryTranslator::new(
        cfg.source_language.clone(),
        cfg.target_language.clone(),
        cfg.request_timeout_secs.map(Duration::from_secs),
        cfg.provider_email.clone(),
    );
    let adapter = TranslationAdapter::new(Arc::new(translator), cfg.translation_workers)
        .context("Failed to start translation workers")?;

    let renderer = GlyphRenderer::from_file(&cfg.font_path, cfg.font_scale, cfg.caption_color)
        .with_context(|| format!("Failed to load caption font (set font_path in {})", config_location()))?;

    let driver = FrameDriver::new(
        FragmentExtractor::new(detector),
        FragmentOrchestrator::new(adapter),
        renderer,
        cfg.window_name.clone(),
    );

    let source = ScreenFrameSource::open(cfg.device_index).context(
        "Failed to open capture device. On macOS, grant Screen Recording permission \
         (System Settings > Privacy & Security > Screen Recording)",
    )?;

    let mut capture_loop = CaptureLoop::new(
        source,
        PreviewWindow::new(),
        driver,
        cfg.capture_settings(),
        cfg.resize_factor,
    );

    let summary = capture_loop.run().context("Capture loop failed")?;
    tracing::info!(
        "Stopped: {:?} ({} frames, {} captions)",
        summary.reason,
        summary.frames_processed,
        summary.captions_drawn
    );

    Ok(())
}

fn config_location() -> String {
    Config::config_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| "config/config.json".to_string())
}
