use image::imageops::{self, FilterType};
use image::RgbaImage;
use std::time::{Duration, Instant};
use xcap::Monitor;

use crate::error::CaptureError;

/// A single RGBA video frame
pub type Frame = RgbaImage;

/// Resolution and rate hints applied when the source is configured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureSettings {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

impl CaptureSettings {
    /// Minimum time between two frames at the configured rate
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.fps.max(1)
    }
}

/// Frame source seam
///
/// Opening happens in the implementor's constructor. `read_frame` returns
/// `Ok(None)` once the source is exhausted.
pub trait FrameSource {
    fn configure(&mut self, settings: &CaptureSettings) -> Result<(), CaptureError>;

    fn read_frame(&mut self) -> Result<Option<Frame>, CaptureError>;

    /// Free the underlying device. Called exactly once when the loop ends.
    fn release(&mut self);
}

/// Scale a frame by `factor` using area-style averaging
pub fn resize_frame(frame: &Frame, factor: f32) -> Frame {
    if (factor - 1.0).abs() < f32::EPSILON {
        return frame.clone();
    }

    let width = ((frame.width() as f32 * factor).round() as u32).max(1);
    let height = ((frame.height() as f32 * factor).round() as u32).max(1);

    imageops::resize(frame, width, height, FilterType::Triangle)
}

/// Frame source backed by screen capture of one monitor
///
/// # Platform Notes
/// - macOS: requires Screen Recording permission
///   (System Settings > Privacy & Security > Screen Recording)
/// - Windows / Linux: no special permissions required
///
/// Each captured screen is scaled to the configured resolution, and reads
/// are paced to the configured frame rate.
pub struct ScreenFrameSource {
    monitor: Option<Monitor>,
    device_index: usize,
    settings: Option<CaptureSettings>,
    last_read: Option<Instant>,
}

impl ScreenFrameSource {
    /// Open the monitor at `device_index`
    pub fn open(device_index: usize) -> Result<Self, CaptureError> {
        tracing::info!("Opening capture device {}...", device_index);

        let monitors = Monitor::all().map_err(|e| CaptureError::InitFailed(e.to_string().into()))?;
        if monitors.is_empty() {
            return Err(CaptureError::NoDevices);
        }

        let monitor = monitors
            .into_iter()
            .nth(device_index)
            .ok_or(CaptureError::InvalidDeviceIndex(device_index))?;

        tracing::info!("✓ Capture device {} opened", device_index);

        Ok(Self {
            monitor: Some(monitor),
            device_index,
            settings: None,
            last_read: None,
        })
    }

    fn pace(&mut self, interval: Duration) {
        if let Some(last) = self.last_read {
            let elapsed = last.elapsed();
            if elapsed < interval {
                std::thread::sleep(interval - elapsed);
            }
        }
        self.last_read = Some(Instant::now());
    }
}

impl FrameSource for ScreenFrameSource {
    fn configure(&mut self, settings: &CaptureSettings) -> Result<(), CaptureError> {
        if settings.width == 0 || settings.height == 0 || settings.fps == 0 {
            return Err(CaptureError::InvalidSettings(format!(
                "{}x{} @ {} fps",
                settings.width, settings.height, settings.fps
            )));
        }

        tracing::info!(
            "  Capture settings: {}x{} @ {} fps",
            settings.width,
            settings.height,
            settings.fps
        );
        self.settings = Some(*settings);
        Ok(())
    }

    fn read_frame(&mut self) -> Result<Option<Frame>, CaptureError> {
        let Some(settings) = self.settings else {
            return Err(CaptureError::InvalidSettings(
                "frame source read before configure".to_string(),
            ));
        };

        self.pace(settings.frame_interval());

        let Some(monitor) = self.monitor.as_ref() else {
            return Ok(None);
        };

        let image = monitor
            .capture_image()
            .map_err(|e| CaptureError::ReadFailed(e.to_string().into()))?;

        if image.dimensions() == (settings.width, settings.height) {
            return Ok(Some(image));
        }

        Ok(Some(imageops::resize(
            &image,
            settings.width,
            settings.height,
            FilterType::Triangle,
        )))
    }

    fn release(&mut self) {
        if self.monitor.take().is_some() {
            tracing::info!("Capture device {} released", self.device_index);
        }
    }
}
