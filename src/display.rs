/// Display sink: presents annotated frames and reports the quit key
use minifb::{InputCallback, Key, KeyRepeat, Window, WindowOptions};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::capture::Frame;
use crate::error::DisplayError;

pub trait DisplaySink {
    fn show(&mut self, window_name: &str, frame: &Frame) -> Result<(), DisplayError>;

    /// Non-blocking; true once the user asked to quit
    fn poll_quit(&mut self) -> bool;

    /// Close every window. Called exactly once when the loop ends.
    fn close_all(&mut self);
}

/// Pack RGBA pixels into minifb's 0RGB `u32` layout
pub fn to_argb_buffer(frame: &Frame, buffer: &mut Vec<u32>) {
    buffer.clear();
    buffer.extend(
        frame
            .pixels()
            .map(|p| (u32::from(p[0]) << 16) | (u32::from(p[1]) << 8) | u32::from(p[2])),
    );
}

const ESCAPE_CHAR: u32 = 0x1b;

/// Records a quit key from the window's character events
///
/// Characters are queued by the platform and delivered on every window
/// update, so a tap that is released before the next frame still counts.
struct QuitLatch {
    requested: Arc<AtomicBool>,
}

impl InputCallback for QuitLatch {
    fn add_char(&mut self, uni_char: u32) {
        if uni_char == u32::from('q') || uni_char == u32::from('Q') || uni_char == ESCAPE_CHAR {
            self.requested.store(true, Ordering::SeqCst);
        }
    }
}

/// Native preview window
///
/// The window is created on the first frame and recreated whenever the
/// frame size changes. Pressing `Q` or `Esc`, or closing the window, is
/// reported as a quit request. Quit requests stay latched until the loop
/// ends.
pub struct PreviewWindow {
    window: Option<Window>,
    size: (usize, usize),
    buffer: Vec<u32>,
    quit_requested: Arc<AtomicBool>,
}

impl PreviewWindow {
    pub fn new() -> Self {
        Self {
            window: None,
            size: (0, 0),
            buffer: Vec::new(),
            quit_requested: Arc::new(AtomicBool::new(false)),
        }
    }

    fn ensure_window(&mut self, title: &str, width: usize, height: usize) -> Result<&mut Window, DisplayError> {
        if self.window.is_none() || self.size != (width, height) {
            let mut window = Window::new(title, width, height, WindowOptions::default())
                .map_err(|e| DisplayError::WindowFailed(e.to_string().into()))?;
            window.set_input_callback(Box::new(QuitLatch {
                requested: Arc::clone(&self.quit_requested),
            }));
            tracing::info!("Preview window opened ({}x{})", width, height);
            self.window = Some(window);
            self.size = (width, height);
        }

        self.window
            .as_mut()
            .ok_or_else(|| DisplayError::WindowFailed("preview window unavailable".into()))
    }

    fn latch_quit(&self) {
        self.quit_requested.store(true, Ordering::SeqCst);
    }
}

impl Default for PreviewWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplaySink for PreviewWindow {
    fn show(&mut self, window_name: &str, frame: &Frame) -> Result<(), DisplayError> {
        let (width, height) = (frame.width() as usize, frame.height() as usize);

        let mut buffer = std::mem::take(&mut self.buffer);
        to_argb_buffer(frame, &mut buffer);

        let result = self.ensure_window(window_name, width, height).and_then(|window| {
            window
                .update_with_buffer(&buffer, width, height)
                .map_err(|e| DisplayError::PresentFailed(e.to_string().into()))?;

            // Presses seen by this update, even if already released
            Ok(window.is_key_pressed(Key::Q, KeyRepeat::No)
                || window.is_key_pressed(Key::Escape, KeyRepeat::No))
        });

        self.buffer = buffer;
        if result? {
            self.latch_quit();
        }
        Ok(())
    }

    fn poll_quit(&mut self) -> bool {
        if self.quit_requested.load(Ordering::SeqCst) {
            return true;
        }

        let quit = match self.window.as_ref() {
            Some(window) => {
                !window.is_open() || window.is_key_down(Key::Q) || window.is_key_down(Key::Escape)
            }
            None => false,
        };
        if quit {
            self.latch_quit();
        }
        quit
    }

    fn close_all(&mut self) {
        if self.window.take().is_some() {
            tracing::info!("Preview window closed");
        }
    }
}
