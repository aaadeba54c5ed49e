/// Capture loop
///
/// Pulls frames from the source one at a time, scales them, runs them
/// through the pipeline driver and polls the quit signal once per
/// iteration. The next frame is only read after the current one has been
/// fully processed and displayed.
use crate::capture::{resize_frame, CaptureSettings, Frame, FrameSource};
use crate::display::DisplaySink;
use crate::error::{CaptureError, DisplayError, LoopError};
use crate::ocr::TextDetector;
use crate::pipeline::FrameDriver;
use crate::render::OverlayRenderer;
use crate::state::{LoopEvent, LoopState, TerminationReason};
use crate::utils::LatencyStats;

/// Log a status line every this many frames
const STATUS_INTERVAL: u64 = 100;

/// How a loop run ended without a fatal error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopSummary {
    pub frames_processed: u64,
    pub captions_drawn: u64,
    pub reason: TerminationReason,
}

/// Releases the frame source and closes the display when dropped, so both
/// happen on every exit path including unwinding
struct Session<'a, S: FrameSource, K: DisplaySink> {
    source: &'a mut S,
    sink: &'a mut K,
}

impl<S: FrameSource, K: DisplaySink> Drop for Session<'_, S, K> {
    fn drop(&mut self) {
        self.source.release();
        self.sink.close_all();
    }
}

pub struct CaptureLoop<S, K, D, R> {
    source: S,
    sink: K,
    driver: FrameDriver<D, R>,
    settings: CaptureSettings,
    resize_factor: f32,
}

impl<S, K, D, R> CaptureLoop<S, K, D, R>
where
    S: FrameSource,
    K: DisplaySink,
    D: TextDetector,
    R: OverlayRenderer,
{
    /// `source` must already be open; it is configured when `run` starts
    pub fn new(
        source: S,
        sink: K,
        driver: FrameDriver<D, R>,
        settings: CaptureSettings,
        resize_factor: f32,
    ) -> Self {
        Self {
            source,
            sink,
            driver,
            settings,
            resize_factor,
        }
    }

    /// Run until quit, source exhaustion or a fatal error
    ///
    /// The source is released and the display closed before this returns,
    /// whatever the outcome.
    pub fn run(&mut self) -> Result<LoopSummary, LoopError> {
        let mut session = Session {
            source: &mut self.source,
            sink: &mut self.sink,
        };

        session.source.configure(&self.settings)?;
        tracing::info!("Capture loop running (quit with Q or Esc)");

        let mut state = LoopState::Running;
        let mut frame: Option<Frame> = None;
        let mut read_error: Option<CaptureError> = None;
        let mut display_error: Option<DisplayError> = None;
        let mut frames_processed = 0u64;
        let mut captions_drawn = 0u64;
        let mut stats = LatencyStats::new();
        let resize_factor = self.resize_factor;

        let reason = loop {
            let event = match state {
                LoopState::Running => match session.source.read_frame() {
                    Ok(Some(next)) => {
                        frame = Some(next);
                        LoopEvent::FrameRead
                    }
                    Ok(None) => LoopEvent::SourceExhausted,
                    Err(e) => {
                        tracing::error!("Frame read failed: {}", e);
                        read_error = Some(e);
                        LoopEvent::ReadFailed
                    }
                },
                LoopState::Resize => {
                    frame = frame.take().map(|f| resize_frame(&f, resize_factor));
                    LoopEvent::Resized
                }
                LoopState::Dispatch => {
                    let Some(mut current) = frame.take() else {
                        return Err(crate::state::TransitionError::Unexpected {
                            state,
                            event: LoopEvent::Dispatched,
                        }
                        .into());
                    };

                    match self.driver.process_frame(&mut current, &mut *session.sink) {
                        Ok(report) => {
                            frames_processed += 1;
                            captions_drawn += report.translated as u64;
                            stats.add(report.timing);

                            if frames_processed % STATUS_INTERVAL == 0 {
                                tracing::info!(
                                    "Frame {}: {:.1}ms | {} found, {} translated, {} dropped",
                                    frames_processed,
                                    report.timing.total_ms(),
                                    report.fragments_found,
                                    report.translated,
                                    report.dropped
                                );
                            }
                            LoopEvent::Dispatched
                        }
                        Err(e) => {
                            tracing::error!("Display failed: {}", e);
                            display_error = Some(e);
                            LoopEvent::DisplayLost
                        }
                    }
                }
                LoopState::CheckTermination => LoopEvent::QuitPolled(session.sink.poll_quit()),
                LoopState::Terminated(reason) => break reason,
            };

            state = state.next(event).map_err(|e| {
                tracing::error!("Capture loop rejected {:?} while {}: {}", event, state.description(), e);
                e
            })?;
        };

        tracing::info!(
            "Capture loop stopped ({:?}) after {} frames, {} captions drawn",
            reason,
            frames_processed,
            captions_drawn
        );
        stats.log_report();

        drop(session);

        match reason {
            TerminationReason::ReadFailed => Err(read_error
                .unwrap_or_else(|| CaptureError::ReadFailed("frame read failed".into()))
                .into()),
            TerminationReason::DisplayLost => Err(display_error
                .unwrap_or_else(|| DisplayError::PresentFailed("display lost".into()))
                .into()),
            TerminationReason::QuitRequested | TerminationReason::SourceExhausted => Ok(LoopSummary {
                frames_processed,
                captions_drawn,
                reason,
            }),
        }
    }
}
