/// Frame pipeline driver
///
/// One call per frame: detect, translate, draw, display.
use crate::capture::Frame;
use crate::display::DisplaySink;
use crate::error::DisplayError;
use crate::ocr::{FragmentExtractor, TextDetector};
use crate::render::OverlayRenderer;
use crate::utils::{FrameTiming, Timer};

use super::orchestrator::FragmentOrchestrator;

/// Summary of one processed frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    pub fragments_found: usize,
    pub translated: usize,
    pub dropped: usize,
    /// Detector call failed; frame was shown without captions
    pub detection_failed: bool,
    pub timing: FrameTiming,
}

pub struct FrameDriver<D, R> {
    extractor: FragmentExtractor<D>,
    orchestrator: FragmentOrchestrator,
    renderer: R,
    window_name: String,
}

impl<D: TextDetector, R: OverlayRenderer> FrameDriver<D, R> {
    pub fn new(
        extractor: FragmentExtractor<D>,
        orchestrator: FragmentOrchestrator,
        renderer: R,
        window_name: impl Into<String>,
    ) -> Self {
        Self {
            extractor,
            orchestrator,
            renderer,
            window_name: window_name.into(),
        }
    }

    /// Annotate `frame` in place and hand it to `sink`
    ///
    /// Detection and translation failures only reduce the captions drawn;
    /// the frame is displayed regardless. Only a failing sink is reported.
    pub fn process_frame<S: DisplaySink + ?Sized>(
        &mut self,
        frame: &mut Frame,
        sink: &mut S,
    ) -> Result<FrameReport, DisplayError> {
        let total_timer = Timer::start();
        let mut report = FrameReport::default();

        let detect_timer = Timer::start();
        let fragments = match self.extractor.extract(frame) {
            Ok(fragments) => fragments,
            Err(e) => {
                tracing::warn!("[driver] detection failed, showing frame without captions: {}", e);
                report.detection_failed = true;
                Vec::new()
            }
        };
        report.timing.detect_us = detect_timer.elapsed_us();
        report.fragments_found = fragments.len();

        let translate_timer = Timer::start();
        let outcome = self.orchestrator.translate_within(frame, fragments);
        report.timing.translate_us = translate_timer.elapsed_us();
        report.translated = outcome.translated.len();
        report.dropped = outcome.dropped();

        // All drawing happens after the join, on this thread
        let render_timer = Timer::start();
        for fragment in &outcome.translated {
            self.renderer.draw(frame, fragment);
        }
        report.timing.render_us = render_timer.elapsed_us();

        let display_timer = Timer::start();
        sink.show(&self.window_name, frame)?;
        report.timing.display_us = display_timer.elapsed_us();

        report.timing.total_us = total_timer.elapsed_us();
        Ok(report)
    }
}
