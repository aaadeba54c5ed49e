// Integration tests for the live text translator
// These drive the full capture loop with scripted collaborators

use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use image::{Rgba, RgbaImage};

use live_text_translator::capture::{CaptureSettings, Frame, FrameSource};
use live_text_translator::display::DisplaySink;
use live_text_translator::error::{CaptureError, DetectionError, DisplayError, LoopError, TranslationError};
use live_text_translator::fragment::TranslatedFragment;
use live_text_translator::ocr::{FragmentExtractor, TextDetector};
use live_text_translator::pipeline::{FragmentOrchestrator, FrameDriver};
use live_text_translator::render::OverlayRenderer;
use live_text_translator::state::TerminationReason;
use live_text_translator::translation::{TranslationAdapter, Translator};
use live_text_translator::CaptureLoop;

type Log = Arc<Mutex<Vec<String>>>;

fn record(log: &Log, entry: impl Into<String>) {
    log.lock().unwrap().push(entry.into());
}

fn entries(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}

const SETTINGS: CaptureSettings = CaptureSettings {
    width: 40,
    height: 40,
    fps: 1000,
};

struct ScriptedSource {
    frames: VecDeque<Frame>,
    fail_after: Option<usize>,
    reads: usize,
    released: Arc<AtomicUsize>,
    log: Log,
}

impl ScriptedSource {
    fn new(count: usize, log: &Log) -> Self {
        Self {
            frames: (0..count)
                .map(|_| RgbaImage::from_pixel(40, 40, Rgba([10, 10, 10, 255])))
                .collect(),
            fail_after: None,
            reads: 0,
            released: Arc::new(AtomicUsize::new(0)),
            log: log.clone(),
        }
    }
}

impl FrameSource for ScriptedSource {
    fn configure(&mut self, settings: &CaptureSettings) -> Result<(), CaptureError> {
        record(&self.log, format!("configure {}x{}", settings.width, settings.height));
        Ok(())
    }

    fn read_frame(&mut self) -> Result<Option<Frame>, CaptureError> {
        if self.fail_after == Some(self.reads) {
            record(&self.log, "read error");
            return Err(CaptureError::ReadFailed("device unplugged".into()));
        }
        self.reads += 1;
        record(&self.log, "read");
        Ok(self.frames.pop_front())
    }

    fn release(&mut self) {
        record(&self.log, "release");
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

/// Sink that asks to quit after `quit_after` frames have been shown
struct ScriptedSink {
    quit_after: Option<usize>,
    fail_show: bool,
    shown: Arc<Mutex<Vec<Frame>>>,
    closed: Arc<AtomicUsize>,
    log: Log,
}

impl ScriptedSink {
    fn new(quit_after: Option<usize>, log: &Log) -> Self {
        Self {
            quit_after,
            fail_show: false,
            shown: Arc::new(Mutex::new(Vec::new())),
            closed: Arc::new(AtomicUsize::new(0)),
            log: log.clone(),
        }
    }
}

impl DisplaySink for ScriptedSink {
    fn show(&mut self, window_name: &str, frame: &Frame) -> Result<(), DisplayError> {
        if self.fail_show {
            return Err(DisplayError::PresentFailed("window destroyed".into()));
        }
        record(&self.log, format!("show {}", window_name));
        self.shown.lock().unwrap().push(frame.clone());
        Ok(())
    }

    fn poll_quit(&mut self) -> bool {
        record(&self.log, "poll");
        self.quit_after
            .map_or(false, |n| self.shown.lock().unwrap().len() >= n)
    }

    fn close_all(&mut self) {
        record(&self.log, "close");
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}

struct ScriptedDetector {
    rows: String,
    panic: bool,
    log: Log,
}

impl TextDetector for ScriptedDetector {
    fn detect(&mut self, frame: &Frame) -> Result<String, DetectionError> {
        record(&self.log, format!("detect {}x{}", frame.width(), frame.height()));
        if self.panic {
            panic!("tesseract crashed");
        }
        Ok(self.rows.clone())
    }
}

/// Fails on any word containing "fail", counts calls
struct CountingTranslator {
    calls: Arc<AtomicUsize>,
}

impl Translator for CountingTranslator {
    fn translate(&self, text: &str) -> Result<String, TranslationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if text.contains("fail") {
            Err(TranslationError::Status {
                status: 500,
                details: "provider error".to_string(),
            })
        } else {
            Ok(format!("{}-ru", text))
        }
    }

    fn target_language(&self) -> &str {
        "ru"
    }
}

#[derive(Clone)]
struct RecordingRenderer {
    drawn: Arc<Mutex<Vec<TranslatedFragment>>>,
}

impl OverlayRenderer for RecordingRenderer {
    fn draw(&mut self, frame: &mut Frame, fragment: &TranslatedFragment) {
        frame.put_pixel(fragment.bounds.x, fragment.bounds.y, Rgba([0, 255, 0, 255]));
        self.drawn.lock().unwrap().push(fragment.clone());
    }
}

struct Harness {
    log: Log,
    calls: Arc<AtomicUsize>,
    drawn: Arc<Mutex<Vec<TranslatedFragment>>>,
}

impl Harness {
    fn new() -> Self {
        Self {
            log: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(AtomicUsize::new(0)),
            drawn: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn driver(&self, rows: &str, panic: bool) -> FrameDriver<ScriptedDetector, RecordingRenderer> {
        let translator = CountingTranslator {
            calls: self.calls.clone(),
        };
        let adapter = TranslationAdapter::new(Arc::new(translator), 4).unwrap();
        FrameDriver::new(
            FragmentExtractor::new(ScriptedDetector {
                rows: rows.to_string(),
                panic,
                log: self.log.clone(),
            }),
            FragmentOrchestrator::new(adapter),
            RecordingRenderer {
                drawn: self.drawn.clone(),
            },
            "Text Detection",
        )
    }
}

const HEADER: &str = "level page_num block_num par_num line_num word_num left top width height conf text\n";

#[test]
fn test_single_region_success_draws_and_displays() {
    let h = Harness::new();
    let rows = format!("{}5 1 1 1 1 1 2 3 6 4 91 hello\n", HEADER);
    let source = ScriptedSource::new(1, &h.log);
    let sink = ScriptedSink::new(None, &h.log);
    let shown = sink.shown.clone();

    let mut capture_loop = CaptureLoop::new(source, sink, h.driver(&rows, false), SETTINGS, 0.5);
    let summary = capture_loop.run().unwrap();

    assert_eq!(summary.reason, TerminationReason::SourceExhausted);
    assert_eq!(summary.frames_processed, 1);
    assert_eq!(summary.captions_drawn, 1);

    let drawn = h.drawn.lock().unwrap();
    assert_eq!(drawn.len(), 1);
    assert_eq!(drawn[0].translated_text, "hello-ru");
    assert_eq!((drawn[0].bounds.x, drawn[0].bounds.y), (2, 3));

    let shown = shown.lock().unwrap();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].dimensions(), (20, 20));
    assert_eq!(shown[0].get_pixel(2, 3), &Rgba([0, 255, 0, 255]));
}

#[test]
fn test_single_region_failure_displays_without_captions() {
    let h = Harness::new();
    let rows = format!("{}5 1 1 1 1 1 2 3 6 4 91 fail\n", HEADER);
    let source = ScriptedSource::new(1, &h.log);
    let sink = ScriptedSink::new(None, &h.log);
    let shown = sink.shown.clone();

    let mut capture_loop = CaptureLoop::new(source, sink, h.driver(&rows, false), SETTINGS, 0.5);
    let summary = capture_loop.run().unwrap();

    assert_eq!(summary.captions_drawn, 0);
    assert!(h.drawn.lock().unwrap().is_empty());
    assert_eq!(shown.lock().unwrap().len(), 1);
    assert_eq!(h.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_failed_fragment_does_not_affect_sibling() {
    let h = Harness::new();
    let rows = format!(
        "{}5 1 1 1 1 1 1 1 5 5 90 Exit\n5 1 1 1 1 2 8 8 5 5 90 failing\n",
        HEADER
    );
    let source = ScriptedSource::new(1, &h.log);
    let sink = ScriptedSink::new(None, &h.log);

    let mut capture_loop = CaptureLoop::new(source, sink, h.driver(&rows, false), SETTINGS, 0.5);
    capture_loop.run().unwrap();

    let drawn = h.drawn.lock().unwrap();
    assert_eq!(drawn.len(), 1);
    assert_eq!(drawn[0].translated_text, "Exit-ru");
    assert_eq!(h.calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_malformed_and_empty_rows_never_reach_translator() {
    let h = Harness::new();
    // 8 fields, then a word-level row with no text
    let rows = format!("{}5 1 1 1 1 1 2 3\n5 1 1 1 1 1 2 3 6 4 91\n", HEADER);
    let source = ScriptedSource::new(2, &h.log);
    let sink = ScriptedSink::new(None, &h.log);
    let shown = sink.shown.clone();

    let mut capture_loop = CaptureLoop::new(source, sink, h.driver(&rows, false), SETTINGS, 0.5);
    let summary = capture_loop.run().unwrap();

    assert_eq!(summary.frames_processed, 2);
    assert_eq!(h.calls.load(Ordering::SeqCst), 0);
    assert_eq!(shown.lock().unwrap().len(), 2);
}

#[test]
fn test_quit_after_frame_releases_once() {
    let h = Harness::new();
    let source = ScriptedSource::new(10, &h.log);
    let released = source.released.clone();
    let sink = ScriptedSink::new(Some(3), &h.log);
    let closed = sink.closed.clone();

    let mut capture_loop = CaptureLoop::new(source, sink, h.driver(HEADER, false), SETTINGS, 0.5);
    let summary = capture_loop.run().unwrap();

    assert_eq!(summary.reason, TerminationReason::QuitRequested);
    assert_eq!(summary.frames_processed, 3);
    assert_eq!(released.load(Ordering::SeqCst), 1);
    assert_eq!(closed.load(Ordering::SeqCst), 1);
}

#[test]
fn test_one_frame_in_flight() {
    let h = Harness::new();
    let source = ScriptedSource::new(2, &h.log);
    let sink = ScriptedSink::new(None, &h.log);

    let mut capture_loop = CaptureLoop::new(source, sink, h.driver(HEADER, false), SETTINGS, 0.5);
    capture_loop.run().unwrap();

    assert_eq!(
        entries(&h.log),
        vec![
            "configure 40x40",
            "read",
            "detect 20x20",
            "show Text Detection",
            "poll",
            "read",
            "detect 20x20",
            "show Text Detection",
            "poll",
            "read",
            "release",
            "close",
        ]
    );
}

#[test]
fn test_read_failure_is_fatal_and_releases() {
    let h = Harness::new();
    let mut source = ScriptedSource::new(5, &h.log);
    source.fail_after = Some(1);
    let released = source.released.clone();
    let sink = ScriptedSink::new(None, &h.log);
    let closed = sink.closed.clone();

    let mut capture_loop = CaptureLoop::new(source, sink, h.driver(HEADER, false), SETTINGS, 0.5);
    let result = capture_loop.run();

    assert!(matches!(result, Err(LoopError::Capture(CaptureError::ReadFailed(_)))));
    assert_eq!(released.load(Ordering::SeqCst), 1);
    assert_eq!(closed.load(Ordering::SeqCst), 1);
}

#[test]
fn test_display_failure_is_fatal_and_releases() {
    let h = Harness::new();
    let source = ScriptedSource::new(5, &h.log);
    let released = source.released.clone();
    let mut sink = ScriptedSink::new(None, &h.log);
    sink.fail_show = true;
    let closed = sink.closed.clone();

    let mut capture_loop = CaptureLoop::new(source, sink, h.driver(HEADER, false), SETTINGS, 0.5);
    let result = capture_loop.run();

    assert!(matches!(result, Err(LoopError::Display(_))));
    assert_eq!(released.load(Ordering::SeqCst), 1);
    assert_eq!(closed.load(Ordering::SeqCst), 1);
}

#[test]
fn test_panic_during_frame_still_releases() {
    let h = Harness::new();
    let source = ScriptedSource::new(3, &h.log);
    let released = source.released.clone();
    let sink = ScriptedSink::new(None, &h.log);
    let closed = sink.closed.clone();

    let mut capture_loop = CaptureLoop::new(source, sink, h.driver(HEADER, true), SETTINGS, 0.5);
    let result = catch_unwind(AssertUnwindSafe(|| capture_loop.run()));

    assert!(result.is_err());
    assert_eq!(released.load(Ordering::SeqCst), 1);
    assert_eq!(closed.load(Ordering::SeqCst), 1);
}
