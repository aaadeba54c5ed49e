/// Per-frame translation pipeline
///
/// ```text
/// FrameDriver::process_frame
///   ├── FragmentExtractor  (one detector call)
///   ├── FragmentOrchestrator (fan-out / fan-in over the worker pool)
///   ├── OverlayRenderer    (serial, after the join)
///   └── DisplaySink::show
/// ```
pub mod driver;
pub mod orchestrator;

pub use driver::{FrameDriver, FrameReport};
pub use orchestrator::{BatchOutcome, FragmentOrchestrator};
