/// State management module
///
/// Capture loop lifecycle as an explicit, I/O-free state machine.

pub mod loop_state;

// Re-export commonly used types
pub use loop_state::{LoopEvent, LoopState, TerminationReason, TransitionError};
