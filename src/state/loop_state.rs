/// Capture loop state machine
///
/// Represents one iteration of the capture loop with clear state transitions:
///
/// ```text
/// Running ──FrameRead──> Resize ──Resized──> Dispatch ──Dispatched──> CheckTermination
///    ^                                                                     │
///    └──────────────────────────QuitPolled(false)──────────────────────────┤
///                                                                          └─QuitPolled(true)─> Terminated
/// ```
///
/// Source exhaustion, read failure and a lost display also lead to `Terminated`.

/// Why the loop stopped
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TerminationReason {
    /// The display sink reported a quit request
    QuitRequested,
    /// The frame source has no more frames
    SourceExhausted,
    /// The frame source failed to produce a frame
    ReadFailed,
    /// The display sink could not present a frame
    DisplayLost,
}

/// State of the capture loop
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LoopState {
    /// Waiting for the next frame from the source
    Running,

    /// Frame read; scaling it for detection
    Resize,

    /// Frame handed to the pipeline driver
    Dispatch,

    /// Single non-blocking poll of the quit signal
    CheckTermination,

    /// Loop is over; resources must be released
    Terminated(TerminationReason),
}

/// Observations that drive the state machine
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LoopEvent {
    FrameRead,
    SourceExhausted,
    ReadFailed,
    Resized,
    Dispatched,
    DisplayLost,
    QuitPolled(bool),
}

/// Invalid state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionError {
    /// No further events are accepted once terminated
    AlreadyTerminated,

    /// Event does not belong to the current state
    Unexpected { state: LoopState, event: LoopEvent },
}

impl std::fmt::Display for TransitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransitionError::AlreadyTerminated => write!(f, "Capture loop already terminated"),
            TransitionError::Unexpected { state, event } => {
                write!(f, "Unexpected event {:?} in state {:?}", event, state)
            }
        }
    }
}

impl std::error::Error for TransitionError {}

impl LoopState {
    /// Compute the state that follows `event`
    pub fn next(self, event: LoopEvent) -> Result<LoopState, TransitionError> {
        use LoopEvent as E;
        use LoopState as S;

        match (self, event) {
            (S::Terminated(_), _) => Err(TransitionError::AlreadyTerminated),

            (S::Running, E::FrameRead) => Ok(S::Resize),
            (S::Running, E::SourceExhausted) => Ok(S::Terminated(TerminationReason::SourceExhausted)),
            (S::Running, E::ReadFailed) => Ok(S::Terminated(TerminationReason::ReadFailed)),

            (S::Resize, E::Resized) => Ok(S::Dispatch),

            (S::Dispatch, E::Dispatched) => Ok(S::CheckTermination),
            (S::Dispatch, E::DisplayLost) => Ok(S::Terminated(TerminationReason::DisplayLost)),

            (S::CheckTermination, E::QuitPolled(true)) => {
                Ok(S::Terminated(TerminationReason::QuitRequested))
            }
            (S::CheckTermination, E::QuitPolled(false)) => Ok(S::Running),

            (state, event) => Err(TransitionError::Unexpected { state, event }),
        }
    }

    /// Check if the loop has stopped
    pub fn is_terminated(&self) -> bool {
        matches!(self, LoopState::Terminated(_))
    }

    /// Get a human-readable description of the state
    pub fn description(&self) -> &'static str {
        match self {
            LoopState::Running => "Running",
            LoopState::Resize => "Resizing frame",
            LoopState::Dispatch => "Processing frame",
            LoopState::CheckTermination => "Checking quit signal",
            LoopState::Terminated(_) => "Terminated",
        }
    }
}

impl Default for LoopState {
    fn default() -> Self {
        LoopState::Running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drive(events: &[LoopEvent]) -> Result<LoopState, TransitionError> {
        events
            .iter()
            .try_fold(LoopState::default(), |state, event| state.next(*event))
    }

    #[test]
    fn test_full_iteration_returns_to_running() {
        let state = drive(&[
            LoopEvent::FrameRead,
            LoopEvent::Resized,
            LoopEvent::Dispatched,
            LoopEvent::QuitPolled(false),
        ]);
        assert_eq!(state, Ok(LoopState::Running));
    }

    #[test]
    fn test_quit_terminates_after_dispatch() {
        let state = drive(&[
            LoopEvent::FrameRead,
            LoopEvent::Resized,
            LoopEvent::Dispatched,
            LoopEvent::QuitPolled(true),
        ])
        .unwrap();
        assert_eq!(state, LoopState::Terminated(TerminationReason::QuitRequested));
        assert!(state.is_terminated());
    }

    #[test]
    fn test_source_end_and_failure_terminate() {
        assert_eq!(
            LoopState::Running.next(LoopEvent::SourceExhausted),
            Ok(LoopState::Terminated(TerminationReason::SourceExhausted))
        );
        assert_eq!(
            LoopState::Running.next(LoopEvent::ReadFailed),
            Ok(LoopState::Terminated(TerminationReason::ReadFailed))
        );
        assert_eq!(
            LoopState::Dispatch.next(LoopEvent::DisplayLost),
            Ok(LoopState::Terminated(TerminationReason::DisplayLost))
        );
    }

    #[test]
    fn test_quit_is_only_polled_between_frames() {
        // Quit cannot interrupt a frame that is still being processed
        assert!(matches!(
            LoopState::Dispatch.next(LoopEvent::QuitPolled(true)),
            Err(TransitionError::Unexpected { .. })
        ));
        assert!(LoopState::Running.next(LoopEvent::QuitPolled(true)).is_err());
    }

    #[test]
    fn test_terminated_is_final() {
        let terminated = LoopState::Terminated(TerminationReason::QuitRequested);
        assert_eq!(
            terminated.next(LoopEvent::FrameRead),
            Err(TransitionError::AlreadyTerminated)
        );
        assert_eq!(terminated.description(), "Terminated");
    }
}
