use thiserror::Error;

use super::PrimitiveClass;

/// Caller-contract violations of the immediate renderer frame protocol.
///
/// These indicate a bug in the calling code, not a runtime condition; a frame
/// whose surface is unavailable is reported through `SubmitOutcome` instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("`{operation}` called outside of begin_frame/end_frame")]
    FrameNotStarted { operation: &'static str },

    #[error("begin_frame called while a frame is already being recorded")]
    FrameAlreadyStarted,

    #[error("{class} batch capacity exceeded: {requested} vertices requested, capacity is {capacity}")]
    CapacityExceeded {
        class: PrimitiveClass,
        capacity: usize,
        requested: usize,
    },
}
