//! Conditions raised by the accounting core.
//!
//! Only `ArithmeticOverflow` is ever returned as an `Err`. The remaining
//! variants describe non-fatal fallbacks and are emitted as warnings while
//! the computation continues.

use referenda_types::TrackId;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GovernanceError {
    #[error("arithmetic overflow computing {context}")]
    ArithmeticOverflow { context: &'static str },

    #[error("unknown conviction tag {0}")]
    UnknownConviction(u8),

    #[error("no parameters known for {0}")]
    UnknownTrack(TrackId),

    #[error("lock on {0} has no track info, unlock block cannot be resolved")]
    MissingTrackInfo(TrackId),
}

