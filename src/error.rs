//! Error type shared by every module in the crate.

use derive_more::{Display, Error};

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Errors reported by the keypad game.
///
/// Game-rule failures (a wrong key, a missed step) are not errors; they end the
/// round with [`Outcome::GameOver`](crate::game::Outcome::GameOver). These variants cover bad
/// input to checked constructors and failed hardware output.
#[derive(Debug, Display, Error, defmt::Format)]
pub enum Error {
    /// A key slot outside `0..12`.
    #[display("key slot {_0} is outside the 12-key grid")]
    KeySlotOutOfRange(#[error(not(source))] u8),

    /// An LED index outside `0..12`.
    #[display("LED index {_0} is outside the 12-LED strip")]
    LedIndexOutOfRange(#[error(not(source))] u8),

    /// A matrix column outside `0..4`.
    #[display("column {_0} is outside the 4-column matrix")]
    ColumnOutOfRange(#[error(not(source))] u8),

    /// A matrix row outside `0..3`.
    #[display("row {_0} is outside the 3-row matrix")]
    RowOutOfRange(#[error(not(source))] u8),

    /// Asked to draw more distinct keys than the grid holds.
    #[display("cannot draw {requested} distinct keys from {available}")]
    SampleTooLarge {
        /// Number of keys requested.
        requested: u8,
        /// Number of keys available.
        available: u8,
    },

    /// The LED strip transport rejected a frame.
    #[display("LED strip transmission failed")]
    LedTransmit,

    /// The display rejected a draw or present call.
    #[display("display write failed")]
    Display,

    /// Text did not fit in its fixed-capacity buffer.
    #[display("text does not fit in its buffer")]
    TextOverflow,

    /// A background task could not be spawned.
    #[cfg(not(feature = "host"))]
    #[display("failed to spawn task: {_0:?}")]
    TaskSpawn(#[error(not(source))] embassy_executor::SpawnError),
}

impl From<core::fmt::Error> for Error {
    fn from(_: core::fmt::Error) -> Self {
        Self::TextOverflow
    }
}
