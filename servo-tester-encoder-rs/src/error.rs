//! Error types for the encoder edge watcher.

use core::fmt;

/// Errors that can stop [`watch_edges`](crate::watch_edges).
///
/// Decoding itself never fails: invalid transitions are dropped silently.
/// Only the pin layer can report a fault.
#[derive(Debug)]
pub enum EncoderError<E> {
    /// Reading a pin level or arming its edge wait failed.
    Pin(E),
}

// Allow ergonomic `?` propagation from raw pin errors.
impl<E> From<E> for EncoderError<E> {
    fn from(error: E) -> Self {
        EncoderError::Pin(error)
    }
}

impl<E: fmt::Debug> fmt::Display for EncoderError<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EncoderError::Pin(e) => write!(f, "Encoder pin error: {:?}", e),
        }
    }
}

#[cfg(feature = "defmt")]
impl<E: defmt::Format> defmt::Format for EncoderError<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            EncoderError::Pin(e) => defmt::write!(f, "Encoder pin error: {}", e),
        }
    }
}
