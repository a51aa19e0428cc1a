//! The shared decoder: transition logic plus the one piece of state that
//! crosses the interrupt/main-loop boundary.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::transitions::{self, Phase};

/// Sampled levels of the two encoder channels.
///
/// `true` means the line reads high. With the usual pull-ups both lines
/// are high between detents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinLevels {
    pub clk: bool,
    pub dt: bool,
}

impl PinLevels {
    /// Both lines high (the rest state of a pulled-up encoder).
    pub const IDLE: Self = Self { clk: true, dt: true };

    pub const fn new(clk: bool, dt: bool) -> Self {
        Self { clk, dt }
    }

    /// Pack into the 2-bit `(CLK << 1) | DT` form used by the transition table.
    pub const fn bits(self) -> u8 {
        ((self.clk as u8) << 1) | self.dt as u8
    }
}

/// Sign convention applied to decoded steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Clockwise detents count up.
    #[default]
    Normal,
    /// Clockwise detents count down (swapped wiring or preferred knob feel).
    Reversed,
}

impl Direction {
    const fn apply(self, increment: i32) -> i32 {
        match self {
            Direction::Normal => increment,
            Direction::Reversed => -increment,
        }
    }
}

/// Snapshot of the decoder: where we are inside the current detent and
/// how many detents have been counted in total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncoderState {
    phase: Phase,
    position: i32,
}

impl EncoderState {
    const INITIAL: Self = Self {
        phase: Phase::Rest,
        position: 0,
    };

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Accumulated detent count. Unbounded; wraps at the `i32` limits.
    pub fn position(&self) -> i32 {
        self.position
    }
}

impl Default for EncoderState {
    fn default() -> Self {
        Self::INITIAL
    }
}

/// Hardware-agnostic quadrature decoder.
///
/// Holds an [`EncoderState`] behind a critical-section mutex so that
/// [`on_edge()`](Self::on_edge) may run from any interrupt priority while
/// the main loop calls [`position()`](Self::position). Each call is one
/// short critical section: no blocking, no allocation.
///
/// The counter has no bounds. Consumers diff successive readings with
/// [`i32::wrapping_sub`] and clamp the result to their own range.
///
/// # Example
///
/// ```
/// use quadrature_encoder::{Direction, PinLevels, QuadratureDecoder};
///
/// let encoder = QuadratureDecoder::new(Direction::Normal);
/// for (clk, dt) in [(true, false), (false, false), (false, true), (true, true)] {
///     encoder.on_edge(PinLevels::new(clk, dt));
/// }
/// assert_eq!(encoder.position(), 1);
/// ```
pub struct QuadratureDecoder {
    state: Mutex<CriticalSectionRawMutex, Cell<EncoderState>>,
    direction: Direction,
}

impl QuadratureDecoder {
    /// Create a decoder at position 0, usable in a `static`.
    pub const fn new(direction: Direction) -> Self {
        Self {
            state: Mutex::new(Cell::new(EncoderState::INITIAL)),
            direction,
        }
    }

    /// Feed one freshly sampled pair of pin levels.
    ///
    /// Call this on every rising or falling edge of either pin. It does
    /// not matter which pin's edge triggered the call; both levels are
    /// taken from `levels`.
    pub fn on_edge(&self, levels: PinLevels) {
        self.state.lock(|cell| {
            let current = cell.get();
            let (phase, step) = transitions::advance(current.phase, levels.bits());
            let increment = self.direction.apply(step.increment());
            cell.set(EncoderState {
                phase,
                position: current.position.wrapping_add(increment),
            });
        });
    }

    /// Current accumulated position. Never torn by a concurrent update.
    pub fn position(&self) -> i32 {
        self.state.lock(|cell| cell.get().position)
    }

    /// Full copy of the decoder state.
    pub fn snapshot(&self) -> EncoderState {
        self.state.lock(Cell::get)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }
}

// ── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const CW: [(bool, bool); 4] = [(true, false), (false, false), (false, true), (true, true)];
    const CCW: [(bool, bool); 4] = [(false, true), (false, false), (true, false), (true, true)];

    fn feed(decoder: &QuadratureDecoder, samples: &[(bool, bool)]) {
        for &(clk, dt) in samples {
            decoder.on_edge(PinLevels::new(clk, dt));
        }
    }

    #[test]
    fn starts_at_rest_and_zero() {
        let decoder = QuadratureDecoder::new(Direction::Normal);
        assert_eq!(decoder.snapshot(), EncoderState::default());
        assert_eq!(decoder.position(), 0);
        assert_eq!(decoder.snapshot().phase(), Phase::Rest);
    }

    #[test]
    fn pin_levels_bits() {
        assert_eq!(PinLevels::IDLE.bits(), 0b11);
        assert_eq!(PinLevels::new(true, false).bits(), 0b10);
        assert_eq!(PinLevels::new(false, true).bits(), 0b01);
        assert_eq!(PinLevels::new(false, false).bits(), 0b00);
    }

    #[test]
    fn net_position_equals_net_detents() {
        let decoder = QuadratureDecoder::new(Direction::Normal);
        for _ in 0..5 {
            feed(&decoder, &CW);
        }
        for _ in 0..2 {
            feed(&decoder, &CCW);
        }
        assert_eq!(decoder.position(), 3);
    }

    #[test]
    fn duplicate_handler_calls_do_not_double_count() {
        // Each edge wakes both pin handlers, so every sample arrives twice.
        let decoder = QuadratureDecoder::new(Direction::Normal);
        for &(clk, dt) in &CW {
            decoder.on_edge(PinLevels::new(clk, dt));
            decoder.on_edge(PinLevels::new(clk, dt));
        }
        assert_eq!(decoder.position(), 1);
    }

    #[test]
    fn invalid_transitions_leave_counter_unchanged() {
        let decoder = QuadratureDecoder::new(Direction::Normal);
        feed(&decoder, &CW);
        let before = decoder.position();

        // Repeated idle state and a two-step jump 11 -> 00 -> 11.
        feed(&decoder, &[(true, true), (true, true), (false, false), (true, true)]);
        assert_eq!(decoder.position(), before);
    }

    #[test]
    fn reversed_direction_negates() {
        let decoder = QuadratureDecoder::new(Direction::Reversed);
        feed(&decoder, &CW);
        feed(&decoder, &CW);
        assert_eq!(decoder.position(), -2);
        assert_eq!(decoder.direction(), Direction::Reversed);
    }

    #[test]
    fn counter_wraps_instead_of_panicking() {
        let decoder = QuadratureDecoder::new(Direction::Normal);
        decoder.state.lock(|cell| {
            cell.set(EncoderState {
                phase: Phase::Rest,
                position: i32::MAX,
            })
        });
        let before = decoder.position();
        feed(&decoder, &CW);
        assert_eq!(decoder.position(), i32::MIN);
        assert_eq!(decoder.position().wrapping_sub(before), 1);
    }

    #[test]
    fn static_decoder_is_usable() {
        static ENCODER: QuadratureDecoder = QuadratureDecoder::new(Direction::Normal);
        feed(&ENCODER, &CCW);
        assert_eq!(ENCODER.position(), -1);
    }
}
