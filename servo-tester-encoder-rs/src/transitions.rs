//! Gray-code transition table for a detented quadrature encoder.
//!
//! The table is indexed by the current [`Phase`] and the freshly sampled
//! 2-bit level pair `(CLK << 1) | DT`. A pulled-up encoder rests at `11`
//! between detents, so a complete detent is one of:
//!
//! ```text
//! clockwise:          11 → 10 → 00 → 01 → 11
//! counter-clockwise:  11 → 01 → 00 → 10 → 11
//! ```
//!
//! A step is emitted only when the sequence closes back at `11`. Repeated
//! samples leave the phase where it is, and jumps that skip a Gray-code
//! step drop back to [`Phase::Rest`] without emitting anything.

/// Position within the current detent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Both lines high, between detents.
    #[default]
    Rest,
    Cw1,
    Cw2,
    Cw3,
    Ccw1,
    Ccw2,
    Ccw3,
}

/// Step emitted by a single transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    None,
    Clockwise,
    CounterClockwise,
}

impl Step {
    /// Signed raw increment, before any direction reversal.
    pub(crate) const fn increment(self) -> i32 {
        match self {
            Step::None => 0,
            Step::Clockwise => 1,
            Step::CounterClockwise => -1,
        }
    }
}

use Phase::*;

const NONE: Step = Step::None;

// Columns are the sampled levels 00, 01, 10, 11.
const TABLE: [[(Phase, Step); 4]; 7] = [
    // Rest
    [(Rest, NONE), (Ccw1, NONE), (Cw1, NONE), (Rest, NONE)],
    // Cw1
    [(Cw2, NONE), (Rest, NONE), (Cw1, NONE), (Rest, NONE)],
    // Cw2
    [(Cw2, NONE), (Cw3, NONE), (Cw1, NONE), (Rest, NONE)],
    // Cw3
    [(Cw2, NONE), (Cw3, NONE), (Rest, NONE), (Rest, Step::Clockwise)],
    // Ccw1
    [(Ccw2, NONE), (Ccw1, NONE), (Rest, NONE), (Rest, NONE)],
    // Ccw2
    [(Ccw2, NONE), (Ccw1, NONE), (Ccw3, NONE), (Rest, NONE)],
    // Ccw3
    [(Ccw2, NONE), (Rest, NONE), (Ccw3, NONE), (Rest, Step::CounterClockwise)],
];

/// Advance the state machine by one sampled level pair.
///
/// `levels` is `(CLK << 1) | DT`; only the low two bits are used.
pub(crate) const fn advance(phase: Phase, levels: u8) -> (Phase, Step) {
    TABLE[phase as usize][(levels & 0b11) as usize]
}

// ── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const CW: [u8; 4] = [0b10, 0b00, 0b01, 0b11];
    const CCW: [u8; 4] = [0b01, 0b00, 0b10, 0b11];

    fn run(start: Phase, samples: &[u8]) -> (Phase, i32) {
        let mut phase = start;
        let mut total = 0;
        for &s in samples {
            let (next, step) = advance(phase, s);
            phase = next;
            total += step.increment();
        }
        (phase, total)
    }

    #[test]
    fn clockwise_detent_emits_one_step() {
        assert_eq!(run(Rest, &CW), (Rest, 1));
    }

    #[test]
    fn counter_clockwise_detent_emits_one_step() {
        assert_eq!(run(Rest, &CCW), (Rest, -1));
    }

    #[test]
    fn only_the_closing_transition_emits() {
        let mut phase = Rest;
        for &s in &CW[..3] {
            let (next, step) = advance(phase, s);
            assert_eq!(step, Step::None);
            phase = next;
        }
        assert_eq!(advance(phase, 0b11), (Rest, Step::Clockwise));
    }

    #[test]
    fn repeated_sample_keeps_phase() {
        // Both pin handlers firing for the same level pair.
        for phase in [Rest, Cw1, Cw2, Cw3, Ccw1, Ccw2, Ccw3] {
            let sample = match phase {
                Rest => 0b11,
                Cw1 => 0b10,
                Cw2 | Ccw2 => 0b00,
                Cw3 => 0b01,
                Ccw1 => 0b01,
                Ccw3 => 0b10,
            };
            assert_eq!(advance(phase, sample).0, phase, "phase {:?}", phase);
        }
    }

    #[test]
    fn two_step_jump_from_rest_is_ignored() {
        assert_eq!(advance(Rest, 0b00), (Rest, Step::None));
    }

    #[test]
    fn reversal_mid_detent_cancels() {
        // Start clockwise, back out the way we came.
        assert_eq!(run(Rest, &[0b10, 0b00, 0b10, 0b11]), (Rest, 0));
    }

    #[test]
    fn bounce_on_one_line_does_not_count() {
        assert_eq!(run(Rest, &[0b10, 0b11, 0b10, 0b11, 0b10, 0b11]), (Rest, 0));
    }

    #[test]
    fn many_detents_accumulate() {
        let mut samples = [0u8; 40];
        for (i, s) in samples.iter_mut().enumerate() {
            *s = CW[i % 4];
        }
        assert_eq!(run(Rest, &samples), (Rest, 10));
    }
}
