//! Spread trading signals.
//!
//! Three states driven by the spread z-score:
//! - Flat -> ShortSpread when z > entry, Flat -> LongSpread when z < -entry
//! - LongSpread -> Flat when z >= -exit
//! - ShortSpread -> Flat when z <= exit
//!
//! Direction changes always pass through Flat.

/// Daily position signal for a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Signal {
    /// Long A, short B. Entered when the spread is unusually low.
    LongSpread,
    /// Short A, long B. Entered when the spread is unusually high.
    ShortSpread,
    #[default]
    Flat,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalThresholds {
    pub entry: f64,
    pub exit: f64,
}

impl Default for SignalThresholds {
    fn default() -> Self {
        SignalThresholds {
            entry: 1.5,
            exit: 0.0,
        }
    }
}

impl Signal {
    pub fn is_flat(self) -> bool {
        self == Signal::Flat
    }

    /// +1 for long-spread, -1 for short-spread, 0 when flat.
    pub fn as_i8(self) -> i8 {
        match self {
            Signal::LongSpread => 1,
            Signal::ShortSpread => -1,
            Signal::Flat => 0,
        }
    }

    /// Transition from `self` given a defined z-score.
    pub fn next(self, z: f64, thresholds: SignalThresholds) -> Signal {
        match self {
            Signal::Flat => {
                if z > thresholds.entry {
                    Signal::ShortSpread
                } else if z < -thresholds.entry {
                    Signal::LongSpread
                } else {
                    Signal::Flat
                }
            }
            Signal::LongSpread => {
                if z >= -thresholds.exit {
                    Signal::Flat
                } else {
                    Signal::LongSpread
                }
            }
            Signal::ShortSpread => {
                if z <= thresholds.exit {
                    Signal::Flat
                } else {
                    Signal::ShortSpread
                }
            }
        }
    }
}

/// Run the state machine over a z-score sequence.
///
/// A NaN z-score emits `Flat` for that day without touching the held state,
/// so an open position resumes on the next defined z-score.
pub fn generate_signals(z_scores: &[f64], thresholds: SignalThresholds) -> Vec<Signal> {
    let mut state = Signal::Flat;
    z_scores
        .iter()
        .map(|&z| {
            if z.is_nan() {
                return Signal::Flat;
            }
            state = state.next(z, thresholds);
            state
        })
        .collect()
}
