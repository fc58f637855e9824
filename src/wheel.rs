//! Wheel model.
//!
//! One spin draws a hole uniformly and resolves a stake into a payout.
//! The draw and the payout rule are kept separate so the rule can be
//! tested without a random source.

use rand::Rng;

use crate::types::CroupierError;

/// European wheel: holes 0 through 36.
pub const DEFAULT_HOLES: u32 = 37;

/// Immutable wheel configuration — the number of equiprobable holes.
#[derive(Debug, Clone)]
pub struct Wheel {
    holes: u32,
}

impl Default for Wheel {
    fn default() -> Self {
        Self {
            holes: DEFAULT_HOLES,
        }
    }
}

impl Wheel {
    pub fn new(holes: u32) -> Result<Self, CroupierError> {
        if holes == 0 {
            return Err(CroupierError::InvalidConfig(
                "wheel needs at least one hole".to_string(),
            ));
        }
        Ok(Self { holes })
    }

    pub fn holes(&self) -> u32 {
        self.holes
    }

    /// Width of the winning band for a given payback rate (integer division).
    pub fn win_width(&self, payback_rate: u32) -> u32 {
        self.holes / payback_rate
    }

    /// Draw one hole uniformly from `0..holes`.
    pub fn spin<R: Rng>(&self, rng: &mut R) -> u32 {
        rng.gen_range(0..self.holes)
    }

    /// Resolve a drawn hole into a payout.
    ///
    /// Holes `1..win_width` pay `stake * payback_rate`; everything else pays
    /// nothing. Hole 0 sits outside the winning band regardless of the
    /// threshold, which puts the win probability at roughly
    /// `(win_width - 1) / holes`.
    pub fn payout_for(&self, outcome: u32, stake: f64, payback_rate: u32) -> f64 {
        if outcome >= 1 && outcome < self.win_width(payback_rate) {
            stake * f64::from(payback_rate)
        } else {
            0.0
        }
    }

    /// Draw and resolve in one step — the per-spin entry point.
    pub fn resolve<R: Rng>(&self, rng: &mut R, stake: f64, payback_rate: u32) -> f64 {
        let outcome = self.spin(rng);
        self.payout_for(outcome, stake, payback_rate)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
