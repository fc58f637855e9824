//! Staking systems.
//!
//! Each system is a small state machine over the signed win/lose streak:
//! given the streak after the previous spin, it derives the next stake.
//! The set of systems is closed and selected once by name at configuration
//! time, so the spin loop never dispatches on strings.

pub mod sequence;

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::types::CroupierError;
use sequence::StakeSequence;

/// Rotation preset A.
pub const ROTATION_A: [f64; 4] = [1.0, 2.0, 3.0, 5.0];
/// Rotation preset B. `[1, 3, 2, 6]` is an equally valid table for this
/// slot — override it through the `[rotation]` configuration section.
pub const ROTATION_B: [f64; 4] = [1.0, 2.0, 3.0, 6.0];

// ---------------------------------------------------------------------------
// System selection
// ---------------------------------------------------------------------------

/// The closed set of staking systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SystemKind {
    Martingale,
    FibonacciProgression,
    RotationA,
    RotationB,
    CompositeTwoSlot,
}

impl SystemKind {
    pub const ALL: [SystemKind; 5] = [
        SystemKind::Martingale,
        SystemKind::FibonacciProgression,
        SystemKind::RotationA,
        SystemKind::RotationB,
        SystemKind::CompositeTwoSlot,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SystemKind::Martingale => "martingale",
            SystemKind::FibonacciProgression => "fibonacci-progression",
            SystemKind::RotationA => "rotation-a",
            SystemKind::RotationB => "rotation-b",
            SystemKind::CompositeTwoSlot => "composite-two-slot",
        }
    }

    /// Payback rate the system plays at: the Fibonacci progression chases
    /// triple-payout bets, everything else plays even-money.
    pub fn payback_rate(self) -> u32 {
        match self {
            SystemKind::FibonacciProgression => 3,
            _ => 2,
        }
    }
}

impl fmt::Display for SystemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SystemKind {
    type Err = CroupierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "martingale" => Ok(SystemKind::Martingale),
            "fibonacci-progression" | "fibonacci" => Ok(SystemKind::FibonacciProgression),
            "rotation-a" => Ok(SystemKind::RotationA),
            "rotation-b" => Ok(SystemKind::RotationB),
            "composite-two-slot" | "composite" => Ok(SystemKind::CompositeTwoSlot),
            other => Err(CroupierError::UnknownSystem(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Staking state machine
// ---------------------------------------------------------------------------

/// Variant-specific progression state.
#[derive(Debug, Clone)]
enum Progression {
    Martingale,
    Fibonacci(StakeSequence),
    Rotation { table: Vec<f64> },
    /// Grow-only loss buffer: the first two losses record their stakes,
    /// later losses record `1`; the stake is first + last entry.
    Composite { slots: Vec<f64> },
}

/// A configured staking system: immutable opening stake, current stake,
/// and the per-variant auxiliary state. Created once per run, mutated once
/// per spin, discarded at run end.
#[derive(Debug, Clone)]
pub struct StakingSystem {
    kind: SystemKind,
    initial_stake: f64,
    stake: f64,
    progression: Progression,
}

impl StakingSystem {
    /// Build a system with its preset rotation table (where applicable).
    pub fn new(kind: SystemKind, initial_stake: f64) -> Result<Self, CroupierError> {
        Self::build(kind, initial_stake, None)
    }

    /// Build a rotation system with a caller-supplied table.
    pub fn with_table(
        kind: SystemKind,
        initial_stake: f64,
        table: Vec<f64>,
    ) -> Result<Self, CroupierError> {
        match kind {
            SystemKind::RotationA | SystemKind::RotationB => {
                Self::build(kind, initial_stake, Some(table))
            }
            other => Err(CroupierError::InvalidConfig(format!(
                "{other} does not take a rotation table"
            ))),
        }
    }

    fn build(
        kind: SystemKind,
        initial_stake: f64,
        table: Option<Vec<f64>>,
    ) -> Result<Self, CroupierError> {
        if !(initial_stake > 0.0) || !initial_stake.is_finite() {
            return Err(CroupierError::InvalidConfig(format!(
                "opening stake must be positive, got {initial_stake}"
            )));
        }
        if let Some(table) = &table {
            if table.is_empty() {
                return Err(CroupierError::InvalidConfig(
                    "rotation table must not be empty".to_string(),
                ));
            }
            if table.iter().any(|stake| !(*stake > 0.0)) {
                return Err(CroupierError::InvalidConfig(
                    "rotation table entries must be positive".to_string(),
                ));
            }
        }

        let progression = match kind {
            SystemKind::Martingale => Progression::Martingale,
            SystemKind::FibonacciProgression => Progression::Fibonacci(StakeSequence::new()),
            SystemKind::RotationA => Progression::Rotation {
                table: table.unwrap_or_else(|| ROTATION_A.to_vec()),
            },
            SystemKind::RotationB => Progression::Rotation {
                table: table.unwrap_or_else(|| ROTATION_B.to_vec()),
            },
            SystemKind::CompositeTwoSlot => Progression::Composite { slots: Vec::new() },
        };

        Ok(Self {
            kind,
            initial_stake,
            stake: initial_stake,
            progression,
        })
    }

    pub fn kind(&self) -> SystemKind {
        self.kind
    }

    pub fn payback_rate(&self) -> u32 {
        self.kind.payback_rate()
    }

    pub fn stake(&self) -> f64 {
        self.stake
    }

    /// Derive the stake for the upcoming spin from the current streak.
    ///
    /// `streak == 0` only occurs on the very first spin, when the stake is
    /// already seeded to the opening stake — the branch is deliberately a
    /// no-op.
    pub fn next_stake(&mut self, streak: i64) -> f64 {
        if streak > 0 {
            match &self.progression {
                Progression::Rotation { table } => {
                    // Climb the table with the win streak, clamped to the
                    // last entry once the streak outruns it.
                    let idx = (streak as usize).min(table.len()) - 1;
                    self.stake = table[idx];
                }
                _ => self.stake = self.initial_stake,
            }
        } else if streak < 0 {
            match &mut self.progression {
                Progression::Martingale => self.stake *= 2.0,
                Progression::Fibonacci(seq) => {
                    self.stake = seq.value((-streak) as usize) as f64;
                }
                Progression::Rotation { .. } => self.stake = self.initial_stake,
                Progression::Composite { slots } => {
                    let recorded = if slots.len() < 2 { self.stake } else { 1.0 };
                    slots.push(recorded);
                    self.stake = if slots.len() >= 2 {
                        slots[0] + slots[slots.len() - 1]
                    } else {
                        self.initial_stake
                    };
                }
            }
        }

        debug!(system = %self.kind, streak, stake = self.stake, "Stake sized");
        self.stake
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh(kind: SystemKind) -> StakingSystem {
        StakingSystem::new(kind, 1.0).unwrap()
    }

    // -- selection -----------------------------------------------------------

    #[test]
    fn test_kind_from_str() {
        assert_eq!(
            "martingale".parse::<SystemKind>().unwrap(),
            SystemKind::Martingale
        );
        assert_eq!(
            "Fibonacci-Progression".parse::<SystemKind>().unwrap(),
            SystemKind::FibonacciProgression
        );
        assert_eq!(
            "rotation-a".parse::<SystemKind>().unwrap(),
            SystemKind::RotationA
        );
        assert_eq!(
            "composite-two-slot".parse::<SystemKind>().unwrap(),
            SystemKind::CompositeTwoSlot
        );
    }

    #[test]
    fn test_unknown_name_rejected() {
        assert!(matches!(
            "labouchere".parse::<SystemKind>(),
            Err(CroupierError::UnknownSystem(_))
        ));
    }

    #[test]
    fn test_payback_rates() {
        assert_eq!(SystemKind::FibonacciProgression.payback_rate(), 3);
        for kind in SystemKind::ALL {
            if kind != SystemKind::FibonacciProgression {
                assert_eq!(kind.payback_rate(), 2);
            }
        }
    }

    #[test]
    fn test_name_round_trips() {
        for kind in SystemKind::ALL {
            assert_eq!(kind.name().parse::<SystemKind>().unwrap(), kind);
        }
    }

    // -- construction --------------------------------------------------------

    #[test]
    fn test_non_positive_stake_rejected() {
        for stake in [0.0, -1.0, f64::NAN] {
            assert!(StakingSystem::new(SystemKind::Martingale, stake).is_err());
        }
    }

    #[test]
    fn test_table_only_for_rotation_systems() {
        assert!(StakingSystem::with_table(SystemKind::Martingale, 1.0, vec![1.0]).is_err());
        assert!(StakingSystem::with_table(SystemKind::RotationB, 1.0, vec![1.0, 3.0, 2.0, 6.0])
            .is_ok());
    }

    #[test]
    fn test_bad_tables_rejected() {
        assert!(StakingSystem::with_table(SystemKind::RotationA, 1.0, vec![]).is_err());
        assert!(StakingSystem::with_table(SystemKind::RotationA, 1.0, vec![1.0, 0.0]).is_err());
    }

    // -- streak behavior -----------------------------------------------------

    #[test]
    fn test_initial_streak_is_a_noop() {
        for kind in SystemKind::ALL {
            let mut system = fresh(kind);
            assert_eq!(system.next_stake(0), 1.0);
            assert_eq!(system.stake(), 1.0);
        }
    }

    #[test]
    fn test_martingale_doubles_then_resets() {
        let mut system = fresh(SystemKind::Martingale);
        // L, L, L, W — stakes 1, 2, 4, 8, then back to 1.
        assert_eq!(system.next_stake(0), 1.0);
        assert_eq!(system.next_stake(-1), 2.0);
        assert_eq!(system.next_stake(-2), 4.0);
        assert_eq!(system.next_stake(-3), 8.0);
        assert_eq!(system.next_stake(1), 1.0);
    }

    #[test]
    fn test_fibonacci_tracks_loss_depth() {
        let mut system = fresh(SystemKind::FibonacciProgression);
        assert_eq!(system.next_stake(0), 1.0);
        assert_eq!(system.next_stake(-1), 1.0);
        assert_eq!(system.next_stake(-2), 1.0);
        assert_eq!(system.next_stake(-3), 2.0);
        assert_eq!(system.next_stake(-4), 3.0);
        assert_eq!(system.next_stake(-5), 5.0);
        assert_eq!(system.next_stake(1), 1.0);
    }

    #[test]
    fn test_rotation_a_climbs_and_clamps() {
        let mut system = fresh(SystemKind::RotationA);
        assert_eq!(system.next_stake(0), 1.0);
        assert_eq!(system.next_stake(1), 1.0);
        assert_eq!(system.next_stake(2), 2.0);
        assert_eq!(system.next_stake(3), 3.0);
        assert_eq!(system.next_stake(4), 5.0);
        // A fifth consecutive win still stakes the last entry.
        assert_eq!(system.next_stake(5), 5.0);
    }

    #[test]
    fn test_rotation_resets_on_loss() {
        let mut system = StakingSystem::new(SystemKind::RotationB, 2.0).unwrap();
        assert_eq!(system.next_stake(3), 3.0);
        assert_eq!(system.next_stake(-1), 2.0);
    }

    #[test]
    fn test_rotation_b_custom_table() {
        let mut system =
            StakingSystem::with_table(SystemKind::RotationB, 1.0, vec![1.0, 3.0, 2.0, 6.0])
                .unwrap();
        assert_eq!(system.next_stake(1), 1.0);
        assert_eq!(system.next_stake(2), 3.0);
        assert_eq!(system.next_stake(3), 2.0);
        assert_eq!(system.next_stake(4), 6.0);
    }

    #[test]
    fn test_composite_buffers_first_two_losses() {
        let mut system = fresh(SystemKind::CompositeTwoSlot);
        // First loss records the current stake; one slot is not enough to sum.
        assert_eq!(system.next_stake(-1), 1.0);
        // Second loss records again; stake becomes first + last = 1 + 1.
        assert_eq!(system.next_stake(-2), 2.0);
        // Later losses push 1, so the stake stays first + 1.
        assert_eq!(system.next_stake(-3), 2.0);
        assert_eq!(system.next_stake(-4), 2.0);
    }

    #[test]
    fn test_composite_resets_stake_on_win() {
        let mut system = StakingSystem::new(SystemKind::CompositeTwoSlot, 3.0).unwrap();
        system.next_stake(-1);
        system.next_stake(-2);
        assert_eq!(system.next_stake(1), 3.0);
    }
}
