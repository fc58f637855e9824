//! Shared types for the CROUPIER simulator.
//!
//! These types form the data model used across all modules: the mutable
//! player aggregate, the end-of-run report, and the error taxonomy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Player state
// ---------------------------------------------------------------------------

/// Mutable per-run player aggregate.
///
/// Created once per simulation with a starting bankroll, mutated exactly
/// once per spin by [`PlayerState::update`], and read by the presentation
/// layer after the run completes. Invariant: `history.len() == wins + losses`
/// after any completed spin count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    /// Current bankroll. Signed — a run never stops on insolvency, so this
    /// may go arbitrarily negative.
    pub bankroll: f64,
    /// Bankroll after every spin, append-only, chronological.
    pub history: Vec<f64>,
    pub wins: u64,
    pub losses: u64,
    /// Longest winning streak observed (>= 0).
    pub max_win_streak: i64,
    /// Longest losing streak observed, as a negative count (<= 0).
    pub max_lose_streak: i64,
}

impl PlayerState {
    pub fn new(initial_bankroll: f64) -> Self {
        Self {
            bankroll: initial_bankroll,
            history: Vec::new(),
            wins: 0,
            losses: 0,
            max_win_streak: 0,
            max_lose_streak: 0,
        }
    }

    /// Record one resolved spin and return the updated streak.
    ///
    /// The streak is owned by the engine and threaded through here: positive
    /// counts consecutive wins, negative counts consecutive losses. A change
    /// of direction resets through zero, so a win-to-loss transition lands on
    /// -1 (and vice versa on +1) — the magnitude never jumps by more than 1.
    pub fn update(&mut self, stake: f64, payout: f64, mut streak: i64) -> i64 {
        self.bankroll = self.bankroll - stake + payout;
        self.history.push(self.bankroll);

        if payout == 0.0 {
            self.losses += 1;
            if streak > 0 {
                streak = 0;
            }
            streak -= 1;
        } else {
            self.wins += 1;
            if streak < 0 {
                streak = 0;
            }
            streak += 1;
        }

        self.max_win_streak = self.max_win_streak.max(streak);
        self.max_lose_streak = self.max_lose_streak.min(streak);
        streak
    }

    /// Number of spins resolved so far.
    pub fn spins(&self) -> u64 {
        self.wins + self.losses
    }

    /// Win percentage over resolved spins (0.0 when nothing resolved yet).
    pub fn win_rate(&self) -> f64 {
        let resolved = self.wins + self.losses;
        if resolved == 0 {
            0.0
        } else {
            (self.wins as f64 / resolved as f64) * 100.0
        }
    }
}

// ---------------------------------------------------------------------------
// Run report
// ---------------------------------------------------------------------------

/// Final summary of a simulation run, for printing or JSON export.
#[derive(Debug, Clone, Serialize)]
pub struct SpinReport {
    pub system: String,
    pub generated_at: DateTime<Utc>,
    pub spins: u64,
    pub payback_rate: u32,
    pub initial_bankroll: f64,
    pub final_bankroll: f64,
    pub net: f64,
    pub wins: u64,
    pub losses: u64,
    pub win_rate: f64,
    pub max_win_streak: i64,
    pub max_lose_streak: i64,
    /// Bankroll after every spin — the chart input.
    pub history: Vec<f64>,
}

impl SpinReport {
    pub fn new(
        system: &str,
        spins: u64,
        payback_rate: u32,
        initial_bankroll: f64,
        player: &PlayerState,
    ) -> Self {
        Self {
            system: system.to_string(),
            generated_at: Utc::now(),
            spins,
            payback_rate,
            initial_bankroll,
            final_bankroll: player.bankroll,
            net: player.bankroll - initial_bankroll,
            wins: player.wins,
            losses: player.losses,
            win_rate: player.win_rate(),
            max_win_streak: player.max_win_streak,
            max_lose_streak: player.max_lose_streak,
            history: player.history.clone(),
        }
    }
}

impl fmt::Display for SpinReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: spins={} wins={} losses={} ({:.1}%) streaks=+{}/{} bankroll={:.2} -> {:.2} (net {:+.2})",
            self.system,
            self.spins,
            self.wins,
            self.losses,
            self.win_rate,
            self.max_win_streak,
            self.max_lose_streak,
            self.initial_bankroll,
            self.final_bankroll,
            self.net,
        )
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types for CROUPIER.
///
/// Everything here is raised at construction/validation time, before any
/// spin runs — there is no recoverable error path inside a run.
#[derive(Debug, thiserror::Error)]
pub enum CroupierError {
    #[error("Unknown staking system: {0}")]
    UnknownSystem(String),

    #[error("Configuration error: {0}")]
    InvalidConfig(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- PlayerState tests --

    #[test]
    fn test_update_win_math() {
        let mut player = PlayerState::new(100.0);
        let streak = player.update(10.0, 20.0, 0);
        assert_eq!(player.bankroll, 110.0);
        assert_eq!(player.history, vec![110.0]);
        assert_eq!(player.wins, 1);
        assert_eq!(player.losses, 0);
        assert_eq!(streak, 1);
    }

    #[test]
    fn test_update_loss_math() {
        let mut player = PlayerState::new(100.0);
        let streak = player.update(10.0, 0.0, 0);
        assert_eq!(player.bankroll, 90.0);
        assert_eq!(player.losses, 1);
        assert_eq!(streak, -1);
    }

    #[test]
    fn test_streak_resets_through_zero() {
        let mut player = PlayerState::new(0.0);
        let mut streak = 0;
        // Three wins, then a loss: streak must land on -1, not -4.
        for _ in 0..3 {
            streak = player.update(1.0, 2.0, streak);
        }
        assert_eq!(streak, 3);
        streak = player.update(1.0, 0.0, streak);
        assert_eq!(streak, -1);
        // And back: a win after losses lands on +1.
        streak = player.update(1.0, 0.0, streak);
        assert_eq!(streak, -2);
        streak = player.update(1.0, 2.0, streak);
        assert_eq!(streak, 1);
    }

    #[test]
    fn test_streak_extrema_tracked() {
        let mut player = PlayerState::new(0.0);
        let mut streak = 0;
        for _ in 0..4 {
            streak = player.update(1.0, 0.0, streak);
        }
        for _ in 0..2 {
            streak = player.update(1.0, 2.0, streak);
        }
        assert_eq!(player.max_lose_streak, -4);
        assert_eq!(player.max_win_streak, 2);
    }

    #[test]
    fn test_history_accounts_for_every_spin() {
        let mut player = PlayerState::new(50.0);
        let mut streak = 0;
        for i in 0..10 {
            let payout = if i % 3 == 0 { 2.0 } else { 0.0 };
            streak = player.update(1.0, payout, streak);
        }
        assert_eq!(player.history.len() as u64, player.wins + player.losses);
        assert_eq!(player.spins(), 10);
        assert_eq!(*player.history.last().unwrap(), player.bankroll);
    }

    #[test]
    fn test_bankroll_may_go_negative() {
        let mut player = PlayerState::new(1.0);
        player.update(10.0, 0.0, 0);
        assert_eq!(player.bankroll, -9.0);
    }

    #[test]
    fn test_win_rate() {
        let mut player = PlayerState::new(0.0);
        assert_eq!(player.win_rate(), 0.0);
        let mut streak = 0;
        streak = player.update(1.0, 2.0, streak);
        player.update(1.0, 0.0, streak);
        assert!((player.win_rate() - 50.0).abs() < 1e-10);
    }

    // -- SpinReport tests --

    #[test]
    fn test_report_snapshot() {
        let mut player = PlayerState::new(10.0);
        let mut streak = 0;
        streak = player.update(1.0, 0.0, streak);
        player.update(2.0, 4.0, streak);
        let report = SpinReport::new("martingale", 2, 2, 10.0, &player);
        assert_eq!(report.final_bankroll, player.bankroll);
        assert_eq!(report.net, player.bankroll - 10.0);
        assert_eq!(report.wins, 1);
        assert_eq!(report.losses, 1);
        assert_eq!(report.history.len(), 2);
    }

    #[test]
    fn test_report_display_compact() {
        let player = PlayerState::new(0.0);
        let report = SpinReport::new("rotation-a", 0, 2, 0.0, &player);
        let line = format!("{report}");
        assert!(line.starts_with("rotation-a:"));
        assert!(line.contains("spins=0"));
    }

    #[test]
    fn test_report_serializes_to_json() {
        let player = PlayerState::new(0.0);
        let report = SpinReport::new("martingale", 0, 2, 0.0, &player);
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"system\":\"martingale\""));
        assert!(json.contains("\"payback_rate\":2"));
    }
}
