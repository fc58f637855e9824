//! Simulation engine.
//!
//! Drives N spins through the staking system and the wheel, threading the
//! win/lose streak between them: the system sizes a stake from the streak,
//! the wheel resolves it, the player records the outcome and hands back the
//! updated streak.

use rand::Rng;
use tracing::{debug, info};

use crate::system::StakingSystem;
use crate::types::PlayerState;
use crate::wheel::Wheel;

/// One simulation run: a wheel, a staking system, and the streak counter.
///
/// Trials are strictly sequential — each depends on the previous spin's
/// streak — and a run always completes all its spins: there is no bankroll
/// floor and no early termination.
pub struct Simulation {
    wheel: Wheel,
    system: StakingSystem,
    payback_rate: u32,
}

impl Simulation {
    pub fn new(wheel: Wheel, system: StakingSystem) -> Self {
        let payback_rate = system.payback_rate();
        Self {
            wheel,
            system,
            payback_rate,
        }
    }

    /// Run `spins` trials against `player`, drawing from `rng`.
    ///
    /// Generic over the random source so a seeded generator reproduces the
    /// full `(stake, payout, bankroll)` trajectory.
    pub fn run<R: Rng>(&mut self, rng: &mut R, player: &mut PlayerState, spins: u64) {
        info!(
            system = %self.system.kind(),
            spins,
            payback_rate = self.payback_rate,
            holes = self.wheel.holes(),
            "Run starting"
        );

        player.history.reserve(spins as usize);
        let mut streak = 0_i64;

        for spin in 0..spins {
            let stake = self.system.next_stake(streak);
            let payout = self.wheel.resolve(rng, stake, self.payback_rate);
            streak = player.update(stake, payout, streak);
            debug!(
                spin,
                stake,
                payout,
                streak,
                bankroll = player.bankroll,
                "Spin resolved"
            );
        }

        info!(
            wins = player.wins,
            losses = player.losses,
            win_rate = format!("{:.1}%", player.win_rate()),
            bankroll = format!("{:.2}", player.bankroll),
            "Run complete"
        );
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
