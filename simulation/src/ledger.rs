//! Coins and lives.

use rampart_core::{EconomyConfig, RewardSink};

/// Player resources. Combat credits coins, the wave layer charges lives and
/// player commands spend or refund coins between ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ledger {
    coins: u32,
    lives: u32,
    lives_lost: u32,
}

impl Ledger {
    /// Creates a ledger holding the configured starting resources.
    #[must_use]
    pub const fn new(economy: &EconomyConfig) -> Self {
        Self {
            coins: economy.starting_coins,
            lives: economy.starting_lives,
            lives_lost: 0,
        }
    }

    /// Coins available to spend.
    #[must_use]
    pub const fn coins(&self) -> u32 {
        self.coins
    }

    /// Lives remaining.
    #[must_use]
    pub const fn lives(&self) -> u32 {
        self.lives
    }

    /// Lives lost since the start, including those past zero.
    #[must_use]
    pub const fn lives_lost(&self) -> u32 {
        self.lives_lost
    }

    /// Reports whether every life is gone.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.lives == 0
    }

    pub(crate) fn spend(&mut self, coins: u32) {
        self.coins = self.coins.saturating_sub(coins);
    }
}

impl RewardSink for Ledger {
    fn credit(&mut self, coins: u32) {
        self.coins = self.coins.saturating_add(coins);
    }

    fn lose_lives(&mut self, lives: u32) {
        self.lives = self.lives.saturating_sub(lives);
        self.lives_lost = self.lives_lost.saturating_add(lives);
    }
}
