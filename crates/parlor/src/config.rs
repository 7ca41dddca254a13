//! Service configuration.

use std::path::PathBuf;
use std::time::Duration;

use parlor_types::{CardTemplate, GameVariant, Pet, Rarity};

use crate::settlement::SettlementConfig;

// ---------------------------------------------------------------------------
// ServiceConfig
// ---------------------------------------------------------------------------

/// Configuration for a [`GameService`](crate::GameService).
///
/// Content pools are inputs here — the real pools live with the
/// content layer; the built-in defaults just make the service usable
/// out of the box.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Directory holding the three ledger store files.
    pub data_dir: PathBuf,

    /// Per-variant idle timeouts.
    pub timeouts: TurnTimeouts,

    /// Card battle tuning.
    pub battle: BattleTuning,

    /// Work/daily payout tuning.
    pub economy: EconomyTuning,

    /// Settlement amounts.
    pub settlement: SettlementConfig,

    /// Templates a drawn card (or a padded battle roster slot) comes
    /// from.
    pub card_pool: Vec<CardTemplate>,

    /// Pets a collect can yield.
    pub pet_pool: Vec<Pet>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            timeouts: TurnTimeouts::default(),
            battle: BattleTuning::default(),
            economy: EconomyTuning::default(),
            settlement: SettlementConfig::default(),
            card_pool: default_card_pool(),
            pet_pool: default_pet_pool(),
        }
    }
}

impl ServiceConfig {
    /// Minimum accepted idle timeout.
    pub const MIN_TURN_TIMEOUT: Duration = Duration::from_secs(5);

    /// Clamp and fix any out-of-range values so the config is safe to
    /// use. Called automatically by `GameService::new`.
    pub fn validated(mut self) -> Self {
        self.timeouts = self.timeouts.validated();

        if self.battle.roster_size == 0 {
            tracing::warn!("battle roster size of 0 raised to 1");
            self.battle.roster_size = 1;
        }
        if self.battle.hp_min > self.battle.hp_max {
            tracing::warn!(
                hp_min = self.battle.hp_min,
                hp_max = self.battle.hp_max,
                "hit point range inverted, swapping"
            );
            std::mem::swap(&mut self.battle.hp_min, &mut self.battle.hp_max);
        }
        if self.economy.work_min > self.economy.work_max {
            std::mem::swap(&mut self.economy.work_min, &mut self.economy.work_max);
        }

        // Empty pools would leave card draws and roster padding with
        // nothing to pick from.
        if self.card_pool.is_empty() {
            tracing::warn!("empty card pool, restoring the built-in defaults");
            self.card_pool = default_card_pool();
        }
        if self.pet_pool.is_empty() {
            tracing::warn!("empty pet pool, restoring the built-in defaults");
            self.pet_pool = default_pet_pool();
        }

        self
    }
}

// ---------------------------------------------------------------------------
// TurnTimeouts
// ---------------------------------------------------------------------------

/// How long each variant waits for the next action before the session
/// is released unsettled.
#[derive(Debug, Clone)]
pub struct TurnTimeouts {
    pub tic_tac_toe: Duration,
    pub blackjack: Duration,
    pub rock_paper_scissors: Duration,
    pub card_battle: Duration,
}

impl Default for TurnTimeouts {
    fn default() -> Self {
        Self {
            tic_tac_toe: Duration::from_secs(180),
            blackjack: Duration::from_secs(120),
            rock_paper_scissors: Duration::from_secs(60),
            card_battle: Duration::from_secs(300),
        }
    }
}

impl TurnTimeouts {
    /// The timeout for a variant.
    pub fn for_variant(&self, variant: GameVariant) -> Duration {
        match variant {
            GameVariant::TicTacToe => self.tic_tac_toe,
            GameVariant::Blackjack => self.blackjack,
            GameVariant::RockPaperScissors => self.rock_paper_scissors,
            GameVariant::CardBattle => self.card_battle,
        }
    }

    fn validated(mut self) -> Self {
        for timeout in [
            &mut self.tic_tac_toe,
            &mut self.blackjack,
            &mut self.rock_paper_scissors,
            &mut self.card_battle,
        ] {
            if *timeout < ServiceConfig::MIN_TURN_TIMEOUT {
                tracing::warn!(
                    configured = ?*timeout,
                    min = ?ServiceConfig::MIN_TURN_TIMEOUT,
                    "turn timeout below minimum, clamping"
                );
                *timeout = ServiceConfig::MIN_TURN_TIMEOUT;
            }
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Tuning knobs
// ---------------------------------------------------------------------------

/// Card battle tuning.
#[derive(Debug, Clone)]
pub struct BattleTuning {
    /// Cards fielded per side.
    pub roster_size: usize,
    /// Defense added by a Defend action, spent on the next hit.
    pub defend_bonus: u32,
    /// Rolled hit points for drawn cards and padded roster slots.
    pub hp_min: u32,
    pub hp_max: u32,
}

impl Default for BattleTuning {
    fn default() -> Self {
        Self {
            roster_size: 3,
            defend_bonus: 8,
            hp_min: 40,
            hp_max: 80,
        }
    }
}

/// Work and daily reward tuning.
#[derive(Debug, Clone)]
pub struct EconomyTuning {
    pub work_min: i64,
    pub work_max: i64,
    pub daily_reward: i64,
}

impl Default for EconomyTuning {
    fn default() -> Self {
        Self {
            work_min: 50,
            work_max: 150,
            daily_reward: 500,
        }
    }
}

// ---------------------------------------------------------------------------
// Built-in pools
// ---------------------------------------------------------------------------

fn default_card_pool() -> Vec<CardTemplate> {
    let t = |name: &str, attack: u32, defense: u32| CardTemplate {
        name: name.into(),
        attack,
        defense,
    };
    vec![
        t("Fire Elemental", 50, 20),
        t("Water Spirit", 30, 40),
        t("Earth Golem", 20, 50),
        t("Wind Falcon", 40, 30),
        t("Lightning Dragon", 60, 10),
        t("Shadow Assassin", 55, 15),
        t("Holy Knight", 35, 45),
        t("Ice Wizard", 45, 30),
        t("Thunder Titan", 70, 20),
        t("Crystal Guardian", 40, 40),
    ]
}

fn default_pet_pool() -> Vec<Pet> {
    let p = |name: &str, rarity: Rarity, bonus: u32| Pet {
        name: name.into(),
        rarity,
        bonus,
    };
    vec![
        p("Mini Fire Elemental", Rarity::Common, 5),
        p("Water Sprite", Rarity::Common, 5),
        p("Earth Pup", Rarity::Uncommon, 10),
        p("Wind Hawk", Rarity::Uncommon, 10),
        p("Lightning Dragonling", Rarity::Rare, 15),
        p("Mystic Phoenix", Rarity::Epic, 25),
    ]
}
