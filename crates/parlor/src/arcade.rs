//! Instant house games: no session, one call, ledger settled on the
//! spot. Bets are validated before any roll so a loss can always be
//! debited.

use parlor_types::ParticipantId;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::{GameService, ParlorError};

/// Payout multiplier for an exact dice guess.
const DICE_MULTIPLIER: i64 = 6;
/// Payout multiplier for three of a kind on the slots.
const SLOTS_TRIPLE_MULTIPLIER: i64 = 5;
/// Payout multiplier for an exact roulette number, the classic 35:1.
const ROULETTE_NUMBER_MULTIPLIER: i64 = 35;
/// Payout multiplier for a winning roulette color.
const ROULETTE_COLOR_MULTIPLIER: i64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoinSide {
    Heads,
    Tails,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotSymbol {
    Cherry,
    Lemon,
    Grape,
    Melon,
    Star,
    Seven,
}

/// A roulette wager: an exact number or a color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouletteWager {
    Number(u8),
    Red,
    Black,
}

/// The result of one arcade round. `delta` is the signed ledger
/// effect; `balance` is the balance after applying it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArcadeRound<T> {
    pub rolled: T,
    pub delta: i64,
    pub balance: i64,
}

impl GameService {
    /// Coinflip: call it right to win the bet, wrong to lose it.
    pub fn coinflip(
        &self,
        participant: ParticipantId,
        bet: i64,
        call: CoinSide,
    ) -> Result<ArcadeRound<CoinSide>, ParlorError> {
        self.check_bet(participant, bet)?;

        let landed = if rand::rng().random_bool(0.5) {
            CoinSide::Heads
        } else {
            CoinSide::Tails
        };
        let delta = if landed == call { bet } else { -bet };
        let balance = self.ledger().adjust_balance(participant, delta)?;
        Ok(ArcadeRound {
            rolled: landed,
            delta,
            balance,
        })
    }

    /// Dice: with a guess, an exact match pays 6x and a miss loses the
    /// bet. Without a guess the roll is informational and free.
    pub fn dice(
        &self,
        participant: ParticipantId,
        bet: i64,
        guess: Option<u8>,
    ) -> Result<ArcadeRound<u8>, ParlorError> {
        self.check_bet(participant, bet)?;
        if let Some(guess) = guess {
            if !(1..=6).contains(&guess) {
                return Err(ParlorError::InvalidArgument(
                    "dice guess must be 1-6".into(),
                ));
            }
        }

        let rolled = rand::rng().random_range(1..=6u8);
        let delta = match guess {
            None => 0,
            Some(guess) if guess == rolled => bet * DICE_MULTIPLIER,
            Some(_) => -bet,
        };
        let balance = if delta != 0 {
            self.ledger().adjust_balance(participant, delta)?
        } else {
            self.ledger().balance(participant)
        };
        Ok(ArcadeRound {
            rolled,
            delta,
            balance,
        })
    }

    /// Slots: three of a kind pays 5x, a pair pays 1.5x (floored),
    /// anything else loses the bet.
    pub fn slots(
        &self,
        participant: ParticipantId,
        bet: i64,
    ) -> Result<ArcadeRound<[SlotSymbol; 3]>, ParlorError> {
        self.check_bet(participant, bet)?;

        const REEL: [SlotSymbol; 6] = [
            SlotSymbol::Cherry,
            SlotSymbol::Lemon,
            SlotSymbol::Grape,
            SlotSymbol::Melon,
            SlotSymbol::Star,
            SlotSymbol::Seven,
        ];
        let mut rng = rand::rng();
        let reels = [
            *REEL.choose(&mut rng).expect("reel is non-empty"),
            *REEL.choose(&mut rng).expect("reel is non-empty"),
            *REEL.choose(&mut rng).expect("reel is non-empty"),
        ];

        let distinct = {
            let mut symbols = reels.to_vec();
            symbols.sort_by_key(|s| *s as u8);
            symbols.dedup();
            symbols.len()
        };
        let delta = match distinct {
            1 => bet * SLOTS_TRIPLE_MULTIPLIER,
            2 => bet * 3 / 2,
            _ => -bet,
        };
        let balance = self.ledger().adjust_balance(participant, delta)?;
        Ok(ArcadeRound {
            rolled: reels,
            delta,
            balance,
        })
    }

    /// Roulette over 0-36. An exact number pays 35x, a color pays 2x.
    /// Even results count as red in this house.
    pub fn roulette(
        &self,
        participant: ParticipantId,
        bet: i64,
        wager: RouletteWager,
    ) -> Result<ArcadeRound<u8>, ParlorError> {
        self.check_bet(participant, bet)?;
        if let RouletteWager::Number(n) = wager {
            if n > 36 {
                return Err(ParlorError::InvalidArgument(
                    "roulette number must be 0-36".into(),
                ));
            }
        }

        let rolled = rand::rng().random_range(0..=36u8);
        let won = match wager {
            RouletteWager::Number(n) => n == rolled,
            RouletteWager::Red => rolled % 2 == 0,
            RouletteWager::Black => rolled % 2 == 1,
        };
        let delta = match (won, wager) {
            (false, _) => -bet,
            (true, RouletteWager::Number(_)) => bet * ROULETTE_NUMBER_MULTIPLIER,
            (true, _) => bet * ROULETTE_COLOR_MULTIPLIER,
        };
        let balance = self.ledger().adjust_balance(participant, delta)?;
        Ok(ArcadeRound {
            rolled,
            delta,
            balance,
        })
    }
}
