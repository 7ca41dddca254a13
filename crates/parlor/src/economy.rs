//! Currency operations outside of sessions.
//!
//! Cooldown bookkeeping for `work` and `daily` belongs to the command
//! layer — these methods pay out whenever called.

use parlor_ledger::LedgerError;
use parlor_types::ParticipantId;
use rand::Rng;

use crate::{GameService, ParlorError};

impl GameService {
    /// Current balance. Unknown participants have balance 0.
    pub fn balance(&self, participant: ParticipantId) -> i64 {
        self.ledger().balance(participant)
    }

    /// Pays out a random work wage and returns the amount earned.
    pub fn work(&self, participant: ParticipantId) -> Result<i64, ParlorError> {
        let tuning = &self.config().economy;
        let earned =
            rand::rng().random_range(tuning.work_min..=tuning.work_max);
        self.ledger().adjust_balance(participant, earned)?;
        Ok(earned)
    }

    /// Pays out the daily reward and returns the amount.
    pub fn daily(&self, participant: ParticipantId) -> Result<i64, ParlorError> {
        let reward = self.config().economy.daily_reward;
        self.ledger().adjust_balance(participant, reward)?;
        Ok(reward)
    }

    /// Transfers `amount` between participants, validated against the
    /// sender's balance.
    pub fn pay(
        &self,
        from: ParticipantId,
        to: ParticipantId,
        amount: i64,
    ) -> Result<(), ParlorError> {
        if amount <= 0 {
            return Err(ParlorError::InvalidArgument(
                "payment amount must be positive".into(),
            ));
        }
        if from == to {
            return Err(ParlorError::InvalidArgument(
                "cannot pay yourself".into(),
            ));
        }
        self.ledger().transfer(from, to, amount)?;
        Ok(())
    }

    /// Admin: credits `amount` out of thin air. Returns the new
    /// balance.
    pub fn grant(
        &self,
        to: ParticipantId,
        amount: i64,
    ) -> Result<i64, ParlorError> {
        if amount <= 0 {
            return Err(ParlorError::InvalidArgument(
                "grant amount must be positive".into(),
            ));
        }
        Ok(self.ledger().adjust_balance(to, amount)?)
    }

    /// Admin: removes up to `amount`, clamped so the balance never
    /// goes below zero. Returns what was actually removed.
    pub fn confiscate(
        &self,
        from: ParticipantId,
        amount: i64,
    ) -> Result<i64, ParlorError> {
        if amount <= 0 {
            return Err(ParlorError::InvalidArgument(
                "confiscation amount must be positive".into(),
            ));
        }
        let balance = self.ledger().balance(from);
        let removed = amount.min(balance.max(0));
        if removed > 0 {
            self.ledger().adjust_balance(from, -removed)?;
        }
        Ok(removed)
    }

    /// The `n` richest participants, descending.
    pub fn leaderboard(&self, n: usize) -> Vec<(ParticipantId, i64)> {
        self.ledger().top_balances(n)
    }

    /// Validates an arcade or session bet against a balance.
    pub(crate) fn check_bet(
        &self,
        participant: ParticipantId,
        bet: i64,
    ) -> Result<(), ParlorError> {
        if bet <= 0 {
            return Err(ParlorError::InvalidArgument(
                "bet must be positive".into(),
            ));
        }
        let balance = self.ledger().balance(participant);
        if balance < bet {
            return Err(LedgerError::InsufficientBalance {
                participant,
                balance,
                required: bet,
            }
            .into());
        }
        Ok(())
    }
}
