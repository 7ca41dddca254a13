//! Settlement: applying a match outcome to the ledger.

use std::sync::Arc;

use parlor_ledger::{Ledger, LedgerError};
use parlor_types::{GameVariant, SessionId};

use parlor_games::MatchOutcome;

/// Settlement amounts.
///
/// Battle reward and penalty are independent values — a battle's net
/// effect on the economy need not be zero.
#[derive(Debug, Clone)]
pub struct SettlementConfig {
    /// Credited to a card battle's winner.
    pub battle_reward: i64,
    /// Debited from a card battle's loser.
    pub battle_penalty: i64,
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            battle_reward: 200,
            battle_penalty: 100,
        }
    }
}

/// Applies match outcomes to the ledger.
///
/// Exactly-once is guaranteed upstream: the session emits its outcome
/// a single time (settled flag), so this engine sees each session at
/// most once. Bets were validated at session start and were never
/// escrowed, so a draw or timeout has nothing to refund.
pub struct SettlementEngine {
    ledger: Arc<Ledger>,
    config: SettlementConfig,
}

impl SettlementEngine {
    pub fn new(ledger: Arc<Ledger>, config: SettlementConfig) -> Self {
        Self { ledger, config }
    }

    /// Applies the ledger effects of one finished match.
    pub fn settle(
        &self,
        session_id: SessionId,
        outcome: &MatchOutcome,
    ) -> Result<(), LedgerError> {
        let (Some(winner), Some(loser)) = (outcome.winner, outcome.loser())
        else {
            tracing::info!(%session_id, variant = %outcome.variant, "draw, no transfer");
            return Ok(());
        };

        let (credit, debit) = match outcome.variant {
            GameVariant::CardBattle => {
                (self.config.battle_reward, self.config.battle_penalty)
            }
            GameVariant::TicTacToe
            | GameVariant::Blackjack
            | GameVariant::RockPaperScissors => {
                if outcome.bet == 0 {
                    tracing::info!(
                        %session_id,
                        variant = %outcome.variant,
                        %winner,
                        "friendly match, no transfer"
                    );
                    return Ok(());
                }
                (outcome.bet as i64, outcome.bet as i64)
            }
        };

        self.ledger.adjust_balance(winner, credit)?;
        self.ledger.adjust_balance(loser, -debit)?;
        tracing::info!(
            %session_id,
            variant = %outcome.variant,
            %winner,
            %loser,
            credit,
            debit,
            "session settled"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parlor_types::ParticipantId;

    fn pid(id: u64) -> ParticipantId {
        ParticipantId(id)
    }

    fn engine() -> (SettlementEngine, Arc<Ledger>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let ledger = Arc::new(Ledger::open(dir.path()).unwrap());
        let engine =
            SettlementEngine::new(Arc::clone(&ledger), SettlementConfig::default());
        (engine, ledger, dir)
    }

    fn outcome(
        variant: GameVariant,
        winner: Option<u64>,
        bet: u64,
    ) -> MatchOutcome {
        MatchOutcome {
            variant,
            participants: [pid(1), pid(2)],
            winner: winner.map(pid),
            bet,
        }
    }

    #[test]
    fn test_bet_match_moves_the_bet() {
        let (engine, ledger, _dir) = engine();
        engine
            .settle(SessionId(1), &outcome(GameVariant::Blackjack, Some(1), 50))
            .unwrap();

        assert_eq!(ledger.balance(pid(1)), 50);
        assert_eq!(ledger.balance(pid(2)), -50);
    }

    #[test]
    fn test_draw_moves_nothing() {
        let (engine, ledger, _dir) = engine();
        engine
            .settle(SessionId(1), &outcome(GameVariant::TicTacToe, None, 50))
            .unwrap();

        assert_eq!(ledger.balance(pid(1)), 0);
        assert_eq!(ledger.balance(pid(2)), 0);
    }

    #[test]
    fn test_friendly_match_moves_nothing() {
        let (engine, ledger, _dir) = engine();
        engine
            .settle(
                SessionId(1),
                &outcome(GameVariant::RockPaperScissors, Some(2), 0),
            )
            .unwrap();

        assert_eq!(ledger.balance(pid(1)), 0);
        assert_eq!(ledger.balance(pid(2)), 0);
    }

    #[test]
    fn test_battle_uses_independent_reward_and_penalty() {
        let (engine, ledger, _dir) = engine();
        engine
            .settle(SessionId(1), &outcome(GameVariant::CardBattle, Some(2), 0))
            .unwrap();

        assert_eq!(ledger.balance(pid(2)), 200);
        assert_eq!(ledger.balance(pid(1)), -100);
    }
}
