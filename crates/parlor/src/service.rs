//! `GameService`: the facade the command-dispatch layer talks to.

use std::sync::Arc;

use parlor_games::{Action, GameSession, SessionSnapshot, blackjack, battle};
use parlor_ledger::{Ledger, LedgerError};
use parlor_session::{SessionError, SessionRegistry};
use parlor_types::{Card, GameVariant, ParticipantId, SessionId};
use rand::Rng;
use rand::seq::IndexedRandom;
use tokio::sync::{Mutex, mpsc};

use crate::settlement::SettlementEngine;
use crate::{ParlorError, ServiceConfig};

/// Per-match settings supplied at [`GameService::start_game`].
#[derive(Debug, Clone, Default)]
pub struct MatchRules {
    /// Stake for betting variants; zero means a friendly match. Card
    /// battles take no bet and reject a non-zero one.
    pub bet: u64,
    /// Explicit blackjack draw order (tests/replays). Ignored by the
    /// other variants.
    pub deck: Option<Vec<u8>>,
}

impl MatchRules {
    /// Rules for a match with a stake.
    pub fn bet(bet: u64) -> Self {
        Self {
            bet,
            ..Self::default()
        }
    }
}

/// Coordinates sessions, the ledger, and settlement.
///
/// One instance per process. Cheap to share behind an `Arc`; every
/// method takes `&self`.
pub struct GameService {
    config: ServiceConfig,
    ledger: Arc<Ledger>,
    registry: Arc<Mutex<SessionRegistry>>,
    settlement: SettlementEngine,
    releases: mpsc::UnboundedSender<SessionId>,
}

impl GameService {
    /// Opens the ledger and starts the reaper task. Must be called
    /// from within a Tokio runtime.
    pub fn new(config: ServiceConfig) -> Result<Self, ParlorError> {
        let config = config.validated();
        let ledger = Arc::new(Ledger::open(&config.data_dir)?);
        let registry = Arc::new(Mutex::new(SessionRegistry::new()));
        let settlement = SettlementEngine::new(
            Arc::clone(&ledger),
            config.settlement.clone(),
        );

        // Reaper: table actors report their exit (terminal or timeout)
        // on this channel; releasing here frees the participants even
        // when no router call is in flight.
        let (releases, mut release_rx) = mpsc::unbounded_channel();
        let reaper_registry = Arc::clone(&registry);
        tokio::spawn(async move {
            while let Some(session_id) = release_rx.recv().await {
                reaper_registry.lock().await.release(session_id);
            }
        });

        Ok(Self {
            config,
            ledger,
            registry,
            settlement,
            releases,
        })
    }

    /// The shared ledger.
    pub fn ledger(&self) -> &Arc<Ledger> {
        &self.ledger
    }

    pub(crate) fn config(&self) -> &ServiceConfig {
        &self.config
    }

    // -- Session lifecycle ------------------------------------------------

    /// Starts a match between two distinct participants.
    ///
    /// Bets are validated against both balances here and debited only
    /// at settlement — nothing is escrowed, so a timeout or draw has
    /// nothing to refund.
    pub async fn start_game(
        &self,
        variant: GameVariant,
        participants: [ParticipantId; 2],
        rules: MatchRules,
    ) -> Result<SessionId, ParlorError> {
        let [challenger, challenged] = participants;
        if challenger == challenged {
            return Err(ParlorError::InvalidArgument(
                "a participant cannot play against themselves".into(),
            ));
        }

        if variant == GameVariant::CardBattle {
            if rules.bet != 0 {
                return Err(ParlorError::InvalidArgument(
                    "card battles do not take a bet".into(),
                ));
            }
        } else if rules.bet > 0 {
            for participant in participants {
                let balance = self.ledger.balance(participant);
                if balance < rules.bet as i64 {
                    return Err(LedgerError::InsufficientBalance {
                        participant,
                        balance,
                        required: rules.bet as i64,
                    }
                    .into());
                }
            }
        }

        let game = match variant {
            GameVariant::TicTacToe => {
                GameSession::tic_tac_toe(participants, rules.bet)
            }
            GameVariant::Blackjack => GameSession::blackjack(
                participants,
                rules.bet,
                blackjack::Config { deck: rules.deck },
            ),
            GameVariant::RockPaperScissors => {
                GameSession::rock_paper_scissors(participants, rules.bet)
            }
            GameVariant::CardBattle => GameSession::card_battle(
                participants,
                battle::Config {
                    rosters: [
                        self.build_roster(challenger),
                        self.build_roster(challenged),
                    ],
                    defend_bonus: self.config.battle.defend_bonus,
                },
            ),
        };

        let timeout = self.config.timeouts.for_variant(variant);
        let handle = self.registry.lock().await.open(
            game,
            Some(timeout),
            self.releases.clone(),
        )?;

        tracing::info!(
            session_id = %handle.session_id(),
            %variant,
            %challenger,
            %challenged,
            bet = rules.bet,
            "match started"
        );
        Ok(handle.session_id())
    }

    /// Routes one player action into their session.
    ///
    /// On a terminal transition this settles the outcome (exactly once
    /// — the session emits it a single time) and releases both
    /// participants.
    pub async fn submit_action(
        &self,
        session_id: SessionId,
        actor: ParticipantId,
        action: Action,
    ) -> Result<SessionSnapshot, ParlorError> {
        // Narrow lock: clone the handle, then talk to the actor
        // without holding the registry.
        let handle = self
            .registry
            .lock()
            .await
            .handle(session_id)
            .ok_or(ParlorError::Session(SessionError::NotFound(session_id)))?;

        match handle.submit(actor, action).await {
            Ok(reply) => {
                if let Some(outcome) = reply.outcome {
                    if let Err(e) = self.settlement.settle(session_id, &outcome)
                    {
                        // The match result stands; only the payout is
                        // lost. Never take down other sessions for it.
                        tracing::error!(
                            %session_id,
                            error = %e,
                            "settlement failed"
                        );
                    }
                    self.registry.lock().await.release(session_id);
                }
                Ok(reply.snapshot)
            }
            // A dead actor behind a registered handle means the session
            // ended between lookup and delivery. Tidy up and report it
            // gone.
            Err(SessionError::Unavailable(_)) => {
                self.registry.lock().await.release(session_id);
                Err(ParlorError::Session(SessionError::NotFound(session_id)))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// The current snapshot of a live session, for rendering.
    pub async fn snapshot(
        &self,
        session_id: SessionId,
    ) -> Result<SessionSnapshot, ParlorError> {
        let handle = self
            .registry
            .lock()
            .await
            .handle(session_id)
            .ok_or(ParlorError::Session(SessionError::NotFound(session_id)))?;

        handle.snapshot().await.map_err(|e| match e {
            SessionError::Unavailable(_) => {
                ParlorError::Session(SessionError::NotFound(session_id))
            }
            other => other.into(),
        })
    }

    /// The session a participant is currently playing in, if any.
    pub async fn active_session(
        &self,
        participant: ParticipantId,
    ) -> Option<SessionId> {
        self.registry.lock().await.participant_session(&participant)
    }

    /// Number of live sessions.
    pub async fn session_count(&self) -> usize {
        self.registry.lock().await.session_count()
    }

    // -- Roster construction ----------------------------------------------

    /// Builds a battle roster of working copies: the participant's own
    /// cards first, padded from the pool. The clones (and anything
    /// that happens to them in the battle) never flow back into the
    /// inventory.
    fn build_roster(&self, participant: ParticipantId) -> Vec<Card> {
        let tuning = &self.config.battle;
        let mut roster: Vec<Card> = self
            .ledger
            .cards(participant)
            .into_iter()
            .take(tuning.roster_size)
            .collect();
        for card in &mut roster {
            card.temp_defense = 0;
        }

        let mut rng = rand::rng();
        while roster.len() < tuning.roster_size {
            let template = self
                .config
                .card_pool
                .choose(&mut rng)
                .expect("validated config has a non-empty card pool");
            let hit_points = rng.random_range(tuning.hp_min..=tuning.hp_max);
            roster.push(template.instantiate(hit_points));
        }
        roster
    }
}
