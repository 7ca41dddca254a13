//! Session registry: reserves participants, tracks live sessions.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parlor_games::GameSession;
use parlor_types::{ParticipantId, SessionId};
use tokio::sync::mpsc;

use crate::SessionError;
use crate::table::{SessionHandle, spawn_table};

/// Counter for allocating session ids.
static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// Default command channel size for table actors.
const DEFAULT_CHANNEL_SIZE: usize = 64;

/// Tracks which participants currently hold an active session and owns
/// the handle to every live table actor.
///
/// A participant can be in at most ONE session at a time (key
/// invariant). The registry is not thread-safe by itself — it uses
/// plain `HashMap`s and is guarded by a mutex one level up, which is
/// exactly what makes check-then-register a single critical section.
pub struct SessionRegistry {
    /// Live sessions, keyed by session id.
    sessions: HashMap<SessionId, SessionHandle>,

    /// Maps each participant to the session they are playing in.
    members: HashMap<ParticipantId, SessionId>,
}

impl SessionRegistry {
    /// Creates a new, empty registry.
    pub fn new() -> Self {
        Self {
            sessions: HashMap::new(),
            members: HashMap::new(),
        }
    }

    /// Reserves the game's participants and spawns its table actor.
    ///
    /// All-or-nothing: if any participant is already registered,
    /// nothing changes and the reservation fails. Exit notifications
    /// (terminal or timeout) are delivered on `releases`.
    pub fn open(
        &mut self,
        game: GameSession,
        turn_timeout: Option<Duration>,
        releases: mpsc::UnboundedSender<SessionId>,
    ) -> Result<SessionHandle, SessionError> {
        let participants = game.participants();
        for participant in participants {
            if self.members.contains_key(&participant) {
                return Err(SessionError::AlreadyInSession(participant));
            }
        }

        let session_id = SessionId(NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed));
        let handle = spawn_table(
            session_id,
            game,
            turn_timeout,
            releases,
            DEFAULT_CHANNEL_SIZE,
        );
        self.sessions.insert(session_id, handle.clone());
        for participant in participants {
            self.members.insert(participant, session_id);
        }

        tracing::info!(
            %session_id,
            a = %participants[0],
            b = %participants[1],
            "session registered"
        );
        Ok(handle)
    }

    /// Releases a session: drops its handle and frees its participants.
    ///
    /// Idempotent — releasing an unknown or already-released session is
    /// a no-op. Dropping the last handle closes the actor's channel,
    /// which stops it if it is somehow still running.
    pub fn release(&mut self, session_id: SessionId) {
        if self.sessions.remove(&session_id).is_some() {
            tracing::info!(%session_id, "session released");
        }
        self.members.retain(|_, sid| *sid != session_id);
    }

    /// The handle for a live session, if any.
    pub fn handle(&self, session_id: SessionId) -> Option<SessionHandle> {
        self.sessions.get(&session_id).cloned()
    }

    /// The session a participant is currently playing in, if any.
    pub fn participant_session(
        &self,
        participant: &ParticipantId,
    ) -> Option<SessionId> {
        self.members.get(participant).copied()
    }

    /// Number of live sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Ids of all live sessions.
    pub fn session_ids(&self) -> Vec<SessionId> {
        self.sessions.keys().copied().collect()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
