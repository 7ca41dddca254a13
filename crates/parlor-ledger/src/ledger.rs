//! The ledger service: balances, card inventories, pet inventories.

use std::fs;
use std::path::Path;

use parlor_types::{Card, ParticipantId, Pet};

use crate::LedgerError;
use crate::store::Store;

/// Durable store of per-participant currency and collectibles.
///
/// One instance is shared by every session and every economy command.
/// Callers never hold references into the internal collections — all
/// reads return clones, all writes go through atomic operations.
pub struct Ledger {
    balances: Store<i64>,
    cards: Store<Vec<Card>>,
    pets: Store<Vec<Pet>>,
}

impl Ledger {
    /// Opens (or creates) the ledger in `dir`.
    ///
    /// Creates the directory if needed, then loads the three store
    /// files. Corrupt files are backed up and skipped — opening never
    /// fails because of bad data, only because the directory itself
    /// cannot be created.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, LedgerError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let ledger = Self {
            balances: Store::open(dir.join("balances.json")),
            cards: Store::open(dir.join("cards.json")),
            pets: Store::open(dir.join("pets.json")),
        };
        tracing::info!(dir = %dir.display(), "ledger opened");
        Ok(ledger)
    }

    // -- Balances ---------------------------------------------------------

    /// Current balance for `id`. Unknown participants have balance 0.
    pub fn balance(&self, id: ParticipantId) -> i64 {
        self.balances.get(id).unwrap_or(0)
    }

    /// Adds `delta` (which may be negative) to the balance and returns
    /// the new value. Persisted before returning.
    pub fn adjust_balance(
        &self,
        id: ParticipantId,
        delta: i64,
    ) -> Result<i64, LedgerError> {
        let new_balance = self.balances.mutate(|map| {
            let balance = map.entry(id).or_insert(0);
            *balance += delta;
            *balance
        })?;
        tracing::debug!(%id, delta, new_balance, "balance adjusted");
        Ok(new_balance)
    }

    /// Moves `amount` from one participant to another in a single
    /// atomic store mutation. Fails with `InsufficientBalance` if the
    /// sender cannot cover it, leaving both balances untouched.
    pub fn transfer(
        &self,
        from: ParticipantId,
        to: ParticipantId,
        amount: i64,
    ) -> Result<(), LedgerError> {
        self.balances.try_mutate(|map| {
            let available = map.get(&from).copied().unwrap_or(0);
            if available < amount {
                return Err(LedgerError::InsufficientBalance {
                    participant: from,
                    balance: available,
                    required: amount,
                });
            }
            *map.entry(from).or_insert(0) -= amount;
            *map.entry(to).or_insert(0) += amount;
            Ok(())
        })?;
        tracing::debug!(%from, %to, amount, "transfer applied");
        Ok(())
    }

    /// The `n` largest balances, descending. Ties order by id so the
    /// result is stable.
    pub fn top_balances(&self, n: usize) -> Vec<(ParticipantId, i64)> {
        self.balances.read(|map| {
            let mut entries: Vec<_> =
                map.iter().map(|(id, bal)| (*id, *bal)).collect();
            entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
            entries.truncate(n);
            entries
        })
    }

    // -- Cards ------------------------------------------------------------

    /// The participant's cards, in acquisition order. Empty for unknown
    /// participants.
    pub fn cards(&self, id: ParticipantId) -> Vec<Card> {
        self.cards.get(id).unwrap_or_default()
    }

    /// Appends a card to the participant's inventory.
    pub fn append_card(
        &self,
        id: ParticipantId,
        card: Card,
    ) -> Result<(), LedgerError> {
        self.cards.mutate(|map| {
            map.entry(id).or_default().push(card);
        })
    }

    /// Removes the first card equal to `card` from the inventory.
    /// Returns `true` if one was found and removed.
    pub fn remove_card(
        &self,
        id: ParticipantId,
        card: &Card,
    ) -> Result<bool, LedgerError> {
        self.cards.mutate(|map| {
            let Some(inventory) = map.get_mut(&id) else {
                return false;
            };
            let Some(pos) = inventory.iter().position(|c| c == card) else {
                return false;
            };
            inventory.remove(pos);
            if inventory.is_empty() {
                map.remove(&id);
            }
            true
        })
    }

    // -- Pets -------------------------------------------------------------

    /// The participant's pets, in acquisition order.
    pub fn pets(&self, id: ParticipantId) -> Vec<Pet> {
        self.pets.get(id).unwrap_or_default()
    }

    /// Appends a pet to the participant's inventory.
    pub fn append_pet(
        &self,
        id: ParticipantId,
        pet: Pet,
    ) -> Result<(), LedgerError> {
        self.pets.mutate(|map| {
            map.entry(id).or_default().push(pet);
        })
    }

    /// Removes and returns the pet at `index`, or `None` if the index
    /// is out of range.
    pub fn remove_pet_at(
        &self,
        id: ParticipantId,
        index: usize,
    ) -> Result<Option<Pet>, LedgerError> {
        self.pets.mutate(|map| {
            let Some(inventory) = map.get_mut(&id) else {
                return None;
            };
            if index >= inventory.len() {
                return None;
            }
            let pet = inventory.remove(index);
            if inventory.is_empty() {
                map.remove(&id);
            }
            Some(pet)
        })
    }
}
