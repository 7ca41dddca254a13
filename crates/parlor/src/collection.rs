//! Card and pet collection operations.

use parlor_types::{Card, ParticipantId, Pet};
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::{GameService, ParlorError};

impl GameService {
    /// Draws a random card from the pool into the inventory and
    /// returns it. Hit points are rolled per copy.
    pub fn draw_card(&self, participant: ParticipantId) -> Result<Card, ParlorError> {
        let mut rng = rand::rng();
        let template = self
            .config()
            .card_pool
            .choose(&mut rng)
            .expect("validated config has a non-empty card pool");
        let tuning = &self.config().battle;
        let card = template
            .instantiate(rng.random_range(tuning.hp_min..=tuning.hp_max));

        self.ledger().append_card(participant, card.clone())?;
        tracing::debug!(%participant, card = %card.name, "card drawn");
        Ok(card)
    }

    /// The participant's card inventory, in acquisition order.
    pub fn cards(&self, participant: ParticipantId) -> Vec<Card> {
        self.ledger().cards(participant)
    }

    /// Sells the first owned card with this name (case-insensitive).
    /// Returns the card and the sale price.
    pub fn sell_card(
        &self,
        participant: ParticipantId,
        name: &str,
    ) -> Result<(Card, i64), ParlorError> {
        let card = self
            .ledger()
            .cards(participant)
            .into_iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| {
                ParlorError::InvalidArgument(format!(
                    "no card named `{name}` in the inventory"
                ))
            })?;

        let price = sale_price(&card);
        if !self.ledger().remove_card(participant, &card)? {
            // Sold out from under us between the read and the remove.
            return Err(ParlorError::InvalidArgument(format!(
                "no card named `{name}` in the inventory"
            )));
        }
        self.ledger().adjust_balance(participant, price)?;
        tracing::debug!(%participant, card = %card.name, price, "card sold");
        Ok((card, price))
    }

    /// Collects a random pet from the pool into the inventory.
    pub fn collect_pet(&self, participant: ParticipantId) -> Result<Pet, ParlorError> {
        let pet = self
            .config()
            .pet_pool
            .choose(&mut rand::rng())
            .expect("validated config has a non-empty pet pool")
            .clone();

        self.ledger().append_pet(participant, pet.clone())?;
        tracing::debug!(%participant, pet = %pet.name, "pet collected");
        Ok(pet)
    }

    /// The participant's pets, in acquisition order.
    pub fn pets(&self, participant: ParticipantId) -> Vec<Pet> {
        self.ledger().pets(participant)
    }

    /// Releases the pet at `index` (zero-based) and returns it.
    pub fn release_pet(
        &self,
        participant: ParticipantId,
        index: usize,
    ) -> Result<Pet, ParlorError> {
        self.ledger()
            .remove_pet_at(participant, index)?
            .ok_or_else(|| {
                ParlorError::InvalidArgument(format!("no pet at index {index}"))
            })
    }
}

/// Half the combat stats plus a small hit point factor.
fn sale_price(card: &Card) -> i64 {
    ((card.attack + card.defense) / 2 + card.hit_points / 20) as i64
}
