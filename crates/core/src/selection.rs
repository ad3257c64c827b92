use crate::{
    catalog::RecordSource,
    model::{CardKey, CharacterKey},
};

/// Hard ceiling on deck size, whatever limit a caller passes.
pub const MAX_DECK_SIZE: usize = 6;

/// Entity that can drive the event list
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityRef {
    Character,
    DeckCard(CardKey),
    SingleCard,
}

/// Which card slot a toggle applied to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardSlot {
    Deck,
    Single,
}

/// Result of a card toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardToggle {
    /// Whether the card is in the slot after the call
    pub present: bool,
    /// The slot just filled up ("selection complete")
    pub complete: bool,
}

impl CardToggle {
    fn unchanged(present: bool) -> Self {
        Self {
            present,
            complete: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusOutcome {
    Selected,
    Deselected,
    /// The entity is not currently chosen; nothing changed
    Ignored,
}

/// The current picks and which of them is focused.
///
/// Every mutation validates its key first and degrades to a no-op, so the
/// invariants below hold after any call sequence:
/// - `deck` has at most [`MAX_DECK_SIZE`] entries and no duplicates
/// - `active` only ever references an entity that is present
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    character: Option<CharacterKey>,
    deck: Vec<CardKey>,
    single_card: Option<CardKey>,
    active: Option<EntityRef>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn character(&self) -> Option<&str> {
        self.character.as_deref()
    }

    pub fn deck(&self) -> &[CardKey] {
        &self.deck
    }

    pub fn single_card(&self) -> Option<&str> {
        self.single_card.as_deref()
    }

    pub fn active(&self) -> Option<&EntityRef> {
        self.active.as_ref()
    }

    pub fn is_active(&self, entity: &EntityRef) -> bool {
        self.active.as_ref() == Some(entity)
    }

    /// Nothing chosen in any slot
    pub fn is_empty(&self) -> bool {
        self.character.is_none() && self.deck.is_empty() && self.single_card.is_none()
    }

    pub fn contains(&self, entity: &EntityRef) -> bool {
        match entity {
            EntityRef::Character => self.character.is_some(),
            EntityRef::DeckCard(key) => self.deck.contains(key),
            EntityRef::SingleCard => self.single_card.is_some(),
        }
    }

    /// Present entities in display order: character, deck, single card.
    pub fn entities(&self) -> Vec<EntityRef> {
        let mut entities = Vec::with_capacity(self.deck.len() + 2);
        if self.character.is_some() {
            entities.push(EntityRef::Character);
        }
        entities.extend(self.deck.iter().cloned().map(EntityRef::DeckCard));
        if self.single_card.is_some() {
            entities.push(EntityRef::SingleCard);
        }
        entities
    }

    /// Choose the character. Unknown names are ignored. `active` is untouched.
    pub fn set_character<S: RecordSource + ?Sized>(&mut self, source: &S, key: &str) -> bool {
        if !source.has_character(key) {
            tracing::debug!(key, "ignoring unknown character");
            return false;
        }
        tracing::debug!(key, "character set");
        self.character = Some(key.to_string());
        true
    }

    pub fn clear_character(&mut self) {
        self.character = None;
        if self.active == Some(EntityRef::Character) {
            self.active = None;
        }
    }

    /// Add `key` to the deck, or remove it if already there.
    ///
    /// Adding to a full deck is a silent no-op. Removing never needs the
    /// catalog, so a card whose record vanished can still be taken out.
    pub fn toggle_deck_card<S: RecordSource + ?Sized>(
        &mut self,
        source: &S,
        key: &str,
        limit: usize,
    ) -> CardToggle {
        if let Some(pos) = self.deck.iter().position(|k| k == key) {
            self.deck.remove(pos);
            if self.active.as_ref() == Some(&EntityRef::DeckCard(key.to_string())) {
                self.active = None;
            }
            tracing::debug!(key, size = self.deck.len(), "deck card removed");
            return CardToggle::unchanged(false);
        }

        if !source.has_card(key) {
            tracing::debug!(key, "ignoring unknown card");
            return CardToggle::unchanged(false);
        }

        let limit = limit.min(MAX_DECK_SIZE);
        if self.deck.len() >= limit {
            tracing::debug!(key, limit, "deck full");
            return CardToggle::unchanged(false);
        }

        self.deck.push(key.to_string());
        let complete = self.deck.len() == limit;
        tracing::debug!(key, size = self.deck.len(), complete, "deck card added");
        CardToggle {
            present: true,
            complete,
        }
    }

    /// Set the standalone card, replacing any previous one; the same key clears it.
    pub fn toggle_single_card<S: RecordSource + ?Sized>(
        &mut self,
        source: &S,
        key: &str,
    ) -> CardToggle {
        if self.single_card.as_deref() == Some(key) {
            self.clear_single_card();
            tracing::debug!(key, "single card cleared");
            return CardToggle::unchanged(false);
        }

        if !source.has_card(key) {
            tracing::debug!(key, "ignoring unknown card");
            return CardToggle::unchanged(false);
        }

        if let Some(previous) = self.single_card.replace(key.to_string()) {
            tracing::debug!(previous = %previous, key, "single card replaced");
        } else {
            tracing::debug!(key, "single card set");
        }
        CardToggle {
            present: true,
            complete: true,
        }
    }

    pub fn clear_single_card(&mut self) {
        self.single_card = None;
        if self.active == Some(EntityRef::SingleCard) {
            self.active = None;
        }
    }

    /// Focus an entity, or unfocus it if it already is.
    pub fn focus(&mut self, entity: EntityRef) -> FocusOutcome {
        if !self.contains(&entity) {
            tracing::debug!(?entity, "ignoring focus on absent entity");
            return FocusOutcome::Ignored;
        }

        if self.active.as_ref() == Some(&entity) {
            tracing::debug!(?entity, "entity deselected");
            self.active = None;
            FocusOutcome::Deselected
        } else {
            tracing::debug!(?entity, "entity selected");
            self.active = Some(entity);
            FocusOutcome::Selected
        }
    }

    /// Clear every slot and the focus together.
    pub fn reset(&mut self) {
        tracing::debug!("selection reset");
        *self = Self::default();
    }
}
