//! Property-based invariant tests for the selection store.
//!
//! For any sequence of operations:
//!
//! 1. The deck never exceeds its limit and never holds duplicates.
//! 2. Adding then removing a card restores the deck exactly.
//! 3. The focused entity is always one that is present.
//! 4. Reset always yields the empty state.
//! 5. Single-card toggles replace on a new key and clear on the same key.
//! 6. Focusing twice toggles off; focusing a different entity overwrites.

use cavala_core::{
    Catalog, CardRecord, CharacterRecord, EntityRef, EventBook, FocusOutcome, SelectionState,
    MAX_DECK_SIZE,
};
use proptest::prelude::*;
use std::collections::HashSet;

// ── Helpers ─────────────────────────────────────────────────────────────

const CARD_POOL: usize = 10;

fn catalog() -> Catalog {
    let cards = (0..CARD_POOL).map(|i| CardRecord {
        name: format!("Card {i}"),
        image: card_key(i),
        events: EventBook::new(),
    });
    let characters = ["Haru", "Kita"].into_iter().map(|name| CharacterRecord {
        name: name.to_string(),
        image: String::new(),
        events: EventBook::new(),
    });
    Catalog::from_records(cards, characters)
}

fn card_key(i: usize) -> String {
    format!("c{i}.png")
}

#[derive(Debug, Clone)]
enum Op {
    SetCharacter(usize),
    ToggleDeck(usize),
    ToggleSingle(usize),
    FocusCharacter,
    FocusDeck(usize),
    FocusSingle,
    ClearCharacter,
    Reset,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    // Indices past CARD_POOL exercise unknown keys.
    prop_oneof![
        1 => (0usize..3).prop_map(Op::SetCharacter),
        4 => (0usize..CARD_POOL + 2).prop_map(Op::ToggleDeck),
        1 => (0usize..CARD_POOL + 2).prop_map(Op::ToggleSingle),
        1 => Just(Op::FocusCharacter),
        2 => (0usize..CARD_POOL + 2).prop_map(Op::FocusDeck),
        1 => Just(Op::FocusSingle),
        1 => Just(Op::ClearCharacter),
        1 => Just(Op::Reset),
    ]
}

fn apply(selection: &mut SelectionState, catalog: &Catalog, op: &Op) {
    let names = ["Haru", "Kita", "Nobody"];
    match op {
        Op::SetCharacter(i) => {
            selection.set_character(catalog, names[*i]);
        }
        Op::ToggleDeck(i) => {
            selection.toggle_deck_card(catalog, &card_key(*i), MAX_DECK_SIZE);
        }
        Op::ToggleSingle(i) => {
            selection.toggle_single_card(catalog, &card_key(*i));
        }
        Op::FocusCharacter => {
            selection.focus(EntityRef::Character);
        }
        Op::FocusDeck(i) => {
            selection.focus(EntityRef::DeckCard(card_key(*i)));
        }
        Op::FocusSingle => {
            selection.focus(EntityRef::SingleCard);
        }
        Op::ClearCharacter => selection.clear_character(),
        Op::Reset => selection.reset(),
    }
}

fn assert_invariants(selection: &SelectionState) -> Result<(), TestCaseError> {
    prop_assert!(selection.deck().len() <= MAX_DECK_SIZE);
    let unique: HashSet<&String> = selection.deck().iter().collect();
    prop_assert_eq!(unique.len(), selection.deck().len(), "duplicate deck keys");
    if let Some(active) = selection.active() {
        prop_assert!(
            selection.contains(active),
            "active {:?} is not present in {:?}",
            active,
            selection
        );
    }
    Ok(())
}

// ═════════════════════════════════════════════════════════════════════════
// 1 + 3. Structural invariants hold after every operation
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn invariants_hold_for_any_sequence(ops in prop::collection::vec(op_strategy(), 0..80)) {
        let catalog = catalog();
        let mut selection = SelectionState::new();
        for op in &ops {
            apply(&mut selection, &catalog, op);
            assert_invariants(&selection)?;
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Add then remove restores the deck
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn add_then_remove_is_identity(
        ops in prop::collection::vec(op_strategy(), 0..40),
        extra in 0usize..CARD_POOL,
    ) {
        let catalog = catalog();
        let mut selection = SelectionState::new();
        for op in &ops {
            apply(&mut selection, &catalog, op);
        }

        let key = card_key(extra);
        prop_assume!(!selection.deck().contains(&key));
        prop_assume!(selection.deck().len() < MAX_DECK_SIZE);

        let before = selection.deck().to_vec();
        let added = selection.toggle_deck_card(&catalog, &key, MAX_DECK_SIZE);
        prop_assert!(added.present);
        let removed = selection.toggle_deck_card(&catalog, &key, MAX_DECK_SIZE);
        prop_assert!(!removed.present);
        prop_assert_eq!(selection.deck(), before.as_slice());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Reset always empties
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn reset_always_empties(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let catalog = catalog();
        let mut selection = SelectionState::new();
        for op in &ops {
            apply(&mut selection, &catalog, op);
        }
        selection.reset();
        prop_assert_eq!(selection.character(), None);
        prop_assert!(selection.deck().is_empty());
        prop_assert_eq!(selection.single_card(), None);
        prop_assert_eq!(selection.active(), None);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Single card replace vs toggle-off
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn single_card_replace_semantics(a in 0usize..CARD_POOL, b in 0usize..CARD_POOL) {
        let catalog = catalog();
        let mut selection = SelectionState::new();
        selection.toggle_single_card(&catalog, &card_key(a));
        selection.toggle_single_card(&catalog, &card_key(b));
        if a == b {
            prop_assert_eq!(selection.single_card(), None);
        } else {
            let expected = card_key(b);
            prop_assert_eq!(selection.single_card(), Some(expected.as_str()));
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Focus toggles off on repeat, overwrites otherwise
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn focus_toggle_and_overwrite(x in 0usize..MAX_DECK_SIZE, y in 0usize..MAX_DECK_SIZE) {
        let catalog = catalog();
        let mut selection = SelectionState::new();
        for i in 0..MAX_DECK_SIZE {
            selection.toggle_deck_card(&catalog, &card_key(i), MAX_DECK_SIZE);
        }

        let ex = EntityRef::DeckCard(card_key(x));
        let ey = EntityRef::DeckCard(card_key(y));
        prop_assert_eq!(selection.focus(ex.clone()), FocusOutcome::Selected);
        let second = selection.focus(ey.clone());
        if x == y {
            prop_assert_eq!(second, FocusOutcome::Deselected);
            prop_assert_eq!(selection.active(), None);
        } else {
            prop_assert_eq!(second, FocusOutcome::Selected);
            prop_assert_eq!(selection.active(), Some(&ey));
        }
        prop_assert_eq!(selection.deck().len(), MAX_DECK_SIZE);
    }
}

#[test]
fn seventh_distinct_card_is_ignored() {
    let catalog = catalog();
    let mut selection = SelectionState::new();
    let mut completions = 0;
    for i in 0..7 {
        if selection
            .toggle_deck_card(&catalog, &card_key(i), MAX_DECK_SIZE)
            .complete
        {
            completions += 1;
        }
    }
    assert_eq!(selection.deck().len(), 6);
    assert_eq!(completions, 1);
    assert!(!selection.deck().contains(&card_key(6)));
}
