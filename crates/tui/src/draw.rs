use cavala_core::{CardSlot, CategoryView, EntityRef, RenderSink};

/// One row of the event list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventRow {
    Header(String),
    Item { title: String, detail: String },
}

/// Terminal-side copy of everything the session pushed.
///
/// Highlights arrive before the event list on every refresh, so they are
/// staged and only committed when the list (or the hint) lands. That drops
/// highlights for entities that are no longer chosen.
#[derive(Debug, Clone, Default)]
pub struct DrawState {
    highlights: Vec<(EntityRef, bool)>,
    staged_highlights: Vec<(EntityRef, bool)>,
    rows: Vec<EventRow>,
    hint_visible: bool,
    completed: Option<CardSlot>,
    generation: u64,
}

impl DrawState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_highlighted(&self, entity: &EntityRef) -> bool {
        self.highlights
            .iter()
            .any(|(e, active)| *active && e == entity)
    }

    pub fn rows(&self) -> &[EventRow] {
        &self.rows
    }

    /// Row indices of the events themselves, headers excluded
    pub fn item_rows(&self) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| matches!(row, EventRow::Item { .. }))
            .map(|(i, _)| i)
            .collect()
    }

    pub fn hint_visible(&self) -> bool {
        self.hint_visible
    }

    /// Bumped whenever the list contents change
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Take the pending "selection complete" signal, if any
    pub fn take_completed(&mut self) -> Option<CardSlot> {
        self.completed.take()
    }

    fn commit_highlights(&mut self) {
        self.highlights = std::mem::take(&mut self.staged_highlights);
    }

    fn set_rows(&mut self, rows: Vec<EventRow>) {
        if rows != self.rows {
            self.rows = rows;
            self.generation += 1;
        }
    }
}

impl RenderSink for DrawState {
    fn highlight(&mut self, entity: &EntityRef, is_active: bool) {
        self.staged_highlights.push((entity.clone(), is_active));
    }

    fn show_events(&mut self, views: &[CategoryView<'_>]) {
        self.commit_highlights();
        self.hint_visible = false;

        let mut rows = Vec::new();
        for view in views {
            rows.push(EventRow::Header(view.category.to_string()));
            rows.extend(view.events.iter().map(|event| EventRow::Item {
                title: event.title.clone(),
                detail: event.detail.clone(),
            }));
        }
        self.set_rows(rows);
    }

    fn show_empty_hint(&mut self) {
        self.commit_highlights();
        self.hint_visible = true;
        self.set_rows(Vec::new());
    }

    fn selection_complete(&mut self, slot: CardSlot) {
        tracing::debug!(?slot, "selection complete");
        self.completed = Some(slot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cavala_core::Event;

    #[test]
    fn highlights_commit_with_event_list() {
        let mut state = DrawState::new();
        let card = EntityRef::DeckCard("c1.png".into());

        state.highlight(&card, true);
        assert!(!state.is_highlighted(&card), "staged until the list arrives");

        state.show_events(&[]);
        assert!(state.is_highlighted(&card));

        state.highlight(&EntityRef::Character, false);
        state.show_empty_hint();
        assert!(!state.is_highlighted(&card));
        assert!(state.hint_visible());
    }

    #[test]
    fn rows_flatten_categories() {
        let big = Event::new("Big Win", "detail");
        let hint = Event::new("Hint", "");
        let views = vec![
            CategoryView {
                category: "Wins",
                events: vec![&big],
            },
            CategoryView {
                category: "Support",
                events: vec![&hint],
            },
        ];

        let mut state = DrawState::new();
        state.show_events(&views);

        assert_eq!(state.rows().len(), 4);
        assert_eq!(state.rows()[0], EventRow::Header("Wins".into()));
        assert_eq!(state.item_rows(), vec![1, 3]);
        assert!(!state.hint_visible());
    }

    #[test]
    fn generation_tracks_content_changes_only() {
        let event = Event::new("A", "");
        let views = vec![CategoryView {
            category: "C",
            events: vec![&event],
        }];

        let mut state = DrawState::new();
        state.show_events(&views);
        let first = state.generation();
        state.show_events(&views);
        assert_eq!(state.generation(), first);
        state.show_events(&[]);
        assert_ne!(state.generation(), first);
    }

    #[test]
    fn completion_is_taken_once() {
        let mut state = DrawState::new();
        state.selection_complete(CardSlot::Deck);
        assert_eq!(state.take_completed(), Some(CardSlot::Deck));
        assert_eq!(state.take_completed(), None);
    }
}
