use crate::{
    catalog::{Catalog, RecordSource},
    config::Config,
    filter::{visible_events, CategoryView, SearchQuery},
    model::MatchMode,
    selection::{CardSlot, CardToggle, EntityRef, FocusOutcome, SelectionState, MAX_DECK_SIZE},
};

/// Rendering surface the session pushes state into.
///
/// Implementations only draw; they never touch selection state directly and
/// report user actions back through the `Session::on_*` methods.
pub trait RenderSink {
    /// Mark a present entity as focused or not
    fn highlight(&mut self, entity: &EntityRef, is_active: bool);

    /// Replace the event list
    fn show_events(&mut self, views: &[CategoryView<'_>]);

    /// Onboarding nudge shown while nothing has been chosen
    fn show_empty_hint(&mut self);

    /// A slot just filled up; pickers close on this
    fn selection_complete(&mut self, slot: CardSlot);
}

/// Catalog, selection and search box bound together.
///
/// Every inbound action mutates through [`SelectionState`] and then
/// re-renders, so the sink always reflects the latest state.
pub struct Session<C: RecordSource = Catalog> {
    catalog: C,
    selection: SelectionState,
    query: SearchQuery,
    deck_limit: usize,
    match_mode: MatchMode,
}

impl<C: RecordSource> Session<C> {
    pub fn new(catalog: C, deck_limit: usize, match_mode: MatchMode) -> Self {
        Self {
            catalog,
            selection: SelectionState::new(),
            query: SearchQuery::new(),
            deck_limit: deck_limit.clamp(1, MAX_DECK_SIZE),
            match_mode,
        }
    }

    pub fn with_config(catalog: C, config: &Config) -> Self {
        Self::new(catalog, config.deck_limit, config.match_mode)
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    pub fn deck_limit(&self) -> usize {
        self.deck_limit
    }

    pub fn match_mode(&self) -> MatchMode {
        self.match_mode
    }

    /// Events for the focused entity under the current search text
    pub fn visible_events(&self) -> Vec<CategoryView<'_>> {
        visible_events(
            &self.catalog,
            &self.selection,
            self.selection.active(),
            &self.query,
            self.match_mode,
        )
    }

    /// Push the whole state to the sink
    pub fn refresh(&self, sink: &mut dyn RenderSink) {
        for entity in self.selection.entities() {
            let is_active = self.selection.is_active(&entity);
            sink.highlight(&entity, is_active);
        }

        if self.selection.is_empty() {
            sink.show_empty_hint();
        } else {
            sink.show_events(&self.visible_events());
        }
    }

    pub fn on_entity_clicked(&mut self, entity: EntityRef, sink: &mut dyn RenderSink) -> FocusOutcome {
        let outcome = self.selection.focus(entity);
        if outcome != FocusOutcome::Ignored {
            self.refresh(sink);
        }
        outcome
    }

    pub fn on_character_chosen(&mut self, name: &str, sink: &mut dyn RenderSink) -> bool {
        let applied = self.selection.set_character(&self.catalog, name);
        if applied {
            self.refresh(sink);
        }
        applied
    }

    pub fn on_deck_card_toggled(&mut self, key: &str, sink: &mut dyn RenderSink) -> CardToggle {
        let toggle = self
            .selection
            .toggle_deck_card(&self.catalog, key, self.deck_limit);
        self.refresh(sink);
        if toggle.complete {
            sink.selection_complete(CardSlot::Deck);
        }
        toggle
    }

    pub fn on_single_card_toggled(&mut self, key: &str, sink: &mut dyn RenderSink) -> CardToggle {
        let toggle = self.selection.toggle_single_card(&self.catalog, key);
        self.refresh(sink);
        if toggle.complete {
            sink.selection_complete(CardSlot::Single);
        }
        toggle
    }

    pub fn on_search_text_changed(&mut self, text: &str, sink: &mut dyn RenderSink) {
        self.query.set_text(text);
        self.refresh(sink);
    }

    pub fn on_search_focus(&mut self, focused: bool, sink: &mut dyn RenderSink) {
        if focused {
            self.query.activate();
        } else {
            self.query.deactivate();
        }
        self.refresh(sink);
    }

    /// Empty the search box, keeping it focused
    pub fn on_search_cleared(&mut self, sink: &mut dyn RenderSink) {
        self.query.clear();
        self.refresh(sink);
    }

    pub fn on_reset(&mut self, sink: &mut dyn RenderSink) {
        tracing::info!("resetting selection");
        self.selection.reset();
        self.refresh(sink);
    }

    /// Swap in a freshly loaded catalog. Picks whose records are gone stay
    /// chosen but show no events.
    pub fn replace_catalog(&mut self, catalog: C, sink: &mut dyn RenderSink) {
        self.catalog = catalog;
        self.refresh(sink);
    }
}
