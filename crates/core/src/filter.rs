use crate::{
    catalog::RecordSource,
    model::{Event, EventBook, MatchMode},
    selection::{EntityRef, SelectionState},
};

/// Text shown in an idle search box. It never filters anything.
pub const SEARCH_PLACEHOLDER: &str = "Search events…";

/// Search box contents plus whether the box is in use.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    text: String,
    active: bool,
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// An already focused query, as if the user typed `text`
    pub fn typed<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            active: true,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_text<S: Into<String>>(&mut self, text: S) {
        self.text = text.into();
    }

    pub fn push(&mut self, c: char) {
        self.text.push(c);
    }

    pub fn pop(&mut self) -> Option<char> {
        self.text.pop()
    }

    /// Focus gained: drop the placeholder if it somehow ended up as text.
    pub fn activate(&mut self) {
        if !self.active {
            self.active = true;
            if self.text == SEARCH_PLACEHOLDER {
                self.text.clear();
            }
        }
    }

    /// Focus lost: an empty box goes back to showing the placeholder.
    pub fn deactivate(&mut self) {
        if self.text.is_empty() {
            self.active = false;
        }
    }

    /// Empty the box and keep it focused
    pub fn clear(&mut self) {
        self.text.clear();
        self.active = true;
    }

    /// What the search box should display
    pub fn display_text(&self) -> &str {
        if !self.active && self.text.is_empty() {
            SEARCH_PLACEHOLDER
        } else {
            &self.text
        }
    }

    /// Lowercased, trimmed query; empty when idle or showing the placeholder.
    pub fn effective(&self) -> String {
        normalize_query(&self.text, self.active)
    }
}

pub fn normalize_query(text: &str, active: bool) -> String {
    let trimmed = text.trim();
    if !active || trimmed == SEARCH_PLACEHOLDER {
        return String::new();
    }
    trimmed.to_lowercase()
}

/// Whether `title` passes an already-normalized `query`
pub fn title_matches(title: &str, query: &str, mode: MatchMode) -> bool {
    if query.is_empty() {
        return true;
    }
    let title = title.to_lowercase();
    match mode {
        MatchMode::Prefix => title.starts_with(query),
        MatchMode::Contains => title.contains(query),
    }
}

/// One category's surviving events
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryView<'a> {
    pub category: &'a str,
    pub events: Vec<&'a Event>,
}

/// Resolve an entity to the event book that backs it
pub fn resolve_events<'a, S: RecordSource + ?Sized>(
    source: &'a S,
    selection: &SelectionState,
    entity: &EntityRef,
) -> Option<&'a EventBook> {
    match entity {
        EntityRef::Character => selection
            .character()
            .and_then(|name| source.character(name))
            .map(|record| &record.events),
        EntityRef::DeckCard(key) => source.card(key).map(|record| &record.events),
        EntityRef::SingleCard => selection
            .single_card()
            .and_then(|key| source.card(key))
            .map(|record| &record.events),
    }
}

/// Filter one event book by an already-normalized query.
///
/// Categories keep their declared order, events keep their list order, and
/// categories left without events are dropped.
pub fn filter_book<'a>(book: &'a EventBook, query: &str, mode: MatchMode) -> Vec<CategoryView<'a>> {
    book.categories()
        .iter()
        .filter_map(|category| {
            let events: Vec<&Event> = category
                .events
                .iter()
                .filter(|event| title_matches(&event.title, query, mode))
                .collect();
            (!events.is_empty()).then(|| CategoryView {
                category: &category.name,
                events,
            })
        })
        .collect()
}

/// Events to display for `entity` under `query`.
///
/// Pure: nothing is mutated, so it is safe to call on every keystroke. No
/// entity, or an entity whose record is gone, yields an empty list.
pub fn visible_events<'a, S: RecordSource + ?Sized>(
    source: &'a S,
    selection: &SelectionState,
    entity: Option<&EntityRef>,
    query: &SearchQuery,
    mode: MatchMode,
) -> Vec<CategoryView<'a>> {
    let Some(book) = entity.and_then(|entity| resolve_events(source, selection, entity)) else {
        return Vec::new();
    };
    filter_book(book, &query.effective(), mode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        catalog::Catalog,
        model::{CardRecord, CharacterRecord},
    };

    fn titles<'a>(views: &[CategoryView<'a>]) -> Vec<(&'a str, Vec<&'a str>)> {
        views
            .iter()
            .map(|v| (v.category, v.events.iter().map(|e| e.title.as_str()).collect()))
            .collect()
    }

    fn fixture() -> (Catalog, SelectionState) {
        let card = CardRecord {
            name: "Letters".into(),
            image: "c1.png".into(),
            events: EventBook::new()
                .with(
                    "Chain",
                    vec![
                        Event::new("Love Letter", "a"),
                        Event::new("First Love", "b"),
                        Event::new("LOVELY Day", "c"),
                    ],
                )
                .with("Random", vec![Event::new("Rainy Day", "d")]),
        };
        let character = CharacterRecord {
            name: "Haru".into(),
            image: "haru.png".into(),
            events: EventBook::new().with("Wins", vec![Event::new("Big Win", "")]),
        };
        let catalog = Catalog::from_records(vec![card], vec![character]);

        let mut selection = SelectionState::new();
        selection.set_character(&catalog, "Haru");
        selection.toggle_deck_card(&catalog, "c1.png", 6);
        selection.toggle_single_card(&catalog, "c1.png");
        (catalog, selection)
    }

    #[test]
    fn empty_query_returns_everything_in_order() {
        let (catalog, selection) = fixture();
        let entity = EntityRef::DeckCard("c1.png".into());
        let views = visible_events(
            &catalog,
            &selection,
            Some(&entity),
            &SearchQuery::typed(""),
            MatchMode::Prefix,
        );
        assert_eq!(
            titles(&views),
            vec![
                ("Chain", vec!["Love Letter", "First Love", "LOVELY Day"]),
                ("Random", vec!["Rainy Day"]),
            ]
        );
    }

    #[test]
    fn prefix_match_is_case_insensitive_and_not_substring() {
        let (catalog, selection) = fixture();
        let views = visible_events(
            &catalog,
            &selection,
            Some(&EntityRef::SingleCard),
            &SearchQuery::typed("  Love "),
            MatchMode::Prefix,
        );
        assert_eq!(titles(&views), vec![("Chain", vec!["Love Letter", "LOVELY Day"])]);
    }

    #[test]
    fn contains_mode_matches_anywhere() {
        let (catalog, selection) = fixture();
        let views = visible_events(
            &catalog,
            &selection,
            Some(&EntityRef::SingleCard),
            &SearchQuery::typed("love"),
            MatchMode::Contains,
        );
        assert_eq!(
            titles(&views),
            vec![("Chain", vec!["Love Letter", "First Love", "LOVELY Day"])]
        );
    }

    #[test]
    fn no_entity_or_missing_record_yields_nothing() {
        let (catalog, selection) = fixture();
        let query = SearchQuery::typed("");
        assert!(visible_events(&catalog, &selection, None, &query, MatchMode::Prefix).is_empty());

        let gone = EntityRef::DeckCard("gone.png".into());
        assert!(
            visible_events(&catalog, &selection, Some(&gone), &query, MatchMode::Prefix).is_empty()
        );

        let empty = Catalog::new();
        assert!(visible_events(
            &empty,
            &selection,
            Some(&EntityRef::Character),
            &query,
            MatchMode::Prefix
        )
        .is_empty());
    }

    #[test]
    fn placeholder_and_idle_box_do_not_filter() {
        let (catalog, selection) = fixture();

        let mut idle = SearchQuery::new();
        idle.set_text("zzz");
        assert_eq!(idle.effective(), "");

        let placeholder = SearchQuery::typed(SEARCH_PLACEHOLDER);
        let views = visible_events(
            &catalog,
            &selection,
            Some(&EntityRef::Character),
            &placeholder,
            MatchMode::Prefix,
        );
        assert_eq!(titles(&views), vec![("Wins", vec!["Big Win"])]);
    }

    #[test]
    fn search_box_focus_cycle() {
        let mut query = SearchQuery::new();
        assert_eq!(query.display_text(), SEARCH_PLACEHOLDER);

        query.activate();
        assert_eq!(query.display_text(), "");
        query.push('W');
        query.push('i');
        assert_eq!(query.effective(), "wi");

        query.deactivate();
        assert!(query.is_active(), "non-empty box stays active");

        query.pop();
        query.pop();
        query.deactivate();
        assert!(!query.is_active());
        assert_eq!(query.display_text(), SEARCH_PLACEHOLDER);
    }
}
