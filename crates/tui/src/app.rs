use crate::draw::DrawState;
use crate::input::{InputEvent, InputHandler};
use crate::ui::{
    build_lines, line_of_item, ColorScheme, EventList, Footer, HelpOverlay, HintPanel, Layout,
    MessageScreen, PickerItem, PickerOverlay, SearchBox, SelectionStrip, StripItem, TitleBar,
};
use cavala_core::{
    CardRecord, CardType, Catalog, CatalogLoader, Config, EntityRef, RecordSource, Session,
};
use std::path::Path;

/// Which half of the main screen takes Enter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pane {
    Strip,
    Events,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PickerKind {
    Character,
    Deck,
    Single,
}

#[derive(Debug, Clone)]
struct Picker {
    kind: PickerKind,
    card_type: CardType,
    cursor: usize,
    scroll: usize,
}

impl Picker {
    fn new(kind: PickerKind) -> Self {
        Self {
            kind,
            card_type: CardType::Speed,
            cursor: 0,
            scroll: 0,
        }
    }
}

/// Application state
pub struct App {
    // Core components
    config: Config,
    input_handler: InputHandler,
    loader: Option<CatalogLoader>,
    session: Option<Session>,
    load_error: Option<String>,

    // UI state
    colors: ColorScheme,
    layout: Layout,
    view: DrawState,
    seen_generation: u64,
    pane: Pane,
    strip_cursor: usize,
    event_cursor: usize,
    event_scroll: usize,
    expanded: Option<usize>,
    picker: Option<Picker>,
    show_help: bool,
    needs_clear: bool,
    quit_requested: bool,
}

impl App {
    /// Start the app and begin loading the catalog in the background
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let layout = Layout::new()?;
        let loader = CatalogLoader::spawn(config.cards_path(), config.characters_path());
        tracing::info!(
            cards = %config.cards_path().display(),
            characters = %config.characters_path().display(),
            "loading catalog"
        );

        let mut app = Self::build(config, layout);
        app.loader = Some(loader);
        Ok(app)
    }

    /// Start the app with a catalog that is already in memory
    pub fn with_catalog(config: Config, catalog: Catalog, layout: Layout) -> Self {
        let mut app = Self::build(config, layout);
        app.install_catalog(catalog);
        app
    }

    fn build(config: Config, layout: Layout) -> Self {
        let colors = ColorScheme::new(&config.theme, config.no_color);
        Self {
            config,
            input_handler: InputHandler::new(),
            loader: None,
            session: None,
            load_error: None,
            colors,
            layout,
            view: DrawState::new(),
            seen_generation: 0,
            pane: Pane::Strip,
            strip_cursor: 0,
            event_cursor: 0,
            event_scroll: 0,
            expanded: None,
            picker: None,
            show_help: false,
            needs_clear: true,
            quit_requested: false,
        }
    }

    /// Main application loop
    pub fn run<W: std::io::Write>(&mut self, writer: &mut W) -> anyhow::Result<()> {
        self.setup_terminal()?;

        // Ensure we restore terminal on exit
        let _terminal_guard = TerminalGuard;

        self.render(writer)?;

        let tick = self.config.tick_interval();
        while !self.quit_requested {
            if let Some(event) = self.input_handler.poll_event(tick)? {
                let needs_redraw = self.handle_event(event);
                if needs_redraw && !self.quit_requested {
                    self.render(writer)?;
                }
            }
        }

        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn view(&self) -> &DrawState {
        &self.view
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Check on the background loader; true when something changed
    fn poll_loader(&mut self) -> bool {
        let Some(result) = self.loader.as_ref().and_then(CatalogLoader::poll) else {
            return false;
        };
        self.loader = None;

        match result {
            Ok(catalog) => {
                tracing::info!(
                    cards = catalog.card_count(),
                    characters = catalog.character_count(),
                    "catalog ready"
                );
                self.install_catalog(catalog);
            }
            Err(e) => {
                tracing::error!("catalog failed to load: {}", e);
                self.load_error = Some(e.to_string());
            }
        }
        true
    }

    fn install_catalog(&mut self, catalog: Catalog) {
        let session = Session::with_config(catalog, &self.config);
        session.refresh(&mut self.view);
        self.session = Some(session);
        for notice in self.catalog_notices() {
            tracing::warn!("{}", notice);
        }
        self.after_session_update();
    }

    /// Warnings about empty catalog tables, naming the directory that was scanned
    fn catalog_notices(&self) -> Vec<String> {
        let Some(session) = &self.session else {
            return Vec::new();
        };
        let mut notices = Vec::new();
        if session.catalog().character_count() == 0 {
            notices.push(format!(
                "No cavalas found in {}",
                self.config.characters_path().display()
            ));
        }
        if session.catalog().card_count() == 0 {
            notices.push(format!(
                "No cards found in {}",
                self.config.cards_path().display()
            ));
        }
        notices
    }

    /// Handle input events. Returns whether the screen should be redrawn.
    pub fn handle_event(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::Quit => {
                self.quit_requested = true;
                return false;
            }
            InputEvent::ShowHelp => {
                self.show_help = !self.show_help;
                self.needs_clear = true;
                return true;
            }
            InputEvent::Resize => {
                if let Err(e) = self.layout.update_terminal_size() {
                    tracing::warn!("could not read terminal size: {}", e);
                }
                self.needs_clear = true;
                return true;
            }
            InputEvent::Tick => return self.poll_loader(),
            InputEvent::Unknown => return false,
            _ if self.show_help => return false,
            _ => {}
        }

        // Nothing below makes sense before the catalog is in
        if self.session.is_none() {
            if self.input_handler.is_in_search_mode() {
                self.input_handler.exit_mode();
            }
            return false;
        }

        if self.picker.is_some() {
            self.handle_picker_event(event);
        } else {
            self.handle_main_event(event);
        }
        self.after_session_update();
        true
    }

    fn handle_main_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::MoveLeft => {
                self.pane = Pane::Strip;
                self.strip_cursor = self.strip_cursor.saturating_sub(1);
            }
            InputEvent::MoveRight => {
                self.pane = Pane::Strip;
                self.strip_cursor += 1;
            }
            InputEvent::MoveUp => self.move_event_cursor(-1),
            InputEvent::MoveDown => self.move_event_cursor(1),
            InputEvent::PageUp => self.move_event_cursor(-(self.events_page() as isize)),
            InputEvent::PageDown => self.move_event_cursor(self.events_page() as isize),
            InputEvent::Home => self.move_event_cursor(isize::MIN),
            InputEvent::End => self.move_event_cursor(isize::MAX),
            InputEvent::SwitchPane => {
                self.pane = match self.pane {
                    Pane::Strip => Pane::Events,
                    Pane::Events => Pane::Strip,
                };
            }
            InputEvent::Confirm => match self.pane {
                Pane::Strip => self.click_strip_entity(),
                Pane::Events => {
                    self.expanded = if self.expanded == Some(self.event_cursor) {
                        None
                    } else if self.event_cursor < self.view.item_rows().len() {
                        Some(self.event_cursor)
                    } else {
                        None
                    };
                }
            },

            InputEvent::OpenCharacterPicker => self.open_picker(PickerKind::Character),
            InputEvent::OpenDeckPicker => self.open_picker(PickerKind::Deck),
            InputEvent::OpenSinglePicker => self.open_picker(PickerKind::Single),

            InputEvent::StartSearch => {
                if let Some(session) = &mut self.session {
                    session.on_search_focus(true, &mut self.view);
                }
            }
            InputEvent::SearchChar(c) => {
                if let Some(session) = &mut self.session {
                    let mut text = session.query().text().to_string();
                    text.push(c);
                    session.on_search_text_changed(&text, &mut self.view);
                }
            }
            InputEvent::SearchBackspace => {
                if let Some(session) = &mut self.session {
                    let mut text = session.query().text().to_string();
                    text.pop();
                    session.on_search_text_changed(&text, &mut self.view);
                }
            }
            InputEvent::FinishSearch => {
                if let Some(session) = &mut self.session {
                    session.on_search_focus(false, &mut self.view);
                }
            }
            InputEvent::ClearSearch => {
                if let Some(session) = &mut self.session {
                    session.on_search_cleared(&mut self.view);
                    session.on_search_focus(false, &mut self.view);
                }
            }

            InputEvent::Reset => {
                if let Some(session) = &mut self.session {
                    session.on_reset(&mut self.view);
                }
                self.strip_cursor = 0;
                self.pane = Pane::Strip;
            }

            _ => {}
        }
    }

    fn handle_picker_event(&mut self, event: InputEvent) {
        let len = self.picker_entries().len();
        let page = PickerOverlay::list_height(self.layout.picker_area()).max(1);
        let Some(picker) = self.picker.as_mut() else {
            return;
        };

        match event {
            InputEvent::MoveUp => picker.cursor = picker.cursor.saturating_sub(1),
            InputEvent::MoveDown => picker.cursor += 1,
            InputEvent::PageUp => picker.cursor = picker.cursor.saturating_sub(page),
            InputEvent::PageDown => picker.cursor += page,
            InputEvent::Home => picker.cursor = 0,
            InputEvent::End => picker.cursor = len.saturating_sub(1),
            InputEvent::NextCardType => {
                if picker.kind != PickerKind::Character {
                    picker.card_type = picker.card_type.next();
                    picker.cursor = 0;
                    picker.scroll = 0;
                }
            }
            InputEvent::Confirm => {
                self.confirm_picker_entry();
                return;
            }
            InputEvent::ClosePicker => {
                self.close_picker();
                return;
            }
            _ => {}
        }

        clamp_scroll(&mut picker.cursor, &mut picker.scroll, len, page);
    }

    fn open_picker(&mut self, kind: PickerKind) {
        tracing::debug!(?kind, "opening picker");
        let mut picker = Picker::new(kind);
        if let Some(card_type) = self.last_card_type(kind) {
            picker.card_type = card_type;
        }
        self.picker = Some(picker);
        self.input_handler.enter_picker_mode();
    }

    fn close_picker(&mut self) {
        self.picker = None;
        self.input_handler.exit_mode();
        self.needs_clear = true;
    }

    fn confirm_picker_entry(&mut self) {
        let Some(picker) = self.picker.clone() else {
            return;
        };
        let entries = self.picker_entries();
        let Some((key, _)) = entries.get(picker.cursor) else {
            return;
        };
        let Some(session) = self.session.as_mut() else {
            return;
        };

        match picker.kind {
            PickerKind::Character => {
                if session.on_character_chosen(key, &mut self.view) {
                    self.close_picker();
                }
            }
            PickerKind::Deck => {
                session.on_deck_card_toggled(key, &mut self.view);
            }
            PickerKind::Single => {
                session.on_single_card_toggled(key, &mut self.view);
            }
        }
    }

    /// Type of the card most recently placed in the picker's slot, so the
    /// picker reopens on that tab
    fn last_card_type(&self, kind: PickerKind) -> Option<CardType> {
        let session = self.session.as_ref()?;
        let selection = session.selection();
        let key = match kind {
            PickerKind::Character => return None,
            PickerKind::Deck => selection.deck().last()?.as_str(),
            PickerKind::Single => selection.single_card()?,
        };
        session.catalog().card(key).and_then(CardRecord::card_type)
    }

    /// Keys and rows of the open picker, in display order
    fn picker_entries(&self) -> Vec<(String, PickerItem)> {
        let (Some(picker), Some(session)) = (&self.picker, &self.session) else {
            return Vec::new();
        };
        let catalog = session.catalog();
        let selection = session.selection();

        match picker.kind {
            PickerKind::Character => catalog
                .characters_sorted()
                .into_iter()
                .map(|character| {
                    let item = PickerItem {
                        label: character.name.clone(),
                        checked: selection.character() == Some(character.name.as_str()),
                    };
                    (character.name.clone(), item)
                })
                .collect(),
            PickerKind::Deck | PickerKind::Single => catalog
                .cards_of_type(picker.card_type)
                .into_iter()
                .map(|card| {
                    let checked = match picker.kind {
                        PickerKind::Deck => selection.deck().contains(&card.image),
                        _ => selection.single_card() == Some(card.image.as_str()),
                    };
                    let item = PickerItem {
                        label: format!(
                            "{} ({}) - {} events",
                            card_label(card),
                            card.rarity().label(),
                            card.events.event_count()
                        ),
                        checked,
                    };
                    (card.image.clone(), item)
                })
                .collect(),
        }
    }

    fn click_strip_entity(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let entities = session.selection().entities();
        if let Some(entity) = entities.get(self.strip_cursor) {
            session.on_entity_clicked(entity.clone(), &mut self.view);
        }
    }

    /// Sync cursors with whatever the session just pushed
    fn after_session_update(&mut self) {
        if self.view.generation() != self.seen_generation {
            self.seen_generation = self.view.generation();
            self.event_cursor = 0;
            self.event_scroll = 0;
            self.expanded = None;
        }

        if let Some(slot) = self.view.take_completed() {
            tracing::debug!(?slot, "closing picker on complete selection");
            if self.picker.is_some() {
                self.close_picker();
            }
        }

        let entity_count = self
            .session
            .as_ref()
            .map_or(0, |session| session.selection().entities().len());
        self.strip_cursor = self.strip_cursor.min(entity_count.saturating_sub(1));

        self.clamp_event_cursor();
    }

    fn move_event_cursor(&mut self, delta: isize) {
        self.pane = Pane::Events;
        self.event_cursor = if delta < 0 {
            self.event_cursor.saturating_sub(delta.unsigned_abs())
        } else {
            self.event_cursor.saturating_add(delta as usize)
        };
        self.clamp_event_cursor();
    }

    fn clamp_event_cursor(&mut self) {
        let items = self.view.item_rows().len();
        self.event_cursor = self.event_cursor.min(items.saturating_sub(1));

        let area = self.layout.main_layout().events;
        let lines = build_lines(self.view.rows(), self.expanded, area.width as usize);
        let Some(line) = line_of_item(&lines, self.event_cursor) else {
            self.event_scroll = 0;
            return;
        };

        let height = (area.height as usize).max(1);
        if line < self.event_scroll {
            self.event_scroll = line.saturating_sub(1);
        } else if line >= self.event_scroll + height {
            self.event_scroll = line + 1 - height;
        }
    }

    fn events_page(&self) -> usize {
        (self.layout.main_layout().events.height as usize / 2).max(1)
    }

    fn strip_items(&self) -> Vec<StripItem> {
        let Some(session) = &self.session else {
            return Vec::new();
        };
        let catalog = session.catalog();
        let selection = session.selection();

        selection
            .entities()
            .into_iter()
            .enumerate()
            .map(|(i, entity)| {
                let label = match &entity {
                    EntityRef::Character => selection.character().unwrap_or_default().to_string(),
                    EntityRef::DeckCard(key) => card_label_for(catalog, key),
                    EntityRef::SingleCard => {
                        card_label_for(catalog, selection.single_card().unwrap_or_default())
                    }
                };
                StripItem {
                    is_active: self.view.is_highlighted(&entity),
                    is_cursor: i == self.strip_cursor,
                    entity,
                    label,
                }
            })
            .collect()
    }

    /// Render the UI
    pub fn render<W: std::io::Write>(&mut self, writer: &mut W) -> anyhow::Result<()> {
        if self.needs_clear {
            crossterm::queue!(
                writer,
                crossterm::terminal::Clear(crossterm::terminal::ClearType::All)
            )?;
            self.needs_clear = false;
        }
        crossterm::queue!(writer, crossterm::cursor::MoveTo(0, 0))?;

        let terminal_rect = self.layout.terminal_rect();
        let main_layout = self.layout.main_layout();

        let (cards, characters) = self.session.as_ref().map_or((0, 0), |session| {
            (
                session.catalog().card_count(),
                session.catalog().character_count(),
            )
        });
        let notices = self.catalog_notices();
        let warning = (!notices.is_empty()).then_some("missing data");
        TitleBar.render(
            writer,
            main_layout.title_bar,
            cards,
            characters,
            warning,
            &self.colors,
        )?;

        match &self.session {
            None => {
                let body = crate::ui::Rect::new(
                    terminal_rect.x,
                    main_layout.strip.y,
                    terminal_rect.width,
                    main_layout.footer.y.saturating_sub(main_layout.strip.y),
                );
                let (message, color) = match &self.load_error {
                    Some(error) => (format!("Could not load catalog: {}", error), self.colors.hint),
                    None => ("Loading catalog…".to_string(), self.colors.accent),
                };
                MessageScreen.render(writer, body, &message, color, &self.colors)?;
            }
            Some(session) => {
                let items = self.strip_items();
                SelectionStrip.render(
                    writer,
                    main_layout.strip,
                    &items,
                    session.selection().deck().len(),
                    session.deck_limit(),
                    self.pane == Pane::Strip,
                    &self.colors,
                )?;

                let query = session.query();
                SearchBox.render(
                    writer,
                    main_layout.search,
                    query.display_text(),
                    !query.is_active() && query.text().is_empty(),
                    self.input_handler.is_in_search_mode(),
                    &self.colors,
                )?;

                if self.view.hint_visible() {
                    HintPanel.render(writer, main_layout.events, &notices, &self.colors)?;
                } else if self.view.rows().is_empty() {
                    let message = if session.selection().active().is_none() {
                        "Select the cavala or a card above to see its events"
                    } else {
                        "No events match"
                    };
                    MessageScreen.render(
                        writer,
                        main_layout.events,
                        message,
                        self.colors.muted,
                        &self.colors,
                    )?;
                } else {
                    let lines = build_lines(
                        self.view.rows(),
                        self.expanded,
                        main_layout.events.width as usize,
                    );
                    let selected = (self.pane == Pane::Events).then_some(self.event_cursor);
                    EventList.render(
                        writer,
                        main_layout.events,
                        &lines,
                        self.event_scroll,
                        selected,
                        &self.colors,
                    )?;
                }
            }
        }

        Footer.render(writer, main_layout.footer, &self.colors)?;

        if let (Some(picker), Some(session)) = (&self.picker, &self.session) {
            let entries = self.picker_entries();
            let items: Vec<PickerItem> = entries.into_iter().map(|(_, item)| item).collect();
            let (title, card_type, counter) = match picker.kind {
                PickerKind::Character => ("Choose your cavala", None, None),
                PickerKind::Deck => (
                    "Choose deck cards",
                    Some(picker.card_type),
                    Some(format!(
                        "{}/{} cards selected",
                        session.selection().deck().len(),
                        session.deck_limit()
                    )),
                ),
                PickerKind::Single => ("Choose a single card", Some(picker.card_type), None),
            };
            let overlay = PickerOverlay {
                title,
                card_type,
                counter,
                items: &items,
                cursor: picker.cursor,
                scroll: picker.scroll,
            };
            overlay.render(writer, self.layout.picker_area(), &self.colors)?;
        }

        if self.show_help {
            HelpOverlay.render(writer, terminal_rect, &self.colors)?;
        }

        crossterm::queue!(writer, crossterm::style::ResetColor)?;
        writer.flush()?;
        Ok(())
    }

    fn setup_terminal(&self) -> anyhow::Result<()> {
        crossterm::terminal::enable_raw_mode()?;
        crossterm::execute!(
            std::io::stdout(),
            crossterm::terminal::EnterAlternateScreen,
            crossterm::cursor::Hide
        )?;
        Ok(())
    }
}

/// Keep `cursor` in `0..len` and `scroll` such that the cursor is on screen
fn clamp_scroll(cursor: &mut usize, scroll: &mut usize, len: usize, page: usize) {
    *cursor = (*cursor).min(len.saturating_sub(1));
    if *cursor < *scroll {
        *scroll = *cursor;
    } else if *cursor >= *scroll + page {
        *scroll = *cursor + 1 - page;
    }
}

/// Display name of a card, falling back to its file name
fn card_label(card: &CardRecord) -> String {
    if !card.name.is_empty() {
        return card.name.clone();
    }
    Path::new(&card.image)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| card.image.clone())
}

fn card_label_for<S: RecordSource + ?Sized>(source: &S, key: &str) -> String {
    source
        .card(key)
        .map(card_label)
        .unwrap_or_else(|| key.to_string())
}

/// RAII guard to restore terminal state on drop
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = crossterm::execute!(
            std::io::stdout(),
            crossterm::cursor::Show,
            crossterm::terminal::LeaveAlternateScreen
        );
        let _ = crossterm::terminal::disable_raw_mode();
    }
}
