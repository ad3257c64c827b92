use crate::draw::EventRow;
use crate::ui::{ColorScheme, Rect};
use cavala_core::{markup, EntityRef};
use crossterm::{
    cursor,
    style::{Attribute, Color, Print, SetAttribute, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use std::io::{self, Write};

/// Cut `text` to at most `width` characters
pub fn fit_width(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else if width <= 3 {
        text.chars().take(width).collect()
    } else {
        let mut cut: String = text.chars().take(width - 3).collect();
        cut.push_str("...");
        cut
    }
}

/// Writes styled pieces along one terminal row, clipping at the area edge
/// and padding the remainder so stale cells from the last frame are cleared.
struct RowWriter {
    area: Rect,
    col: u16,
}

impl RowWriter {
    fn start<W: Write>(writer: &mut W, area: Rect, y: u16) -> io::Result<Self> {
        writer.queue(cursor::MoveTo(area.x, y))?;
        Ok(Self { area, col: 0 })
    }

    fn remaining(&self) -> usize {
        self.area.width.saturating_sub(self.col) as usize
    }

    fn put<W: Write>(
        &mut self,
        writer: &mut W,
        text: &str,
        fg: Color,
        bg: Color,
        bold: bool,
    ) -> io::Result<()> {
        let remaining = self.remaining();
        if remaining == 0 || text.is_empty() {
            return Ok(());
        }
        let clipped: String = text.chars().take(remaining).collect();
        writer.queue(SetForegroundColor(fg))?;
        writer.queue(SetBackgroundColor(bg))?;
        if bold {
            writer.queue(SetAttribute(Attribute::Bold))?;
        }
        writer.queue(Print(&clipped))?;
        if bold {
            writer.queue(SetAttribute(Attribute::NormalIntensity))?;
        }
        self.col = self.col.saturating_add(clipped.chars().count() as u16);
        Ok(())
    }

    fn finish<W: Write>(self, writer: &mut W, bg: Color) -> io::Result<()> {
        let remaining = self.remaining();
        if remaining > 0 {
            writer.queue(SetBackgroundColor(bg))?;
            writer.queue(Print(" ".repeat(remaining)))?;
        }
        Ok(())
    }
}

/// Title bar showing catalog size and deck fill
pub struct TitleBar;

impl TitleBar {
    pub fn render<W: Write>(
        &self,
        writer: &mut W,
        area: Rect,
        cards: usize,
        characters: usize,
        warning: Option<&str>,
        colors: &ColorScheme,
    ) -> io::Result<()> {
        if area.height == 0 {
            return Ok(());
        }

        let mut row = RowWriter::start(writer, area, area.y)?;
        row.put(writer, "CAVALA TRAINER", colors.accent, colors.background, true)?;
        let stats = format!(" | {} cavalas | {} cards", characters, cards);
        row.put(writer, &stats, colors.foreground, colors.background, false)?;
        if let Some(warning) = warning {
            row.put(writer, " | ", colors.foreground, colors.background, false)?;
            row.put(writer, warning, colors.hint, colors.background, true)?;
        }
        row.finish(writer, colors.background)
    }
}

/// One chosen entity as shown in the strip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripItem {
    pub entity: EntityRef,
    pub label: String,
    pub is_active: bool,
    pub is_cursor: bool,
}

/// Character, deck and single card, left to right
pub struct SelectionStrip;

impl SelectionStrip {
    #[allow(clippy::too_many_arguments)]
    pub fn render<W: Write>(
        &self,
        writer: &mut W,
        area: Rect,
        items: &[StripItem],
        deck_len: usize,
        deck_limit: usize,
        strip_focused: bool,
        colors: &ColorScheme,
    ) -> io::Result<()> {
        if area.height == 0 {
            return Ok(());
        }

        let mut row = RowWriter::start(writer, area, area.y)?;
        let section = |row: &mut RowWriter, writer: &mut W, title: &str| {
            row.put(writer, title, colors.category, colors.background, true)
        };

        section(&mut row, writer, " Cavala: ")?;
        self.render_items(writer, &mut row, items, |e| *e == EntityRef::Character, "(c)", strip_focused, colors)?;

        section(&mut row, writer, &format!("  Deck {}/{}: ", deck_len, deck_limit))?;
        self.render_items(
            writer,
            &mut row,
            items,
            |e| matches!(e, EntityRef::DeckCard(_)),
            "(d)",
            strip_focused,
            colors,
        )?;

        row.put(writer, "  │", colors.border, colors.background, false)?;
        section(&mut row, writer, " Single: ")?;
        self.render_items(writer, &mut row, items, |e| *e == EntityRef::SingleCard, "(s)", strip_focused, colors)?;
        row.finish(writer, colors.background)?;

        if area.height > 1 {
            let mut row = RowWriter::start(writer, area, area.y + 1)?;
            let status = match items.iter().find(|item| item.is_active) {
                Some(item) => format!(" Showing events for {}", item.label),
                None if items.is_empty() => String::new(),
                None => " Select a cavala or card to show its events".to_string(),
            };
            row.put(writer, &status, colors.muted, colors.background, false)?;
            row.finish(writer, colors.background)?;
        }

        if area.height > 2 {
            writer.queue(cursor::MoveTo(area.x, area.y + 2))?;
            writer.queue(SetForegroundColor(colors.border))?;
            writer.queue(SetBackgroundColor(colors.background))?;
            writer.queue(Print("─".repeat(area.width as usize)))?;
        }

        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn render_items<W: Write, F: Fn(&EntityRef) -> bool>(
        &self,
        writer: &mut W,
        row: &mut RowWriter,
        items: &[StripItem],
        belongs: F,
        empty_label: &str,
        strip_focused: bool,
        colors: &ColorScheme,
    ) -> io::Result<()> {
        let mut any = false;
        for item in items.iter().filter(|item| belongs(&item.entity)) {
            any = true;
            let marker = if item.is_cursor && strip_focused { "▸" } else { " " };
            row.put(writer, marker, colors.accent, colors.background, false)?;
            let label = format!("[{}]", fit_width(&item.label, 18));
            row.put(
                writer,
                &label,
                colors.entity_color(item.is_active),
                colors.background,
                item.is_active,
            )?;
        }
        if !any {
            row.put(writer, empty_label, colors.muted, colors.background, false)?;
        }
        Ok(())
    }
}

/// Search box line
pub struct SearchBox;

impl SearchBox {
    pub fn render<W: Write>(
        &self,
        writer: &mut W,
        area: Rect,
        display_text: &str,
        is_placeholder: bool,
        typing: bool,
        colors: &ColorScheme,
    ) -> io::Result<()> {
        if area.height == 0 {
            return Ok(());
        }

        let mut row = RowWriter::start(writer, area, area.y)?;
        row.put(writer, " Search: ", colors.accent, colors.background, false)?;
        let color = if is_placeholder { colors.muted } else { colors.foreground };
        row.put(writer, display_text, color, colors.background, false)?;
        if typing {
            row.put(writer, "_", colors.accent, colors.background, false)?;
        }
        row.finish(writer, colors.background)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    Header,
    Title { item: usize, expanded: bool },
    Detail,
}

/// A rendered line of the event list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListLine {
    pub kind: LineKind,
    pub pieces: Vec<(String, bool)>,
}

impl ListLine {
    fn plain(kind: LineKind, text: String) -> Self {
        Self {
            kind,
            pieces: vec![(text, false)],
        }
    }

    pub fn text(&self) -> String {
        self.pieces.iter().map(|(text, _)| text.as_str()).collect()
    }
}

/// Word-wrap styled spans to `width` columns; explicit newlines break lines.
pub fn wrap_spans(spans: &[markup::Span<'_>], width: usize) -> Vec<Vec<(String, bool)>> {
    fn push_piece(line: &mut Vec<(String, bool)>, text: String, bold: bool) {
        match line.last_mut() {
            Some((last, last_bold)) if *last_bold == bold => last.push_str(&text),
            _ => line.push((text, bold)),
        }
    }

    let width = width.max(1);
    let mut lines: Vec<Vec<(String, bool)>> = vec![Vec::new()];
    let mut col = 0usize;

    for span in spans {
        for (i, segment) in span.text.split('\n').enumerate() {
            if i > 0 {
                lines.push(Vec::new());
                col = 0;
            }
            for word in segment.split_inclusive(' ') {
                let chars: Vec<char> = word.chars().collect();
                for chunk in chars.chunks(width) {
                    if col + chunk.len() > width && col > 0 {
                        lines.push(Vec::new());
                        col = 0;
                    }
                    if let Some(line) = lines.last_mut() {
                        push_piece(line, chunk.iter().collect(), span.bold);
                    }
                    col += chunk.len();
                }
            }
        }
    }

    lines
}

/// Flatten rows into display lines. Only the expanded item shows its detail.
pub fn build_lines(rows: &[EventRow], expanded: Option<usize>, width: usize) -> Vec<ListLine> {
    let mut lines = Vec::new();
    let mut item = 0;

    for row in rows {
        match row {
            EventRow::Header(name) => {
                if !lines.is_empty() {
                    lines.push(ListLine::plain(LineKind::Header, String::new()));
                }
                lines.push(ListLine::plain(LineKind::Header, format!("-- {} --", name)));
            }
            EventRow::Item { title, detail } => {
                let is_open = expanded == Some(item);
                let arrow = if is_open { "▼" } else { "▶" };
                let title = markup::strip_markup(title);
                let title = if title.is_empty() { "Event" } else { title.as_str() };
                lines.push(ListLine::plain(
                    LineKind::Title {
                        item,
                        expanded: is_open,
                    },
                    format!("{} {}", arrow, title),
                ));
                if is_open {
                    let spans = markup::parse_detail(detail);
                    for pieces in wrap_spans(&spans, width.saturating_sub(4)) {
                        lines.push(ListLine {
                            kind: LineKind::Detail,
                            pieces,
                        });
                    }
                }
                item += 1;
            }
        }
    }

    lines
}

/// Index of the title line for `item`
pub fn line_of_item(lines: &[ListLine], item: usize) -> Option<usize> {
    lines
        .iter()
        .position(|line| matches!(line.kind, LineKind::Title { item: i, .. } if i == item))
}

/// Scrollable event list
pub struct EventList;

impl EventList {
    pub fn render<W: Write>(
        &self,
        writer: &mut W,
        area: Rect,
        lines: &[ListLine],
        scroll: usize,
        selected: Option<usize>,
        colors: &ColorScheme,
    ) -> io::Result<()> {
        for offset in 0..area.height {
            let y = area.y + offset;
            let mut row = RowWriter::start(writer, area, y)?;
            let Some(line) = lines.get(scroll + offset as usize) else {
                row.finish(writer, colors.background)?;
                continue;
            };

            match &line.kind {
                LineKind::Header => {
                    let text = line.text();
                    let pad = (area.width as usize).saturating_sub(text.chars().count()) / 2;
                    row.put(writer, &" ".repeat(pad), colors.foreground, colors.background, false)?;
                    row.put(writer, &text, colors.category, colors.background, true)?;
                    row.finish(writer, colors.background)?;
                }
                LineKind::Title { item, .. } => {
                    let bg = if selected == Some(*item) {
                        colors.selected_row
                    } else {
                        colors.background
                    };
                    row.put(writer, "  ", colors.foreground, bg, false)?;
                    row.put(writer, &line.text(), colors.foreground, bg, false)?;
                    row.finish(writer, bg)?;
                }
                LineKind::Detail => {
                    row.put(writer, "    ", colors.foreground, colors.detail_bg, false)?;
                    for (text, bold) in &line.pieces {
                        let fg = if *bold { colors.bold_text } else { colors.foreground };
                        row.put(writer, text, fg, colors.detail_bg, *bold)?;
                    }
                    row.finish(writer, colors.detail_bg)?;
                }
            }
        }

        Ok(())
    }
}

/// Onboarding panel shown while nothing is chosen, with any catalog notices below
pub struct HintPanel;

impl HintPanel {
    pub fn render<W: Write>(
        &self,
        writer: &mut W,
        area: Rect,
        notices: &[String],
        colors: &ColorScheme,
    ) -> io::Result<()> {
        let mut lines: Vec<(String, Color)> = [
            "Not sure where to start? Pick a cavala with (c), then choose",
            "your deck with (d) or a single card with (s).",
            "",
            "Then select the cavala or a card in the top strip to see its events.",
        ]
        .iter()
        .map(|text| (text.to_string(), colors.hint))
        .collect();
        if !notices.is_empty() {
            lines.push((String::new(), colors.hint));
            for notice in notices {
                lines.push((fit_width(notice, area.width as usize), colors.accent));
            }
        }

        for offset in 0..area.height {
            let mut row = RowWriter::start(writer, area, area.y + offset)?;
            let index = (offset as usize).checked_sub(1);
            if let Some((text, color)) = index.and_then(|i| lines.get(i)) {
                let pad = (area.width as usize).saturating_sub(text.chars().count()) / 2;
                row.put(writer, &" ".repeat(pad), colors.foreground, colors.background, false)?;
                row.put(writer, text, *color, colors.background, true)?;
            }
            row.finish(writer, colors.background)?;
        }

        Ok(())
    }
}

/// Centered single message, used while the catalog loads or failed to
pub struct MessageScreen;

impl MessageScreen {
    pub fn render<W: Write>(
        &self,
        writer: &mut W,
        area: Rect,
        message: &str,
        color: Color,
        colors: &ColorScheme,
    ) -> io::Result<()> {
        let middle = area.y + area.height / 2;
        for y in area.y..area.bottom() {
            let mut row = RowWriter::start(writer, area, y)?;
            if y == middle {
                let text = fit_width(message, area.width as usize);
                let pad = (area.width as usize).saturating_sub(text.chars().count()) / 2;
                row.put(writer, &" ".repeat(pad), colors.foreground, colors.background, false)?;
                row.put(writer, &text, color, colors.background, true)?;
            }
            row.finish(writer, colors.background)?;
        }
        Ok(())
    }
}

/// Footer with keybind hints
pub struct Footer;

impl Footer {
    pub fn render<W: Write>(&self, writer: &mut W, area: Rect, colors: &ColorScheme) -> io::Result<()> {
        if area.height == 0 {
            return Ok(());
        }

        let mut row = RowWriter::start(writer, area, area.y)?;
        let hints = [
            ("c", "Cavala"),
            ("d", "Deck"),
            ("s", "Single"),
            ("Tab", "Pane"),
            ("/", "Search"),
            ("R", "Reset"),
            ("?", "Help"),
            ("q", "Quit"),
        ];
        for (key, action) in hints {
            row.put(writer, key, colors.accent, colors.background, true)?;
            row.put(writer, &format!(":{} ", action), colors.foreground, colors.background, false)?;
        }
        row.finish(writer, colors.background)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<EventRow> {
        vec![
            EventRow::Header("Wins".into()),
            EventRow::Item {
                title: "Big Win".into(),
                detail: "plain \x1b[1mbold\x1b[0m".into(),
            },
            EventRow::Header("Daily".into()),
            EventRow::Item {
                title: String::new(),
                detail: String::new(),
            },
        ]
    }

    #[test]
    fn fit_width_truncates_by_chars() {
        assert_eq!(fit_width("short", 10), "short");
        assert_eq!(fit_width("ゆっくりした時間", 5), "ゆっ...");
        assert_eq!(fit_width("abcdef", 2), "ab");
    }

    #[test]
    fn collapsed_list_has_headers_and_titles() {
        let lines = build_lines(&rows(), None, 40);
        let texts: Vec<String> = lines.iter().map(ListLine::text).collect();
        assert_eq!(
            texts,
            vec!["-- Wins --", "▶ Big Win", "", "-- Daily --", "▶ Event"]
        );
        assert_eq!(line_of_item(&lines, 1), Some(4));
    }

    #[test]
    fn expanded_item_shows_styled_detail() {
        let lines = build_lines(&rows(), Some(0), 40);
        assert_eq!(
            lines[1].kind,
            LineKind::Title {
                item: 0,
                expanded: true
            }
        );
        assert_eq!(lines[2].kind, LineKind::Detail);
        assert_eq!(
            lines[2].pieces,
            vec![("plain ".to_string(), false), ("bold".to_string(), true)]
        );
    }

    #[test]
    fn titles_drop_bold_markers() {
        let rows = vec![EventRow::Item {
            title: "\x1b[1mLucky\x1b[0m Break".into(),
            detail: String::new(),
        }];
        let lines = build_lines(&rows, None, 40);
        assert_eq!(lines[0].text(), "▶ Lucky Break");
    }

    #[test]
    fn hint_panel_lists_notices() {
        let colors = ColorScheme::new(&cavala_core::Theme::Dark, true);
        let notices = vec!["No cards found in ./cartas".to_string()];
        let mut out = Vec::new();
        HintPanel
            .render(&mut out, Rect::new(0, 0, 80, 10), &notices, &colors)
            .unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("Not sure where to start?"));
        assert!(text.contains("No cards found in ./cartas"));
    }

    #[test]
    fn wrap_breaks_on_words_and_newlines() {
        let spans = markup::parse_detail("one two three\nfour");
        let lines: Vec<String> = wrap_spans(&spans, 8)
            .iter()
            .map(|l| l.iter().map(|(t, _)| t.as_str()).collect())
            .collect();
        assert_eq!(lines, vec!["one two ", "three", "four"]);
    }

    #[test]
    fn wrap_splits_long_words() {
        let spans = markup::parse_detail("abcdefghij");
        let lines = wrap_spans(&spans, 4);
        assert_eq!(lines.len(), 3);
    }
}
