use crate::ui::help::{clear_popup, render_border};
use crate::ui::{fit_width, ColorScheme, Rect};
use cavala_core::CardType;
use crossterm::{
    cursor,
    style::{Attribute, Print, SetAttribute, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use std::io::{self, Write};

/// Rows above the item list: title, type tabs, counter, blank
const HEADER_LINES: u16 = 4;

/// One choosable row in a picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerItem {
    pub label: String,
    pub checked: bool,
}

/// Popup list used to choose the cavala and the cards
pub struct PickerOverlay<'a> {
    pub title: &'a str,
    /// Current card type tab, `None` for the cavala picker
    pub card_type: Option<CardType>,
    pub counter: Option<String>,
    pub items: &'a [PickerItem],
    pub cursor: usize,
    pub scroll: usize,
}

impl PickerOverlay<'_> {
    /// How many items fit in the popup drawn inside `area`
    pub fn list_height(area: Rect) -> usize {
        area.height.saturating_sub(2 + HEADER_LINES + 1) as usize
    }

    pub fn render<W: Write>(
        &self,
        writer: &mut W,
        area: Rect,
        colors: &ColorScheme,
    ) -> io::Result<()> {
        if area.width < 10 || area.height < 8 {
            return Ok(());
        }

        clear_popup(writer, area, colors)?;
        render_border(writer, area, colors)?;

        let content = area.inner(1);
        let width = content.width as usize;

        writer.queue(cursor::MoveTo(content.x, content.y))?;
        writer.queue(SetForegroundColor(colors.accent))?;
        writer.queue(SetAttribute(Attribute::Bold))?;
        writer.queue(Print(fit_width(self.title, width)))?;
        writer.queue(SetAttribute(Attribute::NormalIntensity))?;

        if let Some(current) = self.card_type {
            writer.queue(cursor::MoveTo(content.x, content.y + 1))?;
            let mut used = 0;
            for card_type in CardType::ALL {
                let tab = format!(" {} ", card_type.as_str());
                used += tab.chars().count();
                if used > width {
                    break;
                }
                if card_type == current {
                    writer.queue(SetBackgroundColor(colors.selected_row))?;
                    writer.queue(SetForegroundColor(colors.highlight))?;
                } else {
                    writer.queue(SetBackgroundColor(colors.background))?;
                    writer.queue(SetForegroundColor(colors.muted))?;
                }
                writer.queue(Print(tab))?;
            }
            writer.queue(SetBackgroundColor(colors.background))?;
        }

        if let Some(counter) = &self.counter {
            writer.queue(cursor::MoveTo(content.x, content.y + 2))?;
            writer.queue(SetForegroundColor(colors.hint))?;
            writer.queue(Print(fit_width(counter, width)))?;
        }

        let list_height = Self::list_height(area);
        let list_top = content.y + HEADER_LINES;
        if self.items.is_empty() {
            writer.queue(cursor::MoveTo(content.x, list_top))?;
            writer.queue(SetForegroundColor(colors.muted))?;
            writer.queue(Print(fit_width("  nothing to choose here", width)))?;
        }

        for (offset, (index, item)) in self
            .items
            .iter()
            .enumerate()
            .skip(self.scroll)
            .take(list_height)
            .enumerate()
        {
            let is_cursor = index == self.cursor;
            let mark = if item.checked { "[x]" } else { "[ ]" };
            let line = fit_width(&format!(" {} {}", mark, item.label), width);
            let padded = format!("{:<width$}", line, width = width);

            writer.queue(cursor::MoveTo(content.x, list_top + offset as u16))?;
            let bg = if is_cursor {
                colors.selected_row
            } else {
                colors.background
            };
            let fg = if item.checked {
                colors.chosen
            } else {
                colors.foreground
            };
            writer.queue(SetBackgroundColor(bg))?;
            writer.queue(SetForegroundColor(fg))?;
            writer.queue(Print(padded))?;
        }
        writer.queue(SetBackgroundColor(colors.background))?;

        let footer = if self.card_type.is_some() {
            "Enter: toggle  Tab: type  Esc: close"
        } else {
            "Enter: choose  Esc: close"
        };
        writer.queue(cursor::MoveTo(content.x, content.bottom().saturating_sub(1)))?;
        writer.queue(SetForegroundColor(colors.muted))?;
        writer.queue(Print(fit_width(footer, width)))?;

        Ok(())
    }
}
