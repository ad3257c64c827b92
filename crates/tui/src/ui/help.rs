use crate::ui::{ColorScheme, Rect};
use crossterm::{
    cursor,
    style::{Print, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use std::io::{self, Write};

/// Help overlay widget
pub struct HelpOverlay;

impl HelpOverlay {
    pub fn render<W: Write>(
        &self,
        writer: &mut W,
        area: Rect,
        colors: &ColorScheme,
    ) -> io::Result<()> {
        let popup_area = area.centered(
            64.min(area.width.saturating_sub(4)),
            26.min(area.height.saturating_sub(4)),
        );
        if popup_area.width < 3 || popup_area.height < 3 {
            return Ok(());
        }

        let help_lines = [
            "                 CAVALA TRAINER HELP",
            "",
            "Choosing:",
            "  c                Choose the cavala",
            "  d                Add or remove deck cards",
            "  s                Choose the single card",
            "  Tab (in picker)  Next card type",
            "  Enter/Space      Toggle the item under the cursor",
            "",
            "Browsing:",
            "  Tab              Switch between strip and event list",
            "  ←/h, →/l         Move along the selection strip",
            "  ↑/k, ↓/j         Move through events",
            "  Enter/Space      Show events / expand the event",
            "  Page Up/Down     Scroll the event list",
            "",
            "Searching:",
            "  /                Type to filter event titles",
            "  Enter            Keep the filter and stop typing",
            "  Esc              Clear the filter",
            "",
            "Other:",
            "  R                Reset every selection",
            "  ?                Show this help",
            "  q, Ctrl+C        Quit application",
        ];

        clear_popup(writer, popup_area, colors)?;
        render_border(writer, popup_area, colors)?;

        let content_area = popup_area.inner(1);
        for (i, line) in help_lines.iter().enumerate() {
            if i >= content_area.height as usize {
                break;
            }

            writer.queue(cursor::MoveTo(content_area.x, content_area.y + i as u16))?;

            if i == 0 {
                writer.queue(SetForegroundColor(colors.accent))?;
            } else if line.ends_with(':') {
                writer.queue(SetForegroundColor(colors.category))?;
            } else {
                writer.queue(SetForegroundColor(colors.foreground))?;
            }

            let truncated: String = line.chars().take(content_area.width as usize).collect();
            writer.queue(Print(truncated))?;
        }

        if popup_area.width > 20 {
            writer.queue(cursor::MoveTo(
                popup_area.x + popup_area.width - 20,
                popup_area.y + popup_area.height - 1,
            ))?;
            writer.queue(SetForegroundColor(colors.muted))?;
            writer.queue(Print("Press ? to close"))?;
        }

        Ok(())
    }
}

pub(crate) fn clear_popup<W: Write>(
    writer: &mut W,
    area: Rect,
    colors: &ColorScheme,
) -> io::Result<()> {
    for y in area.y..area.bottom() {
        writer.queue(cursor::MoveTo(area.x, y))?;
        writer.queue(SetBackgroundColor(colors.background))?;
        writer.queue(SetForegroundColor(colors.foreground))?;
        writer.queue(Print(" ".repeat(area.width as usize)))?;
    }
    Ok(())
}

pub(crate) fn render_border<W: Write>(
    writer: &mut W,
    area: Rect,
    colors: &ColorScheme,
) -> io::Result<()> {
    if area.width < 2 || area.height < 2 {
        return Ok(());
    }

    writer.queue(SetForegroundColor(colors.border))?;
    writer.queue(SetBackgroundColor(colors.background))?;

    // Top border
    writer.queue(cursor::MoveTo(area.x, area.y))?;
    writer.queue(Print("┌"))?;
    writer.queue(Print("─".repeat(area.width as usize - 2)))?;
    writer.queue(Print("┐"))?;

    // Side borders
    for y in area.y + 1..area.bottom() - 1 {
        writer.queue(cursor::MoveTo(area.x, y))?;
        writer.queue(Print("│"))?;
        writer.queue(cursor::MoveTo(area.right() - 1, y))?;
        writer.queue(Print("│"))?;
    }

    // Bottom border
    writer.queue(cursor::MoveTo(area.x, area.bottom() - 1))?;
    writer.queue(Print("└"))?;
    writer.queue(Print("─".repeat(area.width as usize - 2)))?;
    writer.queue(Print("┘"))?;

    Ok(())
}
