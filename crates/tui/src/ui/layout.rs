/// Rectangle for layout calculations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self { x, y, width, height }
    }

    pub fn from_terminal_size() -> anyhow::Result<Self> {
        let (width, height) = crossterm::terminal::size()?;
        Ok(Self::new(0, 0, width, height))
    }

    pub fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    pub fn area(&self) -> u16 {
        self.width.saturating_mul(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn inner(&self, margin: u16) -> Self {
        let doubled_margin = margin.saturating_mul(2);
        Self {
            x: self.x.saturating_add(margin),
            y: self.y.saturating_add(margin),
            width: self.width.saturating_sub(doubled_margin),
            height: self.height.saturating_sub(doubled_margin),
        }
    }

    /// A `width` x `height` box centered inside this one, clipped to fit
    pub fn centered(&self, width: u16, height: u16) -> Self {
        let width = width.min(self.width);
        let height = height.min(self.height);
        Self::new(
            self.x + (self.width - width) / 2,
            self.y + (self.height - height) / 2,
            width,
            height,
        )
    }
}

/// Layout manager for the TUI
pub struct Layout {
    terminal_rect: Rect,
}

impl Layout {
    pub fn new() -> anyhow::Result<Self> {
        let terminal_rect = Rect::from_terminal_size()?;
        Ok(Self { terminal_rect })
    }

    pub fn with_rect(terminal_rect: Rect) -> Self {
        Self { terminal_rect }
    }

    pub fn update_terminal_size(&mut self) -> anyhow::Result<()> {
        self.terminal_rect = Rect::from_terminal_size()?;
        Ok(())
    }

    pub fn terminal_rect(&self) -> Rect {
        self.terminal_rect
    }

    /// Calculate layout for the main screen
    pub fn main_layout(&self) -> MainLayout {
        let rect = self.terminal_rect;

        // Title bar: catalog counts (1 line)
        let title_bar = Rect::new(rect.x, rect.y, rect.width, 1);

        // Selection strip: character, deck, single card (3 lines)
        let strip = Rect::new(
            rect.x,
            title_bar.bottom(),
            rect.width,
            3.min(rect.height.saturating_sub(2)),
        );

        // Search box (1 line)
        let search = Rect::new(
            rect.x,
            strip.bottom(),
            rect.width,
            1.min(rect.height.saturating_sub(strip.bottom())),
        );

        // Footer: keybind hints (1 line)
        let footer = Rect::new(rect.x, rect.bottom().saturating_sub(1), rect.width, 1);

        // Event list: everything in between
        let events = Rect::new(
            rect.x,
            search.bottom(),
            rect.width,
            footer.y.saturating_sub(search.bottom()),
        );

        MainLayout {
            title_bar,
            strip,
            search,
            events,
            footer,
        }
    }

    /// Popup area for the pickers
    pub fn picker_area(&self) -> Rect {
        let rect = self.terminal_rect;
        rect.centered(
            70.min(rect.width.saturating_sub(4)),
            rect.height.saturating_sub(4),
        )
    }
}

#[derive(Debug, Clone)]
pub struct MainLayout {
    pub title_bar: Rect,
    pub strip: Rect,
    pub search: Rect,
    pub events: Rect,
    pub footer: Rect,
}
