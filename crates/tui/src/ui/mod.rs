pub mod colors;
pub mod help;
pub mod layout;
pub mod picker;
pub mod widgets;

pub use colors::ColorScheme;
pub use help::HelpOverlay;
pub use layout::{Layout, Rect};
pub use picker::{PickerItem, PickerOverlay};
pub use widgets::*;
