pub mod app;
pub mod draw;
pub mod input;
pub mod ui;

pub use app::App;
pub use draw::{DrawState, EventRow};
pub use input::{InputEvent, InputHandler};
pub use ui::*;
