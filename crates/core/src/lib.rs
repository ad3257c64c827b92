pub mod catalog;
pub mod config;
pub mod error;
pub mod filter;
pub mod markup;
pub mod model;
pub mod selection;
pub mod session;

pub use catalog::{Catalog, CatalogLoader, RecordSource};
pub use config::Config;
pub use error::{CoreError, Result};
pub use filter::{visible_events, CategoryView, SearchQuery, SEARCH_PLACEHOLDER};
pub use model::*;
pub use selection::{CardSlot, CardToggle, EntityRef, FocusOutcome, SelectionState, MAX_DECK_SIZE};
pub use session::{RenderSink, Session};
