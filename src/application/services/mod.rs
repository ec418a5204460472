//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on the port traits (DataSource, Notifier, IconTranslator)
//! but are themselves concrete structs, not traits.

mod menu;
mod tree;

pub use menu::{MenuItemQuery, MenuQuery, MenuService};
pub use tree::TreeService;
