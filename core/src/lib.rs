pub mod catalog;
pub mod context;
pub mod error;
pub mod round;
pub mod selection;
pub mod session;

// Re-exports for convenience
pub use catalog::{Catalog, CatalogError, CatalogFormat, load_participants, load_prizes};
pub use context::{ConfigError, ShellConfig, ShellConfigExt};
pub use error::RaffleError;
pub use round::{RoundAdvance, RoundController, is_winner_round, unit_for_round};
pub use selection::{Selector, select};
pub use session::{SessionController, start_session};
pub use sorteo_types::*;
