//! Participant and prize catalogs
//!
//! Catalogs are read once at session start from JSON or TOML files and are
//! read-only afterwards. Prize quantities are validated here so a bad
//! catalog never reaches a round controller.

mod error;
mod loader;

pub use error::CatalogError;
pub use loader::{
    Catalog, CatalogFormat, load_participants, load_prizes, parse_participants, parse_prizes,
};
