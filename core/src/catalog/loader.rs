//! Catalog file loading
//!
//! Accepted layouts:
//! - JSON: a bare array, or an object with a `participants` / `prizes` array
//! - TOML: `[[participants]]` / `[[prizes]]` tables

use std::path::{Path, PathBuf};

use hashbrown::HashSet;
use serde::Deserialize;
use sorteo_types::{Participant, Prize};

use super::CatalogError;
use crate::error::RaffleError;
use crate::round::validate_prize;

/// File format, picked from the extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    Json,
    Toml,
}

impl CatalogFormat {
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("json") => Ok(CatalogFormat::Json),
            Some("toml") => Ok(CatalogFormat::Toml),
            _ => Err(CatalogError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Raw file shapes
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ParticipantsFile {
    #[serde(default, alias = "participantes")]
    participants: Vec<Participant>,
}

#[derive(Debug, Deserialize)]
struct PrizesFile {
    #[serde(default, alias = "premios")]
    prizes: Vec<RawPrize>,
}

/// Quantity as written in the file, before the integer check.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
enum RawQuantity {
    Int(i64),
    Float(f64),
}

#[derive(Debug, Deserialize)]
struct RawPrize {
    id: u64,
    #[serde(alias = "nombre")]
    name: String,
    #[serde(alias = "cantidad")]
    quantity: RawQuantity,
    #[serde(default, alias = "imagen")]
    image: Option<String>,
}

impl RawPrize {
    fn into_prize(self) -> Result<Prize, RaffleError> {
        let prize_id = self.id;
        let invalid = |reason: String| RaffleError::InvalidPrizeConfig { prize_id, reason };

        let whole = match self.quantity {
            RawQuantity::Int(n) => n,
            RawQuantity::Float(f) if f.is_finite() && f.fract() == 0.0 => f as i64,
            RawQuantity::Float(f) => {
                return Err(invalid(format!("quantity {f} is not an integer")));
            }
        };
        if whole <= 0 {
            return Err(invalid(format!("quantity must be at least 1, got {whole}")));
        }
        let quantity =
            u32::try_from(whole).map_err(|_| invalid(format!("quantity {whole} is too large")))?;

        let prize = Prize {
            id: self.id,
            name: self.name,
            quantity,
            image: self.image.filter(|s| !s.is_empty()),
        };
        validate_prize(&prize)?;
        Ok(prize)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Parsing
// ─────────────────────────────────────────────────────────────────────────────

/// Parse a participant catalog. `path` is only used for error messages.
pub fn parse_participants(
    content: &str,
    format: CatalogFormat,
    path: &Path,
) -> Result<Vec<Participant>, CatalogError> {
    let participants = match format {
        CatalogFormat::Json => {
            let value: serde_json::Value =
                serde_json::from_str(content).map_err(|e| json_err(path, e))?;
            if value.is_array() {
                serde_json::from_value(value).map_err(|e| json_err(path, e))?
            } else {
                serde_json::from_value::<ParticipantsFile>(value)
                    .map_err(|e| json_err(path, e))?
                    .participants
            }
        }
        CatalogFormat::Toml => {
            toml::from_str::<ParticipantsFile>(content)
                .map_err(|e| toml_err(path, e))?
                .participants
        }
    };

    if participants.is_empty() {
        return Err(CatalogError::EmptyCatalog {
            path: path.to_path_buf(),
        });
    }
    check_unique_ids(path, "participant", participants.iter().map(|p| p.id))?;
    Ok(participants)
}

/// Parse and validate a prize catalog. `path` is only used for error messages.
pub fn parse_prizes(
    content: &str,
    format: CatalogFormat,
    path: &Path,
) -> Result<Vec<Prize>, CatalogError> {
    let raw = match format {
        CatalogFormat::Json => {
            let value: serde_json::Value =
                serde_json::from_str(content).map_err(|e| json_err(path, e))?;
            if value.is_array() {
                serde_json::from_value(value).map_err(|e| json_err(path, e))?
            } else {
                serde_json::from_value::<PrizesFile>(value)
                    .map_err(|e| json_err(path, e))?
                    .prizes
            }
        }
        CatalogFormat::Toml => {
            toml::from_str::<PrizesFile>(content)
                .map_err(|e| toml_err(path, e))?
                .prizes
        }
    };

    if raw.is_empty() {
        return Err(CatalogError::EmptyCatalog {
            path: path.to_path_buf(),
        });
    }

    let prizes = raw
        .into_iter()
        .map(RawPrize::into_prize)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| CatalogError::Invalid {
            path: path.to_path_buf(),
            source,
        })?;
    check_unique_ids(path, "prize", prizes.iter().map(|p| p.id))?;
    Ok(prizes)
}

fn check_unique_ids(
    path: &Path,
    kind: &'static str,
    ids: impl Iterator<Item = u64>,
) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(CatalogError::DuplicateId {
                path: path.to_path_buf(),
                kind,
                id,
            });
        }
    }
    Ok(())
}

fn json_err(path: &Path, source: serde_json::Error) -> CatalogError {
    CatalogError::ParseJson {
        path: path.to_path_buf(),
        source,
    }
}

fn toml_err(path: &Path, source: toml::de::Error) -> CatalogError {
    CatalogError::ParseToml {
        path: path.to_path_buf(),
        source,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File loading
// ─────────────────────────────────────────────────────────────────────────────

fn read_catalog(path: &Path) -> Result<(String, CatalogFormat), CatalogError> {
    let format = CatalogFormat::from_path(path)?;
    let content = std::fs::read_to_string(path).map_err(|source| CatalogError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok((content, format))
}

pub fn load_participants(path: &Path) -> Result<Vec<Participant>, CatalogError> {
    let (content, format) = read_catalog(path)?;
    let participants = parse_participants(&content, format, path)?;
    tracing::info!(path = %path.display(), count = participants.len(), "Loaded participants");
    Ok(participants)
}

pub fn load_prizes(path: &Path) -> Result<Vec<Prize>, CatalogError> {
    let (content, format) = read_catalog(path)?;
    let prizes = parse_prizes(&content, format, path)?;
    tracing::info!(
        path = %path.display(),
        count = prizes.len(),
        units = prizes.iter().map(|p| u64::from(p.quantity)).sum::<u64>(),
        "Loaded prizes"
    );
    Ok(prizes)
}

/// Both catalogs of a raffle, together with where they came from.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub participants: Vec<Participant>,
    pub prizes: Vec<Prize>,
    pub participants_path: PathBuf,
    pub prizes_path: PathBuf,
}

impl Catalog {
    pub fn load(participants_path: &Path, prizes_path: &Path) -> Result<Self, CatalogError> {
        Ok(Self {
            participants: load_participants(participants_path)?,
            prizes: load_prizes(prizes_path)?,
            participants_path: participants_path.to_path_buf(),
            prizes_path: prizes_path.to_path_buf(),
        })
    }

    /// Units to be awarded across every prize.
    pub fn total_units(&self) -> u64 {
        self.prizes.iter().map(|p| u64::from(p.quantity)).sum()
    }
}
