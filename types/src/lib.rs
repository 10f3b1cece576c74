//! Shared types for SORTEO
//!
//! This crate contains the serializable records that flow between the raffle
//! engine (sorteo-core) and whatever shell presents it (sorteo-cli today).
//! Nothing in here carries behavior beyond small accessors; the state machines
//! live in core.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Rounds played per physical prize unit. The last round of every group is
/// the winner round, the two before it are elimination rounds.
pub const ROUNDS_PER_UNIT: u32 = 3;

// ─────────────────────────────────────────────────────────────────────────────
// Catalog Records
// ─────────────────────────────────────────────────────────────────────────────

/// A raffle entrant, as supplied by the participant catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: u64,
    #[serde(alias = "nombre")]
    pub name: String,
    /// Invoice / ticket number that earned the entry
    #[serde(default, alias = "factura")]
    pub invoice: String,
    #[serde(default, alias = "vendedor")]
    pub seller: String,
    #[serde(default, alias = "ciudad")]
    pub city: String,
}

/// A prize with one or more physical units to hand out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prize {
    pub id: u64,
    #[serde(alias = "nombre")]
    pub name: String,
    /// Number of physical units (`cantidad`), always >= 1 once validated
    #[serde(alias = "cantidad")]
    pub quantity: u32,
    #[serde(default, alias = "imagen", skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Prize {
    /// Total rounds this prize is raffled over.
    pub fn total_rounds(&self) -> u32 {
        self.quantity.saturating_mul(ROUNDS_PER_UNIT)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Round Results
// ─────────────────────────────────────────────────────────────────────────────

/// An award: `participant` takes unit `unit` of `prize`, decided in `round`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinnerRecord {
    pub participant: Participant,
    pub prize: Prize,
    /// 1-based round within the prize
    pub round: u32,
    /// 1-based prize unit, `ceil(round / 3)`
    pub unit: u32,
}

/// An elimination round result. Only lives as long as its prize's controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoserRecord {
    pub participant: Participant,
    pub round: u32,
}

/// What the shell gets back from a single spin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    pub round: u32,
    pub is_winner_round: bool,
    pub selection: Participant,
    /// Set only on winner rounds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<u32>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Controller States & Snapshots
// ─────────────────────────────────────────────────────────────────────────────

/// Lifecycle of a single prize's rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RoundState {
    /// Waiting for the next spin
    #[default]
    Idle,
    /// A spin has started and awaits its selection
    RoundInProgress,
    /// Selection recorded, waiting for `advance`
    RoundResolved,
    /// All rounds played, winners handed to the session
    Completed,
}

impl RoundState {
    pub fn name(&self) -> &'static str {
        match self {
            RoundState::Idle => "Idle",
            RoundState::RoundInProgress => "RoundInProgress",
            RoundState::RoundResolved => "RoundResolved",
            RoundState::Completed => "Completed",
        }
    }
}

/// Lifecycle of a whole raffle session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionState {
    /// Between prizes; `next_prize` is valid
    #[default]
    Ready,
    /// A round controller is out for the current prize
    PrizeInProgress,
    /// Every prize has been raffled
    AllComplete,
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Ready => "Ready",
            SessionState::PrizeInProgress => "PrizeInProgress",
            SessionState::AllComplete => "AllComplete",
        }
    }
}

/// Read-only view of a round controller after a transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub prize: Prize,
    pub state: RoundState,
    pub current_round: u32,
    pub total_rounds: u32,
    pub winners: Vec<WinnerRecord>,
    pub losers: Vec<LoserRecord>,
}

/// Read-only view of a session after a transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub state: SessionState,
    /// Index of the next prize to hand out (or the one in progress)
    pub prize_index: usize,
    pub total_prizes: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_prize: Option<Prize>,
    /// Accumulated winners, not yet deduplicated
    pub winners: Vec<WinnerRecord>,
    pub started_at: DateTime<Local>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Report Types
// ─────────────────────────────────────────────────────────────────────────────

/// Winners of one prize, in the order they were drawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrizeWinners {
    pub prize: Prize,
    pub winners: Vec<WinnerRecord>,
}

/// Final results view, grouped by prize in catalog order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinnersReport {
    pub generated_at: DateTime<Local>,
    pub prizes: Vec<PrizeWinners>,
    pub total_winners: usize,
    /// Records dropped by `(participant, prize)` deduplication
    pub duplicates_removed: usize,
}

// ─────────────────────────────────────────────────────────────────────────────
// Shell Configuration
// ─────────────────────────────────────────────────────────────────────────────

fn default_participants_path() -> String {
    "data/participants.json".to_string()
}

fn default_prizes_path() -> String {
    "data/prizes.toml".to_string()
}

fn default_spin_duration_ms() -> u64 {
    2400
}

fn default_spin_frames() -> u32 {
    12
}

fn default_reveal_pause_ms() -> u64 {
    800
}

/// Persisted configuration for the presentation shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellConfig {
    #[serde(default = "default_participants_path")]
    pub participants_path: String,
    #[serde(default = "default_prizes_path")]
    pub prizes_path: String,
    /// Total length of the spin animation; 0 disables pacing
    #[serde(default = "default_spin_duration_ms")]
    pub spin_duration_ms: u64,
    /// Names flashed during one spin
    #[serde(default = "default_spin_frames")]
    pub spin_frames: u32,
    /// Pause before a winner is announced
    #[serde(default = "default_reveal_pause_ms")]
    pub reveal_pause_ms: u64,
    /// Fixed seed for reproducible draws (rehearsals)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            participants_path: default_participants_path(),
            prizes_path: default_prizes_path(),
            spin_duration_ms: default_spin_duration_ms(),
            spin_frames: default_spin_frames(),
            reveal_pause_ms: default_reveal_pause_ms(),
            seed: None,
        }
    }
}

impl ShellConfig {
    /// True when spins should resolve without any animation delay.
    pub fn is_instant(&self) -> bool {
        self.spin_duration_ms == 0 || self.spin_frames == 0
    }

    /// Delay between two animation frames.
    pub fn frame_delay_ms(&self) -> u64 {
        if self.is_instant() {
            0
        } else {
            self.spin_duration_ms / u64::from(self.spin_frames)
        }
    }
}
