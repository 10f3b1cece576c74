//! Raffle session
//!
//! This module provides:
//! - **Controller**: walks the prize catalog and accumulates winners
//! - **Report**: report-time deduplication and the grouped results view
//!
//! # Flow
//!
//! ```text
//! start_session ──▶ next_prize ──▶ run_round × N ──▶ RoundController::advance
//!                        ▲                                   │ Completed(winners)
//!                        └────────── on_prize_complete ◀─────┘
//!                                                            ...
//! next_prize → None (AllComplete) ──▶ complete_session ──▶ deduplicated winners
//! ```

mod controller;
mod report;

#[cfg(test)]
mod session_tests;

pub use controller::{SessionController, start_session};
pub use report::{build_report, dedup_winners};
