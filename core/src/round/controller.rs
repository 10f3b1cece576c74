//! Per-prize round state machine
//!
//! ```text
//! Idle ──start_round──▶ RoundInProgress ──resolve_round──▶ RoundResolved
//!  ▲                                                            │
//!  └──────────────────────── advance (more rounds) ─────────────┤
//!                                                               ▼
//!                                             advance (last round) ──▶ Completed
//! ```

use sorteo_types::{
    LoserRecord, Participant, Prize, ROUNDS_PER_UNIT, RoundResult, RoundSnapshot, RoundState,
    WinnerRecord,
};

use crate::error::RaffleError;

/// Round `round` (1-based) awards a unit iff it closes a group of three.
pub fn is_winner_round(round: u32) -> bool {
    round % ROUNDS_PER_UNIT == 0
}

/// Prize unit decided by `round`: `ceil(round / 3)`.
pub fn unit_for_round(round: u32) -> u32 {
    round.div_ceil(ROUNDS_PER_UNIT)
}

/// Reject prizes that cannot produce a whole number of winner rounds.
pub fn validate_prize(prize: &Prize) -> Result<(), RaffleError> {
    if prize.quantity == 0 {
        return Err(RaffleError::InvalidPrizeConfig {
            prize_id: prize.id,
            reason: "quantity must be at least 1".to_string(),
        });
    }
    if prize.quantity > u32::MAX / ROUNDS_PER_UNIT {
        return Err(RaffleError::InvalidPrizeConfig {
            prize_id: prize.id,
            reason: format!("quantity {} is too large", prize.quantity),
        });
    }
    Ok(())
}

/// Outcome of [`RoundController::advance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundAdvance {
    /// Back to `Idle`, ready for `round`
    Next { round: u32 },
    /// Last round played. Carries every winner of the prize, in round order.
    Completed(Vec<WinnerRecord>),
}

/// Drives the rounds of a single prize.
///
/// Created by the session for each prize and discarded once it reaches
/// [`RoundState::Completed`].
#[derive(Debug, Clone)]
pub struct RoundController {
    prize: Prize,
    state: RoundState,
    current_round: u32,
    total_rounds: u32,
    winners: Vec<WinnerRecord>,
    losers: Vec<LoserRecord>,
}

impl RoundController {
    pub fn new(prize: Prize) -> Result<Self, RaffleError> {
        validate_prize(&prize)?;
        let total_rounds = prize.total_rounds();
        Ok(Self {
            prize,
            state: RoundState::Idle,
            current_round: 1,
            total_rounds,
            winners: Vec::new(),
            losers: Vec::new(),
        })
    }

    pub fn prize(&self) -> &Prize {
        &self.prize
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    pub fn total_rounds(&self) -> u32 {
        self.total_rounds
    }

    /// Winners recorded so far.
    pub fn winners(&self) -> &[WinnerRecord] {
        &self.winners
    }

    pub fn losers(&self) -> &[LoserRecord] {
        &self.losers
    }

    pub fn is_completed(&self) -> bool {
        self.state == RoundState::Completed
    }

    /// `Idle → RoundInProgress`
    pub fn start_round(&mut self) -> Result<(), RaffleError> {
        if self.state != RoundState::Idle {
            return Err(RaffleError::transition("start_round", self.state.name()));
        }
        self.state = RoundState::RoundInProgress;
        tracing::debug!(
            prize_id = self.prize.id,
            round = self.current_round,
            "Round started"
        );
        Ok(())
    }

    /// `RoundInProgress → RoundResolved`, recording `selection` as winner or loser.
    pub fn resolve_round(&mut self, selection: Participant) -> Result<RoundResult, RaffleError> {
        if self.state != RoundState::RoundInProgress {
            return Err(RaffleError::transition("resolve_round", self.state.name()));
        }

        let round = self.current_round;
        let result = if is_winner_round(round) {
            let unit = unit_for_round(round);
            self.winners.push(WinnerRecord {
                participant: selection.clone(),
                prize: self.prize.clone(),
                round,
                unit,
            });
            RoundResult {
                round,
                is_winner_round: true,
                selection,
                unit: Some(unit),
            }
        } else {
            self.losers.push(LoserRecord {
                participant: selection.clone(),
                round,
            });
            RoundResult {
                round,
                is_winner_round: false,
                selection,
                unit: None,
            }
        };

        self.state = RoundState::RoundResolved;
        tracing::debug!(
            prize_id = self.prize.id,
            round,
            participant_id = result.selection.id,
            winner = result.is_winner_round,
            "Round resolved"
        );
        Ok(result)
    }

    /// `RoundResolved → Idle`, or `RoundResolved → Completed` after the last round.
    pub fn advance(&mut self) -> Result<RoundAdvance, RaffleError> {
        if self.state != RoundState::RoundResolved {
            return Err(RaffleError::transition("advance", self.state.name()));
        }

        if self.current_round == self.total_rounds {
            self.state = RoundState::Completed;
            let winners = self.winners.clone();
            tracing::debug!(
                prize_id = self.prize.id,
                winners = winners.len(),
                "Prize rounds completed"
            );
            return Ok(RoundAdvance::Completed(winners));
        }

        self.current_round += 1;
        self.state = RoundState::Idle;
        Ok(RoundAdvance::Next {
            round: self.current_round,
        })
    }

    pub fn snapshot(&self) -> RoundSnapshot {
        RoundSnapshot {
            prize: self.prize.clone(),
            state: self.state,
            current_round: self.current_round,
            total_rounds: self.total_rounds,
            winners: self.winners.clone(),
            losers: self.losers.clone(),
        }
    }
}
