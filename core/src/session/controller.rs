//! Session controller
//!
//! Walks the prize catalog in order, hands out one [`RoundController`] per
//! prize and collects the winners each one emits.

use chrono::{DateTime, Local};
use rand::Rng;
use rand::rngs::StdRng;
use sorteo_types::{
    Participant, Prize, RoundResult, SessionSnapshot, SessionState, WinnerRecord, WinnersReport,
};

use super::report::{build_report, dedup_winners};
use crate::error::RaffleError;
use crate::round::{RoundController, validate_prize};
use crate::selection::Selector;

/// Start a session drawing from OS entropy.
pub fn start_session(
    prizes: Vec<Prize>,
    participants: Vec<Participant>,
) -> Result<SessionController, RaffleError> {
    SessionController::with_selector(prizes, participants, Selector::from_entropy())
}

/// Owns the catalogs and the accumulated winners of one raffle.
///
/// Only one prize is in progress at a time: `next_prize` hands out its
/// controller, `on_prize_complete` takes its winners back.
#[derive(Debug)]
pub struct SessionController<R = StdRng> {
    prizes: Vec<Prize>,
    participants: Vec<Participant>,
    winners: Vec<WinnerRecord>,
    prize_index: usize,
    state: SessionState,
    selector: Selector<R>,
    started_at: DateTime<Local>,
}

impl SessionController<StdRng> {
    /// Reproducible session, for rehearsals and tests.
    pub fn seeded(
        prizes: Vec<Prize>,
        participants: Vec<Participant>,
        seed: u64,
    ) -> Result<Self, RaffleError> {
        Self::with_selector(prizes, participants, Selector::seeded(seed))
    }
}

impl<R: Rng> SessionController<R> {
    /// Validate the catalogs and build a session around `selector`.
    ///
    /// Fails before any round controller exists if the participant pool is
    /// empty or a prize has an unusable quantity.
    pub fn with_selector(
        prizes: Vec<Prize>,
        participants: Vec<Participant>,
        selector: Selector<R>,
    ) -> Result<Self, RaffleError> {
        if participants.is_empty() {
            return Err(RaffleError::EmptyPool);
        }
        for prize in &prizes {
            validate_prize(prize)?;
        }

        tracing::info!(
            prizes = prizes.len(),
            participants = participants.len(),
            "Raffle session started"
        );

        Ok(Self {
            prizes,
            participants,
            winners: Vec::new(),
            prize_index: 0,
            state: SessionState::Ready,
            selector,
            started_at: Local::now(),
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn prizes(&self) -> &[Prize] {
        &self.prizes
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Winners accumulated so far, duplicates included.
    pub fn winners(&self) -> &[WinnerRecord] {
        &self.winners
    }

    /// The prize in progress, or the next one to be raffled.
    pub fn current_prize(&self) -> Option<&Prize> {
        match self.state {
            SessionState::AllComplete => None,
            _ => self.prizes.get(self.prize_index),
        }
    }

    pub fn remaining_prizes(&self) -> usize {
        self.prizes.len().saturating_sub(self.prize_index)
    }

    /// Hand out a controller for the next prize.
    ///
    /// Returns `None` (and moves to `AllComplete`) once the catalog is exhausted.
    pub fn next_prize(&mut self) -> Result<Option<RoundController>, RaffleError> {
        match self.state {
            SessionState::PrizeInProgress => {
                return Err(RaffleError::transition("next_prize", self.state.name()));
            }
            SessionState::AllComplete => return Ok(None),
            SessionState::Ready => {}
        }

        let Some(prize) = self.prizes.get(self.prize_index) else {
            self.state = SessionState::AllComplete;
            tracing::info!(winners = self.winners.len(), "All prizes raffled");
            return Ok(None);
        };

        let controller = RoundController::new(prize.clone())?;
        self.state = SessionState::PrizeInProgress;
        tracing::info!(
            prize_id = prize.id,
            prize = %prize.name,
            units = prize.quantity,
            "Prize raffle started"
        );
        Ok(Some(controller))
    }

    /// Start, draw and resolve one round of `round` in a single step.
    pub fn run_round(&mut self, round: &mut RoundController) -> Result<RoundResult, RaffleError> {
        if self.state != SessionState::PrizeInProgress {
            return Err(RaffleError::transition("run_round", self.state.name()));
        }
        let current = self.prizes.get(self.prize_index).map(|p| p.id);
        if current != Some(round.prize().id) {
            tracing::warn!(
                expected = ?current,
                got = round.prize().id,
                "Round controller does not belong to the current prize"
            );
            return Err(RaffleError::transition("run_round", self.state.name()));
        }
        round.start_round()?;
        let selection = self.selector.select(&self.participants)?.clone();
        round.resolve_round(selection)
    }

    /// Take the winners emitted by a completed prize and move past it.
    ///
    /// The list must hold exactly one record per unit of the current prize.
    pub fn on_prize_complete(&mut self, winners: Vec<WinnerRecord>) -> Result<(), RaffleError> {
        let reject =
            |state: SessionState| RaffleError::transition("on_prize_complete", state.name());
        if self.state != SessionState::PrizeInProgress {
            return Err(reject(self.state));
        }
        let Some(prize) = self.prizes.get(self.prize_index) else {
            return Err(reject(self.state));
        };

        let foreign = winners.iter().any(|w| w.prize.id != prize.id);
        if foreign || winners.len() != prize.quantity as usize {
            tracing::warn!(
                prize_id = prize.id,
                expected = prize.quantity,
                got = winners.len(),
                foreign,
                "Rejected winners list for the current prize"
            );
            return Err(reject(self.state));
        }

        tracing::info!(
            prize_id = prize.id,
            winners = winners.len(),
            "Prize raffle completed"
        );
        self.winners.extend(winners);
        self.prize_index += 1;
        self.state = SessionState::Ready;
        Ok(())
    }

    /// Accumulated winners with repeated `(participant, prize)` pairs removed.
    /// The first occurrence of each pair is kept.
    pub fn finalize(&self) -> Vec<WinnerRecord> {
        dedup_winners(&self.winners)
    }

    /// Close the session and return the deduplicated winners.
    ///
    /// Valid once every prize has been raffled.
    pub fn complete_session(&mut self) -> Result<Vec<WinnerRecord>, RaffleError> {
        match self.state {
            SessionState::AllComplete => {}
            SessionState::Ready if self.prize_index >= self.prizes.len() => {
                self.state = SessionState::AllComplete;
            }
            _ => {
                return Err(RaffleError::transition(
                    "complete_session",
                    self.state.name(),
                ));
            }
        }

        let winners = self.finalize();
        tracing::info!(
            winners = winners.len(),
            duplicates = self.winners.len() - winners.len(),
            "Raffle session completed"
        );
        Ok(winners)
    }

    /// Results view over the deduplicated winners, grouped by prize.
    pub fn report(&self) -> WinnersReport {
        build_report(&self.prizes, &self.winners)
    }

    /// Abandon the session and rewind to the first prize.
    ///
    /// Any round controller handed out for the current prize must be dropped
    /// by the caller.
    pub fn reset(&mut self) {
        tracing::info!(
            prize_index = self.prize_index,
            discarded_winners = self.winners.len(),
            "Raffle session reset"
        );
        self.winners.clear();
        self.prize_index = 0;
        self.state = SessionState::Ready;
        self.started_at = Local::now();
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            prize_index: self.prize_index,
            total_prizes: self.prizes.len(),
            current_prize: self.current_prize().cloned(),
            winners: self.winners.clone(),
            started_at: self.started_at,
        }
    }
}
