//! Tests for SessionController sequencing and reporting

use sorteo_types::{Participant, Prize, SessionState, WinnerRecord};

use super::{SessionController, start_session};
use crate::error::RaffleError;
use crate::round::{RoundAdvance, RoundController};

fn participants(names: &[&str]) -> Vec<Participant> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| Participant {
            id: i as u64 + 1,
            name: name.to_string(),
            invoice: format!("F-{:04}", i + 1),
            seller: "Almacén Norte".to_string(),
            city: "Loja".to_string(),
        })
        .collect()
}

fn prize(id: u64, name: &str, quantity: u32) -> Prize {
    Prize {
        id,
        name: name.to_string(),
        quantity,
        image: None,
    }
}

fn catalog() -> Vec<Prize> {
    vec![
        prize(1, "Televisor 55\"", 2),
        prize(5, "Aspiradora Electrolux", 1),
        prize(8, "Bicicleta", 3),
    ]
}

/// Spin every round of `round`, returning the winners it emits.
fn play_prize(session: &mut SessionController, round: &mut RoundController) -> Vec<WinnerRecord> {
    loop {
        session.run_round(round).unwrap();
        if let RoundAdvance::Completed(winners) = round.advance().unwrap() {
            return winners;
        }
    }
}

fn play_session(session: &mut SessionController) {
    while let Some(mut round) = session.next_prize().unwrap() {
        let winners = play_prize(session, &mut round);
        session.on_prize_complete(winners).unwrap();
    }
}

#[test]
fn test_empty_participants_rejected() {
    let err = start_session(catalog(), Vec::new()).unwrap_err();
    assert_eq!(err, RaffleError::EmptyPool);
}

#[test]
fn test_invalid_prize_rejected_before_rounds() {
    let mut prizes = catalog();
    prizes.push(prize(12, "Sin unidades", 0));
    let err = SessionController::seeded(prizes, participants(&["A"]), 1).unwrap_err();
    assert!(matches!(err, RaffleError::InvalidPrizeConfig { prize_id: 12, .. }));
}

#[test]
fn test_full_session_awards_every_unit() {
    let mut session =
        SessionController::seeded(catalog(), participants(&["A", "B", "C", "D"]), 11).unwrap();
    play_session(&mut session);

    assert_eq!(session.state(), SessionState::AllComplete);
    assert_eq!(session.winners().len(), 6);

    for prize in catalog() {
        let units: Vec<u32> = session
            .winners()
            .iter()
            .filter(|w| w.prize.id == prize.id)
            .map(|w| w.unit)
            .collect();
        assert_eq!(units, (1..=prize.quantity).collect::<Vec<_>>());
    }
}

#[test]
fn test_prizes_handed_out_in_catalog_order() {
    let mut session = SessionController::seeded(catalog(), participants(&["A", "B"]), 3).unwrap();
    let mut order = Vec::new();
    while let Some(mut round) = session.next_prize().unwrap() {
        order.push(round.prize().id);
        let winners = play_prize(&mut session, &mut round);
        session.on_prize_complete(winners).unwrap();
    }
    assert_eq!(order, vec![1, 5, 8]);
}

#[test]
fn test_selection_comes_from_participants() {
    let pool = participants(&["A", "B", "C"]);
    let mut session = SessionController::seeded(catalog(), pool.clone(), 5).unwrap();
    let mut round = session.next_prize().unwrap().unwrap();
    for _ in 0..3 {
        let result = session.run_round(&mut round).unwrap();
        assert!(pool.contains(&result.selection));
        round.advance().unwrap();
    }
}

#[test]
fn test_run_round_reports_winner_rounds() {
    let prizes = vec![prize(1, "Televisor", 2)];
    let mut session = SessionController::seeded(prizes, participants(&["A", "B"]), 9).unwrap();
    let mut round = session.next_prize().unwrap().unwrap();

    let mut flags = Vec::new();
    loop {
        let result = session.run_round(&mut round).unwrap();
        flags.push((result.round, result.is_winner_round, result.unit));
        if let RoundAdvance::Completed(_) = round.advance().unwrap() {
            break;
        }
    }
    assert_eq!(
        flags,
        vec![
            (1, false, None),
            (2, false, None),
            (3, true, Some(1)),
            (4, false, None),
            (5, false, None),
            (6, true, Some(2)),
        ]
    );
}

#[test]
fn test_same_seed_same_winners() {
    let pool = participants(&["A", "B", "C", "D", "E", "F"]);
    let mut first = SessionController::seeded(catalog(), pool.clone(), 2026).unwrap();
    let mut second = SessionController::seeded(catalog(), pool, 2026).unwrap();
    play_session(&mut first);
    play_session(&mut second);
    assert_eq!(first.winners(), second.winners());
}

#[test]
fn test_next_prize_while_in_progress_rejected() {
    let mut session = SessionController::seeded(catalog(), participants(&["A"]), 1).unwrap();
    let _round = session.next_prize().unwrap().unwrap();
    assert_eq!(
        session.next_prize().unwrap_err(),
        RaffleError::InvalidStateTransition {
            operation: "next_prize",
            state: "PrizeInProgress",
        }
    );
}

#[test]
fn test_run_round_without_prize_rejected() {
    let mut session = SessionController::seeded(catalog(), participants(&["A"]), 1).unwrap();
    let mut stray = RoundController::new(prize(1, "Televisor", 1)).unwrap();
    assert!(session.run_round(&mut stray).is_err());
    assert_eq!(stray.current_round(), 1);
}

#[test]
fn test_on_prize_complete_requires_prize_in_progress() {
    let mut session = SessionController::seeded(catalog(), participants(&["A"]), 1).unwrap();
    assert!(session.on_prize_complete(Vec::new()).is_err());
}

#[test]
fn test_on_prize_complete_rejects_short_list() {
    let mut session = SessionController::seeded(catalog(), participants(&["A"]), 1).unwrap();
    let _round = session.next_prize().unwrap().unwrap();

    assert_eq!(
        session.on_prize_complete(Vec::new()).unwrap_err(),
        RaffleError::InvalidStateTransition {
            operation: "on_prize_complete",
            state: "PrizeInProgress",
        }
    );
    // Still on the first prize
    assert_eq!(session.state(), SessionState::PrizeInProgress);
    assert_eq!(session.current_prize().map(|p| p.id), Some(1));
    assert!(session.winners().is_empty());
}

#[test]
fn test_on_prize_complete_rejects_other_prize_winners() {
    let mut session = SessionController::seeded(catalog(), participants(&["A", "B"]), 3).unwrap();
    let _round = session.next_prize().unwrap().unwrap();
    session.reset();
    let _round = session.next_prize().unwrap().unwrap();

    // Controller for a prize outside the catalog, played by hand
    let mut stray = RoundController::new(prize(99, "Licuadora", 2)).unwrap();
    let pool = participants(&["A", "B"]);
    let stray_winners = loop {
        stray.start_round().unwrap();
        stray.resolve_round(pool[0].clone()).unwrap();
        if let RoundAdvance::Completed(winners) = stray.advance().unwrap() {
            break winners;
        }
    };
    assert_eq!(stray_winners.len(), 2);

    assert!(session.on_prize_complete(stray_winners).is_err());
    assert!(session.winners().is_empty());
    assert_eq!(session.snapshot().prize_index, 0);
}

#[test]
fn test_run_round_rejects_other_prize_controller() {
    let mut session = SessionController::seeded(catalog(), participants(&["A"]), 1).unwrap();
    let _round = session.next_prize().unwrap().unwrap();
    let mut stray = RoundController::new(prize(99, "Licuadora", 1)).unwrap();

    assert_eq!(
        session.run_round(&mut stray).unwrap_err(),
        RaffleError::InvalidStateTransition {
            operation: "run_round",
            state: "PrizeInProgress",
        }
    );
    assert_eq!(stray.current_round(), 1);
}

#[test]
fn test_complete_session_requires_all_prizes() {
    let mut session = SessionController::seeded(catalog(), participants(&["A"]), 1).unwrap();
    assert!(session.complete_session().is_err());

    let mut round = session.next_prize().unwrap().unwrap();
    let winners = play_prize(&mut session, &mut round);
    session.on_prize_complete(winners).unwrap();
    assert!(session.complete_session().is_err());
}

#[test]
fn test_complete_session_after_last_prize() {
    let prizes = vec![prize(5, "Aspiradora Electrolux", 1)];
    let mut session =
        SessionController::seeded(prizes, participants(&["A", "B", "C"]), 4).unwrap();
    let mut round = session.next_prize().unwrap().unwrap();
    let winners = play_prize(&mut session, &mut round);
    session.on_prize_complete(winners).unwrap();

    // Last prize done; completing without another next_prize is allowed
    let final_winners = session.complete_session().unwrap();
    assert_eq!(session.state(), SessionState::AllComplete);
    assert_eq!(final_winners.len(), 1);
    assert_eq!(final_winners[0].unit, 1);
    assert!(session.next_prize().unwrap().is_none());
}

#[test]
fn test_finalize_removes_repeat_winners() {
    // A single participant wins every unit of every prize
    let mut session = SessionController::seeded(catalog(), participants(&["Solo"]), 1).unwrap();
    play_session(&mut session);
    assert_eq!(session.winners().len(), 6);

    let finalized = session.complete_session().unwrap();
    assert_eq!(finalized.len(), 3);
    let mut pairs: Vec<(u64, u64)> = finalized
        .iter()
        .map(|w| (w.participant.id, w.prize.id))
        .collect();
    pairs.sort_unstable();
    pairs.dedup();
    assert_eq!(pairs.len(), finalized.len());
    // First unit of each prize is the one kept
    assert!(finalized.iter().all(|w| w.unit == 1));
}

#[test]
fn test_finalize_with_injected_duplicate() {
    let pool = participants(&["A", "B"]);
    let tv = prize(1, "Televisor", 2);
    let mut session = SessionController::seeded(vec![tv.clone()], pool.clone(), 1).unwrap();
    let _round = session.next_prize().unwrap().unwrap();

    let dup = |unit: u32| WinnerRecord {
        participant: pool[0].clone(),
        prize: tv.clone(),
        round: unit * 3,
        unit,
    };
    session.on_prize_complete(vec![dup(1), dup(2)]).unwrap();

    let finalized = session.finalize();
    assert_eq!(finalized.len(), 1);
    assert_eq!(finalized[0].unit, 1);
    assert_eq!(session.report().duplicates_removed, 1);
}

#[test]
fn test_reset_rewinds_to_first_prize() {
    let mut session = SessionController::seeded(catalog(), participants(&["A", "B"]), 8).unwrap();
    let mut round = session.next_prize().unwrap().unwrap();
    let winners = play_prize(&mut session, &mut round);
    session.on_prize_complete(winners).unwrap();
    let _abandoned = session.next_prize().unwrap().unwrap();

    session.reset();
    assert_eq!(session.state(), SessionState::Ready);
    assert!(session.winners().is_empty());
    assert_eq!(session.current_prize().map(|p| p.id), Some(1));
    assert_eq!(session.remaining_prizes(), 3);
}

#[test]
fn test_snapshot_tracks_progress() {
    let mut session = SessionController::seeded(catalog(), participants(&["A", "B"]), 8).unwrap();
    let snapshot = session.snapshot();
    assert_eq!(snapshot.state, SessionState::Ready);
    assert_eq!(snapshot.prize_index, 0);
    assert_eq!(snapshot.total_prizes, 3);
    assert_eq!(snapshot.current_prize.map(|p| p.id), Some(1));

    let mut round = session.next_prize().unwrap().unwrap();
    let winners = play_prize(&mut session, &mut round);
    session.on_prize_complete(winners).unwrap();

    let snapshot = session.snapshot();
    assert_eq!(snapshot.prize_index, 1);
    assert_eq!(snapshot.winners.len(), 2);
    assert_eq!(snapshot.current_prize.map(|p| p.id), Some(5));
}

#[test]
fn test_empty_prize_catalog_completes_immediately() {
    let mut session = SessionController::seeded(Vec::new(), participants(&["A"]), 1).unwrap();
    assert!(session.next_prize().unwrap().is_none());
    assert_eq!(session.state(), SessionState::AllComplete);
    assert!(session.complete_session().unwrap().is_empty());
}
