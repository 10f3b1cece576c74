//! Final results: deduplication and per-prize grouping

use chrono::Local;
use hashbrown::HashSet;
use sorteo_types::{Prize, PrizeWinners, WinnerRecord, WinnersReport};

/// Drop repeated `(participant.id, prize.id)` pairs, keeping the first.
pub fn dedup_winners(winners: &[WinnerRecord]) -> Vec<WinnerRecord> {
    let mut seen: HashSet<(u64, u64)> = HashSet::with_capacity(winners.len());
    let mut kept = Vec::with_capacity(winners.len());

    for record in winners {
        if seen.insert((record.participant.id, record.prize.id)) {
            kept.push(record.clone());
        } else {
            tracing::warn!(
                participant_id = record.participant.id,
                prize_id = record.prize.id,
                unit = record.unit,
                "Dropping repeated winner from report"
            );
        }
    }
    kept
}

/// Group the deduplicated `winners` under their prizes, in catalog order.
///
/// Prizes without any (remaining) winner still get an empty entry so the
/// report mirrors the catalog.
pub fn build_report(prizes: &[Prize], winners: &[WinnerRecord]) -> WinnersReport {
    let kept = dedup_winners(winners);
    let duplicates_removed = winners.len() - kept.len();

    let mut grouped: Vec<PrizeWinners> = prizes
        .iter()
        .map(|prize| PrizeWinners {
            prize: prize.clone(),
            winners: Vec::new(),
        })
        .collect();

    for record in &kept {
        match grouped.iter_mut().find(|g| g.prize.id == record.prize.id) {
            Some(group) => group.winners.push(record.clone()),
            None => grouped.push(PrizeWinners {
                prize: record.prize.clone(),
                winners: vec![record.clone()],
            }),
        }
    }

    WinnersReport {
        generated_at: Local::now(),
        prizes: grouped,
        total_winners: kept.len(),
        duplicates_removed,
    }
}
