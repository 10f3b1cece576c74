use std::io::Write;
use std::path::{Path, PathBuf};

use sorteo_core::{
    Catalog, Participant, RoundAdvance, RoundResult, SessionController, SessionState,
    ShellConfig, ShellConfigExt, WinnerRecord, start_session,
};

use crate::context::CliContext;
use crate::spin;

fn describe(participant: &Participant) -> String {
    let mut parts = vec![participant.name.clone()];
    if !participant.invoice.is_empty() {
        parts.push(format!("invoice {}", participant.invoice));
    }
    if !participant.city.is_empty() {
        parts.push(participant.city.clone());
    }
    if !participant.seller.is_empty() {
        parts.push(format!("seller {}", participant.seller));
    }
    parts.join(" | ")
}

pub fn load_catalog(
    ctx: &mut CliContext,
    participants: Option<&str>,
    prizes: Option<&str>,
) -> Result<(), String> {
    if let Some(path) = participants {
        ctx.config.participants_path = path.to_string();
    }
    if let Some(path) = prizes {
        ctx.config.prizes_path = path.to_string();
    }

    let catalog = Catalog::load(
        Path::new(&ctx.config.participants_path),
        Path::new(&ctx.config.prizes_path),
    )
    .map_err(|e| error_chain(&e))?;

    println!(
        "Loaded {} participants and {} prizes ({} units)",
        catalog.participants.len(),
        catalog.prizes.len(),
        catalog.total_units()
    );
    if ctx.session.is_some() {
        println!("Previous raffle discarded");
    }
    ctx.clear_session();
    ctx.catalog = Some(catalog);
    Ok(())
}

/// `error: outer: cause: root cause`
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = format!("error: {err}");
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

pub fn start(ctx: &mut CliContext, seed: Option<u64>) -> Result<(), String> {
    let catalog = ctx
        .catalog
        .as_ref()
        .ok_or("No catalogs loaded, use `load` first")?;

    let prizes = catalog.prizes.clone();
    let participants = catalog.participants.clone();
    let session = match seed.or(ctx.session_seed()) {
        Some(seed) => {
            println!("Using fixed seed {seed}");
            SessionController::seeded(prizes, participants, seed)
        }
        None => start_session(prizes, participants),
    }
    .map_err(|e| format!("error: {e}"))?;

    println!(
        "Raffle ready: {} prizes for {} participants. Use `next` to raffle the first prize.",
        session.prizes().len(),
        session.participants().len()
    );
    ctx.round = None;
    ctx.session = Some(session);
    Ok(())
}

pub fn next_prize(ctx: &mut CliContext) -> Result<(), String> {
    if let Some(round) = ctx.round.as_ref().filter(|r| !r.is_completed()) {
        return Err(format!(
            "'{}' is still being raffled (round {}/{})",
            round.prize().name,
            round.current_round(),
            round.total_rounds()
        ));
    }

    let session = ctx.session_mut()?;
    let number = session.prizes().len() - session.remaining_prizes() + 1;
    let total = session.prizes().len();
    match session.next_prize().map_err(|e| format!("error: {e}"))? {
        Some(round) => {
            let prize = round.prize();
            println!("\n══ Prize {number}/{total}: {} ══", prize.name);
            println!(
                "{} unit(s), {} rounds. Every third round picks a winner.",
                prize.quantity,
                round.total_rounds()
            );
            if let Some(image) = &prize.image {
                println!("Image: {image}");
            }
            ctx.round = Some(round);
        }
        None => {
            ctx.round = None;
            println!("All prizes have been raffled. Use `report` to see the winners.");
        }
    }
    Ok(())
}

fn print_result(result: &RoundResult, total_rounds: u32) {
    match result.unit {
        Some(unit) => println!(
            "Round {}/{} · WINNER of unit {}: {}",
            result.round,
            total_rounds,
            unit,
            describe(&result.selection)
        ),
        None => println!(
            "Round {}/{} · eliminated: {}",
            result.round,
            total_rounds,
            describe(&result.selection)
        ),
    }
}

fn print_prize_winners(winners: &[WinnerRecord]) {
    let Some(first) = winners.first() else {
        return;
    };
    println!("\n'{}' goes to:", first.prize.name);
    for record in winners {
        println!("  unit {}: {}", record.unit, describe(&record.participant));
    }
}

/// Play one round, or the rest of the current prize with `all`.
pub async fn spin(ctx: &mut CliContext, all: bool) -> Result<(), String> {
    let pacing = ctx.pacing();
    let (Some(session), Some(round)) = (ctx.session.as_mut(), ctx.round.as_mut()) else {
        return Err("No prize in progress, use `next` first".to_string());
    };
    if round.is_completed() {
        return Err("This prize is finished, use `next`".to_string());
    }

    let total_rounds = round.total_rounds();
    let completed = loop {
        spin::animate(session.participants(), &pacing).await;
        let result = session.run_round(round).map_err(|e| format!("error: {e}"))?;
        if result.is_winner_round {
            spin::reveal_pause(&pacing).await;
        }
        print_result(&result, total_rounds);

        match round.advance().map_err(|e| format!("error: {e}"))? {
            RoundAdvance::Next { .. } if all => continue,
            RoundAdvance::Next { .. } => break None,
            RoundAdvance::Completed(winners) => break Some(winners),
        }
    };

    if let Some(winners) = completed {
        print_prize_winners(&winners);
        session
            .on_prize_complete(winners)
            .map_err(|e| format!("error: {e}"))?;
        ctx.round = None;
        if session.remaining_prizes() == 0 {
            println!("\nThat was the last prize. Use `report` to see all winners.");
        } else {
            println!("\nUse `next` for the next prize.");
        }
    }
    Ok(())
}

pub fn show_status(ctx: &CliContext) -> Result<(), String> {
    if let Some(catalog) = &ctx.catalog {
        println!(
            "Catalogs: {} participants ({}), {} prizes ({})",
            catalog.participants.len(),
            catalog.participants_path.display(),
            catalog.prizes.len(),
            catalog.prizes_path.display()
        );
    }

    let snapshot = ctx.session()?.snapshot();
    println!(
        "Raffle: {} | prize {}/{} | {} winners so far | started {}",
        snapshot.state.name(),
        (snapshot.prize_index + 1).min(snapshot.total_prizes),
        snapshot.total_prizes,
        snapshot.winners.len(),
        snapshot.started_at.format("%Y-%m-%d %H:%M")
    );

    if let Some(round) = &ctx.round {
        let round = round.snapshot();
        println!(
            "Current prize: {} | {} | round {}/{} | {} winners, {} eliminated",
            round.prize.name,
            round.state.name(),
            round.current_round,
            round.total_rounds,
            round.winners.len(),
            round.losers.len()
        );
    } else if let Some(prize) = snapshot.current_prize {
        println!("Next prize: {}", prize.name);
    }
    Ok(())
}

pub fn show_report(ctx: &mut CliContext) -> Result<(), String> {
    let session = ctx.session_mut()?;
    finish_if_done(session)?;
    let report = session.report();

    println!("\n════════ WINNERS ════════");
    for group in &report.prizes {
        println!("\n{} ({} unit(s))", group.prize.name, group.prize.quantity);
        if group.winners.is_empty() {
            println!("  (not raffled yet)");
        }
        for record in &group.winners {
            println!("  {}. {}", record.unit, describe(&record.participant));
        }
    }
    println!("\nTotal winners: {}", report.total_winners);
    if report.duplicates_removed > 0 {
        println!(
            "Repeated winners removed from the list: {}",
            report.duplicates_removed
        );
    }
    if session.state() != SessionState::AllComplete {
        println!("Raffle still in progress: {} prize(s) left", session.remaining_prizes());
    }
    Ok(())
}

/// Close the session once its last prize has been handed out.
fn finish_if_done(session: &mut SessionController) -> Result<(), String> {
    if session.state() == SessionState::Ready && session.remaining_prizes() == 0 {
        session
            .complete_session()
            .map_err(|e| format!("error: {e}"))?;
    }
    Ok(())
}

pub fn export_report(ctx: &mut CliContext, path: &str) -> Result<(), String> {
    let session = ctx.session_mut()?;
    finish_if_done(session)?;
    let report = session.report();

    let path = PathBuf::from(path);
    let content = serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?;
    std::fs::write(&path, content)
        .map_err(|e| format!("error: failed to write {}: {e}", path.display()))?;
    tracing::info!(path = %path.display(), winners = report.total_winners, "Report exported");
    println!("Report written to {}", path.display());
    Ok(())
}

pub fn reset(ctx: &mut CliContext) -> Result<(), String> {
    ctx.session_mut()?.reset();
    ctx.round = None;
    println!("Raffle reset. Use `next` to start again from the first prize.");
    Ok(())
}

pub fn show_config(ctx: &CliContext, save: bool) -> Result<(), String> {
    let config = &ctx.config;
    println!("participants_path = {}", config.participants_path);
    println!("prizes_path       = {}", config.prizes_path);
    println!("spin_duration_ms  = {}", config.spin_duration_ms);
    println!("spin_frames       = {}", config.spin_frames);
    println!("reveal_pause_ms   = {}", config.reveal_pause_ms);
    match config.seed {
        Some(seed) => println!("seed              = {seed}"),
        None => println!("seed              = (random)"),
    }
    if ctx.fast {
        println!("(this run: --fast, animations off)");
    }
    if let Some(seed) = ctx.seed {
        println!("(this run: --seed {seed})");
    }

    let path = match &ctx.config_file {
        Some(path) => Some(path.clone()),
        None => ShellConfig::config_path().ok(),
    };
    if save {
        match &ctx.config_file {
            Some(path) => config.save_to(path),
            None => config.save(),
        }
        .map_err(|e| format!("error: {e}"))?;
        println!("Configuration saved");
    }
    if let Some(path) = path {
        println!("Config file: {}", path.display());
    }
    Ok(())
}

pub fn exit() {
    let _ = write!(std::io::stdout(), "quitting...");
    let _ = std::io::stdout().flush();
}

#[cfg(test)]
mod tests {
    use super::*;
    use sorteo_core::{Prize, WinnersReport};

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("sorteo-{}-{name}", std::process::id()))
    }

    /// Stored pacing left at its defaults; `--fast` keeps the tests instant.
    fn instant_context() -> CliContext {
        let mut ctx = CliContext::new(ShellConfig::default());
        ctx.fast = true;
        ctx.seed = Some(17);
        let participants = (1..=4)
            .map(|id| Participant {
                id,
                name: format!("Participante {id}"),
                invoice: format!("F-{id:03}"),
                seller: String::new(),
                city: "Ambato".to_string(),
            })
            .collect();
        ctx.catalog = Some(Catalog {
            participants,
            prizes: vec![
                Prize {
                    id: 1,
                    name: "Televisor".to_string(),
                    quantity: 2,
                    image: None,
                },
                Prize {
                    id: 5,
                    name: "Aspiradora Electrolux".to_string(),
                    quantity: 1,
                    image: Some("aspiradora.png".to_string()),
                },
            ],
            participants_path: PathBuf::from("participants.json"),
            prizes_path: PathBuf::from("prizes.toml"),
        });
        ctx
    }

    #[tokio::test]
    async fn full_raffle_through_commands() {
        let mut ctx = instant_context();
        start(&mut ctx, None).unwrap();

        next_prize(&mut ctx).unwrap();
        spin(&mut ctx, true).await.unwrap();
        assert!(ctx.round.is_none());

        next_prize(&mut ctx).unwrap();
        spin(&mut ctx, true).await.unwrap();

        next_prize(&mut ctx).unwrap();
        let session = ctx.session.as_ref().unwrap();
        assert_eq!(session.state(), SessionState::AllComplete);
        assert_eq!(session.winners().len(), 3);

        show_report(&mut ctx).unwrap();
    }

    #[tokio::test]
    async fn spin_without_prize_is_an_error() {
        let mut ctx = instant_context();
        assert!(spin(&mut ctx, false).await.is_err());
        start(&mut ctx, None).unwrap();
        assert!(spin(&mut ctx, false).await.is_err());
    }

    #[tokio::test]
    async fn next_refused_mid_prize() {
        let mut ctx = instant_context();
        start(&mut ctx, None).unwrap();
        next_prize(&mut ctx).unwrap();
        spin(&mut ctx, false).await.unwrap();

        let err = next_prize(&mut ctx).unwrap_err();
        assert!(err.contains("Televisor"));
        assert_eq!(ctx.round.as_ref().unwrap().current_round(), 2);
    }

    #[tokio::test]
    async fn reset_drops_prize_in_progress() {
        let mut ctx = instant_context();
        start(&mut ctx, None).unwrap();
        next_prize(&mut ctx).unwrap();
        spin(&mut ctx, false).await.unwrap();

        reset(&mut ctx).unwrap();
        assert!(ctx.round.is_none());
        let session = ctx.session.as_ref().unwrap();
        assert_eq!(session.state(), SessionState::Ready);
        assert_eq!(session.current_prize().map(|p| p.id), Some(1));
    }

    #[test]
    fn start_requires_catalog() {
        let mut ctx = CliContext::new(ShellConfig::default());
        assert!(start(&mut ctx, None).is_err());
    }

    #[tokio::test]
    async fn export_writes_deduplicated_report() {
        let mut ctx = instant_context();
        // A single participant wins both units of the first prize
        if let Some(catalog) = ctx.catalog.as_mut() {
            catalog.participants.truncate(1);
        }
        start(&mut ctx, None).unwrap();
        while ctx.session.as_ref().unwrap().remaining_prizes() > 0 {
            next_prize(&mut ctx).unwrap();
            spin(&mut ctx, true).await.unwrap();
        }

        let path = scratch_path("report.json");
        export_report(&mut ctx, path.to_str().unwrap()).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        let report: WinnersReport = serde_json::from_str(&content).unwrap();
        assert_eq!(report.total_winners, 2);
        assert_eq!(report.duplicates_removed, 1);
        assert_eq!(report.prizes.len(), 2);
        assert_eq!(report.prizes[0].winners.len(), 1);
        assert_eq!(report.prizes[1].prize.id, 5);
        assert_eq!(
            ctx.session.as_ref().unwrap().state(),
            SessionState::AllComplete
        );
    }

    #[test]
    fn config_save_keeps_run_overrides_out() {
        let mut ctx = instant_context();
        ctx.config.prizes_path = "premios.toml".to_string();
        let path = scratch_path("config.toml");
        ctx.config_file = Some(path.clone());

        show_config(&ctx, true).unwrap();
        let saved = ShellConfig::try_load_from(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(saved.prizes_path, "premios.toml");
        assert_eq!(
            saved.spin_duration_ms,
            ShellConfig::default().spin_duration_ms
        );
        assert_eq!(saved.seed, None);
        assert!(ctx.pacing().is_instant());
    }
}
