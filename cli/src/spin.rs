//! Spin pacing for the terminal shell
//!
//! Purely visual: names flicker for the configured duration before the
//! round is actually drawn. The flicker never touches the session's random
//! source, so a seeded session draws the same winners with or without it.

use std::io::Write;
use std::time::Duration;

use rand::seq::SliceRandom;
use sorteo_core::{Participant, ShellConfig};

/// Flash random participant names, one per frame.
pub async fn animate(participants: &[Participant], config: &ShellConfig) {
    if config.is_instant() || participants.is_empty() {
        return;
    }

    let frames: Vec<&str> = {
        let mut rng = rand::thread_rng();
        (0..config.spin_frames)
            .filter_map(|_| participants.choose(&mut rng))
            .map(|p| p.name.as_str())
            .collect()
    };
    let delay = Duration::from_millis(config.frame_delay_ms());

    let mut stdout = std::io::stdout();
    for name in frames {
        let _ = write!(stdout, "\r  » {:<48}", name);
        let _ = stdout.flush();
        tokio::time::sleep(delay).await;
    }
    let _ = write!(stdout, "\r{:<52}\r", "");
    let _ = stdout.flush();
}

/// Dramatic pause before announcing a winner.
pub async fn reveal_pause(config: &ShellConfig) {
    if config.is_instant() || config.reveal_pause_ms == 0 {
        return;
    }
    tokio::time::sleep(Duration::from_millis(config.reveal_pause_ms)).await;
}
