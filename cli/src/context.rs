use std::path::PathBuf;

use sorteo_core::{Catalog, RoundController, SessionController, ShellConfig};

/// Holds all state for the CLI shell.
/// This is a lightweight container - logic lives in the core controllers.
pub struct CliContext {
    /// Stored settings; `config --save` writes exactly this.
    pub config: ShellConfig,
    /// Config file in use. None means the default confy location.
    pub config_file: Option<PathBuf>,
    /// `--fast` for this run only
    pub fast: bool,
    /// `--seed` for this run only
    pub seed: Option<u64>,
    /// Loaded catalogs. None until `load` succeeds.
    pub catalog: Option<Catalog>,
    /// The running raffle. None until `start`.
    pub session: Option<SessionController>,
    /// Controller for the prize currently being raffled.
    pub round: Option<RoundController>,
}

impl CliContext {
    pub fn new(config: ShellConfig) -> Self {
        Self {
            config,
            config_file: None,
            fast: false,
            seed: None,
            catalog: None,
            session: None,
            round: None,
        }
    }

    /// Settings the spin animation runs with, run overrides applied.
    pub fn pacing(&self) -> ShellConfig {
        let mut pacing = self.config.clone();
        if self.fast {
            pacing.spin_duration_ms = 0;
        }
        pacing
    }

    /// Seed for the next session: run override first, then the stored one.
    pub fn session_seed(&self) -> Option<u64> {
        self.seed.or(self.config.seed)
    }

    /// Drop the session and any prize in progress.
    pub fn clear_session(&mut self) {
        self.round = None;
        self.session = None;
    }

    pub fn session_mut(&mut self) -> Result<&mut SessionController, String> {
        self.session
            .as_mut()
            .ok_or_else(|| "No raffle running, use `start` first".to_string())
    }

    pub fn session(&self) -> Result<&SessionController, String> {
        self.session
            .as_ref()
            .ok_or_else(|| "No raffle running, use `start` first".to_string())
    }
}
