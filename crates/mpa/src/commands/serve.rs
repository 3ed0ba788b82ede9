//! `mpa serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use mpa_config::{CliSettings, Config};
use mpa_server::{run_server, server_config_from_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover mpa.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pages directory (overrides config).
    #[arg(short = 'd', long)]
    pages_dir: Option<PathBuf>,

    /// Global template path (overrides config).
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose output (show discovery and request logs).
    #[arg(short, long)]
    pub verbose: bool,

    /// Enable nested page discovery (default: enabled).
    #[arg(long)]
    nested: Option<bool>,

    /// Disable nested page discovery.
    #[arg(long, conflicts_with = "nested")]
    no_nested: bool,

    /// Log the local URL on startup (default: enabled).
    #[arg(long)]
    open: Option<bool>,

    /// Do not log the local URL on startup.
    #[arg(long, conflicts_with = "open")]
    no_open: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        // Resolve flags before moving into CliSettings
        let nested = self.resolve_nested();
        let open_auto = self.resolve_open_auto();

        // Build CLI settings from args
        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            pages_dir: self.pages_dir,
            template: self.template,
            out_dir: None,
            nested,
            open_auto,
        };

        // Load config
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        // Print startup info
        output.info(&format!(
            "Starting dev server on {}:{}",
            config.server.host, config.server.port
        ));
        output.info(&format!(
            "Pages directory: {}",
            config.pages_resolved.dir.display()
        ));
        output.info(&format!(
            "Template: {}",
            config.pages_resolved.template.display()
        ));

        if config.pages_resolved.output_dir.is_some() {
            output.warning("output_dir configuration is ignored in development mode");
        }

        // Build server config and run
        let server_config = server_config_from_config(&config);
        run_server(server_config)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }

    /// Resolve `nested` from --nested/--no-nested flags.
    fn resolve_nested(&self) -> Option<bool> {
        self.no_nested.then_some(false).or(self.nested)
    }

    /// Resolve `open_auto` from --open/--no-open flags.
    fn resolve_open_auto(&self) -> Option<bool> {
        self.no_open.then_some(false).or(self.open)
    }
}
