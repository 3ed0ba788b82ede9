//! `mpa build` command implementation.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use mpa_build::{BuildPipeline, CopyBundler, Stager};
use mpa_cache::TemplateCache;
use mpa_config::{CliSettings, Config};
use mpa_site::{OutputLayout, PageRenderer, ScanConfig, scan_pages};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Path to configuration file (default: auto-discover mpa.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pages directory (overrides config).
    #[arg(short = 'd', long)]
    pages_dir: Option<PathBuf>,

    /// Global template path (overrides config).
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// Output directory (overrides config).
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Enable verbose output (list every discovered page).
    #[arg(short, long)]
    pub verbose: bool,
}

impl BuildArgs {
    /// Execute the build command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, staging produces no usable
    /// input, or the bundler fails.
    pub(crate) fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();

        // Build CLI settings from args
        let cli_settings = CliSettings {
            pages_dir: self.pages_dir,
            template: self.template,
            out_dir: self.out_dir,
            ..CliSettings::default()
        };

        // Load config
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        tracing::debug!(root = %config.root.display(), "configuration resolved");

        output.info(&format!("mpa v{version} building {}", config.root.display()));
        output.info(&format!(
            "Pages directory: {}",
            config.pages_resolved.dir.display()
        ));
        output.info(&format!(
            "Output directory: {}",
            config.build_resolved.out_dir.display()
        ));

        // Fresh caches at the registry-build boundary
        let cache = Arc::new(TemplateCache::new());
        cache.clear();

        // Discover pages with the batch-mode output layout applied
        let scan_config = ScanConfig {
            pages_dir: config.pages_resolved.dir.clone(),
            template: config.pages_resolved.template.clone(),
            nested: config.pages_resolved.nested,
            layout: OutputLayout::from_pattern(config.pages_resolved.output_dir.clone()),
        };
        let registry = scan_pages(&scan_config, true);

        if registry.is_empty() {
            output.warning("No pages found, building a fallback index page");
        } else if self.verbose || config.verbose {
            for (name, page) in &registry {
                output.info(&format!("  {name} -> {}", page.output_path));
            }
        }

        let renderer = PageRenderer::new(cache)
            .with_default_data(config.pages_resolved.default_data.clone())
            .with_options(config.engine.clone());

        // Stage, bundle, relocate; scratch files are cleaned up either way
        let stager = Stager::new(config.root.clone(), renderer);
        let bundler = CopyBundler::new(config.root.clone());
        let mut pipeline =
            BuildPipeline::new(stager, &bundler, config.build_resolved.out_dir.clone());

        let summary = pipeline.run(&registry)?;

        output.success(&format!(
            "Built {} page(s) into {}",
            summary.pages,
            summary.out_dir.display()
        ));

        Ok(())
    }
}
