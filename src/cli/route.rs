//! CLI route: single route table and run context. Dispatches to domain services and presentation.

use crate::batch::{plan, BatchDriver};
use crate::cli::parse::{Commands, GenerateArgs, PathArgs};
use crate::cli::presentation::{
    format_status_json, format_status_text, format_summary_text, ConsoleReporter,
};
use crate::config::{CardgenConfig, ConfigLoader, Credentials};
use crate::error::ApiError;
use crate::manifest::load_manifest;
use crate::pacing::FixedPacer;
use crate::provider::GeminiImageClient;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// Runtime context for CLI execution: project root and the merged configuration.
pub struct RunContext {
    project_root: PathBuf,
    config: CardgenConfig,
}

impl RunContext {
    /// Create run context from project root and optional config path. Uses ConfigLoader only.
    pub fn new(project_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&project_root)?
        };
        config.ensure_valid()?;

        let project_root = dunce::canonicalize(&project_root).unwrap_or(project_root);
        Ok(Self {
            project_root,
            config,
        })
    }

    /// Build a context from an already-loaded configuration.
    pub fn with_config(project_root: PathBuf, config: CardgenConfig) -> Result<Self, ApiError> {
        config.ensure_valid()?;
        Ok(Self {
            project_root,
            config,
        })
    }

    pub fn config(&self) -> &CardgenConfig {
        &self.config
    }

    /// Execute a command; no command means `generate` with defaults.
    pub fn execute(&self, command: Option<&Commands>) -> Result<String, ApiError> {
        match command {
            None => self.handle_generate(&GenerateArgs::default()),
            Some(Commands::Generate(args)) => self.handle_generate(args),
            Some(Commands::Status { paths, format }) => self.handle_status(paths, format),
        }
    }

    fn effective_config(&self, paths: &PathArgs) -> CardgenConfig {
        let mut config = self.config.clone();
        if let Some(ref manifest) = paths.manifest {
            config.manifest_path = manifest.clone();
        }
        if let Some(ref output) = paths.output {
            config.output_root = output.clone();
        }
        config
    }

    fn handle_generate(&self, args: &GenerateArgs) -> Result<String, ApiError> {
        let mut config = self.effective_config(&args.paths);
        if let Some(secs) = args.success_delay_secs {
            config.pacing.success_delay_secs = secs;
        }
        if let Some(secs) = args.failure_delay_secs {
            config.pacing.failure_delay_secs = secs;
        }
        if let Some(ref model) = args.model {
            config.provider.model = model.clone();
        }
        config.ensure_valid()?;

        let (manifest_path, output_root) = config.resolve_paths(&self.project_root);
        debug!(
            manifest = %manifest_path.display(),
            output = %output_root.display(),
            dry_run = args.dry_run,
            "Resolved generate paths"
        );

        if args.dry_run {
            let records = load_manifest(&manifest_path)?;
            let summary = plan(&records, &output_root);
            return Ok(format_summary_text(&summary, true));
        }

        // Credential check comes first: a missing key must not touch the manifest or output tree.
        let credentials = Credentials::from_env(&config.provider.api_key_env)?;
        let provider = Arc::new(GeminiImageClient::new(&config.provider, credentials)?);
        let pacer = Arc::new(FixedPacer::from_config(&config.pacing));
        let driver = BatchDriver::new(output_root, provider, pacer)
            .with_reporter(Arc::new(ConsoleReporter));

        let rt = tokio::runtime::Runtime::new()
            .map_err(|e| ApiError::RuntimeError(format!("Failed to create runtime: {}", e)))?;
        let summary = rt.block_on(driver.run_manifest(&manifest_path))?;

        info!(
            generated = summary.generated,
            failed = summary.failed,
            "Generate command finished"
        );
        Ok(format_summary_text(&summary, false))
    }

    fn handle_status(&self, paths: &PathArgs, format: &str) -> Result<String, ApiError> {
        let config = self.effective_config(paths);
        let (manifest_path, output_root) = config.resolve_paths(&self.project_root);
        let records = load_manifest(&manifest_path)?;
        let summary = plan(&records, &output_root);

        match format {
            "json" => format_status_json(&summary, &manifest_path, &output_root),
            "text" => Ok(format_status_text(&summary, &manifest_path, &output_root)),
            other => Err(ApiError::ConfigError(format!(
                "Invalid format: {} (must be 'text' or 'json')",
                other
            ))),
        }
    }
}
