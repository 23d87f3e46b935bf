//! CLI subcommand handlers.

use crate::Commands;
use crate::ConfigAction;
use std::path::{Path, PathBuf};
use std::time::Duration;

use gridrun_core::JobCommand;
use gridrun_core::config::{self, GridrunConfig};
use gridrun_core::grid::build_grid;
use gridrun_core::metrics::AccuracyExtractor;
use gridrun_core::runner::ProcessRunner;
use gridrun_core::sweep::ExperimentOrchestrator;
use gridrun_core::sweep_log::SweepLog;

/// Handle a CLI subcommand.
pub async fn handle_command(
    command: Commands,
    workspace: &Path,
    output_dir: Option<&Path>,
) -> anyhow::Result<()> {
    match command {
        Commands::Run => handle_run(workspace, output_dir).await,
        Commands::Plan { json } => handle_plan(workspace, json).await,
        Commands::Report => handle_report(workspace, output_dir).await,
        Commands::Config { action } => handle_config(action, workspace).await,
    }
}

fn load_config_with_output(
    workspace: &Path,
    output_dir: Option<&Path>,
) -> anyhow::Result<GridrunConfig> {
    let mut config = config::load_config(Some(workspace), None)
        .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;
    if let Some(dir) = output_dir {
        config.output.dir = dir.to_path_buf();
    }
    Ok(config)
}

async fn handle_run(workspace: &Path, output_dir: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config_with_output(workspace, output_dir)?;
    let plan = build_grid(&config.sweep);
    if plan.is_empty() {
        println!("Nothing to run: every sweep list in the configuration is empty.");
        return Ok(());
    }

    let mut log = SweepLog::create(
        &config.output.log_path(),
        &config.output.log_title,
        config.console.echo_keywords.clone(),
    )?;

    let runner = match config.runner.timeout_secs {
        Some(secs) => ProcessRunner::with_timeout(Duration::from_secs(secs)),
        None => ProcessRunner::new(),
    };
    let extractor = AccuracyExtractor::new();
    let orchestrator = ExperimentOrchestrator::new(&runner, &extractor, &config.launcher);
    let results = orchestrator.run_sweep(&plan, &mut log).await?;

    let results_path = config.output.results_path();
    gridrun_report::write_results(&results_path, &results)?;

    println!("\nAll experiments completed.");
    println!("Results saved to {}", results_path.display());
    println!(
        "Detailed logs saved to {}",
        config.output.log_path().display()
    );

    let rendered = gridrun_report::render_sweep_charts(&config.output.dir, &results)?;
    print_rendered(&rendered);
    Ok(())
}

async fn handle_plan(workspace: &Path, json: bool) -> anyhow::Result<()> {
    let config = config::load_config(Some(workspace), None)
        .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;
    let plan = build_grid(&config.sweep);

    if json {
        let entries: Vec<serde_json::Value> = plan
            .iter()
            .map(|params| {
                let command = JobCommand::build(&config.launcher, params);
                serde_json::json!({
                    "label": params.label,
                    "epochs": params.epochs,
                    "batch_size": params.batch_size,
                    "learning_rate": params.learning_rate,
                    "command": command,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("Planned runs ({}):", plan.len());
    for params in &plan {
        let command = JobCommand::build(&config.launcher, params);
        println!(
            "  {}: Epochs={}, Batch={}, LR={}",
            params.label, params.epochs, params.batch_size, params.learning_rate
        );
        println!("    {}", command);
    }
    Ok(())
}

async fn handle_report(workspace: &Path, output_dir: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config_with_output(workspace, output_dir)?;
    let results_path = config.output.results_path();
    if !results_path.exists() {
        anyhow::bail!(
            "No results table at {}. Run a sweep first.",
            results_path.display()
        );
    }

    let results = gridrun_report::read_results(&results_path)?;
    if results.is_empty() {
        println!(
            "Results table {} has no rows; nothing to plot.",
            results_path.display()
        );
        return Ok(());
    }

    let rendered = gridrun_report::render_sweep_charts(&config.output.dir, &results)?;
    print_rendered(&rendered);
    Ok(())
}

async fn handle_config(action: ConfigAction, workspace: &Path) -> anyhow::Result<()> {
    match action {
        ConfigAction::Init => {
            let config_dir = workspace.join(".gridrun");
            std::fs::create_dir_all(&config_dir)?;

            let config_path = config_dir.join("config.toml");
            if config_path.exists() {
                println!(
                    "Configuration file already exists at: {}",
                    config_path.display()
                );
                return Ok(());
            }

            let default_config = GridrunConfig::default();
            let toml_str = toml::to_string_pretty(&default_config)?;
            std::fs::write(&config_path, &toml_str)?;
            println!(
                "Created default configuration at: {}",
                config_path.display()
            );
            Ok(())
        }
        ConfigAction::Show => {
            let config = config::load_config(Some(workspace), None)
                .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
            let toml_str = toml::to_string_pretty(&config)?;
            println!("{}", toml_str);
            Ok(())
        }
    }
}

fn print_rendered(paths: &[PathBuf]) {
    if paths.is_empty() {
        return;
    }
    println!("Graphs saved:");
    for pair in paths.chunks(2) {
        let names: Vec<String> = pair
            .iter()
            .map(|p| {
                p.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| p.display().to_string())
            })
            .collect();
        println!("  {}", names.join(", "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_config_init_creates_file() {
        let dir = TempDir::new().unwrap();
        let workspace = dir.path();

        let command = Commands::Config {
            action: ConfigAction::Init,
        };
        handle_command(command, workspace, None).await.unwrap();

        let config_path = workspace.join(".gridrun").join("config.toml");
        assert!(config_path.exists());

        // Verify it's valid TOML
        let content = std::fs::read_to_string(&config_path).unwrap();
        let parsed: GridrunConfig = toml::from_str(&content).unwrap();
        assert_eq!(parsed.launcher.program, "docker");
        assert_eq!(parsed.sweep.default_epochs, 5);
    }

    #[tokio::test]
    async fn test_config_init_idempotent() {
        let dir = TempDir::new().unwrap();
        let workspace = dir.path();

        // First init
        let command = Commands::Config {
            action: ConfigAction::Init,
        };
        handle_command(command, workspace, None).await.unwrap();

        let config_path = workspace.join(".gridrun").join("config.toml");
        let content_first = std::fs::read_to_string(&config_path).unwrap();

        // Second init should not overwrite
        let command = Commands::Config {
            action: ConfigAction::Init,
        };
        handle_command(command, workspace, None).await.unwrap();

        let content_second = std::fs::read_to_string(&config_path).unwrap();
        assert_eq!(content_first, content_second);
    }

    #[tokio::test]
    async fn test_config_show_defaults() {
        let dir = TempDir::new().unwrap();
        let workspace = dir.path();

        // Show should work even without a config file (uses defaults)
        let command = Commands::Config {
            action: ConfigAction::Show,
        };
        let result = handle_command(command, workspace, None).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_config_show_after_init() {
        let dir = TempDir::new().unwrap();
        let workspace = dir.path();

        // Init first
        let init_cmd = Commands::Config {
            action: ConfigAction::Init,
        };
        handle_command(init_cmd, workspace, None).await.unwrap();

        // Show should work with the config file present
        let show_cmd = Commands::Config {
            action: ConfigAction::Show,
        };
        let result = handle_command(show_cmd, workspace, None).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_report_without_results_table_fails() {
        let dir = TempDir::new().unwrap();
        let workspace = dir.path();

        let command = Commands::Report;
        let err = handle_command(command, workspace, Some(workspace))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Run a sweep first"));
    }
}
