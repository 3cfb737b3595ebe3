//! Sync CLI commands for copying schemas between spaces.

use clap::{Args, Subcommand};
use spacesync_core::{
    ComponentOutcome, ComponentReconciler, GroupReconciler, ManagementClient, Space, SyncError,
    SyncOptions, SyncReport,
};

use crate::config::Config;

/// Sync component schemas from a source space into a target space
#[derive(Debug, Args)]
pub struct SyncCommand {
    #[command(subcommand)]
    command: SyncSubcommand,
}

#[derive(Debug, Args)]
struct SpaceArgs {
    /// Source space id
    #[arg(long)]
    source: String,

    /// Target space id
    #[arg(long)]
    target: String,

    /// Management API token (overrides config and environment)
    #[arg(long)]
    token: Option<String>,
}

#[derive(Debug, Subcommand)]
enum SyncSubcommand {
    /// Sync groups, tags, components and presets
    Components {
        #[command(flatten)]
        spaces: SpaceArgs,

        /// Only sync components of these source group uuids
        #[arg(long, value_delimiter = ',')]
        components_groups: Option<Vec<String>>,

        /// Replace target components instead of overlaying them
        #[arg(long)]
        components_full_sync: bool,
    },

    /// Sync component groups only
    Groups {
        #[command(flatten)]
        spaces: SpaceArgs,
    },
}

impl SyncCommand {
    pub fn run(&self, config: &Config) -> Result<(), SyncCommandError> {
        let spaces = match &self.command {
            SyncSubcommand::Components { spaces, .. } | SyncSubcommand::Groups { spaces } => spaces,
        };
        let client = client_for(spaces, config)?;

        // Use tokio runtime for async operations
        let rt = tokio::runtime::Runtime::new()
            .map_err(|e| SyncCommandError::RuntimeError(e.to_string()))?;

        match &self.command {
            SyncSubcommand::Components {
                spaces,
                components_groups,
                components_full_sync,
            } => {
                let mut options = SyncOptions::new(&spaces.source, &spaces.target)
                    .with_full_sync(*components_full_sync || config.components_full_sync.value);
                if let Some(groups) = selected_groups(components_groups.as_deref()) {
                    options = options.with_components_groups(groups);
                }
                rt.block_on(sync_components(&client, options))
            }
            SyncSubcommand::Groups { spaces } => {
                rt.block_on(sync_groups(&client, &spaces.source, &spaces.target))
            }
        }
    }
}

/// Builds the API client. Fails before any request when no token is known.
fn client_for(spaces: &SpaceArgs, config: &Config) -> Result<ManagementClient, SyncCommandError> {
    let token = spaces
        .token
        .clone()
        .or_else(|| config.oauth_token.value.clone())
        .filter(|t| !t.trim().is_empty())
        .ok_or(SyncCommandError::MissingToken)?;

    let base_url = config.api_base_url();
    tracing::debug!(
        %base_url,
        region = %config.region.value,
        max_retries = config.max_retries.value,
        "Using management API"
    );
    Ok(ManagementClient::new(base_url, token).with_retry(config.retry_config()))
}

/// Non-empty group uuids, or `None` when no filter applies.
fn selected_groups(groups: Option<&[String]>) -> Option<Vec<String>> {
    let selected: Vec<String> = groups?
        .iter()
        .map(|g| g.trim())
        .filter(|g| !g.is_empty())
        .map(str::to_string)
        .collect();
    if selected.is_empty() {
        None
    } else {
        Some(selected)
    }
}

async fn sync_components(
    client: &ManagementClient,
    options: SyncOptions,
) -> Result<(), SyncCommandError> {
    println!(
        "Syncing components from space #{} to space #{}...",
        options.source_space_id, options.target_space_id
    );
    println!();

    tracing::info!(
        source = %options.source_space_id,
        target = %options.target_space_id,
        full_sync = options.components_full_sync,
        "Starting component sync"
    );
    let report = ComponentReconciler::new(client, options).sync().await?;
    log_finished(&report);
    print!("{}", summary(&report));
    Ok(())
}

async fn sync_groups(
    client: &ManagementClient,
    source: &str,
    target: &str,
) -> Result<(), SyncCommandError> {
    println!(
        "Syncing component groups from space #{} to space #{}...",
        source, target
    );
    println!();

    tracing::info!(source, target, "Starting component group sync");
    let mut report = SyncReport::default();
    GroupReconciler::new(Space::new(client, source), Space::new(client, target))
        .sync(&mut report)
        .await?;
    log_finished(&report);
    print!("{}", summary(&report));
    Ok(())
}

fn log_finished(report: &SyncReport) {
    if report.has_failures() {
        tracing::warn!(
            groups_failed = report.groups_failed,
            tags_failed = report.tags_failed,
            components_failed = report.count(ComponentOutcome::Failed),
            presets_failed = report.presets_failed,
            "Sync finished with errors"
        );
    } else {
        tracing::info!("Sync finished");
    }
}

fn summary(report: &SyncReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "  Component groups: {} created, {} existing, {} failed\n",
        report.groups_created, report.groups_existing, report.groups_failed
    ));

    if !report.components.is_empty() {
        out.push_str(&format!(
            "  Internal tags:    {} created, {} reused, {} failed\n",
            report.tags_created, report.tags_reused, report.tags_failed
        ));
        out.push_str(&format!(
            "  Components:       {} created, {} updated, {} skipped, {} failed\n",
            report.count(ComponentOutcome::Created),
            report.count(ComponentOutcome::Updated),
            report.count(ComponentOutcome::Filtered),
            report.count(ComponentOutcome::Failed)
        ));
        out.push_str(&format!(
            "  Presets:          {} created, {} updated, {} failed\n",
            report.presets_created, report.presets_updated, report.presets_failed
        ));

        for result in &report.components {
            if result.outcome == ComponentOutcome::Failed {
                out.push_str(&format!("  ✗ {}\n", result.name));
            }
        }
    }

    out.push('\n');
    if report.has_failures() {
        out.push_str("Sync finished with errors, see the log above.\n");
    } else {
        out.push_str("Sync complete.\n");
    }
    out
}

/// Errors from sync commands
#[derive(Debug)]
pub enum SyncCommandError {
    MissingToken,
    SyncError(SyncError),
    RuntimeError(String),
}

impl std::fmt::Display for SyncCommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncCommandError::MissingToken => write!(
                f,
                "No oauth token configured. Pass --token, set SPACESYNC_OAUTH_TOKEN or add oauth_token to the config file"
            ),
            SyncCommandError::SyncError(e) => write!(f, "{}", e),
            SyncCommandError::RuntimeError(e) => write!(f, "Runtime error: {}", e),
        }
    }
}

impl std::error::Error for SyncCommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SyncCommandError::SyncError(e) => Some(e),
            SyncCommandError::MissingToken | SyncCommandError::RuntimeError(_) => None,
        }
    }
}

impl From<SyncError> for SyncCommandError {
    fn from(e: SyncError) -> Self {
        SyncCommandError::SyncError(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{Parser, Subcommand};
    use tempfile::tempdir;

    #[derive(Parser)]
    struct TestCli {
        #[command(subcommand)]
        command: TestCommands,
    }

    #[derive(Subcommand)]
    enum TestCommands {
        Sync(SyncCommand),
    }

    fn parse(args: &[&str]) -> SyncCommand {
        let mut argv = vec!["spacesync", "sync"];
        argv.extend_from_slice(args);
        match TestCli::try_parse_from(argv).unwrap().command {
            TestCommands::Sync(cmd) => cmd,
        }
    }

    fn empty_config() -> Config {
        let temp_dir = tempdir().unwrap();
        Config::load_with_env(Some(temp_dir.path().join("none.yaml")), |_| None).unwrap()
    }

    #[test]
    fn test_parse_components_options() {
        let cmd = parse(&[
            "components",
            "--source",
            "1",
            "--target",
            "2",
            "--components-groups",
            "a,b",
            "--components-full-sync",
        ]);
        match cmd.command {
            SyncSubcommand::Components {
                spaces,
                components_groups,
                components_full_sync,
            } => {
                assert_eq!(spaces.source, "1");
                assert_eq!(spaces.target, "2");
                assert_eq!(components_groups, Some(vec!["a".to_string(), "b".to_string()]));
                assert!(components_full_sync);
            }
            SyncSubcommand::Groups { .. } => panic!("expected components"),
        }
    }

    #[test]
    fn test_missing_token_fails_before_sync() {
        let cmd = parse(&["groups", "--source", "1", "--target", "2"]);
        let err = cmd.run(&empty_config()).unwrap_err();
        assert!(matches!(err, SyncCommandError::MissingToken));
    }

    #[test]
    fn test_token_flag_overrides_config() {
        let cmd = parse(&["groups", "--source", "1", "--target", "2", "--token", "cli"]);
        let spaces = match &cmd.command {
            SyncSubcommand::Groups { spaces } => spaces,
            SyncSubcommand::Components { .. } => panic!("expected groups"),
        };
        assert!(client_for(spaces, &empty_config()).is_ok());
    }

    #[test]
    fn test_client_uses_configured_api_url() {
        let temp_dir = tempdir().unwrap();
        let config = Config::load_with_env(Some(temp_dir.path().join("none.yaml")), |key| {
            match key {
                "SPACESYNC_OAUTH_TOKEN" => Some("env-token".to_string()),
                "SPACESYNC_API_URL" => Some("http://localhost:9000/v1".to_string()),
                _ => None,
            }
        })
        .unwrap();
        let cmd = parse(&["groups", "--source", "1", "--target", "2"]);
        let spaces = match &cmd.command {
            SyncSubcommand::Groups { spaces } => spaces,
            SyncSubcommand::Components { .. } => panic!("expected groups"),
        };

        let client = client_for(spaces, &config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:9000/v1");
    }

    #[test]
    fn test_selected_groups_ignores_blanks() {
        assert_eq!(selected_groups(None), None);
        assert_eq!(selected_groups(Some(&["".to_string()])), None);
        assert_eq!(
            selected_groups(Some(&[" a ".to_string(), "".to_string()])),
            Some(vec!["a".to_string()])
        );
    }

    #[test]
    fn test_summary_lists_failures() {
        let mut report = SyncReport {
            groups_created: 1,
            ..Default::default()
        };
        report.record("teaser", ComponentOutcome::Created);
        report.record("broken", ComponentOutcome::Failed);

        let text = summary(&report);
        assert!(text.contains("Component groups: 1 created"));
        assert!(text.contains("1 created, 0 updated, 0 skipped, 1 failed"));
        assert!(text.contains("✗ broken"));
        assert!(text.contains("finished with errors"));
    }

    #[test]
    fn test_groups_only_summary() {
        let report = SyncReport::default();
        let text = summary(&report);
        assert!(!text.contains("Components:"));
        assert!(text.contains("Sync complete."));
    }
}
