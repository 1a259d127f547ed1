//! CLI Tooling
//!
//! Command-line surface over the grouping and pin-tree operations. Each command returns its
//! output as a string; the binary decides where it goes.

use crate::config::{ClientConfig, ConfigLoader};
use crate::error::ApiError;
use crate::grouping::{group_source, plan::plan_groups, FsSourceLister, Group};
use crate::logging::LoggingConfig;
use crate::store::ipfs::IpfsHttpStore;
use crate::store::ContentStore;
use crate::tree::render::{render_report, render_tops, render_tree};
use crate::tree::{build_and_reduce, top_nodes, TreeBuilder};
use clap::{Parser, Subcommand};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde_json::json;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Metaclient CLI - group sources for archiving and find the top-level pins of a store
#[derive(Parser, Debug)]
#[command(name = "metaclient")]
#[command(about = "Size-bounded grouping and pin-tree reduction for content-addressed storage")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Shorthand for --log-level debug
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Apply the logging flags on top of the configured logging section.
    pub fn logging_config(&self, base: &LoggingConfig) -> LoggingConfig {
        let mut config = base.clone();
        if self.verbose {
            config.level = "debug".to_string();
        }
        if let Some(level) = &self.log_level {
            config.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.format = format.clone();
        }
        if let Some(output) = &self.log_output {
            config.output = output.clone();
        }
        if let Some(file) = &self.log_file {
            config.file = Some(file.clone());
        }
        config
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Group the entries of a directory into size-bounded batches
    Group {
        /// Source directory
        path: PathBuf,
        /// Group capacity in bytes (defaults to grouping.limit_bytes)
        #[arg(long)]
        limit: Option<u64>,
        /// Output format (text or json)
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
        /// Emit archive plans instead of the raw groups
        #[arg(long)]
        plan: bool,
    },
    /// Build the pin tree and show which pins are top-level
    Tree {
        /// Store API endpoint (defaults to store.api_url)
        #[arg(long)]
        api_url: Option<String>,
        /// Store queries allowed in flight (defaults to tree.concurrency)
        #[arg(long)]
        concurrency: Option<usize>,
        /// Also print the full tree
        #[arg(long)]
        all: bool,
        /// Output format (text or json)
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },
    /// List pinned hashes
    Pins {
        /// Store API endpoint (defaults to store.api_url)
        #[arg(long)]
        api_url: Option<String>,
        /// Output format (text or json)
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },
    /// Print the effective configuration as TOML
    Config,
}

/// CLI context holding the loaded configuration and the cancellation handle
pub struct CliContext {
    config: ClientConfig,
    cancel: CancellationToken,
}

impl CliContext {
    /// Load configuration and create a context.
    ///
    /// With `config_path` the file must exist; otherwise `client.toml` in `working_dir` is
    /// used when present.
    pub fn new(working_dir: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = match &config_path {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(&working_dir)?,
        };
        Ok(Self::with_config(config))
    }

    pub fn with_config(config: ClientConfig) -> Self {
        Self {
            config,
            cancel: CancellationToken::new(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Token that aborts a running `tree` build; the partial result is still printed.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Execute a CLI command, connecting to the configured store when it needs one.
    pub async fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Tree { api_url, .. } | Commands::Pins { api_url, .. } => {
                let store = self.connect(api_url.as_deref())?;
                self.execute_with_store(command, &store).await
            }
            Commands::Group { .. } | Commands::Config => self.execute_local(command),
        }
    }

    /// Execute a command against `store` instead of the configured endpoint.
    pub async fn execute_with_store(
        &self,
        command: &Commands,
        store: &dyn ContentStore,
    ) -> Result<String, ApiError> {
        match command {
            Commands::Tree {
                concurrency,
                all,
                format,
                ..
            } => {
                let concurrency = concurrency.unwrap_or(self.config.tree.concurrency);
                if concurrency == 0 {
                    return Err(ApiError::InvalidArgument(
                        "concurrency must be at least 1".to_string(),
                    ));
                }
                self.handle_tree(store, concurrency, *all, format).await
            }
            Commands::Pins { format, .. } => self.handle_pins(store, format).await,
            Commands::Group { .. } | Commands::Config => self.execute_local(command),
        }
    }

    fn execute_local(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Group {
                path,
                limit,
                format,
                plan,
            } => {
                let limit = limit.unwrap_or(self.config.grouping.limit_bytes);
                self.handle_group(path, limit, format, *plan)
            }
            Commands::Config => self.config.to_toml(),
            Commands::Tree { .. } | Commands::Pins { .. } => Err(ApiError::InvalidArgument(
                "command needs a content store".to_string(),
            )),
        }
    }

    fn connect(&self, api_url: Option<&str>) -> Result<IpfsHttpStore, ApiError> {
        let api_url = api_url.unwrap_or(&self.config.store.api_url);
        info!(api_url, "Connecting to content store");
        Ok(IpfsHttpStore::new(api_url, self.config.store.timeout())?)
    }

    fn handle_group(
        &self,
        path: &Path,
        limit: u64,
        format: &str,
        plan: bool,
    ) -> Result<String, ApiError> {
        let groups = group_source(&FsSourceLister::new(), path, limit)?;

        if plan {
            let archive = &self.config.archive;
            let plans = plan_groups(
                &groups,
                &archive.output_dir,
                archive.slice_size_bytes,
                archive.parallel,
            )?;
            if format == "json" {
                return to_json(&plans);
            }
            let mut table = Table::new();
            table.load_preset(UTF8_BORDERS_ONLY);
            table.set_header(vec!["Graph", "Inputs", "Size", "Output"]);
            for plan in &plans {
                table.add_row(vec![
                    plan.graph_name.clone(),
                    plan.inputs.len().to_string(),
                    plan.source_size.to_string(),
                    plan.output_dir.display().to_string(),
                ]);
            }
            return Ok(format!("{}\n\n{}", "Archive plans".bold().underline(), table));
        }

        if format == "json" {
            return to_json(&groups);
        }
        Ok(format_groups_text(&groups, limit))
    }

    async fn handle_tree(
        &self,
        store: &dyn ContentStore,
        concurrency: usize,
        all: bool,
        format: &str,
    ) -> Result<String, ApiError> {
        let builder = TreeBuilder::with_concurrency(store, concurrency)
            .with_cancellation(self.cancel.clone());
        let outcome = build_and_reduce(&builder).await?;

        if format == "json" {
            let tops: Vec<serde_json::Value> = top_nodes(&outcome.root)
                .into_iter()
                .map(|node| {
                    json!({
                        "hash": node.hash,
                        "name": node.name,
                        "size": node.size,
                        "is_directory": node.is_directory,
                    })
                })
                .collect();
            let mut value = json!({ "report": outcome.report, "tops": tops });
            if all {
                value["tree"] = json!(outcome.root);
            }
            return to_json(&value);
        }

        let mut out = String::new();
        if all {
            out.push_str(&render_tree(&outcome.root));
            out.push('\n');
        }
        out.push_str(&render_tops(&outcome.root));
        out.push_str(&render_report(&outcome.report));
        Ok(out)
    }

    async fn handle_pins(&self, store: &dyn ContentStore, format: &str) -> Result<String, ApiError> {
        let pins = store
            .list_pins()
            .await
            .map_err(|source| ApiError::StoreQueryFailure {
                hash: "pin set".to_string(),
                source,
            })?;

        if format == "json" {
            return to_json(&pins);
        }
        if pins.is_empty() {
            return Ok("No pins.".to_string());
        }
        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        table.set_header(vec!["Hash", "Type"]);
        for (hash, pin_type) in &pins {
            table.add_row(vec![hash.clone(), pin_type.to_string()]);
        }
        Ok(format!("{}\n{} pins", table, pins.len()))
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value).map_err(|e| ApiError::Render(e.to_string()))
}

fn format_groups_text(groups: &[Group], limit: u64) -> String {
    if groups.is_empty() {
        return "No items to group.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Group", "Items", "Size", "Entries"]);
    for group in groups {
        let size = if group.is_oversize(limit) {
            format!("{} (over limit)", group.size)
        } else {
            group.size.to_string()
        };
        let entries = group
            .items
            .iter()
            .map(|item| item.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            group.index.to_string(),
            group.len().to_string(),
            size,
            entries,
        ]);
    }
    format!("{}\n{} groups, limit {} bytes", table, groups.len(), limit)
}
