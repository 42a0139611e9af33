//! CLI runner - executes commands

use crate::api::StashApi;
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::{ConnectionConfig, StashConfig};
use crate::engine::{EventKind, FetchListeners, FetchStream};
use crate::error::Result;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    ///
    /// Returns `Ok(false)` when the fetch reported an `error` event.
    pub async fn run(&self) -> Result<bool> {
        let config = self.stash_config()?;
        let api = StashApi::new(&config)?;
        let stream = self.stream(&api);

        if self.cli.aggregate {
            let items = stream.into_result().await?;
            output(self.cli.format, &Value::Array(items));
            return Ok(true);
        }

        let failed = Arc::new(AtomicBool::new(false));
        let mut listeners = FetchListeners::new();
        let format = self.cli.format;
        for kind in EventKind::ALL {
            listeners.on(kind, move |event| output(format, &event.to_json()));
        }
        {
            let failed = failed.clone();
            listeners.on(EventKind::Error, move |event| {
                failed.store(true, Ordering::SeqCst);
                if let Some(e) = event.error() {
                    error!("Fetch failed: {e}");
                }
            });
        }

        let seen = stream.dispatch(&mut listeners).await;
        debug!("Handled {seen} events");
        Ok(!failed.load(Ordering::SeqCst))
    }

    /// Effective configuration: the config file, then command-line overrides
    pub fn stash_config(&self) -> Result<StashConfig> {
        let mut config = match &self.cli.config {
            Some(path) => StashConfig::from_file(path)?,
            None => StashConfig::new(ConnectionConfig::new(
                self.cli.host.clone().unwrap_or_default(),
            )),
        };

        let connection = &mut config.connection;
        if let Some(protocol) = &self.cli.protocol {
            connection.protocol.clone_from(protocol);
        }
        if let Some(host) = &self.cli.host {
            connection.hostname.clone_from(host);
        }
        if self.cli.port.is_some() {
            connection.port = self.cli.port;
        }
        if self.cli.user.is_some() {
            connection.user.clone_from(&self.cli.user);
        }
        if self.cli.password.is_some() {
            connection.password.clone_from(&self.cli.password);
        }
        if self.cli.page_limit.is_some() {
            config.page_limit = self.cli.page_limit;
        }

        config.validate()?;
        Ok(config)
    }

    /// The fetch selected by the subcommand
    pub fn stream(&self, api: &StashApi) -> FetchStream {
        match &self.cli.command {
            Commands::Projects => api.projects(),
            Commands::Repos { project } => api.repos(project),
            Commands::BuildStatus { commit } => api.build_status(commit),
            Commands::PullRequests { project, repo } => api.pull_requests(project, repo),
            Commands::PullRequest { project, repo, id } => api.pull_request(project, repo, *id),
            Commands::PullRequestMerge { project, repo, id } => {
                api.pull_request_merge(project, repo, *id)
            }
            Commands::PullRequestBuildStatus { project, repo, id } => {
                api.pull_request_build_status(project, repo, *id)
            }
            Commands::Branches { project, repo } => api.branches(project, repo),
            Commands::Tags { project, repo } => api.tags(project, repo),
            Commands::Commits {
                project,
                repo,
                branch,
            } => api.commits(project, repo, branch),
            Commands::FileContents {
                project,
                repo,
                path,
                at,
            } => api.file_contents(project, repo, path, at),
        }
    }
}

fn output(format: OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(value).unwrap_or_default());
        }
        OutputFormat::Pretty => {
            println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
        }
    }
}
