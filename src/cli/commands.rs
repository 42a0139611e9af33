//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Stash / Bitbucket Server REST client
#[derive(Parser, Debug)]
#[command(name = "stash-api")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Server protocol (http or https)
    #[arg(long, global = true)]
    pub protocol: Option<String>,

    /// Server hostname
    #[arg(short = 'H', long, global = true, env = "STASH_HOST")]
    pub host: Option<String>,

    /// Server port
    #[arg(short, long, global = true)]
    pub port: Option<u16>,

    /// Username for basic auth
    #[arg(short, long, global = true, env = "STASH_USER")]
    pub user: Option<String>,

    /// Password or access token for basic auth
    #[arg(long, global = true, env = "STASH_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Items requested per page
    #[arg(long, global = true)]
    pub page_limit: Option<u32>,

    /// Print only the aggregated items instead of every event
    #[arg(short, long, global = true)]
    pub aggregate: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List projects
    Projects,

    /// List repositories of a project
    Repos {
        /// Project key
        project: String,
    },

    /// Build statuses of a commit
    BuildStatus {
        /// Commit hash
        commit: String,
    },

    /// List pull requests of a repository
    PullRequests {
        /// Project key
        project: String,
        /// Repository slug
        repo: String,
    },

    /// Show one pull request
    PullRequest {
        /// Project key
        project: String,
        /// Repository slug
        repo: String,
        /// Pull request id
        id: u64,
    },

    /// Show whether a pull request can be merged
    PullRequestMerge {
        /// Project key
        project: String,
        /// Repository slug
        repo: String,
        /// Pull request id
        id: u64,
    },

    /// Build statuses of a pull request's head commit
    PullRequestBuildStatus {
        /// Project key
        project: String,
        /// Repository slug
        repo: String,
        /// Pull request id
        id: u64,
    },

    /// List branches of a repository
    Branches {
        /// Project key
        project: String,
        /// Repository slug
        repo: String,
    },

    /// List tags of a repository
    Tags {
        /// Project key
        project: String,
        /// Repository slug
        repo: String,
    },

    /// List commits reachable from a branch
    Commits {
        /// Project key
        project: String,
        /// Repository slug
        repo: String,
        /// Branch name
        branch: String,
    },

    /// Print the raw contents of a file
    FileContents {
        /// Project key
        project: String,
        /// Repository slug
        repo: String,
        /// File path within the repository
        path: String,
        /// Branch or commit to read from
        #[arg(long, default_value = "master")]
        at: String,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one event per line)
    Json,
    /// Indented JSON
    Pretty,
}
