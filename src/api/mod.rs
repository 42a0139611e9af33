//! Stash REST resources
//!
//! `StashApi` maps each supported resource to a [`PagedFetch`] and hands
//! back its [`FetchStream`]. Collections are walked page by page; single
//! objects arrive as a one-item page.
//!
//! ```text
//! projects                                  GET projects
//! repos(project)                            GET projects/{p}/repos
//! build_status(commit)                      GET ../../build-status/1.0/commits/{c}
//! pull_requests(project, repo)              GET projects/{p}/repos/{r}/pull-requests
//! pull_request(project, repo, id)           GET .../pull-requests/{id}
//! pull_request_merge(project, repo, id)     GET .../pull-requests/{id}/merge
//! pull_request_build_status(...)            pull_request, then build_status
//! branches(project, repo)                   GET .../branches
//! tags(project, repo)                       GET .../tags
//! commits(project, repo, branch)            GET .../commits?until={branch}
//! file_contents(project, repo, path, at)    GET .../browse/{path}?raw&at={at}
//! ```

use crate::config::StashConfig;
use crate::engine::{FetchStream, PagedFetch};
use crate::error::{Error, Result};
use crate::http::{Endpoint, HttpTransport, Transport};
use crate::pagination::{PagedPaginator, SinglePaginator};
use crate::types::{JsonValue, Method};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Pointers tried, in order, for the head commit of a pull request
const HEAD_COMMIT_POINTERS: [&str; 2] = ["/fromRef/latestChangeset", "/fromRef/latestCommit"];

/// Client for one Stash server
#[derive(Clone)]
pub struct StashApi {
    transport: Arc<dyn Transport>,
    page_limit: Option<u32>,
}

impl StashApi {
    /// Create a client talking HTTP to the configured server
    pub fn new(config: &StashConfig) -> Result<Self> {
        config.validate()?;
        let transport = HttpTransport::new(config)?;
        debug!("Stash API root: {}", transport.base_url());
        Ok(Self::with_transport(Arc::new(transport)).with_page_limit(config.page_limit))
    }

    /// Create a client over any transport
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            page_limit: None,
        }
    }

    /// Page size requested from collection endpoints
    #[must_use]
    pub fn with_page_limit(mut self, limit: Option<u32>) -> Self {
        self.page_limit = limit;
        self
    }

    /// All projects visible to the user
    pub fn projects(&self) -> FetchStream {
        self.paged(Endpoint::new("projects"))
    }

    /// Repositories of a project
    pub fn repos(&self, project: &str) -> FetchStream {
        self.paged(Endpoint::new("projects").segments([project, "repos"]))
    }

    /// Build statuses reported for a commit
    pub fn build_status(&self, commit: &str) -> FetchStream {
        self.paged(Endpoint::new("../../build-status/1.0/commits").segments([commit]))
    }

    /// Pull requests of a repository
    pub fn pull_requests(&self, project: &str, repo: &str) -> FetchStream {
        self.paged(repo_endpoint(project, repo, ["pull-requests"]))
    }

    /// One pull request
    pub fn pull_request(&self, project: &str, repo: &str, id: u64) -> FetchStream {
        self.single(repo_endpoint(project, repo, ["pull-requests", &id.to_string()]))
    }

    /// Mergeability of a pull request
    pub fn pull_request_merge(&self, project: &str, repo: &str, id: u64) -> FetchStream {
        self.single(repo_endpoint(
            project,
            repo,
            ["pull-requests", &id.to_string(), "merge"],
        ))
    }

    /// Build statuses of a pull request's head commit
    ///
    /// Fetches the pull request first; its own events are not reported.
    /// The stream then looks exactly like [`StashApi::build_status`] for the
    /// head commit.
    pub fn pull_request_build_status(&self, project: &str, repo: &str, id: u64) -> FetchStream {
        let api = self.clone();
        self.pull_request(project, repo, id)
            .and_then_fetch(move |pull_requests| {
                let commit = head_commit(&pull_requests)?;
                debug!("Pull request {id} head commit: {commit}");
                Ok(api.build_status(&commit))
            })
    }

    /// Branches of a repository
    pub fn branches(&self, project: &str, repo: &str) -> FetchStream {
        self.paged(repo_endpoint(project, repo, ["branches"]))
    }

    /// Tags of a repository
    pub fn tags(&self, project: &str, repo: &str) -> FetchStream {
        self.paged(repo_endpoint(project, repo, ["tags"]))
    }

    /// Commits reachable from `branch`
    pub fn commits(&self, project: &str, repo: &str, branch: &str) -> FetchStream {
        self.paged(repo_endpoint(project, repo, ["commits"]).query("until", branch))
    }

    /// Raw contents of a file at `branch`
    ///
    /// Each directory of `path` becomes its own path segment. The body is
    /// not JSON, so the single item is a JSON string.
    pub fn file_contents(&self, project: &str, repo: &str, path: &str, branch: &str) -> FetchStream {
        let segments = std::iter::once("browse").chain(path.split('/').filter(|s| !s.is_empty()));
        self.single(
            repo_endpoint(project, repo, segments)
                .flag("raw")
                .query("at", branch),
        )
    }

    fn paged(&self, endpoint: Endpoint) -> FetchStream {
        PagedFetch::new(self.transport.clone(), Method::GET, endpoint)
            .with_paginator(PagedPaginator::new().with_limit(self.page_limit))
            .start()
    }

    fn single(&self, endpoint: Endpoint) -> FetchStream {
        PagedFetch::new(self.transport.clone(), Method::GET, endpoint)
            .with_paginator(SinglePaginator)
            .start()
    }
}

impl fmt::Debug for StashApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StashApi")
            .field("page_limit", &self.page_limit)
            .finish_non_exhaustive()
    }
}

fn repo_endpoint<'a>(
    project: &'a str,
    repo: &'a str,
    rest: impl IntoIterator<Item = &'a str>,
) -> Endpoint {
    Endpoint::new("projects").segments([project, "repos", repo].into_iter().chain(rest))
}

/// Head commit of the first pull request in `items`
pub fn head_commit(items: &[JsonValue]) -> Result<String> {
    let pull_request = items
        .first()
        .ok_or_else(|| Error::extraction("fromRef.latestChangeset"))?;

    HEAD_COMMIT_POINTERS
        .iter()
        .find_map(|pointer| pull_request.pointer(pointer).and_then(JsonValue::as_str))
        .map(str::to_string)
        .ok_or_else(|| Error::extraction("fromRef.latestChangeset"))
}
