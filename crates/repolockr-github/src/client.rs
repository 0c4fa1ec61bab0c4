use crate::contents::decode_contents;
use crate::{GitHubApi, GitHubError};
use async_trait::async_trait;
use repolockr_types::{CheckRunAck, CheckRunId, CreateCheckRun, RepoRef, UpdateCheckRun};
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";

const USER_AGENT: &str = concat!("repolockr/", env!("CARGO_PKG_VERSION"));
const API_VERSION: &str = "2022-11-28";

/// Page size for the pull-request files listing (the API maximum).
const FILES_PER_PAGE: usize = 100;
/// The listing stops at 3000 files.
const MAX_FILE_PAGES: usize = 30;

#[derive(Clone, Debug)]
pub struct GitHubClientConfig {
    pub api_base_url: String,
    /// Installation access token. Minting it is the deployment's concern.
    pub token: Option<String>,
}

impl Default for GitHubClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            token: None,
        }
    }
}

/// `reqwest`-backed implementation of [`GitHubApi`].
#[derive(Clone, Debug)]
pub struct GitHubClient {
    http: reqwest::Client,
    config: GitHubClientConfig,
}

#[derive(Debug, Deserialize)]
struct PullRequestFile {
    filename: String,
}

impl GitHubClient {
    pub fn new(config: GitHubClientConfig) -> Result<Self, GitHubError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| GitHubError::Network(e.to_string()))?;
        Ok(Self { http, config })
    }

    fn url(&self, repo: &RepoRef, tail: &str) -> Result<Url, GitHubError> {
        let raw = format!(
            "{}/repos/{}/{}/{}",
            self.config.api_base_url.trim_end_matches('/'),
            repo.owner,
            repo.name,
            tail.trim_start_matches('/')
        );
        Url::parse(&raw).map_err(|e| GitHubError::Decode(format!("invalid API url {raw}: {e}")))
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self
            .http
            .request(method, url)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION);
        match &self.config.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder, what: &str) -> Result<Response, GitHubError> {
        let response = builder
            .send()
            .await
            .map_err(|e| GitHubError::Network(format!("{what}: {e}")))?;
        check_status(response, what).await
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        what: &str,
    ) -> Result<T, GitHubError> {
        let response = self.send(builder, what).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| GitHubError::Decode(format!("{what}: {e}")))
    }
}

/// A full final page means the listing may have more files than were read.
fn listing_truncated(page: usize, batch_len: usize) -> bool {
    page == MAX_FILE_PAGES && batch_len == FILES_PER_PAGE
}

async fn check_status(response: Response, what: &str) -> Result<Response, GitHubError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::NOT_FOUND {
        return Err(GitHubError::NotFound(what.to_string()));
    }
    if status == StatusCode::UNAUTHORIZED {
        return Err(GitHubError::Authentication(format!(
            "{what}: GitHub API authentication failed - check the installation token"
        )));
    }

    let header = |name: &str| {
        response
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let retry_after = header("retry-after").and_then(|s| s.parse::<u64>().ok());
    let exhausted = header("x-ratelimit-remaining").as_deref() == Some("0");
    let throttled = status == StatusCode::TOO_MANY_REQUESTS
        || (status == StatusCode::FORBIDDEN && (exhausted || retry_after.is_some()));
    if throttled {
        return Err(GitHubError::RateLimited {
            retry_after_secs: retry_after.unwrap_or(60),
        });
    }

    let body = response.text().await.unwrap_or_default();
    let message = if body.is_empty() {
        format!("{what}: HTTP {status}")
    } else {
        format!("{what}: {body}")
    };
    Err(GitHubError::Api {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl GitHubApi for GitHubClient {
    async fn fetch_file(
        &self,
        repo: &RepoRef,
        path: &str,
        git_ref: &str,
    ) -> Result<String, GitHubError> {
        let mut url = self.url(repo, &format!("contents/{path}"))?;
        url.query_pairs_mut().append_pair("ref", git_ref);
        debug!(repo = %repo, path, git_ref, "fetching file contents");

        let body: serde_json::Value = self
            .send_json(self.request(Method::GET, url), "get contents")
            .await?;
        decode_contents(&body)
    }

    async fn list_changed_files(
        &self,
        repo: &RepoRef,
        pull_number: u64,
    ) -> Result<Vec<String>, GitHubError> {
        let mut files = Vec::new();

        for page in 1..=MAX_FILE_PAGES {
            let mut url = self.url(repo, &format!("pulls/{pull_number}/files"))?;
            url.query_pairs_mut()
                .append_pair("per_page", &FILES_PER_PAGE.to_string())
                .append_pair("page", &page.to_string());
            debug!(repo = %repo, pull_number, page, "listing pull request files");

            let batch: Vec<PullRequestFile> = self
                .send_json(self.request(Method::GET, url), "list pull request files")
                .await?;
            let batch_len = batch.len();
            files.extend(batch.into_iter().map(|f| f.filename));
            if batch_len < FILES_PER_PAGE {
                break;
            }
            if listing_truncated(page, batch_len) {
                warn!(
                    repo = %repo,
                    pull_number,
                    listed = files.len(),
                    "pull request file listing hit the page limit; later files are not checked"
                );
            }
        }

        Ok(files)
    }

    async fn create_check_run(
        &self,
        repo: &RepoRef,
        request: &CreateCheckRun,
    ) -> Result<CheckRunAck, GitHubError> {
        let url = self.url(repo, "check-runs")?;
        debug!(repo = %repo, head_sha = %request.head_sha, status = %request.status, "creating check run");
        self.send_json(
            self.request(Method::POST, url).json(request),
            "create check run",
        )
        .await
    }

    async fn update_check_run(
        &self,
        repo: &RepoRef,
        id: CheckRunId,
        request: &UpdateCheckRun,
    ) -> Result<CheckRunAck, GitHubError> {
        let url = self.url(repo, &format!("check-runs/{id}"))?;
        debug!(repo = %repo, check_run_id = %id, status = %request.status, "updating check run");
        self.send_json(
            self.request(Method::PATCH, url).json(request),
            "update check run",
        )
        .await
    }
}
