//! `repolockr serve`: the webhook receiver and liveness endpoint.

use anyhow::Context;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::Router;
use clap::{Args, ValueEnum};
use repolockr_app::{parse_webhook, ConfigRef, EventRouter, RouterSettings, Topology};
use repolockr_github::webhook::{verify_signature, SIGNATURE_HEADER};
use repolockr_github::{GitHubApi, GitHubClient, GitHubClientConfig, DEFAULT_API_BASE_URL};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, info_span, warn, Instrument};

const EVENT_HEADER: &str = "x-github-event";
const DELIVERY_HEADER: &str = "x-github-delivery";

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address the HTTP server binds to.
    #[arg(long, env = "REPOLOCKR_LISTEN", default_value = "0.0.0.0:3000")]
    listen: SocketAddr,

    /// Id of the GitHub App; check runs owned by other apps are ignored.
    #[arg(long, env = "APP_ID")]
    app_id: u64,

    /// Webhook secret. When set, every delivery must carry a valid `X-Hub-Signature-256`.
    #[arg(long, env = "WEBHOOK_SECRET", hide_env_values = true)]
    webhook_secret: Option<String>,

    /// Installation access token used for REST calls.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    github_token: Option<String>,

    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_BASE_URL)]
    api_base_url: String,

    /// Which events drive the check-run lifecycle.
    #[arg(long, value_enum, default_value_t = TopologyArg::TwoEvent)]
    topology: TopologyArg,

    /// Where `.github/repolockr.yml` is read from.
    #[arg(long, value_enum, default_value_t = ConfigRefArg::Base)]
    config_ref: ConfigRefArg,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum TopologyArg {
    TwoEvent,
    SingleEvent,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ConfigRefArg {
    /// The pull request's base commit.
    Base,
    /// The repository's default branch.
    DefaultBranch,
}

impl ServeArgs {
    fn router_settings(&self) -> RouterSettings {
        RouterSettings {
            app_id: self.app_id,
            topology: match self.topology {
                TopologyArg::TwoEvent => Topology::TwoEvent,
                TopologyArg::SingleEvent => Topology::SingleEvent,
            },
            config_ref: match self.config_ref {
                ConfigRefArg::Base => ConfigRef::BaseCommit,
                ConfigRefArg::DefaultBranch => ConfigRef::DefaultBranch,
            },
        }
    }
}

#[derive(Clone)]
struct AppState {
    router: Arc<EventRouter<Arc<dyn GitHubApi>>>,
    webhook_secret: Option<Arc<str>>,
}

impl AppState {
    fn new(
        github: Arc<dyn GitHubApi>,
        settings: RouterSettings,
        webhook_secret: Option<&str>,
    ) -> Self {
        Self {
            router: Arc::new(EventRouter::new(github, settings)),
            webhook_secret: webhook_secret.map(Arc::from),
        }
    }
}

pub fn run(args: ServeArgs) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("build tokio runtime")?;
    runtime.block_on(serve(args))
}

async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    let settings = args.router_settings();
    let client = GitHubClient::new(GitHubClientConfig {
        api_base_url: args.api_base_url.clone(),
        token: args.github_token.clone(),
    })
    .context("build GitHub client")?;

    if args.webhook_secret.is_none() {
        warn!("no webhook secret configured; deliveries are not authenticated");
    }
    info!(
        app_id = settings.app_id,
        topology = ?settings.topology,
        config_ref = ?settings.config_ref,
        "starting repolockr"
    );

    let state = AppState::new(Arc::new(client), settings, args.webhook_secret.as_deref());

    let listener = TcpListener::bind(args.listen)
        .await
        .with_context(|| format!("bind {}", args.listen))?;
    info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn app(state: AppState) -> Router {
    Router::new()
        .route("/repolockr/statusz", get(statusz))
        .route("/api/github/webhooks", post(receive_webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn statusz() -> &'static str {
    "OK"
}

/// Verify, parse, and hand the delivery to its own task. Answers before the cycle runs.
async fn receive_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, &'static str) {
    let Some(event_name) = header(&headers, EVENT_HEADER) else {
        return (StatusCode::BAD_REQUEST, "missing X-GitHub-Event header");
    };
    let delivery = header(&headers, DELIVERY_HEADER).unwrap_or("unknown").to_string();

    if let Some(secret) = &state.webhook_secret {
        let signature = header(&headers, SIGNATURE_HEADER).unwrap_or_default();
        if !verify_signature(secret, &body, signature) {
            warn!(delivery = %delivery, event = event_name, "rejecting delivery with invalid signature");
            return (StatusCode::UNAUTHORIZED, "invalid signature");
        }
    }

    let event = match parse_webhook(event_name, &body) {
        Ok(Some(event)) => event,
        Ok(None) => {
            debug!(delivery = %delivery, event = event_name, "ignoring unhandled event");
            return (StatusCode::OK, "ignored");
        }
        Err(err) => {
            warn!(delivery = %delivery, event = event_name, error = %err, "Failed to parse webhook");
            return (StatusCode::BAD_REQUEST, "malformed payload");
        }
    };

    let span = info_span!("delivery", delivery = %delivery, event = %event.name());
    let router = Arc::clone(&state.router);
    tokio::spawn(
        async move {
            match router.handle(event).await {
                Ok(disposition) => debug!(?disposition, "delivery handled"),
                Err(err) => error!(error = %err, "delivery aborted"),
            }
        }
        .instrument(span),
    );

    (StatusCode::ACCEPTED, "accepted")
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

async fn shutdown_signal() {
    let _ = signal::ctrl_c().await;
    info!("shutdown requested");
}

#[cfg(test)]
mod tests {
    use super::*;
    use repolockr_github::webhook::sign;
    use repolockr_test_util::FakeGitHub;
    use std::path::PathBuf;
    use std::time::Duration;

    const SECRET: &str = "It's a Secret to Everybody";

    fn fixture(name: &str) -> Vec<u8> {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .parent()
            .expect("repolockr-cli should have parent")
            .parent()
            .expect("crates should have parent")
            .join("tests")
            .join("fixtures")
            .join("webhooks")
            .join(name);
        std::fs::read(&path).unwrap_or_else(|e| panic!("read {path:?}: {e}"))
    }

    async fn spawn_app(github: Arc<FakeGitHub>, secret: Option<&str>) -> SocketAddr {
        let github: Arc<dyn GitHubApi> = github;
        let state = AppState::new(
            github,
            RouterSettings {
                app_id: 99,
                topology: Topology::TwoEvent,
                config_ref: ConfigRef::BaseCommit,
            },
            secret,
        );
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app(state)).await.expect("serve");
        });
        addr
    }

    async fn deliver(
        addr: SocketAddr,
        event: &str,
        body: Vec<u8>,
        signature: Option<String>,
    ) -> reqwest::Response {
        let mut request = reqwest::Client::new()
            .post(format!("http://{addr}/api/github/webhooks"))
            .header(EVENT_HEADER, event)
            .header(DELIVERY_HEADER, "72d3162e-cc78-11e3-81ab-4c9367dc0958")
            .body(body);
        if let Some(signature) = signature {
            request = request.header(SIGNATURE_HEADER, signature);
        }
        request.send().await.expect("send delivery")
    }

    #[tokio::test]
    async fn statusz_reports_ok() {
        let addr = spawn_app(Arc::new(FakeGitHub::new()), None).await;
        let response = reqwest::get(format!("http://{addr}/repolockr/statusz"))
            .await
            .expect("get statusz");
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        assert_eq!(response.text().await.expect("body"), "OK");
    }

    #[tokio::test]
    async fn signed_delivery_is_accepted_and_processed() {
        let github = Arc::new(FakeGitHub::new());
        let addr = spawn_app(Arc::clone(&github), Some(SECRET)).await;

        let body = fixture("pull_request_opened.json");
        let signature = sign(SECRET, &body).expect("sign");
        let response = deliver(addr, "pull_request", body, Some(signature)).await;
        assert_eq!(response.status(), reqwest::StatusCode::ACCEPTED);

        // The cycle runs on its own task; wait for its first call.
        for _ in 0..100 {
            if !github.fetched_refs().is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert_eq!(
            github.fetched_refs(),
            vec!["bbb2220000000000000000000000000000000000".to_string()]
        );
    }

    #[tokio::test]
    async fn bad_signature_is_rejected_without_processing() {
        let github = Arc::new(FakeGitHub::new());
        let addr = spawn_app(Arc::clone(&github), Some(SECRET)).await;

        let body = fixture("pull_request_opened.json");
        let signature = sign("wrong secret", &body).expect("sign");
        let response = deliver(addr, "pull_request", body, Some(signature)).await;
        assert_eq!(response.status(), reqwest::StatusCode::UNAUTHORIZED);

        let unsigned = deliver(addr, "pull_request", fixture("pull_request_opened.json"), None).await;
        assert_eq!(unsigned.status(), reqwest::StatusCode::UNAUTHORIZED);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(github.calls().is_empty());
    }

    #[tokio::test]
    async fn unhandled_and_malformed_deliveries() {
        let addr = spawn_app(Arc::new(FakeGitHub::new()), None).await;

        let ping = deliver(addr, "ping", br#"{"zen":"Keep it logically awesome."}"#.to_vec(), None).await;
        assert_eq!(ping.status(), reqwest::StatusCode::OK);
        assert_eq!(ping.text().await.expect("body"), "ignored");

        let malformed = deliver(addr, "check_run", b"{".to_vec(), None).await;
        assert_eq!(malformed.status(), reqwest::StatusCode::BAD_REQUEST);

        let missing_event = reqwest::Client::new()
            .post(format!("http://{addr}/api/github/webhooks"))
            .body("{}")
            .send()
            .await
            .expect("send");
        assert_eq!(missing_event.status(), reqwest::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn serve_args_map_to_router_settings() {
        let args = ServeArgs {
            listen: "127.0.0.1:3000".parse().expect("addr"),
            app_id: 42,
            webhook_secret: None,
            github_token: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            topology: TopologyArg::SingleEvent,
            config_ref: ConfigRefArg::DefaultBranch,
        };
        let settings = args.router_settings();
        assert_eq!(settings.app_id, 42);
        assert_eq!(settings.topology, Topology::SingleEvent);
        assert_eq!(settings.config_ref, ConfigRef::DefaultBranch);
    }
}
