//! Newsreel server
//!
//! Wires the RSS source, card renderer and publish targets into one agent
//! and serves the REST API on port 8081.

mod config;
mod routes;
mod state;

#[cfg(test)]
mod test_support;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use newsreel_agent::{Agent, Pipeline};
use newsreel_core::content::RssFeedSource;
use newsreel_core::media::CardRenderer;
use newsreel_core::publish::{
    MultiTargetPublisher, PublishTarget, Publisher, UnconfiguredTarget, WebhookTarget,
};

use crate::config::{ServerConfig, TargetConfig};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "newsreel_server=debug,newsreel_agent=info,newsreel_core=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    let agent = Agent::new(config.agent.clone(), build_pipeline(&config))
        .context("Invalid initial agent configuration")?;

    if config.agent.auto_post {
        agent
            .start_scheduled()
            .await
            .context("Failed to start scheduled agent")?;
    } else {
        tracing::info!("Auto post disabled, schedule not started");
    }

    let app_state = AppState::new(agent);

    let app = routes::router()
        .with_state(app_state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    // Bind to 0.0.0.0 for localhost/127.0.0.1 compatibility
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("REST API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_pipeline(config: &ServerConfig) -> Pipeline {
    let publisher = config
        .targets
        .iter()
        .fold(MultiTargetPublisher::new(), |publisher, target| {
            publisher.with_target(build_target(target))
        });
    let configured: Vec<String> = publisher
        .targets()
        .into_iter()
        .filter(|t| t.configured)
        .map(|t| t.name)
        .collect();
    tracing::info!("Configured publish targets: [{}]", configured.join(", "));

    let source = RssFeedSource::with_feeds(config.feeds.clone());
    tracing::info!("Using {} default feed(s)", source.feeds().len());

    Pipeline::new(
        Arc::new(source),
        Arc::new(CardRenderer::new()),
        Arc::new(publisher),
    )
}

fn build_target(target: &TargetConfig) -> Arc<dyn PublishTarget> {
    match target.credentials() {
        Some((endpoint, token)) => {
            tracing::info!("{} posts to {}", target.name, endpoint);
            Arc::new(WebhookTarget::new(&target.name, endpoint, token, target.caption_limit))
        }
        None => {
            tracing::warn!("{} credentials not configured", target.name);
            Arc::new(UnconfiguredTarget::new(&target.name))
        }
    }
}
