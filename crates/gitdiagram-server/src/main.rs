use std::future::Future;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use gitdiagram_pipeline::{GithubSource, LlmCompletion, Pipeline};
use gitdiagram_server::config::ServiceConfig;
use gitdiagram_server::store::MemoryCacheStore;
use gitdiagram_server::{app, build_runtime, observability};

#[derive(Parser)]
#[command(name = "gitdiagram", about = "Architecture diagrams for GitHub repositories")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve diagrams over HTTP and run the background worker (default)
    Serve,
    /// Generate one diagram in the foreground and print it
    Generate { owner: String, repo: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    observability::init_tracing("info");
    let config = ServiceConfig::from_env_or_yaml().context("load service config")?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            run_with_shutdown(config, async {
                let _ = tokio::signal::ctrl_c().await;
            })
            .await
        }
        Command::Generate { owner, repo } => generate(&config, &owner, &repo).await,
    }
}

fn build_pipeline(config: &ServiceConfig) -> anyhow::Result<Pipeline> {
    if !gitdiagram_core::ai_configured(&config.ai) {
        tracing::warn!(provider = %config.ai.provider, "no AI key configured");
    }
    let completion = LlmCompletion::new(config.ai.clone()).context("configure completion provider")?;
    let source = GithubSource::new(config.github_api.clone(), config.github_token.clone());
    Ok(Pipeline::new(Arc::new(source), Arc::new(completion)).with_link_host(config.link_host.clone()))
}

async fn generate(config: &ServiceConfig, owner: &str, repo: &str) -> anyhow::Result<()> {
    let artifact = build_pipeline(config)?
        .generate(owner, repo)
        .await
        .with_context(|| format!("generate diagram for {owner}/{repo}"))?;
    println!("{}", artifact.diagram);
    Ok(())
}

async fn run_with_shutdown<F>(config: ServiceConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let pipeline = build_pipeline(&config)?;
    let runtime = build_runtime(pipeline, Arc::new(MemoryCacheStore::new()), config.ttl);
    let worker_task = tokio::spawn(runtime.worker.run(runtime.receiver, config.batch_size));
    let app = app::build_router(runtime.state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("bind {}", config.bind_addr))?;
    tracing::info!(addr = %config.bind_addr, batch_size = config.batch_size, "gitdiagram listening");

    tokio::pin!(shutdown);
    tokio::select! {
        result = axum::serve(listener, app.into_make_service()) => {
            result.context("serve http")?;
        }
        _ = &mut shutdown => {
            tracing::info!("shutdown requested");
        }
    }
    worker_task.abort();
    Ok(())
}
