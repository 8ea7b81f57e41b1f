use clap::{Parser, Subcommand};
use mindloop_agent::governor::DEFAULT_CAPACITY;
use mindloop_agent::{GatedBackend, Governor, ModelConfig, OpenAiBackend};
use mindloop_core::{JobStatus, ToolRegistry};
use mindloop_memory::{
    EmbeddingProvider, FileVectorStore, InMemoryVectorStore, LocalEmbedding, MemoryStore,
    VectorStore,
};
use mindloop_gateway::GatewayServer;
use mindloop_orchestrator::{JobStore, Orchestrator};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mindloop", about = "Mindloop — iterative goal-driven agent loop")]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "mindloop.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP gateway
    Serve {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Run a single goal to completion and print the job log
    Run {
        /// The goal to work toward
        goal: String,
        /// Number of loop cycles
        #[arg(short, long, default_value_t = 3)]
        iterations: u32,
    },
}

#[derive(Deserialize)]
struct MindloopConfig {
    model: ModelConfig,
    #[serde(default)]
    governor: GovernorConfig,
    #[serde(default)]
    memory: MemoryConfig,
    #[serde(default)]
    server: ServerConfig,
}

#[derive(Deserialize)]
struct GovernorConfig {
    #[serde(default = "default_capacity")]
    capacity: usize,
}

impl Default for GovernorConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
        }
    }
}

#[derive(Deserialize)]
struct MemoryConfig {
    /// Embedding dimension for the local embedder.
    #[serde(default = "default_dimension")]
    dimension: usize,
    /// JSONL file backing the vector store; in-memory when unset.
    path: Option<PathBuf>,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            dimension: default_dimension(),
            path: None,
        }
    }
}

#[derive(Deserialize)]
struct ServerConfig {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}
fn default_dimension() -> usize {
    256
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    3000
}

async fn build_engine(config: &MindloopConfig) -> anyhow::Result<Arc<Orchestrator>> {
    let backend = Arc::new(OpenAiBackend::new(config.model.clone()));
    let gated = Arc::new(GatedBackend::new(
        backend,
        Governor::new(config.governor.capacity),
        Duration::from_secs(config.model.request_timeout_secs),
    ));

    let store: Arc<dyn VectorStore> = match &config.memory.path {
        Some(path) => Arc::new(FileVectorStore::open(path.clone()).await?),
        None => Arc::new(InMemoryVectorStore::new()),
    };
    let embedder: Arc<dyn EmbeddingProvider> =
        Arc::new(LocalEmbedding::new(config.memory.dimension));
    let memory = Arc::new(MemoryStore::new(store, embedder));

    let mut tools = ToolRegistry::new();
    mindloop_builtins::register_builtins(&mut tools);
    info!(count = tools.len(), "Built-in tools registered");

    Ok(Arc::new(Orchestrator::new(
        gated,
        memory,
        Arc::new(tools),
        JobStore::new(),
    )))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config_str = tokio::fs::read_to_string(&cli.config).await.map_err(|e| {
        anyhow::anyhow!(
            "Failed to read config file '{}': {}",
            cli.config.display(),
            e
        )
    })?;
    let config: MindloopConfig = toml::from_str(&config_str)?;

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or(config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            let engine = build_engine(&config).await?;
            let app = GatewayServer::build(engine);

            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            info!("Mindloop gateway listening on {addr}");
            axum::serve(listener, app).await?;
        }
        Commands::Run { goal, iterations } => {
            let engine = build_engine(&config).await?;
            let job_id = engine.start(goal, iterations).await;
            info!(job_id = %job_id, iterations, "Running job");

            let job = loop {
                if let Some(job) = engine.jobs().get(job_id).await {
                    if matches!(job.status, JobStatus::Completed | JobStatus::Failed) {
                        break job;
                    }
                }
                tokio::time::sleep(Duration::from_millis(200)).await;
            };

            println!("{}", serde_json::to_string_pretty(&job)?);
            if job.status == JobStatus::Failed {
                anyhow::bail!(
                    "Job failed: {}",
                    job.error.unwrap_or_else(|| "unknown error".to_string())
                );
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_minimal() {
        let config: MindloopConfig = toml::from_str(
            r#"
            [model]
            model_id = "gpt-4o-mini"
            api_key = "sk-test"
            "#,
        )
        .unwrap();
        assert_eq!(config.governor.capacity, DEFAULT_CAPACITY);
        assert_eq!(config.memory.dimension, 256);
        assert!(config.memory.path.is_none());
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_config_overrides() {
        let config: MindloopConfig = toml::from_str(
            r#"
            [model]
            model_id = "m"
            api_key = "k"
            api_base_url = "http://localhost:9999"
            request_timeout_secs = 10

            [governor]
            capacity = 2

            [memory]
            dimension = 64
            path = "memory.jsonl"

            [server]
            host = "127.0.0.1"
            port = 8080
            "#,
        )
        .unwrap();
        assert_eq!(config.governor.capacity, 2);
        assert_eq!(config.memory.dimension, 64);
        assert_eq!(
            config.memory.path.as_deref(),
            Some(std::path::Path::new("memory.jsonl"))
        );
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.model.request_timeout_secs, 10);
    }

    #[tokio::test]
    async fn test_build_engine_with_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memory.jsonl");
        let config: MindloopConfig = toml::from_str(&format!(
            r#"
            [model]
            model_id = "m"
            api_key = "k"

            [memory]
            path = "{}"
            "#,
            path.display()
        ))
        .unwrap();

        let engine = build_engine(&config).await.unwrap();
        assert!(engine.jobs().is_empty().await);
    }
}
