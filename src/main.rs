use clap::Parser;
use entcmp_api::{ComparisonService, Dispatcher, RestApi, ServerConfig, StdioServer, Transport};
use entcmp_semantic::{
    ModelConfig, DEFAULT_BASE_URL, DEFAULT_FIELD_MODEL, DEFAULT_HOLISTIC_MODEL, DEFAULT_TIMEOUT_SECS,
    DEFAULT_FIELD_MAX_OUTPUT_TOKENS,
};
use entcmp_similarity::EntityComparator;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Compare two JSON entities for real-world equivalence, served as an MCP tool
#[derive(Parser, Debug)]
#[command(name = "entcmp")]
#[command(about = "Entity comparison MCP server", long_about = None)]
struct Args {
    /// Transport to serve on (stdio or http)
    #[arg(long, env = "ENTCMP_TRANSPORT", default_value = "stdio")]
    transport: Transport,

    /// HTTP bind address
    #[arg(long, env = "ENTCMP_HTTP_HOST", default_value = "0.0.0.0")]
    http_host: String,

    /// HTTP port
    #[arg(long, env = "ENTCMP_HTTP_PORT", default_value_t = 8000)]
    http_port: u16,

    /// Log level
    #[arg(long, env = "ENTCMP_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Model used for per-field judgments
    #[arg(long, env = "ENTCMP_FIELD_MODEL", default_value = DEFAULT_FIELD_MODEL)]
    field_model: String,

    /// Model used for the holistic judgment
    #[arg(long, env = "ENTCMP_HOLISTIC_MODEL", default_value = DEFAULT_HOLISTIC_MODEL)]
    holistic_model: String,

    /// Base URL of the model API
    #[arg(long, env = "ENTCMP_MODEL_BASE_URL", default_value = DEFAULT_BASE_URL)]
    model_base_url: String,

    /// Timeout for each model request, in seconds
    #[arg(long, env = "ENTCMP_MODEL_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    model_timeout_secs: u64,

    /// Output token cap for per-field answers (0 leaves it to the model)
    #[arg(long, env = "ENTCMP_FIELD_MAX_OUTPUT_TOKENS", default_value_t = DEFAULT_FIELD_MAX_OUTPUT_TOKENS)]
    field_max_output_tokens: u32,
}

impl Args {
    fn model_config(&self) -> ModelConfig {
        ModelConfig {
            base_url: self.model_base_url.clone(),
            field_model: self.field_model.clone(),
            holistic_model: self.holistic_model.clone(),
            timeout_secs: self.model_timeout_secs,
            field_max_output_tokens: Some(self.field_max_output_tokens).filter(|&n| n > 0),
            ..ModelConfig::default()
        }
    }

    fn server_config(&self) -> ServerConfig {
        ServerConfig {
            transport: self.transport,
            http_host: self.http_host.clone(),
            http_port: self.http_port,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // stdout carries protocol frames in stdio mode
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let model_config = args.model_config();
    let server_config = args.server_config();

    info!("Starting entcmp v{}", env!("CARGO_PKG_VERSION"));
    info!("Transport: {}", server_config.transport);
    info!(
        "Models: field={}, holistic={}, timeout={}s",
        model_config.field_model, model_config.holistic_model, model_config.timeout_secs
    );

    let service = ComparisonService::new(EntityComparator::uniform(), model_config);
    let dispatcher = Dispatcher::new(service);

    match server_config.transport {
        Transport::Stdio => {
            StdioServer::start(dispatcher).await?;
            info!("stdio server stopped");
        }
        Transport::Http => {
            let host = server_config.http_host.clone();
            let port = server_config.http_port;
            let http_handle = std::thread::spawn(move || {
                info!("Starting HTTP server on {}:{}", host, port);
                let sys = actix_web::rt::System::new();
                sys.block_on(async {
                    if let Err(e) = RestApi::start(dispatcher, &host, port).await {
                        tracing::error!("HTTP server error: {}", e);
                    }
                })
            });

            info!(
                "JSON-RPC endpoint: http://{}:{}/jsonrpc",
                server_config.http_host, server_config.http_port
            );

            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutdown signal received");
                }
                _ = tokio::task::spawn_blocking(move || {
                    http_handle.join().ok();
                }) => {
                    info!("HTTP server stopped");
                }
            }
        }
    }

    info!("Shutting down...");
    Ok(())
}
