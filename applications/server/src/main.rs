/// Cupid Server - backend for the Valentine's site
use clap::{Parser, Subcommand};
use cupid_core::{Feature, TrackSearch};
use cupid_server::{
    config::ServerConfig,
    create_router,
    services::{
        prompts::{build_prompt, parse_trivia},
        FileStorage, GroqProvider, PromptGateway, YoutubeScraper,
    },
    state::AppState,
};
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cupid-server")]
#[command(about = "Cupid Valentine's site backend", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "CUPID_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Run one music search and print the video id
    Search {
        /// Free-text song query
        query: String,
    },
    /// Run one generation feature and print the result
    Generate {
        /// Feature slug, e.g. love-letter
        feature: String,
        /// Request field as key=value (repeatable)
        #[arg(short, long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected key=value, got {raw:?}"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cupid_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = ServerConfig::load(cli.config.as_deref())?;
    config.validate()?;

    match cli.command {
        Commands::Serve => serve(config).await?,
        Commands::Search { query } => search(&config, &query).await?,
        Commands::Generate { feature, fields } => generate(&config, &feature, fields).await?,
    }

    Ok(())
}

fn build_gateway(config: &ServerConfig) -> anyhow::Result<PromptGateway> {
    if !config.provider.has_api_key() {
        tracing::warn!(
            "No provider API key (set CUPID_PROVIDER__API_KEY or GROQ_API_KEY); generation requests will fail"
        );
    }
    let provider = GroqProvider::new(&config.provider)?;
    Ok(PromptGateway::new(Arc::new(provider), &config.gateway))
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    tracing::info!("Starting Cupid Server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);
    tracing::info!("Model: {}", config.provider.model);

    let gateway = Arc::new(build_gateway(&config)?);
    let search: Arc<dyn TrackSearch> = Arc::new(YoutubeScraper::new(&config.search)?);

    // Initialize file storage
    let file_storage = FileStorage::new(
        config.storage.uploads_dir.clone(),
        config.storage.max_upload_bytes,
    );
    file_storage.initialize().await?;
    tracing::info!("Uploads stored in {}", config.storage.uploads_dir.display());

    let app_state = AppState::new(
        gateway,
        search,
        Arc::new(file_storage),
        config.storage.public_dir.clone(),
    );
    let app = create_router(app_state);

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn search(config: &ServerConfig, query: &str) -> anyhow::Result<()> {
    let scraper = YoutubeScraper::new(&config.search)?;
    match scraper.search(query).await? {
        Some(id) => println!("{} ({})", id, id.watch_url()),
        None => println!("not found"),
    }
    Ok(())
}

async fn generate(
    config: &ServerConfig,
    slug: &str,
    fields: Vec<(String, String)>,
) -> anyhow::Result<()> {
    let feature =
        Feature::from_slug(slug).ok_or_else(|| anyhow::anyhow!("unknown feature: {slug}"))?;

    let body: serde_json::Map<String, serde_json::Value> = fields
        .into_iter()
        .map(|(k, v)| (k, serde_json::Value::String(v)))
        .collect();
    let prompt = build_prompt(feature, serde_json::Value::Object(body))?;

    let text = build_gateway(config)?.generate_prompt(&prompt).await?;

    if feature.is_structured() {
        let questions = parse_trivia(&text)?;
        println!("{}", serde_json::to_string_pretty(&questions)?);
    } else {
        println!("{}", text);
    }
    Ok(())
}
