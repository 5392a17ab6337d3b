//! # Rehearsal Server
//!
//! Axum surface for the interview feedback pipeline: the voice-session
//! frontend posts the finished call here, dashboards read records back, and
//! an SSE stream carries pipeline events.

mod api;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{routing::get, Json, Router};
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;

use rehearsal_core::agents::{RadkitLlm, StructuredLlm};
use rehearsal_core::models::LlmSettings;
use rehearsal_core::pipeline::PipelineEvent;
use rehearsal_core::store::RehearsalDb;

/// Shared state for all handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<RehearsalDb>,
    pub llm: Arc<dyn StructuredLlm>,
    pub event_tx: broadcast::Sender<PipelineEvent>,
}

#[derive(Parser)]
#[command(author, version, about = "Rehearsal - AI interview feedback service")]
struct Args {
    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Start the Rehearsal server (default)
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,
        /// SQLite database path (default: .rehearsal/rehearsal.db)
        #[arg(long)]
        db: Option<PathBuf>,
    },
}

// === OpenAPI Definition ===

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Rehearsal API",
        version = "1.0.0",
        description = "API for the Rehearsal interview feedback pipeline"
    ),
    paths(
        api::interviews::create_interview,
        api::interviews::get_interview,
        api::feedback::generate_feedback,
        api::feedback::get_feedback,
    ),
    components(schemas(
        api::interviews::CreateInterviewRequest,
        api::interviews::InterviewResponse,
        api::feedback::GenerateFeedbackRequest,
        api::feedback::GenerateFeedbackResponse,
        api::feedback::TranscriptTurnDto,
        api::feedback::TelemetrySampleDto,
    ))
)]
struct ApiDoc;

async fn serve_openapi() -> Json<serde_json::Value> {
    Json(serde_json::to_value(ApiDoc::openapi()).unwrap_or_default())
}

pub async fn run_server(port: u16, db_path: Option<PathBuf>) -> anyhow::Result<()> {
    let db = Arc::new(match db_path {
        Some(path) => RehearsalDb::open_at(path)?,
        None => RehearsalDb::open()?,
    });
    let llm: Arc<dyn StructuredLlm> = Arc::new(RadkitLlm::new(LlmSettings::from_env()));
    let (event_tx, _) = broadcast::channel::<PipelineEvent>(100);

    let state = AppState { db, llm, event_tx };

    let app = Router::new()
        .nest("/api/v1/interviews", api::interviews::routes())
        .nest("/api/v1/feedback", api::feedback::routes())
        .route("/api/v1/openapi.json", get(serve_openapi))
        .with_state(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    println!("🎤 Rehearsal server running at http://{}", addr);
    println!("   Interviews: /api/v1/interviews");
    println!("   Feedback:   /api/v1/feedback (POST = end-of-call hook)");
    println!("   Events:     /api/v1/feedback/events (SSE)");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let (port, db) = match args.command {
        Some(CliCommand::Serve { port, db }) => (port, db),
        None => (8080, None),
    };

    run_server(port, db).await
}
