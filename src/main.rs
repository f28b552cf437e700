use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::FixedOffset;
use tokio::net::TcpListener;

use saraphi::application::ports::{ChatClient, JobStore, TranscriptionClient};
use saraphi::application::services::{AudioPipeline, TranscriptionWorker, WorkerConfig};
use saraphi::infrastructure::audio::FfmpegTranscoder;
use saraphi::infrastructure::messaging::LineClient;
use saraphi::infrastructure::observability::{TracingConfig, init_tracing};
use saraphi::infrastructure::persistence::{PgJobStore, create_pool};
use saraphi::infrastructure::speech::speech_client_from_settings;
use saraphi::presentation::{AppState, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env();

    init_tracing(TracingConfig {
        environment: saraphi::presentation::Environment::try_from(
            std::env::var("APP_ENV").unwrap_or_else(|_| "local".to_string()),
        )
        .map_err(|e| anyhow::anyhow!(e))?,
        json_format: settings.logging.enable_json,
    });

    let pool = create_pool(&settings.database.url, settings.database.max_connections).await?;
    sqlx::migrate!().run(&pool).await?;

    let job_store: Arc<dyn JobStore> = Arc::new(PgJobStore::new(pool));

    let chat: Arc<dyn ChatClient> = Arc::new(LineClient::with_base_urls(
        &settings.messaging.api_base,
        &settings.messaging.data_api_base,
        settings.messaging.channel_access_token.clone(),
    ));

    let stt: Arc<dyn TranscriptionClient> =
        Arc::new(speech_client_from_settings(&settings.speech));

    let pipeline = Arc::new(AudioPipeline::new(
        Arc::clone(&chat),
        Arc::new(FfmpegTranscoder::new()),
        stt,
        PathBuf::from(&settings.worker.work_dir),
    ));

    let reply_utc_offset = FixedOffset::east_opt(settings.messaging.reply_utc_offset_hours * 3600)
        .ok_or_else(|| anyhow::anyhow!("invalid REPLY_UTC_OFFSET_HOURS"))?;

    let worker = TranscriptionWorker::new(
        Arc::clone(&job_store),
        pipeline,
        chat,
        WorkerConfig {
            poll_interval: Duration::from_secs(settings.worker.poll_interval_secs),
            max_concurrent_jobs: settings.worker.max_concurrent_jobs,
            processing_timeout: Duration::from_secs(
                settings.worker.processing_timeout_minutes * 60,
            ),
            language_code: settings.speech.default_language_code.clone(),
            reply_utc_offset,
        },
    );
    tokio::spawn(worker.run());

    let router = create_router(AppState { job_store });

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
