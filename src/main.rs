use log::{error, info};
use std::process::ExitCode;
use std::sync::Arc;

use voiceover::routes::{self, AppState};
use voiceover::services::video::FfmpegTool;
use voiceover::utils::{logger, tools};
use voiceover::{AppConfig, AppResult, MediaPipeline};

#[tokio::main]
async fn main() -> ExitCode {
    // .env may carry RUST_LOG, so load it before the logger
    dotenv::dotenv().ok();
    logger::init_logger();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Startup failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = run(config).await {
        error!("Server stopped: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

async fn run(config: AppConfig) -> AppResult<()> {
    let ffmpeg = tools::discover_ffmpeg(config.ffmpeg_path.as_deref());
    let ffprobe = tools::locate_tool("ffprobe", config.ffprobe_path.as_deref());
    let tool = Arc::new(FfmpegTool::new(ffmpeg, ffprobe));

    let pipeline = MediaPipeline::from_config(&config, tool);
    pipeline.store().ensure_root().await?;

    let state = AppState {
        pipeline: Arc::new(pipeline),
    };
    let app = routes::router(state, &config.static_dir, config.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(
        "Listening on http://{} (media in {}, model {})",
        listener.local_addr()?,
        config.media_dir.display(),
        config.tts_model.as_str()
    );

    axum::serve(listener, app).await?;
    Ok(())
}
