//! rinkflow runtime - broadcast watcher + overlay stats
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release --bin rinkflow -- --mode all
//! cargo run --release --bin rinkflow -- --mode stats
//! cargo run --release --bin rinkflow -- --mode watcher --no-obs
//! ```
//!
//! ## Environment Variables
//!
//! - BROADCAST_FILE_PATH - Game broadcast token file (required)
//! - MATCH_LOGS_PATH - Directory of match-log JSON files (required)
//! - STATS_OUTPUT_PATH - Overlay text files directory (default: stats)
//! - BROADCAST_POLL_INTERVAL_MS / STATS_POLL_INTERVAL_MS - Poll intervals (default: 100 / 2000)
//! - REPLAY_REPEAT_THRESHOLD - Frozen clock reads before REPLAY (default: 13)
//! - REPLAY_COOLDOWN_MS / FACEOFF_COOLDOWN_MS - Event cooldowns (default: 6000 / 4000)
//! - INTERMISSION_DELAY_MS - Settle delay before INTERMISSION (default: 3000)
//! - OBS_HOST / OBS_PORT / OBS_PASSWORD - OBS WebSocket (default: localhost / 4455 / none)
//! - OBS_CONNECT_RETRIES / OBS_REQUEST_TIMEOUT_MS - Transport tuning (default: 2 / 2000)
//! - OBS_SCENE_LIVE / OBS_SCENE_INTERMISSION / OBS_SCENE_REPLAY - Scene names
//! - RUST_LOG - Logging level (optional, default: info)

use dotenv::dotenv;
use log::{error, info, warn};
use rinkflow::scene::{EventDispatcher, ObsClient, SceneSwitcher};
use rinkflow::signal_core::{BroadcastFileReader, SignalWatcher};
use rinkflow::stats_core::{StatsCollector, TextFileWriter};
use rinkflow::{Config, Scheduler, TokioScheduler};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let mode = Config::parse_mode_from_args(&args)?;
    let obs_disabled = Config::obs_disabled_in_args(&args);

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("❌ Invalid configuration: {}", e);
            return Err(e.into());
        }
    };

    info!("🚀 Starting rinkflow");
    info!("   ├─ Mode: {:?}", mode);
    info!("   ├─ Broadcast file: {}", config.watcher.broadcast_path.display());
    info!("   ├─ Match logs: {}", config.stats.logs_path.display());
    info!("   ├─ Stats output: {}", config.stats.output_path.display());
    info!("   └─ Log filter: {}", config.rust_log);

    let scheduler: Arc<dyn Scheduler> = Arc::new(TokioScheduler);
    let mut handles = Vec::new();

    if mode.runs_stats() {
        let writer = match TextFileWriter::new(config.stats.output_path.clone()) {
            Ok(writer) => writer,
            Err(e) => {
                error!(
                    "❌ Cannot create stats output directory {}: {}",
                    config.stats.output_path.display(),
                    e
                );
                return Err(e.into());
            }
        };
        let collector = StatsCollector::new(&config.stats, Box::new(writer), scheduler.clone());
        handles.push(tokio::spawn(collector.run()));
    }

    if mode.runs_watcher() {
        let switcher: Option<Arc<dyn SceneSwitcher>> = if obs_disabled {
            info!("⚠️  OBS disabled (--no-obs), scene switches will only be logged");
            None
        } else {
            match ObsClient::connect_with_retry(&config.obs, scheduler.as_ref()).await {
                Ok(client) => Some(Arc::new(client)),
                Err(e) => {
                    warn!("⚠️  OBS unavailable ({}), continuing without scene switching", e);
                    None
                }
            }
        };

        let dispatcher = Arc::new(EventDispatcher::new(switcher, config.obs.scenes.clone()));
        let watcher = SignalWatcher::new(
            &config.watcher,
            Box::new(BroadcastFileReader::new(config.watcher.broadcast_path.clone())),
            dispatcher,
            scheduler.clone(),
        );
        handles.push(tokio::spawn(watcher.run()));
    }

    info!("🔄 Press CTRL+C to shutdown");

    let abort_handles: Vec<_> = handles.iter().map(|h| h.abort_handle()).collect();
    tokio::select! {
        result = tokio::signal::ctrl_c() => match result {
            Ok(()) => info!("⚠️  Received CTRL+C, shutting down..."),
            Err(err) => error!("❌ Failed to listen for CTRL+C: {}", err),
        },
        (result, _, _) = futures_util::future::select_all(handles) => {
            if let Err(e) = result {
                error!("❌ Polling task ended unexpectedly: {}", e);
            }
        }
    }

    for handle in abort_handles {
        handle.abort();
    }

    info!("✅ rinkflow stopped");
    Ok(())
}
