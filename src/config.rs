use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::scene::SceneNames;

/// Which polling loops the runtime starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    All,
    WatcherOnly,
    StatsOnly,
}

impl RunMode {
    pub fn runs_watcher(self) -> bool {
        matches!(self, RunMode::All | RunMode::WatcherOnly)
    }

    pub fn runs_stats(self) -> bool {
        matches!(self, RunMode::All | RunMode::StatsOnly)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    MissingVariable(String),
    InvalidValue(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingVariable(var) => write!(f, "Missing environment variable: {}", var),
            ConfigError::InvalidValue(msg) => write!(f, "Invalid configuration value: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Watcher tuning: cadence, debounce windows and the replay threshold
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    pub broadcast_path: PathBuf,
    pub poll_interval: Duration,
    pub replay_repeat_threshold: u32,
    pub replay_cooldown: Duration,
    pub faceoff_cooldown: Duration,
    pub intermission_delay: Duration,
}

impl WatcherConfig {
    /// Defaults tuned against live game output
    pub fn with_defaults(broadcast_path: PathBuf) -> Self {
        Self {
            broadcast_path,
            poll_interval: Duration::from_millis(100),
            replay_repeat_threshold: 13,
            replay_cooldown: Duration::from_secs(6),
            faceoff_cooldown: Duration::from_secs(4),
            intermission_delay: Duration::from_secs(3),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StatsConfig {
    pub logs_path: PathBuf,
    pub output_path: PathBuf,
    pub poll_interval: Duration,
}

#[derive(Debug, Clone)]
pub struct ObsConfig {
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
    pub connect_retries: u32,
    pub request_timeout: Duration,
    pub scenes: SceneNames,
}

impl ObsConfig {
    pub fn url(&self) -> String {
        format!("ws://{}:{}", self.host, self.port)
    }
}

/// Runtime configuration loaded from environment variables
///
/// `.env` is merged by the binary before this is called.
#[derive(Debug, Clone)]
pub struct Config {
    pub watcher: WatcherConfig,
    pub stats: StatsConfig,
    pub obs: ObsConfig,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key lookup (the process environment in production)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let required = |key: &str| {
            get(key).ok_or_else(|| ConfigError::MissingVariable(key.to_string()))
        };

        let broadcast_path = PathBuf::from(required("BROADCAST_FILE_PATH")?);
        let logs_path = PathBuf::from(required("MATCH_LOGS_PATH")?);
        let output_path = PathBuf::from(get("STATS_OUTPUT_PATH").unwrap_or_else(|| "stats".to_string()));

        let defaults = WatcherConfig::with_defaults(broadcast_path);

        let replay_repeat_threshold = parse_or(
            &get,
            "REPLAY_REPEAT_THRESHOLD",
            defaults.replay_repeat_threshold,
        )?;
        if replay_repeat_threshold == 0 {
            return Err(ConfigError::InvalidValue(
                "REPLAY_REPEAT_THRESHOLD must be at least 1".to_string(),
            ));
        }

        let watcher = WatcherConfig {
            poll_interval: millis_or(&get, "BROADCAST_POLL_INTERVAL_MS", defaults.poll_interval)?,
            replay_repeat_threshold,
            replay_cooldown: millis_or(&get, "REPLAY_COOLDOWN_MS", defaults.replay_cooldown)?,
            faceoff_cooldown: millis_or(&get, "FACEOFF_COOLDOWN_MS", defaults.faceoff_cooldown)?,
            intermission_delay: millis_or(&get, "INTERMISSION_DELAY_MS", defaults.intermission_delay)?,
            broadcast_path: defaults.broadcast_path,
        };

        let stats = StatsConfig {
            logs_path,
            output_path,
            poll_interval: millis_or(&get, "STATS_POLL_INTERVAL_MS", Duration::from_secs(2))?,
        };

        let default_scenes = SceneNames::default();
        let obs = ObsConfig {
            host: get("OBS_HOST").unwrap_or_else(|| "localhost".to_string()),
            port: parse_or(&get, "OBS_PORT", 4455)?,
            password: get("OBS_PASSWORD"),
            connect_retries: parse_or(&get, "OBS_CONNECT_RETRIES", 2)?,
            request_timeout: millis_or(&get, "OBS_REQUEST_TIMEOUT_MS", Duration::from_secs(2))?,
            scenes: SceneNames {
                live: get("OBS_SCENE_LIVE").unwrap_or(default_scenes.live),
                intermission: get("OBS_SCENE_INTERMISSION").unwrap_or(default_scenes.intermission),
                replay: get("OBS_SCENE_REPLAY").unwrap_or(default_scenes.replay),
            },
        };

        let rust_log = get("RUST_LOG").unwrap_or_else(|| "info".to_string());

        Ok(Self {
            watcher,
            stats,
            obs,
            rust_log,
        })
    }

    /// Parse `--mode all|watcher|stats` from the command line (default: all)
    pub fn parse_mode_from_args(args: &[String]) -> Result<RunMode, ConfigError> {
        let Some(idx) = args.iter().position(|x| x == "--mode") else {
            return Ok(RunMode::All);
        };

        match args.get(idx + 1).map(|s| s.as_str()) {
            Some("all") => Ok(RunMode::All),
            Some("watcher") => Ok(RunMode::WatcherOnly),
            Some("stats") => Ok(RunMode::StatsOnly),
            other => Err(ConfigError::InvalidValue(format!(
                "--mode expects all, watcher or stats, got {:?}",
                other
            ))),
        }
    }

    /// `--no-obs` runs detection without connecting the scene transport
    pub fn obs_disabled_in_args(args: &[String]) -> bool {
        args.iter().any(|x| x == "--no-obs")
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidValue(format!("{} = '{}' is not a valid number", key, raw))),
        None => Ok(default),
    }
}

fn millis_or<G>(get: &G, key: &str, default: Duration) -> Result<Duration, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    parse_or(get, key, default.as_millis() as u64).map(Duration::from_millis)
}
