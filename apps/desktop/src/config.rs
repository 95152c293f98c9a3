use std::{
    fs,
    path::{Path, PathBuf},
};

use clap::Parser;
use serde::Deserialize;

pub const CONFIG_FILE: &str = "breach.toml";
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000/api/";

#[derive(Parser, Debug, Default)]
#[command(name = "breach", about = "Terminal client for the breach word game")]
pub struct Args {
    /// Base URL of the game service, e.g. http://127.0.0.1:5000/api/
    #[arg(long)]
    pub server_url: Option<String>,
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
    /// SQLite file holding theme and win streak.
    #[arg(long)]
    pub db_path: Option<PathBuf>,
    /// Render log lines instantly instead of typing them out.
    #[arg(long)]
    pub reduced_motion: bool,
    #[arg(long)]
    pub log_filter: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_url: String,
    pub data_dir: PathBuf,
    pub db_path: Option<PathBuf>,
    pub reduced_motion: bool,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.into(),
            data_dir: dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("breach"),
            db_path: None,
            reduced_motion: false,
            log_filter: "info".into(),
        }
    }
}

impl Settings {
    pub fn db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| self.data_dir.join("breach.db"))
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("breach.log")
    }

    /// Command-line flags win over file and environment.
    pub fn with_args(mut self, args: &Args) -> Self {
        if let Some(v) = &args.server_url {
            self.server_url = v.clone();
        }
        if let Some(v) = &args.data_dir {
            self.data_dir = v.clone();
        }
        if let Some(v) = &args.db_path {
            self.db_path = Some(v.clone());
        }
        if args.reduced_motion {
            self.reduced_motion = true;
        }
        if let Some(v) = &args.log_filter {
            self.log_filter = v.clone();
        }
        self
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    server_url: Option<String>,
    data_dir: Option<PathBuf>,
    db_path: Option<PathBuf>,
    reduced_motion: Option<bool>,
    log_filter: Option<String>,
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(CONFIG_FILE), |key| std::env::var(key).ok())
}

pub fn load_settings_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        if let Ok(file_cfg) = toml::from_str::<FileConfig>(&raw) {
            if let Some(v) = file_cfg.server_url {
                settings.server_url = v;
            }
            if let Some(v) = file_cfg.data_dir {
                settings.data_dir = v;
            }
            if let Some(v) = file_cfg.db_path {
                settings.db_path = Some(v);
            }
            if let Some(v) = file_cfg.reduced_motion {
                settings.reduced_motion = v;
            }
            if let Some(v) = file_cfg.log_filter {
                settings.log_filter = v;
            }
        }
    }

    if let Some(v) = env("BREACH_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = env("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Some(v) = env("BREACH_DATA_DIR") {
        settings.data_dir = PathBuf::from(v);
    }
    if let Some(v) = env("BREACH_DB_PATH") {
        settings.db_path = Some(PathBuf::from(v));
    }

    if let Some(v) = env("BREACH_REDUCED_MOTION").as_deref().and_then(parse_flag) {
        settings.reduced_motion = v;
    }
    if let Some(v) = env("APP__REDUCED_MOTION").as_deref().and_then(parse_flag) {
        settings.reduced_motion = v;
    }

    if let Some(v) = env("BREACH_LOG_FILTER") {
        settings.log_filter = v;
    }

    settings
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
