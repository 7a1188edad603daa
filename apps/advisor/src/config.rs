use std::path::PathBuf;

use anyhow::{Context, Result};

pub const DEFAULT_MASTER_FILE: &str = "02_강의_meta_Data.csv";
pub const DEFAULT_CURRICULUM_FILE: &str = "03_전체_커리큘럼.csv";
pub const DEFAULT_CASES_FILE: &str = "01_병합+정규화_Data.csv";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Application configuration loaded from environment variables.
/// Startup fails if `GOOGLE_API_KEY` is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub google_api_key: String,
    pub gemini_base_url: String,
    pub data: DataSources,
    pub port: u16,
    pub rust_log: String,
}

/// Locations of the three reference CSV files.
#[derive(Debug, Clone)]
pub struct DataSources {
    pub data_dir: PathBuf,
    pub master_file: String,
    pub curriculum_file: String,
    pub cases_file: String,
}

impl DataSources {
    /// Sources under `data_dir` using the default file names.
    pub fn in_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            master_file: DEFAULT_MASTER_FILE.to_string(),
            curriculum_file: DEFAULT_CURRICULUM_FILE.to_string(),
            cases_file: DEFAULT_CASES_FILE.to_string(),
        }
    }

    pub fn master_path(&self) -> PathBuf {
        self.data_dir.join(&self.master_file)
    }

    pub fn curriculum_path(&self) -> PathBuf {
        self.data_dir.join(&self.curriculum_file)
    }

    pub fn cases_path(&self) -> PathBuf {
        self.data_dir.join(&self.cases_file)
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let google_api_key = require_env("GOOGLE_API_KEY")?;
        if google_api_key.trim().is_empty() {
            anyhow::bail!("Required environment variable 'GOOGLE_API_KEY' is empty");
        }

        Ok(Config {
            google_api_key,
            gemini_base_url: env_or("GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL),
            data: DataSources {
                data_dir: PathBuf::from(env_or("DATA_DIR", "data")),
                master_file: env_or("MASTER_FILE", DEFAULT_MASTER_FILE),
                curriculum_file: env_or("CURRICULUM_FILE", DEFAULT_CURRICULUM_FILE),
                cases_file: env_or("CASES_FILE", DEFAULT_CASES_FILE),
            },
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8501".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
