use std::env;
use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result};
use tracing::{info, warn};

pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash-preview-05-20";

/// Which [`DocumentStore`](crate::store::DocumentStore) backs `/api/data`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    MongoDb,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mongodb" | "mongo" => Ok(StoreBackend::MongoDb),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(anyhow::anyhow!("unknown DOCUMENT_STORE '{}'", other)),
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub max_body_size_mb: usize,
    pub cors_origin: String,
    pub store_backend: StoreBackend,
    pub mongo_uri: Option<String>,
    pub mongo_database: String,
    pub mongo_collection: String,
}

// Hand-written so the connection string (which may embed credentials) never reaches the logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("max_body_size_mb", &self.max_body_size_mb)
            .field("cors_origin", &self.cors_origin)
            .field("store_backend", &self.store_backend)
            .field("mongo_uri", &self.mongo_uri.as_ref().map(|_| "<redacted>"))
            .field("mongo_database", &self.mongo_database)
            .field("mongo_collection", &self.mongo_collection)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        // PORT wins over SERVER_PORT for hosted platforms that inject it.
        let port_var = if env::var("PORT").is_ok() { "PORT" } else { "SERVER_PORT" };

        let config = Config {
            server_host: string_var("SERVER_HOST", "0.0.0.0"),
            server_port: parse_env_var(port_var, 3006)
                .with_context(|| format!("Failed to parse {}", port_var))?,
            max_body_size_mb: parse_env_var("MAX_BODY_SIZE_MB", 10)
                .context("Failed to parse MAX_BODY_SIZE_MB")?,
            cors_origin: string_var("CORS_ORIGIN", "http://localhost:5173"),
            store_backend: match env::var("DOCUMENT_STORE") {
                Ok(val) => val.parse().context("Failed to parse DOCUMENT_STORE")?,
                Err(_) => StoreBackend::MongoDb,
            },
            mongo_uri: env::var("MONGO_URI").ok().filter(|s| !s.trim().is_empty()),
            mongo_database: string_var("MONGO_DATABASE", "ocr"),
            mongo_collection: string_var("MONGO_COLLECTION", "ocrdocuments"),
        };

        config.validate()?;

        info!("Configuration loaded successfully: {:?}", config);
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.server_port == 0 {
            return Err(anyhow::anyhow!("SERVER_PORT must be greater than 0"));
        }
        if self.max_body_size_mb == 0 {
            return Err(anyhow::anyhow!("MAX_BODY_SIZE_MB must be greater than 0"));
        }
        if self.store_backend == StoreBackend::MongoDb && self.mongo_uri.is_none() {
            return Err(anyhow::anyhow!(
                "MONGO_URI must be set when DOCUMENT_STORE is mongodb"
            ));
        }
        Ok(())
    }
}

/// Credentials and endpoint for the Gemini `generateContent` API.
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            api_base: DEFAULT_GEMINI_API_BASE.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn from_env() -> Result<Self> {
        let api_key = env::var("GEMINI_API_KEY")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .context("GEMINI_API_KEY must be set")?;

        let config = Self::new(api_key)
            .with_model(string_var("GEMINI_MODEL", DEFAULT_GEMINI_MODEL))
            .with_api_base(string_var("GEMINI_API_BASE", DEFAULT_GEMINI_API_BASE));

        info!("Gemini configuration loaded: {:?}", config);
        Ok(config)
    }
}

fn string_var(var_name: &str, default: &str) -> String {
    env::var(var_name).unwrap_or_else(|_| {
        info!("{} not set, using default: {}", var_name, default);
        default.to_string()
    })
}

fn parse_env_var<T>(var_name: &str, default: T) -> Result<T>
where
    T: FromStr + Copy + fmt::Debug,
    T::Err: fmt::Display,
{
    match env::var(var_name) {
        Ok(val) => match val.parse() {
            Ok(parsed) => Ok(parsed),
            Err(e) => {
                warn!("Failed to parse {}: {} (using default: {:?})", var_name, e, default);
                Ok(default)
            }
        },
        Err(_) => {
            info!("{} not set, using default: {:?}", var_name, default);
            Ok(default)
        }
    }
}
