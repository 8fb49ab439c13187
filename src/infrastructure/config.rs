use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Supabase,
    Memory,
}

#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub key: String,
    pub table: String,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub store: StoreBackend,
    /// Present only when `store` is `Supabase`.
    pub supabase: Option<SupabaseConfig>,
    pub seed_path: Option<PathBuf>,
    pub webhook_secret: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any variable source. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let require = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let store = match get("DOCUMENT_STORE").as_deref() {
            None | Some("supabase") => StoreBackend::Supabase,
            Some("memory") => StoreBackend::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "DOCUMENT_STORE",
                    reason: format!("unknown backend `{other}`"),
                })
            }
        };

        let supabase = match store {
            StoreBackend::Supabase => Some(SupabaseConfig {
                url: require("SUPABASE_URL")?,
                key: require("SUPABASE_KEY")?,
                table: get("SUPABASE_TABLE").unwrap_or_else(|| "documents".into()),
            }),
            StoreBackend::Memory => None,
        };

        let port = match get("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: "PORT",
                reason: e.to_string(),
            })?,
            None => 3000,
        };

        let allowed_origins = get("CORS_ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            server: ServerConfig {
                host: get("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".into()),
                port,
            },
            cors: CorsConfig { allowed_origins },
            store,
            supabase,
            seed_path: get("DOCUMENT_SEED_PATH").map(PathBuf::from),
            webhook_secret: require("VAPI_WEBHOOK_SECRET")?,
        })
    }
}
