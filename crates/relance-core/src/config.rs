use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 8750;
pub const DEFAULT_BIND: &str = "127.0.0.1";
/// Delay between consecutive channel calls — the SMS provider derails bursts.
pub const DEFAULT_PACE_MS: u64 = 500;
/// Name of the operator session cookie.
pub const SESSION_COOKIE: &str = "crm_session";
pub const SESSION_MAX_AGE_SECS: i64 = 60 * 60 * 24 * 7;
pub const SESSION_REMEMBER_MAX_AGE_SECS: i64 = 60 * 60 * 24 * 30;

/// Top-level config (relance.toml + RELANCE_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelanceConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,
    pub auth: AuthConfig,
    pub store: StoreConfig,
    #[serde(default)]
    pub channels: ChannelsConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Operator dashboard password, compared in constant time at login.
    pub password: String,
    /// Value stored in the session cookie after a successful login.
    pub session_secret: String,
    /// Bearer secret the cron trigger must present. `None` disables the
    /// dispatch endpoints entirely.
    #[serde(default)]
    pub cron_secret: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Base URL of the remote data service (e.g. `https://xyz.supabase.co`).
    pub url: String,
    pub api_key: String,
}

/// A channel is configured iff its block (and therefore its credential) is
/// present. Adapters are constructed from this once per dispatch invocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChannelsConfig {
    pub sms: Option<SmsConfig>,
    pub email: Option<EmailConfig>,
}

impl ChannelsConfig {
    pub fn any_configured(&self) -> bool {
        self.sms.is_some() || self.email.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmsConfig {
    pub api_key: String,
    /// Alphanumeric sender name shown on the recipient's phone.
    #[serde(default = "default_sms_sender")]
    pub sender: String,
    /// Optional text prepended to every SMS (e.g. the business name).
    #[serde(default)]
    pub prefix: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub api_key: String,
    pub from: String,
    /// Recipient of the operator notification email.
    pub to: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    #[serde(default = "default_pace_ms")]
    pub pace_ms: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            pace_ms: DEFAULT_PACE_MS,
        }
    }
}

impl RelanceConfig {
    /// Load from `config_path` (or `~/.relance/relance.toml`) merged with
    /// RELANCE_-prefixed environment variables.
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);
        tracing::debug!(path = %path, "loading configuration");

        let config: RelanceConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("RELANCE_").split("__"))
            .extract()
            .map_err(|e| crate::error::RelanceError::Config(e.to_string()))?;

        Ok(config)
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.relance/relance.toml", home)
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

fn default_sms_sender() -> String {
    "Relance".to_string()
}

fn default_pace_ms() -> u64 {
    DEFAULT_PACE_MS
}
