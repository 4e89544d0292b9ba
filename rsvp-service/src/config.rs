//! Service configuration, read once from the environment at start-up.
//!
//! ```bash
//! BIND_ADDR=0.0.0.0:3000
//! REMOVE_BASE_PATH=true              # serve without the /Prod stage prefix
//!
//! GOOGLE_SHEET_URL=https://script.google.com/macros/s/.../exec
//!
//! RESEND_API_KEY=re_...
//! EMAIL_FROM=sposi@example.com
//! EMAIL_FROM_NAME="Gaia & Bledar"
//! SITE_URL=https://example.com       # used for the image in the email
//!
//! RATE_LIMIT_MAX_REQUESTS=5
//! RATE_LIMIT_WINDOW_SECS=60
//! UPSTASH_REDIS_REST_URL=https://...upstash.io
//! UPSTASH_REDIS_REST_TOKEN=...
//!
//! RSVP_ALLOWED_EMAIL_DOMAINS=gmail.com,libero.it
//! GEO_LOOKUP_ENABLED=true
//! GEO_TIMEOUT_MS=2500
//! ```

use rsvp_shared::email::RESEND_API_URL;
use rsvp_shared::limiter::RateLimitPolicy;
use rsvp_shared::validation::ValidationRules;
use std::env;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const STAGE_PREFIX: &str = "/Prod";
const DEFAULT_FROM_NAME: &str = "Gli Sposi";
const DEFAULT_EMAIL_IMAGE: &str = "/bleGaia.jpg";
const DEFAULT_GEO_TIMEOUT_MS: u64 = 2500;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid number in {name}: {value}")]
    InvalidNumber { name: String, value: String },

    #[error("Missing sender address: EMAIL_FROM is required when RESEND_API_KEY is set")]
    MissingFromAddress,

    #[error("UPSTASH_REDIS_REST_URL and UPSTASH_REDIS_REST_TOKEN must be set together")]
    IncompleteLimiterBackend,

    #[error("RATE_LIMIT_MAX_REQUESTS must be at least 1")]
    ZeroRateLimit,
}

/// Outbound email settings
#[derive(Debug, Clone, PartialEq)]
pub struct EmailConfig {
    pub api_key: String,
    pub api_url: String,
    pub from_address: String,
    pub from_name: String,
    /// Public URL of the invite site, used to link the email image
    pub site_url: Option<String>,
    pub image_path: String,
}

impl EmailConfig {
    pub fn image_url(&self) -> Option<String> {
        self.site_url.as_ref().map(|site| {
            format!(
                "{}/{}",
                site.trim_end_matches('/'),
                self.image_path.trim_start_matches('/')
            )
        })
    }
}

/// External counter service for rate limiting
#[derive(Debug, Clone, PartialEq)]
pub struct LimiterBackendConfig {
    pub url: String,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RateLimitConfig {
    pub policy: RateLimitPolicy,
    /// In-process counting when unset
    pub backend: Option<LimiterBackendConfig>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bind_addr: String,
    pub route_prefix: String,
    pub sheet_url: Option<String>,
    pub email: Option<EmailConfig>,
    pub rate_limit: RateLimitConfig,
    pub allowed_domains: Option<Vec<String>>,
    /// Per-provider geolocation timeout; lookups are off when unset
    pub geo_timeout: Option<Duration>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            route_prefix: String::new(),
            sheet_url: None,
            email: None,
            rate_limit: RateLimitConfig {
                policy: RateLimitPolicy::default(),
                backend: None,
            },
            allowed_domains: None,
            geo_timeout: None,
        }
    }
}

fn parse_flag(value: Option<String>, default: bool) -> bool {
    value
        .map(|v| {
            let v = v.trim().to_lowercase();
            v == "true" || v == "1"
        })
        .unwrap_or(default)
}

fn parse_number(name: &str, value: Option<String>, default: u64) -> Result<u64, ConfigError> {
    match value {
        None => Ok(default),
        Some(v) => v.trim().parse::<u64>().map_err(|_| ConfigError::InvalidNumber {
            name: name.to_string(),
            value: v,
        }),
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup; empty values count as unset
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let route_prefix = if parse_flag(var("REMOVE_BASE_PATH"), false) {
            String::new()
        } else {
            STAGE_PREFIX.to_string()
        };

        let email = match var("RESEND_API_KEY") {
            Some(api_key) => Some(EmailConfig {
                api_key,
                api_url: var("RESEND_API_URL").unwrap_or_else(|| RESEND_API_URL.to_string()),
                from_address: var("EMAIL_FROM").ok_or(ConfigError::MissingFromAddress)?,
                from_name: var("EMAIL_FROM_NAME").unwrap_or_else(|| DEFAULT_FROM_NAME.to_string()),
                site_url: var("SITE_URL"),
                image_path: var("RSVP_EMAIL_IMAGE").unwrap_or_else(|| DEFAULT_EMAIL_IMAGE.to_string()),
            }),
            None => None,
        };

        let defaults = RateLimitPolicy::default();
        let max_requests = parse_number(
            "RATE_LIMIT_MAX_REQUESTS",
            var("RATE_LIMIT_MAX_REQUESTS"),
            u64::from(defaults.max_requests),
        )?;
        if max_requests == 0 {
            return Err(ConfigError::ZeroRateLimit);
        }
        let window_secs = parse_number(
            "RATE_LIMIT_WINDOW_SECS",
            var("RATE_LIMIT_WINDOW_SECS"),
            defaults.window.as_secs(),
        )?;
        let backend = match (var("UPSTASH_REDIS_REST_URL"), var("UPSTASH_REDIS_REST_TOKEN")) {
            (Some(url), Some(token)) => Some(LimiterBackendConfig { url, token }),
            (None, None) => None,
            _ => return Err(ConfigError::IncompleteLimiterBackend),
        };

        let allowed_domains = var("RSVP_ALLOWED_EMAIL_DOMAINS").map(|list| {
            list.split(',')
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty())
                .collect::<Vec<_>>()
        });

        let geo_timeout = if parse_flag(var("GEO_LOOKUP_ENABLED"), true) {
            let ms = parse_number("GEO_TIMEOUT_MS", var("GEO_TIMEOUT_MS"), DEFAULT_GEO_TIMEOUT_MS)?;
            Some(Duration::from_millis(ms))
        } else {
            None
        };

        Ok(Self {
            bind_addr,
            route_prefix,
            sheet_url: var("GOOGLE_SHEET_URL"),
            email,
            rate_limit: RateLimitConfig {
                policy: RateLimitPolicy {
                    max_requests: u32::try_from(max_requests).unwrap_or(u32::MAX),
                    window: Duration::from_secs(window_secs),
                },
                backend,
            },
            allowed_domains,
            geo_timeout,
        })
    }

    pub fn validation_rules(&self) -> ValidationRules {
        match &self.allowed_domains {
            Some(domains) => ValidationRules::with_allowed_domains(domains),
            None => ValidationRules::default(),
        }
    }
}
