use log::info;
use rsvp_shared::email::{format_sender, EmailProvider, ResendProvider};
use rsvp_shared::geo::{GeoLookup, HttpGeoLookup};
use rsvp_shared::limiter::{FixedWindowLimiter, RateLimiter, RestRateLimiter};
use rsvp_shared::sinks::{SheetSink, WebhookSheetSink};
use rsvp_shared::validation::ValidationRules;
use std::sync::Arc;

use crate::config::AppConfig;

/// Everything needed to send confirmation emails
#[derive(Clone)]
pub struct EmailDispatch {
    pub provider: Arc<dyn EmailProvider>,
    /// Formatted `Name <address>` sender
    pub from: String,
    /// Signature at the bottom of the email
    pub couple_name: String,
    pub image_url: Option<String>,
}

/// Collaborators shared by all requests. Sinks left unset are skipped.
#[derive(Clone)]
pub struct AppState {
    pub limiter: Arc<dyn RateLimiter>,
    pub rules: Arc<ValidationRules>,
    pub sheet: Option<Arc<dyn SheetSink>>,
    pub email: Option<EmailDispatch>,
    pub geo: Option<Arc<dyn GeoLookup>>,
}

impl AppState {
    pub fn new(limiter: Arc<dyn RateLimiter>, rules: ValidationRules) -> Self {
        Self {
            limiter,
            rules: Arc::new(rules),
            sheet: None,
            email: None,
            geo: None,
        }
    }

    pub fn with_sheet_sink(mut self, sink: Arc<dyn SheetSink>) -> Self {
        self.sheet = Some(sink);
        self
    }

    pub fn with_email(mut self, email: EmailDispatch) -> Self {
        self.email = Some(email);
        self
    }

    pub fn with_geo_lookup(mut self, geo: Arc<dyn GeoLookup>) -> Self {
        self.geo = Some(geo);
        self
    }

    /// Wires the production collaborators described by `config`
    pub fn from_config(config: &AppConfig) -> Self {
        let limiter: Arc<dyn RateLimiter> = match &config.rate_limit.backend {
            Some(backend) => {
                info!("Rate limiting through external counter at {}", backend.url);
                Arc::new(RestRateLimiter::new(
                    backend.url.clone(),
                    backend.token.clone(),
                    config.rate_limit.policy,
                ))
            }
            None => {
                info!("Rate limiting in process");
                Arc::new(FixedWindowLimiter::new(config.rate_limit.policy))
            }
        };

        let mut state = AppState::new(limiter, config.validation_rules());

        match &config.sheet_url {
            Some(url) => state = state.with_sheet_sink(Arc::new(WebhookSheetSink::new(url.clone()))),
            None => info!("GOOGLE_SHEET_URL not set, submissions will not be recorded"),
        }

        match &config.email {
            Some(email) => {
                state = state.with_email(EmailDispatch {
                    provider: Arc::new(ResendProvider::with_base_url(
                        email.api_key.clone(),
                        email.api_url.clone(),
                    )),
                    from: format_sender(&email.from_address, Some(&email.from_name)),
                    couple_name: email.from_name.clone(),
                    image_url: email.image_url(),
                })
            }
            None => info!("RESEND_API_KEY not set, confirmation emails are disabled"),
        }

        if let Some(timeout) = config.geo_timeout {
            state = state.with_geo_lookup(Arc::new(HttpGeoLookup::new(timeout)));
        }

        state
    }
}
