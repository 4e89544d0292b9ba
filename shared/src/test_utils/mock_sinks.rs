//! In-memory collaborators for handler tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Barrier;

use crate::email::{EmailError, EmailMessage, EmailProvider};
use crate::geo::GeoLookup;
use crate::limiter::{LimiterError, RateLimitDecision, RateLimiter};
use crate::models::SheetRecord;
use crate::sinks::{SheetSink, SinkError};

/// How long a mock call holds on before answering
#[derive(Default)]
enum Hold {
    #[default]
    None,
    Delay(Duration),
    /// Waits until every party sharing the barrier is in flight
    Gate(Arc<Barrier>),
}

impl Hold {
    async fn wait(&self) {
        match self {
            Hold::None => {}
            Hold::Delay(delay) => tokio::time::sleep(*delay).await,
            Hold::Gate(barrier) => {
                barrier.wait().await;
            }
        }
    }
}

/// Sheet sink that keeps every record, or fails every call when `failing`
#[derive(Default)]
pub struct MockSheetSink {
    records: Mutex<Vec<SheetRecord>>,
    attempts: AtomicUsize,
    failing: bool,
    hold: Hold,
}

impl MockSheetSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Answers only after `delay` has elapsed
    pub fn delayed(delay: Duration) -> Self {
        Self {
            hold: Hold::Delay(delay),
            ..Self::default()
        }
    }

    /// Answers only once every other holder of `barrier` is waiting too
    pub fn gated(barrier: Arc<Barrier>) -> Self {
        Self {
            hold: Hold::Gate(barrier),
            ..Self::default()
        }
    }

    pub fn records(&self) -> Vec<SheetRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SheetSink for MockSheetSink {
    async fn append(&self, record: &SheetRecord) -> Result<(), SinkError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        self.hold.wait().await;
        if self.failing {
            return Err(SinkError::Request("simulated network error".to_string()));
        }
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

/// Email provider that keeps every message, or fails every call when `failing`
#[derive(Default)]
pub struct MockEmailProvider {
    sent: Mutex<Vec<EmailMessage>>,
    attempts: AtomicUsize,
    failing: bool,
    hold: Hold,
}

impl MockEmailProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn delayed(delay: Duration) -> Self {
        Self {
            hold: Hold::Delay(delay),
            ..Self::default()
        }
    }

    pub fn gated(barrier: Arc<Barrier>) -> Self {
        Self {
            hold: Hold::Gate(barrier),
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmailProvider for MockEmailProvider {
    async fn send(&self, message: &EmailMessage) -> Result<(), EmailError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        self.hold.wait().await;
        if self.failing {
            return Err(EmailError::SendFailed("simulated provider outage".to_string()));
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

/// Limiter that always answers the same way and remembers who asked
pub struct MockRateLimiter {
    outcome: Result<bool, String>,
    seen: Mutex<Vec<String>>,
}

impl MockRateLimiter {
    pub fn allowing() -> Self {
        Self {
            outcome: Ok(true),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn exhausted() -> Self {
        Self {
            outcome: Ok(false),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn broken() -> Self {
        Self {
            outcome: Err("limiter offline".to_string()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl RateLimiter for MockRateLimiter {
    async fn limit(&self, client_id: &str) -> Result<RateLimitDecision, LimiterError> {
        self.seen.lock().unwrap().push(client_id.to_string());
        match &self.outcome {
            Ok(success) => Ok(RateLimitDecision {
                success: *success,
                remaining: if *success { 1 } else { 0 },
            }),
            Err(e) => Err(LimiterError::Request(e.clone())),
        }
    }
}

/// Geolocation that answers with a fixed string
pub struct StaticGeoLookup {
    location: String,
    calls: AtomicUsize,
}

impl StaticGeoLookup {
    pub fn new(location: &str) -> Self {
        Self {
            location: location.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GeoLookup for StaticGeoLookup {
    async fn locate(&self, _ip: &str) -> String {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.location.clone()
    }
}
