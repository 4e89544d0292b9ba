use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::time::Duration;
use tokio::time::timeout;

/// Location reported when no provider could place the address
pub const UNKNOWN_LOCATION: &str = "unknown";

pub const IP_API_URL: &str = "http://ip-api.com";
pub const IPAPI_CO_URL: &str = "https://ipapi.co";

/// Best-effort IP geolocation. Never fails, falls back to [`UNKNOWN_LOCATION`].
#[async_trait]
pub trait GeoLookup: Send + Sync {
    async fn locate(&self, ip: &str) -> String;
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    isp: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IpapiCoResponse {
    #[serde(default)]
    error: bool,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    country_name: Option<String>,
    #[serde(default)]
    org: Option<String>,
}

fn describe(city: Option<String>, country: Option<String>, isp: Option<String>) -> Option<String> {
    let place: Vec<String> = [city, country]
        .into_iter()
        .flatten()
        .filter(|s| !s.trim().is_empty())
        .collect();
    if place.is_empty() {
        return None;
    }
    let place = place.join(", ");
    Some(match isp.filter(|s| !s.trim().is_empty()) {
        Some(isp) => format!("{} ({})", place, isp),
        None => place,
    })
}

/// Addresses no public provider can place
fn is_local(ip: &str) -> bool {
    match ip.parse::<IpAddr>() {
        Ok(IpAddr::V4(v4)) => is_local_v4(v4),
        Ok(IpAddr::V6(v6)) => is_local_v6(v6),
        Err(_) => true,
    }
}

fn is_local_v4(v4: Ipv4Addr) -> bool {
    v4.is_loopback() || v4.is_private() || v4.is_link_local() || v4.is_unspecified()
}

fn is_local_v6(v6: Ipv6Addr) -> bool {
    if let Some(v4) = v6.to_ipv4_mapped() {
        return is_local_v4(v4);
    }
    let first = v6.segments()[0];
    // fc00::/7 unique local, fe80::/10 link local
    v6.is_loopback()
        || v6.is_unspecified()
        || (first & 0xfe00) == 0xfc00
        || (first & 0xffc0) == 0xfe80
}

/// Queries a primary provider and falls back to a second one, each call
/// bounded by `timeout`
pub struct HttpGeoLookup {
    client: Client,
    primary_url: String,
    fallback_url: String,
    timeout: Duration,
}

impl HttpGeoLookup {
    pub fn new(timeout: Duration) -> Self {
        Self::with_providers(IP_API_URL.to_string(), IPAPI_CO_URL.to_string(), timeout)
    }

    pub fn with_providers(primary_url: String, fallback_url: String, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            primary_url: primary_url.trim_end_matches('/').to_string(),
            fallback_url: fallback_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    async fn primary(&self, ip: &str) -> Result<Option<String>, reqwest::Error> {
        let body: IpApiResponse = self
            .client
            .get(format!("{}/json/{}", self.primary_url, ip))
            .query(&[("fields", "status,city,country,isp")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        if body.status != "success" {
            return Ok(None);
        }
        Ok(describe(body.city, body.country, body.isp))
    }

    async fn fallback(&self, ip: &str) -> Result<Option<String>, reqwest::Error> {
        let body: IpapiCoResponse = self
            .client
            .get(format!("{}/{}/json/", self.fallback_url, ip))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        if body.error {
            return Ok(None);
        }
        Ok(describe(body.city, body.country_name, body.org))
    }
}

#[async_trait]
impl GeoLookup for HttpGeoLookup {
    async fn locate(&self, ip: &str) -> String {
        if is_local(ip) {
            debug!("Skipping geolocation for local address {}", ip);
            return UNKNOWN_LOCATION.to_string();
        }

        match timeout(self.timeout, self.primary(ip)).await {
            Ok(Ok(Some(location))) => return location,
            Ok(Ok(None)) => warn!("Primary geolocation had no answer for {}", ip),
            Ok(Err(e)) => warn!("Primary geolocation failed for {}: {}", ip, e),
            Err(_) => warn!("Primary geolocation timed out for {}", ip),
        }

        match timeout(self.timeout, self.fallback(ip)).await {
            Ok(Ok(Some(location))) => location,
            Ok(Ok(None)) => UNKNOWN_LOCATION.to_string(),
            Ok(Err(e)) => {
                warn!("Fallback geolocation failed for {}: {}", ip, e);
                UNKNOWN_LOCATION.to_string()
            }
            Err(_) => {
                warn!("Fallback geolocation timed out for {}", ip);
                UNKNOWN_LOCATION.to_string()
            }
        }
    }
}
