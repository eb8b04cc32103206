use super::dnsmx::{DomainCheck, DomainResolver};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_DOH_ENDPOINT: &str = "https://dns.google/resolve";

/// JSON answer format shared by Google and Cloudflare DNS-over-HTTPS.
#[derive(Debug, Deserialize)]
pub struct DohResponse {
    /// DNS RCODE, 0 is NOERROR
    #[serde(rename = "Status")]
    pub status: u16,
    #[serde(rename = "Answer", default)]
    pub answer: Option<Vec<DohAnswer>>,
}

#[derive(Debug, Deserialize)]
pub struct DohAnswer {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub record_type: u16,
    #[serde(default)]
    pub data: String,
}

impl DohResponse {
    pub fn to_check(&self) -> DomainCheck {
        let answered = self.answer.as_ref().is_some_and(|a| !a.is_empty());
        DomainCheck::new(self.status == 0, answered)
    }
}

/// MX lookups over a DNS-over-HTTPS JSON endpoint.
pub struct DohResolver {
    client: Client,
    endpoint: String,
}

impl DohResolver {
    /// `timeout` bounds each lookup end to end, connect included.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("email-verifier/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    async fn query(&self, domain: &str) -> Result<DohResponse, reqwest::Error> {
        self.client
            .get(&self.endpoint)
            .query(&[("name", domain), ("type", "MX")])
            .header(ACCEPT, "application/dns-json")
            .send()
            .await?
            .error_for_status()?
            .json::<DohResponse>()
            .await
    }
}

#[async_trait]
impl DomainResolver for DohResolver {
    async fn resolve_mx(&self, domain: &str) -> DomainCheck {
        match self.query(domain).await {
            Ok(response) => {
                let check = response.to_check();
                debug!(
                    domain,
                    rcode = response.status,
                    domain_exists = check.domain_exists,
                    has_mx_records = check.has_mx_records,
                    "doh lookup answered"
                );
                check
            }
            Err(err) => {
                warn!(domain, error = %err, timeout = err.is_timeout(), "doh lookup failed");
                DomainCheck::unverifiable()
            }
        }
    }
}
