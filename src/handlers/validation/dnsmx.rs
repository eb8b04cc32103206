use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};
use trust_dns_resolver::{
    TokioAsyncResolver,
    config::{ResolverConfig, ResolverOpts},
    error::{ResolveError, ResolveErrorKind},
    proto::op::ResponseCode,
};

/// Outcome of one MX lookup.
///
/// `has_mx_records` is never true unless `domain_exists` is; use
/// [`DomainCheck::new`] to build one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DomainCheck {
    pub domain_exists: bool,
    pub has_mx_records: bool,
}

impl DomainCheck {
    pub fn new(domain_exists: bool, has_mx_records: bool) -> Self {
        Self {
            domain_exists,
            has_mx_records: domain_exists && has_mx_records,
        }
    }

    /// The degraded answer used whenever the lookup itself fails.
    pub fn unverifiable() -> Self {
        Self::default()
    }
}

/// Looks up MX records for a domain.
///
/// Implementations never fail: transport errors, timeouts and malformed
/// answers all come back as [`DomainCheck::unverifiable`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DomainResolver: Send + Sync {
    async fn resolve_mx(&self, domain: &str) -> DomainCheck;
}

/// Plain DNS resolver through trust-dns. Defaults to trust-dns' stock
/// upstreams (Google public DNS); the host's resolv.conf is not read.
pub struct SystemResolver {
    resolver: TokioAsyncResolver,
    timeout: Duration,
}

impl SystemResolver {
    pub fn new(timeout: Duration) -> Self {
        Self::with_config(ResolverConfig::default(), timeout)
    }

    /// Single attempt per lookup against `config`, bounded by `timeout`.
    pub fn with_config(config: ResolverConfig, timeout: Duration) -> Self {
        let mut opts = ResolverOpts::default();
        opts.timeout = timeout;
        opts.attempts = 1;

        Self {
            resolver: TokioAsyncResolver::tokio(config, opts),
            timeout,
        }
    }
}

#[async_trait]
impl DomainResolver for SystemResolver {
    async fn resolve_mx(&self, domain: &str) -> DomainCheck {
        let lookup = tokio::time::timeout(self.timeout, self.resolver.mx_lookup(domain)).await;

        match lookup {
            Ok(Ok(records)) => {
                let count = records.iter().count();
                debug!(domain, count, "mx lookup answered");
                DomainCheck::new(true, count > 0)
            }
            Ok(Err(err)) => classify_error(domain, &err),
            Err(_) => {
                warn!(domain, "mx lookup timed out");
                DomainCheck::unverifiable()
            }
        }
    }
}

fn classify_error(domain: &str, err: &ResolveError) -> DomainCheck {
    match err.kind() {
        ResolveErrorKind::NoRecordsFound { response_code, .. } => {
            debug!(domain, code = ?response_code, "mx lookup returned no records");
            from_response_code(*response_code)
        }
        _ => {
            warn!(domain, error = %err, "mx lookup failed");
            DomainCheck::unverifiable()
        }
    }
}

/// Only a NOERROR answer means the domain exists; NXDOMAIN, SERVFAIL and the
/// rest do not.
fn from_response_code(code: ResponseCode) -> DomainCheck {
    DomainCheck::new(code == ResponseCode::NoError, false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mx_requires_existing_domain() {
        assert_eq!(
            DomainCheck::new(false, true),
            DomainCheck {
                domain_exists: false,
                has_mx_records: false
            }
        );
        assert!(DomainCheck::new(true, true).has_mx_records);
    }

    #[test]
    fn test_unverifiable_is_all_false() {
        let check = DomainCheck::unverifiable();
        assert!(!check.domain_exists);
        assert!(!check.has_mx_records);
    }

    #[test]
    fn test_response_code_mapping() {
        assert_eq!(from_response_code(ResponseCode::NoError), DomainCheck::new(true, false));
        assert_eq!(from_response_code(ResponseCode::NXDomain), DomainCheck::unverifiable());
        assert_eq!(from_response_code(ResponseCode::ServFail), DomainCheck::unverifiable());
        assert_eq!(from_response_code(ResponseCode::Refused), DomainCheck::unverifiable());
    }

    #[tokio::test]
    async fn test_silent_server_degrades_within_timeout() {
        use std::time::Instant;
        use trust_dns_resolver::config::{NameServerConfig, Protocol};

        // bound but never answered
        let socket = tokio::net::UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = socket.local_addr().unwrap();
        let config = ResolverConfig::from_parts(
            None,
            vec![],
            vec![NameServerConfig::new(addr, Protocol::Udp)],
        );
        let timeout = Duration::from_millis(300);
        let resolver = SystemResolver::with_config(config, timeout);

        let started = Instant::now();
        let check = resolver.resolve_mx("example.com").await;

        assert_eq!(check, DomainCheck::unverifiable());
        assert!(started.elapsed() < timeout + Duration::from_millis(250));
    }

    #[test]
    fn test_transport_errors_degrade() {
        let err: ResolveError = ResolveErrorKind::Message("connection refused").into();
        assert_eq!(classify_error("example.com", &err), DomainCheck::unverifiable());

        let err: ResolveError = ResolveErrorKind::Timeout.into();
        assert_eq!(classify_error("example.com", &err), DomainCheck::unverifiable());
    }
}
