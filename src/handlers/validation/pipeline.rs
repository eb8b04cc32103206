use super::disposable::DisposableRegistry;
use super::dnsmx::DomainResolver;
use super::syntax::is_syntactically_valid;
use crate::models::VerificationResult;
use std::sync::Arc;
use tracing::debug;

/// Classifies one address by running the checks in a fixed order:
/// syntax, disposable registry, then DNS. The first decisive check wins and
/// later checks never run.
#[derive(Clone)]
pub struct VerificationPipeline {
    registry: Arc<DisposableRegistry>,
    resolver: Arc<dyn DomainResolver>,
}

impl VerificationPipeline {
    pub fn new(registry: Arc<DisposableRegistry>, resolver: Arc<dyn DomainResolver>) -> Self {
        Self { registry, resolver }
    }

    /// `address` must already be normalized. Never fails: resolver problems
    /// surface as an ordinary INVALID result.
    pub async fn verify(&self, address: &str) -> VerificationResult {
        if !is_syntactically_valid(address) {
            debug!(address, "rejected: syntax");
            return VerificationResult::invalid_syntax(address);
        }

        // Valid syntax guarantees exactly one '@'.
        let domain = match address.split_once('@') {
            Some((_, domain)) => domain,
            None => return VerificationResult::invalid_syntax(address),
        };

        if self.registry.is_disposable(domain) {
            debug!(address, domain, "rejected: disposable provider");
            return VerificationResult::disposable(address);
        }

        let check = self.resolver.resolve_mx(domain).await;
        let result = if !check.domain_exists {
            VerificationResult::domain_missing(address)
        } else if !check.has_mx_records {
            VerificationResult::mx_missing(address)
        } else {
            VerificationResult::valid(address)
        };

        debug!(address, status = %result.status, reason = %result.reason, "verified");
        result
    }
}
