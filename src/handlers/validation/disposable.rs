use futures::TryStreamExt;
use mongodb::Collection;
use mongodb::bson::{Document, doc};
use std::collections::HashSet;
use tracing::info;

/// Domains known to hand out throwaway mailboxes.
pub const BUILTIN_DISPOSABLE_DOMAINS: &[&str] = &[
    "10minutemail.com",
    "guerrillamail.com",
    "temp-mail.org",
    "mailinator.com",
    "yopmail.com",
    "throwaway.email",
    "tempail.com",
    "getnada.com",
];

/// Read-only set of disposable-email domains.
///
/// Built once at startup and shared behind an `Arc`; lookups are exact,
/// case-insensitive matches with no suffix or wildcard handling.
#[derive(Debug, Clone)]
pub struct DisposableRegistry {
    domains: HashSet<String>,
}

impl DisposableRegistry {
    pub fn new<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            domains: domains
                .into_iter()
                .map(|d| d.as_ref().trim().to_lowercase())
                .filter(|d| !d.is_empty())
                .collect(),
        }
    }

    pub fn builtin() -> Self {
        Self::new(BUILTIN_DISPOSABLE_DOMAINS)
    }

    /// Builtin list extended with every `{ domain: <string> }` document of
    /// the given collection. Documents without a string `domain` are skipped.
    pub async fn with_collection(
        collection: &Collection<Document>,
    ) -> Result<Self, mongodb::error::Error> {
        let mut registry = Self::builtin();
        let cursor = collection
            .find(doc! {})
            .projection(doc! { "domain": 1, "_id": 0 })
            .await?;
        let docs: Vec<Document> = cursor.try_collect().await?;

        let extra = docs
            .iter()
            .filter_map(|d| d.get_str("domain").ok())
            .map(|d| d.trim().to_lowercase())
            .filter(|d| !d.is_empty());
        registry.domains.extend(extra);

        info!(
            domains = registry.len(),
            collection = collection.name(),
            "loaded disposable domain registry"
        );
        Ok(registry)
    }

    /// Exact, case-insensitive membership test. The caller is expected to have
    /// checked the address syntax already; malformed input simply misses.
    pub fn is_disposable(&self, domain: &str) -> bool {
        self.domains.contains(&domain.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}

impl Default for DisposableRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
