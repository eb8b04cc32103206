/// Address shape check: exactly one `@`, a non-empty local part and a dotted
/// domain, no whitespace.
///
/// # Examples
/// ```
/// use email_verifier::handlers::validation::syntax::is_syntactically_valid;
///
/// assert!(is_syntactically_valid("user@example.com"));
/// assert!(!is_syntactically_valid("not-an-email"));
/// ```
pub mod syntax;

/// Curated, read-only set of disposable-email domains.
///
/// # Example
/// ```
/// use email_verifier::handlers::validation::disposable::DisposableRegistry;
///
/// let registry = DisposableRegistry::builtin();
/// assert!(registry.is_disposable("Mailinator.com"));
/// assert!(!registry.is_disposable("example.com"));
/// ```
pub mod disposable;

/// The [`DomainResolver`](dnsmx::DomainResolver) seam and the trust-dns
/// backed system resolver.
pub mod dnsmx;

/// MX lookups through a DNS-over-HTTPS JSON endpoint.
pub mod doh;

/// Ordered, short-circuiting combination of the checks above.
pub mod pipeline;


pub use disposable::DisposableRegistry;
pub use dnsmx::{DomainCheck, DomainResolver, SystemResolver};
pub use doh::DohResolver;
pub use pipeline::VerificationPipeline;
