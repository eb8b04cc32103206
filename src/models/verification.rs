use async_graphql::{Enum, SimpleObject};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Identifier assigned to a stored record by the record store.
pub type RecordId = String;

pub const REASON_PENDING: &str = "Email verification in progress";
pub const REASON_INVALID_SYNTAX: &str = "Invalid email syntax";
pub const REASON_DISPOSABLE: &str = "Disposable email provider detected";
pub const REASON_NO_DOMAIN: &str = "Domain does not exist";
pub const REASON_NO_MX: &str = "No MX records found for domain";
pub const REASON_VALID: &str = "Email validation passed all checks";

/// Lifecycle status of a stored address.
///
/// `Pending` only ever appears on records awaiting their result. `Unknown` is
/// reserved: the verification pipeline has no branch that produces it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, Enum,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmailStatus {
    Pending,
    Valid,
    Invalid,
    Disposable,
    Unknown,
}

impl EmailStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmailStatus::Pending => "PENDING",
            EmailStatus::Valid => "VALID",
            EmailStatus::Invalid => "INVALID",
            EmailStatus::Disposable => "DISPOSABLE",
            EmailStatus::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for EmailStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmailStatus {
    type Err = String;

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(EmailStatus::Pending),
            "VALID" => Ok(EmailStatus::Valid),
            "INVALID" => Ok(EmailStatus::Invalid),
            "DISPOSABLE" => Ok(EmailStatus::Disposable),
            "UNKNOWN" => Ok(EmailStatus::Unknown),
            _ => Err(s.to_string()),
        }
    }
}

/// Outcome of verifying one address. Produced exactly once per address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, SimpleObject)]
pub struct VerificationResult {
    /// The normalized address
    pub email: String,
    pub status: EmailStatus,
    /// Human-readable cause of the status
    pub reason: String,
    pub syntax_valid: bool,
    pub domain_exists: bool,
    pub mx_records_exist: bool,
}

impl VerificationResult {
    pub fn invalid_syntax(email: &str) -> Self {
        Self::build(email, EmailStatus::Invalid, REASON_INVALID_SYNTAX, false, false, false)
    }

    /// Domain existence is asserted, not looked up.
    pub fn disposable(email: &str) -> Self {
        Self::build(email, EmailStatus::Disposable, REASON_DISPOSABLE, true, true, false)
    }

    pub fn domain_missing(email: &str) -> Self {
        Self::build(email, EmailStatus::Invalid, REASON_NO_DOMAIN, true, false, false)
    }

    pub fn mx_missing(email: &str) -> Self {
        Self::build(email, EmailStatus::Invalid, REASON_NO_MX, true, true, false)
    }

    pub fn valid(email: &str) -> Self {
        Self::build(email, EmailStatus::Valid, REASON_VALID, true, true, true)
    }

    fn build(
        email: &str,
        status: EmailStatus,
        reason: &str,
        syntax_valid: bool,
        domain_exists: bool,
        mx_records_exist: bool,
    ) -> Self {
        Self {
            email: email.to_string(),
            status,
            reason: reason.to_string(),
            syntax_valid,
            domain_exists,
            mx_records_exist,
        }
    }
}

/// Placeholder written before verification starts so clients can observe
/// in-flight work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRecord {
    pub user_id: String,
    pub email: String,
    pub status: EmailStatus,
    pub reason: String,
    pub syntax_valid: Option<bool>,
    pub domain_exists: Option<bool>,
    pub mx_records_exist: Option<bool>,
}

impl PendingRecord {
    pub fn new(email: &str, user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            email: email.to_string(),
            status: EmailStatus::Pending,
            reason: REASON_PENDING.to_string(),
            syntax_valid: None,
            domain_exists: None,
            mx_records_exist: None,
        }
    }
}

/// Partial update applied to a pending record once its result is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordPatch {
    pub status: EmailStatus,
    pub reason: String,
    pub syntax_valid: bool,
    pub domain_exists: bool,
    pub mx_records_exist: bool,
    pub verified_at: DateTime<Utc>,
}

impl RecordPatch {
    pub fn from_result(result: &VerificationResult, verified_at: DateTime<Utc>) -> Self {
        Self {
            status: result.status,
            reason: result.reason.clone(),
            syntax_valid: result.syntax_valid,
            domain_exists: result.domain_exists,
            mx_records_exist: result.mx_records_exist,
            verified_at,
        }
    }
}

/// A record as held by the store, pending or verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, SimpleObject)]
pub struct StoredRecord {
    pub id: RecordId,
    pub user_id: String,
    pub email: String,
    pub status: EmailStatus,
    pub reason: String,
    pub syntax_valid: Option<bool>,
    pub domain_exists: Option<bool>,
    pub mx_records_exist: Option<bool>,
    pub created_at: DateTime<Utc>,
    pub verified_at: Option<DateTime<Utc>>,
}

impl StoredRecord {
    pub fn from_pending(id: RecordId, pending: PendingRecord, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id: pending.user_id,
            email: pending.email,
            status: pending.status,
            reason: pending.reason,
            syntax_valid: pending.syntax_valid,
            domain_exists: pending.domain_exists,
            mx_records_exist: pending.mx_records_exist,
            created_at,
            verified_at: None,
        }
    }

    pub fn apply(&mut self, patch: RecordPatch) {
        self.status = patch.status;
        self.reason = patch.reason;
        self.syntax_valid = Some(patch.syntax_valid);
        self.domain_exists = Some(patch.domain_exists);
        self.mx_records_exist = Some(patch.mx_records_exist);
        self.verified_at = Some(patch.verified_at);
    }
}

/// Filter for the outbound result query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordQuery {
    pub user_id: String,
    pub status: Option<EmailStatus>,
}

/// Lowercases and trims a raw address. Applied exactly once per address.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}
