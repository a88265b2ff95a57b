//! The administrative client contract.
//!
//! The concrete RPC transport lives outside this crate. Reconciliation only
//! needs the three scope-resolving calls below; how a scope travels (explicit
//! request fields or out-of-band routing metadata) is up to the
//! implementation.

use async_trait::async_trait;
use serde_json::{Map, Value};
use snafu::Snafu;

use crate::{category::TextCategory, scope::Scope, transcode::RemoteRecord};

/// Textual markers the administrative API uses to signal a missing record.
///
/// The API does not expose a structured not-found status on these calls, so
/// classification falls back to matching the error message.
const NOT_FOUND_MARKERS: &[&str] = &["not found", "not_found", "does not exist"];

/// An error returned by an administrative client implementation.
#[derive(Debug, Snafu)]
#[snafu(display("{message}"))]
pub struct ClientError {
    pub message: String,
}

impl ClientError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Whether this error signals that the addressed record does not exist.
    pub fn is_not_found(&self) -> bool {
        let message = self.message.to_lowercase();
        NOT_FOUND_MARKERS
            .iter()
            .any(|marker| message.contains(marker))
    }
}

/// Scope-resolving client against the identity platform's administrative API.
///
/// Implementations must be safe to call concurrently for different scopes.
/// Per-call deadlines and retries are the implementation's concern; the
/// reconciliation controller issues every call exactly once.
#[async_trait]
pub trait AdminTextClient: Send + Sync {
    /// Fetches the current record for a (category, scope) pair. When no
    /// override exists the platform returns its default flagged with
    /// `is_default` rather than an error.
    async fn get_text(
        &self,
        category: TextCategory,
        scope: &Scope,
    ) -> Result<RemoteRecord, ClientError>;

    /// Stores `content` as the override for a (category, scope) pair.
    async fn set_text(
        &self,
        category: TextCategory,
        scope: &Scope,
        content: Map<String, Value>,
    ) -> Result<(), ClientError>;

    /// Reverts a (category, scope) pair to the platform default.
    async fn reset_text(&self, category: TextCategory, scope: &Scope) -> Result<(), ClientError>;
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("record not found", true)]
    #[case("rpc error: code = NotFound desc = Errors.CustomText.NOT_FOUND", true)]
    #[case("customization does not exist", true)]
    #[case("Record Not Found", true)]
    #[case("permission denied", false)]
    #[case("deadline exceeded", false)]
    fn not_found_detection_matches_on_message_text(#[case] message: &str, #[case] expected: bool) {
        assert_eq!(ClientError::new(message).is_not_found(), expected);
    }
}
