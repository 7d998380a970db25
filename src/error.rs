// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Failure classes surfaced to callers of the exchange rate service.
///
/// External-source outages never appear here; they are absorbed into the
/// demo-rate fallback. Cache store failures do surface, as `Operational`,
/// since no fallback exists for a broken store.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// Input rejected before any I/O; carries every violated rule's message.
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// A downstream failure that is not recoverable by fallback.
    #[error("{0}")]
    Operational(String),
}

impl ExchangeError {
    pub fn is_validation(&self) -> bool {
        matches!(self, ExchangeError::Validation(_))
    }
}
