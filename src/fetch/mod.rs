pub mod http;

pub use http::HttpBlockFetcher;

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Why a block could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The server answered with a non-success status. `detail` is the
    /// server-supplied message, or the status line when there was none.
    #[error("{detail}")]
    Rejected { status: u16, detail: String },
    #[error("{0}")]
    Transport(String),
    /// The request was abandoned through its cancellation token.
    #[error("the block request was cancelled")]
    Cancelled,
}

impl FetchError {
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::Cancelled)
    }
}

/// Network boundary for block content.
///
/// Implementations must stop working on a request once `cancel` fires. Returning
/// `Err(FetchError::Cancelled)` in that case is allowed but not required: the
/// navigator ignores anything that settles after cancellation.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn fetch(
        &self,
        proposal_code: &str,
        block_code: &str,
        cancel: CancellationToken,
    ) -> Result<String, FetchError>;
}
