//! Transport trait used by endpoint modules.

use std::fmt::Debug;

use async_trait::async_trait;

use crate::{error::Result, request::RequestSpec, response::RawResponse};

/// Sends a single GET request to the terminal.
///
/// Implementations return the fully drained response whatever its status;
/// status handling belongs to the caller. A failure to reach the terminal is
/// reported as [`ThetaError::Transport`](crate::ThetaError::Transport).
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    /// Sends `request` once, without retrying.
    async fn send(&self, request: &RequestSpec) -> Result<RawResponse>;
}
