//! Driving port for publishing a batch of listings.

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{BookDraft, Error, UserId};

/// Outcome of a successful publish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublishOutcome {
    /// Rows inserted; always the batch size.
    pub published: usize,
    /// Server-assigned listing ids in batch order.
    pub ids: Vec<Uuid>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingCommand: Send + Sync {
    /// Publish every draft for `seller` in one insert, or none of them.
    ///
    /// # Errors
    /// - `invalid_request` for an empty batch, or with `details.index` for
    ///   the first invalid draft.
    /// - `forbidden` when the seller has not completed a profile.
    /// - `service_unavailable` or `internal_error` when persistence fails.
    async fn publish(&self, seller: &UserId, drafts: Vec<BookDraft>)
    -> Result<PublishOutcome, Error>;
}
