//! Driving port for browsing listings.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Error, Listing, UserId};

/// Search bar selections.
///
/// Accepted and echoed back, but not applied to the query yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListingFilters {
    #[param(example = "Physical Science")]
    pub stream: Option<String>,
    #[param(example = "Physics")]
    pub subject: Option<String>,
    #[param(example = "Colombo")]
    pub district: Option<String>,
    #[param(example = "English")]
    pub medium: Option<String>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingQuery: Send + Sync {
    /// Most recent listings with seller contact resolved.
    async fn browse(&self, filters: &ListingFilters) -> Result<Vec<Listing>, Error>;

    /// The caller's own listings.
    async fn listings_for_seller(&self, seller: &UserId) -> Result<Vec<Listing>, Error>;
}
