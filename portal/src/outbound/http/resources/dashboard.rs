//! `/dashboard` endpoints.

use futures_util::future::try_join3;
use serde::Serialize;
use serde_json::Value;

use crate::domain::ApiError;
use crate::outbound::http::{ApiClient, ApiRequest, HttpMethod, OperationDescriptor};

const STATS: OperationDescriptor = OperationDescriptor::json(HttpMethod::Get, "/dashboard/stats");
const RECENT_ACTIVITY: OperationDescriptor =
    OperationDescriptor::json(HttpMethod::Get, "/dashboard/recent-activity");
const UPCOMING_PAYMENTS: OperationDescriptor =
    OperationDescriptor::json(HttpMethod::Get, "/dashboard/upcoming-payments");

/// Everything the landing dashboard renders, fetched together.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    /// Headline counters.
    pub stats: Value,
    /// Latest events across the user's properties.
    pub recent_activity: Value,
    /// Payments falling due soon.
    pub upcoming_payments: Value,
}

/// Dashboard operations.
pub struct Dashboard<'a> {
    client: &'a ApiClient,
}

impl<'a> Dashboard<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Headline counters for the signed-in user.
    pub async fn stats(&self) -> Result<Value, ApiError> {
        self.client.execute(&STATS, ApiRequest::new()).await
    }

    /// Latest activity feed.
    pub async fn recent_activity(&self) -> Result<Value, ApiError> {
        self.client.execute(&RECENT_ACTIVITY, ApiRequest::new()).await
    }

    /// Payments due soon.
    pub async fn upcoming_payments(&self) -> Result<Value, ApiError> {
        self.client
            .execute(&UPCOMING_PAYMENTS, ApiRequest::new())
            .await
    }

    /// Fetch the three dashboard panels concurrently. Any failure fails the
    /// whole overview.
    pub async fn overview(&self) -> Result<DashboardOverview, ApiError> {
        let (stats, recent_activity, upcoming_payments) = try_join3(
            self.stats(),
            self.recent_activity(),
            self.upcoming_payments(),
        )
        .await?;
        Ok(DashboardOverview {
            stats,
            recent_activity,
            upcoming_payments,
        })
    }
}
