//! # Analytics Service
//!
//! Read-only dashboard aggregates plus the site visit counter.

use raildir_types::{
    AnalyticsOverview, Distribution, GrowthData, MaybeEnveloped, RecentContacts, VisitCount,
    VisitHistory,
};
use serde::de::DeserializeOwned;

use crate::api::{ApiClient, ApiRequest};
use crate::error::Result;

const VISITS: &str = "/api/analytics/visits";
const VISITS_HISTORY: &str = "/api/analytics/visits/history";
const OVERVIEW: &str = "/api/analytics/overview";
const BLOOD_GROUPS: &str = "/api/analytics/blood-groups";
const LOBBIES: &str = "/api/analytics/lobbies";
const DESIGNATIONS: &str = "/api/analytics/designations";
const GROWTH: &str = "/api/analytics/growth";
const RECENT: &str = "/api/analytics/recent";

/// Default window for [`AnalyticsService::get_growth`].
pub const DEFAULT_GROWTH_DAYS: u32 = 7;

/// Default size for [`AnalyticsService::get_recent_contacts`].
pub const DEFAULT_RECENT_LIMIT: u32 = 10;

/// Default window for [`AnalyticsService::get_visit_history`].
pub const DEFAULT_HISTORY_DAYS: u32 = 30;

/// Service for the `/api/analytics` resource family.
#[derive(Clone)]
pub struct AnalyticsService {
    client: ApiClient,
}

impl AnalyticsService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Records one visit and returns the counter after the increment.
    ///
    /// Not idempotent: every call counts.
    ///
    /// # Errors
    ///
    /// Propagates transport and API errors.
    pub async fn increment_visit_count(&self) -> Result<u64> {
        let request = ApiRequest::post(VISITS).json(&serde_json::json!({}))?;
        let response: MaybeEnveloped<VisitCount> = self.client.execute(request).await?;
        Ok(response.into_inner().visit_count)
    }

    /// Reads the visit counter without changing it.
    ///
    /// # Errors
    ///
    /// Propagates transport and API errors.
    pub async fn get_visit_count(&self) -> Result<u64> {
        let count: VisitCount = self.fetch(ApiRequest::get(VISITS)).await?;
        Ok(count.visit_count)
    }

    /// # Errors
    ///
    /// Propagates transport and API errors.
    pub async fn get_overview(&self) -> Result<AnalyticsOverview> {
        self.fetch(ApiRequest::get(OVERVIEW)).await
    }

    /// # Errors
    ///
    /// Propagates transport and API errors.
    pub async fn get_blood_group_distribution(&self) -> Result<Distribution> {
        self.fetch(ApiRequest::get(BLOOD_GROUPS)).await
    }

    /// # Errors
    ///
    /// Propagates transport and API errors.
    pub async fn get_lobby_distribution(&self) -> Result<Distribution> {
        self.fetch(ApiRequest::get(LOBBIES)).await
    }

    /// # Errors
    ///
    /// Propagates transport and API errors.
    pub async fn get_designation_distribution(&self) -> Result<Distribution> {
        self.fetch(ApiRequest::get(DESIGNATIONS)).await
    }

    /// Contacts added per day over the last `days` days.
    ///
    /// # Errors
    ///
    /// Propagates transport and API errors.
    pub async fn get_growth(&self, days: u32) -> Result<GrowthData> {
        self.fetch(ApiRequest::get(GROWTH).query("days", days)).await
    }

    /// The `limit` most recently added contacts.
    ///
    /// # Errors
    ///
    /// Propagates transport and API errors.
    pub async fn get_recent_contacts(&self, limit: u32) -> Result<RecentContacts> {
        self.fetch(ApiRequest::get(RECENT).query("limit", limit)).await
    }

    /// Daily visit counts over the last `days` days.
    ///
    /// # Errors
    ///
    /// Propagates transport and API errors.
    pub async fn get_visit_history(&self, days: u32) -> Result<VisitHistory> {
        self.fetch(ApiRequest::get(VISITS_HISTORY).query("days", days))
            .await
    }

    async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let response: MaybeEnveloped<T> = self.client.execute(request).await?;
        Ok(response.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn service(server: &MockServer) -> AnalyticsService {
        AnalyticsService::new(ApiClient::new(&ClientConfig::new(server.uri())).unwrap())
    }

    #[tokio::test]
    async fn test_increment_posts_empty_object() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/analytics/visits"))
            .and(body_json(serde_json::json!({})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "data": { "visitCount": 1043 }
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        assert_eq!(service(&mock_server).increment_visit_count().await.unwrap(), 1043);
    }

    #[tokio::test]
    async fn test_get_visit_count_is_a_read() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/analytics/visits"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "data": { "visitCount": 1042 }
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        assert_eq!(service(&mock_server).get_visit_count().await.unwrap(), 1042);
    }

    #[tokio::test]
    async fn test_growth_and_recent_send_parameters() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/analytics/growth"))
            .and(query_param("days", "7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "data": {
                    "period": "7 days",
                    "totalAdded": 3,
                    "dailyGrowth": [{ "date": "2024-05-01", "count": 3, "cumulative": 120 }]
                }
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/analytics/recent"))
            .and(query_param("limit", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "data": { "count": 0, "contacts": [] }
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let service = service(&mock_server);
        let growth = service.get_growth(DEFAULT_GROWTH_DAYS).await.unwrap();
        assert_eq!(growth.total_added, 3);
        assert_eq!(growth.daily_growth[0].cumulative, 120);

        let recent = service.get_recent_contacts(DEFAULT_RECENT_LIMIT).await.unwrap();
        assert!(recent.contacts.is_empty());
    }

    #[tokio::test]
    async fn test_distribution_is_unwrapped() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/analytics/lobbies"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "data": {
                    "total": 10,
                    "distribution": [
                        { "lobby": "BZA", "count": 6, "percentage": "60.0%" },
                        { "lobby": "GNT", "count": 4, "percentage": "40.0%" }
                    ]
                }
            })))
            .mount(&mock_server)
            .await;

        let distribution = service(&mock_server).get_lobby_distribution().await.unwrap();
        assert_eq!(distribution.total, 10);
        assert_eq!(distribution.distribution[1].label(), "GNT");
    }

    #[tokio::test]
    async fn test_visit_history_flat_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/analytics/visits/history"))
            .and(query_param("days", "30"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "period": "30 days",
                "totalVisits": 12,
                "data": [{ "date": "2024-05-01", "count": 12 }]
            })))
            .mount(&mock_server)
            .await;

        let history = service(&mock_server)
            .get_visit_history(DEFAULT_HISTORY_DAYS)
            .await
            .unwrap();
        assert_eq!(history.total_visits, 12);
        assert_eq!(history.data[0].date, "2024-05-01");
    }
}
