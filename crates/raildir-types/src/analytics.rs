//! Server-computed analytics snapshots.
//!
//! These are opaque read-only aggregates; the client copies them into state
//! as-is.

use serde::{Deserialize, Serialize};

/// Headline numbers for the analytics dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsOverview {
    pub total_contacts: u64,
    pub contacts_with_blood_group: u64,
    pub contacts_with_lobby: u64,
    pub contacts_without_blood_group: u64,
    pub contacts_without_lobby: u64,
    #[serde(rename = "recentContacts7Days")]
    pub recent_contacts_7_days: u64,
    #[serde(rename = "recentContacts30Days")]
    pub recent_contacts_30_days: u64,
    pub visit_count: u64,
    /// Percentage string as rendered by the backend, e.g. `"87.5%"`.
    pub blood_group_coverage: String,
    pub lobby_coverage: String,
}

/// One bucket of a [`Distribution`].
///
/// Exactly one of the category fields is set, matching the attribute the
/// distribution was computed over.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lobby: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
    pub count: u64,
    pub percentage: String,
}

impl DistributionItem {
    /// The category value this bucket counts.
    #[must_use]
    pub fn label(&self) -> &str {
        self.blood_group
            .as_deref()
            .or(self.lobby.as_deref())
            .or(self.designation.as_deref())
            .unwrap_or("")
    }
}

/// Count/percentage breakdown of contacts by one categorical attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distribution {
    pub total: u64,
    pub distribution: Vec<DistributionItem>,
}

/// Contacts added on one day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyGrowth {
    pub date: String,
    pub count: u64,
    pub cumulative: u64,
}

/// Directory growth over a period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthData {
    pub period: String,
    pub total_added: u64,
    pub daily_growth: Vec<DailyGrowth>,
}

/// Condensed contact record in the "recently added" list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentContact {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub blood_group: Option<String>,
    #[serde(default)]
    pub lobby: Option<String>,
    #[serde(default)]
    pub designation: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentContacts {
    pub count: u64,
    pub contacts: Vec<RecentContact>,
}

/// Current value of the site visit counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitCount {
    pub visit_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitHistoryItem {
    pub date: String,
    pub count: u64,
}

/// Daily visit counts over a period.
///
/// The backend sends the items under `data` next to `period` and
/// `totalVisits`, so this deserializes straight from the response body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitHistory {
    pub period: String,
    pub total_visits: u64,
    pub data: Vec<VisitHistoryItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overview_wire_names() {
        let overview: AnalyticsOverview = serde_json::from_value(serde_json::json!({
            "totalContacts": 120,
            "contactsWithBloodGroup": 100,
            "contactsWithLobby": 90,
            "contactsWithoutBloodGroup": 20,
            "contactsWithoutLobby": 30,
            "recentContacts7Days": 4,
            "recentContacts30Days": 11,
            "visitCount": 5021,
            "bloodGroupCoverage": "83.3%",
            "lobbyCoverage": "75.0%"
        }))
        .unwrap();

        assert_eq!(overview.recent_contacts_7_days, 4);
        assert_eq!(overview.recent_contacts_30_days, 11);
        assert_eq!(overview.visit_count, 5021);
    }

    #[test]
    fn test_distribution_item_label() {
        let item: DistributionItem =
            serde_json::from_str(r#"{"lobby":"GNT","count":7,"percentage":"5.8%"}"#).unwrap();
        assert_eq!(item.label(), "GNT");
    }

    #[test]
    fn test_visit_history_from_response_body() {
        let history: VisitHistory = serde_json::from_str(
            r#"{"success":true,"period":"7 days","totalVisits":9,"data":[{"date":"2024-05-01","count":9}]}"#,
        )
        .unwrap();

        assert_eq!(history.total_visits, 9);
        assert_eq!(history.data.len(), 1);
    }
}
