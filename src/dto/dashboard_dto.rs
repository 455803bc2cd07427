use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::job::Job;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_jobs: i64,
    pub active_jobs: i64,
    pub total_applications: i64,
    pub pending_applications: i64,
    pub hired: i64,
    pub total_employees: i64,
    pub present_today: i64,
    pub pending_leaves: i64,
    pub pending_loans: i64,
    pub active_projects: i64,
    pub revenue: Decimal,
}

/// Both halves are optional on the wire: the dashboard has to render when
/// either is missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DashboardResponse {
    pub stats: Option<DashboardStats>,
    pub recent_jobs: Option<Vec<Job>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_halves_deserialize_to_none() {
        let empty: DashboardResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.stats.is_none());
        assert!(empty.recent_jobs.is_none());

        let partial: DashboardResponse =
            serde_json::from_str(r#"{"stats":{"totalJobs":4}}"#).unwrap();
        assert_eq!(partial.stats.unwrap().total_jobs, 4);
    }
}
