use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::filter::Searchable;

pub const BILLING_CYCLES: [&str; 3] = ["monthly", "yearly", "one-time"];

/// A vendor's service offering with its price card.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PricingPlan {
    pub id: Uuid,
    pub vendor_email: String,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub price: Decimal,
    pub currency: String,
    pub billing_cycle: String,
    pub features: Vec<String>,
    pub limitations: Vec<String>,
    pub is_active: bool,
    pub popular: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Searchable for PricingPlan {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.category.as_str()];
        if let Some(description) = self.description.as_deref() {
            fields.push(description);
        }
        fields
    }

    fn facet(&self, name: &str) -> Option<&str> {
        match name {
            "category" => Some(self.category.as_str()),
            "billingCycle" => Some(self.billing_cycle.as_str()),
            "active" => Some(if self.is_active { "true" } else { "false" }),
            _ => None,
        }
    }
}

/// Flips `popular` on the plan with `id` and clears it on every other plan
/// when it was switched on. Returns the new flag, or `None` if no plan has
/// that id.
pub fn toggle_popular(plans: &mut [PricingPlan], id: Uuid) -> Option<bool> {
    let target = plans.iter().position(|p| p.id == id)?;
    let now_popular = !plans[target].popular;
    for (index, plan) in plans.iter_mut().enumerate() {
        if index == target {
            plan.popular = now_popular;
        } else if now_popular {
            plan.popular = false;
        }
    }
    Some(now_popular)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(name: &str, popular: bool) -> PricingPlan {
        PricingPlan {
            id: Uuid::new_v4(),
            vendor_email: "vendor@staffing.io".into(),
            name: name.into(),
            description: None,
            category: "Recruitment".into(),
            price: Decimal::new(4900, 2),
            currency: "USD".into(),
            billing_cycle: "monthly".into(),
            features: vec!["Job board".into()],
            limitations: vec![],
            is_active: true,
            popular,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn popular_count(plans: &[PricingPlan]) -> usize {
        plans.iter().filter(|p| p.popular).count()
    }

    #[test]
    fn switching_on_clears_the_previous_popular_plan() {
        let mut plans = vec![plan("Basic", true), plan("Pro", false), plan("Enterprise", false)];
        let pro = plans[1].id;
        assert_eq!(toggle_popular(&mut plans, pro), Some(true));
        assert_eq!(popular_count(&plans), 1);
        assert!(plans[1].popular);
    }

    #[test]
    fn switching_off_leaves_no_popular_plan() {
        let mut plans = vec![plan("Basic", true), plan("Pro", false)];
        let basic = plans[0].id;
        assert_eq!(toggle_popular(&mut plans, basic), Some(false));
        assert_eq!(popular_count(&plans), 0);
    }

    #[test]
    fn any_toggle_sequence_keeps_at_most_one_popular() {
        let mut plans = vec![
            plan("A", true),
            plan("B", true),
            plan("C", false),
            plan("D", false),
        ];
        let ids: Vec<Uuid> = plans.iter().map(|p| p.id).collect();
        for step in 0..20 {
            toggle_popular(&mut plans, ids[(step * 7) % ids.len()]);
            assert!(popular_count(&plans) <= 1);
        }
    }

    #[test]
    fn unknown_plan_is_ignored() {
        let mut plans = vec![plan("Basic", true)];
        assert_eq!(toggle_popular(&mut plans, Uuid::new_v4()), None);
        assert!(plans[0].popular);
    }
}
