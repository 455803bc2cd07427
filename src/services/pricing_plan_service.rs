use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::vendor_dto::{CreatePlanPayload, PlanQuery, PopularToggle, UpdatePlanPayload};
use crate::error::{Error, Result};
use crate::models::pricing_plan::PricingPlan;
use crate::utils::validation::ListInput;

const PLAN_COLUMNS: &str = "id, vendor_email, name, description, category, price, currency, billing_cycle, features, limitations, is_active, popular, created_at, updated_at";

#[derive(Clone)]
pub struct PricingPlanService {
    pool: PgPool,
}

impl PricingPlanService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, vendor_email: &str, query: PlanQuery) -> Result<Vec<PricingPlan>> {
        let mut filters = vec!["vendor_email = LOWER($1)".to_string()];
        let mut args: Vec<String> = vec![vendor_email.to_string()];

        if let Some(category) = query.category.filter(|s| !s.is_empty() && s != "all") {
            filters.push(format!("category = ${}", args.len() + 1));
            args.push(category);
        }
        if let Some(search) = query.search.filter(|s| !s.trim().is_empty()) {
            let n = args.len() + 1;
            filters.push(format!("(name ILIKE ${n} OR description ILIKE ${n})"));
            args.push(format!("%{}%", search.trim()));
        }

        let sql = format!(
            "SELECT {} FROM pricing_plans WHERE {} ORDER BY popular DESC, price ASC",
            PLAN_COLUMNS,
            filters.join(" AND ")
        );
        let mut statement = sqlx::query_as::<_, PricingPlan>(&sql);
        for value in &args {
            statement = statement.bind(value);
        }
        Ok(statement.fetch_all(&self.pool).await?)
    }

    pub async fn create(&self, vendor_email: &str, payload: CreatePlanPayload) -> Result<PricingPlan> {
        let popular = payload.popular.unwrap_or(false);
        let mut tx = self.pool.begin().await?;
        if popular {
            clear_popular(&mut tx, vendor_email).await?;
        }

        let sql = format!(
            "INSERT INTO pricing_plans (vendor_email, name, description, category, price, currency, billing_cycle, features, limitations, is_active, popular)
             VALUES (LOWER($1), $2, $3, $4, $5, COALESCE($6, 'USD'), COALESCE($7, 'monthly'), $8, $9, COALESCE($10, TRUE), $11)
             RETURNING {}",
            PLAN_COLUMNS
        );
        let plan = sqlx::query_as::<_, PricingPlan>(&sql)
            .bind(vendor_email)
            .bind(payload.name.trim())
            .bind(payload.description)
            .bind(payload.category)
            .bind(payload.price)
            .bind(payload.currency)
            .bind(payload.billing_cycle)
            .bind(payload.features.map(ListInput::into_vec).unwrap_or_default())
            .bind(payload.limitations.map(ListInput::into_vec).unwrap_or_default())
            .bind(payload.is_active)
            .bind(popular)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        tracing::info!(plan_id = %plan.id, vendor = vendor_email, "service plan created");
        Ok(plan)
    }

    pub async fn update(&self, vendor_email: &str, id: Uuid, payload: UpdatePlanPayload) -> Result<PricingPlan> {
        let sql = format!(
            "UPDATE pricing_plans
             SET name = COALESCE($3, name),
                 description = COALESCE($4, description),
                 category = COALESCE($5, category),
                 price = COALESCE($6, price),
                 currency = COALESCE($7, currency),
                 billing_cycle = COALESCE($8, billing_cycle),
                 features = COALESCE($9, features),
                 limitations = COALESCE($10, limitations),
                 is_active = COALESCE($11, is_active),
                 updated_at = NOW()
             WHERE id = $1 AND vendor_email = LOWER($2)
             RETURNING {}",
            PLAN_COLUMNS
        );
        sqlx::query_as::<_, PricingPlan>(&sql)
            .bind(id)
            .bind(vendor_email)
            .bind(payload.name)
            .bind(payload.description)
            .bind(payload.category)
            .bind(payload.price)
            .bind(payload.currency)
            .bind(payload.billing_cycle)
            .bind(payload.features.map(ListInput::into_vec))
            .bind(payload.limitations.map(ListInput::into_vec))
            .bind(payload.is_active)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Service not found".into()))
    }

    pub async fn delete(&self, vendor_email: &str, id: Uuid) -> Result<()> {
        let res = sqlx::query("DELETE FROM pricing_plans WHERE id = $1 AND vendor_email = LOWER($2)")
            .bind(id)
            .bind(vendor_email)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(Error::NotFound("Service not found".into()));
        }
        Ok(())
    }

    /// Flips the popular flag. Switching it on clears it from the vendor's
    /// other plans first, so at most one plan is popular.
    pub async fn toggle_popular(&self, vendor_email: &str, id: Uuid) -> Result<PopularToggle> {
        let mut tx = self.pool.begin().await?;
        let current: bool = sqlx::query_scalar(
            "SELECT popular FROM pricing_plans WHERE id = $1 AND vendor_email = LOWER($2) FOR UPDATE",
        )
        .bind(id)
        .bind(vendor_email)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| Error::NotFound("Service not found".into()))?;

        let popular = !current;
        if popular {
            clear_popular(&mut tx, vendor_email).await?;
        }
        sqlx::query("UPDATE pricing_plans SET popular = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(popular)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(PopularToggle { id, popular })
    }
}

async fn clear_popular(tx: &mut sqlx::Transaction<'_, sqlx::Postgres>, vendor_email: &str) -> Result<()> {
    sqlx::query(
        "UPDATE pricing_plans SET popular = FALSE, updated_at = NOW()
         WHERE vendor_email = LOWER($1) AND popular",
    )
    .bind(vendor_email)
    .execute(&mut **tx)
    .await?;
    Ok(())
}
