use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::project_dto::{CreateProjectPayload, ProjectQuery, UpdateProjectPayload};
use crate::error::{Error, Result};
use crate::models::project::Project;

const PROJECT_COLUMNS: &str = "id, name, description, client_email, vendor_email, status, budget, start_date, end_date, created_at, updated_at";

/// Which projects a caller may see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectScope {
    All,
    Client(String),
    Vendor(String),
}

#[derive(Clone)]
pub struct ProjectService {
    pool: PgPool,
}

impl ProjectService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, scope: ProjectScope, query: ProjectQuery) -> Result<Vec<Project>> {
        let mut filters = Vec::new();
        let mut args: Vec<String> = Vec::new();

        match scope {
            ProjectScope::All => {}
            ProjectScope::Client(email) => {
                filters.push(format!("client_email = LOWER(${})", args.len() + 1));
                args.push(email);
            }
            ProjectScope::Vendor(email) => {
                filters.push(format!("vendor_email = LOWER(${})", args.len() + 1));
                args.push(email);
            }
        }
        if let Some(status) = query.status.filter(|s| !s.is_empty() && s != "all") {
            filters.push(format!("status = ${}", args.len() + 1));
            args.push(status);
        }
        if let Some(search) = query.search.filter(|s| !s.trim().is_empty()) {
            let n = args.len() + 1;
            filters.push(format!("(name ILIKE ${n} OR client_email ILIKE ${n})"));
            args.push(format!("%{}%", search.trim()));
        }

        let where_clause = if filters.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", filters.join(" AND "))
        };
        let sql = format!(
            "SELECT {} FROM projects {} ORDER BY created_at DESC",
            PROJECT_COLUMNS, where_clause
        );
        let mut statement = sqlx::query_as::<_, Project>(&sql);
        for value in &args {
            statement = statement.bind(value);
        }
        Ok(statement.fetch_all(&self.pool).await?)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Project> {
        let sql = format!("SELECT {} FROM projects WHERE id = $1", PROJECT_COLUMNS);
        sqlx::query_as::<_, Project>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Project not found".into()))
    }

    pub async fn create(&self, payload: CreateProjectPayload, client_email: &str) -> Result<Project> {
        let sql = format!(
            "INSERT INTO projects (name, description, client_email, vendor_email, status, budget, start_date, end_date)
             VALUES ($1, $2, LOWER($3), LOWER($4), COALESCE($5, 'planning'), $6, $7, $8)
             RETURNING {}",
            PROJECT_COLUMNS
        );
        let project = sqlx::query_as::<_, Project>(&sql)
            .bind(payload.name.trim())
            .bind(payload.description)
            .bind(client_email)
            .bind(payload.vendor_email)
            .bind(payload.status)
            .bind(payload.budget)
            .bind(payload.start_date)
            .bind(payload.end_date)
            .fetch_one(&self.pool)
            .await?;
        tracing::info!(project_id = %project.id, client = client_email, "project created");
        Ok(project)
    }

    pub async fn update(&self, id: Uuid, payload: UpdateProjectPayload) -> Result<Project> {
        let sql = format!(
            "UPDATE projects
             SET name = COALESCE($2, name),
                 description = COALESCE($3, description),
                 vendor_email = COALESCE(LOWER($4), vendor_email),
                 status = COALESCE($5, status),
                 budget = COALESCE($6, budget),
                 start_date = COALESCE($7, start_date),
                 end_date = COALESCE($8, end_date),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            PROJECT_COLUMNS
        );
        sqlx::query_as::<_, Project>(&sql)
            .bind(id)
            .bind(payload.name)
            .bind(payload.description)
            .bind(payload.vendor_email)
            .bind(payload.status)
            .bind(payload.budget)
            .bind(payload.start_date)
            .bind(payload.end_date)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Project not found".into()))
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let res = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(Error::NotFound("Project not found".into()));
        }
        Ok(())
    }
}
