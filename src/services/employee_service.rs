use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::hr_dto::{CreateEmployeePayload, EmployeeQuery, UpdateEmployeePayload};
use crate::error::{Error, Result};
use crate::models::employee::Employee;

const EMPLOYEE_COLUMNS: &str =
    "id, name, email, phone, department, position, salary, join_date, status, created_at, updated_at";

#[derive(Clone)]
pub struct EmployeeService {
    pool: PgPool,
}

impl EmployeeService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, payload: CreateEmployeePayload) -> Result<Employee> {
        let sql = format!(
            "INSERT INTO employees (name, email, phone, department, position, salary, join_date, status)
             VALUES ($1, LOWER($2), $3, $4, $5, $6, COALESCE($7, CURRENT_DATE), COALESCE($8, 'active'))
             RETURNING {}",
            EMPLOYEE_COLUMNS
        );
        let employee = sqlx::query_as::<_, Employee>(&sql)
            .bind(payload.name.trim())
            .bind(payload.email.trim())
            .bind(payload.phone)
            .bind(payload.department)
            .bind(payload.position)
            .bind(payload.salary)
            .bind(payload.join_date)
            .bind(payload.status)
            .fetch_one(&self.pool)
            .await
            .map_err(|err| match Error::from(err) {
                Error::Conflict(_) => Error::Conflict("An employee with this email already exists".into()),
                other => other,
            })?;
        tracing::info!(employee_id = %employee.id, "employee added");
        Ok(employee)
    }

    pub async fn list(&self, query: EmployeeQuery) -> Result<Vec<Employee>> {
        let mut filters = Vec::new();
        let mut args: Vec<String> = Vec::new();

        if let Some(department) = query.department.filter(|s| !s.is_empty() && s != "all") {
            filters.push(format!("department = ${}", args.len() + 1));
            args.push(department);
        }
        if let Some(status) = query.status.filter(|s| !s.is_empty() && s != "all") {
            filters.push(format!("status = ${}", args.len() + 1));
            args.push(status);
        }
        if let Some(search) = query.search.filter(|s| !s.trim().is_empty()) {
            let n = args.len() + 1;
            filters.push(format!("(name ILIKE ${n} OR email ILIKE ${n} OR position ILIKE ${n})"));
            args.push(format!("%{}%", search.trim()));
        }

        let where_clause = if filters.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", filters.join(" AND "))
        };
        let sql = format!(
            "SELECT {} FROM employees {} ORDER BY name ASC",
            EMPLOYEE_COLUMNS, where_clause
        );
        let mut statement = sqlx::query_as::<_, Employee>(&sql);
        for value in &args {
            statement = statement.bind(value);
        }
        Ok(statement.fetch_all(&self.pool).await?)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Employee>> {
        let sql = format!("SELECT {} FROM employees WHERE email = LOWER($1)", EMPLOYEE_COLUMNS);
        let employee = sqlx::query_as::<_, Employee>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(employee)
    }

    pub async fn update(&self, id: Uuid, payload: UpdateEmployeePayload) -> Result<Employee> {
        let sql = format!(
            "UPDATE employees
             SET name = COALESCE($2, name),
                 phone = COALESCE($3, phone),
                 department = COALESCE($4, department),
                 position = COALESCE($5, position),
                 salary = COALESCE($6, salary),
                 join_date = COALESCE($7, join_date),
                 status = COALESCE($8, status),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            EMPLOYEE_COLUMNS
        );
        sqlx::query_as::<_, Employee>(&sql)
            .bind(id)
            .bind(payload.name)
            .bind(payload.phone)
            .bind(payload.department)
            .bind(payload.position)
            .bind(payload.salary)
            .bind(payload.join_date)
            .bind(payload.status)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Employee not found".into()))
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let res = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(Error::NotFound("Employee not found".into()));
        }
        Ok(())
    }
}
