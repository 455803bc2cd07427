use chrono::{Duration, NaiveDate, NaiveTime};
use sqlx::PgPool;

use crate::dto::hr_dto::{
    AttendanceMark, AttendanceQuery, AttendanceStats, AttendanceSummary, DepartmentRate,
    MarkAttendancePayload,
};
use crate::error::{Error, Result};
use crate::models::attendance::{AttendanceRecord, AttendanceStatus, DailyAttendance};
use crate::utils::time::month_bounds;

const ATTENDANCE_COLUMNS: &str =
    "id, employee_email, employee_name, department, date, status, check_in, check_out, created_at, updated_at";

#[derive(Clone)]
pub struct AttendanceService {
    pool: PgPool,
}

impl AttendanceService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// One record per employee per day; marking again overwrites it.
    pub async fn mark(
        &self,
        payload: MarkAttendancePayload,
        mark: AttendanceMark,
    ) -> Result<AttendanceRecord> {
        let sql = format!(
            "INSERT INTO attendance_records (employee_email, employee_name, department, date, status, check_in, check_out)
             VALUES (LOWER($1), $2, $3, $4, $5, $6, $7)
             ON CONFLICT (employee_email, date) DO UPDATE
             SET employee_name = EXCLUDED.employee_name,
                 department = COALESCE(EXCLUDED.department, attendance_records.department),
                 status = EXCLUDED.status,
                 check_in = EXCLUDED.check_in,
                 check_out = EXCLUDED.check_out,
                 updated_at = NOW()
             RETURNING {}",
            ATTENDANCE_COLUMNS
        );
        let record = sqlx::query_as::<_, AttendanceRecord>(&sql)
            .bind(payload.employee_email.trim())
            .bind(payload.employee_name.trim())
            .bind(payload.department)
            .bind(payload.date)
            .bind(mark.status.as_str())
            .bind(mark.check_in)
            .bind(mark.check_out)
            .fetch_one(&self.pool)
            .await?;
        Ok(record)
    }

    pub async fn list(&self, query: AttendanceQuery) -> Result<Vec<AttendanceRecord>> {
        let mut filters = Vec::new();
        let mut text_args: Vec<String> = Vec::new();
        let mut date_args: Vec<NaiveDate> = Vec::new();
        let mut next = 1;

        if let Some(date) = query.date {
            filters.push(format!("date = ${}", next));
            date_args.push(date);
            next += 1;
        }
        if let Some(from) = query.from {
            filters.push(format!("date >= ${}", next));
            date_args.push(from);
            next += 1;
        }
        if let Some(to) = query.to {
            filters.push(format!("date <= ${}", next));
            date_args.push(to);
            next += 1;
        }
        if let Some(status) = query.status.filter(|s| !s.is_empty() && s != "all") {
            filters.push(format!("status = ${}", next));
            text_args.push(status);
            next += 1;
        }
        if let Some(department) = query.department.filter(|s| !s.is_empty() && s != "all") {
            filters.push(format!("department = ${}", next));
            text_args.push(department);
            next += 1;
        }
        if let Some(email) = query.employee_email.filter(|s| !s.trim().is_empty()) {
            filters.push(format!("employee_email = LOWER(${})", next));
            text_args.push(email.trim().to_string());
            next += 1;
        }
        if let Some(search) = query.search.filter(|s| !s.trim().is_empty()) {
            filters.push(format!("(employee_name ILIKE ${n} OR employee_email ILIKE ${n})", n = next));
            text_args.push(format!("%{}%", search.trim()));
        }

        let where_clause = if filters.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", filters.join(" AND "))
        };
        let sql = format!(
            "SELECT {} FROM attendance_records {} ORDER BY date DESC, employee_name ASC",
            ATTENDANCE_COLUMNS, where_clause
        );

        // Dates come first in placeholder order, then text filters.
        let mut statement = sqlx::query_as::<_, AttendanceRecord>(&sql);
        for date in &date_args {
            statement = statement.bind(*date);
        }
        for value in &text_args {
            statement = statement.bind(value);
        }
        Ok(statement.fetch_all(&self.pool).await?)
    }

    /// Per-day counts between `from` and `to` inclusive. Days without any
    /// record are filled with zeros so charts keep a continuous axis.
    pub async fn daily_counts(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<DailyAttendance>> {
        let rows = sqlx::query_as::<_, DailyAttendance>(
            r#"SELECT date,
                    COUNT(*) FILTER (WHERE status = 'present') AS present,
                    COUNT(*) FILTER (WHERE status = 'absent') AS absent,
                    COUNT(*) FILTER (WHERE status = 'leave') AS "leave"
             FROM attendance_records
             WHERE date BETWEEN $1 AND $2
             GROUP BY date
             ORDER BY date ASC"#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        Ok(fill_days(rows, from, to))
    }

    pub async fn department_rates(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<DepartmentRate>> {
        let rows = sqlx::query_as::<_, DepartmentRate>(
            "SELECT COALESCE(department, 'Unassigned') AS department,
                    COUNT(*) FILTER (WHERE status = 'present') AS present,
                    COUNT(*) AS total
             FROM attendance_records
             WHERE date BETWEEN $1 AND $2
             GROUP BY 1
             ORDER BY 1",
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Today's totals, the trailing `window_days` per-day series and the
    /// totals for the month containing `month`.
    pub async fn stats(&self, today: NaiveDate, window_days: i64, month: NaiveDate) -> Result<AttendanceStats> {
        let week_start = today - Duration::days(window_days - 1);
        let weekly = self.daily_counts(week_start, today).await?;
        let today_summary = AttendanceSummary::from_days(
            &weekly.iter().filter(|d| d.date == today).cloned().collect::<Vec<_>>(),
        );

        let (month_start, month_end) = month_bounds(month);
        let monthly_days = self.daily_counts(month_start, month_end).await?;
        let department_rates = self.department_rates(month_start, month_end).await?;

        Ok(AttendanceStats {
            today: today_summary,
            weekly,
            monthly: AttendanceSummary::from_days(&monthly_days),
            month: month_start.format("%Y-%m").to_string(),
            department_rates,
        })
    }

    pub async fn check_in(
        &self,
        email: &str,
        name: &str,
        department: Option<String>,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<AttendanceRecord> {
        let existing = self.find(email, date).await?;
        if existing.as_ref().and_then(|r| r.check_in).is_some() {
            return Err(Error::Conflict("Already checked in today".into()));
        }
        if existing.as_ref().map(|r| r.status == AttendanceStatus::Leave.as_str()).unwrap_or(false) {
            return Err(Error::BadRequest("You are on approved leave today".into()));
        }

        let sql = format!(
            "INSERT INTO attendance_records (employee_email, employee_name, department, date, status, check_in)
             VALUES (LOWER($1), $2, $3, $4, 'present', $5)
             ON CONFLICT (employee_email, date) DO UPDATE
             SET status = 'present', check_in = EXCLUDED.check_in, updated_at = NOW()
             RETURNING {}",
            ATTENDANCE_COLUMNS
        );
        let record = sqlx::query_as::<_, AttendanceRecord>(&sql)
            .bind(email)
            .bind(name)
            .bind(department)
            .bind(date)
            .bind(time)
            .fetch_one(&self.pool)
            .await?;
        tracing::info!(email, %date, "checked in");
        Ok(record)
    }

    pub async fn check_out(&self, email: &str, date: NaiveDate, time: NaiveTime) -> Result<AttendanceRecord> {
        let record = self
            .find(email, date)
            .await?
            .ok_or_else(|| Error::BadRequest("You have not checked in today".into()))?;
        let Some(check_in) = record.check_in else {
            return Err(Error::BadRequest("You have not checked in today".into()));
        };
        if record.check_out.is_some() {
            return Err(Error::Conflict("Already checked out today".into()));
        }
        if time <= check_in {
            return Err(Error::BadRequest("Check-out must be after check-in".into()));
        }

        let sql = format!(
            "UPDATE attendance_records SET check_out = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            ATTENDANCE_COLUMNS
        );
        let record = sqlx::query_as::<_, AttendanceRecord>(&sql)
            .bind(record.id)
            .bind(time)
            .fetch_one(&self.pool)
            .await?;
        tracing::info!(email, %date, "checked out");
        Ok(record)
    }

    async fn find(&self, email: &str, date: NaiveDate) -> Result<Option<AttendanceRecord>> {
        let sql = format!(
            "SELECT {} FROM attendance_records WHERE employee_email = LOWER($1) AND date = $2",
            ATTENDANCE_COLUMNS
        );
        let record = sqlx::query_as::<_, AttendanceRecord>(&sql)
            .bind(email)
            .bind(date)
            .fetch_optional(&self.pool)
            .await?;
        Ok(record)
    }
}

fn fill_days(rows: Vec<DailyAttendance>, from: NaiveDate, to: NaiveDate) -> Vec<DailyAttendance> {
    let mut out = Vec::new();
    let mut rows = rows.into_iter().peekable();
    let mut day = from;
    while day <= to {
        match rows.peek() {
            Some(row) if row.date == day => {
                if let Some(row) = rows.next() {
                    out.push(row);
                }
            }
            _ => out.push(DailyAttendance {
                date: day,
                present: 0,
                absent: 0,
                leave: 0,
            }),
        }
        day += Duration::days(1);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_days_pads_missing_dates() {
        let from = NaiveDate::from_ymd_opt(2026, 10, 12).unwrap();
        let to = NaiveDate::from_ymd_opt(2026, 10, 15).unwrap();
        let rows = vec![DailyAttendance {
            date: NaiveDate::from_ymd_opt(2026, 10, 14).unwrap(),
            present: 5,
            absent: 1,
            leave: 0,
        }];
        let days = fill_days(rows, from, to);
        assert_eq!(days.len(), 4);
        assert_eq!(days[0].date, from);
        assert_eq!(days[0].total(), 0);
        assert_eq!(days[2].present, 5);
        assert_eq!(days[3].date, to);
    }
}
