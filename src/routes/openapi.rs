use axum::{response::IntoResponse, Json};
use utoipa::OpenApi;

use super::jobs;

#[derive(OpenApi)]
#[openapi(
    info(title = "Staffing API"),
    paths(
        jobs::list_jobs,
        jobs::get_job,
        jobs::create_job,
        jobs::update_job,
        jobs::delete_job,
        jobs::posted_jobs
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_job_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/jobs"));
        assert!(doc.paths.paths.contains_key("/api/jobs/{id}"));
        assert!(doc.paths.paths.contains_key("/api/postedJobs"));
    }
}
