use std::collections::HashMap;
use std::future::Future;

use uuid::Uuid;

use super::{api::Deleted, ApiClient, ClientError, ClientResult};
use crate::{
    dto::{contact_dto::ContactForm, dashboard_dto::DashboardStats, vendor_dto::PopularToggle},
    filter::{ListFilter, Searchable},
    models::{
        application::Application, attendance::AttendanceRecord,
        client_connection::ClientConnection, employee::Employee, job::Job, leave::LeaveRequest,
        loan::LoanRequest, payment::Payment, pricing_plan::PricingPlan, project::Project,
    },
};

/// Records a list can splice by id.
pub trait Keyed {
    fn key(&self) -> Uuid;
}

macro_rules! keyed_by_id {
    ($($ty:ty),+ $(,)?) => {
        $(impl Keyed for $ty {
            fn key(&self) -> Uuid {
                self.id
            }
        })+
    };
}

keyed_by_id!(
    Application,
    AttendanceRecord,
    ClientConnection,
    Employee,
    Job,
    LeaveRequest,
    LoanRequest,
    Payment,
    PricingPlan,
    Project,
);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            message: message.into(),
        }
    }
}

fn describe(err: &ClientError) -> String {
    match err {
        ClientError::Validation(fields) => {
            let mut messages: Vec<&str> = fields.values().map(String::as_str).collect();
            messages.sort_unstable();
            messages.join("; ")
        }
        other => other.to_string(),
    }
}

/// State behind one table screen: the fetched rows, the filter bar and the
/// last notice shown to the user.
#[derive(Debug, Clone)]
pub struct ListView<T> {
    pub loading: bool,
    pub error: Option<String>,
    pub items: Vec<T>,
    pub filter: ListFilter,
    pub toast: Option<Toast>,
}

impl<T> Default for ListView<T> {
    fn default() -> Self {
        Self {
            loading: false,
            error: None,
            items: Vec::new(),
            filter: ListFilter::default(),
            toast: None,
        }
    }
}

impl<T: Keyed + Searchable> ListView<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_load(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// A failed fetch keeps the previous rows and shows the error panel;
    /// calling `load` again is the retry.
    pub fn finish_load(&mut self, result: ClientResult<Vec<T>>) {
        self.loading = false;
        match result {
            Ok(items) => self.items = items,
            Err(err) => {
                tracing::error!(error = %err, "list fetch failed");
                self.error = Some(describe(&err));
            }
        }
    }

    pub async fn load<F>(&mut self, fetch: F)
    where
        F: Future<Output = ClientResult<Vec<T>>>,
    {
        self.begin_load();
        self.finish_load(fetch.await);
    }

    pub fn is_empty_state(&self) -> bool {
        !self.loading && self.error.is_none() && self.items.is_empty()
    }

    pub fn visible(&self) -> Vec<&T> {
        self.filter.apply(&self.items)
    }

    pub fn remove(&mut self, id: Uuid) -> Option<T> {
        let index = self.items.iter().position(|item| item.key() == id)?;
        Some(self.items.remove(index))
    }

    /// Swaps in the updated record; returns false when it is not listed.
    pub fn replace(&mut self, item: T) -> bool {
        match self.items.iter_mut().find(|existing| existing.key() == item.key()) {
            Some(slot) => {
                *slot = item;
                true
            }
            None => false,
        }
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn notify(&mut self, toast: Toast) {
        self.toast = Some(toast);
    }

    pub fn dismiss_toast(&mut self) {
        self.toast = None;
    }

    /// Adds the created record on success; any failure, including a local
    /// validation rejection, becomes an error toast.
    pub async fn create_with<F>(&mut self, request: F, success: &str) -> bool
    where
        F: Future<Output = ClientResult<T>>,
    {
        match request.await {
            Ok(item) => {
                self.push(item);
                self.notify(Toast::success(success));
                true
            }
            Err(err) => {
                self.notify(Toast::error(describe(&err)));
                false
            }
        }
    }

    pub async fn update_with<F>(&mut self, request: F, success: &str) -> bool
    where
        F: Future<Output = ClientResult<T>>,
    {
        match request.await {
            Ok(item) => {
                self.replace(item);
                self.notify(Toast::success(success));
                true
            }
            Err(err) => {
                self.notify(Toast::error(describe(&err)));
                false
            }
        }
    }

    /// Drops the row only once the server confirmed the delete.
    pub async fn delete_with<F>(&mut self, id: Uuid, request: F, success: &str) -> bool
    where
        F: Future<Output = ClientResult<Deleted>>,
    {
        match request.await {
            Ok(deleted) => {
                self.remove(deleted.id);
                if deleted.id != id {
                    tracing::warn!(requested = %id, deleted = %deleted.id, "delete acknowledged another id");
                }
                self.notify(Toast::success(success));
                true
            }
            Err(err) => {
                self.notify(Toast::error(describe(&err)));
                false
            }
        }
    }
}

impl ListView<PricingPlan> {
    /// Applies the server's answer: the toggled plan takes the flag and, when
    /// switched on, every other plan loses it.
    pub fn apply_popular(&mut self, toggle: &PopularToggle) {
        for plan in &mut self.items {
            if plan.id == toggle.id {
                plan.popular = toggle.popular;
            } else if toggle.popular {
                plan.popular = false;
            }
        }
    }

    pub async fn toggle_popular(&mut self, api: &ApiClient, id: Uuid) -> bool {
        match api.toggle_popular(id).await {
            Ok(toggle) => {
                self.apply_popular(&toggle);
                let message = if toggle.popular {
                    "Marked as popular"
                } else {
                    "Removed popular badge"
                };
                self.notify(Toast::success(message));
                true
            }
            Err(err) => {
                self.notify(Toast::error(describe(&err)));
                false
            }
        }
    }

    pub fn popular_count(&self) -> usize {
        self.items.iter().filter(|p| p.popular).count()
    }
}

/// Admin landing page: headline counters and the latest postings.
#[derive(Debug, Clone, Default)]
pub struct DashboardView {
    pub loading: bool,
    pub error: Option<String>,
    pub stats: Option<DashboardStats>,
    pub recent_jobs: Option<Vec<Job>>,
}

impl DashboardView {
    pub async fn load(&mut self, api: &ApiClient) {
        self.loading = true;
        self.error = None;
        match api.dashboard().await {
            Ok(response) => {
                self.stats = response.stats;
                self.recent_jobs = response.recent_jobs;
            }
            Err(err) => {
                tracing::error!(error = %err, "dashboard fetch failed");
                self.error = Some(describe(&err));
            }
        }
        self.loading = false;
    }

    /// Counters to render; zeros while nothing has arrived.
    pub fn stat_cards(&self) -> DashboardStats {
        self.stats.clone().unwrap_or_default()
    }

    pub fn recent_job_titles(&self) -> Vec<&str> {
        self.recent_jobs
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|job| job.title.as_str())
            .collect()
    }
}

/// Marketing-site contact form.
#[derive(Debug, Clone, Default)]
pub struct ContactFormView {
    pub draft: ContactForm,
    pub errors: HashMap<String, String>,
    pub submitting: bool,
    pub acknowledgement: Option<String>,
}

impl ContactFormView {
    /// Field errors stay local; a valid submission clears the draft.
    pub async fn submit(&mut self, api: &ApiClient) -> bool {
        self.errors.clear();
        self.acknowledgement = None;
        self.submitting = true;
        let result = api.submit_contact(&self.draft).await;
        self.submitting = false;

        match result {
            Ok(receipt) => {
                self.draft = ContactForm::default();
                self.acknowledgement = Some(receipt.message);
                true
            }
            Err(ClientError::Validation(fields)) => {
                self.errors = fields;
                false
            }
            Err(err) => {
                self.errors.insert("form".to_string(), describe(&err));
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn plan(name: &str, popular: bool) -> PricingPlan {
        let now = Utc::now();
        PricingPlan {
            id: Uuid::new_v4(),
            vendor_email: "vendor@staff.io".into(),
            name: name.into(),
            description: None,
            category: "Recruitment".into(),
            price: Decimal::new(49900, 2),
            currency: "USD".into(),
            billing_cycle: "monthly".into(),
            features: vec![],
            limitations: vec![],
            is_active: true,
            popular,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn apply_popular_keeps_a_single_badge() {
        let mut view = ListView::new();
        view.items = vec![plan("Basic", true), plan("Pro", false), plan("Team", false)];
        let pro = view.items[1].id;

        view.apply_popular(&PopularToggle { id: pro, popular: true });
        assert_eq!(view.popular_count(), 1);
        assert!(view.items[1].popular);

        view.apply_popular(&PopularToggle { id: pro, popular: false });
        assert_eq!(view.popular_count(), 0);
    }

    #[test]
    fn remove_and_replace_touch_only_the_keyed_row() {
        let mut view = ListView::new();
        view.items = vec![plan("Basic", false), plan("Pro", false)];
        let basic = view.items[0].id;

        let mut renamed = view.items[1].clone();
        renamed.name = "Pro Plus".into();
        assert!(view.replace(renamed));
        assert_eq!(view.items[1].name, "Pro Plus");

        assert_eq!(view.remove(basic).map(|p| p.name), Some("Basic".to_string()));
        assert_eq!(view.items.len(), 1);
        assert!(view.remove(basic).is_none());
    }

    #[test]
    fn failed_load_keeps_rows_and_sets_error() {
        let mut view = ListView::new();
        view.items = vec![plan("Basic", false)];
        view.begin_load();
        view.finish_load(Err(ClientError::Api {
            status: 500,
            message: "Database error".into(),
        }));
        assert!(!view.loading);
        assert_eq!(view.error.as_deref(), Some("Database error"));
        assert_eq!(view.items.len(), 1);
        assert!(!view.is_empty_state());
    }

    #[test]
    fn visible_applies_the_filter() {
        let mut view = ListView::new();
        view.items = vec![plan("Basic", false), plan("Premium", false)];
        view.filter = ListFilter::new().search("prem");
        let names: Vec<_> = view.visible().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Premium"]);
    }

    #[test]
    fn empty_dashboard_renders_zeros() {
        let view = DashboardView::default();
        assert_eq!(view.stat_cards().total_jobs, 0);
        assert!(view.recent_job_titles().is_empty());
    }
}
