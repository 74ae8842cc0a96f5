use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use super::domain::{
    generate_reference_number, Admin, Application, NewAdmin, NewApplication, StatusSummary,
    StatusUpdate,
};
use super::repository::{ClearanceStore, StoreError};

/// In-memory store backing the test suites and lightweight embeddings.
///
/// Mutations lock the whole state map, so each operation is atomic; the
/// relational backend gets the same guarantee from its single-row
/// transactions.
pub struct MemoryStore {
    reference_year: i32,
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    applications: HashMap<String, Application>,
    admins: HashMap<String, Admin>,
}

impl MemoryStore {
    /// `reference_year` feeds the generated reference numbers.
    pub fn new(reference_year: i32) -> Self {
        Self {
            reference_year,
            state: Mutex::new(State::default()),
        }
    }

    #[cfg(test)]
    pub(crate) fn admin_count(&self) -> usize {
        self.state.lock().expect("store mutex poisoned").admins.len()
    }
}

#[async_trait]
impl ClearanceStore for MemoryStore {
    async fn create_application(
        &self,
        input: NewApplication,
    ) -> Result<Application, StoreError> {
        let reference = generate_reference_number(self.reference_year);
        let application = Application::submitted(input, reference, Utc::now());
        let mut state = self.state.lock().expect("store mutex poisoned");
        state
            .applications
            .insert(application.id.clone(), application.clone());
        Ok(application)
    }

    async fn fetch_application(&self, id: &str) -> Result<Option<Application>, StoreError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state.applications.get(id).cloned())
    }

    async fn fetch_by_reference(
        &self,
        reference: &str,
    ) -> Result<Option<Application>, StoreError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state
            .applications
            .values()
            .find(|application| application.reference_number == reference)
            .cloned())
    }

    async fn list_applications(&self) -> Result<Vec<Application>, StoreError> {
        let state = self.state.lock().expect("store mutex poisoned");
        let mut applications: Vec<Application> = state.applications.values().cloned().collect();
        applications.sort_by(|a, b| b.submitted_date.cmp(&a.submitted_date));
        Ok(applications)
    }

    async fn update_status(
        &self,
        id: &str,
        update: StatusUpdate,
    ) -> Result<Option<Application>, StoreError> {
        let mut state = self.state.lock().expect("store mutex poisoned");
        let Some(application) = state.applications.get_mut(id) else {
            return Ok(None);
        };
        application.apply_status_update(update, Utc::now());
        Ok(Some(application.clone()))
    }

    async fn attach_documents(
        &self,
        id: &str,
        documents: Vec<String>,
    ) -> Result<Option<Application>, StoreError> {
        let mut state = self.state.lock().expect("store mutex poisoned");
        let Some(application) = state.applications.get_mut(id) else {
            return Ok(None);
        };
        application.attach_documents(&documents, Utc::now());
        Ok(Some(application.clone()))
    }

    async fn fetch_admin(&self, id: &str) -> Result<Option<Admin>, StoreError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state.admins.get(id).cloned())
    }

    async fn fetch_admin_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Admin>, StoreError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state
            .admins
            .values()
            .find(|admin| admin.username == username)
            .cloned())
    }

    async fn create_admin(&self, input: NewAdmin) -> Result<Admin, StoreError> {
        let admin = Admin::created(input, Utc::now());
        let mut state = self.state.lock().expect("store mutex poisoned");
        state.admins.insert(admin.id.clone(), admin.clone());
        Ok(admin)
    }

    async fn status_summary(&self) -> Result<StatusSummary, StoreError> {
        let state = self.state.lock().expect("store mutex poisoned");
        let mut summary = StatusSummary::default();
        for application in state.applications.values() {
            summary.record(application.status);
        }
        Ok(summary)
    }
}
