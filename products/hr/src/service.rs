use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::search::{dedupe, split_full_name, split_terms};
use crate::{Employee, EmployeeStore, HrError, HrResult, NewEmployee};

/// Creation and search operations over an [`EmployeeStore`].
#[derive(Clone)]
pub struct EmployeeService {
    store: Arc<dyn EmployeeStore>,
}

impl EmployeeService {
    pub fn new(store: Arc<dyn EmployeeStore>) -> Self {
        Self { store }
    }

    /// Validates and saves a candidate record.
    ///
    /// Returns `Ok(None)` when a business field is missing or blank, or when
    /// the candidate carries an identifier the store already holds. The store
    /// is only written after both checks pass. The identifier check and the
    /// save are separate store calls, so two concurrent creators with the
    /// same identifier can still collide inside the store.
    #[instrument(name = "hr.employees.create", skip_all, fields(id = ?candidate.id))]
    pub async fn create_employee(&self, candidate: NewEmployee) -> HrResult<Option<Employee>> {
        let Some(draft) = candidate.into_draft() else {
            info!("rejecting employee: not all fields filled in");
            return Ok(None);
        };
        if let Some(id) = draft.id {
            if self.store.exists_by_id(id).await? {
                info!(id, "rejecting employee: id already exists");
                return Ok(None);
            }
        }
        let saved = self.store.save(draft).await?;
        info!(id = saved.id, "employee created");
        Ok(Some(saved))
    }

    #[instrument(name = "hr.employees.get", skip(self))]
    pub async fn get_employee(&self, id: i32) -> HrResult<Option<Employee>> {
        Ok(self.store.find_by_id(id).await?)
    }

    #[instrument(name = "hr.employees.list", skip_all)]
    pub async fn list_all(&self) -> HrResult<Vec<Employee>> {
        Ok(self.store.find_all().await?)
    }

    #[instrument(name = "hr.employees.by_address", skip(self))]
    pub async fn list_by_address(&self, address: &str) -> HrResult<Vec<Employee>> {
        Ok(self.store.find_by_address_containing(address).await?)
    }

    #[instrument(name = "hr.employees.by_first_name", skip(self))]
    pub async fn find_by_first_name(&self, first_name: &str) -> HrResult<Vec<Employee>> {
        Ok(self.store.find_by_first_name_containing(first_name).await?)
    }

    #[instrument(name = "hr.employees.by_last_name", skip(self))]
    pub async fn find_by_last_name(&self, last_name: &str) -> HrResult<Vec<Employee>> {
        Ok(self.store.find_by_last_name_containing(last_name).await?)
    }

    /// Exact first + last name lookup from a single `"First Last"` string.
    ///
    /// Input without a second name is rejected with
    /// [`HrError::MalformedFullName`].
    #[instrument(name = "hr.employees.by_full_name", skip(self))]
    pub async fn find_by_full_name(&self, full_name: &str) -> HrResult<Vec<Employee>> {
        let (first_name, last_name) = split_full_name(full_name)
            .ok_or_else(|| HrError::MalformedFullName(full_name.to_string()))?;
        Ok(self
            .store
            .find_by_first_and_last_name(first_name, last_name)
            .await?)
    }

    /// Free-text search across first and last names.
    ///
    /// Empty input lists everything. Otherwise the result is the union of
    /// records whose first or last name contains the whole input and, when
    /// the input has at least two space-separated tokens, records whose first
    /// name contains the first token or whose last name contains the second.
    /// Duplicates are removed; callers must not rely on the order.
    #[instrument(name = "hr.employees.search", skip(self))]
    pub async fn search_employees(&self, input: &str) -> HrResult<Vec<Employee>> {
        if input.is_empty() {
            return Ok(dedupe(self.store.find_all().await?));
        }

        let mut found = self.store.find_by_name_containing(input).await?;
        if let [first, second, ..] = split_terms(input).as_slice() {
            found.extend(self.store.find_by_first_name_containing(first).await?);
            found.extend(self.store.find_by_last_name_containing(second).await?);
        }
        let merged = dedupe(found);
        debug!(hits = merged.len(), "search complete");
        Ok(merged)
    }
}
