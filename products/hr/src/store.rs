use async_trait::async_trait;

use crate::{Employee, EmployeeDraft, StoreResult};

/// Persistence contract for employee records.
///
/// Every `*_containing` query is a case-insensitive substring match where the
/// fragment is taken literally; an empty fragment matches every record.
/// Result order is whatever the engine returns.
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    /// Persist a draft, assigning an identifier when the draft has none.
    async fn save(&self, draft: EmployeeDraft) -> StoreResult<Employee>;

    async fn exists_by_id(&self, id: i32) -> StoreResult<bool>;

    async fn find_by_id(&self, id: i32) -> StoreResult<Option<Employee>>;

    async fn find_all(&self) -> StoreResult<Vec<Employee>>;

    async fn find_by_address_containing(&self, fragment: &str) -> StoreResult<Vec<Employee>>;

    async fn find_by_first_name_containing(&self, fragment: &str) -> StoreResult<Vec<Employee>>;

    async fn find_by_last_name_containing(&self, fragment: &str) -> StoreResult<Vec<Employee>>;

    /// Exact match on both names, ignoring case.
    async fn find_by_first_and_last_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> StoreResult<Vec<Employee>>;

    /// Records whose first name or last name contains the fragment.
    async fn find_by_name_containing(&self, fragment: &str) -> StoreResult<Vec<Employee>>;
}
