use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::{Employee, EmployeeDraft, EmployeeStore, StoreError, StoreResult};

/// Map-backed store. Records come back in identifier order.
#[derive(Debug, Default)]
pub struct InMemoryEmployeeStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    records: BTreeMap<i32, Employee>,
    last_id: i32,
}

impl InMemoryEmployeeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn filtered<F>(&self, keep: F) -> Vec<Employee>
    where
        F: Fn(&Employee) -> bool,
    {
        self.inner
            .read()
            .await
            .records
            .values()
            .filter(|&employee| keep(employee))
            .cloned()
            .collect()
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn eq_ignore_case(left: &str, right: &str) -> bool {
    left.to_lowercase() == right.to_lowercase()
}

#[async_trait]
impl EmployeeStore for InMemoryEmployeeStore {
    async fn save(&self, draft: EmployeeDraft) -> StoreResult<Employee> {
        let mut inner = self.inner.write().await;
        let id = match draft.id {
            Some(id) if inner.records.contains_key(&id) => {
                return Err(StoreError::DuplicateId(id));
            }
            Some(id) => id,
            None => inner.last_id + 1,
        };
        inner.last_id = inner.last_id.max(id);
        let employee = draft.into_employee(id);
        inner.records.insert(id, employee.clone());
        debug!(id, "employee stored in memory");
        Ok(employee)
    }

    async fn exists_by_id(&self, id: i32) -> StoreResult<bool> {
        Ok(self.inner.read().await.records.contains_key(&id))
    }

    async fn find_by_id(&self, id: i32) -> StoreResult<Option<Employee>> {
        Ok(self.inner.read().await.records.get(&id).cloned())
    }

    async fn find_all(&self) -> StoreResult<Vec<Employee>> {
        Ok(self.filtered(|_| true).await)
    }

    async fn find_by_address_containing(&self, fragment: &str) -> StoreResult<Vec<Employee>> {
        Ok(self
            .filtered(|e| contains_ignore_case(&e.address, fragment))
            .await)
    }

    async fn find_by_first_name_containing(&self, fragment: &str) -> StoreResult<Vec<Employee>> {
        Ok(self
            .filtered(|e| contains_ignore_case(&e.first_name, fragment))
            .await)
    }

    async fn find_by_last_name_containing(&self, fragment: &str) -> StoreResult<Vec<Employee>> {
        Ok(self
            .filtered(|e| contains_ignore_case(&e.last_name, fragment))
            .await)
    }

    async fn find_by_first_and_last_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> StoreResult<Vec<Employee>> {
        Ok(self
            .filtered(|e| {
                eq_ignore_case(&e.first_name, first_name) && eq_ignore_case(&e.last_name, last_name)
            })
            .await)
    }

    async fn find_by_name_containing(&self, fragment: &str) -> StoreResult<Vec<Employee>> {
        Ok(self
            .filtered(|e| {
                contains_ignore_case(&e.first_name, fragment)
                    || contains_ignore_case(&e.last_name, fragment)
            })
            .await)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::NewEmployee;

    fn draft(first: &str, last: &str, address: &str) -> EmployeeDraft {
        NewEmployee::new(
            first,
            last,
            NaiveDate::from_ymd_opt(2019, 6, 17).unwrap(),
            address,
        )
        .into_draft()
        .unwrap()
    }

    #[tokio::test]
    async fn assigns_sequential_ids_after_explicit_ones() {
        let store = InMemoryEmployeeStore::new();
        let first = store.save(draft("Daliah", "Wehbe", "22 A Street")).await.unwrap();
        assert_eq!(first.id, 1);

        let mut pinned = draft("Anya", "Wehbe", "23 B Street");
        pinned.id = Some(10);
        assert_eq!(store.save(pinned).await.unwrap().id, 10);

        let next = store.save(draft("Robert", "Daniel", "26 E Street")).await.unwrap();
        assert_eq!(next.id, 11);
        assert_eq!(store.len().await, 3);
    }

    #[tokio::test]
    async fn rejects_duplicate_explicit_id() {
        let store = InMemoryEmployeeStore::new();
        store.save(draft("Daliah", "Wehbe", "22 A Street")).await.unwrap();
        let mut dup = draft("Anya", "Wehbe", "23 B Street");
        dup.id = Some(1);
        let err = store.save(dup).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId(1)));
    }

    #[tokio::test]
    async fn substring_queries_ignore_case() {
        let store = InMemoryEmployeeStore::new();
        store.save(draft("Daliah", "Wehbe", "22 A Street London England")).await.unwrap();
        store.save(draft("Anastasia", "Alexandrovna", "24 C Street Moscow Russia")).await.unwrap();

        let by_address = store.find_by_address_containing("LONDON").await.unwrap();
        assert_eq!(by_address.len(), 1);
        assert_eq!(by_address[0].first_name, "Daliah");

        assert_eq!(store.find_by_first_name_containing("ana").await.unwrap().len(), 1);
        assert_eq!(store.find_by_last_name_containing("WEH").await.unwrap().len(), 1);
        assert_eq!(store.find_by_name_containing("alex").await.unwrap().len(), 1);
        assert_eq!(store.find_by_name_containing("").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn exact_name_match_requires_whole_names() {
        let store = InMemoryEmployeeStore::new();
        store.save(draft("Daliah", "Wehbe", "22 A Street")).await.unwrap();

        assert_eq!(
            store
                .find_by_first_and_last_name("daliah", "WEHBE")
                .await
                .unwrap()
                .len(),
            1
        );
        assert!(
            store
                .find_by_first_and_last_name("Dali", "Wehbe")
                .await
                .unwrap()
                .is_empty()
        );
    }
}
