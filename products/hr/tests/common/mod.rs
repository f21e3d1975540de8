#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use products_hr::{Employee, EmployeeDraft, EmployeeStore, StoreResult};

/// One recorded store call, with the arguments it received.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Call {
    Save(Option<i32>),
    ExistsById(i32),
    FindById(i32),
    FindAll,
    ByAddress(String),
    ByFirstName(String),
    ByLastName(String),
    ByFullName(String, String),
    ByName(String),
}

/// Store double that answers from canned responses and records every call.
#[derive(Default)]
pub struct ScriptedStore {
    existing_ids: Mutex<HashSet<i32>>,
    responses: Mutex<HashMap<Call, Vec<Employee>>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedStore {
    pub fn respond(&self, call: Call, rows: Vec<Employee>) {
        self.responses.lock().unwrap().insert(call, rows);
    }

    pub fn mark_existing(&self, id: i32) {
        self.existing_ids.lock().unwrap().insert(id);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn answer(&self, call: Call) -> Vec<Employee> {
        self.calls.lock().unwrap().push(call.clone());
        self.responses
            .lock()
            .unwrap()
            .get(&call)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl EmployeeStore for ScriptedStore {
    async fn save(&self, draft: EmployeeDraft) -> StoreResult<Employee> {
        self.calls.lock().unwrap().push(Call::Save(draft.id));
        let id = draft.id.unwrap_or(1);
        Ok(draft.into_employee(id))
    }

    async fn exists_by_id(&self, id: i32) -> StoreResult<bool> {
        self.calls.lock().unwrap().push(Call::ExistsById(id));
        Ok(self.existing_ids.lock().unwrap().contains(&id))
    }

    async fn find_by_id(&self, id: i32) -> StoreResult<Option<Employee>> {
        Ok(self.answer(Call::FindById(id)).into_iter().next())
    }

    async fn find_all(&self) -> StoreResult<Vec<Employee>> {
        Ok(self.answer(Call::FindAll))
    }

    async fn find_by_address_containing(&self, fragment: &str) -> StoreResult<Vec<Employee>> {
        Ok(self.answer(Call::ByAddress(fragment.into())))
    }

    async fn find_by_first_name_containing(&self, fragment: &str) -> StoreResult<Vec<Employee>> {
        Ok(self.answer(Call::ByFirstName(fragment.into())))
    }

    async fn find_by_last_name_containing(&self, fragment: &str) -> StoreResult<Vec<Employee>> {
        Ok(self.answer(Call::ByLastName(fragment.into())))
    }

    async fn find_by_first_and_last_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> StoreResult<Vec<Employee>> {
        Ok(self.answer(Call::ByFullName(first_name.into(), last_name.into())))
    }

    async fn find_by_name_containing(&self, fragment: &str) -> StoreResult<Vec<Employee>> {
        Ok(self.answer(Call::ByName(fragment.into())))
    }
}

pub fn employee(id: i32, first: &str, last: &str, address: &str) -> Employee {
    Employee {
        id,
        first_name: first.into(),
        last_name: last.into(),
        hire_date: NaiveDate::from_ymd_opt(2022, 1, 15).unwrap(),
        address: address.into(),
    }
}

pub fn sorted(mut rows: Vec<Employee>) -> Vec<Employee> {
    rows.sort_by_key(|e| e.id);
    rows
}
