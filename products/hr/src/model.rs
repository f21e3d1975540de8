use std::fmt;

use chrono::NaiveDate;
use entity::employees;
use serde::{Deserialize, Serialize};

/// A persisted employee record.
///
/// Equality and hashing cover every field, identifier included; search
/// results are de-duplicated on that basis.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Employee {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub hire_date: NaiveDate,
    pub address: String,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl fmt::Display for Employee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} (hired {}, {})",
            self.id,
            self.full_name(),
            self.hire_date,
            self.address
        )
    }
}

impl From<employees::Model> for Employee {
    fn from(model: employees::Model) -> Self {
        Self {
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            hire_date: model.hire_date,
            address: model.address,
        }
    }
}

/// A creation request as it arrives from a form or API call. Any field may be
/// missing; see [`NewEmployee::into_draft`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEmployee {
    pub id: Option<i32>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub hire_date: Option<NaiveDate>,
    pub address: Option<String>,
}

impl NewEmployee {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        hire_date: NaiveDate,
        address: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            first_name: Some(first_name.into()),
            last_name: Some(last_name.into()),
            hire_date: Some(hire_date),
            address: Some(address.into()),
        }
    }

    pub fn with_id(mut self, id: i32) -> Self {
        self.id = Some(id);
        self
    }

    /// Returns the storable form, or `None` when a business field is absent
    /// or blank.
    pub fn into_draft(self) -> Option<EmployeeDraft> {
        Some(EmployeeDraft {
            id: self.id,
            first_name: present(self.first_name)?,
            last_name: present(self.last_name)?,
            hire_date: self.hire_date?,
            address: present(self.address)?,
        })
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// A fully populated record that has not been saved yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmployeeDraft {
    pub id: Option<i32>,
    pub first_name: String,
    pub last_name: String,
    pub hire_date: NaiveDate,
    pub address: String,
}

impl EmployeeDraft {
    pub fn into_employee(self, id: i32) -> Employee {
        Employee {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            hire_date: self.hire_date,
            address: self.address,
        }
    }
}
