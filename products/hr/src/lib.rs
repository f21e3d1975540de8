//! HR vertical slice.
//!
//! Employee records live behind the [`EmployeeStore`] trait. Two engines are
//! provided: [`InMemoryEmployeeStore`] for tests and throwaway runs, and
//! [`DbEmployeeStore`] backed by sea-orm. [`EmployeeService`] layers creation
//! validation and the combined search on top of whichever store it is given.

mod db;
mod error;
mod memory;
mod model;
mod search;
mod seed;
mod service;
mod store;

pub use db::DbEmployeeStore;
pub use error::{HrError, HrResult, StoreError, StoreResult};
pub use memory::InMemoryEmployeeStore;
pub use model::{Employee, EmployeeDraft, NewEmployee};
pub use seed::{demo_employees, seed_demo};
pub use service::EmployeeService;
pub use store::EmployeeStore;
