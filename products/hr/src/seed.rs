use chrono::NaiveDate;
use tracing::info;

use crate::{EmployeeService, HrResult, NewEmployee};

const DEMO_HIRE_DATE: (i32, u32, u32) = (2019, 6, 17);

const DEMO_ROWS: [(&str, &str, &str); 5] = [
    ("Daliah", "Wehbe", "22 A Street London England"),
    ("Anya", "Wehbe", "23 B Street Manchester England"),
    ("Anastasia", "Alexandrovna", "24 C Street Moscow Russia"),
    ("Madalina", "Acasandrei", "25 D Street Brasov Romania"),
    ("Robert", "Daniel", "26 E Street Cluj-Napoca Romania"),
];

/// The fixture employees loaded by `seed`.
pub fn demo_employees() -> Vec<NewEmployee> {
    let (year, month, day) = DEMO_HIRE_DATE;
    let hire_date = NaiveDate::from_ymd_opt(year, month, day);
    DEMO_ROWS
        .iter()
        .map(|(first, last, address)| NewEmployee {
            id: None,
            first_name: Some((*first).to_string()),
            last_name: Some((*last).to_string()),
            hire_date,
            address: Some((*address).to_string()),
        })
        .collect()
}

/// Loads [`demo_employees`] unless the store already holds records.
/// Returns how many records were created.
pub async fn seed_demo(service: &EmployeeService) -> HrResult<usize> {
    if !service.list_all().await?.is_empty() {
        info!("store already populated; skipping demo seed");
        return Ok(0);
    }
    let mut created = 0;
    for candidate in demo_employees() {
        if service.create_employee(candidate).await?.is_some() {
            created += 1;
        }
    }
    info!(created, "demo employees seeded");
    Ok(created)
}
