use async_graphql::{InputObject, SimpleObject};
use chrono::NaiveDate;
use products_hr::{Employee, NewEmployee};

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "Employee")]
pub struct EmployeeNode {
    pub id: i32,
    #[graphql(name = "firstName")]
    pub first_name: String,
    #[graphql(name = "lastName")]
    pub last_name: String,
    #[graphql(name = "fullName")]
    pub full_name: String,
    #[graphql(name = "hireDate")]
    pub hire_date: NaiveDate,
    pub address: String,
}

impl From<Employee> for EmployeeNode {
    fn from(model: Employee) -> Self {
        Self {
            full_name: model.full_name(),
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            hire_date: model.hire_date,
            address: model.address,
        }
    }
}

/// Every field is optional so that incomplete submissions reach the
/// service's validation instead of failing at the schema layer.
#[derive(InputObject, Clone, Debug, Default)]
pub struct NewEmployeeInput {
    pub id: Option<i32>,
    #[graphql(name = "firstName")]
    pub first_name: Option<String>,
    #[graphql(name = "lastName")]
    pub last_name: Option<String>,
    #[graphql(name = "hireDate")]
    pub hire_date: Option<NaiveDate>,
    pub address: Option<String>,
}

impl From<NewEmployeeInput> for NewEmployee {
    fn from(input: NewEmployeeInput) -> Self {
        Self {
            id: input.id,
            first_name: input.first_name,
            last_name: input.last_name,
            hire_date: input.hire_date,
            address: input.address,
        }
    }
}

pub fn nodes(rows: Vec<Employee>) -> Vec<EmployeeNode> {
    rows.into_iter().map(EmployeeNode::from).collect()
}
