use async_trait::async_trait;
use entity::employees;
use sea_orm::sea_query::{BinOper, Expr, Func, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, Condition, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Select, Set,
};
use tracing::debug;

use crate::{Employee, EmployeeDraft, EmployeeStore, StoreResult};

const LIKE_ESCAPE: char = '\\';

/// Store backed by the `employees` table.
#[derive(Clone, Debug)]
pub struct DbEmployeeStore {
    db: DatabaseConnection,
}

impl DbEmployeeStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn fetch(&self, query: Select<employees::Entity>) -> StoreResult<Vec<Employee>> {
        let rows = query
            .order_by_asc(employees::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Employee::from).collect())
    }
}

fn lowered(column: employees::Column) -> Expr {
    Expr::expr(Func::lower(Expr::col(column)))
}

/// User input folded by the database, so both sides of a comparison go
/// through the same `LOWER`.
fn lowered_value(value: impl Into<String>) -> SimpleExpr {
    Func::lower(Expr::val(value.into())).into()
}

/// `%fragment%` with LIKE wildcards in the fragment escaped.
fn contains_pattern(fragment: &str) -> String {
    let mut pattern = String::with_capacity(fragment.len() + 2);
    pattern.push('%');
    for ch in fragment.chars() {
        if matches!(ch, '%' | '_') || ch == LIKE_ESCAPE {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// `LOWER(column) LIKE LOWER(pattern) ESCAPE '\'`
fn contains(column: employees::Column, fragment: &str) -> SimpleExpr {
    let pattern = SimpleExpr::Binary(
        Box::new(lowered_value(contains_pattern(fragment))),
        BinOper::Escape,
        Box::new(SimpleExpr::Constant(LIKE_ESCAPE.into())),
    );
    lowered(column).binary(BinOper::Like, pattern)
}

#[async_trait]
impl EmployeeStore for DbEmployeeStore {
    async fn save(&self, draft: EmployeeDraft) -> StoreResult<Employee> {
        let model = employees::ActiveModel {
            id: draft.id.map_or(NotSet, Set),
            first_name: Set(draft.first_name),
            last_name: Set(draft.last_name),
            hire_date: Set(draft.hire_date),
            address: Set(draft.address),
        };
        let saved = model.insert(&self.db).await?;
        debug!(id = saved.id, "employee row inserted");
        Ok(saved.into())
    }

    async fn exists_by_id(&self, id: i32) -> StoreResult<bool> {
        let count = employees::Entity::find_by_id(id).count(&self.db).await?;
        Ok(count > 0)
    }

    async fn find_by_id(&self, id: i32) -> StoreResult<Option<Employee>> {
        let row = employees::Entity::find_by_id(id).one(&self.db).await?;
        Ok(row.map(Employee::from))
    }

    async fn find_all(&self) -> StoreResult<Vec<Employee>> {
        self.fetch(employees::Entity::find()).await
    }

    async fn find_by_address_containing(&self, fragment: &str) -> StoreResult<Vec<Employee>> {
        self.fetch(employees::Entity::find().filter(contains(employees::Column::Address, fragment)))
            .await
    }

    async fn find_by_first_name_containing(&self, fragment: &str) -> StoreResult<Vec<Employee>> {
        self.fetch(
            employees::Entity::find().filter(contains(employees::Column::FirstName, fragment)),
        )
        .await
    }

    async fn find_by_last_name_containing(&self, fragment: &str) -> StoreResult<Vec<Employee>> {
        self.fetch(employees::Entity::find().filter(contains(employees::Column::LastName, fragment)))
            .await
    }

    async fn find_by_first_and_last_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> StoreResult<Vec<Employee>> {
        let condition = Condition::all()
            .add(lowered(employees::Column::FirstName).eq(lowered_value(first_name)))
            .add(lowered(employees::Column::LastName).eq(lowered_value(last_name)));
        self.fetch(employees::Entity::find().filter(condition)).await
    }

    async fn find_by_name_containing(&self, fragment: &str) -> StoreResult<Vec<Employee>> {
        let condition = Condition::any()
            .add(contains(employees::Column::FirstName, fragment))
            .add(contains(employees::Column::LastName, fragment));
        self.fetch(employees::Entity::find().filter(condition)).await
    }
}
