mod employees;

use async_graphql::{Context, EmptySubscription, ErrorExtensions, Object, Schema, SimpleObject};
use platform_api::{ApiError, internal_error};
use products_hr::{EmployeeService, HrError};
use serde::Serialize;
use tracing::instrument;

use employees::{EmployeeNode, NewEmployeeInput};

pub type SchemaType = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema(service: EmployeeService) -> SchemaType {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(service)
        .finish()
}

fn service<'a>(ctx: &Context<'a>) -> async_graphql::Result<&'a EmployeeService> {
    ctx.data::<EmployeeService>()
        .map_err(|_| internal_error(anyhow::anyhow!("employee service missing from schema data")))
}

fn hr_error(err: HrError) -> async_graphql::Error {
    match err {
        HrError::MalformedFullName(_) => ApiError::invalid_input(err.to_string()).extend(),
        HrError::Store(_) => internal_error(err),
    }
}

#[derive(Default)]
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    #[instrument(name = "graphql.health", skip_all)]
    async fn health(&self) -> async_graphql::Result<HealthPayload> {
        Ok(HealthPayload { ok: true })
    }

    #[instrument(name = "graphql.version", skip_all)]
    async fn version(&self) -> async_graphql::Result<String> {
        Ok(env!("CARGO_PKG_VERSION").to_string())
    }

    #[instrument(name = "graphql.employee", skip(self, ctx))]
    async fn employee(&self, ctx: &Context<'_>, id: i32) -> async_graphql::Result<Option<EmployeeNode>> {
        let found = service(ctx)?.get_employee(id).await.map_err(hr_error)?;
        Ok(found.map(EmployeeNode::from))
    }

    #[instrument(name = "graphql.employees", skip_all)]
    async fn employees(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<EmployeeNode>> {
        let rows = service(ctx)?.list_all().await.map_err(hr_error)?;
        Ok(employees::nodes(rows))
    }

    #[graphql(name = "employeesByAddress")]
    #[instrument(name = "graphql.employees_by_address", skip(self, ctx))]
    async fn employees_by_address(
        &self,
        ctx: &Context<'_>,
        address: String,
    ) -> async_graphql::Result<Vec<EmployeeNode>> {
        let rows = service(ctx)?
            .list_by_address(&address)
            .await
            .map_err(hr_error)?;
        Ok(employees::nodes(rows))
    }

    #[graphql(name = "employeesByFirstName")]
    #[instrument(name = "graphql.employees_by_first_name", skip(self, ctx))]
    async fn employees_by_first_name(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "firstName")] first_name: String,
    ) -> async_graphql::Result<Vec<EmployeeNode>> {
        let rows = service(ctx)?
            .find_by_first_name(&first_name)
            .await
            .map_err(hr_error)?;
        Ok(employees::nodes(rows))
    }

    #[graphql(name = "employeesByLastName")]
    #[instrument(name = "graphql.employees_by_last_name", skip(self, ctx))]
    async fn employees_by_last_name(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "lastName")] last_name: String,
    ) -> async_graphql::Result<Vec<EmployeeNode>> {
        let rows = service(ctx)?
            .find_by_last_name(&last_name)
            .await
            .map_err(hr_error)?;
        Ok(employees::nodes(rows))
    }

    #[graphql(name = "employeesByFullName")]
    #[instrument(name = "graphql.employees_by_full_name", skip(self, ctx))]
    async fn employees_by_full_name(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "fullName")] full_name: String,
    ) -> async_graphql::Result<Vec<EmployeeNode>> {
        let rows = service(ctx)?
            .find_by_full_name(&full_name)
            .await
            .map_err(hr_error)?;
        Ok(employees::nodes(rows))
    }

    /// Combined first/last name search. Result order is unspecified.
    #[graphql(name = "searchEmployees")]
    #[instrument(name = "graphql.search_employees", skip(self, ctx))]
    async fn search_employees(
        &self,
        ctx: &Context<'_>,
        q: String,
    ) -> async_graphql::Result<Vec<EmployeeNode>> {
        let rows = service(ctx)?.search_employees(&q).await.map_err(hr_error)?;
        Ok(employees::nodes(rows))
    }
}

#[derive(Default)]
pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Returns null when a required field is missing or the id is taken.
    #[graphql(name = "createEmployee")]
    #[instrument(name = "graphql.create_employee", skip_all)]
    async fn create_employee(
        &self,
        ctx: &Context<'_>,
        input: NewEmployeeInput,
    ) -> async_graphql::Result<Option<EmployeeNode>> {
        let created = service(ctx)?
            .create_employee(input.into())
            .await
            .map_err(hr_error)?;
        Ok(created.map(EmployeeNode::from))
    }
}

#[derive(Clone, Debug, SimpleObject, Serialize)]
pub struct HealthPayload {
    pub ok: bool,
}
