use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use anyhow::Context;
use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    Form, Json, Router,
    extract::{Query, State},
    http::{self, HeaderName, HeaderValue, Method, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use chrono::NaiveDate;
use platform_db::DbPool;
use products_hr::{Employee, EmployeeService, HrError, NewEmployee};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{error, info};

use crate::{config::AppConfig, graphql::SchemaType, pages};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub service: EmployeeService,
    pub schema: SchemaType,
    pub config: Arc<AppConfig>,
}

#[derive(Clone, Debug)]
pub struct ServeConfig {
    addr: SocketAddr,
}

impl ServeConfig {
    pub fn new(host: IpAddr, port: u16) -> Self {
        Self {
            addr: SocketAddr::from((host, port)),
        }
    }
}

pub async fn serve(config: ServeConfig, state: AppState) -> anyhow::Result<()> {
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;

    info!(%config.addr, "employee server listening");
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;
    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();
    let allow_origin = if allowed.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(allowed)
    };
    CorsLayer::new()
        .allow_headers([http::header::CONTENT_TYPE])
        .allow_methods([Method::POST, Method::GET])
        .allow_origin(allow_origin)
}

pub fn build_router(state: AppState) -> Router {
    let request_id = MakeRequestUuid;
    let header_name = HeaderName::from_static("x-request-id");
    Router::new()
        .route("/", get(|| async { Redirect::to("/show-employees") }))
        .route("/health", get(health_handler))
        .route("/create-employee", get(create_employee_page))
        .route("/submit-new-employee", post(submit_new_employee))
        .route("/show-employees", get(show_employees))
        .route("/search-by-address", post(search_by_address))
        .route("/search-by-name", post(search_by_first_name))
        .route("/search-by-last-name", post(search_by_last_name))
        .route("/search-by-full-name", post(search_by_full_name))
        .route("/search-employees", post(search_employees))
        .route("/graphql", get(graphiql).post(graphql_handler))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(header_name.clone(), request_id))
                .layer(PropagateRequestIdLayer::new(header_name))
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&state.config.cors_allowed_origins)),
        )
        .with_state(state)
}

/// Raw values of the creation form. Also used to re-populate the form after
/// a rejected submission.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeForm {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub hire_date: Option<String>,
    pub address: Option<String>,
}

impl EmployeeForm {
    /// An unparseable hire date counts as missing.
    fn to_candidate(&self) -> NewEmployee {
        NewEmployee {
            id: None,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            hire_date: self
                .hire_date
                .as_deref()
                .and_then(|raw| NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()),
            address: self.address.clone(),
        }
    }

    fn retry_location(&self) -> String {
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        query.append_pair("error", "1");
        for (key, value) in [
            ("firstName", &self.first_name),
            ("lastName", &self.last_name),
            ("hireDate", &self.hire_date),
            ("address", &self.address),
        ] {
            if let Some(value) = value {
                query.append_pair(key, value);
            }
        }
        format!("/create-employee?{}", query.finish())
    }
}

#[derive(Deserialize)]
struct CreatePageQuery {
    error: Option<String>,
    #[serde(flatten)]
    prefill: EmployeeForm,
}

#[derive(Deserialize)]
struct AddressForm {
    address: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FirstNameForm {
    first_name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LastNameForm {
    last_name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FullNameForm {
    full_name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchForm {
    search_input: String,
}

async fn create_employee_page(Query(query): Query<CreatePageQuery>) -> Html<String> {
    let error = query.error.is_some().then_some(pages::CREATE_FAILED);
    Html(pages::create_employee(&query.prefill, error))
}

async fn submit_new_employee(
    State(state): State<AppState>,
    Form(form): Form<EmployeeForm>,
) -> HttpResult<Redirect> {
    match state.service.create_employee(form.to_candidate()).await? {
        Some(created) => {
            info!(id = created.id, "employee submitted");
            Ok(Redirect::to("/show-employees"))
        }
        None => Ok(Redirect::to(&form.retry_location())),
    }
}

async fn show_employees(State(state): State<AppState>) -> HttpResult<Html<String>> {
    let rows = state.service.list_all().await?;
    Ok(Html(pages::show_employees(&rows)))
}

/// Result table, or the "no results" page for an empty hit list.
fn results_page(rows: Vec<Employee>) -> Html<String> {
    if rows.is_empty() {
        Html(pages::no_results())
    } else {
        Html(pages::show_employees(&rows))
    }
}

async fn search_by_address(
    State(state): State<AppState>,
    Form(form): Form<AddressForm>,
) -> HttpResult<Html<String>> {
    Ok(results_page(state.service.list_by_address(&form.address).await?))
}

async fn search_by_first_name(
    State(state): State<AppState>,
    Form(form): Form<FirstNameForm>,
) -> HttpResult<Html<String>> {
    Ok(results_page(
        state.service.find_by_first_name(&form.first_name).await?,
    ))
}

async fn search_by_last_name(
    State(state): State<AppState>,
    Form(form): Form<LastNameForm>,
) -> HttpResult<Html<String>> {
    Ok(results_page(
        state.service.find_by_last_name(&form.last_name).await?,
    ))
}

async fn search_by_full_name(
    State(state): State<AppState>,
    Form(form): Form<FullNameForm>,
) -> HttpResult<Html<String>> {
    Ok(results_page(
        state.service.find_by_full_name(&form.full_name).await?,
    ))
}

async fn search_employees(
    State(state): State<AppState>,
    Form(form): Form<SearchForm>,
) -> HttpResult<Html<String>> {
    Ok(results_page(
        state.service.search_employees(&form.search_input).await?,
    ))
}

async fn graphql_handler(State(state): State<AppState>, request: GraphQLRequest) -> GraphQLResponse {
    state.schema.execute(request.into_inner()).await.into()
}

async fn graphiql() -> Html<String> {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let db_ok = platform_db::ping(&state.pool).await;
    Json(HealthResponse {
        ok: db_ok,
        db_ok,
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    db_ok: bool,
    version: &'static str,
}

type HttpResult<T> = Result<T, HttpError>;

#[derive(Debug)]
struct HttpError {
    status: StatusCode,
    message: String,
}

impl HttpError {
    fn new(status: StatusCode, msg: &str) -> Self {
        Self {
            status,
            message: msg.to_string(),
        }
    }

    fn internal(err: anyhow::Error) -> Self {
        error!(error = %err, "request failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
    }
}

impl From<HrError> for HttpError {
    fn from(err: HrError) -> Self {
        match err {
            HrError::MalformedFullName(_) => Self::new(
                StatusCode::BAD_REQUEST,
                "Please enter both a first name and a last name.",
            ),
            HrError::Store(_) => Self::internal(err.into()),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status, Html(pages::error(&self.message))).into_response()
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "failed to install CTRL+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    };
    info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, header},
    };
    use http_body_util::BodyExt;
    use migration::{Migrator, MigratorTrait};
    use platform_db::DatabaseSettings;
    use products_hr::{DbEmployeeStore, seed_demo};
    use tower::ServiceExt;

    use super::*;
    use crate::graphql::build_schema;

    async fn app() -> Router {
        let pool = platform_db::connect(&DatabaseSettings::with_url("sqlite::memory:"))
            .await
            .expect("connect sqlite");
        Migrator::up(&pool, None).await.expect("migrate");
        let service = EmployeeService::new(Arc::new(DbEmployeeStore::new(pool.clone())));
        seed_demo(&service).await.expect("seed");
        build_router(AppState {
            pool,
            schema: build_schema(service.clone()),
            service,
            config: Arc::new(AppConfig::default()),
        })
    }

    fn form_post(uri: &str, body: &str) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn location(response: &Response) -> &str {
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn health_reports_database() {
        let response = app()
            .await
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json["ok"], true);
        assert_eq!(json["db_ok"], true);
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn show_employees_lists_everyone() {
        let response = app()
            .await
            .oneshot(Request::get("/show-employees").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        for name in ["Daliah", "Anya", "Anastasia", "Madalina", "Robert"] {
            assert!(html.contains(&format!("<td>{name}</td>")), "missing {name}");
        }
    }

    #[tokio::test]
    async fn valid_submission_redirects_to_listing() {
        let app = app().await;
        let response = app
            .clone()
            .oneshot(form_post(
                "/submit-new-employee",
                "firstName=Jane&lastName=Roe&hireDate=2021-03-04&address=1+Main+St",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/show-employees");

        let listing = app
            .oneshot(Request::get("/show-employees").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let html = body_text(listing).await;
        assert!(html.contains("<td>Jane</td><td>Roe</td><td>2021-03-04</td><td>1 Main St</td>"));
    }

    #[tokio::test]
    async fn incomplete_submission_returns_to_form_with_values() {
        let app = app().await;
        let response = app
            .clone()
            .oneshot(form_post(
                "/submit-new-employee",
                "firstName=Jane&lastName=&hireDate=not-a-date&address=1+Main+St",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let target = location(&response).to_string();
        assert!(target.starts_with("/create-employee?error=1"), "{target}");
        assert!(target.contains("firstName=Jane"));

        let page = app
            .oneshot(Request::get(target.as_str()).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let html = body_text(page).await;
        assert!(html.contains(pages::CREATE_FAILED));
        assert!(html.contains(r#"name="firstName" value="Jane""#));
        assert!(html.contains(r#"name="address" value="1 Main St""#));
    }

    #[tokio::test]
    async fn blank_create_page_has_no_error() {
        let response = app()
            .await
            .oneshot(Request::get("/create-employee").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(!body_text(response).await.contains(pages::CREATE_FAILED));
    }

    #[tokio::test]
    async fn combined_search_renders_matches() {
        let response = app()
            .await
            .oneshot(form_post("/search-employees", "searchInput=Anya+Daniel"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("<td>Anya</td>"));
        assert!(html.contains("<td>Robert</td>"));
        assert!(!html.contains("<td>Madalina</td>"));
    }

    #[tokio::test]
    async fn empty_search_result_renders_no_results_page() {
        let response = app()
            .await
            .oneshot(form_post("/search-by-address", "address=Atlantis"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("No employee matched your search."));
    }

    #[tokio::test]
    async fn full_name_search_is_exact() {
        let response = app()
            .await
            .oneshot(form_post("/search-by-full-name", "fullName=anya+WEHBE"))
            .await
            .unwrap();
        let html = body_text(response).await;
        assert!(html.contains("<td>Anya</td>"));
        assert!(!html.contains("<td>Daliah</td>"));
    }

    #[tokio::test]
    async fn single_token_full_name_is_bad_request() {
        let response = app()
            .await
            .oneshot(form_post("/search-by-full-name", "fullName=Anya"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(response).await.contains("both a first name and a last name"));
    }

    #[tokio::test]
    async fn graphql_endpoint_answers() {
        let response = app()
            .await
            .oneshot(
                Request::post("/graphql")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"query":"{ employeesByLastName(lastName: \"wehbe\") { firstName } }"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        let names: Vec<&str> = json["data"]["employeesByLastName"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|row| row["firstName"].as_str())
            .collect();
        assert_eq!(names, ["Daliah", "Anya"]);
    }
}
