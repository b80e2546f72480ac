use std::future::Future;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::domain::{Client, SearchCriteria, ValidationError};
use crate::registry::{ClientRegistry, RegistryError};
use crate::transport::wire::{ClientJson, Envelope, SearchQuery, codes};

pub const CREATE_PATH: &str = "/v1/clients/create";
pub const UPDATE_PATH: &str = "/v1/clients/update/:id_number";
pub const DELETE_PATH: &str = "/v1/clients/delete/:id_number";
pub const SEARCH_PATH: &str = "/v1/clients/search";

/// Failure returned by a handler, rendered as an [`Envelope`] with a null payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub result_code: i32,
    pub message_code: &'static str,
    pub message: String,
    pub friendly: &'static str,
}

impl ApiError {
    fn bad_request(message: impl Into<String>, friendly: &'static str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            result_code: codes::BAD_REQUEST,
            message_code: codes::BAD_REQUEST_MESSAGE,
            message: message.into(),
            friendly,
        }
    }

    fn invalid_input(message: impl Into<String>) -> Self {
        Self::bad_request(message, "Invalid input.")
    }
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        let message = err.to_string();
        match err {
            RegistryError::ClientNotFound => Self {
                status: StatusCode::NOT_FOUND,
                result_code: codes::NOT_FOUND,
                message_code: codes::NOT_FOUND_MESSAGE,
                message,
                friendly: "Client not found.",
            },
            RegistryError::DuplicateId { .. } => Self::bad_request(message, "Duplicate ID number."),
            RegistryError::DuplicateMobileNumber { .. } => {
                Self::bad_request(message, "Duplicate mobile number.")
            }
            RegistryError::InvalidIdNumber { .. } | RegistryError::MalformedIdNumber(_) => {
                Self::bad_request(message, "Invalid ID number.")
            }
            RegistryError::Validation(_) => Self::invalid_input(message),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::invalid_input(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status().is_server_error() {
            return Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                result_code: codes::INTERNAL,
                message_code: codes::INTERNAL_MESSAGE,
                message: rejection.body_text(),
                friendly: "An unexpected error occurred.",
            };
        }
        Self::invalid_input(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::invalid_input(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Envelope::<()>::failure(
            self.result_code,
            self.message_code,
            self.message,
            self.friendly,
        );
        (self.status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<Json<Envelope<T>>, ApiError>;

/// Build the HTTP router over a shared registry.
pub fn router(registry: Arc<ClientRegistry>) -> Router {
    Router::new()
        .route(CREATE_PATH, post(create_client))
        .route(UPDATE_PATH, put(update_client))
        .route(DELETE_PATH, delete(delete_client))
        .route(SEARCH_PATH, get(search_client))
        .layer(TraceLayer::new_for_http())
        .with_state(registry)
}

/// Serve the router on `listener` until `shutdown` resolves.
pub async fn serve<F>(
    listener: TcpListener,
    registry: Arc<ClientRegistry>,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!(addr = %addr, "client registry listening");
    }
    axum::serve(listener, router(registry))
        .with_graceful_shutdown(shutdown)
        .await
}

async fn create_client(
    State(registry): State<Arc<ClientRegistry>>,
    body: Result<Json<ClientJson>, JsonRejection>,
) -> ApiResult<ClientJson> {
    let Json(body) = body.inspect_err(|err| warn!(error = %err, "create: unreadable body"))?;
    debug!(request = ?body, "create client");

    let result = Client::try_from(body)
        .map_err(ApiError::from)
        .and_then(|candidate| registry.create(candidate).map_err(ApiError::from));

    match result {
        Ok(client) => {
            info!(id_number = client.id_number.as_str(), "client created");
            Ok(Json(Envelope::ok(
                codes::CREATED,
                "Client created successfully.",
                "Your client has been created.",
                ClientJson::from(&client),
            )))
        }
        Err(err) => {
            warn!(error = %err.message, "create client failed");
            Err(err)
        }
    }
}

async fn update_client(
    State(registry): State<Arc<ClientRegistry>>,
    Path(id_number): Path<String>,
    body: Result<Json<ClientJson>, JsonRejection>,
) -> ApiResult<ClientJson> {
    let Json(body) = body.inspect_err(|err| warn!(error = %err, "update: unreadable body"))?;
    debug!(key = %id_number, request = ?body, "update client");

    let result = Client::try_from(body)
        .map_err(ApiError::from)
        .and_then(|candidate| {
            registry
                .update(&id_number, candidate)
                .map_err(ApiError::from)
        });

    match result {
        Ok(client) => {
            info!(key = %id_number, "client updated");
            Ok(Json(Envelope::ok(
                codes::UPDATED,
                "Client updated successfully.",
                "Your client has been updated.",
                ClientJson::from(&client),
            )))
        }
        Err(err) => {
            warn!(key = %id_number, error = %err.message, "update client failed");
            Err(err)
        }
    }
}

async fn delete_client(
    State(registry): State<Arc<ClientRegistry>>,
    Path(id_number): Path<String>,
) -> ApiResult<String> {
    debug!(key = %id_number, "delete client");

    match registry.delete(&id_number) {
        Ok(()) => {
            info!(key = %id_number, "client deleted");
            Ok(Json(Envelope::ok(
                codes::DELETED,
                "Client deleted successfully.",
                "Your client has been deleted.",
                id_number,
            )))
        }
        Err(err) => {
            warn!(key = %id_number, error = %err, "delete client failed");
            Err(err.into())
        }
    }
}

async fn search_client(
    State(registry): State<Arc<ClientRegistry>>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> ApiResult<ClientJson> {
    let Query(query) = query.inspect_err(|err| warn!(error = %err, "search: bad query"))?;
    let criteria = SearchCriteria::from(query);
    debug!(?criteria, "search client");

    match registry.search(&criteria) {
        Ok(client) => {
            info!(id_number = client.id_number.as_str(), "client found");
            Ok(Json(Envelope::ok(
                codes::FOUND,
                "Client found successfully.",
                "Client found.",
                ClientJson::from(&client),
            )))
        }
        Err(err) => {
            warn!(?criteria, error = %err, "search client failed");
            Err(err.into())
        }
    }
}
