//! Mock CAS server for integration testing.
//!
//! Serves `/cas/login` and `/cas/serviceValidate` on a random port. Tickets:
//! - `ST-12345`: success for `jdoe@example.com`, a student
//! - `ST-TEACHER`: success for `asmith@example.com`, a teacher
//! - `ST-UNAVAILABLE`: HTTP 503
//! - `ST-GARBLED`: a body that is not XML
//! - `ST-SLOW`: success for `jdoe@example.com`, after `SLOW_DELAY`
//! - `ST-HUGE`: a body larger than the client accepts
//! - anything else: `INVALID_TICKET` failure

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::task::JoinHandle;

pub const VALID_TICKET: &str = "ST-12345";
pub const TEACHER_TICKET: &str = "ST-TEACHER";
pub const UNAVAILABLE_TICKET: &str = "ST-UNAVAILABLE";
pub const GARBLED_TICKET: &str = "ST-GARBLED";
pub const SLOW_TICKET: &str = "ST-SLOW";
pub const HUGE_TICKET: &str = "ST-HUGE";

pub const SLOW_DELAY: Duration = Duration::from_secs(3);

/// Requests received by the mock server.
#[derive(Clone, Default)]
pub struct MockCasState {
    validations: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockCasState {
    /// `(service, ticket)` pairs received on `serviceValidate`, in order.
    pub fn validations(&self) -> Vec<(String, String)> {
        self.validations.lock().unwrap().clone()
    }
}

fn success(user: &str, cn: &str, email: &str, department: &str, category: &str) -> String {
    format!(
        r#"<cas:serviceResponse xmlns:cas="http://www.yale.edu/tp/cas">
  <cas:authenticationSuccess>
    <cas:user>{user}</cas:user>
    <cas:attributes>
      <cas:cn>{cn}</cas:cn>
      <cas:email>{email}</cas:email>
      <cas:departmentNumber>{department}</cas:departmentNumber>
      <cas:businessCategory>{category}</cas:businessCategory>
    </cas:attributes>
  </cas:authenticationSuccess>
</cas:serviceResponse>"#
    )
}

fn failure(ticket: &str) -> String {
    format!(
        r#"<cas:serviceResponse xmlns:cas="http://www.yale.edu/tp/cas">
  <cas:authenticationFailure code="INVALID_TICKET">
    Ticket {ticket} is not recognized
  </cas:authenticationFailure>
</cas:serviceResponse>"#
    )
}

fn xml(body: String) -> Response {
    (StatusCode::OK, [(header::CONTENT_TYPE, "application/xml")], body).into_response()
}

async fn login_handler(Query(params): Query<HashMap<String, String>>) -> Response {
    let service = params.get("service").cloned().unwrap_or_default();
    let location = format!("{}?ticket={}", service, VALID_TICKET);
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

async fn validate_handler(
    State(state): State<MockCasState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let service = params.get("service").cloned().unwrap_or_default();
    let ticket = params.get("ticket").cloned().unwrap_or_default();
    state
        .validations
        .lock()
        .unwrap()
        .push((service, ticket.clone()));

    match ticket.as_str() {
        VALID_TICKET => xml(success(
            "jdoe",
            "John Doe",
            "jdoe@example.com",
            "ICM 2A",
            "ELEVE",
        )),
        TEACHER_TICKET => xml(success(
            "asmith",
            "Alice Smith",
            "asmith@example.com",
            "MATHS",
            "PROF",
        )),
        UNAVAILABLE_TICKET => StatusCode::SERVICE_UNAVAILABLE.into_response(),
        GARBLED_TICKET => (StatusCode::OK, "<html><body>maintenance").into_response(),
        SLOW_TICKET => {
            tokio::time::sleep(SLOW_DELAY).await;
            xml(success(
                "jdoe",
                "John Doe",
                "jdoe@example.com",
                "ICM 2A",
                "ELEVE",
            ))
        }
        HUGE_TICKET => xml(format!(
            "<cas:serviceResponse xmlns:cas=\"http://www.yale.edu/tp/cas\">{}</cas:serviceResponse>",
            " ".repeat(128 * 1024)
        )),
        other => xml(failure(other)),
    }
}

/// Start a mock CAS server on a random port.
///
/// Returns the CAS base URL, the server handle and the recorded requests.
pub async fn start_mock_cas_server() -> (String, JoinHandle<()>, MockCasState) {
    let state = MockCasState::default();

    let addr = SocketAddr::from(([127, 0, 0, 1], 0));
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    let local_addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}/cas", local_addr);

    let app = Router::new()
        .route("/cas/login", get(login_handler))
        .route("/cas/serviceValidate", get(validate_handler))
        .with_state(state.clone());

    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (base_url, handle, state)
}
