//! A local stand-in for the third-party APIs the app talks to. Every POST is
//! recorded and answered with the scripted response.

use lumen::server_port;
use rocket::data::{Limits, ToByteUnit};
use rocket::http::{ContentType, Status};
use rocket::request::{FromRequest, Outcome};
use rocket::{Request, State};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub struct ReceivedRequest {
    pub path: String,
    pub query: Option<String>,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl ReceivedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("The request body was not JSON.")
    }
}

struct ScriptedResponse {
    status: Status,
    content_type: ContentType,
    body: String,
}

struct UpstreamState {
    requests: Mutex<Vec<ReceivedRequest>>,
    response: Mutex<ScriptedResponse>,
}

pub struct MockUpstream {
    pub address: String,
    state: Arc<UpstreamState>,
}

impl MockUpstream {
    pub fn respond_with(&self, status: Status, content_type: ContentType, body: &str) {
        *self.state.response.lock().unwrap() = ScriptedResponse {
            status,
            content_type,
            body: body.to_string(),
        };
    }

    pub fn received_requests(&self) -> Vec<ReceivedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn single_request(&self) -> ReceivedRequest {
        let requests = self.received_requests();
        assert_eq!(requests.len(), 1, "Expected exactly one upstream request.");
        requests[0].clone()
    }
}

struct RequestHead {
    path: String,
    query: Option<String>,
    headers: Vec<(String, String)>,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for RequestHead {
    type Error = std::convert::Infallible;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        Outcome::Success(RequestHead {
            path: request.uri().path().to_string(),
            query: request.uri().query().map(|q| q.as_str().to_string()),
            headers: request
                .headers()
                .iter()
                .map(|h| (h.name().to_string(), h.value().to_string()))
                .collect(),
        })
    }
}

#[rocket::post("/<_..>", data = "<body>")]
fn record(
    head: RequestHead,
    body: String,
    state: &State<Arc<UpstreamState>>,
) -> (Status, (ContentType, String)) {
    state.requests.lock().unwrap().push(ReceivedRequest {
        path: head.path,
        query: head.query,
        headers: head.headers,
        body,
    });
    let response = state.response.lock().unwrap();
    (
        response.status,
        (response.content_type.clone(), response.body.clone()),
    )
}

/// Starts on a random port and answers `200 {}` until scripted otherwise.
pub async fn spawn_upstream() -> MockUpstream {
    let state = Arc::new(UpstreamState {
        requests: Mutex::new(Vec::new()),
        response: Mutex::new(ScriptedResponse {
            status: Status::Ok,
            content_type: ContentType::JSON,
            body: "{}".to_string(),
        }),
    });
    let figment = rocket::Config::figment()
        .merge(("address", "127.0.0.1"))
        .merge(("port", 0))
        .merge(("limits", Limits::default().limit("string", 1.mebibytes())))
        .merge(("log_level", "off"));
    let (reporter, mut port) = server_port::create_pair();
    let server = rocket::custom(figment)
        .manage(state.clone())
        .mount("/", rocket::routes![record])
        .attach(reporter);
    let _ = tokio::spawn(server.launch());
    let port = port.get().await.expect("The upstream did not report its port.");

    MockUpstream {
        address: format!("http://127.0.0.1:{}", port),
        state,
    }
}
