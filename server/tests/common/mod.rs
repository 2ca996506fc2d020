use relay_core::Relay;
use relay_server::{app, AppState};
use std::sync::Arc;
use tokio::net::TcpListener;
use wiremock::{Request, Respond, ResponseTemplate};

/// Serves the relay on an ephemeral port and returns its base URL.
pub async fn spawn_app() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let app_state = Arc::new(AppState {
        relay: Relay::default(),
    });

    tokio::spawn(async move {
        axum::serve(listener, app(app_state)).await.unwrap();
    });

    format!("http://{}", addr)
}

/// Answers with the raw query string it received.
pub struct EchoQuery;

impl Respond for EchoQuery {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_string(request.url.query().unwrap_or_default())
    }
}
