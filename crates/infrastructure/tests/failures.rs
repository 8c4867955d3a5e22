//! Transport failures that still produce a connection: redirect loops and
//! slow handlers. Both must surface as a plain `NetworkFailure`.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use axum::{Router, response::Redirect, routing::get};
use pretty_assertions::assert_eq;
use taskcheck_application::{CheckerConfig, NetworkFailure, Transport};
use taskcheck_domain::{HttpMethod, RequestSpec};
use taskcheck_infrastructure::ReqwestTransport;
use tokio::net::TcpListener;

async fn spawn(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, router).await });
    format!("http://{addr}")
}

#[tokio::test]
async fn redirect_loop_is_network_failure() {
    let router = Router::new().route("/loop", get(|| async { Redirect::temporary("/loop") }));
    let base = spawn(router).await;
    let transport = ReqwestTransport::new(&CheckerConfig::new(base.as_str())).unwrap();

    let result = transport
        .send(&RequestSpec::new(HttpMethod::Get, base, "/loop"))
        .await;

    assert_eq!(result.err(), Some(NetworkFailure));
}

#[tokio::test]
async fn slow_response_is_network_failure() {
    let router = Router::new().route(
        "/slow",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            "late"
        }),
    );
    let base = spawn(router).await;
    let client = reqwest_client(Duration::from_millis(100));
    let transport = ReqwestTransport::with_client(client);

    let result = transport
        .send(&RequestSpec::new(HttpMethod::Get, base, "/slow"))
        .await;

    assert_eq!(result.err(), Some(NetworkFailure));
}

#[tokio::test]
async fn fast_response_within_timeout_succeeds() {
    let router = Router::new().route("/fast", get(|| async { "ok" }));
    let base = spawn(router).await;
    let transport = ReqwestTransport::with_client(reqwest_client(Duration::from_secs(5)));

    let response = transport
        .send(&RequestSpec::new(HttpMethod::Get, base, "/fast"))
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.body_text(), "ok");
}

fn reqwest_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder().timeout(timeout).build().unwrap()
}
