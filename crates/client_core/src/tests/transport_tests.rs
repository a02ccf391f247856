use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Router};
use shared::{domain::PaymentField, protocol::SEND_PAYMENT_ROUTE};
use tokio::{net::TcpListener, sync::Mutex};

use crate::{
    transport::payment_endpoint, ClientError, ClientSettings, HttpPaymentTransport,
    PaymentTransport, Storefront, SubmitOutcome,
};

const RECEIPT_BODY: &str = r#"{"requestId":"abc123","amount":4}"#;

#[derive(Clone)]
struct PaymentServerState {
    status: StatusCode,
    received: Arc<Mutex<Vec<String>>>,
}

async fn handle_send_payment(
    State(state): State<PaymentServerState>,
    body: String,
) -> (StatusCode, String) {
    state.received.lock().await.push(body);
    let reply = if state.status.is_success() {
        RECEIPT_BODY.to_string()
    } else {
        String::new()
    };
    (state.status, reply)
}

async fn spawn_payment_server(
    status: StatusCode,
) -> std::io::Result<(String, Arc<Mutex<Vec<String>>>)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let received = Arc::new(Mutex::new(Vec::new()));
    let state = PaymentServerState {
        status,
        received: received.clone(),
    };
    let app = Router::new()
        .route(SEND_PAYMENT_ROUTE, post(handle_send_payment))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}"), received))
}

#[test]
fn endpoint_appends_payment_route_to_host() {
    assert_eq!(
        payment_endpoint("http://localhost:3000").expect("url").as_str(),
        "http://localhost:3000/api/sendPayment"
    );
    assert_eq!(
        payment_endpoint("https://coffee.example/shop/").expect("url").as_str(),
        "https://coffee.example/shop/api/sendPayment"
    );
}

#[test]
fn endpoint_rejects_hosts_without_scheme() {
    let err = payment_endpoint("coffee.example").expect_err("no scheme");
    assert!(matches!(err, ClientError::InvalidEndpoint(_)));
}

#[tokio::test]
async fn http_transport_posts_raw_body_and_returns_status() {
    let (server_url, received) = spawn_payment_server(StatusCode::OK)
        .await
        .expect("spawn server");
    let transport = HttpPaymentTransport::new(&server_url).expect("transport");

    let response = transport
        .send_payment(r#"{"cardNumber":"1"}"#.to_string())
        .await
        .expect("response");
    assert_eq!(response.status, 200);
    assert!(response.is_success());
    assert_eq!(response.body, RECEIPT_BODY);
    assert_eq!(
        *received.lock().await,
        vec![r#"{"cardNumber":"1"}"#.to_string()]
    );
}

#[tokio::test]
async fn http_transport_reports_failure_status_as_response() {
    let (server_url, _received) = spawn_payment_server(StatusCode::INTERNAL_SERVER_ERROR)
        .await
        .expect("spawn server");
    let transport = HttpPaymentTransport::new(&server_url).expect("transport");

    let response = transport
        .send_payment("{}".to_string())
        .await
        .expect("response");
    assert_eq!(response.status, 500);
    assert!(!response.is_success());
    assert!(response.body.is_empty());
}

#[tokio::test]
async fn http_transport_errors_when_nothing_listens() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let transport = HttpPaymentTransport::new(&format!("http://{addr}")).expect("transport");
    let err = transport
        .send_payment("{}".to_string())
        .await
        .expect_err("connection refused");
    assert!(matches!(err, ClientError::Transport(_)));
}

#[tokio::test]
async fn storefront_round_trip_over_http() {
    let (server_url, received) = spawn_payment_server(StatusCode::OK)
        .await
        .expect("spawn server");
    let mut storefront = Storefront::connect(&ClientSettings {
        public_host: server_url,
    })
    .expect("storefront");

    storefront
        .form
        .edit(PaymentField::CardNumber, "4111111111111111");
    storefront.form.edit(PaymentField::ExpirationDate, "09/2027");
    storefront.form.edit(PaymentField::Cvv, "123");
    storefront.form.edit(PaymentField::Amount, "4");

    let outcome = storefront.form.submit().await;
    assert!(matches!(outcome, SubmitOutcome::Confirmed(_)));
    assert_eq!(
        *received.lock().await,
        vec![
            r#"{"cardNumber":"4111111111111111","expirationDate":"09/2027","cvv":"123","amount":"4"}"#
                .to_string()
        ]
    );
    assert!(storefront.notifier.is_visible());
    assert_eq!(
        storefront.notifier.current().map(|c| c.request_id),
        Some("abc123".to_string())
    );
}
