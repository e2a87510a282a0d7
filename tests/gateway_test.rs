//! Integration tests for forwarding, dispatch, and the fixed endpoints.

use serde_json::Value;

mod common;

#[tokio::test]
async fn test_forwards_and_mirrors_backend_response() {
    let backend = common::start_mock_backend("200 OK", "text/plain", "hello from auth").await;

    let mut config = common::test_config();
    config
        .services
        .insert("auth".into(), format!("http://{}", backend));
    let gateway = common::spawn_gateway(config).await;

    let client = common::http_client();
    let res = client
        .get(format!("http://{}/auth/login", gateway))
        .send()
        .await
        .expect("gateway unreachable");

    assert_eq!(res.status(), 200);
    assert_eq!(
        res.headers().get("content-type").unwrap(),
        "text/plain",
        "content-type must mirror the backend"
    );
    assert!(
        res.headers().contains_key("x-process-time"),
        "forwarded responses carry the timing header"
    );
    assert!(
        res.headers().contains_key(api_gateway::http::X_REQUEST_ID),
        "responses carry the generated request id"
    );
    assert_eq!(res.text().await.unwrap(), "hello from auth");
}

#[tokio::test]
async fn test_backend_status_passes_through() {
    let backend =
        common::start_mock_backend("404 Not Found", "application/json", r#"{"detail":"nope"}"#)
            .await;

    let mut config = common::test_config();
    config
        .services
        .insert("auth".into(), format!("http://{}", backend));
    let gateway = common::spawn_gateway(config).await;

    let res = common::http_client()
        .get(format!("http://{}/auth/missing", gateway))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 404);
    assert_eq!(res.text().await.unwrap(), r#"{"detail":"nope"}"#);
}

#[tokio::test]
async fn test_remaining_path_and_query_forwarded() {
    let (backend, captured) = common::start_capture_backend().await;

    let mut config = common::test_config();
    config
        .services
        .insert("markets".into(), format!("http://{}", backend));
    let gateway = common::spawn_gateway(config).await;

    let res = common::http_client()
        .get(format!(
            "http://{}/markets/quotes/BTC?depth=5&side=buy",
            gateway
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let heads = captured.lock().unwrap();
    assert_eq!(heads.len(), 1);
    assert!(
        heads[0].starts_with("GET /quotes/BTC?depth=5&side=buy HTTP/1.1"),
        "service prefix stripped, remainder and query preserved: {}",
        heads[0]
    );
}

#[tokio::test]
async fn test_empty_remainder_hits_backend_root() {
    let (backend, captured) = common::start_capture_backend().await;

    let mut config = common::test_config();
    config
        .services
        .insert("auth".into(), format!("http://{}", backend));
    let gateway = common::spawn_gateway(config).await;

    let res = common::http_client()
        .get(format!("http://{}/auth", gateway))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let heads = captured.lock().unwrap();
    assert!(
        heads[0].starts_with("GET / HTTP/1.1"),
        "empty remainder targets the backend base: {}",
        heads[0]
    );
}

#[tokio::test]
async fn test_post_body_forwarded() {
    let (backend, captured) = common::start_capture_backend().await;

    let mut config = common::test_config();
    config
        .services
        .insert("auth".into(), format!("http://{}", backend));
    let gateway = common::spawn_gateway(config).await;

    let res = common::http_client()
        .post(format!("http://{}/auth/login", gateway))
        .header("content-type", "application/json")
        .body(r#"{"user":"alice"}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let heads = captured.lock().unwrap();
    assert!(heads[0].starts_with("POST /login HTTP/1.1"));
    assert!(
        heads[0].contains(r#"{"user":"alice"}"#),
        "body bytes pass through unmodified: {}",
        heads[0]
    );
}

#[tokio::test]
async fn test_hop_by_hop_headers_stripped() {
    let (backend, captured) = common::start_capture_backend().await;

    let mut config = common::test_config();
    config
        .services
        .insert("auth".into(), format!("http://{}", backend));
    let gateway = common::spawn_gateway(config).await;

    let res = common::http_client()
        .get(format!("http://{}/auth/login", gateway))
        .header("authorization", "Bearer token123")
        .header("x-custom", "keep-me")
        .header("proxy-authorization", "Basic xyz")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let heads = captured.lock().unwrap();
    let head = heads[0].to_lowercase();
    assert!(head.contains("authorization: bearer token123"));
    assert!(head.contains("x-custom: keep-me"));
    assert!(!head.contains("proxy-authorization"));
}

#[tokio::test]
async fn test_unknown_service_yields_404_detail() {
    let mut config = common::test_config();
    config
        .services
        .insert("auth".into(), "http://127.0.0.1:1".into());
    let gateway = common::spawn_gateway(config).await;

    let res = common::http_client()
        .get(format!("http://{}/billing/invoices", gateway))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 404);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["detail"], "Service 'billing' not found");
}

#[tokio::test]
async fn test_root_enumerates_services() {
    let mut config = common::test_config();
    config
        .services
        .insert("auth".into(), "http://127.0.0.1:1".into());
    config
        .services
        .insert("markets".into(), "http://127.0.0.1:2".into());
    let gateway = common::spawn_gateway(config).await;

    let res = common::http_client()
        .get(format!("http://{}/", gateway))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["services"], serde_json::json!(["auth", "markets"]));
}

#[tokio::test]
async fn test_health_endpoint_fixed_shape() {
    let gateway = common::spawn_gateway(common::test_config()).await;

    let res = common::http_client()
        .get(format!("http://{}/health", gateway))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "api-gateway");
}
