use floorplan_export_api_client::{export_floor_plan, ApiError, ExportClient, API_BASE_URL_ENV};
use floorplan_export_core::{ApiKey, ExportConfig, ModelId, ValidationError};
use serde_json::json;
use serial_test::serial;
use wiremock::matchers::{body_json, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ========================================
// テスト用ヘルパー関数
// ========================================

/// テスト環境でプロキシを無効化
fn disable_proxy_for_test() {
    // プロキシ環境変数を削除してlocalhostへのアクセスを許可
    std::env::remove_var("HTTP_PROXY");
    std::env::remove_var("HTTPS_PROXY");
    std::env::remove_var("http_proxy");
    std::env::remove_var("https_proxy");
    // localhostをNO_PROXYに追加
    std::env::set_var("NO_PROXY", "localhost,127.0.0.1");
}

fn local_client(base_url: &str) -> ExportClient {
    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    ExportClient::with_client(client, base_url)
}

fn ids() -> (ModelId, ApiKey) {
    (ModelId::new("model123").unwrap(), ApiKey::new("key-abc"))
}

// ========================================
// ExportClient のテスト
// ========================================

#[tokio::test]
async fn test_export_sends_expected_request() {
    let mock_server = MockServer::start().await;

    // URL・ヘッダー・ボディがすべて一致した場合のみ応答する
    Mock::given(method("POST"))
        .and(path("/exporter/floorplan/model123"))
        .and(header("x-api-key", "key-abc"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"rooms": 3})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (model_id, api_key) = ids();
    let result = local_client(&mock_server.uri())
        .export_floor_plan(&model_id, &api_key, &ExportConfig::new(json!({"rooms": 3})))
        .await;

    assert!(result.is_ok(), "Expected Ok but got: {:?}", result);
    assert_eq!(result.unwrap().into_inner(), json!({"status": "ok"}));
}

#[tokio::test]
async fn test_export_returns_body_unmodified() {
    let mock_server = MockServer::start().await;

    let body = json!({
        "floorplan": {
            "levels": [{"name": "1st floor", "rooms": [{"type": "kitchen", "area": 12.4}]}]
        },
        "warnings": []
    });

    Mock::given(method("POST"))
        .and(path("/exporter/floorplan/model123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&mock_server)
        .await;

    let (model_id, api_key) = ids();
    let result = local_client(&mock_server.uri())
        .export_floor_plan(&model_id, &api_key, &ExportConfig::default())
        .await
        .unwrap();

    assert_eq!(result.as_value(), &body);
}

#[tokio::test]
async fn test_export_empty_body_is_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/exporter/floorplan/model123"))
        .respond_with(ResponseTemplate::new(202))
        .mount(&mock_server)
        .await;

    let (model_id, api_key) = ids();
    let result = local_client(&mock_server.uri())
        .export_floor_plan(&model_id, &api_key, &ExportConfig::default())
        .await;

    // 空のボディは null に置き換えず、解析エラーとして返す
    assert!(matches!(result, Err(ApiError::Decode(_))), "got {:?}", result);
}

#[tokio::test]
async fn test_export_whitespace_body_is_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/exporter/floorplan/model123"))
        .respond_with(ResponseTemplate::new(200).set_body_string("  \n"))
        .mount(&mock_server)
        .await;

    let (model_id, api_key) = ids();
    let result = local_client(&mock_server.uri())
        .export_floor_plan(&model_id, &api_key, &ExportConfig::default())
        .await;

    assert!(matches!(result, Err(ApiError::Decode(_))));
}

#[tokio::test]
async fn test_export_json_string_body_passes_through() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/exporter/floorplan/model123"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#""done""#))
        .mount(&mock_server)
        .await;

    let (model_id, api_key) = ids();
    let result = local_client(&mock_server.uri())
        .export_floor_plan(&model_id, &api_key, &ExportConfig::default())
        .await
        .unwrap();

    assert_eq!(result.into_inner(), json!("done"));
}

#[tokio::test]
async fn test_export_empty_api_key_is_sent() {
    let mock_server = MockServer::start().await;

    // APIキーは中身を検査せずそのまま送る
    Mock::given(method("POST"))
        .and(path("/exporter/floorplan/model123"))
        .and(header_exists("x-api-key"))
        .respond_with(ResponseTemplate::new(401).set_body_string(r#"{"message":"Unauthorized"}"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    let model_id = ModelId::new("model123").unwrap();
    let err = local_client(&mock_server.uri())
        .export_floor_plan(&model_id, &ApiKey::new(""), &ExportConfig::default())
        .await
        .unwrap_err();

    assert_eq!(err.status().map(|s| s.as_u16()), Some(401));
}

#[tokio::test]
async fn test_export_http_403_error() {
    let mock_server = MockServer::start().await;

    // 無効なAPIキーをシミュレート
    Mock::given(method("POST"))
        .and(path("/exporter/floorplan/model123"))
        .respond_with(ResponseTemplate::new(403).set_body_string(r#"{"message":"Forbidden"}"#))
        .mount(&mock_server)
        .await;

    let (model_id, api_key) = ids();
    let result = local_client(&mock_server.uri())
        .export_floor_plan(&model_id, &api_key, &ExportConfig::default())
        .await;

    match result {
        Err(ApiError::Status { status, body }) => {
            assert_eq!(status.as_u16(), 403);
            assert!(body.contains("Forbidden"));
        }
        other => panic!("Expected Status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_export_http_500_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/exporter/floorplan/model123"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let (model_id, api_key) = ids();
    let err = local_client(&mock_server.uri())
        .export_floor_plan(&model_id, &api_key, &ExportConfig::default())
        .await
        .unwrap_err();

    assert_eq!(err.status().map(|s| s.as_u16()), Some(500));
    assert!(err.to_string().contains("HTTPエラー: 500"));
}

#[tokio::test]
async fn test_export_status_kept_when_error_body_is_cut_off() {
    let mut server = mockito::Server::new_async().await;

    // エラーレスポンスのボディ送信途中で失敗させる
    let _mock = server
        .mock("POST", "/exporter/floorplan/model123")
        .with_status(502)
        .with_chunked_body(|w| {
            w.write_all(b"{\"message\":")?;
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "upstream closed"))
        })
        .create_async()
        .await;

    let (model_id, api_key) = ids();
    let err = local_client(&server.url())
        .export_floor_plan(&model_id, &api_key, &ExportConfig::default())
        .await
        .unwrap_err();

    // ボディが読めなくてもステータスは失われない
    assert!(matches!(err, ApiError::Status { .. }), "got {:?}", err);
    assert_eq!(err.status().map(|s| s.as_u16()), Some(502));
}

#[tokio::test]
async fn test_export_invalid_json_response() {
    let mock_server = MockServer::start().await;

    // 無効なJSONレスポンス
    Mock::given(method("POST"))
        .and(path("/exporter/floorplan/model123"))
        .respond_with(ResponseTemplate::new(200).set_body_string("invalid json"))
        .mount(&mock_server)
        .await;

    let (model_id, api_key) = ids();
    let result = local_client(&mock_server.uri())
        .export_floor_plan(&model_id, &api_key, &ExportConfig::default())
        .await;

    assert!(matches!(result, Err(ApiError::Decode(_))));
}

#[tokio::test]
async fn test_export_network_error_connection_refused() {
    // 存在しないサーバーに接続してネットワークエラーを発生させる
    let (model_id, api_key) = ids();
    let result = local_client("http://127.0.0.1:9")
        .export_floor_plan(&model_id, &api_key, &ExportConfig::default())
        .await;

    let err = result.unwrap_err();
    assert!(err.is_transport());
    assert!(err.to_string().starts_with("ネットワークエラー"));
}

// ========================================
// export_floor_plan（環境変数経由）のテスト
// ========================================

#[tokio::test]
#[serial]
async fn test_export_floor_plan_uses_env_base_url() {
    disable_proxy_for_test();

    let mut server = mockito::Server::new_async().await;
    std::env::set_var(API_BASE_URL_ENV, server.url());

    let mock = server
        .mock("POST", "/exporter/floorplan/model123")
        .match_header("x-api-key", "key-abc")
        .match_header("content-type", "application/json")
        .match_body(mockito::Matcher::Json(json!({"rooms": 3})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"status": "ok"}).to_string())
        .create_async()
        .await;

    let result = export_floor_plan("model123", "key-abc", &ExportConfig::new(json!({"rooms": 3}))).await;

    std::env::remove_var(API_BASE_URL_ENV);

    assert_eq!(result.unwrap().into_inner(), json!({"status": "ok"}));
    mock.assert_async().await;
}

#[tokio::test]
#[serial]
async fn test_export_floor_plan_empty_model_id() {
    let result = export_floor_plan("", "key-abc", &ExportConfig::default()).await;

    assert!(matches!(
        result,
        Err(ApiError::Validation(ValidationError::EmptyModelId))
    ));
}
