// 该文件是 Kanjian （看见） 项目的一部分。
// tests/clarifai_service.rs - 识别服务集成测试
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use httpmock::Method::POST;
use httpmock::MockServer;
use serde_json::json;
use tempfile::NamedTempFile;
use url::Url;

use kanjian::analyze::{Analyzer, AnalyzerConfig};
use kanjian::model::ClarifaiClient;

const MODEL_URL: &str = "https://clarifai.com/clarifai/main/models/face-detection?inputId=abc";
const OUTPUTS_PATH: &str = "/v2/users/clarifai/apps/main/models/face-detection/outputs";

fn analyzer(server: &MockServer) -> Analyzer<ClarifaiClient> {
  let client = ClarifaiClient::builder(Url::parse(&server.base_url()).unwrap())
    .build()
    .unwrap();
  let config = AnalyzerConfig::new("secret-pat", Url::parse(MODEL_URL).unwrap());
  Analyzer::new(config, client)
}

fn snapshot() -> NamedTempFile {
  let file = NamedTempFile::new().unwrap();
  std::fs::write(file.path(), b"abc").unwrap();
  file
}

#[test]
fn region_response_is_reported_per_region() {
  let server = MockServer::start();
  let mock = server.mock(|when, then| {
    when
      .method(POST)
      .path(OUTPUTS_PATH)
      .header("authorization", "Key secret-pat")
      .json_body(json!({"inputs": [{"data": {"image": {"base64": "YWJj"}}}]}));
    then.status(200).json_body(json!({
      "status": {"code": 10000, "description": "Ok"},
      "outputs": [{
        "data": {
          "regions": [
            {"data": {"concepts": [{"name": "face", "value": 0.98}]}},
            {"data": {"concepts": [{"name": "face", "value": 0.51}]}}
          ]
        }
      }]
    }));
  });

  let file = snapshot();
  let text = analyzer(&server).analyze(Some(file.path()));

  mock.assert();
  assert_eq!(
    text,
    "PERSON DETECTED (Clarifai)!\n  - Region 1: face (confidence: 0.98)\n  - Region 2: face (confidence: 0.51)"
  );
}

#[test]
fn general_concepts_without_person() {
  let server = MockServer::start();
  let mock = server.mock(|when, then| {
    when.method(POST).path(OUTPUTS_PATH);
    then.status(200).json_body(json!({
      "status": {"code": 10000, "description": "Ok"},
      "outputs": [{"data": {"concepts": [
        {"name": "car", "value": 0.93},
        {"name": "street", "value": 0.8}
      ]}}]
    }));
  });

  let file = snapshot();
  let report = analyzer(&server).try_analyze(Some(file.path())).unwrap();

  mock.assert();
  assert!(!report.person_detected);
  assert_eq!(
    report.items,
    vec![
      "General: car (confidence: 0.93)",
      "General: street (confidence: 0.80)"
    ]
  );
}

#[test]
fn service_status_failure_is_described() {
  let server = MockServer::start();
  server.mock(|when, then| {
    when.method(POST).path(OUTPUTS_PATH);
    then.status(404).json_body(json!({
      "status": {"code": 21200, "description": "Model does not exist"}
    }));
  });

  let file = snapshot();
  let text = analyzer(&server).analyze(Some(file.path()));

  assert_eq!(
    text,
    "Clarifai prediction error: Model does not exist (code: 21200)"
  );
}

#[test]
fn non_json_failure_is_unexpected_error() {
  let server = MockServer::start();
  server.mock(|when, then| {
    when.method(POST).path(OUTPUTS_PATH);
    then.status(502).body("bad gateway");
  });

  let file = snapshot();
  let text = analyzer(&server).analyze(Some(file.path()));

  assert!(text.starts_with("Unexpected error while analyzing with Clarifai"));
  assert!(text.contains("HTTP 502"));
}

#[test]
fn malformed_success_body_is_unexpected_error() {
  let server = MockServer::start();
  server.mock(|when, then| {
    when.method(POST).path(OUTPUTS_PATH);
    then.status(200).body("{\"outputs\": 3}");
  });

  let file = snapshot();
  let text = analyzer(&server).analyze(Some(file.path()));

  assert!(text.contains("malformed response"));
}
