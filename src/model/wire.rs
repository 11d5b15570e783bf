// 该文件是 Kanjian （看见） 项目的一部分。
// src/model/wire.rs - Clarifai PostModelOutputs 报文
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

/// `status_code_pb2.SUCCESS`
pub const STATUS_SUCCESS: u32 = 10000;

#[derive(Debug, Serialize)]
pub(crate) struct PostModelOutputsRequest {
  pub inputs: Vec<Input>,
}

#[derive(Debug, Serialize)]
pub(crate) struct Input {
  pub data: InputData,
}

#[derive(Debug, Serialize)]
pub(crate) struct InputData {
  pub image: Image,
}

#[derive(Debug, Serialize)]
pub(crate) struct Image {
  pub base64: String,
}

impl PostModelOutputsRequest {
  /// 单输入请求，图像字节内联为 base64
  pub fn single_image(bytes: &[u8]) -> Self {
    Self {
      inputs: vec![Input {
        data: InputData {
          image: Image {
            base64: STANDARD.encode(bytes),
          },
        },
      }],
    }
  }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct PostModelOutputsResponse {
  pub status: Status,
  #[serde(default)]
  pub outputs: Vec<Output>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct Status {
  #[serde(default)]
  pub code: u32,
  #[serde(default)]
  pub description: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub details: Option<String>,
}

impl Status {
  pub fn is_success(&self) -> bool {
    self.code == STATUS_SUCCESS
  }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct Output {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub data: Option<OutputData>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct OutputData {
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub concepts: Vec<Concept>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub regions: Vec<Region>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct Region {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub data: Option<RegionData>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct RegionData {
  #[serde(default)]
  pub concepts: Vec<Concept>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct Concept {
  #[serde(default)]
  pub name: String,
  /// 置信度，[0, 1]
  #[serde(default)]
  pub value: f32,
}

impl Concept {
  pub fn new(name: impl Into<String>, value: f32) -> Self {
    Self {
      name: name.into(),
      value,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn request_inlines_base64_image() {
    let request = PostModelOutputsRequest::single_image(b"abc");
    let value = serde_json::to_value(&request).unwrap();
    assert_eq!(
      value,
      json!({"inputs": [{"data": {"image": {"base64": "YWJj"}}}]})
    );
  }

  #[test]
  fn response_ignores_unknown_fields() {
    let body = json!({
      "status": {"code": 10000, "description": "Ok", "req_id": "abc"},
      "outputs": [{
        "id": "o1",
        "model": {"id": "face-detection"},
        "data": {
          "regions": [{
            "id": "r1",
            "region_info": {"bounding_box": {"top_row": 0.1, "left_col": 0.2, "bottom_row": 0.5, "right_col": 0.6}},
            "data": {"concepts": [{"id": "ai_b1b1b1b1", "name": "face", "value": 0.99, "app_id": "main"}]}
          }]
        }
      }]
    });

    let response: PostModelOutputsResponse = serde_json::from_value(body).unwrap();
    assert!(response.status.is_success());
    let data = response.outputs[0].data.as_ref().unwrap();
    assert!(data.concepts.is_empty());
    let region = data.regions[0].data.as_ref().unwrap();
    assert_eq!(region.concepts, vec![Concept::new("face", 0.99)]);
  }

  #[test]
  fn failure_response_without_outputs() {
    let body = json!({"status": {"code": 11102, "description": "Invalid request", "details": "Model does not exist"}});
    let response: PostModelOutputsResponse = serde_json::from_value(body).unwrap();
    assert!(!response.status.is_success());
    assert_eq!(response.status.details.as_deref(), Some("Model does not exist"));
    assert!(response.outputs.is_empty());
  }
}
