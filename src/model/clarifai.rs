// 该文件是 Kanjian （看见） 项目的一部分。
// src/model/clarifai.rs - Clarifai 识别服务客户端
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::AUTHORIZATION;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use super::wire::PostModelOutputsRequest;
use crate::model::{Model, PostModelOutputsResponse, PredictRequest};

pub const DEFAULT_API_BASE: &str = "https://api.clarifai.com";

#[derive(Error, Debug)]
pub enum ServiceError {
  #[error("API base URL cannot be used as a base: {0}")]
  InvalidApiBase(String),
  #[error("failed to build HTTP client: {0}")]
  Client(#[source] reqwest::Error),
  #[error("request to {url} failed: {source}")]
  Transport {
    url: String,
    #[source]
    source: reqwest::Error,
  },
  #[error("HTTP {status} from recognition service: {body}")]
  Http { status: u16, body: String },
  #[error("malformed response from recognition service: {0}")]
  Decode(#[source] serde_json::Error),
}

/// Clarifai `PostModelOutputs` 的 HTTP 客户端
#[derive(Debug, Clone)]
pub struct ClarifaiClient {
  http: Client,
  api_base: Url,
}

#[derive(Debug, Clone)]
pub struct ClarifaiClientBuilder {
  api_base: Url,
  timeout: Option<Duration>,
}

impl ClarifaiClientBuilder {
  pub fn new(api_base: Url) -> Self {
    Self {
      api_base,
      timeout: None,
    }
  }

  /// 不设置时使用 reqwest 的默认超时
  pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
    self.timeout = timeout;
    self
  }

  pub fn build(self) -> Result<ClarifaiClient, ServiceError> {
    if self.api_base.cannot_be_a_base() {
      return Err(ServiceError::InvalidApiBase(self.api_base.to_string()));
    }

    let mut builder = Client::builder();
    if let Some(timeout) = self.timeout {
      builder = builder.timeout(timeout);
    }
    let http = builder.build().map_err(ServiceError::Client)?;

    Ok(ClarifaiClient {
      http,
      api_base: self.api_base,
    })
  }
}

impl ClarifaiClient {
  pub fn builder(api_base: Url) -> ClarifaiClientBuilder {
    ClarifaiClientBuilder::new(api_base)
  }

  /// `{api_base}/v2/users/{user}/apps/{app}/models/{model}/outputs`
  pub fn outputs_url(&self, request: &PredictRequest<'_>) -> Result<Url, ServiceError> {
    let mut url = self.api_base.clone();
    url
      .path_segments_mut()
      .map_err(|_| ServiceError::InvalidApiBase(self.api_base.to_string()))?
      .pop_if_empty()
      .extend([
        "v2",
        "users",
        request.model.user_id.as_str(),
        "apps",
        request.model.app_id.as_str(),
        "models",
        request.model.model_id.as_str(),
        "outputs",
      ]);
    Ok(url)
  }
}

impl Model for ClarifaiClient {
  type Error = ServiceError;

  fn infer(&self, request: &PredictRequest<'_>) -> Result<PostModelOutputsResponse, Self::Error> {
    let url = self.outputs_url(request)?;
    let body = PostModelOutputsRequest::single_image(request.image);
    info!("请求识别服务: {} ({} 字节)", url, request.image.len());

    let transport = |source: reqwest::Error| ServiceError::Transport {
      url: url.to_string(),
      source,
    };

    let response = self
      .http
      .post(url.clone())
      .header(AUTHORIZATION, format!("Key {}", request.credential))
      .json(&body)
      .send()
      .map_err(transport)?;

    let status = response.status();
    let text = response.text().map_err(transport)?;
    debug!("识别服务 HTTP 状态: {}", status);

    // 失败时服务仍会在 JSON 中返回 status，优先交给调用方解读
    match serde_json::from_str::<PostModelOutputsResponse>(&text) {
      Ok(parsed) => Ok(parsed),
      Err(_) if !status.is_success() => Err(ServiceError::Http {
        status: status.as_u16(),
        body: text,
      }),
      Err(e) => Err(ServiceError::Decode(e)),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::ModelReference;

  #[test]
  fn outputs_url_appends_model_path() {
    let client = ClarifaiClient::builder(Url::parse("https://api.clarifai.com/").unwrap())
      .build()
      .unwrap();
    let model: ModelReference = "https://clarifai.com/clarifai/main/models/face-detection"
      .parse()
      .unwrap();
    let request = PredictRequest {
      credential: "key",
      model: &model,
      image: b"",
    };

    assert_eq!(
      client.outputs_url(&request).unwrap().as_str(),
      "https://api.clarifai.com/v2/users/clarifai/apps/main/models/face-detection/outputs"
    );
  }

  #[test]
  fn api_base_must_be_hierarchical() {
    let result = ClarifaiClient::builder(Url::parse("data:text/plain,hello").unwrap()).build();
    assert!(matches!(result, Err(ServiceError::InvalidApiBase(_))));
  }
}
