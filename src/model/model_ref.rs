// 该文件是 Kanjian （看见） 项目的一部分。
// src/model/model_ref.rs - 模型引用解析
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use std::{fmt, str::FromStr};

use thiserror::Error;
use url::Url;

use crate::FromUrl;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ModelUrlError {
  #[error("invalid model URL: {0}")]
  Parse(#[from] url::ParseError),
  #[error("model URL has no path")]
  NoPath,
  #[error("model URL needs at least 4 path segments (USER_ID/APP_ID/models/MODEL_ID), found {found}")]
  NotEnoughSegments { found: usize },
}

/// 托管模型的 (user, app, model) 三元组
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelReference {
  pub user_id: String,
  pub app_id: String,
  pub model_id: String,
}

impl FromUrl for ModelReference {
  type Error = ModelUrlError;

  /// 取路径最后四段：`.../USER_ID/APP_ID/<任意>/MODEL_ID`，查询串被忽略
  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    let segments: Vec<&str> = url
      .path_segments()
      .ok_or(ModelUrlError::NoPath)?
      .filter(|segment| !segment.is_empty())
      .collect();

    let [.., user_id, app_id, _, model_id] = segments.as_slice() else {
      return Err(ModelUrlError::NotEnoughSegments {
        found: segments.len(),
      });
    };

    Ok(ModelReference {
      user_id: user_id.to_string(),
      app_id: app_id.to_string(),
      model_id: model_id.to_string(),
    })
  }
}

impl FromStr for ModelReference {
  type Err = ModelUrlError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::from_url(&Url::parse(s)?)
  }
}

impl fmt::Display for ModelReference {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "user={} app={} model={}",
      self.user_id, self.app_id, self.model_id
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn query_string_is_ignored() {
    let reference: ModelReference = "https://host/userX/appY/models/modelZ?x=1".parse().unwrap();
    assert_eq!(
      reference,
      ModelReference {
        user_id: "userX".into(),
        app_id: "appY".into(),
        model_id: "modelZ".into(),
      }
    );
  }

  #[test]
  fn clarifai_face_detection_url() {
    let reference: ModelReference = "https://clarifai.com/clarifai/main/models/face-detection?inputId=https%3A%2F%2Fs3.amazonaws.com%2Fsamples.clarifai.com%2Fimage.jpg"
      .parse()
      .unwrap();
    assert_eq!(reference.user_id, "clarifai");
    assert_eq!(reference.app_id, "main");
    assert_eq!(reference.model_id, "face-detection");
  }

  #[test]
  fn trailing_slash_is_tolerated() {
    let reference: ModelReference = "https://clarifai.com/u/a/models/m/".parse().unwrap();
    assert_eq!(reference.model_id, "m");
  }

  #[test]
  fn too_few_segments_is_rejected() {
    let err = "https://host/models/modelZ".parse::<ModelReference>().unwrap_err();
    assert_eq!(err, ModelUrlError::NotEnoughSegments { found: 2 });
  }

  #[test]
  fn unparsable_url_is_rejected() {
    let err = "not a url".parse::<ModelReference>().unwrap_err();
    assert!(matches!(err, ModelUrlError::Parse(_)));
  }

  #[test]
  fn url_without_path_is_rejected() {
    let err = "mailto:someone@example.com".parse::<ModelReference>().unwrap_err();
    assert_eq!(err, ModelUrlError::NoPath);
  }
}
