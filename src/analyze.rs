// 该文件是 Kanjian （看见） 项目的一部分。
// src/analyze.rs - 图像分析
//
// 本文件根据 Apache 许可证第 2.0 版（以下简称“许可证”）授权使用；
// 除非遵守该许可证条款，否则您不得使用本文件。
// 您可通过以下网址获取许可证副本：
// http://www.apache.org/licenses/LICENSE-2.0
// 除非适用法律要求或书面同意，根据本许可协议分发的软件均按“原样”提供，
// 不附带任何形式的明示或暗示的保证或条件。
// 有关许可权限与限制的具体条款，请参阅本许可协议。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, Wareless Group

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};
use url::Url;

use crate::{
  FromUrl,
  model::{DetectionReport, Model, ModelReference, ModelUrlError, PredictRequest},
};

/// 未配置的 PAT 占位值
pub const PLACEHOLDER_PAT: &str = "TU_PAT_DE_CLARIFAI_AQUI";

/// 缺省的 Clarifai 人脸检测模型
pub const DEFAULT_MODEL_URL: &str = "https://clarifai.com/clarifai/main/models/face-detection?inputId=https%3A%2F%2Fs3.amazonaws.com%2Fsamples.clarifai.com%2Ffeatured-models%2Fface-family-with-light-blue-shirts.jpg";

/// 分析阶段的配置
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
  /// Clarifai Personal Access Token
  pub pat: String,
  pub model_url: Url,
}

impl AnalyzerConfig {
  pub fn new(pat: impl Into<String>, model_url: Url) -> Self {
    Self {
      pat: pat.into(),
      model_url,
    }
  }

  /// PAT 为空或仍是占位值
  pub fn is_placeholder(&self) -> bool {
    let pat = self.pat.trim();
    pat.is_empty() || pat == PLACEHOLDER_PAT
  }
}

#[derive(Error, Debug)]
pub enum AnalysisError {
  #[error("Error: no image path was provided for analysis.")]
  MissingImage,
  #[error("Error: the Clarifai PAT has not been configured.")]
  PlaceholderCredential,
  #[error(
    "Error: MODEL_URL is not valid ({0}); it must look like 'https://clarifai.com/USER_ID/APP_ID/models/MODEL_ID'"
  )]
  ModelUrl(#[from] ModelUrlError),
  #[error("Error: could not read image {path}: {source}")]
  ReadImage {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
  #[error("Clarifai prediction error: {description} (code: {code})")]
  Status { code: u32, description: String },
  #[error("Unexpected error while analyzing with Clarifai: {0}")]
  Service(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// 图像分析器
pub struct Analyzer<M> {
  config: AnalyzerConfig,
  model: M,
}

impl<M: Model> Analyzer<M> {
  pub fn new(config: AnalyzerConfig, model: M) -> Self {
    Self { config, model }
  }

  pub fn config(&self) -> &AnalyzerConfig {
    &self.config
  }

  pub fn model(&self) -> &M {
    &self.model
  }

  /// 分析图像，任何错误都转为可读文本
  pub fn analyze(&self, image: Option<&Path>) -> String {
    match self.try_analyze(image) {
      Ok(report) => report.to_string(),
      Err(e) => {
        warn!("分析失败: {}", e);
        e.to_string()
      }
    }
  }

  pub fn try_analyze(&self, image: Option<&Path>) -> Result<DetectionReport, AnalysisError> {
    let path = image.ok_or(AnalysisError::MissingImage)?;
    info!("使用 Clarifai 分析本地图像: {}", path.display());

    if self.config.is_placeholder() {
      return Err(AnalysisError::PlaceholderCredential);
    }

    let reference = ModelReference::from_url(&self.config.model_url)?;
    info!("模型: {}", reference);

    let bytes = std::fs::read(path).map_err(|source| AnalysisError::ReadImage {
      path: path.to_path_buf(),
      source,
    })?;

    let request = PredictRequest {
      credential: &self.config.pat,
      model: &reference,
      image: &bytes,
    };
    let response = self
      .model
      .infer(&request)
      .map_err(|e| AnalysisError::Service(Box::new(e)))?;

    if !response.status.is_success() {
      warn!(
        "Clarifai API 错误: {} (代码: {})",
        response.status.description, response.status.code
      );
      return Err(AnalysisError::Status {
        code: response.status.code,
        description: response.status.description,
      });
    }

    Ok(DetectionReport::from_outputs(&response.outputs))
  }
}
