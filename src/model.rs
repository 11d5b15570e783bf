// 该文件是 Kanjian （看见） 项目的一部分。
// src/model.rs - 识别模型
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

/// 一次识别请求
#[derive(Debug, Clone, Copy)]
pub struct PredictRequest<'a> {
  /// Personal Access Token
  pub credential: &'a str,
  pub model: &'a ModelReference,
  /// 原始图像字节
  pub image: &'a [u8],
}

/// 远程识别模型
pub trait Model {
  type Error: std::error::Error + Send + Sync + 'static;

  fn infer(&self, request: &PredictRequest<'_>) -> Result<PostModelOutputsResponse, Self::Error>;
}

mod model_ref;
pub use self::model_ref::{ModelReference, ModelUrlError};

mod wire;
pub use self::wire::{
  Concept, Output, OutputData, PostModelOutputsResponse, Region, RegionData, STATUS_SUCCESS, Status,
};

mod detection;
pub use self::detection::{DetectionReport, OutputDetections};

mod clarifai;
pub use self::clarifai::{ClarifaiClient, ClarifaiClientBuilder, DEFAULT_API_BASE, ServiceError};
