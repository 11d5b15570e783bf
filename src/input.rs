// 该文件是 Kanjian （看见） 项目的一部分。
// src/input.rs - 摄像头输入
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

use thiserror::Error;

use crate::frame::Frame;

mod v4l_camera;
pub use self::v4l_camera::V4lCamera;

/// 默认摄像头设备
pub const DEFAULT_DEVICE: &str = "/dev/video0";

#[derive(Error, Debug)]
pub enum CameraError {
  #[error("URI scheme mismatch: expected '{expected}', found '{found}'")]
  SchemeMismatch { expected: &'static str, found: String },
  #[error("failed to open camera device {path}: {source}")]
  Open {
    path: String,
    #[source]
    source: std::io::Error,
  },
  #[error("failed to negotiate camera format: {0}")]
  Format(#[source] std::io::Error),
  #[error("unsupported pixel format: {0}")]
  UnsupportedFormat(String),
  #[error("failed to create capture stream: {0}")]
  Stream(#[source] std::io::Error),
  #[error("failed to capture frame: {0}")]
  Capture(#[source] std::io::Error),
  #[error("captured buffer does not match {width}x{height}")]
  InvalidFrame { width: u32, height: u32 },
}

/// 帧输入源
///
/// 迭代器每次产出一帧；返回 `None` 表示输入源已经结束，
/// 调用方应将其视为读帧失败。
pub trait InputSource: Iterator<Item = Result<Frame, CameraError>> {
  /// 获取帧宽度
  fn width(&self) -> u32;

  /// 获取帧高度
  fn height(&self) -> u32;
}
