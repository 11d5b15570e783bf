// 该文件是 Kanjian （看见） 项目的一部分。
// src/output/gstreamer_preview.rs - GStreamer 预览窗口
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

//! # GStreamer 预览窗口
//!
//! 把摄像头帧推送到 `appsrc ! videoconvert ! <sink>` 管道中显示。
//!
//! ## URL Scheme
//!
//! `gst://`，主机部分为显示 sink 的名称，缺省为 `autovideosink`。
//!
//! ```no_run
//! use kanjian::{FromUrl, output::GStreamerPreview};
//! use url::Url;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let url = Url::parse("gst://ximagesink?fps=15")?;
//! let preview = GStreamerPreview::from_url(&url)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## 参数说明
//!
//! - `fps`: 时间戳使用的帧率，默认 30

use gstreamer::{self as gst, prelude::*};
use gstreamer_app as gst_app;
use gstreamer_video as gst_video;
use thiserror::Error;
use tracing::{error, info, warn};
use url::Url;

use crate::{FromUrl, FromUrlWithScheme, frame::Frame, output::Preview};

const DEFAULT_SINK: &str = "autovideosink";
const DEFAULT_FPS: i32 = 30;

/// GStreamer 预览错误类型
#[derive(Error, Debug)]
pub enum GStreamerPreviewError {
  /// URI scheme 不匹配
  #[error("URI scheme mismatch")]
  SchemeMismatch,
  /// GStreamer 库错误
  #[error("GStreamer error: {0}")]
  GStreamerError(#[from] gst::glib::Error),
  /// GStreamer 布尔操作错误
  #[error("GStreamer boolean error: {0}")]
  GStreamerBoolError(#[from] gst::glib::BoolError),
  /// 无法获取 appsrc 元素
  #[error("Failed to get appsrc element")]
  AppSrcNotFound,
  /// 无法转换元素为 appsrc
  #[error("Failed to convert element to appsrc")]
  AppSrcConversionFailed,
  /// 管道错误
  #[error("Pipeline error: {0}")]
  PipelineError(String),
  /// 状态改变错误
  #[error("State change error: {0}")]
  StateChangeError(#[from] gst::StateChangeError),
  /// 帧大小与协商的格式不一致
  #[error("Frame size mismatch: expected {expected} bytes, got {actual} bytes")]
  FrameSizeMismatch { expected: usize, actual: usize },
}

/// GStreamer 预览窗口
///
/// 管道在构造时启动，caps 在第一帧到达时按帧尺寸协商。
pub struct GStreamerPreview {
  pipeline: gst::Pipeline,
  appsrc: gst_app::AppSrc,
  fps: i32,
  video_info: Option<gst_video::VideoInfo>,
  frame_count: u64,
}

impl FromUrlWithScheme for GStreamerPreview {
  const SCHEME: &'static str = "gst";
}

impl FromUrl for GStreamerPreview {
  type Error = GStreamerPreviewError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      error!(
        "URI scheme mismatch: expected '{}', found '{}'",
        Self::SCHEME,
        url.scheme()
      );
      return Err(GStreamerPreviewError::SchemeMismatch);
    }

    // 重复调用 gst::init 是安全的
    gst::init()?;

    let sink = url
      .host_str()
      .filter(|host| !host.is_empty())
      .unwrap_or(DEFAULT_SINK);
    let fps = url
      .query_pairs()
      .find(|(k, _)| k == "fps")
      .and_then(|(_, v)| v.parse::<i32>().ok())
      .filter(|fps| *fps > 0)
      .unwrap_or(DEFAULT_FPS);

    let pipeline_desc = format!("appsrc name=src ! videoconvert ! {} sync=false", sink);
    info!("创建预览管道: {}", pipeline_desc);

    let pipeline = gst::parse::launch(&pipeline_desc)?
      .downcast::<gst::Pipeline>()
      .map_err(|_| GStreamerPreviewError::PipelineError("Failed to create pipeline".to_string()))?;

    let appsrc = pipeline
      .by_name("src")
      .ok_or(GStreamerPreviewError::AppSrcNotFound)?
      .downcast::<gst_app::AppSrc>()
      .map_err(|_| GStreamerPreviewError::AppSrcConversionFailed)?;

    appsrc.set_format(gst::Format::Time);
    appsrc.set_property("is-live", true);

    pipeline.set_state(gst::State::Playing)?;

    Ok(GStreamerPreview {
      pipeline,
      appsrc,
      fps,
      video_info: None,
      frame_count: 0,
    })
  }
}

impl GStreamerPreview {
  fn negotiate(&mut self, frame: &Frame) -> Result<usize, GStreamerPreviewError> {
    if let Some(video_info) = &self.video_info
      && video_info.width() == frame.width()
      && video_info.height() == frame.height()
    {
      return Ok(video_info.size());
    }

    let video_info =
      gst_video::VideoInfo::builder(gst_video::VideoFormat::Rgb, frame.width(), frame.height())
        .fps(gst::Fraction::new(self.fps, 1))
        .build()?;
    self.appsrc.set_caps(Some(&video_info.to_caps()?));
    info!(
      "预览格式: {}x{} @ {} fps",
      frame.width(),
      frame.height(),
      self.fps
    );

    let size = video_info.size();
    self.video_info = Some(video_info);
    Ok(size)
  }

  fn push_frame(&mut self, data: &[u8]) -> Result<(), GStreamerPreviewError> {
    let timestamp = self.frame_count * 1_000_000_000 / self.fps as u64;
    self.frame_count += 1;

    let mut buffer = gst::Buffer::from_mut_slice(data.to_vec());
    if let Some(buffer_ref) = buffer.get_mut() {
      buffer_ref.set_pts(gst::ClockTime::from_nseconds(timestamp));
      buffer_ref.set_duration(gst::ClockTime::from_nseconds(
        1_000_000_000 / self.fps as u64,
      ));
    }

    self.appsrc.push_buffer(buffer).map_err(|e| {
      GStreamerPreviewError::PipelineError(format!("Failed to push buffer: {:?}", e))
    })?;

    Ok(())
  }
}

impl Preview for GStreamerPreview {
  type Error = GStreamerPreviewError;

  fn show(&mut self, frame: &Frame) -> Result<(), Self::Error> {
    let expected = self.negotiate(frame)?;
    let data = frame.as_nhwc();
    if data.len() != expected {
      return Err(GStreamerPreviewError::FrameSizeMismatch {
        expected,
        actual: data.len(),
      });
    }
    self.push_frame(data)
  }
}

impl Drop for GStreamerPreview {
  fn drop(&mut self) {
    let _ = self.appsrc.end_of_stream();

    if let Err(e) = self.pipeline.set_state(gst::State::Null) {
      warn!("Failed to stop GStreamer preview pipeline: {}", e);
    }

    info!("预览窗口已关闭，共显示 {} 帧", self.frame_count);
  }
}
