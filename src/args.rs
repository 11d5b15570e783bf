// 该文件是 Kanjian （看见） 项目的一部分。
// src/args.rs - 项目参数配置
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use std::path::PathBuf;

use clap::Parser;
use url::Url;

use kanjian::analyze::{DEFAULT_MODEL_URL, PLACEHOLDER_PAT};
use kanjian::model::DEFAULT_API_BASE;
use kanjian::output::DEFAULT_SNAPSHOT_PATH;

/// Kanjian 项目参数配置
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// 摄像头设备，例如 v4l:///dev/video0
  #[arg(long, value_name = "DEVICE", default_value = "v4l:///dev/video0")]
  pub device: Url,

  /// 预览窗口
  /// 支持:
  /// - gst://autovideosink (或其他 GStreamer 视频 sink)
  /// - headless:// 不显示窗口
  #[arg(long, value_name = "PREVIEW", default_value = "gst://autovideosink")]
  pub preview: Url,

  /// 快照保存路径，扩展名决定图像格式
  #[arg(long, value_name = "FILE", default_value = DEFAULT_SNAPSHOT_PATH)]
  pub output: PathBuf,

  /// Clarifai Personal Access Token
  #[arg(long, env = "CLARIFAI_PAT", default_value = PLACEHOLDER_PAT, hide_default_value = true)]
  pub pat: String,

  /// 模型 URL: https://clarifai.com/USER_ID/APP_ID/models/MODEL_ID
  #[arg(long, value_name = "URL", default_value = DEFAULT_MODEL_URL)]
  pub model_url: Url,

  /// Clarifai API 地址
  #[arg(long, value_name = "URL", default_value = DEFAULT_API_BASE)]
  pub api_base: Url,

  /// 每帧等待按键的时间（毫秒）
  #[arg(long, value_name = "MILLIS", default_value_t = 1)]
  pub poll_ms: u64,

  /// 请求超时（秒），不设置时使用 HTTP 客户端默认值
  #[arg(long, value_name = "SECONDS")]
  pub timeout_secs: Option<u64>,
}
