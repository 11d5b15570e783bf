// 该文件是 Kanjian （看见） 项目的一部分。
// src/main.rs - 项目主程序
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

mod args;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use kanjian::{
  FromUrl,
  analyze::{Analyzer, AnalyzerConfig},
  input::V4lCamera,
  keys::TerminalKeys,
  model::ClarifaiClient,
  output::{PreviewWrapper, SnapshotWriter},
  task::{CaptureTask, run_session},
};

fn capture_snapshot(args: &args::Args) -> Option<PathBuf> {
  let camera = match V4lCamera::from_url(&args.device) {
    Ok(camera) => camera,
    Err(e) => {
      error!("无法打开摄像头: {}", e);
      return None;
    }
  };
  info!("摄像头已打开: {}", camera.path());

  let preview = match PreviewWrapper::from_url(&args.preview) {
    Ok(preview) => preview,
    Err(e) => {
      error!("无法创建预览窗口: {}", e);
      return None;
    }
  };

  println!("Camera open. Press SPACE to take the photo, or ESC to quit.");
  let keys = match TerminalKeys::new() {
    Ok(keys) => keys,
    Err(e) => {
      error!("无法读取键盘: {}", e);
      return None;
    }
  };

  CaptureTask::new(SnapshotWriter::new(&args.output))
    .with_poll_timeout(Duration::from_millis(args.poll_ms))
    .capture(camera, preview, keys)
}

fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let args = args::Args::parse();

  println!("Kanjian: person detection with Clarifai");
  info!("摄像头: {}", args.device);
  info!("预览: {}", args.preview);
  info!("快照路径: {}", args.output.display());
  info!("模型 URL: {}", args.model_url);

  let client = ClarifaiClient::builder(args.api_base.clone())
    .timeout(args.timeout_secs.map(Duration::from_secs))
    .build()?;
  let config = AnalyzerConfig::new(args.pat.clone(), args.model_url.clone());
  let analyzer = Analyzer::new(config, client);

  let outcome = run_session(&analyzer, || capture_snapshot(&args));
  println!("{}", outcome);

  Ok(())
}
