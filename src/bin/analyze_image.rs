// 该文件是 Kanjian （看见） 项目的一部分。
// src/bin/analyze_image.rs - 分析已有图像文件
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use url::Url;

use kanjian::{
  analyze::{Analyzer, AnalyzerConfig, DEFAULT_MODEL_URL, PLACEHOLDER_PAT},
  model::{ClarifaiClient, DEFAULT_API_BASE},
  task::run_session,
};
use tracing::info;

/// 跳过摄像头，直接分析图像文件
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// 图像文件路径
  #[arg(value_name = "IMAGE")]
  pub image: PathBuf,
  /// Clarifai Personal Access Token
  #[arg(long, env = "CLARIFAI_PAT", default_value = PLACEHOLDER_PAT, hide_default_value = true)]
  pub pat: String,
  /// 模型 URL
  #[arg(long, value_name = "URL", default_value = DEFAULT_MODEL_URL)]
  pub model_url: Url,
  /// Clarifai API 地址
  #[arg(long, value_name = "URL", default_value = DEFAULT_API_BASE)]
  pub api_base: Url,
  /// 请求超时（秒）
  #[arg(long, value_name = "SECONDS")]
  pub timeout_secs: Option<u64>,
}

fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let args = Args::parse();

  info!("图像文件: {}", args.image.display());
  info!("模型 URL: {}", args.model_url);

  let client = ClarifaiClient::builder(args.api_base)
    .timeout(args.timeout_secs.map(Duration::from_secs))
    .build()?;
  let analyzer = Analyzer::new(AnalyzerConfig::new(args.pat, args.model_url), client);

  let image = args.image;
  println!("{}", run_session(&analyzer, move || Some(image)));

  Ok(())
}
