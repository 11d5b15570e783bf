// 该文件是 Kanjian （看见） 项目的一部分。
// src/task.rs - 采集与分析任务
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

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use tracing::{error, info, warn};

use crate::{
  analyze::Analyzer,
  frame::Frame,
  input::{CameraError, InputSource},
  keys::{CaptureAction, KeySource},
  model::Model,
  output::{Preview, SaveImageFileError, SnapshotWriter},
};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub trait Task<I, P, K>: Sized {
  type Output;
  type Error;
  fn run_task(self, input: I, preview: P, keys: K) -> Result<Self::Output, Self::Error>;
}

#[derive(Error, Debug)]
pub enum CaptureError {
  #[error("could not read an initial frame from the camera: {0}")]
  InitialFrame(#[source] CameraError),
  #[error("camera stream ended")]
  StreamEnded,
  #[error("error reading frame from the camera: {0}")]
  FrameRead(#[source] CameraError),
  #[error("preview failed: {0}")]
  Preview(#[source] BoxError),
  #[error("keyboard failed: {0}")]
  Keys(#[source] BoxError),
  #[error("error saving the image: {0}")]
  Save(#[from] SaveImageFileError),
}

/// 采集结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
  Saved(PathBuf),
  Cancelled,
}

/// 预览摄像头画面，按确认键保存当前帧，按取消键退出
///
/// 输入源、预览和按键在 `run_task` 内部被消费，
/// 无论以何种方式返回都只释放一次。
#[derive(Debug, Clone)]
pub struct CaptureTask {
  writer: SnapshotWriter,
  poll_timeout: Duration,
}

impl CaptureTask {
  pub fn new(writer: SnapshotWriter) -> Self {
    Self {
      writer,
      poll_timeout: Duration::from_millis(1),
    }
  }

  pub fn with_poll_timeout(mut self, poll_timeout: Duration) -> Self {
    self.poll_timeout = poll_timeout;
    self
  }

  /// 运行采集，失败与取消都返回 `None`
  pub fn capture<I, P, K>(self, input: I, preview: P, keys: K) -> Option<PathBuf>
  where
    Self: Task<I, P, K, Output = CaptureOutcome, Error = CaptureError>,
  {
    match self.run_task(input, preview, keys) {
      Ok(CaptureOutcome::Saved(path)) => Some(path),
      Ok(CaptureOutcome::Cancelled) => None,
      Err(e) => {
        error!("采集失败: {}", e);
        None
      }
    }
  }
}

fn next_frame<I>(input: &mut I) -> Result<Frame, CaptureError>
where
  I: InputSource,
{
  match input.next() {
    Some(Ok(frame)) => Ok(frame),
    Some(Err(e)) => Err(CaptureError::FrameRead(e)),
    None => Err(CaptureError::StreamEnded),
  }
}

impl<I, P, K, PE, KE> Task<I, P, K> for CaptureTask
where
  I: InputSource,
  P: Preview<Error = PE>,
  K: KeySource<Error = KE>,
  PE: std::error::Error + Send + Sync + 'static,
  KE: std::error::Error + Send + Sync + 'static,
{
  type Output = CaptureOutcome;
  type Error = CaptureError;

  fn run_task(self, mut input: I, mut preview: P, mut keys: K) -> Result<CaptureOutcome, CaptureError> {
    info!("开始采集 ({}x{})...", input.width(), input.height());

    let mut frame = match input.next() {
      Some(Ok(frame)) => frame,
      Some(Err(e)) => return Err(CaptureError::InitialFrame(e)),
      None => return Err(CaptureError::StreamEnded),
    };
    preview
      .show(&frame)
      .map_err(|e| CaptureError::Preview(Box::new(e)))?;

    loop {
      frame = next_frame(&mut input)?;
      preview
        .show(&frame)
        .map_err(|e| CaptureError::Preview(Box::new(e)))?;

      match keys
        .poll_action(self.poll_timeout)
        .map_err(|e| CaptureError::Keys(Box::new(e)))?
      {
        CaptureAction::Continue => continue,
        CaptureAction::Cancel => {
          drop(keys);
          info!("关闭摄像头，未拍照");
          return Ok(CaptureOutcome::Cancelled);
        }
        CaptureAction::Confirm => {
          // 先恢复终端再输出日志
          drop(keys);
          info!("保存第 {} 帧", frame.index);
          let path = self.writer.save(&frame)?;
          return Ok(CaptureOutcome::Saved(path));
        }
      }
    }
  }
}

pub const CONFIGURATION_REQUIRED: &str = "--------------------------------------------------
ATTENTION! CONFIGURATION REQUIRED:
1. Set your Clarifai Personal Access Token with --pat or CLARIFAI_PAT.
2. Make sure --model-url points to a valid Clarifai model.
--------------------------------------------------";

pub const NO_PHOTO: &str = "No photo was taken, or the capture was cancelled.";

/// 一次完整运行的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
  /// PAT 未配置，未采集也未请求服务
  ConfigurationRequired,
  /// 取消或采集失败
  NoPhoto,
  /// 分析报告（或错误描述）
  Analyzed(String),
}

impl fmt::Display for SessionOutcome {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      SessionOutcome::ConfigurationRequired => f.write_str(CONFIGURATION_REQUIRED),
      SessionOutcome::NoPhoto => f.write_str(NO_PHOTO),
      SessionOutcome::Analyzed(report) => write!(
        f,
        "\n========= FINAL RESULT (Clarifai) ==========\n{}\n=============================================",
        report
      ),
    }
  }
}

/// 配置检查 → 采集 → 分析
pub fn run_session<M, C>(analyzer: &Analyzer<M>, capture: C) -> SessionOutcome
where
  M: Model,
  C: FnOnce() -> Option<PathBuf>,
{
  if analyzer.config().is_placeholder() {
    warn!("Clarifai PAT 未配置，跳过采集");
    return SessionOutcome::ConfigurationRequired;
  }

  match capture() {
    Some(path) => SessionOutcome::Analyzed(analyzer.analyze(Some(&path))),
    None => SessionOutcome::NoPhoto,
  }
}
