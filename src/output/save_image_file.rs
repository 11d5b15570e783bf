// 该文件是 Kanjian （看见） 项目的一部分。
// src/output/save_image_file.rs - 保存快照图像文件
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
use tracing::info;
use url::Url;

use crate::{FromUrl, FromUrlWithScheme, frame::Frame};

/// 默认快照文件名，相对于当前工作目录
pub const DEFAULT_SNAPSHOT_PATH: &str = "foto_reto_clarifai.jpg";

#[derive(Error, Debug)]
pub enum SaveImageFileError {
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("图像错误: {0}")]
  ImageError(#[from] image::ImageError),
  #[error("URI 方案不匹配: {0}")]
  SchemeMismatch(String),
}

/// 将单帧编码后写入固定路径，图像格式由扩展名决定
#[derive(Debug, Clone)]
pub struct SnapshotWriter {
  path: PathBuf,
}

impl Default for SnapshotWriter {
  fn default() -> Self {
    Self::new(DEFAULT_SNAPSHOT_PATH)
  }
}

impl FromUrlWithScheme for SnapshotWriter {
  const SCHEME: &'static str = "image";
}

impl FromUrl for SnapshotWriter {
  type Error = SaveImageFileError;

  fn from_url(uri: &Url) -> Result<Self, Self::Error> {
    if uri.scheme() != Self::SCHEME {
      return Err(SaveImageFileError::SchemeMismatch(format!(
        "期望保存方式 '{}', 实际保存方式 '{}'",
        Self::SCHEME,
        uri.scheme()
      )));
    }

    Ok(Self::new(uri.path()))
  }
}

impl SnapshotWriter {
  pub fn new(path: impl AsRef<Path>) -> Self {
    Self {
      path: path.as_ref().to_path_buf(),
    }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  pub fn save(&self, frame: &Frame) -> Result<PathBuf, SaveImageFileError> {
    if let Some(parent) = self.path.parent()
      && !parent.as_os_str().is_empty()
    {
      std::fs::create_dir_all(parent)?;
    }

    frame.image.save(&self.path)?;
    info!("保存快照到文件: {}", self.path.display());

    Ok(self.path.clone())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use image::{Rgb, RgbImage};
  use tempfile::TempDir;

  fn frame() -> Frame {
    Frame::new(RgbImage::from_pixel(8, 6, Rgb([10, 200, 30])), 0, 0)
  }

  #[test]
  fn saves_jpeg_and_creates_parent_directories() {
    let tmp = TempDir::new().unwrap();
    let target = tmp.path().join("nested").join("snap.jpg");
    let writer = SnapshotWriter::new(&target);

    let saved = writer.save(&frame()).unwrap();

    assert_eq!(saved, target);
    let bytes = std::fs::read(&target).unwrap();
    // JPEG SOI 标记
    assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
  }

  #[test]
  fn unknown_extension_fails_without_writing() {
    let tmp = TempDir::new().unwrap();
    let target = tmp.path().join("snap.unknown");
    let writer = SnapshotWriter::new(&target);

    assert!(writer.save(&frame()).is_err());
    assert!(!target.exists());
  }

  #[test]
  fn from_url_requires_image_scheme() {
    let url = Url::parse("image:///tmp/snap.jpg").unwrap();
    let writer = SnapshotWriter::from_url(&url).unwrap();
    assert_eq!(writer.path(), Path::new("/tmp/snap.jpg"));

    let url = Url::parse("file:///tmp/snap.jpg").unwrap();
    assert!(matches!(
      SnapshotWriter::from_url(&url),
      Err(SaveImageFileError::SchemeMismatch(_))
    ));
  }
}
