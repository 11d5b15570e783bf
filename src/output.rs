// 该文件是 Kanjian （看见） 项目的一部分。
// src/output.rs - 预览与快照输出定义
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use thiserror::Error;
use url::Url;

use crate::{FromUrl, FromUrlWithScheme, frame::Frame};

/// 预览窗口
pub trait Preview {
  type Error;
  fn show(&mut self, frame: &Frame) -> Result<(), Self::Error>;
}

mod save_image_file;
pub use self::save_image_file::{DEFAULT_SNAPSHOT_PATH, SaveImageFileError, SnapshotWriter};

mod headless_preview;
pub use self::headless_preview::HeadlessPreview;

#[cfg(feature = "gstreamer_preview")]
mod gstreamer_preview;
#[cfg(feature = "gstreamer_preview")]
pub use self::gstreamer_preview::{GStreamerPreview, GStreamerPreviewError};

#[derive(Error, Debug)]
pub enum PreviewError {
  #[cfg(feature = "gstreamer_preview")]
  #[error("GStreamer 预览错误: {0}")]
  GStreamerPreviewError(#[from] GStreamerPreviewError),
  #[error("URI 方案不匹配: {0}")]
  SchemeMismatch(String),
}

pub enum PreviewWrapper {
  #[cfg(feature = "gstreamer_preview")]
  GStreamerPreview(GStreamerPreview),
  HeadlessPreview(HeadlessPreview),
}

impl FromUrl for PreviewWrapper {
  type Error = PreviewError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    match url.scheme() {
      #[cfg(feature = "gstreamer_preview")]
      GStreamerPreview::SCHEME => {
        let preview = GStreamerPreview::from_url(url)?;
        Ok(PreviewWrapper::GStreamerPreview(preview))
      }
      HeadlessPreview::SCHEME => {
        let Ok(preview) = HeadlessPreview::from_url(url);
        Ok(PreviewWrapper::HeadlessPreview(preview))
      }
      scheme => Err(PreviewError::SchemeMismatch(scheme.to_string())),
    }
  }
}

impl Preview for PreviewWrapper {
  type Error = PreviewError;

  fn show(&mut self, frame: &Frame) -> Result<(), Self::Error> {
    match self {
      #[cfg(feature = "gstreamer_preview")]
      PreviewWrapper::GStreamerPreview(preview) => preview.show(frame).map_err(PreviewError::from),
      PreviewWrapper::HeadlessPreview(preview) => {
        let Ok(()) = preview.show(frame);
        Ok(())
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn headless_scheme_builds_headless_preview() {
    let url = Url::parse("headless://").unwrap();
    let preview = PreviewWrapper::from_url(&url).unwrap();
    assert!(matches!(preview, PreviewWrapper::HeadlessPreview(_)));
  }

  #[test]
  fn headless_preview_counts_shown_frames() {
    let url = Url::parse("headless://").unwrap();
    let mut preview = PreviewWrapper::from_url(&url).unwrap();
    let frame = Frame::new(image::RgbImage::new(2, 2), 0, 0);

    preview.show(&frame).unwrap();
    preview.show(&frame).unwrap();

    let PreviewWrapper::HeadlessPreview(headless) = &preview else {
      panic!("expected headless preview");
    };
    assert_eq!(headless.shown(), 2);
  }

  #[test]
  fn unknown_scheme_is_rejected() {
    let url = Url::parse("rtsp://camera.local/stream").unwrap();
    let err = PreviewWrapper::from_url(&url).err().unwrap();
    assert!(matches!(err, PreviewError::SchemeMismatch(ref s) if s == "rtsp"));
  }
}
