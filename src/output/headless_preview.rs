// 该文件是 Kanjian （看见） 项目的一部分。
// src/output/headless_preview.rs - 无窗口预览
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use std::convert::Infallible;

use tracing::debug;

use crate::{FromUrl, FromUrlWithScheme, frame::Frame, output::Preview};

const LOG_EVERY_FRAMES: u64 = 30;

/// 没有显示设备时使用，只记录帧进度
#[derive(Debug, Default)]
pub struct HeadlessPreview {
  shown: u64,
}

impl HeadlessPreview {
  pub fn shown(&self) -> u64 {
    self.shown
  }
}

impl FromUrlWithScheme for HeadlessPreview {
  const SCHEME: &'static str = "headless";
}

impl FromUrl for HeadlessPreview {
  type Error = Infallible;

  fn from_url(_url: &url::Url) -> Result<Self, Self::Error> {
    Ok(Self::default())
  }
}

impl Preview for HeadlessPreview {
  type Error = Infallible;

  fn show(&mut self, frame: &Frame) -> Result<(), Self::Error> {
    self.shown += 1;
    if self.shown % LOG_EVERY_FRAMES == 1 {
      debug!(
        "预览第 {} 帧 ({}x{}, {}ms)",
        frame.index,
        frame.width(),
        frame.height(),
        frame.timestamp_ms
      );
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use image::RgbImage;

  #[test]
  fn counts_shown_frames() {
    let mut preview = HeadlessPreview::default();
    for index in 0..3 {
      let Ok(()) = preview.show(&Frame::new(RgbImage::new(2, 2), index, 0));
    }
    assert_eq!(preview.shown(), 3);
  }
}
