// 该文件是 Kanjian （看见） 项目的一部分。
// src/input/v4l_camera.rs - V4L2 摄像头输入源
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use std::pin::Pin;
use std::time::Instant;

use image::RgbImage;
use tracing::{debug, error, info};
use url::Url;
use v4l::FourCC;
use v4l::buffer::Type;
use v4l::io::mmap::Stream;
use v4l::io::traits::CaptureStream;
use v4l::prelude::*;
use v4l::video::Capture;

use super::{CameraError, DEFAULT_DEVICE, InputSource};
use crate::{FromUrl, FromUrlWithScheme, frame::Frame, frame::yuyv_to_rgb};

const CAPTURE_WIDTH: u32 = 640;
const CAPTURE_HEIGHT: u32 = 480;
const CAPTURE_BUFFERS: u32 = 4;

/// V4L2 摄像头输入源
///
/// Stream 需要引用 Device，因此 Device 放在 Pin<Box> 中保证地址稳定，
/// 再由同一结构体持有引用它的 Stream。
pub struct V4lCamera {
  /// 设备路径
  path: String,
  /// V4L2 设备（使用 Pin<Box> 固定内存位置）
  device: Pin<Box<Device>>,
  /// 捕获流（生命周期与 device 关联）
  stream: Option<Stream<'static>>,
  frame_index: u64,
  width: u32,
  height: u32,
  start_time: Instant,
}

impl FromUrlWithScheme for V4lCamera {
  const SCHEME: &'static str = "v4l";
}

impl FromUrl for V4lCamera {
  type Error = CameraError;

  /// 支持 `v4l:///dev/video0`，路径为空时使用默认设备
  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      error!(
        "URI scheme mismatch: expected '{}', found '{}'",
        Self::SCHEME,
        url.scheme()
      );
      return Err(CameraError::SchemeMismatch {
        expected: Self::SCHEME,
        found: url.scheme().to_string(),
      });
    }

    let path = match url.path() {
      "" | "/" => DEFAULT_DEVICE,
      path => path,
    };
    Self::open(path)
  }
}

impl V4lCamera {
  /// 打开摄像头并协商 YUYV 640x480 格式
  pub fn open(path: &str) -> Result<Self, CameraError> {
    info!("打开摄像头设备: {}", path);
    let device = Box::pin(Device::with_path(path).map_err(|source| CameraError::Open {
      path: path.to_string(),
      source,
    })?);

    let mut format = device.format().map_err(CameraError::Format)?;
    format.width = CAPTURE_WIDTH;
    format.height = CAPTURE_HEIGHT;
    format.fourcc = FourCC::new(b"YUYV");
    let format = device.set_format(&format).map_err(CameraError::Format)?;

    if format.fourcc != FourCC::new(b"YUYV") {
      return Err(CameraError::UnsupportedFormat(format.fourcc.to_string()));
    }
    info!("摄像头格式: {}x{} {}", format.width, format.height, format.fourcc);

    let mut camera = Self {
      path: path.to_string(),
      device,
      stream: None,
      frame_index: 0,
      width: format.width,
      height: format.height,
      start_time: Instant::now(),
    };

    // SAFETY: device 被 Pin<Box> 固定在堆上不会移动；
    // stream 在 Drop 中先于 device 释放
    let device_ref: &Device = &camera.device;
    let stream = unsafe {
      let device_static: &'static Device = std::mem::transmute(device_ref);
      Stream::with_buffers(device_static, Type::VideoCapture, CAPTURE_BUFFERS)
        .map_err(CameraError::Stream)?
    };
    camera.stream = Some(stream);

    Ok(camera)
  }

  pub fn path(&self) -> &str {
    &self.path
  }

  fn capture(&mut self) -> Option<Result<Frame, CameraError>> {
    let stream = self.stream.as_mut()?;

    let buffer = match stream.next() {
      Ok((buffer, _meta)) => buffer,
      Err(e) => return Some(Err(CameraError::Capture(e))),
    };

    let rgb = yuyv_to_rgb(buffer, self.width, self.height);
    let Some(image) = RgbImage::from_raw(self.width, self.height, rgb) else {
      return Some(Err(CameraError::InvalidFrame {
        width: self.width,
        height: self.height,
      }));
    };

    let frame = Frame::new(
      image,
      self.frame_index,
      self.start_time.elapsed().as_millis() as u64,
    );
    self.frame_index += 1;
    Some(Ok(frame))
  }
}

impl Drop for V4lCamera {
  fn drop(&mut self) {
    // 确保 stream 在 device 之前被 drop
    self.stream.take();
    debug!("摄像头已释放: {} (共 {} 帧)", self.path, self.frame_index);
  }
}

impl Iterator for V4lCamera {
  type Item = Result<Frame, CameraError>;

  fn next(&mut self) -> Option<Self::Item> {
    self.capture()
  }
}

impl InputSource for V4lCamera {
  fn width(&self) -> u32 {
    self.width
  }

  fn height(&self) -> u32 {
    self.height
  }
}
