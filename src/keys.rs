// 该文件是 Kanjian （看见） 项目的一部分。
// src/keys.rs - 终端按键输入
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

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use thiserror::Error;
use tracing::{debug, warn};

/// 采集循环每轮按键轮询后的动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureAction {
  /// 保存当前帧
  Confirm,
  /// 放弃采集
  Cancel,
  /// 继续预览
  Continue,
}

#[derive(Error, Debug)]
pub enum KeyError {
  #[error("failed to switch terminal mode: {0}")]
  Terminal(#[source] std::io::Error),
  #[error("failed to read key event: {0}")]
  Read(#[source] std::io::Error),
}

/// 按键来源
pub trait KeySource {
  type Error;

  /// 至多等待 `timeout`，没有按键时返回 [`CaptureAction::Continue`]
  fn poll_action(&mut self, timeout: Duration) -> Result<CaptureAction, Self::Error>;
}

/// 空格保存，Esc / q / Ctrl-C 取消
pub fn action_for(key: &KeyEvent) -> CaptureAction {
  if key.kind != KeyEventKind::Press {
    return CaptureAction::Continue;
  }

  match key.code {
    KeyCode::Char(' ') => CaptureAction::Confirm,
    KeyCode::Esc | KeyCode::Char('q') => CaptureAction::Cancel,
    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => CaptureAction::Cancel,
    _ => CaptureAction::Continue,
  }
}

/// 终端键盘，存活期间终端处于 raw 模式
///
/// raw 模式下换行不回到行首，此时输出到终端的 `tracing` 日志会错位。
/// 采集结束时应先释放该值再输出日志。
pub struct TerminalKeys {
  _private: (),
}

impl TerminalKeys {
  pub fn new() -> Result<Self, KeyError> {
    enable_raw_mode().map_err(KeyError::Terminal)?;
    debug!("终端进入 raw 模式");
    Ok(Self { _private: () })
  }
}

impl Drop for TerminalKeys {
  fn drop(&mut self) {
    if let Err(e) = disable_raw_mode() {
      warn!("无法恢复终端模式: {}", e);
    }
  }
}

impl KeySource for TerminalKeys {
  type Error = KeyError;

  fn poll_action(&mut self, timeout: Duration) -> Result<CaptureAction, Self::Error> {
    if !event::poll(timeout).map_err(KeyError::Read)? {
      return Ok(CaptureAction::Continue);
    }

    match event::read().map_err(KeyError::Read)? {
      Event::Key(key) => {
        let action = action_for(&key);
        debug!("按键 {:?} -> {:?}", key.code, action);
        Ok(action)
      }
      _ => Ok(CaptureAction::Continue),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
    KeyEvent::new(code, modifiers)
  }

  #[test]
  fn space_confirms() {
    let key = press(KeyCode::Char(' '), KeyModifiers::NONE);
    assert_eq!(action_for(&key), CaptureAction::Confirm);
  }

  #[test]
  fn escape_q_and_ctrl_c_cancel() {
    assert_eq!(
      action_for(&press(KeyCode::Esc, KeyModifiers::NONE)),
      CaptureAction::Cancel
    );
    assert_eq!(
      action_for(&press(KeyCode::Char('q'), KeyModifiers::NONE)),
      CaptureAction::Cancel
    );
    assert_eq!(
      action_for(&press(KeyCode::Char('c'), KeyModifiers::CONTROL)),
      CaptureAction::Cancel
    );
  }

  #[test]
  fn other_keys_continue() {
    assert_eq!(
      action_for(&press(KeyCode::Char('c'), KeyModifiers::NONE)),
      CaptureAction::Continue
    );
    assert_eq!(
      action_for(&press(KeyCode::Enter, KeyModifiers::NONE)),
      CaptureAction::Continue
    );
  }

  #[test]
  fn key_release_is_ignored() {
    let key = KeyEvent::new_with_kind(KeyCode::Char(' '), KeyModifiers::NONE, KeyEventKind::Release);
    assert_eq!(action_for(&key), CaptureAction::Continue);
  }
}
