// 该文件是 Kanjian （看见） 项目的一部分。
// src/model/detection.rs - 识别结果解读
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use std::fmt;

use tracing::{debug, info};

use super::{Concept, Output};

/// 区域级结果中表示人的关键词
const REGION_PERSON_KEYWORDS: &[&str] = &["face", "person"];
/// 整图概念中表示人的关键词
const GENERAL_PERSON_KEYWORDS: &[&str] = &["person", "people", "face"];

pub const NO_CLEAR_RESULTS: &str = "Analysis returned no clear results.";
pub const PERSON_DETECTED: &str = "PERSON DETECTED (Clarifai)!";
pub const NO_PERSON_DETECTED: &str = "No person detected (Clarifai).";

/// 单个输出的检测内容
#[derive(Debug, Clone, PartialEq)]
pub enum OutputDetections<'a> {
  /// 每个区域各自的概念列表
  Regions(Vec<&'a [Concept]>),
  /// 整图概念
  Concepts(&'a [Concept]),
  Empty,
}

impl<'a> From<&'a Output> for OutputDetections<'a> {
  fn from(output: &'a Output) -> Self {
    match &output.data {
      Some(data) if !data.regions.is_empty() => OutputDetections::Regions(
        data
          .regions
          .iter()
          .map(|region| {
            region
              .data
              .as_ref()
              .map(|d| d.concepts.as_slice())
              .unwrap_or_default()
          })
          .collect(),
      ),
      Some(data) if !data.concepts.is_empty() => OutputDetections::Concepts(&data.concepts),
      _ => OutputDetections::Empty,
    }
  }
}

impl OutputDetections<'_> {
  fn keywords(&self) -> &'static [&'static str] {
    match self {
      OutputDetections::Regions(_) => REGION_PERSON_KEYWORDS,
      _ => GENERAL_PERSON_KEYWORDS,
    }
  }
}

fn describe(concept: &Concept) -> String {
  format!("{} (confidence: {:.2})", concept.name, concept.value)
}

fn mentions_person(concept: &Concept, keywords: &[&str]) -> bool {
  let name = concept.name.to_lowercase();
  keywords.iter().any(|keyword| name.contains(keyword))
}

/// 检测报告
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetectionReport {
  pub person_detected: bool,
  /// 每个区域或每个整图概念一行
  pub items: Vec<String>,
}

impl DetectionReport {
  pub fn from_outputs(outputs: &[Output]) -> Self {
    let mut report = DetectionReport::default();
    for output in outputs {
      report.push(OutputDetections::from(output));
    }
    report
  }

  pub fn push(&mut self, detections: OutputDetections<'_>) {
    let keywords = detections.keywords();
    let mut flag = |concept: &Concept| {
      if mentions_person(concept, keywords) {
        self.person_detected = true;
      }
      describe(concept)
    };

    let items: Vec<String> = match &detections {
      OutputDetections::Regions(regions) => {
        info!("检测到 {} 个区域", regions.len());
        regions
          .iter()
          .enumerate()
          .filter(|(_, concepts)| !concepts.is_empty())
          .map(|(index, concepts)| {
            let described: Vec<String> = concepts.iter().map(&mut flag).collect();
            format!("Region {}: {}", index + 1, described.join(", "))
          })
          .collect()
      }
      OutputDetections::Concepts(concepts) => {
        info!("检测到 {} 个整图概念", concepts.len());
        concepts
          .iter()
          .map(|concept| format!("General: {}", flag(concept)))
          .collect()
      }
      OutputDetections::Empty => Vec::new(),
    };

    debug!("本输出条目: {:?}", items);
    self.items.extend(items);
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }
}

impl fmt::Display for DetectionReport {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.items.is_empty() {
      return f.write_str(NO_CLEAR_RESULTS);
    }

    let header = if self.person_detected {
      PERSON_DETECTED
    } else {
      NO_PERSON_DETECTED
    };
    f.write_str(header)?;
    for item in &self.items {
      write!(f, "\n  - {}", item)?;
    }
    Ok(())
  }
}
