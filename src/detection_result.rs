//! 物体検出の結果を処理するモジュール

use std::fmt;

use anyhow::{ensure, Result};

use crate::model_config::LABELS;

/// 検出結果を保持するための構造体
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionData {
    /// クラスID
    pub class: u8,
    /// クラスラベル
    pub label: &'static str,
    /// バウンディングボックス左上のx
    pub x: f32,
    /// バウンディングボックス左上のy
    pub y: f32,
    /// バウンディングボックスの幅
    pub width: f32,
    /// バウンディングボックスの高さ
    pub height: f32,
    /// コンフィデンス (物体確率 * クラス確率)
    pub confidence: f32,
}

impl DetectionData {
    /// 新しいDetectionDataを作成します。
    ///
    /// # Args
    ///
    /// * `class` - クラスID
    /// * `x`, `y` - バウンディングボックス左上の座標
    /// * `width`, `height` - バウンディングボックスのサイズ
    /// * `confidence` - コンフィデンス
    ///
    /// # Return
    /// * 新たなDetectionDataインスタンス
    pub fn new(
        class: u8,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        confidence: f32,
    ) -> Result<Self> {
        ensure!((class as usize) < LABELS.len(), "class id out of range: {}", class);
        Ok(Self {
            class,
            label: LABELS[class as usize],
            x,
            y,
            width,
            height,
            confidence,
        })
    }

    /// 中心座標とサイズからDetectionDataを作成します。
    pub(crate) fn from_center(
        class: usize,
        cx: f32,
        cy: f32,
        width: f32,
        height: f32,
        confidence: f32,
    ) -> Self {
        Self {
            class: class as u8,
            label: LABELS[class],
            x: cx - width / 2.,
            y: cy - height / 2.,
            width,
            height,
            confidence,
        }
    }

    /// バウンディングボックス右下のx
    pub fn x2(&self) -> f32 {
        self.x + self.width
    }

    /// バウンディングボックス右下のy
    pub fn y2(&self) -> f32 {
        self.y + self.height
    }

    /// バウンディングボックスの面積
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// 座標をフレームサイズで割り、0〜1 に正規化したDetectionDataを返します。
    ///
    /// # Args
    ///
    /// * `frame_width` - フレームの幅
    /// * `frame_height` - フレームの高さ
    ///
    /// # Return
    /// * 新たなDetectionDataインスタンス
    pub fn normalize(&self, frame_width: u32, frame_height: u32) -> Self {
        let fw = frame_width as f32;
        let fh = frame_height as f32;
        Self {
            x: self.x / fw,
            y: self.y / fh,
            width: self.width / fw,
            height: self.height / fh,
            ..*self
        }
    }
}

impl fmt::Display for DetectionData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Label: {}, X: {}, Y: {}, Height: {}, Width: {}, Confidence: {}",
            self.label, self.x, self.y, self.height, self.width, self.confidence
        )
    }
}

/// コンフィデンスの昇順に並べ替えた検出結果を返します (描画順)。
///
/// 同じコンフィデンスの要素は元の順序を保ちます。
pub fn sort_by_confidence(d_result: &[DetectionData]) -> Vec<DetectionData> {
    let mut sorted = d_result.to_vec();
    sorted.sort_by(|a, b| a.confidence.total_cmp(&b.confidence));
    sorted
}
