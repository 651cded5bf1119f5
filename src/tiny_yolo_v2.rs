//! Tiny-YOLO-v2 の後処理 (デコード + NMS) をまとめて実行するモジュール

use anyhow::{ensure, Result};
use log::info;

use crate::detection_result::DetectionData;
use crate::nms;
use crate::postprocess;

/// 物体検出の閾値の既定値
pub const DEFAULT_OBJ_THRESHOLD: f32 = 0.3;
/// NMSの閾値の既定値
pub const DEFAULT_NMS_THRESHOLD: f32 = 0.8;
/// 検出結果の最大数の既定値
pub const DEFAULT_LIMIT: usize = 5;

/// Tiny-YOLO-v2 の後処理の設定を保持する構造体
///
/// 呼び出し間で状態を持たないので、複数スレッドから共有できます。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TinyYoloV2 {
    obj_threshold: f32,
    nms_threshold: f32,
    limit: usize,
}

impl Default for TinyYoloV2 {
    fn default() -> Self {
        Self {
            obj_threshold: DEFAULT_OBJ_THRESHOLD,
            nms_threshold: DEFAULT_NMS_THRESHOLD,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl TinyYoloV2 {
    /// 新しい `TinyYoloV2` インスタンスを作成します。
    ///
    /// # Args
    /// * `obj_threshold` - オブジェクトの閾値 (0〜1)
    /// * `nms_threshold` - NMSの閾値 (0〜1)
    /// * `limit` - 検出結果の最大数 (1以上)
    ///
    /// # Return
    /// * 新たな `TinyYoloV2` インスタンス
    pub fn new(obj_threshold: f32, nms_threshold: f32, limit: usize) -> Result<Self> {
        ensure!(
            (0.0..=1.0).contains(&obj_threshold),
            "obj_threshold must be in [0, 1]: {}",
            obj_threshold
        );
        ensure!(
            (0.0..=1.0).contains(&nms_threshold),
            "nms_threshold must be in [0, 1]: {}",
            nms_threshold
        );
        ensure!(limit > 0, "limit must be positive");

        info!(
            "obj_threshold: {}, nms_threshold: {}, limit: {}",
            obj_threshold, nms_threshold, limit
        );
        Ok(Self {
            obj_threshold,
            nms_threshold,
            limit,
        })
    }

    /// 物体検出の閾値
    pub fn obj_threshold(&self) -> f32 {
        self.obj_threshold
    }

    /// NMSの閾値
    pub fn nms_threshold(&self) -> f32 {
        self.nms_threshold
    }

    /// 検出結果の最大数
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// YOLOの出力から物体検出を行います。
    ///
    /// # Args
    /// * `yolo_out` - YOLOの出力 (125 * 13 * 13)
    /// * `frame_width` - フレームの幅
    /// * `frame_height` - フレームの高さ
    ///
    /// # Return
    /// * コンフィデンスの降順に並んだ検出結果 (フレームの座標系)
    pub fn start(
        &self,
        yolo_out: &[f32],
        frame_width: u32,
        frame_height: u32,
    ) -> Result<Vec<DetectionData>> {
        let boxes = postprocess::decode(yolo_out, frame_width, frame_height, self.obj_threshold)?;
        nms::suppress(&boxes, self.limit, self.nms_threshold)
    }

    /// `start` の結果をフレームサイズで 0〜1 に正規化して返します。
    pub fn start_normalized(
        &self,
        yolo_out: &[f32],
        frame_width: u32,
        frame_height: u32,
    ) -> Result<Vec<DetectionData>> {
        let objs = self
            .start(yolo_out, frame_width, frame_height)?
            .iter()
            .map(|d| d.normalize(frame_width, frame_height))
            .collect();
        Ok(objs)
    }
}
