//! Tiny-YOLO-v2 の出力テンソルをバウンディングボックスに変換するモジュール

use anyhow::{ensure, Result};
use log::{debug, trace};

use crate::activation::{sigmoid, softmax};
use crate::detection_result::DetectionData;
use crate::model_config::{
    get_offset, ANCHORS, BOXES_PER_CELL, BOX_INFO_FEATURE_COUNT, CLASS_COUNT, COL_COUNT,
    OUTPUT_LEN, ROW_COUNT,
};

/// `get_cls_id`関数は、確率が最大のクラスIDを取得します
///
/// 最大値が複数ある場合は先頭のものを返します
///
/// # Args
/// * `probs` - クラス確率の配列
///
/// # Return
/// * 最大の値を持つ要素のクラスID
fn get_cls_id(probs: &[f32]) -> usize {
    probs
        .iter()
        .enumerate()
        .fold(0, |best, (i, &p)| if p > probs[best] { i } else { best })
}

/// 1つのセル・アンカーボックスを復号します
///
/// # Args
/// * `yolo_out` - YOLOの出力
/// * `cx`, `cy` - セルの列と行
/// * `b` - アンカーボックスのインデックス
/// * `cell_width`, `cell_height` - 1セルのサイズ
/// * `threshold` - 閾値
///
/// # Return
/// * 閾値を超えた場合は検出結果
fn get_obj(
    yolo_out: &[f32],
    cx: usize,
    cy: usize,
    b: usize,
    cell_width: f32,
    cell_height: f32,
    threshold: f32,
) -> Option<DetectionData> {
    let channel = b * (CLASS_COUNT + BOX_INFO_FEATURE_COUNT);

    let tx = yolo_out[get_offset(cx, cy, channel)];
    let ty = yolo_out[get_offset(cx, cy, channel + 1)];
    let tw = yolo_out[get_offset(cx, cy, channel + 2)];
    let th = yolo_out[get_offset(cx, cy, channel + 3)];
    let tc = yolo_out[get_offset(cx, cy, channel + 4)];

    // 中心座標
    let x = (cx as f32 + sigmoid(tx)) * cell_width;
    let y = (cy as f32 + sigmoid(ty)) * cell_height;

    // BBoxのサイズ
    let width = tw.exp() * cell_width * ANCHORS[b * 2];
    let height = th.exp() * cell_height * ANCHORS[b * 2 + 1];

    let confidence = sigmoid(tc);
    if confidence.is_nan() || confidence < threshold {
        return None;
    }
    if !(x.is_finite() && y.is_finite() && width.is_finite() && height.is_finite()) {
        debug!("cell ({}, {}) anchor {}: non-finite box dropped", cx, cy, b);
        return None;
    }

    let class_offset = channel + BOX_INFO_FEATURE_COUNT;
    let classes: Vec<f32> = (0..CLASS_COUNT)
        .map(|i| yolo_out[get_offset(cx, cy, class_offset + i)])
        .collect();
    let probs = softmax(&classes);

    let top_class = get_cls_id(&probs);
    let top_score = probs[top_class] * confidence;
    if top_score.is_nan() || top_score < threshold {
        return None;
    }

    trace!(
        "cell ({}, {}) anchor {}: class {} score {:.3}",
        cx, cy, b, top_class, top_score
    );
    Some(DetectionData::from_center(top_class, x, y, width, height, top_score))
}

/// `decode`関数は、YOLOの出力から閾値を超えた検出候補を抽出します
///
/// # Args
/// * `yolo_out` - YOLOの出力 (125 * 13 * 13, チャネル優先)
/// * `frame_width` - フレームの幅
/// * `frame_height` - フレームの高さ
/// * `threshold` - 物体検出の閾値 (0〜1)
///
/// # Return
/// * NMS前の検出候補。行、列、アンカーボックスの順に並びます
pub fn decode(
    yolo_out: &[f32],
    frame_width: u32,
    frame_height: u32,
    threshold: f32,
) -> Result<Vec<DetectionData>> {
    ensure!(
        yolo_out.len() == OUTPUT_LEN,
        "yolo output length must be {}, got {}",
        OUTPUT_LEN,
        yolo_out.len()
    );
    ensure!(
        frame_width > 0 && frame_height > 0,
        "frame size must be positive: {}x{}",
        frame_width,
        frame_height
    );
    ensure!(
        (0.0..=1.0).contains(&threshold),
        "threshold must be in [0, 1]: {}",
        threshold
    );

    let cell_width = frame_width as f32 / COL_COUNT as f32;
    let cell_height = frame_height as f32 / ROW_COUNT as f32;

    let mut boxes = vec![];
    for cy in 0..ROW_COUNT {
        for cx in 0..COL_COUNT {
            for b in 0..BOXES_PER_CELL {
                if let Some(d) = get_obj(yolo_out, cx, cy, b, cell_width, cell_height, threshold) {
                    boxes.push(d);
                }
            }
        }
    }
    debug!("decoded {} candidates (threshold {})", boxes.len(), threshold);
    Ok(boxes)
}
