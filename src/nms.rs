//! Non-Maximum Suppression (NMS)

use anyhow::{ensure, Result};
use log::debug;

use crate::detection_result::DetectionData;

/// 2つのバウンディングボックスの IoU (Intersection over Union) を求めます。
///
/// どちらかの面積が 0 以下、または有限でない場合は 0 を返します。
pub fn iou(a: &DetectionData, b: &DetectionData) -> f32 {
    let area_a = a.area();
    if !(area_a > 0. && area_a.is_finite()) {
        return 0.;
    }
    let area_b = b.area();
    if !(area_b > 0. && area_b.is_finite()) {
        return 0.;
    }

    let min_x = f32::max(a.x, b.x);
    let min_y = f32::max(a.y, b.y);
    let max_x = f32::min(a.x2(), b.x2());
    let max_y = f32::min(a.y2(), b.y2());

    let intersection = f32::max(max_x - min_x, 0.) * f32::max(max_y - min_y, 0.);
    intersection / (area_a + area_b - intersection)
}

fn nms(bb: &[DetectionData], limit: usize, nms_threshold: f32) -> Vec<DetectionData> {
    // 安定ソートなので、同じコンフィデンスの要素は元の順序を保つ
    let mut sorted_bb = bb.to_vec();
    sorted_bb.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    let mut is_active = vec![true; sorted_bb.len()];
    let mut active_count = sorted_bb.len();
    let mut results = vec![];

    for ib in 0..sorted_bb.len() {
        if !is_active[ib] {
            continue;
        }
        let box_a = &sorted_bb[ib];
        results.push(*box_a);
        if results.len() >= limit {
            break;
        }

        for it in (ib + 1)..sorted_bb.len() {
            if is_active[it] && iou(box_a, &sorted_bb[it]) > nms_threshold {
                is_active[it] = false;
                active_count -= 1;
                if active_count == 0 {
                    break;
                }
            }
        }
        if active_count == 0 {
            break;
        }
    }
    results
}

/// `suppress`関数は、重なっているBBoxの中でコンフィデンスが最大のものを集めます
///
/// # Args
/// * `bb` - 検出候補
/// * `limit` - 返す検出結果の最大数 (1以上)
/// * `nms_threshold` - 非最大抑制（NMS）の閾値 (0〜1)
///
/// # Return
/// * コンフィデンスの降順に並んだ、最大 `limit` 個の検出結果
pub fn suppress(
    bb: &[DetectionData],
    limit: usize,
    nms_threshold: f32,
) -> Result<Vec<DetectionData>> {
    ensure!(limit > 0, "limit must be positive");
    ensure!(
        (0.0..=1.0).contains(&nms_threshold),
        "nms_threshold must be in [0, 1]: {}",
        nms_threshold
    );

    let results = nms(bb, limit, nms_threshold);
    debug!("nms kept {} of {} candidates", results.len(), bb.len());
    Ok(results)
}
