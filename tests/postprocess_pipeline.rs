use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use tiny_yolo_v2_postprocess::detection_result::DetectionData;
use tiny_yolo_v2_postprocess::model_config::{
    class_id, get_offset, BOXES_PER_CELL, BOX_INFO_FEATURE_COUNT, CLASS_COUNT, COL_COUNT,
    OUTPUT_LEN, ROW_COUNT,
};
use tiny_yolo_v2_postprocess::nms::{iou, suppress};
use tiny_yolo_v2_postprocess::postprocess::decode;
use tiny_yolo_v2_postprocess::tiny_yolo_v2::TinyYoloV2;

const FRAME: u32 = 416;

fn channel(b: usize, feature: usize) -> usize {
    b * (CLASS_COUNT + BOX_INFO_FEATURE_COUNT) + feature
}

fn quiet_output() -> Vec<f32> {
    let mut out = vec![0.; OUTPUT_LEN];
    for cy in 0..ROW_COUNT {
        for cx in 0..COL_COUNT {
            for b in 0..BOXES_PER_CELL {
                out[get_offset(cx, cy, channel(b, 4))] = -20.;
            }
        }
    }
    out
}

fn random_output(seed: u64) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut out: Vec<f32> = (0..OUTPUT_LEN).map(|_| rng.gen_range(-3.0..3.0)).collect();
    for cy in 0..ROW_COUNT {
        for cx in 0..COL_COUNT {
            for b in 0..BOXES_PER_CELL {
                out[get_offset(cx, cy, channel(b, 4))] = rng.gen_range(-6.0..6.0);
                let dominant = rng.gen_range(0..CLASS_COUNT);
                out[get_offset(cx, cy, channel(b, BOX_INFO_FEATURE_COUNT + dominant))] =
                    rng.gen_range(0.0..8.0);
            }
        }
    }
    out
}

fn person(x: f32, y: f32, w: f32, h: f32, confidence: f32) -> DetectionData {
    DetectionData::new(14, x, y, w, h, confidence).unwrap()
}

#[test]
fn single_anchor_end_to_end() {
    let mut out = quiet_output();
    let dog = class_id("dog").unwrap() as usize;
    out[get_offset(6, 4, channel(2, 4))] = 8.;
    out[get_offset(6, 4, channel(2, BOX_INFO_FEATURE_COUNT + dog))] = 12.;

    let boxes = decode(&out, FRAME, FRAME, 0.3).unwrap();
    assert_eq!(boxes.len(), 1);
    assert_eq!(boxes[0].label, "dog");
    assert!(boxes[0].confidence > 0.99);

    let kept = suppress(&boxes, 5, 0.8).unwrap();
    assert_eq!(kept, boxes);

    let yolo = TinyYoloV2::default();
    assert_eq!(yolo.start(&out, FRAME, FRAME).unwrap(), boxes);

    let normalized = yolo.start_normalized(&out, FRAME, FRAME).unwrap();
    assert_eq!(normalized.len(), 1);
    let n = normalized[0];
    assert!((n.x - boxes[0].x / FRAME as f32).abs() < 1e-6);
    assert!((n.width - boxes[0].width / FRAME as f32).abs() < 1e-6);
    assert_eq!(n.label, "dog");
}

#[test]
fn pipeline_is_deterministic() {
    let out = random_output(7);
    let yolo = TinyYoloV2::new(0.2, 0.5, 10).unwrap();
    let first = yolo.start(&out, 640, 480).unwrap();
    let second = yolo.start(&out, 640, 480).unwrap();
    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn raising_threshold_never_adds_detections() {
    let out = random_output(42);
    let thresholds = [0.0, 0.05, 0.1, 0.2, 0.3, 0.5, 0.8, 0.95];

    let mut prev_candidates = usize::MAX;
    let mut prev_kept = usize::MAX;
    for &t in &thresholds {
        let candidates = decode(&out, FRAME, FRAME, t).unwrap();
        assert!(candidates.iter().all(|d| d.confidence >= t));
        assert!(candidates.len() <= prev_candidates);
        prev_candidates = candidates.len();

        let kept = TinyYoloV2::new(t, 0.5, 20).unwrap().start(&out, FRAME, FRAME).unwrap();
        assert!(kept.len() <= prev_kept);
        prev_kept = kept.len();
    }
}

#[test]
fn output_is_sorted_and_bounded() {
    for seed in 0..5 {
        let out = random_output(seed);
        let candidates = decode(&out, FRAME, FRAME, 0.1).unwrap();
        for limit in [1, 3, 5, 50] {
            for nms_threshold in [0.0, 0.3, 0.8, 1.0] {
                let kept = suppress(&candidates, limit, nms_threshold).unwrap();
                assert!(kept.len() <= limit);
                assert!(kept.windows(2).all(|w| w[0].confidence >= w[1].confidence));
            }
        }
    }
}

#[test]
fn iou_is_symmetric_and_bounded() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..500 {
        let a = person(
            rng.gen_range(0.0..100.0),
            rng.gen_range(0.0..100.0),
            rng.gen_range(1.0..60.0),
            rng.gen_range(1.0..60.0),
            0.5,
        );
        let b = person(
            rng.gen_range(0.0..100.0),
            rng.gen_range(0.0..100.0),
            rng.gen_range(1.0..60.0),
            rng.gen_range(1.0..60.0),
            0.5,
        );
        let ab = iou(&a, &b);
        assert_eq!(ab, iou(&b, &a));
        assert!((0.0..=1.0).contains(&ab));
        assert!((iou(&a, &a) - 1.).abs() < 1e-6);
    }
}

#[test]
fn zero_width_box_never_overlaps() {
    let flat = person(10., 10., 0., 50., 0.9);
    let other = person(0., 0., 100., 100., 0.5);
    assert_eq!(iou(&flat, &other), 0.);
    assert_eq!(iou(&other, &flat), 0.);

    let kept = suppress(&[flat, other], 5, 0.0).unwrap();
    assert_eq!(kept, vec![flat, other]);
}

#[test]
fn heavily_overlapping_box_is_suppressed() {
    let high = person(0., 0., 100., 100., 0.9);
    let low = person(0., 0., 100., 95., 0.7);
    assert!((iou(&high, &low) - 0.95).abs() < 1e-6);

    let kept = suppress(&[low, high], 5, 0.8).unwrap();
    assert_eq!(kept, vec![high]);
}

#[test]
fn lightly_overlapping_boxes_survive() {
    let high = person(0., 0., 10., 10., 0.9);
    let low = person(8., 0., 12., 10., 0.7);
    assert!((iou(&high, &low) - 0.1).abs() < 1e-6);

    let kept = suppress(&[low, high], 5, 0.8).unwrap();
    assert_eq!(kept, vec![high, low]);
}

#[test]
fn limit_keeps_most_confident() {
    let confidences = [0.55, 0.95, 0.35, 0.85, 0.75, 0.65];
    let candidates: Vec<DetectionData> = confidences
        .iter()
        .enumerate()
        .map(|(i, &c)| person(i as f32 * 50., 0., 20., 20., c))
        .collect();

    let kept = suppress(&candidates, 5, 0.8).unwrap();
    let kept_conf: Vec<f32> = kept.iter().map(|d| d.confidence).collect();
    assert_eq!(kept_conf, vec![0.95, 0.85, 0.75, 0.65, 0.55]);
}

#[test]
fn corrupted_output_yields_only_finite_detections() {
    let mut out = random_output(11);
    let mut rng = StdRng::seed_from_u64(12);
    let specials = [f32::NAN, f32::INFINITY, f32::NEG_INFINITY, 500., -500.];
    for _ in 0..2000 {
        let i = rng.gen_range(0..OUTPUT_LEN);
        out[i] = specials[rng.gen_range(0..specials.len())];
    }

    let candidates = decode(&out, FRAME, FRAME, 0.1).unwrap();
    assert!(!candidates.is_empty());
    for d in &candidates {
        assert!((0.1..=1.0).contains(&d.confidence));
        assert!(d.x.is_finite() && d.y.is_finite());
        assert!(d.width.is_finite() && d.height.is_finite());
    }

    let kept = TinyYoloV2::new(0.1, 0.5, 20).unwrap().start(&out, FRAME, FRAME).unwrap();
    assert!(kept.len() <= 20);
    assert!(kept.windows(2).all(|w| w[0].confidence >= w[1].confidence));
}

#[test]
fn infinite_box_does_not_suppress_or_get_suppressed() {
    let huge = person(0., 0., f32::INFINITY, 100., 0.9);
    let normal = person(0., 0., 100., 100., 0.8);
    assert_eq!(iou(&huge, &normal), 0.);

    let kept = suppress(&[normal, huge], 5, 0.0).unwrap();
    assert_eq!(kept, vec![huge, normal]);
}
