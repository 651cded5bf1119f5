//! # Tiny-YOLO-v2 後処理ライブラリ
//!
//! このクレートは、Tiny-YOLO-v2 (Pascal VOC, 20クラス) の出力テンソルを
//! バウンディングボックスのリストに変換するRustライブラリです。
//! 推論そのものは行わず、推論エンジンが出力した平坦な `f32` 配列を入力とします。
//!
//! ## 主な機能
//!
//! 1. **デコード**: 13x13 グリッドとアンカーボックスから検出候補を復号し、閾値で絞り込みます。
//! 2. **NMS**: 重なった検出候補を取り除き、コンフィデンスの高い順に最大 `limit` 個を返します。
//! 3. **正規化**: 検出結果の座標をフレームサイズで 0〜1 に正規化します。
//!
//! ## Example
//! ```no_run
//! # fn main() -> anyhow::Result<()> {
//! use tiny_yolo_v2_postprocess::tiny_yolo_v2::TinyYoloV2;
//!
//! let yolo_out = vec![0f32; tiny_yolo_v2_postprocess::model_config::OUTPUT_LEN];
//! let yolo = TinyYoloV2::new(0.3, 0.8, 5)?;
//! let result = yolo.start(&yolo_out, 416, 416)?;
//! # Ok(())
//! # }
//! ```

pub mod activation;
pub mod detection_result;
pub mod model_config;
pub mod nms;
pub mod postprocess;
pub mod tiny_yolo_v2;
