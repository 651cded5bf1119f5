//! Tiny-YOLO-v2 (Pascal VOC) の出力テンソルの形状とモデル固有の定数

/// グリッドの行数
pub const ROW_COUNT: usize = 13;
/// グリッドの列数
pub const COL_COUNT: usize = 13;
/// 1セルあたりのアンカーボックス数
pub const BOXES_PER_CELL: usize = 5;
/// BBox情報 (tx, ty, tw, th, tc) の数
pub const BOX_INFO_FEATURE_COUNT: usize = 5;
/// クラス数
pub const CLASS_COUNT: usize = 20;
/// 出力のチャネル数 (5 * (20 + 5) = 125)
pub const CHANNEL_COUNT: usize = BOXES_PER_CELL * (CLASS_COUNT + BOX_INFO_FEATURE_COUNT);
/// 1チャネルあたりの要素数
pub const CHANNEL_STRIDE: usize = ROW_COUNT * COL_COUNT;
/// 出力テンソルの要素数 (125 * 13 * 13 = 21125)
pub const OUTPUT_LEN: usize = CHANNEL_COUNT * CHANNEL_STRIDE;

/// アンカーボックス (w, h) * 5。単位はセル
pub const ANCHORS: [f32; BOXES_PER_CELL * 2] = [
    1.08, 1.19, 3.42, 4.41, 6.63, 11.38, 9.42, 5.11, 16.62, 10.52,
];

/// クラスラベル
pub const LABELS: [&str; CLASS_COUNT] = [
    "aeroplane", "bicycle", "bird", "boat", "bottle",
    "bus", "car", "cat", "chair", "cow",
    "diningtable", "dog", "horse", "motorbike", "person",
    "pottedplant", "sheep", "sofa", "train", "tvmonitor",
];

/// 平坦化された出力テンソル ([channel][row][col]) 上のインデックスを求めます。
///
/// # Args
/// * `x` - セルの列
/// * `y` - セルの行
/// * `ch` - チャネル
///
/// # Return
/// * テンソル上のオフセット
pub fn get_offset(x: usize, y: usize, ch: usize) -> usize {
    ch * CHANNEL_STRIDE + y * COL_COUNT + x
}

/// ラベル名からクラスIDを引きます。
pub fn class_id(label: &str) -> Option<u8> {
    LABELS.iter().position(|&l| l == label).map(|i| i as u8)
}
