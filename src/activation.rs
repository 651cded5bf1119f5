//! YOLOの出力に適用する活性化関数

/// ロジスティック関数
///
/// `exp(v) / (1 + exp(v))` と等価ですが、大きな正の入力でも `inf / inf` になりません。
pub fn sigmoid(v: f32) -> f32 {
    1. / (1. + (-v).exp())
}

/// ソフトマックス関数
///
/// オーバーフローを避けるため、最大値を引いてから指数を取ります。
///
/// # Args
/// * `values` - ロジットの配列
///
/// # Return
/// * 合計が1になる確率の配列 (入力が空なら空)
pub fn softmax(values: &[f32]) -> Vec<f32> {
    let max_val = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exp: Vec<f32> = values.iter().map(|&v| (v - max_val).exp()).collect();
    let sum_exp: f32 = exp.iter().sum();
    exp.into_iter().map(|v| v / sum_exp).collect()
}
