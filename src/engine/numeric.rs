// ==========================================
// 药品库存再分配系统 - 数值辅助
// ==========================================

/// 取较小值，NaN 不被吞掉
///
/// 与 `f64::min` 不同：仅当 `candidate < current` 时才替换，
/// 因此 `current` 为 NaN 时结果保持 NaN，需求/调拨累加中的 NaN 会一直传递下去。
pub fn propagating_min(current: f64, candidate: f64) -> f64 {
    if candidate < current {
        candidate
    } else {
        current
    }
}

/// 三个值中取最小（从左到右依次比较）
pub fn propagating_min3(first: f64, second: f64, third: f64) -> f64 {
    propagating_min(propagating_min(first, second), third)
}
