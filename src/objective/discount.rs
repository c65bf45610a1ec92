use crate::interval::Interval;

/// 연 할인율을 월 할인율로 바꿀 때 쓰는 지수 (30일/365일 ≈ 0.082192).
///
/// 정확한 1/12가 아니다. 기존 결과와 수치를 맞추기 위해 그대로 둔다.
pub const MONTHLY_RATE_EXPONENT: f64 = 0.082192;

/// 연 할인율을 월 실효 할인율로 환산한다.
pub fn monthly_rate(annual_rate: f64) -> f64 {
    (1.0 + annual_rate).powf(MONTHLY_RATE_EXPONENT) - 1.0
}

/// 해상도별 기간 할인율.
pub fn period_rate(interval: Interval, annual_rate: f64) -> f64 {
    match interval {
        Interval::Yearly => annual_rate,
        Interval::Monthly => monthly_rate(annual_rate),
    }
}

/// `period`(0부터)번째 기간의 할인계수 `1 / (1 + r)^period`.
pub fn discount_factor(interval: Interval, annual_rate: f64, period: usize) -> f64 {
    let rate = period_rate(interval, annual_rate);
    1.0 / (1.0 + rate).powi(period as i32)
}

/// 첫 `count`개 기간의 할인계수. 첫 값은 항상 1이다.
pub fn discount_factors(interval: Interval, annual_rate: f64, count: usize) -> Vec<f64> {
    (0..count)
        .map(|period| discount_factor(interval, annual_rate, period))
        .collect()
}
