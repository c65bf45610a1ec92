//! 결과 표시용 문자열 생성.

use crate::objective::ObjectiveValue;

/// 과학적 표기 문자열로 변환한다.
///
/// 가수는 왕복 변환이 가능한 가장 짧은 자릿수, 지수는 부호와 최소 두 자리로
/// 쓴다 (`472.7272...` -> `4.727272727272727e+02`, `100` -> `1.e+02`).
pub fn format_scientific(value: f64) -> String {
    if !value.is_finite() {
        return if value.is_nan() {
            "nan".to_string()
        } else if value > 0.0 {
            "inf".to_string()
        } else {
            "-inf".to_string()
        };
    }
    let raw = format!("{value:e}");
    let (mantissa, exponent) = raw.split_once('e').unwrap_or((raw.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let sign = if exponent < 0 { '-' } else { '+' };
    let dot = if mantissa.contains('.') { "" } else { "." };
    format!("{mantissa}{dot}e{sign}{:02}", exponent.abs())
}

/// 구성요소별 현금흐름 표를 만든다.
pub fn render_breakdown(value: &ObjectiveValue) -> String {
    let mut out = String::new();
    let label_width = value
        .components
        .iter()
        .map(|c| c.label.len())
        .chain(std::iter::once("component".len()))
        .max()
        .unwrap_or(0);
    let key_width = value
        .components
        .iter()
        .map(|c| c.key.len())
        .chain(std::iter::once(3))
        .max()
        .unwrap_or(0);

    out.push_str(&format!(
        "{:<label_width$}  {:<key_width$}  {:>4}  {:>7}  {:>24}\n",
        "component", "key", "int", "periods", "cash flow"
    ));
    for c in &value.components {
        out.push_str(&format!(
            "{:<label_width$}  {:<key_width$}  {:>4}  {:>7}  {:>24}\n",
            c.label,
            c.key,
            c.interval.code(),
            c.periods,
            format_scientific(c.cash_flow)
        ));
    }
    out.push_str(&format!("NPV        : {}\n", format_scientific(value.net_present_value)));
    out.push_str(&format!("웰 비용    : {}\n", format_scientific(value.well_cost)));
    out.push_str(&format!("보조 항    : {}\n", format_scientific(value.auxiliary)));
    out.push_str(&format!("목적함수값 : {}\n", value.display_value()));
    out
}
