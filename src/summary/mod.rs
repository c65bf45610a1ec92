//! 시뮬레이션 요약(summary) 시계열 데이터 소스.

pub mod eclipse;
pub mod memory;

use std::path::PathBuf;

use chrono::{Datelike, Months, NaiveDate, TimeDelta};
use thiserror::Error;

use crate::interval::Interval;

pub use eclipse::EclipseSummary;
pub use memory::InMemorySummary;

/// 요약 데이터 조회 시 발생 가능한 오류.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// 요약 파일이 존재하지 않음
    #[error("요약 파일을 찾을 수 없음: {}", .0.display())]
    ArtifactNotFound(PathBuf),
    /// 파일 입출력 오류
    #[error("요약 파일 입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    /// 요약 파일 형식 오류
    #[error("요약 파일 형식 오류: {0}")]
    Malformed(String),
    /// 요청한 벡터가 요약 데이터에 없음
    #[error("요약 벡터를 찾을 수 없음: {0}")]
    VectorNotFound(String),
    /// 보고 시각이 비어 있거나 정렬되지 않음
    #[error("보고 시각 오류: {0}")]
    InvalidTimes(String),
    /// 벡터 길이가 보고 시각 개수와 다름
    #[error("벡터 {key} 길이 {actual}, 보고 시각 {expected}개")]
    LengthMismatch {
        key: String,
        expected: usize,
        actual: usize,
    },
}

/// 이름이 붙은 누적 벡터를 시각별로 조회할 수 있는 요약 데이터 소스.
///
/// 같은 핸들을 여러 스레드에서 공유하는 것은 구현체가 `Sync`일 때만 허용된다.
pub trait SummarySource {
    /// 시뮬레이션 시작일.
    fn start_date(&self) -> NaiveDate;

    /// 마지막 보고 시각의 날짜.
    fn end_date(&self) -> NaiveDate;

    /// 해상도별 규칙 시간 격자. 종료일을 넘는 시각이 포함될 수 있다.
    fn time_range(&self, interval: Interval) -> Vec<NaiveDate> {
        regular_time_range(self.start_date(), self.end_date(), interval)
    }

    /// 벡터 존재 여부.
    fn has_vector(&self, key: &str) -> bool;

    /// 누적 벡터를 임의의 날짜 목록에서 샘플링한다.
    fn vector_at(&self, key: &str, dates: &[NaiveDate]) -> Result<Vec<f64>, SummaryError>;
}

/// 시작일을 간격 경계(1월 1일 또는 매월 1일)로 내린 뒤, 종료일 이상인 첫 경계까지
/// 한 간격씩 증가시킨 날짜 목록을 만든다.
pub fn regular_time_range(start: NaiveDate, end: NaiveDate, interval: Interval) -> Vec<NaiveDate> {
    let first = match interval {
        Interval::Yearly => NaiveDate::from_ymd_opt(start.year(), 1, 1),
        Interval::Monthly => start.with_day(1),
    }
    .unwrap_or(start);

    let mut dates = vec![first];
    let mut current = first;
    while current < end {
        match current.checked_add_months(Months::new(interval.months())) {
            Some(next) => {
                current = next;
                dates.push(next);
            }
            None => break,
        }
    }
    dates
}

/// 보고 시각을 검사하고 마지막 보고 시각의 날짜를 구한다.
///
/// 보고 시각은 비어 있지 않고, 유한하며, 감소하지 않아야 한다. 마지막 시각이
/// 날짜로 표현할 수 없는 범위이면 `InvalidTimes`를 돌려준다.
pub(crate) fn report_end_date(start: NaiveDate, report_days: &[f64]) -> Result<NaiveDate, SummaryError> {
    let Some(&last) = report_days.last() else {
        return Err(SummaryError::InvalidTimes("보고 시각이 비어 있음".into()));
    };
    if report_days.iter().any(|t| !t.is_finite()) {
        return Err(SummaryError::InvalidTimes("유한하지 않은 보고 시각".into()));
    }
    if report_days.windows(2).any(|w| w[1] < w[0]) {
        return Err(SummaryError::InvalidTimes("보고 시각이 정렬되어 있지 않음".into()));
    }
    let days = last.floor();
    // i64 범위를 벗어난 값은 캐스팅 전에 거른다.
    if days.abs() >= i64::MAX as f64 {
        return Err(SummaryError::InvalidTimes(format!("보고 시각 {last}일이 범위를 벗어남")));
    }
    TimeDelta::try_days(days as i64)
        .and_then(|delta| start.checked_add_signed(delta))
        .ok_or_else(|| SummaryError::InvalidTimes(format!("보고 시각 {last}일이 범위를 벗어남")))
}

/// 보고 시각(시작일 기준 일수)에 대해 누적값을 선형 보간한다. 범위 밖은 양 끝값으로 고정한다.
pub(crate) fn interpolate(times: &[f64], values: &[f64], at: f64) -> f64 {
    let (Some(&first_t), Some(&last_t)) = (times.first(), times.last()) else {
        return 0.0;
    };
    if at <= first_t {
        return values[0];
    }
    if at >= last_t {
        return values[values.len() - 1];
    }
    // times는 정렬되어 있으므로 at 이상인 첫 위치가 오른쪽 구간 끝이다.
    let hi = times.partition_point(|&t| t < at);
    let lo = hi - 1;
    let span = times[hi] - times[lo];
    if span <= 0.0 {
        return values[hi];
    }
    let w = (at - times[lo]) / span;
    values[lo] + w * (values[hi] - values[lo])
}
