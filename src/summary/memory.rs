use std::collections::HashMap;

use chrono::NaiveDate;

use super::{interpolate, report_end_date, SummaryError, SummarySource};

/// 메모리에 보관한 요약 데이터. 외부 시뮬레이터 없이 목적함수를 평가하거나 테스트할 때 쓴다.
#[derive(Debug, Clone)]
pub struct InMemorySummary {
    start: NaiveDate,
    end: NaiveDate,
    /// 시작일 기준 보고 시각 [일]
    report_days: Vec<f64>,
    vectors: HashMap<String, Vec<f64>>,
}

impl InMemorySummary {
    /// 시작일과 보고 시각(일 단위 오프셋)으로 생성한다.
    pub fn new(start: NaiveDate, report_days: Vec<f64>) -> Result<Self, SummaryError> {
        let end = report_end_date(start, &report_days)?;
        Ok(Self {
            start,
            end,
            report_days,
            vectors: HashMap::new(),
        })
    }

    /// 보고 날짜 목록으로 생성한다. 첫 날짜가 시작일이 된다.
    pub fn from_dates(dates: &[NaiveDate]) -> Result<Self, SummaryError> {
        let start = *dates
            .first()
            .ok_or_else(|| SummaryError::InvalidTimes("보고 시각이 비어 있음".into()))?;
        let days = dates
            .iter()
            .map(|d| (*d - start).num_days() as f64)
            .collect();
        Self::new(start, days)
    }

    /// 누적 벡터를 추가한다. 길이는 보고 시각 개수와 같아야 한다.
    pub fn with_vector(mut self, key: &str, values: Vec<f64>) -> Result<Self, SummaryError> {
        if values.len() != self.report_days.len() {
            return Err(SummaryError::LengthMismatch {
                key: key.to_string(),
                expected: self.report_days.len(),
                actual: values.len(),
            });
        }
        self.vectors.insert(key.to_string(), values);
        Ok(self)
    }
}

impl SummarySource for InMemorySummary {
    fn start_date(&self) -> NaiveDate {
        self.start
    }

    fn end_date(&self) -> NaiveDate {
        self.end
    }

    fn has_vector(&self, key: &str) -> bool {
        self.vectors.contains_key(key)
    }

    fn vector_at(&self, key: &str, dates: &[NaiveDate]) -> Result<Vec<f64>, SummaryError> {
        let values = self
            .vectors
            .get(key)
            .ok_or_else(|| SummaryError::VectorNotFound(key.to_string()))?;
        Ok(dates
            .iter()
            .map(|d| interpolate(&self.report_days, values, (*d - self.start).num_days() as f64))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn rejects_unsorted_times() {
        let err = InMemorySummary::new(ymd(2020, 1, 1), vec![0.0, 10.0, 5.0]).unwrap_err();
        assert!(matches!(err, SummaryError::InvalidTimes(_)));
    }

    #[test]
    fn rejects_report_day_beyond_calendar() {
        let err = InMemorySummary::new(ymd(2020, 1, 1), vec![0.0, 1.0e9]).unwrap_err();
        assert!(matches!(err, SummaryError::InvalidTimes(_)));
        let err = InMemorySummary::new(ymd(2020, 1, 1), vec![0.0, f64::NAN]).unwrap_err();
        assert!(matches!(err, SummaryError::InvalidTimes(_)));
    }

    #[test]
    fn rejects_length_mismatch() {
        let err = InMemorySummary::new(ymd(2020, 1, 1), vec![0.0, 10.0])
            .expect("summary")
            .with_vector("FOPT", vec![1.0])
            .unwrap_err();
        assert!(matches!(err, SummaryError::LengthMismatch { expected: 2, actual: 1, .. }));
    }

    #[test]
    fn samples_between_report_dates() {
        let summary = InMemorySummary::from_dates(&[ymd(2020, 1, 1), ymd(2020, 1, 11)])
            .expect("summary")
            .with_vector("FGIT", vec![0.0, 100.0])
            .expect("vector");
        assert_eq!(summary.end_date(), ymd(2020, 1, 11));
        let values = summary
            .vector_at("FGIT", &[ymd(2020, 1, 6), ymd(2021, 1, 1)])
            .expect("sample");
        assert_eq!(values, vec![50.0, 100.0]);
    }

    #[test]
    fn missing_vector_is_reported_by_key() {
        let summary = InMemorySummary::new(ymd(2020, 1, 1), vec![0.0]).expect("summary");
        match summary.vector_at("WOPT:PROD1", &[]) {
            Err(SummaryError::VectorNotFound(key)) => assert_eq!(key, "WOPT:PROD1"),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
