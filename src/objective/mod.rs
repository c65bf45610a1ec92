//! 목적함수 계산. NPV 항에 선택적인 웰 비용 항과 보조 항을 더한다.

pub mod component;
pub mod discount;
pub mod external;
pub mod npv;

use thiserror::Error;
use tracing::debug;

use crate::report::format_scientific;
use crate::summary::{SummaryError, SummarySource};

pub use component::NpvComponentSpec;
pub use external::ExternalResultTerm;
pub use npv::{compute_npv, ComponentCashFlow, NpvBreakdown};

/// 목적함수 계산 시 발생 가능한 오류.
#[derive(Debug, Error)]
pub enum ObjectiveError {
    /// 구성요소가 하나도 없음
    #[error("NPV 구성요소가 없음")]
    NoComponents,
    /// 구성요소 입력값 오류
    #[error("구성요소 #{index} 오류: {reason}")]
    InvalidComponent { index: usize, reason: String },
    /// 지원하지 않는 할인 해상도 (연/월만 지원)
    #[error("구성요소 #{index}: 지원하지 않는 해상도 {interval}")]
    UnsupportedInterval { index: usize, interval: String },
    /// 요약 데이터 조회 오류
    #[error(transparent)]
    Summary(#[from] SummaryError),
    /// 추가 항 계산 오류
    #[error("{term} 항 계산 오류: {reason}")]
    Term { term: String, reason: String },
}

/// 목적함수에 더해지는 추가 항(웰 비용, 보조 항 등).
///
/// 값은 그대로 더해지므로 비용은 음수로 돌려준다.
pub trait ObjectiveTerm {
    fn name(&self) -> &str;
    fn value(&self) -> Result<f64, ObjectiveError>;
}

/// 목적함수 평가 결과.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectiveValue {
    pub net_present_value: f64,
    /// 웰 비용 항. 제공자가 없으면 0.
    pub well_cost: f64,
    /// 보조 항. 제공자가 없으면 0.
    pub auxiliary: f64,
    pub components: Vec<ComponentCashFlow>,
}

impl ObjectiveValue {
    /// 최종 목적함수 값 = NPV + 웰 비용 + 보조 항.
    pub fn objective_value(&self) -> f64 {
        self.net_present_value + self.well_cost + self.auxiliary
    }

    /// 표시용 과학적 표기 문자열. 계산에는 `objective_value()`를 쓴다.
    pub fn display_value(&self) -> String {
        format_scientific(self.objective_value())
    }
}

/// NPV 목적함수. 구성요소 목록과 선택적인 추가 항 제공자를 묶는다.
#[derive(Default)]
pub struct NpvObjective {
    components: Vec<NpvComponentSpec>,
    well_cost: Option<Box<dyn ObjectiveTerm>>,
    auxiliary: Option<Box<dyn ObjectiveTerm>>,
}

impl NpvObjective {
    pub fn new(components: Vec<NpvComponentSpec>) -> Self {
        Self {
            components,
            well_cost: None,
            auxiliary: None,
        }
    }

    /// 웰 비용 항 제공자를 지정한다.
    pub fn with_well_cost(mut self, term: Box<dyn ObjectiveTerm>) -> Self {
        self.well_cost = Some(term);
        self
    }

    /// 보조 항 제공자를 지정한다.
    pub fn with_auxiliary(mut self, term: Box<dyn ObjectiveTerm>) -> Self {
        self.auxiliary = Some(term);
        self
    }

    /// 요약 데이터로 목적함수를 평가한다. 호출 사이에 상태를 남기지 않는다.
    pub fn evaluate(&self, summary: &dyn SummarySource) -> Result<ObjectiveValue, ObjectiveError> {
        let breakdown = compute_npv(summary, &self.components)?;
        let well_cost = evaluate_term(&self.well_cost)?;
        let auxiliary = evaluate_term(&self.auxiliary)?;
        Ok(ObjectiveValue {
            net_present_value: breakdown.npv,
            well_cost,
            auxiliary,
            components: breakdown.components,
        })
    }
}

fn evaluate_term(term: &Option<Box<dyn ObjectiveTerm>>) -> Result<f64, ObjectiveError> {
    match term {
        Some(term) => {
            let value = term.value()?;
            debug!(term = term.name(), value, "objective term");
            Ok(value)
        }
        None => Ok(0.0),
    }
}
