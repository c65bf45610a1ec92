use chrono::NaiveDate;
use tracing::{debug, info, warn};

use super::component::{NpvComponentSpec, ResolvedComponent};
use super::discount::discount_factors;
use super::ObjectiveError;
use crate::interval::Interval;
use crate::summary::SummarySource;

/// 구성요소 하나의 현금흐름 결과.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentCashFlow {
    /// 기록용 이름 (예: `inj1_gas_inje`)
    pub label: String,
    /// 요약 벡터 조회 키 (예: `WGIT:INJ1`)
    pub key: String,
    pub interval: Interval,
    /// 누적된 기간 수 (격자 점 개수 - 1)
    pub periods: usize,
    /// 할인된 현금흐름 합
    pub cash_flow: f64,
}

/// NPV 계산 결과와 구성요소별 내역.
#[derive(Debug, Clone, PartialEq)]
pub struct NpvBreakdown {
    pub npv: f64,
    pub components: Vec<ComponentCashFlow>,
}

/// 요약 데이터와 구성요소 목록으로 NPV를 계산한다.
///
/// 모든 구성요소를 먼저 검증하므로, 하나라도 잘못되면 벡터를 읽기 전에 실패한다.
/// 벡터를 찾지 못하면 부분 결과 없이 오류를 돌려준다.
pub fn compute_npv(
    summary: &dyn SummarySource,
    components: &[NpvComponentSpec],
) -> Result<NpvBreakdown, ObjectiveError> {
    if components.is_empty() {
        return Err(ObjectiveError::NoComponents);
    }
    let resolved = components
        .iter()
        .enumerate()
        .map(|(i, c)| c.resolve(i))
        .collect::<Result<Vec<_>, _>>()?;

    let mut npv = 0.0;
    let mut flows = Vec::with_capacity(resolved.len());
    for component in &resolved {
        let flow = component_cash_flow(summary, component)?;
        npv += flow.cash_flow;
        flows.push(flow);
    }
    info!(npv, components = flows.len(), "computed NPV");
    Ok(NpvBreakdown {
        npv,
        components: flows,
    })
}

/// 종료일까지로 자른 해상도별 시간 격자.
pub fn truncated_time_grid(summary: &dyn SummarySource, interval: Interval) -> Vec<NaiveDate> {
    let end = summary.end_date();
    summary
        .time_range(interval)
        .into_iter()
        .filter(|d| *d <= end)
        .collect()
}

fn component_cash_flow(
    summary: &dyn SummarySource,
    component: &ResolvedComponent,
) -> Result<ComponentCashFlow, ObjectiveError> {
    let grid = truncated_time_grid(summary, component.interval);
    if grid.first().is_some_and(|d| *d < summary.start_date()) {
        warn!(
            key = %component.key,
            grid_start = %grid[0],
            data_start = %summary.start_date(),
            "time grid starts before simulated data"
        );
    }
    let values = summary.vector_at(&component.key, &grid)?;
    let periods = values.len().saturating_sub(1);
    if periods == 0 {
        warn!(key = %component.key, points = grid.len(), "no discount periods; component contributes zero");
    }
    let factors = discount_factors(component.interval, component.rate, periods);
    let cash_flow: f64 = values
        .windows(2)
        .zip(&factors)
        .map(|(w, factor)| (w[1] - w[0]) * component.price * factor)
        .sum();
    debug!(
        label = %component.label,
        key = %component.key,
        interval = %component.interval,
        periods,
        cash_flow,
        "component cash flow"
    );
    Ok(ComponentCashFlow {
        label: component.label.clone(),
        key: component.key.clone(),
        interval: component.interval,
        periods,
        cash_flow,
    })
}
