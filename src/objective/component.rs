use serde::{Deserialize, Serialize};

use super::ObjectiveError;
use crate::interval::Interval;

/// NPV 구성요소 하나(예: 한 웰의 가스 주입)의 설정.
///
/// 필드 이름은 설정 파일 키(`wellname`, `fluidtype`, ...)와 같다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpvComponentSpec {
    /// 웰 이름. 필드 단위 양이면 비워 둘 수 있다.
    #[serde(rename = "wellname", default)]
    pub well_name: String,
    /// 유체 종류 (oil, gas, water)
    #[serde(rename = "fluidtype")]
    pub fluid_type: String,
    /// 유동 방향 (production, injection)
    #[serde(rename = "flowtype")]
    pub flow_type: String,
    /// 범위 (well, field)
    #[serde(rename = "datatype")]
    pub data_type: String,
    /// 할인 해상도 (yearly, monthly)
    pub interval: String,
    /// 단가 [통화/체적]
    #[serde(rename = "fluidprice")]
    pub fluid_price: f64,
    /// 연 할인율 (0 이상 1 미만)
    #[serde(rename = "discountfactor")]
    pub discount_factor: f64,
}

impl NpvComponentSpec {
    /// 웰 단위 양인지 여부. 범위 문자열의 첫 글자가 `W`이면 웰 단위다.
    pub fn is_well_scoped(&self) -> bool {
        first_upper(&self.data_type) == Some('W')
    }

    /// 기록용 이름: `<웰>_<유체>_<유동 앞 4글자>` (소문자).
    pub fn label(&self) -> String {
        let flow: String = self.flow_type.chars().take(4).collect();
        format!(
            "{}_{}_{}",
            self.well_name.to_lowercase(),
            self.fluid_type.to_lowercase(),
            flow.to_lowercase()
        )
    }

    /// 요약 벡터 조회 키.
    ///
    /// 웰 단위는 `<D><F><L>T:<웰>`, 그 외는 `<D><F><L>T`. D/F/L은 범위, 유체,
    /// 유동 문자열의 첫 글자(대문자)이며 웰 이름은 그대로 붙인다.
    pub fn summary_key(&self) -> String {
        let prefix: String = [&self.data_type, &self.fluid_type, &self.flow_type]
            .iter()
            .filter_map(|s| first_upper(s))
            .collect();
        if self.is_well_scoped() {
            format!("{prefix}T:{}", self.well_name)
        } else {
            format!("{prefix}T")
        }
    }

    /// 입력값을 검사하고 계산에 쓸 형태로 변환한다.
    pub fn resolve(&self, index: usize) -> Result<ResolvedComponent, ObjectiveError> {
        let invalid = |reason: &str| ObjectiveError::InvalidComponent {
            index,
            reason: reason.to_string(),
        };
        for (field, value) in [
            ("fluidtype", &self.fluid_type),
            ("flowtype", &self.flow_type),
            ("datatype", &self.data_type),
            ("interval", &self.interval),
        ] {
            if value.trim().is_empty() {
                return Err(invalid(&format!("{field} 값이 비어 있음")));
            }
        }
        if self.is_well_scoped() && self.well_name.trim().is_empty() {
            return Err(invalid("웰 단위 구성요소에 wellname 없음"));
        }
        if !self.fluid_price.is_finite() {
            return Err(invalid("fluidprice가 유한하지 않음"));
        }
        if !(0.0..1.0).contains(&self.discount_factor) {
            return Err(invalid("discountfactor는 0 이상 1 미만이어야 함"));
        }
        let interval = Interval::parse(&self.interval)
            .map_err(|interval| ObjectiveError::UnsupportedInterval { index, interval })?;
        Ok(ResolvedComponent {
            label: self.label(),
            key: self.summary_key(),
            interval,
            price: self.fluid_price,
            rate: self.discount_factor,
        })
    }
}

/// 검증을 마친 구성요소.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedComponent {
    pub label: String,
    pub key: String,
    pub interval: Interval,
    pub price: f64,
    pub rate: f64,
}

fn first_upper(s: &str) -> Option<char> {
    s.trim().chars().next().map(|c| c.to_ascii_uppercase())
}
