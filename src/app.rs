use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::config::{self, Config, ConfigError};
use crate::objective::ObjectiveError;
use crate::report;
use crate::summary::{EclipseSummary, SummaryError};

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 설정 저장/로드 오류
    #[error("설정 오류: {0}")]
    Config(#[from] ConfigError),
    /// 요약 파일 오류
    #[error("요약 데이터 오류: {0}")]
    Summary(#[from] SummaryError),
    /// 목적함수 계산 오류
    #[error("목적함수 계산 오류: {0}")]
    Objective(#[from] ObjectiveError),
}

/// 요약 파일을 열어 목적함수를 평가하고 결과를 출력한다.
///
/// `summary_base`가 주어지면 설정의 요약 경로 대신 사용한다.
pub fn evaluate(config_path: &Path, summary_base: Option<&Path>, raw: bool) -> Result<(), AppError> {
    let cfg = Config::load(config_path)?;
    let base = summary_base.unwrap_or(cfg.summary.base_name.as_path());
    info!(base = %base.display(), components = cfg.components.len(), "evaluating objective");

    let summary = EclipseSummary::open_with_extension(base, &cfg.summary.extension)?;
    let value = match cfg.objective().evaluate(&summary) {
        Ok(value) => value,
        Err(err) => {
            if let ObjectiveError::Summary(SummaryError::VectorNotFound(key)) = &err {
                eprintln!("{}", missing_vector_hint(key, &summary.keys()));
            }
            return Err(err.into());
        }
    };

    print!("{}", report::render_breakdown(&value));
    if raw {
        println!("{}", value.objective_value());
    }
    Ok(())
}

/// 찾지 못한 벡터 대신 쓸 수 있는 키 목록. 같은 키워드의 벡터가 있으면 그것만 보여 준다.
fn missing_vector_hint(missing: &str, available: &[&str]) -> String {
    let keyword = missing.split(':').next().unwrap_or(missing);
    let same: Vec<&str> = available
        .iter()
        .copied()
        .filter(|k| k.split(':').next() == Some(keyword))
        .collect();
    let shown = if same.is_empty() { available } else { &same[..] };
    format!("사용 가능한 벡터: {}", shown.join(", "))
}

/// 구성요소별 기록용 이름과 조회 키를 출력한다. 요약 파일은 열지 않는다.
pub fn keys(config_path: &Path) -> Result<(), AppError> {
    let cfg = Config::load(config_path)?;
    for (i, c) in cfg.components.iter().enumerate() {
        let resolved = c.resolve(i)?;
        println!("{}\t{}\t{}", resolved.label, resolved.key, resolved.interval);
    }
    Ok(())
}

/// 예시 설정 파일을 만든다.
pub fn init(config_path: &Path, force: bool) -> Result<(), AppError> {
    let cfg = config::write_template(config_path, force)?;
    println!(
        "{} 작성 완료 (구성요소 {}개)",
        config_path.display(),
        cfg.components.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hint_prefers_vectors_with_same_keyword() {
        let keys = ["FGIT", "TIME", "WGIT:INJ1", "WGIT:INJ2", "WOPT:PROD1"];
        assert_eq!(
            missing_vector_hint("WGIT:PROD9", &keys),
            "사용 가능한 벡터: WGIT:INJ1, WGIT:INJ2"
        );
    }

    #[test]
    fn hint_lists_everything_for_unknown_keyword() {
        let keys = ["FGIT", "TIME"];
        assert_eq!(missing_vector_hint("FWIT", &keys), "사용 가능한 벡터: FGIT, TIME");
    }
}
