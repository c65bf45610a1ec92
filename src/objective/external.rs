use std::fs;
use std::path::PathBuf;

use super::{ObjectiveError, ObjectiveTerm};

/// 외부 프로그램이 파일로 남긴 결과값을 목적함수 항으로 읽는다.
///
/// 파일의 첫 번째 공백 구분 토큰을 실수로 해석하고 `coefficient`를 곱한다.
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalResultTerm {
    pub path: PathBuf,
    pub coefficient: f64,
}

impl ExternalResultTerm {
    pub fn new(path: impl Into<PathBuf>, coefficient: f64) -> Self {
        Self {
            path: path.into(),
            coefficient,
        }
    }

    fn error(&self, reason: String) -> ObjectiveError {
        ObjectiveError::Term {
            term: self.name().to_string(),
            reason,
        }
    }
}

impl ObjectiveTerm for ExternalResultTerm {
    fn name(&self) -> &str {
        "external result"
    }

    fn value(&self) -> Result<f64, ObjectiveError> {
        let content = fs::read_to_string(&self.path)
            .map_err(|e| self.error(format!("{}: {e}", self.path.display())))?;
        let token = content
            .split_whitespace()
            .next()
            .ok_or_else(|| self.error(format!("{}: 값이 없음", self.path.display())))?;
        let value: f64 = token
            .parse()
            .map_err(|_| self.error(format!("{}: 숫자가 아님 ({token})", self.path.display())))?;
        Ok(self.coefficient * value)
    }
}
