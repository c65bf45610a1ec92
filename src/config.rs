use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::objective::{ExternalResultTerm, NpvComponentSpec, NpvObjective};
use crate::summary::eclipse::DEFAULT_EXTENSION;

/// 요약 파일 위치.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryConfig {
    /// 확장자를 뺀 요약 파일 경로 (예: `output/CO2JOINT`)
    pub base_name: PathBuf,
    /// 요약 데이터 확장자
    #[serde(default = "default_extension")]
    pub extension: String,
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

/// 외부 결과 파일을 보조 항으로 쓸 때의 설정.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuxiliaryConfig {
    pub file_path: PathBuf,
    #[serde(default = "default_coefficient")]
    pub coefficient: f64,
}

fn default_coefficient() -> f64 {
    1.0
}

/// 애플리케이션 설정을 표현한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub summary: SummaryConfig,
    #[serde(default)]
    pub components: Vec<NpvComponentSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auxiliary: Option<AuxiliaryConfig>,
}

/// 설정 로드/저장 시 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 파일 입출력 오류
    #[error("파일 입출력 오류 ({}): {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// TOML 역직렬화 오류
    #[error("설정 파싱 오류: {0}")]
    Parse(#[from] toml::de::Error),
    /// TOML 직렬화 오류
    #[error("설정 직렬화 오류: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// 덮어쓰기를 허용하지 않았는데 파일이 이미 있음
    #[error("설정 파일이 이미 존재함: {}", .0.display())]
    AlreadyExists(PathBuf),
}

impl Config {
    /// TOML 파일에서 설정을 읽는다.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Config::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Config, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// 설정을 TOML 파일로 저장한다.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// 예시 설정. 웰 하나의 가스 주입 비용과 필드 원유 생산 수익.
    pub fn template() -> Config {
        Config {
            summary: SummaryConfig {
                base_name: PathBuf::from("output/CASE"),
                extension: default_extension(),
            },
            components: vec![
                NpvComponentSpec {
                    well_name: "INJ1".to_string(),
                    fluid_type: "gas".to_string(),
                    flow_type: "injection".to_string(),
                    data_type: "well".to_string(),
                    interval: "yearly".to_string(),
                    fluid_price: -2.0,
                    discount_factor: 0.1,
                },
                NpvComponentSpec {
                    well_name: String::new(),
                    fluid_type: "oil".to_string(),
                    flow_type: "production".to_string(),
                    data_type: "field".to_string(),
                    interval: "monthly".to_string(),
                    fluid_price: 60.0,
                    discount_factor: 0.1,
                },
            ],
            auxiliary: None,
        }
    }

    /// 설정으로 목적함수를 구성한다. 보조 항 설정이 있으면 외부 결과 항을 붙인다.
    pub fn objective(&self) -> NpvObjective {
        let objective = NpvObjective::new(self.components.clone());
        match &self.auxiliary {
            Some(aux) => objective.with_auxiliary(Box::new(ExternalResultTerm::new(
                aux.file_path.clone(),
                aux.coefficient,
            ))),
            None => objective,
        }
    }
}

/// 템플릿 설정 파일을 만든다. `force`가 아니면 기존 파일을 덮어쓰지 않는다.
pub fn write_template(path: &Path, force: bool) -> Result<Config, ConfigError> {
    if path.exists() && !force {
        return Err(ConfigError::AlreadyExists(path.to_path_buf()));
    }
    let cfg = Config::template();
    cfg.save(path)?;
    Ok(cfg)
}
