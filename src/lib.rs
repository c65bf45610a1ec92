//! 저류층 시뮬레이션 요약 시계열로 NPV 목적함수를 계산하는 라이브러리.
//! 최적화 루프에서 직접 호출하거나 CLI로 실행할 수 있다.

pub mod app;
pub mod config;
pub mod interval;
pub mod objective;
pub mod report;
pub mod summary;

pub use interval::Interval;
pub use objective::{compute_npv, NpvComponentSpec, NpvObjective, ObjectiveError, ObjectiveValue};
pub use summary::{EclipseSummary, InMemorySummary, SummaryError, SummarySource};
