//! 이진 요약 파일(SMSPEC/UNSMRY) 읽기 및 목적함수 평가 테스트.
use std::fs;
use std::path::{Path, PathBuf};

use approx::assert_relative_eq;
use chrono::NaiveDate;
use reservoir_npv::config::Config;
use reservoir_npv::{compute_npv, EclipseSummary, NpvObjective, SummaryError, SummarySource};

enum Data<'a> {
    Int(&'a [i32]),
    Real(&'a [f32]),
    Chars(&'a [&'a str]),
    Mess,
}

fn record(out: &mut Vec<u8>, body: &[u8]) {
    let len = (body.len() as i32).to_be_bytes();
    out.extend_from_slice(&len);
    out.extend_from_slice(body);
    out.extend_from_slice(&len);
}

fn keyword(out: &mut Vec<u8>, name: &str, data: Data<'_>) {
    let (count, tag, items, block): (usize, &[u8], Vec<Vec<u8>>, usize) = match data {
        Data::Int(v) => (v.len(), &b"INTE"[..], v.iter().map(|x| x.to_be_bytes().to_vec()).collect(), 1000),
        Data::Real(v) => (v.len(), &b"REAL"[..], v.iter().map(|x| x.to_be_bytes().to_vec()).collect(), 1000),
        Data::Chars(v) => (
            v.len(),
            &b"CHAR"[..],
            v.iter().map(|s| format!("{s:<8}").into_bytes()).collect(),
            105,
        ),
        Data::Mess => (0, &b"MESS"[..], Vec::new(), 1),
    };
    let mut header = format!("{name:<8}").into_bytes();
    header.extend_from_slice(&(count as i32).to_be_bytes());
    header.extend_from_slice(tag);
    record(out, &header);
    for chunk in items.chunks(block) {
        record(out, &chunk.concat());
    }
}

/// TIME, FGIT, WGIT:INJ1, WOPT:PROD1 네 벡터와 세 보고 단계를 가진 요약 파일을 만든다.
fn write_case(dir: &Path) -> PathBuf {
    write_summary(
        dir,
        [1, 1, 2020],
        &[
            [0.0, 0.0, 0.0, 0.0, 0.0],
            [366.0, 100.0, 40.0, 500.0, 0.0],
            [731.0, 250.0, 40.0, 900.0, 0.0],
        ],
    )
}

/// 시작일(`[일, 월, 연]`)과 보고 단계별 PARAMS(TIME, FGIT, WGIT:INJ1, WOPT:PROD1, WGIT)로
/// 요약 파일을 만든다.
fn write_summary(dir: &Path, startdat: [i32; 3], steps: &[[f32; 5]]) -> PathBuf {
    let base = dir.join("CASE");

    let mut spec = Vec::new();
    keyword(&mut spec, "DIMENS", Data::Int(&[5, 10, 10, 3, 0, -1]));
    keyword(
        &mut spec,
        "KEYWORDS",
        Data::Chars(&["TIME", "FGIT", "WGIT", "WOPT", "WGIT"]),
    );
    keyword(
        &mut spec,
        "WGNAMES",
        Data::Chars(&[":+:+:+:+", ":+:+:+:+", "INJ1", "PROD1", ":+:+:+:+"]),
    );
    keyword(&mut spec, "NUMS", Data::Int(&[0, 0, 0, 0, 0]));
    keyword(
        &mut spec,
        "UNITS",
        Data::Chars(&["DAYS", "SM3", "SM3", "SM3", "SM3"]),
    );
    keyword(&mut spec, "STARTDAT", Data::Int(&startdat));
    fs::write(base.with_extension("SMSPEC"), spec).expect("write SMSPEC");

    let mut data = Vec::new();
    keyword(&mut data, "SEQHDR", Data::Int(&[0]));
    for (i, params) in steps.iter().enumerate() {
        keyword(&mut data, "MINISTEP", Data::Int(&[i as i32]));
        keyword(&mut data, "PARAMS", Data::Real(params));
    }
    keyword(&mut data, "ENDDATA", Data::Mess);
    fs::write(base.with_extension("UNSMRY"), data).expect("write UNSMRY");
    base
}

fn gas_component(well: &str, data_type: &str) -> reservoir_npv::NpvComponentSpec {
    reservoir_npv::NpvComponentSpec {
        well_name: well.to_string(),
        fluid_type: "gas".to_string(),
        flow_type: "injection".to_string(),
        data_type: data_type.to_string(),
        interval: "yearly".to_string(),
        fluid_price: 2.0,
        discount_factor: 0.1,
    }
}

#[test]
fn reads_header_and_report_steps() {
    let dir = tempfile::tempdir().expect("temp dir");
    let summary = EclipseSummary::open(write_case(dir.path())).expect("open");

    assert_eq!(summary.start_date(), NaiveDate::from_ymd_opt(2020, 1, 1).expect("date"));
    assert_eq!(summary.end_date(), NaiveDate::from_ymd_opt(2022, 1, 1).expect("date"));
    let report_dates = [
        summary.start_date(),
        NaiveDate::from_ymd_opt(2021, 1, 1).expect("date"),
        summary.end_date(),
    ];
    assert_eq!(
        summary.vector_at("TIME", &report_dates).expect("TIME"),
        vec![0.0, 366.0, 731.0]
    );
    assert_eq!(summary.keys(), vec!["FGIT", "TIME", "WGIT:INJ1", "WOPT:PROD1"]);
    assert!(summary.has_vector("WOPT:PROD1"));
    assert!(!summary.has_vector("WGIT"));

    let mid = NaiveDate::from_ymd_opt(2021, 7, 2).expect("date");
    let values = summary.vector_at("FGIT", &[mid]).expect("FGIT");
    assert_relative_eq!(values[0], 100.0 + 150.0 * 182.0 / 365.0, max_relative = 1e-9);
}

#[test]
fn evaluates_objective_from_binary_summary() {
    let dir = tempfile::tempdir().expect("temp dir");
    let summary = EclipseSummary::open(write_case(dir.path())).expect("open");
    let value = NpvObjective::new(vec![gas_component("", "field"), gas_component("INJ1", "well")])
        .evaluate(&summary)
        .expect("objective");
    assert_relative_eq!(
        value.net_present_value,
        200.0 + 300.0 / 1.1 + 80.0,
        max_relative = 1e-9
    );
}

#[test]
fn mid_year_start_clamps_grid_before_first_step() {
    // 2020-03-15 시작, 첫 보고는 10일 뒤이고 이미 누적량 30이 있다.
    // 연 격자 2020-01-01은 첫 보고보다 앞서므로 첫 값(30)으로 고정된다.
    let dir = tempfile::tempdir().expect("temp dir");
    let base = write_summary(
        dir.path(),
        [15, 3, 2020],
        &[
            [10.0, 30.0, 0.0, 0.0, 0.0],
            [292.0, 130.0, 0.0, 0.0, 0.0],
            [657.0, 280.0, 0.0, 0.0, 0.0],
        ],
    );
    let summary = EclipseSummary::open(&base).expect("open");
    assert_eq!(summary.start_date(), NaiveDate::from_ymd_opt(2020, 3, 15).expect("date"));
    assert_eq!(summary.end_date(), NaiveDate::from_ymd_opt(2022, 1, 1).expect("date"));

    let result = compute_npv(&summary, &[gas_component("", "field")]).expect("npv");
    assert_eq!(result.components[0].periods, 2);
    assert_relative_eq!(result.npv, 100.0 * 2.0 + 150.0 * 2.0 / 1.1, max_relative = 1e-9);
}

#[test]
fn time_beyond_calendar_is_rejected() {
    let dir = tempfile::tempdir().expect("temp dir");
    let base = write_summary(
        dir.path(),
        [1, 1, 2020],
        &[[0.0, 0.0, 0.0, 0.0, 0.0], [1.0e9, 100.0, 0.0, 0.0, 0.0]],
    );
    assert!(matches!(
        EclipseSummary::open(&base),
        Err(SummaryError::InvalidTimes(_))
    ));
}

#[test]
fn non_finite_time_is_malformed() {
    let dir = tempfile::tempdir().expect("temp dir");
    let base = write_summary(
        dir.path(),
        [1, 1, 2020],
        &[[0.0, 0.0, 0.0, 0.0, 0.0], [f32::NAN, 100.0, 0.0, 0.0, 0.0]],
    );
    assert!(matches!(
        EclipseSummary::open(&base),
        Err(SummaryError::Malformed(_))
    ));
}

#[test]
fn missing_artifact_is_reported() {
    let dir = tempfile::tempdir().expect("temp dir");
    match EclipseSummary::open(dir.path().join("NOPE")) {
        Err(SummaryError::ArtifactNotFound(path)) => {
            assert!(path.ends_with("NOPE.SMSPEC"));
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn missing_data_file_is_reported() {
    let dir = tempfile::tempdir().expect("temp dir");
    let base = write_case(dir.path());
    match EclipseSummary::open_with_extension(&base, "SMSPEC_X") {
        Err(SummaryError::ArtifactNotFound(path)) => assert!(path.ends_with("CASE.SMSPEC_X")),
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn truncated_data_file_is_malformed() {
    let dir = tempfile::tempdir().expect("temp dir");
    let base = write_case(dir.path());
    let data_path = base.with_extension("UNSMRY");
    let bytes = fs::read(&data_path).expect("read");
    fs::write(&data_path, &bytes[..bytes.len() - 6]).expect("truncate");
    assert!(matches!(
        EclipseSummary::open(&base),
        Err(SummaryError::Malformed(_))
    ));
}

#[test]
fn config_driven_objective_with_external_term() {
    let dir = tempfile::tempdir().expect("temp dir");
    let base = write_case(dir.path());
    let external = dir.path().join("external.txt");
    fs::write(&external, "12.5\n").expect("write external");

    let toml = format!(
        r#"
        [summary]
        base_name = {base:?}

        [[components]]
        wellname = "PROD1"
        fluidtype = "oil"
        flowtype = "production"
        datatype = "well"
        interval = "yearly"
        fluidprice = 1.0
        discountfactor = 0.0

        [auxiliary]
        file_path = {external:?}
        coefficient = -2.0
        "#,
        base = base.display().to_string(),
        external = external.display().to_string(),
    );
    let cfg = Config::from_toml(&toml).expect("config");
    let summary =
        EclipseSummary::open_with_extension(&cfg.summary.base_name, &cfg.summary.extension)
            .expect("open");
    let value = cfg.objective().evaluate(&summary).expect("objective");
    assert_relative_eq!(value.net_present_value, 900.0);
    assert_relative_eq!(value.auxiliary, -25.0);
    assert_relative_eq!(value.objective_value(), 875.0);
}
