//! ECLIPSE 형식 이진 요약 파일(`.SMSPEC` + `.UNSMRY`) 리더.
//!
//! 파일은 빅엔디언 Fortran unformatted 레코드로 구성된다. 각 키워드는 16바이트
//! 헤더 레코드(이름 8바이트, 개수 i32, 자료형 4바이트) 뒤에 자료 레코드 블록이
//! 이어진다. 두 파일 모두 `open` 안에서 전부 읽고 바로 닫는다.

use std::collections::HashMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{debug, info};

use super::{interpolate, report_end_date, SummaryError, SummarySource};

/// 기본 요약 데이터 확장자.
pub const DEFAULT_EXTENSION: &str = "UNSMRY";

/// 헤더(명세) 파일 확장자.
pub const SPEC_EXTENSION: &str = "SMSPEC";

/// 이름이 없는 웰/그룹 벡터에 쓰이는 자리표시자.
const DUMMY_NAME: &str = ":+:+:+:+";

#[derive(Debug, Clone, PartialEq)]
enum KeywordData {
    Int(Vec<i32>),
    Real(Vec<f32>),
    Double(Vec<f64>),
    Logical(Vec<bool>),
    Chars(Vec<String>),
    Message,
}

#[derive(Debug, Clone)]
struct Keyword {
    name: String,
    data: KeywordData,
}

#[derive(Debug, Clone, Copy)]
enum ItemKind {
    Int,
    Real,
    Double,
    Logical,
    Chars(usize),
    Message,
}

impl ItemKind {
    fn parse(tag: &[u8]) -> Option<ItemKind> {
        match tag {
            b"INTE" => Some(ItemKind::Int),
            b"REAL" => Some(ItemKind::Real),
            b"DOUB" => Some(ItemKind::Double),
            b"LOGI" => Some(ItemKind::Logical),
            b"CHAR" => Some(ItemKind::Chars(8)),
            b"MESS" => Some(ItemKind::Message),
            [b'C', digits @ ..] => std::str::from_utf8(digits)
                .ok()
                .and_then(|d| d.parse::<usize>().ok())
                .filter(|&n| n > 0)
                .map(ItemKind::Chars),
            _ => None,
        }
    }

    fn size(&self) -> usize {
        match self {
            ItemKind::Int | ItemKind::Real | ItemKind::Logical => 4,
            ItemKind::Double => 8,
            ItemKind::Chars(n) => *n,
            ItemKind::Message => 0,
        }
    }
}

/// Fortran 레코드 단위로 바이트열을 읽는다.
struct RecordReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> RecordReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], SummaryError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.bytes.len())
            .ok_or_else(|| SummaryError::Malformed(format!("{} 바이트 위치에서 파일이 끝남", self.pos)))?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn marker(&mut self) -> Result<i32, SummaryError> {
        let raw = self.take(4)?;
        Ok(i32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]))
    }

    fn record(&mut self) -> Result<&'a [u8], SummaryError> {
        let head = self.marker()?;
        let len = usize::try_from(head)
            .map_err(|_| SummaryError::Malformed(format!("음수 레코드 길이 {head}")))?;
        let body = self.take(len)?;
        let tail = self.marker()?;
        if tail != head {
            return Err(SummaryError::Malformed(format!(
                "레코드 길이 표식 불일치 ({head} != {tail})"
            )));
        }
        Ok(body)
    }

    fn keyword(&mut self) -> Result<Option<Keyword>, SummaryError> {
        if self.pos >= self.bytes.len() {
            return Ok(None);
        }
        let header = self.record()?;
        if header.len() != 16 {
            return Err(SummaryError::Malformed(format!(
                "키워드 헤더 길이 {} (16 필요)",
                header.len()
            )));
        }
        let name = String::from_utf8_lossy(&header[0..8]).trim_end().to_string();
        let count = i32::from_be_bytes([header[8], header[9], header[10], header[11]]);
        let count = usize::try_from(count)
            .map_err(|_| SummaryError::Malformed(format!("{name}: 음수 항목 수 {count}")))?;
        let kind = ItemKind::parse(&header[12..16]).ok_or_else(|| {
            SummaryError::Malformed(format!(
                "{name}: 알 수 없는 자료형 {}",
                String::from_utf8_lossy(&header[12..16])
            ))
        })?;

        let size = kind.size();
        let mut raw = Vec::with_capacity(count.saturating_mul(size).min(self.bytes.len()));
        let mut remaining = if size == 0 { 0 } else { count };
        while remaining > 0 {
            let block = self.record()?;
            let items = block.len() / size;
            if items == 0 || block.len() % size != 0 || items > remaining {
                return Err(SummaryError::Malformed(format!("{name}: 자료 블록 크기 {}", block.len())));
            }
            raw.extend_from_slice(block);
            remaining -= items;
        }

        let data = decode(kind, &raw);
        Ok(Some(Keyword { name, data }))
    }
}

fn decode(kind: ItemKind, raw: &[u8]) -> KeywordData {
    match kind {
        ItemKind::Int => KeywordData::Int(
            raw.chunks_exact(4)
                .map(|c| i32::from_be_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        ),
        ItemKind::Real => KeywordData::Real(
            raw.chunks_exact(4)
                .map(|c| f32::from_be_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        ),
        ItemKind::Double => KeywordData::Double(
            raw.chunks_exact(8)
                .map(|c| f64::from_be_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]))
                .collect(),
        ),
        ItemKind::Logical => KeywordData::Logical(
            raw.chunks_exact(4)
                .map(|c| c.iter().any(|&b| b != 0))
                .collect(),
        ),
        ItemKind::Chars(n) => KeywordData::Chars(
            raw.chunks_exact(n)
                .map(|c| String::from_utf8_lossy(c).trim().to_string())
                .collect(),
        ),
        ItemKind::Message => KeywordData::Message,
    }
}

fn read_keywords(path: &Path) -> Result<Vec<Keyword>, SummaryError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(SummaryError::ArtifactNotFound(path.to_path_buf()))
        }
        Err(e) => return Err(SummaryError::Io(e)),
    };
    let mut reader = RecordReader::new(&bytes);
    let mut keywords = Vec::new();
    while let Some(kw) = reader.keyword()? {
        keywords.push(kw);
    }
    debug!(path = %path.display(), keywords = keywords.len(), "read summary file");
    Ok(keywords)
}

/// `<base>.<ext>` 경로를 만든다. base에 점이 있어도 확장자를 바꾸지 않고 덧붙인다.
pub fn artifact_path(base: &Path, extension: &str) -> PathBuf {
    let mut name = OsString::from(base.as_os_str());
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

/// 요약 벡터의 조회 키를 만든다. 웰/그룹은 `KW:NAME`, 구역/블록은 `KW:NUM`,
/// 완결(connection)은 `KW:NAME:NUM`, 그 외는 키워드 그대로다.
fn vector_key(keyword: &str, name: Option<&str>, num: Option<i32>) -> Option<String> {
    let name = name.filter(|n| !n.is_empty() && *n != DUMMY_NAME);
    let num = num.filter(|n| *n > 0);
    match keyword.chars().next()? {
        'W' | 'G' => name.map(|n| format!("{keyword}:{n}")),
        'C' => match (name, num) {
            (Some(n), Some(i)) => Some(format!("{keyword}:{n}:{i}")),
            _ => None,
        },
        'R' | 'B' => Some(match num {
            Some(i) => format!("{keyword}:{i}"),
            None => keyword.to_string(),
        }),
        _ => Some(keyword.to_string()),
    }
}

/// 이진 요약 파일에서 읽어 들인 요약 데이터.
#[derive(Debug, Clone)]
pub struct EclipseSummary {
    start: NaiveDate,
    end: NaiveDate,
    report_days: Vec<f64>,
    vectors: HashMap<String, Vec<f64>>,
}

impl EclipseSummary {
    /// `<base>.SMSPEC`와 `<base>.UNSMRY`를 읽는다.
    pub fn open(base: impl AsRef<Path>) -> Result<Self, SummaryError> {
        Self::open_with_extension(base, DEFAULT_EXTENSION)
    }

    /// 요약 데이터 확장자를 지정하여 연다.
    pub fn open_with_extension(base: impl AsRef<Path>, extension: &str) -> Result<Self, SummaryError> {
        let base = base.as_ref();
        let spec_path = artifact_path(base, SPEC_EXTENSION);
        let data_path = artifact_path(base, extension);

        let spec = read_keywords(&spec_path)?;
        let mut keywords = None;
        let mut names = None;
        let mut nums = None;
        let mut startdat = None;
        for kw in spec {
            match (kw.name.as_str(), kw.data) {
                ("KEYWORDS", KeywordData::Chars(v)) => keywords = Some(v),
                ("WGNAMES" | "NAMES", KeywordData::Chars(v)) => names = Some(v),
                ("NUMS", KeywordData::Int(v)) => nums = Some(v),
                ("STARTDAT", KeywordData::Int(v)) => startdat = Some(v),
                _ => {}
            }
        }
        let keywords =
            keywords.ok_or_else(|| SummaryError::Malformed("SMSPEC에 KEYWORDS 없음".into()))?;
        let start = match startdat.as_deref() {
            Some([day, month, year, ..]) => u32::try_from(*month)
                .ok()
                .zip(u32::try_from(*day).ok())
                .and_then(|(m, d)| NaiveDate::from_ymd_opt(*year, m, d)),
            _ => None,
        }
        .ok_or_else(|| SummaryError::Malformed("SMSPEC STARTDAT 오류".into()))?;
        let time_index = keywords
            .iter()
            .position(|k| k == "TIME")
            .ok_or_else(|| SummaryError::Malformed("TIME 벡터 없음".into()))?;

        let mut steps: Vec<Vec<f64>> = Vec::new();
        for kw in read_keywords(&data_path)? {
            if kw.name != "PARAMS" {
                continue;
            }
            let params: Vec<f64> = match kw.data {
                KeywordData::Real(v) => v.into_iter().map(f64::from).collect(),
                KeywordData::Double(v) => v,
                _ => return Err(SummaryError::Malformed("PARAMS 자료형 오류".into())),
            };
            if params.len() != keywords.len() {
                return Err(SummaryError::Malformed(format!(
                    "PARAMS 길이 {} (KEYWORDS {}개)",
                    params.len(),
                    keywords.len()
                )));
            }
            steps.push(params);
        }
        if steps.is_empty() {
            return Err(SummaryError::Malformed("보고 단계(PARAMS) 없음".into()));
        }

        let report_days: Vec<f64> = steps.iter().map(|p| p[time_index]).collect();
        if let Some(t) = report_days.iter().find(|t| !t.is_finite()) {
            return Err(SummaryError::Malformed(format!("TIME 값 {t}")));
        }
        let end = report_end_date(start, &report_days)?;

        let mut vectors = HashMap::new();
        for (i, keyword) in keywords.iter().enumerate() {
            let name = names.as_ref().and_then(|n| n.get(i)).map(String::as_str);
            let num = nums.as_ref().and_then(|n| n.get(i)).copied();
            if let Some(key) = vector_key(keyword, name, num) {
                vectors
                    .entry(key)
                    .or_insert_with(|| steps.iter().map(|p| p[i]).collect());
            }
        }

        info!(
            path = %data_path.display(),
            vectors = vectors.len(),
            steps = report_days.len(),
            "opened summary"
        );
        Ok(Self {
            start,
            end,
            report_days,
            vectors,
        })
    }

    /// 조회 가능한 벡터 키 목록 (정렬됨).
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.vectors.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

impl SummarySource for EclipseSummary {
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
