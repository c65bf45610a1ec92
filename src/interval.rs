use std::fmt;

/// 할인 및 시간 격자에 사용하는 시간 해상도.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interval {
    /// 1년 간격 (`1Y`)
    Yearly,
    /// 1개월 간격 (`1M`)
    Monthly,
}

impl Interval {
    /// 요약 파일 시간 해상도 코드(`1Y`, `1M`)를 반환한다.
    pub fn code(&self) -> &'static str {
        match self {
            Interval::Yearly => "1Y",
            Interval::Monthly => "1M",
        }
    }

    /// 한 간격이 차지하는 개월 수.
    pub fn months(&self) -> u32 {
        match self {
            Interval::Yearly => 12,
            Interval::Monthly => 1,
        }
    }

    /// 설정 문자열을 해상도로 변환한다.
    ///
    /// `yearly`, `Monthly` 같은 이름은 첫 글자로, `1Y`, `1M` 같은 코드는 단위
    /// 글자로 판별한다. 지원하지 않는 이름과 코드(`daily`, `1D`)는 해상도 코드를,
    /// 어느 형식에도 맞지 않는 값(`2Y`, `10Y`)은 입력 그대로를 담아 `Err`로 돌려준다.
    pub fn parse(value: &str) -> Result<Interval, String> {
        let trimmed = value.trim();
        let mut chars = trimmed.chars();
        let unit = match (chars.next(), chars.next(), chars.next()) {
            (Some('1'), Some(unit), None) => unit,
            (Some(first), _, _) if first.is_alphabetic() => first,
            _ => return Err(trimmed.to_string()),
        };
        match unit.to_ascii_uppercase() {
            'Y' => Ok(Interval::Yearly),
            'M' => Ok(Interval::Monthly),
            c => Err(format!("1{c}")),
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
