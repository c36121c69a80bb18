use crate::err::PipeErr;
use std::cmp::Ordering;
use std::str::FromStr;
use unicase::UniCase;

/// 排序方向。
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum SortDirection {
    /// 正序，`"asc"`、`"1"` 或 `1`。
    #[default]
    Asc,
    /// 逆序，`"desc"`、`"-1"` 或 `-1`。
    Desc,
}

impl SortDirection {
    /// 方向的数值形式：正序为1，逆序为-1。
    pub fn sign(self) -> i8 {
        match self {
            SortDirection::Asc => 1,
            SortDirection::Desc => -1,
        }
    }

    /// 按照方向调整正序的比较结果。
    #[inline]
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

impl FromStr for SortDirection {
    type Err = PipeErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = UniCase::new(s.trim());
        if token == UniCase::new("asc") || token == UniCase::new("1") {
            Ok(SortDirection::Asc)
        } else if token == UniCase::new("desc") || token == UniCase::new("-1") {
            Ok(SortDirection::Desc)
        } else {
            Err(PipeErr::ParseSortDirectionErr(s.to_owned()))
        }
    }
}

impl TryFrom<i64> for SortDirection {
    type Error = PipeErr;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(SortDirection::Asc),
            -1 => Ok(SortDirection::Desc),
            _ => Err(PipeErr::SortDirectionNumErr(value)),
        }
    }
}

/// 合并参数：分隔符、前缀和后缀。
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct JoinInfo {
    pub delimiter: String,
    pub prefix: String,
    pub postfix: String,
}

impl JoinInfo {
    pub fn new(delimiter: impl Into<String>) -> JoinInfo {
        JoinInfo { delimiter: delimiter.into(), ..Default::default() }
    }

    pub fn with_affix(delimiter: impl Into<String>, prefix: impl Into<String>, postfix: impl Into<String>) -> JoinInfo {
        JoinInfo { delimiter: delimiter.into(), prefix: prefix.into(), postfix: postfix.into() }
    }
}
