use std::ops::Range;

/// 按照数组切片的规则把`[start, end)`解析为实际的下标范围，负数表示从末尾倒数。
pub(crate) fn resolve(start: Option<isize>, end: Option<isize>, len: usize) -> Range<usize> {
    let start = start.map_or(0, |s| clamp(s, len));
    let end = end.map_or(len, |e| clamp(e, len));
    if start >= end { start..start } else { start..end }
}

/// 起止下标都不为负时无需知道总长度，可以流式处理。
#[inline]
pub(crate) fn is_streamable(start: Option<isize>, end: Option<isize>) -> bool {
    start.is_none_or(|s| s >= 0) && end.is_none_or(|e| e >= 0)
}

#[inline]
fn clamp(idx: isize, len: usize) -> usize {
    if idx < 0 { len.saturating_sub(idx.unsigned_abs()) } else { (idx as usize).min(len) }
}
