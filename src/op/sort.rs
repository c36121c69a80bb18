use crate::config::SortDirection;
use std::cmp::Ordering;

/// 默认比较：相等为0，小于为`-direction`，大于为`direction`。
///
/// 无法比较的值（例如`NaN`）视为相等，稳定排序下保持原有顺序。
#[inline]
pub(crate) fn smart_cmp<T: PartialOrd + ?Sized>(a: &T, b: &T, direction: SortDirection) -> Ordering {
    match a.partial_cmp(b) {
        Some(ordering) => direction.apply(ordering),
        None => Ordering::Equal,
    }
}

/// 稳定归并排序，比较函数不必满足全序。
///
/// 只有右侧元素严格小于左侧元素时才会先取右侧元素，因此不满足全序的比较
/// 只会影响结果的顺序，不会导致panic。
pub(crate) fn stable_sort_by<T, F>(mut items: Vec<T>, cmp: &F) -> Vec<T>
where
    F: Fn(&T, &T) -> Ordering + ?Sized,
{
    if items.len() <= 1 {
        return items;
    }
    let right = items.split_off(items.len() / 2);
    merge(stable_sort_by(items, cmp), stable_sort_by(right, cmp), cmp)
}

fn merge<T, F>(left: Vec<T>, right: Vec<T>, cmp: &F) -> Vec<T>
where
    F: Fn(&T, &T) -> Ordering + ?Sized,
{
    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    loop {
        let take_right = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => cmp(l, r) == Ordering::Greater,
            (Some(_), None) => false,
            (None, Some(_)) => true,
            (None, None) => return merged,
        };
        merged.extend(if take_right { right.next() } else { left.next() });
    }
}
