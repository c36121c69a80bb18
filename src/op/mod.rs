pub(crate) mod fork;
pub(crate) mod join;
pub(crate) mod slice;
pub(crate) mod sort;

use crate::err::PipeErr;
use itertools::EitherOrBoth;
use regex::Regex;
use rustc_hash::FxHashSet;
use std::hash::Hash;

/// `exclude`和`pick`使用的成员判断，多个值时使用哈希集合。
#[derive(Debug)]
pub(crate) enum Membership<T> {
    Empty,
    One(T),
    Many(FxHashSet<T>),
}

impl<T: Eq + Hash> Membership<T> {
    pub(crate) fn new(values: impl IntoIterator<Item = T>) -> Membership<T> {
        let mut values = values.into_iter();
        match (values.next(), values.next()) {
            (None, _) => Membership::Empty,
            (Some(one), None) => Membership::One(one),
            (Some(first), Some(second)) => {
                let mut set = FxHashSet::default();
                set.insert(first);
                set.insert(second);
                set.extend(values);
                Membership::Many(set)
            }
        }
    }

    #[inline]
    pub(crate) fn contains(&self, item: &T) -> bool {
        match self {
            Membership::Empty => false,
            Membership::One(one) => one == item,
            Membership::Many(set) => set.contains(item),
        }
    }
}

pub(crate) fn compile_regex(pattern: &str) -> Result<Regex, PipeErr> {
    Regex::new(pattern).map_err(|err| PipeErr::ParseRegexErr { reg: pattern.to_owned(), err: err.to_string() })
}

/// 长拉链的一个位置，用`None`表示较短一侧已经耗尽。
#[inline]
pub(crate) fn fill_absent<A, B>(pair: EitherOrBoth<A, B>) -> (Option<A>, Option<B>) {
    match pair {
        EitherOrBoth::Both(a, b) => (Some(a), Some(b)),
        EitherOrBoth::Left(a) => (Some(a), None),
        EitherOrBoth::Right(b) => (None, Some(b)),
    }
}
