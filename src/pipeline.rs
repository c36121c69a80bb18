use crate::config::{JoinInfo, SortDirection};
use crate::err::PipeErr;
use crate::hose::Hose;
use crate::op::fork::{Forks, Splits};
use crate::op::join::{ChunkJoin, join_with};
use crate::op::sort::{smart_cmp, stable_sort_by};
use crate::op::{Membership, compile_regex, fill_absent, slice};
use crate::source::{SharedIter, Source};
use crate::{Element, PipeRes, Stream, boxed};
use itertools::{Either, Itertools};
use rand::seq::SliceRandom;
use regex::Regex;
use rustc_hash::{FxHashMap, FxHashSet};
use std::cmp::Ordering;
use std::fmt::Display;
use std::hash::Hash;
use std::ops::ControlFlow;
use std::rc::Rc;

/// 流水线：能够产生新的遍历，并提供全部变换操作。
///
/// 实现者只需要提供三个基本操作：
///
/// - [`stream`](Pipeline::stream)：打开一次新的遍历；
/// - [`materialize`](Pipeline::materialize)：得到完整的序列；
/// - [`derive`](Pipeline::derive)：根据一个“从上游产生新遍历”的步骤构造同种容器。
///
/// 其余操作都以这三者为基础实现一次，由各容器决定计算发生的时机。
/// 变换操作的回调均为`Fn`，惰性容器在重新遍历时可能再次调用它们。
pub trait Pipeline: Clone + 'static {
    type Item: Element;

    /// 同种容器，元素类型为`U`。
    type Kind<U: Element>: Pipeline<Item = U>;

    /// 打开一次新的遍历。
    fn stream(&self) -> Stream<Self::Item>;

    /// 完整的序列，惰性容器会在此时填充缓存。
    fn materialize(&self) -> Rc<Vec<Self::Item>>;

    /// 以`step`构造同种容器，`step`从上游容器产生新容器的一次遍历。
    fn derive<U, G>(&self, step: G) -> Self::Kind<U>
    where
        U: Element,
        G: Fn(&Self) -> Stream<U> + 'static;

    /* **************************************** 转换 **************************************** */

    fn map<U, F>(&self, f: F) -> Self::Kind<U>
    where
        U: Element,
        F: Fn(Self::Item, usize) -> U + 'static,
    {
        let f = Rc::new(f);
        self.derive(move |up| {
            let f = f.clone();
            boxed(up.stream().enumerate().map(move |(i, item)| f(item, i)))
        })
    }

    fn filter<F>(&self, pred: F) -> Self::Kind<Self::Item>
    where
        F: Fn(&Self::Item, usize) -> bool + 'static,
    {
        let pred = Rc::new(pred);
        self.derive(move |up| {
            let pred = pred.clone();
            boxed(up.stream().enumerate().filter(move |(i, item)| pred(item, *i)).map(|(_, item)| item))
        })
    }

    fn filter_map<U, F>(&self, f: F) -> Self::Kind<U>
    where
        U: Element,
        F: Fn(Self::Item, usize) -> Option<U> + 'static,
    {
        let f = Rc::new(f);
        self.derive(move |up| {
            let f = f.clone();
            boxed(up.stream().enumerate().filter_map(move |(i, item)| f(item, i)))
        })
    }

    /// 映射后展开一层，子序列按照父元素的顺序依次输出。
    fn flat_map<U, S, F>(&self, f: F) -> Self::Kind<U>
    where
        U: Element,
        S: IntoIterator<Item = U> + 'static,
        S::IntoIter: 'static,
        F: Fn(Self::Item, usize) -> S + 'static,
    {
        let f = Rc::new(f);
        self.derive(move |up| {
            let f = f.clone();
            boxed(up.stream().enumerate().flat_map(move |(i, item)| f(item, i)))
        })
    }

    /// 严格展开一层：每个元素都必须可迭代。
    ///
    /// 混合内容使用[`flat_loose`](Pipeline::flat_loose)。
    fn flat(&self) -> Self::Kind<<Self::Item as IntoIterator>::Item>
    where
        Self::Item: IntoIterator,
        <Self::Item as IntoIterator>::Item: Element,
        <Self::Item as IntoIterator>::IntoIter: 'static,
    {
        self.derive(|up| boxed(up.stream().flatten()))
    }

    /// 宽松展开一层：`Left`原样输出，`Right`展开。
    fn flat_loose<U, I>(&self) -> Self::Kind<U>
    where
        Self: Pipeline<Item = Either<U, I>>,
        U: Element,
        I: IntoIterator<Item = U> + 'static,
        I::IntoIter: 'static,
    {
        self.derive(|up| {
            boxed(up.stream().flat_map(|item| match item {
                Either::Left(one) => Either::Left(std::iter::once(one)),
                Either::Right(many) => Either::Right(many.into_iter()),
            }))
        })
    }

    /// 只保留`Some`并取出其中的值。
    fn flat_some<U>(&self) -> Self::Kind<U>
    where
        Self: Pipeline<Item = Option<U>>,
        U: Element,
    {
        self.derive(|up| boxed(up.stream().flatten()))
    }

    /// 丢弃空值。Rust只有一种空值，与[`flat_some`](Pipeline::flat_some)等价。
    fn not_null<U>(&self) -> Self::Kind<U>
    where
        Self: Pipeline<Item = Option<U>>,
        U: Element,
    {
        self.flat_some()
    }

    /// 同[`not_null`](Pipeline::not_null)。
    fn not_undefined<U>(&self) -> Self::Kind<U>
    where
        Self: Pipeline<Item = Option<U>>,
        U: Element,
    {
        self.flat_some()
    }

    /// 同[`not_null`](Pipeline::not_null)。
    fn not_nullable<U>(&self) -> Self::Kind<U>
    where
        Self: Pipeline<Item = Option<U>>,
        U: Element,
    {
        self.flat_some()
    }

    /// 对每个元素调用`f`，元素本身不变。
    fn tap<F>(&self, f: F) -> Self::Kind<Self::Item>
    where
        F: Fn(&Self::Item, usize) + 'static,
    {
        let f = Rc::new(f);
        self.derive(move |up| {
            let f = f.clone();
            boxed(up.stream().enumerate().inspect(move |(i, item)| f(item, *i)).map(|(_, item)| item))
        })
    }

    /// 以整个容器调用一次`f`，返回容器本身。
    fn tap_self<F>(&self, f: F) -> Self
    where
        F: FnOnce(&Self),
    {
        f(self);
        self.clone()
    }

    /* **************************************** 减少 **************************************** */

    fn exclude<V>(&self, values: V) -> Self::Kind<Self::Item>
    where
        V: IntoIterator<Item = Self::Item>,
        Self::Item: Eq + Hash,
    {
        let values = Rc::new(Membership::new(values));
        self.derive(move |up| {
            let values = values.clone();
            boxed(up.stream().filter(move |item| !values.contains(item)))
        })
    }

    fn pick<V>(&self, values: V) -> Self::Kind<Self::Item>
    where
        V: IntoIterator<Item = Self::Item>,
        Self::Item: Eq + Hash,
    {
        let values = Rc::new(Membership::new(values));
        self.derive(move |up| {
            let values = values.clone();
            boxed(up.stream().filter(move |item| values.contains(item)))
        })
    }

    /// 保留文本形式匹配正则的元素。
    fn matching(&self, regex: &Regex) -> Self::Kind<Self::Item>
    where
        Self::Item: Display,
    {
        let regex = regex.clone();
        self.derive(move |up| {
            let regex = regex.clone();
            boxed(up.stream().filter(move |item| regex.is_match(&item.to_string())))
        })
    }

    /// 丢弃文本形式匹配正则的元素。
    fn not_matching(&self, regex: &Regex) -> Self::Kind<Self::Item>
    where
        Self::Item: Display,
    {
        let regex = regex.clone();
        self.derive(move |up| {
            let regex = regex.clone();
            boxed(up.stream().filter(move |item| !regex.is_match(&item.to_string())))
        })
    }

    fn matching_pattern(&self, pattern: &str) -> PipeRes<Self::Kind<Self::Item>>
    where
        Self::Item: Display,
    {
        Ok(self.matching(&compile_regex(pattern)?))
    }

    fn not_matching_pattern(&self, pattern: &str) -> PipeRes<Self::Kind<Self::Item>>
    where
        Self::Item: Display,
    {
        Ok(self.not_matching(&compile_regex(pattern)?))
    }

    fn skip(&self, n: usize) -> Self::Kind<Self::Item> {
        self.derive(move |up| boxed(up.stream().skip(n)))
    }

    fn take(&self, n: usize) -> Self::Kind<Self::Item> {
        self.derive(move |up| boxed(up.stream().take(n)))
    }

    fn skip_while<F>(&self, pred: F) -> Self::Kind<Self::Item>
    where
        F: Fn(&Self::Item) -> bool + 'static,
    {
        let pred = Rc::new(pred);
        self.derive(move |up| {
            let pred = pred.clone();
            boxed(up.stream().skip_while(move |item| pred(item)))
        })
    }

    fn take_while<F>(&self, pred: F) -> Self::Kind<Self::Item>
    where
        F: Fn(&Self::Item) -> bool + 'static,
    {
        let pred = Rc::new(pred);
        self.derive(move |up| {
            let pred = pred.clone();
            boxed(up.stream().take_while(move |item| pred(item)))
        })
    }

    /// 数组切片语义的`[start, end)`，负数表示从末尾倒数。
    ///
    /// 起止都不为负时流式处理，否则需要先得到完整序列。
    fn slice(&self, start: Option<isize>, end: Option<isize>) -> Self::Kind<Self::Item> {
        self.derive(move |up| {
            if slice::is_streamable(start, end) {
                let from = start.unwrap_or(0) as usize;
                let rest = up.stream().skip(from);
                match end {
                    Some(end) => boxed(rest.take((end as usize).saturating_sub(from))),
                    None => boxed(rest),
                }
            } else {
                let buf = up.materialize();
                let range = slice::resolve(start, end, buf.len());
                boxed(SharedIter::new(buf).skip(range.start).take(range.len()))
            }
        })
    }

    /// 去重，保留首次出现的元素。
    fn unique(&self) -> Self::Kind<Self::Item>
    where
        Self::Item: Eq + Hash,
    {
        self.derive(|up| {
            let mut seen = FxHashSet::default();
            boxed(up.stream().filter(move |item| seen.insert(item.clone())))
        })
    }

    fn unique_by<K, F>(&self, key: F) -> Self::Kind<Self::Item>
    where
        K: Eq + Hash + 'static,
        F: Fn(&Self::Item) -> K + 'static,
    {
        let key = Rc::new(key);
        self.derive(move |up| {
            let key = key.clone();
            let mut seen = FxHashSet::default();
            boxed(up.stream().filter(move |item| seen.insert(key(item))))
        })
    }

    /* **************************************** 增加 **************************************** */

    fn push<V>(&self, items: V) -> Self::Kind<Self::Item>
    where
        V: IntoIterator<Item = Self::Item>,
    {
        let items = Rc::new(items.into_iter().collect::<Vec<_>>());
        self.derive(move |up| boxed(up.stream().chain(SharedIter::new(items.clone()))))
    }

    fn unshift<V>(&self, items: V) -> Self::Kind<Self::Item>
    where
        V: IntoIterator<Item = Self::Item>,
    {
        let items = Rc::new(items.into_iter().collect::<Vec<_>>());
        self.derive(move |up| boxed(SharedIter::new(items.clone()).chain(up.stream())))
    }

    fn concat(&self, other: impl Into<Source<Self::Item>>) -> Self::Kind<Self::Item> {
        let other = other.into();
        self.derive(move |up| boxed(up.stream().chain(other.open())))
    }

    fn precat(&self, other: impl Into<Source<Self::Item>>) -> Self::Kind<Self::Item> {
        let other = other.into();
        self.derive(move |up| boxed(other.open().chain(up.stream())))
    }

    /// 按位置配对，任一侧耗尽即停止。
    fn zip_short<U: Element>(&self, other: impl Into<Source<U>>) -> Self::Kind<(Self::Item, U)> {
        let other = other.into();
        self.derive(move |up| boxed(up.stream().zip(other.open())))
    }

    /// 按位置配对直到较长一侧耗尽，较短一侧缺失的位置为`None`。
    fn zip_long<U: Element>(&self, other: impl Into<Source<U>>) -> Self::Kind<(Option<Self::Item>, Option<U>)> {
        let other = other.into();
        self.derive(move |up| boxed(up.stream().zip_longest(other.open()).map(fill_absent)))
    }

    /// 每`size`个元素合并为一个字符串。
    fn join_chunks(&self, size: usize, info: JoinInfo) -> PipeRes<Self::Kind<String>>
    where
        Self::Item: Display,
    {
        if size == 0 {
            return Err(PipeErr::ZeroChunkSize);
        }
        let info = Rc::new(info);
        Ok(self.derive(move |up| boxed(ChunkJoin::new(up.stream(), size, info.clone()))))
    }

    /// 以多个分支处理同一容器，按分支顺序拼接结果。
    fn fork<U, F>(&self, forks: F) -> Self::Kind<U>
    where
        U: Element,
        F: Forks<Self, U> + 'static,
    {
        let forks = Rc::new(forks);
        self.derive(move |up| boxed(forks.fork(up).into_iter().flat_map(|source| source.open())))
    }

    /// 以多个分支处理同一容器，结果为只含一个元组的容器。
    fn split<S>(&self, splits: S) -> Self::Kind<S::Output>
    where
        S: Splits<Self> + 'static,
    {
        let splits = Rc::new(splits);
        self.derive(move |up| boxed(std::iter::once(splits.split(up))))
    }

    /* **************************************** 调整位置 **************************************** */

    /// 默认比较排序，不修改原容器。需要先得到完整序列。
    fn sort(&self, direction: SortDirection) -> Self::Kind<Self::Item>
    where
        Self::Item: PartialOrd,
    {
        self.sort_by(move |a, b| smart_cmp(a, b, direction))
    }

    fn sort_by<F>(&self, cmp: F) -> Self::Kind<Self::Item>
    where
        F: Fn(&Self::Item, &Self::Item) -> Ordering + 'static,
    {
        let cmp = Rc::new(cmp);
        self.derive(move |up| boxed(stable_sort_by(Vec::clone(&up.materialize()), &*cmp).into_iter()))
    }

    fn sort_by_key<K, F>(&self, key: F, direction: SortDirection) -> Self::Kind<Self::Item>
    where
        K: PartialOrd,
        F: Fn(&Self::Item) -> K + 'static,
    {
        self.sort_by(move |a, b| smart_cmp(&key(a), &key(b), direction))
    }

    /// 随机排序。
    fn shuffle(&self) -> Self::Kind<Self::Item> {
        self.derive(|up| {
            let mut items = Vec::clone(&up.materialize());
            items.shuffle(&mut rand::rng());
            boxed(items.into_iter())
        })
    }

    fn reverse(&self) -> Self::Kind<Self::Item> {
        self.derive(|up| boxed(SharedIter::new(up.materialize()).rev()))
    }

    /* **************************************** 终结操作 **************************************** */

    fn reduce<A, F>(&self, mut f: F, init: A) -> A
    where
        F: FnMut(A, Self::Item, usize) -> A,
    {
        self.stream().enumerate().fold(init, |acc, (i, item)| f(acc, item, i))
    }

    /// 先逆序再[`reduce`](Pipeline::reduce)，下标为逆序后的位置。
    fn reduce_right<A, F>(&self, f: F, init: A) -> A
    where
        F: FnMut(A, Self::Item, usize) -> A,
    {
        self.reverse().reduce(f, init)
    }

    /// 以分隔符合并，分隔符只出现在元素之间。
    fn join(&self, separator: &str) -> String
    where
        Self::Item: Display,
    {
        self.stream().join(separator)
    }

    fn join_default(&self) -> String
    where
        Self::Item: Display,
    {
        self.join("")
    }

    fn join_with(&self, info: &JoinInfo) -> String
    where
        Self::Item: Display,
    {
        join_with(self.stream(), info)
    }

    fn every<F>(&self, mut pred: F) -> bool
    where
        F: FnMut(&Self::Item, usize) -> bool,
    {
        self.stream().enumerate().all(|(i, item)| pred(&item, i))
    }

    fn some<F>(&self, mut pred: F) -> bool
    where
        F: FnMut(&Self::Item, usize) -> bool,
    {
        self.stream().enumerate().any(|(i, item)| pred(&item, i))
    }

    fn find<F>(&self, mut pred: F) -> Option<Self::Item>
    where
        F: FnMut(&Self::Item, usize) -> bool,
    {
        self.materialize().iter().enumerate().find(|(i, item)| pred(item, *i)).map(|(_, item)| item.clone())
    }

    fn find_index<F>(&self, mut pred: F) -> Option<usize>
    where
        F: FnMut(&Self::Item, usize) -> bool,
    {
        self.materialize().iter().enumerate().position(|(i, item)| pred(item, i))
    }

    fn index_of(&self, value: &Self::Item) -> Option<usize>
    where
        Self::Item: PartialEq,
    {
        self.materialize().iter().position(|item| item == value)
    }

    /// 按下标取值，负数表示从末尾倒数，越界为`None`。
    ///
    /// 对非随机访问的容器需要先得到完整序列。
    fn at(&self, index: isize) -> Option<Self::Item> {
        let buf = self.materialize();
        let idx = if index < 0 { buf.len().checked_sub(index.unsigned_abs())? } else { index as usize };
        buf.get(idx).cloned()
    }

    fn size(&self) -> usize {
        self.materialize().len()
    }

    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// 逐个处理元素，回调返回`ControlFlow::Break`时停止拉取。
    fn for_each<F>(&self, mut f: F) -> ControlFlow<()>
    where
        F: FnMut(Self::Item, usize) -> ControlFlow<()>,
    {
        self.stream().enumerate().try_for_each(|(i, item)| f(item, i))
    }

    fn to_vec(&self) -> Vec<Self::Item> {
        Vec::clone(&self.materialize())
    }

    fn to_set(&self) -> FxHashSet<Self::Item>
    where
        Self::Item: Eq + Hash,
    {
        self.materialize().iter().cloned().collect()
    }

    fn to_map<K, V>(&self) -> FxHashMap<K, V>
    where
        Self: Pipeline<Item = (K, V)>,
        K: Element + Eq + Hash,
        V: Element,
    {
        self.materialize().iter().cloned().collect()
    }

    fn collect<C>(&self) -> C
    where
        C: FromIterator<Self::Item>,
    {
        self.materialize().iter().cloned().collect()
    }

    /// 转为只能遍历一次的容器。
    fn to_hose(&self) -> Hose<Self::Item> {
        Hose::new(Source::pipeline(self.clone()))
    }
}
