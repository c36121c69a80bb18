use crate::lazy::Lazy;
use crate::pipeline::Pipeline;
use crate::source::{SharedIter, Source};
use crate::{Element, Stream};
use std::ops::Index;
use std::rc::Rc;

/// 立即计算的容器。
///
/// 构造时即保存全部元素，之后不再改变；每个变换操作都会立即计算出新的缓冲区。
/// 克隆只复制缓冲区的引用。
#[derive(Debug, Clone, PartialEq)]
pub struct Eager<T> {
    items: Rc<Vec<T>>,
}

impl<T: Element> Eager<T> {
    /// 内存序列直接共享，其他数据源立即遍历一次。
    pub fn new(source: impl Into<Source<T>>) -> Eager<T> {
        let source = source.into();
        match source.as_buffer() {
            Some(buf) => Eager { items: buf.clone() },
            None => Eager::from_vec(source.open().collect()),
        }
    }

    pub fn from_vec(items: Vec<T>) -> Eager<T> {
        tracing::debug!(len = items.len(), "eager buffer built");
        Eager { items: Rc::new(items) }
    }

    pub fn buffer(&self) -> Rc<Vec<T>> {
        self.items.clone()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// 以当前缓冲区为数据源的惰性容器，缓冲区不会被复制。
    pub fn lazy(&self) -> Lazy<T> {
        Lazy::new(self.buffer())
    }
}

impl<T: Element> Pipeline for Eager<T> {
    type Item = T;
    type Kind<U: Element> = Eager<U>;

    fn stream(&self) -> Stream<T> {
        Box::new(SharedIter::new(self.buffer()))
    }

    fn materialize(&self) -> Rc<Vec<T>> {
        self.buffer()
    }

    fn derive<U, G>(&self, step: G) -> Eager<U>
    where
        U: Element,
        G: Fn(&Self) -> Stream<U> + 'static,
    {
        Eager::from_vec(step(self).collect())
    }

    fn size(&self) -> usize {
        self.items.len()
    }
}

impl<T> Index<usize> for Eager<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        &self.items[index]
    }
}

impl<T: Element> FromIterator<T> for Eager<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Eager::from_vec(iter.into_iter().collect())
    }
}

impl<T: Element> IntoIterator for Eager<T> {
    type Item = T;
    type IntoIter = Stream<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.stream()
    }
}

impl<'a, T> IntoIterator for &'a Eager<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{JoinInfo, SortDirection};
    use crate::err::PipeErr;
    use crate::source::Source;
    use itertools::Either;
    use regex::Regex;
    use std::collections::{BTreeMap, BTreeSet};
    use std::ops::ControlFlow;

    #[test]
    fn test_scenarios() {
        let nums = Eager::new(vec![1, 2, 3]);
        assert_eq!(nums.map(|n, _| n + 1).to_vec(), vec![2, 3, 4]);
        assert_eq!(nums.filter(|n, _| *n != 2).to_vec(), vec![1, 3]);
        assert_eq!(nums.sort(SortDirection::Desc).to_vec(), vec![3, 2, 1]);
        assert_eq!(nums.sort(SortDirection::Asc).to_vec(), vec![1, 2, 3]);
        assert_eq!(
            nums.zip_long(vec![4, 5, 6, 7]).to_vec(),
            vec![(Some(1), Some(4)), (Some(2), Some(5)), (Some(3), Some(6)), (None, Some(7))]
        );
        let files = Eager::new(vec!["index.html", "style.css", "script.js"]);
        let regex = Regex::new(r"\.(html|js)$").unwrap();
        assert_eq!(files.matching(&regex).to_vec(), vec!["index.html", "script.js"]);
        assert_eq!(Eager::new(vec![1, 1, 3]).unique().to_vec(), vec![1, 3]);
    }

    #[test]
    fn test_shares_buffer() {
        let buf = Rc::new(vec![1, 2, 3]);
        let eager = Eager::new(buf.clone());
        assert!(Rc::ptr_eq(&eager.buffer(), &buf));
        assert!(Rc::ptr_eq(&Eager::new(eager.clone()).buffer(), &buf));
    }

    #[test]
    fn test_access() {
        let eager = Eager::new(10..14);
        assert_eq!(eager.len(), 4);
        assert_eq!(eager[1], 11);
        assert_eq!(eager.get(3), Some(&13));
        assert_eq!(eager.get(4), None);
        assert_eq!(eager.as_slice(), &[10, 11, 12, 13]);
        assert_eq!(eager.iter().sum::<i32>(), 46);
        assert_eq!((&eager).into_iter().count(), 4);
        assert_eq!(eager.clone().into_iter().collect::<Vec<_>>(), vec![10, 11, 12, 13]);
        assert_eq!(eager.at(-1), Some(13));
        assert_eq!(eager.at(-5), None);
        assert_eq!(eager.at(4), None);
        assert_eq!(eager.size(), 4);
        assert!(Eager::new(Vec::<i32>::new()).is_empty());
    }

    #[test]
    fn test_computes_immediately() {
        let calls = Rc::new(std::cell::Cell::new(0));
        let counter = calls.clone();
        let mapped = Eager::new(vec![1, 2, 3]).map(move |n, _| {
            counter.set(counter.get() + 1);
            n
        });
        assert_eq!(calls.get(), 3);
        assert_eq!(mapped.to_vec(), vec![1, 2, 3]);
        assert_eq!(mapped.to_vec(), vec![1, 2, 3]);
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn test_order_preserved() {
        let set = BTreeSet::from(["c", "a", "b"]);
        assert_eq!(Eager::new(set).to_vec(), vec!["a", "b", "c"]);
        let map = BTreeMap::from([(2, "two"), (1, "one")]);
        assert_eq!(Eager::new(map).to_vec(), vec![(1, "one"), (2, "two")]);
        let generated = Eager::new(Source::once((0..4).map(|n| n * n)));
        assert_eq!(generated.to_vec(), vec![0, 1, 4, 9]);
        assert_eq!(generated.to_vec(), vec![0, 1, 4, 9]);
    }

    #[test]
    fn test_index_passed() {
        let eager = Eager::new(vec!["a", "b", "c"]);
        assert_eq!(eager.map(|s, i| format!("{s}{i}")).to_vec(), vec!["a0", "b1", "c2"]);
        assert_eq!(eager.filter(|_, i| i % 2 == 0).to_vec(), vec!["a", "c"]);
        let mut seen = vec![];
        eager.tap_self(|e| seen.push(e.len()));
        assert_eq!(seen, vec![3]);
    }

    #[test]
    fn test_flat() {
        let nested = Eager::new(vec![vec![1, 2], vec![], vec![3]]);
        assert_eq!(nested.flat().to_vec(), vec![1, 2, 3]);
        let mixed: Eager<Either<i32, Vec<i32>>> = Eager::new(vec![Either::Left(1), Either::Right(vec![2, 3]), Either::Left(4)]);
        assert_eq!(mixed.flat_loose().to_vec(), vec![1, 2, 3, 4]);
        assert_eq!(Eager::new(vec![1, 2]).flat_map(|n, _| vec![n; n as usize]).to_vec(), vec![1, 2, 2]);
    }

    #[test]
    fn test_optional() {
        let opts = Eager::new(vec![Some(1), None, Some(3)]);
        assert_eq!(opts.flat_some().to_vec(), vec![1, 3]);
        assert_eq!(opts.not_null().to_vec(), vec![1, 3]);
        assert_eq!(opts.not_nullable().size(), 2);
        assert_eq!(Eager::new(vec![1, 2, 3]).filter_map(|n, _| (n != 2).then_some(n * 2)).to_vec(), vec![2, 6]);
    }

    #[test]
    fn test_exclude_pick() {
        let eager = Eager::new(vec![1, 2, 3, 2, 4]);
        assert_eq!(eager.exclude([2]).to_vec(), vec![1, 3, 4]);
        assert_eq!(eager.exclude([2, 4]).to_vec(), vec![1, 3]);
        assert_eq!(eager.exclude([]).to_vec(), vec![1, 2, 3, 2, 4]);
        assert_eq!(eager.pick([2, 9]).to_vec(), vec![2, 2]);
        assert!(eager.pick([]).is_empty());
    }

    #[test]
    fn test_matching_pattern() {
        let eager = Eager::new(vec!["a1", "b", "c22"]);
        assert_eq!(eager.matching_pattern(r"\d").unwrap().to_vec(), vec!["a1", "c22"]);
        assert_eq!(eager.not_matching_pattern(r"\d").unwrap().to_vec(), vec!["b"]);
        assert!(matches!(eager.matching_pattern("(").map(|_| ()), Err(PipeErr::ParseRegexErr { .. })));
        let nums = Eager::new(vec![10, 21, 30]);
        assert_eq!(nums.matching_pattern("^[12]").unwrap().to_vec(), vec![10, 21]);
    }

    #[test]
    fn test_positional() {
        let eager = Eager::new(1..=6);
        assert_eq!(eager.skip(4).to_vec(), vec![5, 6]);
        assert_eq!(eager.take(2).to_vec(), vec![1, 2]);
        assert_eq!(eager.take(10).size(), 6);
        assert_eq!(eager.skip_while(|n| *n < 3).to_vec(), vec![3, 4, 5, 6]);
        assert_eq!(eager.take_while(|n| *n < 3).to_vec(), vec![1, 2]);
        assert_eq!(eager.slice(Some(1), Some(3)).to_vec(), vec![2, 3]);
        assert_eq!(eager.slice(Some(-2), None).to_vec(), vec![5, 6]);
        assert_eq!(eager.slice(None, Some(-4)).to_vec(), vec![1, 2]);
        assert_eq!(eager.slice(Some(4), Some(2)).to_vec(), Vec::<i32>::new());
        assert_eq!(eager.slice(None, None).to_vec(), eager.to_vec());
    }

    #[test]
    fn test_add() {
        let eager = Eager::new(vec![2, 3]);
        assert_eq!(eager.push([4, 5]).to_vec(), vec![2, 3, 4, 5]);
        assert_eq!(eager.unshift([0, 1]).to_vec(), vec![0, 1, 2, 3]);
        assert_eq!(eager.concat(vec![9]).to_vec(), vec![2, 3, 9]);
        assert_eq!(eager.precat(Eager::new(vec![7])).to_vec(), vec![7, 2, 3]);
        assert_eq!(eager.zip_short(vec!["a"]).to_vec(), vec![(2, "a")]);
    }

    #[test]
    fn test_sort() {
        let words = Eager::new(vec!["bb", "a", "ccc", "dd"]);
        assert_eq!(words.sort_by_key(|w| w.len(), SortDirection::Asc).to_vec(), vec!["a", "bb", "dd", "ccc"]);
        assert_eq!(words.sort_by_key(|w| w.len(), SortDirection::Desc).to_vec(), vec!["ccc", "bb", "dd", "a"]);
        assert_eq!(words.sort_by(|a, b| b.cmp(a)).to_vec(), vec!["dd", "ccc", "bb", "a"]);
        assert_eq!(words.reverse().to_vec(), vec!["dd", "ccc", "a", "bb"]);
        assert_eq!(words.to_vec(), vec!["bb", "a", "ccc", "dd"]);
        let mut shuffled = words.shuffle().to_vec();
        shuffled.sort();
        assert_eq!(shuffled, vec!["a", "bb", "ccc", "dd"]);
    }

    #[test]
    fn test_reduce() {
        let eager = Eager::new(vec!["a", "b", "c"]);
        assert_eq!(eager.reduce(|acc, s, _| acc + s, String::new()), "abc");
        assert_eq!(eager.reduce_right(|acc, s, _| acc + s, String::new()), "cba");
        assert_eq!(eager.reduce_right(|mut acc, _, i| { acc.push(i); acc }, vec![]), vec![0, 1, 2]);
        assert_eq!(Eager::new(Vec::<i32>::new()).reduce(|acc, n, _| acc + n, 7), 7);
    }

    #[test]
    fn test_join() {
        let eager = Eager::new(vec![1, 2, 3]);
        assert_eq!(eager.join(", "), "1, 2, 3");
        assert_eq!(eager.join_default(), "123");
        assert_eq!(eager.join_with(&JoinInfo::with_affix("|", "<", ">")), "<1|2|3>");
        assert_eq!(Eager::new(Vec::<i32>::new()).join(","), "");
        assert_eq!(Eager::new(1..=5).join_chunks(2, JoinInfo::new("+")).unwrap().to_vec(), vec!["1+2", "3+4", "5"]);
        assert_eq!(eager.join_chunks(0, JoinInfo::default()).map(|_| ()), Err(PipeErr::ZeroChunkSize));
    }

    #[test]
    fn test_query() {
        let eager = Eager::new(vec![3, 8, 5, 8]);
        assert!(eager.every(|n, _| *n > 2));
        assert!(!eager.every(|n, _| *n > 3));
        assert!(eager.some(|n, i| *n == 5 && i == 2));
        assert!(!Eager::new(Vec::<i32>::new()).some(|_, _| true));
        assert!(Eager::new(Vec::<i32>::new()).every(|_, _| false));
        assert_eq!(eager.find(|n, _| n % 2 == 0), Some(8));
        assert_eq!(eager.find(|n, _| *n > 10), None);
        assert_eq!(eager.find_index(|n, _| *n == 5), Some(2));
        assert_eq!(eager.index_of(&8), Some(1));
        assert_eq!(eager.index_of(&1), None);
    }

    #[test]
    fn test_unique_by() {
        let eager = Eager::new(vec!["apple", "avocado", "banana", "blueberry", "cherry"]);
        assert_eq!(eager.unique_by(|s| s.chars().next()).to_vec(), vec!["apple", "banana", "cherry"]);
    }

    #[test]
    fn test_fork_split() {
        let eager = Eager::new(vec![1, 2, 3]);
        let forked = eager.fork((|e: Eager<i32>| e.map(|n, _| n * 10), |e: Eager<i32>| e.take(1)));
        assert_eq!(forked.to_vec(), vec![10, 20, 30, 1]);
        let split = eager.split((|e: Eager<i32>| e.size(), |e: Eager<i32>| e.join("-")));
        assert_eq!(split.to_vec(), vec![(3, "1-2-3".to_owned())]);
    }

    #[test]
    fn test_terminal() {
        let pairs = Eager::new(vec![("a", 1), ("b", 2), ("a", 3)]);
        let map = pairs.to_map();
        assert_eq!(map.len(), 2);
        assert_eq!(map["a"], 3);
        assert_eq!(Eager::new(vec![1, 1, 2]).to_set().len(), 2);
        let set: BTreeSet<i32> = Eager::new(vec![3, 1, 3]).collect();
        assert_eq!(set, BTreeSet::from([1, 3]));

        let mut seen = vec![];
        let flow = Eager::new(1..=5).for_each(|n, _| {
            seen.push(n);
            if n == 3 { ControlFlow::Break(()) } else { ControlFlow::Continue(()) }
        });
        assert_eq!(flow, ControlFlow::Break(()));
        assert_eq!(seen, vec![1, 2, 3]);
    }

    #[test]
    fn test_conversions() {
        let eager = Eager::new(vec![1, 2]);
        let lazy = eager.lazy();
        assert!(lazy.is_forced());
        assert_eq!(lazy.map(|n, _| n + 1).to_vec(), vec![2, 3]);
        let hose = eager.to_hose();
        assert_eq!(hose.to_vec(), vec![1, 2]);
        assert_eq!(hose.to_vec(), Vec::<i32>::new());
        assert_eq!(eager.to_vec(), vec![1, 2]);
    }

    #[test]
    fn test_empty_input() {
        let empty = Eager::new(Vec::<i32>::new());
        assert!(empty.sort(SortDirection::Asc).to_vec().is_empty());
        assert!(empty.sort_by_key(|n| -n, SortDirection::Desc).is_empty());
        assert!(empty.reverse().to_vec().is_empty());
        assert!(empty.slice(Some(-2), None).is_empty());
        assert_eq!(empty.find(|_, _| true), None);
        assert_eq!(empty.find_index(|_, _| true), None);
        assert_eq!(empty.index_of(&0), None);
        assert_eq!(empty.at(0), None);
        assert_eq!(empty.at(-1), None);
        assert_eq!(empty.reduce_right(|acc, n, _| acc + n, 5), 5);
        assert_eq!(empty.join(","), "");
    }

    #[test]
    fn test_sort_with_nan() {
        let items = (0..150).map(|i| if i % 3 == 0 { f64::NAN } else { ((i * 7) % 31) as f64 }).collect::<Vec<_>>();
        let sorted = Eager::new(items.clone()).sort(SortDirection::Asc);
        assert_eq!(sorted.size(), 150);
        assert_eq!(sorted.to_vec().iter().filter(|f| f.is_nan()).count(), 50);
        let by_key = Eager::new(items).sort_by_key(|f| -f, SortDirection::Asc);
        assert_eq!(by_key.size(), 150);
    }
}
