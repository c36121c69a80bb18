use crate::eager::Eager;
use crate::hose::Hose;
use crate::lazy::Lazy;
use crate::pipeline::Pipeline;
use crate::{Element, Stream};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt::{Debug, Formatter};
use std::ops::{Range, RangeInclusive};
use std::rc::Rc;

/// 数据源。
///
/// 容器只通过[`Source::open`]获取迭代器，每次调用得到一次新的遍历。
pub enum Source<T> {
    /// 已经在内存中的有限序列，可以重复遍历。
    Buffer(Rc<Vec<T>>),
    /// 每次调用都返回新迭代器的工厂，结果不会被缓存。
    Factory(Rc<dyn Fn() -> Stream<T>>),
    /// 只能遍历一次的迭代器，之后的遍历为空。
    Once(Rc<RefCell<Option<Stream<T>>>>),
}

impl<T> Clone for Source<T> {
    fn clone(&self) -> Self {
        match self {
            Source::Buffer(buf) => Source::Buffer(buf.clone()),
            Source::Factory(factory) => Source::Factory(factory.clone()),
            Source::Once(cell) => Source::Once(cell.clone()),
        }
    }
}

impl<T: Debug> Debug for Source<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Buffer(buf) => f.debug_tuple("Buffer").field(buf).finish(),
            Source::Factory(_) => f.write_str("Factory"),
            Source::Once(cell) => {
                let consumed = cell.try_borrow().map(|it| it.is_none()).unwrap_or(false);
                f.debug_struct("Once").field("consumed", &consumed).finish()
            }
        }
    }
}

impl<T: Element> Source<T> {
    pub fn buffer(items: Vec<T>) -> Source<T> {
        Source::Buffer(Rc::new(items))
    }

    pub fn factory<I, F>(factory: F) -> Source<T>
    where
        F: Fn() -> I + 'static,
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
    {
        Source::Factory(Rc::new(move || Box::new(factory().into_iter()) as Stream<T>))
    }

    pub fn once<I>(iter: I) -> Source<T>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
    {
        let stream: Stream<T> = Box::new(iter.into_iter());
        Source::Once(Rc::new(RefCell::new(Some(stream))))
    }

    /// 以另一个流水线为数据源，遍历的是其元素而不是流水线本身。
    pub fn pipeline<P: Pipeline<Item = T>>(pipeline: P) -> Source<T> {
        Source::Factory(Rc::new(move || pipeline.stream()))
    }

    /// 打开一次新的遍历。
    pub fn open(&self) -> Stream<T> {
        match self {
            Source::Buffer(buf) => Box::new(SharedIter::new(buf.clone())),
            Source::Factory(factory) => factory(),
            Source::Once(cell) => match cell.borrow_mut().take() {
                Some(iter) => iter,
                None => {
                    tracing::trace!("one-shot source already consumed, yield nothing");
                    Box::new(std::iter::empty())
                }
            },
        }
    }

    /// 无需遍历即可得知的长度，仅内存序列可用。
    pub fn known_len(&self) -> Option<usize> {
        match self {
            Source::Buffer(buf) => Some(buf.len()),
            _ => None,
        }
    }

    pub(crate) fn as_buffer(&self) -> Option<&Rc<Vec<T>>> {
        match self {
            Source::Buffer(buf) => Some(buf),
            _ => None,
        }
    }
}

impl<T: Element> From<Vec<T>> for Source<T> {
    fn from(items: Vec<T>) -> Self {
        Source::buffer(items)
    }
}

impl<T: Element> From<Rc<Vec<T>>> for Source<T> {
    fn from(buf: Rc<Vec<T>>) -> Self {
        Source::Buffer(buf)
    }
}

impl<T: Element, const N: usize> From<[T; N]> for Source<T> {
    fn from(items: [T; N]) -> Self {
        Source::buffer(Vec::from(items))
    }
}

impl<T: Element> From<&[T]> for Source<T> {
    fn from(items: &[T]) -> Self {
        Source::buffer(items.to_vec())
    }
}

impl<T: Element> From<VecDeque<T>> for Source<T> {
    fn from(items: VecDeque<T>) -> Self {
        Source::buffer(Vec::from(items))
    }
}

impl<T: Element, S> From<HashSet<T, S>> for Source<T> {
    fn from(items: HashSet<T, S>) -> Self {
        Source::buffer(items.into_iter().collect())
    }
}

impl<T: Element> From<BTreeSet<T>> for Source<T> {
    fn from(items: BTreeSet<T>) -> Self {
        Source::buffer(items.into_iter().collect())
    }
}

impl<K: Element, V: Element, S> From<HashMap<K, V, S>> for Source<(K, V)> {
    fn from(items: HashMap<K, V, S>) -> Self {
        Source::buffer(items.into_iter().collect())
    }
}

impl<K: Element, V: Element> From<BTreeMap<K, V>> for Source<(K, V)> {
    fn from(items: BTreeMap<K, V>) -> Self {
        Source::buffer(items.into_iter().collect())
    }
}

impl<T: Element> From<Range<T>> for Source<T>
where
    Range<T>: Iterator<Item = T>,
{
    fn from(range: Range<T>) -> Self {
        Source::Factory(Rc::new(move || Box::new(range.clone()) as Stream<T>))
    }
}

impl<T: Element> From<RangeInclusive<T>> for Source<T>
where
    RangeInclusive<T>: Iterator<Item = T>,
{
    fn from(range: RangeInclusive<T>) -> Self {
        Source::Factory(Rc::new(move || Box::new(range.clone()) as Stream<T>))
    }
}

impl<T: Element> From<Eager<T>> for Source<T> {
    fn from(eager: Eager<T>) -> Self {
        Source::Buffer(eager.buffer())
    }
}

impl<T: Element> From<Lazy<T>> for Source<T> {
    fn from(lazy: Lazy<T>) -> Self {
        match lazy.cached() {
            Some(buf) => Source::Buffer(buf),
            None => Source::pipeline(lazy),
        }
    }
}

impl<T: Element> From<Hose<T>> for Source<T> {
    fn from(hose: Hose<T>) -> Self {
        Source::pipeline(hose)
    }
}

/// 共享缓冲区上的迭代器，逐个克隆元素。
#[derive(Debug)]
pub struct SharedIter<T> {
    buf: Rc<Vec<T>>,
    front: usize,
    back: usize,
}

impl<T> SharedIter<T> {
    pub fn new(buf: Rc<Vec<T>>) -> SharedIter<T> {
        let back = buf.len();
        SharedIter { buf, front: 0, back }
    }
}

impl<T: Clone> Iterator for SharedIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front < self.back {
            let item = self.buf[self.front].clone();
            self.front += 1;
            Some(item)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.back - self.front;
        (len, Some(len))
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        self.front = self.front.saturating_add(n).min(self.back);
        self.next()
    }
}

impl<T: Clone> DoubleEndedIterator for SharedIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front < self.back {
            self.back -= 1;
            Some(self.buf[self.back].clone())
        } else {
            None
        }
    }
}

impl<T: Clone> ExactSizeIterator for SharedIter<T> {}
