use crate::eager::Eager;
use crate::pipeline::Pipeline;
use crate::source::{SharedIter, Source};
use crate::{Element, Stream};
use std::cell::OnceCell;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

/// 惰性容器。
///
/// 变换操作只记录步骤，遍历时才逐个拉取上游元素。首次需要完整序列的操作（排序、逆序、
/// 负数切片、按下标取值、计数、查找、转换为集合等）会把结果保存在缓存中，之后的遍历直接读取缓存，
/// 变换回调不会再被调用。缓存一旦填充便不再清空。
///
/// 以只能遍历一次的迭代器为数据源时，未填充缓存前只能遍历一次。
pub struct Lazy<T> {
    inner: Rc<LazyInner<T>>,
}

struct LazyInner<T> {
    source: Source<T>,
    cache: OnceCell<Rc<Vec<T>>>,
}

impl<T: Element> Lazy<T> {
    /// 内存序列直接作为缓存，其他数据源在需要时才遍历。
    pub fn new(source: impl Into<Source<T>>) -> Lazy<T> {
        let source = source.into();
        let cache = OnceCell::new();
        if let Some(buf) = source.as_buffer() {
            let _ = cache.set(buf.clone());
        }
        Lazy { inner: Rc::new(LazyInner { source, cache }) }
    }

    /// 以只能遍历一次的迭代器为数据源。
    ///
    /// 在本容器填充缓存之前，由它派生的容器被遍历或计算时会取走这个迭代器，
    /// 之后本容器只能得到空序列。需要重复使用时，先调用一次强制计算的操作（例如`size`）。
    pub fn once<I>(iter: I) -> Lazy<T>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
    {
        Lazy::new(Source::once(iter))
    }

    /// 以迭代器工厂为数据源，每次遍历都调用一次`factory`。
    pub fn factory<I, F>(factory: F) -> Lazy<T>
    where
        F: Fn() -> I + 'static,
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
    {
        Lazy::new(Source::factory(factory))
    }

    pub fn cached(&self) -> Option<Rc<Vec<T>>> {
        self.inner.cache.get().cloned()
    }

    pub fn is_forced(&self) -> bool {
        self.inner.cache.get().is_some()
    }

    /// 立即计算，得到共享同一缓冲区的[`Eager`]。
    pub fn freeze(&self) -> Eager<T> {
        Eager::new(self.materialize())
    }
}

impl<T: Element> Pipeline for Lazy<T> {
    type Item = T;
    type Kind<U: Element> = Lazy<U>;

    fn stream(&self) -> Stream<T> {
        match self.inner.cache.get() {
            Some(buf) => Box::new(SharedIter::new(buf.clone())),
            None => self.inner.source.open(),
        }
    }

    fn materialize(&self) -> Rc<Vec<T>> {
        self.inner
            .cache
            .get_or_init(|| {
                let items = self.inner.source.open().collect::<Vec<_>>();
                tracing::debug!(len = items.len(), "lazy cache forced");
                Rc::new(items)
            })
            .clone()
    }

    fn derive<U, G>(&self, step: G) -> Lazy<U>
    where
        U: Element,
        G: Fn(&Self) -> Stream<U> + 'static,
    {
        let up = self.clone();
        Lazy::new(Source::Factory(Rc::new(move || step(&up))))
    }
}

impl<T> Clone for Lazy<T> {
    fn clone(&self) -> Self {
        Lazy { inner: self.inner.clone() }
    }
}

impl<T: Debug> Debug for Lazy<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lazy").field("source", &self.inner.source).field("cache", &self.inner.cache.get()).finish()
    }
}

impl<T: Element> IntoIterator for Lazy<T> {
    type Item = T;
    type IntoIter = Stream<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.stream()
    }
}
