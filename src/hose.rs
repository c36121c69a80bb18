use crate::pipeline::Pipeline;
use crate::source::Source;
use crate::{Element, Stream, boxed};
use std::cell::RefCell;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

/// 只能遍历一次的容器。
///
/// 只持有一个迭代器，不缓存任何元素；迭代器返回`None`后永久耗尽，之后的遍历为空。
/// 克隆得到的是同一个迭代器的视图，在多处同时遍历会交错地取走元素。
pub struct Hose<T> {
    state: Rc<RefCell<HoseState<T>>>,
}

enum HoseState<T> {
    Active(Stream<T>),
    Exhausted,
}

impl<T: Element> Hose<T> {
    /// 立即打开数据源的一次遍历，之后不再打开。
    pub fn new(source: impl Into<Source<T>>) -> Hose<T> {
        Hose::from_stream(source.into().open())
    }

    fn from_stream(stream: Stream<T>) -> Hose<T> {
        Hose { state: Rc::new(RefCell::new(HoseState::Active(stream))) }
    }

    /// 取出下一个元素。
    pub fn pull(&self) -> Option<T> {
        let mut state = self.state.borrow_mut();
        let next = match &mut *state {
            HoseState::Active(stream) => stream.next(),
            HoseState::Exhausted => return None,
        };
        if next.is_none() {
            tracing::trace!("hose exhausted");
            *state = HoseState::Exhausted;
        }
        next
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(*self.state.borrow(), HoseState::Exhausted)
    }
}

/// 依次从共享状态中拉取元素的迭代器。
struct HoseStream<T> {
    hose: Hose<T>,
}

impl<T: Element> Iterator for HoseStream<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.hose.pull()
    }
}

impl<T: Element> Pipeline for Hose<T> {
    type Item = T;
    type Kind<U: Element> = Hose<U>;

    fn stream(&self) -> Stream<T> {
        Box::new(HoseStream { hose: self.clone() })
    }

    fn materialize(&self) -> Rc<Vec<T>> {
        let items = self.stream().collect::<Vec<_>>();
        tracing::debug!(len = items.len(), "hose materialized");
        Rc::new(items)
    }

    /// 新的迭代器在首次拉取时才创建。
    fn derive<U, G>(&self, step: G) -> Hose<U>
    where
        U: Element,
        G: Fn(&Self) -> Stream<U> + 'static,
    {
        let up = self.clone();
        Hose::from_stream(boxed(std::iter::once_with(move || step(&up)).flatten()))
    }

    fn size(&self) -> usize {
        self.stream().count()
    }

    /// 找到后立即停止，之后的元素仍留在容器中。
    fn find<F>(&self, mut pred: F) -> Option<Self::Item>
    where
        F: FnMut(&Self::Item, usize) -> bool,
    {
        self.stream().enumerate().find(|(i, item)| pred(item, *i)).map(|(_, item)| item)
    }

    fn find_index<F>(&self, mut pred: F) -> Option<usize>
    where
        F: FnMut(&Self::Item, usize) -> bool,
    {
        self.stream().enumerate().position(|(i, item)| pred(&item, i))
    }

    fn index_of(&self, value: &Self::Item) -> Option<usize>
    where
        Self::Item: PartialEq,
    {
        self.stream().position(|item| item == *value)
    }

    /// 负数下标需要知道总长度，会取走全部元素。
    fn at(&self, index: isize) -> Option<Self::Item> {
        if index < 0 {
            let buf = self.materialize();
            buf.get(buf.len().checked_sub(index.unsigned_abs())?).cloned()
        } else {
            self.stream().nth(index as usize)
        }
    }
}

impl<T> Clone for Hose<T> {
    fn clone(&self) -> Self {
        Hose { state: self.state.clone() }
    }
}

impl<T> Debug for Hose<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let exhausted = self.state.try_borrow().map(|state| matches!(*state, HoseState::Exhausted)).unwrap_or(false);
        f.debug_struct("Hose").field("exhausted", &exhausted).finish()
    }
}

impl<T: Element> IntoIterator for Hose<T> {
    type Item = T;
    type IntoIter = Stream<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.stream()
    }
}
