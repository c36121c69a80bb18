//! 可链式组合的集合流水线。
//!
//! 三种容器共享同一组操作（[`Pipeline`]），区别只在于计算发生的时机：
//!
//! - [`Eager`]：构造时立即计算并保存全部元素，可重复遍历、随机访问。
//! - [`Lazy`]：只记录变换步骤，遍历时逐个拉取；首次需要完整序列时缓存结果，之后不再重复计算。
//! - [`Hose`]：只持有一个迭代器，不缓存，遍历一次后永久耗尽。
//!
//! 对某种容器调用变换操作总是得到同种容器：
//!
//! ```
//! use seqpipe::{Lazy, Pipeline, SortDirection};
//!
//! let lazy = Lazy::new(vec![3, 1, 2]).map(|n, _| n * 10).sort(SortDirection::Desc);
//! assert_eq!(lazy.to_vec(), vec![30, 20, 10]);
//! ```

pub use crate::config::{JoinInfo, SortDirection};
pub use crate::eager::Eager;
pub use crate::err::PipeErr;
pub use crate::hose::Hose;
pub use crate::lazy::Lazy;
pub use crate::op::fork::{Forks, Splits};
pub use crate::pipeline::Pipeline;
pub use crate::source::{SharedIter, Source};
pub use itertools::Either;
pub use regex::Regex;

mod config;
mod eager;
mod err;
mod hose;
mod lazy;
mod op;
mod pipeline;
mod source;

/// 容器元素需要满足的约束：缓冲区需要被重复读取，变换闭包需要被长期持有。
pub trait Element: Clone + 'static {}

impl<T: Clone + 'static> Element for T {}

/// 一次遍历。
pub type Stream<T> = Box<dyn Iterator<Item = T>>;

pub type PipeRes<T> = Result<T, PipeErr>;

#[inline]
pub(crate) fn boxed<I: Iterator + 'static>(iter: I) -> Stream<I::Item> {
    Box::new(iter)
}
