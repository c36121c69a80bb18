use crate::config::JoinInfo;
use itertools::Itertools;
use std::fmt::Display;
use std::rc::Rc;

/// 以分隔符合并全部元素并加上前后缀，分隔符只出现在元素之间。
pub(crate) fn join_with<I>(items: I, info: &JoinInfo) -> String
where
    I: Iterator,
    I::Item: Display,
{
    format!("{}{}{}", info.prefix, items.format(&info.delimiter), info.postfix)
}

/// 每`group_size`个元素合并为一个字符串，最后一组可以不满。
pub(crate) struct ChunkJoin<I: Iterator> {
    source: I,
    group_size: usize,
    join_info: Rc<JoinInfo>,
}

impl<I: Iterator> ChunkJoin<I> {
    pub(crate) fn new(source: I, group_size: usize, join_info: Rc<JoinInfo>) -> ChunkJoin<I> {
        debug_assert!(group_size > 0, "chunk size of join must be greater than zero");
        ChunkJoin { source, group_size, join_info }
    }
}

impl<I> Iterator for ChunkJoin<I>
where
    I: Iterator,
    I::Item: Display,
{
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        let mut chunk = (&mut self.source).take(self.group_size).peekable();
        chunk.peek()?;
        Some(join_with(chunk, &self.join_info))
    }
}
