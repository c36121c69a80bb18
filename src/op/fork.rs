use crate::source::Source;
use crate::Element;

/// `split`的一组分支函数。
///
/// 每个分支接收容器的一个视图，全部结果按位置组成元组。为元数1到6的闭包元组实现。
pub trait Splits<P> {
    type Output: Element;

    fn split(&self, view: &P) -> Self::Output;
}

/// `fork`的一组分支函数。
///
/// 每个分支接收容器的一个视图并返回一个序列，全部序列按分支顺序首尾相接。
/// 除闭包元组外，也可以使用`Vec<Box<dyn Fn(P) -> Source<U>>>`在运行时决定分支数量。
pub trait Forks<P, U> {
    fn fork(&self, view: &P) -> Vec<Source<U>>;
}

impl<P, U> Forks<P, U> for Vec<Box<dyn Fn(P) -> Source<U>>>
where
    P: Clone,
{
    fn fork(&self, view: &P) -> Vec<Source<U>> {
        self.iter().map(|fork| fork(view.clone())).collect()
    }
}

macro_rules! impl_branches {
    ($(($F:ident, $R:ident, $idx:tt)),+) => {
        impl<P, $($F, $R),+> Splits<P> for ($($F,)+)
        where
            P: Clone,
            $($F: Fn(P) -> $R, $R: Element,)+
        {
            type Output = ($($R,)+);

            fn split(&self, view: &P) -> Self::Output {
                ($((self.$idx)(view.clone()),)+)
            }
        }

        impl<P, U, $($F, $R),+> Forks<P, U> for ($($F,)+)
        where
            P: Clone,
            U: Element,
            $($F: Fn(P) -> $R, $R: Into<Source<U>>,)+
        {
            fn fork(&self, view: &P) -> Vec<Source<U>> {
                vec![$((self.$idx)(view.clone()).into()),+]
            }
        }
    };
}

impl_branches!((F0, R0, 0));
impl_branches!((F0, R0, 0), (F1, R1, 1));
impl_branches!((F0, R0, 0), (F1, R1, 1), (F2, R2, 2));
impl_branches!((F0, R0, 0), (F1, R1, 1), (F2, R2, 2), (F3, R3, 3));
impl_branches!((F0, R0, 0), (F1, R1, 1), (F2, R2, 2), (F3, R3, 3), (F4, R4, 4));
impl_branches!((F0, R0, 0), (F1, R1, 1), (F2, R2, 2), (F3, R3, 3), (F4, R4, 4), (F5, R5, 5));
