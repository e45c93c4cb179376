//! 容忍部分失败的并发汇集。

use futures::future::join_all;
use std::future::Future;

/// 单个输入的完成结果。
#[derive(Debug, Clone, PartialEq)]
pub enum Settled<T, E> {
    Fulfilled(T),
    Rejected(E),
}

impl<T, E> From<Result<T, E>> for Settled<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Settled::Fulfilled(value),
            Err(err) => Settled::Rejected(err),
        }
    }
}

/// 并发等待全部 future 完成，按输入顺序返回每一项的结果。
///
/// 单项失败不会提前结束汇集。
pub async fn gather_settled<I, F, T, E>(futures: I) -> Vec<Settled<T, E>>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Result<T, E>>,
{
    join_all(futures)
        .await
        .into_iter()
        .map(Settled::from)
        .collect()
}
