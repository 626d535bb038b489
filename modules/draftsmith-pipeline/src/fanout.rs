use std::future::Future;

use futures::stream::{self, StreamExt, TryStreamExt};

/// Run one task per input concurrently and gather the results in input order.
///
/// Every task is started before any completes; `results[i]` always belongs to
/// the `i`th input whatever order the tasks finish in. The first error aborts
/// the batch and drops the tasks still in flight.
pub async fn fan_out<I, F, Fut, T, E>(inputs: I, task: F) -> Result<Vec<T>, E>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let tasks: Vec<Fut> = inputs.into_iter().map(task).collect();
    let width = tasks.len().max(1);
    stream::iter(tasks).buffered(width).try_collect().await
}
