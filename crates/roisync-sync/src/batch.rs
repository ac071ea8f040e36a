//! Size-bounded batching of request payloads.
//!
//! Items are packed greedily in input order: an item joins the open batch
//! while the batch stays under the limit, otherwise it starts a new one. An
//! item that is too large on its own is sent alone.

use crate::error::PartitionError;

/// Split `items` into consecutive batches whose `size_of` stays below
/// `max_batch_size`.
///
/// A batch holding a single item may reach or exceed the limit; that item
/// cannot be split further and is logged. Fails on empty input.
pub fn partition<T, F>(
    items: Vec<T>,
    max_batch_size: usize,
    size_of: F,
) -> Result<Vec<Vec<T>>, PartitionError>
where
    F: Fn(&[T]) -> usize,
{
    let item_count = items.len();
    let mut items = items.into_iter();
    let first = items.next().ok_or(PartitionError::NoInput)?;

    let mut batches = Vec::new();
    let mut current = vec![first];
    warn_if_oversized(&current, max_batch_size, &size_of);

    for item in items {
        current.push(item);
        if size_of(&current) >= max_batch_size {
            let overflow = current.split_off(current.len() - 1);
            batches.push(std::mem::replace(&mut current, overflow));
            warn_if_oversized(&current, max_batch_size, &size_of);
        }
    }
    batches.push(current);

    tracing::debug!(
        items = item_count,
        batches = batches.len(),
        max_batch_size,
        "partitioned items"
    );
    Ok(batches)
}

fn warn_if_oversized<T, F>(batch: &[T], max_batch_size: usize, size_of: &F)
where
    F: Fn(&[T]) -> usize,
{
    let size = size_of(batch);
    if size > max_batch_size {
        tracing::warn!(
            size,
            max_batch_size,
            "item alone exceeds the batch size limit, sending it in its own batch"
        );
    }
}
