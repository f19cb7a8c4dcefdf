//! Planning and replaying a reorder.

use std::fmt::Display;

use async_trait::async_trait;

use super::{check::is_sorted, Direction, OrderedItem, SortOutcome};
use crate::error::{FortiError, MoveError, Result};

/// The move-after primitive of an ordered table.
///
/// Implementations relocate `id` so that it directly follows `after`,
/// leaving the relative order of every other entry intact.
#[async_trait]
pub trait MoveAfter<I: Sync>: Sync {
    async fn move_after(&self, id: &I, after: &I) -> Result<()>;
}

/// Stable in-memory sort of a snapshot.
///
/// Entries with equal keys keep their snapshot order; the appliance's own
/// tie-breaking is never relied on.
pub fn plan<I: Clone>(items: &[OrderedItem<I>], direction: Direction) -> Vec<OrderedItem<I>> {
    let mut target = items.to_vec();
    target.sort_by(|a, b| direction.compare(&a.key, &b.key));
    target
}

/// Re-establish `target` on the appliance, one move per adjacent pair.
///
/// Always issues `len - 1` moves in order, each awaited before the next,
/// since every move depends on the previous one having landed. Returns the
/// number of moves made. The first rejected move aborts the replay; the
/// moves before it stay applied.
pub async fn replay<I, M>(target: &[OrderedItem<I>], mover: &M) -> Result<usize>
where
    I: Display + Sync,
    M: MoveAfter<I> + ?Sized,
{
    let planned = target.len().saturating_sub(1);

    for (applied, pair) in target.windows(2).enumerate() {
        let (anchor, entry) = (&pair[0], &pair[1]);
        tracing::debug!(id = %entry.id, after = %anchor.id, "moving entry");

        if let Err(source) = mover.move_after(&entry.id, &anchor.id).await {
            tracing::warn!(applied, planned, "reorder aborted, table left partially sorted");
            return Err(FortiError::Reorder {
                applied,
                planned,
                source: MoveError {
                    id: entry.id.to_string(),
                    after_id: anchor.id.to_string(),
                    source: Box::new(source),
                },
            });
        }
    }

    Ok(planned)
}

/// Bring a table into `direction` order, starting from its snapshot.
///
/// Does nothing if the snapshot is already sorted, otherwise replays the
/// full stable-sorted order.
pub async fn reconcile<I, M>(
    items: &[OrderedItem<I>],
    direction: Direction,
    mover: &M,
) -> Result<SortOutcome>
where
    I: Clone + Display + Sync,
    M: MoveAfter<I> + ?Sized,
{
    let entries = items.len();
    if is_sorted(items, direction) {
        return Ok(SortOutcome { entries, moves: 0 });
    }

    let target = plan(items, direction);
    let moves = replay(&target, mover).await?;
    Ok(SortOutcome { entries, moves })
}
