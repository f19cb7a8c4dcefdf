//! Reorder trait for tables kept in evaluation order.

use std::fmt::Display;
use std::marker::PhantomData;

use async_trait::async_trait;

use crate::client::{FortiClient, MovePosition};
use crate::error::{FortiError, Result};
use crate::reorder::{self, MoveAfter, OrderedItem, SortKey, SortOutcome, SortSpec};

/// Sort an ordered table on the appliance.
///
/// Implementors only bind the two remote capabilities, reading the current
/// order and moving one entry relative to another. `sort` and `is_sorted`
/// are provided.
///
/// Two sorts racing on the same table interleave their moves and leave an
/// unspecified order; callers must serialize sorts per table.
///
/// # Example
///
/// ```ignore
/// use fortiapi::{FortiClient, Policy, Reorder, SortKey, SortSpec};
///
/// let client = FortiClient::from_env()?;
/// let outcome = Policy::sort(&client, SortSpec::ascending(SortKey::Id)).await?;
/// println!("{} moves", outcome.moves);
/// ```
#[async_trait]
pub trait Reorder: Sized + Send + Sync + 'static {
    /// The master key of an entry.
    type Id: Clone + Display + Send + Sync + 'static;

    /// Entity name used in errors and logs.
    const ENTITY: &'static str;

    /// Keys the table's projection exposes.
    const SORT_KEYS: &'static [SortKey];

    /// Read the `{id, key}` projection of the table in appliance order.
    ///
    /// A missing table yields an empty list.
    async fn fetch_order(
        client: &FortiClient,
        key: SortKey,
    ) -> Result<Vec<OrderedItem<Self::Id>>>;

    /// Move `id` directly after or before `target`.
    async fn move_to(
        client: &FortiClient,
        id: &Self::Id,
        position: MovePosition,
        target: &Self::Id,
    ) -> Result<()>;

    /// Move `id` directly after `after`.
    async fn move_after(client: &FortiClient, id: &Self::Id, after: &Self::Id) -> Result<()> {
        Self::move_to(client, id, MovePosition::After, after).await
    }

    /// Reject keys the table cannot be sorted by.
    fn check_key(key: SortKey) -> Result<()> {
        if Self::SORT_KEYS.contains(&key) {
            Ok(())
        } else {
            Err(FortiError::UnsupportedSortKey {
                entity_type: Self::ENTITY,
                key,
            })
        }
    }

    /// Report whether the table already satisfies `spec`. Never mutates.
    async fn is_sorted(client: &FortiClient, spec: SortSpec) -> Result<bool> {
        Self::check_key(spec.key)?;
        let items = Self::fetch_order(client, spec.key).await?;
        Ok(reorder::is_sorted(&items, spec.direction))
    }

    /// Sort the table by `spec`.
    ///
    /// # Errors
    ///
    /// `UnsupportedSortKey` before any remote call, `Fetch` if the snapshot
    /// cannot be read, and `Reorder` if a move is rejected, in which case
    /// only the moves before it were applied.
    async fn sort(client: &FortiClient, spec: SortSpec) -> Result<SortOutcome> {
        Self::check_key(spec.key)?;
        let items = Self::fetch_order(client, spec.key).await?;

        let mover = TableMover::<Self> {
            client,
            table: PhantomData,
        };
        let outcome = reorder::reconcile(&items, spec.direction, &mover).await?;

        tracing::info!(
            entity = Self::ENTITY,
            key = %spec.key,
            direction = ?spec.direction,
            entries = outcome.entries,
            moves = outcome.moves,
            "sort complete"
        );
        Ok(outcome)
    }
}

/// Binds a table's move primitive to the reorder executor.
struct TableMover<'a, T> {
    client: &'a FortiClient,
    table: PhantomData<fn() -> T>,
}

#[async_trait]
impl<'a, T: Reorder> MoveAfter<T::Id> for TableMover<'a, T> {
    async fn move_after(&self, id: &T::Id, after: &T::Id) -> Result<()> {
        T::move_after(self.client, id, after).await
    }
}
