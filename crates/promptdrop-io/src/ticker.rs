//! Browser timers for the progress simulation.

use dioxus::prelude::*;
use dioxus::signals::BorrowMutError;
use gloo_timers::future::TimeoutFuture;
use promptdrop_core::progress::{self, CancelToken, ProgressSchedule, Tick};
use promptdrop_core::{EntryId, Staging};

/// Spawn the progress loop for one staged entry.
///
/// The loop writes into `staging` through `id` only and stops as soon as
/// `token` is cancelled, the entry completes, or the entry disappears. The
/// task belongs to the calling scope and is dropped with it.
pub fn start(
    mut staging: Signal<Staging>,
    id: EntryId,
    schedule: ProgressSchedule,
    token: CancelToken,
) {
    spawn(async move {
        let end = progress::run(
            schedule,
            &token,
            |_| TimeoutFuture::new(schedule.period_ms),
            |increment| apply(&mut staging, id, increment),
        )
        .await;
        tracing::debug!(%id, ?end, "progress simulation ended");
    });
}

/// Apply one tick to the store behind `staging`.
///
/// A dropped store reports [`Tick::Missing`]. A store that is borrowed
/// elsewhere reports [`Tick::Deferred`] so the next period tries again.
fn apply(staging: &mut Signal<Staging>, id: EntryId, increment: u8) -> Tick {
    match staging.try_write() {
        Ok(mut store) => store.tick(id, increment),
        Err(BorrowMutError::Dropped(_)) => Tick::Missing,
        Err(e) => {
            tracing::trace!(%id, error = %e, "store busy, tick deferred");
            Tick::Deferred
        }
    }
}
