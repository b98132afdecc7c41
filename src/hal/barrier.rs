//! Memory ordering at the driver/hardware boundary.

use core::sync::atomic::{Ordering, fence};

/// Data-synchronization barrier.
///
/// Issued after descriptor publishes and around control-register kicks so
/// the descriptor memory is globally visible before hardware is told to act
/// on it. The register read-backs that follow action-gating writes provide
/// the completion guarantee on top of this ordering fence.
#[inline(always)]
pub fn data_sync_barrier() {
    fence(Ordering::SeqCst);
}
