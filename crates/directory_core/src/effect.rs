use std::time::Duration;

use crate::SearchToken;

/// Side effects requested by [`crate::update`]; executed by the platform layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Replaces any pending debounce timer.
    ArmDebounce { generation: u64, delay: Duration },
    CancelDebounce,
    RunSearch { token: SearchToken, query: String },
    /// Update the navigable location without a reload.
    PushLocation { location: String },
    SetScrollLocked(bool),
    ScheduleGalleryDetach { generation: u64, delay: Duration },
}
