//! Request-local storage: thread-scoped slots for the in-flight request's
//! gray state.
//!
//! The storage and lifecycle handles are process-wide objects passed
//! explicitly through constructors; there is no ambient global to reach
//! for. Only the slots they operate on are thread-local, which is what keeps
//! concurrent workers from ever observing each other's tracking state.

use std::cell::RefCell;

use crate::error::{StorageError, StorageResult};
use crate::request::{GrayRequest, GrayTrackInfo};

/// Thread-scoped storage holding the current request's tracking token and
/// request representation.
///
/// Absence of a value is `Ok(None)`; an `Err` means a genuine internal
/// failure (for this crate's implementation, a re-entrant slot borrow).
pub trait RequestLocalStorage: Send + Sync {
    fn get_track_info(&self) -> StorageResult<Option<GrayTrackInfo>>;
    fn set_track_info(&self, info: GrayTrackInfo) -> StorageResult<()>;
    fn remove_track_info(&self) -> StorageResult<()>;

    fn get_request(&self) -> StorageResult<Option<GrayRequest>>;
    fn set_request(&self, request: GrayRequest) -> StorageResult<()>;
    fn remove_request(&self) -> StorageResult<()>;
}

/// Manages init/teardown of the thread-bound storage scope. Both operations
/// are idempotent, and `close_context` is safe to call even if
/// `init_context` never ran.
pub trait LocalStorageLifeCycle: Send + Sync {
    fn init_context(&self);
    fn close_context(&self);
}

#[derive(Default)]
struct Slots {
    track_info: Option<GrayTrackInfo>,
    request: Option<GrayRequest>,
}

thread_local! {
    static SLOTS: RefCell<Slots> = RefCell::new(Slots::default());
}

/// [`RequestLocalStorage`] backed by per-thread slots.
///
/// The handle itself is a zero-sized value that can be cloned and shared
/// freely; every call reads or writes the slots of the thread it runs on.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadLocalRequestStorage;

impl ThreadLocalRequestStorage {
    pub fn new() -> Self {
        Self
    }
}

impl RequestLocalStorage for ThreadLocalRequestStorage {
    fn get_track_info(&self) -> StorageResult<Option<GrayTrackInfo>> {
        SLOTS.with(|slots| {
            let slots = slots
                .try_borrow()
                .map_err(|_| StorageError::SlotBusy("track_info"))?;
            Ok(slots.track_info.clone())
        })
    }

    fn set_track_info(&self, info: GrayTrackInfo) -> StorageResult<()> {
        SLOTS.with(|slots| {
            let mut slots = slots
                .try_borrow_mut()
                .map_err(|_| StorageError::SlotBusy("track_info"))?;
            slots.track_info = Some(info);
            Ok(())
        })
    }

    fn remove_track_info(&self) -> StorageResult<()> {
        SLOTS.with(|slots| {
            let mut slots = slots
                .try_borrow_mut()
                .map_err(|_| StorageError::SlotBusy("track_info"))?;
            slots.track_info = None;
            Ok(())
        })
    }

    fn get_request(&self) -> StorageResult<Option<GrayRequest>> {
        SLOTS.with(|slots| {
            let slots = slots
                .try_borrow()
                .map_err(|_| StorageError::SlotBusy("request"))?;
            Ok(slots.request.clone())
        })
    }

    fn set_request(&self, request: GrayRequest) -> StorageResult<()> {
        SLOTS.with(|slots| {
            let mut slots = slots
                .try_borrow_mut()
                .map_err(|_| StorageError::SlotBusy("request"))?;
            slots.request = Some(request);
            Ok(())
        })
    }

    fn remove_request(&self) -> StorageResult<()> {
        SLOTS.with(|slots| {
            let mut slots = slots
                .try_borrow_mut()
                .map_err(|_| StorageError::SlotBusy("request"))?;
            slots.request = None;
            Ok(())
        })
    }
}

/// Lifecycle for [`ThreadLocalRequestStorage`].
///
/// Opening ensures the calling thread's slots exist; closing clears both
/// slots so a pooled worker starts its next task clean. The slots themselves
/// outlive the scope: the cleanup discipline of the propagation layer, not
/// scope bookkeeping, is the correctness mechanism.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadLocalLifeCycle;

impl ThreadLocalLifeCycle {
    pub fn new() -> Self {
        Self
    }
}

impl LocalStorageLifeCycle for ThreadLocalLifeCycle {
    fn init_context(&self) {
        SLOTS.with(|_| {});
    }

    fn close_context(&self) {
        SLOTS.with(|slots| {
            if let Ok(mut slots) = slots.try_borrow_mut() {
                slots.track_info = None;
                slots.request = None;
            }
        });
    }
}
