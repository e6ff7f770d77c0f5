//! Identity of the locally running service instance.

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

/// Service id and instance id of the local process. Set once at startup,
/// read-only afterward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceLocalInfo {
    pub service_id: String,
    pub instance_id: String,
}

impl InstanceLocalInfo {
    pub fn new(service_id: impl Into<String>, instance_id: impl Into<String>) -> Self {
        Self {
            service_id: service_id.into(),
            instance_id: instance_id.into(),
        }
    }
}

static LOCAL_INFO: OnceCell<InstanceLocalInfo> = OnceCell::new();

/// Process-wide, set-once holder for [`InstanceLocalInfo`].
///
/// Components that were not handed an identity explicitly resolve it from
/// here lazily. A starting process may legitimately not have set it yet;
/// readers must treat `None` as "identity not known yet", not as an error.
pub struct InstanceLocalInfoHolder;

impl InstanceLocalInfoHolder {
    /// Publishes the local identity. Returns the rejected value if an
    /// identity was already set.
    pub fn set(info: InstanceLocalInfo) -> Result<(), InstanceLocalInfo> {
        LOCAL_INFO.set(info)
    }

    pub fn get() -> Option<&'static InstanceLocalInfo> {
        LOCAL_INFO.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_once_semantics() {
        // The holder is process-global, so this test owns whatever value
        // lands first and only asserts the second set is rejected.
        let first = InstanceLocalInfo::new("orders", "i1");
        let _ = InstanceLocalInfoHolder::set(first);

        let second = InstanceLocalInfo::new("payments", "i9");
        assert!(InstanceLocalInfoHolder::set(second).is_err());
        assert!(InstanceLocalInfoHolder::get().is_some());
    }
}
