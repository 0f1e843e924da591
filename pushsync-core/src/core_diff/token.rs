//! Device-token transitions

use crate::core_push::types::DeviceToken;

/// What happened to the device token between two observations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenTransition {
    /// Absent before and after
    NoToken,
    /// Token dropped; the old token must lose its registrations
    Cleared(DeviceToken),
    /// Same token as before
    Unchanged,
    /// Token replaced; deregister the old, register the new, same channels
    Rotated {
        /// Token being retired
        old: DeviceToken,
        /// Token taking over
        new: DeviceToken,
    },
    /// First token observed; register it against the current channel set
    Registered(DeviceToken),
}

/// Compute the token transition for an (old, new) pair
pub fn diff_token(old: Option<&DeviceToken>, new: Option<&DeviceToken>) -> TokenTransition {
    match (old, new) {
        (None, None) => TokenTransition::NoToken,
        (Some(old), None) => TokenTransition::Cleared(old.clone()),
        (None, Some(new)) => TokenTransition::Registered(new.clone()),
        (Some(old), Some(new)) if old == new => TokenTransition::Unchanged,
        (Some(old), Some(new)) => {
            TokenTransition::Rotated { old: old.clone(), new: new.clone() }
        }
    }
}
