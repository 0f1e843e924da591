//! Channel-set transitions

use crate::core_push::types::ChannelSet;

/// What happened to the channel set between two observations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelTransition {
    /// Absent before and after
    NoChannels,
    /// Channel set dropped; the old set loses its registrations
    Cleared(ChannelSet),
    /// Identical membership (set identity is irrelevant, sets are unordered)
    Unchanged,
    /// First channel set observed
    Added(ChannelSet),
    /// Membership changed; register `adding`, deregister `removing`
    Delta {
        /// Channels present only in the new set
        adding: ChannelSet,
        /// Channels present only in the old set
        removing: ChannelSet,
    },
}

/// Compute the channel transition for an (old, new) pair
///
/// A `Delta` whose sides are both empty collapses to `Unchanged`, so a caller
/// never sees a transition that would produce zero gateway calls.
pub fn diff_channels(old: Option<&ChannelSet>, new: Option<&ChannelSet>) -> ChannelTransition {
    match (old, new) {
        (None, None) => ChannelTransition::NoChannels,
        (Some(old), None) => ChannelTransition::Cleared(old.clone()),
        (None, Some(new)) => ChannelTransition::Added(new.clone()),
        (Some(old), Some(new)) => {
            let adding = new.difference(old);
            let removing = old.difference(new);
            if adding.is_empty() && removing.is_empty() {
                ChannelTransition::Unchanged
            } else {
                ChannelTransition::Delta { adding, removing }
            }
        }
    }
}
