//! Debug mirror planning
//!
//! Every channel can have a shadow subscription at `<name><suffix>` for
//! debugging and observability. Mirrors ride the live subscribe/unsubscribe
//! path, not the push-registration path, so they are independent of the
//! device token. This module only computes the actions; the reconciler
//! executes them against the gateway.

use crate::core_diff::ChannelTransition;
use crate::core_push::types::ChannelSet;

/// One gateway action on the mirror subscription set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MirrorAction {
    /// Subscribe these mirror channels (presence disabled)
    Subscribe(Vec<String>),
    /// Unsubscribe these mirror channels; skipped when not connected
    Unsubscribe(Vec<String>),
    /// Drop every live subscription; skipped when not connected
    UnsubscribeAll,
}

/// Mirror channel names for a channel set, in sorted order
pub fn mirror_names(channels: &ChannelSet, suffix: &str) -> Vec<String> {
    channels.iter().map(|c| format!("{}{}", c, suffix)).collect()
}

/// Actions for a debug-flag toggle
///
/// Off→On subscribes the full mirror set for the current channels; On→Off
/// unsubscribes it. A toggle to Off with no channel set falls back to
/// dropping all subscriptions, since there is no mirror list left to name.
pub fn plan_flag_toggle(
    enabled: bool,
    channels: Option<&ChannelSet>,
    suffix: &str,
) -> Option<MirrorAction> {
    match (enabled, channels) {
        (true, Some(channels)) if !channels.is_empty() => {
            Some(MirrorAction::Subscribe(mirror_names(channels, suffix)))
        }
        (true, _) => None,
        (false, Some(channels)) if !channels.is_empty() => {
            Some(MirrorAction::Unsubscribe(mirror_names(channels, suffix)))
        }
        (false, _) => Some(MirrorAction::UnsubscribeAll),
    }
}

/// Actions keeping the mirror set in step with a channel transition
///
/// Only meaningful while the debug flag is on; the reconciler checks the
/// flag before executing.
pub fn plan_channel_transition(
    transition: &ChannelTransition,
    suffix: &str,
) -> Vec<MirrorAction> {
    let mut actions = Vec::new();
    match transition {
        ChannelTransition::NoChannels | ChannelTransition::Unchanged => {}
        ChannelTransition::Added(new) => {
            if !new.is_empty() {
                actions.push(MirrorAction::Subscribe(mirror_names(new, suffix)));
            }
        }
        ChannelTransition::Cleared(old) => {
            if !old.is_empty() {
                actions.push(MirrorAction::Unsubscribe(mirror_names(old, suffix)));
            }
        }
        ChannelTransition::Delta { adding, removing } => {
            // Independent operations: they target disjoint channel sets
            if !adding.is_empty() {
                actions.push(MirrorAction::Subscribe(mirror_names(adding, suffix)));
            }
            if !removing.is_empty() {
                actions.push(MirrorAction::Unsubscribe(mirror_names(removing, suffix)));
            }
        }
    }
    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_DEBUG_SUFFIX;
    use crate::core_diff::diff_channels;

    fn set(names: &[&str]) -> ChannelSet {
        names.iter().copied().collect()
    }

    #[test]
    fn test_mirror_names() {
        let channels = set(&["color", "chat"]);
        assert_eq!(
            mirror_names(&channels, DEFAULT_DEBUG_SUFFIX),
            vec!["chat-pndebug".to_string(), "color-pndebug".to_string()]
        );
    }

    #[test]
    fn test_flag_on_subscribes_full_mirror_set() {
        let channels = set(&["chat"]);
        assert_eq!(
            plan_flag_toggle(true, Some(&channels), DEFAULT_DEBUG_SUFFIX),
            Some(MirrorAction::Subscribe(vec!["chat-pndebug".to_string()]))
        );
    }

    #[test]
    fn test_flag_on_without_channels_is_noop() {
        assert_eq!(plan_flag_toggle(true, None, DEFAULT_DEBUG_SUFFIX), None);

        let empty = ChannelSet::new();
        assert_eq!(plan_flag_toggle(true, Some(&empty), DEFAULT_DEBUG_SUFFIX), None);
    }

    #[test]
    fn test_flag_off_unsubscribes_mirror_set() {
        let channels = set(&["chat", "color"]);
        assert_eq!(
            plan_flag_toggle(false, Some(&channels), DEFAULT_DEBUG_SUFFIX),
            Some(MirrorAction::Unsubscribe(vec![
                "chat-pndebug".to_string(),
                "color-pndebug".to_string(),
            ]))
        );
    }

    #[test]
    fn test_flag_off_without_channels_drops_everything() {
        assert_eq!(
            plan_flag_toggle(false, None, DEFAULT_DEBUG_SUFFIX),
            Some(MirrorAction::UnsubscribeAll)
        );
    }

    #[test]
    fn test_delta_plans_incremental_updates() {
        let old = set(&["chat", "color"]);
        let new = set(&["chat", "news"]);
        let transition = diff_channels(Some(&old), Some(&new));

        let actions = plan_channel_transition(&transition, DEFAULT_DEBUG_SUFFIX);
        assert_eq!(
            actions,
            vec![
                MirrorAction::Subscribe(vec!["news-pndebug".to_string()]),
                MirrorAction::Unsubscribe(vec!["color-pndebug".to_string()]),
            ]
        );
    }

    #[test]
    fn test_cleared_unsubscribes_old_mirrors() {
        let old = set(&["chat"]);
        let transition = diff_channels(Some(&old), None);

        assert_eq!(
            plan_channel_transition(&transition, DEFAULT_DEBUG_SUFFIX),
            vec![MirrorAction::Unsubscribe(vec!["chat-pndebug".to_string()])]
        );
    }

    #[test]
    fn test_unchanged_plans_nothing() {
        let old = set(&["chat"]);
        let same = set(&["chat"]);
        let transition = diff_channels(Some(&old), Some(&same));
        assert!(plan_channel_transition(&transition, DEFAULT_DEBUG_SUFFIX).is_empty());
    }
}
