//! Algebraic properties of the diff engine

use crate::core_diff::{diff_channels, diff_token, ChannelTransition, TokenTransition};
use crate::core_push::debug_mirror::mirror_names;
use crate::core_push::types::{ChannelSet, DeviceToken};
use proptest::prelude::*;

fn token_strategy() -> impl Strategy<Value = Option<DeviceToken>> {
    prop::option::of(prop::collection::vec(any::<u8>(), 1..16).prop_map(DeviceToken::new))
}

fn channel_set_strategy() -> impl Strategy<Value = Option<ChannelSet>> {
    prop::option::of(
        prop::collection::btree_set("[a-z]{1,8}", 0..8)
            .prop_map(|set| set.into_iter().collect::<ChannelSet>()),
    )
}

proptest! {
    #[test]
    fn prop_token_transition_is_total_and_exclusive(
        old in token_strategy(),
        new in token_strategy(),
    ) {
        let transition = diff_token(old.as_ref(), new.as_ref());
        match transition {
            TokenTransition::NoToken => {
                prop_assert!(old.is_none() && new.is_none());
            }
            TokenTransition::Cleared(cleared) => {
                prop_assert_eq!(Some(cleared), old);
                prop_assert!(new.is_none());
            }
            TokenTransition::Unchanged => {
                prop_assert!(old.is_some());
                prop_assert_eq!(old, new);
            }
            TokenTransition::Rotated { old: o, new: n } => {
                // Rotated only when both present and different
                prop_assert_ne!(&o, &n);
                prop_assert_eq!(Some(o), old);
                prop_assert_eq!(Some(n), new);
            }
            TokenTransition::Registered(registered) => {
                prop_assert!(old.is_none());
                prop_assert_eq!(Some(registered), new);
            }
        }
    }

    #[test]
    fn prop_delta_sides_are_disjoint(
        old in channel_set_strategy(),
        new in channel_set_strategy(),
    ) {
        if let ChannelTransition::Delta { adding, removing } =
            diff_channels(old.as_ref(), new.as_ref())
        {
            prop_assert!(adding.intersection(&removing).is_empty());
            // An empty delta must have collapsed to Unchanged
            prop_assert!(!adding.is_empty() || !removing.is_empty());
        }
    }

    #[test]
    fn prop_delta_applied_to_old_yields_new(
        old in prop::collection::btree_set("[a-z]{1,8}", 0..8),
        new in prop::collection::btree_set("[a-z]{1,8}", 0..8),
    ) {
        let old: ChannelSet = old.into_iter().collect();
        let new: ChannelSet = new.into_iter().collect();

        match diff_channels(Some(&old), Some(&new)) {
            ChannelTransition::Unchanged => prop_assert_eq!(old, new),
            ChannelTransition::Delta { adding, removing } => {
                let mut rebuilt: ChannelSet = old
                    .iter()
                    .filter(|c| !removing.contains(c))
                    .collect();
                for channel in adding.iter() {
                    rebuilt.insert(channel);
                }
                prop_assert_eq!(rebuilt, new);
            }
            other => prop_assert!(false, "unexpected transition {:?}", other),
        }
    }

    #[test]
    fn prop_equal_membership_is_unchanged(
        channels in prop::collection::btree_set("[a-z]{1,8}", 0..8),
    ) {
        let a: ChannelSet = channels.iter().cloned().collect();
        let b: ChannelSet = channels.into_iter().collect();
        prop_assert_eq!(diff_channels(Some(&a), Some(&b)), ChannelTransition::Unchanged);
    }

    #[test]
    fn prop_mirror_names_map_one_to_one(
        channels in prop::collection::btree_set("[a-z]{1,8}", 0..8),
        suffix in "-[a-z]{1,8}",
    ) {
        let set: ChannelSet = channels.iter().cloned().collect();
        let mirrors = mirror_names(&set, &suffix);

        prop_assert_eq!(mirrors.len(), set.len());
        for (mirror, channel) in mirrors.iter().zip(set.iter()) {
            prop_assert!(mirror.ends_with(suffix.as_str()));
            prop_assert_eq!(&mirror[..mirror.len() - suffix.len()], channel);
        }
    }
}
