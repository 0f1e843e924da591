//! Core data types for the push registration engine

use crate::core_push::errors::GatewayError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

/// Opaque platform-issued identifier enabling push delivery to one device
/// installation
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DeviceToken(Vec<u8>);

impl DeviceToken {
    /// Wrap raw token bytes
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Raw token bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Hex rendering used in logs and events
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl fmt::Display for DeviceToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for DeviceToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeviceToken({})", self.to_hex())
    }
}

/// Set of channel-name strings; uniqueness enforced, no ordering semantics
///
/// Backed by a `BTreeSet` so the flattened list handed to the gateway is
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelSet(BTreeSet<String>);

impl ChannelSet {
    /// Create an empty channel set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a channel name; returns false if it was already present
    pub fn insert(&mut self, channel: impl Into<String>) -> bool {
        self.0.insert(channel.into())
    }

    /// Whether the set contains the given channel
    pub fn contains(&self, channel: &str) -> bool {
        self.0.contains(channel)
    }

    /// Number of channels
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over channel names in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Channels in `self` but not in `other`
    pub fn difference(&self, other: &ChannelSet) -> ChannelSet {
        ChannelSet(self.0.difference(&other.0).cloned().collect())
    }

    /// Channels in both `self` and `other`
    pub fn intersection(&self, other: &ChannelSet) -> ChannelSet {
        ChannelSet(self.0.intersection(&other.0).cloned().collect())
    }

    /// Flatten into the sorted list form the gateway API takes
    pub fn to_vec(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for ChannelSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// The (token, channel set, debug flag) triple the reconciler owns exclusively
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationState {
    /// Current push token, if the device is registered for push
    pub token: Option<DeviceToken>,

    /// Channels registered for push delivery, if any
    pub channels: Option<ChannelSet>,

    /// Whether debug mirror subscriptions are active
    pub debug_mirror: bool,
}

impl RegistrationState {
    /// Fresh state at engine start: no token, no channels, mirror off
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether nothing is registered or mirrored
    pub fn is_empty(&self) -> bool {
        self.token.is_none() && self.channels.is_none() && !self.debug_mirror
    }
}

/// Which gateway operation an outcome belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PushOperation {
    /// Register channels for push delivery to a token
    AddPush,
    /// Deregister channels from a token
    RemovePush,
    /// Drop every registration held by a token
    RemoveAllPush,
    /// Query the channels currently registered for a token
    ListPush,
}

impl fmt::Display for PushOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PushOperation::AddPush => "add_push",
            PushOperation::RemovePush => "remove_push",
            PushOperation::RemoveAllPush => "remove_all_push",
            PushOperation::ListPush => "list_push",
        };
        write!(f, "{}", s)
    }
}

/// Result of one gateway call, as recorded in the event log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationOutcome {
    /// The operation that ran
    pub operation: PushOperation,

    /// Channels the call targeted (or returned, for `ListPush`)
    pub channels: Vec<String>,

    /// Token the call ran against
    pub token: Option<DeviceToken>,

    /// Success, or the typed gateway failure
    pub result: Result<(), GatewayError>,
}

impl RegistrationOutcome {
    /// Build an outcome from a gateway call result
    pub fn new(
        operation: PushOperation,
        channels: Vec<String>,
        token: Option<DeviceToken>,
        result: Result<(), GatewayError>,
    ) -> Self {
        Self { operation, channels, token, result }
    }

    /// Whether the gateway call succeeded
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Opaque identity under which outcomes are recorded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    /// Stable session identifier
    pub id: Uuid,

    /// Optional human-readable device label
    pub device: Option<String>,
}

impl SessionIdentity {
    /// Create an identity with a fresh random id
    pub fn generate() -> Self {
        Self { id: Uuid::new_v4(), device: None }
    }

    /// Attach a device label
    pub fn with_device(mut self, device: impl Into<String>) -> Self {
        self.device = Some(device.into());
        self
    }
}

impl fmt::Display for SessionIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.device {
            Some(device) => write!(f, "{} ({})", self.id, device),
            None => write!(f, "{}", self.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_token_hex() {
        let token = DeviceToken::new(vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(token.to_hex(), "deadbeef");
        assert_eq!(format!("{}", token), "deadbeef");
        assert_eq!(format!("{:?}", token), "DeviceToken(deadbeef)");
    }

    #[test]
    fn test_channel_set_uniqueness_and_order() {
        let mut set = ChannelSet::new();
        assert!(set.insert("color"));
        assert!(set.insert("chat"));
        assert!(!set.insert("chat"));

        assert_eq!(set.len(), 2);
        assert!(set.contains("chat"));
        // Flattened form is sorted regardless of insertion order
        assert_eq!(set.to_vec(), vec!["chat".to_string(), "color".to_string()]);
    }

    #[test]
    fn test_channel_set_difference() {
        let old: ChannelSet = ["chat", "color"].into_iter().collect();
        let new: ChannelSet = ["chat", "news"].into_iter().collect();

        assert_eq!(new.difference(&old).to_vec(), vec!["news".to_string()]);
        assert_eq!(old.difference(&new).to_vec(), vec!["color".to_string()]);
        assert_eq!(old.intersection(&new).to_vec(), vec!["chat".to_string()]);
    }

    #[test]
    fn test_registration_state_empty() {
        let state = RegistrationState::empty();
        assert!(state.is_empty());

        let mut populated = state.clone();
        populated.debug_mirror = true;
        assert!(!populated.is_empty());
    }

    #[test]
    fn test_outcome_serialization() {
        let outcome = RegistrationOutcome::new(
            PushOperation::AddPush,
            vec!["chat".to_string()],
            Some(DeviceToken::new(vec![1, 2, 3])),
            Err(GatewayError::Transport("timeout".to_string())),
        );

        let json = serde_json::to_string(&outcome).unwrap();
        let parsed: RegistrationOutcome = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, outcome);
        assert!(!parsed.is_success());
    }
}
