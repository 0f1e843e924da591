//! Mock PushGateway for testing
//!
//! Records every call in submission order, keeps a simulated view of the
//! service-side registration and subscription state, and can be scripted to
//! fail individual operations.

use crate::core_push::errors::GatewayError;
use crate::core_push::gateway::{GatewayResult, PushGateway};
use crate::core_push::types::{DeviceToken, PushOperation};
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

/// One recorded gateway call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    /// `add_push(channels, token)`
    AddPush { channels: Vec<String>, token: DeviceToken },
    /// `remove_push(channels, token)`
    RemovePush { channels: Vec<String>, token: DeviceToken },
    /// `remove_all_push(token)`
    RemoveAllPush { token: DeviceToken },
    /// `list_push(token)`
    ListPush { token: DeviceToken },
    /// `subscribe(channels, presence)`
    Subscribe { channels: Vec<String>, presence: bool },
    /// `unsubscribe(channels, presence)`
    Unsubscribe { channels: Vec<String>, presence: bool },
    /// `unsubscribe_all()`
    UnsubscribeAll,
}

#[derive(Debug, Default)]
struct MockState {
    calls: Vec<GatewayCall>,
    registered: HashMap<DeviceToken, BTreeSet<String>>,
    subscribed: BTreeSet<String>,
    connected: bool,
    failures: HashMap<PushOperation, GatewayError>,
}

/// Mock PushGateway backed by shared in-memory state
#[derive(Clone, Default)]
pub struct MockGateway {
    state: Arc<Mutex<MockState>>,
}

impl MockGateway {
    /// Create a fresh mock with no recorded calls
    pub fn new() -> Self {
        Self::default()
    }

    /// Script `operation` to fail with `error` until cleared
    pub fn fail_with(&self, operation: PushOperation, error: GatewayError) {
        self.state.lock().unwrap().failures.insert(operation, error);
    }

    /// Remove all scripted failures
    pub fn clear_failures(&self) {
        self.state.lock().unwrap().failures.clear();
    }

    /// Force the connected flag (tests of the unreachable-transport path)
    pub fn set_connected(&self, connected: bool) {
        self.state.lock().unwrap().connected = connected;
    }

    /// Every call recorded so far, in submission order
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Drain the recorded calls
    pub fn take_calls(&self) -> Vec<GatewayCall> {
        std::mem::take(&mut self.state.lock().unwrap().calls)
    }

    /// Simulated service-side view: channels push-enabled for `token`
    pub fn registered_channels(&self, token: &DeviceToken) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .registered
            .get(token)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Simulated service-side view: live subscriptions
    pub fn subscribed_channels(&self) -> Vec<String> {
        self.state.lock().unwrap().subscribed.iter().cloned().collect()
    }

    fn check_failure(
        state: &mut MockState,
        operation: PushOperation,
        call: GatewayCall,
    ) -> GatewayResult<()> {
        state.calls.push(call);
        match state.failures.get(&operation) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PushGateway for MockGateway {
    async fn add_push(&self, channels: &[String], token: &DeviceToken) -> GatewayResult<()> {
        let mut state = self.state.lock().unwrap();
        Self::check_failure(
            &mut state,
            PushOperation::AddPush,
            GatewayCall::AddPush { channels: channels.to_vec(), token: token.clone() },
        )?;
        state
            .registered
            .entry(token.clone())
            .or_default()
            .extend(channels.iter().cloned());
        Ok(())
    }

    async fn remove_push(&self, channels: &[String], token: &DeviceToken) -> GatewayResult<()> {
        let mut state = self.state.lock().unwrap();
        Self::check_failure(
            &mut state,
            PushOperation::RemovePush,
            GatewayCall::RemovePush { channels: channels.to_vec(), token: token.clone() },
        )?;
        if let Some(set) = state.registered.get_mut(token) {
            for channel in channels {
                set.remove(channel);
            }
        }
        Ok(())
    }

    async fn remove_all_push(&self, token: &DeviceToken) -> GatewayResult<()> {
        let mut state = self.state.lock().unwrap();
        Self::check_failure(
            &mut state,
            PushOperation::RemoveAllPush,
            GatewayCall::RemoveAllPush { token: token.clone() },
        )?;
        state.registered.remove(token);
        Ok(())
    }

    async fn list_push(&self, token: &DeviceToken) -> GatewayResult<Vec<String>> {
        let mut state = self.state.lock().unwrap();
        Self::check_failure(
            &mut state,
            PushOperation::ListPush,
            GatewayCall::ListPush { token: token.clone() },
        )?;
        Ok(state
            .registered
            .get(token)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn subscribe(&self, channels: &[String], presence: bool) {
        let mut state = self.state.lock().unwrap();
        state
            .calls
            .push(GatewayCall::Subscribe { channels: channels.to_vec(), presence });
        state.subscribed.extend(channels.iter().cloned());
        // First subscription establishes the connection
        state.connected = true;
    }

    async fn unsubscribe(&self, channels: &[String], presence: bool) {
        let mut state = self.state.lock().unwrap();
        state
            .calls
            .push(GatewayCall::Unsubscribe { channels: channels.to_vec(), presence });
        for channel in channels {
            state.subscribed.remove(channel);
        }
        if state.subscribed.is_empty() {
            state.connected = false;
        }
    }

    async fn unsubscribe_all(&self) {
        let mut state = self.state.lock().unwrap();
        state.calls.push(GatewayCall::UnsubscribeAll);
        state.subscribed.clear();
        state.connected = false;
    }

    fn is_connected(&self) -> bool {
        self.state.lock().unwrap().connected
    }
}
