//! Push Registration Reconciler
//!
//! Owns the (token, channel set, debug flag) triple and is its only writer.
//! External observers push whole new field values in; the reconciler diffs
//! them against the stored state, issues the corresponding gateway calls, and
//! reports every outcome to the event sink and the broadcast stream.
//!
//! # Locking discipline
//!
//! Each entry point locks the state, snapshots the old value, installs the
//! new one, computes the transition, and unlocks before any gateway call is
//! awaited. In-flight calls for different transitions may therefore overlap;
//! correctness relies on each call being idempotent at the gateway and on
//! every transition resolving against the latest stored companion field.
//!
//! # Failure policy
//!
//! Gateway failures are recorded, never retried here, and never surfaced
//! synchronously to the caller. A gateway call that never completes produces
//! no outcome; timeouts are the embedder's responsibility.

use crate::config::EngineConfig;
use crate::core_diff::{diff_channels, diff_token, ChannelTransition, TokenTransition};
use crate::core_push::debug_mirror::{plan_channel_transition, plan_flag_toggle, MirrorAction};
use crate::core_push::errors::ReconcilerError;
use crate::core_push::events::{EventBroadcaster, EventSink, PushEvent};
use crate::core_push::gateway::{GatewayResult, PushGateway};
use crate::core_push::types::{
    ChannelSet, DeviceToken, PushOperation, RegistrationOutcome, RegistrationState,
    SessionIdentity,
};
use metrics::counter;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Reconciles push registrations against a remote gateway
pub struct PushReconciler {
    /// The registration triple; never held across a gateway await
    state: Mutex<RegistrationState>,

    /// Identity outcomes are recorded under
    identity: Mutex<Option<SessionIdentity>>,

    /// Port onto the remote push service
    gateway: Arc<dyn PushGateway>,

    /// Embedder's event log
    sink: Arc<dyn EventSink>,

    /// Broadcast stream of outcomes and state changes
    broadcaster: EventBroadcaster,

    config: EngineConfig,
}

impl PushReconciler {
    /// Create a reconciler with empty registration state
    pub fn new(
        gateway: Arc<dyn PushGateway>,
        sink: Arc<dyn EventSink>,
        config: EngineConfig,
    ) -> Self {
        info!(debug_suffix = %config.debug_suffix, "creating push reconciler");
        let broadcaster = EventBroadcaster::new(config.event_capacity);
        Self {
            state: Mutex::new(RegistrationState::empty()),
            identity: Mutex::new(None),
            gateway,
            sink,
            broadcaster,
            config,
        }
    }

    /// Set or clear the identity under which outcomes are recorded
    pub fn set_identity(&self, identity: Option<SessionIdentity>) {
        *self.identity.lock().unwrap() = identity;
    }

    /// Snapshot of the current registration triple
    pub fn state(&self) -> RegistrationState {
        self.state.lock().unwrap().clone()
    }

    /// Subscribe to the stream of outcomes and state changes
    pub fn events(&self) -> broadcast::Receiver<PushEvent> {
        self.broadcaster.subscribe()
    }

    /// The device push token changed (or disappeared)
    pub async fn on_token_changed(&self, new: Option<DeviceToken>) {
        let (transition, channels) = {
            let mut state = self.state.lock().unwrap();
            let transition = diff_token(state.token.as_ref(), new.as_ref());
            state.token = new;
            (transition, state.channels.clone())
        };
        counter!("push.transitions.token").increment(1);

        match transition {
            TokenTransition::NoToken => {
                debug!("token absent before and after, nothing to reconcile");
            }
            TokenTransition::Unchanged => {
                debug!("token unchanged, push registrations already current");
            }
            TokenTransition::Cleared(old) => {
                self.emit_state_changed();
                if channels.as_ref().is_some_and(|c| !c.is_empty()) {
                    info!(token = %old, "token cleared, releasing all push registrations");
                    let result = self.gateway.remove_all_push(&old).await;
                    self.finish_call(PushOperation::RemoveAllPush, Vec::new(), Some(old), result);
                } else {
                    debug!(token = %old, "token cleared with no registered channels");
                }
            }
            TokenTransition::Registered(token) => {
                self.emit_state_changed();
                if let Some(list) = flatten(channels.as_ref()) {
                    info!(token = %token, channels = list.len(), "registering new token");
                    let result = self.gateway.add_push(&list, &token).await;
                    self.finish_call(PushOperation::AddPush, list, Some(token), result);
                } else {
                    debug!(
                        token = %token,
                        "token registered with no channels; caught up on next channel change"
                    );
                }
            }
            TokenTransition::Rotated { old, new } => {
                self.emit_state_changed();
                if let Some(list) = flatten(channels.as_ref()) {
                    info!(old_token = %old, new_token = %new, "token rotated");
                    let result = self.gateway.remove_push(&list, &old).await;
                    self.finish_call(PushOperation::RemovePush, list.clone(), Some(old), result);
                    // Registration of the new token proceeds regardless of
                    // the removal outcome; the gateway is idempotent for
                    // duplicate registrations.
                    let result = self.gateway.add_push(&list, &new).await;
                    self.finish_call(PushOperation::AddPush, list, Some(new), result);
                } else {
                    debug!(old_token = %old, new_token = %new, "token rotated with no channels");
                }
            }
        }
    }

    /// The set of push-subscribed channels changed (or disappeared)
    pub async fn on_channels_changed(&self, new: Option<ChannelSet>) {
        let (transition, token, mirror_on) = {
            let mut state = self.state.lock().unwrap();
            let transition = diff_channels(state.channels.as_ref(), new.as_ref());
            state.channels = new;
            (transition, state.token.clone(), state.debug_mirror)
        };
        counter!("push.transitions.channels").increment(1);

        match transition {
            ChannelTransition::NoChannels => {
                debug!("channel set absent before and after, nothing to reconcile");
                return;
            }
            ChannelTransition::Unchanged => {
                debug!("channel membership unchanged, no gateway calls");
                return;
            }
            _ => {}
        }
        self.emit_state_changed();
        self.execute_channel_plan(&transition, token, mirror_on).await;
    }

    /// Execute a channel-transition plan computed from a state snapshot
    ///
    /// `token` is the token captured with the snapshot; it is re-checked
    /// against the live state before any push call so a plan that lost a
    /// race with a token rotation cannot register channels for a token
    /// that is no longer held.
    async fn execute_channel_plan(
        &self,
        transition: &ChannelTransition,
        token: Option<DeviceToken>,
        mirror_on: bool,
    ) {
        match token {
            None => {
                debug!("no push token held, stored channel set without gateway calls");
            }
            Some(token) if !self.token_is_current(&token) => {
                // A rotation raced us; that transition re-registers against
                // the latest channel set, so skipping here cannot strand a
                // registration on the stale token.
                let error = ReconcilerError::StateInconsistency {
                    planned: token.to_hex(),
                    current: self.current_token_hex(),
                };
                warn!(error = %error, "skipping push calls for stale channel plan");
            }
            Some(token) => match transition {
                ChannelTransition::Added(new) => {
                    if let Some(list) = flatten(Some(new)) {
                        info!(token = %token, channels = list.len(), "registering added channels");
                        let result = self.gateway.add_push(&list, &token).await;
                        self.finish_call(PushOperation::AddPush, list, Some(token), result);
                    }
                }
                ChannelTransition::Cleared(old) => {
                    if let Some(list) = flatten(Some(old)) {
                        info!(token = %token, channels = list.len(), "deregistering cleared channels");
                        let result = self.gateway.remove_push(&list, &token).await;
                        self.finish_call(PushOperation::RemovePush, list, Some(token), result);
                    }
                }
                ChannelTransition::Delta { adding, removing } => {
                    if let Some(list) = flatten(Some(adding)) {
                        let result = self.gateway.add_push(&list, &token).await;
                        self.finish_call(
                            PushOperation::AddPush,
                            list,
                            Some(token.clone()),
                            result,
                        );
                    }
                    if let Some(list) = flatten(Some(removing)) {
                        let result = self.gateway.remove_push(&list, &token).await;
                        self.finish_call(PushOperation::RemovePush, list, Some(token), result);
                    }
                }
                ChannelTransition::NoChannels | ChannelTransition::Unchanged => {}
            },
        }

        // Mirror subscriptions ride the channel-presence path; they are not
        // token-scoped, so this runs even when no token is held.
        if mirror_on {
            for action in plan_channel_transition(transition, &self.config.debug_suffix) {
                self.execute_mirror(action).await;
            }
        }
    }

    /// Toggle the debug mirror flag
    pub async fn set_debug_mirror(&self, enabled: bool) {
        let (changed, channels) = {
            let mut state = self.state.lock().unwrap();
            let changed = state.debug_mirror != enabled;
            state.debug_mirror = enabled;
            (changed, state.channels.clone())
        };
        if !changed {
            debug!(enabled, "debug mirror flag unchanged");
            return;
        }
        self.emit_state_changed();

        if let Some(action) =
            plan_flag_toggle(enabled, channels.as_ref(), &self.config.debug_suffix)
        {
            self.execute_mirror(action).await;
        }
    }

    /// Ask the service which channels are push-enabled for the current token
    /// and record the answer as an outcome; never mutates state
    pub async fn request_registered_channels(&self) {
        let token = self.state.lock().unwrap().token.clone();
        let Some(token) = token else {
            debug!("no push token held, skipping registration audit");
            return;
        };
        match self.gateway.list_push(&token).await {
            Ok(channels) => {
                self.finish_call(PushOperation::ListPush, channels, Some(token), Ok(()))
            }
            Err(error) => {
                self.finish_call(PushOperation::ListPush, Vec::new(), Some(token), Err(error))
            }
        }
    }

    /// Release everything the session holds: push registrations for the
    /// current token and all live mirror subscriptions
    pub async fn teardown(&self) {
        let old = std::mem::take(&mut *self.state.lock().unwrap());
        if old.is_empty() {
            debug!("teardown with empty state, nothing to release");
            return;
        }
        info!("tearing down session registrations");
        self.emit_state_changed();

        if let Some(token) = old.token {
            let result = self.gateway.remove_all_push(&token).await;
            self.finish_call(PushOperation::RemoveAllPush, Vec::new(), Some(token), result);
        }
        if old.debug_mirror {
            self.execute_mirror(MirrorAction::UnsubscribeAll).await;
        }
    }

    fn token_is_current(&self, token: &DeviceToken) -> bool {
        self.state.lock().unwrap().token.as_ref() == Some(token)
    }

    fn current_token_hex(&self) -> String {
        self.state
            .lock()
            .unwrap()
            .token
            .as_ref()
            .map(DeviceToken::to_hex)
            .unwrap_or_else(|| "none".to_string())
    }

    fn emit_state_changed(&self) {
        let state = self.state.lock().unwrap().clone();
        self.broadcaster.emit(PushEvent::StateChanged {
            token_present: state.token.is_some(),
            channel_count: state.channels.as_ref().map_or(0, ChannelSet::len),
            debug_mirror: state.debug_mirror,
        });
    }

    /// Record one finished gateway call as an outcome, in the sink and on the
    /// broadcast stream
    fn finish_call(
        &self,
        operation: PushOperation,
        channels: Vec<String>,
        token: Option<DeviceToken>,
        result: GatewayResult<()>,
    ) {
        counter!("push.gateway.calls").increment(1);
        if let Err(error) = &result {
            counter!("push.gateway.failures").increment(1);
            warn!(%operation, error = %error, "push gateway call failed");
        }
        counter!("push.events.recorded").increment(1);

        let outcome = RegistrationOutcome::new(operation, channels, token, result);
        let actor = self.identity.lock().unwrap().clone();
        self.sink.record(&outcome, actor.as_ref());
        self.broadcaster.emit(PushEvent::Outcome(outcome));
    }

    async fn execute_mirror(&self, action: MirrorAction) {
        match action {
            MirrorAction::Subscribe(channels) => {
                counter!("push.mirror.subscribes").increment(1);
                debug!(channels = channels.len(), "subscribing debug mirror channels");
                self.gateway.subscribe(&channels, false).await;
            }
            MirrorAction::Unsubscribe(channels) => {
                if self.gateway.is_connected() {
                    counter!("push.mirror.unsubscribes").increment(1);
                    debug!(channels = channels.len(), "unsubscribing debug mirror channels");
                    self.gateway.unsubscribe(&channels, false).await;
                } else {
                    debug!("no live subscription connection, skipping mirror unsubscribe");
                }
            }
            MirrorAction::UnsubscribeAll => {
                if self.gateway.is_connected() {
                    counter!("push.mirror.unsubscribes").increment(1);
                    self.gateway.unsubscribe_all().await;
                } else {
                    debug!("no live subscription connection, nothing to drop");
                }
            }
        }
    }
}

/// Flatten a channel set into the list form the gateway takes; empty and
/// absent sets both elide the call entirely
fn flatten(channels: Option<&ChannelSet>) -> Option<Vec<String>> {
    channels.filter(|c| !c.is_empty()).map(ChannelSet::to_vec)
}
