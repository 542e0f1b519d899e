// src/store/mod.rs
//! Application state store.
//!
//! State is a single [`AppState`] value changed only through [`Action`]s. Every
//! dispatch publishes a whole-state snapshot to all subscribers over a
//! `tokio::sync::watch` channel. A [`StateSubscription`] is the subscriber's
//! registration: dropping it unregisters the observer.

use crate::models::keys::{DidKey, ManagementKey, Service};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;

/// Draft captured by the create-DID wizard steps.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateDidState {
    #[serde(default)]
    pub management_keys: Vec<ManagementKey>,
    #[serde(default)]
    pub did_keys: Vec<DidKey>,
    #[serde(default)]
    pub services: Vec<Service>,
}

/// Whole application state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    pub create_did: CreateDidState,
}

/// State transitions.
#[derive(Debug, Clone)]
pub enum Action {
    AddManagementKey(ManagementKey),
    RemoveManagementKey { alias: String },
    AddDidKey(DidKey),
    RemoveDidKey { alias: String },
    AddService(Service),
    RemoveService { alias: String },
    /// Replace the whole draft, e.g. when resuming from a saved file
    LoadDraft(CreateDidState),
    /// Drop everything the wizard collected
    ClearCreateDid,
}

fn reduce(state: &mut AppState, action: Action) {
    let draft = &mut state.create_did;
    match action {
        Action::AddManagementKey(key) => draft.management_keys.push(key),
        Action::RemoveManagementKey { alias } => draft.management_keys.retain(|k| k.alias != alias),
        Action::AddDidKey(key) => draft.did_keys.push(key),
        Action::RemoveDidKey { alias } => draft.did_keys.retain(|k| k.alias != alias),
        Action::AddService(service) => draft.services.push(service),
        Action::RemoveService { alias } => draft.services.retain(|s| s.alias != alias),
        Action::LoadDraft(loaded) => *draft = loaded,
        Action::ClearCreateDid => *draft = CreateDidState::default(),
    }
}

/// Shared handle to the application state. Cloning shares the same state.
#[derive(Clone)]
pub struct Store {
    sender: Arc<watch::Sender<AppState>>,
}

impl Store {
    pub fn new(initial: AppState) -> Self {
        let (sender, _) = watch::channel(initial);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Applies `action` and notifies subscribers.
    pub fn dispatch(&self, action: Action) {
        log::trace!("dispatch {:?}", action);
        self.sender.send_modify(|state| reduce(state, action));
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> AppState {
        self.sender.borrow().clone()
    }

    /// Registers an observer of state snapshots.
    pub fn subscribe(&self) -> StateSubscription {
        StateSubscription {
            receiver: self.sender.subscribe(),
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(AppState::default())
    }
}

/// An observer registration on the [`Store`].
pub struct StateSubscription {
    receiver: watch::Receiver<AppState>,
}

impl StateSubscription {
    /// Latest published snapshot, marking it as seen.
    pub fn latest(&mut self) -> AppState {
        self.receiver.borrow_and_update().clone()
    }

    /// True if a snapshot was published since the last [`latest`](Self::latest).
    pub fn has_changed(&self) -> bool {
        self.receiver.has_changed().unwrap_or(false)
    }
}
