// src/components/summary.rs
//! Summary step of the create-DID wizard.
//!
//! Shows the draft DID document, then records it: password dialog, vault
//! unlock check, ledger submission, vault write, and on to the final step.
//! Each stage either hands its result to the next or stops the chain with a
//! [`RecordError`], which is turned into exactly one user notification.

use crate::error::RecordError;
use crate::models::did::{DIDDocument, EntryType};
use crate::models::keys::{DidKey, ManagementKey};
use crate::services::did_service::IdentityContext;
use crate::services::vault_service::VaultService;
use crate::services::workflow::{Router, StepContext, WorkflowNavigator, MANAGE_DIDS_ROUTE};
use crate::store::{StateSubscription, Store};
use crate::ui::{BusyIndicator, DeviceDetector, DialogKind, DialogService, ModalSize, Notifier};
use crate::utils::serialization::serialize_pretty;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use zeroize::Zeroizing;

pub const RECORD_BUTTON_LABEL: &str = "Record on-chain";
pub const RECORD_BUTTON_LABEL_SHORT: &str = "Record";
pub const VAULT_PASSWORD_PROMPT: &str = "Enter your vault password to save your key(s)";

/// Collaborators of the summary step.
#[derive(Clone)]
pub struct SummaryContext {
    pub store: Store,
    pub identity: Arc<dyn IdentityContext>,
    pub vault: Arc<dyn VaultService>,
    pub dialogs: Arc<dyn DialogService>,
    pub notifier: Arc<dyn Notifier>,
    pub spinner: Arc<dyn BusyIndicator>,
    pub workflow: Arc<dyn WorkflowNavigator>,
    pub router: Arc<dyn Router>,
    pub device: Arc<dyn DeviceDetector>,
}

/// How a call to [`SummaryComponent::record_on_chain`] ended.
#[derive(Debug)]
pub enum RecordOutcome {
    /// The password dialog was dismissed; nothing was called.
    Cancelled,
    /// Another recording is still running; this call did nothing.
    AlreadyInFlight,
    /// Recorded and saved; the workflow moved on with this context.
    Recorded(StepContext),
    /// The chain stopped at the given stage.
    Failed(RecordError),
}

#[derive(Debug, Clone, Default)]
struct KeySet {
    management_keys: Vec<ManagementKey>,
    did_keys: Vec<DidKey>,
}

/// Clears the in-flight flag when the recording ends, however it ends.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct SummaryComponent {
    ctx: SummaryContext,
    did_id: String,
    entry: DIDDocument,
    entry_preview: String,
    button_label: &'static str,
    subscription: Mutex<Option<StateSubscription>>,
    keys: Mutex<KeySet>,
    in_flight: AtomicBool,
}

impl SummaryComponent {
    /// Activates the step: reads the DID, subscribes to the store for key
    /// material, picks the button label and generates the draft once.
    ///
    /// # Errors
    /// Fails only if the draft cannot be rendered as JSON.
    pub fn initialize(ctx: SummaryContext) -> Result<Self, serde_json::Error> {
        let did_id = ctx.identity.get_id();

        let mut subscription = ctx.store.subscribe();
        let state = subscription.latest();
        let keys = KeySet {
            management_keys: state.create_did.management_keys,
            did_keys: state.create_did.did_keys,
        };

        let button_label = if ctx.device.is_mobile() {
            RECORD_BUTTON_LABEL_SHORT
        } else {
            RECORD_BUTTON_LABEL
        };

        let entry = ctx.identity.generate_entry(EntryType::CreateDIDEntry);
        let entry_preview = serialize_pretty(&entry)?;
        log::debug!(
            "Summary ready for {} ({} management, {} DID keys)",
            did_id,
            keys.management_keys.len(),
            keys.did_keys.len()
        );

        Ok(Self {
            ctx,
            did_id,
            entry,
            entry_preview,
            button_label,
            subscription: Mutex::new(Some(subscription)),
            keys: Mutex::new(keys),
            in_flight: AtomicBool::new(false),
        })
    }

    pub fn did_id(&self) -> &str {
        &self.did_id
    }

    pub fn entry(&self) -> &DIDDocument {
        &self.entry
    }

    /// The draft rendered as two-space indented JSON.
    pub fn entry_preview(&self) -> &str {
        &self.entry_preview
    }

    pub fn button_label(&self) -> &'static str {
        self.button_label
    }

    pub fn is_recording(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Asks for the vault password and records the draft on-chain.
    ///
    /// # Process Flow
    /// 1. Password dialog; a dismissed dialog ends here
    /// 2. Busy indicator on
    /// 3. Vault unlock check
    /// 4. Ledger submission
    /// 5. Vault write of the DID and its keys
    /// 6. Busy indicator off, creation state cleared, next step
    ///
    /// A failure at 3 or 4 is reported and ends the call. A failure at 5 means
    /// the DID is on-chain but not in the vault; the user is sent to the DID
    /// management screen instead.
    pub async fn record_on_chain(&self) -> RecordOutcome {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            log::warn!("Recording of {} already in progress", self.did_id);
            return RecordOutcome::AlreadyInFlight;
        };

        let dialog = self.ctx.dialogs.open(
            DialogKind::Password,
            ModalSize::ExtraExtraLarge,
            VAULT_PASSWORD_PROMPT,
        );
        let password = match dialog.await {
            Ok(Some(password)) if !password.is_empty() => Zeroizing::new(password),
            _ => return RecordOutcome::Cancelled,
        };

        self.ctx.spinner.show();
        let result = self.submit(&password).await;
        self.ctx.spinner.hide();

        match result {
            Ok(context) => {
                log::info!("{} recorded and saved to the vault", self.did_id);
                self.ctx.identity.clear_data();
                self.ctx.workflow.move_to_next_step(context.clone());
                RecordOutcome::Recorded(context)
            }
            Err(err) => {
                self.ctx.notifier.error(&err.to_string());
                if let RecordError::Persistence(cause) = &err {
                    log::error!("{} is on-chain but was not saved: {}", self.did_id, cause);
                    self.ctx.router.navigate(MANAGE_DIDS_ROUTE, &StepContext::new());
                } else {
                    log::warn!("Recording {} stopped: {}", self.did_id, err);
                }
                RecordOutcome::Failed(err)
            }
        }
    }

    /// Goes back to the previous wizard step.
    pub fn go_to_previous(&self) {
        self.ctx.workflow.move_to_previous_step();
    }

    /// Tears the step down, releasing the store subscription.
    pub fn destroy(&mut self) {
        if self
            .subscription
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .is_some()
        {
            log::debug!("Summary for {} released its store subscription", self.did_id);
        }
    }

    async fn submit(&self, password: &str) -> Result<StepContext, RecordError> {
        self.ctx
            .vault
            .can_decrypt_vault(password)
            .await
            .map_err(RecordError::VaultLocked)?;

        let receipt = self
            .ctx
            .identity
            .record_create_entry_on_chain(&self.entry)
            .await
            .map_err(RecordError::Ledger)?;

        let keys = self.current_keys();
        if !self.entry.carries_keys(&keys.management_keys, &keys.did_keys) {
            log::warn!(
                "Key material of {} changed after the draft was generated",
                self.did_id
            );
        }

        self.ctx
            .vault
            .save_did_to_vault(
                &self.did_id,
                &self.entry,
                &keys.management_keys,
                &keys.did_keys,
                password,
            )
            .await
            .map_err(RecordError::Persistence)?;

        Ok(StepContext::new()
            .with("url", receipt.url)
            .with("didId", self.did_id.as_str()))
    }

    /// Latest key lists published by the store, or the last seen ones once the
    /// subscription is released.
    fn current_keys(&self) -> KeySet {
        let mut keys = self.keys.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(subscription) = self
            .subscription
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_mut()
        {
            if subscription.has_changed() {
                let state = subscription.latest();
                keys.management_keys = state.create_did.management_keys;
                keys.did_keys = state.create_did.did_keys;
            }
        }
        keys.clone()
    }
}

impl Drop for SummaryComponent {
    fn drop(&mut self) {
        self.destroy();
    }
}
