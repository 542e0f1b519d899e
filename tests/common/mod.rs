//! Test doubles for the summary step collaborators.

#![allow(dead_code)]

use async_trait::async_trait;
use did_wizard::blockchain::ledger_client::EntryReceipt;
use did_wizard::components::summary::SummaryContext;
use did_wizard::error::{LedgerError, VaultError};
use did_wizard::models::did::{DIDDocument, EntryType};
use did_wizard::models::keys::{DidKey, DidKeyPurpose, KeyType, ManagementKey};
use did_wizard::services::did_service::IdentityContext;
use did_wizard::services::vault_service::VaultService;
use did_wizard::services::workflow::{Router, StepContext, WorkflowNavigator};
use did_wizard::store::{Action, Store};
use did_wizard::ui::{BusyIndicator, DeviceDetector, DialogKind, DialogService, ModalSize, Notifier};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

pub const DID: &str = "did:factom:7e2c0b8f4a6d1e3c5b9a8f7e6d5c4b3a2918f7e6d5c4b3a29180f7e6d5c4b3a2";
pub const RECORDED_URL: &str = "https://explorer.example/entry/42";

/// Ordered log of collaborator calls shared by all fakes.
#[derive(Default)]
pub struct CallLog(Mutex<Vec<String>>);

impl CallLog {
    pub fn push(&self, call: impl Into<String>) {
        self.0.lock().unwrap().push(call.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn contains(&self, call: &str) -> bool {
        self.0.lock().unwrap().iter().any(|c| c == call)
    }
}

pub fn management_key(alias: &str) -> ManagementKey {
    ManagementKey {
        alias: alias.to_string(),
        key_type: KeyType::Ed25519,
        controller: DID.to_string(),
        public_key: format!("{}-public", alias),
        private_key: format!("{}-private", alias),
        priority: 0,
    }
}

pub fn did_key(alias: &str) -> DidKey {
    DidKey {
        alias: alias.to_string(),
        purpose: vec![DidKeyPurpose::PublicKey, DidKeyPurpose::Authentication],
        key_type: KeyType::EcdsaSecp256k1,
        controller: DID.to_string(),
        public_key: format!("{}-public", alias),
        private_key: format!("{}-private", alias),
        priority_requirement: None,
    }
}

pub struct FakeIdentity {
    pub store: Store,
    pub log: Arc<CallLog>,
    pub ledger_result: Mutex<Result<EntryReceipt, LedgerError>>,
    pub submitted: Mutex<Vec<DIDDocument>>,
}

#[async_trait]
impl IdentityContext for FakeIdentity {
    fn get_id(&self) -> String {
        DID.to_string()
    }

    fn generate_entry(&self, kind: EntryType) -> DIDDocument {
        self.log.push(format!("generate_entry:{}", kind));
        let state = self.store.snapshot().create_did;
        DIDDocument::from_keys(DID, &state.management_keys, &state.did_keys, &state.services)
    }

    async fn record_create_entry_on_chain(
        &self,
        document: &DIDDocument,
    ) -> Result<EntryReceipt, LedgerError> {
        self.log.push("record_create_entry_on_chain");
        self.submitted.lock().unwrap().push(document.clone());
        self.ledger_result.lock().unwrap().clone()
    }

    fn clear_data(&self) {
        self.log.push("clear_data");
        self.store.dispatch(Action::ClearCreateDid);
    }
}

pub struct SavedDid {
    pub did_id: String,
    pub document: DIDDocument,
    pub management_keys: Vec<ManagementKey>,
    pub did_keys: Vec<DidKey>,
    pub password: String,
}

pub struct FakeVault {
    pub log: Arc<CallLog>,
    pub unlock_ok: bool,
    pub save_ok: bool,
    pub saved: Mutex<Vec<SavedDid>>,
}

#[async_trait]
impl VaultService for FakeVault {
    async fn can_decrypt_vault(&self, _password: &str) -> Result<(), VaultError> {
        self.log.push("can_decrypt_vault");
        if self.unlock_ok {
            Ok(())
        } else {
            Err(VaultError::InvalidPassword)
        }
    }

    async fn save_did_to_vault(
        &self,
        did_id: &str,
        document: &DIDDocument,
        management_keys: &[ManagementKey],
        did_keys: &[DidKey],
        password: &str,
    ) -> Result<(), VaultError> {
        self.log.push("save_did_to_vault");
        if !self.save_ok {
            return Err(VaultError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only storage",
            )));
        }
        self.saved.lock().unwrap().push(SavedDid {
            did_id: did_id.to_string(),
            document: document.clone(),
            management_keys: management_keys.to_vec(),
            did_keys: did_keys.to_vec(),
            password: password.to_string(),
        });
        Ok(())
    }
}

/// Answers dialogs from a queue; with an empty queue the dialog stays open
/// until [`FakeDialog::answer_pending`] is called.
pub struct FakeDialog {
    pub log: Arc<CallLog>,
    pub answers: Mutex<VecDeque<Option<String>>>,
    pub pending: Mutex<Option<oneshot::Sender<Option<String>>>>,
    pub opened_with: Mutex<Vec<(DialogKind, ModalSize, String)>>,
}

impl FakeDialog {
    pub fn answer_pending(&self, answer: Option<String>) {
        let tx = self.pending.lock().unwrap().take().expect("no open dialog");
        tx.send(answer).unwrap();
    }
}

impl DialogService for FakeDialog {
    fn open(
        &self,
        kind: DialogKind,
        size: ModalSize,
        message: &str,
    ) -> oneshot::Receiver<Option<String>> {
        self.log.push("dialog.open");
        self.opened_with
            .lock()
            .unwrap()
            .push((kind, size, message.to_string()));
        let (tx, rx) = oneshot::channel();
        match self.answers.lock().unwrap().pop_front() {
            Some(answer) => {
                let _ = tx.send(answer);
            }
            None => *self.pending.lock().unwrap() = Some(tx),
        }
        rx
    }
}

pub struct FakeNotifier {
    pub log: Arc<CallLog>,
    pub errors: Mutex<Vec<String>>,
}

impl Notifier for FakeNotifier {
    fn error(&self, message: &str) {
        self.log.push("notifier.error");
        self.errors.lock().unwrap().push(message.to_string());
    }
}

pub struct FakeSpinner {
    pub log: Arc<CallLog>,
    pub visible: AtomicBool,
}

impl BusyIndicator for FakeSpinner {
    fn show(&self) {
        self.log.push("spinner.show");
        self.visible.store(true, Ordering::SeqCst);
    }

    fn hide(&self) {
        self.log.push("spinner.hide");
        self.visible.store(false, Ordering::SeqCst);
    }
}

pub struct FakeWorkflow {
    pub log: Arc<CallLog>,
    pub advanced_with: Mutex<Vec<StepContext>>,
}

impl WorkflowNavigator for FakeWorkflow {
    fn move_to_next_step(&self, context: StepContext) {
        self.log.push("workflow.next");
        self.advanced_with.lock().unwrap().push(context);
    }

    fn move_to_previous_step(&self) {
        self.log.push("workflow.previous");
    }
}

pub struct FakeRouter {
    pub log: Arc<CallLog>,
    pub routes: Mutex<Vec<String>>,
}

impl Router for FakeRouter {
    fn navigate(&self, route: &str, _context: &StepContext) {
        self.log.push("router.navigate");
        self.routes.lock().unwrap().push(route.to_string());
    }
}

pub struct FakeDevice(pub bool);

impl DeviceDetector for FakeDevice {
    fn is_mobile(&self) -> bool {
        self.0
    }
}

/// All fakes wired together, with handles kept for assertions.
pub struct Harness {
    pub log: Arc<CallLog>,
    pub store: Store,
    pub identity: Arc<FakeIdentity>,
    pub vault: Arc<FakeVault>,
    pub dialogs: Arc<FakeDialog>,
    pub notifier: Arc<FakeNotifier>,
    pub spinner: Arc<FakeSpinner>,
    pub workflow: Arc<FakeWorkflow>,
    pub router: Arc<FakeRouter>,
    pub mobile: bool,
}

pub struct HarnessBuilder {
    unlock_ok: bool,
    save_ok: bool,
    ledger_result: Result<EntryReceipt, LedgerError>,
    answers: VecDeque<Option<String>>,
    mobile: bool,
}

impl Default for HarnessBuilder {
    fn default() -> Self {
        Self {
            unlock_ok: true,
            save_ok: true,
            ledger_result: Ok(EntryReceipt {
                url: RECORDED_URL.to_string(),
            }),
            answers: VecDeque::from(vec![Some("vault-password".to_string())]),
            mobile: false,
        }
    }
}

impl HarnessBuilder {
    pub fn unlock_fails(mut self) -> Self {
        self.unlock_ok = false;
        self
    }

    pub fn save_fails(mut self) -> Self {
        self.save_ok = false;
        self
    }

    pub fn ledger_rejects(mut self, message: &str) -> Self {
        self.ledger_result = Err(LedgerError::Rejected {
            status: 400,
            message: message.to_string(),
        });
        self
    }

    pub fn dialog_answers(mut self, answers: Vec<Option<&str>>) -> Self {
        self.answers = answers
            .into_iter()
            .map(|a| a.map(str::to_string))
            .collect();
        self
    }

    pub fn mobile(mut self) -> Self {
        self.mobile = true;
        self
    }

    pub fn build(self) -> Harness {
        let log = Arc::new(CallLog::default());
        let store = Store::default();
        store.dispatch(Action::AddManagementKey(management_key("management-0")));
        store.dispatch(Action::AddDidKey(did_key("signing-0")));

        Harness {
            identity: Arc::new(FakeIdentity {
                store: store.clone(),
                log: log.clone(),
                ledger_result: Mutex::new(self.ledger_result),
                submitted: Mutex::new(Vec::new()),
            }),
            vault: Arc::new(FakeVault {
                log: log.clone(),
                unlock_ok: self.unlock_ok,
                save_ok: self.save_ok,
                saved: Mutex::new(Vec::new()),
            }),
            dialogs: Arc::new(FakeDialog {
                log: log.clone(),
                answers: Mutex::new(self.answers),
                pending: Mutex::new(None),
                opened_with: Mutex::new(Vec::new()),
            }),
            notifier: Arc::new(FakeNotifier {
                log: log.clone(),
                errors: Mutex::new(Vec::new()),
            }),
            spinner: Arc::new(FakeSpinner {
                log: log.clone(),
                visible: AtomicBool::new(false),
            }),
            workflow: Arc::new(FakeWorkflow {
                log: log.clone(),
                advanced_with: Mutex::new(Vec::new()),
            }),
            router: Arc::new(FakeRouter {
                log: log.clone(),
                routes: Mutex::new(Vec::new()),
            }),
            mobile: self.mobile,
            store,
            log,
        }
    }
}

impl Harness {
    pub fn builder() -> HarnessBuilder {
        HarnessBuilder::default()
    }

    pub fn context(&self) -> SummaryContext {
        SummaryContext {
            store: self.store.clone(),
            identity: self.identity.clone(),
            vault: self.vault.clone(),
            dialogs: self.dialogs.clone(),
            notifier: self.notifier.clone(),
            spinner: self.spinner.clone(),
            workflow: self.workflow.clone(),
            router: self.router.clone(),
            device: Arc::new(FakeDevice(self.mobile)),
        }
    }

    pub fn spinner_visible(&self) -> bool {
        self.spinner.visible.load(Ordering::SeqCst)
    }
}
