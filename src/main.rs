// src/main.rs

//! # DID creation wizard - command line front end
//!
//! Runs the summary step of the create-DID wizard in a terminal.
//!
//! ## Commands
//! - `init-vault`: create an empty encrypted vault
//! - `create --draft <file>`: load the keys and services chosen in the earlier
//!   steps, preview the DID document and record it on-chain
//!
//! ## Environment Variables
//! - `DID_WIZARD_CONFIG`: settings file (optional)
//! - `DID_WIZARD_LEDGER__API_URL`, `DID_WIZARD_VAULT__PATH`, ...: see `config`
//! - `RUST_LOG`: log filter, overrides `log_level`

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use did_wizard::blockchain::ledger_client::LedgerClient;
use did_wizard::components::summary::{RecordOutcome, SummaryComponent, SummaryContext};
use did_wizard::config::Settings;
use did_wizard::services::did_service::DidService;
use did_wizard::services::vault_service::LocalVaultService;
use did_wizard::services::workflow::{HistoryRouter, WizardStep, Workflow, MANAGE_DIDS_ROUTE};
use did_wizard::store::{Action, CreateDidState, Store};
use did_wizard::ui::terminal::{TerminalDevice, TerminalDialog, TerminalNotifier, TerminalSpinner};
use did_wizard::ui::{DialogKind, DialogService, ModalSize};
use did_wizard::utils::serialization::deserialize;
use did_wizard::wallet::vault::Vault;
use dotenv::dotenv;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use zeroize::Zeroizing;

#[derive(Parser)]
#[command(name = "did-wizard", version, about = "Create a DID and record it on-chain")]
struct Cli {
    /// Settings file
    #[arg(long, env = "DID_WIZARD_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create an empty encrypted vault
    InitVault,
    /// Preview and record the DID described by a draft file
    Create {
        /// JSON file with managementKeys, didKeys and services
        #[arg(long)]
        draft: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(settings.log_level.as_str()),
    )
    .init();

    let vault = LocalVaultService::new(Vault::new(
        &settings.vault.path,
        settings.vault.pbkdf2_iterations,
    ));

    match cli.command {
        Command::InitVault => init_vault(&vault).await,
        Command::Create { draft } => create(&settings, vault, draft).await,
    }
}

async fn init_vault(vault: &LocalVaultService) -> anyhow::Result<()> {
    let dialogs = TerminalDialog;
    let password = ask_password(&dialogs, "Choose a vault password").await?;
    let confirm = ask_password(&dialogs, "Repeat the vault password").await?;
    if password != confirm {
        bail!("passwords do not match");
    }

    vault.create_vault(&password).await?;
    println!("Vault created at {}", vault.vault().path().display());
    Ok(())
}

async fn create(settings: &Settings, vault: LocalVaultService, draft: PathBuf) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(&draft)
        .with_context(|| format!("reading draft {}", draft.display()))?;
    let draft_state: CreateDidState =
        deserialize(&raw).with_context(|| format!("parsing draft {}", draft.display()))?;

    let store = Store::default();
    store.dispatch(Action::LoadDraft(draft_state));

    let ledger = LedgerClient::new(&settings.ledger.api_url, settings.ledger.timeout())?;
    let router = Arc::new(HistoryRouter::new());
    let ctx = SummaryContext {
        store: store.clone(),
        identity: Arc::new(DidService::new(store.clone(), ledger)),
        vault: Arc::new(vault),
        dialogs: Arc::new(TerminalDialog),
        notifier: Arc::new(TerminalNotifier),
        spinner: Arc::new(TerminalSpinner::default()),
        workflow: Arc::new(Workflow::new(router.clone(), WizardStep::Summary)),
        router: router.clone(),
        device: Arc::new(TerminalDevice::new(settings.ui.mobile)),
    };

    let mut summary = SummaryComponent::initialize(ctx)?;
    println!("DID: {}\n", summary.did_id());
    println!("{}\n", summary.entry_preview());

    loop {
        let choice = read_line(format!(
            "[r] {}   [b] Back   [q] Quit > ",
            summary.button_label()
        ))
        .await?;

        match choice.as_deref().map(str::trim) {
            Some("r") => match summary.record_on_chain().await {
                RecordOutcome::Recorded(context) => {
                    println!(
                        "Recorded {} at {}",
                        context.get("didId").unwrap_or_default(),
                        context.get("url").unwrap_or_default()
                    );
                    break;
                }
                RecordOutcome::Failed(_) => {
                    let redirected = router
                        .current()
                        .map(|(route, _)| route == MANAGE_DIDS_ROUTE)
                        .unwrap_or(false);
                    if redirected {
                        break;
                    }
                }
                RecordOutcome::Cancelled | RecordOutcome::AlreadyInFlight => {}
            },
            Some("b") => {
                summary.go_to_previous();
                break;
            }
            Some("q") | None => break,
            Some(_) => {}
        }
    }

    summary.destroy();
    if let Some((route, context)) = router.current() {
        println!("Next screen: {}", context.location(&route));
    }
    Ok(())
}

async fn ask_password(dialogs: &TerminalDialog, message: &str) -> anyhow::Result<Zeroizing<String>> {
    let answer = dialogs
        .open(DialogKind::Password, ModalSize::Small, message)
        .await
        .context("password prompt closed")?;
    match answer {
        Some(password) => Ok(Zeroizing::new(password)),
        None => bail!("a vault password is required"),
    }
}

/// Reads one line from stdin; `None` at end of input.
async fn read_line(prompt: String) -> anyhow::Result<Option<String>> {
    let line = tokio::task::spawn_blocking(move || -> io::Result<Option<String>> {
        let mut stdout = io::stdout();
        write!(stdout, "{}", prompt)?;
        stdout.flush()?;
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line)? {
            0 => Ok(None),
            _ => Ok(Some(line)),
        }
    })
    .await??;
    Ok(line)
}
