// src/ui/terminal.rs
//! Terminal implementations of the feedback seams.

use crate::ui::{BusyIndicator, DeviceDetector, DialogKind, DialogService, ModalSize, Notifier};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use tokio::sync::oneshot;
use zeroize::Zeroizing;

/// Terminals narrower than this are treated like a phone screen.
pub const NARROW_TERMINAL_COLUMNS: usize = 60;

/// Prompts on stderr and reads the answer on a dedicated thread. Password
/// input is read with echo off when stdin is a terminal.
#[derive(Default)]
pub struct TerminalDialog;

impl DialogService for TerminalDialog {
    fn open(
        &self,
        kind: DialogKind,
        _size: ModalSize,
        message: &str,
    ) -> oneshot::Receiver<Option<String>> {
        let (tx, rx) = oneshot::channel();
        let prompt = match kind {
            DialogKind::Password => format!("{} (Esc or empty to cancel): ", message),
        };

        thread::spawn(move || {
            let mut stderr = io::stderr();
            let _ = write!(stderr, "{}", prompt);
            let _ = stderr.flush();

            let answer = if io::stdin().is_terminal() {
                read_hidden().unwrap_or_else(|e| {
                    log::warn!("Password prompt failed: {}", e);
                    None
                })
            } else {
                read_piped()
            };
            let _ = writeln!(stderr);
            // The screen may have gone away while we were waiting.
            let _ = tx.send(answer.map(|password| password.to_string()));
        });

        rx
    }
}

/// What a key press did to the password being typed.
#[derive(Debug, PartialEq, Eq)]
enum Keystroke {
    Continue,
    Submit,
    Cancel,
}

fn apply_key(buffer: &mut Zeroizing<String>, key: KeyEvent) -> Keystroke {
    if key.kind != KeyEventKind::Press {
        return Keystroke::Continue;
    }
    match key.code {
        KeyCode::Enter => Keystroke::Submit,
        KeyCode::Esc => Keystroke::Cancel,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Keystroke::Cancel,
        KeyCode::Backspace => {
            buffer.pop();
            Keystroke::Continue
        }
        KeyCode::Char(c) => {
            buffer.push(c);
            Keystroke::Continue
        }
        _ => Keystroke::Continue,
    }
}

/// Restores cooked mode however the prompt ends.
struct RawMode;

impl RawMode {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn read_hidden() -> io::Result<Option<Zeroizing<String>>> {
    let _raw = RawMode::enable()?;
    let mut buffer = Zeroizing::new(String::new());
    loop {
        if let Event::Key(key) = event::read()? {
            match apply_key(&mut buffer, key) {
                Keystroke::Continue => {}
                Keystroke::Submit => return Ok((!buffer.is_empty()).then_some(buffer)),
                Keystroke::Cancel => return Ok(None),
            }
        }
    }
}

fn read_piped() -> Option<Zeroizing<String>> {
    let mut line = Zeroizing::new(String::new());
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => {
            let value = Zeroizing::new(line.trim_end_matches(['\r', '\n']).to_string());
            (!value.is_empty()).then_some(value)
        }
    }
}

#[derive(Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn error(&self, message: &str) {
        log::error!("{}", message);
        eprintln!("✗ {}", message);
    }
}

/// Prints a one-line status when shown and remembers whether it is visible.
#[derive(Default)]
pub struct TerminalSpinner {
    visible: AtomicBool,
}

impl TerminalSpinner {
    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }
}

impl BusyIndicator for TerminalSpinner {
    fn show(&self) {
        if !self.visible.swap(true, Ordering::SeqCst) {
            eprintln!("… working");
        }
    }

    fn hide(&self) {
        self.visible.store(false, Ordering::SeqCst);
    }
}

/// Decides "mobile" from an explicit setting, else from the terminal width in
/// `COLUMNS`.
pub struct TerminalDevice {
    mobile_override: Option<bool>,
}

impl TerminalDevice {
    pub fn new(mobile_override: Option<bool>) -> Self {
        Self { mobile_override }
    }
}

impl DeviceDetector for TerminalDevice {
    fn is_mobile(&self) -> bool {
        if let Some(mobile) = self.mobile_override {
            return mobile;
        }
        std::env::var("COLUMNS")
            .ok()
            .and_then(|c| c.trim().parse::<usize>().ok())
            .map(|columns| columns < NARROW_TERMINAL_COLUMNS)
            .unwrap_or(false)
    }
}
