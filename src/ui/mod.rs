// src/ui/mod.rs
//! User-facing feedback seams: dialogs, notifications, busy indicator and
//! device detection. Screens depend on these traits only; [`terminal`] holds
//! the implementations used by the command-line front end.

pub mod terminal;

use tokio::sync::oneshot;

/// Dialogs a screen can open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    /// Asks for the vault password; answers with the password or nothing
    Password,
}

/// Requested size of a modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalSize {
    Small,
    Medium,
    Large,
    ExtraLarge,
    ExtraExtraLarge,
}

/// Opens modal dialogs.
pub trait DialogService: Send + Sync {
    /// Opens a dialog and returns a channel that yields its single result.
    ///
    /// `None` (or a dropped sender) means the user dismissed the dialog.
    fn open(
        &self,
        kind: DialogKind,
        size: ModalSize,
        message: &str,
    ) -> oneshot::Receiver<Option<String>>;
}

/// Transient user notifications.
pub trait Notifier: Send + Sync {
    fn error(&self, message: &str);
}

/// Busy indicator shown while a long operation runs.
pub trait BusyIndicator: Send + Sync {
    fn show(&self);
    fn hide(&self);
}

/// Describes the device the UI is displayed on.
pub trait DeviceDetector: Send + Sync {
    fn is_mobile(&self) -> bool;
}
