//! Dialog state machine
//!
//! One parameterised modal used for confirmations and ad-hoc messages.
//! `Closed -> Open -> Closing -> Closed`; closing waits the exit duration
//! before the close callback runs.

use serde::Serialize;
use std::time::Duration;

pub const EXIT_DURATION: Duration = Duration::from_millis(300);
const MIN_EXIT: Duration = Duration::from_millis(250);
const MAX_EXIT: Duration = Duration::from_millis(400);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DialogPhase {
    Closed,
    Open,
    Closing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionStyle {
    Primary,
    Secondary,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DialogAction {
    pub id: String,
    pub label: String,
    pub style: ActionStyle,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dialog {
    pub title: String,
    pub body: String,
    pub actions: Vec<DialogAction>,
    phase: DialogPhase,
    #[serde(skip)]
    exit_duration: Duration,
}

impl Dialog {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            actions: Vec::new(),
            phase: DialogPhase::Closed,
            exit_duration: EXIT_DURATION,
        }
    }

    /// Delete confirmation with cancel and delete actions
    pub fn confirm_delete(singular: &str, name: &str) -> Self {
        Self::new(
            format!("{singular} löschen"),
            format!("Möchten Sie {name} wirklich löschen? Diese Aktion kann nicht rückgängig gemacht werden."),
        )
        .action("cancel", "Abbrechen", ActionStyle::Secondary)
        .action("delete", "Löschen", ActionStyle::Danger)
    }

    pub fn action(mut self, id: &str, label: &str, style: ActionStyle) -> Self {
        self.actions.push(DialogAction { id: id.into(), label: label.into(), style });
        self
    }

    /// Exit duration, clamped to 250..=400 ms
    pub fn exit_duration(mut self, duration: Duration) -> Self {
        self.exit_duration = duration.clamp(MIN_EXIT, MAX_EXIT);
        self
    }

    pub fn phase(&self) -> DialogPhase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase == DialogPhase::Open
    }

    /// Whether the dialog is on screen (open or animating out)
    pub fn is_visible(&self) -> bool {
        self.phase != DialogPhase::Closed
    }

    /// Open from `Closed`. Returns false in any other phase.
    pub fn open(&mut self) -> bool {
        if self.phase != DialogPhase::Closed {
            return false;
        }
        self.phase = DialogPhase::Open;
        true
    }

    /// Run the exit transition, then `on_close`. No-op unless open.
    pub async fn close<F: FnOnce()>(&mut self, on_close: F) -> bool {
        if self.phase != DialogPhase::Open {
            return false;
        }
        self.phase = DialogPhase::Closing;
        tokio::time::sleep(self.exit_duration).await;
        self.phase = DialogPhase::Closed;
        on_close();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_open_only_from_closed() {
        let mut dialog = Dialog::new("Hinweis", "Text");
        assert!(dialog.open());
        assert!(!dialog.open());
        assert!(dialog.is_open());
    }

    #[test]
    fn test_exit_duration_clamped() {
        let d = Dialog::new("a", "b").exit_duration(Duration::from_millis(50));
        assert_eq!(d.exit_duration, MIN_EXIT);
        let d = Dialog::new("a", "b").exit_duration(Duration::from_secs(2));
        assert_eq!(d.exit_duration, MAX_EXIT);
    }

    #[test]
    fn test_confirm_delete_actions() {
        let dialog = Dialog::confirm_delete("Raum", "Raum 101");
        assert_eq!(dialog.title, "Raum löschen");
        assert!(dialog.body.contains("Raum 101"));
        assert_eq!(dialog.actions.last().map(|a| a.style), Some(ActionStyle::Danger));
    }

    #[tokio::test]
    async fn test_close_on_closed_dialog_is_noop() {
        let mut dialog = Dialog::new("a", "b");
        let mut called = false;
        assert!(!dialog.close(|| called = true).await);
        assert!(!called);
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_waits_exit_duration() {
        let closed = Arc::new(AtomicBool::new(false));
        let mut dialog = Dialog::new("a", "b");
        dialog.open();

        let flag = closed.clone();
        let task = tokio::spawn(async move {
            dialog.close(move || flag.store(true, Ordering::SeqCst)).await;
            dialog
        });

        tokio::time::sleep(Duration::from_millis(299)).await;
        assert!(!closed.load(Ordering::SeqCst));

        tokio::time::sleep(Duration::from_millis(2)).await;
        let dialog = task.await.unwrap();
        assert!(closed.load(Ordering::SeqCst));
        assert_eq!(dialog.phase(), DialogPhase::Closed);
    }
}
