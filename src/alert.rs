//! Alert system for passing success, info and error messages to the user.
//!
//! The library never talks to a UI directly. Operations that need to tell the
//! user something (a goal was reached, a reminder is due, nothing to allocate
//! to) hand an [Alert] to a [Notifier], and the UI layer decides how to show it.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// Alert message types for styling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertType {
    /// An operation succeeded.
    Success,
    /// Something the user may want to know, no action needed.
    Info,
    /// The operation did nothing, e.g. nothing was selected.
    Warning,
    /// The operation failed.
    Error,
}

/// A message for the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// How the alert should be styled.
    pub alert_type: AlertType,
    /// The headline, e.g. "Goal reached!".
    pub message: String,
    /// A longer explanation, may be empty.
    pub details: String,
}

impl Alert {
    /// Create a new success alert
    pub fn success(message: &str, details: &str) -> Self {
        Self::new(AlertType::Success, message, details)
    }

    /// Create a new info alert
    pub fn info(message: &str, details: &str) -> Self {
        Self::new(AlertType::Info, message, details)
    }

    /// Create a new warning alert
    pub fn warning(message: &str, details: &str) -> Self {
        Self::new(AlertType::Warning, message, details)
    }

    /// Create a new error alert
    pub fn error(message: &str, details: &str) -> Self {
        Self::new(AlertType::Error, message, details)
    }

    fn new(alert_type: AlertType, message: &str, details: &str) -> Self {
        Self {
            alert_type,
            message: message.to_owned(),
            details: details.to_owned(),
        }
    }
}

/// Something that can show alerts to the user.
pub trait Notifier {
    /// Show `alert` to the user.
    fn notify(&self, alert: Alert);
}

/// A [Notifier] that writes alerts to the log.
///
/// Used by the reminder scheduler binary, which has no UI of its own.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, alert: Alert) {
        match alert.alert_type {
            AlertType::Error => tracing::error!("{}: {}", alert.message, alert.details),
            AlertType::Warning => tracing::warn!("{}: {}", alert.message, alert.details),
            AlertType::Success | AlertType::Info => {
                tracing::info!("{}: {}", alert.message, alert.details)
            }
        }
    }
}

/// A [Notifier] that keeps every alert it receives.
///
/// Useful for UI layers that show alerts in batches, and for tests.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    alerts: Mutex<Vec<Alert>>,
}

impl RecordingNotifier {
    /// Remove and return the alerts received so far.
    pub fn take(&self) -> Vec<Alert> {
        match self.alerts.lock() {
            Ok(mut alerts) => std::mem::take(&mut *alerts),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, alert: Alert) {
        match self.alerts.lock() {
            Ok(mut alerts) => alerts.push(alert),
            Err(poisoned) => poisoned.into_inner().push(alert),
        }
    }
}

#[cfg(test)]
mod recording_notifier_tests {
    use super::{Alert, Notifier, RecordingNotifier};

    #[test]
    fn take_returns_alerts_in_order_and_clears() {
        let notifier = RecordingNotifier::default();

        notifier.notify(Alert::success("first", ""));
        notifier.notify(Alert::error("second", "details"));

        let alerts = notifier.take();
        assert_eq!(
            alerts,
            vec![Alert::success("first", ""), Alert::error("second", "details")]
        );
        assert!(notifier.take().is_empty());
    }
}
