//! Best-effort user notifications.
//!
//! A notification is issued and forgotten: delivery errors are logged at
//! debug level and never reach the caller.

use log::{debug, info};
use uuid::Uuid;

use crate::types::errors::NotifyError;
use crate::types::event::{Notification, NotificationCategory};

/// Delivers notifications to the user.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Writes notifications to the log. Used when the host has no notification surface.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        info!("[{}] {}", notification.title, notification.message);
        Ok(())
    }
}

/// Issues `notification` and discards any delivery failure.
pub fn emit(notifier: &dyn Notifier, notification: Notification) {
    if let Err(e) = notifier.notify(&notification) {
        debug!("Dropped notification {}: {}", notification.id, e);
    }
}

pub fn blocked_tracker(domain: &str) -> Notification {
    Notification {
        id: format!("blocking-{}", Uuid::new_v4()),
        category: NotificationCategory::BlockedTracker,
        title: "Tracker blocked".to_string(),
        message: format!("{} was blocked.", domain),
    }
}

pub fn hijack_alert(url: &str) -> Notification {
    Notification {
        id: format!("hijack-{}", Uuid::new_v4()),
        category: NotificationCategory::HijackAlert,
        title: "Hijacking alert".to_string(),
        message: format!("Possible browser hijacking detected at {}", url),
    }
}
