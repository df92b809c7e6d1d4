use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::notification::Notification;
use crate::models::snapshot::AppSnapshot;

pub struct NotificationService;

impl NotificationService {
    pub fn unread_count(snapshot: &AppSnapshot) -> usize {
        snapshot.notifications.iter().filter(|n| !n.read).count()
    }

    pub fn list(snapshot: &AppSnapshot, unread_only: bool) -> Vec<Notification> {
        snapshot
            .notifications
            .iter()
            .filter(|n| !unread_only || !n.read)
            .cloned()
            .collect()
    }

    /// Read is one-way; marking twice is harmless.
    pub fn mark_read(snapshot: &mut AppSnapshot, notification_id: Uuid) -> Result<()> {
        let notification = snapshot
            .notifications
            .iter_mut()
            .find(|n| n.id == notification_id)
            .ok_or_else(|| Error::not_found("Notification", notification_id))?;
        notification.read = true;
        Ok(())
    }

    pub fn mark_all_read(snapshot: &mut AppSnapshot) -> usize {
        let mut marked = 0;
        for notification in snapshot.notifications.iter_mut().filter(|n| !n.read) {
            notification.read = true;
            marked += 1;
        }
        marked
    }
}
