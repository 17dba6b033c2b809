//! Notifier port - transient user-visible notifications (toasts).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }
}

/// Shows a notification that disappears on its own.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notifier_is_object_safe() {
        fn _accepts_dyn(_notifier: &dyn Notifier) {}
    }

    #[test]
    fn constructors_set_level() {
        assert_eq!(Notification::error("x").level, NotificationLevel::Error);
        assert_eq!(Notification::success("x").level, NotificationLevel::Success);
        assert_eq!(Notification::info("x").level, NotificationLevel::Info);
    }
}
