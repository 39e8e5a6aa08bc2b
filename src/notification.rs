//! Parse notification / diagnostic system.
//!
//! Non-fatal issues the reader recovers from in lenient mode are collected
//! as `Notification` items rather than being silently dropped.  In strict
//! mode the same conditions surface as errors instead.
//!
//! After (or during) a pass the caller can inspect
//! [`CsvReader::notifications`](crate::CsvReader::notifications) to see what
//! was encountered.

use std::fmt;

/// Category of a recovered condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationType {
    /// A quoted field continued past the end of its physical line.
    EmbeddedNewline,
    /// An enclosure character inside a quoted field was kept literally.
    AmbiguousEnclosure,
    /// The input ended mid-row and the partial row was emitted.
    TruncatedRow,
}

impl NotificationType {
    /// Level the notification is logged at
    pub fn log_level(&self) -> log::Level {
        match self {
            Self::EmbeddedNewline => log::Level::Debug,
            Self::AmbiguousEnclosure | Self::TruncatedRow => log::Level::Warn,
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmbeddedNewline => write!(f, "EmbeddedNewline"),
            Self::AmbiguousEnclosure => write!(f, "AmbiguousEnclosure"),
            Self::TruncatedRow => write!(f, "TruncatedRow"),
        }
    }
}

/// A single notification produced during reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// The category.
    pub notification_type: NotificationType,
    /// Physical line the condition was observed on.
    pub line: usize,
    /// A human-readable description of the issue.
    pub message: String,
}

impl Notification {
    /// Create a new notification.
    pub fn new(notification_type: NotificationType, line: usize, message: impl Into<String>) -> Self {
        Self {
            notification_type,
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] line {}: {}", self.notification_type, self.line, self.message)
    }
}

/// Collects notifications during a read pass.
#[derive(Debug, Clone, Default)]
pub struct NotificationCollection {
    items: Vec<Notification>,
}

impl NotificationCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Record a notification.
    pub fn notify(&mut self, notification_type: NotificationType, line: usize, message: impl Into<String>) {
        let notification = Notification::new(notification_type, line, message);
        log::log!(notification_type.log_level(), "{}", notification);
        self.items.push(notification);
    }

    /// Check if there are any notifications.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of notifications.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Iterate over all notifications.
    pub fn iter(&self) -> std::slice::Iter<'_, Notification> {
        self.items.iter()
    }

    /// Get all notifications of a specific type.
    pub fn of_type(&self, nt: NotificationType) -> Vec<&Notification> {
        self.items.iter().filter(|n| n.notification_type == nt).collect()
    }

    /// Check whether any notification of the given type exists.
    pub fn has_type(&self, nt: NotificationType) -> bool {
        self.items.iter().any(|n| n.notification_type == nt)
    }

    /// Drop everything collected so far.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<'a> IntoIterator for &'a NotificationCollection {
    type Item = &'a Notification;
    type IntoIter = std::slice::Iter<'a, Notification>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
