use chrono::{DateTime, Duration, Local};

/// Maximum number of notifications kept on screen
const MAX_VISIBLE: usize = 5;

const DEFAULT_LIFETIME_SECS: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Info,
    Warning,
    Error,
}

impl Level {
    pub fn label(self) -> &'static str {
        match self {
            Level::Success => "success",
            Level::Info => "info",
            Level::Warning => "warning",
            Level::Error => "error",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Level::Success => "✓",
            Level::Info => "i",
            Level::Warning => "!",
            Level::Error => "✗",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub level: Level,
    pub message: String,
    /// Persistent notifications stay until dismissed.
    pub persistent: bool,
    pub created_at: DateTime<Local>,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Level::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Level::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Level::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Level::Error, message)
    }

    pub fn persistent(mut self) -> Self {
        self.persistent = true;
        self
    }

    fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            persistent: false,
            created_at: Local::now(),
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Local>) -> bool {
        !self.persistent && now - self.created_at >= Duration::seconds(DEFAULT_LIFETIME_SECS)
    }
}

#[derive(Debug, Default)]
pub struct NotificationQueue {
    items: Vec<Notification>,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notification: Notification) {
        // Same message twice in a row only shows once.
        if self
            .items
            .last()
            .is_some_and(|last| last.message == notification.message && last.level == notification.level)
        {
            return;
        }

        while self.items.len() >= MAX_VISIBLE {
            match self.items.iter().position(|item| !item.persistent) {
                Some(index) => {
                    self.items.remove(index);
                }
                None => {
                    self.items.remove(0);
                }
            }
        }
        self.items.push(notification);
    }

    pub fn tick(&mut self) -> bool {
        self.tick_at(Local::now())
    }

    pub fn tick_at(&mut self, now: DateTime<Local>) -> bool {
        let before = self.items.len();
        self.items.retain(|item| !item.is_expired_at(now));
        self.items.len() != before
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn last(&self) -> Option<&Notification> {
        self.items.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter()
    }
}
