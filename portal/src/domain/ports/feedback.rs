//! Ports for user-visible side effects: transient notices and navigation.
//!
//! The session manager announces outcomes through [`Notifier`]; the HTTP
//! adapter's rejection handler sends the user to the login surface through
//! [`Navigator`]. A UI shell implements both.

/// Severity of a transient notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeLevel {
    /// The operation succeeded.
    Success,
    /// The operation failed.
    Error,
}

/// Transient user-visible message (a toast, in a browser shell).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    level: NoticeLevel,
    message: String,
}

impl Notice {
    /// Success notice.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    /// Error notice.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    /// Severity.
    #[must_use]
    pub fn level(&self) -> NoticeLevel {
        self.level
    }

    /// Message text.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// Sink for transient notices.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    /// Show a notice. Must not block or fail.
    fn notify(&self, notice: Notice);
}

/// Notifier that drops every notice.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn notify(&self, _notice: Notice) {}
}

/// Screens the client can be sent to without user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    /// The login form.
    Login,
}

/// Navigation controller.
///
/// Implementations must treat repeated navigation to the surface already
/// shown as a no-op, since concurrent rejections may each ask for it.
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    /// Show `surface`.
    fn navigate(&self, surface: Surface);
}

/// Navigator that ignores every request.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn navigate(&self, _surface: Surface) {}
}
