use std::cell::RefCell;
use std::rc::Rc;

use tracing::error;

/// Operator-facing error channel of the workflow host.
pub trait Notifier {
    fn error(&self, message: &str);
}

/// Reports operator messages through the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn error(&self, message: &str) {
        error!(target: "operator", "{message}");
    }
}

/// Keeps operator messages for later inspection.
///
/// Clones share the same message list.
#[derive(Debug, Clone, Default)]
pub struct CollectingNotifier {
    messages: Rc<RefCell<Vec<String>>>,
}

impl CollectingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }
}

impl Notifier for CollectingNotifier {
    fn error(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}
