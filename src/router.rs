use std::sync::{Arc, Mutex};

use log::info;

/// Capability to move the active view to another route.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &str);
}

/// In-memory navigation history, newest route last.
#[derive(Debug, Clone)]
pub struct History {
    entries: Arc<Mutex<Vec<String>>>,
}

impl History {
    pub fn new(initial: &str) -> Self {
        Self {
            entries: Arc::new(Mutex::new(vec![String::from(initial)])),
        }
    }

    pub fn location(&self) -> String {
        let entries = self.entries.lock().unwrap();
        entries.last().cloned().unwrap_or_default()
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }
}

impl Navigator for History {
    fn navigate(&self, route: &str) {
        info!("Navigating to '{route}'");
        self.entries.lock().unwrap().push(String::from(route));
    }
}
