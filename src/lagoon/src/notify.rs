//! Table-change notification.
//!
//! The executor publishes one event per table touched by a committed
//! mutation; live queries subscribe and re-run when a tracked table shows
//! up.

use tokio::sync::broadcast;

#[derive(Debug, Clone)]
pub struct ChangeEvent {
    pub table: String,
}

#[derive(Debug)]
pub struct Notifier {
    tx: broadcast::Sender<ChangeEvent>,
}

impl Notifier {
    pub fn new() -> Notifier {
        let (tx, _) = broadcast::channel(256);
        Notifier { tx }
    }

    pub fn table_changed(&self, table: &str) {
        // No receivers is fine; events are droppable.
        let _ = self.tx.send(ChangeEvent {
            table: table.to_string(),
        });
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.tx.subscribe()
    }
}

impl Default for Notifier {
    fn default() -> Notifier {
        Notifier::new()
    }
}
