use std::sync::Arc;
use std::time::Instant;

use freedom_metrics::DashboardSnapshot;

#[derive(Debug, Clone)]
pub enum Event {
    Tick { now: Instant },
    Key(crossterm::event::KeyEvent),
    Resize { cols: u16, rows: u16 },
    ModuleActivated { id: String },
    ModuleDeactivated { id: String },
    /// A refresh cycle completed; panels redraw from this snapshot.
    Snapshot(Arc<DashboardSnapshot>),
    Quit,
}
