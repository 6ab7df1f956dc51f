use std::time::{Duration, Instant};

/// Shell-level state that outlives panel switches.
pub struct AppState {
    pub started_at: Instant,
    pub status_line: String,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
            status_line: "EN ATTENTE DU PREMIER CYCLE".to_string(),
        }
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}
