//! The Freedom dove that sits in the middle of the HUD.
//!
//! Its pose follows the audience trend and it flaps through a short frame
//! loop driven by the app's frame clock.

use std::time::{Duration, Instant};

use freedom_metrics::Trend;

const FRAME_INTERVAL: Duration = Duration::from_millis(400);

/// Dove pose, one per audience trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pose {
    Soaring,
    Gliding,
    Perched,
}

impl From<Trend> for Pose {
    fn from(trend: Trend) -> Self {
        match trend {
            Trend::Up => Pose::Soaring,
            Trend::Stable => Pose::Gliding,
            Trend::Down => Pose::Perched,
        }
    }
}

impl Pose {
    fn frames(self) -> &'static [[&'static str; 4]] {
        match self {
            Pose::Soaring => &SOARING,
            Pose::Gliding => &GLIDING,
            Pose::Perched => &PERCHED,
        }
    }

    pub fn caption(self) -> &'static str {
        match self {
            Pose::Soaring => "en hausse",
            Pose::Gliding => "stable",
            Pose::Perched => "en baisse",
        }
    }
}

const SOARING: [[&str; 4]; 2] = [
    [r"  \\   //  ", r"   \\_//   ", r"   (o >    ", r"   /_\     "],
    [r"           ", r"  ==(o >== ", r"    /_\    ", r"           "],
];

const GLIDING: [[&str; 4]; 2] = [
    [r"           ", r" ~~=(o >   ", r"    /_\~~  ", r"           "],
    [r"           ", r"  ~=(o >~  ", r"    /_\    ", r"           "],
];

const PERCHED: [[&str; 4]; 2] = [
    [r"           ", r"    (o >   ", r"   //_\    ", r"  ==='''=== "],
    [r"           ", r"    (- >   ", r"   //_\    ", r"  ==='''=== "],
];

/// Animated mascot state.
pub struct Dove {
    pose: Pose,
    frame: usize,
    last_advance: Instant,
}

impl Dove {
    pub fn new(now: Instant) -> Self {
        Self {
            pose: Pose::Gliding,
            frame: 0,
            last_advance: now,
        }
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    /// Follow the latest trend. Changing pose restarts the loop.
    pub fn set_trend(&mut self, trend: Trend, now: Instant) {
        let pose = Pose::from(trend);
        if pose != self.pose {
            self.pose = pose;
            self.frame = 0;
            self.last_advance = now;
        }
    }

    /// Advance the frame loop, catching up after long gaps.
    pub fn tick(&mut self, now: Instant) {
        let Some(mut elapsed) = now.checked_duration_since(self.last_advance) else {
            return;
        };
        let frames = self.pose.frames().len();
        while elapsed >= FRAME_INTERVAL {
            self.frame = (self.frame + 1) % frames;
            self.last_advance += FRAME_INTERVAL;
            elapsed -= FRAME_INTERVAL;
        }
    }

    pub fn frame_index(&self) -> usize {
        self.frame
    }

    /// Current frame plus a caption line.
    pub fn lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self.pose.frames()[self.frame]
            .iter()
            .map(|l| l.to_string())
            .collect();
        lines.push(format!("  {}", self.pose.caption()));
        lines
    }
}
