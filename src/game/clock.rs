/// Round countdown in seconds, floored at zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchClock {
    remaining: f32,
    duration: f32,
    critical: f32,
}

impl MatchClock {
    pub fn new(duration: f32, critical: f32) -> Self {
        Self {
            remaining: duration,
            duration,
            critical,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.remaining = (self.remaining - dt).max(0.0);
    }

    pub fn reset(&mut self) {
        self.remaining = self.duration;
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn is_expired(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Low on time. Presentation only.
    pub fn is_critical(&self) -> bool {
        self.remaining <= self.critical
    }

    /// Whole seconds shown on the HUD.
    pub fn display_seconds(&self) -> u32 {
        self.remaining.floor() as u32
    }

    /// Red half of the low-time blink, judged on the displayed seconds.
    pub fn blink_on(&self) -> bool {
        let secs = self.display_seconds();
        secs as f32 <= self.critical && secs % 2 == 0
    }
}
