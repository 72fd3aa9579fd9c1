use bevy::prelude::*;

/// Highlighted row in a vertical menu; wraps at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuCursor {
    pub index: usize,
    pub len: usize,
}

impl MenuCursor {
    pub fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    pub fn up(&mut self) {
        self.index = (self.index + self.len - 1) % self.len;
    }

    pub fn down(&mut self) {
        self.index = (self.index + 1) % self.len;
    }
}

/// Stage select rows: every stage, then "Quit Game".
#[derive(Resource, Debug, Clone, Copy)]
pub struct StageCursor(pub MenuCursor);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseChoice {
    Continue,
    Settings,
    Quit,
}

impl PauseChoice {
    pub const ALL: [PauseChoice; 3] = [Self::Continue, Self::Settings, Self::Quit];

    pub fn label(self) -> &'static str {
        match self {
            Self::Continue => "Continue",
            Self::Settings => "Settings",
            Self::Quit => "Quit",
        }
    }
}

#[derive(Resource, Debug, Clone, Copy)]
pub struct PauseCursor(pub MenuCursor);

impl PauseCursor {
    pub fn choice(&self) -> PauseChoice {
        PauseChoice::ALL[self.0.index]
    }
}

impl Default for PauseCursor {
    fn default() -> Self {
        Self(MenuCursor::new(PauseChoice::ALL.len()))
    }
}

/// Session music volume in 0.0..=1.0. Not saved between runs.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct MusicVolume(pub f32);

impl MusicVolume {
    pub fn set(&mut self, v: f32) {
        self.0 = v.clamp(0.0, 1.0);
    }

    pub fn nudge(&mut self, delta: f32) {
        self.set(self.0 + delta);
    }

    pub fn percent(&self) -> u32 {
        (self.0 * 100.0).round() as u32
    }
}

/// Horizontal position of `cursor` along `bar` as 0.0..=1.0, if it is on it.
pub fn bar_fraction(cursor: Vec2, bar: Rect) -> Option<f32> {
    if !bar.contains(cursor) || bar.width() <= 0.0 {
        return None;
    }
    Some(((cursor.x - bar.min.x) / bar.width()).clamp(0.0, 1.0))
}
