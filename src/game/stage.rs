use bevy::prelude::*;

/// Index into [`STAGES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StageId(pub usize);

/// A battle backdrop.
#[derive(Debug, Clone, Copy)]
pub struct StageSpec {
    pub name: &'static str,
    /// Image under `assets/`.
    pub background: &'static str,
    /// Drawn behind the image, and alone if the image fails to load.
    pub fallback: Color,
}

pub const STAGES: [StageSpec; 3] = [
    StageSpec {
        name: "Shrine Grounds",
        background: "stages/shrine.jpg",
        fallback: Color::srgb(0.22, 0.28, 0.22),
    },
    StageSpec {
        name: "Dojo",
        background: "stages/dojo.jpg",
        fallback: Color::srgb(0.35, 0.26, 0.18),
    },
    StageSpec {
        name: "Downtown at Night",
        background: "stages/downtown_night.jpg",
        fallback: Color::srgb(0.08, 0.06, 0.16),
    },
];

impl StageId {
    pub fn spec(self) -> &'static StageSpec {
        &STAGES[self.0.min(STAGES.len() - 1)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_ids_fall_back_to_last_stage() {
        assert_eq!(StageId(0).spec().name, "Shrine Grounds");
        assert_eq!(StageId(99).spec().name, "Downtown at Night");
    }
}
