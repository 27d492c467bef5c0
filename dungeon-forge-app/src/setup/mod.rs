//! Wiring between resolved settings and the generators.

pub mod execution;

use crate::config::{GenerationSettings, GeneratorKind};
use crate::error::AppError;
use dungeon_core::rooms::{generate_rooms, RoomDungeon};
use dungeon_core::runner::ProgressCallback;
use dungeon_core::wfc::{WfcDungeon, WfcGenerator, WfcOptions};
use dungeon_core::{GenerationError, SeededRandom};
use dungeon_rules::loader::load_from_file;
use dungeon_rules::AdjacencyRules;
use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

/// A dungeon from either generator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "generator", rename_all = "lowercase")]
pub enum GeneratedDungeon {
    Rooms(RoomDungeon),
    Wfc(WfcDungeon),
}

impl GeneratedDungeon {
    pub const fn kind(&self) -> GeneratorKind {
        match self {
            Self::Rooms(_) => GeneratorKind::Rooms,
            Self::Wfc(_) => GeneratorKind::Wfc,
        }
    }

    /// Share of walkable cells.
    #[allow(clippy::cast_precision_loss)]
    pub fn floor_ratio(&self) -> f64 {
        let (walkable, total) = match self {
            Self::Rooms(d) => (d.floor_count(), d.grid.len()),
            Self::Wfc(d) => (
                d.grid.iter().filter(|(_, tile)| tile.is_walkable()).count(),
                d.grid.len(),
            ),
        };
        if total == 0 {
            0.0
        } else {
            walkable as f64 / total as f64
        }
    }
}

/// Seed used when none is configured: the current UNIX time in milliseconds.
pub fn clock_seed() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
        })
}

/// Loads the configured adjacency table, or the built-in dungeon table.
pub fn load_rules(settings: &GenerationSettings) -> Result<AdjacencyRules, AppError> {
    match &settings.rule_file {
        Some(path) => {
            log::info!("Loading rules from: {}", path.display());
            Ok(load_from_file(path)?)
        }
        None => Ok(AdjacencyRules::dungeon()),
    }
}

/// Runs the configured generator once.
///
/// The room generator draws from a [`SeededRandom`] seeded with `seed`, so
/// both generators replay for a fixed seed.
pub fn generate(
    settings: &GenerationSettings,
    rules: &AdjacencyRules,
    seed: i64,
    progress: Option<ProgressCallback>,
) -> Result<GeneratedDungeon, GenerationError> {
    match settings.generator {
        GeneratorKind::Rooms => {
            let mut rng = SeededRandom::new(seed);
            generate_rooms(settings.width, settings.height, settings.complexity, &mut rng)
                .map(GeneratedDungeon::Rooms)
        }
        GeneratorKind::Wfc => {
            let mut options = WfcOptions {
                rules: rules.clone(),
                ..WfcOptions::default()
            };
            options.portals.count = settings.portal_count;
            let mut generator = WfcGenerator::new(options);
            if let Some(callback) = progress {
                generator = generator.with_progress(callback);
            }
            generator
                .generate(settings.width, settings.height, seed)
                .map(GeneratedDungeon::Wfc)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_both_kinds() {
        let rules = AdjacencyRules::dungeon();
        let mut settings = GenerationSettings {
            width: 24,
            height: 24,
            ..GenerationSettings::default()
        };
        let wfc = generate(&settings, &rules, 3, None).unwrap();
        assert_eq!(wfc.kind(), GeneratorKind::Wfc);

        settings.generator = GeneratorKind::Rooms;
        let rooms = generate(&settings, &rules, 3, None).unwrap();
        assert_eq!(rooms.kind(), GeneratorKind::Rooms);
        assert!(rooms.floor_ratio() > 0.0);
        assert_eq!(rooms, generate(&settings, &rules, 3, None).unwrap());
    }

    #[test]
    fn portal_count_is_forwarded() {
        let settings = GenerationSettings {
            width: 30,
            height: 30,
            portal_count: 0,
            ..GenerationSettings::default()
        };
        let GeneratedDungeon::Wfc(dungeon) =
            generate(&settings, &AdjacencyRules::dungeon(), 42, None).unwrap()
        else {
            panic!("expected a WFC dungeon");
        };
        assert!(dungeon.portal_positions.is_empty());
    }

    #[test]
    fn bad_complexity_surfaces() {
        let settings = GenerationSettings {
            generator: GeneratorKind::Rooms,
            complexity: 1.5,
            ..GenerationSettings::default()
        };
        assert!(matches!(
            generate(&settings, &AdjacencyRules::dungeon(), 1, None),
            Err(GenerationError::InvalidComplexity(_))
        ));
    }
}
