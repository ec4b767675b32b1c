//! Level data: entities, immutable templates and per-attempt instances
//!
//! A [`LevelTemplate`] is loaded once and never mutated. Every level
//! (re)start builds a fresh [`Level`] from it, so collected flags and patrol
//! positions reset without touching the template.

use glam::DVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::rect::Rect;

/// Entity variants. Patrol and collectible state only exist where they apply.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntityKind {
    /// Solid ground the player can land on or bump into from below
    Platform,
    /// Static hazard
    Spike,
    /// Hazard that patrols horizontally between `start_x` and `start_x + range`
    MovingHazard {
        velocity_x: f64,
        start_x: f64,
        range: f64,
    },
    /// Pickup counted toward the level quota
    #[serde(alias = "banana")]
    Collectible {
        #[serde(default)]
        collected: bool,
    },
    /// Level exit, active once the quota is met
    Portal,
}

impl EntityKind {
    pub fn name(&self) -> &'static str {
        match self {
            EntityKind::Platform => "platform",
            EntityKind::Spike => "spike",
            EntityKind::MovingHazard { .. } => "moving_hazard",
            EntityKind::Collectible { .. } => "collectible",
            EntityKind::Portal => "portal",
        }
    }

    #[inline]
    pub fn is_hazard(&self) -> bool {
        matches!(self, EntityKind::Spike | EntityKind::MovingHazard { .. })
    }
}

/// A level entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Assigned when a level instance is built; templates leave it at 0
    #[serde(default)]
    pub id: u32,
    pub rect: Rect,
    #[serde(flatten)]
    pub kind: EntityKind,
}

impl Entity {
    pub fn new(rect: Rect, kind: EntityKind) -> Self {
        Self { id: 0, rect, kind }
    }

    /// Whether this is a collectible that has already been picked up
    #[inline]
    pub fn is_collected(&self) -> bool {
        matches!(self.kind, EntityKind::Collectible { collected: true })
    }

    /// Advance a patrolling hazard by one frame. Other kinds are untouched.
    ///
    /// The band is `[start_x, start_x + range]`: only `x < start_x` reverses
    /// on the low side, not `x < start_x - range`.
    pub fn patrol(&mut self) {
        if let EntityKind::MovingHazard {
            ref mut velocity_x,
            start_x,
            range,
        } = self.kind
        {
            self.rect.x += *velocity_x;
            if self.rect.x > start_x + range || self.rect.x < start_x {
                *velocity_x = -*velocity_x;
            }
        }
    }
}

/// Level validation failures. All of them are authoring defects.
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level data could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("level set contains no levels")]
    EmptyLevelSet,

    #[error("level {level}: requires {required} collectibles but only {available} exist")]
    QuotaExceedsCollectibles {
        level: u32,
        required: u32,
        available: usize,
    },

    #[error("level {level}: {kind} entity found in the {list} list")]
    MisplacedEntity {
        level: u32,
        list: &'static str,
        kind: &'static str,
    },

    #[error("level {level}: {list} entry {index} has a degenerate rectangle")]
    DegenerateRect {
        level: u32,
        list: &'static str,
        index: usize,
    },

    #[error("level {level}: invalid patrol ({reason})")]
    InvalidPatrol { level: u32, reason: &'static str },

    #[error("level {level}: spawn point is not finite")]
    InvalidSpawn { level: u32 },
}

/// Immutable description of one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelTemplate {
    pub id: u32,
    /// Top-left corner of the player at level start
    pub spawn: DVec2,
    pub required_collectibles: u32,
    pub platforms: Vec<Entity>,
    pub hazards: Vec<Entity>,
    pub collectibles: Vec<Entity>,
    pub portal: Entity,
}

impl LevelTemplate {
    /// Check every authoring invariant the simulation relies on
    pub fn validate(&self) -> Result<(), LevelError> {
        let level = self.id;

        if !self.spawn.is_finite() {
            return Err(LevelError::InvalidSpawn { level });
        }

        if self.required_collectibles as usize > self.collectibles.len() {
            return Err(LevelError::QuotaExceedsCollectibles {
                level,
                required: self.required_collectibles,
                available: self.collectibles.len(),
            });
        }

        check_list(level, "platforms", &self.platforms, |k| {
            matches!(k, EntityKind::Platform)
        })?;
        check_list(level, "hazards", &self.hazards, EntityKind::is_hazard)?;
        check_list(level, "collectibles", &self.collectibles, |k| {
            matches!(k, EntityKind::Collectible { .. })
        })?;
        check_list(level, "portal", std::slice::from_ref(&self.portal), |k| {
            matches!(k, EntityKind::Portal)
        })?;

        for hazard in &self.hazards {
            if let EntityKind::MovingHazard {
                velocity_x,
                start_x,
                range,
            } = hazard.kind
            {
                if !velocity_x.is_finite() || !start_x.is_finite() || !range.is_finite() {
                    return Err(LevelError::InvalidPatrol {
                        level,
                        reason: "non-finite patrol parameter",
                    });
                }
                if range < 0.0 {
                    return Err(LevelError::InvalidPatrol {
                        level,
                        reason: "negative range",
                    });
                }
            }
        }

        Ok(())
    }
}

fn check_list(
    level: u32,
    list: &'static str,
    entities: &[Entity],
    allowed: impl Fn(&EntityKind) -> bool,
) -> Result<(), LevelError> {
    for (index, entity) in entities.iter().enumerate() {
        if !allowed(&entity.kind) {
            return Err(LevelError::MisplacedEntity {
                level,
                list,
                kind: entity.kind.name(),
            });
        }
        if !entity.rect.is_well_formed() {
            return Err(LevelError::DegenerateRect { level, list, index });
        }
    }
    Ok(())
}

/// Working copy of a level for one attempt
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    pub id: u32,
    pub spawn: DVec2,
    pub required_collectibles: u32,
    pub platforms: Vec<Entity>,
    pub hazards: Vec<Entity>,
    pub collectibles: Vec<Entity>,
    pub portal: Entity,
}

impl Level {
    /// Build a fresh instance from a template.
    ///
    /// Entity ids are assigned sequentially from 1 in list order (platforms,
    /// hazards, collectibles, portal). Collectibles start uncollected and
    /// patrols start at their `start_x`.
    pub fn instantiate(template: &LevelTemplate) -> Self {
        let mut next_id = 1;
        let mut fresh = |entity: &Entity| {
            let mut e = entity.clone();
            e.id = next_id;
            next_id += 1;
            match e.kind {
                EntityKind::Collectible { ref mut collected } => *collected = false,
                EntityKind::MovingHazard { start_x, .. } => e.rect.x = start_x,
                _ => {}
            }
            e
        };

        let platforms = template.platforms.iter().map(&mut fresh).collect();
        let hazards = template.hazards.iter().map(&mut fresh).collect();
        let collectibles = template.collectibles.iter().map(&mut fresh).collect();
        let portal = fresh(&template.portal);

        Self {
            id: template.id,
            spawn: template.spawn,
            required_collectibles: template.required_collectibles,
            platforms,
            hazards,
            collectibles,
            portal,
        }
    }
}
