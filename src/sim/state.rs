//! Session state and core simulation types
//!
//! Everything a running session mutates lives here; the difficulty predictor
//! only ever sees a `SessionSnapshot` copied out of it.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::clamp_difficulty;
use crate::consts::MIN_DIFFICULTY;
use crate::difficulty::SessionSnapshot;
use crate::tuning::Tuning;

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// No session started yet
    #[default]
    Idle,
    /// Active gameplay
    Running,
    /// Lives exhausted; terminal for this session
    Ended,
}

/// Spawned entity types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    /// Collectible orb
    Orb,
    /// Cactus hazard
    Hazard,
}

/// Orbs enter this far past the right edge of the field
pub const ORB_ENTRY_MARGIN: f32 = 40.0;
/// Hazards enter this far past the right edge of the field
pub const HAZARD_ENTRY_MARGIN: f32 = 70.0;
/// Entities are removed once they reach this x
pub const DESPAWN_X: f32 = -40.0;

/// An orb or hazard crossing the field right to left
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Speed multiplier handed to the scene runtime (`max(1, difficulty)`)
    pub speed: f64,
    /// Seconds to cross from entry to `DESPAWN_X`
    pub travel_secs: f64,
}

impl Entity {
    pub fn new(id: u32, kind: EntityKind, entry: Vec2, speed: f64, travel_secs: f64) -> Self {
        let distance = entry.x - DESPAWN_X;
        let vel = Vec2::new(-distance / travel_secs as f32, 0.0);
        Self {
            id,
            kind,
            pos: entry,
            vel,
            speed,
            travel_secs,
        }
    }

    /// Move along the crossing path
    pub fn advance(&mut self, dt: f64) {
        self.pos += self.vel * dt as f32;
    }

    /// True once the entity has left the field
    pub fn is_offscreen(&self) -> bool {
        self.pos.x <= DESPAWN_X
    }
}

/// Record handed to the score store when a session ends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub final_score: u64,
    pub base_difficulty: f64,
    pub orbs_collected: u32,
    pub hazard_hits: u32,
    pub elapsed_secs: f64,
    /// Wall-clock unix ms of the last host-stamped tick (0 if never stamped)
    pub timestamp_ms: f64,
}

/// Things that happened during a tick, in order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    SessionStarted { base_difficulty: f64 },
    Spawned(Entity),
    Despawned { id: u32 },
    OrbCollected { score: u64 },
    HazardHit { lives: u8 },
    DifficultyChanged { from: f64, to: f64 },
    SessionEnded(SessionSummary),
}

/// Live counters shown by the HUD
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hud {
    pub score: u64,
    pub lives: u8,
    /// Integer-truncated base difficulty
    pub difficulty: u8,
    pub current_difficulty: f64,
}

/// Seeded RNG plus the seed it came from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub rng: Pcg32,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

/// Complete session state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// RNG state (spawn heights)
    pub rng_state: RngState,
    /// Balance constants
    pub tuning: Tuning,
    /// Current phase
    pub phase: GamePhase,
    /// Score
    pub score: u64,
    /// Player lives
    pub lives: u8,
    /// User-selected baseline, always in [1, 3]
    base_difficulty: f64,
    /// Difficulty driving spawns, always in [1, 3]
    current_difficulty: f64,
    pub total_orbs_collected: u32,
    pub total_hazard_hits: u32,
    /// Simulated seconds since this state was created
    pub clock: f64,
    /// Clock value at session start
    pub session_started_at: Option<f64>,
    /// Latest wall-clock time supplied by the host (unix ms)
    pub wall_clock_ms: f64,
    pub last_orb_spawn: f64,
    pub last_hazard_spawn: f64,
    /// Live orbs and hazards (sorted by id)
    pub entities: Vec<Entity>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create an idle state with the given seed
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            rng_state: RngState::new(seed),
            lives: tuning.starting_lives,
            tuning,
            phase: GamePhase::Idle,
            score: 0,
            base_difficulty: MIN_DIFFICULTY,
            current_difficulty: MIN_DIFFICULTY,
            total_orbs_collected: 0,
            total_hazard_hits: 0,
            clock: 0.0,
            session_started_at: None,
            wall_clock_ms: 0.0,
            last_orb_spawn: 0.0,
            last_hazard_spawn: 0.0,
            entities: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn base_difficulty(&self) -> f64 {
        self.base_difficulty
    }

    pub fn current_difficulty(&self) -> f64 {
        self.current_difficulty
    }

    /// Set the baseline, clamped into [1, 3]
    pub fn set_base_difficulty(&mut self, value: f64) {
        self.base_difficulty = clamp_difficulty(value);
    }

    /// Set the live difficulty, clamped into [1, 3]
    pub fn set_current_difficulty(&mut self, value: f64) {
        self.current_difficulty = clamp_difficulty(value);
    }

    /// Zero all counters and start the session clock
    pub fn reset_session(&mut self) {
        self.score = 0;
        self.lives = self.tuning.starting_lives;
        self.current_difficulty = self.base_difficulty;
        self.total_orbs_collected = 0;
        self.total_hazard_hits = 0;
        self.session_started_at = Some(self.clock);
        self.last_orb_spawn = self.clock;
        self.last_hazard_spawn = self.clock;
        self.entities.clear();
    }

    /// Seconds since session start (0 before any session)
    pub fn elapsed(&self) -> f64 {
        self.session_started_at
            .map_or(0.0, |start| (self.clock - start).max(0.0))
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            score: self.score,
            lives: self.lives,
            orbs_collected: self.total_orbs_collected,
            hazard_hits: self.total_hazard_hits,
            elapsed_secs: self.elapsed(),
            base_difficulty: self.base_difficulty,
        }
    }

    pub fn hud(&self) -> Hud {
        Hud {
            score: self.score,
            lives: self.lives,
            difficulty: self.base_difficulty.trunc() as u8,
            current_difficulty: self.current_difficulty,
        }
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            final_score: self.score,
            base_difficulty: self.base_difficulty,
            orbs_collected: self.total_orbs_collected,
            hazard_hits: self.total_hazard_hits,
            elapsed_secs: self.elapsed(),
            timestamp_ms: self.wall_clock_ms,
        }
    }

    /// Remove a live entity of the given kind, returning whether it existed
    pub fn take_entity(&mut self, id: u32, kind: EntityKind) -> bool {
        match self.entities.iter().position(|e| e.id == id && e.kind == kind) {
            Some(idx) => {
                self.entities.remove(idx);
                true
            }
            None => false,
        }
    }
}
