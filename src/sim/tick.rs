//! Fixed timestep simulation tick
//!
//! Session state machine: `Idle -> Running -> Ended`. Contacts reported by
//! the scene runtime are applied in order, then periodic spawns and the
//! fall-through check run. Once a session has ended every call is a no-op.

use glam::Vec2;
use rand::Rng;

use super::state::{
    Entity, EntityKind, GameEvent, GamePhase, GameState, HAZARD_ENTRY_MARGIN, ORB_ENTRY_MARGIN,
};
use crate::consts::MIN_DIFFICULTY;
use crate::difficulty::DifficultyPredictor;
use crate::tuning::DifficultyMode;

/// A contact reported by the scene runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Player touched the orb with this entity id
    Orb(u32),
    /// Player touched the hazard with this entity id
    Hazard(u32),
}

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Contacts since the previous tick, in the order they happened
    pub contacts: Vec<Contact>,
    /// Latest player position sample
    pub player_pos: Option<Vec2>,
    /// Wall-clock unix ms, stamped into the session summary
    pub now_ms: Option<f64>,
}

/// Reset the session and enter `Running`
pub fn start_session(state: &mut GameState) -> GameEvent {
    state.reset_session();
    state.phase = GamePhase::Running;
    log::info!(
        "Session started (base difficulty {:.1}, seed {})",
        state.base_difficulty(),
        state.seed
    );
    GameEvent::SessionStarted {
        base_difficulty: state.base_difficulty(),
    }
}

/// Advance the session by one fixed timestep
pub fn tick(
    state: &mut GameState,
    predictor: &mut DifficultyPredictor,
    input: &TickInput,
    dt: f64,
) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if !state.is_running() {
        return events;
    }

    state.clock += dt;
    if let Some(ms) = input.now_ms
        && ms.is_finite()
    {
        state.wall_clock_ms = ms;
    }

    // Move entities, drop the ones that left the field
    for entity in &mut state.entities {
        entity.advance(dt);
    }
    state.entities.retain(|e| {
        if e.is_offscreen() {
            events.push(GameEvent::Despawned { id: e.id });
            false
        } else {
            true
        }
    });

    for contact in &input.contacts {
        apply_contact(state, predictor, *contact, &mut events);
        if !state.is_running() {
            return events;
        }
    }

    if state.clock - state.last_orb_spawn > state.tuning.orb_spawn_interval_secs {
        state.last_orb_spawn = state.clock;
        events.push(spawn(state, EntityKind::Orb));
    }
    if state.clock - state.last_hazard_spawn > state.tuning.hazard_spawn_interval_secs {
        state.last_hazard_spawn = state.clock;
        events.push(spawn(state, EntityKind::Hazard));
    }

    // Fail-safe for a player that escaped the physics floor
    if let Some(pos) = input.player_pos
        && pos.y < state.tuning.fall_threshold_y
    {
        handle_hazard_hit(state, &mut events);
    }

    events
}

/// Apply one contact; contacts naming an entity that is already gone are ignored
pub fn apply_contact(
    state: &mut GameState,
    predictor: &mut DifficultyPredictor,
    contact: Contact,
    events: &mut Vec<GameEvent>,
) {
    if !state.is_running() {
        return;
    }
    match contact {
        Contact::Orb(id) => {
            if state.take_entity(id, EntityKind::Orb) {
                handle_orb_collected(state, predictor, events);
            }
        }
        Contact::Hazard(id) => {
            if state.take_entity(id, EntityKind::Hazard) {
                handle_hazard_hit(state, events);
            }
        }
    }
}

/// Score the orb and re-derive the live difficulty
pub fn handle_orb_collected(
    state: &mut GameState,
    predictor: &mut DifficultyPredictor,
    events: &mut Vec<GameEvent>,
) {
    if !state.is_running() {
        return;
    }
    state.score += state.tuning.points_per_orb;
    state.total_orbs_collected += 1;
    events.push(GameEvent::OrbCollected { score: state.score });

    let snapshot = state.snapshot();
    let next = match state.tuning.difficulty_mode {
        DifficultyMode::RuleBased => DifficultyPredictor::predict_difficulty(&snapshot),
        DifficultyMode::Hybrid => predictor.predict_hybrid(&snapshot),
    };

    let previous = state.current_difficulty();
    state.set_current_difficulty(next);
    if state.current_difficulty() != previous {
        log::debug!(
            "Difficulty {:.2} -> {:.2} (score {})",
            previous,
            state.current_difficulty(),
            state.score
        );
        events.push(GameEvent::DifficultyChanged {
            from: previous,
            to: state.current_difficulty(),
        });
    }
}

/// Lose a life; ending the session when none remain
pub fn handle_hazard_hit(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if !state.is_running() {
        return;
    }
    state.lives = state.lives.saturating_sub(1);
    state.total_hazard_hits += 1;
    events.push(GameEvent::HazardHit { lives: state.lives });

    if state.lives == 0 {
        state.phase = GamePhase::Ended;
        state.entities.clear();
        let summary = state.summary();
        log::info!(
            "Session ended: score {} after {:.1}s",
            summary.final_score,
            summary.elapsed_secs
        );
        events.push(GameEvent::SessionEnded(summary));
    }
}

/// Spawn an orb or hazard at the right edge, scaled by the live difficulty
fn spawn(state: &mut GameState, kind: EntityKind) -> GameEvent {
    let speed = state.current_difficulty().max(MIN_DIFFICULTY);
    let tuning = &state.tuning;
    let (entry, base_travel) = match kind {
        EntityKind::Orb => {
            let (lo, hi) = (tuning.orb_height_min, tuning.orb_height_max);
            let x = tuning.field_width + ORB_ENTRY_MARGIN;
            let travel = tuning.orb_travel_secs;
            // A degenerate band pins orbs to its lower edge
            let y = if lo < hi {
                state.rng_state.rng.random_range(lo..=hi)
            } else {
                lo
            };
            (Vec2::new(x, y), travel)
        }
        EntityKind::Hazard => (
            Vec2::new(
                tuning.field_width + HAZARD_ENTRY_MARGIN,
                tuning.hazard_lane_y,
            ),
            tuning.hazard_travel_secs,
        ),
    };

    let id = state.next_entity_id();
    let entity = Entity::new(id, kind, entry, speed, base_travel / speed);
    log::debug!(
        "Spawned {:?} #{} (speed {:.2}, crossing {:.2}s)",
        kind,
        id,
        speed,
        entity.travel_secs
    );
    state.entities.push(entity.clone());
    GameEvent::Spawned(entity)
}
