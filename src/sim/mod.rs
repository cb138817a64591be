//! Deterministic session simulation
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod state;
pub mod tick;

pub use state::{
    DESPAWN_X, Entity, EntityKind, GameEvent, GamePhase, GameState, HAZARD_ENTRY_MARGIN, Hud,
    ORB_ENTRY_MARGIN, RngState, SessionSummary,
};
pub use tick::{
    Contact, TickInput, apply_contact, handle_hazard_hit, handle_orb_collected, start_session,
    tick,
};
