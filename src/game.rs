//! Game host
//!
//! Owns one session, the trained difficulty predictor (built once, reused for
//! every inference) and the score store. Runs the fixed-step accumulator and
//! hands the end-of-session summary to the store synchronously.

use glam::Vec2;

use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::difficulty::DifficultyPredictor;
use crate::highscores::HighScores;
use crate::platform;
use crate::settings::Settings;
use crate::sim::{Contact, GameEvent, GameState, Hud, SessionSummary, TickInput, start_session, tick};
use crate::tuning::{Tuning, TuningError};

/// Longest frame delta fed into the accumulator
pub const MAX_FRAME_DT: f64 = 0.1;

pub struct Game {
    pub state: GameState,
    predictor: DifficultyPredictor,
    pub settings: Settings,
    pub high_scores: HighScores,
    accumulator: f64,
    /// Scene input gathered since the last simulated step
    input: TickInput,
    last_summary: Option<SessionSummary>,
    last_rank: Option<usize>,
    #[cfg(not(target_arch = "wasm32"))]
    scores_path: Option<std::path::PathBuf>,
}

impl Game {
    /// New idle game; `seed` drives both spawn heights and predictor init
    pub fn new(seed: u64, tuning: Tuning, settings: Settings) -> Result<Self, TuningError> {
        Self::with_predictor(seed, tuning, settings, DifficultyPredictor::new(seed))
    }

    pub fn with_predictor(
        seed: u64,
        tuning: Tuning,
        settings: Settings,
        predictor: DifficultyPredictor,
    ) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self {
            state: GameState::new(seed, tuning),
            predictor,
            settings,
            high_scores: HighScores::new(),
            accumulator: 0.0,
            input: TickInput::default(),
            last_summary: None,
            last_rank: None,
            #[cfg(not(target_arch = "wasm32"))]
            scores_path: None,
        })
    }

    /// Persist high scores to this JSON file after every finished session
    #[cfg(not(target_arch = "wasm32"))]
    pub fn with_scores_path(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.scores_path = Some(path.into());
        self
    }

    pub fn predictor(&self) -> &DifficultyPredictor {
        &self.predictor
    }

    /// Start a new session at the base difficulty chosen in settings
    pub fn start(&mut self) -> GameEvent {
        self.state
            .set_base_difficulty(self.settings.base_difficulty_value());
        self.accumulator = 0.0;
        self.input = TickInput::default();
        self.last_summary = None;
        self.last_rank = None;
        start_session(&mut self.state)
    }

    /// Queue a contact reported by the scene runtime
    pub fn report_contact(&mut self, contact: Contact) {
        self.input.contacts.push(contact);
    }

    /// Latest player position sample from the scene runtime
    pub fn set_player_pos(&mut self, pos: Vec2) {
        self.input.player_pos = Some(pos);
    }

    /// Run as many fixed steps as `frame_dt` allows
    pub fn update(&mut self, frame_dt: f64) -> Vec<GameEvent> {
        let dt = if frame_dt.is_finite() {
            frame_dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        self.accumulator += dt;
        self.input.now_ms = Some(platform::now_ms());

        let mut events = Vec::new();
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let step = tick(&mut self.state, &mut self.predictor, &self.input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.contacts.clear();
            self.input.player_pos = None;
            self.input.now_ms = None;

            events.extend(step);
        }

        for event in &events {
            if let GameEvent::SessionEnded(summary) = event {
                self.finish_session(summary.clone());
            }
        }
        events
    }

    pub fn hud(&self) -> Hud {
        self.state.hud()
    }

    /// Summary of the most recently ended session
    pub fn last_summary(&self) -> Option<&SessionSummary> {
        self.last_summary.as_ref()
    }

    /// History rank of the most recently ended session (None for a zero score)
    pub fn last_rank(&self) -> Option<usize> {
        self.last_rank
    }

    fn finish_session(&mut self, summary: SessionSummary) {
        self.last_rank = self.high_scores.record(&summary);
        match self.last_rank {
            Some(rank) => log::info!("Score {} recorded at #{}", summary.final_score, rank),
            None => log::info!("Score {} not recorded", summary.final_score),
        }
        self.last_summary = Some(summary);
        if self.last_rank.is_some() {
            self.save_scores();
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn save_scores(&self) {
        self.high_scores.save();
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn save_scores(&self) {
        if let Some(path) = &self.scores_path
            && let Err(e) = self.high_scores.save_to(path)
        {
            log::warn!("Failed to save high scores: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{EntityKind, GamePhase};

    fn game(base_step: u8) -> Game {
        let mut settings = Settings::default();
        settings
            .set_base_difficulty(base_step)
            .expect("valid step");
        Game::new(4242, Tuning::default(), settings).expect("default tuning is valid")
    }

    fn first_spawn(events: &[GameEvent], kind: EntityKind) -> Option<u32> {
        events.iter().find_map(|e| match e {
            GameEvent::Spawned(ent) if ent.kind == kind => Some(ent.id),
            _ => None,
        })
    }

    fn fall(game: &mut Game) -> Vec<GameEvent> {
        game.set_player_pos(Vec2::new(150.0, -500.0));
        game.update(SIM_DT)
    }

    #[test]
    fn test_start_uses_settings_base() {
        let mut game = game(3);
        let event = game.start();
        assert_eq!(event, GameEvent::SessionStarted { base_difficulty: 3.0 });
        assert_eq!(game.state.current_difficulty(), 3.0);
        let hud = game.hud();
        assert_eq!((hud.score, hud.lives, hud.difficulty), (0, 3, 3));
    }

    #[test]
    fn test_accumulator_caps_substeps() {
        let mut game = game(1);
        game.start();
        game.update(5.0);
        // A long frame is clamped to MAX_FRAME_DT and then to MAX_SUBSTEPS
        let steps = (game.state.clock / SIM_DT).round() as u32;
        assert!(steps >= 5 && steps <= MAX_SUBSTEPS);
        assert!(game.state.clock <= MAX_FRAME_DT + 1e-9);
    }

    #[test]
    fn test_rejects_invalid_tuning() {
        let tuning = Tuning {
            orb_height_min: f32::NAN,
            ..Tuning::default()
        };
        assert!(matches!(
            Game::new(1, tuning, Settings::default()),
            Err(TuningError::NotFinite { field: "orb_height_min", .. })
        ));
    }

    #[test]
    fn test_non_finite_frame_dt_is_skipped() {
        let mut game = game(1);
        game.start();
        assert!(game.update(f64::NAN).is_empty());
        assert!(game.update(f64::INFINITY).is_empty());
        assert_eq!(game.state.clock, 0.0);

        // Accumulator still works afterwards
        game.update(SIM_DT * 2.0);
        assert!(game.state.clock > 0.0);
    }

    #[test]
    fn test_contact_waits_for_next_step() {
        let mut game = game(1);
        game.start();

        let mut events = Vec::new();
        while first_spawn(&events, EntityKind::Orb).is_none() {
            events.extend(game.update(SIM_DT));
        }
        let orb = first_spawn(&events, EntityKind::Orb).unwrap_or_default();

        game.report_contact(Contact::Orb(orb));
        // Less than a step: nothing simulated yet
        assert!(game.update(SIM_DT / 4.0).is_empty());
        assert_eq!(game.state.score, 0);

        let events = game.update(SIM_DT);
        assert!(events.contains(&GameEvent::OrbCollected { score: 10 }));
        // Same contact is not replayed
        game.update(SIM_DT);
        assert_eq!(game.state.score, 10);
    }

    #[test]
    fn test_full_session_reaches_score_store() {
        let mut game = game(2);
        game.start();

        let mut events = Vec::new();
        while first_spawn(&events, EntityKind::Orb).is_none() {
            events.extend(game.update(SIM_DT));
        }
        let orb = first_spawn(&events, EntityKind::Orb).unwrap_or_default();
        game.report_contact(Contact::Orb(orb));
        game.update(SIM_DT);

        fall(&mut game);
        fall(&mut game);
        assert_eq!(game.state.phase, GamePhase::Running);
        let events = fall(&mut game);
        assert_eq!(game.state.phase, GamePhase::Ended);
        assert!(events.iter().any(|e| matches!(e, GameEvent::SessionEnded(_))));

        let summary = game.last_summary().cloned().expect("summary recorded");
        assert_eq!(summary.final_score, 10);
        assert_eq!(summary.base_difficulty, 2.0);
        assert_eq!(summary.orbs_collected, 1);
        assert_eq!(summary.hazard_hits, 3);
        assert!(summary.timestamp_ms > 0.0);
        assert_eq!(game.last_rank(), Some(1));
        assert_eq!(game.high_scores.top_score(), Some(10));
        assert_eq!(game.high_scores.entries[0].difficulty, 2.0);
        assert_eq!(game.high_scores.entries[0].timestamp, summary.timestamp_ms);

        // Ended: further frames do nothing
        assert!(game.update(1.0).is_empty());
    }

    #[test]
    fn test_zero_score_session_not_stored() {
        let mut game = game(1);
        game.start();
        for _ in 0..3 {
            fall(&mut game);
        }
        assert_eq!(game.state.phase, GamePhase::Ended);
        assert_eq!(game.last_rank(), None);
        assert!(game.high_scores.is_empty());
    }

    #[test]
    fn test_restart_after_end() {
        let mut game = game(1);
        game.start();
        for _ in 0..3 {
            fall(&mut game);
        }
        game.start();
        assert_eq!(game.state.phase, GamePhase::Running);
        assert_eq!(game.state.lives, 3);
        assert!(game.last_summary().is_none());
    }

    #[test]
    fn test_store_failure_does_not_block() {
        let dir = std::env::temp_dir().join(format!("dino-game-store-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).expect("mkdir");
        let blocker = dir.join("blocker");
        std::fs::write(&blocker, "not a directory").expect("write");

        let mut game = game(1).with_scores_path(blocker.join("scores.json"));
        game.start();
        game.state.score = 30;
        for _ in 0..3 {
            fall(&mut game);
        }
        assert_eq!(game.state.phase, GamePhase::Ended);
        assert_eq!(game.high_scores.top_score(), Some(30));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_scores_saved_to_path() {
        let dir = std::env::temp_dir().join(format!("dino-game-save-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("scores.json");

        let mut game = game(1).with_scores_path(&path);
        game.start();
        game.state.score = 40;
        for _ in 0..3 {
            fall(&mut game);
        }
        let reloaded = HighScores::load_from(&path);
        assert_eq!(reloaded.top_score(), Some(40));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
