//! Dino Cretaceous entry point
//!
//! Native build runs a headless session with an autopilot standing in for the
//! scene runtime: it reports contacts as orbs and hazards reach the player.
//!
//! Usage: `dino-cretaceous [seed] [base-difficulty 1-3] [scores.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::collections::HashSet;
    use std::path::PathBuf;

    use dino_cretaceous::consts::SIM_DT;
    use dino_cretaceous::sim::{Contact, EntityKind, GameEvent, GamePhase};
    use dino_cretaceous::{Game, Settings, Tuning};
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    /// Player's fixed x on the field
    const PLAYER_X: f32 = 150.0;
    /// Half-width of the contact window around the player
    const REACH: f32 = 25.0;
    /// Give up after this many simulated seconds
    const MAX_SECS: f64 = 600.0;

    env_logger::init();
    log::info!("Dino Cretaceous (native) starting...");

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(rand::random);

    let mut settings = Settings::default();
    if let Some(step) = args.next().and_then(|s| s.parse().ok())
        && let Err(e) = settings.set_base_difficulty(step)
    {
        log::warn!("{e}; keeping {}", settings.base_difficulty());
    }
    let scores_path = args.next().map(PathBuf::from);

    let mut game = match Game::new(seed, Tuning::default(), settings) {
        Ok(game) => game,
        Err(e) => {
            log::error!("Invalid tuning: {e}");
            std::process::exit(1);
        }
    };
    if let Some(path) = &scores_path {
        game.high_scores = dino_cretaceous::HighScores::load_from(path);
        game = game.with_scores_path(path);
    }
    log::info!("Game initialized with seed: {}", seed);

    let mut pilot = Pcg32::seed_from_u64(seed ^ 0x5eed);
    let mut decided: HashSet<u32> = HashSet::new();
    game.start();

    while game.state.phase == GamePhase::Running && game.state.elapsed() < MAX_SECS {
        let mut contacts = Vec::new();
        for entity in &game.state.entities {
            if (entity.pos.x - PLAYER_X).abs() > REACH || !decided.insert(entity.id) {
                continue;
            }
            match entity.kind {
                EntityKind::Orb => {
                    if pilot.random_bool(0.7) {
                        contacts.push(Contact::Orb(entity.id));
                    }
                }
                EntityKind::Hazard => {
                    // Faster hazards are harder to clear
                    let clear = (0.97 / entity.speed).clamp(0.0, 1.0);
                    if !pilot.random_bool(clear) {
                        contacts.push(Contact::Hazard(entity.id));
                    }
                }
            }
        }
        for contact in contacts {
            game.report_contact(contact);
        }

        for event in game.update(SIM_DT) {
            if let GameEvent::DifficultyChanged { from, to } = event {
                log::info!("Difficulty {:.2} -> {:.2}", from, to);
            }
        }
    }

    let hud = game.hud();
    println!(
        "Score: {}  Lives: {}  Diff: {}",
        hud.score, hud.lives, hud.difficulty
    );
    if let Some(summary) = game.last_summary() {
        println!("Game Over");
        println!("  Final Score:    {}", summary.final_score);
        println!("  Difficulty:     {}", summary.base_difficulty as u8);
        println!("  Orbs Collected: {}", summary.orbs_collected);
        println!("  Hazard Hits:    {}", summary.hazard_hits);
        println!("  Time Survived:  {} s", summary.elapsed_secs as u64);
    } else {
        println!("Session still running after {MAX_SECS} s");
    }

    println!("\nHigh Scores");
    if game.high_scores.is_empty() {
        println!("  No high scores yet. Play a game to create one!");
    }
    for (i, entry) in game.high_scores.entries.iter().enumerate() {
        println!(
            "  {:>2}. {:>6}  (difficulty {:.1})",
            i + 1,
            entry.score,
            entry.difficulty
        );
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The web shell drives `Game` directly; this is just to satisfy the compiler
}
