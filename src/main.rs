//! Flappy Creator headless runner
//!
//! Plays one session with a search-based autopilot and prints every event as a
//! JSON line, then the leaderboard.
//!
//! Usage: `flappy-creator [seed] [runs]`. Set `FLAPPY_TUNING` to a JSON file
//! to override the default balance and `RUST_LOG` for simulation logs.

use std::collections::{HashMap, VecDeque};

use flappy_creator::consts::FRAME_MS;
use flappy_creator::{
    GameEvent, GameId, InMemoryLeaderboard, LeaderboardRead, Medal, Session, SessionPhase,
    StepInput, Tuning, World, WorldConfig, advance,
};

/// Give up on a run after this many frames (~5 minutes at 60 Hz)
const MAX_FRAMES: u32 = 60 * 60 * 5;

/// Frames the autopilot looks ahead when it plans
const HORIZON: usize = 120;

/// Plan again once fewer than this many planned frames are left
const REPLAN_BELOW: usize = 40;

/// Prints events as they arrive
struct JsonLines;

impl flappy_creator::EventSink for JsonLines {
    fn on_event(&mut self, event: &GameEvent) {
        match serde_json::to_string(event) {
            Ok(line) => println!("{line}"),
            Err(e) => log::error!("Failed to encode event: {e}"),
        }
    }
}

/// Plays by searching over cloned worlds
///
/// Each plan is a breadth-first search over jump/no-jump choices for
/// [`HORIZON`] frames. Worlds whose bird shares a rounded height and speed
/// are merged, and a jump never follows a jump because the session needs a
/// release between presses. Some pipe layouts cannot be cleared at all, so
/// the bird still dies there.
#[derive(Default)]
struct Autopilot {
    plan: VecDeque<bool>,
}

impl Autopilot {
    fn wants_jump(&mut self, world: &World) -> bool {
        if self.plan.len() < REPLAN_BELOW {
            self.plan = plan(world);
        }
        self.plan.pop_front().unwrap_or(false)
    }
}

/// One explored step: index of the previous step and whether it jumped
struct Step {
    parent: usize,
    jump: bool,
}

fn plan(world: &World) -> VecDeque<bool> {
    let mut steps = vec![Step { parent: 0, jump: false }];
    let mut layer = HashMap::from([(bucket(world, false), (world.clone(), 0))]);

    for _ in 0..HORIZON {
        let mut next = HashMap::with_capacity(layer.len() * 2);
        for ((_, _, jumped), (world, step)) in &layer {
            let choices: &[bool] = if *jumped { &[false] } else { &[false, true] };
            for &jump in choices {
                let (after, _) = advance(world.clone(), FRAME_MS, &StepInput { jump });
                if after.is_over() {
                    continue;
                }
                next.entry(bucket(&after, jump)).or_insert_with(|| {
                    steps.push(Step { parent: *step, jump });
                    (after, steps.len() - 1)
                });
            }
        }
        if next.is_empty() {
            break;
        }
        layer = next;
    }

    let best = layer.values().min_by(|(a, _), (b, _)| {
        b.score
            .cmp(&a.score)
            .then(gap_error(a).total_cmp(&gap_error(b)))
    });
    let mut path = VecDeque::new();
    let mut step = best.map(|(_, step)| *step).unwrap_or(0);
    while step != 0 {
        path.push_front(steps[step].jump);
        step = steps[step].parent;
    }
    path
}

fn bucket(world: &World, jumped: bool) -> (i32, i32, bool) {
    let player = &world.player;
    (
        player.pos.y.round() as i32,
        (player.vel.y * 4.0).round() as i32,
        jumped,
    )
}

/// Vertical distance from the bird to the middle of the next opening
fn gap_error(world: &World) -> f32 {
    let player = &world.player;
    let target = world
        .pipes
        .iter()
        .filter(|pair| pair.right() >= player.left())
        .min_by(|a, b| a.right().total_cmp(&b.right()))
        .map(|pair| (pair.gap_top() + pair.gap_bottom()) / 2.0)
        .unwrap_or(world.height / 2.0);
    (player.pos.y - target).abs()
}

fn main() -> flappy_creator::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(rand::random);
    let runs = args
        .next()
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(1);

    let tuning = match std::env::var("FLAPPY_TUNING") {
        Ok(path) => Tuning::load(path)?,
        Err(_) => Tuning::default(),
    };

    let game_id = GameId::from("demo");
    let mut leaderboard = InMemoryLeaderboard::new();
    leaderboard.register_game(game_id.clone());

    let config = WorldConfig::new(400.0, 800.0, "bird.png");
    let mut session = Session::new(game_id.clone(), config, leaderboard)?
        .with_tuning(tuning)?
        .with_seed(seed);

    log::info!("Flappy Creator (native) starting, seed {seed}");

    for _ in 0..runs {
        session.restart()?;
        let mut autopilot = Autopilot::default();
        let mut frames = 0;
        while session.phase() == SessionPhase::Playing && frames < MAX_FRAMES {
            let jump = session
                .world()
                .map(|world| autopilot.wants_jump(world))
                .unwrap_or(false);
            if jump {
                session.press();
            } else {
                session.release();
            }
            session.frame(FRAME_MS, &mut JsonLines)?;
            frames += 1;
        }

        let score = session.score();
        match Medal::for_score(score) {
            Some(medal) => println!(
                "Run over: score {score} after {frames} frames ({} medal)",
                medal.as_str()
            ),
            None => println!("Run over: score {score} after {frames} frames"),
        }
        if session.pending_high_score().is_some() {
            session.submit_high_score("Autopilot")?;
        }
    }

    println!("\nLeaderboard:");
    for (rank, entry) in session
        .leaderboard()
        .top_scores(&game_id, 5)
        .iter()
        .enumerate()
    {
        println!("{:>2}. {:<12} {}", rank + 1, entry.player_name, entry.score);
    }
    Ok(())
}
