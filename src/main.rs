//! Color Garage - headless runner
//!
//! Drives the simulator at a fixed 60 Hz, either under the autopilot or from
//! key names read on stdin, and keeps the leaderboard between runs.

use std::io::BufRead;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use color_garage::audio::{AudioManager, LogSink};
use color_garage::consts::SIM_DT;
use color_garage::persistence;
use color_garage::platform::{FixedStep, InputLatch, Key};
use color_garage::renderer::build_frame;
use color_garage::sim::{GameEvent, RoundState};
use color_garage::{DifficultyPreset, HighScores, Settings, Tuning};

#[derive(Debug)]
struct Args {
    seed: Option<u64>,
    ticks: u64,
    tuning: Option<PathBuf>,
    difficulty: Option<DifficultyPreset>,
    manual: bool,
    dump_frame: bool,
    no_save: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            seed: None,
            // One minute of play
            ticks: 3600,
            tuning: None,
            difficulty: None,
            manual: false,
            dump_frame: false,
            no_save: false,
        }
    }
}

fn usage() -> &'static str {
    "usage: color-garage [--seed N] [--ticks N] [--tuning PATH] \
     [--difficulty steady|ramping] [--manual] [--dump-frame] [--no-save]"
}

fn parse_args() -> Result<Args> {
    let mut args = Args::default();
    let mut it = std::env::args().skip(1);

    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--seed" => {
                let value = it.next().context("--seed needs a value")?;
                args.seed = Some(value.parse().context("invalid --seed")?);
            }
            "--ticks" => {
                let value = it.next().context("--ticks needs a value")?;
                args.ticks = value.parse().context("invalid --ticks")?;
            }
            "--tuning" => {
                args.tuning = Some(it.next().context("--tuning needs a path")?.into());
            }
            "--difficulty" => {
                let value = it.next().context("--difficulty needs a value")?;
                args.difficulty = Some(value.parse()?);
            }
            "--manual" => args.manual = true,
            "--dump-frame" => args.dump_frame = true,
            "--no-save" => args.no_save = true,
            "-h" | "--help" => {
                println!("{}", usage());
                std::process::exit(0);
            }
            other => bail!("unknown argument '{}'\n{}", other, usage()),
        }
    }

    Ok(args)
}

/// Apply one stdin line of key names (and `tap:<y>`) to the latch
fn apply_line(line: &str, latch: &mut InputLatch, tuning: &Tuning) {
    for word in line.split_whitespace() {
        if let Some(y) = word.strip_prefix("tap:") {
            match y.parse::<f32>() {
                Ok(y) => latch.pointer_tap(y, tuning),
                Err(_) => log::warn!("Bad tap position '{}'", y),
            }
            continue;
        }
        match Key::from_name(word) {
            Some(key) => {
                latch.key_down(key);
                latch.key_up(key);
            }
            None => log::warn!("Unknown key '{}'", word),
        }
    }
}

struct Session {
    state: RoundState,
    latch: InputLatch,
    clock: FixedStep,
    audio: AudioManager<LogSink>,
    high_scores: HighScores,
    rounds: u32,
}

impl Session {
    /// Run one frame of wall time and return the number of ticks simulated
    fn frame(&mut self) -> u32 {
        let steps = self.clock.advance(SIM_DT);
        for _ in 0..steps {
            let input = self.latch.take();
            let events = color_garage::sim::tick(&mut self.state, &input);
            self.audio.handle_events(&events);
            for event in &events {
                self.record(event);
            }
        }
        steps
    }

    fn record(&mut self, event: &GameEvent) {
        match event {
            GameEvent::Mismatch { .. } => {
                self.rounds += 1;
                self.high_scores.record_event(
                    event,
                    self.state.seed(),
                    persistence::unix_time_secs(),
                );
            }
            GameEvent::NewHighScore { score } => {
                log::info!("New high score: {}", score);
            }
            _ => {}
        }
    }

    /// Enter the round still in play before the leaderboard is saved
    fn finish(&mut self) {
        self.high_scores
            .record_unfinished(&self.state, persistence::unix_time_secs());
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Color Garage (headless) starting...");

    let args = parse_args()?;

    let settings_path = Settings::default_path().ok();
    let scores_path = HighScores::default_path().ok();
    if settings_path.is_none() || scores_path.is_none() {
        log::warn!("No data directory available, nothing will be persisted");
    }

    let settings = settings_path
        .as_deref()
        .map(Settings::load)
        .unwrap_or_default();
    // A --difficulty flag applies to this run only and is not saved
    let active = settings.for_run(args.difficulty);
    let high_scores = scores_path
        .as_deref()
        .map(HighScores::load)
        .unwrap_or_default();
    if high_scores.is_empty() {
        log::info!("Leaderboard is empty");
    }

    let mut tuning = match &args.tuning {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };
    active.apply_to(&mut tuning);

    let seed = args.seed.unwrap_or_else(rand::random);
    let state = RoundState::new(tuning, seed, high_scores.top_score())
        .context("invalid tuning")?;
    log::info!(
        "Seed {} | {} lanes | difficulty {}",
        seed,
        state.tuning().lane_count,
        active.difficulty.as_str()
    );

    let mut session = Session {
        state,
        latch: InputLatch::new(),
        clock: FixedStep::default(),
        audio: AudioManager::from_settings(LogSink, &active),
        high_scores,
        rounds: 0,
    };

    if args.manual {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let line = line.context("reading stdin")?;
            apply_line(&line, &mut session.latch, session.state.tuning());
            session.frame();
        }
    } else {
        session.latch.key_down(Key::Idle);
        let mut ticks = 0;
        while ticks < args.ticks {
            ticks += u64::from(session.frame());
        }
    }

    session.finish();
    log::info!(
        "Finished after {} ticks: score {}, best {}, {} rounds lost",
        session.state.time_ticks(),
        session.state.score(),
        session.state.high_score(),
        session.rounds
    );

    if args.dump_frame {
        let frame = build_frame(&session.state, &active);
        println!("{}", serde_json::to_string_pretty(&frame)?);
    }

    if !args.no_save {
        if let Some(path) = &scores_path {
            session.high_scores.save(path)?;
        }
        if let Some(path) = &settings_path {
            settings.save(path)?;
        }
    }

    Ok(())
}
