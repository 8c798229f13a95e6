//! Gorilla Toss entry point
//!
//! Plays matches in the terminal with a synthetic frame clock. Computer turns
//! run the aim search; human turns read `angle speed` from stdin.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use glam::Vec2;

use gorilla_toss::consts::SIM_FRAME_MS;
use gorilla_toss::sim::{Impact, Player, Session, TickResult};
use gorilla_toss::{PlayerCount, Settings, velocity_from_angle};

#[derive(Parser, Debug)]
#[command(name = "gorilla-toss", about = "Banana-throwing gorillas on a destructible skyline")]
struct Args {
    /// Settings file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Human players: 0 (computer vs computer), 1, or 2
    #[arg(long, value_parser = parse_players)]
    players: Option<PlayerCount>,
    /// RNG seed (defaults to the current time)
    #[arg(long)]
    seed: Option<u64>,
    /// Matches to play back to back
    #[arg(long, default_value_t = 1)]
    matches: u32,
    /// Give up on a match after this many throws
    #[arg(long, default_value_t = 200)]
    max_throws: u32,
    /// Honor the computer's thinking pauses
    #[arg(long)]
    pace: bool,
    /// Print the final snapshot of each match as JSON
    #[arg(long)]
    json: bool,
}

fn parse_players(s: &str) -> Result<PlayerCount, String> {
    PlayerCount::from_str(s).ok_or_else(|| format!("expected 0, 1, or 2, got '{s}'"))
}

/// Read one human throw as "angle speed"
fn read_throw(player: Player, input: &mut impl BufRead) -> Result<Vec2> {
    let mut line = String::new();
    loop {
        print!("Player {} angle speed> ", player.number());
        io::stdout().flush().context("flushing prompt")?;

        line.clear();
        if input.read_line(&mut line).context("reading throw")? == 0 {
            bail!("stdin closed");
        }
        match parse_throw(&line) {
            Ok((angle, speed)) => return Ok(velocity_from_angle(angle, speed, player.throw_direction())),
            Err(e) => println!("{e}"),
        }
    }
}

fn parse_throw(line: &str) -> Result<(f32, f32)> {
    let mut parts = line.split_whitespace();
    let angle: f32 = parts
        .next()
        .ok_or_else(|| anyhow!("missing angle"))?
        .parse()
        .context("angle must be a number")?;
    let speed: f32 = parts
        .next()
        .ok_or_else(|| anyhow!("missing speed"))?
        .parse()
        .context("speed must be a number")?;
    if !(0.0..=180.0).contains(&angle) || speed < 0.0 {
        bail!("angle must be 0-180 and speed non-negative");
    }
    Ok((angle, speed))
}

/// Play one match to completion; returns the winner if there was one
fn play_match(session: &mut Session, args: &Args, input: &mut impl BufRead) -> Result<Option<Player>> {
    let think = Duration::from_millis(session.settings.computer_think_ms as u64);
    let turn_delay = Duration::from_millis(session.settings.computer_turn_delay_ms as u64);

    for throw in 1..=args.max_throws {
        let player = session.state().current_player;
        if session.is_computer(player) {
            if args.pace {
                std::thread::sleep(turn_delay);
            }
            let decision = session
                .prepare_computer_throw()
                .ok_or_else(|| anyhow!("computer asked to aim outside the aiming phase"))?;
            let readout = session.state().readout(player);
            println!(
                "Player {} (computer) throws: angle {}, speed {} ({} trials)",
                player.number(),
                readout.angle,
                readout.velocity,
                decision.trials
            );
            if args.pace {
                std::thread::sleep(think);
            }
        } else {
            let velocity = read_throw(player, input)?;
            session.set_aim_velocity(velocity);
        }

        if !session.release_throw() {
            bail!("throw {throw} was not accepted");
        }

        let mut now = 0.0;
        loop {
            now += SIM_FRAME_MS as f64;
            match session.frame(now) {
                TickResult::Continue => {}
                TickResult::Idle => bail!("throw {throw} stopped without resolving"),
                TickResult::TurnEnded { impact, .. } => {
                    match (impact, session.state().blast_holes.last()) {
                        (Impact::Building { .. }, Some(hole)) => {
                            println!("  miss: building hit at ({:.0}, {:.0})", hole.pos.x, hole.pos.y)
                        }
                        _ => println!("  miss: out of bounds"),
                    }
                    break;
                }
                TickResult::MatchWon { winner } => {
                    println!("  HIT! Player {} wins in round {}", winner.number(), session.state().round);
                    return Ok(Some(winner));
                }
            }
        }
    }

    log::warn!("Match abandoned after {} throws", args.max_throws);
    Ok(None)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut settings = match &args.config {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };
    if let Some(players) = args.players {
        settings.players = players;
    }

    let seed = match args.seed {
        Some(seed) => seed,
        None => std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .context("system clock before 1970")?
            .as_millis() as u64,
    };
    log::info!("Gorilla Toss starting (seed {seed})");

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut session = Session::new(settings, seed);
    let mut wins = [0u32; 2];

    for n in 1..=args.matches {
        if n > 1 {
            session.request_new_match();
        }
        println!("=== Match {n} ===");
        if let Some(winner) = play_match(&mut session, &args, &mut input)? {
            wins[winner as usize] += 1;
        }
        if args.json {
            println!("{}", serde_json::to_string_pretty(&session.snapshot()).context("serializing snapshot")?);
        }
    }

    println!("Final score: Player 1 {} - {} Player 2", wins[0], wins[1]);
    Ok(())
}
