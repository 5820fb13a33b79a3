//! Headless motion driver: spawn one unit, give it an order and trace it
//! tic by tic.
//!
//! ```bash
//! cargo run -- --unit frigate --x 400 --y -120 --tics 300 --every 10
//! RUST_LOG=debug cargo run -- --unit probe --levitate --rotate-only --x -50 --y 0
//! cargo run -- --realtime --every 35
//! ```

use std::path::PathBuf;
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};
use std::time::Duration;

use anyhow::{Context, bail};
use clap::Parser;
use glam::Vec2;
use hecs::Entity;
use serde::Serialize;
use tracing::info;

use motion_rs::{
    defs::UnitTable,
    logging,
    motion::{Body, MotionEvent, MotionManager, Pose, PointActivity},
    sim::{SIM_FPS, TicRunner},
};

#[derive(Parser, Debug)]
#[command(name = "motion_demo", about = "Trace one unit through a motion command")]
struct Args {
    /// Extra unit types (TOML, `[[unit]]` entries) merged over the built-ins.
    #[arg(long)]
    units: Option<PathBuf>,

    /// Unit type to spawn.
    #[arg(long, default_value = "fighter")]
    unit: String,

    #[arg(long, default_value_t = 400.0, allow_hyphen_values = true)]
    x: f32,

    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    y: f32,

    /// Initial facing in degrees, 0 = east, 90 = south.
    #[arg(long, default_value_t = 90.0, allow_hyphen_values = true)]
    facing: f32,

    /// Tics to simulate.
    #[arg(long, default_value_t = SIM_FPS * 10)]
    tics: u32,

    /// Issue `stop` at this tic.
    #[arg(long)]
    stop_at: Option<u32>,

    /// Turn to face the target instead of travelling to it.
    #[arg(long)]
    rotate_only: bool,

    /// Float while the order runs.
    #[arg(long)]
    levitate: bool,

    /// Queue registered effects by name after the command (repeatable).
    #[arg(long = "effect")]
    effects: Vec<String>,

    /// Print every n-th tic.
    #[arg(long, default_value_t = 5)]
    every: u32,

    /// One JSON object per printed tic instead of a table.
    #[arg(long)]
    json: bool,

    /// Pace tics against the wall clock instead of running flat out.
    #[arg(long)]
    realtime: bool,
}

#[derive(Serialize)]
struct Snapshot<'a> {
    tic: u64,
    position: Vec2,
    velocity: f32,
    angle_code: u16,
    frame: u32,
    anchor_y: f32,
    pose: Pose,
    queue: Vec<&'a str>,
}

impl<'a> Snapshot<'a> {
    fn capture(tic: u64, body: &Body, motion: &'a MotionManager) -> Self {
        Self {
            tic,
            position: body.position,
            velocity: motion.state().movement.velocity,
            angle_code: motion.current_angle_code(),
            frame: body.frame,
            anchor_y: body.anchor.y,
            pose: motion.pose(),
            queue: motion.queue().names(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    logging::init();
    let args = Args::parse();

    // ─────────── unit types ───────────
    let mut table = UnitTable::builtin().context("built-in unit table")?;
    if let Some(path) = &args.units {
        let extra = UnitTable::from_file(path)
            .with_context(|| format!("loading unit table {}", path.display()))?;
        info!(path = %path.display(), units = extra.len(), "unit table loaded");
        table.merge(extra);
    }
    let Some(info) = table.get(&args.unit) else {
        let known: Vec<&str> = table.iter().map(|u| u.id()).collect();
        bail!("unknown unit `{}` (known: {})", args.unit, known.join(", "));
    };

    // ─────────── spawn & order ────────
    let mut sim = TicRunner::new();
    let unit = sim.spawn_unit(info, Vec2::ZERO, args.facing.to_radians());

    let arrivals = Arc::new(AtomicU64::new(0));
    let headed = Arc::new(AtomicU64::new(0));
    {
        let arrivals = arrivals.clone();
        let headed = headed.clone();
        let world = sim.world();
        let mut motion = world
            .get::<&mut MotionManager>(unit)
            .context("spawned unit has no motion manager")?;
        // listener ids are not kept: the unit lives as long as the run
        motion.on(MotionEvent::Arrive, move |_| {
            arrivals.fetch_add(1, Ordering::SeqCst);
        });
        motion.once(MotionEvent::Headed, move |_| {
            headed.fetch_add(1, Ordering::SeqCst);
        });
    }

    let order = PointActivity::new(Vec2::new(args.x, args.y));
    if args.rotate_only {
        sim.rotate_to_target(unit, Box::new(order.clone()))?;
    } else {
        sim.move_to(unit, Box::new(order.clone()))?;
    }
    // after the command: a new command drops the float until it is done
    if args.levitate {
        sim.levitate(unit)?;
    }
    if !args.effects.is_empty() {
        let world = sim.world();
        let mut motion = world
            .get::<&mut MotionManager>(unit)
            .context("spawned unit has no motion manager")?;
        for name in &args.effects {
            motion.add_effect_by_name(name)?;
        }
    }

    // ─────────── run ──────────────────
    if !args.json {
        println!(
            "{:>5} {:>9} {:>9} {:>8} {:>4} {:>5} {:>6}  queue",
            "tic", "x", "y", "v", "code", "frame", "pose"
        );
    }
    let every = u64::from(args.every.max(1));
    let mut stopped = false;
    let mut printed = 0;
    while sim.tic() < u64::from(args.tics) {
        if !stopped && args.stop_at.is_some_and(|t| sim.tic() >= u64::from(t)) {
            sim.stop(unit)?;
            stopped = true;
        }

        if args.realtime {
            if sim.pump() == 0 {
                std::thread::sleep(Duration::from_millis(2));
                continue;
            }
        } else {
            sim.tick();
        }

        // pump may run several tics at once
        if sim.tic() / every > printed {
            printed = sim.tic() / every;
            report(&sim, unit, args.json)?;
        }
    }

    info!(
        tics = sim.tic(),
        arrivals = arrivals.load(Ordering::SeqCst),
        headed = headed.load(Ordering::SeqCst),
        order_done = order.is_killed(),
        "run finished"
    );
    Ok(())
}

fn report(sim: &TicRunner, unit: Entity, json: bool) -> anyhow::Result<()> {
    let world = sim.world();
    let body = *world.get::<&Body>(unit).context("unit lost its body")?;
    let motion = world
        .get::<&MotionManager>(unit)
        .context("unit lost its motion manager")?;
    let snap = Snapshot::capture(sim.tic(), &body, &motion);
    if json {
        println!("{}", serde_json::to_string(&snap)?);
    } else {
        println!(
            "{:>5} {:>9.2} {:>9.2} {:>8.2} {:>4} {:>5} {:>6}  {}",
            snap.tic,
            snap.position.x,
            snap.position.y,
            snap.velocity,
            snap.angle_code,
            snap.frame,
            format!("{:?}", snap.pose),
            snap.queue.join(",")
        );
    }
    Ok(())
}
