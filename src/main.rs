use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, warn, Level};

use daedalus::config::SimConfig;
use daedalus::io::csv::{write_trajectory_file, Sample};
use daedalus::physics::ForceLaw;
use daedalus::render::FrameLog;
use daedalus::sim::{self, diagnostics, OrbitTracker, Simulation};

/// Headless star-and-planets gravity simulation (fixed-step RK4)
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Scenario file (TOML); defaults to the built-in Sun + Mercury setup
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// Number of frames to simulate
    #[arg(short = 'n', long, default_value_t = 1000)]
    frames: u64,

    /// Timestep per frame in seconds (overrides config)
    #[arg(long, allow_hyphen_values = true)]
    dt: Option<f64>,

    /// Force law: newtonian or unnormalized (overrides config)
    #[arg(long, value_name = "LAW")]
    force_law: Option<ForceLaw>,

    /// Write every body's trajectory to this CSV file
    #[arg(long, value_name = "PATH")]
    csv: Option<String>,

    /// Print a trajectory row every N frames
    #[arg(long, default_value_t = 100, value_name = "N")]
    report_every: u64,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    dump_config: bool,

    /// Log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

struct Row {
    frame: u64,
    time: f64,
    body: String,
    x: f64,
    y: f64,
    speed: f64,
    radius: f64,
}

fn load_config(args: &Args) -> Result<SimConfig> {
    let mut config = match &args.config {
        Some(path) => SimConfig::load(path)
            .with_context(|| format!("failed to load scenario from {path}"))?,
        None => SimConfig::default(),
    };
    if let Some(dt) = args.dt {
        config.physics.dt = dt;
    }
    if let Some(law) = args.force_law {
        config.physics.force_law = law;
    }
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(&args)?;
    if args.dump_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let mut sim = config.build().context("invalid scenario")?;
    let center = sim.anchor().unwrap_or(0);
    let g = sim.gravity.g;
    let guard = sim.gravity.min_distance_sq;
    let energy_start = diagnostics::total_energy(sim.bodies(), g, guard);
    let momentum_start = diagnostics::angular_momentum(sim.bodies());

    print_header(&config, &sim);

    let peak = diagnostics::peak_acceleration(&sim.gravity, sim.bodies(), sim.time());
    let moving = sim.bodies().iter().any(|b| !b.is_fixed());
    if moving && peak < diagnostics::NEGLIGIBLE_ACCELERATION {
        warn!(peak, law = %sim.gravity.law, "gravity too weak to bend any orbit");
        println!("  Note: peak acceleration is {peak:.3e} px/s^2 under the {} law;", sim.gravity.law);
        println!("        bodies will move in straight lines. Try --force-law unnormalized");
        println!("        or set physics.gravitational_constant in the scenario.");
        println!();
    }

    // -----------------------------------------------------------------------
    // Run simulation
    // -----------------------------------------------------------------------
    let every = args.report_every.max(1);
    let mut tracker = OrbitTracker::new(sim.bodies(), center);
    let mut samples = Vec::new();
    let mut rows = Vec::new();
    let mut diverged = None;

    if args.csv.is_some() {
        samples.extend(Sample::snapshot(0, 0.0, sim.bodies()));
    }

    let mut log = FrameLog::default();
    let frames = sim::run(&mut sim, &mut log, Some(args.frames), |s: &Simulation| {
        let bodies = s.bodies();
        tracker.observe(bodies);
        if args.csv.is_some() {
            samples.extend(Sample::snapshot(s.frame(), s.time(), bodies));
        }
        if s.frame() % every == 0 || s.frame() == args.frames {
            for (i, b) in bodies.iter().enumerate() {
                if i == center {
                    continue;
                }
                rows.push(Row {
                    frame: s.frame(),
                    time: s.time(),
                    body: b.name().to_string(),
                    x: b.pos().x,
                    y: b.pos().y,
                    speed: b.vel().norm(),
                    radius: diagnostics::separation(b, &bodies[center]),
                });
            }
        }
        if let Some(b) = bodies.iter().find(|b| !b.state().is_finite()) {
            diverged = Some((b.name().to_string(), s.frame()));
            return true;
        }
        false
    });
    info!(frames, time = sim.time(), "run finished");

    if let Some((name, frame)) = diverged {
        bail!("state of '{name}' became non-finite at frame {frame}");
    }

    if let Some(path) = &args.csv {
        write_trajectory_file(path, &samples)
            .with_context(|| format!("failed to write trajectory to {path}"))?;
        info!(path = %path, rows = samples.len(), "trajectory written");
    }

    // -----------------------------------------------------------------------
    // Print results
    // -----------------------------------------------------------------------
    print_trajectory(&rows);

    println!("  Orbits around {}", sim.bodies()[center].name());
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  {:>10}  {:>10}  {:>10}  {:>10}  {:>8}",
        "body", "r0 (px)", "min (px)", "max (px)", "drift"
    );
    for orbit in tracker.summaries() {
        println!(
            "  {:>10}  {:>10.2}  {:>10.2}  {:>10.2}  {:>7.3}%",
            orbit.body,
            orbit.initial_radius,
            orbit.min_radius,
            orbit.max_radius,
            orbit.drift() * 100.0
        );
    }
    println!();

    if sim.gravity.law == ForceLaw::Newtonian {
        let energy_end = diagnostics::total_energy(sim.bodies(), g, guard);
        let momentum_end = diagnostics::angular_momentum(sim.bodies());
        println!("  Conservation");
        println!("  ──────────────────────────────────────────────────────────────────");
        println!("  Energy:          {:>14.6e} -> {:>14.6e}  ({})", energy_start, energy_end, relative(energy_start, energy_end));
        println!("  Ang. momentum:   {:>14.6e} -> {:>14.6e}  ({})", momentum_start, momentum_end, relative(momentum_start, momentum_end));
        println!();
    }

    println!(
        "  Simulation: {} frames, dt={} s, t={:.1} s, {} steps/frame",
        frames,
        sim.dt,
        sim.time(),
        sim.steps_per_frame
    );
    println!("====================================================================");
    println!();

    Ok(())
}

fn print_header(config: &SimConfig, sim: &Simulation) {
    println!();
    println!("====================================================================");
    println!("  GRAVITY SIMULATION: {}", config.window.title);
    println!("====================================================================");
    println!();
    println!("  Setup");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Window:        {:>6} x {:<6}    G:   {:.4e} px^3/(kg s^2)",
        config.window.width, config.window.height, sim.gravity.g
    );
    println!(
        "  Force law:     {:>15}    dt:  {} s x {} steps/frame",
        sim.gravity.law, sim.dt, sim.steps_per_frame
    );
    println!();
    println!(
        "  {:>10}  {:>12}  {:>9}  {:>9}  {:>8}  {:>8}  {:>5}",
        "body", "mass (kg)", "x (px)", "y (px)", "vx", "vy", "fixed"
    );
    println!("  {}", "─".repeat(72));
    for b in sim.bodies() {
        println!(
            "  {:>10}  {:>12.4e}  {:>9.2}  {:>9.2}  {:>8.3}  {:>8.3}  {:>5}",
            b.name(),
            b.mass(),
            b.pos().x,
            b.pos().y,
            b.vel().x,
            b.vel().y,
            if b.is_fixed() { "yes" } else { "" }
        );
    }
    println!();
}

fn print_trajectory(rows: &[Row]) {
    println!("  Trajectory");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  {:>7}  {:>9}  {:>10}  {:>9}  {:>9}  {:>8}  {:>9}",
        "frame", "t (s)", "body", "x (px)", "y (px)", "|v|", "r (px)"
    );
    println!("  {}", "─".repeat(72));
    for r in rows {
        println!(
            "  {:>7}  {:>9.1}  {:>10}  {:>9.2}  {:>9.2}  {:>8.3}  {:>9.2}",
            r.frame, r.time, r.body, r.x, r.y, r.speed, r.radius
        );
    }
    println!();
}

fn relative(start: f64, end: f64) -> String {
    if start == 0.0 {
        return "n/a".into();
    }
    format!("{:+.3e} rel", (end - start) / start.abs())
}
