use std::error::Error;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use loam::{AppConfig, Chunk, ChunkManager, ChunkSink, ConfigError, SlotId, TickReport, Vec3};
use simplelog::{
    ColorChoice, CombinedLogger, Config, LevelFilter, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

mod watch;

const DEFAULT_CONFIG: &str = "loam.toml";

/// Headless chunk streaming driver: walks a player along +X and streams
/// terrain around it.
#[derive(Parser, Debug)]
#[command(name = "loam", version, about)]
struct Args {
    /// TOML config file (defaults to ./loam.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of ticks to run
    #[arg(long, default_value_t = 600)]
    ticks: u64,
    /// Milliseconds to sleep between ticks
    #[arg(long, default_value_t = 16)]
    tick_ms: u64,
    /// Override stream.worker_threads
    #[arg(long)]
    threads: Option<usize>,
    /// Override stream.grid_radius
    #[arg(long)]
    radius: Option<usize>,
    /// Override stream.max_launches_per_tick
    #[arg(long)]
    budget: Option<usize>,
    /// Override world.seed
    #[arg(long)]
    seed: Option<i32>,
    /// Player movement along +X per tick, in blocks
    #[arg(long, default_value_t = 0.5)]
    speed: f32,
    /// Reload the config file when it changes
    #[arg(long)]
    watch: bool,
    /// Also write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Print the effective config as TOML and exit
    #[arg(long)]
    print_config: bool,
    /// -v for debug, -vv for trace
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Default)]
struct LogSink {
    placed: usize,
    recycled: usize,
    quads: usize,
}

impl ChunkSink for LogSink {
    fn chunk_placed(&mut self, slot: SlotId, chunk: &Chunk) {
        self.placed += 1;
        self.quads += chunk.mesh.quad_count();
        log::debug!(
            target: "stream",
            "placed {} in slot {} (gen {}, {} quads)",
            chunk.coord,
            slot.0,
            chunk.generation,
            chunk.mesh.quad_count()
        );
    }

    fn chunk_recycled(&mut self, slot: SlotId, chunk: &Chunk) {
        self.recycled += 1;
        log::debug!(target: "stream", "recycled {} from slot {}", chunk.coord, slot.0);
    }
}

fn init_logging(args: &Args) -> Result<(), Box<dyn Error>> {
    let level = match args.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let Some(path) = &args.log_file {
        loggers.push(WriteLogger::new(level, Config::default(), File::create(path)?));
    }
    CombinedLogger::init(loggers)?;
    Ok(())
}

fn load_config(path: Option<&Path>, args: &Args) -> Result<AppConfig, ConfigError> {
    let mut cfg = match path {
        Some(p) => AppConfig::load(p)?,
        None => AppConfig::default(),
    };
    if let Some(t) = args.threads {
        cfg.stream.worker_threads = t;
    }
    if let Some(r) = args.radius {
        cfg.stream.grid_radius = r;
    }
    if let Some(b) = args.budget {
        cfg.stream.max_launches_per_tick = b;
    }
    if let Some(s) = args.seed {
        cfg.world.seed = s;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let config_path = args.config.clone().or_else(|| {
        let p = PathBuf::from(DEFAULT_CONFIG);
        p.exists().then_some(p)
    });
    let mut cfg = load_config(config_path.as_deref(), &args)?;
    if args.print_config {
        print!("{}", cfg.to_toml_string()?);
        return Ok(());
    }
    match &config_path {
        Some(p) => log::info!("config: {}", p.display()),
        None => log::info!("config: built-in defaults"),
    }

    let watcher = match (&config_path, args.watch) {
        (Some(p), true) => Some(watch::watch_file(p)?),
        (None, true) => {
            log::warn!("--watch given without a config file; ignoring");
            None
        }
        _ => None,
    };

    let mut manager = ChunkManager::new(cfg.stream.clone(), cfg.world_params());
    let mut player = Vec3::new(0.5, 0.0, 0.5);
    let mut sink = LogSink::default();
    manager.start(player, &mut sink)?;

    let mut totals = TickReport::default();
    let tick_dt = Duration::from_millis(args.tick_ms);
    let started = Instant::now();
    for t in 0..args.ticks {
        if let (Some((_, rx)), Some(path)) = (&watcher, &config_path) {
            if rx.try_iter().count() > 0 {
                match load_config(Some(path), &args) {
                    Ok(next) => {
                        if next.stream != cfg.stream || next.world_params() != cfg.world_params() {
                            manager.reconfigure(
                                next.stream.clone(),
                                next.world_params(),
                                player,
                                &mut sink,
                            )?;
                            cfg = next;
                        }
                    }
                    Err(e) => log::warn!("config reload rejected: {e}"),
                }
            }
        }

        player.x += args.speed;
        let r = manager.tick(player, &mut sink);
        totals.evicted += r.evicted;
        totals.ordered += r.ordered;
        totals.placed += r.placed;
        totals.failed += r.failed;
        if t % 60 == 0 {
            let s = manager.stats();
            log::info!(
                target: "stream",
                "tick {t}: center {}, active {}, pending {}, backlog {}, in flight {}",
                manager.center(),
                s.active,
                s.pending,
                s.backlog,
                s.pool.in_flight
            );
        }
        if !tick_dt.is_zero() {
            thread::sleep(tick_dt);
        }
    }

    let joined = manager.shutdown();
    log::info!(
        "{} ticks in {:.2?}: placed {}, evicted {}, ordered {}, failed {}, {} quads, {} joined",
        args.ticks,
        started.elapsed(),
        totals.placed,
        totals.evicted,
        totals.ordered,
        totals.failed,
        sink.quads,
        joined
    );
    log::debug!("sink saw {} placements, {} recycles", sink.placed, sink.recycled);
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(e) = init_logging(&args) {
        eprintln!("failed to initialise logging: {e}");
        return ExitCode::FAILURE;
    }
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
