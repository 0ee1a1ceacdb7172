//! haptic - drive the haptic facade from the command line
//!
//! Runs every facade operation against a simulated (or absent) device and
//! prints what the device emitted.
//!
//! ## Environment Variables
//! - `HAPTIC_PARAMETER_POLICY`, `HAPTIC_STATE_POLICY`,
//!   `HAPTIC_MAX_CONTINUOUS_SECS`, `HAPTIC_PATTERN_DIR`: facade configuration
//! - `RUST_LOG`: log filter (default: `haptic=info`)

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use haptic_core::HapticPattern;
use haptic_device::{NullDevice, SimulatedDevice};
use haptic_facade::{
    FacadeConfig, Haptic, HapticComponent, HapticDevice, ImpactStyle, NotificationType, ParameterPolicy, Playback,
    StatePolicy,
};

#[derive(Parser)]
#[command(name = "haptic")]
#[command(author, version)]
#[command(about = "Haptic feedback facade driver", long_about = None)]
struct Cli {
    /// Device backing the facade
    #[arg(long, value_enum, default_value_t = DeviceKind::Simulated, env = "HAPTIC_DEVICE")]
    device: DeviceKind,

    /// Reject out-of-range parameters and out-of-state calls
    #[arg(long, default_value_t = false)]
    strict: bool,

    /// Print the simulated device feedback log as JSON lines
    #[arg(long, default_value_t = false)]
    log: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DeviceKind {
    Simulated,
    Null,
}

#[derive(Subcommand)]
enum Commands {
    /// Show device capabilities and facade configuration
    Info,

    /// Selection-change feedback
    Selection,

    /// Impact feedback (0 light, 1 medium, 2 heavy, 3 soft, 4 rigid)
    Impact {
        #[arg(value_name = "STYLE", default_value_t = 1)]
        style: i32,
    },

    /// Notification feedback (0 success, 1 warning, 2 error)
    Notification {
        #[arg(value_name = "TYPE", default_value_t = 0)]
        kind: i32,
    },

    /// Fire a transient event
    Transient {
        #[arg(short, long, default_value_t = 0.5)]
        intensity: f32,

        #[arg(short, long, default_value_t = 0.5)]
        sharpness: f32,
    },

    /// Play a continuous event until it finishes
    Continuous {
        #[arg(short, long, default_value_t = 0.5)]
        intensity: f32,

        #[arg(short, long, default_value_t = 0.5)]
        sharpness: f32,

        /// Duration in seconds
        #[arg(short, long, default_value_t = 1.0)]
        duration: f32,

        /// Ramp intensity to this value halfway through
        #[arg(long, value_name = "INTENSITY")]
        ramp_to: Option<f32>,
    },

    /// Play an AHAP pattern (path, name in HAPTIC_PATTERN_DIR, or file:// URL)
    Play {
        #[arg(value_name = "PATTERN")]
        pattern: String,

        /// Stop right after starting instead of waiting for the end
        #[arg(long, default_value_t = false)]
        no_wait: bool,
    },

    /// Validate an AHAP file and print a summary
    Validate {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Print the normalized pattern JSON
        #[arg(short, long)]
        print: bool,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "haptic=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut config = FacadeConfig::from_env();
    if cli.strict {
        config.parameter_policy = ParameterPolicy::Reject;
        config.state_policy = StatePolicy::Error;
    }

    let probe = SimulatedDevice::new();
    let device: Box<dyn HapticDevice> = match cli.device {
        DeviceKind::Simulated => Box::new(probe.clone()),
        DeviceKind::Null => Box::new(NullDevice::new()),
    };

    let mut haptic = Haptic::with_config(device, config).context("invalid facade configuration")?;

    match &cli.command {
        Commands::Info => print_info(&haptic),
        Commands::Selection => report("selection", haptic.selection()?),
        Commands::Impact { style } => {
            let style = ImpactStyle::try_from(*style)?;
            report("impact", haptic.impact(style)?);
        }
        Commands::Notification { kind } => {
            let kind = NotificationType::try_from(*kind)?;
            report("notification", haptic.notification(kind)?);
        }
        Commands::Transient { intensity, sharpness } => {
            report("transient", haptic.play_transient(*intensity, *sharpness)?);
        }
        Commands::Continuous {
            intensity,
            sharpness,
            duration,
            ramp_to,
        } => continuous_command(&mut haptic, *intensity, *sharpness, *duration, *ramp_to)?,
        Commands::Play { pattern, no_wait } => play_command(&mut haptic, pattern, *no_wait)?,
        Commands::Validate { file, print } => validate_command(file, *print)?,
    }

    if cli.log && cli.device == DeviceKind::Simulated {
        drop(haptic);
        for record in probe.log() {
            println!("{}", serde_json::to_string(&record)?);
        }
    }

    Ok(())
}

fn report(op: &str, playback: Playback) {
    match playback {
        Playback::Played => println!("{} {}", "  Played".green().bold(), op.cyan()),
        Playback::Skipped(reason) => {
            println!("{} {} ({:?})", " Skipped".yellow().bold(), op.cyan(), reason)
        }
    }
}

fn print_info(haptic: &Haptic<Box<dyn HapticDevice>>) {
    let caps = haptic.capabilities();
    let config = haptic.config();
    let flag = |on: bool| if on { "yes".green() } else { "no".red() };

    println!("{}", "Haptic facade".bold());
    println!("  device:              {}", haptic.device().name().cyan());
    println!("  supported:           {}", flag(haptic.is_supported()));
    println!("  predefined feedback: {}", flag(caps.predefined_feedback));
    println!("  custom events:       {}", flag(caps.custom_events));
    println!("  pattern files:       {}", flag(caps.pattern_files));
    println!("  audio events:        {}", flag(caps.audio_events));
    println!();
    println!("{}", "Configuration".bold());
    println!("  parameter policy:    {:?}", config.parameter_policy);
    println!("  state policy:        {:?}", config.state_policy);
    println!("  max continuous:      {}s", config.max_continuous_secs);
    println!("  pattern dir:         {}", config.pattern_dir.display());
}

fn continuous_command(
    haptic: &mut Haptic<Box<dyn HapticDevice>>,
    intensity: f32,
    sharpness: f32,
    duration: f32,
    ramp_to: Option<f32>,
) -> Result<()> {
    let playback = haptic.play_continuous(intensity, sharpness, duration)?;
    report("continuous", playback);
    if !playback.is_played() {
        return Ok(());
    }

    if let Some(target) = ramp_to {
        wait_for(haptic, 0.5);
        report("update", haptic.update_continuous(target, sharpness)?);
    }

    wait_for(haptic, 1.0);
    println!("{} {:?}", "   Phase".green().bold(), haptic.phase());
    Ok(())
}

fn play_command(haptic: &mut Haptic<Box<dyn HapticDevice>>, pattern: &str, no_wait: bool) -> Result<()> {
    let playback = if pattern.contains("://") {
        haptic.play_ahap_url(pattern)?
    } else if Path::new(pattern).is_file() {
        let loaded = HapticPattern::from_file(pattern)?;
        haptic.play_pattern(&loaded)?
    } else {
        haptic.play_ahap_file(pattern)?
    };
    report("pattern", playback);

    if playback.is_played() {
        if no_wait {
            report("stop", haptic.stop()?);
        } else {
            wait_for(haptic, 1.0);
            println!("{} {:?}", "   Phase".green().bold(), haptic.phase());
        }
    }
    Ok(())
}

fn validate_command(file: &Path, print: bool) -> Result<()> {
    let pattern = HapticPattern::from_file(file)
        .with_context(|| format!("{} is not a valid AHAP pattern", file.display()))?;

    let events = pattern.events().count();
    let haptic_events = pattern.haptic_events().count();
    if haptic_events == 0 {
        bail!("{} has no haptic events", file.display());
    }

    println!("{} {}", "   Valid".green().bold(), file.display().to_string().cyan());
    println!("  entries:       {}", pattern.pattern.len());
    println!("  events:        {} ({} haptic)", events, haptic_events);
    println!("  audio:         {}", if pattern.has_audio() { "yes" } else { "no" });
    println!("  duration:      {:.3}s", pattern.duration_secs());

    if print {
        println!();
        println!("{}", pattern.to_json_string()?);
    }
    Ok(())
}

/// Espera uma fração do tempo restante do evento ativo
fn wait_for(haptic: &Haptic<Box<dyn HapticDevice>>, fraction: f32) {
    if let Some(remaining) = haptic.remaining() {
        std::thread::sleep(remaining.mul_f32(fraction) + Duration::from_millis(5));
    }
}
