//! SNES controller daemon for the Raspberry Pi.
//!
//! Passively reads the controller's latch/clock/data lines over
//! memory-mapped GPIO, debounces each button, and turns clean presses
//! into MQTT light toggles and Android TV keycodes (relayed over a FIFO
//! to the ADB daemon).

mod config;
mod debounce;
mod dispatch;
mod fifo;
mod gpio;
mod mqtt;
mod run;
mod sampler;

use std::path::PathBuf;
use std::process;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use signal_hook::consts::{SIGINT, SIGTERM};
use snespad_buttons::NUM_BUTTONS;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::MqttConfig;
use debounce::Debouncer;
use dispatch::Dispatcher;
use fifo::FifoKeycodeSink;
use gpio::GpioRegisters;
use mqtt::MosquittoPublisher;
use sampler::{BusSampler, PinAssignment};

#[derive(Parser)]
#[command(name = "snespad-daemon")]
#[command(about = "SNES controller → MQTT lights + Android TV keycodes")]
struct Cli {
    /// FIFO read by the ADB relay daemon
    #[arg(long, default_value = fifo::DEFAULT_FIFO_PATH)]
    fifo: PathBuf,

    /// BCM pin of the controller clock line
    #[arg(long, default_value_t = 17)]
    clock_pin: u8,

    /// BCM pin of the controller latch line
    #[arg(long, default_value_t = 27)]
    latch_pin: u8,

    /// BCM pin of the controller data line
    #[arg(long, default_value_t = 22)]
    data_pin: u8,

    /// Consecutive pressed frames required to fire
    #[arg(long, default_value_t = debounce::PRESS_FRAMES)]
    press_frames: u32,

    /// Consecutive released frames required to re-arm
    #[arg(long, default_value_t = debounce::RELEASE_FRAMES)]
    release_frames: u32,

    /// Dead time after a fire, in milliseconds
    #[arg(long, default_value_t = debounce::COOLDOWN_MS)]
    cooldown_ms: u64,
}

fn main() {
    if let Err(err) = run_daemon() {
        eprintln!("error: {err:#}");
        process::exit(1);
    }
}

fn run_daemon() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mqtt_config = MqttConfig::from_env()?;
    let gpio = GpioRegisters::open()?;

    let shutdown = Arc::new(AtomicBool::new(false));
    for signal in [SIGINT, SIGTERM] {
        signal_hook::flag::register(signal, Arc::clone(&shutdown))
            .with_context(|| format!("registering handler for signal {signal}"))?;
    }

    let pins = PinAssignment {
        clock: cli.clock_pin,
        latch: cli.latch_pin,
        data: cli.data_pin,
    };
    let mut sampler = BusSampler::new(gpio, pins, Arc::clone(&shutdown));

    let mut debouncers: [Debouncer; NUM_BUTTONS] = std::array::from_fn(|_| {
        Debouncer::with_thresholds(
            cli.press_frames,
            cli.release_frames,
            Duration::from_millis(cli.cooldown_ms),
        )
    });

    let publisher = MosquittoPublisher::new(&mqtt_config);
    let keycodes = FifoKeycodeSink::new(cli.fifo);
    let mut dispatcher = Dispatcher::new(publisher, keycodes, mqtt_config.light_topics.clone());

    info!("SNES controller → lights + Android TV (via ADB relay)");
    info!("  X/Y = toggle lights");
    info!("  D-pad/A/B/L/R/Select = TV navigation");
    info!("  Start = TV power");
    info!("Ctrl+C to stop");

    run::run(&mut sampler, &mut debouncers, &mut dispatcher);

    // The FIFO handle closes when the dispatcher drops; children spawned
    // for in-flight publishes are left to finish on their own.
    info!("shutting down");
    Ok(())
}
