use chrono::Local;
use color_eyre::{eyre::eyre, Result};
use padmap::controller::{AnalogControl, EventCollector, Gamepad, Signal, SignalHub};
use padmap::mapping::{AnalogStick, LogicalAxis, LogicalButton};
use padmap::InputConfig;
use std::time::Duration;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    setup()?;

    let config = InputConfig::load_or_default()?;
    let platform = config.resolve_platform();
    info!("Using {} raw numbering", platform);

    let collector = EventCollector::create(config.raw_code_layout(platform))
        .map_err(|e| eyre!("Failed to create collector: {}", e))?;
    let (mut collector, identity) = collector
        .initialize()
        .map_err(|e| eyre!("Failed to attach gamepad: {}", e))?;

    let model = config.model.unwrap_or_else(|| identity.model());
    info!("Treating {} as {}", identity.name, model);

    let mut gamepad = Gamepad::attach(model, platform, &config.gamepad_settings())?;
    collector.bind_profile(gamepad.profile());
    let mut signals = SignalHub::new();
    register_log_signals(&mut signals);

    run_tick_loop(&mut collector, &mut gamepad, &mut signals, config.tick_interval_ms);
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    setup_logging_env();
    Ok(())
}

fn setup_logging_env() {
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .init();
}

fn register_log_signals(signals: &mut SignalHub) {
    for button in LogicalButton::ALL {
        signals.subscribe(Signal::Pressed(button), move |edge| {
            info!("Tick {}: {:?} pressed", edge.tick, button)
        });
        signals.subscribe(Signal::Released(button), move |edge| {
            info!("Tick {}: {:?} released", edge.tick, button)
        });
    }

    let analog = [
        AnalogControl::Stick(AnalogStick::Left),
        AnalogControl::Stick(AnalogStick::Right),
        AnalogControl::Axis(LogicalAxis::LeftTrigger),
        AnalogControl::Axis(LogicalAxis::RightTrigger),
    ];
    for control in analog {
        signals.subscribe(Signal::Moved(control), move |edge| {
            info!("Tick {}: {:?} moved", edge.tick, control)
        });
        signals.subscribe(Signal::MoveEnded(control), move |edge| {
            info!("Tick {}: {:?} back to rest", edge.tick, control)
        });
    }
}

fn run_tick_loop(
    collector: &mut EventCollector<padmap::controller::event_collector::Collecting>,
    gamepad: &mut Gamepad,
    signals: &mut SignalHub,
    tick_interval_ms: u64,
) -> ! {
    info!("Starting tick loop with {}ms interval", tick_interval_ms);
    let interval = Duration::from_millis(tick_interval_ms);

    let mut edges = 0;
    let mut last_log_time = Local::now();
    let log_interval = chrono::Duration::seconds(10);

    loop {
        let snapshot = collector.poll();
        gamepad.advance(snapshot);
        edges += signals.dispatch(gamepad);

        if collector.take_detached() {
            gamepad.reset();
        }

        let now = Local::now();
        if now - last_log_time > log_interval {
            info!(
                "Tick stats: {} ticks so far, {} edges in last {} seconds",
                gamepad.tick(),
                edges,
                log_interval.num_seconds()
            );
            debug!(
                "Held: {:?}",
                gamepad.pressed_buttons().collect::<Vec<_>>()
            );
            edges = 0;
            last_log_time = now;
        }

        std::thread::sleep(interval);
    }
}
