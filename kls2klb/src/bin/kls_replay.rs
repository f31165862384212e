use anyhow::{anyhow, bail, Context};
use clap::Parser;
use kls2klb::{
    compile_kls_file, Effect, Host, HostEvent, KeyChord, KeyEventRouter, KeyRecord, Layout,
    LayerState, OsVariant, SimulatedHost, UsbDeviceState,
};
use kls2klb::engine::DebugSnapshot;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(author, version, about = "Replay host callbacks against a key router", long_about = None)]
struct Args {
    /// Layout to load (.klb, or .kls compiled on the fly); defaults to the built-in K1 Pro ISO layout
    #[arg(short, long)]
    layout: Option<PathBuf>,

    /// Event script, one callback per line
    events: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Prints every effect as it is applied
struct PrintingHost {
    sim: SimulatedHost,
}

impl Host for PrintingHost {
    fn apply(&mut self, effect: &Effect) {
        println!("  -> {}", effect);
        self.sim.apply(effect);
    }

    fn debug_dump(&mut self, snapshot: &DebugSnapshot) {
        for line in snapshot.to_string().lines() {
            println!("  | {}", line);
        }
        self.sim.debug_dump(snapshot);
    }
}

fn load_layout(path: &Path) -> anyhow::Result<Layout> {
    if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("kls")) {
        let klb = compile_kls_file(path)?;
        Ok(Layout::from_klb(&klb)?)
    } else {
        let data = std::fs::read(path)?;
        Ok(Layout::load(&data)?)
    }
}

fn parse_event(line: &str) -> anyhow::Result<Vec<HostEvent>> {
    let mut parts = line.split_whitespace();
    let command = parts.next().unwrap_or_default();
    let rest: Vec<&str> = parts.collect();

    let arg = |index: usize| nth_arg(&rest, command, index);

    let events = match command {
        "press" => vec![HostEvent::Key(KeyRecord::press(KeyChord::parse(arg(0)?)?.key))],
        "release" => vec![HostEvent::Key(KeyRecord::release(KeyChord::parse(arg(0)?)?.key))],
        "tap" => {
            let chord = KeyChord::parse(&rest.join(" "))?;
            vec![
                HostEvent::Key(KeyRecord::press(chord.key).with_mods(chord.mods)),
                HostEvent::Key(KeyRecord::release(chord.key).with_mods(chord.mods)),
            ]
        }
        "os" => {
            let os = OsVariant::from_name(arg(0)?).ok_or_else(|| anyhow!("unknown OS '{}'", rest[0]))?;
            vec![HostEvent::HostOsDetected(os)]
        }
        "usb" => {
            let state = UsbDeviceState::from_name(arg(0)?)
                .ok_or_else(|| anyhow!("unknown USB state '{}'", rest[0]))?;
            vec![HostEvent::UsbStateChanged(state)]
        }
        "suspend" => vec![HostEvent::SuspendPowerDown],
        "tick" => vec![HostEvent::MatrixScan(arg(0)?.parse()?)],
        "leds" => vec![HostEvent::Indicators {
            led_min: arg(0)?.parse()?,
            led_max: arg(1)?.parse()?,
        }],
        "default" => vec![HostEvent::DefaultLayerStateChanged(LayerState::single(arg(0)?.parse()?))],
        "layers" => vec![HostEvent::LayerStateChanged(LayerState(parse_mask(arg(0)?)?))],
        other => bail!("unknown command '{}'", other),
    };
    Ok(events)
}

fn nth_arg<'a>(rest: &[&'a str], command: &str, index: usize) -> anyhow::Result<&'a str> {
    rest.get(index)
        .copied()
        .ok_or_else(|| anyhow!("'{}' needs {} argument(s)", command, index + 1))
}

fn parse_mask(text: &str) -> anyhow::Result<u32> {
    match text.strip_prefix("0b") {
        Some(bits) => Ok(u32::from_str_radix(bits, 2)?),
        None => Ok(text.parse()?),
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let layout = match &args.layout {
        Some(path) => load_layout(path).with_context(|| format!("failed to load {}", path.display()))?,
        None => Layout::k1_pro_iso(),
    };
    log::info!("Layout: {}", layout.name);

    let script = std::fs::read_to_string(&args.events)
        .with_context(|| format!("failed to read {}", args.events.display()))?;

    let mut router = KeyEventRouter::with_layout(layout);
    let mut host = PrintingHost { sim: SimulatedHost::new() };

    for (number, line) in script.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        println!("{}", line);
        let events = parse_event(line).with_context(|| format!("line {}", number + 1))?;

        for event in events {
            if let HostEvent::Key(record) = event {
                if record.pressed && !record.mods.is_empty() {
                    match router.key_override(record.keycode, record.mods) {
                        Some(found) => println!(
                            "  override #{}: {} (suppress {})",
                            found.index, found.replacement, found.suppressed_mods
                        ),
                        None => println!("  no override"),
                    }
                }
            }
            if let HostEvent::Indicators { .. } = event {
                host.sim.clear_frame();
            }
            let handled = router.dispatch(event, &mut host);
            if handled {
                println!("  (handled)");
            }
        }
    }

    println!(
        "final: layers {} default {} resets {}/{}",
        host.sim.layer_state, host.sim.default_layer_state, host.sim.hard_resets, host.sim.soft_resets
    );
    Ok(())
}
