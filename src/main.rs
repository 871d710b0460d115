//! Entry point for the **glyphbar** daemon.
//!
//! Builds the panel from the configuration, spawns the trigger sources on
//! background threads, and handles incoming hook events on the main thread.
//! Every time the rendered panel changes, one line is written to stdout.
//!
//! Flags:
//!
//! * `--config <path>` — read configuration from `path`.
//! * `--once` — refresh every widget once, print the panel and exit.

use glyphbar::config::Config;
use glyphbar::hooks::{HookEvent, HookRegistry};
use glyphbar::ipc::listener::UnixSocketListener;
use glyphbar::panel::{OutputFormat, Panel};
use glyphbar::ticker::IntervalTicker;
use glyphbar::traits::TriggerSource;
use log::{error, info};
use std::io::Write;
use std::path::PathBuf;
use std::sync::mpsc;

/// Default socket path for the event listener.
fn default_socket_path() -> String {
    let runtime = std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".into());
    format!("{}/glyphbar.sock", runtime)
}

/// Resolve the config directory (`$XDG_CONFIG_HOME/glyphbar`).
fn config_dir() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    PathBuf::from(base).join("glyphbar")
}

/// Load the config from `path` (or `$XDG_CONFIG_HOME/glyphbar/config.json`),
/// falling back to compiled-in defaults.
fn load_config(path: Option<PathBuf>) -> Config {
    let path = path.unwrap_or_else(|| config_dir().join("config.json"));
    match Config::load(&path) {
        Ok(cfg) => {
            info!("loaded config from {}", path.display());
            cfg
        }
        Err(e) => {
            info!("no usable config ({}), using defaults", e);
            Config::default()
        }
    }
}

//  Main

fn main() {
    env_logger::init();

    let mut config_path = None;
    let mut once = false;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => config_path = args.next().map(PathBuf::from),
            "--once" => once = true,
            other => {
                error!("unknown argument: {}", other);
                std::process::exit(2);
            }
        }
    }

    let config = load_config(config_path);
    let panel = config.build_panel();
    info!("built panel with {} widget(s)", panel.len());

    if once {
        emit_line(&panel.render(config.output));
        return;
    }

    let (event_tx, event_rx) = mpsc::channel::<HookEvent>();
    spawn_trigger_sources(&config, event_tx);

    run_event_loop(&panel, event_rx, config.output);
}

//  Event loop

fn run_event_loop(panel: &Panel, events: mpsc::Receiver<HookEvent>, format: OutputFormat) {
    let mut registry = HookRegistry::new();
    panel.register_hooks(&mut registry);
    info!("{:?}", registry);

    let mut last = panel.render(format);
    emit_line(&last);

    for event in events {
        if registry.emit(event) == 0 {
            continue;
        }
        let line = panel.render(format);
        if line != last {
            emit_line(&line);
            last = line;
        }
    }
    info!("all trigger sources closed, exiting");
}

fn emit_line(line: &str) {
    let mut stdout = std::io::stdout().lock();
    if let Err(e) = writeln!(stdout, "{}", line).and_then(|_| stdout.flush()) {
        error!("failed to write panel: {}", e);
        std::process::exit(1);
    }
}

//  Helpers

fn spawn_trigger_sources(config: &Config, tx: mpsc::Sender<HookEvent>) {
    {
        let tx = tx.clone();
        let path = config.socket_path.clone().unwrap_or_else(default_socket_path);
        std::thread::spawn(move || {
            let mut source = UnixSocketListener::new(&path);
            if let Err(e) = source.run(tx) {
                error!("socket listener error: {}", e);
            }
        });
    }

    if let Some(interval) = config.interval() {
        let tx = tx.clone();
        std::thread::spawn(move || {
            let mut ticker = IntervalTicker::new(interval);
            let _ = ticker.run(tx);
        });
    }

    drop(tx);
}
