//! Entry point for the **newsgrid** daemon.
//!
//! Loads the persisted dashboard state, spawns the command socket on a
//! background thread and applies incoming commands on the main thread, which
//! is the only thread that ever touches the store.

use newsgrid::command::Command;
use newsgrid::config::Config;
use newsgrid::dashboard::Dashboard;
use newsgrid::ipc::listener::UnixSocketListener;
use newsgrid::storage::FileStorage;
use newsgrid::traits::{CommandSource, StateStorage};
use log::{error, info, warn};
use std::path::PathBuf;
use std::sync::mpsc;

/// Default socket path for the command listener.
fn default_socket_path() -> PathBuf {
    let runtime = std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".into());
    PathBuf::from(runtime).join("newsgrid.sock")
}

fn home_dir() -> String {
    std::env::var("HOME").unwrap_or_else(|_| "/tmp".into())
}

/// Resolve the config directory (`$XDG_CONFIG_HOME/newsgrid`).
fn config_dir() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .unwrap_or_else(|_| format!("{}/.config", home_dir()));
    PathBuf::from(base).join("newsgrid")
}

/// Resolve the default data directory (`$XDG_DATA_HOME/newsgrid`).
fn data_dir() -> PathBuf {
    let base = std::env::var("XDG_DATA_HOME")
        .unwrap_or_else(|_| format!("{}/.local/share", home_dir()));
    PathBuf::from(base).join("newsgrid")
}

/// Try to load the config from `$XDG_CONFIG_HOME/newsgrid/config.json`,
/// falling back to compiled-in defaults.
fn load_config() -> Config {
    let path = config_dir().join("config.json");
    match Config::load(&path) {
        Ok(cfg) => {
            info!("loaded config from {}", path.display());
            cfg
        }
        Err(e) => {
            info!("no config file ({}), using defaults", e);
            Config::default()
        }
    }
}

fn main() {
    env_logger::init();

    let config = load_config();
    let storage_dir = config.storage.dir.clone().unwrap_or_else(data_dir);
    info!("state directory: {}", storage_dir.display());

    let storage = FileStorage::new(storage_dir);
    let dashboard = Dashboard::open(storage, config.storage.key.clone(), config.limits);

    // Write the loaded (possibly migrated) state right away so the file on
    // disk always carries the current schema.
    if let Err(e) = dashboard.save() {
        warn!("cannot write state: {}", e);
    }

    let socket_path = config.ipc.socket_path.clone().unwrap_or_else(default_socket_path);
    let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
    spawn_command_sources(cmd_tx, socket_path);

    run_event_loop(dashboard, cmd_rx);
}

fn run_event_loop<S: StateStorage>(mut dashboard: Dashboard<S>, cmd_rx: mpsc::Receiver<Command>) {
    info!("newsgrid running");
    for cmd in cmd_rx {
        dashboard.handle(cmd);
    }
    info!("all command sources closed, exiting");
}

fn spawn_command_sources(tx: mpsc::Sender<Command>, socket_path: PathBuf) {
    std::thread::spawn(move || {
        let mut source = UnixSocketListener::new(&socket_path);
        if let Err(e) = source.run(tx) {
            error!("socket listener error: {}", e);
        }
    });
}
