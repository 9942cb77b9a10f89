//! hotas-nav entry point.
//!
//! Command-line host for HOTAS navigation: inspect devices, capture button
//! bindings, edit the stored configuration, and run the navigation loop
//! against a target window until Ctrl-C.
//!
//! # Usage
//!
//! ```text
//! hotas-nav [--config-dir <DIR>] <COMMAND>
//!
//! Commands:
//!   devices                       List joystick devices
//!   show                          Print the stored configuration
//!   capture <DIRECTION>           Bind the next pressed button to a direction
//!   set-device <ID>               Select the joystick to use
//!   enable | disable              Switch navigation on or off
//!   run --window-title <TITLE>    Translate buttons to arrow keys for a window
//! ```
//!
//! Logging goes to stderr; the level is controlled by `RUST_LOG`
//! (default `info`).

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use hotas_core::{Direction, JoystickConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

use hotas_nav::application::capture_button::{CaptureError, DEFAULT_CAPTURE_POLL_INTERVAL};
use hotas_nav::application::configure::{ConfigStore, Configurator};
use hotas_nav::application::navigate::NavigationRuntime;
use hotas_nav::infrastructure::storage::config::JsonConfigStore;
use hotas_nav::infrastructure::ui_bridge::{
    self, CAPTURE_CANCELLED_MESSAGE, NO_DEVICES_MESSAGE, SAVED_MESSAGE,
};

// ── CLI argument definitions ──────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(
    name = "hotas-nav",
    about = "Map joystick / HOTAS buttons to arrow keys for a focused window",
    version
)]
struct Cli {
    /// Directory holding `joystick-config.json`.
    ///
    /// Defaults to the platform config directory (`%APPDATA%\HotasNav` on
    /// Windows).
    #[arg(long, global = true, env = "HOTAS_NAV_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List joystick devices reported by the OS.
    Devices,

    /// Print the stored configuration and whether it can drive navigation.
    Show,

    /// Wait for a button press and bind it to DIRECTION (up, down, left, right).
    Capture {
        direction: Direction,

        /// Device to watch.  Defaults to the configured device.
        #[arg(long)]
        device: Option<u32>,

        /// Give up after this many seconds.
        #[arg(long, default_value_t = 15)]
        timeout_secs: u64,
    },

    /// Select the joystick device to poll.
    SetDevice { id: u32 },

    /// Switch navigation on.
    Enable,

    /// Switch navigation off.
    Disable,

    /// Run navigation for a window until Ctrl-C.
    Run {
        /// Exact title of the target window.
        #[arg(long)]
        window_title: String,

        /// Poll period in milliseconds.
        #[arg(long, default_value_t = 30)]
        poll_ms: u64,
    },
}

impl Cli {
    fn config_store(&self) -> anyhow::Result<JsonConfigStore> {
        match &self.config_dir {
            Some(dir) => Ok(JsonConfigStore::in_dir(dir)),
            None => JsonConfigStore::at_platform_location()
                .context("failed to locate the configuration directory"),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging.  Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let store = Arc::new(cli.config_store()?);
    info!(path = %store.path().display(), "using joystick configuration");

    match cli.command {
        Command::Devices => list_devices(),
        Command::Show => show(store.as_ref()),
        Command::Capture {
            direction,
            device,
            timeout_secs,
        } => capture(store, direction, device, Duration::from_secs(timeout_secs)).await,
        Command::SetDevice { id } => edit(store.as_ref(), |c| c.device_id = id),
        Command::Enable => edit(store.as_ref(), |c| c.enabled = true),
        Command::Disable => edit(store.as_ref(), |c| c.enabled = false),
        Command::Run {
            window_title,
            poll_ms,
        } => run(store.as_ref(), &window_title, Duration::from_millis(poll_ms)).await,
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn list_devices() -> anyhow::Result<()> {
    let joystick = platform::joystick()?;
    let result = ui_bridge::list_devices_from(joystick.as_ref());
    let Some(devices) = result.data else {
        bail!(result.error.unwrap_or_default());
    };
    if devices.is_empty() {
        println!("{NO_DEVICES_MESSAGE}");
    }
    for device in devices {
        println!("{:>2}  {}  ({} buttons)", device.id, device.name, device.num_buttons);
    }
    Ok(())
}

fn show(store: &JsonConfigStore) -> anyhow::Result<()> {
    let config = store.load()?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    match config.validate() {
        Ok(()) => println!("ready: navigation can start"),
        Err(e) => println!("not ready: {e}"),
    }
    Ok(())
}

async fn capture(
    store: Arc<JsonConfigStore>,
    direction: Direction,
    device: Option<u32>,
    timeout: Duration,
) -> anyhow::Result<()> {
    let configurator = Configurator::open(store, platform::joystick()?)?
        .with_capture_timing(timeout, DEFAULT_CAPTURE_POLL_INTERVAL);
    let device = match device {
        Some(id) => id,
        None => configurator.config().await.device_id,
    };

    println!("Press the button for \"{direction}\" on device {device}...");
    match configurator.capture(direction, device).await {
        Ok(button) => {
            configurator.persist().await?;
            println!("{direction} -> button {button}");
            println!("{SAVED_MESSAGE}");
            Ok(())
        }
        Err(CaptureError::Cancelled) => {
            println!("{CAPTURE_CANCELLED_MESSAGE}");
            Ok(())
        }
        Err(e) => Err(e).context("capture failed"),
    }
}

fn edit(store: &JsonConfigStore, change: impl FnOnce(&mut JoystickConfig)) -> anyhow::Result<()> {
    let mut config = store.load()?;
    change(&mut config);
    store.save(&config)?;
    println!("{SAVED_MESSAGE}");
    Ok(())
}

async fn run(store: &JsonConfigStore, window_title: &str, period: Duration) -> anyhow::Result<()> {
    let config = store.load()?;
    config
        .validate()
        .context("joystick configuration cannot start navigation")?;
    let target = platform::find_window(window_title)?
        .with_context(|| format!("no window titled {window_title:?}"))?;

    let runtime = NavigationRuntime::start(config, target, platform::ports()?, period)?;
    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl-C")?;
    info!("Ctrl-C received, stopping");
    runtime.stop().await;
    Ok(())
}

// ── Platform adapters ─────────────────────────────────────────────────────────

#[cfg(target_os = "windows")]
mod platform {
    use std::sync::Arc;

    use hotas_nav::application::device_query::JoystickApi;
    use hotas_nav::application::navigate::{NavigationPorts, WindowHandle};
    use hotas_nav::infrastructure::focus::windows::{find_window_by_title, Win32ForegroundWindow};
    use hotas_nav::infrastructure::joystick::windows::WinmmJoystick;
    use hotas_nav::infrastructure::key_injection::windows::SendInputInjector;

    pub fn joystick() -> anyhow::Result<Arc<dyn JoystickApi>> {
        Ok(Arc::new(WinmmJoystick::new()))
    }

    pub fn ports() -> anyhow::Result<NavigationPorts> {
        Ok(NavigationPorts {
            joystick: joystick()?,
            focus: Arc::new(Win32ForegroundWindow::new()),
            injector: Arc::new(SendInputInjector::new()),
        })
    }

    pub fn find_window(title: &str) -> anyhow::Result<Option<WindowHandle>> {
        Ok(find_window_by_title(title))
    }
}

#[cfg(not(target_os = "windows"))]
mod platform {
    use std::sync::Arc;

    use anyhow::bail;
    use hotas_nav::application::device_query::JoystickApi;
    use hotas_nav::application::navigate::{NavigationPorts, WindowHandle};

    pub fn joystick() -> anyhow::Result<Arc<dyn JoystickApi>> {
        bail!("joystick access requires Windows")
    }

    pub fn ports() -> anyhow::Result<NavigationPorts> {
        bail!("key injection requires Windows")
    }

    pub fn find_window(_title: &str) -> anyhow::Result<Option<WindowHandle>> {
        bail!("window lookup requires Windows")
    }
}
