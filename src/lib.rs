pub mod config;
pub mod diagnostics;
pub mod error;
pub mod hid;
pub mod session;
pub mod slots;
pub mod up;
pub mod wire;

pub use error::{Error, Result};
pub use session::{Session, SessionState, Timing};

use anyhow::Context;
use config::{Command, Config, ConfirmMode};
use hid::Transport;

pub fn run(cfg: Config) -> anyhow::Result<()> {
    use tracing_subscriber::EnvFilter;
    let level = match cfg.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level))
        .with_writer(std::io::stderr)
        .init();

    diagnostics::check(&cfg)?;

    let lock_path = default_lock_path()?;
    with_device_lock(&lock_path, || {
        let mut session = connect(&cfg)?;
        let mut confirmer: Box<dyn up::Confirmer> = match cfg.confirm {
            ConfirmMode::Console => Box::new(up::ConsoleConfirmer),
            ConfirmMode::Pinentry => Box::new(up::PinentryConfirmer::new(&cfg.pinentry)),
        };
        let res = execute(&mut session, &cfg.command, confirmer.as_mut());
        session.close();
        res
    })
}

#[cfg(feature = "usb")]
fn connect(cfg: &Config) -> anyhow::Result<Session<hid::UsbTransport>> {
    let mut connector = hid::UsbConnector::new(cfg.vendor_id, cfg.product_id);
    let mut session = Session::new(Timing::default()).with_confirm_timeout(cfg.confirm_timeout());
    session.connect(&mut connector).context("connecting to device")?;
    Ok(session)
}

#[cfg(not(feature = "usb"))]
fn connect(_cfg: &Config) -> anyhow::Result<Session<NoTransport>> {
    anyhow::bail!("okhid was built without USB support; rebuild with --features usb")
}

#[cfg(not(feature = "usb"))]
enum NoTransport {}

#[cfg(not(feature = "usb"))]
impl Transport for NoTransport {
    fn write(&mut self, _report: &hid::Report) -> Result<(), hid::TransportError> {
        match *self {}
    }

    fn read(&mut self, _max: usize, _timeout_ms: i32) -> Result<Vec<u8>, hid::TransportError> {
        match *self {}
    }
}

/// Run one CLI command against a connected session and print its output.
pub fn execute<T: Transport>(
    session: &mut Session<T>,
    command: &Command,
    confirmer: &mut dyn up::Confirmer,
) -> anyhow::Result<()> {
    match command {
        Command::Status => {
            let initialized = session.initialized()?;
            println!("{}", if initialized { "INITIALIZED" } else { "NOT INITIALIZED" });
        }
        Command::Labels => {
            for slot in session.get_labels()? {
                println!("{slot}");
            }
        }
        Command::KeyLabels => {
            session.flush()?;
            println!("You should see your device blink 3 times");
            for line in slots::key_label_lines(&session.get_key_labels()?) {
                println!("{line}");
            }
        }
        Command::SetSlot { slot, field, value } => {
            let ack = session.set_slot(*slot, *field, value.as_bytes())?;
            println!("{ack}");
        }
        Command::WipeSlot { slot } => {
            for ack in session.wipe_slot(*slot)? {
                println!("{ack}");
            }
        }
        Command::Sign { slot, data } => {
            let payload = hex::decode(data).context("sign data must be hex")?;
            let signature = session.sign(*slot, &payload, confirmer)?;
            println!("{}", hex::encode(signature));
        }
        Command::Decrypt { slot, data } => {
            let ciphertext = hex::decode(data).context("decrypt data must be hex")?;
            let plain = session.decrypt(*slot, &ciphertext, confirmer)?;
            println!("{}", hex::encode(plain));
        }
        Command::Pubkey { slot } => {
            let key = session.get_public_key(*slot)?;
            println!("{}", hex::encode(&key));
            tracing::info!(len = key.len(), "public key received");
        }
        Command::SetKey { slot, key_type, data } => {
            let key = hex::decode(data).context("key must be hex")?;
            let chunks = session.set_private_key(*slot, *key_type, &key)?;
            println!("Key uploaded in {chunks} report(s)");
        }
    }
    Ok(())
}

fn default_lock_path() -> anyhow::Result<std::path::PathBuf> {
    let lock_dir = match std::env::var("XDG_RUNTIME_DIR") {
        Ok(dir) => std::path::PathBuf::from(dir),
        Err(_) => directories::ProjectDirs::from("", "", "okhid")
            .ok_or_else(|| anyhow::anyhow!("cannot determine XDG data dir"))?
            .data_dir()
            .to_path_buf(),
    };
    std::fs::create_dir_all(&lock_dir)?;
    Ok(lock_dir.join("okhid.lock"))
}

/// Run `f` while holding an exclusive lock on `path`, so two invocations
/// never talk to the device at once.
pub fn with_device_lock<R>(
    path: &std::path::Path,
    f: impl FnOnce() -> anyhow::Result<R>,
) -> anyhow::Result<R> {
    let lock_file = std::fs::OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(path)?;
    let mut lock = fd_lock::RwLock::new(lock_file);
    let _guard = lock
        .try_write()
        .map_err(|_| anyhow::anyhow!("okhid is already running (lock: {})", path.display()))?;
    f()
}
