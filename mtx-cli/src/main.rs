//! Tape library changer CLI - inspect and move volumes with `mtx`.
//!
//! Usage:
//!   mtx-changer [-f device] <command>
//!
//! Examples:
//!   mtx-changer -f /dev/sg3 status        # Show drives and slots
//!   mtx-changer -f /dev/sg3 load 4 0      # Load slot 4 into drive 0
//!   mtx-changer -f /dev/sg3 unload 0      # Return drive 0 to its home slot
//!   mtx-changer --mock status --json      # Simulated library as JSON

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use mtx_core::{load_config_from_path, Changer, ChangerConfig, MockConfig, Slot};

/// Tape library changer CLI
#[derive(Parser, Debug)]
#[command(name = "mtx-changer")]
#[command(about = "Inspect and operate a tape library changer")]
struct Args {
    /// Changer device (otherwise reads $CHANGER)
    #[arg(short = 'f', long, env = "CHANGER")]
    device: Option<PathBuf>,

    /// Path of the mtx program
    #[arg(long = "mtx")]
    program: Option<PathBuf>,

    /// Use a simulated library instead of a device
    #[arg(long)]
    mock: bool,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the full library status
    Status {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show header counts
    Info,
    /// List drives
    Drives,
    /// List storage and mail slots
    Slots {
        /// Only storage slots
        #[arg(long, conflicts_with = "mail")]
        storage: bool,
        /// Only import/export slots
        #[arg(long)]
        mail: bool,
    },
    /// Load a volume from a slot into a drive
    Load { slot: usize, drive: usize },
    /// Unload a drive into a slot (default: the volume's home slot)
    Unload {
        drive: usize,
        #[arg(default_value_t = 0)]
        slot: usize,
    },
    /// Move a volume between slots
    Transfer { from: usize, to: usize },
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Merge the config file (if any) with command-line overrides.
fn resolve_config(args: &Args) -> mtx_core::MtxResult<ChangerConfig> {
    let mut config = match &args.config {
        Some(path) => load_config_from_path(path)?,
        None => ChangerConfig::default(),
    };

    if args.device.is_some() {
        config.device = args.device.clone();
    }
    if args.program.is_some() {
        config.program = args.program.clone();
    }
    if args.mock && config.mock.is_none() {
        config.mock = Some(MockConfig::default());
    }

    Ok(config)
}

fn print_slots<'a>(slots: impl IntoIterator<Item = &'a Slot>) {
    for slot in slots {
        println!("{}", slot);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = resolve_config(&args)?;
    debug!(?config, "changer configuration");

    let mut changer = Changer::new(config.backend()?);

    match args.command {
        Command::Status { json } => {
            let status = changer.status()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                println!(
                    "{}: {} drives, {} slots ({} storage, {} import/export)",
                    status.changer,
                    status.max_drives,
                    status.num_slots,
                    status.num_storage_slots,
                    status.num_mail_slots
                );
                print_slots(&status.drives);
                print_slots(&status.slots);
            }
        }
        Command::Info => {
            let status = changer.status()?;
            println!("max drives:    {}", status.max_drives);
            println!("slots:         {}", status.num_slots);
            println!("storage slots: {}", status.num_storage_slots);
            println!("mail slots:    {}", status.num_mail_slots);
        }
        Command::Drives => print_slots(&changer.drives()?),
        Command::Slots { storage, mail } => {
            let slots = if storage {
                changer.storage_slots()?
            } else if mail {
                changer.mail_slots()?
            } else {
                changer.slots()?
            };
            print_slots(&slots);
        }
        Command::Load { slot, drive } => changer.load(slot, drive)?,
        Command::Unload { drive, slot } => changer.unload(slot, drive)?,
        Command::Transfer { from, to } => changer.transfer(from, to)?,
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
