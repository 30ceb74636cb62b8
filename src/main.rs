use clap::{Args, Parser, Subcommand};
use marlinsim::{
    build_session, find_host_port, init_logging, list_ports, load_config, open_transport,
    CancelToken, Config, Overrides, BUILD_DATE, VERSION,
};
use std::path::PathBuf;
use std::time::Duration;

/// How long a cancelled session may take to wind down before the process exits
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

#[derive(Parser, Debug)]
#[command(
    name = "marlinsim",
    author,
    version,
    about = "Marlin firmware simulator",
    long_about = "Answers a host controller's G-code over a serial port (or stdio) the way a Marlin board does.\n\nExamples:\n  marlinsim run\n  marlinsim run --port /dev/ttyUSB0 --baud 250000\n  printf 'M105\\nG28\\n' | marlinsim run --stdio --busy-interval-ms 100"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the simulator (default).
    Run(RunArgs),

    /// List serial ports and show which one would be picked automatically.
    Ports,

    /// Write the default configuration to a file (.toml or .json).
    WriteConfig {
        /// Destination path.
        path: PathBuf,
    },
}

#[derive(Args, Debug, Default)]
struct RunArgs {
    /// Configuration file (.toml or .json).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Serial port name; "Auto" picks the first port described as SERIAL.
    #[arg(short, long)]
    port: Option<String>,

    /// Serial baud rate.
    #[arg(short, long)]
    baud: Option<u32>,

    /// Use stdin/stdout instead of a serial port.
    #[arg(long)]
    stdio: bool,

    /// Seed for the thermal noise.
    #[arg(long)]
    seed: Option<u64>,

    /// Length of one busy step in milliseconds.
    #[arg(long)]
    busy_interval_ms: Option<u64>,
}

impl RunArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            port: self.port.clone(),
            baud_rate: self.baud,
            stdio: self.stdio,
            seed: self.seed,
            busy_interval_ms: self.busy_interval_ms,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging()?;

    match cli.command {
        Some(Commands::Run(args)) => cmd_run(args).await,
        Some(Commands::Ports) => cmd_ports(),
        Some(Commands::WriteConfig { path }) => cmd_write_config(&path),
        None => cmd_run(RunArgs::default()).await,
    }
}

/// Runs the session on a blocking task until end of input or Ctrl-C.
async fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    tracing::info!("marlinsim {} (built {})", VERSION, BUILD_DATE);

    let config = load_config(args.config.as_deref(), &args.overrides())?;
    let transport = open_transport(&config)?;
    let cancel = CancelToken::new();
    let mut session = build_session(&config, transport, cancel.clone())?;

    let mut task = tokio::task::spawn_blocking(move || session.run());

    let summary = tokio::select! {
        joined = &mut task => joined??,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("End of program");
            cancel.cancel();
            match tokio::time::timeout(SHUTDOWN_GRACE, task).await {
                Ok(joined) => joined??,
                Err(_) => {
                    // A blocking stdin read cannot be interrupted.
                    tracing::warn!("Session still blocked after {:?}, exiting", SHUTDOWN_GRACE);
                    std::process::exit(0);
                }
            }
        }
    };

    tracing::debug!("{:?}", summary);
    Ok(())
}

fn cmd_ports() -> anyhow::Result<()> {
    let ports = list_ports()?;
    if ports.is_empty() {
        println!("No serial port found");
        return Ok(());
    }

    let host = find_host_port(&ports).map(|p| p.port_name.clone());
    for port in &ports {
        let marker = if Some(&port.port_name) == host.as_ref() {
            "  <- host"
        } else {
            ""
        };
        println!("{}: {}{}", port.port_name, port.description, marker);
    }
    Ok(())
}

fn cmd_write_config(path: &std::path::Path) -> anyhow::Result<()> {
    Config::default().save_to_file(path)?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}
