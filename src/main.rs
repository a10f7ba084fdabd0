use clap::{Parser, Subcommand};
use dialoguer::Select;
use huntertx_rs::config::DeviceRegistry;
use huntertx_rs::device::{FileSink, RadioConfig, SampleFormat};
use huntertx_rs::phy::Frame;
use huntertx_rs::protocol::{Command, DeviceAddress, FRAME_REPEAT};
use huntertx_rs::transmission::{
    RadioWorker, TransmitSession, Transmitter, TxConfig, WorkerEvent,
};
use huntertx_rs::ui::progress::{ProgressManager, templates};
use huntertx_rs::ui::{self, command_menu, print_banner};
use huntertx_rs::utils::consts::*;
use huntertx_rs::utils::dump::TransmissionReport;
use huntertx_rs::utils::logging::init_logging_with;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(author, version, about = "433.92 MHz fan/light remote encoder", long_about = None)]
struct Cli {
    /// JSON file with extra named devices
    #[arg(long, global = true)]
    devices: Option<PathBuf>,

    /// Default log level (RUST_LOG takes precedence)
    #[arg(long, global = true, default_value = LOG_LEVEL)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct Target {
    /// Named device from the registry
    #[arg(short, long, default_value = "office", conflicts_with = "address")]
    device: String,

    /// Raw address bits, overrides --device
    #[arg(short, long)]
    address: Option<String>,
}

#[derive(clap::Args)]
struct Output {
    /// Output path, `-` for stdout
    #[arg(short, long, default_value = "-")]
    output: PathBuf,

    #[arg(short, long, value_enum, default_value_t = SampleFormat::Cf32)]
    format: SampleFormat,

    #[arg(long, default_value_t = SAMPLE_RATE)]
    sample_rate: u32,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode one command and write it to the sink
    Send {
        /// power, fan0, fan1, fan2, fan3
        command: Command,
        #[command(flatten)]
        target: Target,
        #[command(flatten)]
        output: Output,
        /// Encode only, do not touch the sink
        #[arg(long)]
        dry_run: bool,
        /// Print the transmission report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Pick commands from a menu; each one is appended to the output
    Interactive {
        #[command(flatten)]
        target: Target,
        #[command(flatten)]
        output: Output,
    },
    /// List known devices
    Devices {
        #[arg(long)]
        json: bool,
    },
    /// Print protocol timing
    Info {
        #[command(flatten)]
        target: Target,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging_with(&cli.log_level);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut registry = DeviceRegistry::builtin();
    if let Some(path) = &cli.devices {
        registry.merge(DeviceRegistry::load(path)?);
    }

    match cli.command {
        Commands::Send {
            command,
            target,
            output,
            dry_run,
            json,
        } => {
            let address = resolve_address(&registry, &target)?;
            let report = if dry_run {
                encode_only(address, output.sample_rate, command)?
            } else {
                send_once(address, &output, command)?
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
        }
        Commands::Interactive { target, output } => {
            print_banner();
            let address = resolve_address(&registry, &target)?;
            interactive(address, &output)?;
        }
        Commands::Devices { json } => {
            if json {
                println!("{}", registry.to_json()?);
            } else {
                ui::print_devices(&registry);
            }
        }
        Commands::Info { target } => {
            let address = resolve_address(&registry, &target)?;
            print_info(&address)?;
        }
    }
    Ok(())
}

fn resolve_address(
    registry: &DeviceRegistry,
    target: &Target,
) -> Result<DeviceAddress, Box<dyn Error>> {
    match &target.address {
        Some(bits) => Ok(DeviceAddress::parse(bits)?),
        None => Ok(registry.get(&target.device)?.clone()),
    }
}

fn bound_session(
    address: DeviceAddress,
    sample_rate: u32,
) -> Result<TransmitSession, Box<dyn Error>> {
    let mut session = TransmitSession::new(TxConfig {
        sample_rate,
        baud_rate: BAUD_RATE,
    })?;
    session.bind_address(address)?;
    Ok(session)
}

fn encode_only(
    address: DeviceAddress,
    sample_rate: u32,
    command: Command,
) -> Result<TransmissionReport, Box<dyn Error>> {
    let mut session = bound_session(address.clone(), sample_rate)?;
    session.encode(command)?;
    let buffer = session.take_buffer()?;
    Ok(TransmissionReport::from_buffer(&buffer, address.to_string()))
}

fn send_once(
    address: DeviceAddress,
    output: &Output,
    command: Command,
) -> Result<TransmissionReport, Box<dyn Error>> {
    let session = bound_session(address, output.sample_rate)?;
    let radio = RadioConfig::default().with_sample_rate(output.sample_rate);

    let progress = ProgressManager::new();
    let mut sink = FileSink::new(&output.output, output.format);
    // keep stdout clean when samples go there
    if output.output.as_os_str() != "-" {
        let pb = progress.create_bar(
            "write",
            0,
            templates::WRITE,
            &output.output.display().to_string(),
        )?;
        sink = sink.with_progress(pb);
    }

    let tx = Transmitter::new(session, sink, radio)?;
    let report = tx.request_transmit(command)?;
    progress.clear_all();
    Ok(report)
}

fn interactive(address: DeviceAddress, output: &Output) -> Result<(), Box<dyn Error>> {
    if output.output.as_os_str() == "-" {
        return Err("interactive mode needs an output file (--output)".into());
    }
    if output.format == SampleFormat::Wav {
        warn!("WAV output is rewritten on every command");
    }

    let session = bound_session(address, output.sample_rate)?;
    let radio = RadioConfig::default().with_sample_rate(output.sample_rate);
    let sink = FileSink::new(&output.output, output.format).with_append(true);
    let worker = RadioWorker::spawn(Arc::new(Transmitter::new(session, sink, radio)?));

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    // Ctrl+C: stop taking commands, let the current one finish
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })?;

    let menu = command_menu();
    let mut labels: Vec<String> = menu.iter().map(|(_, label)| label.clone()).collect();
    labels.push("quit".to_string());

    let progress = ProgressManager::new();
    while running.load(Ordering::SeqCst) {
        let choice = Select::new()
            .with_prompt("Button")
            .items(&labels)
            .default(0)
            .interact_opt()?;
        let Some((command, _)) = choice.and_then(|i| menu.get(i)) else {
            break;
        };

        if let Err(e) = worker.submit(*command) {
            warn!("{}", e);
            continue;
        }

        let spinner = progress.create_spinner("tx", command.description())?;
        loop {
            match worker.events().recv_timeout(Duration::from_secs(30)) {
                Ok(WorkerEvent::Started(_)) => continue,
                Ok(WorkerEvent::Finished(report)) => {
                    info!(
                        "Sent {} ({} frames, {:.3} s)",
                        report.command, report.frames, report.duration_secs
                    );
                    break;
                }
                Ok(WorkerEvent::Failed { command, error }) => {
                    error!("{} failed: {}", command, error);
                    break;
                }
                Err(e) => {
                    spinner.finish_and_clear();
                    return Err(e.into());
                }
            }
        }
        progress.finish_and_clear("tx")?;
    }

    info!("Exiting gracefully...");
    worker.shutdown();
    Ok(())
}

fn print_info(address: &DeviceAddress) -> Result<(), Box<dyn Error>> {
    let sps = huntertx_rs::phy::samples_per_symbol(SAMPLE_RATE, BAUD_RATE)?;
    let frame_bits = Frame::bit_len(address.len());
    let frame_chips = frame_bits * CHIPS_PER_BIT;

    println!("carrier          {:.2} MHz", CENTER_FREQ_HZ / 1e6);
    println!("sample rate      {} S/s", SAMPLE_RATE);
    println!("baud             {}", BAUD_RATE);
    println!("samples/symbol   {}", sps);
    println!("address          {} ({} bits)", address, address.len());
    println!(
        "frame            {} bits = {} preamble + {} address + {} separator + {} payload + {} gap",
        frame_bits,
        PREAMBLE_LEN,
        address.len(),
        SEPARATOR_LEN,
        PAYLOAD_BITS,
        GAP_BITS
    );
    println!("frame chips      {}", frame_chips);
    println!("pad              {} samples", PAD_SAMPLES);
    for (command, label) in command_menu() {
        let frames = huntertx_rs::protocol::payload_plan(command)?.len();
        let samples = frames * frame_chips * sps + PAD_SAMPLES;
        println!(
            "  {}  {} frames ({} x{}), {} samples",
            label,
            frames,
            frames / FRAME_REPEAT,
            FRAME_REPEAT,
            samples
        );
    }
    Ok(())
}
