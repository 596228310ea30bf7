//! Command-line driver for a DALI bus behind an LW14 I2C bridge:
//! commission short addresses, blink a gear, report actual levels, or
//! turn the bus off.

use std::thread::sleep;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use dali_lw14::status::LW14_DEFAULT_ADDRESS;
use dali_lw14::transport::LinuxTransport;
use dali_lw14::{commission, Address, LW14Adapter};

#[derive(Parser)]
#[command(author, version, about = "DALI bus control over an LW14 I2C bridge")]
struct Cli {
    /// Path to the I2C bus device, e.g. /dev/i2c-1.
    i2c_device: String,

    /// 7-bit I2C slave address of the LW14 bridge.
    #[arg(long, default_value_t = LW14_DEFAULT_ADDRESS)]
    address: u8,

    #[command(subcommand)]
    operation: Operation,
}

#[derive(Subcommand)]
enum Operation {
    /// Assigns short addresses to every unaddressed gear on the bus.
    Initialise,
    /// Ramps one gear to full brightness, holds a second, then turns it
    /// off, reporting its actual level at each step.
    Blink {
        /// Short address of the gear to blink.
        short_address: u8,
    },
    /// Reports the actual level of short addresses 0 through 5.
    Info,
    /// Turns every gear on the bus off.
    Off,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let transport = LinuxTransport::open(&cli.i2c_device, u16::from(cli.address))
        .with_context(|| format!("failed to open I2C transport at {}", cli.i2c_device))?;
    let mut adapter = LW14Adapter::new(transport);

    match cli.operation {
        Operation::Initialise => run_initialise(&mut adapter),
        Operation::Blink { short_address } => run_blink(&mut adapter, short_address),
        Operation::Info => run_info(&mut adapter),
        Operation::Off => {
            adapter
                .off(Address::Broadcast)
                .context("Off")?;
            Ok(())
        }
    }
}

fn run_initialise(adapter: &mut LW14Adapter<LinuxTransport>) -> Result<()> {
    let gear = commission(adapter).context("commissioning run failed")?;
    for g in &gear {
        info!(
            "short address {} <- BRN {:#08x} (id {:?})",
            g.short_address,
            g.random_address.value(),
            g.identification_number
        );
    }
    info!("commissioned {} gear", gear.len());
    Ok(())
}

fn run_blink(adapter: &mut LW14Adapter<LinuxTransport>, short_address: u8) -> Result<()> {
    let gear = Address::short(short_address);

    let level = adapter.query_actual_level(gear).context("QueryActualLevel")?;
    info!("QueryActualLevel: {level}");

    adapter.direct_arc(gear, 254).context("DirectArc on")?;
    sleep(Duration::from_secs(1));

    let level = adapter.query_actual_level(gear).context("QueryActualLevel")?;
    info!("QueryActualLevel: {level}");

    adapter.direct_arc(gear, 0).context("DirectArc off")?;

    let level = adapter.query_actual_level(gear).context("QueryActualLevel")?;
    info!("QueryActualLevel: {level}");

    Ok(())
}

fn run_info(adapter: &mut LW14Adapter<LinuxTransport>) -> Result<()> {
    for short_address in 0u8..6 {
        let gear = Address::short(short_address);
        let level = adapter.query_actual_level(gear).context("QueryActualLevel")?;
        info!("{short_address} QueryActualLevel: {level}");
    }
    Ok(())
}
