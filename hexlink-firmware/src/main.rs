//! hexlink - ASCII register bus node
//!
//! Firmware for RP2040 boards acting as a master or a slave on a hexlink
//! serial bus. The role, device id and polling settings come from
//! `node.toml`, which is embedded at build time.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use hexlink_core::config::parse_config;
use hexlink_core::{NodeConfig, Role};

/// Embedded node configuration (compiled into firmware)
/// Edit node.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../node.toml");

mod channels;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 64]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("hexlink node starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config();
    info!(
        "Role {:?}, device id {=u8:X}, {} baud",
        config.role, config.device_id, config.baudrate
    );

    // Bus UART on GPIO0 (TX) / GPIO1 (RX)
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = config.baudrate;

    let tx_buf = TX_BUF.init([0u8; 64]);
    let rx_buf = RX_BUF.init([0u8; 64]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("UART initialized for bus communication");

    spawner
        .spawn(tasks::link_rx_task(rx, config.role, config.device_id))
        .unwrap();
    spawner.spawn(tasks::link_tx_task(tx)).unwrap();
    if config.role == Role::Master {
        spawner.spawn(tasks::master_task(config.master)).unwrap();
    }

    info!("All tasks spawned, node running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Parse and validate the embedded configuration
///
/// Falls back to defaults (slave, id 0x01) if node.toml is unusable. build.rs
/// rejects such files, so this only happens with a hand-edited image.
fn load_config() -> NodeConfig {
    let config = match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to parse node.toml: {:?}", e);
            return NodeConfig::default();
        }
    };

    match config.validate() {
        Ok(()) => {
            info!("Parsed embedded configuration successfully");
            config
        }
        Err(e) => {
            error!("Invalid node.toml: {:?}; using defaults", e);
            NodeConfig::default()
        }
    }
}
