use std::thread;

use anyhow::{anyhow, Context};
use crossbeam_channel::unbounded;
use log::info;

use network_rust::udpnet::rpc::Server;
use shared_resources::config::SimulatorConfig;

use crate::utilities::dice::RandDice;
use crate::utilities::fleet::Fleet;
use crate::utilities::report::ReportGenerator;

pub mod driver;
pub mod network;

pub fn run() -> anyhow::Result<()> {
    // READ CONFIGURATION
    let config = SimulatorConfig::get().context("unable to load configuration")?;

    let server = Server::bind(config.server.port)
        .with_context(|| format!("unable to bind port {}", config.server.port))?;
    info!("Serving requests on {}", server.local_addr()?);

    // INITIALIZE CHANNELS
    let (requests_tx, requests_rx) = unbounded();

    // INITIALIZE THREAD FOR THE SIMULATION
    let driver = {
        let fleet = Fleet::new(&config.fleet, &config.simulation);
        let dice = RandDice::new(config.simulation.seed);
        let tick_period = config.simulation.tick_period();
        thread::Builder::new()
            .name("driver".to_string())
            .spawn(move || driver::main(fleet, dice, tick_period, requests_rx))?
    };

    // INITIALIZE NETWORK MODULE
    let network = {
        let reports = ReportGenerator::new(&config.fleet);
        thread::Builder::new()
            .name("network".to_string())
            .spawn(move || network::main(server, reports, requests_tx))?
    };

    network
        .join()
        .map_err(|_| anyhow!("network thread panicked"))?
        .context("network thread stopped")?;
    driver.join().map_err(|_| anyhow!("driver thread panicked"))?;
    Ok(())
}
