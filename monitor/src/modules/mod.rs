use std::env;
use std::io::stdout;

use anyhow::{anyhow, bail, Context};
use crossbeam_channel::{select, tick};
use log::warn;

use network_rust::udpnet::rpc::{self, RpcError};
use shared_resources::config::MonitorConfig;
use shared_resources::message::{Request, Response};
use shared_resources::report::ReportQuery;

mod debug;

use debug::Dashboard;

/// What the monitor was asked to do on the command line.
#[derive(Debug, PartialEq, Eq)]
enum Action {
    Watch,
    Send(Request),
}

pub fn run() -> anyhow::Result<()> {
    // READ CONFIGURATION
    let config = MonitorConfig::get().context("unable to load configuration")?;
    let args: Vec<String> = env::args().skip(1).collect();

    match parse_action(&args)? {
        Action::Watch => watch(&config),
        Action::Send(request) => {
            let response: Response = rpc::call(config.server_addr, &request, config.request_timeout)
                .with_context(|| format!("no answer from simulator at {}", config.server_addr))?;
            print_response(&response)
        }
    }
}

/// Polls the fleet and redraws the table until the process is stopped.
fn watch(config: &MonitorConfig) -> anyhow::Result<()> {
    let mut dashboard = Dashboard::new(stdout());
    let timer = tick(config.poll_period);

    loop {
        select! {
            recv(timer) -> _ => {
                match rpc::call::<Request, Response>(config.server_addr, &Request::Fleet, config.request_timeout) {
                    Ok(Response::Fleet(cars)) => dashboard.printstatus(&cars)?,
                    Ok(other) => warn!("Unexpected reply to fleet request: {:?}", other),
                    Err(RpcError::Timeout) => {
                        dashboard.notice(&format!("simulator at {} not responding", config.server_addr))?
                    }
                    Err(e) => warn!("Fleet request failed, {}", e),
                }
            },
        }
    }
}

fn print_response(response: &Response) -> anyhow::Result<()> {
    match response {
        Response::Ack { message } => println!("{}", message),
        Response::Error(body) => bail!("{} ({}): {}", body.status, body.kind, body.error),
        other => println!("{}", serde_json::to_string_pretty(other)?),
    }
    Ok(())
}

/// Reads the positional arguments, skipping the `--config` and
/// `--serverport` pairs handled by the configuration.
fn parse_action(args: &[String]) -> anyhow::Result<Action> {
    let mut positional = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" | "--serverport" => {
                iter.next();
            }
            _ => positional.push(arg.as_str()),
        }
    }

    let id = |raw: &str| -> anyhow::Result<u8> {
        raw.parse().map_err(|_| anyhow!("{} is not a car id", raw))
    };

    let action = match positional.as_slice() {
        [] | ["watch"] => Action::Watch,
        ["fleet"] => Action::Send(Request::Fleet),
        ["resolve", car] => Action::Send(Request::ResolveEmergency { id: id(*car)? }),
        ["toggle", car] => Action::Send(Request::ToggleManual { id: id(*car)? }),
        ["command", car, command] => Action::Send(Request::ManualCommand {
            id: id(*car)?,
            command: command.to_string(),
        }),
        ["report", year, month, car] => Action::Send(Request::Report(ReportQuery {
            year: year.to_string(),
            month: month.to_string(),
            car_id: car.to_string(),
        })),
        _ => bail!(
            "usage: monitor [--config <path>] [--serverport <port>] \
             [watch | fleet | resolve <id> | toggle <id> | command <id> <up|down|stop|open|close> | report <year> <month> <id>]"
        ),
    };
    Ok(action)
}
