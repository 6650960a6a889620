//! ----- NETWORK MODULE -----
//! Answers client requests arriving over UDP. Reports are generated right
//! here from the static configuration; everything that reads or changes the
//! fleet is forwarded to the driver thread.

use std::io;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Sender};
use log::{error, warn};

use network_rust::udpnet::rpc::Server;
use shared_resources::error::FleetError;
use shared_resources::message::{Request, Response};

use super::driver::Envelope;
use crate::utilities::report::ReportGenerator;

/// How long a request may wait for the driver before it fails.
pub const DRIVER_REPLY_TIMEOUT: Duration = Duration::from_secs(1);

pub fn main(server: Server, reports: ReportGenerator, driver_tx: Sender<Envelope>) -> io::Result<()> {
    server.serve(move |request: Result<Request, serde_json::Error>| {
        answer(&reports, &driver_tx, request, DRIVER_REPLY_TIMEOUT)
    })
}

pub fn answer(
    reports: &ReportGenerator,
    driver_tx: &Sender<Envelope>,
    request: Result<Request, serde_json::Error>,
    reply_timeout: Duration,
) -> Response {
    let result = match request {
        Err(e) => Err(FleetError::InvalidArgument(format!("Malformed request: {}", e))),
        Ok(Request::Report(query)) => reports.query(&query).map(Response::Report),
        Ok(request) => forward(driver_tx, request, reply_timeout),
    };
    match result {
        Ok(response) => response,
        Err(FleetError::Internal(reason)) => {
            error!("Request failed: {}", reason);
            Response::from(FleetError::Internal("request could not be completed".to_string()))
        }
        Err(e) => {
            warn!("Rejected request: {}", e);
            Response::from(e)
        }
    }
}

fn forward(driver_tx: &Sender<Envelope>, request: Request, reply_timeout: Duration) -> Result<Response, FleetError> {
    let (reply_tx, reply_rx) = bounded(1);
    let deadline = Instant::now() + reply_timeout;
    driver_tx
        .send(Envelope {
            request,
            reply: reply_tx,
            deadline,
        })
        .map_err(|_| FleetError::Internal("simulation driver is not running".to_string()))?;
    reply_rx
        .recv_deadline(deadline)
        .map_err(|e| FleetError::Internal(format!("no reply from simulation driver: {}", e)))
}
