//! ----- DRIVER MODULE -----
//! The only thread that touches the fleet. It advances the simulation on a
//! fixed tick, closes doors when their timers run out and applies client
//! requests between ticks, so every reply reflects a whole tick.

use std::time::{Duration, Instant};

use crossbeam_channel::{at, never, select, tick, Receiver, Sender};
use log::{debug, info, warn};

use shared_resources::error::FleetError;
use shared_resources::message::{Request, Response};

use crate::utilities::dice::Dice;
use crate::utilities::fleet::Fleet;

/// A request together with the channel its reply goes back on. The
/// requester stops waiting at `deadline`, so the driver leaves the request
/// unapplied once it has passed.
pub struct Envelope {
    pub request: Request,
    pub reply: Sender<Response>,
    pub deadline: Instant,
}

pub fn main(mut fleet: Fleet, mut dice: impl Dice, tick_period: Duration, requests_rx: Receiver<Envelope>) {
    let start = Instant::now();
    let ticker = tick(tick_period);
    info!("Simulation started, {} cars, tick every {:?}", fleet.cars().len(), tick_period);

    loop {
        let door_timer = match fleet.next_door_deadline() {
            Some(deadline) => at(start + deadline),
            None => never(),
        };

        select! {
            recv(ticker) -> _ => {
                fleet.tick(start.elapsed(), &mut dice);
            },
            recv(door_timer) -> _ => {
                fleet.fire_door_timers(start.elapsed());
            },
            recv(requests_rx) -> msg => {
                let envelope = match msg {
                    Ok(envelope) => envelope,
                    Err(_) => {
                        info!("Request channel closed, stopping simulation");
                        return;
                    }
                };
                if Instant::now() >= envelope.deadline {
                    warn!("Dropping {:?}, requester stopped waiting", envelope.request);
                    continue;
                }
                debug!("Driver handling {:?}", envelope.request);
                let response = handle(&mut fleet, envelope.request);
                if envelope.reply.send(response).is_err() {
                    warn!("Requester left before the reply was sent");
                }
            }
        }
    }
}

/// Applies one request to the fleet.
pub fn handle(fleet: &mut Fleet, request: Request) -> Response {
    let result = match request {
        Request::Fleet => Ok(Response::Fleet(fleet.snapshot())),
        Request::ResolveEmergency { id } => fleet
            .resolve_emergency(id)
            .map(|message| Response::Ack { message }),
        Request::ToggleManual { id } => fleet.toggle_manual(id).map(Response::Car),
        Request::ManualCommand { id, command } => fleet.manual_command(id, &command).map(Response::Car),
        Request::Report(_) => Err(FleetError::Internal(
            "report requests are not handled by the driver".to_string(),
        )),
    };
    result.unwrap_or_else(Response::from)
}
