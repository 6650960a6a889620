//! ----- FLEET -----
//! Owns every car together with the outage coordinator and the pending
//! door closes. All mutation of the simulated building goes through here.

use std::time::Duration;

use log::{debug, info, warn};

use shared_resources::car_status::{CarSnapshot, RunStatus};
use shared_resources::config::{FleetConfig, SimulationConfig};
use shared_resources::error::FleetError;
use shared_resources::floors::FloorOrder;

use super::car::{Car, Motion};
use super::dice::Dice;
use super::dispatch::dispatch_hall_call;
use super::doors::DoorTimers;
use super::outage::OutageCoordinator;

pub struct Fleet {
    floors: FloorOrder,
    emergency_car: u8,
    cars: Vec<Car>,
    simulation: SimulationConfig,
    outage: OutageCoordinator,
    doors: DoorTimers,
}

impl Fleet {
    pub fn new(config: &FleetConfig, simulation: &SimulationConfig) -> Self {
        Fleet {
            floors: config.floors.clone(),
            emergency_car: config.emergency_car,
            cars: config.cars.iter().map(Car::new).collect(),
            simulation: simulation.clone(),
            outage: OutageCoordinator::new(simulation.outage_min_duration()),
            doors: DoorTimers::new(),
        }
    }

    pub fn emergency_car(&self) -> u8 {
        self.emergency_car
    }

    pub fn car(&self, id: u8) -> Option<&Car> {
        self.cars.iter().find(|car| car.id() == id)
    }

    pub fn cars(&self) -> &[Car] {
        &self.cars
    }

    pub fn outage(&self) -> &OutageCoordinator {
        &self.outage
    }

    /// Advances the whole fleet by one tick at simulation time `now`.
    ///
    /// Every car's run status evolves before any car looks at the emergency
    /// car, so outage propagation sees this tick's status.
    pub fn tick(&mut self, now: Duration, dice: &mut impl Dice) {
        self.fire_door_timers(now);

        dispatch_hall_call(&mut self.cars, &self.floors, self.simulation.hall_call_probability, dice);

        let outage_running = self.cars.iter().any(|car| car.run_status() == RunStatus::OutageRun);
        self.outage.observe(outage_running, now);
        let outage_holds = self.outage.holds(now);

        let elapsed = self.simulation.tick_period();
        for car in self.cars.iter_mut().filter(|car| !car.is_manual()) {
            let is_emergency_car = car.id() == self.emergency_car;
            car.evolve_status(
                is_emergency_car,
                outage_holds,
                self.simulation.status_change_probability,
                dice,
            );
            car.update_statistics(elapsed);
        }

        let emergency_car_in_outage = self
            .car(self.emergency_car)
            .map_or(false, |car| car.run_status() == RunStatus::OutageRun);

        for car in self.cars.iter_mut().filter(|car| !car.is_manual()) {
            if emergency_car_in_outage && car.id() != self.emergency_car {
                car.enter_outage_stop();
                continue;
            }
            if !emergency_car_in_outage {
                car.leave_outage_stop();
            }

            if car.try_trigger_emergency(
                now,
                self.simulation.emergency_cooldown(),
                self.simulation.emergency_probability,
                dice,
            ) {
                warn!("Elevator {} raised an emergency call", car.id());
            }

            match car.run_status() {
                RunStatus::AutoIdle | RunStatus::Fault => car.halt(),
                RunStatus::OutageStop => car.hold_doors_open(),
                RunStatus::AutoRun | RunStatus::OutageRun => {
                    if car.serve(self.simulation.car_call_probability, dice) == Motion::DoorsOpened {
                        let token = self.doors.schedule(car.id(), now + self.simulation.door_close_delay());
                        car.arm_door_timer(token);
                    }
                }
                RunStatus::ManualRun => (),
            }
        }
    }

    /// Deadline of the earliest pending door close, live or cancelled.
    pub fn next_door_deadline(&self) -> Option<Duration> {
        self.doors.next_deadline()
    }

    /// Closes the doors of every car whose close is due at `now`.
    pub fn fire_door_timers(&mut self, now: Duration) {
        for (id, token) in self.doors.pop_due(now) {
            match self.cars.iter_mut().find(|car| car.id() == id) {
                Some(car) => {
                    if !car.door_timer_fired(token) {
                        debug!("Ignored stale door close #{} for elevator {}", token, id);
                    }
                }
                None => warn!("Door close #{} for unknown elevator {}", token, id),
            }
        }
    }

    pub fn snapshot(&self) -> Vec<CarSnapshot> {
        self.cars.iter().map(|car| car.snapshot(&self.floors)).collect()
    }

    pub fn car_snapshot(&self, id: u8) -> Result<CarSnapshot, FleetError> {
        self.car(id)
            .map(|car| car.snapshot(&self.floors))
            .ok_or(FleetError::NotFound(id))
    }

    /// Clears the emergency flag of car `id`. Resolving a car without an
    /// active emergency succeeds and changes nothing.
    pub fn resolve_emergency(&mut self, id: u8) -> Result<String, FleetError> {
        let car = self.car_mut(id)?;
        if car.emergency().is_active() {
            info!("Elevator {} emergency resolved", id);
        }
        car.resolve_emergency();
        Ok(format!("Elevator {} emergency resolved.", id))
    }

    pub fn toggle_manual(&mut self, id: u8) -> Result<CarSnapshot, FleetError> {
        self.car_mut(id)?.toggle_manual();
        self.car_snapshot(id)
    }

    pub fn manual_command(&mut self, id: u8, command: &str) -> Result<CarSnapshot, FleetError> {
        self.car_mut(id)?.apply_manual(command)?;
        self.car_snapshot(id)
    }

    fn car_mut(&mut self, id: u8) -> Result<&mut Car, FleetError> {
        self.cars
            .iter_mut()
            .find(|car| car.id() == id)
            .ok_or(FleetError::NotFound(id))
    }

    #[cfg(test)]
    pub(crate) fn car_for_test(&mut self, id: u8) -> &mut Car {
        self.cars
            .iter_mut()
            .find(|car| car.id() == id)
            .expect("car configured in test")
    }
}
