//! ----- CAR -----
//! State of a single elevator car. Fields are private to this module tree;
//! the fleet drives a car only through the transitions in `fsm` and
//! `manual`.

use std::time::Duration;

use log::debug;

use shared_resources::call::{HallCall, HallDirection};
use shared_resources::car_status::{CarSnapshot, Direction, DoorStatus, RunStatus};
use shared_resources::config::CarSettings;
use shared_resources::floors::FloorOrder;

use super::dice::Dice;
use super::emergency::EmergencyThrottle;

mod fsm;
mod manual;

pub use fsm::Motion;

/// Most car calls a car keeps queued at once.
pub const MAX_CAR_CALLS: usize = 3;

#[derive(Debug, Clone)]
struct QueuedCarCall {
    floor: String,
    seq: u64,
}

#[derive(Debug, Clone)]
struct QueuedHallCall {
    call: HallCall,
    seq: u64,
}

#[derive(Debug, Clone)]
pub struct Car {
    id: u8,
    name: String,
    service_floors: Vec<String>,
    current_floor: String,
    direction: Direction,
    door_status: DoorStatus,
    car_calls: Vec<QueuedCarCall>,
    hall_calls: Vec<QueuedHallCall>,
    run_status: RunStatus,
    manual_mode: bool,
    emergency: EmergencyThrottle,
    run_time_minutes: u32,
    seconds_counter: u64,
    startup_count: u32,
    last_direction: Direction,
    // token of the door close this car is waiting for
    door_timer: Option<u64>,
    next_seq: u64,
}

impl Car {
    pub fn new(settings: &CarSettings) -> Self {
        Car {
            id: settings.id,
            name: settings.name.clone(),
            service_floors: settings.service_floors.clone(),
            current_floor: settings.starting_floor.clone(),
            direction: Direction::Idle,
            door_status: DoorStatus::Closed,
            car_calls: Vec::new(),
            hall_calls: Vec::new(),
            run_status: RunStatus::AutoRun,
            manual_mode: false,
            emergency: EmergencyThrottle::default(),
            run_time_minutes: settings.run_time_minutes,
            seconds_counter: 0,
            startup_count: settings.startup_count,
            last_direction: Direction::Idle,
            door_timer: None,
            next_seq: 0,
        }
    }

    pub fn id(&self) -> u8 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn service_floors(&self) -> &[String] {
        &self.service_floors
    }

    pub fn current_floor(&self) -> &str {
        &self.current_floor
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn door_status(&self) -> DoorStatus {
        self.door_status
    }

    pub fn run_status(&self) -> RunStatus {
        self.run_status
    }

    pub fn is_manual(&self) -> bool {
        self.manual_mode
    }

    pub fn emergency(&self) -> &EmergencyThrottle {
        &self.emergency
    }

    pub fn run_time_minutes(&self) -> u32 {
        self.run_time_minutes
    }

    pub fn seconds_counter(&self) -> u64 {
        self.seconds_counter
    }

    pub fn startup_count(&self) -> u32 {
        self.startup_count
    }

    pub fn door_timer(&self) -> Option<u64> {
        self.door_timer
    }

    pub fn car_calls(&self) -> impl Iterator<Item = &str> {
        self.car_calls.iter().map(|queued| queued.floor.as_str())
    }

    pub fn hall_calls(&self) -> impl Iterator<Item = &HallCall> {
        self.hall_calls.iter().map(|queued| &queued.call)
    }

    pub fn serves(&self, floor: &str) -> bool {
        self.service_floors.iter().any(|f| f == floor)
    }

    pub fn has_hall_call(&self, floor: &str) -> bool {
        self.hall_calls.iter().any(|queued| queued.call.floor == floor)
    }

    /// Whether the dispatcher may hand this car a hall call.
    pub fn accepts_hall_calls(&self) -> bool {
        !self.manual_mode && self.run_status.is_operating()
    }

    /// Queues a hall call unless one is already queued for `floor`.
    pub fn enqueue_hall_call(&mut self, floor: &str, direction: HallDirection) -> bool {
        if self.has_hall_call(floor) {
            return false;
        }
        let seq = self.take_seq();
        self.hall_calls.push(QueuedHallCall {
            call: HallCall::new(floor, direction),
            seq,
        });
        true
    }

    /// Queues a car call unless it targets the current floor or is already
    /// queued. Only the first `MAX_CAR_CALLS` calls are kept.
    pub fn enqueue_car_call(&mut self, floor: &str) -> bool {
        if floor == self.current_floor || self.car_calls.iter().any(|queued| queued.floor == floor) {
            return false;
        }
        let seq = self.take_seq();
        self.car_calls.push(QueuedCarCall {
            floor: floor.to_string(),
            seq,
        });
        self.car_calls.truncate(MAX_CAR_CALLS);
        self.car_calls.iter().any(|queued| queued.seq == seq)
    }

    pub fn try_trigger_emergency(&mut self, now: Duration, cooldown: Duration, p: f64, dice: &mut impl Dice) -> bool {
        self.emergency.try_trigger(now, cooldown, p, dice)
    }

    pub fn resolve_emergency(&mut self) {
        self.emergency.resolve();
    }

    pub fn arm_door_timer(&mut self, token: u64) {
        self.door_timer = Some(token);
    }

    pub fn cancel_door_timer(&mut self) {
        if let Some(token) = self.door_timer.take() {
            debug!("Elevator {} cancelled door close #{}", self.id, token);
        }
    }

    /// Closes the doors if `token` is the close this car still waits for.
    pub fn door_timer_fired(&mut self, token: u64) -> bool {
        if self.door_timer != Some(token) {
            return false;
        }
        self.door_timer = None;
        self.door_status = DoorStatus::Closed;
        debug!("Elevator {} doors closed", self.id);
        true
    }

    pub fn snapshot(&self, floors: &FloorOrder) -> CarSnapshot {
        let car_calls: Vec<String> = self.car_calls().map(String::from).collect();

        let mut sorted_car_calls = car_calls.clone();
        floors.sort(&mut sorted_car_calls);

        let mut sorted_calls = car_calls.clone();
        sorted_calls.extend(self.hall_calls().map(|call| call.floor.clone()));
        floors.sort(&mut sorted_calls);
        sorted_calls.dedup();

        CarSnapshot {
            id: self.id,
            name: self.name.clone(),
            service_floors: self.service_floors.clone(),
            current_floor: self.current_floor.clone(),
            direction: self.direction,
            door_status: self.door_status,
            car_calls_count: car_calls.len(),
            next_target: car_calls.first().cloned(),
            car_calls,
            hall_calls: self.hall_calls().cloned().collect(),
            run_status: self.run_status,
            manual_mode: self.manual_mode,
            emergency_call: self.emergency.is_active(),
            last_emergency_time: self.emergency.last_triggered().map(|t| t.as_millis() as u64),
            run_time_minutes: self.run_time_minutes,
            seconds_counter: self.seconds_counter,
            startup_count: self.startup_count,
            last_direction: self.last_direction,
            sorted_car_calls,
            sorted_calls,
        }
    }

    fn take_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    fn floor_index(&self, floor: &str) -> Option<usize> {
        self.service_floors.iter().position(|f| f == floor)
    }

    fn has_call_at(&self, floor: &str) -> bool {
        self.car_calls.iter().any(|queued| queued.floor == floor) || self.has_hall_call(floor)
    }

    fn remove_calls_at(&mut self, floor: &str) {
        self.car_calls.retain(|queued| queued.floor != floor);
        self.hall_calls.retain(|queued| queued.call.floor != floor);
    }

    fn clear_calls(&mut self) {
        self.car_calls.clear();
        self.hall_calls.clear();
    }

    /// Floor of the call queued longest ago, car and hall calls alike.
    fn oldest_call(&self) -> Option<&str> {
        let car = self.car_calls.iter().map(|queued| (queued.seq, queued.floor.as_str()));
        let hall = self.hall_calls.iter().map(|queued| (queued.seq, queued.call.floor.as_str()));
        car.chain(hall).min_by_key(|(seq, _)| *seq).map(|(_, floor)| floor)
    }

    #[cfg(test)]
    pub(crate) fn set_run_status(&mut self, run_status: RunStatus) {
        self.run_status = run_status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn settings(id: u8, floors: &[&str], start: &str) -> CarSettings {
        CarSettings {
            id,
            name: format!("Elevator {}", id),
            service_floors: floors.iter().map(|f| f.to_string()).collect(),
            starting_floor: start.to_string(),
            run_time_minutes: 0,
            startup_count: 0,
        }
    }

    const FLOORS: [&str; 5] = ["5F", "4F", "3F", "2F", "1F"];

    #[test]
    fn car_calls_are_capped_and_fifo() {
        let mut car = Car::new(&settings(1, &FLOORS, "1F"));
        assert!(car.enqueue_car_call("3F"));
        assert!(car.enqueue_car_call("5F"));
        assert!(car.enqueue_car_call("2F"));
        assert!(!car.enqueue_car_call("4F"));
        assert_eq!(car.car_calls().collect::<Vec<_>>(), vec!["3F", "5F", "2F"]);
    }

    #[test]
    fn car_call_to_current_or_queued_floor_is_ignored() {
        let mut car = Car::new(&settings(1, &FLOORS, "1F"));
        assert!(!car.enqueue_car_call("1F"));
        assert!(car.enqueue_car_call("4F"));
        assert!(!car.enqueue_car_call("4F"));
        assert_eq!(car.car_calls().count(), 1);
    }

    #[test]
    fn one_hall_call_per_floor() {
        let mut car = Car::new(&settings(1, &FLOORS, "1F"));
        assert!(car.enqueue_hall_call("3F", HallDirection::Up));
        assert!(!car.enqueue_hall_call("3F", HallDirection::Down));
        assert_eq!(car.hall_calls().count(), 1);
    }

    #[test]
    fn oldest_call_spans_both_queues() {
        let mut car = Car::new(&settings(1, &FLOORS, "1F"));
        car.enqueue_hall_call("4F", HallDirection::Down);
        car.enqueue_car_call("2F");
        assert_eq!(car.oldest_call(), Some("4F"));
    }

    #[test]
    fn stale_door_timer_is_ignored() {
        let mut car = Car::new(&settings(1, &FLOORS, "1F"));
        car.door_status = DoorStatus::Open;
        car.arm_door_timer(4);
        assert!(!car.door_timer_fired(3));
        assert_eq!(car.door_status(), DoorStatus::Open);
        assert!(car.door_timer_fired(4));
        assert_eq!(car.door_status(), DoorStatus::Closed);
    }

    #[test]
    fn snapshot_sorts_calls_by_floor_order() {
        let floors = FloorOrder::new(FLOORS.iter().map(|f| f.to_string()).collect());
        let mut car = Car::new(&settings(1, &FLOORS, "1F"));
        car.enqueue_car_call("2F");
        car.enqueue_car_call("5F");
        car.enqueue_hall_call("3F", HallDirection::Up);
        car.enqueue_hall_call("2F", HallDirection::Down);

        let snapshot = car.snapshot(&floors);
        assert_eq!(snapshot.car_calls, vec!["2F", "5F"]);
        assert_eq!(snapshot.sorted_car_calls, vec!["5F", "2F"]);
        assert_eq!(snapshot.sorted_calls, vec!["5F", "3F", "2F"]);
        assert_eq!(snapshot.car_calls_count, 2);
        assert_eq!(snapshot.next_target.as_deref(), Some("2F"));
    }
}
