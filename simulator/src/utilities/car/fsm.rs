//! ----- CAR STATE MACHINE -----
//! Per-tick transitions of one car: run-status evolution, statistics,
//! outage handling, halting and normal service.

use std::time::Duration;

use log::{debug, info};

use shared_resources::car_status::{Direction, DoorStatus, RunStatus};

use super::Car;
use crate::utilities::dice::Dice;

/// What a car in service did this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    /// Arrived at a requested floor; doors need a delayed close.
    DoorsOpened,
    Moved,
    Stayed,
}

impl Car {
    /// Rolls a new run status with probability `p`. While the outage is still
    /// held, a car in `OutageRun` keeps it whatever the roll says.
    pub fn evolve_status(&mut self, is_emergency_car: bool, outage_holds: bool, p: f64, dice: &mut impl Dice) {
        if !dice.chance(p) {
            return;
        }
        if self.run_status == RunStatus::OutageRun && outage_holds {
            debug!("Elevator {} held in outage operation", self.id);
            return;
        }
        let choices: &[RunStatus] = if is_emergency_car {
            &RunStatus::EMERGENCY_CAR_ROLLS
        } else {
            &RunStatus::REGULAR_CAR_ROLLS
        };
        let next = choices[dice.pick(choices.len())];
        if next != self.run_status {
            info!(
                "Elevator {} run status {} -> {}",
                self.id,
                self.run_status.as_str(),
                next.as_str()
            );
        }
        self.run_status = next;
    }

    /// Accumulates run time while operating and counts idle -> moving edges.
    pub fn update_statistics(&mut self, elapsed: Duration) {
        if self.run_status.is_operating() {
            self.seconds_counter += elapsed.as_secs();
            while self.seconds_counter >= 60 {
                self.run_time_minutes += 1;
                self.seconds_counter -= 60;
                info!("Elevator {} run time now {} minutes", self.id, self.run_time_minutes);
            }
        }
        if self.last_direction == Direction::Idle && self.direction != Direction::Idle {
            self.startup_count += 1;
            info!("Elevator {} startup count now {}", self.id, self.startup_count);
        }
        self.last_direction = self.direction;
    }

    /// Parks the car with open doors while the emergency car runs on outage power.
    pub fn enter_outage_stop(&mut self) {
        if self.run_status != RunStatus::OutageStop {
            info!("Elevator {} stopped by power outage", self.id);
        }
        self.clear_calls();
        self.direction = Direction::Idle;
        self.door_status = DoorStatus::Open;
        self.run_status = RunStatus::OutageStop;
        self.cancel_door_timer();
    }

    /// Returns an outage-stopped car to automatic operation.
    pub fn leave_outage_stop(&mut self) -> bool {
        if self.run_status != RunStatus::OutageStop {
            return false;
        }
        self.run_status = RunStatus::AutoRun;
        self.door_status = DoorStatus::Closed;
        info!("Elevator {} power restored, back in automatic operation", self.id);
        true
    }

    /// Idle and faulted cars drop their calls and stand with closed doors.
    pub fn halt(&mut self) {
        self.clear_calls();
        self.direction = Direction::Idle;
        self.door_status = DoorStatus::Closed;
        self.cancel_door_timer();
    }

    pub fn hold_doors_open(&mut self) {
        self.door_status = DoorStatus::Open;
        self.cancel_door_timer();
    }

    /// One tick of normal service: maybe a rider presses a car button, then
    /// the car opens at a requested floor or travels one floor.
    ///
    /// Index 0 of the service floors is the top floor, and travelling toward
    /// a larger index is called `Down`.
    pub fn serve(&mut self, car_call_probability: f64, dice: &mut impl Dice) -> Motion {
        if dice.chance(car_call_probability) {
            let floor = self.service_floors[dice.pick(self.service_floors.len())].clone();
            if self.enqueue_car_call(&floor) {
                info!("Elevator {} car call to {}", self.id, floor);
            }
        }

        if self.has_call_at(&self.current_floor) {
            let floor = self.current_floor.clone();
            self.direction = Direction::Idle;
            self.door_status = DoorStatus::Open;
            self.remove_calls_at(&floor);
            debug!("Elevator {} opened doors at {}", self.id, floor);
            return Motion::DoorsOpened;
        }

        let current = match self.floor_index(&self.current_floor) {
            Some(index) => index,
            None => {
                self.direction = Direction::Idle;
                return Motion::Stayed;
            }
        };

        if self.direction == Direction::Idle {
            let target = self.oldest_call().and_then(|floor| self.floor_index(floor));
            if let Some(target) = target {
                self.direction = if target > current { Direction::Down } else { Direction::Up };
            }
        }

        match self.direction {
            Direction::Up if current > 0 => {
                self.current_floor = self.service_floors[current - 1].clone();
                Motion::Moved
            }
            Direction::Down if current + 1 < self.service_floors.len() => {
                self.current_floor = self.service_floors[current + 1].clone();
                Motion::Moved
            }
            _ => {
                self.direction = Direction::Idle;
                Motion::Stayed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utilities::car::tests::settings;
    use crate::utilities::dice::RandDice;
    use shared_resources::call::HallDirection;

    const FLOORS: [&str; 5] = ["5F", "4F", "3F", "2F", "1F"];

    fn dice() -> RandDice {
        RandDice::new(Some(11))
    }

    #[test]
    fn travels_toward_larger_index_as_down() {
        let mut car = Car::new(&settings(1, &FLOORS, "3F"));
        car.enqueue_car_call("1F");
        assert_eq!(car.serve(0.0, &mut dice()), Motion::Moved);
        assert_eq!(car.direction(), Direction::Down);
        assert_eq!(car.current_floor(), "2F");
    }

    #[test]
    fn travels_toward_smaller_index_as_up() {
        let mut car = Car::new(&settings(1, &FLOORS, "3F"));
        car.enqueue_hall_call("5F", HallDirection::Down);
        car.serve(0.0, &mut dice());
        assert_eq!(car.direction(), Direction::Up);
        assert_eq!(car.current_floor(), "4F");
    }

    #[test]
    fn opens_at_requested_floor_and_clears_it() {
        let mut car = Car::new(&settings(1, &FLOORS, "3F"));
        car.enqueue_car_call("2F");
        car.enqueue_hall_call("2F", HallDirection::Up);
        let mut dice = dice();
        car.serve(0.0, &mut dice);
        assert_eq!(car.serve(0.0, &mut dice), Motion::DoorsOpened);
        assert_eq!(car.direction(), Direction::Idle);
        assert_eq!(car.door_status(), DoorStatus::Open);
        assert_eq!(car.car_calls().count(), 0);
        assert_eq!(car.hall_calls().count(), 0);
    }

    #[test]
    fn boundary_turns_car_idle() {
        let mut car = Car::new(&settings(1, &FLOORS, "5F"));
        car.direction = Direction::Up;
        assert_eq!(car.serve(0.0, &mut dice()), Motion::Stayed);
        assert_eq!(car.direction(), Direction::Idle);
        assert_eq!(car.current_floor(), "5F");
    }

    #[test]
    fn keeps_heading_once_moving() {
        let mut car = Car::new(&settings(1, &FLOORS, "3F"));
        car.enqueue_car_call("1F");
        let mut dice = dice();
        car.serve(0.0, &mut dice);
        car.enqueue_car_call("5F");
        car.serve(0.0, &mut dice);
        assert_eq!(car.current_floor(), "1F");
        assert_eq!(car.serve(0.0, &mut dice), Motion::DoorsOpened);
    }

    #[test]
    fn outage_run_is_held() {
        let mut car = Car::new(&settings(5, &FLOORS, "1F"));
        car.set_run_status(RunStatus::OutageRun);
        let mut dice = dice();
        for _ in 0..50 {
            car.evolve_status(true, true, 1.0, &mut dice);
            assert_eq!(car.run_status(), RunStatus::OutageRun);
        }
    }

    #[test]
    fn regular_cars_never_roll_outage_run() {
        let mut car = Car::new(&settings(1, &FLOORS, "1F"));
        let mut dice = dice();
        for _ in 0..200 {
            car.evolve_status(false, false, 1.0, &mut dice);
            assert_ne!(car.run_status(), RunStatus::OutageRun);
        }
    }

    #[test]
    fn run_time_rolls_over_every_minute() {
        let mut car = Car::new(&settings(1, &FLOORS, "1F"));
        for _ in 0..31 {
            car.update_statistics(Duration::from_secs(2));
        }
        assert_eq!(car.run_time_minutes(), 1);
        assert_eq!(car.seconds_counter(), 2);
    }

    #[test]
    fn halted_car_accumulates_no_run_time() {
        let mut car = Car::new(&settings(1, &FLOORS, "1F"));
        car.set_run_status(RunStatus::Fault);
        car.update_statistics(Duration::from_secs(2));
        assert_eq!(car.seconds_counter(), 0);
    }

    #[test]
    fn startup_counted_once_per_departure() {
        let mut car = Car::new(&settings(1, &FLOORS, "1F"));
        car.direction = Direction::Up;
        car.update_statistics(Duration::from_secs(2));
        car.update_statistics(Duration::from_secs(2));
        assert_eq!(car.startup_count(), 1);
        car.direction = Direction::Idle;
        car.update_statistics(Duration::from_secs(2));
        car.direction = Direction::Down;
        car.update_statistics(Duration::from_secs(2));
        assert_eq!(car.startup_count(), 2);
    }

    #[test]
    fn outage_stop_opens_doors_and_cancels_close() {
        let mut car = Car::new(&settings(1, &FLOORS, "3F"));
        car.enqueue_car_call("1F");
        car.enqueue_hall_call("5F", HallDirection::Down);
        car.arm_door_timer(9);
        car.enter_outage_stop();
        assert_eq!(car.run_status(), RunStatus::OutageStop);
        assert_eq!(car.door_status(), DoorStatus::Open);
        assert_eq!(car.car_calls().count() + car.hall_calls().count(), 0);
        assert!(!car.door_timer_fired(9));
        assert_eq!(car.door_status(), DoorStatus::Open);

        assert!(car.leave_outage_stop());
        assert_eq!(car.run_status(), RunStatus::AutoRun);
        assert_eq!(car.door_status(), DoorStatus::Closed);
    }

    #[test]
    fn halt_clears_calls() {
        let mut car = Car::new(&settings(1, &FLOORS, "3F"));
        car.enqueue_car_call("1F");
        car.direction = Direction::Down;
        car.halt();
        assert_eq!(car.car_calls().count(), 0);
        assert_eq!(car.direction(), Direction::Idle);
        assert_eq!(car.door_status(), DoorStatus::Closed);
    }
}
