//! ----- HALL CALL DISPATCH -----
//! Generates hall calls for notional riders and assigns each one to a
//! random car that can take it.

use log::{debug, info};

use shared_resources::call::{HallCall, HallDirection};
use shared_resources::floors::FloorOrder;

use super::car::Car;
use super::dice::Dice;

/// Rolls for a new hall call and hands it to an eligible car.
///
/// Returns the receiving car and the call when one was queued. A call no
/// car can take is dropped, it is not kept for a later tick.
pub fn dispatch_hall_call(
    cars: &mut [Car],
    floors: &FloorOrder,
    call_probability: f64,
    dice: &mut impl Dice,
) -> Option<(u8, HallCall)> {
    if floors.is_empty() || !dice.chance(call_probability) {
        return None;
    }
    let floor = floors.get(dice.pick(floors.len()))?.to_string();
    let direction = HallDirection::ALL[dice.pick(HallDirection::ALL.len())];

    let eligible: Vec<usize> = cars
        .iter()
        .enumerate()
        .filter(|(_, car)| car.accepts_hall_calls() && car.serves(&floor))
        .map(|(index, _)| index)
        .collect();

    if eligible.is_empty() {
        debug!("No car can take hall call {} {}, dropped", floor, direction.as_str());
        return None;
    }

    let car = &mut cars[eligible[dice.pick(eligible.len())]];
    if !car.enqueue_hall_call(&floor, direction) {
        debug!("Elevator {} already has a hall call at {}", car.id(), floor);
        return None;
    }
    info!("Hall call {} {} assigned to elevator {}", floor, direction.as_str(), car.id());
    Some((car.id(), HallCall::new(&floor, direction)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utilities::dice::RandDice;
    use shared_resources::car_status::RunStatus;
    use shared_resources::config::CarSettings;

    fn building() -> FloorOrder {
        FloorOrder::new(["2F", "1F", "B1F"].iter().map(|f| f.to_string()).collect())
    }

    fn car(id: u8, floors: &[&str]) -> Car {
        Car::new(&CarSettings {
            id,
            name: format!("Elevator {}", id),
            service_floors: floors.iter().map(|f| f.to_string()).collect(),
            starting_floor: floors[0].to_string(),
            run_time_minutes: 0,
            startup_count: 0,
        })
    }

    #[test]
    fn only_operating_cars_serving_the_floor_receive_calls() {
        let mut cars = vec![car(1, &["2F", "1F"]), car(2, &["2F", "1F", "B1F"]), car(3, &["2F", "1F", "B1F"])];
        cars[1].set_run_status(RunStatus::Fault);
        cars[2].toggle_manual();
        let mut dice = RandDice::new(Some(5));

        for _ in 0..200 {
            if let Some((id, call)) = dispatch_hall_call(&mut cars, &building(), 1.0, &mut dice) {
                assert_eq!(id, 1);
                assert_ne!(call.floor, "B1F");
            }
        }
        assert!(cars[1].hall_calls().next().is_none());
        assert!(cars[2].hall_calls().next().is_none());
    }

    #[test]
    fn call_without_eligible_car_is_dropped() {
        let mut cars = vec![car(1, &["2F", "1F", "B1F"])];
        cars[0].set_run_status(RunStatus::AutoIdle);
        let mut dice = RandDice::new(Some(9));
        for _ in 0..50 {
            assert!(dispatch_hall_call(&mut cars, &building(), 1.0, &mut dice).is_none());
        }
        cars[0].set_run_status(RunStatus::AutoRun);
        assert!(cars[0].hall_calls().next().is_none());
    }

    #[test]
    fn outage_run_car_is_eligible() {
        let mut cars = vec![car(5, &["2F", "1F", "B1F"])];
        cars[0].set_run_status(RunStatus::OutageRun);
        let mut dice = RandDice::new(Some(2));
        let assigned = (0..20).filter_map(|_| dispatch_hall_call(&mut cars, &building(), 1.0, &mut dice)).count();
        assert!(assigned > 0);
    }

    #[test]
    fn at_most_one_hall_call_per_floor() {
        let mut cars = vec![car(1, &["2F", "1F", "B1F"])];
        let mut dice = RandDice::new(Some(4));
        for _ in 0..100 {
            dispatch_hall_call(&mut cars, &building(), 1.0, &mut dice);
        }
        let mut floors: Vec<&str> = cars[0].hall_calls().map(|call| call.floor.as_str()).collect();
        assert_eq!(floors.len(), 3);
        floors.dedup();
        assert_eq!(floors.len(), 3);
    }

    #[test]
    fn zero_probability_never_calls() {
        let mut cars = vec![car(1, &["2F", "1F", "B1F"])];
        let mut dice = RandDice::new(Some(4));
        assert!((0..100).all(|_| dispatch_hall_call(&mut cars, &building(), 0.0, &mut dice).is_none()));
    }
}
