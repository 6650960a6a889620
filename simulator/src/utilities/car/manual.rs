//! ----- MANUAL OVERRIDE -----

use log::info;

use shared_resources::car_status::{Direction, DoorStatus, RunStatus};
use shared_resources::error::FleetError;
use shared_resources::message::ManualCommand;

use super::Car;

impl Car {
    /// Flips manual mode. Entering it hands the car to the operator and drops
    /// any pending door close; leaving it returns the car to automatic service.
    pub fn toggle_manual(&mut self) {
        self.manual_mode = !self.manual_mode;
        if self.manual_mode {
            self.run_status = RunStatus::ManualRun;
            self.cancel_door_timer();
        } else {
            self.direction = Direction::Idle;
            self.run_status = RunStatus::AutoRun;
        }
        info!("Elevator {} manual mode set to {}", self.id, self.manual_mode);
    }

    /// Applies one operator command. The car is left untouched on error.
    pub fn apply_manual(&mut self, command: &str) -> Result<(), FleetError> {
        if !self.manual_mode {
            return Err(FleetError::PreconditionFailed(format!(
                "Elevator {} is not in manual mode.",
                self.id
            )));
        }
        let command: ManualCommand = command.parse()?;
        let index = self.floor_index(&self.current_floor);

        match command {
            ManualCommand::Up => match index {
                Some(index) if index > 0 => {
                    self.current_floor = self.service_floors[index - 1].clone();
                    self.direction = Direction::Up;
                }
                _ => return Err(FleetError::PreconditionFailed("Cannot go up from top floor.".to_string())),
            },
            ManualCommand::Down => match index {
                Some(index) if index + 1 < self.service_floors.len() => {
                    self.current_floor = self.service_floors[index + 1].clone();
                    self.direction = Direction::Down;
                }
                _ => {
                    return Err(FleetError::PreconditionFailed(
                        "Cannot go down from bottom floor.".to_string(),
                    ))
                }
            },
            ManualCommand::Stop => self.direction = Direction::Idle,
            ManualCommand::Open => self.door_status = DoorStatus::Open,
            ManualCommand::Close => self.door_status = DoorStatus::Closed,
        }

        info!(
            "Elevator {} manual command {}, now at {}",
            self.id, command, self.current_floor
        );
        Ok(())
    }
}
