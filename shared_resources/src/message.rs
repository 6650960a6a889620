use std::fmt;
use std::str::FromStr;

use super::car_status::CarSnapshot;
use super::error::FleetError;
use super::report::{MonthlyReport, ReportQuery};

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Request {
    Fleet,
    Report(ReportQuery),
    ResolveEmergency { id: u8 },
    ToggleManual { id: u8 },
    ManualCommand { id: u8, command: String },
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", content = "body", rename_all = "kebab-case")]
pub enum Response {
    Fleet(Vec<CarSnapshot>),
    Car(CarSnapshot),
    Report(MonthlyReport),
    Ack { message: String },
    Error(ErrorBody),
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorBody {
    pub status: u16,
    pub kind: String,
    pub error: String,
}

impl From<FleetError> for Response {
    fn from(e: FleetError) -> Self {
        Response::Error(ErrorBody {
            status: e.status_code(),
            kind: e.kind().to_string(),
            error: e.to_string(),
        })
    }
}

/// Discrete commands accepted by a car in manual mode.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ManualCommand {
    Up,
    Down,
    Stop,
    Open,
    Close,
}

impl FromStr for ManualCommand {
    type Err = FleetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(ManualCommand::Up),
            "down" => Ok(ManualCommand::Down),
            "stop" => Ok(ManualCommand::Stop),
            "open" => Ok(ManualCommand::Open),
            "close" => Ok(ManualCommand::Close),
            _ => Err(FleetError::InvalidArgument(format!("Unknown command: {}", s))),
        }
    }
}

impl fmt::Display for ManualCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ManualCommand::Up => "up",
            ManualCommand::Down => "down",
            ManualCommand::Stop => "stop",
            ManualCommand::Open => "open",
            ManualCommand::Close => "close",
        };
        f.write_str(name)
    }
}
