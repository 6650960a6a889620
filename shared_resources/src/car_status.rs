use super::call::HallCall;

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Idle,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Idle => "idle",
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DoorStatus {
    Open,
    Closed,
}

impl DoorStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DoorStatus::Open => "open",
            DoorStatus::Closed => "closed",
        }
    }
}

/// Operating mode of a car.
///
/// `OutageRun` is only ever held by the fleet's emergency car, `OutageStop`
/// by every other car while the emergency car runs on outage power.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum RunStatus {
    AutoRun,
    AutoIdle,
    Fault,
    OutageRun,
    OutageStop,
    ManualRun,
}

impl RunStatus {
    /// Statuses the emergency car may roll into.
    pub const EMERGENCY_CAR_ROLLS: [RunStatus; 4] = [
        RunStatus::AutoRun,
        RunStatus::AutoIdle,
        RunStatus::OutageRun,
        RunStatus::Fault,
    ];

    /// Statuses every other car may roll into.
    pub const REGULAR_CAR_ROLLS: [RunStatus; 3] = [
        RunStatus::AutoRun,
        RunStatus::AutoIdle,
        RunStatus::Fault,
    ];

    /// Whether the car accepts calls and moves in this status.
    pub fn is_operating(self) -> bool {
        matches!(self, RunStatus::AutoRun | RunStatus::OutageRun)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RunStatus::AutoRun => "auto-run",
            RunStatus::AutoIdle => "auto-idle",
            RunStatus::Fault => "fault",
            RunStatus::OutageRun => "outage-run",
            RunStatus::OutageStop => "outage-stop",
            RunStatus::ManualRun => "manual-run",
        }
    }
}

/// Read-only view of one car as served to dashboard clients.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CarSnapshot {
    pub id: u8,
    pub name: String,
    pub service_floors: Vec<String>,
    pub current_floor: String,
    pub direction: Direction,
    pub door_status: DoorStatus,
    pub car_calls: Vec<String>,
    pub hall_calls: Vec<HallCall>,
    pub run_status: RunStatus,
    pub manual_mode: bool,
    pub emergency_call: bool,
    /// Milliseconds since simulator start of the last emergency trigger.
    pub last_emergency_time: Option<u64>,
    pub run_time_minutes: u32,
    pub seconds_counter: u64,
    pub startup_count: u32,
    pub last_direction: Direction,
    pub car_calls_count: usize,
    pub sorted_car_calls: Vec<String>,
    pub sorted_calls: Vec<String>,
    pub next_target: Option<String>,
}
