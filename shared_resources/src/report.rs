/// Raw report query as received from a client. Values are parsed and
/// validated by the report generator.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    pub year: String,
    pub month: String,
    pub car_id: String,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub date: String,
    pub runtime_minutes: u32,
    pub startup_count: u32,
    pub fault_count: u32,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    Startup,
    FloorArrival,
    DoorOpen,
    DoorClose,
    EmergencyCall,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct EventLog {
    /// `YYYY-MM-DD HH:MM:SS`
    pub time: String,
    pub car: String,
    pub event: EventKind,
    pub floor: String,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyReport {
    pub daily_summaries: Vec<DailySummary>,
    pub event_logs: Vec<EventLog>,
}
