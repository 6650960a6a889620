//! ----- MONTHLY REPORT -----
//! Synthesises a month of daily summaries and event logs for one car. The
//! output depends only on the query and the static car list, so the same
//! query always produces the same report.

use log::debug;

use shared_resources::config::FleetConfig;
use shared_resources::error::FleetError;
use shared_resources::report::{DailySummary, EventKind, EventLog, MonthlyReport, ReportQuery};

#[derive(Debug, Clone)]
pub struct ReportGenerator {
    fleet: FleetConfig,
}

impl ReportGenerator {
    pub fn new(config: &FleetConfig) -> Self {
        ReportGenerator {
            fleet: config.clone(),
        }
    }

    /// Validates the raw query and generates its report.
    pub fn query(&self, query: &ReportQuery) -> Result<MonthlyReport, FleetError> {
        let year: u32 = parse_field("year", &query.year)?;
        let month: u32 = parse_field("month", &query.month)?;
        let car_id: u8 = parse_field("carId", &query.car_id)?;
        if !(1..=9999).contains(&year) {
            return Err(FleetError::InvalidArgument(format!("Invalid year: {}", query.year)));
        }
        if !(1..=12).contains(&month) {
            return Err(FleetError::InvalidArgument(format!("Invalid month: {}", query.month)));
        }
        self.generate(year, month, car_id)
    }

    pub fn generate(&self, year: u32, month: u32, car_id: u8) -> Result<MonthlyReport, FleetError> {
        let car = self
            .fleet
            .car(car_id)
            .ok_or_else(|| FleetError::InvalidArgument(format!("Unknown carId: {}", car_id)))?;
        if car.service_floors.is_empty() {
            return Err(FleetError::Internal(format!("Elevator {} has no service floors", car_id)));
        }

        let rng = SeededSine::new(year, month, car_id);
        let days = days_in_month(year, month);
        let mut daily_summaries = Vec::with_capacity(days as usize);
        let mut event_logs = Vec::new();

        for day in 1..=days {
            let date = format!("{:04}-{:02}-{:02}", year, month, day);
            let d = u64::from(day);

            daily_summaries.push(DailySummary {
                date: date.clone(),
                runtime_minutes: rng.random(180, 480, d),
                startup_count: rng.random(15, 45, d),
                fault_count: rng.random(0, 2, d * 7),
            });

            let events = u64::from(rng.random(3, 8, d));
            for i in 0..events {
                let hour = rng.random(6, 22, d + i);
                let minute = rng.random(0, 59, d + i * 3);
                let second = rng.random(0, 59, d + i * 5);
                // counted from the bottom floor up
                let from_bottom = rng.random(0, car.service_floors.len() as u32 - 1, d + i * 2) as usize;
                let floor_index = car.service_floors.len() - 1 - from_bottom;
                event_logs.push(EventLog {
                    time: format!("{} {:02}:{:02}:{:02}", date, hour, minute, second),
                    car: car.name.clone(),
                    event: event_kind(rng.random(1, 10, d * i)),
                    floor: car.service_floors[floor_index].clone(),
                });
            }
        }

        // stable, so events sharing a timestamp keep their generation order
        event_logs.sort_by(|a, b| a.time.cmp(&b.time));
        debug!(
            "Generated report {:04}-{:02} for elevator {}: {} events",
            year,
            month,
            car_id,
            event_logs.len()
        );

        Ok(MonthlyReport {
            daily_summaries,
            event_logs,
        })
    }
}

/// Sine hash keyed by year, month and car.
struct SeededSine {
    seed: u64,
}

impl SeededSine {
    fn new(year: u32, month: u32, car_id: u8) -> Self {
        SeededSine {
            seed: u64::from(year) * 1000 + u64::from(month) * 100 + u64::from(car_id),
        }
    }

    /// Value in `min..=max` derived from `k`.
    fn random(&self, min: u32, max: u32, k: u64) -> u32 {
        let x = ((self.seed * k) as f64 * 1.23).sin() * 10000.0;
        let frac = x - x.floor();
        let value = (f64::from(min) + frac * f64::from(max - min + 1)).floor() as u32;
        value.min(max)
    }
}

fn event_kind(roll: u32) -> EventKind {
    match roll {
        0..=4 => EventKind::Startup,
        5..=7 => EventKind::FloorArrival,
        8 => EventKind::DoorOpen,
        9 => EventKind::DoorClose,
        _ => EventKind::EmergencyCall,
    }
}

fn parse_field<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T, FleetError> {
    raw.parse()
        .map_err(|_| FleetError::InvalidArgument(format!("Invalid {}: {}", name, raw)))
}

pub fn is_leap_year(year: u32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

pub fn days_in_month(year: u32, month: u32) -> u32 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_resources::config::SimulatorConfig;

    fn generator() -> ReportGenerator {
        let config = SimulatorConfig::parse(include_str!("../../../_config.json")).unwrap();
        ReportGenerator::new(&config.fleet)
    }

    fn query(year: &str, month: &str, car_id: &str) -> ReportQuery {
        ReportQuery {
            year: year.to_string(),
            month: month.to_string(),
            car_id: car_id.to_string(),
        }
    }

    #[test]
    fn leap_february_has_29_days_in_time_order() {
        let report = generator().query(&query("2024", "2", "3")).unwrap();
        assert_eq!(report.daily_summaries.len(), 29);
        assert_eq!(report.daily_summaries[28].date, "2024-02-29");
        assert!(!report.event_logs.is_empty());
        assert!(report.event_logs.windows(2).all(|w| w[0].time <= w[1].time));
        assert!(report.event_logs.iter().all(|e| e.car == "Accessible Elevator 3"));
    }

    #[test]
    fn same_query_same_bytes() {
        let a = serde_json::to_string(&generator().query(&query("2023", "7", "1")).unwrap()).unwrap();
        let b = serde_json::to_string(&generator().query(&query("2023", "7", "1")).unwrap()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn values_stay_in_range() {
        let report = generator().generate(2025, 12, 5).unwrap();
        assert_eq!(report.daily_summaries.len(), 31);
        for summary in &report.daily_summaries {
            assert!((180..=480).contains(&summary.runtime_minutes));
            assert!((15..=45).contains(&summary.startup_count));
            assert!(summary.fault_count <= 2);
        }
        let per_day_max = 8 * 31;
        assert!(report.event_logs.len() >= 3 * 31 && report.event_logs.len() <= per_day_max);
        for event in &report.event_logs {
            let hour: u32 = event.time[11..13].parse().unwrap();
            assert!((6..=22).contains(&hour));
        }
    }

    #[test]
    fn events_use_the_car_service_floors() {
        let report = generator().generate(2024, 5, 1).unwrap();
        let served = ["5F", "4F", "3F", "2F", "1F"];
        assert!(report.event_logs.iter().all(|e| served.contains(&e.floor.as_str())));
    }

    #[test]
    fn rejects_bad_queries() {
        let generator = generator();
        for (y, m, id) in [("abc", "2", "1"), ("2024", "13", "1"), ("2024", "0", "1"), ("2024", "2", "x"), ("2024", "2", "9"), ("0", "2", "1")] {
            let err = generator.query(&query(y, m, id)).unwrap_err();
            assert_eq!(err.status_code(), 400, "query {} {} {}", y, m, id);
        }
    }

    #[test]
    fn month_lengths() {
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2024, 4), 30);
        assert_eq!(days_in_month(2024, 1), 31);
    }

    #[test]
    fn leap_february_for_car_3_is_pinned() {
        let report = generator().generate(2024, 2, 3).unwrap();
        assert_eq!(
            report.daily_summaries[0],
            DailySummary {
                date: "2024-02-01".to_string(),
                runtime_minutes: 226,
                startup_count: 19,
                fault_count: 1,
            }
        );
        let first: Vec<(&str, EventKind, &str)> = report.event_logs[..4]
            .iter()
            .map(|e| (e.time.as_str(), e.event, e.floor.as_str()))
            .collect();
        assert_eq!(
            first,
            vec![
                ("2024-02-01 08:09:09", EventKind::Startup, "B2F"),
                ("2024-02-01 09:35:20", EventKind::Startup, "3F"),
                ("2024-02-01 16:37:54", EventKind::Startup, "1F"),
                ("2024-02-02 09:14:14", EventKind::Startup, "B2F"),
            ]
        );
    }

    #[test]
    fn first_event_of_a_day_is_a_startup() {
        assert_eq!(event_kind(SeededSine::new(2024, 2, 3).random(1, 10, 0)), EventKind::Startup);
    }
}
