use std::collections::HashSet;
use std::env;
use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use log::{info, warn};

use super::error::ConfigError;
use super::floors::FloorOrder;

const CONFIG_FILE_PATH: &str = "config.json";
const FALLBACK_CONFIG_FILE_PATH: &str = "_config.json";

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
pub struct ConfigFile {
    pub server: ServerConfig,
    pub monitor: MonitorSection,
    pub simulation: SimulationConfig,
    pub floors: FloorOrder,
    pub emergency_car: u8,
    pub cars: Vec<CarSettings>,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
pub struct MonitorSection {
    pub host: IpAddr,
    pub poll_period_ms: u64,
    pub request_timeout_ms: u64,
}

/// Timing constants and per-tick probabilities of the simulation.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
pub struct SimulationConfig {
    pub tick_period_ms: u64,
    pub door_close_delay_ms: u64,
    pub outage_min_duration_ms: u64,
    pub emergency_cooldown_ms: u64,
    pub hall_call_probability: f64,
    pub status_change_probability: f64,
    pub car_call_probability: f64,
    pub emergency_probability: f64,
    /// Seeds the simulation dice for reproducible runs.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl SimulationConfig {
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }

    pub fn door_close_delay(&self) -> Duration {
        Duration::from_millis(self.door_close_delay_ms)
    }

    pub fn outage_min_duration(&self) -> Duration {
        Duration::from_millis(self.outage_min_duration_ms)
    }

    pub fn emergency_cooldown(&self) -> Duration {
        Duration::from_millis(self.emergency_cooldown_ms)
    }
}

/// Fixed starting configuration of one car.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
pub struct CarSettings {
    pub id: u8,
    pub name: String,
    pub service_floors: Vec<String>,
    pub starting_floor: String,
    #[serde(default)]
    pub run_time_minutes: u32,
    #[serde(default)]
    pub startup_count: u32,
}

/// Static description of the building and its cars.
#[derive(Debug, Clone)]
pub struct FleetConfig {
    pub floors: FloorOrder,
    pub emergency_car: u8,
    pub cars: Vec<CarSettings>,
}

impl FleetConfig {
    pub fn car(&self, id: u8) -> Option<&CarSettings> {
        self.cars.iter().find(|car| car.id == id)
    }
}

#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    pub server: ServerConfig,
    pub simulation: SimulationConfig,
    pub fleet: FleetConfig,
}

impl SimulatorConfig {
    pub fn get() -> Result<Self, ConfigError> {
        let args = parse_env_args();
        let mut config = Self::parse(&read_config_file(args.config_path.as_deref())?)?;
        if let Some(port) = args.serverport {
            config.server.port = port;
        }
        Ok(config)
    }

    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let config_file: ConfigFile = serde_json::from_str(contents)?;
        validate(&config_file)?;
        Ok(SimulatorConfig {
            server: config_file.server,
            simulation: config_file.simulation,
            fleet: FleetConfig {
                floors: config_file.floors,
                emergency_car: config_file.emergency_car,
                cars: config_file.cars,
            },
        })
    }
}

#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub server_addr: SocketAddr,
    pub poll_period: Duration,
    pub request_timeout: Duration,
}

impl MonitorConfig {
    pub fn get() -> Result<Self, ConfigError> {
        let args = parse_env_args();
        let mut config = Self::parse(&read_config_file(args.config_path.as_deref())?)?;
        if let Some(port) = args.serverport {
            config.server_addr.set_port(port);
        }
        Ok(config)
    }

    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let config_file: ConfigFile = serde_json::from_str(contents)?;
        Ok(MonitorConfig {
            server_addr: SocketAddr::new(config_file.monitor.host, config_file.server.port),
            poll_period: Duration::from_millis(config_file.monitor.poll_period_ms),
            request_timeout: Duration::from_millis(config_file.monitor.request_timeout_ms),
        })
    }
}

fn read_config_file(path: Option<&str>) -> Result<String, ConfigError> {
    if let Some(path) = path {
        return fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        });
    }
    match fs::read_to_string(CONFIG_FILE_PATH) {
        Ok(content) => Ok(content),
        Err(_) => {
            info!("No configuration file provided, using default settings...");
            fs::read_to_string(FALLBACK_CONFIG_FILE_PATH).map_err(|source| ConfigError::Io {
                path: FALLBACK_CONFIG_FILE_PATH.to_string(),
                source,
            })
        }
    }
}

#[derive(Debug, Default)]
struct EnvArgs {
    config_path: Option<String>,
    serverport: Option<u16>,
}

/// Picks `--config <path>` and `--serverport <port>` out of the command line.
/// Anything else is left for the binaries to interpret.
fn parse_env_args() -> EnvArgs {
    let mut parsed = EnvArgs::default();

    let args: Vec<String> = env::args().skip(1).collect();
    for arg_pair in args.windows(2) {
        match arg_pair[0].as_str() {
            "--config" => parsed.config_path = Some(arg_pair[1].clone()),
            "--serverport" => {
                parsed.serverport = match arg_pair[1].parse::<u16>() {
                    Ok(port) => Some(port),
                    Err(_) => {
                        warn!("port {} is not a number, skipping...", arg_pair[1]);
                        parsed.serverport
                    }
                };
            }
            _ => (),
        }
    }
    parsed
}

fn validate(config_file: &ConfigFile) -> Result<(), ConfigError> {
    let invalid = |msg: String| Err(ConfigError::Invalid(msg));
    let simulation = &config_file.simulation;

    if simulation.tick_period_ms == 0 || simulation.tick_period_ms % 1000 != 0 {
        return invalid(format!(
            "tick_period_ms must be a whole number of seconds, got {}",
            simulation.tick_period_ms
        ));
    }
    for (name, p) in [
        ("hall_call_probability", simulation.hall_call_probability),
        ("status_change_probability", simulation.status_change_probability),
        ("car_call_probability", simulation.car_call_probability),
        ("emergency_probability", simulation.emergency_probability),
    ] {
        if !(0.0..=1.0).contains(&p) {
            return invalid(format!("{} must lie in [0, 1], got {}", name, p));
        }
    }

    let floors = &config_file.floors;
    if floors.is_empty() {
        return invalid("floor order is empty".to_string());
    }
    let mut seen_floors = HashSet::new();
    for floor in floors.iter() {
        if !seen_floors.insert(floor) {
            return invalid(format!("floor {} listed twice", floor));
        }
    }

    let mut seen_ids = HashSet::new();
    for car in &config_file.cars {
        if !seen_ids.insert(car.id) {
            return invalid(format!("car id {} used twice", car.id));
        }
        if car.service_floors.is_empty() {
            return invalid(format!("car {} serves no floors", car.id));
        }
        let mut last_index = None;
        for floor in &car.service_floors {
            let index = match floors.index_of(floor) {
                Some(index) => index,
                None => return invalid(format!("car {} serves unknown floor {}", car.id, floor)),
            };
            if last_index.map_or(false, |last| index <= last) {
                return invalid(format!("service floors of car {} are not ordered top to bottom", car.id));
            }
            last_index = Some(index);
        }
        if !car.service_floors.contains(&car.starting_floor) {
            return invalid(format!(
                "car {} starts at {}, which it does not serve",
                car.id, car.starting_floor
            ));
        }
    }
    if !seen_ids.contains(&config_file.emergency_car) {
        return invalid(format!("emergency car {} is not configured", config_file.emergency_car));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT_CONFIG: &str = include_str!("../../_config.json");

    #[test]
    fn default_config_describes_five_cars() {
        let config = SimulatorConfig::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.fleet.cars.len(), 5);
        assert_eq!(config.fleet.emergency_car, 5);
        assert_eq!(config.simulation.tick_period(), Duration::from_millis(2000));
        assert_eq!(config.fleet.floors.len(), 8);
        assert_eq!(config.fleet.car(1).unwrap().service_floors.len(), 5);
    }

    #[test]
    fn monitor_targets_configured_port() {
        let config = MonitorConfig::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.server_addr.port(), 3000);
    }

    fn with_cars(cars: &str) -> String {
        let mut file: serde_json::Value = serde_json::from_str(DEFAULT_CONFIG).unwrap();
        file["cars"] = serde_json::from_str(cars).unwrap();
        file.to_string()
    }

    #[test]
    fn rejects_unserved_starting_floor() {
        let contents = with_cars(
            r#"[{"id":5,"name":"x","service_floors":["5F","4F"],"starting_floor":"1F"}]"#,
        );
        assert!(matches!(SimulatorConfig::parse(&contents), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let contents = with_cars(
            r#"[{"id":5,"name":"a","service_floors":["5F"],"starting_floor":"5F"},
                {"id":5,"name":"b","service_floors":["5F"],"starting_floor":"5F"}]"#,
        );
        assert!(matches!(SimulatorConfig::parse(&contents), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejects_missing_emergency_car() {
        let contents = with_cars(
            r#"[{"id":1,"name":"a","service_floors":["5F","4F"],"starting_floor":"5F"}]"#,
        );
        assert!(matches!(SimulatorConfig::parse(&contents), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejects_unordered_service_floors() {
        let contents = with_cars(
            r#"[{"id":5,"name":"a","service_floors":["1F","5F"],"starting_floor":"5F"}]"#,
        );
        assert!(matches!(SimulatorConfig::parse(&contents), Err(ConfigError::Invalid(_))));
    }
}
