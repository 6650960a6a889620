pub mod car;
pub mod dice;
pub mod dispatch;
pub mod doors;
pub mod emergency;
pub mod fleet;
pub mod outage;
pub mod report;
