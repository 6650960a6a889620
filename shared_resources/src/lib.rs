pub mod call;
pub mod car_status;
pub mod config;
pub mod error;
pub mod floors;
pub mod message;
pub mod report;
