pub mod attendance;
pub mod biometric;
pub mod report;
