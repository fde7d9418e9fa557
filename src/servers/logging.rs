/// This is the prefix used in logs to identify a started service.
///
/// For example:
///
/// ```text
/// 2024-06-25T12:36:25.025312Z  INFO GATEWAY: Started on: http://0.0.0.0:1337
/// ```
pub const STARTED_ON: &str = "Started on";
