//! clap value parsers for arguments that need more than a type check.

use std::fs;
use std::path::PathBuf;

/// Longest lifetime `token --hours` accepts (30 days)
const MAX_TOKEN_HOURS: i64 = 720;

const MAX_ROLLBACK_STEPS: u32 = 100;

pub fn validate_port(port_str: &str) -> Result<u16, String> {
    let port: u16 = port_str.parse().map_err(|_| {
        format!("Port must be a valid number between 1 and 65535, got: '{port_str}'")
    })?;

    if port == 0 {
        return Err("Port must be between 1 and 65535. Port 0 is not allowed.".to_string());
    }

    Ok(port)
}

/// Existing, readable regular file
pub fn validate_config_file_path(path_str: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(path_str);

    if !path.is_file() {
        return Err(format!(
            "Configuration file does not exist or is not a file: '{path_str}'"
        ));
    }

    fs::File::open(&path)
        .map(|_| path)
        .map_err(|e| format!("Cannot read configuration file '{path_str}': {e}"))
}

pub fn validate_rollback_steps(steps_str: &str) -> Result<u32, String> {
    let steps: u32 = steps_str.parse().map_err(|_| {
        format!("Rollback steps must be a valid positive number, got: '{steps_str}'")
    })?;

    match steps {
        0 => Err("Rollback steps must be greater than 0".to_string()),
        s if s > MAX_ROLLBACK_STEPS => Err(format!(
            "Rollback steps cannot exceed {MAX_ROLLBACK_STEPS}"
        )),
        s => Ok(s),
    }
}

/// Hostname, IPv4 or IPv6 literal; dotted-decimal input must be a real IPv4.
pub fn validate_host_address(host_str: &str) -> Result<String, String> {
    let host = host_str.trim();

    if host.is_empty() {
        return Err("Host address cannot be empty".to_string());
    }

    if host.contains(char::is_whitespace) {
        return Err("Host address cannot contain spaces".to_string());
    }

    if host.len() > 253 {
        return Err("Host address is too long (maximum 253 characters)".to_string());
    }

    if host.chars().all(|c| c.is_ascii_digit() || c == '.')
        && host.parse::<std::net::Ipv4Addr>().is_err()
    {
        return Err(format!("Invalid IPv4 address format: '{host_str}'"));
    }

    Ok(host.to_string())
}

/// Scope names are single tokens such as `users.edit` or `*`.
pub fn validate_scope(scope_str: &str) -> Result<String, String> {
    if scope_str.is_empty() {
        return Err("Scope cannot be empty".to_string());
    }

    if !scope_str.chars().all(|c| c.is_ascii_graphic()) {
        return Err(format!(
            "Scope must be printable ASCII without spaces, got: '{scope_str}'"
        ));
    }

    Ok(scope_str.to_string())
}

pub fn validate_token_hours(hours_str: &str) -> Result<i64, String> {
    let hours: i64 = hours_str
        .parse()
        .map_err(|_| format!("Hours must be a whole number, got: '{hours_str}'"))?;

    if !(1..=MAX_TOKEN_HOURS).contains(&hours) {
        return Err(format!("Hours must be between 1 and {MAX_TOKEN_HOURS}"));
    }

    Ok(hours)
}
