//! Parsing helpers for configuration values.

use std::net::{Ipv4Addr, SocketAddr, ToSocketAddrs};
use std::time::Duration;

use url::Url;

use crate::error::{ConfigError, ConfigResult};

fn invalid(variable: &'static str, value: &str, reason: &'static str) -> ConfigError {
    ConfigError::InvalidValue {
        variable,
        value: value.to_string(),
        reason,
    }
}

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Parse a duration such as `300ms`, `5s`, `1m30s`, `1.5h` or a bare number of seconds.
///
/// # Errors
///
/// Returns an error naming `variable` when the value is empty, has an unknown unit or
/// overflows.
pub fn parse_duration(variable: &'static str, value: &str) -> ConfigResult<Duration> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(invalid(variable, value, "empty_duration"));
    }
    if let Ok(secs) = trimmed.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }

    let mut total: u128 = 0;
    let mut rest = trimmed;
    while !rest.is_empty() {
        let number_end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .ok_or_else(|| invalid(variable, value, "missing_unit"))?;
        if number_end == 0 {
            return Err(invalid(variable, value, "missing_number"));
        }
        let number = &rest[..number_end];
        rest = &rest[number_end..];

        let unit_end = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let scale: u128 = match &rest[..unit_end] {
            "ns" => 1,
            "us" | "µs" => 1_000,
            "ms" => 1_000_000,
            "s" => NANOS_PER_SEC,
            "m" => 60 * NANOS_PER_SEC,
            "h" => 3_600 * NANOS_PER_SEC,
            _ => return Err(invalid(variable, value, "unknown_unit")),
        };
        rest = &rest[unit_end..];

        total = scaled_nanos(number, scale)
            .and_then(|nanos| total.checked_add(nanos))
            .ok_or_else(|| invalid(variable, value, "invalid_number"))?;
    }

    let secs = u64::try_from(total / NANOS_PER_SEC)
        .map_err(|_| invalid(variable, value, "out_of_range"))?;
    let subsec = u32::try_from(total % NANOS_PER_SEC)
        .map_err(|_| invalid(variable, value, "out_of_range"))?;
    Ok(Duration::new(secs, subsec))
}

/// `number` (`12`, `1.5`, `.25`) multiplied by `scale` nanoseconds.
fn scaled_nanos(number: &str, scale: u128) -> Option<u128> {
    let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    let whole: u128 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let mut nanos = whole.checked_mul(scale)?;
    if !fraction.is_empty() {
        let digits = fraction.len().min(18);
        let value: u128 = fraction[..digits].parse().ok()?;
        let divisor = 10_u128.checked_pow(u32::try_from(digits).ok()?)?;
        nanos = nanos.checked_add(value.checked_mul(scale)? / divisor)?;
    }
    Some(nanos)
}

/// Parse a listen address: `:port` (all interfaces), `ip:port` or `host:port`.
///
/// # Errors
///
/// Returns an error when the port is missing or invalid, or the host does not resolve.
pub fn parse_bind_addr(variable: &'static str, value: &str) -> ConfigResult<SocketAddr> {
    let trimmed = value.trim();
    if let Some(port) = trimmed.strip_prefix(':') {
        let port = port
            .parse::<u16>()
            .map_err(|_| invalid(variable, value, "invalid_port"))?;
        return Ok(SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)));
    }
    if let Ok(addr) = trimmed.parse::<SocketAddr>() {
        return Ok(addr);
    }

    let (_, port) = trimmed
        .rsplit_once(':')
        .ok_or_else(|| invalid(variable, value, "missing_port"))?;
    port.parse::<u16>()
        .map_err(|_| invalid(variable, value, "invalid_port"))?;
    trimmed
        .to_socket_addrs()
        .map_err(|_| invalid(variable, value, "unresolvable_host"))?
        .next()
        .ok_or_else(|| invalid(variable, value, "unresolvable_host"))
}

pub(crate) fn parse_url(variable: &'static str, value: &str) -> ConfigResult<Url> {
    Url::parse(value.trim()).map_err(|source| ConfigError::InvalidUrl {
        variable,
        value: value.to_string(),
        source,
    })
}

pub(crate) fn parse_flag(variable: &'static str, value: &str) -> ConfigResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(invalid(variable, value, "invalid_flag")),
    }
}

pub(crate) fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

pub(crate) fn parse_log_format(variable: &'static str, value: &str) -> ConfigResult<Option<String>> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" => Ok(None),
        format @ ("json" | "pretty") => Ok(Some(format.to_string())),
        _ => Err(invalid(variable, value, "unknown_log_format")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_accept_unit_suffixes() -> ConfigResult<()> {
        assert_eq!(parse_duration("T", "5s")?, Duration::from_secs(5));
        assert_eq!(parse_duration("T", "300ms")?, Duration::from_millis(300));
        assert_eq!(parse_duration("T", "1m30s")?, Duration::from_secs(90));
        assert_eq!(parse_duration("T", "2h")?, Duration::from_secs(7_200));
        assert_eq!(parse_duration("T", "1.5m")?, Duration::from_secs(90));
        assert_eq!(parse_duration("T", "45")?, Duration::from_secs(45));
        assert_eq!(parse_duration("T", "0.25s")?, Duration::from_millis(250));
        Ok(())
    }

    #[test]
    fn durations_reject_garbage() {
        for value in ["", "s", "5d", "abc", "1..5s", "10s5"] {
            let err = parse_duration("SHUTDOWN_TIMEOUT", value);
            assert!(
                matches!(err, Err(ConfigError::InvalidValue { variable: "SHUTDOWN_TIMEOUT", .. })),
                "expected {value:?} to be rejected"
            );
        }
    }

    #[test]
    fn bind_addr_forms() -> ConfigResult<()> {
        assert_eq!(
            parse_bind_addr("B", ":23400")?,
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 23_400))
        );
        assert_eq!(
            parse_bind_addr("B", "127.0.0.1:8080")?,
            SocketAddr::from((Ipv4Addr::LOCALHOST, 8_080))
        );
        assert_eq!(parse_bind_addr("B", "localhost:8080")?.port(), 8_080);
        assert!(parse_bind_addr("B", "localhost").is_err());
        assert!(parse_bind_addr("B", ":http").is_err());
        Ok(())
    }

    #[test]
    fn origins_split_on_commas() {
        assert_eq!(
            parse_origins(" https://a.example , https://b.example,,"),
            vec!["https://a.example", "https://b.example"]
        );
        assert_eq!(parse_origins("*"), vec!["*"]);
    }

    #[test]
    fn flags_and_log_formats() -> ConfigResult<()> {
        assert!(parse_flag("F", "TRUE")?);
        assert!(!parse_flag("F", "off")?);
        assert!(parse_flag("F", "maybe").is_err());
        assert_eq!(parse_log_format("L", "JSON")?.as_deref(), Some("json"));
        assert_eq!(parse_log_format("L", "")?, None);
        assert!(parse_log_format("L", "xml").is_err());
        Ok(())
    }

    #[test]
    fn url_errors_name_the_variable() {
        let err = parse_url("API_ROUTER_URL", "not a url");
        assert!(matches!(err, Err(ref e) if e.variable() == "API_ROUTER_URL"));
    }
}
