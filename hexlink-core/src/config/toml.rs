//! Minimal TOML reader for node configuration
//!
//! Handles only the subset used by `node.toml`, without allocating:
//! - `key = value` pairs (quoted strings, integers)
//! - decimal and `0x` hex integers, with `_` separators
//! - a single `[master]` section
//! - comments (`# ...`), including trailing ones
//!
//! Arrays, inline tables, floats and multi-line strings are not supported.

use super::types::{MasterConfig, NodeConfig, Role};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Line is neither a header nor `key = value`
    MalformedLine { line: usize },
    /// Key not known in its section
    UnknownKey { line: usize },
    /// Value has the wrong type or spelling
    InvalidValue { line: usize },
    /// Integer does not fit the target field
    OutOfRange { line: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Master,
}

/// Parse TOML text into a NodeConfig
///
/// Keys that are absent keep their defaults. The result is not validated;
/// call [`NodeConfig::validate`] afterwards.
pub fn parse_config(input: &str) -> Result<NodeConfig, ParseError> {
    let mut config = NodeConfig::default();
    let mut section = Section::Root;

    for (index, raw) in input.lines().enumerate() {
        let line_no = index + 1;
        let line = strip_comment(raw).trim();
        if line.is_empty() {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            let name = header.strip_suffix(']').ok_or(ParseError::InvalidSection)?;
            section = match name.trim() {
                "master" => Section::Master,
                _ => return Err(ParseError::InvalidSection),
            };
            continue;
        }

        let (key, value) =
            split_key_value(line).ok_or(ParseError::MalformedLine { line: line_no })?;
        match section {
            Section::Root => apply_root(&mut config, key, value, line_no)?,
            Section::Master => apply_master(&mut config.master, key, value, line_no)?,
        }
    }

    Ok(config)
}

fn apply_root(config: &mut NodeConfig, key: &str, value: &str, line: usize) -> Result<(), ParseError> {
    match key {
        "role" => {
            config.role = match parse_string(value, line)? {
                "master" => Role::Master,
                "slave" => Role::Slave,
                _ => return Err(ParseError::InvalidValue { line }),
            }
        }
        "device_id" => config.device_id = parse_u8(value, line)?,
        "baudrate" => config.baudrate = parse_u32(value, line)?,
        _ => return Err(ParseError::UnknownKey { line }),
    }
    Ok(())
}

fn apply_master(
    master: &mut MasterConfig,
    key: &str,
    value: &str,
    line: usize,
) -> Result<(), ParseError> {
    match key {
        "target_id" => master.target_id = parse_u8(value, line)?,
        "register" => master.register = parse_u8(value, line)?,
        "response_timeout_ms" => master.response_timeout_ms = parse_u32(value, line)?,
        "poll_interval_ms" => master.poll_interval_ms = parse_u32(value, line)?,
        "retries" => master.retries = parse_u8(value, line)?,
        _ => return Err(ParseError::UnknownKey { line }),
    }
    Ok(())
}

/// Drop a trailing comment that is not inside a string
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..i],
            _ => {}
        }
    }
    line
}

fn split_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let (key, value) = (key.trim(), value.trim());
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

fn parse_string(value: &str, line: usize) -> Result<&str, ParseError> {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .ok_or(ParseError::InvalidValue { line })
}

fn parse_u32(value: &str, line: usize) -> Result<u32, ParseError> {
    let (digits, radix) = match value.strip_prefix("0x") {
        Some(hex) => (hex, 16),
        None => (value, 10),
    };
    if digits.is_empty() || digits.starts_with('_') || digits.ends_with('_') {
        return Err(ParseError::InvalidValue { line });
    }

    let mut acc: u32 = 0;
    for c in digits.chars().filter(|&c| c != '_') {
        let digit = c.to_digit(radix).ok_or(ParseError::InvalidValue { line })?;
        acc = acc
            .checked_mul(radix)
            .and_then(|v| v.checked_add(digit))
            .ok_or(ParseError::OutOfRange { line })?;
    }
    Ok(acc)
}

fn parse_u8(value: &str, line: usize) -> Result<u8, ParseError> {
    let wide = parse_u32(value, line)?;
    u8::try_from(wide).map_err(|_| ParseError::OutOfRange { line })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
# Bus master polling slave 0x02
role = "master"   # or "slave"
device_id = 0x00
baudrate = 115_200

[master]
target_id = 0x02
register = 0x20
response_timeout_ms = 150
poll_interval_ms = 500
retries = 3
"#;

    #[test]
    fn test_parse_sample() {
        let config = parse_config(SAMPLE).unwrap();
        assert_eq!(config.role, Role::Master);
        assert_eq!(config.device_id, 0);
        assert_eq!(config.baudrate, 115200);
        assert_eq!(config.master.target_id, 0x02);
        assert_eq!(config.master.register, 0x20);
        assert_eq!(config.master.response_timeout_ms, 150);
        assert_eq!(config.master.poll_interval_ms, 500);
        assert_eq!(config.master.retries, 3);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_empty_input_is_default() {
        assert_eq!(parse_config("").unwrap(), NodeConfig::default());
        assert_eq!(parse_config("# nothing\n\n").unwrap(), NodeConfig::default());
    }

    #[test]
    fn test_unknown_section() {
        assert_eq!(
            parse_config("[display]\n"),
            Err(ParseError::InvalidSection)
        );
        assert_eq!(parse_config("[master\n"), Err(ParseError::InvalidSection));
    }

    #[test]
    fn test_unknown_key_reports_line() {
        assert_eq!(
            parse_config("role = \"slave\"\nspeed = 9600\n"),
            Err(ParseError::UnknownKey { line: 2 })
        );
        // Master keys are not accepted at the root
        assert_eq!(
            parse_config("retries = 1\n"),
            Err(ParseError::UnknownKey { line: 1 })
        );
    }

    #[test]
    fn test_bad_values() {
        assert_eq!(
            parse_config("role = master\n"),
            Err(ParseError::InvalidValue { line: 1 })
        );
        assert_eq!(
            parse_config("role = \"observer\"\n"),
            Err(ParseError::InvalidValue { line: 1 })
        );
        assert_eq!(
            parse_config("baudrate = 96k\n"),
            Err(ParseError::InvalidValue { line: 1 })
        );
        assert_eq!(
            parse_config("baudrate = _9600\n"),
            Err(ParseError::InvalidValue { line: 1 })
        );
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(
            parse_config("device_id = 256\n"),
            Err(ParseError::OutOfRange { line: 1 })
        );
        assert_eq!(
            parse_config("baudrate = 0x1_0000_0000\n"),
            Err(ParseError::OutOfRange { line: 1 })
        );
    }

    #[test]
    fn test_malformed_line() {
        assert_eq!(
            parse_config("role\n"),
            Err(ParseError::MalformedLine { line: 1 })
        );
        assert_eq!(
            parse_config("device_id =\n"),
            Err(ParseError::MalformedLine { line: 1 })
        );
    }

    #[test]
    fn test_hash_inside_string_kept() {
        assert_eq!(strip_comment("role = \"a#b\" # note"), "role = \"a#b\" ");
    }
}
