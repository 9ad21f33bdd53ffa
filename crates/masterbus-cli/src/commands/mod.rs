//! CLI subcommand implementations.

pub mod master;
pub mod measure;
pub mod response;

/// Parses a `key=value` parameter override with a float value.
pub fn parse_param_override(s: &str) -> Result<(String, f32), String> {
    let Some((key, value)) = s.split_once('=') else {
        return Err(format!("invalid parameter format: '{s}' (expected key=value)"));
    };
    let value: f32 = value
        .trim()
        .parse()
        .map_err(|_| format!("invalid value for '{key}': '{value}' is not a number"))?;
    Ok((key.trim().to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_param_override() {
        assert_eq!(
            parse_param_override("comp_thresh=-18.5").unwrap(),
            ("comp_thresh".to_string(), -18.5)
        );
        assert_eq!(
            parse_param_override(" eq_b1_gain = 2 ").unwrap(),
            ("eq_b1_gain".to_string(), 2.0)
        );
        assert!(parse_param_override("no-equals").is_err());
        assert!(parse_param_override("key=notanumber").is_err());
    }
}
