use tera::Tera;

use crate::config::TEMPLATE_GLOB;
use crate::error::AppError;

/// Initialize the Tera template engine
pub fn init_templates() -> Result<Tera, AppError> {
    let mut tera = Tera::new(TEMPLATE_GLOB)?;

    tera.register_filter("first_line", first_line_filter);

    Ok(tera)
}

/// Reduce a multi-line string to its first non-empty line.
///
/// Postgres `version()` returns a long single string on most builds, but some
/// report compiler details on following lines; the status page only wants the
/// headline.
fn first_line_filter(
    value: &tera::Value,
    _args: &std::collections::HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("first_line filter expects a string"))?;

    let line = s
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("");

    Ok(tera::Value::String(line.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn first_line_keeps_single_line_values() {
        let value = tera::Value::String("PostgreSQL 16.2 on x86_64-pc-linux-gnu".to_string());
        let result = first_line_filter(&value, &HashMap::new()).unwrap();
        assert_eq!(result, value);
    }

    #[test]
    fn first_line_drops_trailing_lines() {
        let value = tera::Value::String("PostgreSQL 16.2\ncompiled by gcc 13.2".to_string());
        let result = first_line_filter(&value, &HashMap::new()).unwrap();
        assert_eq!(result.as_str(), Some("PostgreSQL 16.2"));
    }

    #[test]
    fn first_line_rejects_non_strings() {
        let value = tera::Value::Number(42.into());
        assert!(first_line_filter(&value, &HashMap::new()).is_err());
    }
}
