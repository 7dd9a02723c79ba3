use anyhow::Result;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Formatter {
    Json,
    Yaml,
    Human,
}

impl Formatter {
    /// Serialise for the machine-readable formats. `None` for human output,
    /// which each command renders itself.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<Option<String>> {
        match self {
            Formatter::Json => Ok(Some(serde_json::to_string_pretty(data)?)),
            Formatter::Yaml => Ok(Some(serde_yaml::to_string(data)?)),
            Formatter::Human => Ok(None),
        }
    }
}

pub fn get_formatter(format: &str) -> Formatter {
    match format {
        "json" => Formatter::Json,
        "yaml" => Formatter::Yaml,
        _ => Formatter::Human,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_formatter() {
        assert_eq!(get_formatter("json"), Formatter::Json);
        assert_eq!(get_formatter("yaml"), Formatter::Yaml);
        assert_eq!(get_formatter("human"), Formatter::Human);
        assert_eq!(get_formatter("anything"), Formatter::Human);
    }

    #[test]
    fn test_format_json() {
        let out = Formatter::Json
            .format(&serde_json::json!({"url": "https://x/y"}))
            .unwrap()
            .unwrap();
        assert!(out.contains("\"url\": \"https://x/y\""));
        assert!(Formatter::Human.format(&1).unwrap().is_none());
    }
}
