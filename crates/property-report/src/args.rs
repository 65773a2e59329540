use anyhow::{bail, Result};
use property_core::Id;

pub const USAGE: &str = "Usage: property-report [--property <id>] [--json]";

/// Command line options.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportArgs {
    /// Restrict the report to one property.
    pub property: Option<Id>,
    pub json: bool,
    pub help: bool,
}

impl ReportArgs {
    /// Parse arguments, excluding the program name.
    pub fn parse<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut parsed = Self::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--json" => parsed.json = true,
                "--help" | "-h" => parsed.help = true,
                "--property" | "-p" => match args.next() {
                    Some(id) if !id.starts_with("--") => parsed.property = Some(Id::from(id.as_str())),
                    _ => bail!("--property needs a property id\n{}", USAGE),
                },
                other => bail!("unknown argument: {}\n{}", other, USAGE),
            }
        }

        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults() {
        assert_eq!(ReportArgs::parse(args(&[])).unwrap(), ReportArgs::default());
    }

    #[test]
    fn test_property_and_json() {
        let parsed = ReportArgs::parse(args(&["--property", "12", "--json"])).unwrap();
        assert_eq!(parsed.property, Some(Id::Num(12)));
        assert!(parsed.json);

        let parsed = ReportArgs::parse(args(&["-p", "a1b2"])).unwrap();
        assert_eq!(parsed.property, Some(Id::Text("a1b2".to_string())));
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(ReportArgs::parse(args(&["--property"])).is_err());
        assert!(ReportArgs::parse(args(&["--property", "--json"])).is_err());
        assert!(ReportArgs::parse(args(&["--csv"])).is_err());
    }
}
