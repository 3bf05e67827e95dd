//! Command-line arguments

use clap::Parser;
use std::path::PathBuf;

/// Seeded battle simulator
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "battle_sim")]
#[command(about = "Run seeded battles and print a JSON balance report")]
pub struct SimArgs {
    /// Number of battles to simulate
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u32).range(1..))]
    pub battles: u32,
    /// RNG seed for determinism
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
    /// Level of the simulated character
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..))]
    pub level: u32,
    /// Zone to draw opponents from; the zone matching `level` when unset
    #[arg(long)]
    pub zone: Option<String>,
    /// Directory holding content TOML files
    #[arg(long = "config")]
    pub config_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_defaults() {
        let args = SimArgs::try_parse_from(["battle_sim"]).unwrap();
        assert_eq!(args.battles, 100);
        assert_eq!(args.seed, 42);
        assert_eq!(args.level, 5);
        assert_eq!(args.zone, None);
        assert_eq!(args.config_dir, None);
    }

    #[test]
    fn test_all_flags() {
        let args = SimArgs::try_parse_from([
            "battle_sim", "--battles", "10", "--seed", "7", "--level", "30", "--zone",
            "ember_caverns", "--config", "content",
        ])
        .unwrap();
        assert_eq!(args.battles, 10);
        assert_eq!(args.seed, 7);
        assert_eq!(args.level, 30);
        assert_eq!(args.zone.as_deref(), Some("ember_caverns"));
        assert_eq!(args.config_dir, Some(PathBuf::from("content")));
    }

    #[test]
    fn test_errors() {
        let unknown = SimArgs::try_parse_from(["battle_sim", "--fast"]).unwrap_err();
        assert_eq!(unknown.kind(), ErrorKind::UnknownArgument);

        assert!(SimArgs::try_parse_from(["battle_sim", "--seed"]).is_err());
        assert!(SimArgs::try_parse_from(["battle_sim", "--battles", "many"]).is_err());
        assert!(SimArgs::try_parse_from(["battle_sim", "--battles", "0"]).is_err());
    }

    #[test]
    fn test_help_is_reported() {
        let help = SimArgs::try_parse_from(["battle_sim", "--help"]).unwrap_err();
        assert_eq!(help.kind(), ErrorKind::DisplayHelp);
    }
}
