use crate::calc::TotalDigits;
use crate::config::{CardConfig, OverridePolicy, ZeroWeightPolicy};
use clap::Parser;
use std::path::PathBuf;

/// Report card sidecar: reads one JSON request per line on stdin and
/// answers one JSON response per line on stdout. Logs go to stderr.
#[derive(Parser, Debug)]
#[command(name = "reportcardd", version)]
pub struct Cli {
    /// JSON config file; flags below override its values.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Total column digits: "adaptive" or a fixed count 0..=6.
    #[arg(long, value_parser = parse_total_digits)]
    pub total_digits: Option<TotalDigits>,

    #[arg(long, value_enum)]
    pub zero_weight: Option<ZeroWeightPolicy>,

    #[arg(long, value_enum)]
    pub override_policy: Option<OverridePolicy>,

    #[arg(long)]
    pub show_edit_icons: bool,
}

fn parse_total_digits(s: &str) -> Result<TotalDigits, String> {
    TotalDigits::parse(s).ok_or_else(|| format!("expected \"adaptive\" or 0..=6, got {}", s))
}

impl Cli {
    pub fn card_config(&self) -> anyhow::Result<CardConfig> {
        let mut cfg = match &self.config {
            Some(p) => CardConfig::load(p)?,
            None => CardConfig::default(),
        };
        if let Some(d) = self.total_digits {
            cfg.total_digits = d;
        }
        if let Some(z) = self.zero_weight {
            cfg.zero_weight = z;
        }
        if let Some(o) = self.override_policy {
            cfg.override_policy = o;
        }
        if self.show_edit_icons {
            cfg.show_edit_icons = true;
        }
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from([
            "reportcardd",
            "--total-digits",
            "1",
            "--zero-weight",
            "no-grade-data",
            "--override-policy",
            "recompute",
        ]);
        let cfg = cli.card_config().expect("config");
        assert_eq!(cfg.total_digits, TotalDigits::Fixed(1));
        assert_eq!(cfg.zero_weight, ZeroWeightPolicy::NoGradeData);
        assert_eq!(cfg.override_policy, OverridePolicy::Recompute);
        assert!(!cfg.show_edit_icons);
    }

    #[test]
    fn bad_digits_are_rejected() {
        assert!(Cli::try_parse_from(["reportcardd", "--total-digits", "x"]).is_err());
    }
}
