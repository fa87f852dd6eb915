use crate::calc::TotalDigits;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What a subject edit stores when the coefficients sum to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum ZeroWeightPolicy {
    /// Store NaN as the overall average.
    #[default]
    Propagate,
    /// Keep the stored value and flag the card as having no grade data.
    NoGradeData,
}

/// Whether a direct edit of the overall average is kept as typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum OverridePolicy {
    #[default]
    Verbatim,
    /// Replace the typed value with the weighted average of the subjects.
    Recompute,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CardConfig {
    pub total_digits: TotalDigits,
    pub zero_weight: ZeroWeightPolicy,
    pub override_policy: OverridePolicy,
    pub show_edit_icons: bool,
    pub numeric_step: f64,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            total_digits: TotalDigits::Adaptive,
            zero_weight: ZeroWeightPolicy::Propagate,
            override_policy: OverridePolicy::Verbatim,
            show_edit_icons: false,
            numeric_step: 0.5,
        }
    }
}

impl CardConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let cfg: CardConfig = serde_json::from_str(&text)
            .with_context(|| format!("parse config {}", path.display()))?;
        cfg.validate().map_err(anyhow::Error::msg)?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), String> {
        if let TotalDigits::Fixed(d) = self.total_digits {
            if d > 6 {
                return Err(format!("totalDigits must be <= 6, got {}", d));
            }
        }
        if !(self.numeric_step.is_finite() && self.numeric_step > 0.0) {
            return Err("numericStep must be a positive number".to_string());
        }
        Ok(())
    }

    /// Apply a partial update from the host. Unknown keys are rejected so a
    /// typo does not silently keep the old setting.
    pub fn apply_patch(&mut self, patch: &serde_json::Value) -> Result<(), String> {
        let obj = patch
            .as_object()
            .ok_or_else(|| "config patch must be an object".to_string())?;
        let mut next = self.clone();
        for (k, v) in obj {
            match k.as_str() {
                "totalDigits" => {
                    next.total_digits = serde_json::from_value(v.clone()).map_err(|_| {
                        "totalDigits must be \"adaptive\" or 0..=6".to_string()
                    })?;
                }
                "zeroWeight" => {
                    next.zero_weight = serde_json::from_value(v.clone()).map_err(|_| {
                        "zeroWeight must be one of: propagate, noGradeData".to_string()
                    })?;
                }
                "overridePolicy" => {
                    next.override_policy = serde_json::from_value(v.clone()).map_err(|_| {
                        "overridePolicy must be one of: verbatim, recompute".to_string()
                    })?;
                }
                "showEditIcons" => {
                    next.show_edit_icons = v
                        .as_bool()
                        .ok_or_else(|| "showEditIcons must be boolean".to_string())?;
                }
                "numericStep" => {
                    next.numeric_step = v
                        .as_f64()
                        .ok_or_else(|| "numericStep must be a number".to_string())?;
                }
                other => return Err(format!("unknown config key: {}", other)),
            }
        }
        next.validate()?;
        *self = next;
        Ok(())
    }
}
