use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::ProjectionError;
use crate::types::Rate;
use crate::ProjectionResult;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Flat corporate tax rate, as a fraction. Applied to losses too (tax benefit).
pub const DEFAULT_TAX_RATE: Rate = dec!(0.30);

/// Lowest annual growth rate accepted, in percent.
pub const DEFAULT_GROWTH_FLOOR_PCT: Rate = dec!(-50);

/// Highest annual growth rate accepted, in percent.
pub const DEFAULT_GROWTH_CEILING_PCT: Rate = dec!(200);

/// Lowest seasonality weight accepted (1.0 = an average month).
pub const DEFAULT_SEASONALITY_FLOOR: Decimal = dec!(0.1);

/// Highest seasonality weight accepted.
pub const DEFAULT_SEASONALITY_CEILING: Decimal = dec!(10);

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Tunable constants of the consolidation model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Tax rate as a fraction (0.30 = 30%)
    pub tax_rate: Rate,
    pub growth_floor_pct: Rate,
    pub growth_ceiling_pct: Rate,
    pub seasonality_floor: Decimal,
    pub seasonality_ceiling: Decimal,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tax_rate: DEFAULT_TAX_RATE,
            growth_floor_pct: DEFAULT_GROWTH_FLOOR_PCT,
            growth_ceiling_pct: DEFAULT_GROWTH_CEILING_PCT,
            seasonality_floor: DEFAULT_SEASONALITY_FLOOR,
            seasonality_ceiling: DEFAULT_SEASONALITY_CEILING,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> ProjectionResult<()> {
        if self.tax_rate < Decimal::ZERO || self.tax_rate > Decimal::ONE {
            return Err(ProjectionError::invalid(
                "tax_rate",
                format!("Tax rate must be a fraction between 0 and 1, got {}", self.tax_rate),
            ));
        }
        if self.growth_floor_pct > self.growth_ceiling_pct {
            return Err(ProjectionError::invalid(
                "growth_floor_pct",
                "Growth floor exceeds growth ceiling",
            ));
        }
        if self.seasonality_floor <= Decimal::ZERO
            || self.seasonality_floor > self.seasonality_ceiling
        {
            return Err(ProjectionError::invalid(
                "seasonality_floor",
                "Seasonality floor must be positive and not above the ceiling",
            ));
        }
        Ok(())
    }

    pub fn clamp_growth(&self, rate_pct: Rate) -> Rate {
        rate_pct.clamp(self.growth_floor_pct, self.growth_ceiling_pct)
    }

    pub fn clamp_seasonality(&self, weight: Decimal) -> Decimal {
        weight.clamp(self.seasonality_floor, self.seasonality_ceiling)
    }
}
