use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{EngineError, Result};

/// engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// business timezone, used to turn "now" into "today"
    pub local_utc_offset_minutes: i32,
    /// installment counts offered at checkout; empty means any count >= 1
    pub offered_installment_counts: Vec<u32>,
    pub currency: CurrencyFormat,
}

/// currency display format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyFormat {
    pub symbol: String,
    pub decimal_separator: char,
    pub thousands_separator: char,
}

impl CurrencyFormat {
    pub fn brl() -> Self {
        Self {
            symbol: "R$".to_string(),
            decimal_separator: ',',
            thousands_separator: '.',
        }
    }

    pub fn usd() -> Self {
        Self {
            symbol: "$".to_string(),
            decimal_separator: '.',
            thousands_separator: ',',
        }
    }
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self::usd()
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            local_utc_offset_minutes: 0,
            offered_installment_counts: Vec::new(),
            currency: CurrencyFormat::default(),
        }
    }
}

impl EngineConfig {
    /// storefront selling in BRL from a UTC-3 shop
    pub fn storefront() -> Self {
        Self {
            local_utc_offset_minutes: -180,
            offered_installment_counts: vec![1, 2, 3, 4, 5, 6, 10, 12],
            currency: CurrencyFormat::brl(),
        }
    }

    /// load and validate configuration from json
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.local_utc_offset_minutes.abs() > 14 * 60 {
            return Err(EngineError::InvalidConfiguration {
                message: format!(
                    "utc offset {} minutes outside +/-14h",
                    self.local_utc_offset_minutes
                ),
            });
        }

        if self.offered_installment_counts.contains(&0) {
            return Err(EngineError::InvalidConfiguration {
                message: "offered installment counts must be >= 1".to_string(),
            });
        }

        Ok(())
    }

    /// check a requested installment count against the offered list
    pub fn check_installment_count(&self, count: u32) -> Result<()> {
        if count == 0 {
            return Err(EngineError::InvalidInstallmentCount { count });
        }

        if !self.offered_installment_counts.is_empty()
            && !self.offered_installment_counts.contains(&count)
        {
            return Err(EngineError::InstallmentCountNotOffered {
                count,
                offered: self.offered_installment_counts.clone(),
            });
        }

        Ok(())
    }

    pub fn local_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.local_utc_offset_minutes * 60)
            .unwrap_or_else(|| Utc.fix())
    }

    /// calendar day of `now` in the business timezone
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.local_offset()).date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.local_utc_offset_minutes, 0);
        assert!(config.check_installment_count(7).is_ok());
        assert!(matches!(
            config.check_installment_count(0),
            Err(EngineError::InvalidInstallmentCount { count: 0 })
        ));
    }

    #[test]
    fn test_storefront_offered_counts() {
        let config = EngineConfig::storefront();
        assert!(config.validate().is_ok());
        assert!(config.check_installment_count(10).is_ok());
        assert!(matches!(
            config.check_installment_count(7),
            Err(EngineError::InstallmentCountNotOffered { count: 7, .. })
        ));
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = EngineConfig::from_json_str(r#"{ "local_utc_offset_minutes": -180 }"#).unwrap();
        assert_eq!(config.local_utc_offset_minutes, -180);
        assert_eq!(config.currency, CurrencyFormat::usd());
        assert!(config.offered_installment_counts.is_empty());
    }

    #[test]
    fn test_from_json_rejects_invalid_values() {
        assert!(matches!(
            EngineConfig::from_json_str(r#"{ "local_utc_offset_minutes": 900 }"#),
            Err(EngineError::InvalidConfiguration { .. })
        ));
        assert!(matches!(
            EngineConfig::from_json_str(r#"{ "offered_installment_counts": [0, 2] }"#),
            Err(EngineError::InvalidConfiguration { .. })
        ));
        assert!(matches!(
            EngineConfig::from_json_str("not json"),
            Err(EngineError::Serialization(_))
        ));
    }

    #[test]
    fn test_today_uses_business_timezone() {
        // 01:30 UTC on the 10th is still the 9th in UTC-3
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 1, 30, 0).unwrap();

        let utc = EngineConfig::default();
        assert_eq!(utc.today(now), NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());

        let shop = EngineConfig::storefront();
        assert_eq!(shop.today(now), NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
    }
}
