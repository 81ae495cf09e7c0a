use serde::{Deserialize, Serialize};

use crate::item::{Rating, MAX_RATING, MIN_RATING};
use crate::{Error, Result};

/// Tunables for recommendation and title suggestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendConfig {
    /// How many most-similar raters form the neighbourhood
    pub neighbor_count: usize,
    /// Neighbour ratings below this are not treated as endorsements
    pub like_threshold: Rating,
    /// Recommendations returned when the caller does not ask for a count
    pub default_limit: usize,
    /// Title suggestions must score strictly above this
    pub suggestion_threshold: f64,
    pub suggestion_limit: usize,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            neighbor_count: 20,
            like_threshold: 3.5,
            default_limit: 5,
            suggestion_threshold: 0.5,
            suggestion_limit: 5,
        }
    }
}

impl RecommendConfig {
    pub fn validate(&self) -> Result<()> {
        if self.neighbor_count == 0 {
            return Err(Error::InvalidConfig("neighbor_count must be positive".into()));
        }
        if !(MIN_RATING..=MAX_RATING).contains(&self.like_threshold) {
            return Err(Error::InvalidConfig(format!(
                "like_threshold {} outside {}..={}",
                self.like_threshold, MIN_RATING, MAX_RATING
            )));
        }
        if !(0.0..1.0).contains(&self.suggestion_threshold) {
            return Err(Error::InvalidConfig(format!(
                "suggestion_threshold {} outside 0..1",
                self.suggestion_threshold
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(RecommendConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_values() {
        let config = RecommendConfig {
            neighbor_count: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let config = RecommendConfig {
            like_threshold: 7.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: RecommendConfig = serde_json::from_str(r#"{"neighbor_count": 40}"#).unwrap();
        assert_eq!(config.neighbor_count, 40);
        assert_eq!(config.like_threshold, 3.5);
        assert_eq!(config.suggestion_limit, 5);
    }
}
