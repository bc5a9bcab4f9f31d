use itertools::Itertools;
use serde::Serialize;

use crate::{catalog::PropertyMetadata, config::GeneratorConfig};

/// Plottable properties of an indicator
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PropertyLists {
    /// Properties holding another indicator
    pub indicators: Vec<String>,
    /// Properties holding a plain value
    pub numerics: Vec<String>,
}

impl PropertyLists {
    pub fn partition(properties: &[PropertyMetadata], config: &GeneratorConfig) -> Self {
        let mut lists = Self::default();

        for property in properties {
            let name = &property.property_name;
            if config.excluded_properties.contains(name) {
                continue;
            }
            // lists cannot be plotted
            let full_type = &property.property_full_type_name;
            if full_type.starts_with(&config.markers.collection_prefix) {
                continue;
            }
            if full_type.starts_with(&config.markers.namespace) {
                lists.indicators.push(name.clone());
            } else {
                lists.numerics.push(name.clone());
            }
        }

        lists
    }

    pub fn indicators_literal(&self) -> String {
        array_literal(&self.indicators)
    }

    pub fn numerics_literal(&self) -> String {
        array_literal(&self.numerics)
    }
}

/// Render names as a php array literal, e.g. `array("Upper","Lower")`
fn array_literal(names: &[String]) -> String {
    format!(
        "array({})",
        names.iter().map(|name| format!("\"{}\"", name)).join(",")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    fn property(name: &str, full_type: &str) -> PropertyMetadata {
        PropertyMetadata {
            property_name: name.to_string(),
            property_full_type_name: full_type.to_string(),
        }
    }

    #[fixture]
    fn properties() -> Vec<PropertyMetadata> {
        vec![
            property("UpperBand", "QuantConnect.Indicators.IndicatorBase`1"),
            property("LowerBand", "QuantConnect.Indicators.IndicatorBase`1"),
            property("BandWidth", "System.Decimal"),
            property("IsReady", "System.Boolean"),
            property("WarmUpPeriod", "System.Int32"),
            property("Window", "QuantConnect.Indicators.RollingWindow`1"),
            property("History", "System.Collections.Generic.List`1"),
            property("Current", "QuantConnect.Indicators.IndicatorDataPoint"),
        ]
    }

    #[rstest]
    fn test_partition(properties: Vec<PropertyMetadata>) {
        let lists = PropertyLists::partition(&properties, &GeneratorConfig::default());

        assert_eq!(lists.indicators, vec!["UpperBand", "LowerBand"]);
        assert_eq!(lists.numerics, vec!["BandWidth"]);
        assert_eq!(lists.indicators_literal(), r#"array("UpperBand","LowerBand")"#);
        assert_eq!(lists.numerics_literal(), r#"array("BandWidth")"#);
    }

    #[rstest]
    fn test_excluded_never_listed(properties: Vec<PropertyMetadata>) {
        let config = GeneratorConfig::default();
        let lists = PropertyLists::partition(&properties, &config);

        for name in config.excluded_properties.iter() {
            assert!(!lists.indicators.contains(name));
            assert!(!lists.numerics.contains(name));
        }
    }

    #[rstest]
    fn test_empty() {
        let lists = PropertyLists::partition(&[], &GeneratorConfig::default());
        assert_eq!(lists.indicators_literal(), "array()");
        assert_eq!(lists.numerics_literal(), "array()");
    }
}
