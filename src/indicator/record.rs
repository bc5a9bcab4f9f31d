use regex::Regex;
use serde::Serialize;
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};
use url::Url;

use super::{hierarchy::UpdateShape, properties::PropertyLists};
use crate::{
    catalog::{HelperCatalog, HelperEntry, TypeResolver},
    config::GeneratorConfig,
    error::Error,
    utils::text::humanize,
};

const SOURCE_MARKER: &str = "Source: ";
const SOURCE_EXTENSION: &str = ".cs";

lazy_static! {
    static ref LINK: Regex = Regex::new(r"https?://\S+").unwrap();
}

/// Records keyed by humanized type name, iterated in lexicographic order
pub type Records = BTreeMap<String, IndicatorRecord>;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct IndicatorRecord {
    pub key: String,
    pub type_name: String,
    pub full_type_name: String,
    pub base_type_full_name: String,
    pub description: String,
    pub source: String,
    pub helper: HelperEntry,
    pub has_moving_average_type_parameter: bool,
    pub is_candlestick_pattern: bool,
    pub properties: PropertyLists,
    /// Set once the whole type hierarchy is known
    pub update_shape: Option<UpdateShape>,
}

pub struct RecordBuilder<'a, R: TypeResolver> {
    config: &'a GeneratorConfig,
    helpers: &'a HelperCatalog,
    resolver: &'a R,
}

impl<'a, R: TypeResolver> RecordBuilder<'a, R> {
    pub fn new(config: &'a GeneratorConfig, helpers: &'a HelperCatalog, resolver: &'a R) -> Self {
        Self {
            config,
            helpers,
            resolver,
        }
    }

    /// Build one record per source snippet found in `dir`
    pub fn build_all(&self, dir: &Path) -> Result<Records, Error> {
        log::info!("Read indicator constructors from {}", dir.display());

        let mut files = fs::read_dir(dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<Vec<PathBuf>, _>>()?;
        files.sort();

        let mut records = Records::new();
        for file in files.iter().filter(|f| f.is_file()) {
            let stem = match file.file_stem().and_then(|s| s.to_str()) {
                Some(stem) if !stem.starts_with('.') => stem,
                _ => continue,
            };

            let content = fs::read_to_string(file)?;
            let record = self.build(stem, &content).map_err(|error| {
                log::error!("Failed to build {}: {}", file.display(), error);
                error
            })?;

            if let Some(previous) = records.insert(record.key.clone(), record) {
                log::warn!(
                    "{} replaces a previous record of {}",
                    file.display(),
                    previous.full_type_name
                );
            }
        }

        log::info!("{} indicator records built.", records.len());
        Ok(records)
    }

    pub fn build(&self, stem: &str, content: &str) -> Result<IndicatorRecord, Error> {
        let markers = &self.config.markers;

        let identifier = extract_identifier(stem, content, &markers.namespace)?;
        let metadata = self.resolver.resolve(identifier)?;
        let key = humanize(&metadata.type_name);

        let description = if identifier.contains(&markers.candlestick) {
            format!(
                "Create a new {} to indicate the pattern's presence.",
                metadata.description
            )
        } else {
            format_description(&metadata.description)?
        };

        let source = extract_source(stem, content, &markers.source_prefix)?;
        Url::parse(source)?;

        let helper = self
            .helpers
            .get(stem)
            .cloned()
            .unwrap_or_else(|| HelperEntry::fallback(&metadata.type_name, &self.config.helper));
        log::debug!(
            "{} uses helper {} with trailing arguments `{}`",
            key,
            helper.method,
            helper.trailing_arguments()
        );

        Ok(IndicatorRecord {
            is_candlestick_pattern: metadata.full_type_name.contains(&markers.candlestick),
            has_moving_average_type_parameter: content.contains(&markers.moving_average_type),
            properties: PropertyLists::partition(&metadata.properties, self.config),
            description,
            source: source.to_string(),
            helper,
            key,
            type_name: metadata.type_name,
            full_type_name: metadata.full_type_name,
            base_type_full_name: metadata.base_type_full_name,
            update_shape: None,
        })
    }
}

/// Fully qualified type name of the constructor call
fn extract_identifier<'c>(stem: &str, content: &'c str, namespace: &str) -> Result<&'c str, Error> {
    let start = content.find(namespace).ok_or_else(|| missing(stem, namespace))?;
    let length = content[start..].find('(').ok_or_else(|| missing(stem, "("))?;
    Ok(content[start..start + length].trim())
}

/// Link to the implementation, up to and including the file extension
fn extract_source<'c>(stem: &str, content: &'c str, prefix: &str) -> Result<&'c str, Error> {
    let start = content.find(prefix).ok_or_else(|| missing(stem, prefix))?;
    let length = content[start..]
        .find(SOURCE_EXTENSION)
        .ok_or_else(|| missing(stem, SOURCE_EXTENSION))?;
    Ok(content[start..start + length + SOURCE_EXTENSION.len()].trim())
}

fn missing(stem: &str, marker: &str) -> Error {
    Error::MissingMarker {
        file: stem.to_string(),
        marker: marker.to_string(),
    }
}

/// Reword the summary and replace everything from `Source: ` on with a superscript link
pub fn format_description(text: &str) -> Result<String, Error> {
    let text = text.replace("Represents", "This indicator represents");

    let idx = match text.find(SOURCE_MARKER) {
        Some(idx) => idx,
        None => return Ok(text),
    };
    let (prefix, suffix) = text.split_at(idx);
    let suffix = &suffix[SOURCE_MARKER.len()..];

    let links: Vec<_> = LINK.find_iter(suffix).collect();
    match links.as_slice() {
        [] => Ok(text.clone()),
        [link] => {
            let href = match link.as_str().strip_prefix("http://") {
                Some(rest) => format!("https://{}", rest),
                None => link.as_str().to_string(),
            };
            Ok(format!("{}<sup><a href=\"{}\">source</a></sup>", prefix, href))
        }
        _ => Err(Error::AmbiguousSourceLink(text.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{PropertyMetadata, TypeCatalog, TypeMetadata};
    use rstest::*;

    #[fixture]
    fn catalog() -> TypeCatalog {
        TypeCatalog::new(vec![
            TypeMetadata {
                type_name: String::from("AverageTrueRange"),
                full_type_name: String::from("QuantConnect.Indicators.AverageTrueRange"),
                base_type_full_name: String::from("QuantConnect.Indicators.BarIndicator"),
                description: String::from(
                    "Represents the average true range. Source: http://www.investopedia.com/atr",
                ),
                properties: vec![PropertyMetadata {
                    property_name: String::from("TrueRange"),
                    property_full_type_name: String::from("QuantConnect.Indicators.IndicatorBase"),
                }],
            },
            TypeMetadata {
                type_name: String::from("Doji"),
                full_type_name: String::from("QuantConnect.Indicators.CandlestickPatterns.Doji"),
                base_type_full_name: String::from(
                    "QuantConnect.Indicators.CandlestickPatterns.CandlestickPattern",
                ),
                description: String::from("Doji candlestick pattern indicator"),
                properties: vec![],
            },
        ])
    }

    #[fixture]
    fn helpers() -> HelperCatalog {
        HelperCatalog::parse(
            "    'average-true-range': {\n        'code': AverageTrueRange,\n        'indicator': AverageTrueRange(20),\n        'title' : 'ATR(symbol, 20)',\n",
        )
    }

    const ATR_SNIPPET: &str = r#"
        var atr = new QuantConnect.Indicators.AverageTrueRange(20, MovingAverageType.Simple);
        // https://github.com/QuantConnect/Lean/blob/master/Indicators/AverageTrueRange.cs
    "#;

    const DOJI_SNIPPET: &str = r#"
        var doji = new QuantConnect.Indicators.CandlestickPatterns.Doji();
        // https://github.com/QuantConnect/Lean/blob/master/Indicators/CandlestickPatterns/Doji.cs
    "#;

    #[rstest]
    fn test_build(catalog: TypeCatalog, helpers: HelperCatalog) {
        let config = GeneratorConfig::default();
        let builder = RecordBuilder::new(&config, &helpers, &catalog);
        let record = builder.build("average-true-range", ATR_SNIPPET).unwrap();

        assert_eq!(record.key, "Average True Range");
        assert_eq!(
            record.description,
            "This indicator represents the average true range. <sup><a href=\"https://www.investopedia.com/atr\">source</a></sup>"
        );
        assert_eq!(
            record.source,
            "https://github.com/QuantConnect/Lean/blob/master/Indicators/AverageTrueRange.cs"
        );
        assert_eq!(record.helper.method, "ATR");
        assert_eq!(record.helper.arguments, "symbol, 20");
        assert!(record.has_moving_average_type_parameter);
        assert!(!record.is_candlestick_pattern);
        assert_eq!(record.properties.indicators, vec!["TrueRange"]);
        assert_eq!(record.update_shape, None);
    }

    #[rstest]
    fn test_build_candlestick(catalog: TypeCatalog, helpers: HelperCatalog) {
        let config = GeneratorConfig::default();
        let builder = RecordBuilder::new(&config, &helpers, &catalog);
        let record = builder.build("doji", DOJI_SNIPPET).unwrap();

        assert!(record.is_candlestick_pattern);
        assert_eq!(
            record.description,
            "Create a new Doji candlestick pattern indicator to indicate the pattern's presence."
        );
        assert!(!record.has_moving_average_type_parameter);
    }

    #[rstest]
    fn test_helper_fallback(catalog: TypeCatalog) {
        let config = GeneratorConfig::default();
        let helpers = HelperCatalog::default();
        let builder = RecordBuilder::new(&config, &helpers, &catalog);
        let record = builder.build("average-true-range", ATR_SNIPPET).unwrap();

        assert_eq!(record.helper.method, "AverageTrueRange");
        assert_eq!(record.helper.arguments, "symbol");
        assert_eq!(record.helper.constructor_arguments, None);
    }

    #[rstest]
    #[case::no_namespace("var x = 1;", "QuantConnect")]
    #[case::no_call("QuantConnect.Indicators.AverageTrueRange", "(")]
    #[case::no_source(
        "QuantConnect.Indicators.AverageTrueRange()",
        "https://github.com/QuantConnect/Lean/blob/master/Indicators/"
    )]
    fn test_missing_marker(catalog: TypeCatalog, #[case] content: &str, #[case] expected: &str) {
        let config = GeneratorConfig::default();
        let helpers = HelperCatalog::default();
        let builder = RecordBuilder::new(&config, &helpers, &catalog);

        match builder.build("average-true-range", content) {
            Err(Error::MissingMarker { marker, .. }) => assert_eq!(marker, expected),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[rstest]
    #[case::plain("Represents a moving average.", "This indicator represents a moving average.")]
    #[case::no_link("Computes a value. Source: the book", "Computes a value. Source: the book")]
    #[case::https(
        "Computes a value. Source: https://example.com/a",
        "Computes a value. <sup><a href=\"https://example.com/a\">source</a></sup>"
    )]
    #[case::text_around_link(
        "Computes X. Source: see https://example.com/a (archived copy)",
        "Computes X. <sup><a href=\"https://example.com/a\">source</a></sup>"
    )]
    fn test_format_description(#[case] text: &str, #[case] expected: &str) {
        assert_eq!(format_description(text).unwrap(), expected);
    }

    #[rstest]
    fn test_format_description_many_links() {
        assert!(matches!(
            format_description("Source: https://a.com and https://b.com"),
            Err(Error::AmbiguousSourceLink(_))
        ));
    }

    #[rstest]
    fn test_build_all(catalog: TypeCatalog, helpers: HelperCatalog) {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(dir.path().join("average-true-range.py"), ATR_SNIPPET).unwrap();
        fs::write(dir.path().join("doji.py"), DOJI_SNIPPET).unwrap();

        let config = GeneratorConfig::default();
        let builder = RecordBuilder::new(&config, &helpers, &catalog);
        let records = builder.build_all(dir.path()).unwrap();

        assert_eq!(
            records.keys().collect::<Vec<_>>(),
            vec!["Average True Range", "Doji"]
        );
    }
}
