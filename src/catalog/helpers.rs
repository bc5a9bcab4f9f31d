//! Helper catalog
//!
//! The image generator script lists, for every indicator, its key, the full
//! constructor call and a title showing the helper method call:
//!
//! ```text
//!     'average-true-range': {
//!         'code': AverageTrueRange,
//!         'indicator': AverageTrueRange(20, MovingAverageType.Simple),
//!         'title' : 'ATR(symbol, 20, MovingAverageType.Simple)',
//! ```
//!
//! Only the title lines are matched, the key and the constructor are found
//! by walking back from them.

use regex::Regex;
use serde::Serialize;
use std::{collections::HashMap, fs, path::Path};

use crate::{
    config::DefaultHelperConfig,
    error::Error,
    utils::text::{call_arguments, normalize_key},
};

/// Distance between a title line and the line holding its key
const KEY_OFFSET: usize = 3;
/// Distance between a title line and the line holding the constructor call
const CONSTRUCTOR_OFFSET: usize = 1;
const QUOTES: &[char] = &['\'', '"'];

lazy_static! {
    static ref TITLE: Regex = Regex::new(r#"title['"]?\s*:.*\("#).unwrap();
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HelperEntry {
    pub method: String,
    pub arguments: String,
    pub constructor_arguments: Option<String>,
}

impl HelperEntry {
    /// Entry used when the catalog knows nothing about `type_name`
    pub fn fallback(type_name: &str, defaults: &DefaultHelperConfig) -> Self {
        Self {
            method: type_name.to_string(),
            arguments: defaults.arguments.clone(),
            constructor_arguments: defaults.constructor_arguments.clone(),
        }
    }

    /// Arguments following the first one (usually the symbol)
    pub fn trailing_arguments(&self) -> &str {
        match self.arguments.find(',') {
            Some(idx) if idx > 0 => self.arguments[idx + 1..].trim(),
            _ => self.arguments.as_str(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct HelperCatalog {
    entries: HashMap<String, HelperEntry>,
}

impl HelperCatalog {
    pub fn load(path: &Path) -> Result<Self, Error> {
        log::info!("Load helper catalog from {}", path.display());
        let content = fs::read_to_string(path)?;
        let catalog = Self::parse(&content);
        log::info!("Helper catalog loaded with {} entries.", catalog.len());
        Ok(catalog)
    }

    pub fn parse(content: &str) -> Self {
        let lines: Vec<&str> = content.lines().collect();
        let mut entries = HashMap::new();

        for (idx, line) in lines.iter().enumerate() {
            if !TITLE.is_match(line) {
                continue;
            }

            match parse_entry(&lines, idx) {
                Some((key, entry)) => {
                    log::debug!("Helper {} found for {}", entry.method, key);
                    entries.insert(key, entry);
                }
                None => log::warn!("Skip helper title at line {}: {}", idx + 1, line.trim()),
            }
        }

        Self { entries }
    }

    pub fn get(&self, stem: &str) -> Option<&HelperEntry> {
        self.entries.get(&normalize_key(stem))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

fn parse_entry(lines: &[&str], idx: usize) -> Option<(String, HelperEntry)> {
    let title = lines[idx];
    let key_line = lines.get(idx.checked_sub(KEY_OFFSET)?)?;
    let constructor_line = lines.get(idx.checked_sub(CONSTRUCTOR_OFFSET)?)?;

    let (head, _) = title.split_once('(')?;
    let method = head.split_whitespace().last()?.trim_start_matches(QUOTES);
    if method.is_empty() {
        return None;
    }

    let entry = HelperEntry {
        method: method.to_string(),
        arguments: call_arguments(title)?.to_string(),
        constructor_arguments: call_arguments(constructor_line).map(ToString::to_string),
    };

    Some((normalize_key(parse_key(key_line)?), entry))
}

/// Text before the first colon without its enclosing quotes
fn parse_key(line: &str) -> Option<&str> {
    let (head, _) = line.split_once(':')?;
    let mut chars = head.trim().chars();
    chars.next()?;
    chars.next_back()?;
    Some(chars.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[fixture]
    fn catalog_data() -> &'static str {
        r#"
class IndicatorImageGenerator:
    indicators = {
        'average-true-range': {
            'code': AverageTrueRange,
            'indicator': AverageTrueRange(20, MovingAverageType.Simple),
            'title' : 'ATR(symbol, 20, MovingAverageType.Simple)',
            'columns' : ['averagetruerange']
        },
        'Beta': {
            'code': Beta,
            'indicator': Beta("", reference, symbol, 3),
            'title' : 'B(symbol, reference, 3)',
        },
        'delay': {
            'code': Delay,
            'indicator': Delay(5),
            'title' : 'Delay(5)',
        },
    }
"#
    }

    #[rstest]
    fn test_parse(catalog_data: &str) {
        let catalog = HelperCatalog::parse(catalog_data);
        assert_eq!(catalog.len(), 3);

        let atr = catalog.get("average-true-range").unwrap();
        assert_eq!(atr.method, "ATR");
        assert_eq!(atr.arguments, "symbol, 20, MovingAverageType.Simple");
        assert_eq!(
            atr.constructor_arguments.as_deref(),
            Some("20, MovingAverageType.Simple")
        );
        assert_eq!(atr.trailing_arguments(), "20, MovingAverageType.Simple");

        let beta = catalog.get("BETA").unwrap();
        assert_eq!(beta.method, "B");
        assert_eq!(beta.constructor_arguments.as_deref(), Some(r#""", reference, symbol, 3"#));
    }

    #[rstest]
    fn test_single_argument(catalog_data: &str) {
        let catalog = HelperCatalog::parse(catalog_data);
        let delay = catalog.get("delay").unwrap();
        assert_eq!(delay.arguments, "5");
        assert_eq!(delay.trailing_arguments(), "5");
    }

    #[rstest]
    fn test_title_without_context() {
        let catalog = HelperCatalog::parse("'title' : 'ATR(symbol, 20)'");
        assert_eq!(catalog.len(), 0);
    }

    #[rstest]
    fn test_key_line_without_colon() {
        let catalog = HelperCatalog::parse(
            "    'average-true-range' {\n        'code': AverageTrueRange,\n        'indicator': AverageTrueRange(20),\n        'title' : 'ATR(symbol, 20)',\n",
        );
        assert_eq!(catalog.len(), 0);
        assert!(catalog.get("average-true-range").is_none());
    }

    #[rstest]
    fn test_missing_entry(catalog_data: &str) {
        let catalog = HelperCatalog::parse(catalog_data);
        assert!(catalog.get("relative-strength-index").is_none());

        let fallback =
            HelperEntry::fallback("RelativeStrengthIndex", &DefaultHelperConfig::default());
        assert_eq!(fallback.method, "RelativeStrengthIndex");
        assert_eq!(fallback.arguments, "symbol");
        assert_eq!(fallback.constructor_arguments, None);
    }
}
