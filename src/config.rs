use serde::Deserialize;
use std::{
    fs::File,
    io::{BufReader, Read},
    path::{Component, Path, PathBuf},
};

use crate::error::Error;

const DEFAULT_HELPER_ARGUMENTS: &str = "symbol";

/// Locations of the inputs and outputs, relative to `root`
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub root: PathBuf,
    pub constructors: PathBuf,
    pub helper_catalog: PathBuf,
    pub type_catalog: PathBuf,
    pub counts: PathBuf,
    pub indicators: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            constructors: PathBuf::from("Resources/indicators/constructors"),
            helper_catalog: PathBuf::from("Resources/indicators/IndicatorImageGenerator.py"),
            type_catalog: PathBuf::from("Resources/indicators/indicator-types.json"),
            counts: PathBuf::from("Resources/indicators"),
            indicators: PathBuf::from(
                "03 Writing Algorithms/28 Indicators/01 Supported Indicators",
            ),
        }
    }
}

impl PathsConfig {
    pub fn constructors(&self) -> PathBuf {
        self.root.join(&self.constructors)
    }

    pub fn helper_catalog(&self) -> PathBuf {
        self.root.join(&self.helper_catalog)
    }

    pub fn type_catalog(&self) -> PathBuf {
        self.root.join(&self.type_catalog)
    }

    pub fn counts(&self) -> PathBuf {
        self.root.join(&self.counts)
    }

    pub fn indicators(&self) -> PathBuf {
        self.root.join(&self.indicators)
    }
}

/// Fixed substrings searched in the source snippets and type names
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct MarkersConfig {
    pub namespace: String,
    pub indicators_namespace: String,
    pub candlestick: String,
    pub source_prefix: String,
    pub collection_prefix: String,
    pub moving_average_type: String,
}

impl Default for MarkersConfig {
    fn default() -> Self {
        Self {
            namespace: String::from("QuantConnect"),
            indicators_namespace: String::from("QuantConnect.Indicators"),
            candlestick: String::from("CandlestickPatterns"),
            source_prefix: String::from(
                "https://github.com/QuantConnect/Lean/blob/master/Indicators/",
            ),
            collection_prefix: String::from("System.Collection"),
            moving_average_type: String::from("MovingAverageType"),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub image_base: String,
    pub site_name: String,
    pub method_container: String,
    pub using_template: String,
    pub visualization_template: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            image_base: String::from("https://cdn.quantconnect.com/docs/i/"),
            site_name: String::from("Using Indicators on QuantConnect.com"),
            method_container: String::from("/qcalgorithm-api/_method_container.html"),
            using_template: String::from("/indicators/using-indicator.php"),
            visualization_template: String::from("/indicators/visualization.php"),
        }
    }
}

/// Helper entry used when the catalog has nothing for an indicator.
/// The method always falls back to the indicator type name.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct DefaultHelperConfig {
    pub arguments: String,
    pub constructor_arguments: Option<String>,
}

impl Default for DefaultHelperConfig {
    fn default() -> Self {
        Self {
            arguments: DEFAULT_HELPER_ARGUMENTS.to_string(),
            constructor_arguments: None,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub paths: PathsConfig,
    pub markers: MarkersConfig,
    pub site: SiteConfig,
    pub helper: DefaultHelperConfig,
    pub excluded_properties: Vec<String>,
    pub option_indicators: Vec<String>,
    pub no_automatic_helper: Vec<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            paths: PathsConfig::default(),
            markers: MarkersConfig::default(),
            site: SiteConfig::default(),
            helper: DefaultHelperConfig::default(),
            excluded_properties: [
                "MovingAverageType",
                "IsReady",
                "WarmUpPeriod",
                "Name",
                "Period",
                "Samples",
                "Current",
                "Consolidators",
                "Previous",
                "Window",
                "[System.Int32]",
            ]
            .iter()
            .map(ToString::to_string)
            .collect(),
            option_indicators: ["ImpliedVolatility", "Delta", "Gamma", "Vega", "Theta", "Rho"]
                .iter()
                .map(ToString::to_string)
                .collect(),
            no_automatic_helper: vec![String::from("Delay")],
        }
    }
}

impl GeneratorConfig {
    pub fn try_from(path: &Path) -> Result<Self, Error> {
        log::info!("use config {}", path.display());

        let reader: Box<dyn Read> = Box::new(BufReader::new(File::open(path)?));

        let config: GeneratorConfig = match path.extension() {
            None => Err(Error::Config(
                path.to_str().unwrap_or("Invalid path.").to_string(),
            )),
            Some(os_str) => match os_str.to_str() {
                Some("json") => serde_json::from_reader(reader).map_err(Error::from),
                Some("yaml") | Some("yml") => serde_yaml::from_reader(reader).map_err(Error::from),
                _ => Err(Error::Config("Invalid extension.".to_string())),
            },
        }?;

        config.validate()?;
        Ok(config)
    }

    /// The indicators tree is removed on every run so it cannot be the root itself
    fn validate(&self) -> Result<(), Error> {
        let indicators = &self.paths.indicators;
        if indicators
            .components()
            .all(|component| matches!(component, Component::CurDir))
        {
            return Err(Error::Config(format!(
                "Indicators path `{}` resolves to the root.",
                indicators.display()
            )));
        }
        Ok(())
    }

    /// Load the file if any, otherwise fall back on the defaults
    pub fn load(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(path) => Self::try_from(path),
            None => {
                log::info!("No config given, use defaults.");
                Ok(Self::default())
            }
        }
    }

    pub fn is_option_indicator(&self, type_name: &str) -> bool {
        self.option_indicators.iter().any(|name| name == type_name)
    }

    pub fn has_automatic_helper(&self, type_name: &str) -> bool {
        !self.no_automatic_helper.iter().any(|name| name == type_name)
    }
}
