//! Indicator type metadata
//!
//! Type descriptions come from an external dump of the indicator library
//! reflection data. The dump is either a single json or yaml document, or a
//! directory of json documents, each holding one type or a list of types.

use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs::{self, File},
    io::BufReader,
    path::Path,
};

use crate::error::Error;

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct PropertyMetadata {
    pub property_name: String,
    pub property_full_type_name: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TypeMetadata {
    pub type_name: String,
    pub full_type_name: String,
    pub base_type_full_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub properties: Vec<PropertyMetadata>,
}

/// Give the metadata of a fully qualified type name
pub trait TypeResolver {
    fn resolve(&self, full_type_name: &str) -> Result<TypeMetadata, Error>;
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogDocument {
    Many(Vec<TypeMetadata>),
    One(TypeMetadata),
}

impl From<CatalogDocument> for Vec<TypeMetadata> {
    fn from(document: CatalogDocument) -> Self {
        match document {
            CatalogDocument::Many(types) => types,
            CatalogDocument::One(metadata) => vec![metadata],
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct TypeCatalog {
    types: HashMap<String, TypeMetadata>,
}

impl TypeCatalog {
    pub fn new(types: Vec<TypeMetadata>) -> Self {
        Self {
            types: types
                .into_iter()
                .map(|metadata| (metadata.full_type_name.clone(), metadata))
                .collect(),
        }
    }

    pub fn load(path: &Path) -> Result<Self, Error> {
        log::info!("Load type catalog from {}", path.display());

        let types = if path.is_dir() {
            let mut files = fs::read_dir(path)?
                .map(|entry| entry.map(|e| e.path()))
                .collect::<Result<Vec<_>, _>>()?;
            files.sort();

            let mut types = vec![];
            for file in files.iter().filter(|f| has_extension(f, &["json"])) {
                types.extend(read_document(file)?);
            }
            types
        } else {
            read_document(path)?
        };

        let catalog = Self::new(types);
        log::info!("Type catalog loaded with {} types.", catalog.len());
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }
}

impl TypeResolver for TypeCatalog {
    fn resolve(&self, full_type_name: &str) -> Result<TypeMetadata, Error> {
        self.types
            .get(full_type_name.trim())
            .cloned()
            .ok_or_else(|| Error::TypeNotFound(full_type_name.to_string()))
    }
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|os_str| os_str.to_str())
        .map_or(false, |ext| extensions.contains(&ext))
}

fn read_document(path: &Path) -> Result<Vec<TypeMetadata>, Error> {
    let reader = BufReader::new(File::open(path)?);

    let document: CatalogDocument = if has_extension(path, &["json"]) {
        serde_json::from_reader(reader)?
    } else if has_extension(path, &["yaml", "yml"]) {
        serde_yaml::from_reader(reader)?
    } else {
        return Err(Error::Config(format!(
            "Invalid type catalog extension: {}",
            path.display()
        )));
    };

    Ok(document.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[fixture]
    fn metadata_data() -> &'static str {
        r#"
        {
            "type-name": "AverageTrueRange",
            "full-type-name": "QuantConnect.Indicators.AverageTrueRange",
            "base-type-full-name": "QuantConnect.Indicators.BarIndicator",
            "description": "The AverageTrueRange indicator is a measure of volatility.",
            "properties": [
                {
                    "property-name": "TrueRange",
                    "property-full-type-name": "QuantConnect.Indicators.IndicatorBase"
                }
            ]
        }
        "#
    }

    #[rstest]
    fn test_deserialize(metadata_data: &str) {
        let metadata = serde_json::from_str::<TypeMetadata>(metadata_data).unwrap();
        assert_eq!(metadata.type_name, "AverageTrueRange");
        assert_eq!(metadata.properties[0].property_name, "TrueRange");
    }

    #[rstest]
    fn test_default_fields() {
        let metadata = serde_json::from_str::<TypeMetadata>(
            r#"{"type-name": "Delay", "full-type-name": "QuantConnect.Indicators.Delay", "base-type-full-name": "QuantConnect.Indicators.Indicator"}"#,
        )
        .unwrap();
        assert!(metadata.description.is_empty());
        assert!(metadata.properties.is_empty());
    }

    #[rstest]
    fn test_load_directory(metadata_data: &str) {
        let dir = TempDir::new().unwrap();
        File::create(dir.path().join("atr.json"))
            .unwrap()
            .write_all(metadata_data.as_bytes())
            .unwrap();
        File::create(dir.path().join("README.md")).unwrap();

        let catalog = TypeCatalog::load(dir.path()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(
            catalog
                .resolve("QuantConnect.Indicators.AverageTrueRange")
                .unwrap()
                .base_type_full_name,
            "QuantConnect.Indicators.BarIndicator"
        );
        assert!(matches!(
            catalog.resolve("QuantConnect.Indicators.Missing"),
            Err(Error::TypeNotFound(_))
        ));
    }

    #[rstest]
    fn test_load_yaml_list() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("types.yaml");
        File::create(&path)
            .unwrap()
            .write_all(
                b"- type-name: Delta\n  full-type-name: QuantConnect.Indicators.Delta\n  base-type-full-name: QuantConnect.Indicators.OptionGreeksIndicatorBase\n",
            )
            .unwrap();

        let catalog = TypeCatalog::load(&path).unwrap();
        assert_eq!(catalog.resolve("QuantConnect.Indicators.Delta").unwrap().type_name, "Delta");
    }
}
