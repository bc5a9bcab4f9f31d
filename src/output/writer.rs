//! Content tree writer
//!
//! The indicators folder is removed and generated again on every run:
//!
//! ```text
//! <indicators>/
//!     00.json
//!     00 Candlestick Patterns/
//!         00.json
//!         01 Doji/
//!     001 Acceleration Bands/
//!         01 Introduction.html
//!         02 Using ABANDS Indicator.php
//!         03 Visualization.php
//!         metadata.json
//! ```

use itertools::Itertools;
use std::{
    fs,
    io::ErrorKind,
    path::{Component, Path, PathBuf},
};

use super::document::{
    CountSnippet, Document, Introduction, LandingPage, Metadata, Render, Usage, Visualization,
};
use crate::{
    config::GeneratorConfig,
    error::Error,
    indicator::{IndicatorRecord, Records},
    utils::text::{replace_last, slugify, strip_number_prefix},
};

const CANDLESTICK_FOLDER: &str = "00 Candlestick Patterns";
const INDICATOR_COUNT_FILE: &str = "indicator_count.html";
const CANDLESTICK_COUNT_FILE: &str = "candlestick_pattern_count.html";
const INDICATORS_HEADING: &str = "Supported Indicators";
const INDICATORS_CONTENT: &str = "<p>Indicators translate a stream of data points into a numerical value you can use to detect trading opportunities. LEAN provides more than 100 pre-built technical indicators and candlestick patterns you can use in your algorithms. You can use any of the following indicators. Click one to learn more.</p>";
const CANDLESTICK_HEADING: &str = "Candlestick Patterns";
const CANDLESTICK_CONTENT: &str =
    "<p>You can use any of the following candlestick patterns. Click one to learn more.</p>";

/// Number of folders written in each numbering space
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Summary {
    pub indicators: usize,
    pub candlestick_patterns: usize,
}

/// Number the records in key order, candlestick patterns apart from the others.
/// Folders are relative to the indicators root.
pub fn assign_folders(records: &Records) -> (Summary, Vec<(&IndicatorRecord, PathBuf)>) {
    let mut summary = Summary::default();
    let mut folders = Vec::with_capacity(records.len());

    for (key, record) in records.iter() {
        let folder = if record.is_candlestick_pattern {
            summary.candlestick_patterns += 1;
            Path::new(CANDLESTICK_FOLDER)
                .join(format!("{:02} {}", summary.candlestick_patterns, key))
        } else {
            summary.indicators += 1;
            PathBuf::from(format!("{:03} {}", summary.indicators, key))
        };
        folders.push((record, folder));
    }

    (summary, folders)
}

pub struct OutputWriter<'a> {
    config: &'a GeneratorConfig,
}

impl<'a> OutputWriter<'a> {
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn write(&self, records: &Records) -> Result<Summary, Error> {
        let root = self.config.paths.indicators();
        reset_tree(&root)?;

        let (summary, folders) = assign_folders(records);

        let counts = self.config.paths.counts();
        fs::create_dir_all(&counts)?;
        write_documents(
            &counts,
            &[
                Document::from(CountSnippet {
                    file_name: INDICATOR_COUNT_FILE.to_string(),
                    text: format!("There are {} indicators.", summary.indicators),
                }),
                Document::from(CountSnippet {
                    file_name: CANDLESTICK_COUNT_FILE.to_string(),
                    text: format!(
                        "There are {} candlestick pattern indicators.",
                        summary.candlestick_patterns
                    ),
                }),
            ],
        )?;

        write_documents(
            &root,
            &[Document::from(LandingPage {
                heading: INDICATORS_HEADING.to_string(),
                content: INDICATORS_CONTENT.to_string(),
                features: 0..summary.indicators,
            })],
        )?;
        write_documents(
            &root.join(CANDLESTICK_FOLDER),
            &[Document::from(LandingPage {
                heading: CANDLESTICK_HEADING.to_string(),
                content: CANDLESTICK_CONTENT.to_string(),
                features: 1..summary.candlestick_patterns + 1,
            })],
        )?;

        for (record, folder) in folders.iter() {
            let documents = self.documents(record, folder)?;
            let path = root.join(folder);
            fs::create_dir_all(&path)?;
            write_documents(&path, &documents)?;
        }

        log::info!(
            "{} indicators and {} candlestick patterns written to {}",
            summary.indicators,
            summary.candlestick_patterns,
            root.display()
        );
        Ok(summary)
    }

    /// Documents of one indicator folder
    pub fn documents(
        &self,
        record: &IndicatorRecord,
        folder: &Path,
    ) -> Result<Vec<Document>, Error> {
        let config = self.config;
        let shape = record
            .update_shape
            .ok_or_else(|| Error::UnresolvableTypeHierarchy(record.full_type_name.clone()))?;

        let mut image = self.image_source(folder);
        let mut documents = vec![
            Document::from(Introduction {
                description: record.description.clone(),
                source: record.source.clone(),
                is_candlestick_pattern: record.is_candlestick_pattern,
            }),
            Document::from(Usage {
                method_container: config.site.method_container.clone(),
                template: config.site.using_template.clone(),
                has_reference: record.helper.arguments.contains("reference"),
                has_automatic_indicator_helper: config.has_automatic_helper(&record.type_name),
                helper_prefix: if record.is_candlestick_pattern {
                    format!("{}.", config.markers.candlestick)
                } else {
                    String::new()
                },
                type_name: record.type_name.clone(),
                helper_name: record.helper.method.clone(),
                helper_arguments: record.helper.arguments.clone(),
                properties: record.properties.indicators_literal(),
                other_properties: record.properties.numerics_literal(),
                update_parameter_type: shape.parameter_type().to_string(),
                constructor_arguments: record
                    .helper
                    .constructor_arguments
                    .clone()
                    .unwrap_or_default(),
                update_parameter_value: shape.parameter_value().to_string(),
                has_moving_average_type_parameter: record.has_moving_average_type_parameter,
                constructor_box: slugify(&record.key),
                is_option_indicator: config.is_option_indicator(&record.type_name),
            }),
        ];

        if !record.is_candlestick_pattern {
            documents.push(Document::from(Visualization {
                template: config.site.visualization_template.clone(),
                type_name: record.type_name.clone(),
                image_source: image.clone(),
            }));
            image = replace_last(&image, "/", "/-");
        }

        documents.push(Document::from(Metadata {
            key: record.key.clone(),
            description: record.description.clone(),
            site_name: config.site.site_name.clone(),
            image,
        }));

        Ok(documents)
    }

    /// Image of a folder, named after its path without the numbering
    pub fn image_source(&self, folder: &Path) -> String {
        let name = self
            .config
            .paths
            .indicators
            .join(folder)
            .components()
            .filter_map(|component| match component {
                Component::Normal(part) => part.to_str(),
                _ => None,
            })
            .map(|part| slugify(strip_number_prefix(part)))
            .join("/");
        format!("{}{}.png", self.config.site.image_base, name)
    }
}

/// Remove the previous tree and create the empty candlestick folder
fn reset_tree(root: &Path) -> Result<(), Error> {
    match fs::remove_dir_all(root) {
        Ok(()) => log::info!("Removed previous tree {}", root.display()),
        Err(error) if error.kind() == ErrorKind::NotFound => {}
        Err(error) => return Err(error.into()),
    }
    fs::create_dir_all(root.join(CANDLESTICK_FOLDER))?;
    Ok(())
}

fn write_documents(dir: &Path, documents: &[Document]) -> Result<(), Error> {
    for document in documents {
        let path = dir.join(document.file_name());
        log::debug!("Write {}", path.display());
        fs::write(path, document.render()?)?;
    }
    Ok(())
}
