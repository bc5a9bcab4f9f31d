//! Generated documents
//!
//! Every file of the content tree is a [`Document`]: it knows its file name
//! and how to render itself.

use enum_dispatch::enum_dispatch;
use serde::Serialize;
use serde_json::{ser::PrettyFormatter, Map, Serializer, Value};

use crate::{error::Error, utils::text::truncate};

/// Marker flagging html and php files as produced by this tool
pub const TAG: &str = concat!("<!-- Code generated by ", env!("CARGO_PKG_NAME"), " -->");

const LANDING_FILE: &str = "00.json";
const METADATA_FILE: &str = "metadata.json";
const JSON_INDENT: &[u8] = b"    ";
const MAX_DESCRIPTION_LENGTH: usize = 127;
const CROSS_REFERENCE_OPEN: &str = "<see cref=\"T:";
const CROSS_REFERENCE_CLOSE: &str = "\" />";

#[enum_dispatch]
pub trait Render {
    fn file_name(&self) -> String;
    fn render(&self) -> Result<String, Error>;
}

#[enum_dispatch(Render)]
#[derive(Clone, Debug)]
pub enum Document {
    Count(CountSnippet),
    Landing(LandingPage),
    Introduction(Introduction),
    Usage(Usage),
    Visualization(Visualization),
    Metadata(Metadata),
}

fn to_pretty_json<T: Serialize>(value: &T) -> Result<String, Error> {
    let mut buffer = Vec::new();
    let mut serializer =
        Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(JSON_INDENT));
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8(buffer)?)
}

fn php_bool(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

/// One sentence html snippet, e.g. `There are 3 indicators.`
#[derive(Clone, Debug)]
pub struct CountSnippet {
    pub file_name: String,
    pub text: String,
}

impl Render for CountSnippet {
    fn file_name(&self) -> String {
        self.file_name.clone()
    }

    fn render(&self) -> Result<String, Error> {
        Ok(format!("{}\n{}", TAG, self.text))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LandingDocument<'a> {
    r#type: &'a str,
    heading: &'a str,
    sub_heading: &'a str,
    content: &'a str,
    also_links: Vec<String>,
    feature_short_description: Map<String, Value>,
}

/// Landing page listing the entries of a folder
#[derive(Clone, Debug)]
pub struct LandingPage {
    pub heading: String,
    pub content: String,
    /// Numbers of the features, upper bound excluded
    pub features: std::ops::Range<usize>,
}

impl Render for LandingPage {
    fn file_name(&self) -> String {
        LANDING_FILE.to_string()
    }

    fn render(&self) -> Result<String, Error> {
        let document = LandingDocument {
            r#type: "landing",
            heading: &self.heading,
            sub_heading: "",
            content: &self.content,
            also_links: vec![],
            feature_short_description: self
                .features
                .clone()
                .map(|n| (format!("{:02}", n), Value::String(String::new())))
                .collect(),
        };
        to_pretty_json(&document)
    }
}

#[derive(Clone, Debug)]
pub struct Introduction {
    pub description: String,
    pub source: String,
    pub is_candlestick_pattern: bool,
}

impl Render for Introduction {
    fn file_name(&self) -> String {
        String::from("01 Introduction.html")
    }

    fn render(&self) -> Result<String, Error> {
        let category = if self.is_candlestick_pattern {
            "candlestick pattern"
        } else {
            "indicator"
        };
        Ok(format!(
            "{}\n<p>{}</p>\n<p>To view the implementation of this {}, see the <a rel=\"nofollow\" target=\"_blank\" href=\"{}\">LEAN GitHub repository</a>.</p>",
            TAG, self.description, category, self.source
        ))
    }
}

/// Variables of the `using-indicator` template
#[derive(Clone, Debug)]
pub struct Usage {
    pub method_container: String,
    pub template: String,
    pub has_reference: bool,
    pub has_automatic_indicator_helper: bool,
    pub helper_prefix: String,
    pub type_name: String,
    pub helper_name: String,
    pub helper_arguments: String,
    pub properties: String,
    pub other_properties: String,
    pub update_parameter_type: String,
    pub constructor_arguments: String,
    pub update_parameter_value: String,
    pub has_moving_average_type_parameter: bool,
    pub constructor_box: String,
    pub is_option_indicator: bool,
}

impl Render for Usage {
    fn file_name(&self) -> String {
        format!("02 Using {} Indicator.php", self.helper_name)
    }

    fn render(&self) -> Result<String, Error> {
        let lines = [
            TAG.to_string(),
            String::from("<? "),
            format!("include(DOCS_RESOURCES.\"{}\");", self.method_container),
            String::new(),
            format!("$hasReference = {};", php_bool(self.has_reference)),
            format!(
                "$hasAutomaticIndicatorHelper = {};",
                php_bool(self.has_automatic_indicator_helper)
            ),
            format!("$helperPrefix = '{}';", self.helper_prefix),
            format!("$typeName = '{}';", self.type_name),
            format!("$helperName = '{}';", self.helper_name),
            format!("$helperArguments = '{}';", self.helper_arguments),
            format!("$properties = {};", self.properties),
            format!("$otherProperties = {};", self.other_properties),
            format!("$updateParameterType = '{}';", self.update_parameter_type),
            format!("$constructorArguments = '{}';", self.constructor_arguments),
            format!("$updateParameterValue = '{}';", self.update_parameter_value),
            format!(
                "$hasMovingAverageTypeParameter = {};",
                php_bool(self.has_moving_average_type_parameter)
            ),
            format!("$constructorBox = '{}';", self.constructor_box),
            format!("$isOptionIndicator = {};", php_bool(self.is_option_indicator)),
            format!("include(DOCS_RESOURCES.\"{}\");", self.template),
            String::from("?>"),
        ];
        Ok(lines.join("\n"))
    }
}

#[derive(Clone, Debug)]
pub struct Visualization {
    pub template: String,
    pub type_name: String,
    pub image_source: String,
}

impl Render for Visualization {
    fn file_name(&self) -> String {
        String::from("03 Visualization.php")
    }

    fn render(&self) -> Result<String, Error> {
        Ok(format!(
            "{}\n<?\n$typeName = \"{}\";\n$imageSource = \"{}\";\ninclude(DOCS_RESOURCES.\"{}\");\n?>",
            TAG, self.type_name, self.image_source, self.template
        ))
    }
}

#[derive(Serialize)]
struct MetadataValues<'a> {
    description: &'a str,
    keywords: String,
    #[serde(rename = "og:type")]
    og_type: &'a str,
    #[serde(rename = "og:description")]
    og_description: &'a str,
    #[serde(rename = "og:title")]
    og_title: &'a str,
    #[serde(rename = "og:site_name")]
    og_site_name: &'a str,
    #[serde(rename = "og:image")]
    og_image: &'a str,
}

#[derive(Serialize)]
struct MetadataDocument<'a> {
    r#type: &'a str,
    values: MetadataValues<'a>,
}

/// Search engine and open graph fields of an indicator page
#[derive(Clone, Debug)]
pub struct Metadata {
    pub key: String,
    pub description: String,
    pub site_name: String,
    pub image: String,
}

impl Metadata {
    /// Description without cross reference markup, cut to a short summary
    pub fn summary(&self) -> String {
        let description = self
            .description
            .replace(CROSS_REFERENCE_OPEN, "")
            .replace(CROSS_REFERENCE_CLOSE, "");
        truncate(&description, MAX_DESCRIPTION_LENGTH)
    }
}

impl Render for Metadata {
    fn file_name(&self) -> String {
        METADATA_FILE.to_string()
    }

    fn render(&self) -> Result<String, Error> {
        let description = self.summary();
        let title = format!("{} - {}", self.key, self.site_name);
        let document = MetadataDocument {
            r#type: "metadata",
            values: MetadataValues {
                description: &description,
                keywords: self.key.to_lowercase(),
                og_type: "website",
                og_description: &description,
                og_title: &title,
                og_site_name: &title,
                og_image: &self.image,
            },
        };
        to_pretty_json(&document)
    }
}
