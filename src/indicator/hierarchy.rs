//! Update parameter classification
//!
//! Every indicator derives, directly or through other indicators, from one of
//! the three roots of the indicator library. The root tells which data the
//! `Update` method accepts.

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

use super::record::Records;
use crate::{catalog::TypeResolver, config::MarkersConfig, error::Error, utils::text::humanize};

#[derive(Clone, Copy, Debug, Display, EnumIter, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum UpdateShape {
    #[strum(serialize = "Indicator")]
    DataPoint,
    #[strum(serialize = "BarIndicator")]
    Bar,
    #[strum(serialize = "TradeBarIndicator")]
    TradeBar,
}

impl UpdateShape {
    pub fn name(&self) -> &'static str {
        match self {
            Self::DataPoint => "data-point-indicator",
            Self::Bar => "bar-indicator",
            Self::TradeBar => "trade-bar-indicator",
        }
    }

    pub fn parameter_type(&self) -> &'static str {
        match self {
            Self::DataPoint => "time/number pair or an <code>IndicatorDataPoint</code>",
            Self::Bar => "a <code>TradeBar</code> or <code>QuoteBar</code>",
            Self::TradeBar => "a <code>TradeBar</code>",
        }
    }

    pub fn parameter_value(&self) -> &'static str {
        match self {
            Self::DataPoint => "bar.EndTime, bar.Close",
            Self::Bar | Self::TradeBar => "bar",
        }
    }
}

/// Base type edges of the indicator library, discovered while walking
pub struct TypeHierarchy<'a, R: TypeResolver> {
    markers: &'a MarkersConfig,
    resolver: &'a R,
    edges: HashMap<String, String>,
}

impl<'a, R: TypeResolver> TypeHierarchy<'a, R> {
    pub fn new(markers: &'a MarkersConfig, resolver: &'a R) -> Self {
        Self {
            markers,
            resolver,
            edges: HashMap::new(),
        }
    }

    /// Set the update shape of every record
    pub fn classify_all(&mut self, records: &mut Records) -> Result<(), Error> {
        let known: HashMap<String, String> = records
            .iter()
            .map(|(key, record)| (key.clone(), record.base_type_full_name.clone()))
            .collect();

        for record in records.values_mut() {
            let shape = self.classify(&record.base_type_full_name, &known)?;
            log::debug!("{} is a {}", record.key, shape.name());
            record.update_shape = Some(shape);
        }

        log::info!("{} indicator records classified.", records.len());
        Ok(())
    }

    /// Walk up from `base_type` until a root is met, each type at most once
    pub fn classify(
        &mut self,
        base_type: &str,
        known: &HashMap<String, String>,
    ) -> Result<UpdateShape, Error> {
        let mut visited = HashSet::new();
        let mut current = base_type.to_string();

        loop {
            if let Some(shape) = self.root(&current) {
                return Ok(shape);
            }
            if !visited.insert(current.clone()) {
                return Err(Error::UnresolvableTypeHierarchy(current));
            }
            current = self.parent(&current, known)?;
        }
    }

    fn root(&self, full_type_name: &str) -> Option<UpdateShape> {
        if full_type_name.contains(&self.markers.candlestick) {
            return Some(UpdateShape::TradeBar);
        }

        UpdateShape::iter().find(|shape| {
            full_type_name.contains(&format!("{}.{}", self.markers.indicators_namespace, shape))
        })
    }

    fn parent(
        &mut self,
        full_type_name: &str,
        known: &HashMap<String, String>,
    ) -> Result<String, Error> {
        let short_name = full_type_name.rsplit('.').next().unwrap_or(full_type_name);
        if let Some(base) = known.get(&humanize(short_name)) {
            return Ok(base.clone());
        }
        if let Some(base) = self.edges.get(full_type_name) {
            return Ok(base.clone());
        }

        let metadata = self.resolver.resolve(full_type_name).map_err(|error| match error {
            Error::TypeNotFound(name) => Error::UnresolvableTypeHierarchy(name),
            error => error,
        })?;
        self.edges
            .insert(full_type_name.to_string(), metadata.base_type_full_name.clone());

        Ok(metadata.base_type_full_name)
    }
}
