use crate::{
    catalog::{HelperCatalog, TypeCatalog, TypeResolver},
    config::GeneratorConfig,
    error::Error,
    indicator::{RecordBuilder, Records, TypeHierarchy},
    output::{OutputWriter, Summary},
};

/// Catalog loading, record building, classification then writing.
///
/// Every input is read before the first output file is touched.
pub struct Pipeline<R: TypeResolver> {
    config: GeneratorConfig,
    helpers: HelperCatalog,
    resolver: R,
}

impl Pipeline<TypeCatalog> {
    pub fn load(config: GeneratorConfig) -> Result<Self, Error> {
        let helpers = HelperCatalog::load(&config.paths.helper_catalog())?;
        let resolver = TypeCatalog::load(&config.paths.type_catalog())?;
        Ok(Self::new(config, helpers, resolver))
    }
}

impl<R: TypeResolver> Pipeline<R> {
    pub fn new(config: GeneratorConfig, helpers: HelperCatalog, resolver: R) -> Self {
        Self {
            config,
            helpers,
            resolver,
        }
    }

    /// Build and classify the records without writing anything
    pub fn prepare(&self) -> Result<Records, Error> {
        let mut records = RecordBuilder::new(&self.config, &self.helpers, &self.resolver)
            .build_all(&self.config.paths.constructors())?;

        TypeHierarchy::new(&self.config.markers, &self.resolver).classify_all(&mut records)?;

        Ok(records)
    }

    pub fn run(&self) -> Result<Summary, Error> {
        let records = self.prepare()?;
        OutputWriter::new(&self.config).write(&records)
    }
}
