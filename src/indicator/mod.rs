mod hierarchy;
mod properties;
mod record;

pub use hierarchy::{TypeHierarchy, UpdateShape};
pub use properties::PropertyLists;
pub use record::{IndicatorRecord, RecordBuilder, Records};
