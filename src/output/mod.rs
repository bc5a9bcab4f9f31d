mod document;
mod writer;

pub use writer::{OutputWriter, Summary};
