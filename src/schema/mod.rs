pub mod types;

pub use types::CsvSchema;
