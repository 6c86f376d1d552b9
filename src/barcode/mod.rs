pub mod color;
pub mod field;
pub mod options;
pub mod settings;
pub mod symbology;
pub mod validate;
pub mod xdim;

pub use color::ColorRgb;
pub use field::{Field, FieldValue};
pub use options::BarcodeOptions;
pub use settings::{BarcodeSettings, ValidationReport};
pub use symbology::Symbology;
