pub mod analysis;
pub mod classifier;
pub mod labels;
pub mod recommendations;
pub mod uploads;

pub use classifier::{Classifier, ClassifierError};
pub use recommendations::RuleTable;
pub use uploads::UploadStore;
