//! Content-safety validation for externally supplied resource files.
//!
//! A host application that loads resource and scene files from outside its
//! packaged bundle installs a [`gate::LoadGate`] in front of its loader.
//! The gate reads each external file, asks the
//! [`validate::ResourceSafetyClassifier`] whether it embeds or references
//! executable code from outside the trusted package, and either hands the
//! bytes to the host or substitutes an empty resource.

pub mod error;
pub mod gate;
pub mod io;
pub mod logging;
pub mod validate;

pub use error::{ResGuardError, Result};
pub use gate::events::{LoadEvent, LoadObserver};
pub use gate::{LoadGate, ResourceHost};
pub use io::RawFile;
pub use validate::{ResourceSafetyClassifier, ValidatorConfig, Verdict};
