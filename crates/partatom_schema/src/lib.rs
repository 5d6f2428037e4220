//! Family Record Schema
//!
//! # Philosophy: Tolerant Model, Visible Drift
//!
//! The vendor XML schema evolves faster than this tool. The model therefore
//! carries two kinds of vocabulary:
//!
//! 1. **Closed sets** (`ParamKind`): fixed at model-definition time,
//!    extended only by a code change. Unknown values survive in a raw
//!    fallback variant instead of failing extraction.
//! 2. **Open sets** (`typeOfParameter`, top-level tags): the vendor may
//!    introduce new values at any time. The known lists in [`known`] exist
//!    purely so drift detection can tell an operator when the model is
//!    behind; they are never enforced.
//!
//! Nothing in this crate touches the filesystem. A `FamilyRecord` is built
//! once per extraction, written to JSON, and dropped.
//!
//! # Modules
//!
//! - [`record`]: the family record tree (`FamilyRecord`, `Feature`, `Family`, ...)
//! - [`param`]: parameters and the `ParamKind` vocabulary
//! - [`known`]: append-only known-vocabulary configuration for drift detection

pub mod known;
pub mod param;
pub mod record;

pub use param::{ParamKind, Parameter};
pub use record::{DesignFile, Family, FamilyRecord, Feature, Link, Part, Variant};
