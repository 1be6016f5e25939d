//! Configuration errors.
//!
//! These indicate a defect in the bundled registry or signature table, never
//! a problem with the code being rewritten. Every subsequent lookup is
//! untrustworthy once one occurs, so callers abort instead of skipping.

use derive_more::{Display, Error};

#[derive(Clone, Debug, Display, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[display("malformed qualified name `{qualname}`")]
    MalformedName { qualname: String },

    #[display("no signatures bundled for module `{module}` (looking up `{qualname}`)")]
    UnknownModule { module: String, qualname: String },

    #[display("no signature bundled for `{qualname}`")]
    UnknownFunction { qualname: String },

    #[display("invalid bundled signature for `{qualname}`: {reason}")]
    InvalidSignature { qualname: String, reason: String },

    #[display("positional exclusion `{parameter}` is not a parameter of `{qualname}`")]
    UnknownExclusion { qualname: String, parameter: String },
}
