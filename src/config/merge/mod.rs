//! Source composition for `ClientConfig`.

pub(crate) mod merge_policy;
pub(crate) mod service;
