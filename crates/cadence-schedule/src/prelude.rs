pub(crate) use crate::error::{Error, Result};

/// Local wrapper so foreign types can carry crate-local conversions.
pub(crate) struct W<T>(pub T);
