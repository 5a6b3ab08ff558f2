//! Utility macros for the code builder.
//!
//! - `MK_TRACE!` - Emits a debug event when the builder's config enables it
//! - `MK_ERROR!` - Creates an `Err` for a construction operation

/// Emits a `tracing::debug!` event if `$config.debug` is set.
///
/// # Arguments
///
/// * `$config` - A `Config` (or anything with a `debug: bool` field)
/// * `$($arg)*` - Format arguments passed on to `tracing::debug!`
///
/// # Example
///
/// ```ignore
/// MK_TRACE!(self.config, "MapLit {} {}", ty, arity);
/// ```
#[macro_export]
macro_rules! MK_TRACE {
    ($config:expr, $($arg:tt)*) => {
        if $config.debug {
            tracing::debug!($($arg)*);
        }
    };
}

/// Creates an `Err(Error)` for the named operation.
///
/// # Example
///
/// ```ignore
/// return MK_ERROR!(ErrorImpl::UseOfUntypedNil, "NewVar");
/// ```
#[macro_export]
macro_rules! MK_ERROR {
    ($error:expr, $operation:expr) => {
        Err($crate::errors::errors::Error::new($error, $operation))
    };
}
