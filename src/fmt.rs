//! Logging macros that forward to `defmt` on the device and to `log` on the host.
//!
//! Arguments are written with `{}` placeholders, which both backends accept.
#![allow(unused_macros, reason = "not every level is used in every build")]

#[cfg(not(feature = "host"))]
macro_rules! trace {
    ($($arg:tt)*) => { ::defmt::trace!($($arg)*) };
}
#[cfg(feature = "host")]
macro_rules! trace {
    ($($arg:tt)*) => { ::log::trace!($($arg)*) };
}

#[cfg(not(feature = "host"))]
macro_rules! debug {
    ($($arg:tt)*) => { ::defmt::debug!($($arg)*) };
}
#[cfg(feature = "host")]
macro_rules! debug {
    ($($arg:tt)*) => { ::log::debug!($($arg)*) };
}

#[cfg(not(feature = "host"))]
macro_rules! info {
    ($($arg:tt)*) => { ::defmt::info!($($arg)*) };
}
#[cfg(feature = "host")]
macro_rules! info {
    ($($arg:tt)*) => { ::log::info!($($arg)*) };
}

// `warn` is also a built-in attribute, so the macro is defined under another name and
// re-exported as `warn`.
#[cfg(not(feature = "host"))]
macro_rules! warn_ {
    ($($arg:tt)*) => { ::defmt::warn!($($arg)*) };
}
#[cfg(feature = "host")]
macro_rules! warn_ {
    ($($arg:tt)*) => { ::log::warn!($($arg)*) };
}

#[cfg(not(feature = "host"))]
macro_rules! error {
    ($($arg:tt)*) => { ::defmt::error!($($arg)*) };
}
#[cfg(feature = "host")]
macro_rules! error {
    ($($arg:tt)*) => { ::log::error!($($arg)*) };
}

pub(crate) use warn_ as warn;
pub(crate) use {debug, error, info, trace};
