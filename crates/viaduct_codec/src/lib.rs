//! Viaduct Codec - Data Translation Between HAL Generations
//!
//! This crate provides the two pure data conversions the compatibility
//! shim is built on:
//! - [`DeviceMaskCodec`] re-maps device selector bitmasks between the
//!   legacy and current bit layouts
//! - [`rewrite_parameters`] patches device masks embedded in free-form
//!   `key=value` configuration strings
//!
//! Nothing here touches hardware or keeps state beyond the configured
//! conversion mode. Both codecs are deterministic value transformations
//! shared by the device, stream and policy shims.

mod mask;
mod params;

pub use mask::{current, legacy, ConversionDirection, ConversionMode, DeviceMaskCodec};
pub use params::{rewrite_parameters, ParameterMap, DELIMITER, ROUTING_KEY};
