//! Key/Value Parameter Blob Translation
//!
//! Configuration crosses the HAL boundary as free-form
//! `key1=value1;key2=value2` strings. The one key the shim interprets is
//! the routing key: its value is a device mask printed as a base-10
//! signed integer, and it must be re-encoded for the other bit layout
//! whenever a blob crosses the version boundary. Every other key is
//! carried through untouched.

use std::fmt;

use tracing::debug;

use crate::mask::{ConversionDirection, DeviceMaskCodec};

/// Reserved key whose value is a device mask in need of translation.
pub const ROUTING_KEY: &str = "routing";

/// Separator between `key=value` pairs.
pub const DELIMITER: char = ';';

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Pair { key: String, value: String },
    /// Text between delimiters that is not `key=value` shaped, typically
    /// the empty segment left by a trailing delimiter. Kept so that a
    /// parse/serialize round trip reproduces the input byte for byte.
    Opaque(String),
}

/// A parsed parameter blob.
///
/// Keys keep their relative order; only the content of the set is a
/// contract, not its ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterMap {
    segments: Vec<Segment>,
}

impl ParameterMap {
    pub fn parse(blob: &str) -> Self {
        let segments = blob
            .split(DELIMITER)
            .map(|segment| match segment.split_once('=') {
                Some((key, value)) => Segment::Pair {
                    key: key.to_owned(),
                    value: value.to_owned(),
                },
                None => Segment::Opaque(segment.to_owned()),
            })
            .collect();
        Self { segments }
    }

    /// Look up the raw value of `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.segments.iter().find_map(|segment| match segment {
            Segment::Pair { key: k, value } if k == key => Some(value.as_str()),
            _ => None,
        })
    }

    /// Look up `key` and parse its value as a signed decimal integer.
    pub fn get_int(&self, key: &str) -> Option<i32> {
        self.get(key)?.trim().parse().ok()
    }

    /// Set `key` to `value`, replacing an existing entry in place or
    /// appending a new one.
    pub fn set(&mut self, key: &str, value: String) {
        for segment in &mut self.segments {
            if let Segment::Pair { key: k, value: v } = segment {
                if k == key {
                    *v = value;
                    return;
                }
            }
        }
        self.segments.push(Segment::Pair {
            key: key.to_owned(),
            value,
        });
    }

    /// Set `key` to a signed decimal integer value.
    pub fn set_int(&mut self, key: &str, value: i32) {
        self.set(key, value.to_string());
    }
}

impl fmt::Display for ParameterMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, "{DELIMITER}")?;
            }
            match segment {
                Segment::Pair { key, value } => write!(f, "{key}={value}")?,
                Segment::Opaque(text) => write!(f, "{text}")?,
            }
        }
        Ok(())
    }
}

/// Rewrite the routing key of `blob` for the other side of the boundary.
///
/// Returns an independently owned string in every case; blobs without a
/// routing key come back as a verbatim copy. The routing value is carried
/// in a signed field, so the conversion operates on the bit pattern and
/// writes the result back with the same signed encoding.
pub fn rewrite_parameters(
    codec: &DeviceMaskCodec,
    blob: &str,
    direction: ConversionDirection,
) -> String {
    let mut params = ParameterMap::parse(blob);
    let Some(value) = params.get_int(ROUTING_KEY) else {
        return blob.to_owned();
    };

    let converted = codec.convert(value as u32, direction);
    params.set_int(ROUTING_KEY, converted as i32);

    let rewritten = params.to_string();
    debug!("routing value {value} rewritten ({direction:?}): {blob:?} -> {rewritten:?}");
    rewritten
}
