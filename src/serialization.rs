//! Serialization of fitted parameters.
//!
//! Fitted state is persisted as plain numerical data (vectors, maps, scalars)
//! so a state file never depends on the in-memory layout of the fitted types.

use std::error::Error;

/// A trait for parameter representations that can be serialized to and from bytes.
///
/// Implementors should contain only plain data, never handles or caches.
pub trait SerializableParams: Sized {
    /// The error type returned during (de)serialization.
    type Error: Error + Send + Sync + 'static;

    /// Serialize the parameters into a byte buffer.
    fn to_bytes(&self) -> Result<Vec<u8>, Self::Error>;

    /// Deserialize the parameters from a byte buffer.
    fn from_bytes(bytes: &[u8]) -> Result<Self, Self::Error>;
}

impl<T> SerializableParams for T
where
    T: serde::Serialize + for<'de> serde::Deserialize<'de>,
{
    type Error = bincode::Error;

    fn to_bytes(&self) -> Result<Vec<u8>, Self::Error> {
        bincode::serialize(self)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, Self::Error> {
        bincode::deserialize(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::collections::BTreeMap;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Bounds {
        min: Vec<f64>,
        max: Vec<f64>,
        means: BTreeMap<i64, f64>,
    }

    #[test]
    fn test_bytes_round_trip() {
        let mut means = BTreeMap::new();
        means.insert(0, 1.5);
        means.insert(3, -2.0);
        let params = Bounds {
            min: vec![0.0, 1.0],
            max: vec![2.0, 4.0],
            means,
        };

        let bytes = params.to_bytes().unwrap();
        assert_eq!(Bounds::from_bytes(&bytes).unwrap(), params);
    }

    #[test]
    fn test_truncated_bytes_fail() {
        let params = Bounds {
            min: vec![0.0; 4],
            max: vec![1.0; 4],
            means: BTreeMap::new(),
        };
        let bytes = params.to_bytes().unwrap();
        assert!(Bounds::from_bytes(&bytes[..bytes.len() / 2]).is_err());
    }
}
