//! Serialization of fitted parameters.
//!
//! Fitted transformers and models expose a plain-data parameter struct; this
//! module turns those structs into bytes and back without caring which
//! component produced them.

use std::error::Error;

/// A trait for parameter representations that can be serialized to and from bytes.
///
/// Implementors should contain only plain data (`Vec<f64>`, strings, enums),
/// never caches or derived lookup structures that can be rebuilt on load.
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

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        fill: Vec<f64>,
        name: String,
    }

    #[test]
    fn test_bytes_are_deterministic() {
        let a = Sample {
            fill: vec![1.5, 2.0],
            name: "regiao".to_string(),
        };
        let b = Sample {
            fill: vec![1.5, 2.0],
            name: "regiao".to_string(),
        };
        assert_eq!(a.to_bytes().unwrap(), b.to_bytes().unwrap());
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        let result = Sample::from_bytes(&[0xff, 0xff, 0xff]);
        assert!(result.is_err());
    }
}
