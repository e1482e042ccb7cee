//! Value codecs and the typed view over byte-valued backends.
//!
//! Durable stores keep values in a serialized form. [`CodecRepo`] sits at that
//! boundary: it encodes on the way in, decodes on the way out, and surfaces
//! conversion problems as [`RepoError::Encode`] / [`RepoError::Decode`].

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;

use super::{KeyValueRepo, Record};
use crate::errors::RepoError;

/// Converts values of type `T` to and from their stored representation.
pub trait Codec<T>: Send + Sync {
    /// # Errors
    ///
    /// Returns [`RepoError::Encode`] if `value` cannot be represented.
    fn encode(&self, value: &T) -> Result<Vec<u8>, RepoError>;

    /// # Errors
    ///
    /// Returns [`RepoError::Decode`] if `bytes` is not a valid encoding.
    fn decode(&self, bytes: &[u8]) -> Result<T, RepoError>;
}

/// JSON codec backed by `serde_json`.
pub struct JsonCodec<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonCodec<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for JsonCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for JsonCodec<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for JsonCodec<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("JsonCodec")
    }
}

impl<T: Serialize + DeserializeOwned> Codec<T> for JsonCodec<T> {
    fn encode(&self, value: &T) -> Result<Vec<u8>, RepoError> {
        serde_json::to_vec(value).map_err(|e| RepoError::Encode(format!("json: {e}")))
    }

    fn decode(&self, bytes: &[u8]) -> Result<T, RepoError> {
        serde_json::from_slice(bytes).map_err(|e| RepoError::Decode(format!("json: {e}")))
    }
}

/// Stores strings as raw UTF-8, without JSON quoting.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextCodec;

impl Codec<String> for TextCodec {
    fn encode(&self, value: &String) -> Result<Vec<u8>, RepoError> {
        Ok(value.as_bytes().to_vec())
    }

    fn decode(&self, bytes: &[u8]) -> Result<String, RepoError> {
        String::from_utf8(bytes.to_vec()).map_err(|e| RepoError::Decode(format!("utf-8: {e}")))
    }
}

/// Typed repository over a backend that stores raw bytes.
pub struct CodecRepo<R, C, T> {
    inner: R,
    codec: C,
    _marker: PhantomData<fn() -> T>,
}

impl<R, C, T> CodecRepo<R, C, T>
where
    R: KeyValueRepo<Value = Vec<u8>>,
    C: Codec<T>,
{
    pub fn new(inner: R, codec: C) -> Self {
        Self {
            inner,
            codec,
            _marker: PhantomData,
        }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    fn decode_record(&self, record: Record<Vec<u8>>) -> Result<Record<T>, RepoError> {
        let value = self.codec.decode(&record.value)?;
        Ok(Record::new(record.key, value))
    }
}

impl<R, C, T> KeyValueRepo for CodecRepo<R, C, T>
where
    R: KeyValueRepo<Value = Vec<u8>>,
    C: Codec<T>,
{
    type Value = T;

    fn find_all(&self) -> Result<Vec<Record<T>>, RepoError> {
        self.inner
            .find_all()?
            .into_iter()
            .map(|record| self.decode_record(record))
            .collect()
    }

    fn save(&self, key: &str, value: T) -> Result<Record<T>, RepoError> {
        let bytes = self.codec.encode(&value)?;
        self.inner.save(key, bytes)?;
        Ok(Record::new(key, value))
    }

    fn overwrite(&self, key: &str, value: T) -> Result<Record<T>, RepoError> {
        let bytes = self.codec.encode(&value)?;
        self.inner.overwrite(key, bytes)?;
        Ok(Record::new(key, value))
    }

    fn delete(&self, key: &str) -> Result<(), RepoError> {
        self.inner.delete(key)
    }

    fn find(&self, key: &str) -> Result<Record<T>, RepoError> {
        let record = self.inner.find(key)?;
        self.decode_record(record)
    }
}
