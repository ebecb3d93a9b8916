use std::collections::HashMap;
use std::sync::Arc;

use lazy_static::lazy_static;
use parking_lot::RwLock;

use crate::AudioCodec;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("codec registered under id {key} reports id {reported}")]
    IdMismatch { key: u32, reported: u32 },
}

/// Codecs available for negotiation, keyed by voice-protocol codec id.
pub struct CodecRegistry {
    codecs: RwLock<HashMap<u32, Arc<dyn AudioCodec>>>,
}

lazy_static! {
    static ref GLOBAL: CodecRegistry = CodecRegistry::new();
}

impl CodecRegistry {
    pub fn new() -> Self {
        CodecRegistry {
            codecs: RwLock::new(HashMap::new()),
        }
    }

    /// Register `codec` under `id`, returning the codec it replaced.
    ///
    /// The codec must report the same id it is registered under.
    pub fn register(
        &self,
        id: u32,
        codec: Arc<dyn AudioCodec>,
    ) -> Result<Option<Arc<dyn AudioCodec>>, RegistryError> {
        let reported = codec.id();
        if reported != id {
            return Err(RegistryError::IdMismatch { key: id, reported });
        }

        let previous = self.codecs.write().insert(id, codec);
        if previous.is_some() {
            tracing::warn!("Replacing audio codec registered under id {}", id);
        } else {
            tracing::info!("Registered audio codec {}", id);
        }
        Ok(previous)
    }

    pub fn unregister(&self, id: u32) -> Option<Arc<dyn AudioCodec>> {
        self.codecs.write().remove(&id)
    }

    pub fn get(&self, id: u32) -> Option<Arc<dyn AudioCodec>> {
        self.codecs.read().get(&id).cloned()
    }

    /// Registered ids in ascending order.
    pub fn ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.codecs.read().keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.codecs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// The process-wide registry the client negotiates from.
pub fn global() -> &'static CodecRegistry {
    &GLOBAL
}

/// Register `codec` with the process-wide registry.
pub fn register_audio_codec(
    id: u32,
    codec: Arc<dyn AudioCodec>,
) -> Result<Option<Arc<dyn AudioCodec>>, RegistryError> {
    GLOBAL.register(id, codec)
}

/// Look up a codec in the process-wide registry.
pub fn audio_codec(id: u32) -> Option<Arc<dyn AudioCodec>> {
    GLOBAL.get(id)
}
