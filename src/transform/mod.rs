//! Byte transforms applied to retained class members

mod debug_info;

pub use debug_info::RemoveDebugInformation;

use crate::classfile::{self, Class};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Rewrites the bytes of one archive member
///
/// The result may be any length. An error aborts the archive being written.
pub trait ByteTransform {
    fn transform(&self, member: &str, bytes: Vec<u8>) -> anyhow::Result<Vec<u8>>;
}

impl<F> ByteTransform for F
where
    F: Fn(&str, Vec<u8>) -> anyhow::Result<Vec<u8>>,
{
    fn transform(&self, member: &str, bytes: Vec<u8>) -> anyhow::Result<Vec<u8>> {
        self(member, bytes)
    }
}

/// Trait for transformers that edit a parsed class in place
pub trait ClassTransformer {
    fn name(&self) -> &'static str;

    fn apply(&self, class: &mut Class<'_>) -> anyhow::Result<()>;
}

/// Transformers selectable from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransformerKind {
    RemoveDebugInformation,
}

impl TransformerKind {
    pub fn create(self) -> Box<dyn ClassTransformer> {
        match self {
            TransformerKind::RemoveDebugInformation => Box::new(RemoveDebugInformation),
        }
    }
}

/// Parses a class, runs each transformer in order, then reassembles the bytes
#[derive(Default)]
pub struct TransformPipeline {
    transformers: Vec<Box<dyn ClassTransformer>>,
}

impl TransformPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_kinds(kinds: &[TransformerKind]) -> Self {
        Self {
            transformers: kinds.iter().map(|kind| kind.create()).collect(),
        }
    }

    pub fn with_transformer(mut self, transformer: Box<dyn ClassTransformer>) -> Self {
        self.transformers.push(transformer);
        self
    }

    pub fn len(&self) -> usize {
        self.transformers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transformers.is_empty()
    }
}

impl ByteTransform for TransformPipeline {
    fn transform(&self, member: &str, bytes: Vec<u8>) -> anyhow::Result<Vec<u8>> {
        if self.transformers.is_empty() {
            return Ok(bytes);
        }

        let mut class = classfile::parse(&bytes).with_context(|| format!("Failed to parse class {}", member))?;

        for transformer in &self.transformers {
            trace!("Applying {} to {}", transformer.name(), member);
            transformer
                .apply(&mut class)
                .with_context(|| format!("Transformer {} failed", transformer.name()))?;
        }

        classfile::reassemble(&class).with_context(|| format!("Failed to rebuild class {}", member))
    }
}
