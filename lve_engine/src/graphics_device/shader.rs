/// Shader trait, shader descriptor and SPIR-V loading

use std::any::Any;
use std::path::Path;
use crate::error::{Error, Result};

/// First word of every SPIR-V module
pub const SPIRV_MAGIC: u32 = 0x0723_0203;

/// Shader stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    /// Vertex shader
    Vertex,
    /// Fragment/Pixel shader
    Fragment,
}

/// Descriptor for creating a shader
#[derive(Debug, Clone)]
pub struct ShaderDesc<'a> {
    /// SPIR-V words (see `load_spirv`)
    pub code: &'a [u32],
    /// Shader stage
    pub stage: ShaderStage,
    /// Entry point function name
    pub entry_point: String,
}

/// Shader resource trait
///
/// The shader module is automatically destroyed when dropped.
pub trait Shader: Send + Sync {
    /// Stage this module was created for
    fn stage(&self) -> ShaderStage;

    /// Downcasting hook for backends
    fn as_any(&self) -> &dyn Any;
}

/// Decode a SPIR-V binary into words
///
/// Accepts both byte orders: a byte-swapped magic number means the whole
/// module is swapped.
pub fn load_spirv(bytes: &[u8]) -> Result<Vec<u32>> {
    if bytes.len() % 4 != 0 {
        return Err(Error::InvalidResource(format!(
            "SPIR-V size must be a multiple of 4 bytes, got {}",
            bytes.len()
        )));
    }
    if bytes.len() < 20 {
        return Err(Error::InvalidResource(format!(
            "SPIR-V module too small for a header: {} bytes",
            bytes.len()
        )));
    }

    let mut words: Vec<u32> = bytes
        .chunks_exact(4)
        .map(|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect();

    if words[0] == SPIRV_MAGIC.swap_bytes() {
        for word in &mut words {
            *word = word.swap_bytes();
        }
    }

    if words[0] != SPIRV_MAGIC {
        return Err(Error::InvalidResource(format!(
            "Bad SPIR-V magic number: {:#010x}",
            words[0]
        )));
    }

    Ok(words)
}

/// Read and decode a SPIR-V file
pub fn load_spirv_file(path: impl AsRef<Path>) -> Result<Vec<u32>> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| {
        crate::engine_error!("lve::Shader", "Failed to open file {}: {}", path.display(), e);
        Error::InvalidResource(format!("Failed to open file {}: {}", path.display(), e))
    })?;
    load_spirv(&bytes)
}

#[cfg(test)]
#[path = "shader_tests.rs"]
mod tests;
