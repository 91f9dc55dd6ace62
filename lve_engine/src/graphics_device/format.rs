/// Pixel formats for swapchain images and depth attachments

/// Texture format
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    // Color formats
    R8G8B8A8_SRGB,
    R8G8B8A8_UNORM,
    B8G8R8A8_SRGB,
    B8G8R8A8_UNORM,

    // Depth formats
    D16_UNORM,
    D32_FLOAT,
    D32_FLOAT_S8_UINT,
    D24_UNORM_S8_UINT,

    /// Any backend format without an engine equivalent
    Unknown,
}

impl TextureFormat {
    /// True for depth (and depth/stencil) formats
    pub fn is_depth(&self) -> bool {
        matches!(
            self,
            TextureFormat::D16_UNORM
                | TextureFormat::D32_FLOAT
                | TextureFormat::D32_FLOAT_S8_UINT
                | TextureFormat::D24_UNORM_S8_UINT
        )
    }

    /// True when the format carries a stencil component
    pub fn has_stencil(&self) -> bool {
        matches!(self, TextureFormat::D32_FLOAT_S8_UINT | TextureFormat::D24_UNORM_S8_UINT)
    }
}
