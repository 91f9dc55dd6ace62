//! Unit tests for Vulkan format conversions and swapchain selection rules
//!
//! Pure functions only, no GPU required.

use ash::vk;
use lve_engine::lve::device::{
    TextureFormat, BufferFormat, ShaderStage, PresentMode, Extent2D, IndexType,
};
use super::*;

fn surface_format(format: vk::Format, color_space: vk::ColorSpaceKHR) -> vk::SurfaceFormatKHR {
    vk::SurfaceFormatKHR { format, color_space }
}

fn capabilities(current: (u32, u32), min: (u32, u32), max: (u32, u32)) -> vk::SurfaceCapabilitiesKHR {
    vk::SurfaceCapabilitiesKHR {
        current_extent: vk::Extent2D { width: current.0, height: current.1 },
        min_image_extent: vk::Extent2D { width: min.0, height: min.1 },
        max_image_extent: vk::Extent2D { width: max.0, height: max.1 },
        ..Default::default()
    }
}

// ============================================================================
// CONVERSIONS
// ============================================================================

#[test]
fn test_buffer_format_to_vk() {
    assert_eq!(buffer_format_to_vk(BufferFormat::R32_SFLOAT), vk::Format::R32_SFLOAT);
    assert_eq!(buffer_format_to_vk(BufferFormat::R32G32_SFLOAT), vk::Format::R32G32_SFLOAT);
    assert_eq!(buffer_format_to_vk(BufferFormat::R32G32B32_SFLOAT), vk::Format::R32G32B32_SFLOAT);
    assert_eq!(buffer_format_to_vk(BufferFormat::R32G32B32A32_SFLOAT), vk::Format::R32G32B32A32_SFLOAT);
}

#[test]
fn test_vk_to_texture_format_for_known_formats() {
    let formats = [
        (vk::Format::R8G8B8A8_SRGB, TextureFormat::R8G8B8A8_SRGB),
        (vk::Format::R8G8B8A8_UNORM, TextureFormat::R8G8B8A8_UNORM),
        (vk::Format::B8G8R8A8_SRGB, TextureFormat::B8G8R8A8_SRGB),
        (vk::Format::B8G8R8A8_UNORM, TextureFormat::B8G8R8A8_UNORM),
        (vk::Format::D16_UNORM, TextureFormat::D16_UNORM),
        (vk::Format::D32_SFLOAT, TextureFormat::D32_FLOAT),
        (vk::Format::D32_SFLOAT_S8_UINT, TextureFormat::D32_FLOAT_S8_UINT),
        (vk::Format::D24_UNORM_S8_UINT, TextureFormat::D24_UNORM_S8_UINT),
    ];
    for (vk_format, format) in formats {
        assert_eq!(vk_to_texture_format(vk_format), format);
    }
}

#[test]
fn test_unmapped_vk_format_is_unknown() {
    assert_eq!(vk_to_texture_format(vk::Format::A2B10G10R10_UNORM_PACK32), TextureFormat::Unknown);
    assert_eq!(vk_to_texture_format(vk::Format::UNDEFINED), TextureFormat::Unknown);
}

#[test]
fn test_shader_stages_union() {
    assert_eq!(shader_stages_to_vk(&[]), vk::ShaderStageFlags::empty());
    assert_eq!(shader_stages_to_vk(&[ShaderStage::Vertex]), vk::ShaderStageFlags::VERTEX);
    assert_eq!(
        shader_stages_to_vk(&[ShaderStage::Vertex, ShaderStage::Fragment]),
        vk::ShaderStageFlags::VERTEX | vk::ShaderStageFlags::FRAGMENT
    );
}

#[test]
fn test_index_type_to_vk() {
    assert_eq!(index_type_to_vk(IndexType::U16), vk::IndexType::UINT16);
    assert_eq!(index_type_to_vk(IndexType::U32), vk::IndexType::UINT32);
}

// ============================================================================
// SWAPCHAIN SELECTION
// ============================================================================

#[test]
fn test_surface_format_prefers_bgra_srgb() {
    let available = [
        surface_format(vk::Format::R8G8B8A8_UNORM, vk::ColorSpaceKHR::SRGB_NONLINEAR),
        surface_format(vk::Format::B8G8R8A8_SRGB, vk::ColorSpaceKHR::SRGB_NONLINEAR),
    ];
    assert_eq!(choose_surface_format(&available), Some(available[1]));
}

#[test]
fn test_surface_format_falls_back_to_first() {
    let available = [
        surface_format(vk::Format::R8G8B8A8_UNORM, vk::ColorSpaceKHR::SRGB_NONLINEAR),
        surface_format(vk::Format::B8G8R8A8_SRGB, vk::ColorSpaceKHR::EXTENDED_SRGB_LINEAR_EXT),
    ];
    assert_eq!(choose_surface_format(&available), Some(available[0]));
    assert_eq!(choose_surface_format(&[]), None);
}

#[test]
fn test_present_mode_preferred_when_supported() {
    let available = [vk::PresentModeKHR::FIFO, vk::PresentModeKHR::MAILBOX];
    assert_eq!(choose_present_mode(PresentMode::Mailbox, &available), vk::PresentModeKHR::MAILBOX);
}

#[test]
fn test_present_mode_falls_back_to_fifo() {
    let available = [vk::PresentModeKHR::FIFO];
    assert_eq!(choose_present_mode(PresentMode::Mailbox, &available), vk::PresentModeKHR::FIFO);
    assert_eq!(choose_present_mode(PresentMode::Immediate, &available), vk::PresentModeKHR::FIFO);
}

#[test]
fn test_extent_uses_current_extent_when_fixed() {
    let caps = capabilities((1024, 768), (1, 1), (4096, 4096));
    assert_eq!(choose_extent(&caps, Extent2D::new(800, 600)), vk::Extent2D { width: 1024, height: 768 });
}

#[test]
fn test_extent_clamps_requested_when_surface_defers() {
    let caps = capabilities((u32::MAX, u32::MAX), (200, 100), (1920, 1080));
    assert_eq!(choose_extent(&caps, Extent2D::new(800, 600)), vk::Extent2D { width: 800, height: 600 });
    assert_eq!(choose_extent(&caps, Extent2D::new(4000, 50)), vk::Extent2D { width: 1920, height: 100 });
}

#[test]
fn test_image_count_is_min_plus_one_capped() {
    let mut caps = vk::SurfaceCapabilitiesKHR { min_image_count: 2, max_image_count: 0, ..Default::default() };
    assert_eq!(choose_image_count(&caps), 3);
    caps.max_image_count = 2;
    assert_eq!(choose_image_count(&caps), 2);
    caps.max_image_count = 8;
    assert_eq!(choose_image_count(&caps), 3);
}

#[test]
fn test_depth_format_picks_first_supported_candidate() {
    let supported = |format: vk::Format| vk::FormatProperties {
        optimal_tiling_features: if format == vk::Format::D24_UNORM_S8_UINT {
            vk::FormatFeatureFlags::DEPTH_STENCIL_ATTACHMENT
        } else {
            vk::FormatFeatureFlags::empty()
        },
        ..Default::default()
    };
    assert_eq!(
        find_supported_format(&DEPTH_FORMAT_CANDIDATES, vk::FormatFeatureFlags::DEPTH_STENCIL_ATTACHMENT, supported),
        Some(vk::Format::D24_UNORM_S8_UINT)
    );

    let none = |_: vk::Format| vk::FormatProperties::default();
    assert_eq!(
        find_supported_format(&DEPTH_FORMAT_CANDIDATES, vk::FormatFeatureFlags::DEPTH_STENCIL_ATTACHMENT, none),
        None
    );
}

#[test]
fn test_depth_format_ignores_linear_tiling() {
    let linear_only = |_: vk::Format| vk::FormatProperties {
        linear_tiling_features: vk::FormatFeatureFlags::DEPTH_STENCIL_ATTACHMENT,
        ..Default::default()
    };
    assert_eq!(
        find_supported_format(&DEPTH_FORMAT_CANDIDATES, vk::FormatFeatureFlags::DEPTH_STENCIL_ATTACHMENT, linear_only),
        None
    );
}

#[test]
fn test_frames_in_flight_bounded_by_images() {
    assert_eq!(frames_in_flight(2, 3), 2);
    assert_eq!(frames_in_flight(3, 2), 2);
    assert_eq!(frames_in_flight(1, 3), 1);
}

// ============================================================================
// QUEUE FAMILIES
// ============================================================================

fn family(flags: vk::QueueFlags) -> vk::QueueFamilyProperties {
    vk::QueueFamilyProperties { queue_flags: flags, queue_count: 1, ..Default::default() }
}

#[test]
fn test_queue_families_prefer_shared_family() {
    let families = [
        family(vk::QueueFlags::TRANSFER),
        family(vk::QueueFlags::GRAPHICS),
        family(vk::QueueFlags::GRAPHICS | vk::QueueFlags::COMPUTE),
    ];
    let found = find_queue_families(&families, |index| index == 0 || index == 2);
    assert_eq!(found, Some(QueueFamilies { graphics: 2, present: 2 }));
}

#[test]
fn test_queue_families_split_when_needed() {
    let families = [family(vk::QueueFlags::GRAPHICS), family(vk::QueueFlags::TRANSFER)];
    let found = find_queue_families(&families, |index| index == 1);
    assert_eq!(found, Some(QueueFamilies { graphics: 0, present: 1 }));
}

#[test]
fn test_queue_families_missing() {
    let families = [family(vk::QueueFlags::TRANSFER)];
    assert_eq!(find_queue_families(&families, |_| true), None);
    let families = [family(vk::QueueFlags::GRAPHICS)];
    assert_eq!(find_queue_families(&families, |_| false), None);
}
