//! Tests for window event bookkeeping (no window is opened)

use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use lve_engine::lve::device::Extent2D;
use super::WindowState;

#[test]
fn test_resize_updates_extent_and_flag() {
    let mut state = WindowState::new(Extent2D::new(800, 600));
    state.handle_event(&WindowEvent::Resized(PhysicalSize::new(1024, 768)));
    assert_eq!(state.extent, Extent2D::new(1024, 768));
    assert!(state.resized);
    assert!(!state.close_requested);
}

#[test]
fn test_minimize_gives_degenerate_extent() {
    let mut state = WindowState::new(Extent2D::new(800, 600));
    state.handle_event(&WindowEvent::Resized(PhysicalSize::new(0, 0)));
    assert!(state.extent.is_degenerate());
}

#[test]
fn test_close_requested() {
    let mut state = WindowState::new(Extent2D::new(800, 600));
    state.handle_event(&WindowEvent::CloseRequested);
    assert!(state.close_requested);
    assert!(!state.resized);
}

#[test]
fn test_other_events_ignored() {
    let mut state = WindowState::new(Extent2D::new(800, 600));
    state.handle_event(&WindowEvent::Focused(true));
    assert_eq!(state, WindowState::new(Extent2D::new(800, 600)));
}
