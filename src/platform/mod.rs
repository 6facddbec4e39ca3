#[cfg(target_os = "windows")]
pub mod win;
#[cfg(target_os = "windows")]
pub use win::Win32 as Native;

#[cfg(test)]
pub mod mock;

use crate::{
    ClassStyle, ContextHandle, EventCallback, ExtendedStyle, InstanceHandle, PixelFormat,
    Placement, ProcAddress, Rect, Size, SurfaceHandle, WindowHandle, WindowStyle,
};
use std::ffi::CStr;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WindowClass {
    pub name: String,
    pub style: ClassStyle,
}

impl Default for WindowClass {
    fn default() -> Self {
        Self {
            name: "SGL Window".to_owned(),
            style: ClassStyle::HREDRAW | ClassStyle::VREDRAW | ClassStyle::OWN_DC,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClassRegistration {
    Registered,
    AlreadyRegistered,
}

#[derive(Clone, Copy, Debug)]
pub struct WindowParams<'a> {
    pub instance: InstanceHandle,
    pub class_name: &'a str,
    pub title: &'a str,
    pub style: WindowStyle,
    pub ex_style: ExtendedStyle,
    /// Outer size, frame included. The position is left to the OS.
    pub size: Size,
}

/// Every OS and driver call the bootstrap makes. Failures carry the OS error code where the
/// platform reports one.
pub trait Platform {
    fn current_instance(&self) -> Option<InstanceHandle>;

    fn register_class(
        &mut self,
        instance: InstanceHandle,
        class: &WindowClass,
    ) -> Result<ClassRegistration, u32>;

    /// Outer rectangle of a window whose client area is `client`.
    fn adjust_window_rect(
        &self,
        client: Size,
        style: WindowStyle,
        ex_style: ExtendedStyle,
    ) -> Option<Rect>;

    fn create_window(
        &mut self,
        params: &WindowParams,
        callback: EventCallback,
    ) -> Result<WindowHandle, u32>;

    fn client_size(&self, window: WindowHandle) -> Option<Size>;

    fn acquire_surface(&mut self, window: WindowHandle) -> Option<SurfaceHandle>;
    fn release_surface(&mut self, window: WindowHandle, surface: SurfaceHandle);

    /// 1-based index of the closest supported format.
    fn choose_pixel_format(&mut self, surface: SurfaceHandle, desired: &PixelFormat)
    -> Option<i32>;
    fn describe_pixel_format(&self, surface: SurfaceHandle, index: i32) -> Option<PixelFormat>;
    /// Index already applied to the surface, if any. A format can only be set once per surface.
    fn current_pixel_format(&self, surface: SurfaceHandle) -> Option<i32>;
    fn set_pixel_format(&mut self, surface: SurfaceHandle, index: i32, format: &PixelFormat)
    -> bool;

    fn create_context(&mut self, surface: SurfaceHandle) -> Option<ContextHandle>;

    /// Calls `wglCreateContextAttribsARB` (or its equivalent) found at `create`.
    fn create_context_attribs(
        &mut self,
        create: ProcAddress,
        surface: SurfaceHandle,
        attribs: &[i32],
    ) -> Option<ContextHandle>;

    fn make_current(
        &mut self,
        surface: Option<SurfaceHandle>,
        context: Option<ContextHandle>,
    ) -> bool;
    fn current_context(&self) -> Option<ContextHandle>;
    fn delete_context(&mut self, context: ContextHandle) -> bool;

    /// Context-scoped lookup. Only meaningful while a context is current.
    fn proc_address(&self, symbol: &CStr) -> Option<ProcAddress>;

    fn window_style(&self, window: WindowHandle) -> WindowStyle;
    fn set_window_style(&mut self, window: WindowHandle, style: WindowStyle);
    fn window_placement(&self, window: WindowHandle) -> Option<Placement>;
    fn set_window_placement(&mut self, window: WindowHandle, placement: &Placement) -> bool;
    /// Bounds of the monitor the window is on, the primary monitor if it is on none.
    fn monitor_rect(&self, window: WindowHandle) -> Option<Rect>;
    /// Moves to the top of the z-order and applies a pending frame change.
    fn set_window_rect(&mut self, window: WindowHandle, rect: Rect) -> bool;
    /// Applies a pending frame change without moving or resizing.
    fn refresh_frame(&mut self, window: WindowHandle) -> bool;
    fn window_rect(&self, window: WindowHandle) -> Option<Rect>;
}
