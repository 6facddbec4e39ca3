mod gl;
mod util;
mod window;

use super::{ClassRegistration, Platform, WindowClass, WindowParams};
use crate::{
    ContextHandle, EventCallback, ExtendedStyle, InstanceHandle, PixelFormat, Placement,
    ProcAddress, Rect, Size, SurfaceHandle, WindowDescriptor, WindowHandle, WindowStyle,
};
use std::{ffi::CStr, marker::PhantomData, ptr::null_mut};

/// The Win32 and WGL backend. Windows and contexts belong to the thread that created them, so
/// this type is neither `Send` nor `Sync`.
#[derive(Debug, Default)]
pub struct Win32 {
    _thread_bound: PhantomData<*mut ()>,
}

impl Win32 {
    pub fn new() -> Self {
        Self::default()
    }

    /// Presents the back buffer of the descriptor's surface.
    pub fn swap_buffers(&self, descriptor: &WindowDescriptor) -> bool {
        match descriptor.surface {
            Some(surface) => unsafe { gl::swap_buffers(surface.as_raw()) },
            None => false,
        }
    }
}

impl Platform for Win32 {
    fn current_instance(&self) -> Option<InstanceHandle> {
        InstanceHandle::from_raw(util::hinstance())
    }

    fn register_class(
        &mut self,
        instance: InstanceHandle,
        class: &WindowClass,
    ) -> Result<ClassRegistration, u32> {
        unsafe { window::register_class(instance.as_raw(), class) }
    }

    fn adjust_window_rect(
        &self,
        client: Size,
        style: WindowStyle,
        ex_style: ExtendedStyle,
    ) -> Option<Rect> {
        unsafe { window::adjust_window_rect(client, style, ex_style) }
    }

    fn create_window(
        &mut self,
        params: &WindowParams,
        callback: EventCallback,
    ) -> Result<WindowHandle, u32> {
        let hwnd = unsafe { window::create_window(params, callback)? };
        WindowHandle::from_raw(hwnd).ok_or(0)
    }

    fn client_size(&self, window: WindowHandle) -> Option<Size> {
        unsafe { window::client_size(window.as_raw()) }
    }

    fn acquire_surface(&mut self, window: WindowHandle) -> Option<SurfaceHandle> {
        unsafe { gl::acquire_surface(window.as_raw()).and_then(SurfaceHandle::from_raw) }
    }

    fn release_surface(&mut self, window: WindowHandle, surface: SurfaceHandle) {
        unsafe { gl::release_surface(window.as_raw(), surface.as_raw()) }
    }

    fn choose_pixel_format(
        &mut self,
        surface: SurfaceHandle,
        desired: &PixelFormat,
    ) -> Option<i32> {
        unsafe { gl::choose_pixel_format(surface.as_raw(), desired) }
    }

    fn describe_pixel_format(&self, surface: SurfaceHandle, index: i32) -> Option<PixelFormat> {
        unsafe { gl::describe_pixel_format(surface.as_raw(), index) }
    }

    fn current_pixel_format(&self, surface: SurfaceHandle) -> Option<i32> {
        unsafe { gl::current_pixel_format(surface.as_raw()) }
    }

    fn set_pixel_format(
        &mut self,
        surface: SurfaceHandle,
        index: i32,
        format: &PixelFormat,
    ) -> bool {
        unsafe { gl::set_pixel_format(surface.as_raw(), index, format) }
    }

    fn create_context(&mut self, surface: SurfaceHandle) -> Option<ContextHandle> {
        unsafe { gl::create_context(surface.as_raw()).and_then(ContextHandle::from_raw) }
    }

    fn create_context_attribs(
        &mut self,
        create: ProcAddress,
        surface: SurfaceHandle,
        attribs: &[i32],
    ) -> Option<ContextHandle> {
        unsafe {
            gl::create_context_attribs(create, surface.as_raw(), attribs)
                .and_then(ContextHandle::from_raw)
        }
    }

    fn make_current(
        &mut self,
        surface: Option<SurfaceHandle>,
        context: Option<ContextHandle>,
    ) -> bool {
        unsafe {
            gl::make_current(
                surface.map_or(null_mut(), SurfaceHandle::as_raw),
                context.map_or(null_mut(), ContextHandle::as_raw),
            )
        }
    }

    fn current_context(&self) -> Option<ContextHandle> {
        unsafe { ContextHandle::from_raw(gl::current_context()) }
    }

    fn delete_context(&mut self, context: ContextHandle) -> bool {
        unsafe { gl::delete_context(context.as_raw()) }
    }

    fn proc_address(&self, symbol: &CStr) -> Option<ProcAddress> {
        unsafe { gl::proc_address(symbol) }
    }

    fn window_style(&self, window: WindowHandle) -> WindowStyle {
        unsafe { window::window_style(window.as_raw()) }
    }

    fn set_window_style(&mut self, window: WindowHandle, style: WindowStyle) {
        unsafe { window::set_window_style(window.as_raw(), style) }
    }

    fn window_placement(&self, window: WindowHandle) -> Option<Placement> {
        unsafe { window::window_placement(window.as_raw()) }
    }

    fn set_window_placement(&mut self, window: WindowHandle, placement: &Placement) -> bool {
        unsafe { window::set_window_placement(window.as_raw(), placement) }
    }

    fn monitor_rect(&self, window: WindowHandle) -> Option<Rect> {
        unsafe { window::monitor_rect(window.as_raw()) }
    }

    fn set_window_rect(&mut self, window: WindowHandle, rect: Rect) -> bool {
        unsafe { window::set_window_rect(window.as_raw(), rect) }
    }

    fn refresh_frame(&mut self, window: WindowHandle) -> bool {
        unsafe { window::refresh_frame(window.as_raw()) }
    }

    fn window_rect(&self, window: WindowHandle) -> Option<Rect> {
        unsafe { window::window_rect(window.as_raw()) }
    }
}
