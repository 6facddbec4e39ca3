//! In-memory stand-in for the OS and driver, used by the unit tests.

use super::{ClassRegistration, Platform, WindowClass, WindowParams};
use crate::{
    ClassStyle, ContextHandle, EventCallback, ExtendedStyle, InstanceHandle, Message, PixelFormat,
    PixelFormatFlags, Placement, ProcAddress, Rect, Response, Size, SurfaceHandle, WindowHandle,
    WindowStyle,
};
use std::{
    collections::{HashMap, HashSet},
    ffi::{CStr, c_void},
};

const ERROR_CLASS_REGISTRATION: u32 = 1407;
const ERROR_WINDOW_CREATION: u32 = 1400;
const DEFAULT_POSITION: (i32, i32) = (100, 100);

#[derive(Debug, Default, Clone)]
pub struct Failures {
    pub instance: bool,
    pub register_class: bool,
    pub create_window: bool,
    pub acquire_surface: bool,
    pub choose_format: bool,
    pub create_context: bool,
    pub make_current: bool,
    /// Zero-based indices of the context-binding `make_current` calls that fail.
    pub make_current_at: Vec<usize>,
    /// `current_context` reports nothing even while a context is bound.
    pub lose_current: bool,
    pub upgrade: bool,
    pub placement_query: bool,
    pub placement_restore: bool,
    pub monitor_query: bool,
}

struct MockWindow {
    title: String,
    own_dc: bool,
    style: WindowStyle,
    rect: Rect,
    callback: EventCallback,
}

struct MockSurface {
    window: WindowHandle,
    format: Option<i32>,
}

pub struct MockPlatform {
    pub fail: Failures,
    pub monitor: Rect,

    next_handle: usize,
    classes: HashMap<String, ClassStyle>,
    windows: HashMap<WindowHandle, MockWindow>,
    surfaces: HashMap<SurfaceHandle, MockSurface>,
    formats: Vec<PixelFormat>,

    live_contexts: HashSet<ContextHandle>,
    deleted_contexts: Vec<ContextHandle>,
    current: Option<ContextHandle>,
    make_current_calls: usize,

    missing_symbols: HashSet<String>,
    upgrade_requests: Vec<Vec<i32>>,
    released_surfaces: usize,
}

impl MockPlatform {
    pub fn new() -> Self {
        let desired = PixelFormat::desired();

        Self {
            fail: Failures::default(),
            monitor: Rect {
                left: 0,
                top: 0,
                right: 1920,
                bottom: 1080,
            },
            next_handle: 0x1000,
            classes: HashMap::new(),
            windows: HashMap::new(),
            surfaces: HashMap::new(),
            formats: vec![
                PixelFormat {
                    flags: PixelFormatFlags::DRAW_TO_WINDOW | PixelFormatFlags::SUPPORT_OPENGL,
                    color_bits: 24,
                    alpha_bits: 0,
                    ..desired
                },
                PixelFormat {
                    depth_bits: 24,
                    ..desired
                },
            ],
            live_contexts: HashSet::new(),
            deleted_contexts: vec![],
            current: None,
            make_current_calls: 0,
            missing_symbols: HashSet::new(),
            upgrade_requests: vec![],
            released_surfaces: 0,
        }
    }

    pub fn with_missing_symbols(mut self, symbols: &[&str]) -> Self {
        self.missing_symbols
            .extend(symbols.iter().map(|s| s.to_string()));
        self
    }

    pub fn without_upgrade(self) -> Self {
        self.with_missing_symbols(&["wglCreateContextAttribsARB"])
    }

    pub fn make_any_context_current(&mut self) -> ContextHandle {
        let context = self.next(ContextHandle::from_raw);
        self.live_contexts.insert(context);
        self.current = Some(context);
        context
    }

    pub fn dispatch(&mut self, window: WindowHandle, code: u32) -> Response {
        let window_state = self.windows.get_mut(&window).expect("unknown window");
        (window_state.callback)(Message {
            window,
            code,
            param_a: 0,
            param_b: 0,
        })
    }

    pub fn is_live(&self, context: ContextHandle) -> bool {
        self.live_contexts.contains(&context)
    }

    pub fn live_context_count(&self) -> usize {
        self.live_contexts.len()
    }

    pub fn deleted_contexts(&self) -> &[ContextHandle] {
        &self.deleted_contexts
    }

    pub fn upgrade_requests(&self) -> &[Vec<i32>] {
        &self.upgrade_requests
    }

    pub fn released_surfaces(&self) -> usize {
        self.released_surfaces
    }

    pub fn pixel_format(&self, surface: SurfaceHandle) -> Option<i32> {
        self.surfaces.get(&surface)?.format
    }

    pub fn window_title(&self, window: WindowHandle) -> Option<&str> {
        Some(&self.windows.get(&window)?.title)
    }

    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    pub fn class_style(&self, name: &str) -> Option<ClassStyle> {
        self.classes.get(name).copied()
    }

    pub fn is_surface_valid(&self, surface: SurfaceHandle) -> bool {
        self.surfaces.contains_key(&surface)
    }

    fn next<H>(&mut self, make: fn(*mut c_void) -> Option<H>) -> H {
        self.next_handle += 0x10;
        make(std::ptr::without_provenance_mut(self.next_handle)).expect("non-null handle")
    }

    fn frame(style: WindowStyle) -> Rect {
        if style.contains(WindowStyle::CAPTION) {
            Rect {
                left: 8,
                top: 31,
                right: 8,
                bottom: 8,
            }
        } else {
            Rect::default()
        }
    }

    fn symbol_address(symbol: &CStr) -> Option<ProcAddress> {
        let seed = symbol
            .to_bytes()
            .iter()
            .fold(0usize, |acc, b| acc.wrapping_mul(31).wrapping_add(*b as usize));
        ProcAddress::from_driver(std::ptr::without_provenance(0x10_0000 + (seed & 0xFFFF) * 16))
    }
}

impl Default for MockPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for MockPlatform {
    fn current_instance(&self) -> Option<InstanceHandle> {
        if self.fail.instance {
            return None;
        }

        InstanceHandle::from_raw(std::ptr::without_provenance_mut(0x40_0000))
    }

    fn register_class(
        &mut self,
        _instance: InstanceHandle,
        class: &WindowClass,
    ) -> Result<ClassRegistration, u32> {
        if self.fail.register_class {
            return Err(ERROR_CLASS_REGISTRATION);
        }

        if self.classes.contains_key(&class.name) {
            return Ok(ClassRegistration::AlreadyRegistered);
        }

        self.classes.insert(class.name.clone(), class.style);
        Ok(ClassRegistration::Registered)
    }

    fn adjust_window_rect(
        &self,
        client: Size,
        style: WindowStyle,
        _ex_style: ExtendedStyle,
    ) -> Option<Rect> {
        let frame = Self::frame(style);
        Some(Rect {
            left: -frame.left,
            top: -frame.top,
            right: client.width as i32 + frame.right,
            bottom: client.height as i32 + frame.bottom,
        })
    }

    fn create_window(
        &mut self,
        params: &WindowParams,
        callback: EventCallback,
    ) -> Result<WindowHandle, u32> {
        let Some(class_style) = self.classes.get(params.class_name).copied() else {
            return Err(ERROR_WINDOW_CREATION);
        };
        if self.fail.create_window {
            return Err(ERROR_WINDOW_CREATION);
        }

        let window = self.next(WindowHandle::from_raw);
        let (x, y) = DEFAULT_POSITION;
        self.windows.insert(
            window,
            MockWindow {
                title: params.title.to_owned(),
                own_dc: class_style.contains(ClassStyle::OWN_DC),
                style: params.style,
                rect: Rect {
                    left: x,
                    top: y,
                    right: x + params.size.width as i32,
                    bottom: y + params.size.height as i32,
                },
                callback,
            },
        );

        Ok(window)
    }

    fn client_size(&self, window: WindowHandle) -> Option<Size> {
        let window = self.windows.get(&window)?;
        let frame = Self::frame(window.style);

        Some(Size {
            width: (window.rect.width() - frame.left - frame.right) as u32,
            height: (window.rect.height() - frame.top - frame.bottom) as u32,
        })
    }

    fn acquire_surface(&mut self, window: WindowHandle) -> Option<SurfaceHandle> {
        if self.fail.acquire_surface {
            return None;
        }
        let own_dc = self.windows.get(&window)?.own_dc;

        // own-DC windows hand out the same surface every time
        if own_dc
            && let Some((surface, _)) = self.surfaces.iter().find(|(_, s)| s.window == window)
        {
            return Some(*surface);
        }

        let surface = self.next(SurfaceHandle::from_raw);
        self.surfaces.insert(
            surface,
            MockSurface {
                window,
                format: None,
            },
        );
        Some(surface)
    }

    fn release_surface(&mut self, window: WindowHandle, surface: SurfaceHandle) {
        self.released_surfaces += 1;

        // a shared DC goes back to the cache and stops being usable
        if self.windows.get(&window).is_some_and(|w| !w.own_dc) {
            self.surfaces.remove(&surface);
        }
    }

    fn choose_pixel_format(
        &mut self,
        surface: SurfaceHandle,
        desired: &PixelFormat,
    ) -> Option<i32> {
        if self.fail.choose_format || !self.surfaces.contains_key(&surface) {
            return None;
        }

        self.formats
            .iter()
            .position(|format| format.satisfies(desired))
            .map(|index| index as i32 + 1)
    }

    fn describe_pixel_format(&self, _surface: SurfaceHandle, index: i32) -> Option<PixelFormat> {
        let index = usize::try_from(index).ok()?.checked_sub(1)?;
        self.formats.get(index).copied()
    }

    fn current_pixel_format(&self, surface: SurfaceHandle) -> Option<i32> {
        self.pixel_format(surface)
    }

    fn set_pixel_format(
        &mut self,
        surface: SurfaceHandle,
        index: i32,
        _format: &PixelFormat,
    ) -> bool {
        match self.surfaces.get_mut(&surface) {
            Some(surface) if surface.format.is_none() => {
                surface.format = Some(index);
                true
            }
            _ => false,
        }
    }

    fn create_context(&mut self, surface: SurfaceHandle) -> Option<ContextHandle> {
        if self.fail.create_context || self.pixel_format(surface).is_none() {
            return None;
        }

        let context = self.next(ContextHandle::from_raw);
        self.live_contexts.insert(context);
        Some(context)
    }

    fn create_context_attribs(
        &mut self,
        create: ProcAddress,
        surface: SurfaceHandle,
        attribs: &[i32],
    ) -> Option<ContextHandle> {
        self.upgrade_requests.push(attribs.to_vec());

        if self.fail.upgrade || Some(create) != Self::symbol_address(c"wglCreateContextAttribsARB")
        {
            return None;
        }

        self.create_context(surface)
    }

    fn make_current(
        &mut self,
        surface: Option<SurfaceHandle>,
        context: Option<ContextHandle>,
    ) -> bool {
        if context.is_some() {
            let call = self.make_current_calls;
            self.make_current_calls += 1;

            if self.fail.make_current || self.fail.make_current_at.contains(&call) {
                return false;
            }
        }

        match context {
            Some(context) => {
                let surface_ok = surface.is_some_and(|s| self.surfaces.contains_key(&s));
                if !surface_ok || !self.live_contexts.contains(&context) {
                    return false;
                }
                self.current = Some(context);
            }
            None => self.current = None,
        }

        true
    }

    fn current_context(&self) -> Option<ContextHandle> {
        if self.fail.lose_current {
            return None;
        }

        self.current
    }

    fn delete_context(&mut self, context: ContextHandle) -> bool {
        if !self.live_contexts.remove(&context) {
            return false;
        }

        if self.current == Some(context) {
            self.current = None;
        }
        self.deleted_contexts.push(context);
        true
    }

    fn proc_address(&self, symbol: &CStr) -> Option<ProcAddress> {
        self.current?;

        let name = symbol.to_str().ok()?;
        if self.missing_symbols.contains(name) {
            return None;
        }

        Self::symbol_address(symbol)
    }

    fn window_style(&self, window: WindowHandle) -> WindowStyle {
        self.windows
            .get(&window)
            .map(|w| w.style)
            .unwrap_or(WindowStyle::empty())
    }

    fn set_window_style(&mut self, window: WindowHandle, style: WindowStyle) {
        if let Some(window) = self.windows.get_mut(&window) {
            window.style = style;
        }
    }

    fn window_placement(&self, window: WindowHandle) -> Option<Placement> {
        if self.fail.placement_query {
            return None;
        }

        let window = self.windows.get(&window)?;
        Some(Placement {
            show_command: 1,
            normal_position: window.rect,
            ..Placement::default()
        })
    }

    fn set_window_placement(&mut self, window: WindowHandle, placement: &Placement) -> bool {
        if self.fail.placement_restore {
            return false;
        }

        match self.windows.get_mut(&window) {
            Some(window) => {
                window.rect = placement.normal_position;
                true
            }
            None => false,
        }
    }

    fn monitor_rect(&self, window: WindowHandle) -> Option<Rect> {
        if self.fail.monitor_query || !self.windows.contains_key(&window) {
            return None;
        }

        Some(self.monitor)
    }

    fn set_window_rect(&mut self, window: WindowHandle, rect: Rect) -> bool {
        match self.windows.get_mut(&window) {
            Some(window) => {
                window.rect = rect;
                true
            }
            None => false,
        }
    }

    fn refresh_frame(&mut self, window: WindowHandle) -> bool {
        self.windows.contains_key(&window)
    }

    fn window_rect(&self, window: WindowHandle) -> Option<Rect> {
        Some(self.windows.get(&window)?.rect)
    }
}
