use crate::ExtensionTable;
use bitflags::bitflags;
use raw_window_handle::{RawWindowHandle, Win32WindowHandle};
use std::{cell::Cell, ffi::c_void, num::NonZeroIsize, ptr::NonNull, rc::Rc};

macro_rules! opaque_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        #[repr(transparent)]
        pub struct $name(NonNull<c_void>);

        impl $name {
            pub fn from_raw(ptr: *mut c_void) -> Option<Self> {
                NonNull::new(ptr).map(Self)
            }

            pub fn as_raw(self) -> *mut c_void {
                self.0.as_ptr()
            }
        }
    };
}

opaque_handle!(
    /// Native window (`HWND`).
    WindowHandle
);
opaque_handle!(
    /// Drawing surface of a window (`HDC`).
    SurfaceHandle
);
opaque_handle!(
    /// Rendering context (`HGLRC`).
    ContextHandle
);
opaque_handle!(
    /// The hosting module (`HINSTANCE`).
    InstanceHandle
);
opaque_handle!(
    /// Address of a GL or WGL function.
    ProcAddress
);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl From<(u32, u32)> for Size {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

/// Restorable geometry of a top-level window, saved when entering fullscreen.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Placement {
    pub flags: u32,
    pub show_command: u32,
    pub min_position: Point,
    pub max_position: Point,
    pub normal_position: Rect,
}

bitflags! {
    #[derive(Clone, Copy, Eq, PartialEq, Debug)]
    pub struct WindowStyle: u32 {
        const OVERLAPPED = 0x0000_0000;
        const MAXIMIZE_BOX = 0x0001_0000;
        const MINIMIZE_BOX = 0x0002_0000;
        const THICK_FRAME = 0x0004_0000;
        const SYS_MENU = 0x0008_0000;
        const CAPTION = 0x00C0_0000;
        const CLIP_CHILDREN = 0x0200_0000;
        const CLIP_SIBLINGS = 0x0400_0000;
        const VISIBLE = 0x1000_0000;
        const POPUP = 0x8000_0000;

        const OVERLAPPED_WINDOW = Self::OVERLAPPED.bits()
            | Self::CAPTION.bits()
            | Self::SYS_MENU.bits()
            | Self::THICK_FRAME.bits()
            | Self::MINIMIZE_BOX.bits()
            | Self::MAXIMIZE_BOX.bits();
    }
}

bitflags! {
    #[derive(Clone, Copy, Eq, PartialEq, Debug)]
    pub struct ExtendedStyle: u32 {
        const WINDOW_EDGE = 0x0000_0100;
    }
}

bitflags! {
    #[derive(Clone, Copy, Eq, PartialEq, Debug)]
    pub struct ClassStyle: u32 {
        const VREDRAW = 0x0001;
        const HREDRAW = 0x0002;
        const OWN_DC = 0x0020;
    }
}

/// Message identifiers delivered to the event callback.
pub mod message {
    pub const PAINT: u32 = 0x000F;
    pub const CLOSE: u32 = 0x0010;
    pub const KEYDOWN: u32 = 0x0100;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Message {
    pub window: WindowHandle,
    pub code: u32,
    pub param_a: usize,
    pub param_b: isize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Response {
    Handled(isize),
    /// Forward to the platform's default window procedure.
    Default,
}

pub type EventCallback = Box<dyn FnMut(Message) -> Response>;

/// Shared `running` flag. Cloned into the event callback of the window it belongs to.
#[derive(Clone, Debug)]
pub struct Liveness(Rc<Cell<bool>>);

impl Liveness {
    pub fn new() -> Self {
        Self(Rc::new(Cell::new(true)))
    }

    pub fn is_running(&self) -> bool {
        self.0.get()
    }

    /// Returns whether this call was the one that stopped it.
    pub fn stop(&self) -> bool {
        self.0.replace(false)
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid window descriptor: {0}")]
    InvalidDescriptor(&'static str),
    #[error("no module handle to register the window class with")]
    InstanceUnavailable,
    #[error("window already created for this descriptor")]
    WindowAlreadyCreated,
    #[error("failed to register window class (os error {code})")]
    WindowClassRegistrationFailed { code: u32 },
    #[error("failed to create window (os error {code})")]
    WindowCreationFailed { code: u32 },
    #[error("no window has been created for this descriptor")]
    WindowNotCreated,
    #[error("failed to acquire a drawing surface for the window")]
    SurfaceAcquisitionFailed,
    #[error("no pixel format matches the requested capabilities")]
    FormatSelectionFailed,
    #[error("failed to create the baseline rendering context")]
    BaselineContextCreationFailed,
    #[error("failed to make the rendering context current")]
    MakeCurrentFailed,
    #[error("a rendering context is already established for this window")]
    ContextAlreadyEstablished,
    #[error("no rendering context is current on this thread")]
    NoCurrentContext,
    #[error("entry point `{0}` could not be resolved")]
    ExtensionEntryPointUnresolved(&'static str),
    #[error("failed to query the window placement")]
    PlacementQueryFailed,
    #[error("failed to query the monitor containing the window")]
    MonitorQueryFailed,
    #[error("failed to restore the window placement")]
    PlacementRestoreFailed,
    #[error("failed to move the window over its monitor")]
    WindowResizeFailed,
    #[error("no native backend for this platform")]
    UnsupportedPlatform,
}

/// Everything one window and its rendering context are made of.
#[derive(Debug)]
pub struct WindowDescriptor {
    pub size: Size,
    pub title: String,
    pub fullscreen: bool,
    pub running: Liveness,
    pub placement: Option<Placement>,

    pub window: Option<WindowHandle>,
    pub surface: Option<SurfaceHandle>,
    pub context: Option<ContextHandle>,
    pub extensions: ExtensionTable,
}

impl WindowDescriptor {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            size: Size {
                width: 1280,
                height: 720,
            },
            title: title.into(),
            fullscreen: false,
            running: Liveness::new(),
            placement: None,
            window: None,
            surface: None,
            context: None,
            extensions: ExtensionTable::new(),
        }
    }

    pub fn with_size(self, size: impl Into<Size>) -> Self {
        Self {
            size: size.into(),
            ..self
        }
    }

    pub fn with_title(self, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..self
        }
    }

    pub fn with_fullscreen(self, fullscreen: bool) -> Self {
        Self { fullscreen, ..self }
    }

    pub fn is_running(&self) -> bool {
        self.running.is_running()
    }

    pub fn has_context(&self) -> bool {
        self.surface.is_some() && self.context.is_some()
    }

    pub fn raw_window_handle(&self) -> Option<RawWindowHandle> {
        let hwnd = NonZeroIsize::new(self.window?.as_raw() as isize)?;
        Some(RawWindowHandle::Win32(Win32WindowHandle::new(hwnd)))
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        if self.size.width == 0 || self.size.height == 0 {
            return Err(Error::InvalidDescriptor("width and height must be non-zero"));
        }

        if i32::try_from(self.size.width).is_err() || i32::try_from(self.size.height).is_err() {
            return Err(Error::InvalidDescriptor("width and height must fit in an i32"));
        }

        if self.title.is_empty() {
            return Err(Error::InvalidDescriptor("title must not be empty"));
        }

        Ok(())
    }
}

impl Default for WindowDescriptor {
    fn default() -> Self {
        Self::new("SGL Window")
    }
}
