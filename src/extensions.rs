//! Runtime-resolved GL entry points.
//!
//! The table is data: one line per entry point in the `entry_points!` invocation below, giving the
//! marker type, the exported symbol and its call signature. Resolution walks the list once a
//! context is current and records, per entry, whether the driver knows it.

use crate::{Error, ProcAddress, platform::Platform};
use std::ffi::{CStr, c_char, c_void};

pub type GLenum = u32;
pub type GLbitfield = u32;
pub type GLboolean = u8;
pub type GLint = i32;
pub type GLuint = u32;
pub type GLsizei = i32;
pub type GLfloat = f32;
pub type GLchar = c_char;
pub type GLintptr = isize;
pub type GLsizeiptr = isize;
pub type GLuint64 = u64;

/// A statically known entry point with its call signature.
pub trait EntryPoint {
    const NAME: &'static str;
    const INDEX: usize;
    type Fn: Copy;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryPointInfo {
    pub name: &'static str,
    pub signature: &'static str,
    symbol: &'static str,
}

impl EntryPointInfo {
    pub fn symbol(&self) -> Option<&'static CStr> {
        CStr::from_bytes_with_nul(self.symbol.as_bytes()).ok()
    }
}

macro_rules! entry_points {
    ($($marker:ident => $name:literal: fn($($arg:ty),*) $(-> $ret:ty)?;)*) => {
        #[allow(non_camel_case_types, dead_code)]
        #[repr(usize)]
        enum Slot {
            $($marker,)*
        }

        pub static ENTRY_POINTS: &[EntryPointInfo] = &[
            $(EntryPointInfo {
                name: $name,
                signature: stringify!(fn($($arg),*) $(-> $ret)?),
                symbol: concat!($name, "\0"),
            },)*
        ];

        /// Marker types for [`ExtensionTable::get`].
        pub mod gl {
            use super::*;

            $(
                pub enum $marker {}

                impl EntryPoint for $marker {
                    const NAME: &'static str = $name;
                    const INDEX: usize = Slot::$marker as usize;
                    type Fn = unsafe extern "system" fn($($arg),*) $(-> $ret)?;
                }
            )*
        }
    };
}

entry_points! {
    GenBuffers => "glGenBuffers": fn(GLsizei, *mut GLuint);
    BindBuffer => "glBindBuffer": fn(GLenum, GLuint);
    BufferData => "glBufferData": fn(GLenum, GLsizeiptr, *const c_void, GLenum);
    BufferSubData => "glBufferSubData": fn(GLenum, GLintptr, GLsizeiptr, *const c_void);
    DeleteBuffers => "glDeleteBuffers": fn(GLsizei, *const GLuint);
    MapBuffer => "glMapBuffer": fn(GLenum, GLenum) -> *mut c_void;
    UnmapBuffer => "glUnmapBuffer": fn(GLenum) -> GLboolean;

    CreateShader => "glCreateShader": fn(GLenum) -> GLuint;
    ShaderSource => "glShaderSource": fn(GLuint, GLsizei, *const *const GLchar, *const GLint);
    CompileShader => "glCompileShader": fn(GLuint);
    GetShaderiv => "glGetShaderiv": fn(GLuint, GLenum, *mut GLint);
    GetShaderInfoLog => "glGetShaderInfoLog": fn(GLuint, GLsizei, *mut GLsizei, *mut GLchar);
    DeleteShader => "glDeleteShader": fn(GLuint);
    CreateProgram => "glCreateProgram": fn() -> GLuint;
    AttachShader => "glAttachShader": fn(GLuint, GLuint);
    LinkProgram => "glLinkProgram": fn(GLuint);
    GetProgramiv => "glGetProgramiv": fn(GLuint, GLenum, *mut GLint);
    GetProgramInfoLog => "glGetProgramInfoLog": fn(GLuint, GLsizei, *mut GLsizei, *mut GLchar);
    UseProgram => "glUseProgram": fn(GLuint);
    DeleteProgram => "glDeleteProgram": fn(GLuint);
    GetUniformLocation => "glGetUniformLocation": fn(GLuint, *const GLchar) -> GLint;
    Uniform1i => "glUniform1i": fn(GLint, GLint);
    Uniform1f => "glUniform1f": fn(GLint, GLfloat);
    Uniform4f => "glUniform4f": fn(GLint, GLfloat, GLfloat, GLfloat, GLfloat);
    UniformMatrix4fv => "glUniformMatrix4fv": fn(GLint, GLsizei, GLboolean, *const GLfloat);
    GetAttribLocation => "glGetAttribLocation": fn(GLuint, *const GLchar) -> GLint;
    VertexAttribPointer => "glVertexAttribPointer": fn(GLuint, GLint, GLenum, GLboolean, GLsizei, *const c_void);
    EnableVertexAttribArray => "glEnableVertexAttribArray": fn(GLuint);
    DisableVertexAttribArray => "glDisableVertexAttribArray": fn(GLuint);

    GenVertexArrays => "glGenVertexArrays": fn(GLsizei, *mut GLuint);
    BindVertexArray => "glBindVertexArray": fn(GLuint);
    DeleteVertexArrays => "glDeleteVertexArrays": fn(GLsizei, *const GLuint);

    GenQueries => "glGenQueries": fn(GLsizei, *mut GLuint);
    DeleteQueries => "glDeleteQueries": fn(GLsizei, *const GLuint);
    BeginQuery => "glBeginQuery": fn(GLenum, GLuint);
    EndQuery => "glEndQuery": fn(GLenum);
    QueryCounter => "glQueryCounter": fn(GLuint, GLenum);
    GetQueryObjectuiv => "glGetQueryObjectuiv": fn(GLuint, GLenum, *mut GLuint);
    GetQueryObjectui64v => "glGetQueryObjectui64v": fn(GLuint, GLenum, *mut GLuint64);

    ActiveTexture => "glActiveTexture": fn(GLenum);

    MultiDrawArrays => "glMultiDrawArrays": fn(GLenum, *const GLint, *const GLsizei, GLsizei);
    MultiDrawElements => "glMultiDrawElements": fn(GLenum, *const GLsizei, GLenum, *const *const c_void, GLsizei);

    Viewport => "glViewport": fn(GLint, GLint, GLsizei, GLsizei);
    ClearColor => "glClearColor": fn(GLfloat, GLfloat, GLfloat, GLfloat);
    Clear => "glClear": fn(GLbitfield);
}

impl ProcAddress {
    /// Drivers report some failed lookups as small integers or -1 instead of null.
    pub fn from_driver(ptr: *const c_void) -> Option<Self> {
        let addr = ptr as usize;
        if addr < 8 || addr == usize::MAX {
            None
        } else {
            Self::from_raw(ptr as *mut c_void)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Complete,
    Partial(Vec<&'static str>),
}

impl Resolution {
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }

    pub fn unresolved(&self) -> &[&'static str] {
        match self {
            Self::Complete => &[],
            Self::Partial(names) => names,
        }
    }
}

/// One slot per entry of [`ENTRY_POINTS`], each unresolved or holding a valid address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionTable {
    slots: Vec<Option<ProcAddress>>,
}

impl ExtensionTable {
    pub fn new() -> Self {
        Self {
            slots: vec![None; ENTRY_POINTS.len()],
        }
    }

    /// Looks every entry point up through the context-scoped resolver of `platform`.
    /// Fails if no context is current on the calling thread.
    pub fn resolve_all<P: Platform + ?Sized>(&mut self, platform: &P) -> Result<Resolution, Error> {
        if platform.current_context().is_none() {
            return Err(Error::NoCurrentContext);
        }

        Ok(self.resolve_with(|symbol| platform.proc_address(symbol)))
    }

    pub fn resolve_with(
        &mut self,
        mut lookup: impl FnMut(&CStr) -> Option<ProcAddress>,
    ) -> Resolution {
        let mut unresolved = vec![];

        for (slot, info) in self.slots.iter_mut().zip(ENTRY_POINTS) {
            *slot = info.symbol().and_then(&mut lookup);
            if slot.is_none() {
                unresolved.push(info.name);
            }
        }

        if unresolved.is_empty() {
            log::debug!("resolved all {} entry points", ENTRY_POINTS.len());
            Resolution::Complete
        } else {
            log::warn!(
                "{} of {} entry points unresolved: {}",
                unresolved.len(),
                ENTRY_POINTS.len(),
                unresolved.join(", ")
            );
            Resolution::Partial(unresolved)
        }
    }

    pub fn get<E: EntryPoint>(&self) -> Option<E::Fn> {
        debug_assert_eq!(size_of::<E::Fn>(), size_of::<*mut c_void>());

        let addr = (*self.slots.get(E::INDEX)?)?.as_raw();
        Some(unsafe { std::mem::transmute_copy::<*mut c_void, E::Fn>(&addr) })
    }

    pub fn address(&self, name: &str) -> Option<ProcAddress> {
        let index = ENTRY_POINTS.iter().position(|info| info.name == name)?;
        self.slots[index]
    }

    pub fn is_resolved(&self, name: &str) -> bool {
        self.address(name).is_some()
    }

    pub fn resolved_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.names_where(true)
    }

    pub fn unresolved_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.names_where(false)
    }

    /// Turns the first missing name into an error, for callers that cannot run without it.
    pub fn require(&self, names: &[&'static str]) -> Result<(), Error> {
        match names.iter().find(|name| !self.is_resolved(name)) {
            Some(&name) => Err(Error::ExtensionEntryPointUnresolved(name)),
            None => Ok(()),
        }
    }

    /// Forget every address; they belong to the context that was current when resolving.
    pub fn clear(&mut self) {
        self.slots.fill(None);
    }

    fn names_where(&self, resolved: bool) -> impl Iterator<Item = &'static str> + '_ {
        self.slots
            .iter()
            .zip(ENTRY_POINTS)
            .filter(move |(slot, _)| slot.is_some() == resolved)
            .map(|(_, info)| info.name)
    }
}

impl Default for ExtensionTable {
    fn default() -> Self {
        Self::new()
    }
}
