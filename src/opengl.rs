use crate::Resolution;
use bitflags::bitflags;

pub const WGL_CONTEXT_MAJOR_VERSION_ARB: i32 = 0x2091;
pub const WGL_CONTEXT_MINOR_VERSION_ARB: i32 = 0x2092;
pub const WGL_CONTEXT_FLAGS_ARB: i32 = 0x2094;
pub const WGL_CONTEXT_PROFILE_MASK_ARB: i32 = 0x9126;

pub const WGL_CONTEXT_DEBUG_BIT_ARB: i32 = 0x0000_0001;
pub const WGL_CONTEXT_FORWARD_COMPATIBLE_BIT_ARB: i32 = 0x0000_0002;
pub const WGL_CONTEXT_CORE_PROFILE_BIT_ARB: i32 = 0x0000_0001;
pub const WGL_CONTEXT_COMPATIBILITY_PROFILE_BIT_ARB: i32 = 0x0000_0002;

bitflags! {
    #[derive(Clone, Copy, Eq, PartialEq, Debug)]
    pub struct PixelFormatFlags: u32 {
        const DOUBLE_BUFFER = 0x0000_0001;
        const DRAW_TO_WINDOW = 0x0000_0004;
        const SUPPORT_OPENGL = 0x0000_0020;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelType {
    Rgba,
    ColorIndex,
}

/// The capabilities a drawing surface is asked for, or the ones a chosen format actually has.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelFormat {
    pub flags: PixelFormatFlags,
    pub pixel_type: PixelType,
    pub color_bits: u8,
    pub alpha_bits: u8,
    pub depth_bits: u8,
    pub stencil_bits: u8,
    pub main_plane: bool,
}

impl PixelFormat {
    /// Window-drawable, double-buffered RGBA with 32 colour, 8 alpha, 8 depth and 8 stencil bits.
    pub fn desired() -> Self {
        Self {
            flags: PixelFormatFlags::DRAW_TO_WINDOW
                | PixelFormatFlags::SUPPORT_OPENGL
                | PixelFormatFlags::DOUBLE_BUFFER,
            pixel_type: PixelType::Rgba,
            color_bits: 32,
            alpha_bits: 8,
            depth_bits: 8,
            stencil_bits: 8,
            main_plane: true,
        }
    }

    pub fn satisfies(&self, desired: &PixelFormat) -> bool {
        self.flags.contains(desired.flags)
            && self.pixel_type == desired.pixel_type
            && self.color_bits >= desired.color_bits
            && self.alpha_bits >= desired.alpha_bits
            && self.depth_bits >= desired.depth_bits
            && self.stencil_bits >= desired.stencil_bits
    }
}

impl Default for PixelFormat {
    fn default() -> Self {
        Self::desired()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlVersion {
    pub major: u32,
    pub minor: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GlProfile {
    #[default]
    Core,
    Compat,
}

/// What the upgraded context is asked for. `version: None` leaves the choice to the driver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContextRequest {
    pub version: Option<GlVersion>,
    pub profile: GlProfile,
    pub debug: bool,
}

impl ContextRequest {
    pub fn core(major: u32, minor: u32) -> Self {
        Self::default().with_version(major, minor)
    }

    /// `0.0` means "highest available", same as `None`.
    pub fn with_version(self, major: u32, minor: u32) -> Self {
        let version = (major, minor) != (0, 0);
        Self {
            version: version.then_some(GlVersion { major, minor }),
            ..self
        }
    }

    pub fn with_profile(self, profile: GlProfile) -> Self {
        Self { profile, ..self }
    }

    pub fn with_debug(self, debug: bool) -> Self {
        Self { debug, ..self }
    }

    /// Zero-terminated attribute list for `wglCreateContextAttribsARB`.
    pub fn attributes(&self) -> Vec<i32> {
        let mut attribs = vec![];

        if let Some(version) = self.version
            && (version.major, version.minor) != (0, 0)
        {
            attribs.extend_from_slice(&[
                WGL_CONTEXT_MAJOR_VERSION_ARB,
                version.major as i32,
                WGL_CONTEXT_MINOR_VERSION_ARB,
                version.minor as i32,
            ]);
        }

        let mut flags = 0;
        if self.debug {
            flags |= WGL_CONTEXT_DEBUG_BIT_ARB;
        }

        match self.profile {
            GlProfile::Core => {
                flags |= WGL_CONTEXT_FORWARD_COMPATIBLE_BIT_ARB;
                attribs.extend_from_slice(&[
                    WGL_CONTEXT_PROFILE_MASK_ARB,
                    WGL_CONTEXT_CORE_PROFILE_BIT_ARB,
                ]);
            }
            GlProfile::Compat => {
                attribs.extend_from_slice(&[
                    WGL_CONTEXT_PROFILE_MASK_ARB,
                    WGL_CONTEXT_COMPATIBILITY_PROFILE_BIT_ARB,
                ]);
            }
        }

        if flags != 0 {
            attribs.extend_from_slice(&[WGL_CONTEXT_FLAGS_ARB, flags]);
        }

        attribs.push(0);
        attribs
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextKind {
    /// The baseline context was replaced by one created through `wglCreateContextAttribsARB`.
    Upgraded,
    /// The upgrade was unavailable; the baseline context is in use.
    LegacyOnly,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextOutcome {
    pub kind: ContextKind,
    pub extensions: Resolution,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value_of(attribs: &[i32], key: i32) -> Option<i32> {
        attribs
            .chunks(2)
            .find(|pair| pair[0] == key)
            .and_then(|pair| pair.get(1).copied())
    }

    #[test]
    fn requested_version_is_threaded_into_attributes() {
        let attribs = ContextRequest::core(4, 5).attributes();

        assert_eq!(value_of(&attribs, WGL_CONTEXT_MAJOR_VERSION_ARB), Some(4));
        assert_eq!(value_of(&attribs, WGL_CONTEXT_MINOR_VERSION_ARB), Some(5));
        assert_eq!(
            value_of(&attribs, WGL_CONTEXT_PROFILE_MASK_ARB),
            Some(WGL_CONTEXT_CORE_PROFILE_BIT_ARB)
        );
        assert_eq!(attribs.last(), Some(&0));
    }

    #[test]
    fn zero_version_leaves_choice_to_driver() {
        let attribs = ContextRequest::default().with_version(0, 0).attributes();

        assert_eq!(value_of(&attribs, WGL_CONTEXT_MAJOR_VERSION_ARB), None);
        assert_eq!(value_of(&attribs, WGL_CONTEXT_MINOR_VERSION_ARB), None);
        assert!(value_of(&attribs, WGL_CONTEXT_PROFILE_MASK_ARB).is_some());
    }

    #[test]
    fn core_zero_version_leaves_choice_to_driver() {
        let from_core = ContextRequest::core(0, 0);
        let built = ContextRequest {
            version: Some(GlVersion { major: 0, minor: 0 }),
            ..ContextRequest::default()
        };

        assert_eq!(from_core.version, None);
        for attribs in [from_core.attributes(), built.attributes()] {
            assert_eq!(value_of(&attribs, WGL_CONTEXT_MAJOR_VERSION_ARB), None);
            assert_eq!(value_of(&attribs, WGL_CONTEXT_MINOR_VERSION_ARB), None);
            assert_eq!(
                value_of(&attribs, WGL_CONTEXT_PROFILE_MASK_ARB),
                Some(WGL_CONTEXT_CORE_PROFILE_BIT_ARB)
            );
        }
    }

    #[test]
    fn debug_flag_sets_context_flags() {
        let attribs = ContextRequest::core(3, 3).with_debug(true).attributes();
        let flags = value_of(&attribs, WGL_CONTEXT_FLAGS_ARB).unwrap_or_default();

        assert_ne!(flags & WGL_CONTEXT_DEBUG_BIT_ARB, 0);
    }

    #[test]
    fn desired_format_accepts_richer_formats() {
        let desired = PixelFormat::desired();
        let chosen = PixelFormat {
            depth_bits: 24,
            ..desired
        };
        let single_buffered = PixelFormat {
            flags: PixelFormatFlags::DRAW_TO_WINDOW | PixelFormatFlags::SUPPORT_OPENGL,
            ..desired
        };

        assert!(chosen.satisfies(&desired));
        assert!(!single_buffered.satisfies(&desired));
    }
}
