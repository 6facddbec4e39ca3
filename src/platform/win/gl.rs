use crate::{PixelFormat, PixelFormatFlags, PixelType, ProcAddress};
use std::{
    ffi::{CStr, c_void},
    mem::{size_of, zeroed},
    ptr::null_mut,
    sync::OnceLock,
};
use windows_sys::Win32::{
    Foundation::{HMODULE, HWND},
    Graphics::{
        Gdi::{GetDC, HDC, ReleaseDC},
        OpenGL::{
            ChoosePixelFormat, DescribePixelFormat, GetPixelFormat, HGLRC, PFD_MAIN_PLANE,
            PFD_OVERLAY_PLANE, PFD_TYPE_COLORINDEX, PFD_TYPE_RGBA, PIXELFORMATDESCRIPTOR,
            SetPixelFormat, SwapBuffers, wglCreateContext, wglDeleteContext,
            wglGetCurrentContext, wglGetProcAddress, wglMakeCurrent,
        },
    },
    System::LibraryLoader::{GetProcAddress, LoadLibraryA},
};

type WglCreateContextAttribsARB = unsafe extern "system" fn(HDC, HGLRC, *const i32) -> HGLRC;

/// `opengl32.dll`, loaded once for the GL 1.1 exports `wglGetProcAddress` does not report.
fn gl_library() -> HMODULE {
    static LIBRARY: OnceLock<usize> = OnceLock::new();
    *LIBRARY.get_or_init(|| unsafe { LoadLibraryA(c"opengl32.dll".as_ptr() as *const _) as usize })
        as HMODULE
}

pub unsafe fn acquire_surface(hwnd: HWND) -> Option<HDC> {
    unsafe {
        let hdc = GetDC(hwnd);
        if hdc.is_null() { None } else { Some(hdc) }
    }
}

pub unsafe fn release_surface(hwnd: HWND, hdc: HDC) {
    unsafe {
        ReleaseDC(hwnd, hdc);
    }
}

pub unsafe fn choose_pixel_format(hdc: HDC, desired: &PixelFormat) -> Option<i32> {
    unsafe {
        let index = ChoosePixelFormat(hdc, &descriptor_from_format(desired));
        if index > 0 { Some(index) } else { None }
    }
}

pub unsafe fn describe_pixel_format(hdc: HDC, index: i32) -> Option<PixelFormat> {
    unsafe {
        let mut pfd: PIXELFORMATDESCRIPTOR = zeroed();
        if DescribePixelFormat(
            hdc,
            index,
            size_of::<PIXELFORMATDESCRIPTOR>() as u32,
            &mut pfd,
        ) == 0
        {
            return None;
        }

        Some(format_from_descriptor(&pfd))
    }
}

pub unsafe fn current_pixel_format(hdc: HDC) -> Option<i32> {
    unsafe {
        let index = GetPixelFormat(hdc);
        if index > 0 { Some(index) } else { None }
    }
}

pub unsafe fn set_pixel_format(hdc: HDC, index: i32, format: &PixelFormat) -> bool {
    unsafe { SetPixelFormat(hdc, index, &descriptor_from_format(format)) != 0 }
}

pub unsafe fn create_context(hdc: HDC) -> Option<HGLRC> {
    unsafe {
        let hglrc = wglCreateContext(hdc);
        if hglrc.is_null() { None } else { Some(hglrc) }
    }
}

pub unsafe fn create_context_attribs(
    create: ProcAddress,
    hdc: HDC,
    attribs: &[i32],
) -> Option<HGLRC> {
    unsafe {
        if attribs.last() != Some(&0) {
            return None;
        }

        let create_context_attribs =
            std::mem::transmute::<*mut c_void, WglCreateContextAttribsARB>(create.as_raw());
        let hglrc = (create_context_attribs)(hdc, null_mut(), attribs.as_ptr());
        if hglrc.is_null() { None } else { Some(hglrc) }
    }
}

pub unsafe fn make_current(hdc: HDC, hglrc: HGLRC) -> bool {
    unsafe { wglMakeCurrent(hdc, hglrc) != 0 }
}

pub unsafe fn current_context() -> HGLRC {
    unsafe { wglGetCurrentContext() }
}

pub unsafe fn delete_context(hglrc: HGLRC) -> bool {
    unsafe { wglDeleteContext(hglrc) != 0 }
}

pub unsafe fn proc_address(symbol: &CStr) -> Option<ProcAddress> {
    unsafe {
        wglGetProcAddress(symbol.as_ptr() as *const _)
            .and_then(|ptr| ProcAddress::from_driver(ptr as *const c_void))
            .or_else(|| {
                let library = gl_library();
                if library.is_null() {
                    return None;
                }

                GetProcAddress(library, symbol.as_ptr() as *const _)
                    .and_then(|ptr| ProcAddress::from_driver(ptr as *const c_void))
            })
    }
}

pub unsafe fn swap_buffers(hdc: HDC) -> bool {
    unsafe { SwapBuffers(hdc) != 0 }
}

fn descriptor_from_format(format: &PixelFormat) -> PIXELFORMATDESCRIPTOR {
    PIXELFORMATDESCRIPTOR {
        nSize: size_of::<PIXELFORMATDESCRIPTOR>() as u16,
        nVersion: 1,
        dwFlags: format.flags.bits(),
        iPixelType: match format.pixel_type {
            PixelType::Rgba => PFD_TYPE_RGBA,
            PixelType::ColorIndex => PFD_TYPE_COLORINDEX,
        },
        cColorBits: format.color_bits,
        cAlphaBits: format.alpha_bits,
        cDepthBits: format.depth_bits,
        cStencilBits: format.stencil_bits,
        iLayerType: if format.main_plane {
            PFD_MAIN_PLANE as _
        } else {
            PFD_OVERLAY_PLANE as _
        },
        ..unsafe { zeroed() }
    }
}

fn format_from_descriptor(pfd: &PIXELFORMATDESCRIPTOR) -> PixelFormat {
    PixelFormat {
        flags: PixelFormatFlags::from_bits_truncate(pfd.dwFlags),
        pixel_type: if pfd.iPixelType == PFD_TYPE_COLORINDEX {
            PixelType::ColorIndex
        } else {
            PixelType::Rgba
        },
        color_bits: pfd.cColorBits,
        alpha_bits: pfd.cAlphaBits,
        depth_bits: pfd.cDepthBits,
        stencil_bits: pfd.cStencilBits,
        main_plane: pfd.iLayerType as i32 == PFD_MAIN_PLANE as i32,
    }
}
