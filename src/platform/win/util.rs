use std::{ffi::OsString, os::windows::ffi::OsStrExt, ptr::null_mut};
use windows_sys::Win32::{
    Foundation::{GetLastError, HMODULE, POINT, RECT},
    System::LibraryLoader::{
        GET_MODULE_HANDLE_EX_FLAG_FROM_ADDRESS, GET_MODULE_HANDLE_EX_FLAG_UNCHANGED_REFCOUNT,
        GetModuleHandleExW,
    },
};

use crate::{Point, Rect};

pub fn to_widestring(str: &str) -> Vec<u16> {
    OsString::from(str).encode_wide().chain([0]).collect()
}

pub fn last_error() -> u32 {
    unsafe { GetLastError() }
}

/// The module this code was linked into, which is not the executable when built as a library.
pub fn hinstance() -> HMODULE {
    unsafe {
        let mut module = null_mut();
        let found = GetModuleHandleExW(
            GET_MODULE_HANDLE_EX_FLAG_FROM_ADDRESS | GET_MODULE_HANDLE_EX_FLAG_UNCHANGED_REFCOUNT,
            hinstance as *const () as *const u16,
            &mut module,
        );

        if found != 0 { module } else { null_mut() }
    }
}

pub fn rect_from_win(rect: RECT) -> Rect {
    Rect {
        left: rect.left,
        top: rect.top,
        right: rect.right,
        bottom: rect.bottom,
    }
}

pub fn rect_to_win(rect: Rect) -> RECT {
    RECT {
        left: rect.left,
        top: rect.top,
        right: rect.right,
        bottom: rect.bottom,
    }
}

pub fn point_from_win(point: POINT) -> Point {
    Point {
        x: point.x,
        y: point.y,
    }
}

pub fn point_to_win(point: Point) -> POINT {
    POINT {
        x: point.x,
        y: point.y,
    }
}
