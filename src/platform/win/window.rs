use super::util::{
    last_error, point_from_win, point_to_win, rect_from_win, rect_to_win, to_widestring,
};
use crate::{
    EventCallback, ExtendedStyle, Message, Placement, Rect, Response, Size, WindowHandle,
    WindowStyle,
    platform::{ClassRegistration, WindowClass, WindowParams},
};
use std::{
    cell::RefCell,
    mem::{size_of, zeroed},
    ptr::{null, null_mut},
    rc::Rc,
};
use windows_sys::Win32::{
    Foundation::{ERROR_CLASS_ALREADY_EXISTS, HINSTANCE, HWND, LPARAM, LRESULT, RECT, WPARAM},
    Graphics::Gdi::{GetMonitorInfoW, MONITOR_DEFAULTTOPRIMARY, MONITORINFO, MonitorFromWindow},
    UI::WindowsAndMessaging::{
        AdjustWindowRectEx, CW_USEDEFAULT, CreateWindowExW, DefWindowProcW, GWL_STYLE,
        GWLP_USERDATA, GetClientRect, GetWindowLongPtrW, GetWindowLongW, GetWindowPlacement,
        GetWindowRect, IDC_ARROW, IDI_APPLICATION, LoadCursorW, LoadIconW, RegisterClassW,
        SWP_FRAMECHANGED, SWP_NOMOVE, SWP_NOOWNERZORDER, SWP_NOSIZE, SWP_NOZORDER,
        SetWindowLongPtrW, SetWindowLongW, SetWindowPlacement, SetWindowPos, WINDOWPLACEMENT,
        WM_NCDESTROY, WNDCLASSW,
    },
};

/// What `GWLP_USERDATA` points at for windows created here. Released on `WM_NCDESTROY`.
type WindowState = RefCell<EventCallback>;

pub unsafe fn register_class(
    instance: HINSTANCE,
    class: &WindowClass,
) -> Result<ClassRegistration, u32> {
    unsafe {
        let class_name = to_widestring(&class.name);

        let atom = RegisterClassW(&WNDCLASSW {
            style: class.style.bits(),
            lpfnWndProc: Some(wnd_proc),
            cbClsExtra: 0,
            cbWndExtra: 0,
            hInstance: instance,
            hIcon: LoadIconW(null_mut(), IDI_APPLICATION),
            hCursor: LoadCursorW(null_mut(), IDC_ARROW),
            hbrBackground: null_mut(),
            lpszMenuName: null(),
            lpszClassName: class_name.as_ptr(),
        });

        if atom != 0 {
            return Ok(ClassRegistration::Registered);
        }

        match last_error() {
            ERROR_CLASS_ALREADY_EXISTS => Ok(ClassRegistration::AlreadyRegistered),
            code => Err(code),
        }
    }
}

pub unsafe fn adjust_window_rect(
    client: Size,
    style: WindowStyle,
    ex_style: ExtendedStyle,
) -> Option<Rect> {
    unsafe {
        let mut rect = RECT {
            left: 0,
            top: 0,
            right: i32::try_from(client.width).ok()?,
            bottom: i32::try_from(client.height).ok()?,
        };

        if AdjustWindowRectEx(&mut rect, style.bits(), 0, ex_style.bits()) != 0 {
            Some(rect_from_win(rect))
        } else {
            None
        }
    }
}

pub unsafe fn create_window(params: &WindowParams, callback: EventCallback) -> Result<HWND, u32> {
    unsafe {
        let class_name = to_widestring(params.class_name);
        let title = to_widestring(params.title);

        let hwnd = CreateWindowExW(
            params.ex_style.bits(),
            class_name.as_ptr(),
            title.as_ptr(),
            params.style.bits(),
            CW_USEDEFAULT,
            CW_USEDEFAULT,
            params.size.width as i32,
            params.size.height as i32,
            null_mut(),
            null_mut(),
            params.instance.as_raw(),
            null(),
        );

        if hwnd.is_null() {
            return Err(last_error());
        }

        let state: Rc<WindowState> = Rc::new(RefCell::new(callback));
        SetWindowLongPtrW(hwnd, GWLP_USERDATA, Rc::into_raw(state) as _);

        Ok(hwnd)
    }
}

pub unsafe fn client_size(hwnd: HWND) -> Option<Size> {
    unsafe {
        let mut rect: RECT = zeroed();
        if GetClientRect(hwnd, &mut rect) == 0 {
            return None;
        }

        let rect = rect_from_win(rect);
        Some(Size {
            width: rect.width().max(0) as u32,
            height: rect.height().max(0) as u32,
        })
    }
}

pub unsafe fn window_rect(hwnd: HWND) -> Option<Rect> {
    unsafe {
        let mut rect: RECT = zeroed();
        if GetWindowRect(hwnd, &mut rect) != 0 {
            Some(rect_from_win(rect))
        } else {
            None
        }
    }
}

pub unsafe fn window_style(hwnd: HWND) -> WindowStyle {
    unsafe { WindowStyle::from_bits_retain(GetWindowLongW(hwnd, GWL_STYLE) as u32) }
}

pub unsafe fn set_window_style(hwnd: HWND, style: WindowStyle) {
    unsafe {
        SetWindowLongW(hwnd, GWL_STYLE, style.bits() as i32);
    }
}

pub unsafe fn window_placement(hwnd: HWND) -> Option<Placement> {
    unsafe {
        let mut placement = WINDOWPLACEMENT {
            length: size_of::<WINDOWPLACEMENT>() as u32,
            ..zeroed()
        };

        if GetWindowPlacement(hwnd, &mut placement) == 0 {
            return None;
        }

        Some(Placement {
            flags: placement.flags as u32,
            show_command: placement.showCmd as u32,
            min_position: point_from_win(placement.ptMinPosition),
            max_position: point_from_win(placement.ptMaxPosition),
            normal_position: rect_from_win(placement.rcNormalPosition),
        })
    }
}

pub unsafe fn set_window_placement(hwnd: HWND, placement: &Placement) -> bool {
    unsafe {
        let placement = WINDOWPLACEMENT {
            length: size_of::<WINDOWPLACEMENT>() as u32,
            flags: placement.flags as _,
            showCmd: placement.show_command as _,
            ptMinPosition: point_to_win(placement.min_position),
            ptMaxPosition: point_to_win(placement.max_position),
            rcNormalPosition: rect_to_win(placement.normal_position),
        };

        SetWindowPlacement(hwnd, &placement) != 0
    }
}

pub unsafe fn monitor_rect(hwnd: HWND) -> Option<Rect> {
    unsafe {
        let monitor = MonitorFromWindow(hwnd, MONITOR_DEFAULTTOPRIMARY);
        if monitor.is_null() {
            return None;
        }

        let mut info = MONITORINFO {
            cbSize: size_of::<MONITORINFO>() as u32,
            ..zeroed()
        };

        if GetMonitorInfoW(monitor, &mut info) != 0 {
            Some(rect_from_win(info.rcMonitor))
        } else {
            None
        }
    }
}

pub unsafe fn set_window_rect(hwnd: HWND, rect: Rect) -> bool {
    unsafe {
        // null insert-after is HWND_TOP
        SetWindowPos(
            hwnd,
            null_mut(),
            rect.left,
            rect.top,
            rect.width(),
            rect.height(),
            SWP_NOOWNERZORDER | SWP_FRAMECHANGED,
        ) != 0
    }
}

pub unsafe fn refresh_frame(hwnd: HWND) -> bool {
    unsafe {
        SetWindowPos(
            hwnd,
            null_mut(),
            0,
            0,
            0,
            0,
            SWP_NOMOVE | SWP_NOSIZE | SWP_NOZORDER | SWP_NOOWNERZORDER | SWP_FRAMECHANGED,
        ) != 0
    }
}

unsafe extern "system" fn wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    unsafe {
        let state_ptr = GetWindowLongPtrW(hwnd, GWLP_USERDATA) as *const WindowState;
        if state_ptr.is_null() {
            return DefWindowProcW(hwnd, msg, wparam, lparam);
        }

        if msg == WM_NCDESTROY {
            SetWindowLongPtrW(hwnd, GWLP_USERDATA, 0);
            drop(Rc::from_raw(state_ptr));
            return DefWindowProcW(hwnd, msg, wparam, lparam);
        }

        let Some(window) = WindowHandle::from_raw(hwnd) else {
            return DefWindowProcW(hwnd, msg, wparam, lparam);
        };

        // keep the state alive while the callback runs, it may destroy its own window
        Rc::increment_strong_count(state_ptr);
        let state = Rc::from_raw(state_ptr);

        // messages sent from inside the callback go straight to the default procedure
        let Ok(mut callback) = state.try_borrow_mut() else {
            return DefWindowProcW(hwnd, msg, wparam, lparam);
        };

        let response = (*callback)(Message {
            window,
            code: msg,
            param_a: wparam,
            param_b: lparam,
        });
        drop(callback);

        match response {
            Response::Handled(result) => result,
            Response::Default => DefWindowProcW(hwnd, msg, wparam, lparam),
        }
    }
}
