#[cfg(target_os = "windows")]
fn main() {
    use simplegl::{
        ContextRequest, Message, Native, Response, WindowDescriptor, gl, handle_close, message,
        toggle_fullscreen,
    };
    use std::{cell::Cell, mem::zeroed, ptr::null_mut, rc::Rc};
    use windows_sys::Win32::UI::WindowsAndMessaging::{
        DispatchMessageW, MSG, PM_REMOVE, PeekMessageW, TranslateMessage,
    };

    const VK_F11: usize = 0x7A;
    const GL_COLOR_BUFFER_BIT: u32 = 0x4000;

    env_logger::init();

    let mut platform = Native::new();
    let mut descriptor = WindowDescriptor::new("simplegl - window").with_size((800, 600));

    let toggle = Rc::new(Cell::new(false));
    let callback = handle_close(descriptor.running.clone(), {
        let toggle = toggle.clone();
        move |msg: Message| {
            if msg.code == message::KEYDOWN && msg.param_a == VK_F11 {
                toggle.set(true);
                return Response::Handled(0);
            }

            Response::Default
        }
    });

    let outcome = simplegl::open_with(
        &mut platform,
        &mut descriptor,
        None,
        callback,
        &ContextRequest::core(3, 3),
    )
    .unwrap();
    println!("context: {:?}", outcome.kind);

    let clear_color = descriptor.extensions.get::<gl::ClearColor>().unwrap();
    let clear = descriptor.extensions.get::<gl::Clear>().unwrap();

    let mut frame = 0u32;
    while descriptor.is_running() {
        unsafe {
            let mut msg: MSG = zeroed();
            while PeekMessageW(&mut msg, null_mut(), 0, 0, PM_REMOVE) != 0 {
                TranslateMessage(&msg);
                DispatchMessageW(&msg);
            }
        }

        if toggle.replace(false) {
            if let Err(e) = toggle_fullscreen(&mut platform, &mut descriptor) {
                println!("fullscreen: {e}");
            }
        }

        let t = (frame % 240) as f32 / 240.0;
        unsafe {
            (clear_color)(t, 0.3, 1.0 - t, 1.0);
            (clear)(GL_COLOR_BUFFER_BIT);
        }
        platform.swap_buffers(&descriptor);

        frame = frame.wrapping_add(1);
    }
}

#[cfg(not(target_os = "windows"))]
fn main() {
    println!("this demo needs Windows");
}
