use crate::{
    ClassStyle, Error, ExtendedStyle, InstanceHandle, Liveness, Message, Rect, Response, WindowDescriptor,
    WindowHandle, WindowStyle, message,
    platform::{ClassRegistration, Platform, WindowClass, WindowParams},
    toggle_fullscreen,
};

pub const WINDOW_STYLE: WindowStyle = WindowStyle::OVERLAPPED_WINDOW
    .union(WindowStyle::VISIBLE)
    .union(WindowStyle::CLIP_CHILDREN)
    .union(WindowStyle::CLIP_SIBLINGS);

pub const WINDOW_EX_STYLE: ExtendedStyle = ExtendedStyle::WINDOW_EDGE;

/// Creates the native window for `descriptor` with the default window class.
pub fn create_window<P, F>(
    platform: &mut P,
    descriptor: &mut WindowDescriptor,
    instance: InstanceHandle,
    callback: F,
) -> Result<WindowHandle, Error>
where
    P: Platform + ?Sized,
    F: FnMut(Message) -> Response + 'static,
{
    create_window_with_class(
        platform,
        descriptor,
        instance,
        &WindowClass::default(),
        callback,
    )
}

/// Creates the native window for `descriptor` with a caller-supplied window class. The class
/// is always registered with [`ClassStyle::OWN_DC`], the descriptor keeps its surface after setup.
pub fn create_window_with_class<P, F>(
    platform: &mut P,
    descriptor: &mut WindowDescriptor,
    instance: InstanceHandle,
    class: &WindowClass,
    callback: F,
) -> Result<WindowHandle, Error>
where
    P: Platform + ?Sized,
    F: FnMut(Message) -> Response + 'static,
{
    if descriptor.window.is_some() {
        return Err(Error::WindowAlreadyCreated);
    }
    descriptor.validate()?;

    let class = &WindowClass {
        name: class.name.clone(),
        style: class.style | ClassStyle::OWN_DC,
    };
    match platform.register_class(instance, class) {
        Ok(ClassRegistration::Registered) => {
            log::debug!("registered window class {:?}", class.name);
        }
        Ok(ClassRegistration::AlreadyRegistered) => {
            log::debug!("window class {:?} already registered", class.name);
        }
        Err(code) => return Err(Error::WindowClassRegistrationFailed { code }),
    }

    let client = descriptor.size;
    let outer = platform
        .adjust_window_rect(client, WINDOW_STYLE, WINDOW_EX_STYLE)
        .unwrap_or_else(|| {
            log::warn!("could not adjust window rect, using client size as outer size");
            Rect {
                left: 0,
                top: 0,
                right: client.width as i32,
                bottom: client.height as i32,
            }
        });

    let params = WindowParams {
        instance,
        class_name: &class.name,
        title: &descriptor.title,
        style: WINDOW_STYLE,
        ex_style: WINDOW_EX_STYLE,
        size: (outer.width() as u32, outer.height() as u32).into(),
    };

    let window = platform
        .create_window(&params, Box::new(callback))
        .map_err(|code| Error::WindowCreationFailed { code })?;

    descriptor.window = Some(window);
    log::info!(
        "created window {:?} ({}x{}, {:?})",
        window,
        client.width,
        client.height,
        descriptor.title
    );

    if descriptor.fullscreen {
        descriptor.fullscreen = false;
        if let Err(e) = toggle_fullscreen(platform, descriptor) {
            log::warn!("window stays windowed, fullscreen switch failed: {e}");
        }
    }

    Ok(window)
}

/// The smallest conforming callback: stops `running` on close, forwards everything else.
pub fn close_handler(running: Liveness) -> impl FnMut(Message) -> Response + 'static {
    handle_close(running, |_| Response::Default)
}

/// Wraps `callback` so that the close message always stops `running` before the callback sees it.
pub fn handle_close<F>(running: Liveness, mut callback: F) -> impl FnMut(Message) -> Response + 'static
where
    F: FnMut(Message) -> Response + 'static,
{
    move |msg| {
        if msg.code == message::CLOSE {
            running.stop();
            match callback(msg) {
                Response::Default => Response::Handled(0),
                handled => handled,
            }
        } else {
            callback(msg)
        }
    }
}
