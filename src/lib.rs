mod data;
mod extensions;
mod factory;
mod fullscreen;
mod negotiator;
mod opengl;
pub mod platform;

pub use data::*;
pub use extensions::*;
pub use factory::*;
pub use fullscreen::*;
pub use negotiator::*;
pub use opengl::*;

pub use raw_window_handle as rwh_06;

#[cfg(target_os = "windows")]
pub use platform::Native;

use platform::Platform;

/// Creates the descriptor's window and gives it a current rendering context.
///
/// Without an `instance` the module that hosts the calling code is used. The first failing step
/// is returned as is.
pub fn open_with<P, F>(
    platform: &mut P,
    descriptor: &mut WindowDescriptor,
    instance: Option<InstanceHandle>,
    callback: F,
    request: &ContextRequest,
) -> Result<ContextOutcome, Error>
where
    P: Platform + ?Sized,
    F: FnMut(Message) -> Response + 'static,
{
    let instance = match instance {
        Some(instance) => instance,
        None => platform
            .current_instance()
            .ok_or(Error::InstanceUnavailable)?,
    };

    create_window(platform, descriptor, instance, callback)?;
    setup_rendering_context(platform, descriptor, request)
}

/// [`open_with`] on the native backend.
#[cfg(target_os = "windows")]
pub fn open<F>(
    descriptor: &mut WindowDescriptor,
    instance: Option<InstanceHandle>,
    callback: F,
    request: &ContextRequest,
) -> Result<ContextOutcome, Error>
where
    F: FnMut(Message) -> Response + 'static,
{
    open_with(&mut Native::new(), descriptor, instance, callback, request)
}

#[cfg(not(target_os = "windows"))]
pub fn open<F>(
    _descriptor: &mut WindowDescriptor,
    _instance: Option<InstanceHandle>,
    _callback: F,
    _request: &ContextRequest,
) -> Result<ContextOutcome, Error>
where
    F: FnMut(Message) -> Response + 'static,
{
    Err(Error::UnsupportedPlatform)
}
