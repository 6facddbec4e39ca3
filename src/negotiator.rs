use crate::{
    ContextHandle, ContextKind, ContextOutcome, ContextRequest, Error, PixelFormat,
    SurfaceHandle, WindowDescriptor, platform::Platform,
};
use std::ffi::CStr;

pub const CREATE_CONTEXT_ATTRIBS: &CStr = c"wglCreateContextAttribsARB";

/// Gives the descriptor's window a current rendering context.
///
/// Sequence: surface, pixel format, baseline context made current, upgrade through
/// `wglCreateContextAttribsARB` when the driver has it, entry point resolution, surface release.
/// On error the descriptor keeps no surface or context and nothing created here stays alive.
pub fn setup_rendering_context<P: Platform + ?Sized>(
    platform: &mut P,
    descriptor: &mut WindowDescriptor,
    request: &ContextRequest,
) -> Result<ContextOutcome, Error> {
    if descriptor.context.is_some() || descriptor.surface.is_some() {
        return Err(Error::ContextAlreadyEstablished);
    }
    let window = descriptor.window.ok_or(Error::WindowNotCreated)?;

    let surface = platform
        .acquire_surface(window)
        .ok_or(Error::SurfaceAcquisitionFailed)?;
    log::debug!("acquired surface {surface:?} for {window:?}");

    let (context, kind) = match negotiate(platform, surface, request) {
        Ok(negotiated) => negotiated,
        Err(e) => {
            platform.release_surface(window, surface);
            return Err(e);
        }
    };

    let extensions = match descriptor.extensions.resolve_all(platform) {
        Ok(resolution) => resolution,
        Err(e) => {
            descriptor.extensions.clear();
            platform.make_current(None, None);
            platform.delete_context(context);
            platform.release_surface(window, surface);
            return Err(e);
        }
    };

    // own-DC surfaces stay valid after release
    platform.release_surface(window, surface);

    descriptor.surface = Some(surface);
    descriptor.context = Some(context);
    log::info!("rendering context {context:?} ready ({kind:?})");

    Ok(ContextOutcome { kind, extensions })
}

/// True when the descriptor's context is the one current on the calling thread.
pub fn is_context_current<P: Platform + ?Sized>(
    platform: &P,
    descriptor: &WindowDescriptor,
) -> bool {
    descriptor.context.is_some() && platform.current_context() == descriptor.context
}

fn negotiate<P: Platform + ?Sized>(
    platform: &mut P,
    surface: SurfaceHandle,
    request: &ContextRequest,
) -> Result<(ContextHandle, ContextKind), Error> {
    apply_pixel_format(platform, surface)?;

    let baseline = platform
        .create_context(surface)
        .ok_or(Error::BaselineContextCreationFailed)?;
    if !platform.make_current(Some(surface), Some(baseline)) {
        platform.delete_context(baseline);
        return Err(Error::MakeCurrentFailed);
    }
    log::debug!("baseline context {baseline:?} current");

    let Some(create) = platform.proc_address(CREATE_CONTEXT_ATTRIBS) else {
        log::warn!("wglCreateContextAttribsARB unavailable, keeping the legacy context");
        return Ok((baseline, ContextKind::LegacyOnly));
    };

    let attribs = request.attributes();
    let Some(upgraded) = platform.create_context_attribs(create, surface, &attribs) else {
        log::warn!("driver refused {request:?}, keeping the legacy context");
        return Ok((baseline, ContextKind::LegacyOnly));
    };

    if !platform.make_current(Some(surface), Some(upgraded)) {
        log::warn!("upgraded context {upgraded:?} cannot be made current, keeping the legacy one");
        platform.delete_context(upgraded);

        if !platform.make_current(Some(surface), Some(baseline)) {
            platform.make_current(None, None);
            platform.delete_context(baseline);
            return Err(Error::MakeCurrentFailed);
        }

        return Ok((baseline, ContextKind::LegacyOnly));
    }

    if !platform.delete_context(baseline) {
        log::warn!("failed to delete baseline context {baseline:?}");
    }
    log::debug!("upgraded to {upgraded:?} with {request:?}");

    Ok((upgraded, ContextKind::Upgraded))
}

fn apply_pixel_format<P: Platform + ?Sized>(
    platform: &mut P,
    surface: SurfaceHandle,
) -> Result<(), Error> {
    if let Some(index) = platform.current_pixel_format(surface) {
        log::debug!("surface already has pixel format {index}");
        return Ok(());
    }

    let desired = PixelFormat::desired();
    let index = platform
        .choose_pixel_format(surface, &desired)
        .filter(|&index| index > 0)
        .ok_or(Error::FormatSelectionFailed)?;
    let format = platform
        .describe_pixel_format(surface, index)
        .ok_or(Error::FormatSelectionFailed)?;

    if !format.satisfies(&desired) {
        log::warn!("closest pixel format {index} is below the request: {format:?}");
    }

    if !platform.set_pixel_format(surface, index, &format) {
        return Err(Error::FormatSelectionFailed);
    }

    log::debug!("pixel format {index} applied: {format:?}");
    Ok(())
}
