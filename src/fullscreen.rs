use crate::{Error, WindowDescriptor, WindowStyle, platform::Platform};

/// Switches between a framed window and a borderless one covering its monitor.
///
/// Every query happens before the first change, so a failed query leaves the window as it was.
pub fn toggle_fullscreen<P: Platform + ?Sized>(
    platform: &mut P,
    descriptor: &mut WindowDescriptor,
) -> Result<(), Error> {
    let window = descriptor.window.ok_or(Error::WindowNotCreated)?;
    let style = platform.window_style(window);

    if descriptor.fullscreen {
        let placement = descriptor.placement.ok_or(Error::PlacementRestoreFailed)?;

        platform.set_window_style(window, style | WindowStyle::OVERLAPPED_WINDOW);
        if !platform.set_window_placement(window, &placement) {
            platform.set_window_style(window, style);
            return Err(Error::PlacementRestoreFailed);
        }
        platform.refresh_frame(window);

        descriptor.fullscreen = false;
        log::debug!("{window:?} left fullscreen");
    } else {
        let placement = platform
            .window_placement(window)
            .ok_or(Error::PlacementQueryFailed)?;
        let monitor = platform
            .monitor_rect(window)
            .ok_or(Error::MonitorQueryFailed)?;

        platform.set_window_style(window, style.difference(WindowStyle::OVERLAPPED_WINDOW));
        if !platform.set_window_rect(window, monitor) {
            platform.set_window_style(window, style);
            return Err(Error::WindowResizeFailed);
        }

        descriptor.placement = Some(placement);
        descriptor.fullscreen = true;
        log::debug!("{window:?} entered fullscreen on {monitor:?}");
    }

    Ok(())
}
