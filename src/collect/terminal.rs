/// Size of the controlling terminal. The statusline's stdio are pipes, so
/// ask `/dev/tty` directly.
#[cfg(unix)]
fn tty_width() -> Option<usize> {
    use std::os::fd::AsRawFd;

    let tty = std::fs::File::open("/dev/tty").ok()?;
    let mut size = libc::winsize {
        ws_row: 0,
        ws_col: 0,
        ws_xpixel: 0,
        ws_ypixel: 0,
    };
    // SAFETY: the fd stays open for the duration of the call and `size` is
    // a valid, writable winsize for TIOCGWINSZ to fill in.
    let rc = unsafe { libc::ioctl(tty.as_raw_fd(), libc::TIOCGWINSZ, &mut size) };
    if rc != 0 {
        tracing::debug!("TIOCGWINSZ failed: {}", std::io::Error::last_os_error());
        return None;
    }
    (size.ws_col > 0).then_some(usize::from(size.ws_col))
}

#[cfg(not(unix))]
fn tty_width() -> Option<usize> {
    None
}

fn parse_columns(value: Option<&str>) -> Option<usize> {
    value?.trim().parse::<usize>().ok().filter(|w| *w > 0)
}

/// Terminal width: the explicit override, then the controlling terminal,
/// then `$COLUMNS`. `None` when nothing is known.
pub fn detect_width(override_width: Option<usize>) -> Option<usize> {
    override_width
        .or_else(tty_width)
        .or_else(|| parse_columns(std::env::var("COLUMNS").ok().as_deref()))
}
