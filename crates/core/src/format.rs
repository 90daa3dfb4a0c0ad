/// Format a time in seconds for display.
///
/// With `full` the value is split into whole seconds, milliseconds,
/// microseconds and nanoseconds (`1s.234ms.567us.890ns`). Otherwise the
/// largest non-zero unit of the fractional breakdown is printed with three
/// decimals (`1.500s`, `2.500ms`, ...).
pub fn time_to_string(t: f64, full: bool) -> String {
    let sec = t;
    let msec = sec.fract() * 1000.0;
    let usec = msec.fract() * 1000.0;
    let nsec = usec.fract() * 1000.0;

    if full {
        format!(
            "{}s.{:03}ms.{:03}us.{:03}ns",
            sec.trunc() as i64,
            msec.trunc() as i64,
            usec.trunc() as i64,
            nsec.trunc() as i64
        )
    } else if sec >= 1.0 {
        format!("{sec:.3}s")
    } else if msec >= 1.0 {
        format!("{msec:.3}ms")
    } else if usec >= 1.0 {
        format!("{usec:.3}us")
    } else if nsec >= 1.0 {
        format!("{nsec:.3}ns")
    } else {
        format!("{t:.6}s")
    }
}
