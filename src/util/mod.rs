//! util — общие хелперы.

use std::sync::OnceLock;
use std::time::Instant;

/// Monotonic nanoseconds, anchored at the first call in this process.
/// Только для упорядочивания событий внутри одного запуска writer'а.
#[inline]
pub fn now_nanos() -> i64 {
    static EPOCH: OnceLock<Instant> = OnceLock::new();
    let epoch = EPOCH.get_or_init(Instant::now);
    epoch.elapsed().as_nanos().min(i64::MAX as u128) as i64
}

/// Boolean env toggle: "1|true|yes|on" => true.
pub fn env_bool(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(v) => {
            let s = v.trim().to_ascii_lowercase();
            s == "1" || s == "true" || s == "yes" || s == "on"
        }
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_nanos_monotonic() {
        let a = now_nanos();
        let b = now_nanos();
        assert!(b >= a);
    }
}
