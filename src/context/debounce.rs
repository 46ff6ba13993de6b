use std::time::{Duration, Instant};

/// Holds the latest pushed value until it has been quiet for `delay`.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: None }
    }

    /// Replace any pending value and restart the quiet period.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.delay));
    }

    /// The pending value, once its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let ready = self.pending.as_ref().is_some_and(|(_, deadline)| now >= *deadline);
        if ready { self.pending.take().map(|(value, _)| value) } else { None }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_after_quiet_period() {
        let start = Instant::now();
        let mut d = Debouncer::new(Duration::from_millis(300));
        d.push("a", start);
        assert_eq!(d.poll(start + Duration::from_millis(299)), None);
        assert_eq!(d.poll(start + Duration::from_millis(300)), Some("a"));
        assert_eq!(d.poll(start + Duration::from_secs(5)), None);
        assert!(!d.is_pending());
    }

    #[test]
    fn each_push_restarts_the_timer_and_keeps_latest() {
        let start = Instant::now();
        let mut d = Debouncer::new(Duration::from_millis(300));
        d.push("s", start);
        d.push("sr", start + Duration::from_millis(200));
        assert_eq!(d.poll(start + Duration::from_millis(400)), None);
        assert_eq!(d.poll(start + Duration::from_millis(500)), Some("sr"));
    }

    #[test]
    fn cancel_drops_pending() {
        let start = Instant::now();
        let mut d = Debouncer::new(Duration::ZERO);
        d.push(1, start);
        d.cancel();
        assert_eq!(d.poll(start), None);
    }
}
