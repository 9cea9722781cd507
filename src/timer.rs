use std::time::{Duration, Instant};

/// Most periods a single `fire` will replay before dropping the backlog.
pub const MAX_CATCH_UP: u32 = 3;

/// Fixed-period timer polled from the event loop.
#[derive(Debug)]
pub struct Interval
{
    period: Duration,
    next_due: Option<Instant>,
}

impl Interval
{
    pub fn new(period: Duration) -> Self
    {
        Self {
            period,
            next_due: None,
        }
    }

    pub fn start(&mut self, now: Instant)
    {
        self.next_due = Some(now + self.period);
    }

    pub fn cancel(&mut self)
    {
        self.next_due = None;
    }

    #[cfg(test)]
    pub fn is_active(&self) -> bool
    {
        self.next_due.is_some()
    }

    /// Number of whole periods that elapsed up to `now`, at most
    /// `MAX_CATCH_UP`. A slow frame re-arms from the last due time; a longer
    /// stall (a suspended process) drops the rest and re-arms from `now`.
    pub fn fire(&mut self, now: Instant) -> u32
    {
        let Some(mut due) = self.next_due else {
            return 0;
        };
        let mut fired = 0;
        while due <= now {
            if fired == MAX_CATCH_UP {
                tracing::debug!(period_ms = self.period.as_millis() as u64, "interval backlog dropped");
                due = now + self.period;
                break;
            }
            fired += 1;
            due += self.period;
        }
        self.next_due = Some(due);
        fired
    }
}

/// Pending one-shot callbacks, each carrying a payload handed back when due.
#[derive(Debug)]
pub struct Timeout<T>
{
    pending: Vec<(Instant, T)>,
}

impl<T> Timeout<T>
{
    pub fn new() -> Self
    {
        Self {
            pending: Vec::new(),
        }
    }

    pub fn schedule(&mut self, now: Instant, delay: Duration, payload: T)
    {
        self.pending.push((now + delay, payload));
    }

    /// Removes and returns every payload whose deadline has passed, oldest first.
    pub fn take_due(&mut self, now: Instant) -> Vec<T>
    {
        let mut due = Vec::new();
        let mut idx = 0;
        while idx < self.pending.len() {
            if self.pending[idx].0 <= now {
                due.push(self.pending.remove(idx).1);
            } else {
                idx += 1;
            }
        }
        due
    }

    pub fn cancel_all(&mut self)
    {
        self.pending.clear();
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool
    {
        self.pending.is_empty()
    }
}

impl<T> Default for Timeout<T>
{
    fn default() -> Self
    {
        Self::new()
    }
}
