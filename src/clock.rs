use chrono::Utc;

/// Host time source. Readings never go backwards, even if the wall clock does.
#[derive(Debug, Default)]
pub struct Clock {
    last: u64,
}

impl Clock {
    pub fn new() -> Self {
        Self { last: 0 }
    }

    /// Current unix time in seconds.
    pub fn now(&mut self) -> u64 {
        let wall = Utc::now().timestamp().max(0) as u64;
        self.observe(wall)
    }

    fn observe(&mut self, wall: u64) -> u64 {
        self.last = self.last.max(wall);
        self.last
    }
}
