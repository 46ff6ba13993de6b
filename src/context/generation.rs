/// Monotonic request counter. Only a result tagged with the latest
/// generation may be applied; anything older has been superseded.
#[derive(Debug, Default, Clone, Copy)]
pub struct Generations {
    latest: u64,
}

impl Generations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation, superseding every earlier one.
    pub fn advance(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.latest
    }
}
