//! Button edge detection
//!
//! The sim wants one-shot signals (cast, restart) that are true only on the
//! frame a button goes from released to pressed. Hosts feed raw held state
//! through an `EdgeDetector` per button.

/// Rising-edge detector for a single held button
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeDetector {
    was_down: bool,
}

impl EdgeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the current held state; returns true on a press transition
    pub fn update(&mut self, down: bool) -> bool {
        let pressed = down && !self.was_down;
        self.was_down = down;
        pressed
    }
}
