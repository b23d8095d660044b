//! Display mode cycling driven by a single debounced key.

/// What the presenter should draw this frame. A `Blank` frame is still
/// cleared, presented, and bridged so the cadence stays uniform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayMode {
    Blank,
    EmissiveCube,
}

impl DisplayMode {
    /// Cyclic successor; the last mode wraps back to `Blank`.
    pub fn next(self) -> Self {
        match self {
            DisplayMode::Blank => DisplayMode::EmissiveCube,
            DisplayMode::EmissiveCube => DisplayMode::Blank,
        }
    }
}

/// Edge-triggered mode cycler for one advance key.
///
/// Tracks the most recent key still held rather than a bare "is pressed" bit,
/// so OS auto-repeat while the key is down fires `next()` only once. Release
/// clears the memory and re-arms the detector. Deliberately minimal: one key,
/// no timeouts, not a general input-focus model.
pub struct ModeSwitch<K> {
    mode: DisplayMode,
    advance_key: K,
    last_key_down: Option<K>,
}

impl<K: Copy + PartialEq> ModeSwitch<K> {
    pub fn new(advance_key: K, initial: DisplayMode) -> Self {
        Self {
            mode: initial,
            advance_key,
            last_key_down: None,
        }
    }

    #[inline]
    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    /// Feed a key-down event. Returns true when the mode advanced.
    pub fn key_down(&mut self, key: K) -> bool {
        let fresh = self.last_key_down != Some(key);
        self.last_key_down = Some(key);
        if fresh && key == self.advance_key {
            self.mode = self.mode.next();
            true
        } else {
            false
        }
    }

    /// Feed a key-up event.
    pub fn key_up(&mut self, key: K) {
        if self.last_key_down == Some(key) {
            self.last_key_down = None;
        }
    }
}
