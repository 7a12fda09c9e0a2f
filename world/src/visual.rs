//! Presentation state attached to every drawable entity.

/// Frame counter advancing one animation frame every `refresh` ticks.
///
/// The clock does not know how many frames an animation has; the frame
/// index wraps once the renderer maps it onto its frame list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AnimationClock {
    refresh: u32,
    sub_frame: u32,
    frame: u32,
}

impl AnimationClock {
    /// Creates a clock starting at the first frame.
    #[must_use]
    pub const fn new(refresh: u32) -> Self {
        Self {
            refresh: if refresh == 0 { 1 } else { refresh },
            sub_frame: 0,
            frame: 0,
        }
    }

    /// Advances the clock by one tick, returning `true` when the frame changed.
    pub fn tick(&mut self) -> bool {
        if self.sub_frame + 1 >= self.refresh {
            self.sub_frame = 0;
            self.frame = self.frame.wrapping_add(1);
            true
        } else {
            self.sub_frame += 1;
            false
        }
    }

    /// Rewinds to the first frame, used when an animation set is swapped.
    pub fn restart(&mut self) {
        self.sub_frame = 0;
        self.frame = 0;
    }

    /// Frames elapsed since the last restart.
    #[must_use]
    pub const fn frame(&self) -> u32 {
        self.frame
    }
}

/// How an entity's image changes over time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Visual {
    /// A single image.
    Static,
    /// A looping frame sequence.
    Animated(AnimationClock),
}

impl Visual {
    /// Advances the animation, if any.
    pub(crate) fn tick(&mut self) {
        if let Self::Animated(clock) = self {
            let _ = clock.tick();
        }
    }

    /// Rewinds the animation, if any.
    pub(crate) fn restart(&mut self) {
        if let Self::Animated(clock) = self {
            clock.restart();
        }
    }

    /// Current animation clock, if the visual is animated.
    #[must_use]
    pub const fn clock(&self) -> Option<&AnimationClock> {
        match self {
            Self::Static => None,
            Self::Animated(clock) => Some(clock),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_changes_frame_every_refresh_ticks() {
        let mut clock = AnimationClock::new(3);
        let changes: Vec<bool> = (0..6).map(|_| clock.tick()).collect();
        assert_eq!(changes, vec![false, false, true, false, false, true]);
        assert_eq!(clock.frame(), 2);
    }

    #[test]
    fn restart_rewinds_to_first_frame() {
        let mut clock = AnimationClock::new(1);
        let _ = clock.tick();
        let _ = clock.tick();
        clock.restart();
        assert_eq!(clock.frame(), 0);
        assert!(clock.tick());
    }
}
