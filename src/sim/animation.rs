//! Player animation clip state machine
//!
//! Clip completion is modeled as explicit transitions processed
//! synchronously at the end of each tick, not as asynchronous mixer
//! callbacks: one-shot clips queue a "finished" marker when their timer
//! runs out, and `finish_transitions` walks the table
//! (JumpStart -> JumpLoop, JumpEnd -> Sprint unless airborne again).

use crate::assets::{AnimationKey, AssetCatalog, AssetError, ClipHandle};

/// Drives which clip the avatar shows and when one-shots complete
#[derive(Debug, Clone)]
pub struct AnimationDriver {
    sprint: ClipHandle,
    jump_start: ClipHandle,
    jump_loop: ClipHandle,
    jump_end: ClipHandle,
    current: AnimationKey,
    elapsed: f64,
    completed: bool,
    finished: Vec<AnimationKey>,
}

impl AnimationDriver {
    /// Resolve all state-machine clips up front. Any missing clip is fatal:
    /// the player could not visually represent its state without it.
    pub fn new(catalog: &dyn AssetCatalog) -> Result<Self, AssetError> {
        let fetch = |key| catalog.clip(key).ok_or(AssetError::MissingAnimation(key));
        Ok(Self {
            sprint: fetch(AnimationKey::Sprint)?,
            jump_start: fetch(AnimationKey::JumpStart)?,
            jump_loop: fetch(AnimationKey::JumpLoop)?,
            jump_end: fetch(AnimationKey::JumpEnd)?,
            current: AnimationKey::Sprint,
            elapsed: 0.0,
            completed: false,
            finished: Vec::new(),
        })
    }

    #[inline]
    pub fn current(&self) -> AnimationKey {
        self.current
    }

    /// Switch to a clip and restart it
    pub fn play(&mut self, key: AnimationKey) {
        self.current = key;
        self.elapsed = 0.0;
        self.completed = false;
    }

    fn clip(&self, key: AnimationKey) -> ClipHandle {
        match key {
            AnimationKey::Sprint => self.sprint,
            AnimationKey::JumpStart => self.jump_start,
            AnimationKey::JumpLoop => self.jump_loop,
            AnimationKey::JumpEnd => self.jump_end,
        }
    }

    fn is_one_shot(key: AnimationKey) -> bool {
        matches!(key, AnimationKey::JumpStart | AnimationKey::JumpEnd)
    }

    /// Advance clip playback. The run-cycle clips scale with the
    /// treadmill-coupled multiplier so the avatar keeps pace visually.
    pub fn update(&mut self, dt: f64, run_speed_multiplier: f64) {
        let timescale = match self.current {
            AnimationKey::Sprint | AnimationKey::JumpEnd => run_speed_multiplier,
            _ => 1.0,
        };
        self.elapsed += dt * timescale;

        if Self::is_one_shot(self.current)
            && !self.completed
            && self.elapsed >= self.clip(self.current).duration
        {
            // Clamp when finished; the transition table decides what is next.
            self.elapsed = self.clip(self.current).duration;
            self.completed = true;
            self.finished.push(self.current);
        }
    }

    /// Process queued clip completions against the transition table.
    /// Called once at the end of each tick.
    pub fn finish_transitions(&mut self, jumping: bool) {
        let finished = std::mem::take(&mut self.finished);
        for key in finished {
            match key {
                AnimationKey::JumpStart => self.play(AnimationKey::JumpLoop),
                AnimationKey::JumpEnd => {
                    if !jumping {
                        self.play(AnimationKey::Sprint);
                    }
                }
                _ => {}
            }
        }
    }
}
