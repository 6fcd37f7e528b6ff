//! One-shot reveal sequencing.
//!
//! Every payload change samples the new render and starts an assembly cycle
//! that settles after a fixed delay. Cycles are numbered; a settle timer
//! carries the number of the cycle that created it and is ignored once a
//! newer cycle has started.

use super::sampler::sample_particles;
use crate::config::RevealTiming;
use crate::models::{Bitmap, ParticleField};
use std::time::Duration;

/// Phase of the reveal animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RevealState {
    /// Nothing has been revealed yet
    #[default]
    Idle,
    /// Reading the render back into particles
    Sampling,
    /// Particles are flying in; the real render is hidden
    Assembling,
    /// The real render is shown
    Settled,
}

/// A pending settle, owned by the caller's timer facility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettleTimer {
    /// Cycle this timer belongs to
    pub generation: u64,
    /// Time, on the caller's clock, at which the cycle should settle
    pub due_at: Duration,
}

/// Drives `Idle -> Sampling -> Assembling -> Settled`.
///
/// Time is whatever monotonic clock the caller uses, expressed as a
/// `Duration` since an arbitrary origin.
#[derive(Debug, Clone, Default)]
pub struct RevealOrchestrator {
    state: RevealState,
    generation: u64,
    particles: Option<ParticleField>,
    pending: Option<SettleTimer>,
    timing: RevealTiming,
}

impl RevealOrchestrator {
    /// Create an idle orchestrator
    pub fn new(timing: RevealTiming) -> Self {
        Self {
            timing,
            ..Self::default()
        }
    }

    /// Current phase
    pub fn state(&self) -> RevealState {
        self.state
    }

    /// Number of cycles started so far
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Particles of the running cycle; `None` unless assembling
    pub fn particles(&self) -> Option<&ParticleField> {
        self.particles.as_ref()
    }

    /// Whether particles are currently on screen
    pub fn is_assembling(&self) -> bool {
        self.state == RevealState::Assembling
    }

    /// Whether the real render should be drawn
    pub fn is_render_visible(&self) -> bool {
        !matches!(self.state, RevealState::Sampling | RevealState::Assembling)
    }

    /// The settle timer of the running cycle, if any
    pub fn pending(&self) -> Option<SettleTimer> {
        self.pending
    }

    /// Timing in use
    pub fn timing(&self) -> RevealTiming {
        self.timing
    }

    /// Start a new cycle for a freshly rendered symbol.
    ///
    /// `bitmap` is `None` when the render is not available yet; the call is
    /// then a no-op, as is a bitmap that cannot be sampled. Otherwise any
    /// running cycle is abandoned and the returned timer must be passed to
    /// [`fire`](Self::fire) once `due_at` has passed (or use
    /// [`poll`](Self::poll)).
    pub fn trigger(
        &mut self,
        bitmap: Option<&Bitmap>,
        grid_size: usize,
        display_size: f32,
        now: Duration,
    ) -> Option<SettleTimer> {
        let Some(bitmap) = bitmap else {
            log::debug!("reveal skipped: render not available");
            return None;
        };

        let previous = self.state;
        self.state = RevealState::Sampling;
        let field = match sample_particles(bitmap, grid_size, display_size) {
            Ok(field) => field,
            Err(err) => {
                log::debug!("reveal skipped: {err}");
                self.state = previous;
                return None;
            }
        };

        self.generation += 1;
        let timer = SettleTimer {
            generation: self.generation,
            due_at: now + self.timing.settle_after(),
        };
        log::debug!(
            "reveal cycle {} assembling {} particles, settles at {:?}",
            timer.generation,
            field.len(),
            timer.due_at
        );
        self.particles = Some(field);
        self.pending = Some(timer);
        self.state = RevealState::Assembling;
        Some(timer)
    }

    /// Deliver a settle timer. Returns `true` if it settled the running
    /// cycle; timers from superseded cycles are ignored.
    pub fn fire(&mut self, timer: SettleTimer) -> bool {
        if self.state != RevealState::Assembling || timer.generation != self.generation {
            log::trace!(
                "ignoring stale settle for cycle {} (current {})",
                timer.generation,
                self.generation
            );
            return false;
        }
        self.state = RevealState::Settled;
        self.particles = None;
        self.pending = None;
        log::debug!("reveal cycle {} settled", timer.generation);
        true
    }

    /// Settle the running cycle if its timer is due at `now`.
    pub fn poll(&mut self, now: Duration) -> bool {
        match self.pending {
            Some(timer) if timer.due_at <= now => self.fire(timer),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Rgb;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_starts_idle_with_render_visible() {
        let reveal = RevealOrchestrator::default();
        assert_eq!(reveal.state(), RevealState::Idle);
        assert!(reveal.is_render_visible());
        assert!(reveal.particles().is_none());
    }

    #[test]
    fn test_missing_bitmap_is_a_silent_noop() {
        let mut reveal = RevealOrchestrator::default();
        assert!(reveal.trigger(None, 29, 256.0, ms(0)).is_none());
        assert_eq!(reveal.state(), RevealState::Idle);
        assert_eq!(reveal.generation(), 0);
    }

    #[test]
    fn test_unsampleable_bitmap_keeps_previous_state() {
        let mut reveal = RevealOrchestrator::default();
        let bmp = Bitmap::filled(10, 10, Rgb::BLACK);
        assert!(reveal.trigger(Some(&bmp), 0, 256.0, ms(0)).is_none());
        assert_eq!(reveal.state(), RevealState::Idle);
    }

    #[test]
    fn test_empty_bitmap_is_treated_as_unavailable() {
        let mut reveal = RevealOrchestrator::default();
        let empty = Bitmap::filled(0, 0, Rgb::WHITE);
        assert!(reveal.trigger(Some(&empty), 29, 256.0, ms(0)).is_none());
        assert_eq!(reveal.state(), RevealState::Idle);
        assert_eq!(reveal.generation(), 0);

        // an assembling reveal keeps going
        let bmp = Bitmap::filled(29, 29, Rgb::BLACK);
        let timer = reveal.trigger(Some(&bmp), 29, 290.0, ms(0)).unwrap();
        assert!(reveal.trigger(Some(&empty), 29, 290.0, ms(100)).is_none());
        assert_eq!(reveal.state(), RevealState::Assembling);
        assert!(reveal.fire(timer));
    }

    #[test]
    fn test_settles_after_fixed_delay() {
        let mut reveal = RevealOrchestrator::default();
        let bmp = Bitmap::filled(29, 29, Rgb::BLACK);
        let timer = reveal.trigger(Some(&bmp), 29, 290.0, ms(0)).unwrap();

        assert_eq!(timer.due_at, ms(1400));
        assert!(reveal.is_assembling());
        assert!(!reveal.is_render_visible());
        assert_eq!(reveal.particles().map(|f| f.len()), Some(29 * 29));

        assert!(!reveal.poll(ms(1390)));
        assert!(reveal.poll(ms(1400)));
        assert_eq!(reveal.state(), RevealState::Settled);
        assert!(reveal.particles().is_none());
        assert!(reveal.is_render_visible());
    }

    #[test]
    fn test_firing_twice_settles_once() {
        let mut reveal = RevealOrchestrator::default();
        let bmp = Bitmap::filled(21, 21, Rgb::BLACK);
        let timer = reveal.trigger(Some(&bmp), 21, 210.0, ms(0)).unwrap();
        assert!(reveal.fire(timer));
        assert!(!reveal.fire(timer));
    }

    #[test]
    fn test_settled_is_reentrant() {
        let mut reveal = RevealOrchestrator::default();
        let bmp = Bitmap::filled(21, 21, Rgb::BLACK);
        let first = reveal.trigger(Some(&bmp), 21, 210.0, ms(0)).unwrap();
        reveal.fire(first);
        let second = reveal.trigger(Some(&bmp), 21, 210.0, ms(5000)).unwrap();
        assert_eq!(second.generation, 2);
        assert_eq!(reveal.state(), RevealState::Assembling);
    }
}
