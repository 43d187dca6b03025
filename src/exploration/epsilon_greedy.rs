use rand::Rng;

use crate::{assert_interval, decay::Decay};

use super::Choice;

/// Epsilon greedy exploration policy with time-decaying epsilon threshold
#[derive(Debug, Clone)]
pub struct EpsilonGreedy<D: Decay> {
    epsilon: D,
}

impl<D: Decay> EpsilonGreedy<D> {
    /// Initialize epsilon greedy policy with a decay strategy
    pub fn new(decay: D) -> Self {
        Self { epsilon: decay }
    }

    /// Exploration rate for the given episode
    pub fn epsilon(&self, episode: u32) -> f32 {
        self.epsilon.evaluate(episode as f32)
    }

    /// Invoke epsilon greedy policy for current episode
    pub fn choose<R: Rng>(&self, episode: u32, rng: &mut R) -> Choice {
        Self::choose_with(self.epsilon(episode), rng)
    }

    /// Exploit with probability `1 - epsilon`, explore otherwise
    ///
    /// **Panics** if `epsilon` is not in the interval `[0,1]`
    pub fn choose_with<R: Rng>(epsilon: f32, rng: &mut R) -> Choice {
        assert_interval!(epsilon, 0.0, 1.0);
        if rng.gen::<f32>() >= epsilon {
            Choice::Exploit
        } else {
            Choice::Explore
        }
    }
}
