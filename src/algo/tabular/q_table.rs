use std::{fmt::Debug, marker::PhantomData};

use log::{debug, info, trace};
use rand::Rng;

use crate::{
    assert_interval,
    decay::{self, Decay},
    env::{DiscreteActionSpace, DiscreteStateSpace},
    error::Result,
    exploration::{Choice, EpsilonGreedy},
    memory::{Exp, Termination, Trajectory},
};

/// A dense table of action values, one row of `num_actions` entries per state
#[derive(Debug, Clone, PartialEq)]
pub struct QTable {
    values: Vec<f32>,
    num_actions: usize,
}

impl QTable {
    /// Create a table with every entry set to `0.0`
    pub fn new(num_states: usize, num_actions: usize) -> Self {
        assert!(num_actions > 0, "A Q-table needs at least one action.");
        Self {
            values: vec![0.0; num_states * num_actions],
            num_actions,
        }
    }

    pub fn num_states(&self) -> usize {
        self.values.len() / self.num_actions
    }

    pub fn num_actions(&self) -> usize {
        self.num_actions
    }

    /// The action values of one state
    pub fn row(&self, state: usize) -> &[f32] {
        let start = state * self.num_actions;
        &self.values[start..start + self.num_actions]
    }

    pub fn get(&self, state: usize, action: usize) -> f32 {
        self.row(state)[action]
    }

    pub fn set(&mut self, state: usize, action: usize, value: f32) {
        self.values[state * self.num_actions + action] = value;
    }

    /// Highest action value of a state
    pub fn max(&self, state: usize) -> f32 {
        self.row(state).iter().copied().fold(f32::NEG_INFINITY, f32::max)
    }

    /// Index of the highest action value of a state
    ///
    /// Ties go to the lowest index.
    pub fn argmax(&self, state: usize) -> usize {
        self.row(state)
            .iter()
            .enumerate()
            .fold((0, f32::NEG_INFINITY), |best, (i, &q)| {
                if q > best.1 {
                    (i, q)
                } else {
                    best
                }
            })
            .0
    }
}

/// Configuration for the [`QTableAgent`]
#[derive(Debug, Clone)]
pub struct QTableAgentConfig<D: Decay = decay::Exponential> {
    /// Exploration policy used while training
    ///
    /// **Default**: ε(t) = 0.4 * e<sup>-0.000016t</sup>
    pub exploration: EpsilonGreedy<D>,
    /// Learning rate, `1.0` replaces the old estimate with the bootstrapped target
    ///
    /// **Default**: `1.0`
    pub alpha: f32,
    /// Discount factor
    ///
    /// **Default**: `0.9`
    pub gamma: f32,
}

impl Default for QTableAgentConfig {
    fn default() -> Self {
        Self {
            exploration: EpsilonGreedy::new(
                decay::Exponential::new(1.6e-5, 0.4, 0.0).expect("decay parameters are valid"),
            ),
            alpha: 1.0,
            gamma: 0.9,
        }
    }
}

/// Episode budget for a full training and evaluation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingConfig {
    /// **Default**: `50_000`
    pub total_episodes: u32,
    /// Steps after which an episode is cut off
    ///
    /// **Default**: `99`
    pub max_steps: usize,
    /// Greedy replays after training
    ///
    /// **Default**: `5`
    pub eval_episodes: usize,
    /// Log progress every this many episodes
    ///
    /// **Default**: `5_000`
    pub report_interval: u32,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            total_episodes: 50_000,
            max_steps: 99,
            eval_episodes: 5,
            report_interval: 5_000,
        }
    }
}

/// Statistics of one finished training episode
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeSummary {
    pub episode: u32,
    pub epsilon: f32,
    pub steps: usize,
    pub reward: f32,
    pub termination: Termination,
}

/// A Q-learning agent that learns its environment in a dense table
///
/// The update applied after every transition is
///
/// Q(s,a) ← Q(s,a) + α(r + γ max<sub>a'</sub> Q(s',a') - Q(s,a))
///
/// ### Generics
/// - `E` - The [`Environment`](crate::env::Environment) in which the agent will learn
///     - The environment's state and action spaces must both be discrete because a Q value will be recorded for each state action pair
///     - Actions convert into their column of the table, so `env.actions()[i].into()` must equal `i`
/// - `D` - The [`Decay`] schedule of the exploration rate
pub struct QTableAgent<E, D = decay::Exponential>
where
    E: DiscreteActionSpace + DiscreteStateSpace,
    D: Decay,
{
    q_table: QTable,
    exploration: EpsilonGreedy<D>,
    alpha: f32,   // learning rate
    gamma: f32,   // discount factor
    episode: u32, // current episode
    _env: PhantomData<E>,
}

impl<E, D> QTableAgent<E, D>
where
    E: DiscreteActionSpace + DiscreteStateSpace,
    E::State: Debug,
    E::Action: Debug + Into<usize>,
    D: Decay,
{
    /// Initialize a new agent with a zeroed table sized for `env`
    ///
    /// **Panics** if `alpha` or `gamma` is not in the interval `[0,1]`
    pub fn new(env: &E, config: QTableAgentConfig<D>) -> Self {
        assert_interval!(config.alpha, 0.0, 1.0);
        assert_interval!(config.gamma, 0.0, 1.0);
        Self {
            q_table: QTable::new(env.num_states(), env.actions().len()),
            exploration: config.exploration,
            alpha: config.alpha,
            gamma: config.gamma,
            episode: 0,
            _env: PhantomData,
        }
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    /// Number of training episodes run so far
    pub fn episode(&self) -> u32 {
        self.episode
    }

    /// Exploration rate of the next training episode
    pub fn epsilon(&self) -> f32 {
        self.exploration.epsilon(self.episode)
    }

    /// Choose the highest valued action, preferring the first on ties
    pub fn select_action_greedy(&self, env: &E, state: &E::State) -> E::Action {
        env.actions()[self.q_table.argmax(env.state_index(state))]
    }

    /// Exploit with probability `1 - epsilon`, otherwise pick any action uniformly
    pub fn select_action_epsilon_greedy<R: Rng>(
        &self,
        env: &E,
        state: &E::State,
        epsilon: f32,
        rng: &mut R,
    ) -> E::Action {
        match EpsilonGreedy::<D>::choose_with(epsilon, rng) {
            Choice::Exploit => self.select_action_greedy(env, state),
            Choice::Explore => {
                let actions = env.actions();
                actions[rng.gen_range(0..actions.len())]
            }
        }
    }

    /// Learn from a given experience and update the table
    fn learn(&mut self, env: &E, experience: &Exp<E>) {
        let s = env.state_index(&experience.state);
        let a: usize = experience.action.into();
        let max_next_q = self.q_table.max(env.state_index(&experience.next_state));

        let q_value = self.q_table.get(s, a);
        let target = experience.reward + self.gamma * max_next_q;
        self.q_table.set(s, a, q_value + self.alpha * (target - q_value));
    }

    /// Run one training episode of at most `max_steps` transitions
    pub fn go<R: Rng>(&mut self, env: &E, max_steps: usize, rng: &mut R) -> Result<EpisodeSummary> {
        let epsilon = self.epsilon();
        let mut state = env.start();
        let mut reward = 0.0;
        let mut steps = 0;
        let mut termination = Termination::Truncated;

        while steps < max_steps {
            let action = self.select_action_epsilon_greedy(env, &state, epsilon, rng);
            let (next_state, r) = env.step(&state, action)?;
            trace!("{state:?} --{action:?}--> {next_state:?} ({r})");

            let exp = Exp {
                state,
                action,
                next_state,
                reward: r,
            };
            self.learn(env, &exp);

            state = exp.next_state;
            reward += r;
            steps += 1;

            if env.is_terminal(&state) {
                termination = Termination::Terminal;
                break;
            }
        }

        let summary = EpisodeSummary {
            episode: self.episode,
            epsilon,
            steps,
            reward,
            termination,
        };
        self.episode += 1;
        Ok(summary)
    }

    /// Run `config.total_episodes` training episodes
    pub fn train<R: Rng>(&mut self, env: &E, config: &TrainingConfig, rng: &mut R) -> Result<()> {
        for _ in 0..config.total_episodes {
            if config.report_interval > 0 && self.episode % config.report_interval == 0 {
                info!("episode={} epsilon={}", self.episode, self.epsilon());
            }
            self.go(env, config.max_steps, rng)?;
        }
        Ok(())
    }

    /// Replay greedily from the start state without touching the table
    pub fn evaluate(&self, env: &E, max_steps: usize) -> Result<Trajectory<E>> {
        let start = env.start();
        let mut state = start.clone();
        let mut steps: Vec<Exp<E>> = Vec::new();
        let mut termination = Termination::Truncated;

        while steps.len() < max_steps {
            let action = self.select_action_greedy(env, &state);
            let (next_state, reward) = env.step(&state, action)?;
            debug!("move {action:?} leads to {next_state:?}");
            let exp: Exp<E> = Exp {
                state,
                action,
                next_state,
                reward,
            };
            state = exp.next_state.clone();
            steps.push(exp);

            if env.is_terminal(&state) {
                termination = Termination::Terminal;
                break;
            }
        }

        Ok(Trajectory {
            start,
            steps,
            termination,
        })
    }
}
