use crate::error::Result;

/// Represents a deterministic Markov decision process, defining the dynamics of an
/// environment in which an agent can operate.
///
/// The environment itself holds no episode state: the agent carries the current
/// state and asks for transitions out of it, so one environment can serve any
/// number of training and evaluation episodes.
pub trait Environment {
    /// A representation of the state of the environment to be passed to an agent
    type State: Clone;

    /// A representation of an action that an agent can take to affect the environment
    type Action: Copy;

    /// The state every episode starts from
    fn start(&self) -> Self::State;

    /// Compute the transition for taking `action` in `state`
    ///
    /// **Returns** `(next_state, reward)`, or an error if the transition resolves to
    /// something the environment cannot represent
    fn step(&self, state: &Self::State, action: Self::Action) -> Result<(Self::State, f32)>;

    /// Determine if the state ends an episode
    fn is_terminal(&self, state: &Self::State) -> bool;
}

/// An environment with a fixed, finite set of actions
pub trait DiscreteActionSpace: Environment {
    /// Get every action in index order
    ///
    /// The returned vec must be identical for every state and never empty.
    fn actions(&self) -> Vec<Self::Action>;
}

/// An environment whose states can be laid out densely in a table
pub trait DiscreteStateSpace: Environment {
    /// Total number of states, terminal ones included
    fn num_states(&self) -> usize;

    /// Position of `state` in `0..num_states()`
    fn state_index(&self, state: &Self::State) -> usize;
}
