use std::{fmt, iter};

use crate::env::Environment;

/// Represents a single experience or transition in the environment
pub struct Exp<E: Environment> {
    /// The state of the environment before taking the action
    pub state: E::State,
    /// The action taken in the given state
    pub action: E::Action,
    /// The state of the environment after the action is taken
    pub next_state: E::State,
    /// The reward received after taking the action
    pub reward: f32,
}

impl<E: Environment> Clone for Exp<E> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            action: self.action,
            next_state: self.next_state.clone(),
            reward: self.reward,
        }
    }
}

impl<E: Environment> fmt::Debug for Exp<E>
where
    E::State: fmt::Debug,
    E::Action: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Exp")
            .field("state", &self.state)
            .field("action", &self.action)
            .field("next_state", &self.next_state)
            .field("reward", &self.reward)
            .finish()
    }
}

/// How an episode came to an end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The last transition entered a terminal state
    Terminal,
    /// The step budget ran out before a terminal state was reached
    Truncated,
}

/// The ordered [experiences](Exp) of one episode
pub struct Trajectory<E: Environment> {
    /// The state the episode began in
    pub start: E::State,
    pub steps: Vec<Exp<E>>,
    pub termination: Termination,
}

impl<E: Environment> Trajectory<E> {
    /// Sum of the rewards collected along the trajectory
    pub fn total_reward(&self) -> f32 {
        self.steps.iter().map(|e| e.reward).sum()
    }

    /// Every state visited, starting with the initial one
    ///
    /// Never empty: a trajectory with no steps still visited its start state.
    pub fn path(&self) -> Vec<E::State> {
        iter::once(self.start.clone())
            .chain(self.steps.iter().map(|e| e.next_state.clone()))
            .collect()
    }

    pub fn actions(&self) -> Vec<E::Action> {
        self.steps.iter().map(|e| e.action).collect()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl<E: Environment> Clone for Trajectory<E> {
    fn clone(&self) -> Self {
        Self {
            start: self.start.clone(),
            steps: self.steps.clone(),
            termination: self.termination,
        }
    }
}

impl<E: Environment> fmt::Debug for Trajectory<E>
where
    E::State: fmt::Debug,
    E::Action: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trajectory")
            .field("start", &self.start)
            .field("steps", &self.steps)
            .field("termination", &self.termination)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::env::tests::MockEnv;

    use super::*;

    fn create_mock_trajectory() -> Trajectory<MockEnv> {
        let exp1 = Exp {
            state: 2,
            action: true,
            next_state: 3,
            reward: 0.0,
        };
        let exp2 = Exp {
            state: 3,
            action: true,
            next_state: 4,
            reward: 1.0,
        };
        Trajectory {
            start: 2,
            steps: vec![exp1, exp2],
            termination: Termination::Terminal,
        }
    }

    #[test]
    fn trajectory_accessors() {
        let trajectory = create_mock_trajectory();

        assert_eq!(trajectory.len(), 2, "Length counts transitions");
        assert_eq!(trajectory.path(), [2, 3, 4], "Path includes start state");
        assert_eq!(trajectory.actions(), [true, true], "Actions in order");
        assert_eq!(trajectory.total_reward(), 1.0, "Rewards summed");
    }

    #[test]
    fn empty_trajectory() {
        let trajectory = Trajectory::<MockEnv> {
            start: 2,
            steps: vec![],
            termination: Termination::Truncated,
        };

        assert!(trajectory.is_empty());
        assert_eq!(trajectory.path(), [2], "Start state is still visited");
        assert_eq!(trajectory.total_reward(), 0.0);
    }
}
