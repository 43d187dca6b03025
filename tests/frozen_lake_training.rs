use frozen_q::{
    algo::tabular::{QTableAgent, QTableAgentConfig, TrainingConfig},
    decay::Constant,
    env::{DiscreteStateSpace, Environment},
    exploration::EpsilonGreedy,
    gym::{
        frozen_lake::{FLAction, Square, GOAL_REWARD},
        FrozenLake,
    },
    memory::Termination,
    Error,
};
use rand::{rngs::StdRng, SeedableRng};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn trained_agent(env: &FrozenLake, total_episodes: u32) -> QTableAgent<FrozenLake> {
    let config = TrainingConfig {
        total_episodes,
        ..Default::default()
    };
    let mut agent = QTableAgent::new(env, QTableAgentConfig::default());
    let mut rng = StdRng::seed_from_u64(42);
    agent.train(env, &config, &mut rng).unwrap();
    agent
}

fn greedy_agent(env: &FrozenLake) -> QTableAgent<FrozenLake, Constant> {
    QTableAgent::new(
        env,
        QTableAgentConfig {
            exploration: EpsilonGreedy::new(Constant::new(0.0)),
            alpha: 1.0,
            gamma: 0.9,
        },
    )
}

#[test]
fn learns_safe_path_to_goal() {
    init();
    let env = FrozenLake::new();
    let agent = trained_agent(&env, 50_000);
    assert_eq!(agent.episode(), 50_000);

    let trajectory = agent.evaluate(&env, 99).unwrap();
    let path = trajectory.path();

    assert_eq!(trajectory.termination, Termination::Terminal);
    assert_eq!(path.first(), Some(&(1, 1)), "Starts at the start square");
    assert_eq!(path.last(), Some(&(4, 4)), "Ends at the goal");
    assert_eq!(trajectory.len(), 6, "Takes a shortest path");
    assert_eq!(trajectory.total_reward(), GOAL_REWARD);
    for pos in &path {
        assert_ne!(env.square(*pos).unwrap(), Square::Hole, "{pos:?} is a hole");
    }
}

#[test]
fn terminal_rows_never_updated() {
    init();
    let env = FrozenLake::new();
    let agent = trained_agent(&env, 5_000);

    let mut nonzero = 0;
    for r in 0..env.rows() {
        for c in 0..env.cols() {
            let row = agent.q_table().row(env.state_index(&(r, c)));
            if env.is_terminal(&(r, c)) {
                assert_eq!(row, [0.0; 4], "Terminal ({r}, {c}) untouched");
            } else if row.iter().any(|&q| q != 0.0) {
                nonzero += 1;
            }
        }
    }
    assert!(nonzero > 0, "Non-terminal squares learned something");
}

#[test]
fn greedy_evaluation_is_repeatable() {
    init();
    let env = FrozenLake::new();
    let agent = trained_agent(&env, 5_000);
    let before = agent.q_table().clone();

    let first = agent.evaluate(&env, 99).unwrap();
    let second = agent.evaluate(&env, 99).unwrap();

    assert_eq!(first.actions(), second.actions());
    assert_eq!(first.path(), second.path());
    assert_eq!(first.total_reward(), second.total_reward());
    assert_eq!(agent.q_table(), &before, "Evaluation is read-only");
}

#[test]
fn zero_step_evaluation_stays_on_start() {
    init();
    let env = FrozenLake::new();
    let agent = greedy_agent(&env);

    let trajectory = agent.evaluate(&env, 0).unwrap();

    assert!(trajectory.is_empty());
    assert_eq!(trajectory.path(), [(1, 1)]);
    assert_eq!(trajectory.termination, Termination::Truncated);
    assert_eq!(trajectory.total_reward(), 0.0);
}

#[test]
fn epsilon_decays_over_training() {
    init();
    let env = FrozenLake::new();
    let mut agent: QTableAgent<FrozenLake> = QTableAgent::new(&env, QTableAgentConfig::default());
    let mut rng = StdRng::seed_from_u64(1);

    let mut prev = f32::INFINITY;
    for e in 0..200 {
        let summary = agent.go(&env, 99, &mut rng).unwrap();
        assert_eq!(summary.episode, e);
        assert!(summary.epsilon < prev, "Strictly decreasing at episode {e}");
        assert!(summary.epsilon > 0.0);
        assert!(summary.steps >= 1 && summary.steps <= 99);
        prev = summary.epsilon;
    }
}

#[test]
fn step_budget_truncates_episode() {
    init();
    let env = FrozenLake::from_rows(&["HHH", "HFH", "HSH", "HHH"]).unwrap();
    let mut agent = greedy_agent(&env);
    let mut rng = StdRng::seed_from_u64(0);

    let summary = agent.go(&env, 1, &mut rng).unwrap();

    assert_eq!(summary.steps, 1);
    assert_eq!(summary.termination, Termination::Truncated);
    assert_eq!(summary.reward, 0.0);

    let summary = agent.go(&env, 5, &mut rng).unwrap();
    assert_eq!(summary.steps, 2, "Up twice lands in the hole");
    assert_eq!(summary.termination, Termination::Terminal);
    assert_eq!(
        agent.q_table().get(env.state_index(&(1, 1)), FLAction::Up.into()),
        -9.0,
        "Only the visited pair learned the penalty"
    );
    assert_eq!(agent.q_table().row(env.state_index(&(0, 1))), [0.0; 4]);
}

#[test]
fn unknown_square_halts_training_and_evaluation() {
    init();
    let env = FrozenLake::from_rows(&["HXH", "HSH", "HHH"]).unwrap();
    let mut agent = greedy_agent(&env);
    let mut rng = StdRng::seed_from_u64(0);
    let expected = Error::InvalidCellKind {
        kind: 'X',
        row: 0,
        col: 1,
    };

    assert_eq!(agent.evaluate(&env, 10).unwrap_err(), expected);
    assert_eq!(agent.go(&env, 10, &mut rng).unwrap_err(), expected);

    let config = TrainingConfig {
        total_episodes: 3,
        ..Default::default()
    };
    assert_eq!(agent.train(&env, &config, &mut rng).unwrap_err(), expected);
}
