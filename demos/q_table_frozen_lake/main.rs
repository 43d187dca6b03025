use std::process::ExitCode;

use frozen_q::{
    algo::tabular::{QTableAgent, QTableAgentConfig, TrainingConfig},
    gym::FrozenLake,
};
use log::{debug, error, info, LevelFilter};
use rand::{rngs::StdRng, SeedableRng};

fn init_logging() {
    env_logger::builder()
        .format_target(false)
        .format_timestamp_secs()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init()
}

fn run() -> frozen_q::Result<()> {
    let env = FrozenLake::new();
    let config = TrainingConfig::default();
    let mut agent: QTableAgent<FrozenLake> = QTableAgent::new(&env, QTableAgentConfig::default());
    let mut rng = StdRng::from_entropy();

    info!("Initial Q-table:\n{}", env.render_q_table(agent.q_table()));

    info!("Learning starts");
    agent.train(&env, &config, &mut rng)?;
    info!(
        "Learning finished, Q-table:\n{}",
        env.render_q_table(agent.q_table())
    );

    info!("Test starts");
    for e in 0..config.eval_episodes {
        let trajectory = agent.evaluate(&env, config.max_steps)?;
        info!("Episode {e}, start state {:?}", trajectory.start);
        for step in &trajectory.steps {
            info!(
                "The move is {:<5} that leads to {:?}",
                step.action.to_string(),
                step.next_state
            );
            debug!("\n{}", env.render(&step.next_state));
        }
        info!(
            "Episode ended ({:?}) after {} moves, total reward {}",
            trajectory.termination,
            trajectory.len(),
            trajectory.total_reward()
        );
    }

    Ok(())
}

fn main() -> ExitCode {
    init_logging();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
