pub mod q_table;

pub use q_table::{EpisodeSummary, QTable, QTableAgent, QTableAgentConfig, TrainingConfig};
