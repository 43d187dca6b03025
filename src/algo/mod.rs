pub mod tabular;

pub use tabular::{QTable, QTableAgent};
