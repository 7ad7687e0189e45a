mod dashboard;
pub use dashboard::{sample_query, sample_row, Dashboard};
