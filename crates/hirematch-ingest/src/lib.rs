pub mod clean;
pub mod flatten;
pub mod json;
pub mod table;

pub use clean::{DATE_SENTINEL, MISSING_TEXT, clean_frame};
pub use flatten::{flatten_applicants, flatten_jobs, flatten_prospects};
pub use json::{load_json_map, value_to_cell};
pub use table::{read_table, write_table};
