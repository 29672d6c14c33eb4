pub mod dates;
pub mod error;
pub mod loader;
pub mod output;
pub mod pipeline;
pub mod records;
pub mod report;
pub mod states;
pub mod transform;
