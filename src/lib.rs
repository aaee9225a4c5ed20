pub mod cli;
pub mod error;
pub mod generator;
pub mod logging;
pub mod model;
pub mod output;
pub mod processor;
pub mod scheduler;
pub mod search;

pub mod prelude {
    pub use crate::cli::*;
    pub use crate::error::*;
    pub use crate::generator::*;
    pub use crate::model::*;
    pub use crate::output::*;
    pub use crate::processor::*;
    pub use crate::scheduler::*;
    pub use crate::search::*;
}
