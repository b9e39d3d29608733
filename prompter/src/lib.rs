pub mod assistant;
pub mod repl;
pub mod server;

pub use assistant::configuration::Configuration;
pub use assistant::graph::PromptGraph;
pub use assistant::state::{SessionInput, SessionOutput};

use dotenv::dotenv;

pub fn init() {
    dotenv().ok();
}
