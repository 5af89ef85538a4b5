use clap::Subcommand;

use self::{server::ServerCommand, worker::WorkerCommand};

pub mod server;
pub mod worker;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 🚀 Start Server
    ///
    /// Listen for workers, split the image into row bands and assemble the result.
    Server(ServerCommand),

    /// 👷 Worker Mode
    ///
    /// Connect to a server and render the bands it hands out.
    Worker(WorkerCommand),
}
