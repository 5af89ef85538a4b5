use clap::Parser;
use shared::networking::worker::WorkerConfig;

#[derive(Parser, Debug)]
pub struct WorkerCommand {
    #[arg(short, long)]
    pub name: Option<String>,

    #[arg(short, long)]
    pub address: Option<String>,

    #[arg(short, long)]
    pub port: Option<u16>,

    /// Number of concurrent render workers
    #[arg(short, long)]
    pub workers: Option<usize>,
}

impl WorkerCommand {
    pub fn config(&self) -> WorkerConfig {
        let mut config = WorkerConfig::from_env();
        if let Some(name) = &self.name {
            config.name = name.to_owned();
        }
        if let Some(address) = &self.address {
            config.address = address.to_owned();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(workers) = self.workers {
            config.worker_count = workers;
        }
        config
    }
}
