use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    pub name: String,
    pub address: String,
    pub port: u16,
    pub worker_count: usize,
}

impl WorkerConfig {
    pub fn new(name: String, address: String, port: u16, worker_count: usize) -> Self {
        Self {
            name,
            address,
            port,
            worker_count,
        }
    }

    pub fn from_env() -> Self {
        Self {
            name: env::var_or("RAYFARM_WORKER_NAME", format!("worker-{}", Uuid::new_v4())),
            address: env::var_or("RAYFARM_SERVER_ADDRESS", "localhost".to_string()),
            port: env::var_or("RAYFARM_PORT", 8081),
            worker_count: env::var_or("RAYFARM_WORKERS", 4),
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}
