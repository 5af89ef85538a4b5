use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    pub width: u32,
    pub height: u32,
    pub output: PathBuf,
}

impl ServerConfig {
    pub fn new(address: String, port: u16, width: u32, height: u32, output: PathBuf) -> Self {
        Self {
            address,
            port,
            width,
            height,
            output,
        }
    }

    pub fn from_env() -> Self {
        Self {
            address: env::var_or("RAYFARM_ADDRESS", "0.0.0.0".to_string()),
            port: env::var_or("RAYFARM_PORT", 8081),
            width: env::var_or("RAYFARM_WIDTH", 2048),
            height: env::var_or("RAYFARM_HEIGHT", 2048),
            output: env::var_or("RAYFARM_OUTPUT", PathBuf::from("distributed_result.png")),
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}
