use std::path::PathBuf;

use clap::Parser;
use shared::networking::server::ServerConfig;

/// 🖥️ Server Command
///
/// This command is used to configure and 🚀 start the render server.
/// Unset options fall back to `RAYFARM_*` environment variables.
#[derive(Parser, Debug)]
#[command(name = "server", about = "🚀 Start and configure the server.", long_about = None)]
pub struct ServerCommand {
    /// 📌 Server IP address
    ///
    /// Specify the IP address 🌐 where the server will listen for workers.
    /// If not set, the server will listen on all available interfaces.
    #[arg(short, long, value_name = "ADDRESS")]
    pub address: Option<String>,

    /// 🚪 Server port
    ///
    /// Define the port number 🎛️ on which the server will listen.
    /// Default is 8081 if not specified.
    #[arg(short, long, value_name = "PORT")]
    pub port: Option<u16>,

    /// 📏 Image width in pixels
    #[arg(long, value_name = "WIDTH")]
    pub width: Option<u32>,

    /// 📐 Image height in pixels
    #[arg(long, value_name = "HEIGHT")]
    pub height: Option<u32>,

    /// 🖼️ Where to write the PNG
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// 👥 Start as soon as this many workers are connected instead of
    /// waiting for Enter
    #[arg(long, value_name = "COUNT")]
    pub expect_workers: Option<usize>,

    /// 🎲 Seed for the random part of the scene
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,
}

impl ServerCommand {
    pub fn config(&self) -> ServerConfig {
        let mut config = ServerConfig::from_env();
        if let Some(address) = &self.address {
            config.address = address.to_owned();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(output) = &self.output {
            config.output = output.to_owned();
        }
        config
    }
}
