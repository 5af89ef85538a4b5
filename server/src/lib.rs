pub mod completion;
pub mod coordinator;
pub mod framebuffer;
pub mod partitioner;
pub mod registry;

use log::{error, info};
use shared::{
    models::{camera::Camera, scene::Scene},
    networking::{result::NetworkingResult, server::ServerConfig, variants},
};

use self::coordinator::{Coordinator, StartTrigger};

pub async fn run_server(
    config: ServerConfig,
    camera: Camera,
    scene: Scene,
    trigger: StartTrigger,
) -> NetworkingResult<()> {
    match run(config, camera, scene, trigger).await {
        Ok(()) => {
            info!("Server shutdown gracefully");
            Ok(())
        }
        Err(e) => {
            error!("Server error: {}", e);
            Err(e)
        }
    }
}

async fn run(
    config: ServerConfig,
    camera: Camera,
    scene: Scene,
    trigger: StartTrigger,
) -> NetworkingResult<()> {
    variants::register_variants();
    let coordinator = Coordinator::bind(config, camera, scene).await?;
    coordinator.run(trigger).await
}
