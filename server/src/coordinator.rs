use std::{net::SocketAddr, sync::Arc, time::Duration};

use log::{debug, error, info, warn};
use shared::{
    graphics::{output::save_png, raytracer::render_frame},
    models::{camera::Camera, jobs::render_result::RenderResult, scene::Scene},
    networking::{
        error::NetworkingError, read_result, result::NetworkingResult, server::ServerConfig,
        MAX_RESULT_PIXELS,
    },
};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    net::{tcp::OwnedReadHalf, TcpListener},
    task::JoinHandle,
};

use crate::{
    completion::{Completion, CompletionState},
    framebuffer::Framebuffer,
    partitioner::{build_jobs, partition_rows},
    registry::{Connection, ConnectionId, ConnectionRegistry},
};

pub const POLL_INTERVAL: Duration = Duration::from_millis(100);
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerPhase {
    Listening,
    AcceptingAndWaiting,
    Dispatched,
    Collecting,
    Finalizing,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// One job per worker connected at dispatch time.
    Distributed { jobs: usize },
    /// Nobody was connected, the server rendered the frame itself.
    Local,
}

/// What releases the server from `AcceptingAndWaiting`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartTrigger {
    /// A line on stdin.
    Enter,
    /// This many registered workers.
    Workers(usize),
    Immediately,
}

/// State shared between the coordinator, the accept loop and every
/// receive loop.
#[derive(Debug)]
pub struct RenderState {
    registry: ConnectionRegistry,
    framebuffer: Framebuffer,
    completion: Completion,
}

impl RenderState {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            registry: ConnectionRegistry::new(),
            framebuffer: Framebuffer::new(width, height),
            completion: Completion::new(),
        }
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn connected_workers(&self) -> usize {
        self.registry.len()
    }

    pub fn progress(&self) -> CompletionState {
        self.completion.snapshot()
    }

    pub fn process_result(&self, result: &RenderResult) {
        let written = self.framebuffer.apply(result);
        if written < result.pixel_count() {
            warn!(
                "Dropped {} out-of-range pixels from result at ({}, {})",
                result.pixel_count() - written,
                result.start_x,
                result.start_y
            );
        }

        let state = self.completion.record();
        info!(
            "Received results: {}/{} jobs completed",
            state.completed,
            state.total.unwrap_or_default()
        );
    }
}

pub struct Coordinator {
    config: ServerConfig,
    camera: Camera,
    scene: Scene,
    state: Arc<RenderState>,
    phase: ServerPhase,
    local_addr: SocketAddr,
    listener: Option<TcpListener>,
    accept_handle: Option<JoinHandle<()>>,
}

impl Coordinator {
    pub async fn bind(
        config: ServerConfig,
        camera: Camera,
        scene: Scene,
    ) -> NetworkingResult<Self> {
        // A lone worker gets the whole image back in one frame.
        if config.width as u64 * config.height as u64 > MAX_RESULT_PIXELS {
            return Err(NetworkingError::Malformed(format!(
                "image {}x{} exceeds the {} pixel frame limit",
                config.width, config.height, MAX_RESULT_PIXELS
            )));
        }

        let listener = TcpListener::bind(config.addr()).await?;
        let local_addr = listener.local_addr()?;
        info!("Server listening on {}", local_addr);

        Ok(Self {
            state: Arc::new(RenderState::new(config.width, config.height)),
            config,
            camera,
            scene,
            phase: ServerPhase::Listening,
            local_addr,
            listener: Some(listener),
            accept_handle: None,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn phase(&self) -> ServerPhase {
        self.phase
    }

    pub fn state(&self) -> Arc<RenderState> {
        self.state.clone()
    }

    pub fn start_accepting(&mut self) {
        let Some(listener) = self.listener.take() else {
            warn!("Accept loop already running");
            return;
        };
        let state = self.state.clone();
        self.accept_handle = Some(tokio::spawn(accept_connections(listener, state)));
        self.phase = ServerPhase::AcceptingAndWaiting;
    }

    pub async fn wait_for_trigger(&self, trigger: StartTrigger) -> NetworkingResult<()> {
        match trigger {
            StartTrigger::Enter => {
                info!("Press Enter to start distributed rendering...");
                let mut line = String::new();
                BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;
            }
            StartTrigger::Workers(count) => {
                info!("Waiting for {} workers to connect...", count);
                let mut ticker = tokio::time::interval(POLL_INTERVAL);
                while self.state.connected_workers() < count {
                    ticker.tick().await;
                }
            }
            StartTrigger::Immediately => {}
        }
        Ok(())
    }

    /// Hands one band to every worker registered right now. Workers joining
    /// later get nothing for this pass.
    pub async fn dispatch(&mut self) -> NetworkingResult<Dispatch> {
        let framebuffer = &self.state.framebuffer;
        let (width, height) = (framebuffer.width(), framebuffer.height());
        let workers = self.state.registry.snapshot();
        self.phase = ServerPhase::Dispatched;

        if workers.is_empty() {
            info!("No workers connected. Rendering locally...");
            self.state.completion.fix_total(0);

            let camera = self.camera;
            let scene = self.scene.clone();
            let frame =
                tokio::task::spawn_blocking(move || render_frame(&camera, &scene, width, height))
                    .await?;
            if !self.state.framebuffer.fill(frame) {
                return Err(NetworkingError::Malformed(format!(
                    "local frame does not match the {}x{} framebuffer",
                    width, height
                )));
            }
            return Ok(Dispatch::Local);
        }

        let bands = partition_rows(height, workers.len());
        let jobs = build_jobs(&bands, width, height, &self.camera, &self.scene);
        self.state.completion.fix_total(jobs.len());
        info!("Distributing {} jobs to {} workers", jobs.len(), workers.len());

        for (connection, job) in workers.iter().zip(&jobs) {
            match connection.send_job(job).await {
                Ok(()) => debug!(
                    "Job rows [{}, {}) sent to {}",
                    job.start_y, job.end_y, connection.peer
                ),
                Err(e) => error!("Error sending job to worker {}: {}", connection.peer, e),
            }
        }

        Ok(Dispatch::Distributed { jobs: jobs.len() })
    }

    pub async fn wait_for_completion(&mut self) {
        self.phase = ServerPhase::Collecting;
        self.state.completion.wait(POLL_INTERVAL).await;
    }

    /// Saves the image, then closes every worker and stops accepting.
    pub async fn finalize(&mut self) -> NetworkingResult<()> {
        self.phase = ServerPhase::Finalizing;

        let framebuffer = &self.state.framebuffer;
        let pixels = framebuffer.snapshot();
        let (width, height) = (framebuffer.width(), framebuffer.height());
        let output = self.config.output.clone();
        let saved =
            tokio::task::spawn_blocking(move || save_png(&pixels, width, height, &output)).await;

        for connection in self.state.registry.drain() {
            connection.close().await;
        }
        if let Some(handle) = self.accept_handle.take() {
            handle.abort();
        }

        saved??;
        info!(
            "Rendering complete! Image saved as {}",
            self.config.output.display()
        );
        self.phase = ServerPhase::Done;
        Ok(())
    }

    pub async fn run(mut self, trigger: StartTrigger) -> NetworkingResult<()> {
        self.start_accepting();
        self.wait_for_trigger(trigger).await?;
        self.dispatch().await?;
        self.wait_for_completion().await;
        self.finalize().await
    }
}

async fn accept_connections(listener: TcpListener, state: Arc<RenderState>) {
    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(conn) => conn,
            Err(e) => {
                error!("Error accepting connection: {}", e);
                tokio::time::sleep(ACCEPT_BACKOFF).await;
                continue;
            }
        };

        let (reader, writer) = socket.into_split();
        let connection = Connection::new(peer, Box::new(writer));
        let id = connection.id;
        let connected = state.registry.add(connection);
        info!("New worker connected: {} ({} connected)", peer, connected);

        tokio::spawn(handle_connection(reader, id, peer, state.clone()));
    }
}

/// Receive loop of one worker. Any decode failure ends it and deregisters
/// the worker; an in-flight job is not reassigned.
async fn handle_connection(
    mut reader: OwnedReadHalf,
    id: ConnectionId,
    peer: SocketAddr,
    state: Arc<RenderState>,
) {
    loop {
        match read_result(&mut reader).await {
            Ok(result) => {
                debug!(
                    "Result {}x{} at ({}, {}) from {}",
                    result.width, result.height, result.start_x, result.start_y, peer
                );
                state.process_result(&result);
            }
            Err(e) => {
                if e.is_disconnect() {
                    info!("Worker {} disconnected: {}", peer, e);
                } else {
                    warn!("Dropping worker {} after wire error: {}", peer, e);
                }
                if let Some(connection) = state.registry.remove(id) {
                    connection.close().await;
                }
                return;
            }
        }
    }
}
