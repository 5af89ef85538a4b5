pub mod pool;

use std::net::SocketAddr;

use log::{debug, error, info, warn};
use shared::{
    models::jobs::render_result::RenderResult,
    networking::{
        read_job, result::NetworkingResult, variants, worker::WorkerConfig, write_result,
    },
};
use tokio::{
    io::AsyncWriteExt,
    net::{
        tcp::{OwnedReadHalf, OwnedWriteHalf},
        TcpStream,
    },
    sync::mpsc,
};

use self::pool::WorkerPool;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClientSummary {
    pub jobs_received: usize,
    pub jobs_rendered: usize,
    pub results_sent: usize,
}

pub async fn run_worker(config: WorkerConfig) -> NetworkingResult<ClientSummary> {
    variants::register_variants();
    info!("Worker launched: {}", config.name);

    let client = Client::connect(&config.addr()).await?;
    let summary = client.run(config.worker_count).await?;
    info!(
        "Worker {} done: {} jobs received, {} results sent",
        config.name, summary.jobs_received, summary.results_sent
    );
    Ok(summary)
}

/// One connection to the server, feeding a local worker pool.
pub struct Client {
    server_addr: SocketAddr,
    reader: OwnedReadHalf,
    writer: OwnedWriteHalf,
}

impl Client {
    pub async fn connect(addr: &str) -> NetworkingResult<Self> {
        let stream = match TcpStream::connect(addr).await {
            Ok(stream) => stream,
            Err(e) => {
                error!("Failed to connect to server: {}", e);
                return Err(e.into());
            }
        };
        let server_addr = stream.peer_addr()?;
        let (reader, writer) = stream.into_split();
        info!("Connected to server at {}", server_addr);

        Ok(Self {
            server_addr,
            reader,
            writer,
        })
    }

    pub fn server_addr(&self) -> SocketAddr {
        self.server_addr
    }

    /// Decodes jobs until the server goes away, then drains the pool, flushes
    /// the remaining results and closes the connection.
    pub async fn run(self, worker_count: usize) -> NetworkingResult<ClientSummary> {
        let Client {
            mut reader, writer, ..
        } = self;

        let (result_tx, result_rx) = mpsc::channel(worker_count.max(1));
        let pool = WorkerPool::spawn(worker_count, result_tx);
        let forwarder = tokio::spawn(forward_results(writer, result_rx));

        let mut jobs_received = 0;
        loop {
            let job = match read_job(&mut reader).await {
                Ok(job) => job,
                Err(e) => {
                    info!("Server disconnected or finished: {}", e);
                    break;
                }
            };

            info!(
                "Received job: Render region ({},{}) to ({},{})",
                job.start_x, job.start_y, job.end_x, job.end_y
            );
            jobs_received += 1;
            if !pool.submit(job).await {
                warn!("No render worker left to take the job");
                break;
            }
        }

        let jobs_rendered = pool.shutdown().await;
        let (mut writer, results_sent) = forwarder.await?;
        if let Err(e) = writer.shutdown().await {
            debug!("Closing connection failed: {}", e);
        }

        Ok(ClientSummary {
            jobs_received,
            jobs_rendered,
            results_sent,
        })
    }
}

/// Writes results to the server until the queue closes or a send fails.
async fn forward_results(
    mut writer: OwnedWriteHalf,
    mut results: mpsc::Receiver<RenderResult>,
) -> (OwnedWriteHalf, usize) {
    let mut sent = 0;
    while let Some(result) = results.recv().await {
        if let Err(e) = write_result(&mut writer, &result).await {
            error!("Error sending result to server: {}", e);
            break;
        }
        sent += 1;
        info!("Sent render result to server");
    }
    (writer, sent)
}
