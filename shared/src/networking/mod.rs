pub mod error;
pub mod result;
pub mod server;
pub mod variants;
pub mod worker;

use log::debug;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::models::{
    color::Color,
    jobs::{job::Job, message::Message, render_result::RenderResult},
};

use self::{error::NetworkingError, result::NetworkingResult};

/// Upper bound on a single frame, header and payload included.
pub const MAX_MESSAGE_LENGTH: u32 = 256 * 1024 * 1024;

/// Bytes kept free for the JSON header of a `RenderResult` frame.
const RESULT_HEADER_ALLOWANCE: u64 = 4096;

/// Largest region, in pixels, whose `RenderResult` fits in one frame.
pub const MAX_RESULT_PIXELS: u64 =
    (MAX_MESSAGE_LENGTH as u64 - RESULT_HEADER_ALLOWANCE) / Color::BYTES as u64;

#[derive(Debug, Clone)]
pub struct RawMessage {
    pub message_length: u32,
    pub json_length: u32,
    pub json_message: String,
    pub data: Vec<u8>,
}

/// `(total_length, json_length)` for a frame, refusing anything the reading
/// side would reject.
fn frame_lengths(json_length: usize, data_length: usize) -> NetworkingResult<(u32, u32)> {
    let too_large = || {
        NetworkingError::Malformed(format!(
            "frame of {} JSON and {} payload bytes exceeds the {} byte limit",
            json_length, data_length, MAX_MESSAGE_LENGTH
        ))
    };

    let json_size = u32::try_from(json_length).map_err(|_| too_large())?;
    let data_size = u32::try_from(data_length).map_err(|_| too_large())?;
    let total_size = json_size.checked_add(data_size).ok_or_else(too_large)?;
    if total_size > MAX_MESSAGE_LENGTH {
        return Err(too_large());
    }
    Ok((total_size, json_size))
}

/// Frame layout: `total_length`, `json_length` (both big-endian u32), the
/// JSON bytes, then `total_length - json_length` bytes of binary payload.
pub async fn send_message<W>(
    stream: &mut W,
    json_message: &[u8],
    data: Option<&[u8]>,
) -> NetworkingResult<()>
where
    W: AsyncWrite + Unpin,
{
    let data = data.unwrap_or_default();
    let (total_message_size, json_message_size) = frame_lengths(json_message.len(), data.len())?;

    let mut buffer = Vec::with_capacity(8 + total_message_size as usize);
    buffer.extend_from_slice(&total_message_size.to_be_bytes());
    buffer.extend_from_slice(&json_message_size.to_be_bytes());
    buffer.extend_from_slice(json_message);
    buffer.extend_from_slice(data);

    stream.write_all(&buffer).await?;
    Ok(stream.flush().await?)
}

/// Like [`read_message_length`], but EOF before the first byte is a clean
/// close rather than a truncated frame.
async fn read_frame_start<R>(stream: &mut R) -> NetworkingResult<u32>
where
    R: AsyncRead + Unpin,
{
    let mut length_bytes = [0u8; 4];
    let mut filled = 0;
    while filled < length_bytes.len() {
        let read = stream.read(&mut length_bytes[filled..]).await?;
        if read == 0 {
            return Err(if filled == 0 {
                NetworkingError::Closed
            } else {
                std::io::Error::from(std::io::ErrorKind::UnexpectedEof).into()
            });
        }
        filled += read;
    }
    Ok(u32::from_be_bytes(length_bytes))
}

pub async fn read_message_length<R>(stream: &mut R) -> NetworkingResult<u32>
where
    R: AsyncRead + Unpin,
{
    let mut length_bytes = [0u8; 4];
    stream.read_exact(&mut length_bytes).await?;
    Ok(u32::from_be_bytes(length_bytes))
}

pub async fn read_json_message<R>(stream: &mut R, length: usize) -> NetworkingResult<String>
where
    R: AsyncRead + Unpin,
{
    let mut json_message = vec![0u8; length];
    stream.read_exact(&mut json_message).await?;
    String::from_utf8(json_message)
        .map_err(|e| NetworkingError::Malformed(format!("JSON is not UTF-8: {}", e)))
}

pub async fn read_binary_data<R>(stream: &mut R, length: usize) -> NetworkingResult<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut data_message = vec![0u8; length];
    stream.read_exact(&mut data_message).await?;
    Ok(data_message)
}

pub async fn read_message_raw<R>(stream: &mut R) -> NetworkingResult<RawMessage>
where
    R: AsyncRead + Unpin,
{
    let message_length = read_frame_start(stream).await?;
    let json_length = read_message_length(stream).await?;
    if message_length > MAX_MESSAGE_LENGTH {
        return Err(NetworkingError::Malformed(format!(
            "frame of {} bytes exceeds the {} byte limit",
            message_length, MAX_MESSAGE_LENGTH
        )));
    }
    if json_length > message_length {
        return Err(NetworkingError::Malformed(format!(
            "JSON length {} exceeds frame length {}",
            json_length, message_length
        )));
    }

    let json_message = read_json_message(stream, json_length as usize).await?;
    let data = read_binary_data(stream, (message_length - json_length) as usize).await?;

    Ok(RawMessage {
        message_length,
        json_length,
        json_message,
        data,
    })
}

pub async fn write_job<W>(stream: &mut W, job: &Job) -> NetworkingResult<()>
where
    W: AsyncWrite + Unpin,
{
    variants::registered()?.check_scene(&job.scene)?;
    let serialized_job = job.to_json()?.to_string();
    send_message(stream, serialized_job.as_bytes(), None).await?;
    debug!(
        "Job rows [{}, {}) written ({} bytes)",
        job.start_y,
        job.end_y,
        serialized_job.len()
    );
    Ok(())
}

pub async fn read_job<R>(stream: &mut R) -> NetworkingResult<Job>
where
    R: AsyncRead + Unpin,
{
    let registry = variants::registered()?;
    let raw_message = read_message_raw(stream).await?;
    if !raw_message.data.is_empty() {
        return Err(NetworkingError::Malformed(format!(
            "Job frame carries {} unexpected payload bytes",
            raw_message.data.len()
        )));
    }

    let job = Job::from_json(&raw_message.json_message)?;
    job.validate().map_err(NetworkingError::Malformed)?;
    registry.check_scene(&job.scene)?;
    Ok(job)
}

pub async fn write_result<W>(stream: &mut W, result: &RenderResult) -> NetworkingResult<()>
where
    W: AsyncWrite + Unpin,
{
    if result.pixel_count() as u64 > MAX_RESULT_PIXELS {
        return Err(NetworkingError::Malformed(format!(
            "{}x{} result exceeds the {} pixel frame limit",
            result.width, result.height, MAX_RESULT_PIXELS
        )));
    }
    if result.pixels.len() != result.pixel_count() {
        return Err(NetworkingError::Malformed(format!(
            "{}x{} result holds {} pixels",
            result.width,
            result.height,
            result.pixels.len()
        )));
    }

    let serialized_result = result.to_json()?.to_string();
    let pixel_bytes = result.pixel_bytes();
    send_message(stream, serialized_result.as_bytes(), Some(&pixel_bytes)).await
}

pub async fn read_result<R>(stream: &mut R) -> NetworkingResult<RenderResult>
where
    R: AsyncRead + Unpin,
{
    let raw_message = read_message_raw(stream).await?;
    let header = RenderResult::from_json(&raw_message.json_message)?;
    header
        .with_pixel_bytes(&raw_message.data)
        .map_err(NetworkingError::Malformed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        camera::default_camera,
        color::Color,
        geometry::sphere::Sphere,
        light::Light,
        material::{lambert::Lambert, phong::Phong},
        scene::Scene,
    };
    use vector_rs::vec3::Vec3;

    fn sample_job() -> Job {
        let mut scene = Scene::new();
        scene.add_element(Sphere::new(
            1.0,
            Vec3::new(0.0, 0.0, 8.0),
            Phong::from_diffuse(Vec3::new(1.0, 0.0, 0.0), 0.8, 32.0),
        ));
        scene.add_element(Sphere::new(
            0.9,
            Vec3::new(0.0, -1.0, 5.0),
            Lambert::new(Vec3::new(0.0, 0.0, 1.0)),
        ));
        scene.add_light(Light::new(Vec3::splat(1.0), Vec3::new(0.0, 10.0, 0.0)));

        Job {
            start_x: 0,
            end_x: 64,
            start_y: 16,
            end_y: 32,
            width: 64,
            height: 48,
            camera: default_camera(),
            scene,
        }
    }

    #[tokio::test]
    async fn job_survives_the_wire_with_every_material() {
        variants::register_variants();
        let job = sample_job();
        let (mut client, mut server) = tokio::io::duplex(64 * 1024);

        write_job(&mut server, &job).await.unwrap();
        let decoded = read_job(&mut client).await.unwrap();

        assert_eq!(decoded, job);
        let tags: Vec<_> = decoded.scene.variant_tags().collect();
        assert_eq!(tags, vec!["Sphere", "Phong", "Sphere", "Lambert"]);
    }

    #[tokio::test]
    async fn result_pixels_travel_as_binary_payload() {
        let result = RenderResult::new(
            3,
            5,
            2,
            2,
            vec![
                Color::new(1, 2, 3),
                Color::new(4, 5, 6),
                Color::new(7, 8, 9),
                Color::new(10, 11, 12),
            ],
        );
        let (mut client, mut server) = tokio::io::duplex(1024);

        write_result(&mut client, &result).await.unwrap();
        let raw = read_message_raw(&mut server).await.unwrap();
        assert_eq!(raw.data.len(), 12);
        assert_eq!(raw.message_length, raw.json_length + 12);

        write_result(&mut client, &result).await.unwrap();
        assert_eq!(read_result(&mut server).await.unwrap(), result);
    }

    #[tokio::test]
    async fn several_messages_share_one_stream() {
        variants::register_variants();
        let (mut client, mut server) = tokio::io::duplex(64 * 1024);
        let mut first = sample_job();
        first.end_y = 20;
        let second = sample_job();

        write_job(&mut server, &first).await.unwrap();
        write_job(&mut server, &second).await.unwrap();

        assert_eq!(read_job(&mut client).await.unwrap().end_y, 20);
        assert_eq!(read_job(&mut client).await.unwrap().end_y, 32);
    }

    #[tokio::test]
    async fn eof_before_a_frame_is_a_clean_close() {
        let (mut client, server) = tokio::io::duplex(64);
        drop(server);
        let err = read_result(&mut client).await.unwrap_err();
        assert!(matches!(err, NetworkingError::Closed));
        assert!(err.is_disconnect());
    }

    #[tokio::test]
    async fn truncated_frame_is_a_disconnect_but_not_clean() {
        let (mut client, mut server) = tokio::io::duplex(64);
        server.write_all(&[0, 0]).await.unwrap();
        drop(server);
        let err = read_result(&mut client).await.unwrap_err();
        assert!(matches!(err, NetworkingError::Io(_)));
        assert!(err.is_disconnect());
    }

    #[tokio::test]
    async fn pixel_count_mismatch_is_malformed() {
        let (mut client, mut server) = tokio::io::duplex(1024);
        let header = RenderResult::new(0, 0, 2, 2, Vec::new()).to_json().unwrap();
        send_message(&mut server, header.to_string().as_bytes(), Some(&[0u8; 9]))
            .await
            .unwrap();

        let err = read_result(&mut client).await.unwrap_err();
        assert!(matches!(err, NetworkingError::Malformed(_)));
        assert!(!err.is_disconnect());
    }

    #[tokio::test]
    async fn job_outside_the_image_is_malformed() {
        variants::register_variants();
        let mut job = sample_job();
        job.end_y = job.height + 1;
        let (mut client, mut server) = tokio::io::duplex(64 * 1024);
        send_message(&mut server, job.to_json().unwrap().to_string().as_bytes(), None)
            .await
            .unwrap();

        assert!(matches!(
            read_job(&mut client).await,
            Err(NetworkingError::Malformed(_))
        ));
    }

    #[test]
    fn frame_lengths_refuse_what_the_reader_would_reject() {
        assert_eq!(frame_lengths(10, 20).unwrap(), (30, 10));
        assert!(frame_lengths(MAX_MESSAGE_LENGTH as usize, 0).is_ok());
        assert!(frame_lengths(MAX_MESSAGE_LENGTH as usize, 1).is_err());
        assert!(frame_lengths(10, usize::MAX).is_err());
        assert!(frame_lengths(u32::MAX as usize, u32::MAX as usize).is_err());
    }

    #[tokio::test]
    async fn oversize_result_is_refused_before_anything_is_sent() {
        // 9500x9500 needs more pixel bytes than one frame may carry.
        let result = RenderResult::new(0, 0, 9500, 9500, Vec::new());
        let (mut client, mut server) = tokio::io::duplex(1024);

        let err = write_result(&mut client, &result).await.unwrap_err();
        assert!(matches!(err, NetworkingError::Malformed(_)));
        assert!(!err.is_disconnect());

        drop(client);
        assert!(matches!(
            read_result(&mut server).await,
            Err(NetworkingError::Closed)
        ));
    }

    #[test]
    fn largest_allowed_band_fits_in_a_frame() {
        let json = RenderResult::new(u32::MAX, u32::MAX, u32::MAX, u32::MAX, Vec::new())
            .to_json()
            .unwrap()
            .to_string();
        assert!((json.len() as u64) < RESULT_HEADER_ALLOWANCE);
        assert!(frame_lengths(json.len(), (MAX_RESULT_PIXELS * 3) as usize).is_ok());
    }

    #[tokio::test]
    async fn json_longer_than_frame_is_malformed() {
        let (mut client, mut server) = tokio::io::duplex(64);
        server.write_all(&4u32.to_be_bytes()).await.unwrap();
        server.write_all(&9u32.to_be_bytes()).await.unwrap();

        assert!(matches!(
            read_message_raw(&mut client).await,
            Err(NetworkingError::Malformed(_))
        ));
    }
}
