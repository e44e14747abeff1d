/// Art-Net frame source
///
/// Minimal ArtDmx decoding: a UDP socket bound to the standard Art-Net
/// port yields raw packets, which are parsed into Frame values carrying
/// the universe and the channel payload. Everything downstream (the
/// sampler) only sees the FrameSource trait, so it can be driven by a
/// scripted source in tests.
use async_trait::async_trait;
use thiserror::Error;
use tokio::net::UdpSocket;
use tokio::time::{timeout, Duration};

/// Standard Art-Net UDP port
pub const ARTNET_PORT: u16 = 6454;

/// Packet identification header
const ARTNET_HEADER: &[u8; 8] = b"Art-Net\0";

/// ArtDmx opcode (little-endian on the wire)
const OP_DMX: u16 = 0x5000;

/// Fixed ArtDmx header size before channel data
const DMX_DATA_OFFSET: usize = 18;

/// Largest packet we accept (512 DMX channels + header)
const MAX_PACKET: usize = DMX_DATA_OFFSET + 512;

/// Receive timeout for one poll
const RECV_TIMEOUT_MS: u64 = 1000;

/// One decoded sample from the protocol source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Universe the packet addresses (sub-uni + net)
    pub universe: u16,
    /// True when the packet carried at least one channel value
    pub has_data: bool,
    /// Channel values in wire order
    pub channels: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("packet too short ({0} bytes)")]
    Truncated(usize),

    #[error("not an Art-Net packet")]
    BadHeader,

    #[error("unsupported opcode 0x{0:04x}")]
    UnsupportedOpcode(u16),

    #[error("declared DMX length {declared} exceeds payload ({available} bytes)")]
    LengthMismatch { declared: usize, available: usize },

    #[error("receive timed out")]
    Timeout,

    #[error("socket receive failed: {0}")]
    Io(#[from] std::io::Error),
}

impl FrameError {
    /// Expected-in-normal-operation errors (idle wire, discovery chatter)
    /// that should not be logged as warnings.
    pub fn is_transient(&self) -> bool {
        matches!(self, FrameError::Timeout | FrameError::UnsupportedOpcode(_))
    }
}

/// Parse a raw UDP payload as an ArtDmx packet
pub fn parse_frame(buf: &[u8]) -> Result<Frame, FrameError> {
    if buf.len() < DMX_DATA_OFFSET {
        return Err(FrameError::Truncated(buf.len()));
    }
    if &buf[..8] != ARTNET_HEADER {
        return Err(FrameError::BadHeader);
    }

    let opcode = u16::from_le_bytes([buf[8], buf[9]]);
    if opcode != OP_DMX {
        return Err(FrameError::UnsupportedOpcode(opcode));
    }

    // buf[10..12] protocol version, buf[12] sequence, buf[13] physical port
    let universe = u16::from_le_bytes([buf[14], buf[15]]);
    let declared = u16::from_be_bytes([buf[16], buf[17]]) as usize;

    let available = buf.len() - DMX_DATA_OFFSET;
    if declared > available {
        return Err(FrameError::LengthMismatch {
            declared,
            available,
        });
    }

    let channels = buf[DMX_DATA_OFFSET..DMX_DATA_OFFSET + declared].to_vec();

    Ok(Frame {
        universe,
        has_data: !channels.is_empty(),
        channels,
    })
}

/// Source of decoded frames
#[async_trait]
pub trait FrameSource: Send {
    /// Pull one decoded frame from the source
    async fn poll_frame(&mut self) -> Result<Frame, FrameError>;
}

/// FrameSource backed by the Art-Net UDP socket
pub struct UdpFrameSource {
    socket: UdpSocket,
    buf: Vec<u8>,
}

impl UdpFrameSource {
    /// Bind the standard Art-Net port on all interfaces
    pub async fn bind() -> Result<Self, FrameError> {
        let socket = UdpSocket::bind(("0.0.0.0", ARTNET_PORT)).await?;
        Ok(Self {
            socket,
            buf: vec![0u8; MAX_PACKET],
        })
    }
}

#[async_trait]
impl FrameSource for UdpFrameSource {
    async fn poll_frame(&mut self) -> Result<Frame, FrameError> {
        let received = timeout(
            Duration::from_millis(RECV_TIMEOUT_MS),
            self.socket.recv(&mut self.buf),
        )
        .await
        .map_err(|_| FrameError::Timeout)??;

        parse_frame(&self.buf[..received])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dmx_packet(universe: u16, channels: &[u8]) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(ARTNET_HEADER);
        buf.extend_from_slice(&OP_DMX.to_le_bytes());
        buf.extend_from_slice(&[0x00, 0x0e]); // protocol version 14
        buf.push(0); // sequence
        buf.push(0); // physical port
        buf.extend_from_slice(&universe.to_le_bytes());
        buf.extend_from_slice(&(channels.len() as u16).to_be_bytes());
        buf.extend_from_slice(channels);
        buf
    }

    #[test]
    fn test_parse_dmx_packet() {
        let packet = dmx_packet(3, &[10, 20, 30, 40]);
        let frame = parse_frame(&packet).unwrap();

        assert_eq!(frame.universe, 3);
        assert!(frame.has_data);
        assert_eq!(frame.channels, vec![10, 20, 30, 40]);
    }

    #[test]
    fn test_parse_empty_payload_has_no_data() {
        let packet = dmx_packet(0, &[]);
        let frame = parse_frame(&packet).unwrap();
        assert!(!frame.has_data);
    }

    #[test]
    fn test_reject_bad_header() {
        let mut packet = dmx_packet(0, &[1]);
        packet[0] = b'X';
        assert!(matches!(parse_frame(&packet), Err(FrameError::BadHeader)));
    }

    #[test]
    fn test_reject_truncated_packet() {
        assert!(matches!(
            parse_frame(b"Art-Net\0"),
            Err(FrameError::Truncated(8))
        ));
    }

    #[test]
    fn test_reject_poll_packet() {
        let mut packet = dmx_packet(0, &[1]);
        // ArtPoll opcode
        packet[8] = 0x00;
        packet[9] = 0x20;
        assert!(matches!(
            parse_frame(&packet),
            Err(FrameError::UnsupportedOpcode(0x2000))
        ));
    }

    #[test]
    fn test_reject_length_beyond_payload() {
        let mut packet = dmx_packet(0, &[1, 2]);
        // Claim 10 channels while carrying 2
        packet[16] = 0;
        packet[17] = 10;
        assert!(matches!(
            parse_frame(&packet),
            Err(FrameError::LengthMismatch { declared: 10, .. })
        ));
    }
}
