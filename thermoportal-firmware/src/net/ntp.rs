//! SNTP time source over embassy-net UDP

use defmt::*;
use embassy_net::udp::{PacketMetadata, UdpSocket};
use embassy_net::{Ipv4Address, Stack};
use embassy_time::{with_timeout, Duration};

use thermoportal_core::clock::ntp;
use thermoportal_core::traits::{ClockError, TimeSource};

/// Servers tried in order: pool.ntp.org, time.nist.gov, time.google.com
const NTP_SERVERS: [Ipv4Address; 3] = [
    Ipv4Address::new(162, 159, 200, 1),
    Ipv4Address::new(129, 6, 15, 28),
    Ipv4Address::new(216, 239, 35, 0),
];

/// Per-server response timeout
const RESPONSE_TIMEOUT: Duration = Duration::from_secs(3);

/// Queries a fixed list of NTP servers until one answers
pub struct NtpTimeSource {
    stack: Stack<'static>,
}

impl NtpTimeSource {
    pub fn new(stack: Stack<'static>) -> Self {
        Self { stack }
    }

    async fn query(&self, server: Ipv4Address) -> Result<u64, ClockError> {
        let mut rx_meta = [PacketMetadata::EMPTY; 1];
        let mut rx_buffer = [0u8; 128];
        let mut tx_meta = [PacketMetadata::EMPTY; 1];
        let mut tx_buffer = [0u8; 128];

        let mut socket = UdpSocket::new(
            self.stack,
            &mut rx_meta,
            &mut rx_buffer,
            &mut tx_meta,
            &mut tx_buffer,
        );
        socket.bind(0).map_err(|_| ClockError::Socket)?;

        let request = ntp::request_packet();
        socket
            .send_to(&request, (server, ntp::PORT))
            .await
            .map_err(|_| ClockError::Socket)?;

        let mut response = [0u8; ntp::PACKET_LEN];
        let (len, _) = with_timeout(RESPONSE_TIMEOUT, socket.recv_from(&mut response))
            .await
            .map_err(|_| ClockError::Timeout)?
            .map_err(|_| ClockError::Socket)?;

        ntp::parse_response(&response[..len])
    }
}

impl TimeSource for NtpTimeSource {
    async fn sync(&mut self) -> Result<u64, ClockError> {
        if self.stack.config_v4().is_none() {
            return Err(ClockError::NoNetwork);
        }

        let mut last_error = ClockError::Timeout;
        for (index, server) in NTP_SERVERS.into_iter().enumerate() {
            match self.query(server).await {
                Ok(unix) => {
                    debug!("NTP: answer from server {}", index);
                    return Ok(unix);
                }
                Err(e) => {
                    debug!("NTP: server {} failed: {}", index, e);
                    last_error = e;
                }
            }
        }
        Err(last_error)
    }
}
