//! Wall clock tracking
//!
//! The board has no RTC. The clock is synced over SNTP every hour and
//! extrapolated from the monotonic uptime in between.

use crate::traits::ClockError;

/// SNTP packet helpers
pub mod ntp {
    use super::ClockError;

    /// NTP packet size
    pub const PACKET_LEN: usize = 48;

    /// NTP server UDP port
    pub const PORT: u16 = 123;

    /// Seconds between the NTP epoch (1900) and the Unix epoch (1970)
    pub const UNIX_OFFSET_SECS: u32 = 2_208_988_800;

    /// Offset of the transmit timestamp seconds field
    const TRANSMIT_SECS_OFFSET: usize = 40;

    /// Build a client request (LI=0, VN=3, Mode=3)
    pub const fn request_packet() -> [u8; PACKET_LEN] {
        let mut packet = [0u8; PACKET_LEN];
        packet[0] = 0x1B;
        packet
    }

    /// Extract the server transmit time as Unix seconds
    pub fn parse_response(packet: &[u8]) -> Result<u64, ClockError> {
        if packet.len() < PACKET_LEN {
            return Err(ClockError::InvalidResponse);
        }

        let o = TRANSMIT_SECS_OFFSET;
        let secs = u32::from_be_bytes([packet[o], packet[o + 1], packet[o + 2], packet[o + 3]]);
        if secs == 0 {
            return Err(ClockError::InvalidResponse);
        }

        // Era 0 ends in 2036; timestamps below the Unix offset belong to era 1
        let unix = if secs >= UNIX_OFFSET_SECS {
            (secs - UNIX_OFFSET_SECS) as u64
        } else {
            secs as u64 + (1u64 << 32) - UNIX_OFFSET_SECS as u64
        };
        Ok(unix)
    }
}

/// Wall clock anchored at the last successful sync
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WallClock {
    /// Unix seconds reported by the last sync
    unix_at_sync: u64,
    /// Monotonic uptime when that sync completed (ms)
    synced_at_ms: u64,
}

impl WallClock {
    /// Anchor the clock at `unix_secs`, observed at uptime `now_ms`
    pub const fn new(unix_secs: u64, now_ms: u64) -> Self {
        Self {
            unix_at_sync: unix_secs,
            synced_at_ms: now_ms,
        }
    }

    /// Current Unix time extrapolated from uptime
    pub fn now_unix(&self, now_ms: u64) -> u64 {
        let elapsed_s = now_ms.saturating_sub(self.synced_at_ms) / 1000;
        self.unix_at_sync + elapsed_s
    }

    /// UTC time of day as (hours, minutes, seconds)
    pub fn time_of_day(&self, now_ms: u64) -> (u8, u8, u8) {
        let secs_in_day = self.now_unix(now_ms) % 86_400;
        (
            (secs_in_day / 3600) as u8,
            ((secs_in_day % 3600) / 60) as u8,
            (secs_in_day % 60) as u8,
        )
    }
}
