//! weatherapi.com client over reqwless HTTPS

use defmt::*;
use embassy_net::dns::DnsSocket;
use embassy_net::tcp::client::{TcpClient, TcpClientState};
use embassy_net::Stack;
use reqwless::client::{HttpClient, TlsConfig, TlsVerify};
use reqwless::request::Method;

use thermoportal_core::traits::{WeatherError, WeatherSource};
use thermoportal_core::weather::{parse_reply, CurrentConditions, WeatherQuery};

/// TLS record buffer size (max fragment plus overhead)
pub const TLS_BUFFER_LEN: usize = 16_640;

/// HTTP response buffer; the current.json body is well under this
pub const RESPONSE_BUFFER_LEN: usize = 8_192;

/// Buffers that must outlive every request
pub struct HttpsBuffers {
    pub tls_read: [u8; TLS_BUFFER_LEN],
    pub tls_write: [u8; TLS_BUFFER_LEN],
    pub response: [u8; RESPONSE_BUFFER_LEN],
    pub tcp: TcpClientState<1, 1024, 1024>,
}

impl HttpsBuffers {
    pub const fn new() -> Self {
        Self {
            tls_read: [0; TLS_BUFFER_LEN],
            tls_write: [0; TLS_BUFFER_LEN],
            response: [0; RESPONSE_BUFFER_LEN],
            tcp: TcpClientState::new(),
        }
    }
}

/// Fetches current conditions for the configured location
pub struct HttpsWeather {
    stack: Stack<'static>,
    buffers: &'static mut HttpsBuffers,
    api_key: &'static str,
    seed: u64,
}

impl HttpsWeather {
    pub fn new(
        stack: Stack<'static>,
        buffers: &'static mut HttpsBuffers,
        api_key: &'static str,
        seed: u64,
    ) -> Self {
        Self {
            stack,
            buffers,
            api_key,
            seed,
        }
    }
}

impl WeatherSource for HttpsWeather {
    async fn fetch_current(&mut self) -> Result<CurrentConditions, WeatherError> {
        let url = WeatherQuery::default().url(self.api_key)?;

        let HttpsBuffers {
            tls_read,
            tls_write,
            response,
            tcp,
        } = &mut *self.buffers;

        // Fresh TLS seed per request
        self.seed = self.seed.wrapping_mul(6364136223846793005).wrapping_add(1);

        let tcp_client = TcpClient::new(self.stack, &*tcp);
        let dns = DnsSocket::new(self.stack);
        let tls = TlsConfig::new(self.seed, tls_read, tls_write, TlsVerify::None);
        let mut client = HttpClient::new_with_tls(&tcp_client, &dns, tls);

        let mut request = client.request(Method::GET, &url).await.map_err(|e| {
            warn!("Weather: connect failed: {}", e);
            WeatherError::Transport
        })?;
        let reply = request.send(response).await.map_err(|e| {
            warn!("Weather: request failed: {}", e);
            WeatherError::Transport
        })?;

        let status = reply.status.0;
        let body = reply.body().read_to_end().await.map_err(|e| {
            warn!("Weather: reading body failed: {}", e);
            WeatherError::Transport
        })?;

        parse_reply(status, body)
    }
}
