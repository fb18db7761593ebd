//! SNTP time source
//!
//! One `poll` is one request/response exchange with the current server. The
//! host name is resolved on the first poll after `begin` and reused for the
//! remaining polls of that server.

use core::net::{IpAddr, SocketAddr, SocketAddrV4};

use defmt::*;
use embassy_net::dns::DnsQueryType;
use embassy_net::udp::{PacketMetadata, UdpSocket};
use embassy_net::{IpAddress, IpEndpoint, Stack};
use embassy_time::{with_timeout, Duration};
use heapless::String;
use sntpc::{NtpContext, NtpTimestampGenerator, NtpUdpSocket};

use meridian_core::config::MAX_SERVER_LEN;
use meridian_core::traits::TimeSource;

use crate::clock::SystemClock;

const NTP_PORT: u16 = 123;
const NTP_PACKET_SIZE: usize = 48;
const DNS_TIMEOUT: Duration = Duration::from_secs(3);
const EXCHANGE_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum NtpError {
    /// Host name did not resolve
    Dns,
    /// UDP socket could not be bound
    Socket,
    /// Malformed or rejected reply
    Protocol,
    /// No answer in time
    Timeout,
}

/// SNTP client that sets the [`SystemClock`]
pub struct NtpSource {
    stack: Stack<'static>,
    clock: &'static SystemClock,
    server: String<MAX_SERVER_LEN>,
    address: Option<IpAddr>,
}

impl NtpSource {
    pub fn new(stack: Stack<'static>, clock: &'static SystemClock) -> Self {
        Self {
            stack,
            clock,
            server: String::new(),
            address: None,
        }
    }

    async fn resolve(&mut self) -> Result<IpAddr, NtpError> {
        if let Some(address) = self.address {
            return Ok(address);
        }

        let addresses = with_timeout(
            DNS_TIMEOUT,
            self.stack.dns_query(self.server.as_str(), DnsQueryType::A),
        )
        .await
        .map_err(|_| NtpError::Timeout)?
        .map_err(|_| NtpError::Dns)?;

        let address: IpAddr = (*addresses.first().ok_or(NtpError::Dns)?).into();
        debug!("{} resolved", self.server.as_str());
        self.address = Some(address);
        Ok(address)
    }

    /// One exchange; returns the server's Unix time in milliseconds
    async fn exchange(&mut self) -> Result<i64, NtpError> {
        let address = self.resolve().await?;

        let mut rx_meta = [PacketMetadata::EMPTY; 1];
        let mut rx_buffer = [0u8; NTP_PACKET_SIZE];
        let mut tx_meta = [PacketMetadata::EMPTY; 1];
        let mut tx_buffer = [0u8; NTP_PACKET_SIZE];
        let mut socket = UdpSocket::new(
            self.stack,
            &mut rx_meta,
            &mut rx_buffer,
            &mut tx_meta,
            &mut tx_buffer,
        );
        socket.bind(0).map_err(|_| NtpError::Socket)?;

        let context = NtpContext::new(Stamp::now(self.clock));
        let reply = with_timeout(
            EXCHANGE_TIMEOUT,
            sntpc::get_time(
                SocketAddr::new(address, NTP_PORT),
                &Socket(socket),
                context,
            ),
        )
        .await
        .map_err(|_| NtpError::Timeout)?
        .map_err(|_| NtpError::Protocol)?;

        let fraction_ms = (u64::from(reply.sec_fraction()) * 1_000) >> 32;
        Ok(i64::from(reply.sec()) * 1_000 + fraction_ms as i64)
    }
}

impl TimeSource for NtpSource {
    async fn begin(&mut self, server: &str) {
        self.server = String::try_from(server).unwrap_or_default();
        self.address = None;
        info!("Syncing time from {}", self.server.as_str());
    }

    async fn poll(&mut self) -> bool {
        match self.exchange().await {
            Ok(unix_ms) => {
                self.clock.set_unix_ms(unix_ms);
                info!("Clock set from {} (unix {} s)", self.server.as_str(), unix_ms / 1_000);
                true
            }
            Err(e) => {
                debug!("NTP exchange with {} failed: {:?}", self.server.as_str(), e);
                false
            }
        }
    }
}

/// Local transmit timestamps for the request
#[derive(Clone, Copy)]
struct Stamp {
    unix_us: u64,
}

impl Stamp {
    fn now(clock: &SystemClock) -> Self {
        let unix_ms = clock
            .unix_ms()
            .unwrap_or_else(|| embassy_time::Instant::now().as_millis() as i64);
        Self {
            unix_us: unix_ms.max(0) as u64 * 1_000,
        }
    }
}

impl NtpTimestampGenerator for Stamp {
    fn init(&mut self) {}

    fn timestamp_sec(&self) -> u64 {
        self.unix_us / 1_000_000
    }

    fn timestamp_subsec_micros(&self) -> u32 {
        (self.unix_us % 1_000_000) as u32
    }
}

/// embassy-net UDP socket as seen by sntpc (IPv4 only)
struct Socket<'a>(UdpSocket<'a>);

impl NtpUdpSocket for Socket<'_> {
    async fn send_to(&self, buf: &[u8], addr: SocketAddr) -> Result<usize, sntpc::Error> {
        let SocketAddr::V4(addr) = addr else {
            return Err(sntpc::Error::Network);
        };
        let endpoint = IpEndpoint::new(IpAddress::Ipv4(*addr.ip()), addr.port());
        self.0
            .send_to(buf, endpoint)
            .await
            .map_err(|_| sntpc::Error::Network)?;
        Ok(buf.len())
    }

    async fn recv_from(&self, buf: &mut [u8]) -> Result<(usize, SocketAddr), sntpc::Error> {
        let (len, meta) = self
            .0
            .recv_from(buf)
            .await
            .map_err(|_| sntpc::Error::Network)?;
        #[allow(unreachable_patterns)]
        match meta.endpoint.addr {
            IpAddress::Ipv4(ip) => {
                Ok((len, SocketAddr::V4(SocketAddrV4::new(ip, meta.endpoint.port))))
            }
            _ => Err(sntpc::Error::Network),
        }
    }
}
