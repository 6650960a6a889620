use std::fmt;
use std::io;
use std::net::{SocketAddr, UdpSocket};
use std::time::Duration;

use log::{error, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::sock;

/// Largest payload a single UDP datagram can carry over IPv4.
pub const MAX_DATAGRAM: usize = 65507;

#[derive(Debug)]
pub enum RpcError {
    IOError(io::Error),
    JsonError(serde_json::Error),
    Timeout,
}

impl From<io::Error> for RpcError {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => RpcError::Timeout,
            _ => RpcError::IOError(e),
        }
    }
}

impl From<serde_json::Error> for RpcError {
    fn from(e: serde_json::Error) -> Self {
        RpcError::JsonError(e)
    }
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RpcError::IOError(e) => write!(f, "socket error: {}", e),
            RpcError::JsonError(e) => write!(f, "malformed reply: {}", e),
            RpcError::Timeout => write!(f, "no reply before timeout"),
        }
    }
}

impl std::error::Error for RpcError {}

/// Answers JSON requests arriving on a UDP port, one reply datagram per
/// request, sent back to the requesting address.
pub struct Server {
    socket: UdpSocket,
}

impl Server {
    pub fn bind(port: u16) -> io::Result<Self> {
        Ok(Server {
            socket: sock::new_server(port)?,
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Blocks forever. Requests that fail to parse are still passed to
    /// `handler` so it can answer with an error of its own.
    pub fn serve<Req, Resp, F>(self, mut handler: F) -> io::Result<()>
    where
        Req: DeserializeOwned,
        Resp: Serialize,
        F: FnMut(Result<Req, serde_json::Error>) -> Resp,
    {
        let mut buf = vec![0; MAX_DATAGRAM];

        loop {
            let (n, src) = match self.socket.recv_from(&mut buf) {
                Ok(received) => received,
                Err(e) => {
                    warn!("Unable to receive packet, {}", e);
                    continue;
                }
            };
            let request = serde_json::from_slice::<Req>(&buf[..n]);
            if let Err(e) = &request {
                warn!("Received bad package from {} got error: {}", src, e);
            }
            let response = handler(request);
            match serde_json::to_vec(&response) {
                Ok(serialized) => {
                    if let Err(e) = self.socket.send_to(&serialized, src) {
                        warn!("Unable to send packet, {}", e);
                    }
                }
                Err(e) => error!("Unable to serialize reply, {}", e),
            }
        }
    }
}

/// Sends `request` to `addr` and waits up to `timeout` for the reply.
pub fn call<Req, Resp>(addr: SocketAddr, request: &Req, timeout: Duration) -> Result<Resp, RpcError>
where
    Req: Serialize,
    Resp: DeserializeOwned,
{
    let s = sock::new_client(timeout)?;
    let serialized = serde_json::to_vec(request)?;
    s.send_to(&serialized, addr)?;

    let mut buf = vec![0; MAX_DATAGRAM];
    let n = s.recv(&mut buf)?;
    Ok(serde_json::from_slice(&buf[..n])?)
}
