use std::io;
use std::net::{self, UdpSocket};
use std::time::Duration;

use socket2::{Domain, Protocol, Socket, Type};

pub fn new_server(port: u16) -> io::Result<UdpSocket> {
    let sock = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;
    sock.set_reuse_address(true)?;
    let local_addr = net::SocketAddr::from(([0, 0, 0, 0], port));
    sock.bind(&local_addr.into())?;
    Ok(sock.into())
}

pub fn new_client(timeout: Duration) -> io::Result<UdpSocket> {
    let sock = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;
    sock.set_read_timeout(Some(timeout))?;
    let local_addr = net::SocketAddr::from(([0, 0, 0, 0], 0));
    sock.bind(&local_addr.into())?;
    Ok(sock.into())
}
