//! ## Listener
//!
//! The server owns one UDP endpoint.  It waits for a request, connects the socket to the
//! requesting peer so datagrams from anyone else are filtered out, runs the session to the
//! end, then drops the socket and binds a fresh one on the same address.  Only one peer is
//! served at a time.

use std::net::{SocketAddr,UdpSocket};
use std::io::ErrorKind;
use std::time::Duration;
use log::{trace,debug,info,error};
use super::session::{Session,Settings,State,Transport,Wait};
use super::{Error,DEFAULT_PORT};
use crate::fs::registry::Registry;
use crate::{STDRESULT,DYNERR};

/// Large enough for any datagram, so oversized packets are never silently truncated
const RECV_BUFFER: usize = 65536;

#[derive(Clone,Debug)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    pub settings: Settings
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            settings: Settings::default()
        }
    }
}

/// Transport over a UDP socket that is connected to the peer
pub struct UdpTransport {
    socket: UdpSocket,
    buf: Vec<u8>
}

impl UdpTransport {
    pub fn new(socket: UdpSocket) -> Self {
        Self {
            socket,
            buf: vec![0;RECV_BUFFER]
        }
    }
}

impl Transport for UdpTransport {
    fn send(&mut self,dat: &[u8]) -> STDRESULT {
        self.socket.send(dat)?;
        Ok(())
    }
    fn wait(&mut self,timeout: Duration) -> Result<Wait,DYNERR> {
        self.socket.set_read_timeout(Some(timeout))?;
        match self.socket.recv(&mut self.buf) {
            Ok(n) => Ok(Wait::Packet(self.buf[0..n].to_vec())),
            Err(e) => match e.kind() {
                ErrorKind::WouldBlock | ErrorKind::TimedOut => Ok(Wait::TimedOut),
                // an earlier send was refused by the peer, keep waiting until the budget is spent
                ErrorKind::ConnectionRefused => {
                    std::thread::sleep(timeout);
                    Ok(Wait::TimedOut)
                },
                _ => Err(Box::new(e))
            }
        }
    }
}

pub struct Server {
    config: ServerConfig,
    registry: Registry,
    addr: SocketAddr,
    socket: Option<UdpSocket>
}

impl Server {
    /// Bind the endpoint.  With port 0 the system picks a port, which is then kept across rebinds.
    pub fn bind(config: ServerConfig,registry: Registry) -> Result<Self,DYNERR> {
        let socket = UdpSocket::bind((config.bind.as_str(),config.port))?;
        let addr = socket.local_addr()?;
        info!("listening on {}, units {:?}",addr,registry.units());
        Ok(Self {
            config,
            registry,
            addr,
            socket: Some(socket)
        })
    }
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
    /// Wait for one request and serve it.  The endpoint is rebound before returning.
    pub fn serve_once(&mut self) -> Result<State,DYNERR> {
        let socket = match self.socket.take() {
            Some(s) => s,
            None => return Err(Box::new(Error::NotBound))
        };
        socket.set_read_timeout(None)?;
        let mut buf = vec![0;RECV_BUFFER];
        let (n,peer) = match socket.recv_from(&mut buf) {
            Ok(ans) => ans,
            Err(e) => {
                self.socket = Some(socket);
                return Err(Box::new(e));
            }
        };
        trace!("{} bytes from {}",n,peer);
        if let Err(e) = socket.connect(peer) {
            self.socket = Some(socket);
            return Err(Box::new(e));
        }
        let mut transport = UdpTransport::new(socket);
        let state = Session::new(&self.registry,&mut transport,self.config.settings).run(&buf[0..n]);
        debug!("session with {} ended {:?}",peer,state);
        drop(transport);
        self.socket = Some(UdpSocket::bind(self.addr)?);
        Ok(state)
    }
    /// Serve requests until the endpoint cannot be rebound.
    pub fn run(&mut self) -> STDRESULT {
        loop {
            if let Err(e) = self.serve_once() {
                if self.socket.is_none() {
                    error!("cannot rebind {}: {}",self.addr,e);
                    return Err(e);
                }
                error!("receive failed: {}",e);
            }
        }
    }
}
