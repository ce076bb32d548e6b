//! ## Session engine
//!
//! One session serves one request, from the first datagram to the last acknowledgment.
//! The engine is a state machine driven by packets from a `Transport`, so it can be run
//! over a UDP socket or over a scripted exchange in tests.
//!
//! Sending a file, block numbers start at 1 and every block waits for its ACK.  A block
//! shorter than the block size is the last.  If the file ends exactly on a block boundary
//! an empty block follows, so the peer can always detect the end by a short block.
//!
//! Waiting for the peer polls the transport for a fixed interval.  On each timeout the last
//! packet is sent again, after the allowed number of timeouts the session is dropped without
//! an error packet.

use std::time::Duration;
use log::{trace,debug,info,warn,error};
use super::packet::{Packet,Request,Opcode,ERR_FILE_NOT_FOUND,ERR_NOT_DEFINED,MSG_FILE_NOT_FOUND};
use super::DEFAULT_BLOCK_SIZE;
use crate::fs::{Device,Mode,names};
use crate::fs::registry::Registry;
use crate::{STDRESULT,DYNERR};

/// Result of waiting on a transport
pub enum Wait {
    Packet(Vec<u8>),
    TimedOut
}

/// Carries datagrams between the session and one peer
pub trait Transport {
    fn send(&mut self,dat: &[u8]) -> STDRESULT;
    /// Wait up to `timeout` for the next datagram from the peer.
    fn wait(&mut self,timeout: Duration) -> Result<Wait,DYNERR>;
}

#[derive(PartialEq,Eq,Clone,Copy,Debug)]
pub enum State {
    /// nothing has been accepted yet, also the outcome when the first datagram is not a request
    AwaitingRequest,
    /// options were acknowledged, waiting for the peer to start
    Negotiating,
    Transferring,
    Finished,
    /// an error packet was sent or received, or the peer broke protocol
    Errored,
    /// the peer went silent
    Aborted
}

/// Timing and sizing of a session
#[derive(Clone,Copy,Debug)]
pub struct Settings {
    pub block_size: usize,
    /// duration of one wait
    pub poll: Duration,
    /// consecutive timeouts before the session is dropped
    pub max_timeouts: usize
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            poll: Duration::from_secs(1),
            max_timeouts: 5
        }
    }
}

pub struct Session<'a> {
    registry: &'a Registry,
    transport: &'a mut dyn Transport,
    settings: Settings,
    state: State,
    device: Option<Box<dyn Device>>,
    mode: Mode,
    unit: u16,
    name: Vec<u8>,
    /// number of the last block sent or accepted
    block: u16,
    /// the last block sent was the final one
    terminal: bool,
    /// the last block sent was full and the file is done, an empty block follows
    send_empty: bool,
    last_packet: Vec<u8>,
    bytes: usize
}

impl <'a> Session<'a> {
    pub fn new(registry: &'a Registry,transport: &'a mut dyn Transport,settings: Settings) -> Self {
        Self {
            registry,
            transport,
            settings,
            state: State::AwaitingRequest,
            device: None,
            mode: Mode::Read,
            unit: names::DEFAULT_UNIT,
            name: Vec::new(),
            block: 0,
            terminal: false,
            send_empty: false,
            last_packet: Vec::new(),
            bytes: 0
        }
    }
    pub fn state(&self) -> State {
        self.state
    }
    /// Bytes of payload moved so far
    pub fn bytes(&self) -> usize {
        self.bytes
    }
    /// Run the session to completion, starting from the datagram that opened it.
    pub fn run(&mut self,first: &[u8]) -> State {
        match Packet::parse(first) {
            Ok(Packet::Request(req)) => self.request(req),
            Ok(pkt) => {
                debug!("ignoring {} outside of a session",pkt);
                return self.state;
            },
            Err(e) => {
                debug!("ignoring datagram: {}",e);
                return self.state;
            }
        }
        while self.state==State::Negotiating || self.state==State::Transferring {
            match self.wait_for_peer() {
                Some(dat) => self.dispatch(&dat),
                None => {
                    warn!("peer is silent after {} timeouts, dropping session",self.settings.max_timeouts);
                    self.state = State::Aborted;
                }
            }
        }
        if let Some(device) = self.device.as_mut() {
            if let Err(e) = device.close() {
                error!("could not close {}: {}",crate::escaped_ascii_from_bytes(&self.name),e);
            }
        }
        info!("session for unit {} file {} ended {:?} after {} bytes",self.unit,crate::escaped_ascii_from_bytes(&self.name),self.state,self.bytes);
        self.state
    }
    fn send(&mut self,pkt: Packet) {
        trace!("send {}",pkt);
        self.last_packet = pkt.to_bytes();
        if let Err(e) = self.transport.send(&self.last_packet) {
            error!("send failed: {}",e);
            self.state = State::Aborted;
        }
    }
    fn send_error(&mut self,code: u16,msg: &str) {
        self.send(Packet::Error { code, message: msg.to_string() });
        if self.state!=State::Aborted {
            self.state = State::Errored;
        }
    }
    fn open(&mut self,req: &Request) -> STDRESULT {
        if req.opcode==Opcode::WriteRequest {
            if let Some(spec) = self.registry.get(self.unit) {
                if spec.read_only {
                    warn!("unit {} is read only",self.unit);
                    return Err(Box::new(crate::fs::Error::WriteProtected));
                }
            }
        }
        let mut device = self.registry.mount(self.unit)?;
        device.open(&self.name,self.mode)?;
        self.device = Some(device);
        Ok(())
    }
    fn request(&mut self,req: Request) {
        let (unit,rest) = names::split_unit_prefix(&req.filename);
        self.unit = unit;
        self.name = names::decode(rest);
        self.mode = match req.opcode {
            Opcode::WriteRequest => Mode::Write,
            _ => Mode::Read
        };
        info!("{} unit {} file {} mode {:?}",req.opcode,self.unit,crate::escaped_ascii_from_bytes(&self.name),req.mode);
        self.state = State::Negotiating;
        if let Err(e) = self.open(&req) {
            warn!("cannot open {}: {}",crate::escaped_ascii_from_bytes(&self.name),e);
            self.send_error(ERR_FILE_NOT_FOUND,MSG_FILE_NOT_FOUND);
            return;
        }
        if req.options.len() > 0 {
            // options are echoed, the block size stays fixed
            debug!("acknowledge options {:?}",req.options);
            self.send(Packet::OptionAck(req.options.clone()));
            // a write proceeds with DATA 1, a read waits for ACK 0
            if self.mode==Mode::Write && self.state!=State::Aborted {
                self.state = State::Transferring;
            }
            return;
        }
        match self.mode {
            Mode::Read => self.send_data(),
            Mode::Write => {
                self.send(Packet::Ack { block: 0 });
                if self.state!=State::Aborted {
                    self.state = State::Transferring;
                }
            }
        }
    }
    /// Send the next block of the file
    fn send_data(&mut self) {
        self.block = self.block.wrapping_add(1);
        let payload = match self.send_empty {
            true => {
                self.send_empty = false;
                self.terminal = true;
                Vec::new()
            },
            false => {
                let device = match self.device.as_mut() {
                    Some(d) => d,
                    None => {
                        self.send_error(ERR_NOT_DEFINED,"no open file");
                        return;
                    }
                };
                let dat = match device.read(self.settings.block_size) {
                    Ok(d) => d,
                    Err(e) => {
                        error!("read failed: {}",e);
                        self.send_error(ERR_NOT_DEFINED,&e.to_string());
                        return;
                    }
                };
                if dat.len() < self.settings.block_size {
                    self.terminal = true;
                } else if device.eof() {
                    self.send_empty = true;
                }
                dat
            }
        };
        self.bytes += payload.len();
        self.send(Packet::Data { block: self.block, payload });
        if self.state!=State::Aborted {
            self.state = State::Transferring;
        }
    }
    fn finish(&mut self) {
        if let Some(device) = self.device.as_mut() {
            if let Err(e) = device.close() {
                error!("close failed: {}",e);
                self.send_error(ERR_NOT_DEFINED,&e.to_string());
                return;
            }
        }
        self.device = None;
        self.state = State::Finished;
    }
    fn dispatch(&mut self,dat: &[u8]) {
        let pkt = match Packet::parse(dat) {
            Ok(p) => p,
            Err(e) => {
                warn!("bad packet during transfer: {}",e);
                self.state = State::Errored;
                return;
            }
        };
        trace!("recv {}",pkt);
        match (pkt,self.mode) {
            (Packet::Ack { block },Mode::Read) => {
                if block!=self.block {
                    debug!("ignoring stale ACK {} while at {}",block,self.block);
                } else if self.terminal {
                    self.finish();
                } else {
                    self.send_data();
                }
            },
            (Packet::Data { block, payload },Mode::Write) => {
                if block!=self.block.wrapping_add(1) {
                    debug!("DATA {} is not the next block, acknowledge {} again",block,self.block);
                    self.send(Packet::Ack { block: self.block });
                    return;
                }
                if let Some(device) = self.device.as_mut() {
                    if let Err(e) = device.write(&payload) {
                        error!("write failed: {}",e);
                        self.send_error(ERR_NOT_DEFINED,&e.to_string());
                        return;
                    }
                }
                self.block = block;
                self.bytes += payload.len();
                self.send(Packet::Ack { block });
                if payload.len() < self.settings.block_size && self.state!=State::Aborted {
                    self.finish();
                }
            },
            (Packet::Error { code, message },_) => {
                warn!("peer reports error {}: {}",code,message);
                self.state = State::Errored;
            },
            (pkt,_) => {
                warn!("unexpected {} during transfer",pkt.opcode());
                self.state = State::Errored;
            }
        }
    }
    /// Wait for the next datagram, sending the last packet again after each timeout.
    fn wait_for_peer(&mut self) -> Option<Vec<u8>> {
        for count in 1..=self.settings.max_timeouts {
            match self.transport.wait(self.settings.poll) {
                Ok(Wait::Packet(dat)) => return Some(dat),
                Ok(Wait::TimedOut) => {
                    debug!("timeout {} of {}",count,self.settings.max_timeouts);
                    if count < self.settings.max_timeouts {
                        trace!("retransmit {} bytes",self.last_packet.len());
                        if let Err(e) = self.transport.send(&self.last_packet) {
                            error!("retransmit failed: {}",e);
                            return None;
                        }
                    }
                },
                Err(e) => {
                    error!("transport failed: {}",e);
                    return None;
                }
            }
        }
        None
    }
}
