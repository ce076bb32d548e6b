// test of the server over loopback UDP
use std::net::UdpSocket;
use std::time::Duration;
use c64iecd::fs::DeviceKind;
use c64iecd::fs::registry::{DeviceSpec,Registry};
use c64iecd::net::packet::{Packet,Request,Opcode,TransferMode};
use c64iecd::net::server::{Server,ServerConfig};
use c64iecd::net::session::State;

fn exchange(client: &UdpSocket,pkt: &Packet) -> Packet {
    client.send(&pkt.to_bytes()).expect("send failed");
    let mut buf = vec![0;1024];
    let n = client.recv(&mut buf).expect("no reply");
    Packet::parse(&buf[0..n]).expect("bad reply")
}

#[test]
fn write_then_read_back() {
    let dir = tempfile::tempdir().expect("no temporary directory");
    let registry = Registry::from_specs(vec![DeviceSpec::new(8,DeviceKind::Folder,dir.path().join("8"),false)]);
    let mut config = ServerConfig::default();
    config.bind = "127.0.0.1".to_string();
    config.port = 0;
    config.settings.poll = Duration::from_millis(200);
    let mut server = Server::bind(config,registry).expect("could not bind");
    let addr = server.local_addr();
    assert_ne!(addr.port(),0);
    let handle = std::thread::spawn(move || {
        let first = server.serve_once().expect("first session failed");
        let second = server.serve_once().expect("second session failed");
        (first,second,server.local_addr())
    });

    let client = UdpSocket::bind("127.0.0.1:0").expect("client could not bind");
    client.set_read_timeout(Some(Duration::from_secs(5))).expect("could not set timeout");
    client.connect(addr).expect("could not connect");
    let wrq = Packet::Request(Request {
        opcode: Opcode::WriteRequest,
        filename: b"8/HELLO".to_vec(),
        mode: TransferMode::Octet,
        options: Vec::new()
    });
    assert_eq!(exchange(&client,&wrq),Packet::Ack { block: 0 });
    let payload = b"HELLO WORLD".to_vec();
    assert_eq!(exchange(&client,&Packet::Data { block: 1, payload: payload.clone() }),Packet::Ack { block: 1 });

    // the server rebinds between sessions, give it a moment
    std::thread::sleep(Duration::from_millis(100));
    let rrq = Packet::Request(Request {
        opcode: Opcode::ReadRequest,
        filename: b"HELLO".to_vec(),
        mode: TransferMode::Netascii,
        options: Vec::new()
    });
    assert_eq!(exchange(&client,&rrq),Packet::Data { block: 1, payload });
    client.send(&Packet::Ack { block: 1 }.to_bytes()).expect("send failed");

    let (first,second,rebound) = handle.join().expect("server thread panicked");
    assert_eq!(first,State::Finished);
    assert_eq!(second,State::Finished);
    assert_eq!(rebound,addr);
}
