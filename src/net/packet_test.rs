#[cfg(test)]
use super::packet::{Packet,Opcode,TransferMode,Request};

#[cfg(test)]
fn parse_request(bytes: &[u8]) -> Request {
	match Packet::parse(bytes).expect("parse failed") {
		Packet::Request(req) => req,
		p => panic!("expected request, got {}",p)
	}
}

mod requests {
	use super::*;
	#[test]
	fn read_without_options() {
		let req = parse_request(b"\x00\x01GAME\x00octet\x00");
		assert_eq!(req.opcode,Opcode::ReadRequest);
		assert_eq!(req.filename,b"GAME".to_vec());
		assert_eq!(req.mode,TransferMode::Octet);
		assert_eq!(req.options.len(),0);
	}
	#[test]
	fn write_with_options() {
		let req = parse_request(b"\x00\x029/NEWFILE\x00NetASCII\x00blksize\x00512\x00tsize\x000\x00");
		assert_eq!(req.opcode,Opcode::WriteRequest);
		assert_eq!(req.filename,b"9/NEWFILE".to_vec());
		assert_eq!(req.mode,TransferMode::Netascii);
		assert_eq!(req.options,vec![
			("blksize".to_string(),"512".to_string()),
			("tsize".to_string(),"0".to_string())
		]);
	}
	#[test]
	fn mode_defaults() {
		let req = parse_request(b"\x00\x01$\x00");
		assert_eq!(req.filename,b"$".to_vec());
		assert_eq!(req.mode,TransferMode::Netascii);
	}
	#[test]
	fn malformed_options_dropped() {
		let req = parse_request(b"\x00\x01GAME\x00octet\x00blksize\x00");
		assert_eq!(req.mode,TransferMode::Octet);
		assert_eq!(req.options.len(),0);
		let req = parse_request(b"\x00\x01GAME\x00octet\x00blksize\x00256");
		assert_eq!(req.options.len(),0);
	}
	#[test]
	fn unterminated_name() {
		assert!(Packet::parse(b"\x00\x01GAME").is_err());
	}
}

mod transfers {
	use super::*;
	#[test]
	fn data_and_ack() {
		assert_eq!(Packet::parse(b"\x00\x03\x01\x02abc").expect("parse failed"),Packet::Data { block: 0x0102, payload: b"abc".to_vec() });
		assert_eq!(Packet::parse(b"\x00\x03\x00\x07").expect("parse failed"),Packet::Data { block: 7, payload: Vec::new() });
		assert_eq!(Packet::parse(b"\x00\x04\x00\x01").expect("parse failed"),Packet::Ack { block: 1 });
		assert!(Packet::parse(b"\x00\x04\x00").is_err());
		assert!(Packet::parse(b"\x00\x09\x00\x00").is_err());
		assert!(Packet::parse(b"\x00").is_err());
	}
	#[test]
	fn error_packet() {
		let err = Packet::Error { code: 1, message: "File not found".to_string() };
		assert_eq!(err.to_bytes(),b"\x00\x05\x00\x01File not found\x00".to_vec());
		assert_eq!(Packet::parse(b"\x00\x05\x00\x02oops").expect("parse failed"),Packet::Error { code: 2, message: "oops".to_string() });
	}
	#[test]
	fn option_ack_keeps_order() {
		let oack = Packet::OptionAck(vec![
			("tsize".to_string(),"0".to_string()),
			("blksize".to_string(),"512".to_string())
		]);
		let bytes = oack.to_bytes();
		assert_eq!(bytes,b"\x00\x06tsize\x000\x00blksize\x00512\x00".to_vec());
		assert_eq!(Packet::parse(&bytes).expect("parse failed"),oack);
	}
}
