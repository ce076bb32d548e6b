#[cfg(test)]
use super::names;

mod wire_names {
	use super::names;
	#[test]
	fn percent_escapes() {
		assert_eq!(names::decode(b"HELLO%20WORLD"),b"HELLO WORLD".to_vec());
		assert_eq!(names::decode(b"%c1%C1"),vec![0xc1,0xc1]);
		assert_eq!(names::decode(b"100%"),b"100%".to_vec());
		assert_eq!(names::decode(b"%G1"),b"%G1".to_vec());
	}
	#[test]
	fn drive_prefix() {
		assert_eq!(names::decode(b"@0:GAME"),b"GAME".to_vec());
		assert_eq!(names::decode(b"%400:GAME"),b"GAME".to_vec());
		assert_eq!(names::decode(b"X@0:GAME"),b"X@0:GAME".to_vec());
	}
	#[test]
	fn encode_inverts_decode() {
		let native: Vec<u8> = vec![b'A',0xa0,b'%',b'/',b':',0x00,b'Z'];
		let wire = names::encode(&native);
		assert!(wire.iter().all(|b| *b>=0x20 && *b<0x7f));
		assert_eq!(names::decode(&wire),native);
		assert_eq!(names::encode(b"@0:X"),b"%400%3AX".to_vec());
	}
}

mod units {
	use super::names;
	#[test]
	fn prefix() {
		assert_eq!(names::split_unit_prefix(b"9/GAME"),(9,&b"GAME"[..]));
		assert_eq!(names::split_unit_prefix(b"10/$"),(10,&b"$"[..]));
		assert_eq!(names::split_unit_prefix(b"9/A/B"),(9,&b"A/B"[..]));
	}
	#[test]
	fn no_prefix() {
		assert_eq!(names::split_unit_prefix(b"GAME"),(8,&b"GAME"[..]));
		assert_eq!(names::split_unit_prefix(b"/GAME"),(8,&b"/GAME"[..]));
		assert_eq!(names::split_unit_prefix(b"A9/GAME"),(8,&b"A9/GAME"[..]));
	}
	#[test]
	fn overflow() {
		assert_eq!(names::split_unit_prefix(b"99999999/GAME"),(8,&b"99999999/GAME"[..]));
	}
}

mod local_names {
	use super::names;
	#[test]
	fn sanitize() {
		assert_eq!(names::local_stem(b"My Game!"),"mygame");
		assert_eq!(names::local_stem(b"V1.2-BETA_X"),"v1.2-beta_x");
		assert_eq!(names::local_stem(&[0xc1,0xa0]),"_");
	}
	#[test]
	fn allocate() {
		let dir = tempfile::tempdir().expect("could not create temporary directory");
		assert_eq!(names::to_local_name(b"NEWFILE",dir.path()),Some("newfile.p00".to_string()));
		std::fs::write(dir.path().join("newfile.p00"),b"").expect("write failed");
		assert_eq!(names::to_local_name(b"NEWFILE",dir.path()),Some("newfile.p01".to_string()));
	}
	#[test]
	fn exhausted() {
		let dir = tempfile::tempdir().expect("could not create temporary directory");
		for i in 0..100 {
			std::fs::write(dir.path().join(format!("full.p{:02}",i)),b"").expect("write failed");
		}
		assert_eq!(names::to_local_name(b"FULL",dir.path()),None);
	}
	#[test]
	fn padding() {
		let (trimmed,pad) = names::strip_padding(b"GAME\xa0\xa0\x00 ");
		assert_eq!(trimmed,b"GAME");
		assert_eq!(pad,vec![0x20;12]);
		let (trimmed,pad) = names::strip_padding(b"ABCDEFGHIJKLMNOPQ");
		assert_eq!(trimmed.len(),17);
		assert_eq!(pad.len(),0);
		assert_eq!(names::truncate(b"ABCDEFGHIJKLMNOPQ"),b"ABCDEFGHIJKLMNOP");
	}
}
