#[cfg(test)]
use super::listing::{Listing,type_tag,parse,detokenize};
#[cfg(test)]
use super::FileType;

/// Listing of one 12 block program, built by hand
#[cfg(test)]
fn game_listing() -> Vec<u8> {
	let mut listing = Listing::new(b"DIRECTORY",b"");
	listing.add_entry(12,b"GAME",&type_tag(Some(FileType::Program),true,false));
	listing.finish(652)
}

mod layout {
	use super::*;
	#[test]
	fn header_and_footer() {
		let bytes = Listing::new(b"DIRECTORY",b"").finish(664);
		let expected = "0108\
			1208 0000 12 22 4449524543544F5259 22 00\
			2308 9802 424C4F434B5320465245452E 00\
			0000".replace(" ","");
		assert_eq!(hex::encode_upper(&bytes),expected);
	}
	#[test]
	fn entry_columns() {
		let bytes = game_listing();
		let lines = parse(&bytes).expect("parse failed");
		assert_eq!(lines.len(),3);
		assert_eq!(lines[1].number,12);
		let mut expected = b"  \"GAME\"".to_vec();
		expected.append(&mut vec![b' ';12]);
		expected.append(&mut b" PRG ".to_vec());
		assert_eq!(lines[1].text,expected);
		assert_eq!(lines[2].number,652);
		assert_eq!(lines[2].text,b"BLOCKS FREE.".to_vec());
	}
	#[test]
	fn indentation() {
		let mut listing = Listing::new(b"X",b"");
		listing.add_entry(5,b"A",b" PRG ");
		listing.add_entry(50,b"B",b" PRG ");
		listing.add_entry(500,b"C",b" PRG ");
		let lines = parse(&listing.finish(0)).expect("parse failed");
		assert!(lines[1].text.starts_with(b"   \"A"));
		assert!(lines[2].text.starts_with(b"  \"B"));
		assert!(lines[3].text.starts_with(b" \"C"));
	}
	#[test]
	fn links_increase() {
		let mut listing = Listing::new(b"DIRECTORY",b"");
		for i in 0..20 {
			listing.add_entry(i,format!("FILE{}",i).as_bytes(),b" PRG ");
		}
		let bytes = listing.finish(100);
		let lines = parse(&bytes).expect("parse failed");
		assert_eq!(lines.len(),22);
		let mut prev = 0x0801;
		for line in &lines {
			assert!(line.link > prev);
			prev = line.link;
		}
		assert_eq!(prev as usize,0x0801 + bytes.len() - 4);
		assert_eq!(bytes[bytes.len()-2..],[0,0]);
	}
	#[test]
	fn entries_stop_at_memory_limit() {
		let mut listing = Listing::new(b"DIRECTORY",b"");
		let mut added = 0;
		for i in 0..3000 {
			if listing.add_entry(500,format!("LONGFILENAME{:04}",i).as_bytes(),b" PRG ") {
				added += 1;
			}
		}
		assert!(added < 3000);
		assert_eq!(listing.entries(),added);
		assert!(!listing.add_entry(1,b"X",b" PRG "));
		let bytes = listing.finish(0);
		assert!(0x0801 + bytes.len() - 2 <= 0x10000);
		let lines = parse(&bytes).expect("parse failed");
		assert_eq!(lines.len(),added + 2);
		assert_eq!(lines[added+1].text,b"BLOCKS FREE.".to_vec());
	}
}

mod tags {
	use super::*;
	#[test]
	fn flags() {
		assert_eq!(&type_tag(Some(FileType::Program),true,false),b" PRG ");
		assert_eq!(&type_tag(Some(FileType::Sequential),false,false),b"*SEQ ");
		assert_eq!(&type_tag(Some(FileType::User),true,true),b" USR<");
		assert_eq!(&type_tag(None,true,false),b" ??? ");
	}
}

mod text {
	use super::*;
	#[test]
	fn detokenize_listing() {
		let expected = format!("0 \"DIRECTORY\"\n12   \"GAME\"{}PRG\n652 BLOCKS FREE.\n"," ".repeat(13));
		assert_eq!(detokenize(&game_listing()).expect("detokenize failed"),expected);
	}
	#[test]
	fn control_bytes_replaced() {
		let mut listing = Listing::new(&[0;16],&[b' ',0,0,b' ',0,0]);
		assert!(listing.add_entry(1,b"A\0B",&type_tag(Some(FileType::Program),true,false)));
		let bytes = listing.finish(0);
		let lines = parse(&bytes).expect("parse failed");
		assert_eq!(lines.len(),3);
		let text = detokenize(&bytes).expect("detokenize failed");
		assert!(text.starts_with(&format!("0 \"{}\" ?? ??\n","?".repeat(16))));
		assert!(text.contains("1    \"A?B\""));
	}
	#[test]
	fn broken_link() {
		let mut bytes = game_listing();
		bytes[2] = bytes[2].wrapping_add(1);
		assert!(parse(&bytes).is_err());
		assert!(parse(&bytes[0..10]).is_err());
	}
}
