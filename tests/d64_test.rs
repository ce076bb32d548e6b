// test of the D64 disk image and the read only file system on it
use c64iecd::img::DiskImage;
use c64iecd::img::d64::D64;
use c64iecd::fs::{Device,Mode,listing};
use c64iecd::fs::d64::Disk;
use c64iecd::fs::d64::types::{DirectoryEntry,BAM};
use a2kit_macro::DiskStruct;

const PRG: u8 = 0x82;
const SEQ: u8 = 0x81;

/// Program bytes with a load address, filled with a counting pattern
fn program(len: usize) -> Vec<u8> {
    let mut ans = vec![0x01,0x08];
    for i in 2..len {
        ans.push((i%251) as u8);
    }
    ans
}

/// Build a 35 track image holding the given files, data sectors are taken from track 1 onward.
fn build_image(files: &[(&[u8],u8,&[u8])]) -> D64 {
    let mut img = D64::create(35).expect("could not create image");
    let mut bam = BAM::new();
    bam.dir_track = 18;
    bam.dir_sector = 1;
    bam.dos_version = 0x41;
    for track in 1..=35 {
        bam.track_maps[4*(track-1)] = match track { 18 => 5, _ => 10 };
    }
    bam.label = [0xa0;16];
    bam.label[0..9].copy_from_slice(b"TEST DISK");
    bam.pad2 = [0xa0;2];
    bam.id = *b"AB";
    bam.pad3 = 0xa0;
    bam.dos_type = *b"2A";
    img.write_sector(18,0,&bam.to_bytes()).expect("write failed");

    let mut next = (1,0);
    let mut dir: Vec<u8> = Vec::new();
    for (name,typ,dat) in files {
        let mut entry = DirectoryEntry::new();
        entry.file_type = *typ;
        entry.track = next.0 as u8;
        entry.sector = next.1 as u8;
        entry.name = [0xa0;16];
        entry.name[0..name.len()].copy_from_slice(name);
        let chunks: Vec<&[u8]> = match dat.len() {
            0 => vec![&dat[0..0]],
            _ => dat.chunks(254).collect()
        };
        entry.blocks = u16::to_le_bytes(chunks.len() as u16);
        for (i,chunk) in chunks.iter().enumerate() {
            let this = next;
            next = match this.1 {
                20 => (this.0+1,0),
                s => (this.0,s+1)
            };
            let mut sec = match i+1==chunks.len() {
                true => vec![0,chunk.len() as u8 + 1],
                false => vec![next.0 as u8,next.1 as u8]
            };
            sec.extend_from_slice(chunk);
            img.write_sector(this.0,this.1,&sec).expect("write failed");
        }
        dir.append(&mut entry.to_bytes());
    }
    // directory sectors 1 and 4 on track 18
    let mut first = dir.clone();
    first.resize(256,0);
    if dir.len() > 256 {
        first[0] = 18;
        first[1] = 4;
        let mut second = dir[256..].to_vec();
        second.resize(256,0);
        second[1] = 0xff;
        img.write_sector(18,4,&second).expect("write failed");
    } else {
        first[1] = 0xff;
    }
    img.write_sector(18,1,&first).expect("write failed");
    img
}

fn read_all(disk: &mut Disk) -> Vec<u8> {
    let mut ans: Vec<u8> = Vec::new();
    while !disk.eof() {
        ans.append(&mut disk.read(256).expect("read failed"));
    }
    ans
}

#[test]
fn read_chains() {
    let small = program(100);
    let two = program(300);
    let exact = program(254);
    let files: Vec<(&[u8],u8,&[u8])> = vec![
        (&b"SMALL"[..],PRG,&small[..]),
        (&b"TWO SECTORS"[..],PRG,&two[..]),
        (&b"EXACT"[..],PRG,&exact[..])
    ];
    let mut disk = Disk::from_img(build_image(&files)).expect("bad image");
    for (name,_typ,dat) in &files {
        disk.open(name,Mode::Read).expect("open failed");
        assert_eq!(read_all(&mut disk),dat.to_vec());
        disk.close().expect("close failed");
    }
    assert!(disk.exists(b"TWO SECTORS"));
    assert!(disk.exists(b"TWO SECTORS\xa0\xa0"));
    assert!(!disk.exists(b"TWO"));
    assert!(disk.open(b"MISSING",Mode::Read).is_err());
}

#[test]
fn only_programs_match() {
    let text = b"HELLO".to_vec();
    let files: Vec<(&[u8],u8,&[u8])> = vec![(&b"NOTES"[..],SEQ,&text[..])];
    let mut disk = Disk::from_img(build_image(&files)).expect("bad image");
    assert!(!disk.exists(b"NOTES"));
    assert!(disk.open(b"NOTES",Mode::Read).is_err());
}

#[test]
fn write_protected() {
    let mut disk = Disk::from_img(build_image(&[])).expect("bad image");
    assert!(disk.open(b"NEWFILE",Mode::Write).is_err());
    assert!(disk.write(b"data").is_err());
    assert!(disk.open(b"$",Mode::Write).is_err());
}

#[test]
fn directory_listing() {
    let a = program(600);
    let b = b"SOME TEXT".to_vec();
    let files: Vec<(&[u8],u8,&[u8])> = vec![
        (&b"GAME"[..],PRG,&a[..]),
        (&b"NOTES"[..],SEQ,&b[..]),
        (&b"SPLAT"[..],0x02,&b[..]),
        (&b"LOCKED"[..],0xc2,&b[..]),
        (&b"ODD"[..],0x87,&b[..])
    ];
    let mut disk = Disk::from_img(build_image(&files)).expect("bad image");
    assert_eq!(disk.free_blocks(),340);
    assert!(disk.exists(b"$"));
    disk.open(b"$",Mode::Read).expect("open failed");
    let dat = read_all(&mut disk);
    let text = listing::detokenize(&dat).expect("bad listing");
    let expected = format!("0 \"TEST DISK       \" AB 2A
3    \"GAME\"{}PRG
1    \"NOTES\"{}SEQ
1    \"SPLAT\"{}*PRG
1    \"LOCKED\"{}PRG<
1    \"ODD\"{}???
340 BLOCKS FREE.
"," ".repeat(13)," ".repeat(12)," ".repeat(11)," ".repeat(11)," ".repeat(14));
    assert_eq!(text,expected);
}

#[test]
fn long_directory() {
    let dat = program(10);
    let names: Vec<String> = (0..12).map(|i| format!("FILE{}",i)).collect();
    let files: Vec<(&[u8],u8,&[u8])> = names.iter().map(|n| (n.as_bytes(),PRG,&dat[..])).collect();
    let mut disk = Disk::from_img(build_image(&files)).expect("bad image");
    assert_eq!(disk.entries().expect("bad directory").len(),16);
    disk.open(b"FILE11",Mode::Read).expect("open failed");
    assert_eq!(read_all(&mut disk),dat);
    let lines = listing::parse(&disk.directory().expect("no listing")).expect("bad listing");
    assert_eq!(lines.len(),14);
}

#[test]
fn damaged_chains() {
    let dat = program(300);
    let files: Vec<(&[u8],u8,&[u8])> = vec![(&b"LOOP"[..],PRG,&dat[..])];
    let mut img = build_image(&files);
    // second sector points back to the first
    let mut sec = img.read_sector(1,1).expect("read failed");
    sec[0] = 1;
    sec[1] = 0;
    img.write_sector(1,1,&sec).expect("write failed");
    let disk = Disk::from_img(img).expect("bad image");
    assert!(disk.read_file(b"LOOP").is_err());
    assert!(disk.read_chain(1,30).is_err());

    let mut img = build_image(&files);
    let mut dir = img.read_sector(18,1).expect("read failed");
    dir[0] = 18;
    dir[1] = 1;
    img.write_sector(18,1,&dir).expect("write failed");
    let mut disk = Disk::from_img(img).expect("bad image");
    assert!(disk.entries().is_err());
    assert!(disk.open(b"$",Mode::Read).is_err());
}

#[test]
fn image_sizes() {
    let dir = tempfile::tempdir().expect("could not create temporary directory");
    let path = dir.path().join("bad.d64");
    std::fs::write(&path,vec![0;1000]).expect("write failed");
    assert!(Disk::from_file(&path).is_err());
    let path = dir.path().join("errors.d64");
    let mut dat = build_image(&[]).to_bytes();
    dat.append(&mut vec![1;683]);
    std::fs::write(&path,&dat).expect("write failed");
    let mut disk = Disk::from_file(&path).expect("image with error bytes was refused");
    assert!(disk.exists(b"$"));
    assert_eq!(disk.free_blocks(),340);
}

#[test]
fn unformatted_image() {
    let mut disk = Disk::from_img(D64::create(35).expect("could not create image")).expect("bad image");
    assert_eq!(disk.free_blocks(),0);
    let dat = disk.directory().expect("no listing");
    assert_eq!(listing::parse(&dat).expect("bad listing").len(),2);
    let text = listing::detokenize(&dat).expect("bad listing");
    assert_eq!(text,format!("0 \"{}\" ?? ??\n0 BLOCKS FREE.\n","?".repeat(16)));
}
