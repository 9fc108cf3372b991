use std::io::{Cursor, Read, Seek, Write};

use flate2::{write::GzEncoder, Compression};
use minenbt::Tag;

use super::Builder;
use crate::{
    ChunkLocation,
    CompressionScheme::{Gzip, Uncompressed},
    Error, Region, CHUNK_HEADER_SIZE, CHUNK_INFLATE_LIMIT, REGION_HEADER_SIZE, SECTOR_SIZE,
};

fn new_empty() -> Region<Cursor<Vec<u8>>> {
    Region::new(Cursor::new(vec![])).unwrap()
}

fn assert_location<S>(r: &mut Region<S>, x: usize, z: usize, offset: u64, size: u64)
where
    S: Read + Write + Seek,
{
    let ChunkLocation {
        offset: found_offset,
        sectors: found_size,
    } = r.location(x, z).unwrap().unwrap();

    assert_eq!(offset, found_offset);
    assert_eq!(size, found_size);
}

fn n_sector_chunk(n: usize) -> Vec<u8> {
    assert!(n > 0);
    vec![0; (n * SECTOR_SIZE) - CHUNK_HEADER_SIZE]
}

fn small_tree() -> Tag {
    let mut level = Tag::compound("Level");
    level.add_child(Tag::new("xPos", 1i32)).unwrap();
    let mut root = Tag::compound("");
    root.add_child(level).unwrap();
    root
}

#[test]
fn new_region_should_be_empty() {
    let mut r = new_empty();

    for x in 0..32 {
        for z in 0..32 {
            assert!(matches!(r.read_chunk(x, z), Ok(None)));
        }
    }
}

#[test]
fn invalid_offset() {
    let mut r = new_empty();
    assert!(matches!(r.read_chunk(32, 32), Err(Error::InvalidOffset(32, 32))));
    assert!(matches!(r.read_chunk(32, 0), Err(Error::InvalidOffset(32, 0))));
    assert!(matches!(r.read_chunk(0, 32), Err(Error::InvalidOffset(0, 32))));
}

#[test]
fn offset_beyond_data_given() {
    let r = Builder::new().location(2, 1).build_unpadded();
    match Region::from_stream(r) {
        Err(Error::IO(inner)) if inner.kind() == std::io::ErrorKind::UnexpectedEof => {}
        Err(e) => panic!("wrong error {:?}", e),
        Ok(_) => panic!("should error"),
    }
}

#[test]
fn first_location() {
    let mut r = Region::from_stream(Builder::new().location(2, 1).build()).unwrap();
    assert_eq!(
        r.location(0, 0).unwrap(),
        Some(ChunkLocation {
            offset: 2,
            sectors: 1
        })
    );
    assert_eq!(r.location(1, 0).unwrap(), None);
}

#[test]
fn blank_write_chunk() {
    let mut r = new_empty();
    r.write_compressed_chunk(0, 0, Uncompressed, &[1, 2, 3])
        .unwrap();
    assert_location(&mut r, 0, 0, 2, 1);
}

#[test]
fn write_invalid_offset_errors() {
    let mut r = new_empty();
    assert!(matches!(
        r.write_compressed_chunk(32, 0, Uncompressed, &[1, 2, 3]),
        Err(Error::InvalidOffset(..))
    ));
    assert!(matches!(
        r.write_compressed_chunk(0, 32, Uncompressed, &[1, 2, 3]),
        Err(Error::InvalidOffset(..))
    ));
}

#[test]
fn exact_sector_size_chunk_takes_one_sector() {
    let mut r = new_empty();
    r.write_compressed_chunk(0, 0, Uncompressed, &n_sector_chunk(1))
        .unwrap();
    assert_location(&mut r, 0, 0, 2, 1);
}

#[test]
fn over_one_sector_size_chunk_takes_two_sectors() {
    let mut r = new_empty();
    r.write_compressed_chunk(
        0,
        0,
        Uncompressed,
        &[0; SECTOR_SIZE - CHUNK_HEADER_SIZE + 1],
    )
    .unwrap();
    assert_location(&mut r, 0, 0, 2, 2);
}

#[test]
fn oversized_chunk_fails() {
    let mut r = new_empty();
    let res = r.write_compressed_chunk(0, 0, Uncompressed, &n_sector_chunk(256));
    assert!(matches!(res, Err(Error::ChunkTooLarge)))
}

#[test]
fn write_several_chunks() {
    let mut r = new_empty();
    r.write_compressed_chunk(0, 0, Uncompressed, &n_sector_chunk(2))
        .unwrap();
    r.write_compressed_chunk(0, 1, Uncompressed, &n_sector_chunk(3))
        .unwrap();

    assert_location(&mut r, 0, 0, 2, 2);
    assert_location(&mut r, 0, 1, 4, 3);
}

#[test]
fn write_and_get_chunk() {
    let mut r = new_empty();
    r.write_compressed_chunk(0, 0, Uncompressed, &[1, 2, 3])
        .unwrap();
    let c = r.read_chunk(0, 0).unwrap().unwrap();
    assert_eq!(c, [1, 2, 3]);
}

#[test]
fn getting_other_chunks_is_none() {
    let mut r = new_empty();
    r.write_compressed_chunk(1, 1, Uncompressed, &[1, 2, 3])
        .unwrap();
    assert!(matches!(r.read_chunk(0, 0), Ok(None)));
    assert!(matches!(r.read_chunk(1, 0), Ok(None)));
    assert!(matches!(r.read_chunk(1, 1), Ok(Some(_))));
}

#[test]
fn zlib_chunk_round_trip() {
    let mut r = new_empty();
    let data = minenbt::to_bytes(&small_tree()).unwrap();
    r.write_chunk(5, 7, &data).unwrap();

    assert_eq!(r.read_chunk(5, 7).unwrap(), Some(data));
}

#[test]
fn tag_round_trip() {
    let mut r = new_empty();
    r.write_chunk_tag(31, 31, &small_tree()).unwrap();

    let tag = r.read_chunk_tag(31, 31).unwrap().unwrap();
    assert_eq!(tag, small_tree());
    assert!(r.read_chunk_tag(0, 0).unwrap().is_none());
}

#[test]
fn gzip_chunk() {
    let data = minenbt::to_bytes(&small_tree()).unwrap();
    let mut enc = GzEncoder::new(vec![], Compression::default());
    enc.write_all(&data).unwrap();
    let compressed = enc.finish().unwrap();

    let mut r = new_empty();
    r.write_compressed_chunk(2, 3, Gzip, &compressed).unwrap();
    assert_eq!(r.read_chunk(2, 3).unwrap(), Some(data));
}

#[test]
fn chunk_at_inflate_limit_reads() {
    let mut r = new_empty();
    r.write_chunk(0, 0, &vec![0; CHUNK_INFLATE_LIMIT]).unwrap();

    let chunk = r.read_chunk(0, 0).unwrap().unwrap();
    assert_eq!(chunk.len(), CHUNK_INFLATE_LIMIT);
}

#[test]
fn chunk_inflating_past_limit_errors() {
    let mut r = new_empty();
    r.write_chunk(0, 0, &vec![0; CHUNK_INFLATE_LIMIT + 1]).unwrap();
    assert!(matches!(r.read_chunk(0, 0), Err(Error::ChunkTooLarge)));

    let mut enc = GzEncoder::new(vec![], Compression::fast());
    enc.write_all(&vec![0; 4 * CHUNK_INFLATE_LIMIT]).unwrap();
    let compressed = enc.finish().unwrap();

    r.write_compressed_chunk(1, 0, Gzip, &compressed).unwrap();
    assert!(matches!(r.read_chunk_tag(1, 0), Err(Error::ChunkTooLarge)));
}

#[test]
fn chunk_with_bad_nbt() {
    let mut r = new_empty();
    r.write_chunk(0, 0, &[10, 0, 0, 3]).unwrap();
    match r.read_chunk_tag(0, 0) {
        Err(Error::Nbt(e)) => assert!(e.is_truncated()),
        _ => panic!("should error"),
    }
}

#[test]
fn unknown_compression_scheme() {
    let r = Builder::new()
        .location(2, 1)
        .sector(2)
        .raw(&[0, 0, 0, 4, 9, 1, 2, 3])
        .build();
    let mut r = Region::from_stream(r).unwrap();
    assert!(matches!(r.read_chunk(0, 0), Err(Error::InvalidChunkMeta)));
}

#[test]
fn zero_chunk_length() {
    let r = Builder::new()
        .location(2, 1)
        .sector(2)
        .raw(&[0, 0, 0, 0, 2])
        .build();
    let mut r = Region::from_stream(r).unwrap();
    assert!(matches!(r.read_chunk(0, 0), Err(Error::InvalidChunkMeta)));
}

#[test]
fn length_beyond_allocated_sectors() {
    let r = Builder::new()
        .location(2, 1)
        .sector(2)
        .raw(&(SECTOR_SIZE as u32).to_be_bytes())
        .raw(&[3])
        .build();
    let mut r = Region::from_stream(r).unwrap();
    assert!(matches!(
        r.read_chunk(0, 0),
        Err(Error::ChunkLengthMismatch)
    ));
}

#[test]
fn chunk_data_cut_short() {
    let r = Builder::new()
        .location(2, 1)
        .sector(2)
        .raw(&[0, 0, 0, 100, 3, 1, 2, 3])
        .build_unpadded();
    let mut r = Region::from_stream(r).unwrap();
    assert!(matches!(r.read_chunk(0, 0), Err(Error::InsufficientData)));
}

#[test]
fn overwrite_with_smaller_chunk() {
    let mut r = new_empty();
    r.write_compressed_chunk(0, 0, Uncompressed, &n_sector_chunk(2))
        .unwrap();
    r.write_compressed_chunk(0, 0, Uncompressed, &n_sector_chunk(1))
        .unwrap();

    assert_location(&mut r, 0, 0, 2, 1);
}

#[test]
fn overwrite_with_larger_chunk() {
    let mut r = new_empty();
    r.write_compressed_chunk(0, 0, Uncompressed, &n_sector_chunk(2))
        .unwrap();

    // this chunk will be offset 4 size 1.
    r.write_compressed_chunk(0, 1, Uncompressed, &n_sector_chunk(1))
        .unwrap();

    // overwrite chunk at offset 2 to be 3 large, which would overwrite the
    // above chunk if done in-place.
    r.write_compressed_chunk(0, 0, Uncompressed, &n_sector_chunk(3))
        .unwrap();

    assert_location(&mut r, 0, 0, 5, 3);
    assert_location(&mut r, 0, 1, 4, 1);
}

#[test]
fn chunk_can_fill_gap_left_by_moved_chunk_after_it() {
    let mut r = new_empty();
    // HH000111222---- - starting point, chunks 0,1,2 all 3 sectors
    // HH000---2221111 - chunk 1 grows beyond capacity, moves to end.
    // HH0000002221111 - chunk 0 can grow to 6 sectors.

    r.write_compressed_chunk(0, 0, Uncompressed, &n_sector_chunk(3))
        .unwrap();
    r.write_compressed_chunk(0, 1, Uncompressed, &n_sector_chunk(3))
        .unwrap();
    r.write_compressed_chunk(0, 2, Uncompressed, &n_sector_chunk(3))
        .unwrap();

    r.write_compressed_chunk(0, 1, Uncompressed, &n_sector_chunk(4))
        .unwrap();
    r.write_compressed_chunk(0, 0, Uncompressed, &n_sector_chunk(6))
        .unwrap();

    assert_location(&mut r, 0, 0, 2, 6);
    assert_location(&mut r, 0, 1, 11, 4);
    assert_location(&mut r, 0, 2, 8, 3);
}

#[test]
fn load_from_existing_buffer() {
    let mut r = new_empty();
    r.write_compressed_chunk(0, 0, Uncompressed, &n_sector_chunk(1))
        .unwrap();
    r.write_compressed_chunk(0, 1, Uncompressed, &n_sector_chunk(2))
        .unwrap();

    let buf = r.into_inner().unwrap();
    assert_eq!(buf.position(), 0);
    assert_eq!(buf.get_ref().len(), REGION_HEADER_SIZE + 3 * SECTOR_SIZE);

    let mut r = Region::from_stream(buf).unwrap();
    assert_location(&mut r, 0, 0, 2, 1);
    assert_location(&mut r, 0, 1, 3, 2);

    // new chunks go after the existing ones.
    r.write_compressed_chunk(9, 9, Uncompressed, &[1]).unwrap();
    assert_location(&mut r, 9, 9, 5, 1);
}

#[test]
fn empty_stream_region_writes_after_header() {
    let buf = new_empty().into_inner().unwrap();
    let mut r = Region::from_stream(buf).unwrap();
    r.write_compressed_chunk(0, 0, Uncompressed, &[1]).unwrap();
    assert_location(&mut r, 0, 0, 2, 1);
}

#[test]
fn removed_chunk_doesnt_exist() {
    let mut r = new_empty();

    r.write_compressed_chunk(0, 0, Uncompressed, &n_sector_chunk(3))
        .unwrap();
    r.write_compressed_chunk(0, 1, Uncompressed, &n_sector_chunk(3))
        .unwrap();
    r.write_compressed_chunk(0, 2, Uncompressed, &n_sector_chunk(3))
        .unwrap();

    r.remove_chunk(0, 1).unwrap();

    assert!(matches!(r.read_chunk(0, 0), Ok(Some(_))));
    assert!(matches!(r.read_chunk(0, 1), Ok(None)));
    assert!(matches!(r.read_chunk(0, 2), Ok(Some(_))));
}

#[test]
fn removing_missing_chunk_works() {
    let mut r = new_empty();

    r.write_compressed_chunk(0, 0, Uncompressed, &n_sector_chunk(3))
        .unwrap();
    r.remove_chunk(0, 1).unwrap();

    assert!(matches!(r.read_chunk(0, 0), Ok(Some(_))));
    assert!(matches!(r.read_chunk(0, 1), Ok(None)));
}
