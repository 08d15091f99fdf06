use insta::assert_json_snapshot;
use report_timeline_wasm::domain::timeline::{Chunk, ChunkInterval, Timestamp, chunk_range};

#[test]
fn factory_is_deterministic() {
    let a: Chunk<u8> = Chunk::new(Timestamp::from_millis(42), ChunkInterval::ThirtyMinutes);
    let b: Chunk<u8> = Chunk::new(Timestamp::from_millis(42), ChunkInterval::ThirtyMinutes);
    assert_eq!(a, b);
    assert_eq!(a.to.value() - a.from.value(), 30 * 60 * 1000);
}

#[test]
fn chunk_range_snapshot() {
    let chunks: Vec<Chunk<()>> = chunk_range(Timestamp::from_millis(0), ChunkInterval::FifteenMinutes, &[0, 1]);
    assert_json_snapshot!(chunks, @r###"
    [
      {
        "from": 0,
        "to": 900000,
        "data": []
      },
      {
        "from": 900000,
        "to": 1800000,
        "data": []
      }
    ]
    "###);
}

#[test]
fn chunk_range_is_contiguous_across_zero() {
    let chunks: Vec<Chunk<()>> = chunk_range(
        Timestamp::from_millis(3_600_000),
        ChunkInterval::OneHour,
        &[-1, 0, 1, 2],
    );
    assert_eq!(chunks[0].from.value(), 0);
    assert!(chunks.windows(2).all(|pair| pair[0].to == pair[1].from));
}
