use report_timeline_wasm::app::TimelineFrame;
use report_timeline_wasm::domain::timeline::{
    ChunkInterval, EmptyChunkSource, TimelineVirtualizer, Timestamp, VirtualizerSettings,
};

#[test]
fn frame_mirrors_virtualizer_geometry() {
    let mut v: TimelineVirtualizer<(), _> = TimelineVirtualizer::new(
        VirtualizerSettings::default(),
        ChunkInterval::FifteenMinutes,
        Timestamp::from_millis(1_700_000_000_000),
        EmptyChunkSource,
    )
    .unwrap();

    for offset in [0.0, 800.0, 80_000.0, 120_345.0, 158_400.0] {
        v.scroll_to(offset);
        let frame = TimelineFrame::capture(&v);
        assert_eq!(frame.total_width(), v.settings().total_width());
        assert_eq!(frame.cells.len(), v.window().indices.len());
        assert!(frame.cells.windows(2).all(|pair| pair[0].to == pair[1].from));
        assert!(frame.cells.iter().all(|cell| cell.items == 0));
    }
}
