//! Behavior of decorator stacks over an instrumented stream.

mod common;

use common::{InstrumentedStream, pattern};
use stream_wrappers::{
    BLOCK_SIZE, CachingStream, Ownership, ReadOnlyStream, RebasedStream, SeekFrom, Stream,
    StreamError, StreamExt, TruncatedStream, WrappingStream, create_partial_stream, read_block,
};

#[test]
fn cache_hit_avoids_second_physical_read() -> anyhow::Result<()> {
    let (inner, stats) = InstrumentedStream::new(pattern(10_000));
    let mut cached = CachingStream::new(inner, Ownership::Owns)?;

    cached.seek(SeekFrom::Start(5000))?;
    assert_eq!(cached.read_byte()?, Some((5000 % 251) as u8));

    let first_reads = stats.lock().unwrap().reads;
    {
        let stats = stats.lock().unwrap();
        assert!(stats.read_positions.iter().all(|p| *p >= BLOCK_SIZE as u64));
        assert_eq!(stats.read_positions[0], BLOCK_SIZE as u64);
    }

    cached.seek(SeekFrom::Start(5000))?;
    assert_eq!(cached.read_byte()?, Some((5000 % 251) as u8));
    let mut buf = [0u8; 100];
    cached.seek(SeekFrom::Start(4096))?;
    assert_eq!(cached.read(&mut buf)?, 100);

    assert_eq!(stats.lock().unwrap().reads, first_reads);
    assert!(cached.is_block_loaded(1));
    assert_eq!(cached.cached_block_count(), 1);
    Ok(())
}

#[test]
fn cached_reads_match_source_across_blocks() -> anyhow::Result<()> {
    let source = pattern(10_000);
    let (inner, _) = InstrumentedStream::with_max_chunk(source.clone(), 333);
    let mut cached = CachingStream::new(inner, Ownership::Owns)?;

    let all = cached.read_to_vec()?;
    assert_eq!(all, source);
    assert_eq!(cached.cached_block_count(), 3);

    cached.set_position(8190)?;
    let mut buf = [0u8; 4];
    cached.read_exactly(&mut buf)?;
    assert_eq!(&buf[..], &source[8190..8194]);
    Ok(())
}

#[test]
fn rebasing_translates_positions() -> anyhow::Result<()> {
    let (mut inner, _) = InstrumentedStream::new(pattern(1000));
    inner.set_position(100)?;

    let mut rebased = RebasedStream::new(&mut inner, Ownership::None)?;
    assert_eq!(rebased.position()?, 0);
    rebased.seek(SeekFrom::Start(50))?;
    assert_eq!(rebased.read_byte()?, Some(150));
    drop(rebased);

    assert_eq!(inner.position()?, 151);
    Ok(())
}

#[test]
fn truncation_clamps_reads() -> anyhow::Result<()> {
    let (inner, _) = InstrumentedStream::new(pattern(1000));
    let mut truncated = TruncatedStream::new(inner, 500, Ownership::Owns)?;

    truncated.seek(SeekFrom::Start(480))?;
    let mut buf = vec![0u8; 1000];
    assert_eq!(truncated.read(&mut buf)?, 20);
    assert_eq!(truncated.read(&mut buf)?, 0);
    assert_eq!(truncated.read_byte()?, None);
    Ok(())
}

#[test]
fn truncation_mid_stream_exposes_length_bytes_from_wrap_point() -> anyhow::Result<()> {
    let data = pattern(1000);
    let (mut inner, _) = InstrumentedStream::new(data.clone());
    inner.seek(SeekFrom::Start(490))?;
    let mut truncated = TruncatedStream::new(inner, 500, Ownership::Owns)?;

    let expected = truncated.length()?;
    assert_eq!(expected, 500);
    let bytes = truncated.read_to_vec()?;
    assert_eq!(bytes.len() as u64, expected);
    assert_eq!(bytes, data[490..990]);
    Ok(())
}

#[test]
fn partial_stream_without_offset_starts_at_current_position() -> anyhow::Result<()> {
    let data = pattern(1000);
    let (mut inner, _) = InstrumentedStream::new(data.clone());
    inner.seek(SeekFrom::Start(600))?;
    let mut part = create_partial_stream(inner, 0, Some(100), Ownership::Owns)?;

    assert_eq!(part.length()?, 100);
    let bytes = part.read_to_vec()?;
    assert_eq!(bytes, data[600..700]);
    Ok(())
}

#[test]
fn partial_stream_fast_path_is_unwrapped() -> anyhow::Result<()> {
    let (inner, stats) = InstrumentedStream::new(pattern(10));
    let part = create_partial_stream(inner, 0, None, Ownership::Owns)?;
    assert!(part.is_unwrapped());

    let mut original = part.into_unwrapped().expect("unwrapped stream");
    assert_eq!(original.length()?, 10);
    assert_eq!(stats.lock().unwrap().reads, 0);
    Ok(())
}

#[test]
fn partial_stream_is_a_window() -> anyhow::Result<()> {
    let source = pattern(1000);
    let (inner, _) = InstrumentedStream::new(source.clone());
    let mut part = create_partial_stream(inner, 200, Some(100), Ownership::Owns)?;

    assert_eq!(part.length()?, 100);
    assert_eq!(part.read_to_vec()?, &source[200..300]);
    assert_eq!(part.seek(SeekFrom::End(-10))?, 90);
    assert_eq!(part.read_byte()?, Some(source[290]));
    Ok(())
}

#[test]
fn ownership_none_leaves_inner_usable() -> anyhow::Result<()> {
    let (mut inner, stats) = InstrumentedStream::new(pattern(10));
    {
        let mut wrapper = WrappingStream::new(&mut inner, Ownership::None);
        wrapper.dispose()?;
    }
    assert_eq!(stats.lock().unwrap().disposals, 0);
    assert_eq!(inner.read_byte()?, Some(0));
    Ok(())
}

#[test]
fn ownership_owns_disposes_inner() -> anyhow::Result<()> {
    let (inner, stats) = InstrumentedStream::new(pattern(10));
    let mut wrapper = WrappingStream::new(inner, Ownership::Owns);
    wrapper.dispose()?;
    assert_eq!(stats.lock().unwrap().disposals, 1);
    Ok(())
}

#[test]
fn read_block_loops_over_single_byte_reads() -> anyhow::Result<()> {
    let (mut inner, stats) = InstrumentedStream::with_max_chunk(pattern(10), 1);

    let mut buf = [0u8; 8];
    assert_eq!(read_block(&mut inner, &mut buf)?, 8);
    assert_eq!(buf, [0, 1, 2, 3, 4, 5, 6, 7]);
    assert_eq!(stats.lock().unwrap().reads, 8);

    assert_eq!(read_block(&mut inner, &mut buf)?, 2);
    let err = inner.read_exactly(&mut buf).unwrap_err();
    assert!(matches!(err, StreamError::EndOfStream { expected: 8, actual: 0 }));
    Ok(())
}

#[test]
fn dispose_twice_disposes_inner_once() -> anyhow::Result<()> {
    let (inner, stats) = InstrumentedStream::new(pattern(10_000));
    let rebased = RebasedStream::new(inner, Ownership::Owns)?;
    let truncated = TruncatedStream::new(rebased, 5000, Ownership::Owns)?;
    let mut cached = CachingStream::new(truncated, Ownership::Owns)?;

    cached.read(&mut [0u8; 16])?;
    cached.dispose()?;
    cached.dispose()?;

    assert_eq!(stats.lock().unwrap().disposals, 1);
    assert!(cached.is_disposed());
    assert!(!cached.can_read());
    assert!(matches!(cached.read(&mut [0u8; 1]), Err(StreamError::Disposed)));
    assert!(matches!(cached.seek(SeekFrom::Start(0)), Err(StreamError::Disposed)));
    Ok(())
}

#[test]
fn read_only_stream_never_owns() -> anyhow::Result<()> {
    let (mut inner, stats) = InstrumentedStream::new(pattern(10));
    {
        let mut view = ReadOnlyStream::new(&mut inner);
        assert!(view.write(&[1]).unwrap_err().is_not_supported());
        view.dispose()?;
        view.dispose()?;
    }
    assert_eq!(stats.lock().unwrap().disposals, 0);
    inner.write(&[1])?;
    Ok(())
}

#[test]
fn inner_errors_surface_unchanged() -> anyhow::Result<()> {
    let (mut inner, _) = InstrumentedStream::new(pattern(10));
    inner.dispose()?;

    let mut wrapper = WrappingStream::new(&mut inner, Ownership::None);
    assert!(matches!(wrapper.read(&mut [0u8; 1]), Err(StreamError::Disposed)));
    assert!(matches!(wrapper.seek(SeekFrom::Current(-1)), Err(StreamError::Disposed)));
    Ok(())
}
