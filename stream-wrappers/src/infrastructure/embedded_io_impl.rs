//! Implementations of embedded_io and embedded_io_async traits for every
//! stream in the crate.
//!
//! These let a decorator stack back anything written against embedded-io,
//! such as a filesystem driver. Writes report the full buffer length because
//! [`Stream::write`] either writes everything or fails. The async impls pass
//! a fresh, never-cancelled token; use [`AsyncStream`] directly to cancel.

use tokio_util::sync::CancellationToken;

use crate::{
    adapters::{
        CachingStream, IoStream, ReadOnlyStream, RebasedStream, TruncatedStream, WrappingStream,
        ZeroStream,
    },
    domain::{AsyncStream, Stream, StreamError},
    infrastructure::PartialStream,
};

macro_rules! impl_embedded_io {
    ($(impl<$($g:ident),*> for $ty:ty where sync: [$($sb:tt)*], async: [$($ab:tt)*];)*) => {$(
        impl<$($g),*> embedded_io::ErrorType for $ty
        where
            $($sb)*
        {
            type Error = StreamError;
        }

        impl<$($g),*> embedded_io::Read for $ty
        where
            $($sb)*
        {
            fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
                Stream::read(self, buf)
            }
        }

        impl<$($g),*> embedded_io::Write for $ty
        where
            $($sb)*
        {
            fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
                Stream::write(self, buf)?;
                Ok(buf.len())
            }

            fn flush(&mut self) -> Result<(), Self::Error> {
                Stream::flush(self)
            }
        }

        impl<$($g),*> embedded_io::Seek for $ty
        where
            $($sb)*
        {
            fn seek(&mut self, pos: embedded_io::SeekFrom) -> Result<u64, Self::Error> {
                Stream::seek(self, pos.into())
            }
        }

        impl<$($g),*> embedded_io_async::Read for $ty
        where
            $($ab)*
        {
            async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
                AsyncStream::read_async(self, buf, &CancellationToken::new()).await
            }
        }

        impl<$($g),*> embedded_io_async::Write for $ty
        where
            $($ab)*
        {
            async fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
                AsyncStream::write_async(self, buf, &CancellationToken::new()).await?;
                Ok(buf.len())
            }

            async fn flush(&mut self) -> Result<(), Self::Error> {
                AsyncStream::flush_async(self, &CancellationToken::new()).await
            }
        }

        impl<$($g),*> embedded_io_async::Seek for $ty
        where
            $($ab)*
        {
            async fn seek(&mut self, pos: embedded_io_async::SeekFrom) -> Result<u64, Self::Error> {
                Stream::seek(self, pos.into())
            }
        }
    )*};
}

impl_embedded_io! {
    impl<> for ZeroStream where sync: [], async: [];
    impl<T> for IoStream<T>
        where sync: [T: std::io::Read + std::io::Write + std::io::Seek],
        async: [T: std::io::Read + std::io::Write + std::io::Seek];
    impl<S> for WrappingStream<S> where sync: [S: Stream], async: [S: AsyncStream];
    impl<S> for RebasedStream<S> where sync: [S: Stream], async: [S: AsyncStream];
    impl<S> for TruncatedStream<S> where sync: [S: Stream], async: [S: AsyncStream];
    impl<S> for ReadOnlyStream<S> where sync: [S: Stream], async: [S: AsyncStream];
    impl<S> for CachingStream<S> where sync: [S: Stream], async: [S: AsyncStream];
    impl<S> for PartialStream<S> where sync: [S: Stream], async: [S: AsyncStream];
}
