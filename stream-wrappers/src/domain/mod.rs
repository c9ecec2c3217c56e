//! Domain layer - stream contract and block-cache logic with no concrete I/O.
//!
//! The domain layer contains:
//! - **Entities**: `CachedBlock`, `Slot`
//! - **Value Objects**: `BlockIndex`, `Ownership`
//! - **Domain Services**: `BlockCache`
//! - **Ports**: `Stream`, `AsyncStream`
//! - **Errors**: `StreamError`
//!
//! ```text
//!     ┌──────────────────────────────────┐
//!     │      Domain Layer (Core)         │
//!     │                                  │
//!     │  ┌────────────────────────────┐  │
//!     │  │  Entities & Value Objects  │  │
//!     │  │  - CachedBlock, BlockIndex │  │
//!     │  └────────────────────────────┘  │
//!     │              ▲                   │
//!     │  ┌────────────────────────────┐  │
//!     │  │    Domain Services         │  │
//!     │  │    - BlockCache            │  │
//!     │  └────────────────────────────┘  │
//!     │  ┌────────────────────────────┐  │
//!     │  │    Ports (Interfaces)      │  │
//!     │  │    - Stream, AsyncStream   │  │
//!     │  └────────────────────────────┘  │
//!     └──────────────────────────────────┘
//!                    ▲
//!                    │ implemented by
//!     ┌──────────────────────────────────┐
//!     │      Adapter Layer               │
//!     │  - decorators, ZeroStream,       │
//!     │    IoStream                      │
//!     └──────────────────────────────────┘
//! ```

pub mod entities;
pub mod error;
pub mod ports;
pub mod value_objects;

mod block_cache;

pub use block_cache::BlockCache;
pub use entities::{CachedBlock, Slot};
pub use error::{Result, StreamError};
pub use ports::{ensure_not_cancelled, AsyncStream, SeekFrom, Stream, MAX_POSITION};
pub use value_objects::{BlockIndex, Ownership, BLOCK_SIZE};
