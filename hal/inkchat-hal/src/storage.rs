//! Asset storage abstractions
//!
//! Provides a trait for loading byte blobs (fonts, avatar bitmaps, config)
//! by path. Implementations back this with an SD card or an assets partition.

/// Errors from asset storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// No blob at this path
    NotFound,
    /// Medium error or short read
    ReadError,
    /// Buffer too small for the data
    BufferTooSmall,
    /// Blob exists but is zero-length
    Empty,
}

/// Asset storage trait
///
/// Paths are POSIX-style and relative to the storage root
/// (e.g. `resource/image/student.bin`).
pub trait AssetStorage {
    /// Load a blob into the provided buffer
    ///
    /// # Arguments
    /// * `path` - Asset path relative to the storage root
    /// * `buffer` - Buffer to read data into
    ///
    /// # Returns
    /// The number of bytes read, or an error. Implementations must not
    /// return `Ok(0)` for a present-but-empty blob; use [`StorageError::Empty`].
    fn load_binary(
        &mut self,
        path: &str,
        buffer: &mut [u8],
    ) -> impl core::future::Future<Output = Result<usize, StorageError>>;
}
