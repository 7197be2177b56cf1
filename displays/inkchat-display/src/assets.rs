//! Font and avatar assets
//!
//! Fonts are read once into a caller-owned buffer that outlives the codec.
//! Avatars are small 1bpp bitmaps copied into fixed buffers inside the
//! consumer on the first conversation update.

use core::fmt::Write;

use heapless::String;
use inkchat_core::config::{AvatarSize, FontPt};
use inkchat_core::conversation::Role;
use inkchat_core::font::{bitmap_len, FontCodec, LoadError};
use inkchat_hal::{AssetStorage, StorageError};

/// User avatar path
pub const USER_AVATAR_PATH: &str = "resource/image/student.bin";

/// Counterpart avatar path
pub const COUNTERPART_AVATAR_PATH: &str = "resource/image/teacher.bin";

/// Largest avatar bitmap kept (64×64 at 1bpp)
pub const MAX_AVATAR_BYTES: usize = 512;

/// Font asset errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FontAssetError {
    /// No asset under either name, or it could not be read
    Storage(StorageError),
    /// The asset is not a valid glyph container
    Format(LoadError),
}

impl From<StorageError> for FontAssetError {
    fn from(e: StorageError) -> Self {
        FontAssetError::Storage(e)
    }
}

impl From<LoadError> for FontAssetError {
    fn from(e: LoadError) -> Self {
        FontAssetError::Format(e)
    }
}

/// Size unit in a font asset name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FontSuffix {
    /// `wenquanyi_11pt.bin`, the preferred name
    Pt,
    /// `wenquanyi_11px.bin`, used by some generators
    Px,
}

impl FontSuffix {
    fn as_str(self) -> &'static str {
        match self {
            FontSuffix::Pt => "pt",
            FontSuffix::Px => "px",
        }
    }
}

/// Asset name of the bitmap font for `pt`
pub fn font_asset_name(pt: FontPt, suffix: FontSuffix) -> String<32> {
    let mut name = String::new();
    let _ = write!(name, "wenquanyi_{}{}.bin", pt.points(), suffix.as_str());
    name
}

/// Read and validate the font for `pt` into `buffer`
///
/// Tries the `pt` name first, then the `px` name.
pub async fn load_font<'f, S: AssetStorage>(
    storage: &mut S,
    pt: FontPt,
    buffer: &'f mut [u8],
) -> Result<FontCodec<'f>, FontAssetError> {
    let mut found = None;
    let mut last_error = StorageError::NotFound;

    for suffix in [FontSuffix::Pt, FontSuffix::Px] {
        let name = font_asset_name(pt, suffix);
        match storage.load_binary(&name, buffer).await {
            Ok(0) => last_error = StorageError::Empty,
            Ok(len) => {
                found = Some((name, len));
                break;
            }
            Err(e) => {
                debug!("Font asset {=str} unavailable: {:?}", name.as_str(), e);
                last_error = e;
            }
        }
    }

    let Some((name, len)) = found else {
        warn!("Bitmap font for {}pt not found: {:?}", pt.points(), last_error);
        return Err(last_error.into());
    };

    let data: &'f [u8] = buffer;
    let data = data.get(..len).ok_or(StorageError::ReadError)?;
    match FontCodec::load(data) {
        Ok(font) => {
            info!(
                "Font loaded: name={=str} size={} glyphs={}",
                name.as_str(),
                len,
                font.glyph_count()
            );
            Ok(font)
        }
        Err(e) => {
            warn!("Font {=str} rejected: {:?}", name.as_str(), e);
            Err(e.into())
        }
    }
}

/// One avatar bitmap
#[derive(Debug)]
pub struct AvatarSlot {
    path: &'static str,
    bytes: [u8; MAX_AVATAR_BYTES],
    len: usize,
    warned_missing: bool,
}

impl AvatarSlot {
    pub const fn new(path: &'static str) -> Self {
        Self {
            path,
            bytes: [0; MAX_AVATAR_BYTES],
            len: 0,
            warned_missing: false,
        }
    }

    pub fn path(&self) -> &'static str {
        self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.len > 0
    }

    async fn load<S: AssetStorage>(&mut self, storage: &mut S) -> Result<usize, StorageError> {
        self.len = 0;
        let len = storage.load_binary(self.path, &mut self.bytes).await?;
        if len == 0 {
            return Err(StorageError::Empty);
        }
        self.len = len.min(MAX_AVATAR_BYTES);
        Ok(self.len)
    }

    /// Bitmap bytes for an avatar of `size`, if enough data was loaded
    pub fn bitmap(&self, size: AvatarSize) -> Option<&[u8]> {
        let needed = bitmap_len(size.width, size.height);
        if needed == 0 || self.len < needed {
            return None;
        }
        self.bytes.get(..needed)
    }

    /// Returns true the first time an avatar could not be drawn
    pub(crate) fn note_missing(&mut self) -> bool {
        !core::mem::replace(&mut self.warned_missing, true)
    }
}

/// Both conversation avatars, loaded at most once
#[derive(Debug)]
pub struct Avatars {
    user: AvatarSlot,
    counterpart: AvatarSlot,
    attempted: bool,
}

impl Avatars {
    pub const fn new() -> Self {
        Self {
            user: AvatarSlot::new(USER_AVATAR_PATH),
            counterpart: AvatarSlot::new(COUNTERPART_AVATAR_PATH),
            attempted: false,
        }
    }

    /// Load both avatars on the first call; later calls do nothing
    pub async fn ensure_loaded<S: AssetStorage>(&mut self, storage: &mut S) {
        if self.attempted {
            return;
        }
        self.attempted = true;

        for slot in [&mut self.user, &mut self.counterpart] {
            match slot.load(storage).await {
                Ok(len) => info!("Avatar loaded: path={=str} size={}", slot.path, len),
                Err(e) => warn!("Avatar {=str} unavailable: {:?}", slot.path, e),
            }
        }
    }

    pub fn slot(&self, role: Role) -> &AvatarSlot {
        match role {
            Role::User => &self.user,
            Role::Counterpart => &self.counterpart,
        }
    }

    pub fn slot_mut(&mut self, role: Role) -> &mut AvatarSlot {
        match role {
            Role::User => &mut self.user,
            Role::Counterpart => &mut self.counterpart,
        }
    }
}

impl Default for Avatars {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockStorage;
    use embassy_futures::block_on;
    use inkchat_core::font::Endian;

    fn tiny_font() -> Vec<u8> {
        // One 8×1 glyph for 'A', little-endian
        let mut out = Vec::new();
        out.extend_from_slice(b"BDFB");
        out.push(1);
        out.extend_from_slice(&14u16.to_le_bytes());
        out.extend_from_slice(&4u16.to_le_bytes());
        out.extend_from_slice(&1u32.to_le_bytes());
        out.extend_from_slice(&[0u8; 8]);
        out.extend_from_slice(&0x41u32.to_le_bytes());
        out.extend_from_slice(&8u16.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&[0u8; 4]);
        out.extend_from_slice(&8u16.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.push(0xFF);
        out
    }

    #[test]
    fn test_font_asset_names() {
        assert_eq!(font_asset_name(FontPt::Pt11, FontSuffix::Pt).as_str(), "wenquanyi_11pt.bin");
        assert_eq!(font_asset_name(FontPt::Pt9, FontSuffix::Px).as_str(), "wenquanyi_9px.bin");
    }

    #[test]
    fn test_font_px_fallback() {
        let mut storage = MockStorage::new().with("wenquanyi_11px.bin", tiny_font());
        let mut buffer = [0u8; 128];

        let font = block_on(load_font(&mut storage, FontPt::Pt11, &mut buffer)).unwrap();
        assert_eq!(font.glyph_count(), 1);
        assert_eq!(font.endian(), Some(Endian::Little));
        assert_eq!(font.advance(0x41), Some(8));
        assert_eq!(storage.requests(), ["wenquanyi_11pt.bin", "wenquanyi_11px.bin"]);
    }

    #[test]
    fn test_font_missing_and_invalid() {
        let mut storage = MockStorage::new();
        let mut buffer = [0u8; 128];
        assert_eq!(
            block_on(load_font(&mut storage, FontPt::Pt12, &mut buffer)).unwrap_err(),
            FontAssetError::Storage(StorageError::NotFound)
        );

        let mut bad = tiny_font();
        bad[0] = b'X';
        let mut storage = MockStorage::new().with("wenquanyi_12pt.bin", bad);
        assert_eq!(
            block_on(load_font(&mut storage, FontPt::Pt12, &mut buffer)).unwrap_err(),
            FontAssetError::Format(LoadError::BadMagic)
        );
    }

    #[test]
    fn test_avatars_loaded_once() {
        let mut storage = MockStorage::new().with(USER_AVATAR_PATH, vec![0xAA; 60]);
        let mut avatars = Avatars::new();

        block_on(avatars.ensure_loaded(&mut storage));
        block_on(avatars.ensure_loaded(&mut storage));
        assert_eq!(storage.requests().len(), 2);

        let size = AvatarSize::default();
        assert_eq!(avatars.slot(Role::User).bitmap(size).map(<[u8]>::len), Some(60));
        assert!(!avatars.slot(Role::Counterpart).is_loaded());
        assert!(avatars.slot(Role::Counterpart).bitmap(size).is_none());
    }

    #[test]
    fn test_short_avatar_not_drawable() {
        let mut storage = MockStorage::new().with(COUNTERPART_AVATAR_PATH, vec![0xFF; 10]);
        let mut avatars = Avatars::new();
        block_on(avatars.ensure_loaded(&mut storage));

        let slot = avatars.slot_mut(Role::Counterpart);
        assert!(slot.is_loaded());
        assert!(slot.bitmap(AvatarSize::default()).is_none());
        assert!(slot.note_missing());
        assert!(!slot.note_missing());
    }
}
