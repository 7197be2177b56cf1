//! Recording renderer and in-memory storage for tests

use std::collections::HashMap;
use std::string::{String, ToString};
use std::vec::Vec;

use inkchat_hal::{AssetStorage, Color, FontSize, RenderError, Renderer, StorageError};

/// One recorded renderer call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Clear,
    Text {
        text: String,
        x: i16,
        y: i16,
        size: FontSize,
    },
    Bitmap {
        x: i16,
        y: i16,
        width: u16,
        height: u16,
        len: usize,
    },
    Display {
        partial: bool,
    },
    Window {
        x: u16,
        y: u16,
        width: u16,
        height: u16,
        partial: bool,
    },
}

pub struct MockRenderer {
    pub calls: Vec<Call>,
    pub width: u16,
    pub height: u16,
    /// Fail every draw call with this error
    pub fail_draws: Option<RenderError>,
}

impl MockRenderer {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            calls: Vec::new(),
            width,
            height,
            fail_draws: None,
        }
    }

    pub fn refreshes(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::Display { .. } | Call::Window { .. }))
            .count()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn check(&self) -> Result<(), RenderError> {
        match self.fail_draws {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Renderer for MockRenderer {
    fn clear(&mut self) -> Result<(), RenderError> {
        self.calls.push(Call::Clear);
        Ok(())
    }

    fn draw_text(&mut self, text: &str, x: i16, y: i16, size: FontSize) -> Result<(), RenderError> {
        self.check()?;
        self.calls.push(Call::Text {
            text: text.to_string(),
            x,
            y,
            size,
        });
        Ok(())
    }

    fn draw_bitmap(
        &mut self,
        bitmap: &[u8],
        x: i16,
        y: i16,
        width: u16,
        height: u16,
        _color: Color,
    ) -> Result<(), RenderError> {
        self.check()?;
        self.calls.push(Call::Bitmap {
            x,
            y,
            width,
            height,
            len: bitmap.len(),
        });
        Ok(())
    }

    fn display(&mut self, partial: bool) -> Result<(), RenderError> {
        self.calls.push(Call::Display { partial });
        Ok(())
    }

    fn display_window(
        &mut self,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
        partial: bool,
    ) -> Result<(), RenderError> {
        self.calls.push(Call::Window {
            x,
            y,
            width,
            height,
            partial,
        });
        Ok(())
    }

    fn width(&self) -> u16 {
        self.width
    }

    fn height(&self) -> u16 {
        self.height
    }
}

/// Path-keyed blobs plus a log of requested paths
#[derive(Default)]
pub struct MockStorage {
    files: HashMap<String, Vec<u8>>,
    requests: Vec<String>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: &str, data: Vec<u8>) -> Self {
        self.files.insert(path.to_string(), data);
        self
    }

    pub fn requests(&self) -> &[String] {
        &self.requests
    }
}

impl AssetStorage for MockStorage {
    async fn load_binary(&mut self, path: &str, buffer: &mut [u8]) -> Result<usize, StorageError> {
        self.requests.push(path.to_string());
        let data = self.files.get(path).ok_or(StorageError::NotFound)?;
        if data.is_empty() {
            return Err(StorageError::Empty);
        }
        let dst = buffer
            .get_mut(..data.len())
            .ok_or(StorageError::BufferTooSmall)?;
        dst.copy_from_slice(data);
        Ok(data.len())
    }
}
