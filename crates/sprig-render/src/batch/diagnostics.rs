//! Capacity diagnostics.
//!
//! Overflowing a batch never fails a frame: the offending sprite is dropped
//! and a [`BatchDiagnostic`] is handed to the batch's [`DiagnosticSink`].

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use sprig_test_utils::TextureId;

/// Why a sprite was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchDiagnostic {
    /// The requested layer is outside `0..max_layers`.
    LayerOverflow { layer: usize, max_layers: usize },
    /// The batch already holds `max_sprites` sprites this frame.
    SpriteOverflow { max_sprites: u32 },
    /// Every texture slot is taken by other textures this frame.
    TextureSlotOverflow {
        texture: TextureId,
        label: Option<String>,
        max_textures: usize,
    },
}

impl fmt::Display for BatchDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LayerOverflow { layer, max_layers } => write!(
                f,
                "Cannot draw sprite on layer {}: the maximum number of layers is {}",
                layer, max_layers
            ),
            Self::SpriteOverflow { max_sprites } => write!(
                f,
                "Cannot draw sprite: maximum number of sprites ({}) reached",
                max_sprites
            ),
            Self::TextureSlotOverflow {
                texture,
                label,
                max_textures,
            } => {
                write!(f, "Cannot draw sprite with {}", texture)?;
                if let Some(label) = label {
                    write!(f, " ({})", label)?;
                }
                write!(f, ": maximum number of textures ({}) reached", max_textures)
            }
        }
    }
}

impl std::error::Error for BatchDiagnostic {}

/// Receiver of batch diagnostics.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: &BatchDiagnostic);
}

/// Default sink: logs every diagnostic at `warn`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: &BatchDiagnostic) {
        tracing::warn!("{}", diagnostic);
    }
}

/// Sink that keeps every diagnostic in memory.
///
/// Clones share storage, so keep one clone to inspect what the batch
/// reported.
///
/// ```
/// use sprig_render::{BatchDiagnostic, DiagnosticSink, RecordingSink};
///
/// let sink = RecordingSink::new();
/// let handle = sink.clone();
/// sink.report(&BatchDiagnostic::SpriteOverflow { max_sprites: 1 });
/// assert_eq!(handle.len(), 1);
/// ```
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    reports: Arc<Mutex<Vec<BatchDiagnostic>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything reported so far.
    pub fn reports(&self) -> Vec<BatchDiagnostic> {
        self.reports.lock().clone()
    }

    /// Remove and return everything reported so far.
    pub fn take(&self) -> Vec<BatchDiagnostic> {
        std::mem::take(&mut *self.reports.lock())
    }

    pub fn len(&self) -> usize {
        self.reports.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.lock().is_empty()
    }
}

impl DiagnosticSink for RecordingSink {
    fn report(&self, diagnostic: &BatchDiagnostic) {
        self.reports.lock().push(diagnostic.clone());
    }
}
