//! Page records and rotation.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use crate::error::{PdfDeckError, Result};
use crate::source::{PageGeometry, SourceDocument};

/// Identifier of a page record within a [`PageCollection`].
///
/// Ids are assigned by the collection and never reused.
///
/// [`PageCollection`]: crate::collection::PageCollection
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct PageId(pub(crate) u64);

impl PageId {
    /// Numeric value of the id.
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Page rotation in quarter turns clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(into = "i64")]
pub enum Rotation {
    /// No rotation.
    #[default]
    None,
    /// Rotate 90 degrees clockwise.
    Clockwise90,
    /// Rotate 180 degrees.
    Rotate180,
    /// Rotate 270 degrees clockwise (90 counter-clockwise).
    Clockwise270,
}

impl Rotation {
    /// Parse rotation from degrees, reducing modulo 360.
    ///
    /// Negative values are accepted (`-90` is `Clockwise270`).
    ///
    /// # Errors
    ///
    /// Returns an error if the degrees value is not a multiple of 90.
    pub fn from_degrees(degrees: i64) -> Result<Self> {
        match degrees.rem_euclid(360) {
            0 => Ok(Self::None),
            90 => Ok(Self::Clockwise90),
            180 => Ok(Self::Rotate180),
            270 => Ok(Self::Clockwise270),
            _ => Err(PdfDeckError::invalid_config(format!(
                "Invalid rotation: {degrees}. Must be a multiple of 90"
            ))),
        }
    }

    /// Get rotation as degrees.
    pub fn as_degrees(&self) -> i64 {
        match self {
            Self::None => 0,
            Self::Clockwise90 => 90,
            Self::Rotate180 => 180,
            Self::Clockwise270 => 270,
        }
    }

    /// The rotation one quarter turn further clockwise.
    pub fn rotated_clockwise(self) -> Self {
        match self {
            Self::None => Self::Clockwise90,
            Self::Clockwise90 => Self::Rotate180,
            Self::Rotate180 => Self::Clockwise270,
            Self::Clockwise270 => Self::None,
        }
    }

    /// Compose this rotation on top of an existing `/Rotate` value.
    ///
    /// The result is reduced to `0..360`.
    pub fn applied_to(&self, existing_degrees: i64) -> i64 {
        (existing_degrees + self.as_degrees()).rem_euclid(360)
    }

    /// Whether this rotation swaps page width and height.
    pub fn is_sideways(&self) -> bool {
        matches!(self, Self::Clockwise90 | Self::Clockwise270)
    }

    /// Check for the identity rotation.
    pub fn is_none(&self) -> bool {
        *self == Self::None
    }
}

impl From<Rotation> for i64 {
    fn from(rotation: Rotation) -> Self {
        rotation.as_degrees()
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.as_degrees())
    }
}

/// Display geometry of a page as a renderer would draw it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PagePreview {
    /// Rendered width in pixels.
    pub width: u32,
    /// Rendered height in pixels.
    pub height: u32,
    /// Effective rotation: source `/Rotate` plus the record's rotation.
    pub rotation: Rotation,
}

/// One logical page: where it came from and how it is currently rotated.
#[derive(Debug, Clone)]
pub struct PageRecord {
    id: PageId,
    source: Arc<SourceDocument>,
    source_page_index: usize,
    rotation: Rotation,
}

impl PageRecord {
    pub(crate) fn new(id: PageId, source: Arc<SourceDocument>, source_page_index: usize) -> Self {
        Self {
            id,
            source,
            source_page_index,
            rotation: Rotation::None,
        }
    }

    /// Record identifier.
    pub fn id(&self) -> PageId {
        self.id
    }

    /// The document this page was extracted from.
    pub fn source(&self) -> &Arc<SourceDocument> {
        &self.source
    }

    /// Zero-based index of the page within its source document.
    pub fn source_page_index(&self) -> usize {
        self.source_page_index
    }

    /// Rotation accumulated in this session (not including the source's own).
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub(crate) fn rotate_clockwise(&mut self) {
        self.rotation = self.rotation.rotated_clockwise();
    }

    /// Geometry of the page in its source document.
    pub fn geometry(&self) -> Option<PageGeometry> {
        self.source.geometry(self.source_page_index)
    }

    /// Compute the preview size at `scale` pixels per point.
    ///
    /// Returns `None` if the source has no geometry for this page.
    pub fn preview(&self, scale: f32) -> Option<PagePreview> {
        let geometry = self.geometry()?;
        let rotation = Rotation::from_degrees(self.rotation.applied_to(geometry.rotation))
            .unwrap_or_default();

        let (w, h) = if rotation.is_sideways() {
            (geometry.height, geometry.width)
        } else {
            (geometry.width, geometry.height)
        };

        Some(PagePreview {
            width: (w * scale).round().max(1.0) as u32,
            height: (h * scale).round().max(1.0) as u32,
            rotation,
        })
    }
}
