//! Presentation-only cell formatting
//!
//! The evaluator never looks at these types. They ride along with
//! [`CellData`](crate::CellData) so that format edits share the same
//! history and change notifications as content edits.

mod alignment;
mod color;

pub use alignment::HorizontalAlignment;
pub use color::Color;

/// Format attached to a cell
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellFormat {
    /// Bold text
    pub bold: bool,
    /// Italic text
    pub italic: bool,
    /// Horizontal alignment
    pub horizontal: HorizontalAlignment,
    /// Text color
    pub text_color: Color,
    /// Background fill color
    pub fill_color: Color,
}

impl CellFormat {
    /// Create a new default format
    pub fn new() -> Self {
        Self::default()
    }

    /// Set bold
    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    /// Set italic
    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    /// Set horizontal alignment
    pub fn with_horizontal(mut self, align: HorizontalAlignment) -> Self {
        self.horizontal = align;
        self
    }

    /// Set text color
    pub fn with_text_color(mut self, color: Color) -> Self {
        self.text_color = color;
        self
    }

    /// Set fill color
    pub fn with_fill_color(mut self, color: Color) -> Self {
        self.fill_color = color;
        self
    }

    /// Check if this is the default format
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the fields present in `patch`
    pub fn apply(&mut self, patch: &FormatPatch) {
        if let Some(bold) = patch.bold {
            self.bold = bold;
        }
        if let Some(italic) = patch.italic {
            self.italic = italic;
        }
        if let Some(horizontal) = patch.horizontal {
            self.horizontal = horizontal;
        }
        if let Some(color) = patch.text_color {
            self.text_color = color;
        }
        if let Some(color) = patch.fill_color {
            self.fill_color = color;
        }
    }
}

/// A partial format update; `None` fields are left untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormatPatch {
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub horizontal: Option<HorizontalAlignment>,
    pub text_color: Option<Color>,
    pub fill_color: Option<Color>,
}

impl FormatPatch {
    /// Create an empty patch
    pub fn new() -> Self {
        Self::default()
    }

    /// Set bold
    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = Some(bold);
        self
    }

    /// Set italic
    pub fn italic(mut self, italic: bool) -> Self {
        self.italic = Some(italic);
        self
    }

    /// Set horizontal alignment
    pub fn horizontal(mut self, align: HorizontalAlignment) -> Self {
        self.horizontal = Some(align);
        self
    }

    /// Set text color
    pub fn text_color(mut self, color: Color) -> Self {
        self.text_color = Some(color);
        self
    }

    /// Set fill color
    pub fn fill_color(mut self, color: Color) -> Self {
        self.fill_color = Some(color);
        self
    }

    /// Check if the patch changes nothing
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
