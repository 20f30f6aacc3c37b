//! Cell contents as entered by a user

use crate::style::CellFormat;

/// The authoritative content of a cell
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum CellContent {
    /// No content
    #[default]
    Empty,
    /// Literal text, displayed as entered
    Text(String),
    /// Formula text including the leading `=`
    Formula(String),
}

impl CellContent {
    /// Classify text typed into a cell
    ///
    /// Text starting with `=` is a formula, empty text clears the cell,
    /// anything else is stored literally.
    ///
    /// ```
    /// use cellgrid_core::CellContent;
    ///
    /// assert_eq!(CellContent::from_input("=A1+1"), CellContent::Formula("=A1+1".into()));
    /// assert_eq!(CellContent::from_input("42"), CellContent::Text("42".into()));
    /// assert_eq!(CellContent::from_input(""), CellContent::Empty);
    /// ```
    pub fn from_input<S: Into<String>>(text: S) -> Self {
        let text = text.into();
        if text.is_empty() {
            CellContent::Empty
        } else if text.starts_with('=') {
            CellContent::Formula(text)
        } else {
            CellContent::Text(text)
        }
    }

    /// Check if there is no content
    pub fn is_empty(&self) -> bool {
        matches!(self, CellContent::Empty)
    }
}

impl From<&str> for CellContent {
    fn from(s: &str) -> Self {
        CellContent::from_input(s)
    }
}

impl From<String> for CellContent {
    fn from(s: String) -> Self {
        CellContent::from_input(s)
    }
}

/// Complete data for a single cell
///
/// At most one of `raw_text` and `formula` is set. A cell with neither
/// displays as "" and behaves like an absent cell.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellData {
    /// Literal text, when the cell is not a formula
    pub raw_text: Option<String>,
    /// Formula text beginning with `=`
    pub formula: Option<String>,
    /// Presentation-only format
    pub format: CellFormat,
}

impl CellData {
    /// Create a cell from content with the default format
    pub fn new(content: CellContent) -> Self {
        let mut cell = Self::default();
        cell.set_content(content);
        cell
    }

    /// Replace the content, keeping the format
    ///
    /// Writing a formula clears any literal text and vice versa.
    pub fn set_content(&mut self, content: CellContent) {
        match content {
            CellContent::Empty => {
                self.raw_text = None;
                self.formula = None;
            }
            CellContent::Text(text) => {
                self.raw_text = Some(text);
                self.formula = None;
            }
            CellContent::Formula(text) => {
                self.raw_text = None;
                self.formula = Some(text);
            }
        }
    }

    /// The current content
    pub fn content(&self) -> CellContent {
        if let Some(formula) = &self.formula {
            CellContent::Formula(formula.clone())
        } else if let Some(text) = &self.raw_text {
            CellContent::Text(text.clone())
        } else {
            CellContent::Empty
        }
    }

    /// Get the formula text if this is a formula cell
    pub fn formula_text(&self) -> Option<&str> {
        self.formula.as_deref()
    }

    /// Check if the cell has text or a formula
    pub fn has_content(&self) -> bool {
        self.raw_text.is_some() || self.formula.is_some()
    }

    /// Check if the cell is indistinguishable from an absent one
    pub fn is_empty(&self) -> bool {
        !self.has_content() && self.format.is_default()
    }

    /// The text a user would see in the edit box
    pub fn input_text(&self) -> &str {
        self.formula
            .as_deref()
            .or(self.raw_text.as_deref())
            .unwrap_or("")
    }
}
