//! Per-session layout settings.

/// Options controlling text layout in a [`Session`](crate::Session).
///
/// Provides the defaults used by PDFlib-style line continuation and box text.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SessionOptions {
    /// Distance `continue_text` moves the cursor down, in points (default: 14.4).
    pub line_height: f64,
    /// Line spacing of `show_boxed` as a multiple of the font size (default: 1.2).
    pub box_leading: f64,
    /// Estimated glyph width of `show_boxed` as a multiple of the font size
    /// (default: 0.5).
    pub average_char_width: f64,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            line_height: 14.4,
            box_leading: 1.2,
            average_char_width: 0.5,
        }
    }
}

impl SessionOptions {
    pub fn with_line_height(mut self, line_height: f64) -> Self {
        self.line_height = line_height;
        self
    }

    pub fn with_box_leading(mut self, box_leading: f64) -> Self {
        self.box_leading = box_leading;
        self
    }

    pub fn with_average_char_width(mut self, average_char_width: f64) -> Self {
        self.average_char_width = average_char_width;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let opts = SessionOptions::default();
        assert_eq!(opts.line_height, 14.4);
        assert_eq!(opts.box_leading, 1.2);
        assert_eq!(opts.average_char_width, 0.5);
    }

    #[test]
    fn builder_overrides_single_field() {
        let opts = SessionOptions::default().with_line_height(20.0);
        assert_eq!(opts.line_height, 20.0);
        assert_eq!(opts.box_leading, 1.2);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn partial_json_fills_defaults() {
        let opts: SessionOptions = serde_json::from_str(r#"{"line_height": 18.0}"#).unwrap();
        assert_eq!(opts.line_height, 18.0);
        assert_eq!(opts.average_char_width, 0.5);
    }
}
