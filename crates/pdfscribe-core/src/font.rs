//! Standard font identifiers, glyph metrics and the name registry.
//!
//! Font names are resolved case-insensitively to one of the 14 standard
//! Type1 fonts. Metrics come from a [`MetricsProvider`]; the registry caches
//! them so each font is loaded at most once per registry.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::backend::MetricsProvider;
use crate::error::PdfError;

/// One of the 14 standard PDF Type1 fonts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StandardFont {
    Courier,
    CourierBold,
    CourierOblique,
    CourierBoldOblique,
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
    TimesRoman,
    TimesBold,
    TimesItalic,
    TimesBoldItalic,
    Symbol,
    ZapfDingbats,
}

impl StandardFont {
    /// All 14 fonts in declaration order.
    pub const ALL: [StandardFont; 14] = [
        StandardFont::Courier,
        StandardFont::CourierBold,
        StandardFont::CourierOblique,
        StandardFont::CourierBoldOblique,
        StandardFont::Helvetica,
        StandardFont::HelveticaBold,
        StandardFont::HelveticaOblique,
        StandardFont::HelveticaBoldOblique,
        StandardFont::TimesRoman,
        StandardFont::TimesBold,
        StandardFont::TimesItalic,
        StandardFont::TimesBoldItalic,
        StandardFont::Symbol,
        StandardFont::ZapfDingbats,
    ];

    /// The PostScript name written as `/BaseFont`.
    pub fn postscript_name(&self) -> &'static str {
        match self {
            StandardFont::Courier => "Courier",
            StandardFont::CourierBold => "Courier-Bold",
            StandardFont::CourierOblique => "Courier-Oblique",
            StandardFont::CourierBoldOblique => "Courier-BoldOblique",
            StandardFont::Helvetica => "Helvetica",
            StandardFont::HelveticaBold => "Helvetica-Bold",
            StandardFont::HelveticaOblique => "Helvetica-Oblique",
            StandardFont::HelveticaBoldOblique => "Helvetica-BoldOblique",
            StandardFont::TimesRoman => "Times-Roman",
            StandardFont::TimesBold => "Times-Bold",
            StandardFont::TimesItalic => "Times-Italic",
            StandardFont::TimesBoldItalic => "Times-BoldItalic",
            StandardFont::Symbol => "Symbol",
            StandardFont::ZapfDingbats => "ZapfDingbats",
        }
    }

    /// Symbolic fonts carry their own built-in encoding instead of WinAnsi.
    pub fn is_symbolic(&self) -> bool {
        matches!(self, StandardFont::Symbol | StandardFont::ZapfDingbats)
    }

    /// Resolve a font name, ignoring ASCII case.
    ///
    /// Accepts the `courier`, `helvetica`, `times` and `times-roman` families
    /// with an optional `-bold`, `-italic`/`-oblique` or
    /// `-bolditalic`/`-boldoblique` suffix, plus `symbol` and `zapfdingbats`.
    pub fn from_name(name: &str) -> Option<StandardFont> {
        let lower = name.to_ascii_lowercase();
        let (family, style) = match lower.split_once('-') {
            // "times-roman" is a family name, not a style.
            Some(("times", "roman")) => ("times", ""),
            Some(("times", rest)) if rest.starts_with("roman-") => ("times", &rest["roman-".len()..]),
            Some((_, "")) => return None,
            Some(pair) => pair,
            None => (lower.as_str(), ""),
        };

        let style = match style {
            "" => Style::Regular,
            "bold" => Style::Bold,
            "italic" | "oblique" => Style::Italic,
            "bolditalic" | "boldoblique" => Style::BoldItalic,
            _ => return None,
        };

        let font = match (family, style) {
            ("courier", Style::Regular) => StandardFont::Courier,
            ("courier", Style::Bold) => StandardFont::CourierBold,
            ("courier", Style::Italic) => StandardFont::CourierOblique,
            ("courier", Style::BoldItalic) => StandardFont::CourierBoldOblique,
            ("helvetica", Style::Regular) => StandardFont::Helvetica,
            ("helvetica", Style::Bold) => StandardFont::HelveticaBold,
            ("helvetica", Style::Italic) => StandardFont::HelveticaOblique,
            ("helvetica", Style::BoldItalic) => StandardFont::HelveticaBoldOblique,
            ("times", Style::Regular) => StandardFont::TimesRoman,
            ("times", Style::Bold) => StandardFont::TimesBold,
            ("times", Style::Italic) => StandardFont::TimesItalic,
            ("times", Style::BoldItalic) => StandardFont::TimesBoldItalic,
            ("symbol", Style::Regular) => StandardFont::Symbol,
            ("zapfdingbats", Style::Regular) => StandardFont::ZapfDingbats,
            _ => return None,
        };
        Some(font)
    }
}

#[derive(Clone, Copy)]
enum Style {
    Regular,
    Bold,
    Italic,
    BoldItalic,
}

/// Glyph metrics for one font.
///
/// Widths are looked up in two steps: the character code selects a glyph,
/// and the glyph selects a width in font units. Glyph 0 is `.notdef`.
#[derive(Debug, Clone, PartialEq)]
pub struct FontMetrics {
    units_per_em: u16,
    code_to_glyph: [u16; 256],
    glyph_widths: Vec<u16>,
}

impl FontMetrics {
    /// Build metrics from a code→glyph table and per-glyph widths.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::FontError`] if `units_per_em` is zero, the width
    /// table is empty, or a code maps to a glyph outside the width table.
    pub fn new(
        units_per_em: u16,
        code_to_glyph: [u16; 256],
        glyph_widths: Vec<u16>,
    ) -> Result<Self, PdfError> {
        if units_per_em == 0 {
            return Err(PdfError::FontError("units per em must be positive".into()));
        }
        if glyph_widths.is_empty() {
            return Err(PdfError::FontError("font has no glyphs".into()));
        }
        if let Some(code) = code_to_glyph
            .iter()
            .position(|&glyph| usize::from(glyph) >= glyph_widths.len())
        {
            return Err(PdfError::FontError(format!(
                "code {code} maps to glyph {} but only {} glyphs exist",
                code_to_glyph[code],
                glyph_widths.len()
            )));
        }
        Ok(Self {
            units_per_em,
            code_to_glyph,
            glyph_widths,
        })
    }

    /// Font units per em square.
    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    /// Number of glyphs, `.notdef` included.
    pub fn glyph_count(&self) -> usize {
        self.glyph_widths.len()
    }

    /// Glyph selected by a single-byte character code.
    pub fn glyph_for_code(&self, code: u8) -> u16 {
        self.code_to_glyph[usize::from(code)]
    }

    /// Advance width of a glyph in font units.
    pub fn glyph_width(&self, glyph: u16) -> u16 {
        self.glyph_widths
            .get(usize::from(glyph))
            .copied()
            .unwrap_or(self.glyph_widths[0])
    }

    /// Widths, in font units, of each character code.
    pub fn glyph_widths(&self, codes: &[u8]) -> Vec<u16> {
        codes
            .iter()
            .map(|&code| self.glyph_width(self.glyph_for_code(code)))
            .collect()
    }

    /// Width of `bytes` set at `size` points.
    ///
    /// Each byte is one character code; there is no multi-byte decoding, so
    /// UTF-8 text outside ASCII is measured byte by byte.
    pub fn text_width(&self, bytes: &[u8], size: f64) -> f64 {
        let units: u64 = self
            .glyph_widths(bytes)
            .into_iter()
            .map(u64::from)
            .sum();
        units as f64 / f64::from(self.units_per_em) * size
    }
}

/// A resolved standard font together with its loaded metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct FontHandle {
    font: StandardFont,
    metrics: Arc<FontMetrics>,
}

impl FontHandle {
    pub fn new(font: StandardFont, metrics: Arc<FontMetrics>) -> Self {
        Self { font, metrics }
    }

    pub fn font(&self) -> StandardFont {
        self.font
    }

    pub fn metrics(&self) -> &FontMetrics {
        &self.metrics
    }
}

/// Resolves font names and caches their metrics.
pub struct FontRegistry {
    provider: Arc<dyn MetricsProvider>,
    loaded: Mutex<HashMap<StandardFont, Arc<FontMetrics>>>,
}

impl std::fmt::Debug for FontRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cached = self.loaded.lock().map(|m| m.len()).unwrap_or(0);
        f.debug_struct("FontRegistry")
            .field("cached", &cached)
            .finish_non_exhaustive()
    }
}

impl FontRegistry {
    pub fn new(provider: Arc<dyn MetricsProvider>) -> Self {
        Self {
            provider,
            loaded: Mutex::new(HashMap::new()),
        }
    }

    /// Resolve a name without loading metrics.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::NotFound`] for names outside the standard table.
    pub fn resolve(&self, name: &str) -> Result<StandardFont, PdfError> {
        StandardFont::from_name(name).ok_or_else(|| PdfError::NotFound(name.to_string()))
    }

    /// Resolve a name and load its metrics.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::NotFound`] for unknown names and whatever the
    /// metrics provider reports (normally [`PdfError::FontError`]) when the
    /// metrics cannot be loaded.
    pub fn load(&self, name: &str) -> Result<FontHandle, PdfError> {
        let font = self.resolve(name)?;
        let mut loaded = self
            .loaded
            .lock()
            .map_err(|_| PdfError::FontError("font cache poisoned".into()))?;
        if let Some(metrics) = loaded.get(&font) {
            return Ok(FontHandle::new(font, Arc::clone(metrics)));
        }
        let metrics = Arc::new(self.provider.load_metrics(font)?);
        tracing::debug!(font = font.postscript_name(), "loaded font metrics");
        loaded.insert(font, Arc::clone(&metrics));
        Ok(FontHandle::new(font, metrics))
    }
}
