//! Static font-metric tables for the two PDF base-14 faces the exporter uses.
//!
//! Widths are in em units (AFM widths / 1000) so measurements scale with the
//! font size. Base-14 fonts are never embedded, so these tables are the only
//! source of glyph widths for line breaking.
//! All tables cover ASCII 0x20..=0x7E (95 printable characters).
//! Index = (char as usize) - 32.

use crate::resume::models::Columns;

/// Points per millimetre.
pub const MM: f32 = 72.0 / 25.4;

// ────────────────────────────────────────────────────────────────────────────
// Font faces
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFace {
    Regular,
    Bold,
}

impl FontFace {
    /// PostScript name of the base-14 font backing this face.
    pub fn base_font(self) -> &'static [u8] {
        match self {
            FontFace::Regular => b"Helvetica",
            FontFace::Bold => b"Helvetica-Bold",
        }
    }

    /// Resource name the page content streams refer to.
    pub fn resource_name(self) -> &'static [u8] {
        match self {
            FontFace::Regular => b"F1",
            FontFace::Bold => b"F2",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Page configuration
// ────────────────────────────────────────────────────────────────────────────

/// Page geometry and type sizes, all in PDF points.
#[derive(Debug, Clone)]
pub struct PageConfig {
    pub page_width_pt: f32,
    pub page_height_pt: f32,
    pub margin_pt: f32,
    /// Horizontal gap between the two frames of a two-column layout.
    pub column_gap_pt: f32,
    pub title_size_pt: f32,
    pub heading_size_pt: f32,
    pub body_size_pt: f32,
    /// Baseline-to-baseline distance as a multiple of the font size.
    pub leading: f32,
}

/// A4 portrait, 14 mm margins on every side, 8 mm column gap.
pub fn default_page_config() -> PageConfig {
    PageConfig {
        page_width_pt: 595.28,
        page_height_pt: 841.89,
        margin_pt: 14.0 * MM,
        column_gap_pt: 8.0 * MM,
        title_size_pt: 20.0,
        heading_size_pt: 12.0,
        body_size_pt: 10.0,
        leading: 1.2,
    }
}

impl PageConfig {
    pub fn usable_width(&self) -> f32 {
        self.page_width_pt - 2.0 * self.margin_pt
    }

    pub fn column_width(&self, columns: Columns) -> f32 {
        let n = columns.count() as f32;
        (self.usable_width() - self.column_gap_pt * (n - 1.0)) / n
    }

    /// Left edge of column `index` (0-based).
    pub fn column_x(&self, columns: Columns, index: usize) -> f32 {
        self.margin_pt + index as f32 * (self.column_width(columns) + self.column_gap_pt)
    }

    pub fn top_y(&self) -> f32 {
        self.page_height_pt - self.margin_pt
    }

    pub fn bottom_y(&self) -> f32 {
        self.margin_pt
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// Static character-width table for a font face.
///
/// `widths[i]` = width of ASCII character `(i + 32)` at 1em.
pub struct FontMetricTable {
    widths: [f32; 95],
    /// Fallback width for non-ASCII characters (codepoints > 0x7E).
    pub average_char_width: f32,
}

impl FontMetricTable {
    /// Measures the rendered width of a string in em units.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars().map(|c| self.char_width(c)).sum()
    }

    /// Width of `s` in points at `size_pt`.
    #[cfg(test)]
    fn width_pt(&self, s: &str, size_pt: f32) -> f32 {
        self.measure_str(s) * size_pt
    }

    fn char_width(&self, c: char) -> f32 {
        let code = c as usize;
        if (32..=126).contains(&code) {
            self.widths[code - 32]
        } else {
            self.average_char_width
        }
    }

    /// Greedy word-wrap of `s` into lines no wider than `max_width_pt`.
    ///
    /// A single word wider than the line (typically a URL) is broken between
    /// characters. Whitespace-only input yields no lines.
    pub fn wrap(&self, s: &str, size_pt: f32, max_width_pt: f32) -> Vec<String> {
        let max_em = max_width_pt / size_pt;
        let space = self.char_width(' ');
        let mut lines = Vec::new();
        let mut current = String::new();
        let mut current_width = 0.0_f32;

        for word in s.split_whitespace() {
            let word_w = self.measure_str(word);
            if !current.is_empty() {
                if current_width + space + word_w <= max_em {
                    current.push(' ');
                    current.push_str(word);
                    current_width += space + word_w;
                    continue;
                }
                lines.push(std::mem::take(&mut current));
                current_width = 0.0;
            }

            if word_w <= max_em {
                current.push_str(word);
                current_width = word_w;
                continue;
            }

            for c in word.chars() {
                let w = self.char_width(c);
                if !current.is_empty() && current_width + w > max_em {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0.0;
                }
                current.push(c);
                current_width += w;
            }
        }

        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables  (95 ASCII printable characters each)
// ────────────────────────────────────────────────────────────────────────────

static HELVETICA_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp    !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.278, 0.355, 0.556, 0.556, 0.889, 0.667, 0.191, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0     1      2      3      4      5      6      7      8      9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :     ;      <      =      >      ?      @
        0.278, 0.278, 0.584, 0.584, 0.584, 0.556, 1.015,
        // A     B      C      D      E      F      G      H      I      J      K      L      M
        0.667, 0.667, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.500, 0.667, 0.556, 0.833,
        // N     O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [     \      ]      ^      _      `
        0.278, 0.278, 0.278, 0.469, 0.556, 0.333,
        // a     b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.556, 0.500, 0.556, 0.556, 0.278, 0.556, 0.556, 0.222, 0.222, 0.500, 0.222, 0.833,
        // n     o      p      q      r      s      t      u      v      w      x      y      z
        0.556, 0.556, 0.556, 0.556, 0.333, 0.500, 0.278, 0.556, 0.500, 0.722, 0.500, 0.500, 0.500,
        // {     |      }      ~
        0.334, 0.260, 0.334, 0.584,
    ],
    average_char_width: 0.556,
};

static HELVETICA_BOLD_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp    !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.333, 0.474, 0.556, 0.556, 0.889, 0.722, 0.238, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0     1      2      3      4      5      6      7      8      9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :     ;      <      =      >      ?      @
        0.333, 0.333, 0.584, 0.584, 0.584, 0.611, 0.975,
        // A     B      C      D      E      F      G      H      I      J      K      L      M
        0.722, 0.722, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.556, 0.722, 0.611, 0.833,
        // N     O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [     \      ]      ^      _      `
        0.333, 0.278, 0.333, 0.584, 0.556, 0.333,
        // a     b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.611, 0.556, 0.611, 0.556, 0.333, 0.611, 0.611, 0.278, 0.278, 0.556, 0.278, 0.889,
        // n     o      p      q      r      s      t      u      v      w      x      y      z
        0.611, 0.611, 0.611, 0.611, 0.389, 0.556, 0.333, 0.611, 0.556, 0.778, 0.556, 0.556, 0.500,
        // {     |      }      ~
        0.389, 0.280, 0.389, 0.584,
    ],
    average_char_width: 0.611,
};

/// Returns the static metric table for a given face.
pub fn get_metrics(face: FontFace) -> &'static FontMetricTable {
    match face {
        FontFace::Regular => &HELVETICA_TABLE,
        FontFace::Bold => &HELVETICA_BOLD_TABLE,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
