//! The parsed tables of one font, bundled for synthesis.

use fnv::FnvHashMap;

use ot_read::tables::cmap::Cmap;
use ot_read::tables::fvar::Fvar;
use ot_read::tables::gpos::Gpos;
use ot_read::tables::gsub::Gsub;
use ot_read::tables::post::{Post, DEFAULT_GLYPH_NAMES};
use ot_read::types::{GlyphId, Tag};
use ot_read::{ReadError, TableData, TableRead};

/// Raw table bytes, located in a font file by the caller.
///
/// Every table is optional. Synthesis degrades around whatever is
/// missing: no `cmap` means names resolve only through `post`, no
/// `GSUB` means no substitutions, and so on.
#[derive(Clone, Copy, Debug, Default)]
pub struct TableSet<'a> {
    /// The character map.
    pub cmap: Option<&'a [u8]>,
    /// Glyph substitution rules.
    pub gsub: Option<&'a [u8]>,
    /// Glyph positioning rules.
    pub gpos: Option<&'a [u8]>,
    /// Glyph names.
    pub post: Option<&'a [u8]>,
    /// Variation axes.
    pub fvar: Option<&'a [u8]>,
}

/// A table that could not be used, and why.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// The table's tag.
    pub table: Tag,
    /// The failure its parser reported.
    pub error: ReadError,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.table, self.error)
    }
}

/// The parsed tables of one font.
///
/// Construction validates each table up front; whatever fails to parse
/// is dropped from the font rather than failing it, so lookups against
/// a broken table are ordinary misses.
#[derive(Clone, Default)]
pub struct Font<'a> {
    cmap: Option<Cmap<'a>>,
    gsub: Option<Gsub<'a>>,
    gpos: Option<Gpos<'a>>,
    post: Option<Post<'a>>,
    fvar: Option<Fvar<'a>>,
    glyph_by_name: FnvHashMap<&'a str, GlyphId>,
}

impl<'a> Font<'a> {
    /// Parses the given tables, logging a warning per unusable one.
    pub fn new(tables: &TableSet<'a>) -> Font<'a> {
        Self::with_diagnostics(tables, &mut |diagnostic| {
            log::warn!("disabling {}: {}", diagnostic.table, diagnostic.error);
        })
    }

    /// Parses the given tables, reporting each failure to `report`.
    pub fn with_diagnostics(
        tables: &TableSet<'a>,
        report: &mut impl FnMut(Diagnostic),
    ) -> Font<'a> {
        fn parse<'a, T: TableRead<'a>>(
            bytes: Option<&'a [u8]>,
            tag: &[u8; 4],
            report: &mut impl FnMut(Diagnostic),
        ) -> Option<T> {
            match T::read(TableData::new(bytes?)) {
                Ok(table) => Some(table),
                Err(error) => {
                    report(Diagnostic {
                        table: Tag::new(tag),
                        error,
                    });
                    None
                }
            }
        }
        let cmap = parse(tables.cmap, b"cmap", report);
        let gsub = parse(tables.gsub, b"GSUB", report);
        let gpos = parse(tables.gpos, b"GPOS", report);
        let post: Option<Post<'a>> = parse(tables.post, b"post", report);
        let fvar = parse(tables.fvar, b"fvar", report);
        let glyph_by_name = post.as_ref().map(name_map).unwrap_or_default();
        Font {
            cmap,
            gsub,
            gpos,
            post,
            fvar,
            glyph_by_name,
        }
    }

    /// Maps a codepoint through the character map.
    pub fn map_codepoint(&self, codepoint: impl Into<u32>) -> Option<GlyphId> {
        self.cmap.as_ref()?.map_codepoint(codepoint)
    }

    /// The glyph carrying `name` in the `post` table.
    ///
    /// When several glyphs share a name the lowest one wins.
    pub fn glyph_for_name(&self, name: &str) -> Option<GlyphId> {
        self.glyph_by_name.get(name).copied()
    }

    /// The `post` name of a glyph.
    pub fn glyph_name(&self, glyph: GlyphId) -> Option<&'a str> {
        self.post.as_ref()?.glyph_name(glyph)
    }

    /// The character map, if present and readable.
    pub fn cmap(&self) -> Option<&Cmap<'a>> {
        self.cmap.as_ref()
    }

    /// The substitution table, if present and readable.
    pub fn gsub(&self) -> Option<&Gsub<'a>> {
        self.gsub.as_ref()
    }

    /// The positioning table, if present and readable.
    pub fn gpos(&self) -> Option<&Gpos<'a>> {
        self.gpos.as_ref()
    }

    /// The glyph name table, if present and readable.
    pub fn post(&self) -> Option<&Post<'a>> {
        self.post.as_ref()
    }

    /// The variation axis table, if present and readable.
    pub fn fvar(&self) -> Option<&Fvar<'a>> {
        self.fvar.as_ref()
    }
}

/// Inverts the `post` names into a name to glyph map.
fn name_map<'a>(post: &Post<'a>) -> FnvHashMap<&'a str, GlyphId> {
    let custom: Vec<&'a str> = post
        .name_data()
        .map(|bytes| std::str::from_utf8(bytes).unwrap_or(""))
        .collect();
    let mut map = FnvHashMap::default();
    for gid in 0..post.num_names() {
        let glyph = GlyphId::new(gid as u16);
        let Some(index) = post.name_index(glyph) else {
            continue;
        };
        let index = index as usize;
        let name = if index < DEFAULT_GLYPH_NAMES.len() {
            DEFAULT_GLYPH_NAMES[index]
        } else {
            custom
                .get(index - DEFAULT_GLYPH_NAMES.len())
                .copied()
                .unwrap_or("")
        };
        if name.is_empty() || name == ".notdef" {
            continue;
        }
        map.entry(name).or_insert(glyph);
    }
    map
}

#[cfg(test)]
mod tests {
    use ot_test_data::{cmap, glyphs, post};

    use super::*;

    #[test]
    fn names_resolve_both_ways() {
        let buf = post::ligature_names();
        let font = Font::new(&TableSet {
            post: Some(buf.as_slice()),
            ..Default::default()
        });
        assert_eq!(font.glyph_for_name("fi"), Some(GlyphId::new(glyphs::FI)));
        assert_eq!(font.glyph_name(GlyphId::new(glyphs::A)), Some("A"));
        assert_eq!(font.glyph_for_name("Q"), None);
        assert_eq!(font.glyph_for_name(".notdef"), None);
    }

    #[test]
    fn codepoints_resolve_through_cmap() {
        let buf = cmap::basic();
        let font = Font::new(&TableSet {
            cmap: Some(buf.as_slice()),
            ..Default::default()
        });
        assert_eq!(font.map_codepoint('f'), Some(GlyphId::new(glyphs::F)));
        assert_eq!(font.map_codepoint('q'), None);
    }

    #[test]
    fn the_lowest_glyph_wins_a_shared_name() {
        let mut buf = vec![0u8; 32];
        buf[..4].copy_from_slice(&0x00020000u32.to_be_bytes());
        buf.extend_from_slice(&3u16.to_be_bytes());
        for index in [0u16, 3, 3] {
            buf.extend_from_slice(&index.to_be_bytes());
        }
        let font = Font::new(&TableSet {
            post: Some(&buf),
            ..Default::default()
        });
        assert_eq!(font.glyph_for_name("space"), Some(GlyphId::new(1)));
    }

    #[test]
    fn broken_tables_are_reported_and_dropped() {
        let gsub = [0u8, 2, 0, 0];
        let mut diagnostics = Vec::new();
        let font = Font::with_diagnostics(
            &TableSet {
                gsub: Some(&gsub),
                post: Some(&[]),
                ..Default::default()
            },
            &mut |diagnostic| diagnostics.push(diagnostic),
        );
        assert!(font.gsub().is_none());
        assert!(font.post().is_none());
        assert_eq!(
            diagnostics,
            [
                Diagnostic {
                    table: Tag::new(b"GSUB"),
                    error: ReadError::InvalidFormat(2),
                },
                Diagnostic {
                    table: Tag::new(b"post"),
                    error: ReadError::BlankTable,
                },
            ]
        );
    }
}
