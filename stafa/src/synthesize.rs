//! The end-to-end pipeline from template and font to final table.

use fnv::FnvHashSet;

use ot_read::types::{GlyphId, Tag};

use crate::dvips::{DvipsEncoding, LigKern};
use crate::encoding::{Code, GsubEncoding};
use crate::error::EncodeError;
use crate::font::Font;

/// Which script, language and features select the layout rules.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayoutQuery {
    /// The script tag; `DFLT` is tried when the font lacks it.
    pub script: Tag,

    /// The language system, `None` for the script's default.
    pub language: Option<Tag>,

    /// Feature tags selecting substitution lookups.
    pub gsub_features: Vec<Tag>,

    /// Feature tags selecting positioning lookups.
    pub gpos_features: Vec<Tag>,
}

impl Default for LayoutQuery {
    fn default() -> Self {
        LayoutQuery {
            script: Tag::new(b"latn"),
            language: None,
            gsub_features: vec![Tag::new(b"liga")],
            gpos_features: vec![Tag::new(b"kern")],
        }
    }
}

/// Knobs for one synthesis run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SynthesisOptions {
    /// The layout rules to apply.
    pub query: LayoutQuery,

    /// The size the final table must fit; 256 for an 8-bit encoding.
    pub table_size: usize,

    /// Whether pairwise reduction may coin fake ligature codes.
    pub fake_ligatures: bool,

    /// Whether to collect pair kerning from GPOS.
    pub gpos_kerns: bool,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        SynthesisOptions {
            query: LayoutQuery::default(),
            table_size: 256,
            fake_ligatures: true,
            gpos_kerns: true,
        }
    }
}

/// A kern between two codes of the final table, in font units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CodeKern {
    /// The code on the left.
    pub left: Code,
    /// The code on the right.
    pub right: Code,
    /// The adjustment to the left glyph's advance.
    pub value: i16,
}

/// What one synthesis run produced.
#[derive(Clone, Debug)]
pub struct Synthesis {
    /// The final code to glyph table, at most `table_size` codes.
    pub encoding: GsubEncoding,

    /// Pair kerns between canonical codes, first value per pair.
    pub kerns: Vec<CodeKern>,

    /// How many selected substitution rules changed the table.
    pub applied: usize,

    /// How many selected substitution rules found nothing to act on.
    pub skipped: usize,
}

/// Runs the whole pipeline over one template and font.
///
/// Seeds the table from the template, applies the selected substitution
/// rules, reduces ligatures to pairwise form, shrinks the table to
/// `table_size`, then collects kerning for the surviving codes. A
/// missing or unreadable GSUB or GPOS degrades that stage to a no-op;
/// the only error is a table that cannot be shrunk far enough.
pub fn synthesize(
    template: &DvipsEncoding,
    font: &Font,
    options: &SynthesisOptions,
) -> Result<Synthesis, EncodeError> {
    let mut encoding = template.make_gsub_encoding(font);
    let mut applied = 0;
    let mut skipped = 0;
    if let Some(gsub) = font.gsub() {
        let lookups = gsub.lookup_indices(
            options.query.script,
            options.query.language,
            &options.query.gsub_features,
        );
        match gsub.substitutions(&lookups) {
            Ok(substitutions) => {
                applied = encoding.apply_substitutions(&substitutions);
                skipped = substitutions.len() - applied;
            }
            Err(error) => log::warn!("ignoring unreadable substitutions: {error}"),
        }
    }
    encoding.simplify_ligatures(options.fake_ligatures);
    encoding.shrink_to(options.table_size)?;
    let kerns = if options.gpos_kerns {
        collect_kerns(template, font, &encoding, &options.query)
    } else {
        Vec::new()
    };
    Ok(Synthesis {
        encoding,
        kerns,
        applied,
        skipped,
    })
}

/// Pair kerns for the glyphs the final table binds.
fn collect_kerns(
    template: &DvipsEncoding,
    font: &Font,
    encoding: &GsubEncoding,
    query: &LayoutQuery,
) -> Vec<CodeKern> {
    let Some(gpos) = font.gpos() else {
        return Vec::new();
    };
    let mut glyphs: Vec<GlyphId> = encoding
        .codes()
        .filter_map(|glyph| glyph.glyph_id())
        .filter(|glyph| *glyph != GlyphId::NOTDEF)
        .collect();
    glyphs.sort_unstable();
    glyphs.dedup();
    let lookups = gpos.lookup_indices(query.script, query.language, &query.gpos_features);
    let pairs = match gpos.kern_pairs(&lookups, &glyphs) {
        Ok(pairs) => pairs,
        Err(error) => {
            log::warn!("ignoring unreadable kerning: {error}");
            return Vec::new();
        }
    };
    let suppressed = suppressed_pairs(template, font);
    let mut seen = FnvHashSet::default();
    let mut kerns = Vec::new();
    for pair in pairs {
        if suppressed.contains(&(pair.left, pair.right)) {
            continue;
        }
        let (Some(left), Some(right)) = (
            encoding.encoding(pair.left.into()),
            encoding.encoding(pair.right.into()),
        ) else {
            continue;
        };
        // An earlier lookup's value wins for a repeated pair.
        if seen.insert((left, right)) {
            kerns.push(CodeKern {
                left,
                right,
                value: pair.value,
            });
        }
    }
    kerns
}

/// The glyph pairs the template turns kerning off for.
fn suppressed_pairs(template: &DvipsEncoding, font: &Font) -> FnvHashSet<(GlyphId, GlyphId)> {
    template
        .ligkerns()
        .iter()
        .filter_map(|ligkern| match ligkern {
            LigKern::Suppress { left, right, what } if what.suppresses_kern() => Some((
                template.resolve_glyph(left, font)?,
                template.resolve_glyph(right, font)?,
            )),
            _ => None,
        })
        .collect()
}
