//! The [GSUB (glyph substitution)](https://docs.microsoft.com/en-us/typography/opentype/spec/gsub) table

use types::{GlyphId, Tag};

use crate::array::ScalarArray;
use crate::read::{ReadError, TableRead};
use crate::table_data::TableData;
use crate::tables::layout::{self, CoverageTable, LayoutLists, Lookup};

/// The glyph substitution table.
#[derive(Clone)]
pub struct Gsub<'a> {
    lists: LayoutLists<'a>,
}

/// One substitution rule flattened out of a lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Substitution {
    /// Replace one glyph with another.
    Single {
        /// The glyph being replaced.
        from: GlyphId,
        /// Its replacement.
        to: GlyphId,
    },
    /// Replace a glyph sequence with a single ligature glyph.
    Ligature {
        /// The glyphs replaced, in text order; never empty.
        components: Vec<GlyphId>,
        /// The ligature glyph standing in for them.
        ligature: GlyphId,
    },
}

impl<'a> TableRead<'a> for Gsub<'a> {
    fn read(data: TableData<'a>) -> Result<Self, ReadError> {
        let lists = layout::read_layout_lists(data)?;
        Ok(Gsub { lists })
    }
}

impl<'a> Gsub<'a> {
    /// The lookup indices selected by a script, language and feature set.
    pub fn lookup_indices(&self, script: Tag, language: Option<Tag>, features: &[Tag]) -> Vec<u16> {
        layout::selected_lookups(
            &self.lists.scripts,
            &self.lists.features,
            script,
            language,
            features,
        )
    }

    /// Flattens the given lookups into substitution rules.
    ///
    /// Lookups are visited in the order given, subtables in table order,
    /// so earlier rules take priority under first-match application.
    /// Single (type 1) and ligature (type 4) substitutions are collected,
    /// reaching through extensions (type 7); contextual and other lookup
    /// types are skipped.
    pub fn substitutions(&self, lookup_indices: &[u16]) -> Result<Vec<Substitution>, ReadError> {
        let mut substitutions = Vec::new();
        for &index in lookup_indices {
            let lookup = self.lists.lookups.lookup(index)?;
            append_lookup(&lookup, &mut substitutions)?;
        }
        Ok(substitutions)
    }
}

fn append_lookup(lookup: &Lookup, out: &mut Vec<Substitution>) -> Result<(), ReadError> {
    match lookup.lookup_type() {
        1 => {
            for data in lookup.subtables() {
                append_single(data, out)?;
            }
        }
        4 => {
            for data in lookup.subtables() {
                append_ligatures(data, out)?;
            }
        }
        7 => {
            for data in lookup.subtables() {
                let (lookup_type, inner) = layout::read_extension(data)?;
                match lookup_type {
                    1 => append_single(inner, out)?,
                    4 => append_ligatures(inner, out)?,
                    other => log::trace!("skipping extension substitution type {other}"),
                }
            }
        }
        other => log::trace!("skipping substitution lookup type {other}"),
    }
    Ok(())
}

fn append_single(data: TableData, out: &mut Vec<Substitution>) -> Result<(), ReadError> {
    let mut cursor = data.cursor();
    let format: u16 = cursor.read()?;
    let coverage_offset: u16 = cursor.read()?;
    let coverage = CoverageTable::read(
        data.split_off(coverage_offset as usize)
            .ok_or(ReadError::OutOfBounds)?,
    )?;
    match format {
        1 => {
            let delta: i16 = cursor.read()?;
            cursor.finish()?;
            for from in coverage.iter() {
                // The delta wraps modulo the glyph id space.
                let to = GlyphId::new(from.to_u16().wrapping_add(delta as u16));
                out.push(Substitution::Single { from, to });
            }
        }
        2 => {
            let count: u16 = cursor.read()?;
            let substitutes: ScalarArray<GlyphId> = cursor.read_array(count as usize)?;
            cursor.finish()?;
            for (index, from) in coverage.iter().enumerate() {
                let Some(to) = substitutes.get(index) else {
                    break;
                };
                out.push(Substitution::Single { from, to });
            }
        }
        other => return Err(ReadError::InvalidFormat(other as i64)),
    }
    Ok(())
}

fn append_ligatures(data: TableData, out: &mut Vec<Substitution>) -> Result<(), ReadError> {
    let mut cursor = data.cursor();
    let format: u16 = cursor.read()?;
    if format != 1 {
        return Err(ReadError::InvalidFormat(format as i64));
    }
    let coverage_offset: u16 = cursor.read()?;
    let set_count: u16 = cursor.read()?;
    let set_offsets: ScalarArray<u16> = cursor.read_array(set_count as usize)?;
    cursor.finish()?;
    let coverage = CoverageTable::read(
        data.split_off(coverage_offset as usize)
            .ok_or(ReadError::OutOfBounds)?,
    )?;
    // The coverage glyph is the first component of every ligature in the
    // set it indexes.
    for (first, set_offset) in coverage.iter().zip(set_offsets.iter()) {
        let set = data
            .split_off(set_offset as usize)
            .ok_or(ReadError::OutOfBounds)?;
        let mut set_cursor = set.cursor();
        let ligature_count: u16 = set_cursor.read()?;
        let ligature_offsets: ScalarArray<u16> = set_cursor.read_array(ligature_count as usize)?;
        set_cursor.finish()?;
        for ligature_offset in ligature_offsets.iter() {
            let ligature_data = set
                .split_off(ligature_offset as usize)
                .ok_or(ReadError::OutOfBounds)?;
            let mut ligature_cursor = ligature_data.cursor();
            let ligature: GlyphId = ligature_cursor.read()?;
            let component_count: u16 = ligature_cursor.read()?;
            if component_count == 0 {
                return Err(ReadError::MalformedData("ligature with no components"));
            }
            let rest: ScalarArray<GlyphId> =
                ligature_cursor.read_array(component_count as usize - 1)?;
            ligature_cursor.finish()?;
            let mut components = Vec::with_capacity(component_count as usize);
            components.push(first);
            components.extend(rest.iter());
            out.push(Substitution::Ligature {
                components,
                ligature,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ot_test_data::glyphs;
    use ot_test_data::gsub as test_data;

    const LIGA: Tag = Tag::new(b"liga");
    const LATN: Tag = Tag::new(b"latn");

    fn gid(raw: u16) -> GlyphId {
        GlyphId::new(raw)
    }

    fn parse(bytes: &[u8]) -> Gsub {
        Gsub::read(TableData::new(bytes)).unwrap()
    }

    #[test]
    fn ligature_rules() {
        let buf = test_data::ligatures();
        let gsub = parse(&buf);
        let lookups = gsub.lookup_indices(LATN, None, &[LIGA]);
        assert_eq!(lookups, [0]);
        let rules = gsub.substitutions(&lookups).unwrap();
        assert_eq!(
            rules,
            [
                Substitution::Ligature {
                    components: vec![gid(glyphs::F), gid(glyphs::F), gid(glyphs::I)],
                    ligature: gid(glyphs::FFI),
                },
                Substitution::Ligature {
                    components: vec![gid(glyphs::F), gid(glyphs::I)],
                    ligature: gid(glyphs::FI),
                },
            ]
        );
    }

    #[test]
    fn single_rules() {
        let buf = test_data::singles();
        let gsub = parse(&buf);
        let lookups = gsub.lookup_indices(LATN, None, &[Tag::new(b"smcp")]);
        let rules = gsub.substitutions(&lookups).unwrap();
        assert_eq!(
            rules,
            [
                Substitution::Single { from: gid(1), to: gid(5) },
                Substitution::Single { from: gid(2), to: gid(6) },
                Substitution::Single { from: gid(7), to: gid(107) },
            ]
        );
    }

    #[test]
    fn extension_wrapped_ligatures() {
        let buf = test_data::extension_ligatures();
        let gsub = parse(&buf);
        let lookups = gsub.lookup_indices(LATN, None, &[LIGA]);
        let rules = gsub.substitutions(&lookups).unwrap();
        assert_eq!(rules.len(), 2);
        assert!(matches!(
            &rules[0],
            Substitution::Ligature { ligature, .. } if *ligature == gid(glyphs::FFI)
        ));
    }

    #[test]
    fn unknown_script_falls_back_to_dflt() {
        let buf = test_data::ligatures_with_script(*b"DFLT");
        let gsub = parse(&buf);
        let lookups = gsub.lookup_indices(LATN, None, &[LIGA]);
        assert_eq!(lookups, [0]);
    }

    #[test]
    fn unknown_script_without_dflt_selects_nothing() {
        let buf = test_data::ligatures_with_script(*b"grek");
        let gsub = parse(&buf);
        let lookups = gsub.lookup_indices(LATN, None, &[LIGA]);
        assert!(lookups.is_empty());
    }

    #[test]
    fn unknown_language_falls_back_to_default_lang_sys() {
        let buf = test_data::ligatures();
        let gsub = parse(&buf);
        let lookups = gsub.lookup_indices(LATN, Some(Tag::new(b"TRK ")), &[LIGA]);
        assert_eq!(lookups, [0]);
    }

    #[test]
    fn unselected_features_contribute_nothing() {
        let buf = test_data::ligatures();
        let gsub = parse(&buf);
        assert!(gsub.lookup_indices(LATN, None, &[Tag::new(b"smcp")]).is_empty());
    }

    #[test]
    fn blank_and_bad_version() {
        assert!(matches!(
            Gsub::read(TableData::new(&[])),
            Err(ReadError::BlankTable)
        ));
        let version2 = [0u8, 2, 0, 0, 0, 10, 0, 10, 0, 10];
        assert!(matches!(
            Gsub::read(TableData::new(&version2)),
            Err(ReadError::InvalidFormat(2))
        ));
    }
}
