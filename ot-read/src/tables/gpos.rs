//! The [GPOS (glyph positioning)](https://docs.microsoft.com/en-us/typography/opentype/spec/gpos) table

use types::{GlyphId, Tag};

use crate::array::ScalarArray;
use crate::read::{ReadError, TableRead};
use crate::table_data::TableData;
use crate::tables::layout::{self, ClassDefTable, CoverageTable, LayoutLists};

/// The value record flag for an x advance adjustment.
const X_ADVANCE: u16 = 0x0004;

/// The glyph positioning table.
#[derive(Clone)]
pub struct Gpos<'a> {
    lists: LayoutLists<'a>,
}

/// A horizontal advance adjustment between two adjacent glyphs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KernPair {
    /// The first glyph of the pair.
    pub left: GlyphId,
    /// The second glyph of the pair.
    pub right: GlyphId,
    /// The x advance adjustment of the first glyph, in font units.
    pub value: i16,
}

impl<'a> TableRead<'a> for Gpos<'a> {
    fn read(data: TableData<'a>) -> Result<Self, ReadError> {
        let lists = layout::read_layout_lists(data)?;
        Ok(Gpos { lists })
    }
}

impl<'a> Gpos<'a> {
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

    /// Collects pair kerning between glyphs of the given set.
    ///
    /// `glyphs` must be sorted; only pairs with both sides in the set are
    /// reported, and zero adjustments are dropped. Pair positioning
    /// (type 2) is read directly and through extensions (type 9); other
    /// lookup types are skipped.
    pub fn kern_pairs(
        &self,
        lookup_indices: &[u16],
        glyphs: &[GlyphId],
    ) -> Result<Vec<KernPair>, ReadError> {
        let mut pairs = Vec::new();
        for &index in lookup_indices {
            let lookup = self.lists.lookups.lookup(index)?;
            match lookup.lookup_type() {
                2 => {
                    for data in lookup.subtables() {
                        append_pairs(data, glyphs, &mut pairs)?;
                    }
                }
                9 => {
                    for data in lookup.subtables() {
                        let (lookup_type, inner) = layout::read_extension(data)?;
                        if lookup_type == 2 {
                            append_pairs(inner, glyphs, &mut pairs)?;
                        } else {
                            log::trace!("skipping extension positioning type {lookup_type}");
                        }
                    }
                }
                other => log::trace!("skipping positioning lookup type {other}"),
            }
        }
        Ok(pairs)
    }
}

/// The length of a value record with the given format, in bytes.
fn value_record_len(format: u16) -> usize {
    (format & 0xFF).count_ones() as usize * 2
}

/// The offset of the x advance field within a value record.
fn x_advance_offset(format: u16) -> usize {
    // placement fields sort before the advance
    (format & 0x0003).count_ones() as usize * 2
}

fn append_pairs(
    data: TableData,
    glyphs: &[GlyphId],
    out: &mut Vec<KernPair>,
) -> Result<(), ReadError> {
    let format: u16 = data.read_at(0)?;
    match format {
        1 => append_pairs_format1(data, glyphs, out),
        2 => append_pairs_format2(data, glyphs, out),
        other => Err(ReadError::InvalidFormat(other as i64)),
    }
}

fn append_pairs_format1(
    data: TableData,
    glyphs: &[GlyphId],
    out: &mut Vec<KernPair>,
) -> Result<(), ReadError> {
    let mut cursor = data.cursor();
    cursor.advance::<u16>(); // pos format
    let coverage_offset: u16 = cursor.read()?;
    let value_format1: u16 = cursor.read()?;
    let value_format2: u16 = cursor.read()?;
    let set_count: u16 = cursor.read()?;
    let set_offsets: ScalarArray<u16> = cursor.read_array(set_count as usize)?;
    cursor.finish()?;
    if value_format1 & X_ADVANCE == 0 {
        return Ok(());
    }
    // second glyph, then the two value records
    let record_len = 2 + value_record_len(value_format1) + value_record_len(value_format2);
    let value_offset = 2 + x_advance_offset(value_format1);
    let coverage = CoverageTable::read(
        data.split_off(coverage_offset as usize)
            .ok_or(ReadError::OutOfBounds)?,
    )?;
    for &left in glyphs {
        let Some(coverage_index) = coverage.get(left) else {
            continue;
        };
        let Some(set_offset) = set_offsets.get(coverage_index as usize) else {
            continue;
        };
        let set = data
            .split_off(set_offset as usize)
            .ok_or(ReadError::OutOfBounds)?;
        let pair_count: u16 = set.read_at(0)?;
        for i in 0..pair_count as usize {
            let base = 2 + i * record_len;
            let right: GlyphId = set.read_at(base)?;
            if glyphs.binary_search(&right).is_err() {
                continue;
            }
            let value: i16 = set.read_at(base + value_offset)?;
            if value != 0 {
                out.push(KernPair { left, right, value });
            }
        }
    }
    Ok(())
}

fn append_pairs_format2(
    data: TableData,
    glyphs: &[GlyphId],
    out: &mut Vec<KernPair>,
) -> Result<(), ReadError> {
    const HEADER_LEN: usize = 16;
    let mut cursor = data.cursor();
    cursor.advance::<u16>(); // pos format
    let coverage_offset: u16 = cursor.read()?;
    let value_format1: u16 = cursor.read()?;
    let value_format2: u16 = cursor.read()?;
    let class_def1_offset: u16 = cursor.read()?;
    let class_def2_offset: u16 = cursor.read()?;
    let class1_count: u16 = cursor.read()?;
    let class2_count: u16 = cursor.read()?;
    cursor.finish()?;
    if value_format1 & X_ADVANCE == 0 {
        return Ok(());
    }
    let record_len = value_record_len(value_format1) + value_record_len(value_format2);
    let value_offset = x_advance_offset(value_format1);
    let resolve = |offset: u16| data.split_off(offset as usize).ok_or(ReadError::OutOfBounds);
    let coverage = CoverageTable::read(resolve(coverage_offset)?)?;
    let class_def1 = ClassDefTable::read(resolve(class_def1_offset)?)?;
    let class_def2 = ClassDefTable::read(resolve(class_def2_offset)?)?;
    // Probe the class matrix for the pairs we care about rather than
    // enumerating the whole class space.
    for &left in glyphs {
        if coverage.get(left).is_none() {
            continue;
        }
        let class1 = class_def1.get(left);
        if class1 >= class1_count {
            continue;
        }
        for &right in glyphs {
            let class2 = class_def2.get(right);
            if class2 >= class2_count {
                continue;
            }
            let index = class1 as usize * class2_count as usize + class2 as usize;
            let value: i16 = data.read_at(HEADER_LEN + index * record_len + value_offset)?;
            if value != 0 {
                out.push(KernPair { left, right, value });
            }
        }
    }
    Ok(())
}
