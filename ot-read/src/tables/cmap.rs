//! The [cmap (character to glyph mapping)](https://docs.microsoft.com/en-us/typography/opentype/spec/cmap) table

use types::GlyphId;

use crate::array::ScalarArray;
use crate::read::{ReadError, TableRead};
use crate::table_data::TableData;

/// The length of the cmap header, in bytes.
const HEADER_LEN: usize = 4;

/// The length of one encoding record, in bytes.
const RECORD_LEN: usize = 8;

/// The character-to-glyph mapping table.
#[derive(Clone)]
pub struct Cmap<'a> {
    data: TableData<'a>,
    num_tables: u16,
}

/// The platform, encoding and location of one cmap subtable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodingRecord {
    /// The platform identifier (0 = Unicode, 3 = Windows).
    pub platform_id: u16,
    /// The platform-specific encoding identifier.
    pub encoding_id: u16,
    /// The subtable offset from the beginning of the table.
    pub subtable_offset: u32,
}

impl EncodingRecord {
    /// `true` if the subtable stores Unicode values.
    pub fn is_unicode(&self) -> bool {
        self.platform_id == 0 || (self.platform_id == 3 && matches!(self.encoding_id, 1 | 10))
    }
}

impl<'a> TableRead<'a> for Cmap<'a> {
    fn read(data: TableData<'a>) -> Result<Self, ReadError> {
        if data.is_empty() {
            return Err(ReadError::BlankTable);
        }
        let mut cursor = data.cursor();
        let version: u16 = cursor.read()?;
        if version != 0 {
            return Err(ReadError::InvalidFormat(version as i64));
        }
        let num_tables: u16 = cursor.read()?;
        cursor.advance_by(num_tables as usize * RECORD_LEN);
        cursor.finish()?;
        Ok(Cmap { data, num_tables })
    }
}

impl<'a> Cmap<'a> {
    /// The number of encoding records in the table.
    pub fn num_tables(&self) -> u16 {
        self.num_tables
    }

    /// The encoding record at `index`.
    pub fn encoding_record(&self, index: usize) -> Option<EncodingRecord> {
        if index >= self.num_tables as usize {
            return None;
        }
        let pos = HEADER_LEN + index * RECORD_LEN;
        Some(EncodingRecord {
            platform_id: self.data.read_at(pos).ok()?,
            encoding_id: self.data.read_at(pos + 2).ok()?,
            subtable_offset: self.data.read_at(pos + 4).ok()?,
        })
    }

    /// Iterate the encoding records in table order.
    pub fn encoding_records(&self) -> impl Iterator<Item = EncodingRecord> + 'a {
        let copy = self.clone();
        (0..self.num_tables as usize).filter_map(move |i| copy.encoding_record(i))
    }

    /// Parse the subtable an encoding record points at.
    pub fn subtable(&self, record: EncodingRecord) -> Result<CmapSubtable<'a>, ReadError> {
        let data = self
            .data
            .split_off(record.subtable_offset as usize)
            .ok_or(ReadError::OutOfBounds)?;
        CmapSubtable::read(data)
    }

    /// The Unicode subtable mappings should be read from, if any.
    ///
    /// Prefers a full-repertoire Windows subtable (3, 10), then the BMP
    /// one (3, 1), then anything on the Unicode platform.
    pub fn preferred_record(&self) -> Option<EncodingRecord> {
        let find = |platform_id, encoding_id| {
            self.encoding_records()
                .find(move |r| (r.platform_id, r.encoding_id) == (platform_id, encoding_id))
        };
        find(3, 10)
            .or_else(|| find(3, 1))
            .or_else(|| self.encoding_records().find(|r| r.platform_id == 0))
    }

    /// Map a codepoint to a nominal glyph identifier.
    ///
    /// This reads the preferred Unicode subtable; a missing mapping and a
    /// mapping to glyph zero both come back as `None`.
    pub fn map_codepoint(&self, codepoint: impl Into<u32>) -> Option<GlyphId> {
        let record = self.preferred_record()?;
        let subtable = self.subtable(record).ok()?;
        subtable.map_codepoint(codepoint)
    }
}

/// A parsed cmap subtable.
///
/// Only the formats used for character mappings are represented; other
/// formats fail with [`ReadError::InvalidFormat`].
#[derive(Clone)]
pub enum CmapSubtable<'a> {
    /// A byte-indexed format 0 subtable.
    Format0(Cmap0<'a>),
    /// A segmented format 4 subtable.
    Format4(Cmap4<'a>),
    /// A grouped format 12 subtable.
    Format12(Cmap12<'a>),
}

impl<'a> TableRead<'a> for CmapSubtable<'a> {
    fn read(data: TableData<'a>) -> Result<Self, ReadError> {
        let format: u16 = data.read_at(0)?;
        match format {
            0 => Cmap0::read(data).map(CmapSubtable::Format0),
            4 => Cmap4::read(data).map(CmapSubtable::Format4),
            12 => Cmap12::read(data).map(CmapSubtable::Format12),
            other => Err(ReadError::InvalidFormat(other as i64)),
        }
    }
}

impl<'a> CmapSubtable<'a> {
    /// Map a codepoint to a nominal glyph identifier.
    pub fn map_codepoint(&self, codepoint: impl Into<u32>) -> Option<GlyphId> {
        match self {
            CmapSubtable::Format0(subtable) => subtable.map_codepoint(codepoint),
            CmapSubtable::Format4(subtable) => subtable.map_codepoint(codepoint),
            CmapSubtable::Format12(subtable) => subtable.map_codepoint(codepoint),
        }
    }
}

/// A format 0 subtable: a flat array of 256 byte-sized glyph ids.
#[derive(Clone)]
pub struct Cmap0<'a> {
    glyph_ids: ScalarArray<'a, u8>,
}

impl<'a> TableRead<'a> for Cmap0<'a> {
    fn read(data: TableData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let format: u16 = cursor.read()?;
        if format != 0 {
            return Err(ReadError::InvalidFormat(format as i64));
        }
        cursor.advance::<u16>(); // length
        cursor.advance::<u16>(); // language
        let glyph_ids = cursor.read_array(256)?;
        cursor.finish()?;
        Ok(Cmap0 { glyph_ids })
    }
}

impl<'a> Cmap0<'a> {
    /// Map a codepoint to a nominal glyph identifier.
    pub fn map_codepoint(&self, codepoint: impl Into<u32>) -> Option<GlyphId> {
        let codepoint = codepoint.into();
        let gid = self.glyph_ids.get(usize::try_from(codepoint).ok()?)?;
        (gid != 0).then_some(GlyphId::new(gid as u16))
    }
}

/// A format 4 subtable: segments of 16-bit codepoints.
#[derive(Clone)]
pub struct Cmap4<'a> {
    end_code: ScalarArray<'a, u16>,
    start_code: ScalarArray<'a, u16>,
    id_delta: ScalarArray<'a, i16>,
    id_range_offsets: ScalarArray<'a, u16>,
    glyph_id_array: ScalarArray<'a, u16>,
}

impl<'a> TableRead<'a> for Cmap4<'a> {
    fn read(data: TableData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let format: u16 = cursor.read()?;
        if format != 4 {
            return Err(ReadError::InvalidFormat(format as i64));
        }
        cursor.advance::<u16>(); // length
        cursor.advance::<u16>(); // language
        let seg_count_x2: u16 = cursor.read()?;
        if seg_count_x2 == 0 || seg_count_x2 % 2 != 0 {
            return Err(ReadError::MalformedData("bad segment count in cmap4"));
        }
        let seg_count = seg_count_x2 as usize / 2;
        cursor.advance::<u16>(); // search range
        cursor.advance::<u16>(); // entry selector
        cursor.advance::<u16>(); // range shift
        let end_code = cursor.read_array(seg_count)?;
        cursor.advance::<u16>(); // reserved pad
        let start_code = cursor.read_array(seg_count)?;
        let id_delta = cursor.read_array(seg_count)?;
        let id_range_offsets = cursor.read_array(seg_count)?;
        // Trailing glyph ids run to the end of the subtable.
        let glyph_id_array = cursor.read_array(cursor.remaining_bytes() / 2)?;
        cursor.finish()?;
        Ok(Cmap4 {
            end_code,
            start_code,
            id_delta,
            id_range_offsets,
            glyph_id_array,
        })
    }
}

impl<'a> Cmap4<'a> {
    /// Map a codepoint to a nominal glyph identifier.
    pub fn map_codepoint(&self, codepoint: impl Into<u32>) -> Option<GlyphId> {
        let codepoint = codepoint.into();
        if codepoint > 0xFFFF {
            return None;
        }
        let codepoint = codepoint as u16;
        let mut lo = 0;
        let mut hi = self.start_code.len();
        while lo < hi {
            let i = (lo + hi) / 2;
            let start_code = self.start_code.get(i)?;
            if codepoint < start_code {
                hi = i;
            } else if codepoint > self.end_code.get(i)? {
                lo = i + 1;
            } else {
                return self.lookup_glyph_id(codepoint, i, start_code);
            }
        }
        None
    }

    /// Does the final phase of glyph id lookup.
    fn lookup_glyph_id(&self, codepoint: u16, index: usize, start_code: u16) -> Option<GlyphId> {
        let delta = self.id_delta.get(index)? as i32;
        let range_offset = self.id_range_offsets.get(index)? as usize;
        if range_offset == 0 {
            let gid = (codepoint as i32 + delta) as u16;
            return (gid != 0).then_some(GlyphId::new(gid));
        }
        // The offset is relative to its own position in the range offset
        // array, which sits directly before the glyph id array.
        let mut offset = range_offset / 2 + (codepoint - start_code) as usize;
        offset = offset.saturating_sub(self.id_range_offsets.len() - index);
        let gid = self.glyph_id_array.get(offset)?;
        (gid != 0).then_some(GlyphId::new((gid as i32 + delta) as u16))
    }
}

/// A format 12 subtable: groups of 32-bit codepoints.
#[derive(Clone)]
pub struct Cmap12<'a> {
    // start code, end code and start glyph id, three words per group
    groups: ScalarArray<'a, u32>,
}

impl<'a> TableRead<'a> for Cmap12<'a> {
    fn read(data: TableData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let format: u16 = cursor.read()?;
        if format != 12 {
            return Err(ReadError::InvalidFormat(format as i64));
        }
        cursor.advance::<u16>(); // reserved
        cursor.advance::<u32>(); // length
        cursor.advance::<u32>(); // language
        let num_groups: u32 = cursor.read()?;
        let groups = cursor.read_array(num_groups as usize * 3)?;
        cursor.finish()?;
        Ok(Cmap12 { groups })
    }
}

impl<'a> Cmap12<'a> {
    fn num_groups(&self) -> usize {
        self.groups.len() / 3
    }

    fn group(&self, index: usize) -> Option<(u32, u32, u32)> {
        Some((
            self.groups.get(index * 3)?,
            self.groups.get(index * 3 + 1)?,
            self.groups.get(index * 3 + 2)?,
        ))
    }

    /// Map a codepoint to a nominal glyph identifier.
    pub fn map_codepoint(&self, codepoint: impl Into<u32>) -> Option<GlyphId> {
        let codepoint = codepoint.into();
        let mut lo = 0;
        let mut hi = self.num_groups();
        while lo < hi {
            let i = (lo + hi) / 2;
            let (start, end, start_gid) = self.group(i)?;
            if codepoint < start {
                hi = i;
            } else if codepoint > end {
                lo = i + 1;
            } else {
                let gid = start_gid.wrapping_add(codepoint.wrapping_sub(start)) as u16;
                return (gid != 0).then_some(GlyphId::new(gid));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ot_test_data::cmap as test_data;
    use ot_test_data::glyphs;

    fn parse(bytes: &[u8]) -> Cmap {
        Cmap::read(TableData::new(bytes)).unwrap()
    }

    #[test]
    fn blank_and_bad_version() {
        assert!(matches!(
            Cmap::read(TableData::new(&[])),
            Err(ReadError::BlankTable)
        ));
        let bad = [0u8, 1, 0, 0];
        assert!(matches!(
            Cmap::read(TableData::new(&bad)),
            Err(ReadError::InvalidFormat(1))
        ));
    }

    #[test]
    fn format4_lookups() {
        let buf = test_data::basic();
        let cmap = parse(&buf);
        assert_eq!(cmap.map_codepoint('f'), Some(GlyphId::new(glyphs::F)));
        assert_eq!(cmap.map_codepoint('i'), Some(GlyphId::new(glyphs::I)));
        assert_eq!(cmap.map_codepoint('l'), Some(GlyphId::new(glyphs::L)));
        assert_eq!(cmap.map_codepoint('A'), Some(GlyphId::new(glyphs::A)));
        assert_eq!(cmap.map_codepoint('V'), Some(GlyphId::new(glyphs::V)));
        assert_eq!(cmap.map_codepoint('z'), None);
        assert_eq!(cmap.map_codepoint(0x1_0000_u32), None);
    }

    #[test]
    fn format12_lookups() {
        let buf = test_data::format12();
        let cmap = parse(&buf);
        assert_eq!(cmap.map_codepoint(0x1D400_u32), Some(GlyphId::new(100)));
        assert_eq!(cmap.map_codepoint(0x1D403_u32), Some(GlyphId::new(103)));
        assert_eq!(cmap.map_codepoint('f'), Some(GlyphId::new(glyphs::F)));
        assert_eq!(cmap.map_codepoint(0x1D404_u32), None);
    }

    #[test]
    fn format0_lookups() {
        let buf = test_data::format0();
        let cmap = parse(&buf);
        let record = cmap.preferred_record().unwrap();
        assert_eq!(record.platform_id, 0);
        assert_eq!(cmap.map_codepoint('f'), Some(GlyphId::new(glyphs::F)));
        assert_eq!(cmap.map_codepoint('q'), None);
        assert_eq!(cmap.map_codepoint(0x100_u32), None);
    }

    #[test]
    fn preferred_subtable_order() {
        // The fixture carries both a (3, 1) and a (3, 10) record; the full
        // repertoire one wins.
        let buf = test_data::format12();
        let cmap = parse(&buf);
        let record = cmap.preferred_record().unwrap();
        assert_eq!((record.platform_id, record.encoding_id), (3, 10));
    }

    #[test]
    fn record_past_end_is_an_error() {
        let buf = test_data::truncated_record();
        let cmap = parse(&buf);
        let record = cmap.encoding_record(0).unwrap();
        assert_eq!(cmap.subtable(record).err(), Some(ReadError::OutOfBounds));
    }
}
