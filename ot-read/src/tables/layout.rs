//! Structures shared by the [GSUB](super::gsub) and [GPOS](super::gpos) tables

use types::{GlyphId, MajorMinor, Tag};

use crate::array::ScalarArray;
use crate::read::{ReadError, TableRead};
use crate::table_data::TableData;

/// The script, feature and lookup lists at the top of a layout table.
#[derive(Clone)]
pub(crate) struct LayoutLists<'a> {
    pub(crate) scripts: ScriptList<'a>,
    pub(crate) features: FeatureList<'a>,
    pub(crate) lookups: LookupList<'a>,
}

/// Reads the shared layout table header and resolves its three lists.
///
/// Minor version 1 appends a feature variations offset, which we accept
/// and ignore.
pub(crate) fn read_layout_lists(data: TableData<'_>) -> Result<LayoutLists<'_>, ReadError> {
    if data.is_empty() {
        return Err(ReadError::BlankTable);
    }
    let mut cursor = data.cursor();
    let version: MajorMinor = cursor.read()?;
    if version != MajorMinor::VERSION_1_0 && version != MajorMinor::VERSION_1_1 {
        return Err(ReadError::InvalidFormat(version.major as i64));
    }
    let script_list_offset: u16 = cursor.read()?;
    let feature_list_offset: u16 = cursor.read()?;
    let lookup_list_offset: u16 = cursor.read()?;
    if version == MajorMinor::VERSION_1_1 {
        cursor.advance::<u32>(); // feature variations offset
    }
    cursor.finish()?;
    let resolve = |offset: u16| data.split_off(offset as usize).ok_or(ReadError::OutOfBounds);
    Ok(LayoutLists {
        scripts: ScriptList::read(resolve(script_list_offset)?)?,
        features: FeatureList::read(resolve(feature_list_offset)?)?,
        lookups: LookupList::read(resolve(lookup_list_offset)?)?,
    })
}

/// Collects the lookup indices a script, language and feature selection
/// turn on, sorted and deduplicated.
///
/// A required feature of the language system is always included, whether
/// or not its tag was asked for.
pub(crate) fn selected_lookups(
    scripts: &ScriptList,
    features: &FeatureList,
    script: Tag,
    language: Option<Tag>,
    feature_tags: &[Tag],
) -> Vec<u16> {
    let mut lookups = Vec::new();
    let Some(script_table) = scripts.select(script) else {
        return lookups;
    };
    let Some(lang_sys) = script_table.lang_sys(language) else {
        return lookups;
    };
    let mut add_feature = |index: u16| {
        if let Some(feature) = features.feature(index) {
            lookups.extend(feature.lookup_indices());
        }
    };
    if let Some(required) = lang_sys.required_feature_index() {
        add_feature(required);
    }
    for index in lang_sys.feature_indices() {
        if features.tag(index).is_some_and(|tag| feature_tags.contains(&tag)) {
            add_feature(index);
        }
    }
    lookups.sort_unstable();
    lookups.dedup();
    lookups
}

/// The list of scripts a layout table serves.
#[derive(Clone)]
pub struct ScriptList<'a> {
    data: TableData<'a>,
    count: u16,
}

impl<'a> TableRead<'a> for ScriptList<'a> {
    fn read(data: TableData<'a>) -> Result<Self, ReadError> {
        let count: u16 = data.read_at(0)?;
        data.check_in_bounds(2 + count as usize * 6)?;
        Ok(ScriptList { data, count })
    }
}

impl<'a> ScriptList<'a> {
    fn record(&self, index: usize) -> Option<(Tag, u16)> {
        let pos = 2 + index * 6;
        Some((
            self.data.read_at(pos).ok()?,
            self.data.read_at(pos + 4).ok()?,
        ))
    }

    /// The script table for `tag`, falling back to `DFLT`.
    pub fn select(&self, tag: Tag) -> Option<Script<'a>> {
        let find = |tag: Tag| {
            (0..self.count as usize)
                .filter_map(|i| self.record(i))
                .find(|(t, _)| *t == tag)
        };
        let (_, offset) = find(tag).or_else(|| find(Tag::new(b"DFLT")))?;
        Script::read(self.data.split_off(offset as usize)?).ok()
    }
}

/// One script: a default language system plus named alternates.
#[derive(Clone)]
pub struct Script<'a> {
    data: TableData<'a>,
    default_lang_sys: u16,
    count: u16,
}

impl<'a> TableRead<'a> for Script<'a> {
    fn read(data: TableData<'a>) -> Result<Self, ReadError> {
        let default_lang_sys: u16 = data.read_at(0)?;
        let count: u16 = data.read_at(2)?;
        data.check_in_bounds(4 + count as usize * 6)?;
        Ok(Script {
            data,
            default_lang_sys,
            count,
        })
    }
}

impl<'a> Script<'a> {
    fn record(&self, index: usize) -> Option<(Tag, u16)> {
        let pos = 4 + index * 6;
        Some((
            self.data.read_at(pos).ok()?,
            self.data.read_at(pos + 4).ok()?,
        ))
    }

    /// The language system for `language`, or the script's default.
    ///
    /// An unknown language falls back to the default language system; a
    /// script without one yields `None`.
    pub fn lang_sys(&self, language: Option<Tag>) -> Option<LangSys<'a>> {
        let default = || (self.default_lang_sys != 0).then_some(self.default_lang_sys);
        let offset = match language {
            Some(tag) => (0..self.count as usize)
                .filter_map(|i| self.record(i))
                .find(|(t, _)| *t == tag)
                .map(|(_, offset)| offset)
                .or_else(default)?,
            None => default()?,
        };
        LangSys::read(self.data.split_off(offset as usize)?).ok()
    }
}

/// One language system: the feature indices it turns on.
#[derive(Clone)]
pub struct LangSys<'a> {
    required_feature_index: u16,
    feature_indices: ScalarArray<'a, u16>,
}

impl<'a> TableRead<'a> for LangSys<'a> {
    fn read(data: TableData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        cursor.advance::<u16>(); // lookup order, reserved
        let required_feature_index: u16 = cursor.read()?;
        let count: u16 = cursor.read()?;
        let feature_indices = cursor.read_array(count as usize)?;
        cursor.finish()?;
        Ok(LangSys {
            required_feature_index,
            feature_indices,
        })
    }
}

impl<'a> LangSys<'a> {
    /// The feature this language system requires, if any.
    pub fn required_feature_index(&self) -> Option<u16> {
        (self.required_feature_index != 0xFFFF).then_some(self.required_feature_index)
    }

    /// Iterate the optional feature indices.
    pub fn feature_indices(&self) -> impl Iterator<Item = u16> + 'a {
        self.feature_indices.iter()
    }
}

/// The list of tagged features a layout table defines.
#[derive(Clone)]
pub struct FeatureList<'a> {
    data: TableData<'a>,
    count: u16,
}

impl<'a> TableRead<'a> for FeatureList<'a> {
    fn read(data: TableData<'a>) -> Result<Self, ReadError> {
        let count: u16 = data.read_at(0)?;
        data.check_in_bounds(2 + count as usize * 6)?;
        Ok(FeatureList { data, count })
    }
}

impl<'a> FeatureList<'a> {
    fn record(&self, index: usize) -> Option<(Tag, u16)> {
        if index >= self.count as usize {
            return None;
        }
        let pos = 2 + index * 6;
        Some((
            self.data.read_at(pos).ok()?,
            self.data.read_at(pos + 4).ok()?,
        ))
    }

    /// The tag of the feature at `index`.
    pub fn tag(&self, index: u16) -> Option<Tag> {
        self.record(index as usize).map(|(tag, _)| tag)
    }

    /// The feature table at `index`.
    pub fn feature(&self, index: u16) -> Option<Feature<'a>> {
        let (_, offset) = self.record(index as usize)?;
        Feature::read(self.data.split_off(offset as usize)?).ok()
    }
}

/// One feature: the lookup indices it applies.
#[derive(Clone)]
pub struct Feature<'a> {
    lookup_indices: ScalarArray<'a, u16>,
}

impl<'a> TableRead<'a> for Feature<'a> {
    fn read(data: TableData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        cursor.advance::<u16>(); // feature params offset
        let count: u16 = cursor.read()?;
        let lookup_indices = cursor.read_array(count as usize)?;
        cursor.finish()?;
        Ok(Feature { lookup_indices })
    }
}

impl<'a> Feature<'a> {
    /// Iterate the lookup list indices this feature applies.
    pub fn lookup_indices(&self) -> impl Iterator<Item = u16> + 'a {
        self.lookup_indices.iter()
    }
}

/// The list of lookups a layout table defines.
#[derive(Clone)]
pub struct LookupList<'a> {
    data: TableData<'a>,
    count: u16,
}

impl<'a> TableRead<'a> for LookupList<'a> {
    fn read(data: TableData<'a>) -> Result<Self, ReadError> {
        let count: u16 = data.read_at(0)?;
        data.check_in_bounds(2 + count as usize * 2)?;
        Ok(LookupList { data, count })
    }
}

impl<'a> LookupList<'a> {
    /// The number of lookups in the list.
    pub fn count(&self) -> u16 {
        self.count
    }

    /// The lookup table at `index`.
    pub fn lookup(&self, index: u16) -> Result<Lookup<'a>, ReadError> {
        if index >= self.count {
            return Err(ReadError::OutOfBounds);
        }
        let offset: u16 = self.data.read_at(2 + index as usize * 2)?;
        let data = self
            .data
            .split_off(offset as usize)
            .ok_or(ReadError::OutOfBounds)?;
        Lookup::read(data)
    }
}

/// One lookup: a typed group of subtables.
#[derive(Clone)]
pub struct Lookup<'a> {
    data: TableData<'a>,
    lookup_type: u16,
    subtable_count: u16,
}

impl<'a> TableRead<'a> for Lookup<'a> {
    fn read(data: TableData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let lookup_type: u16 = cursor.read()?;
        cursor.advance::<u16>(); // lookup flag
        let subtable_count: u16 = cursor.read()?;
        cursor.advance_by(subtable_count as usize * 2);
        cursor.finish()?;
        Ok(Lookup {
            data,
            lookup_type,
            subtable_count,
        })
    }
}

impl<'a> Lookup<'a> {
    /// The lookup type, whose meaning depends on the parent table.
    pub fn lookup_type(&self) -> u16 {
        self.lookup_type
    }

    /// Iterate the subtables in lookup order.
    pub fn subtables(&self) -> impl Iterator<Item = TableData<'a>> + 'a {
        let copy = self.clone();
        (0..self.subtable_count as usize).filter_map(move |i| {
            let offset: u16 = copy.data.read_at(6 + i * 2).ok()?;
            copy.data.split_off(offset as usize)
        })
    }
}

/// Unwraps an extension subtable, yielding the wrapped lookup type and
/// the subtable it points at.
pub(crate) fn read_extension(data: TableData<'_>) -> Result<(u16, TableData<'_>), ReadError> {
    let mut cursor = data.cursor();
    let format: u16 = cursor.read()?;
    if format != 1 {
        return Err(ReadError::InvalidFormat(format as i64));
    }
    let lookup_type: u16 = cursor.read()?;
    let offset: u32 = cursor.read()?;
    cursor.finish()?;
    let inner = data
        .split_off(offset as usize)
        .ok_or(ReadError::OutOfBounds)?;
    Ok((lookup_type, inner))
}

/// The set of glyphs a lookup subtable applies to.
#[derive(Clone)]
pub enum CoverageTable<'a> {
    /// A sorted list of single glyphs.
    Format1(CoverageFormat1<'a>),
    /// A list of glyph ranges.
    Format2(CoverageFormat2<'a>),
}

impl<'a> TableRead<'a> for CoverageTable<'a> {
    fn read(data: TableData<'a>) -> Result<Self, ReadError> {
        let format: u16 = data.read_at(0)?;
        match format {
            1 => CoverageFormat1::read(data).map(CoverageTable::Format1),
            2 => CoverageFormat2::read(data).map(CoverageTable::Format2),
            other => Err(ReadError::InvalidFormat(other as i64)),
        }
    }
}

impl<'a> CoverageTable<'a> {
    /// The coverage index of `gid`, if covered.
    pub fn get(&self, gid: GlyphId) -> Option<u16> {
        match self {
            CoverageTable::Format1(table) => table.get(gid),
            CoverageTable::Format2(table) => table.get(gid),
        }
    }

    /// Iterate the covered glyphs in coverage index order.
    pub fn iter(&self) -> impl Iterator<Item = GlyphId> + 'a {
        // all one expression so that we have a single return type
        let (iter1, iter2) = match self {
            CoverageTable::Format1(table) => (Some(table.iter()), None),
            CoverageTable::Format2(table) => (None, Some(table.iter())),
        };
        iter1.into_iter().flatten().chain(iter2.into_iter().flatten())
    }
}

/// Coverage as a sorted array of glyph ids.
#[derive(Clone)]
pub struct CoverageFormat1<'a> {
    glyphs: ScalarArray<'a, u16>,
}

impl<'a> TableRead<'a> for CoverageFormat1<'a> {
    fn read(data: TableData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        cursor.advance::<u16>(); // coverage format
        let count: u16 = cursor.read()?;
        let glyphs = cursor.read_array(count as usize)?;
        cursor.finish()?;
        Ok(CoverageFormat1 { glyphs })
    }
}

impl<'a> CoverageFormat1<'a> {
    fn get(&self, gid: GlyphId) -> Option<u16> {
        let gid = gid.to_u16();
        let mut lo = 0;
        let mut hi = self.glyphs.len();
        while lo < hi {
            let i = (lo + hi) / 2;
            let glyph = self.glyphs.get(i)?;
            if gid < glyph {
                hi = i;
            } else if gid > glyph {
                lo = i + 1;
            } else {
                return Some(i as u16);
            }
        }
        None
    }

    fn iter(&self) -> impl Iterator<Item = GlyphId> + 'a {
        self.glyphs.iter().map(GlyphId::new)
    }
}

/// Coverage as an array of glyph ranges.
#[derive(Clone)]
pub struct CoverageFormat2<'a> {
    // start glyph, end glyph and start coverage index, three words per range
    ranges: ScalarArray<'a, u16>,
}

impl<'a> TableRead<'a> for CoverageFormat2<'a> {
    fn read(data: TableData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        cursor.advance::<u16>(); // coverage format
        let count: u16 = cursor.read()?;
        let ranges = cursor.read_array(count as usize * 3)?;
        cursor.finish()?;
        Ok(CoverageFormat2 { ranges })
    }
}

impl<'a> CoverageFormat2<'a> {
    fn range(&self, index: usize) -> Option<(u16, u16, u16)> {
        Some((
            self.ranges.get(index * 3)?,
            self.ranges.get(index * 3 + 1)?,
            self.ranges.get(index * 3 + 2)?,
        ))
    }

    fn get(&self, gid: GlyphId) -> Option<u16> {
        let gid = gid.to_u16();
        let mut lo = 0;
        let mut hi = self.ranges.len() / 3;
        while lo < hi {
            let i = (lo + hi) / 2;
            let (start, end, coverage_base) = self.range(i)?;
            if gid < start {
                hi = i;
            } else if gid > end {
                lo = i + 1;
            } else {
                return coverage_base.checked_add(gid - start);
            }
        }
        None
    }

    fn iter(&self) -> impl Iterator<Item = GlyphId> + 'a {
        let copy = self.clone();
        (0..self.ranges.len() / 3)
            .filter_map(move |i| copy.range(i))
            .flat_map(|(start, end, _)| (start..=end).map(GlyphId::new))
    }
}

/// A mapping from glyphs to class values; unlisted glyphs are class 0.
#[derive(Clone)]
pub enum ClassDefTable<'a> {
    /// Classes for a contiguous run of glyphs.
    Format1(ClassDefFormat1<'a>),
    /// Classes for glyph ranges.
    Format2(ClassDefFormat2<'a>),
}

impl<'a> TableRead<'a> for ClassDefTable<'a> {
    fn read(data: TableData<'a>) -> Result<Self, ReadError> {
        let format: u16 = data.read_at(0)?;
        match format {
            1 => ClassDefFormat1::read(data).map(ClassDefTable::Format1),
            2 => ClassDefFormat2::read(data).map(ClassDefTable::Format2),
            other => Err(ReadError::InvalidFormat(other as i64)),
        }
    }
}

impl<'a> ClassDefTable<'a> {
    /// The class of `gid`.
    pub fn get(&self, gid: GlyphId) -> u16 {
        match self {
            ClassDefTable::Format1(table) => table.get(gid),
            ClassDefTable::Format2(table) => table.get(gid),
        }
    }
}

/// Class values for a contiguous run of glyphs.
#[derive(Clone)]
pub struct ClassDefFormat1<'a> {
    start_glyph: u16,
    class_values: ScalarArray<'a, u16>,
}

impl<'a> TableRead<'a> for ClassDefFormat1<'a> {
    fn read(data: TableData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        cursor.advance::<u16>(); // class format
        let start_glyph: u16 = cursor.read()?;
        let count: u16 = cursor.read()?;
        let class_values = cursor.read_array(count as usize)?;
        cursor.finish()?;
        Ok(ClassDefFormat1 {
            start_glyph,
            class_values,
        })
    }
}

impl<'a> ClassDefFormat1<'a> {
    fn get(&self, gid: GlyphId) -> u16 {
        let Some(index) = gid.to_u16().checked_sub(self.start_glyph) else {
            return 0;
        };
        self.class_values.get(index as usize).unwrap_or_default()
    }
}

/// Class values for glyph ranges.
#[derive(Clone)]
pub struct ClassDefFormat2<'a> {
    // start glyph, end glyph and class, three words per range
    ranges: ScalarArray<'a, u16>,
}

impl<'a> TableRead<'a> for ClassDefFormat2<'a> {
    fn read(data: TableData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        cursor.advance::<u16>(); // class format
        let count: u16 = cursor.read()?;
        let ranges = cursor.read_array(count as usize * 3)?;
        cursor.finish()?;
        Ok(ClassDefFormat2 { ranges })
    }
}

impl<'a> ClassDefFormat2<'a> {
    fn get(&self, gid: GlyphId) -> u16 {
        let gid = gid.to_u16();
        let mut lo = 0;
        let mut hi = self.ranges.len() / 3;
        while lo < hi {
            let i = (lo + hi) / 2;
            let Some(start) = self.ranges.get(i * 3) else {
                return 0;
            };
            let Some(end) = self.ranges.get(i * 3 + 1) else {
                return 0;
            };
            if gid < start {
                hi = i;
            } else if gid > end {
                lo = i + 1;
            } else {
                return self.ranges.get(i * 3 + 2).unwrap_or_default();
            }
        }
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coverage_format1() {
        // glyphs 2, 5 and 9
        let bytes = [0, 1, 0, 3, 0, 2, 0, 5, 0, 9];
        let coverage = CoverageTable::read(TableData::new(&bytes)).unwrap();
        assert_eq!(coverage.get(GlyphId::new(2)), Some(0));
        assert_eq!(coverage.get(GlyphId::new(5)), Some(1));
        assert_eq!(coverage.get(GlyphId::new(9)), Some(2));
        assert_eq!(coverage.get(GlyphId::new(3)), None);
        let glyphs: Vec<_> = coverage.iter().map(|gid| gid.to_u16()).collect();
        assert_eq!(glyphs, [2, 5, 9]);
    }

    #[test]
    fn coverage_format2() {
        // ranges 10..=12 and 20..=21
        let bytes = [
            0, 2, 0, 2, 0, 10, 0, 12, 0, 0, 0, 20, 0, 21, 0, 3,
        ];
        let coverage = CoverageTable::read(TableData::new(&bytes)).unwrap();
        assert_eq!(coverage.get(GlyphId::new(10)), Some(0));
        assert_eq!(coverage.get(GlyphId::new(11)), Some(1));
        assert_eq!(coverage.get(GlyphId::new(20)), Some(3));
        assert_eq!(coverage.get(GlyphId::new(21)), Some(4));
        assert_eq!(coverage.get(GlyphId::new(13)), None);
        let glyphs: Vec<_> = coverage.iter().map(|gid| gid.to_u16()).collect();
        assert_eq!(glyphs, [10, 11, 12, 20, 21]);
    }

    #[test]
    fn coverage_bad_format() {
        let bytes = [0, 3, 0, 0];
        assert!(matches!(
            CoverageTable::read(TableData::new(&bytes)),
            Err(ReadError::InvalidFormat(3))
        ));
    }

    #[test]
    fn class_def_format1() {
        // glyphs 10, 11, 12 in classes 1, 2, 1
        let bytes = [0, 1, 0, 10, 0, 3, 0, 1, 0, 2, 0, 1];
        let class_def = ClassDefTable::read(TableData::new(&bytes)).unwrap();
        assert_eq!(class_def.get(GlyphId::new(10)), 1);
        assert_eq!(class_def.get(GlyphId::new(11)), 2);
        assert_eq!(class_def.get(GlyphId::new(9)), 0);
        assert_eq!(class_def.get(GlyphId::new(13)), 0);
    }

    #[test]
    fn class_def_format2() {
        // glyph 6 in class 1, glyphs 7..=8 in class 2
        let bytes = [0, 2, 0, 2, 0, 6, 0, 6, 0, 1, 0, 7, 0, 8, 0, 2];
        let class_def = ClassDefTable::read(TableData::new(&bytes)).unwrap();
        assert_eq!(class_def.get(GlyphId::new(6)), 1);
        assert_eq!(class_def.get(GlyphId::new(7)), 2);
        assert_eq!(class_def.get(GlyphId::new(8)), 2);
        assert_eq!(class_def.get(GlyphId::new(9)), 0);
    }

    #[test]
    fn lang_sys_feature_selection() {
        // A LangSys requiring feature 2 with optional features 0 and 1.
        let bytes = [0, 0, 0, 2, 0, 2, 0, 0, 0, 1];
        let lang_sys = LangSys::read(TableData::new(&bytes)).unwrap();
        assert_eq!(lang_sys.required_feature_index(), Some(2));
        let indices: Vec<_> = lang_sys.feature_indices().collect();
        assert_eq!(indices, [0, 1]);
    }
}
