//! The [post (PostScript)](https://docs.microsoft.com/en-us/typography/opentype/spec/post) table

use types::{GlyphId, Version16Dot16};

use crate::read::{ReadError, TableRead};
use crate::table_data::TableData;
use crate::ScalarArray;

/// The length of the header shared by all versions, in bytes.
const HEADER_LEN: usize = 32;

/// The PostScript table, the source of glyph names.
///
/// Versions 1.0, 2.0 and 3.0 are supported. Version 1.0 names glyphs
/// from the standard Macintosh set, version 2.0 stores its own name
/// strings and version 3.0 stores no names at all.
#[derive(Clone)]
pub struct Post<'a> {
    version: Version16Dot16,
    num_glyphs: u16,
    glyph_name_indices: Option<ScalarArray<'a, u16>>,
    string_data: TableData<'a>,
}

impl<'a> TableRead<'a> for Post<'a> {
    fn read(data: TableData<'a>) -> Result<Self, ReadError> {
        if data.is_empty() {
            return Err(ReadError::BlankTable);
        }
        let mut cursor = data.cursor();
        let version: Version16Dot16 = cursor.read()?;
        // italic angle through memory usage fields
        cursor.advance_by(HEADER_LEN - 4);
        if version == Version16Dot16::VERSION_1_0 || version == Version16Dot16::VERSION_3_0 {
            cursor.finish()?;
            return Ok(Post {
                version,
                num_glyphs: 0,
                glyph_name_indices: None,
                string_data: TableData::default(),
            });
        }
        if version != Version16Dot16::VERSION_2_0 {
            return Err(ReadError::InvalidFormat(version.to_bits() as i64));
        }
        let num_glyphs: u16 = cursor.read()?;
        let glyph_name_indices = cursor.read_array(num_glyphs as usize)?;
        let string_data = data
            .split_off(cursor.position())
            .ok_or(ReadError::OutOfBounds)?;
        Ok(Post {
            version,
            num_glyphs,
            glyph_name_indices: Some(glyph_name_indices),
            string_data,
        })
    }
}

impl<'a> Post<'a> {
    /// The table version.
    pub fn version(&self) -> Version16Dot16 {
        self.version
    }

    /// The number of glyphs the table names.
    pub fn num_names(&self) -> usize {
        if self.version == Version16Dot16::VERSION_1_0 {
            DEFAULT_GLYPH_NAMES.len()
        } else {
            self.num_glyphs as usize
        }
    }

    /// The index into the name list for the given glyph, if available.
    ///
    /// Indices below 258 refer to [`DEFAULT_GLYPH_NAMES`]; larger ones
    /// count into the table's own strings.
    pub fn name_index(&self, glyph_id: GlyphId) -> Option<u16> {
        if self.version == Version16Dot16::VERSION_1_0 {
            let index = glyph_id.to_u16();
            return ((index as usize) < DEFAULT_GLYPH_NAMES.len()).then_some(index);
        }
        self.glyph_name_indices?.get(glyph_id.to_u16() as usize)
    }

    /// The name for the given glyph, if available.
    pub fn glyph_name(&self, glyph_id: GlyphId) -> Option<&'a str> {
        let index = self.name_index(glyph_id)? as usize;
        if index < DEFAULT_GLYPH_NAMES.len() {
            return DEFAULT_GLYPH_NAMES.get(index).copied();
        }
        let data = self.name_data().nth(index - DEFAULT_GLYPH_NAMES.len())?;
        std::str::from_utf8(data).ok()
    }

    /// Iterate the raw Pascal string name data, in storage order.
    pub fn name_data(&self) -> impl Iterator<Item = &'a [u8]> + 'a {
        let mut data = self.string_data;
        std::iter::from_fn(move || {
            let len: u8 = data.read_at(0).ok()?;
            let bytes = data.slice(1..1 + len as usize)?;
            data = data.split_off(1 + len as usize)?;
            Some(bytes.as_bytes())
        })
    }
}

/// The 258 glyph names defined for Macintosh TrueType fonts
#[rustfmt::skip]
pub static DEFAULT_GLYPH_NAMES: [&str; 258] = [
    ".notdef", ".null", "nonmarkingreturn", "space", "exclam", "quotedbl", "numbersign", "dollar",
    "percent", "ampersand", "quotesingle", "parenleft", "parenright", "asterisk", "plus", "comma",
    "hyphen", "period", "slash", "zero", "one", "two", "three", "four", "five", "six", "seven",
    "eight", "nine", "colon", "semicolon", "less", "equal", "greater", "question", "at", "A", "B",
    "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R", "S", "T", "U",
    "V", "W", "X", "Y", "Z", "bracketleft", "backslash", "bracketright", "asciicircum",
    "underscore", "grave", "a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k", "l", "m", "n",
    "o", "p", "q", "r", "s", "t", "u", "v", "w", "x", "y", "z", "braceleft", "bar", "braceright",
    "asciitilde", "Adieresis", "Aring", "Ccedilla", "Eacute", "Ntilde", "Odieresis", "Udieresis",
    "aacute", "agrave", "acircumflex", "adieresis", "atilde", "aring", "ccedilla", "eacute",
    "egrave", "ecircumflex", "edieresis", "iacute", "igrave", "icircumflex", "idieresis", "ntilde",
    "oacute", "ograve", "ocircumflex", "odieresis", "otilde", "uacute", "ugrave", "ucircumflex",
    "udieresis", "dagger", "degree", "cent", "sterling", "section", "bullet", "paragraph",
    "germandbls", "registered", "copyright", "trademark", "acute", "dieresis", "notequal", "AE",
    "Oslash", "infinity", "plusminus", "lessequal", "greaterequal", "yen", "mu", "partialdiff",
    "summation", "product", "pi", "integral", "ordfeminine", "ordmasculine", "Omega", "ae",
    "oslash", "questiondown", "exclamdown", "logicalnot", "radical", "florin", "approxequal",
    "Delta", "guillemotleft", "guillemotright", "ellipsis", "nonbreakingspace", "Agrave", "Atilde",
    "Otilde", "OE", "oe", "endash", "emdash", "quotedblleft", "quotedblright", "quoteleft",
    "quoteright", "divide", "lozenge", "ydieresis", "Ydieresis", "fraction", "currency",
    "guilsinglleft", "guilsinglright", "fi", "fl", "daggerdbl", "periodcentered", "quotesinglbase",
    "quotedblbase", "perthousand", "Acircumflex", "Ecircumflex", "Aacute", "Edieresis", "Egrave",
    "Iacute", "Icircumflex", "Idieresis", "Igrave", "Oacute", "Ocircumflex", "apple", "Ograve",
    "Uacute", "Ucircumflex", "Ugrave", "dotlessi", "circumflex", "tilde", "macron", "breve",
    "dotaccent", "ring", "cedilla", "hungarumlaut", "ogonek", "caron", "Lslash", "lslash",
    "Scaron", "scaron", "Zcaron", "zcaron", "brokenbar", "Eth", "eth", "Yacute", "yacute", "Thorn",
    "thorn", "minus", "multiply", "onesuperior", "twosuperior", "threesuperior", "onehalf",
    "onequarter", "threequarters", "franc", "Gbreve", "gbreve", "Idotaccent", "Scedilla",
    "scedilla", "Cacute", "cacute", "Ccaron", "ccaron", "dcroat",
];
