//! Glyph-name to Unicode resolution.

/// The Unicode value a glyph name conventionally stands for.
///
/// Synthetic names are decoded first: `uniXXXX` with exactly four hex
/// digits, and `uXXXX` through `uXXXXXX`. Anything else is looked up in
/// a fixed table covering the standard Macintosh glyph set plus the
/// common typographic extras. Values outside the Unicode scalar range
/// and unknown names both come back as `None`; an unresolvable name is
/// a routine miss, not an error.
pub fn glyphname_unicode(name: &str) -> Option<char> {
    if let Some(hex) = name.strip_prefix("uni") {
        if hex.len() == 4 && hex.bytes().all(|byte| byte.is_ascii_hexdigit()) {
            return u32::from_str_radix(hex, 16).ok().and_then(char::from_u32);
        }
    } else if let Some(hex) = name.strip_prefix('u') {
        if (4..=6).contains(&hex.len()) && hex.bytes().all(|byte| byte.is_ascii_hexdigit()) {
            return u32::from_str_radix(hex, 16).ok().and_then(char::from_u32);
        }
    }
    match GLYPH_UNICODES.binary_search_by(|entry| entry.0.cmp(name)) {
        Ok(index) => GLYPH_UNICODES.get(index).map(|entry| entry.1),
        _ => None,
    }
}

/// Glyph names and their conventional Unicode values, sorted by name.
///
/// Covers the 258 standard Macintosh names (the two `.`-prefixed ones
/// have no Unicode and are absent) plus `ff`, `ffi`, `ffl` and
/// `dotlessj`.
const GLYPH_UNICODES: &[(&str, char)] = &[
    ("A", '\u{0041}'),
    ("AE", '\u{00C6}'),
    ("Aacute", '\u{00C1}'),
    ("Acircumflex", '\u{00C2}'),
    ("Adieresis", '\u{00C4}'),
    ("Agrave", '\u{00C0}'),
    ("Aring", '\u{00C5}'),
    ("Atilde", '\u{00C3}'),
    ("B", '\u{0042}'),
    ("C", '\u{0043}'),
    ("Cacute", '\u{0106}'),
    ("Ccaron", '\u{010C}'),
    ("Ccedilla", '\u{00C7}'),
    ("D", '\u{0044}'),
    ("Delta", '\u{0394}'),
    ("E", '\u{0045}'),
    ("Eacute", '\u{00C9}'),
    ("Ecircumflex", '\u{00CA}'),
    ("Edieresis", '\u{00CB}'),
    ("Egrave", '\u{00C8}'),
    ("Eth", '\u{00D0}'),
    ("F", '\u{0046}'),
    ("G", '\u{0047}'),
    ("Gbreve", '\u{011E}'),
    ("H", '\u{0048}'),
    ("I", '\u{0049}'),
    ("Iacute", '\u{00CD}'),
    ("Icircumflex", '\u{00CE}'),
    ("Idieresis", '\u{00CF}'),
    ("Idotaccent", '\u{0130}'),
    ("Igrave", '\u{00CC}'),
    ("J", '\u{004A}'),
    ("K", '\u{004B}'),
    ("L", '\u{004C}'),
    ("Lslash", '\u{0141}'),
    ("M", '\u{004D}'),
    ("N", '\u{004E}'),
    ("Ntilde", '\u{00D1}'),
    ("O", '\u{004F}'),
    ("OE", '\u{0152}'),
    ("Oacute", '\u{00D3}'),
    ("Ocircumflex", '\u{00D4}'),
    ("Odieresis", '\u{00D6}'),
    ("Ograve", '\u{00D2}'),
    ("Omega", '\u{03A9}'),
    ("Oslash", '\u{00D8}'),
    ("Otilde", '\u{00D5}'),
    ("P", '\u{0050}'),
    ("Q", '\u{0051}'),
    ("R", '\u{0052}'),
    ("S", '\u{0053}'),
    ("Scaron", '\u{0160}'),
    ("Scedilla", '\u{015E}'),
    ("T", '\u{0054}'),
    ("Thorn", '\u{00DE}'),
    ("U", '\u{0055}'),
    ("Uacute", '\u{00DA}'),
    ("Ucircumflex", '\u{00DB}'),
    ("Udieresis", '\u{00DC}'),
    ("Ugrave", '\u{00D9}'),
    ("V", '\u{0056}'),
    ("W", '\u{0057}'),
    ("X", '\u{0058}'),
    ("Y", '\u{0059}'),
    ("Yacute", '\u{00DD}'),
    ("Ydieresis", '\u{0178}'),
    ("Z", '\u{005A}'),
    ("Zcaron", '\u{017D}'),
    ("a", '\u{0061}'),
    ("aacute", '\u{00E1}'),
    ("acircumflex", '\u{00E2}'),
    ("acute", '\u{00B4}'),
    ("adieresis", '\u{00E4}'),
    ("ae", '\u{00E6}'),
    ("agrave", '\u{00E0}'),
    ("ampersand", '\u{0026}'),
    ("apple", '\u{F8FF}'),
    ("approxequal", '\u{2248}'),
    ("aring", '\u{00E5}'),
    ("asciicircum", '\u{005E}'),
    ("asciitilde", '\u{007E}'),
    ("asterisk", '\u{002A}'),
    ("at", '\u{0040}'),
    ("atilde", '\u{00E3}'),
    ("b", '\u{0062}'),
    ("backslash", '\u{005C}'),
    ("bar", '\u{007C}'),
    ("braceleft", '\u{007B}'),
    ("braceright", '\u{007D}'),
    ("bracketleft", '\u{005B}'),
    ("bracketright", '\u{005D}'),
    ("breve", '\u{02D8}'),
    ("brokenbar", '\u{00A6}'),
    ("bullet", '\u{2022}'),
    ("c", '\u{0063}'),
    ("cacute", '\u{0107}'),
    ("caron", '\u{02C7}'),
    ("ccaron", '\u{010D}'),
    ("ccedilla", '\u{00E7}'),
    ("cedilla", '\u{00B8}'),
    ("cent", '\u{00A2}'),
    ("circumflex", '\u{02C6}'),
    ("colon", '\u{003A}'),
    ("comma", '\u{002C}'),
    ("copyright", '\u{00A9}'),
    ("currency", '\u{00A4}'),
    ("d", '\u{0064}'),
    ("dagger", '\u{2020}'),
    ("daggerdbl", '\u{2021}'),
    ("dcroat", '\u{0111}'),
    ("degree", '\u{00B0}'),
    ("dieresis", '\u{00A8}'),
    ("divide", '\u{00F7}'),
    ("dollar", '\u{0024}'),
    ("dotaccent", '\u{02D9}'),
    ("dotlessi", '\u{0131}'),
    ("dotlessj", '\u{0237}'),
    ("e", '\u{0065}'),
    ("eacute", '\u{00E9}'),
    ("ecircumflex", '\u{00EA}'),
    ("edieresis", '\u{00EB}'),
    ("egrave", '\u{00E8}'),
    ("eight", '\u{0038}'),
    ("ellipsis", '\u{2026}'),
    ("emdash", '\u{2014}'),
    ("endash", '\u{2013}'),
    ("equal", '\u{003D}'),
    ("eth", '\u{00F0}'),
    ("exclam", '\u{0021}'),
    ("exclamdown", '\u{00A1}'),
    ("f", '\u{0066}'),
    ("ff", '\u{FB00}'),
    ("ffi", '\u{FB03}'),
    ("ffl", '\u{FB04}'),
    ("fi", '\u{FB01}'),
    ("five", '\u{0035}'),
    ("fl", '\u{FB02}'),
    ("florin", '\u{0192}'),
    ("four", '\u{0034}'),
    ("fraction", '\u{2044}'),
    ("franc", '\u{20A3}'),
    ("g", '\u{0067}'),
    ("gbreve", '\u{011F}'),
    ("germandbls", '\u{00DF}'),
    ("grave", '\u{0060}'),
    ("greater", '\u{003E}'),
    ("greaterequal", '\u{2265}'),
    ("guillemotleft", '\u{00AB}'),
    ("guillemotright", '\u{00BB}'),
    ("guilsinglleft", '\u{2039}'),
    ("guilsinglright", '\u{203A}'),
    ("h", '\u{0068}'),
    ("hungarumlaut", '\u{02DD}'),
    ("hyphen", '\u{002D}'),
    ("i", '\u{0069}'),
    ("iacute", '\u{00ED}'),
    ("icircumflex", '\u{00EE}'),
    ("idieresis", '\u{00EF}'),
    ("igrave", '\u{00EC}'),
    ("infinity", '\u{221E}'),
    ("integral", '\u{222B}'),
    ("j", '\u{006A}'),
    ("k", '\u{006B}'),
    ("l", '\u{006C}'),
    ("less", '\u{003C}'),
    ("lessequal", '\u{2264}'),
    ("logicalnot", '\u{00AC}'),
    ("lozenge", '\u{25CA}'),
    ("lslash", '\u{0142}'),
    ("m", '\u{006D}'),
    ("macron", '\u{00AF}'),
    ("minus", '\u{2212}'),
    ("mu", '\u{00B5}'),
    ("multiply", '\u{00D7}'),
    ("n", '\u{006E}'),
    ("nine", '\u{0039}'),
    ("nonbreakingspace", '\u{00A0}'),
    ("nonmarkingreturn", '\u{000D}'),
    ("notequal", '\u{2260}'),
    ("ntilde", '\u{00F1}'),
    ("numbersign", '\u{0023}'),
    ("o", '\u{006F}'),
    ("oacute", '\u{00F3}'),
    ("ocircumflex", '\u{00F4}'),
    ("odieresis", '\u{00F6}'),
    ("oe", '\u{0153}'),
    ("ogonek", '\u{02DB}'),
    ("ograve", '\u{00F2}'),
    ("one", '\u{0031}'),
    ("onehalf", '\u{00BD}'),
    ("onequarter", '\u{00BC}'),
    ("onesuperior", '\u{00B9}'),
    ("ordfeminine", '\u{00AA}'),
    ("ordmasculine", '\u{00BA}'),
    ("oslash", '\u{00F8}'),
    ("otilde", '\u{00F5}'),
    ("p", '\u{0070}'),
    ("paragraph", '\u{00B6}'),
    ("parenleft", '\u{0028}'),
    ("parenright", '\u{0029}'),
    ("partialdiff", '\u{2202}'),
    ("percent", '\u{0025}'),
    ("period", '\u{002E}'),
    ("periodcentered", '\u{00B7}'),
    ("perthousand", '\u{2030}'),
    ("pi", '\u{03C0}'),
    ("plus", '\u{002B}'),
    ("plusminus", '\u{00B1}'),
    ("product", '\u{220F}'),
    ("q", '\u{0071}'),
    ("question", '\u{003F}'),
    ("questiondown", '\u{00BF}'),
    ("quotedbl", '\u{0022}'),
    ("quotedblbase", '\u{201E}'),
    ("quotedblleft", '\u{201C}'),
    ("quotedblright", '\u{201D}'),
    ("quoteleft", '\u{2018}'),
    ("quoteright", '\u{2019}'),
    ("quotesinglbase", '\u{201A}'),
    ("quotesingle", '\u{0027}'),
    ("r", '\u{0072}'),
    ("radical", '\u{221A}'),
    ("registered", '\u{00AE}'),
    ("ring", '\u{02DA}'),
    ("s", '\u{0073}'),
    ("scaron", '\u{0161}'),
    ("scedilla", '\u{015F}'),
    ("section", '\u{00A7}'),
    ("semicolon", '\u{003B}'),
    ("seven", '\u{0037}'),
    ("six", '\u{0036}'),
    ("slash", '\u{002F}'),
    ("space", '\u{0020}'),
    ("sterling", '\u{00A3}'),
    ("summation", '\u{2211}'),
    ("t", '\u{0074}'),
    ("thorn", '\u{00FE}'),
    ("three", '\u{0033}'),
    ("threequarters", '\u{00BE}'),
    ("threesuperior", '\u{00B3}'),
    ("tilde", '\u{02DC}'),
    ("trademark", '\u{2122}'),
    ("two", '\u{0032}'),
    ("twosuperior", '\u{00B2}'),
    ("u", '\u{0075}'),
    ("uacute", '\u{00FA}'),
    ("ucircumflex", '\u{00FB}'),
    ("udieresis", '\u{00FC}'),
    ("ugrave", '\u{00F9}'),
    ("underscore", '\u{005F}'),
    ("v", '\u{0076}'),
    ("w", '\u{0077}'),
    ("x", '\u{0078}'),
    ("y", '\u{0079}'),
    ("yacute", '\u{00FD}'),
    ("ydieresis", '\u{00FF}'),
    ("yen", '\u{00A5}'),
    ("z", '\u{007A}'),
    ("zcaron", '\u{017E}'),
    ("zero", '\u{0030}'),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_sorted_and_deduplicated() {
        for window in GLYPH_UNICODES.windows(2) {
            assert!(window[0].0 < window[1].0, "{:?}", window);
        }
    }

    #[test]
    fn named_lookups() {
        assert_eq!(glyphname_unicode("space"), Some(' '));
        assert_eq!(glyphname_unicode("A"), Some('A'));
        assert_eq!(glyphname_unicode("fi"), Some('\u{FB01}'));
        assert_eq!(glyphname_unicode("ocircumflex"), Some('\u{00F4}'));
        assert_eq!(glyphname_unicode("anything.else"), None);
        assert_eq!(glyphname_unicode(""), None);
    }

    #[test]
    fn synthetic_uni_names() {
        assert_eq!(glyphname_unicode("uni0041"), Some('A'));
        assert_eq!(glyphname_unicode("uniFB01"), Some('\u{FB01}'));
        // Exactly four hex digits, and surrogates are not scalar values.
        assert_eq!(glyphname_unicode("uni41"), None);
        assert_eq!(glyphname_unicode("uni1D400"), None);
        assert_eq!(glyphname_unicode("uniD800"), None);
        // "union" is not a synthetic name, and not in the table either.
        assert_eq!(glyphname_unicode("union"), None);
    }

    #[test]
    fn synthetic_u_names() {
        assert_eq!(glyphname_unicode("u0041"), Some('A'));
        assert_eq!(glyphname_unicode("u1D400"), Some('\u{1D400}'));
        assert_eq!(glyphname_unicode("u10FFFF"), Some('\u{10FFFF}'));
        assert_eq!(glyphname_unicode("u110000"), None);
        assert_eq!(glyphname_unicode("u41"), None);
    }
}
