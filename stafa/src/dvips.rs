//! Parsing and rendering of dvips-style encoding templates.
//!
//! A template is an ordinary PostScript encoding file: a name, a
//! bracketed vector of up to 256 glyph names, and `def`. Comments
//! whose first word is `LIGKERN` or `UNICODING` carry directives the
//! synthesis pipeline honors; everything else in a comment is prose.

use std::fmt::Write as _;

use fnv::FnvHashMap;

use ot_read::types::GlyphId;

use crate::encoding::{Code, Glyph, GsubEncoding};
use crate::error::EncodeError;
use crate::font::Font;
use crate::names::glyphname_unicode;

/// One of the eight afm2tfm ligature operators.
///
/// `keep_left` and `keep_right` say which input glyphs survive next to
/// the new one; `skip` is how many positions the rescan passes over.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LigOp {
    pub keep_left: bool,
    pub keep_right: bool,
    pub skip: u8,
}

const LIG_OPS: &[(&str, LigOp)] = &[
    ("=:", LigOp { keep_left: false, keep_right: false, skip: 0 }),
    ("|=:", LigOp { keep_left: true, keep_right: false, skip: 0 }),
    ("|=:>", LigOp { keep_left: true, keep_right: false, skip: 1 }),
    ("=:|", LigOp { keep_left: false, keep_right: true, skip: 0 }),
    ("=:|>", LigOp { keep_left: false, keep_right: true, skip: 1 }),
    ("|=:|", LigOp { keep_left: true, keep_right: true, skip: 0 }),
    ("|=:|>", LigOp { keep_left: true, keep_right: true, skip: 1 }),
    ("|=:|>>", LigOp { keep_left: true, keep_right: true, skip: 2 }),
];

impl LigOp {
    /// Parses an operator token, `None` if it is not one of the eight.
    pub fn from_token(token: &str) -> Option<LigOp> {
        LIG_OPS
            .iter()
            .find(|entry| entry.0 == token)
            .map(|entry| entry.1)
    }

    /// The operator's textual form.
    pub fn token(self) -> &'static str {
        LIG_OPS
            .iter()
            .find(|entry| entry.1 == self)
            .map(|entry| entry.0)
            .unwrap_or("=:")
    }
}

/// What a `left {..} right` directive turns off for that glyph pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Suppression {
    /// `{}`: neither ligatures nor kerning.
    Both,

    /// `{L}`: no ligature.
    Ligature,

    /// `{K}`: no kern.
    Kern,
}

impl Suppression {
    fn from_token(token: &str) -> Option<Suppression> {
        match token {
            "{}" | "{LK}" | "{KL}" => Some(Suppression::Both),
            "{L}" => Some(Suppression::Ligature),
            "{K}" => Some(Suppression::Kern),
            _ => None,
        }
    }

    fn token(self) -> &'static str {
        match self {
            Suppression::Both => "{}",
            Suppression::Ligature => "{L}",
            Suppression::Kern => "{K}",
        }
    }

    /// `true` if kerning is turned off for the pair.
    pub fn suppresses_kern(self) -> bool {
        matches!(self, Suppression::Both | Suppression::Kern)
    }

    /// `true` if ligature formation is turned off for the pair.
    pub fn suppresses_ligature(self) -> bool {
        matches!(self, Suppression::Both | Suppression::Ligature)
    }
}

/// One parsed LIGKERN directive, glyphs still by name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LigKern {
    /// `left right =: result ;` and the other operator forms.
    Ligature {
        left: String,
        right: String,
        op: LigOp,
        result: String,
    },

    /// `left {} right ;` and the `{L}`/`{K}` variants.
    Suppress {
        left: String,
        right: String,
        what: Suppression,
    },

    /// `|| = name ;`, naming the word boundary glyph.
    Boundary { name: String },
}

/// A recoverable oddity found while parsing a template.
///
/// Diagnostics never abort the parse; the offending directive is
/// dropped and the rest of the template stands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TemplateDiagnostic {
    /// The 1-based source line.
    pub line: usize,
    /// What was wrong with it.
    pub message: String,
}

impl std::fmt::Display for TemplateDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

/// Where the scan is relative to the bracketed vector.
enum VectorState {
    /// Before `/Name`.
    Preamble,
    /// Saw the name, waiting for `[`.
    Named,
    /// Inside the brackets.
    Open,
    /// Past `]`.
    Closed,
}

enum Directive {
    LigKern,
    Unicoding,
}

/// A parsed encoding template.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DvipsEncoding {
    name: String,
    vector: Vec<String>,
    ligkerns: Vec<LigKern>,
    unicodings: FnvHashMap<String, Option<char>>,
}

impl DvipsEncoding {
    /// Parses a template, logging recoverable oddities at debug level.
    pub fn parse(text: &str) -> Result<DvipsEncoding, EncodeError> {
        Self::parse_with_diagnostics(text, &mut |diagnostic| log::debug!("{diagnostic}"))
    }

    /// Parses a template, reporting each recoverable oddity to `report`.
    ///
    /// Only a structurally unusable vector is an error: one that never
    /// closes, never appears, or names more than 256 codes. Everything
    /// else a template can get wrong is a [`TemplateDiagnostic`].
    pub fn parse_with_diagnostics(
        text: &str,
        report: &mut impl FnMut(TemplateDiagnostic),
    ) -> Result<DvipsEncoding, EncodeError> {
        let mut encoding = DvipsEncoding::default();
        let mut state = VectorState::Preamble;
        for (index, line) in text.lines().enumerate() {
            let number = index + 1;
            let (code, comment) = match line.find('%') {
                Some(at) => (&line[..at], &line[at + 1..]),
                None => (line, ""),
            };
            encoding.scan_vector(&tokenize(code), &mut state)?;
            let directive = comment.trim_start();
            if let Some(rest) = strip_keyword(directive, "LIGKERN") {
                encoding.parse_directives(rest, Directive::LigKern, number, report);
            } else if let Some(rest) = strip_keyword(directive, "UNICODING") {
                encoding.parse_directives(rest, Directive::Unicoding, number, report);
            }
        }
        match state {
            VectorState::Closed => Ok(encoding),
            VectorState::Preamble => Err(EncodeError::Template("template has no encoding vector")),
            _ => Err(EncodeError::Template("unterminated encoding vector")),
        }
    }

    /// The vector's PostScript name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The number of codes the vector assigns.
    pub fn len(&self) -> usize {
        self.vector.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vector.is_empty()
    }

    /// The glyph names in code order; `.notdef` marks an unbound code.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.vector.iter().map(String::as_str)
    }

    /// The LIGKERN directives in source order.
    pub fn ligkerns(&self) -> &[LigKern] {
        &self.ligkerns
    }

    /// The Unicode value a glyph name stands for.
    ///
    /// A UNICODING override wins over the built-in table; a cleared
    /// override (`name = ;`) forces `None` even for names the table
    /// knows.
    pub fn glyph_unicode(&self, name: &str) -> Option<char> {
        match self.unicodings.get(name) {
            Some(overridden) => *overridden,
            None => glyphname_unicode(name),
        }
    }

    /// Seeds a working table from the vector.
    ///
    /// Each name resolves through its Unicode value and the font's
    /// character map first, then through the font's glyph names. Codes
    /// whose name is `.notdef` or resolves to nothing are left unbound.
    pub fn make_gsub_encoding(&self, font: &Font) -> GsubEncoding {
        let mut encoding = GsubEncoding::with_len(self.vector.len());
        for (code, name) in self.vector.iter().enumerate() {
            if name == ".notdef" {
                continue;
            }
            match self.resolve_glyph(name, font) {
                Some(glyph) => encoding.encode(code, glyph.into()),
                None => log::debug!("no glyph for /{name} at code {code}"),
            }
        }
        encoding
    }

    /// The font glyph a template name stands for, if any.
    pub(crate) fn resolve_glyph(&self, name: &str, font: &Font) -> Option<GlyphId> {
        if let Some(unicode) = self.glyph_unicode(name) {
            if let Some(glyph) = font.map_codepoint(unicode) {
                return Some(glyph);
            }
        }
        font.glyph_for_name(name)
    }

    /// Renders the template back to text.
    ///
    /// The output parses to an equal template: the vector eight names
    /// per line, one LIGKERN comment per directive, and the UNICODING
    /// overrides sorted by name.
    pub fn unparse(&self) -> String {
        let mut out = String::new();
        write_vector(&mut out, &self.name, self.names());
        for ligkern in &self.ligkerns {
            write_ligkern(&mut out, ligkern);
        }
        let mut overrides: Vec<_> = self.unicodings.iter().collect();
        overrides.sort_by(|a, b| a.0.cmp(b.0));
        for (name, value) in overrides {
            match value {
                Some(unicode) => {
                    let _ = writeln!(out, "% UNICODING {name} = {} ;", unicode_name(*unicode));
                }
                None => {
                    let _ = writeln!(out, "% UNICODING {name} = ;");
                }
            }
        }
        out
    }

    /// Renders a synthesized table with this template's directives.
    ///
    /// Codes are named from the font's glyph names where possible; a
    /// fake ligature code becomes `lig<code>` and any other nameless
    /// glyph `gid<N>`. After the template's own LIGKERN lines, each
    /// pairwise ligature record is written as a `=:` line, minus the
    /// pairs the template suppresses.
    pub fn unparse_encoding(&self, encoding: &GsubEncoding, font: &Font) -> String {
        let names: Vec<String> = (0..encoding.len())
            .map(|code| code_name(encoding, font, code))
            .collect();
        let mut out = String::new();
        write_vector(&mut out, &self.name, names.iter().map(String::as_str));
        for ligkern in &self.ligkerns {
            write_ligkern(&mut out, ligkern);
        }
        for record in encoding.ligatures() {
            let &[left, right] = record.input.as_slice() else {
                continue;
            };
            let (Some(left), Some(right), Some(result)) =
                (names.get(left), names.get(right), names.get(record.out))
            else {
                continue;
            };
            if self.ligature_suppressed(left, right) {
                continue;
            }
            let _ = writeln!(out, "% LIGKERN {left} {right} =: {result} ;");
        }
        out
    }

    fn ligature_suppressed(&self, left: &str, right: &str) -> bool {
        self.ligkerns.iter().any(|ligkern| {
            matches!(ligkern, LigKern::Suppress { left: l, right: r, what }
                if what.suppresses_ligature() && l == left && r == right)
        })
    }

    fn scan_vector(
        &mut self,
        tokens: &[&str],
        state: &mut VectorState,
    ) -> Result<(), EncodeError> {
        for &token in tokens {
            match state {
                VectorState::Preamble => {
                    if let Some(name) = token.strip_prefix('/') {
                        self.name = name.to_string();
                        *state = VectorState::Named;
                    }
                    // Anything else up front is PostScript scaffolding.
                }
                VectorState::Named => {
                    if token == "[" {
                        *state = VectorState::Open;
                    } else if let Some(name) = token.strip_prefix('/') {
                        // A later name before the bracket replaces the first.
                        self.name = name.to_string();
                    }
                }
                VectorState::Open => {
                    if token == "]" {
                        *state = VectorState::Closed;
                    } else {
                        if self.vector.len() == 256 {
                            return Err(EncodeError::Template(
                                "encoding vector longer than 256 entries",
                            ));
                        }
                        let name = token.strip_prefix('/').unwrap_or(token);
                        self.vector.push(name.to_string());
                    }
                }
                VectorState::Closed => {}
            }
        }
        Ok(())
    }

    fn parse_directives(
        &mut self,
        text: &str,
        kind: Directive,
        line: usize,
        report: &mut impl FnMut(TemplateDiagnostic),
    ) {
        let mut statements: Vec<&str> = text.split(';').collect();
        let tail = statements.pop().unwrap_or("");
        if !tail.trim().is_empty() {
            report(TemplateDiagnostic {
                line,
                message: format!("unterminated directive {:?}", tail.trim()),
            });
        }
        for statement in statements {
            let words: Vec<&str> = statement.split_whitespace().collect();
            if words.is_empty() {
                continue;
            }
            match kind {
                Directive::LigKern => self.parse_ligkern(&words, line, report),
                Directive::Unicoding => self.parse_unicoding(&words, line, report),
            }
        }
    }

    fn parse_ligkern(
        &mut self,
        words: &[&str],
        line: usize,
        report: &mut impl FnMut(TemplateDiagnostic),
    ) {
        match words {
            ["||", "=", name] => self.ligkerns.push(LigKern::Boundary {
                name: name.to_string(),
            }),
            [left, what, right] => match Suppression::from_token(what) {
                Some(what) => self.ligkerns.push(LigKern::Suppress {
                    left: left.to_string(),
                    right: right.to_string(),
                    what,
                }),
                None => report(TemplateDiagnostic {
                    line,
                    message: format!("malformed LIGKERN directive {:?}", words.join(" ")),
                }),
            },
            [left, right, op, result] => match LigOp::from_token(op) {
                Some(op) => self.ligkerns.push(LigKern::Ligature {
                    left: left.to_string(),
                    right: right.to_string(),
                    op,
                    result: result.to_string(),
                }),
                None => report(TemplateDiagnostic {
                    line,
                    message: format!("unintelligible LIGKERN operator {op:?}"),
                }),
            },
            _ => report(TemplateDiagnostic {
                line,
                message: format!("malformed LIGKERN directive {:?}", words.join(" ")),
            }),
        }
    }

    fn parse_unicoding(
        &mut self,
        words: &[&str],
        line: usize,
        report: &mut impl FnMut(TemplateDiagnostic),
    ) {
        match words {
            [name, "=" | "=:"] => {
                self.unicodings.insert(name.to_string(), None);
            }
            [name, "=" | "=:", value] => match unicode_value(value) {
                Some(unicode) => {
                    self.unicodings.insert(name.to_string(), Some(unicode));
                }
                None => report(TemplateDiagnostic {
                    line,
                    message: format!("unintelligible UNICODING value {value:?}"),
                }),
            },
            _ => report(TemplateDiagnostic {
                line,
                message: format!("malformed UNICODING directive {:?}", words.join(" ")),
            }),
        }
    }
}

/// Splits a line of the PostScript part into tokens.
///
/// Brackets stand alone and `/` starts a fresh token, so glued forms
/// like `[/a/b]` come apart the way a PostScript scanner would split
/// them.
fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = None;
    for (index, byte) in text.bytes().enumerate() {
        match byte {
            b'[' | b']' => {
                if let Some(from) = start.take() {
                    tokens.push(&text[from..index]);
                }
                tokens.push(&text[index..index + 1]);
            }
            b'/' => {
                if let Some(from) = start.take() {
                    tokens.push(&text[from..index]);
                }
                start = Some(index);
            }
            b' ' | b'\t' | b'\r' => {
                if let Some(from) = start.take() {
                    tokens.push(&text[from..index]);
                }
            }
            _ => {
                if start.is_none() {
                    start = Some(index);
                }
            }
        }
    }
    if let Some(from) = start {
        tokens.push(&text[from..]);
    }
    tokens
}

/// Strips a leading directive keyword, requiring a word boundary after it.
fn strip_keyword<'t>(text: &'t str, keyword: &str) -> Option<&'t str> {
    let rest = text.strip_prefix(keyword)?;
    if rest.is_empty() || rest.starts_with([' ', '\t']) {
        Some(rest)
    } else {
        None
    }
}

/// Reads a directive's Unicode value: `U+xxxx` or a glyph name.
fn unicode_value(value: &str) -> Option<char> {
    if let Some(hex) = value.strip_prefix("U+") {
        if (1..=6).contains(&hex.len()) && hex.bytes().all(|byte| byte.is_ascii_hexdigit()) {
            return u32::from_str_radix(hex, 16).ok().and_then(char::from_u32);
        }
        return None;
    }
    glyphname_unicode(value)
}

/// A synthetic glyph name encoding a Unicode value.
fn unicode_name(unicode: char) -> String {
    let value = unicode as u32;
    if value <= 0xFFFF {
        format!("uni{value:04X}")
    } else {
        format!("u{value:04X}")
    }
}

/// The template name for whatever a code holds.
fn code_name(encoding: &GsubEncoding, font: &Font, code: Code) -> String {
    let glyph = encoding.glyph(code);
    if glyph == Glyph::NOTDEF {
        return ".notdef".to_string();
    }
    if glyph == Glyph::FAKE_LIGATURE {
        return format!("lig{code}");
    }
    match glyph.glyph_id().and_then(|gid| font.glyph_name(gid)) {
        Some(name) => name.to_string(),
        None => format!("gid{}", glyph.to_u32()),
    }
}

fn write_vector<'n>(out: &mut String, name: &str, names: impl Iterator<Item = &'n str>) {
    let _ = writeln!(out, "/{name} [");
    let names: Vec<&str> = names.collect();
    for chunk in names.chunks(8) {
        let mut line = String::new();
        for name in chunk {
            if !line.is_empty() {
                line.push(' ');
            }
            line.push('/');
            line.push_str(name);
        }
        out.push_str(&line);
        out.push('\n');
    }
    out.push_str("] def\n");
}

fn write_ligkern(out: &mut String, ligkern: &LigKern) {
    match ligkern {
        LigKern::Ligature {
            left,
            right,
            op,
            result,
        } => {
            let _ = writeln!(out, "% LIGKERN {left} {right} {} {result} ;", op.token());
        }
        LigKern::Suppress { left, right, what } => {
            let _ = writeln!(out, "% LIGKERN {left} {} {right} ;", what.token());
        }
        LigKern::Boundary { name } => {
            let _ = writeln!(out, "% LIGKERN || = {name} ;");
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn collect(text: &str) -> (DvipsEncoding, Vec<TemplateDiagnostic>) {
        let mut diagnostics = Vec::new();
        let encoding = DvipsEncoding::parse_with_diagnostics(text, &mut |diagnostic| {
            diagnostics.push(diagnostic)
        })
        .unwrap();
        (encoding, diagnostics)
    }

    const SAMPLE: &str = "\
% A comment the parser skips.
/TestEnc [
/f /i /fi /.notdef
/A
] def
% LIGKERN f i =: fi ; A {K} V ;
% LIGKERN || = space ;
% UNICODING germandbls = ; mu = U+00B5 ;
";

    #[test]
    fn parses_the_vector() {
        let (encoding, diagnostics) = collect(SAMPLE);
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        assert_eq!(encoding.name(), "TestEnc");
        assert_eq!(
            encoding.names().collect::<Vec<_>>(),
            ["f", "i", "fi", ".notdef", "A"]
        );
    }

    #[test]
    fn parses_the_directives() {
        let (encoding, _) = collect(SAMPLE);
        assert_eq!(
            encoding.ligkerns(),
            [
                LigKern::Ligature {
                    left: "f".into(),
                    right: "i".into(),
                    op: LigOp::from_token("=:").unwrap(),
                    result: "fi".into(),
                },
                LigKern::Suppress {
                    left: "A".into(),
                    right: "V".into(),
                    what: Suppression::Kern,
                },
                LigKern::Boundary {
                    name: "space".into(),
                },
            ]
        );
        assert_eq!(encoding.glyph_unicode("mu"), Some('\u{00B5}'));
        assert_eq!(encoding.glyph_unicode("germandbls"), None);
        // Names without an override still hit the built-in table.
        assert_eq!(encoding.glyph_unicode("fi"), Some('\u{FB01}'));
    }

    #[test]
    fn operator_tokens_round_trip() {
        for (token, _) in LIG_OPS {
            let op = LigOp::from_token(token).unwrap();
            assert_eq!(op.token(), *token);
        }
        assert_eq!(LigOp::from_token("="), None);
        assert_eq!(LigOp::from_token("|=:|>>>"), None);
    }

    #[test]
    fn suppression_tokens() {
        for token in ["{}", "{LK}", "{KL}"] {
            assert_eq!(Suppression::from_token(token), Some(Suppression::Both));
        }
        assert_eq!(Suppression::from_token("{L}"), Some(Suppression::Ligature));
        assert_eq!(Suppression::from_token("{K}"), Some(Suppression::Kern));
        assert_eq!(Suppression::from_token("{X}"), None);
        assert!(Suppression::Both.suppresses_kern());
        assert!(Suppression::Both.suppresses_ligature());
        assert!(!Suppression::Kern.suppresses_ligature());
        assert!(!Suppression::Ligature.suppresses_kern());
    }

    #[test]
    fn glued_postscript_tokens_come_apart() {
        let encoding = DvipsEncoding::parse("/E[/a/b/c]def").unwrap();
        assert_eq!(encoding.name(), "E");
        assert_eq!(encoding.names().collect::<Vec<_>>(), ["a", "b", "c"]);
    }

    #[test]
    fn reports_malformed_directives() {
        let text = "\
/E [ /a ] def
% LIGKERN f i bogus fi ;
% UNICODING mu = one two ;
% LIGKERN a b =: ab
";
        let (encoding, diagnostics) = collect(text);
        assert!(encoding.ligkerns().is_empty());
        assert_eq!(
            diagnostics,
            [
                TemplateDiagnostic {
                    line: 2,
                    message: "unintelligible LIGKERN operator \"bogus\"".into(),
                },
                TemplateDiagnostic {
                    line: 3,
                    message: "malformed UNICODING directive \"mu = one two\"".into(),
                },
                TemplateDiagnostic {
                    line: 4,
                    message: "unterminated directive \"a b =: ab\"".into(),
                },
            ]
        );
    }

    #[test]
    fn keyword_needs_a_word_boundary() {
        let text = "/E [ /a ] def\n% LIGKERNS f i =: fi ;\n";
        let (encoding, diagnostics) = collect(text);
        assert!(encoding.ligkerns().is_empty());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn rejects_a_vector_that_never_closes() {
        assert_eq!(
            DvipsEncoding::parse("/E [ /a /b"),
            Err(EncodeError::Template("unterminated encoding vector"))
        );
        assert_eq!(
            DvipsEncoding::parse("% LIGKERN f i =: fi ;"),
            Err(EncodeError::Template("template has no encoding vector"))
        );
    }

    #[test]
    fn rejects_an_oversized_vector() {
        let mut text = String::from("/E [\n");
        for code in 0..257 {
            text.push_str(&format!("/name{code}\n"));
        }
        text.push_str("] def\n");
        assert_eq!(
            DvipsEncoding::parse(&text),
            Err(EncodeError::Template("encoding vector longer than 256 entries"))
        );
    }

    #[test]
    fn unparse_round_trips() {
        let (encoding, _) = collect(SAMPLE);
        let rendered = encoding.unparse();
        assert_eq!(DvipsEncoding::parse(&rendered).unwrap(), encoding);
    }

    #[test]
    fn unparse_spells_overrides_by_value() {
        let (encoding, _) = collect(SAMPLE);
        let rendered = encoding.unparse();
        assert!(rendered.contains("% UNICODING germandbls = ;"));
        assert!(rendered.contains("% UNICODING mu = uni00B5 ;"));
    }
}
