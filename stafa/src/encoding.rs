//! The working code↔glyph table that substitution rules are applied to.

use fnv::{FnvHashMap, FnvHashSet};
use ot_read::tables::gsub::Substitution;
use ot_read::types::GlyphId;

use crate::error::EncodeError;

/// A position in the working encoding table.
pub type Code = usize;

/// A glyph in the synthesis engine's working space.
///
/// The working space is wider than the font's 16-bit glyph id space so
/// the engine can coin glyphs of its own, such as
/// [`FAKE_LIGATURE`](Glyph::FAKE_LIGATURE).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Glyph(u32);

impl Glyph {
    /// The unbound marker; a code slot holding it encodes nothing.
    pub const NOTDEF: Glyph = Glyph(0);

    /// A stand-in for ligature steps no real glyph covers.
    ///
    /// [`GsubEncoding::simplify_ligatures`] binds codes to it when a
    /// pairwise step of a longer ligature has no glyph of its own.
    pub const FAKE_LIGATURE: Glyph = Glyph(0xffff_ffff);

    /// Construct a glyph from its raw working-space value.
    pub const fn new(raw: u32) -> Self {
        Glyph(raw)
    }

    /// The raw working-space value.
    pub const fn to_u32(self) -> u32 {
        self.0
    }

    /// The font glyph this stands for, unless it is engine-internal.
    pub fn glyph_id(self) -> Option<GlyphId> {
        u16::try_from(self.0).ok().map(GlyphId::new)
    }
}

impl From<GlyphId> for Glyph {
    fn from(glyph_id: GlyphId) -> Self {
        Glyph(glyph_id.to_u32())
    }
}

/// One ligature produced while applying substitution rules.
///
/// Records hold codes, not glyphs, so a later rule that rebinds a
/// participating code is observed implicitly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LigatureRecord {
    /// The codes consumed, in text order.
    pub input: Vec<Code>,
    /// The code the ligature glyph is bound to.
    pub out: Code,
    /// Suppress kerning across the span this rule covers.
    pub skip: bool,
}

/// A working code↔glyph table under construction.
///
/// Seeded from an encoding template, the table is mutated by the font's
/// substitution rules, reduced to pairwise ligatures, and shrunk back
/// under its size limit. Code 0 keeps the traditional role of the first
/// encoding slot: substitution never rebinds it and shrinking never
/// relocates another glyph into it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GsubEncoding {
    codes: Vec<Glyph>,
    // The lowest code bound to each real glyph; NOTDEF and FAKE_LIGATURE
    // are never keyed.
    by_glyph: FnvHashMap<Glyph, Code>,
    // Assignment stamps drive least-recently-assigned eviction.
    stamps: Vec<u64>,
    clock: u64,
    ligatures: Vec<LigatureRecord>,
    // A boundary between codes c and c+1 is keyed by c.
    skip_boundaries: FnvHashSet<Code>,
}

/// `true` for glyphs that participate in the reverse map.
fn keyed(glyph: Glyph) -> bool {
    glyph != Glyph::NOTDEF && glyph != Glyph::FAKE_LIGATURE
}

impl GsubEncoding {
    /// A table of `len` unbound codes.
    pub fn with_len(len: usize) -> Self {
        GsubEncoding {
            codes: vec![Glyph::NOTDEF; len],
            stamps: vec![0; len],
            ..Default::default()
        }
    }

    /// The number of codes in the table, bound or not.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// `true` if the table has no codes at all.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// The glyph bound at `code`; NOTDEF when out of range or unbound.
    pub fn glyph(&self, code: Code) -> Glyph {
        self.codes.get(code).copied().unwrap_or(Glyph::NOTDEF)
    }

    /// The lowest code currently bound to `glyph`, if any.
    pub fn encoding(&self, glyph: Glyph) -> Option<Code> {
        self.by_glyph.get(&glyph).copied()
    }

    /// The glyphs bound at each code, in code order.
    pub fn codes(&self) -> impl Iterator<Item = Glyph> + '_ {
        self.codes.iter().copied()
    }

    /// The ligature records, in creation order.
    pub fn ligatures(&self) -> &[LigatureRecord] {
        &self.ligatures
    }

    /// Bind `glyph` at `code`.
    ///
    /// Every mutation of the table goes through here, so the code list,
    /// the reverse map and the assignment stamps can never disagree.
    /// `code` must be within the table.
    pub fn encode(&mut self, code: Code, glyph: Glyph) {
        let old = std::mem::replace(&mut self.codes[code], glyph);
        self.clock += 1;
        self.stamps[code] = self.clock;
        if old == glyph {
            return;
        }
        if keyed(old) && self.by_glyph.get(&old) == Some(&code) {
            // The displaced glyph loses its canonical code; rehome it to
            // its next lowest binding if one remains.
            self.by_glyph.remove(&old);
            if let Some(next) = self.codes.iter().position(|g| *g == old) {
                self.by_glyph.insert(old, next);
            }
        }
        if keyed(glyph) {
            let entry = self.by_glyph.entry(glyph).or_insert(code);
            if *entry > code {
                *entry = code;
            }
        }
    }

    /// The code bound to `glyph`, appending a new one if necessary.
    ///
    /// [`FAKE_LIGATURE`](Glyph::FAKE_LIGATURE) is never found, so every
    /// call coins a fresh fake code.
    pub fn force_encoding(&mut self, glyph: Glyph) -> Code {
        if let Some(code) = self.encoding(glyph) {
            return code;
        }
        let code = self.codes.len();
        self.codes.push(Glyph::NOTDEF);
        self.stamps.push(0);
        self.encode(code, glyph);
        code
    }

    /// Apply one substitution rule; returns whether the table changed.
    pub fn apply(&mut self, substitution: &Substitution) -> bool {
        match substitution {
            Substitution::Single { from, to } => self.apply_single((*from).into(), (*to).into()),
            Substitution::Ligature {
                components,
                ligature,
            } => self.apply_ligature(components, (*ligature).into()),
        }
    }

    /// Rebind every code holding `from` to `to`, code 0 excepted.
    fn apply_single(&mut self, from: Glyph, to: Glyph) -> bool {
        if from == to || from == Glyph::NOTDEF {
            return false;
        }
        let mut changed = false;
        // Code 0 keeps whatever the template put there.
        for code in 1..self.codes.len() {
            if self.codes[code] == from {
                self.encode(code, to);
                changed = true;
            }
        }
        changed
    }

    /// Record the first ascending run of codes spelling `components`.
    ///
    /// The component codes stay bound; the rule only assigns the ligature
    /// glyph a code of its own and remembers the span. The span's internal
    /// boundaries are marked so later rules cannot match across it.
    fn apply_ligature(&mut self, components: &[GlyphId], ligature: Glyph) -> bool {
        let Some(input) = self.find_run(components) else {
            log::debug!("no adjacent codes for a {}-glyph ligature", components.len());
            return false;
        };
        let out = self.force_encoding(ligature);
        for window in input.windows(2) {
            self.skip_boundaries.insert(window[0]);
        }
        self.ligatures.push(LigatureRecord {
            input,
            out,
            skip: true,
        });
        true
    }

    /// The first run of consecutive codes whose glyphs equal `components`
    /// in order, crossing no recorded boundary.
    fn find_run(&self, components: &[GlyphId]) -> Option<Vec<Code>> {
        let glyphs: Vec<Glyph> = components.iter().map(|&g| g.into()).collect();
        if glyphs.is_empty() || glyphs.contains(&Glyph::NOTDEF) {
            return None;
        }
        let starts = self.codes.len().checked_sub(glyphs.len() - 1)?;
        for start in 0..starts {
            let run = start..start + glyphs.len();
            let matches = run
                .clone()
                .zip(&glyphs)
                .all(|(code, glyph)| self.codes[code] == *glyph);
            let blocked = run
                .clone()
                .take(glyphs.len() - 1)
                .any(|code| self.skip_boundaries.contains(&code));
            if matches && !blocked {
                return Some(run.collect());
            }
        }
        None
    }

    /// Apply rules in the given order; returns how many changed the table.
    pub fn apply_substitutions(&mut self, substitutions: &[Substitution]) -> usize {
        substitutions
            .iter()
            .filter(|substitution| self.apply(substitution))
            .count()
    }

    /// Reduce every ligature record to pairwise form.
    ///
    /// A record with more than two inputs folds left: each leading pair
    /// reuses an existing pair record's output when one exists, gets a
    /// fresh [`FAKE_LIGATURE`](Glyph::FAKE_LIGATURE) code when `add_fake`
    /// is set, and otherwise takes the whole record down with it.
    /// Afterwards duplicate input pairs keep only the earliest record.
    pub fn simplify_ligatures(&mut self, add_fake: bool) {
        let mut index = 0;
        while index < self.ligatures.len() {
            if self.ligatures[index].input.len() > 2 {
                self.fold_ligature(index, add_fake);
            }
            index += 1;
        }
        self.ligatures.retain(|record| record.input.len() == 2);
        let mut seen = FnvHashSet::default();
        self.ligatures
            .retain(|record| seen.insert(record.input.clone()));
    }

    /// Fold the record at `index` into pairwise records.
    fn fold_ligature(&mut self, index: usize, add_fake: bool) {
        let record = self.ligatures[index].clone();
        let mut lead = record.input[0];
        for position in 1..record.input.len() - 1 {
            let pair = [lead, record.input[position]];
            lead = match self.pair_output(pair) {
                Some(out) => out,
                None if add_fake => {
                    let out = self.force_encoding(Glyph::FAKE_LIGATURE);
                    self.ligatures.push(LigatureRecord {
                        input: pair.to_vec(),
                        out,
                        skip: record.skip,
                    });
                    out
                }
                None => {
                    log::debug!(
                        "dropping a {}-code ligature with no pairwise steps",
                        record.input.len()
                    );
                    self.ligatures[index].input.clear();
                    return;
                }
            };
        }
        let last = record.input[record.input.len() - 1];
        self.ligatures[index] = LigatureRecord {
            input: vec![lead, last],
            out: record.out,
            skip: record.skip,
        };
    }

    /// The output code of an existing pair record with this exact input.
    fn pair_output(&self, pair: [Code; 2]) -> Option<Code> {
        self.ligatures
            .iter()
            .find(|record| record.input == pair)
            .map(|record| record.out)
    }

    /// Shrink the table to at most `limit` codes.
    ///
    /// Codes the ligature records reference are never evicted, nor is a
    /// bound code 0. When more codes than `limit` allows must survive,
    /// the table is left untouched and [`EncodeError::Overflow`] is
    /// returned. Otherwise the least recently assigned unreferenced codes
    /// are evicted until everything fits, surviving glyphs above the
    /// limit are relocated into freed slots below it, and the records are
    /// rewritten through the same relocation.
    pub fn shrink_to(&mut self, limit: usize) -> Result<(), EncodeError> {
        if self.codes.len() <= limit {
            return Ok(());
        }
        let code0_bound = self.glyph(0) != Glyph::NOTDEF;
        // Slot 0 never receives a relocated glyph.
        let capacity = if code0_bound {
            limit
        } else {
            limit.saturating_sub(1)
        };
        let mut keep: FnvHashSet<Code> = self
            .referenced_codes()
            .into_iter()
            .filter(|&code| self.glyph(code) != Glyph::NOTDEF)
            .collect();
        if code0_bound {
            keep.insert(0);
        }
        if keep.len() > capacity {
            return Err(EncodeError::Overflow {
                needed: keep.len(),
                limit,
            });
        }

        let mut evictable: Vec<Code> = (0..self.codes.len())
            .filter(|&code| self.codes[code] != Glyph::NOTDEF && !keep.contains(&code))
            .collect();
        let evict_count = (keep.len() + evictable.len()).saturating_sub(capacity);
        evictable.sort_unstable_by_key(|&code| self.stamps[code]);
        let evicted: FnvHashSet<Code> = evictable[..evict_count].iter().copied().collect();

        // Free slots below the limit, lowest first.
        let mut free: Vec<Code> = (1..limit)
            .filter(|code| self.codes[*code] == Glyph::NOTDEF || evicted.contains(code))
            .collect();
        free.reverse();
        let mut relocated: Vec<Option<Code>> = vec![None; self.codes.len()];
        for code in 0..self.codes.len() {
            if self.codes[code] == Glyph::NOTDEF || evicted.contains(&code) {
                continue;
            }
            if code < limit {
                relocated[code] = Some(code);
            } else {
                relocated[code] = free.pop();
            }
        }

        let old_codes = std::mem::take(&mut self.codes);
        let old_stamps = std::mem::take(&mut self.stamps);
        self.codes = vec![Glyph::NOTDEF; limit];
        self.stamps = vec![0; limit];
        for (code, target) in relocated.iter().enumerate() {
            if let Some(target) = target {
                self.codes[*target] = old_codes[code];
                self.stamps[*target] = old_stamps[code];
            }
        }
        self.by_glyph.clear();
        for (code, &glyph) in self.codes.iter().enumerate() {
            if keyed(glyph) {
                self.by_glyph.entry(glyph).or_insert(code);
            }
        }

        let mut records = std::mem::take(&mut self.ligatures);
        records.retain_mut(|record| {
            let mut remap = |code: Code| -> Option<Code> {
                if let Some(target) = relocated.get(code).copied().flatten() {
                    return Some(target);
                }
                // The code did not survive; follow its glyph to another
                // binding if one exists.
                self.encoding(old_codes.get(code).copied().unwrap_or(Glyph::NOTDEF))
            };
            for code in record.input.iter_mut() {
                match remap(*code) {
                    Some(new) => *code = new,
                    None => return false,
                }
            }
            match remap(record.out) {
                Some(new) => {
                    record.out = new;
                    true
                }
                None => false,
            }
        });
        self.ligatures = records;

        let in_place = |code: Code| relocated.get(code).copied().flatten() == Some(code);
        self.skip_boundaries
            .retain(|&code| in_place(code) && in_place(code + 1));
        Ok(())
    }

    /// Every code an input or output of some record points at.
    fn referenced_codes(&self) -> FnvHashSet<Code> {
        self.ligatures
            .iter()
            .flat_map(|record| record.input.iter().copied().chain([record.out]))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(glyphs: &[u32]) -> GsubEncoding {
        let mut encoding = GsubEncoding::with_len(glyphs.len());
        for (code, &glyph) in glyphs.iter().enumerate() {
            if glyph != 0 {
                encoding.encode(code, Glyph::new(glyph));
            }
        }
        encoding
    }

    fn ligature(components: &[u32], ligature: u32) -> Substitution {
        Substitution::Ligature {
            components: components.iter().map(|&g| GlyphId::new(g as u16)).collect(),
            ligature: GlyphId::new(ligature as u16),
        }
    }

    fn single(from: u32, to: u32) -> Substitution {
        Substitution::Single {
            from: GlyphId::new(from as u16),
            to: GlyphId::new(to as u16),
        }
    }

    #[test]
    fn lowest_code_is_canonical() {
        let encoding = table(&[5, 7, 5]);
        assert_eq!(encoding.encoding(Glyph::new(5)), Some(0));
        assert_eq!(encoding.encoding(Glyph::new(7)), Some(1));
        assert_eq!(encoding.glyph(2), Glyph::new(5));
        // Out of range reads as unbound.
        assert_eq!(encoding.glyph(9), Glyph::NOTDEF);
        assert_eq!(encoding.encoding(Glyph::NOTDEF), None);
    }

    #[test]
    fn rebinding_rehomes_the_displaced_glyph() {
        let mut encoding = table(&[5, 7, 5]);
        encoding.encode(0, Glyph::new(9));
        assert_eq!(encoding.encoding(Glyph::new(9)), Some(0));
        assert_eq!(encoding.encoding(Glyph::new(5)), Some(2));
    }

    #[test]
    fn single_substitution_spares_code_zero() {
        let mut encoding = table(&[5, 5, 5]);
        assert!(encoding.apply(&single(5, 6)));
        assert_eq!(encoding.glyph(0), Glyph::new(5));
        assert_eq!(encoding.glyph(1), Glyph::new(6));
        assert_eq!(encoding.glyph(2), Glyph::new(6));
        assert_eq!(encoding.encoding(Glyph::new(5)), Some(0));
        assert_eq!(encoding.encoding(Glyph::new(6)), Some(1));
    }

    #[test]
    fn ligature_takes_the_first_unblocked_run() {
        let mut encoding = table(&[10, 11, 10, 11]);
        assert!(encoding.apply(&ligature(&[10, 11], 30)));
        assert_eq!(
            encoding.ligatures(),
            [LigatureRecord {
                input: vec![0, 1],
                out: 4,
                skip: true,
            }]
        );
        assert_eq!(encoding.glyph(4), Glyph::new(30));

        // The first run is now fenced off by its own boundary, so the
        // same rule matches the later one, reusing the ligature's code.
        assert!(encoding.apply(&ligature(&[10, 11], 30)));
        assert_eq!(
            encoding.ligatures()[1],
            LigatureRecord {
                input: vec![2, 3],
                out: 4,
                skip: true,
            }
        );
    }

    #[test]
    fn non_adjacent_ligature_leaves_the_table_untouched() {
        let mut encoding = table(&[10, 99, 11]);
        let before = encoding.clone();
        assert!(!encoding.apply(&ligature(&[10, 11], 30)));
        assert_eq!(encoding, before);
    }

    #[test]
    fn application_count() {
        let mut encoding = table(&[10, 11, 12]);
        let rules = [
            ligature(&[10, 11], 30),
            ligature(&[10, 11], 32), // no unblocked run is left for this one
            single(12, 13),
            single(77, 78), // not in the table
        ];
        assert_eq!(encoding.apply_substitutions(&rules), 2);
        // 12 lost its only code to the single substitution.
        assert_eq!(encoding.encoding(Glyph::new(12)), None);
        assert_eq!(encoding.encoding(Glyph::new(13)), Some(2));
    }

    #[test]
    fn simplify_reuses_an_existing_pair() {
        let mut encoding = table(&[10, 11, 12, 30, 40]);
        encoding.ligatures.push(LigatureRecord {
            input: vec![0, 1],
            out: 3,
            skip: true,
        });
        encoding.ligatures.push(LigatureRecord {
            input: vec![0, 1, 2],
            out: 4,
            skip: true,
        });
        encoding.simplify_ligatures(false);
        assert_eq!(
            encoding.ligatures(),
            [
                LigatureRecord {
                    input: vec![0, 1],
                    out: 3,
                    skip: true,
                },
                LigatureRecord {
                    input: vec![3, 2],
                    out: 4,
                    skip: true,
                },
            ]
        );
    }

    #[test]
    fn simplify_synthesizes_fake_steps() {
        let mut encoding = table(&[10, 10, 11]);
        assert!(encoding.apply(&ligature(&[10, 10, 11], 31)));
        encoding.simplify_ligatures(true);
        // The leading pair had no glyph, so it got a fake code.
        let fake = encoding
            .codes()
            .position(|g| g == Glyph::FAKE_LIGATURE)
            .expect("fake code appended");
        assert_eq!(fake, 4);
        assert_eq!(
            encoding.ligatures(),
            [
                LigatureRecord {
                    input: vec![fake, 2],
                    out: 3,
                    skip: true,
                },
                LigatureRecord {
                    input: vec![0, 1],
                    out: fake,
                    skip: true,
                },
            ]
        );
    }

    #[test]
    fn simplify_without_fakes_drops_unreachable_records() {
        let mut encoding = table(&[10, 10, 11]);
        assert!(encoding.apply(&ligature(&[10, 10, 11], 31)));
        encoding.simplify_ligatures(false);
        assert!(encoding.ligatures().is_empty());
    }

    #[test]
    fn simplify_keeps_the_earliest_duplicate() {
        let mut encoding = table(&[10, 11, 30, 31]);
        encoding.ligatures.push(LigatureRecord {
            input: vec![0, 1],
            out: 2,
            skip: true,
        });
        encoding.ligatures.push(LigatureRecord {
            input: vec![0, 1],
            out: 3,
            skip: true,
        });
        encoding.simplify_ligatures(false);
        assert_eq!(encoding.ligatures().len(), 1);
        assert_eq!(encoding.ligatures()[0].out, 2);
    }

    #[test]
    fn shrink_is_a_no_op_within_the_limit() {
        let mut encoding = table(&[10, 11, 12]);
        let before = encoding.clone();
        assert_eq!(encoding.shrink_to(3), Ok(()));
        assert_eq!(encoding, before);
    }

    #[test]
    fn shrink_evicts_oldest_and_relocates_spilled_codes() {
        let mut encoding = GsubEncoding::with_len(300);
        for code in 0..300 {
            encoding.encode(code, Glyph::new(1000 + code as u32));
        }
        encoding.shrink_to(256).unwrap();
        assert_eq!(encoding.len(), 256);
        assert_eq!(encoding.codes().filter(|&g| g != Glyph::NOTDEF).count(), 256);
        // Codes 1..=44 were assigned earliest, so they were evicted and
        // the 44 glyphs above the limit moved down into their slots.
        assert_eq!(encoding.glyph(0), Glyph::new(1000));
        assert_eq!(encoding.glyph(1), Glyph::new(1256));
        assert_eq!(encoding.glyph(44), Glyph::new(1299));
        assert_eq!(encoding.glyph(45), Glyph::new(1045));
        assert_eq!(encoding.glyph(255), Glyph::new(1255));
        assert_eq!(encoding.encoding(Glyph::new(1256)), Some(1));
        assert_eq!(encoding.encoding(Glyph::new(1001)), None);
    }

    #[test]
    fn shrink_refreshed_stamps_survive() {
        let mut encoding = GsubEncoding::with_len(4);
        for code in 0..4 {
            encoding.encode(code, Glyph::new(10 + code as u32));
        }
        // Reassigning makes code 1 the most recently assigned.
        encoding.encode(1, Glyph::new(11));
        encoding.shrink_to(2).unwrap();
        assert_eq!(encoding.glyph(0), Glyph::new(10));
        assert_eq!(encoding.glyph(1), Glyph::new(11));
        assert_eq!(encoding.encoding(Glyph::new(12)), None);
        assert_eq!(encoding.encoding(Glyph::new(13)), None);
    }

    #[test]
    fn shrink_overflow_reports_before_any_mutation() {
        let mut encoding = table(&[10, 11, 12, 13, 14, 15]);
        encoding.ligatures.push(LigatureRecord {
            input: vec![1, 2, 3, 4],
            out: 5,
            skip: true,
        });
        let before = encoding.clone();
        assert_eq!(
            encoding.shrink_to(4),
            Err(EncodeError::Overflow {
                needed: 6,
                limit: 4,
            })
        );
        assert_eq!(encoding, before);
    }

    #[test]
    fn shrink_rewrites_records_through_the_relocation() {
        let mut encoding = GsubEncoding::with_len(6);
        encoding.encode(0, Glyph::new(10));
        encoding.encode(1, Glyph::new(30));
        encoding.encode(4, Glyph::new(11));
        encoding.encode(5, Glyph::new(12));
        encoding.ligatures.push(LigatureRecord {
            input: vec![4, 5],
            out: 1,
            skip: true,
        });
        encoding.shrink_to(4).unwrap();
        assert_eq!(encoding.len(), 4);
        assert_eq!(encoding.glyph(2), Glyph::new(11));
        assert_eq!(encoding.glyph(3), Glyph::new(12));
        assert_eq!(
            encoding.ligatures(),
            [LigatureRecord {
                input: vec![2, 3],
                out: 1,
                skip: true,
            }]
        );
    }

    #[test]
    fn shrink_drops_records_of_unbound_codes() {
        let mut encoding = GsubEncoding::with_len(5);
        encoding.encode(0, Glyph::new(10));
        encoding.encode(1, Glyph::new(11));
        // Code 2 is never bound, so the record cannot survive.
        encoding.ligatures.push(LigatureRecord {
            input: vec![0, 1],
            out: 2,
            skip: true,
        });
        encoding.shrink_to(4).unwrap();
        assert!(encoding.ligatures().is_empty());
    }

    #[test]
    fn ligature_record_carries_its_codes() {
        let mut encoding = GsubEncoding::with_len(128);
        encoding.encode(65, Glyph::new(10));
        encoding.encode(66, Glyph::new(11));
        assert!(encoding.apply(&ligature(&[10, 11], 30)));
        let out = encoding.encoding(Glyph::new(30)).unwrap();
        assert_eq!(
            encoding.ligatures(),
            [LigatureRecord {
                input: vec![65, 66],
                out,
                skip: true,
            }]
        );
    }
}
