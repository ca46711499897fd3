//! Charset definition file loader (§6, §1.2).
//!
//! Parses the line-oriented directive language described in §6
//! (`SB94`/`SB96`/`MB94`/`MB96`/`load`/`map`/`map_range`/`undef`/`define`/
//! `include`/`autoload`/`savebin`/`loadbin`) and applies it to a
//! [`CharsetRegistry`]. The on-disk binary table format itself (the
//! `.bin`/`.def` files `loadbin`/`savebin` and `include`/`autoload` refer
//! to) is out of scope (§1): callers needing those resolve them through
//! [`CharsetTableSource`] and feed the resulting code points back in via
//! [`CharsetRegistry::set_override`].
//!
//! Grounded on `examples/original_source/src/iso2022.cpp`'s directive
//! parser (`ku`/`ten` position syntax) and, for the parse-error shape, on
//! `examples/geldata-vtio/crates/vtansi/src/parse.rs`'s `ParseError`.

use crate::registry::{Arity, CharsetId, CharsetRegistry};

/// A charset-definition file resolved outside this crate (§6: "character
/// set database file format" is an out-of-scope collaborator). Implementors
/// provide the bytes of an `include`d/`autoload`ed file or a `loadbin` table.
pub trait CharsetTableSource {
    fn read_text(&self, path: &str) -> Option<String>;
}

/// One line of a charset definition file, after tokenizing but before being
/// applied to a registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    DefineSingleByte { arity94: bool, final_byte: u8, id_name: String },
    DefineMultiByte { arity94: bool, n: u8, intermediates: Vec<u8>, final_byte: u8, id_name: String },
    Load { spec: String },
    Map { ku: u32, ten: u32, values: Vec<Option<char>> },
    MapRange { ku_lo: u32, ku_hi: u32, ten_lo: u32, ten_hi: u32, base: u32 },
    Undef { ku: u32, ten: u32 },
    Define { ku: u32, ten: u32, values: Vec<char> },
    Include { path: String },
    Autoload { path: String },
    Savebin { name: String },
    Loadbin { name: String },
}

/// A charset-definition parse error, with file/line/column location so the
/// caller can continue past it (§7: "log the offending file/line/column,
/// continue to next line").
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("{file}:{line}:{column}: {message}")]
pub struct CharsetDefError {
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub message: String,
}

fn parse_codepoint(tok: &str) -> Option<Option<char>> {
    if tok == "<undef>" {
        return Some(None);
    }
    let hex = tok.strip_prefix("U+")?;
    u32::from_str_radix(hex, 16).ok().and_then(char::from_u32).map(Some)
}

fn parse_ku_ten(tok: &str) -> Option<(u32, u32)> {
    let (ku, ten) = tok.split_once(',')?;
    Some((ku.trim().parse().ok()?, ten.trim().parse().ok()?))
}

/// Parse one directive line (already stripped of a trailing comment and
/// whitespace). Returns `Ok(None)` for a blank line.
pub fn parse_line(file: &str, line_no: usize, line: &str) -> Result<Option<Directive>, CharsetDefError> {
    let line = line.split('#').next().unwrap_or("").trim();
    if line.is_empty() {
        return Ok(None);
    }
    let err = |column: usize, message: String| CharsetDefError {
        file: file.to_string(),
        line: line_no,
        column,
        message,
    };
    let mut toks = line.split_whitespace();
    let kw = toks.next().unwrap();
    let rest: Vec<&str> = toks.collect();

    let parse_sb = |arity94: bool, rest: &[&str]| -> Result<Directive, CharsetDefError> {
        let (finalb, name) = rest.split_first().ok_or_else(|| err(1, "expected final-byte and name".into()))?;
        let finalb = finalb
            .strip_prefix('(')
            .and_then(|s| s.strip_suffix(')'))
            .ok_or_else(|| err(1, format!("expected (F), got {finalb}")))?;
        let final_byte = *finalb.as_bytes().first().ok_or_else(|| err(1, "empty final byte".into()))?;
        Ok(Directive::DefineSingleByte { arity94, final_byte, id_name: name.join(" ") })
    };

    match kw {
        "SB94" => parse_sb(true, &rest).map(Some),
        "SB96" => parse_sb(false, &rest).map(Some),
        "MB94" | "MB96" => {
            let (spec, name) = rest.split_first().ok_or_else(|| err(1, "expected spec and name".into()))?;
            let inner = spec
                .strip_prefix('(')
                .and_then(|s| s.strip_suffix(')'))
                .ok_or_else(|| err(1, format!("expected (N,I...F), got {spec}")))?;
            let parts: Vec<&str> = inner.split(',').collect();
            let n: u8 = parts
                .first()
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| err(1, "expected byte count".into()))?;
            let bytes: Vec<u8> = parts[1..].iter().filter_map(|s| s.bytes().next()).collect();
            let (intermediates, final_byte) = bytes.split_at(bytes.len().saturating_sub(1));
            let final_byte = *final_byte.first().ok_or_else(|| err(1, "missing final byte".into()))?;
            Ok(Some(Directive::DefineMultiByte {
                arity94: kw == "MB94",
                n,
                intermediates: intermediates.to_vec(),
                final_byte,
                id_name: name.join(" "),
            }))
        }
        "load" => Ok(Some(Directive::Load { spec: rest.join(" ") })),
        "map" => {
            let (pos, values) = rest.split_first().ok_or_else(|| err(1, "expected ku,ten".into()))?;
            let (ku, ten) = parse_ku_ten(pos).ok_or_else(|| err(1, format!("bad ku,ten: {pos}")))?;
            let values = values
                .iter()
                .map(|v| parse_codepoint(v).ok_or_else(|| err(1, format!("bad code point: {v}"))))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Some(Directive::Map { ku, ten, values }))
        }
        "map_range" => {
            let [ku_range, ten_range, base] = rest[..].try_into().map_err(|_| err(1, "expected ku-range ten-range base".into()))?;
            let (ku_lo, ku_hi) = ku_range.split_once('-').and_then(|(a, b)| Some((a.parse().ok()?, b.parse().ok()?))).ok_or_else(|| err(1, "bad ku range".into()))?;
            let (ten_lo, ten_hi) = ten_range.split_once('-').and_then(|(a, b)| Some((a.parse().ok()?, b.parse().ok()?))).ok_or_else(|| err(1, "bad ten range".into()))?;
            let base: u32 = base.trim_start_matches("U+").parse().map_err(|_| err(1, "bad base".into()))?;
            Ok(Some(Directive::MapRange { ku_lo, ku_hi, ten_lo, ten_hi, base }))
        }
        "undef" => {
            let pos = rest.first().ok_or_else(|| err(1, "expected ku,ten".into()))?;
            let (ku, ten) = parse_ku_ten(pos).ok_or_else(|| err(1, format!("bad ku,ten: {pos}")))?;
            Ok(Some(Directive::Undef { ku, ten }))
        }
        "define" => {
            let (pos, values) = rest.split_first().ok_or_else(|| err(1, "expected ku,ten".into()))?;
            let (ku, ten) = parse_ku_ten(pos).ok_or_else(|| err(1, format!("bad ku,ten: {pos}")))?;
            let values = values
                .iter()
                .map(|v| parse_codepoint(v).and_then(|o| o).ok_or_else(|| err(1, format!("bad code point: {v}"))))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Some(Directive::Define { ku, ten, values }))
        }
        "include" => Ok(Some(Directive::Include { path: rest.join(" ") })),
        "autoload" => Ok(Some(Directive::Autoload { path: rest.join(" ") })),
        "savebin" => Ok(Some(Directive::Savebin { name: rest.join(" ") })),
        "loadbin" => Ok(Some(Directive::Loadbin { name: rest.join(" ") })),
        other => Err(err(1, format!("unknown directive: {other}"))),
    }
}

/// Parse an entire definition file's text, collecting directives and
/// continuing past per-line errors (§7).
pub fn parse_all(file: &str, text: &str) -> (Vec<Directive>, Vec<CharsetDefError>) {
    let mut directives = Vec::new();
    let mut errors = Vec::new();
    for (i, line) in text.lines().enumerate() {
        match parse_line(file, i + 1, line) {
            Ok(Some(d)) => directives.push(d),
            Ok(None) => {}
            Err(e) => {
                tracing::debug!(%e, "charset definition parse error");
                errors.push(e);
            }
        }
    }
    (directives, errors)
}

/// Apply directives to a registry. `ku`/`ten` pairs are 1-based GL positions
/// (as in the original `ku-ten` notation); they are converted to a 0-based
/// index before being handed to [`CharsetRegistry::set_override`].
pub fn apply(reg: &mut CharsetRegistry, directives: &[Directive]) {
    let mut last_sb: Option<CharsetId> = None;
    let mut last_mb: Option<CharsetId> = None;
    for d in directives {
        match d {
            Directive::DefineSingleByte { arity94, final_byte, id_name } => {
                let id = reg.define_charset(id_name, if *arity94 { Arity::Sb94 } else { Arity::Sb96 });
                reg.bind_designator(&[b'('], *final_byte, id);
                last_sb = Some(id);
            }
            Directive::DefineMultiByte { arity94, n, intermediates, final_byte, id_name } => {
                let id = reg.define_charset(id_name, if *arity94 { Arity::Mb94(*n) } else { Arity::Mb96(*n) });
                reg.bind_designator(intermediates, *final_byte, id);
                last_mb = Some(id);
            }
            Directive::Map { ku, ten, values } => {
                if let Some(id) = last_mb.or(last_sb) {
                    let index = (ku - 1) * 94 + (ten - 1);
                    reg.set_override(id, index, values.first().copied().flatten());
                }
            }
            Directive::Define { ku, ten, values } => {
                if let Some(id) = last_mb.or(last_sb) {
                    let index = (ku - 1) * 94 + (ten - 1);
                    reg.set_override(id, index, values.first().copied());
                }
            }
            Directive::MapRange { ku_lo, ku_hi, ten_lo, ten_hi, base } => {
                if let Some(id) = last_mb.or(last_sb) {
                    let mut offset = 0;
                    for ku in *ku_lo..=*ku_hi {
                        for ten in *ten_lo..=*ten_hi {
                            let index = (ku - 1) * 94 + (ten - 1);
                            if let Some(c) = char::from_u32(base + offset) {
                                reg.set_override(id, index, Some(c));
                            }
                            offset += 1;
                        }
                    }
                }
            }
            Directive::Undef { ku, ten } => {
                if let Some(id) = last_mb.or(last_sb) {
                    let index = (ku - 1) * 94 + (ten - 1);
                    reg.set_override(id, index, None);
                }
            }
            // `load`/`include`/`autoload`/`savebin`/`loadbin` resolve
            // external resources (§6) and are no-ops on the in-memory
            // registry beyond what a `CharsetTableSource`-driven caller
            // feeds back in via further directives.
            Directive::Load { .. }
            | Directive::Include { .. }
            | Directive::Autoload { .. }
            | Directive::Savebin { .. }
            | Directive::Loadbin { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_byte_and_map() {
        let text = "SB94(I) jis_kana\nmap 1,1 U+FF61\n";
        let (dirs, errs) = parse_all("test.chardef", text);
        assert!(errs.is_empty());
        assert_eq!(dirs.len(), 2);
        let mut reg = CharsetRegistry::new();
        apply(&mut reg, &dirs);
        let id = reg.resolve_designator(&[b'('], b'I').unwrap();
        assert_eq!(reg.lookup(id, 0), boardterm_model::Character::from('\u{FF61}'));
    }

    #[test]
    fn unknown_directive_reports_location_and_continues() {
        let text = "bogus line\nSB94(B) foo\n";
        let (dirs, errs) = parse_all("test.chardef", text);
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].line, 1);
        assert_eq!(dirs.len(), 1);
    }
}
