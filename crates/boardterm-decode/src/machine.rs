//! The decoder's Mealy state machine (§4.1).
//!
//! Grounded on `examples/geldata-vtio/crates/vtio/src/parser/output.rs`'s
//! `TerminalOutputParser` (buffering raw input across `feed` calls and
//! dispatching into typed events) and on
//! `examples/geldata-vtio/crates/vtparser/src/registry.rs`'s
//! `EscapeSequenceIntroducer` for the CSI/OSC/DCS/PM/APC/SS2/SS3 final-byte
//! table.

use smallvec::SmallVec;

use boardterm_charset::CharsetRegistry;

use crate::config::DecoderConfig;
use crate::event::{CharStringKind, CmdStringKind, ControlEvent, CsiParam};
use crate::iso2022::Iso2022State;

const ESC: u32 = 0x1B;
const BEL: u32 = 0x07;
const ST_FINAL: u8 = b'\\';

#[derive(Debug, Clone)]
enum State {
    Default,
    Esc { intermediates: SmallVec<[u8; 2]> },
    Csi { params: String, intermediates: SmallVec<[u8; 2]>, private_marker: Option<u8> },
    CmdString { kind: CmdStringKind, payload: String, seen_esc: bool },
    CharString { kind: CharStringKind, payload: String, seen_esc: bool },
    /// Accumulating `n` bytes of a 94^n/96^n multi-byte ISO-2022 charset.
    IsoAccum { slot: usize, collected: SmallVec<[u32; 4]>, needed: u8, is_gr: bool },
}

/// The sequence decoder (C4): turns a stream of input units (bytes, or
/// code points already resolved to their raw numeric value) into
/// [`ControlEvent`]s.
pub struct Decoder {
    config: DecoderConfig,
    state: State,
    iso2022: Iso2022State,
    invalid_buf: Vec<u8>,
}

impl Decoder {
    #[must_use]
    pub fn new(config: DecoderConfig) -> Self {
        Decoder { config, state: State::Default, iso2022: Iso2022State::default(), invalid_buf: Vec::new() }
    }

    #[must_use]
    pub const fn iso2022(&self) -> &Iso2022State {
        &self.iso2022
    }

    pub fn iso2022_mut(&mut self) -> &mut Iso2022State {
        &mut self.iso2022
    }

    /// Feed one input unit, returning any events it completes. Most units
    /// complete zero or one event; a grammar violation can complete an
    /// `Invalid` and then redecode the same unit from `DEFAULT`, yielding
    /// up to two.
    pub fn feed(&mut self, registry: &CharsetRegistry, unit: u32) -> SmallVec<[ControlEvent; 2]> {
        let mut out = SmallVec::new();
        self.feed_into(registry, unit, &mut out);
        out
    }

    /// Feed a run of plain graphic units, batching them into a single
    /// `PlainRun` event when the trivial ISO-2022 fast path applies and no
    /// non-plain unit is encountered (§4.1 "Batching").
    pub fn feed_run(&mut self, registry: &CharsetRegistry, units: &[u32]) -> SmallVec<[ControlEvent; 4]> {
        let mut out = SmallVec::new();
        if matches!(self.state, State::Default) && self.iso2022.is_trivial() {
            let mut run: SmallVec<[boardterm_model::Character; 16]> = SmallVec::new();
            for &u in units {
                if is_plain_ascii_graphic(u) {
                    run.push(boardterm_model::Character::from_scalar(u));
                } else {
                    if !run.is_empty() {
                        out.push(ControlEvent::PlainRun(std::mem::take(&mut run)));
                    }
                    self.feed_into(registry, u, &mut out);
                }
            }
            if !run.is_empty() {
                out.push(ControlEvent::PlainRun(run));
            }
            return out;
        }
        for &u in units {
            self.feed_into(registry, u, &mut out);
        }
        out
    }

    fn feed_into(&mut self, registry: &CharsetRegistry, unit: u32, out: &mut SmallVec<[ControlEvent; 2]>) {
        match std::mem::replace(&mut self.state, State::Default) {
            State::Default => self.feed_default(registry, unit, out),
            State::Esc { intermediates } => self.feed_esc(registry, unit, intermediates, out),
            State::Csi { params, intermediates, private_marker } => self.feed_csi(unit, params, intermediates, private_marker, out),
            State::CmdString { kind, payload, seen_esc } => self.feed_cmdstring(unit, kind, payload, seen_esc, out),
            State::CharString { kind, payload, seen_esc } => self.feed_charstring(unit, kind, payload, seen_esc, out),
            State::IsoAccum { slot, collected, needed, is_gr } => self.feed_iso_accum(registry, unit, slot, collected, needed, is_gr, out),
        }
    }

    fn invalidate(&mut self, out: &mut SmallVec<[ControlEvent; 2]>, unit: u32) {
        let buf = std::mem::take(&mut self.invalid_buf);
        out.push(ControlEvent::Invalid(buf));
        self.state = State::Default;
        // Redecode the offending unit from DEFAULT.
        self.feed_default(&CharsetRegistry::new(), unit, out);
    }

    fn feed_default(&mut self, registry: &CharsetRegistry, unit: u32, out: &mut SmallVec<[ControlEvent; 2]>) {
        if unit == 0x00 || unit == 0x7F {
            return;
        }
        if unit == ESC {
            self.invalid_buf = vec![ESC as u8];
            self.state = State::Esc { intermediates: SmallVec::new() };
            return;
        }
        if (0x80..=0x9F).contains(&unit) && self.config.c1_8bit_representation_enabled {
            let final_byte = (unit - 0x80 + 0x40) as u8;
            self.dispatch_esc_final(registry, SmallVec::new(), final_byte, out);
            return;
        }
        if unit < 0x20 {
            match unit {
                0x0E => self.iso2022.shift_out(),
                0x0F => self.iso2022.shift_in(),
                _ => {}
            }
            out.push(ControlEvent::C0(unit as u8));
            return;
        }
        self.feed_graphic(registry, unit, out);
    }

    fn feed_graphic(&mut self, registry: &CharsetRegistry, unit: u32, out: &mut SmallVec<[ControlEvent; 2]>) {
        if self.iso2022.is_trivial() && is_plain_ascii_graphic(unit) {
            out.push(ControlEvent::PlainChar(boardterm_model::Character::from_scalar(unit)));
            return;
        }
        if !(0x20..=0x7F).contains(&unit) && !(0xA0..=0xFF).contains(&unit) {
            out.push(ControlEvent::PlainChar(boardterm_model::Character::from_scalar(unit)));
            return;
        }
        let is_gr = unit >= 0xA0;
        let slot = if self.iso2022.single_shift.is_some() {
            self.iso2022.single_shift.unwrap()
        } else if is_gr {
            self.iso2022.gr
        } else {
            self.iso2022.gl
        };
        let id = self.iso2022.g[slot];
        let arity = registry.arity(id);
        let n = arity.map_or(1, |a| a.bytes_per_char());
        if n <= 1 {
            if let Some(c) = self.iso2022.resolve_byte(registry, unit) {
                out.push(ControlEvent::PlainChar(c));
            }
            return;
        }
        // 94-set SP/DEL handling and out-of-range bytes flush U+FFFD (§4.1).
        let base_lo = if is_gr { 0xA0 } else { 0x21 };
        let base_hi = if is_gr { 0xFE } else { 0x7E };
        if !(base_lo..=base_hi).contains(&unit) {
            out.push(ControlEvent::PlainChar(boardterm_model::Character::from_scalar(0xFFFD)));
            return;
        }
        self.iso2022.single_shift.take();
        self.state = State::IsoAccum { slot, collected: smallvec::smallvec![unit], needed: n, is_gr };
    }

    #[allow(clippy::too_many_arguments)]
    fn feed_iso_accum(&mut self, registry: &CharsetRegistry, unit: u32, slot: usize, mut collected: SmallVec<[u32; 4]>, needed: u8, is_gr: bool, out: &mut SmallVec<[ControlEvent; 2]>) {
        let base_lo = if is_gr { 0xA0 } else { 0x21 };
        let base_hi = if is_gr { 0xFE } else { 0x7E };
        if !(base_lo..=base_hi).contains(&unit) {
            out.push(ControlEvent::PlainChar(boardterm_model::Character::from_scalar(0xFFFD)));
            self.feed_default(registry, unit, out);
            return;
        }
        collected.push(unit);
        if collected.len() < needed as usize {
            self.state = State::IsoAccum { slot, collected, needed, is_gr };
            return;
        }
        let base = if is_gr { 96u32 } else { 94u32 };
        let floor = if is_gr { 0xA0 } else { 0x21 };
        let mut index = 0u32;
        for b in &collected {
            index = index * base + (b - floor);
        }
        let id = self.iso2022.g[slot];
        out.push(ControlEvent::PlainChar(registry.lookup(id, index)));
    }

    fn feed_esc(&mut self, registry: &CharsetRegistry, unit: u32, mut intermediates: SmallVec<[u8; 2]>, out: &mut SmallVec<[ControlEvent; 2]>) {
        self.invalid_buf.push(unit as u8);
        if (0x20..=0x2F).contains(&unit) {
            intermediates.push(unit as u8);
            self.state = State::Esc { intermediates };
            return;
        }
        if (0x30..=0x7E).contains(&unit) {
            self.dispatch_esc_final(registry, intermediates, unit as u8, out);
            return;
        }
        // end of stream / invalid byte mid-ESC.
        self.invalidate(out, unit);
    }

    fn dispatch_esc_final(&mut self, registry: &CharsetRegistry, intermediates: SmallVec<[u8; 2]>, final_byte: u8, out: &mut SmallVec<[ControlEvent; 2]>) {
        if intermediates.is_empty() {
            match final_byte {
                b'[' => {
                    self.state = State::Csi { params: String::new(), intermediates: SmallVec::new(), private_marker: None };
                    return;
                }
                b']' => {
                    self.state = State::CmdString { kind: CmdStringKind::Osc, payload: String::new(), seen_esc: false };
                    return;
                }
                b'P' => {
                    self.state = State::CmdString { kind: CmdStringKind::Dcs, payload: String::new(), seen_esc: false };
                    return;
                }
                b'^' => {
                    self.state = State::CmdString { kind: CmdStringKind::Pm, payload: String::new(), seen_esc: false };
                    return;
                }
                b'_' => {
                    self.state = State::CmdString { kind: CmdStringKind::Apc, payload: String::new(), seen_esc: false };
                    return;
                }
                b'k' if self.config.title_definition_string_enabled => {
                    self.state = State::CmdString { kind: CmdStringKind::TitleDefinition, payload: String::new(), seen_esc: false };
                    return;
                }
                b'N' => {
                    self.iso2022.single_shift(2);
                    return;
                }
                b'O' => {
                    self.iso2022.single_shift(3);
                    return;
                }
                b'n' => {
                    self.iso2022.locking_shift(2);
                    return;
                }
                b'o' => {
                    self.iso2022.locking_shift(3);
                    return;
                }
                _ => {}
            }
        }
        if let Some(id) = designator_charset(registry, &intermediates, final_byte) {
            if let Some(slot) = designator_slot(&intermediates) {
                self.iso2022.designate(slot, id);
                return;
            }
        }
        out.push(ControlEvent::EscSeq { intermediates, final_byte });
    }

    fn feed_csi(&mut self, unit: u32, mut params: String, mut intermediates: SmallVec<[u8; 2]>, mut private_marker: Option<u8>, out: &mut SmallVec<[ControlEvent; 2]>) {
        self.invalid_buf.push(unit as u8);
        if (0x30..=0x3F).contains(&unit) && intermediates.is_empty() {
            let b = unit as u8;
            if params.is_empty() && matches!(b, b'?' | b'<' | b'=' | b'>') {
                private_marker = Some(b);
            } else {
                params.push(b as char);
            }
            self.state = State::Csi { params, intermediates, private_marker };
            return;
        }
        if (0x20..=0x2F).contains(&unit) {
            intermediates.push(unit as u8);
            self.state = State::Csi { params, intermediates, private_marker };
            return;
        }
        if (0x40..=0x7E).contains(&unit) {
            let parsed = parse_csi_params(&params);
            out.push(ControlEvent::CsiSeq {
                params: parsed,
                intermediates,
                final_byte: unit as u8,
                is_private: private_marker.is_some(),
                private_marker,
            });
            self.state = State::Default;
            return;
        }
        self.invalidate(out, unit);
    }

    fn feed_cmdstring(&mut self, unit: u32, kind: CmdStringKind, mut payload: String, seen_esc: bool, out: &mut SmallVec<[ControlEvent; 2]>) {
        let bel_ok = match kind {
            CmdStringKind::Osc => self.config.osc_terminated_by_bel,
            _ => self.config.command_string_terminated_by_bel,
        };
        if unit == BEL && bel_ok {
            out.push(ControlEvent::CmdString { kind, payload });
            self.state = State::Default;
            return;
        }
        if seen_esc {
            if unit == u32::from(ST_FINAL) {
                out.push(ControlEvent::CmdString { kind, payload });
                self.state = State::Default;
                return;
            }
            self.invalidate(out, unit);
            return;
        }
        if unit == ESC {
            self.state = State::CmdString { kind, payload, seen_esc: true };
            return;
        }
        if let Some(ok_range) = cmdstring_body_ranges(unit) {
            if ok_range {
                payload.push(char::from_u32(unit).unwrap_or('\u{FFFD}'));
                self.state = State::CmdString { kind, payload, seen_esc: false };
                return;
            }
        }
        self.invalidate(out, unit);
    }

    fn feed_charstring(&mut self, unit: u32, kind: CharStringKind, mut payload: String, seen_esc: bool, out: &mut SmallVec<[ControlEvent; 2]>) {
        if seen_esc {
            if unit == u32::from(ST_FINAL) {
                out.push(ControlEvent::CharString { kind, payload });
                self.state = State::Default;
                return;
            }
            self.invalidate(out, unit);
            return;
        }
        if unit == ESC {
            self.state = State::CharString { kind, payload, seen_esc: true };
            return;
        }
        if unit == BEL && self.config.character_string_terminated_by_bel {
            out.push(ControlEvent::CharString { kind, payload });
            self.state = State::Default;
            return;
        }
        payload.push(char::from_u32(unit).unwrap_or('\u{FFFD}'));
        self.state = State::CharString { kind, payload, seen_esc: false };
    }
}

fn cmdstring_body_ranges(unit: u32) -> Option<bool> {
    Some((0x08..=0x0D).contains(&unit) || (0x20..=0x7E).contains(&unit) || unit > 0x7E)
}

const fn is_plain_ascii_graphic(unit: u32) -> bool {
    (0x20..=0x7E).contains(&unit)
}

fn designator_slot(intermediates: &[u8]) -> Option<usize> {
    match intermediates.first()? {
        b'(' | b'-' => Some(0),
        b')' | b'.' => Some(1),
        b'*' => Some(2),
        b'+' => Some(3),
        b'$' => intermediates.get(1).and_then(|b2| designator_slot(&[*b2])),
        _ => None,
    }
}

fn designator_charset(registry: &CharsetRegistry, intermediates: &[u8], final_byte: u8) -> Option<boardterm_charset::CharsetId> {
    registry.resolve_designator(intermediates, final_byte)
}

fn parse_csi_params(raw: &str) -> SmallVec<[CsiParam; 8]> {
    let mut params: SmallVec<[CsiParam; 8]> = SmallVec::new();
    for field in raw.split(';') {
        let mut sub: CsiParam = SmallVec::new();
        for part in field.split(':') {
            if part.is_empty() {
                sub.push(None);
            } else {
                sub.push(atoi_simd::parse::<i64>(part.as_bytes()).ok());
            }
        }
        params.push(sub);
    }
    if params.is_empty() {
        params.push(SmallVec::new());
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_str(dec: &mut Decoder, reg: &CharsetRegistry, s: &str) -> Vec<ControlEvent> {
        let mut events = Vec::new();
        for c in s.chars() {
            events.extend(dec.feed(reg, c as u32));
        }
        events
    }

    #[test]
    fn plain_ascii_batches_into_run() {
        let reg = CharsetRegistry::new();
        let mut dec = Decoder::new(DecoderConfig::default());
        let units: Vec<u32> = "hello".chars().map(|c| c as u32).collect();
        let events = dec.feed_run(&reg, &units);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], ControlEvent::PlainRun(_)));
    }

    #[test]
    fn csi_cup_parses_params() {
        let reg = CharsetRegistry::new();
        let mut dec = Decoder::new(DecoderConfig::default());
        let events = feed_str(&mut dec, &reg, "\x1b[12;34H");
        assert_eq!(events.len(), 1);
        match &events[0] {
            ControlEvent::CsiSeq { params, final_byte, is_private, .. } => {
                assert_eq!(*final_byte, b'H');
                assert!(!is_private);
                assert_eq!(params[0][0], Some(12));
                assert_eq!(params[1][0], Some(34));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn private_mode_marker_detected() {
        let reg = CharsetRegistry::new();
        let mut dec = Decoder::new(DecoderConfig::default());
        let events = feed_str(&mut dec, &reg, "\x1b[?25h");
        match &events[0] {
            ControlEvent::CsiSeq { is_private, private_marker, final_byte, .. } => {
                assert!(*is_private);
                assert_eq!(*private_marker, Some(b'?'));
                assert_eq!(*final_byte, b'h');
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn osc_terminates_on_bel() {
        let reg = CharsetRegistry::new();
        let mut dec = Decoder::new(DecoderConfig::default());
        let events = feed_str(&mut dec, &reg, "\x1b]0;title\x07");
        match &events[0] {
            ControlEvent::CmdString { kind, payload } => {
                assert_eq!(*kind, CmdStringKind::Osc);
                assert_eq!(payload, "0;title");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn unterminated_esc_at_invalid_byte_emits_invalid_then_redecodes() {
        let reg = CharsetRegistry::new();
        let mut dec = Decoder::new(DecoderConfig::default());
        let events = feed_str(&mut dec, &reg, "\x1b\x01");
        assert!(matches!(events[0], ControlEvent::Invalid(_)));
        assert!(matches!(events[1], ControlEvent::C0(0x01)));
    }
}
