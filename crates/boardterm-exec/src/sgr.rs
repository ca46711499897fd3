//! SGR (`CSI … m`) subroutine (§4.3).
//!
//! Grounded on `examples/original_source/src/ansi/term.cpp`'s SGR walker
//! (ISO 8613-6 colon sub-parameter colour specs) and on the ideogram/
//! RLogin distinctness resolved in §9.

use boardterm_decode::CsiParam;
use boardterm_model::attribute::{Blink, CellToggles, FrameCircle, Ideogram, Shape, SuperSub, Underline, Weight};
use boardterm_model::{Attribute, Color};

fn sub(p: &CsiParam, i: usize) -> Option<i64> {
    p.get(i).copied().flatten()
}

fn take_color(params: &[CsiParam], i: usize) -> (Color, usize) {
    let first = &params[i];
    // Colon sub-parameter form, e.g. `38:5:idx` or `38:2:R:G:B`.
    if first.len() > 1 {
        return match sub(first, 1) {
            Some(5) => (Color::indexed(sub(first, 2).unwrap_or(0) as u8), 1),
            Some(2) => {
                let (r, g, b) = if first.len() >= 6 {
                    (sub(first, 3).unwrap_or(0), sub(first, 4).unwrap_or(0), sub(first, 5).unwrap_or(0))
                } else {
                    (sub(first, 2).unwrap_or(0), sub(first, 3).unwrap_or(0), sub(first, 4).unwrap_or(0))
                };
                (Color::rgb(r as u8, g as u8, b as u8), 1)
            }
            Some(1) => (Color::transparent(), 1),
            _ => (Color::DEFAULT, 1),
        };
    }
    // Semicolon-separated form: `38;5;idx` or `38;2;R;G;B`.
    match params.get(i + 1).and_then(|p| sub(p, 0)) {
        Some(5) => {
            let idx = params.get(i + 2).and_then(|p| sub(p, 0)).unwrap_or(0);
            (Color::indexed(idx as u8), 3)
        }
        Some(2) => {
            let r = params.get(i + 2).and_then(|p| sub(p, 0)).unwrap_or(0);
            let g = params.get(i + 3).and_then(|p| sub(p, 0)).unwrap_or(0);
            let b = params.get(i + 4).and_then(|p| sub(p, 0)).unwrap_or(0);
            (Color::rgb(r as u8, g as u8, b as u8), 5)
        }
        _ => (Color::DEFAULT, 1),
    }
}

/// Apply one complete `CSI … m` parameter list to `attr` in place.
pub fn apply_sgr(attr: &mut Attribute, params: &[CsiParam]) {
    if params.is_empty() {
        *attr = Attribute::DEFAULT;
        return;
    }
    let mut i = 0usize;
    while i < params.len() {
        let n = sub(&params[i], 0).unwrap_or(0);
        match n {
            0 => *attr = Attribute::DEFAULT,
            1 => attr.aflags.weight = Weight::Bold,
            2 => attr.aflags.weight = Weight::Faint,
            3 => attr.aflags.shape = Shape::Italic,
            4 => attr.aflags.underline = Underline::Single,
            5 => attr.aflags.blink = Blink::Slow,
            6 => attr.aflags.blink = Blink::Rapid,
            7 => attr.aflags.toggles.insert(CellToggles::INVERSE),
            8 => attr.aflags.toggles.insert(CellToggles::INVISIBLE),
            9 => attr.aflags.toggles.insert(CellToggles::STRIKE),
            20 => attr.aflags.shape = Shape::Fraktur,
            21 => attr.aflags.underline = Underline::Double,
            22 => attr.aflags.weight = Weight::Normal,
            23 => attr.aflags.shape = Shape::Normal,
            24 => attr.aflags.underline = Underline::None,
            25 => attr.aflags.blink = Blink::None,
            27 => attr.aflags.toggles.remove(CellToggles::INVERSE),
            28 => attr.aflags.toggles.remove(CellToggles::INVISIBLE),
            29 => attr.aflags.toggles.remove(CellToggles::STRIKE),
            30..=37 => attr.fg = Color::indexed((n - 30) as u8),
            38 => {
                let (c, consumed) = take_color(params, i);
                attr.fg = c;
                i += consumed;
                continue;
            }
            39 => attr.fg = Color::DEFAULT,
            40..=47 => attr.bg = Color::indexed((n - 40) as u8),
            48 => {
                let (c, consumed) = take_color(params, i);
                attr.bg = c;
                i += consumed;
                continue;
            }
            49 => attr.bg = Color::DEFAULT,
            53 => attr.aflags.toggles.insert(CellToggles::OVERLINE),
            55 => attr.aflags.toggles.remove(CellToggles::OVERLINE),
            58 => {
                let (c, consumed) = take_color(params, i);
                attr.dc = c;
                i += consumed;
                continue;
            }
            59 => attr.dc = Color::DEFAULT,
            60..=65 => {
                attr.xflags.ideogram = ideogram_from_ecma(n);
                attr.xflags.ideogram_rlogin_form = false;
            }
            73 => attr.aflags.super_sub = SuperSub::Super,
            74 => attr.aflags.super_sub = SuperSub::Sub,
            75 => attr.aflags.super_sub = SuperSub::None,
            90..=97 => attr.fg = Color::indexed((n - 90 + 8) as u8),
            100..=107 => attr.bg = Color::indexed((n - 100 + 8) as u8),
            8450..=8455 => {
                attr.xflags.ideogram = ideogram_from_ecma(60 + (n - 8450));
                attr.xflags.ideogram_rlogin_form = true;
            }
            8460..=8465 => {
                attr.xflags.ideogram = ideogram_from_ecma(60 + (n - 8460));
                attr.xflags.ideogram_rlogin_form = true;
            }
            _ => tracing::debug!(param = n, "unrecognized SGR parameter"),
        }
        i += 1;
    }
}

fn ideogram_from_ecma(n: i64) -> Ideogram {
    match n {
        60 => Ideogram::UnderlineOrRightLine,
        61 => Ideogram::DoubleUnderlineOrDoubleRightLine,
        62 => Ideogram::OverlineOrLeftLine,
        63 => Ideogram::DoubleOverlineOrDoubleLeftLine,
        64 => Ideogram::StressMarking,
        _ => Ideogram::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    fn p(n: i64) -> CsiParam {
        smallvec![Some(n)]
    }

    #[test]
    fn reset_clears_attribute() {
        let mut attr = Attribute::DEFAULT;
        attr.aflags.weight = Weight::Bold;
        apply_sgr(&mut attr, &[p(0)]);
        assert!(attr.is_default());
    }

    #[test]
    fn bold_and_indexed_fg() {
        let mut attr = Attribute::DEFAULT;
        apply_sgr(&mut attr, &[p(1), p(32)]);
        assert_eq!(attr.aflags.weight, Weight::Bold);
        assert_eq!(attr.fg, Color::indexed(2));
    }

    #[test]
    fn truecolor_semicolon_form() {
        let mut attr = Attribute::DEFAULT;
        apply_sgr(&mut attr, &[p(38), p(2), p(10), p(20), p(30)]);
        assert_eq!(attr.fg, Color::rgb(10, 20, 30));
    }

    #[test]
    fn ideogram_and_rlogin_are_distinct() {
        let mut a = Attribute::DEFAULT;
        apply_sgr(&mut a, &[p(60)]);
        assert!(!a.xflags.ideogram_rlogin_form);
        let mut b = Attribute::DEFAULT;
        apply_sgr(&mut b, &[p(8460)]);
        assert!(b.xflags.ideogram_rlogin_form);
        assert_eq!(a.xflags.ideogram, b.xflags.ideogram);
    }
}
