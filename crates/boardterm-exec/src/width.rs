//! Display-width computation (§4.3 "computed via an external char-width
//! function"). A minimal East-Asian-width approximation; hosts needing
//! exact Unicode width tables supply their own via
//! [`ExecutorConfig::char_width`](crate::executor::ExecutorConfig).

#[must_use]
pub fn default_char_width(c: char) -> u8 {
    let u = c as u32;
    if u == 0 {
        return 0;
    }
    let wide = matches!(u,
        0x1100..=0x115F
        | 0x2E80..=0xA4CF
        | 0xAC00..=0xD7A3
        | 0xF900..=0xFAFF
        | 0xFF00..=0xFF60
        | 0xFFE0..=0xFFE6
        | 0x20000..=0x3FFFD
    );
    if wide {
        2
    } else {
        1
    }
}
