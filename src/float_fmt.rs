//! Pixel formatting for inline style values.
//!
//! Float `Display` has panicked on wasm in some toolchain/browser combinations
//! (`dragon.rs`). These helpers scale and round into an `i64`, then format
//! integers only.

/// Up to two decimals, trailing zeros dropped, suffixed with `px`.
///
/// Non-finite input renders as `0px` so a bad measurement never produces an
/// invalid style value.
pub fn fmt_px(v: f64) -> String {
    if !v.is_finite() {
        return "0px".to_string();
    }
    let mut s = fmt_f64_fixed(v, 2);
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s.push_str("px");
    s
}

pub fn fmt_f64_fixed(v: f64, decimals: usize) -> String {
    if !v.is_finite() {
        return if v.is_nan() {
            "NaN".to_string()
        } else if v.is_sign_positive() {
            "Inf".to_string()
        } else {
            "-Inf".to_string()
        };
    }

    let decimals = decimals.min(9);
    let scale_i64 = 10_i64.checked_pow(decimals as u32).unwrap_or(1_i64);
    let scale_f = scale_i64 as f64;

    let scaled = (v * scale_f).round();
    if !scaled.is_finite() || scaled.abs() > (i64::MAX as f64) {
        return if v.is_sign_negative() {
            "-Inf".to_string()
        } else {
            "Inf".to_string()
        };
    }

    let scaled_i = scaled as i64;
    let negative = scaled_i < 0;
    let abs_i = scaled_i.abs();
    let int_part = abs_i / scale_i64;
    let frac_part = abs_i % scale_i64;

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&int_part.to_string());

    if decimals > 0 {
        out.push('.');
        let frac_str = frac_part.to_string();
        for _ in 0..decimals.saturating_sub(frac_str.len()) {
            out.push('0');
        }
        out.push_str(&frac_str);
    }

    out
}
