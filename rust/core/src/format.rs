// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Locale-independent numeric literals for generated shader source.
//!
//! Output always uses `.` as the decimal separator and the shortest
//! representation that round-trips. Non-finite values are written as `0` so
//! the generated text stays compilable.

use lexical_core::FormattedSize;

/// Format an `f32` as a shader literal
#[inline]
pub fn format_float(value: f32) -> String {
    let mut out = String::new();
    write_float(&mut out, value);
    out
}

/// Append an `f32` shader literal to `out`
pub fn write_float(out: &mut String, value: f32) {
    if !value.is_finite() {
        out.push('0');
        return;
    }
    let mut buffer = [0u8; f32::FORMATTED_SIZE_DECIMAL];
    let written = lexical_core::write(value, &mut buffer);
    // lexical only emits ASCII digits, signs, '.', 'e'
    out.push_str(&String::from_utf8_lossy(written));
}

/// Append a `float4(x,y,z,w)` constructor literal to `out`
pub fn write_float4(out: &mut String, value: [f32; 4]) {
    out.push_str("float4(");
    for (i, component) in value.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_float(out, *component);
    }
    out.push(')');
}
