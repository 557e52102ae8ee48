// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `CGINCLUDE` block spliced into a baked shader.
//!
//! ```text
//! CGINCLUDE
//!     #define BOXCLIP_CONFIGURED 1
//!     #define BOXCLIP_SCALE <scale>
//!     #define BOXCLIP_ALLOW_IN_FRONT <allow>
//!
//!     #define boxQuad_<Cat>_Count <n>
//!     #define DECLARE_BOXCLIP_<Cat>_ARRAY static internalBoxQuad boxQuad_<Cat>_Quads[max(n,1)] = {\
//!         {float4(..),float4(..),float4(..),float4(..)},\
//!         ...
//! };
//!
//! ENDCG
//! ```
//!
//! An empty category still declares one all-zero quad so the array is never
//! zero-sized.

use boxclip_core::{write_float, write_float4};
use boxclip_geometry::{Category, CategoryQuads, CategorySet, ClipQuad};

/// Opens the block; inserted immediately after the body brace
pub const PREAMBLE_OPEN: &str = "\nCGINCLUDE\n";
/// Closes the block
pub const PREAMBLE_CLOSE: &str = "\nENDCG\n";

/// Append the full preamble block to `out`
pub fn write_preamble(out: &mut String, scale: f32, allow_in_front: f32, categories: &CategorySet) {
    out.push_str(PREAMBLE_OPEN);
    out.push_str("    #define BOXCLIP_CONFIGURED 1\n");
    out.push_str("    #define BOXCLIP_SCALE ");
    write_float(out, scale);
    out.push_str("\n    #define BOXCLIP_ALLOW_IN_FRONT ");
    write_float(out, allow_in_front);
    out.push_str("\n\n");

    for (category, quads) in categories.iter() {
        write_category(out, category, quads);
    }

    out.push_str(PREAMBLE_CLOSE);
}

fn write_category(out: &mut String, category: Category, quads: &CategoryQuads) {
    let count = quads.len();
    out.push_str(&format!(
        "    #define boxQuad_{cat}_Count {count}\n    \
         #define DECLARE_BOXCLIP_{cat}_ARRAY static internalBoxQuad boxQuad_{cat}_Quads[{len}] = {{\\\n",
        cat = category,
        count = count,
        len = count.max(1),
    ));

    let padding = [ClipQuad::zeroed()];
    let rows = if quads.is_empty() {
        &padding[..]
    } else {
        quads.as_slice()
    };
    for (i, quad) in rows.iter().enumerate() {
        out.push_str("        {");
        for (c, channel) in quad.channels().iter().enumerate() {
            if c > 0 {
                out.push(',');
            }
            write_float4(out, *channel);
        }
        out.push('}');
        if i + 1 < rows.len() {
            out.push(',');
        }
        out.push_str("\\\n");
    }
    out.push_str("};\n\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use boxclip_geometry::Vector4;

    #[test]
    fn empty_categories_declare_one_zero_quad() {
        let mut out = String::new();
        write_preamble(&mut out, 1.0, 0.0, &CategorySet::new());

        assert!(out.starts_with(PREAMBLE_OPEN));
        assert!(out.ends_with(PREAMBLE_CLOSE));
        assert!(out.contains("    #define BOXCLIP_CONFIGURED 1\n"));
        for category in Category::ALL {
            assert!(out.contains(&format!("#define boxQuad_{}_Count 0\n", category)));
            assert!(out.contains(&format!("boxQuad_{}_Quads[1] = {{\\\n", category)));
        }
        assert_eq!(out.matches("};\n\n").count(), Category::COUNT);
        // Only the close marker may contain ENDCG
        assert_eq!(out.matches("ENDCG").count(), 1);
    }

    #[test]
    fn quads_are_comma_separated() {
        let mut set = CategorySet::new();
        let quad = ClipQuad {
            position: Vector4::new(1.5, -2.0, 0.25, 1.0),
            normal: Vector4::new(0.0, 0.0, 1.0, f32::NAN),
            ..ClipQuad::zeroed()
        };
        set.get_mut(Category::HideVolume).push(quad);
        set.get_mut(Category::HideVolume).push(quad);

        let mut out = String::new();
        write_preamble(&mut out, 2.0, 0.5, &set);

        assert!(out.contains("#define boxQuad_HideVolume_Count 2\n"));
        assert!(out.contains("boxQuad_HideVolume_Quads[2]"));
        let rows: Vec<&str> = out
            .lines()
            .filter(|l| l.starts_with("        {float4(1.5,-2"))
            .collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].ends_with("},\\"));
        assert!(rows[1].ends_with("}\\"));
        // Non-finite packed depth is written as 0
        assert!(rows[0].contains(",0)"));
        assert!(!out.contains("NaN"));
    }
}
