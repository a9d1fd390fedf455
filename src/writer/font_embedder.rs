//! Font objects for the exported document.
//!
//! Embedded programs are written as Type0 fonts with an Identity-H encoding:
//!
//! ```text
//! Type0 ─┬─ DescendantFonts ─ CIDFontType2 / CIDFontType0 ─ FontDescriptor ─ FontFile2 / FontFile3
//!        └─ ToUnicode (CMap stream)
//! ```
//!
//! The standard font is a simple Type1 Helvetica with WinAnsi encoding.

use crate::fonts::{EmbeddedFont, STANDARD_FONT};
use crate::object::{Object, ObjectRef};

use super::pdf_writer::PdfWriter;

/// Add the standard font dictionary; returns its reference.
pub fn write_standard_font(writer: &mut PdfWriter) -> ObjectRef {
    writer.add_object(Object::dict(vec![
        ("Type", Object::name("Font")),
        ("Subtype", Object::name("Type1")),
        ("BaseFont", Object::name(STANDARD_FONT)),
        ("Encoding", Object::name("WinAnsiEncoding")),
    ]))
}

/// Add every object of an embedded Type0 font; returns the Type0 reference.
pub fn write_embedded_font(writer: &mut PdfWriter, font: &EmbeddedFont) -> ObjectRef {
    let base_font = pdf_font_name(&font.name);

    let font_file = if font.cff_outlines {
        writer.add_object(Object::stream(
            vec![("Subtype", Object::name("OpenType"))],
            font.font_data().to_vec(),
        ))
    } else {
        writer.add_object(Object::stream(
            vec![("Length1", Object::Integer(font.font_data().len() as i64))],
            font.font_data().to_vec(),
        ))
    };
    let descriptor = writer.add_object(font_descriptor(font, &base_font, font_file));

    let mut cid_entries = vec![
        ("Type", Object::name("Font")),
        (
            "Subtype",
            Object::name(if font.cff_outlines {
                "CIDFontType0"
            } else {
                "CIDFontType2"
            }),
        ),
        ("BaseFont", Object::name(&base_font)),
        (
            "CIDSystemInfo",
            Object::dict(vec![
                ("Registry", Object::String(b"Adobe".to_vec())),
                ("Ordering", Object::String(b"Identity".to_vec())),
                ("Supplement", Object::Integer(0)),
            ]),
        ),
        ("FontDescriptor", descriptor.into()),
        ("DW", Object::Integer(1000)),
        ("W", width_array(font)),
    ];
    if !font.cff_outlines {
        cid_entries.push(("CIDToGIDMap", Object::name("Identity")));
    }
    let cid_font = writer.add_object(Object::dict(cid_entries));

    let to_unicode = writer.add_object(Object::stream(vec![], font.generate_tounicode_cmap().into_bytes()));

    let type0 = writer.add_object(Object::dict(vec![
        ("Type", Object::name("Font")),
        ("Subtype", Object::name("Type0")),
        ("BaseFont", Object::name(&base_font)),
        ("Encoding", Object::name("Identity-H")),
        ("DescendantFonts", Object::Array(vec![cid_font.into()])),
        ("ToUnicode", to_unicode.into()),
    ]));

    log::debug!("Embedded font {} as {}", font.name, type0);
    type0
}

fn font_descriptor(font: &EmbeddedFont, base_font: &str, font_file: ObjectRef) -> Object {
    let (llx, lly, urx, ury) = font.bbox;
    let file_key = if font.cff_outlines { "FontFile3" } else { "FontFile2" };
    Object::dict(vec![
        ("Type", Object::name("FontDescriptor")),
        ("FontName", Object::name(base_font)),
        ("Flags", Object::Integer(font.flags.bits() as i64)),
        (
            "FontBBox",
            Object::Array(vec![
                Object::Integer(llx as i64),
                Object::Integer(lly as i64),
                Object::Integer(urx as i64),
                Object::Integer(ury as i64),
            ]),
        ),
        ("ItalicAngle", Object::real(font.italic_angle)),
        ("Ascent", Object::Integer(font.ascender as i64)),
        ("Descent", Object::Integer(font.descender as i64)),
        ("CapHeight", Object::Integer(font.cap_height as i64)),
        ("StemV", Object::Integer(font.stem_v as i64)),
        (file_key, font_file.into()),
    ])
}

/// `W` array: `[start [w1 w2 ...] start [...] ...]` over the glyphs drawn.
fn width_array(font: &EmbeddedFont) -> Object {
    let mut entries = Vec::new();
    for (start, widths) in font.width_runs() {
        entries.push(Object::Integer(start as i64));
        entries.push(Object::Array(widths.into_iter().map(|w| Object::Integer(w as i64)).collect()));
    }
    Object::Array(entries)
}

/// Font name usable as a PDF `/BaseFont`: whitespace removed, never empty.
pub fn pdf_font_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !c.is_whitespace() && c.is_ascii_graphic())
        .collect();
    if cleaned.is_empty() {
        "EmbeddedFont".to_string()
    } else {
        cleaned
    }
}
