//! Waypoint blueprints (`.utw`)

use crate::templates::{gff_wrapper, template_fields};

gff_wrapper!(
    /// Waypoint blueprint
    Utw,
    b"UTW "
);

impl Utw {
    template_fields! {
        "TemplateResRef" => template_resref, set_template_resref: resref;
        "Tag" => tag, set_tag: string;
        "LocalizedName" => name, set_name: locstring;
        "Description" => description, set_description: locstring;
        "Appearance" => appearance, set_appearance: byte = 1;
        "LinkedTo" => linked_to, set_linked_to: string;
        /// Shown on the area map
        "HasMapNote" => has_map_note, set_has_map_note: flag;
        "MapNote" => map_note, set_map_note: locstring;
        "MapNoteEnabled" => map_note_enabled, set_map_note_enabled: flag;
        "PaletteID" => palette_id, set_palette_id: byte = 0;
        "Comment" => comment, set_comment: string;
    }
}
