//! Sound blueprints (`.uts`)

use kotor_common::ResRef;

use crate::error::Result;
use crate::templates::{gff_wrapper, or_default, template_fields};

gff_wrapper!(
    /// Ambient sound blueprint
    Uts,
    b"UTS "
);

impl Uts {
    template_fields! {
        "TemplateResRef" => template_resref, set_template_resref: resref;
        "Tag" => tag, set_tag: string;
        "LocName" => name, set_name: locstring;
        "Active" => active, set_active: flag;
        "Continuous" => continuous, set_continuous: flag;
        "Looping" => looping, set_looping: flag;
        /// Heard everywhere in the area, without falloff
        "Positional" => positional, set_positional: flag;
        "RandomPosition" => random_position, set_random_position: flag;
        /// Play the sounds in random order
        "Random" => random, set_random: flag;
        "Volume" => volume, set_volume: byte = 127;
        "VolumeVrtn" => volume_variation, set_volume_variation: byte = 0;
        "PitchVariation" => pitch_variation, set_pitch_variation: float = 0.0;
        "Elevation" => elevation, set_elevation: float = 0.0;
        "MinDistance" => min_distance, set_min_distance: float = 1.0;
        "MaxDistance" => max_distance, set_max_distance: float = 30.0;
        /// Milliseconds between sounds
        "Interval" => interval, set_interval: dword = 0;
        "IntervalVrtn" => interval_variation, set_interval_variation: dword = 0;
        "RandomRangeX" => random_range_x, set_random_range_x: float = 0.0;
        "RandomRangeY" => random_range_y, set_random_range_y: float = 0.0;
        /// 1 for day only, 2 for night only, 3 for both
        "Times" => times, set_times: byte = 3;
        "Hours" => hours, set_hours: dword = 0;
        "Priority" => priority, set_priority: byte = 0;
        "PaletteID" => palette_id, set_palette_id: byte = 0;
        "Comment" => comment, set_comment: string;
    }

    /// Sound files played, in order
    pub fn sounds(&self) -> Result<Vec<ResRef>> {
        or_default(self.root.get_list("Sounds"), &[][..])?
            .iter()
            .map(|sound| sound.get_resref("Sound").cloned())
            .collect()
    }

    /// Append a sound file
    pub fn add_sound(&mut self, sound: ResRef) -> Result<&mut Self> {
        self.root
            .add_list_element("Sounds", 0)?
            .set_field("Sound", sound);
        Ok(self)
    }
}
