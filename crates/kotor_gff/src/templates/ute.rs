//! Encounter blueprints (`.ute`)

use kotor_common::ResRef;

use crate::error::Result;
use crate::templates::{elements, gff_wrapper, template_fields};

gff_wrapper!(
    /// Encounter blueprint
    Ute,
    b"UTE "
);

gff_wrapper!(
    /// Creature an encounter can spawn
    UteCreature
);

impl Ute {
    template_fields! {
        "TemplateResRef" => template_resref, set_template_resref: resref;
        "Tag" => tag, set_tag: string;
        "LocalizedName" => name, set_name: locstring;
        "Active" => active, set_active: flag;
        "Difficulty" => difficulty, set_difficulty: int = 0;
        /// Row of `encdifficulty.2da`
        "DifficultyIndex" => difficulty_index, set_difficulty_index: int = 0;
        "Faction" => faction, set_faction: dword = 0;
        "MaxCreatures" => max_creatures, set_max_creatures: int = 1;
        "RecCreatures" => recommended_creatures, set_recommended_creatures: int = 1;
        /// Only the player can trigger the encounter
        "PlayerOnly" => player_only, set_player_only: flag;
        "Reset" => reset, set_reset: flag;
        /// Seconds before the encounter can trigger again
        "ResetTime" => reset_time, set_reset_time: int = 0;
        /// Times the encounter respawns, -1 for unlimited
        "Respawns" => respawns, set_respawns: int = 0;
        /// 0 for single shot, 1 for continuous
        "SpawnOption" => spawn_option, set_spawn_option: int = 0;
        "OnEntered" => on_entered, set_on_entered: resref;
        "OnExit" => on_exit, set_on_exit: resref;
        "OnExhausted" => on_exhausted, set_on_exhausted: resref;
        "OnHeartbeat" => on_heartbeat, set_on_heartbeat: resref;
        "OnUserDefined" => on_user_defined, set_on_user_defined: resref;
        "PaletteID" => palette_id, set_palette_id: byte = 0;
        "Comment" => comment, set_comment: string;
    }

    /// Creatures the encounter picks from
    pub fn creatures(&self) -> Result<Vec<UteCreature>> {
        elements(&self.root, "CreatureList")
    }

    /// Add a creature to pick from
    pub fn add_creature(&mut self, resref: ResRef, appearance: i32, challenge: f32) -> Result<&mut Self> {
        let creature = self.root.add_list_element("CreatureList", 0)?;
        creature.set_field("ResRef", resref);
        creature.set_field("Appearance", appearance);
        creature.set_field("CR", challenge);
        Ok(self)
    }
}

impl UteCreature {
    template_fields! {
        /// Creature blueprint
        "ResRef" => resref, set_resref: resref;
        /// Row of `appearance.2da`
        "Appearance" => appearance, set_appearance: int = 0;
        /// Challenge rating
        "CR" => challenge, set_challenge: float = 0.0;
        /// Spawned at most once
        "SingleSpawn" => single_spawn, set_single_spawn: flag;
        /// Spawned every time, second game only
        "GuaranteedCount" => guaranteed_count, set_guaranteed_count: opt_int;
    }
}
