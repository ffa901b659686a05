//! Creature blueprints (`.utc`)

use crate::error::Result;
use crate::templates::{elements, gff_wrapper, or_default, template_fields, InventoryItem};
use crate::types::{GffStruct, GffValue};

gff_wrapper!(
    /// Creature blueprint
    Utc,
    b"UTC "
);

gff_wrapper!(
    /// Levels a creature has in one class
    CreatureClass
);

impl Utc {
    template_fields! {
        "TemplateResRef" => template_resref, set_template_resref: resref;
        "Tag" => tag, set_tag: string;
        "FirstName" => first_name, set_first_name: locstring;
        "LastName" => last_name, set_last_name: locstring;
        "Description" => description, set_description: locstring;
        /// Row of `appearance.2da`
        "Appearance_Type" => appearance, set_appearance: word = 0;
        /// Row of `gender.2da`
        "Gender" => gender, set_gender: byte = 0;
        /// Row of `racialtypes.2da`
        "Race" => race, set_race: byte = 0;
        /// Row of `portraits.2da`
        "PortraitId" => portrait, set_portrait: word = 0;
        "Conversation" => conversation, set_conversation: resref;
        "FactionID" => faction, set_faction: word = 0;
        "SoundSetFile" => sound_set, set_sound_set: word = 0;
        "Str" => strength, set_strength: byte = 10;
        "Dex" => dexterity, set_dexterity: byte = 10;
        "Con" => constitution, set_constitution: byte = 10;
        "Int" => intelligence, set_intelligence: byte = 10;
        "Wis" => wisdom, set_wisdom: byte = 10;
        "Cha" => charisma, set_charisma: byte = 10;
        "HitPoints" => base_hit_points, set_base_hit_points: short = 0;
        "CurrentHitPoints" => current_hit_points, set_current_hit_points: short = 0;
        "MaxHitPoints" => max_hit_points, set_max_hit_points: short = 0;
        "ForcePoints" => force_points, set_force_points: short = 0;
        "CurrentForce" => current_force, set_current_force: short = 0;
        "ChallengeRating" => challenge, set_challenge: float = 0.0;
        "NaturalAC" => natural_ac, set_natural_ac: byte = 0;
        "GoodEvil" => alignment, set_alignment: byte = 50;
        "PerceptionRange" => perception_range, set_perception_range: byte = 0;
        /// Row of `creaturespeed.2da`
        "WalkRate" => walk_rate, set_walk_rate: int = 0;
        "BodyVariation" => body_variation, set_body_variation: byte = 0;
        "TextureVar" => texture_variation, set_texture_variation: byte = 0;
        "Plot" => plot, set_plot: flag;
        "Min1HP" => min_one_hp, set_min_one_hp: flag;
        "NoPermDeath" => no_permanent_death, set_no_permanent_death: flag;
        "Disarmable" => disarmable, set_disarmable: flag;
        "IsPC" => is_pc, set_is_pc: flag;
        "PartyInteract" => party_interact, set_party_interact: flag;
        "Interruptable" => interruptable, set_interruptable: flag;
        "NotReorienting" => not_reorienting, set_not_reorienting: flag;
        "ScriptAttacked" => on_attacked, set_on_attacked: resref;
        "ScriptDamaged" => on_damaged, set_on_damaged: resref;
        "ScriptDeath" => on_death, set_on_death: resref;
        "ScriptDialogue" => on_dialogue, set_on_dialogue: resref;
        "ScriptDisturbed" => on_disturbed, set_on_disturbed: resref;
        "ScriptEndRound" => on_end_round, set_on_end_round: resref;
        "ScriptEndDialogu" => on_end_dialogue, set_on_end_dialogue: resref;
        "ScriptHeartbeat" => on_heartbeat, set_on_heartbeat: resref;
        "ScriptOnBlocked" => on_blocked, set_on_blocked: resref;
        "ScriptOnNotice" => on_notice, set_on_notice: resref;
        "ScriptRested" => on_rested, set_on_rested: resref;
        "ScriptSpawn" => on_spawn, set_on_spawn: resref;
        "ScriptSpellAt" => on_spell_cast_at, set_on_spell_cast_at: resref;
        "ScriptUserDefine" => on_user_defined, set_on_user_defined: resref;
        "PaletteID" => palette_id, set_palette_id: byte = 0;
        "Comment" => comment, set_comment: string;
        /// Second game only
        "BlindSpot" => blind_spot, set_blind_spot: opt_float;
        /// Row of `creaturesize.2da` multipliers, second game only
        "MultiplierSet" => multiplier_set, set_multiplier_set: opt_byte;
        "IgnoreCrePath" => ignore_creature_path, set_ignore_creature_path: opt_flag;
        "Hologram" => hologram, set_hologram: opt_flag;
    }

    /// Inventory of the creature
    pub fn items(&self) -> Result<Vec<InventoryItem>> {
        elements(&self.root, "ItemList")
    }

    /// Classes of the creature, at most two in the games
    pub fn classes(&self) -> Result<Vec<CreatureClass>> {
        elements(&self.root, "ClassList")
    }

    /// Add `levels` in `class`, a row of `classes.2da`
    pub fn add_class(&mut self, class: i32, levels: i16) -> Result<&mut Self> {
        let entry = self.root.add_list_element("ClassList", 2)?;
        entry.set_field("Class", class);
        entry.set_field("ClassLevel", levels);
        Ok(self)
    }

    /// Total level over every class
    pub fn level(&self) -> Result<i32> {
        self.classes()?
            .iter()
            .map(|class| class.level().map(i32::from))
            .sum()
    }

    /// Feats known, rows of `feat.2da`
    pub fn feats(&self) -> Result<Vec<u16>> {
        or_default(self.root.get_list("FeatList"), &[][..])?
            .iter()
            .map(|feat| feat.get_word("Feat"))
            .collect()
    }

    /// Replace the feats known
    pub fn set_feats(&mut self, feats: impl IntoIterator<Item = u16>) {
        let feats: Vec<_> = feats
            .into_iter()
            .map(|feat| {
                let mut entry = GffStruct::new(1);
                entry.set_field("Feat", GffValue::Word(feat));
                entry
            })
            .collect();
        self.root.set_field("FeatList", feats);
    }
}

impl CreatureClass {
    template_fields! {
        /// Row of `classes.2da`
        "Class" => class, set_class: int = 0;
        "ClassLevel" => level, set_level: short = 0;
    }
}
