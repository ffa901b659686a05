//! Placeable blueprints (`.utp`)

use crate::error::Result;
use crate::templates::{elements, gff_wrapper, template_fields};
use kotor_common::ResRef;

gff_wrapper!(
    /// Placeable blueprint
    Utp,
    b"UTP "
);

gff_wrapper!(
    /// Element of an `ItemList`, shared by placeables and creatures
    InventoryItem
);

impl Utp {
    template_fields! {
        /// Resource name of the blueprint itself
        "TemplateResRef" => template_resref, set_template_resref: resref;
        /// Tag scripts use to find the object
        "Tag" => tag, set_tag: string;
        /// Display name
        "LocName" => name, set_name: locstring;
        "Description" => description, set_description: locstring;
        /// Row of `placeables.2da`
        "Appearance" => appearance, set_appearance: dword = 0;
        "Conversation" => conversation, set_conversation: resref;
        "Faction" => faction, set_faction: dword = 0;
        "HP" => hit_points, set_hit_points: short = 0;
        "CurrentHP" => current_hit_points, set_current_hit_points: short = 0;
        "Hardness" => hardness, set_hardness: byte = 0;
        "Fort" => fortitude, set_fortitude: byte = 0;
        "Ref" => reflex, set_reflex: byte = 0;
        "Will" => will, set_will: byte = 0;
        "Plot" => plot, set_plot: flag;
        "Static" => is_static, set_static: flag;
        "Useable" => useable, set_useable: flag;
        "PartyInteract" => party_interact, set_party_interact: flag;
        "Interruptable" => interruptable, set_interruptable: flag;
        "HasInventory" => has_inventory, set_has_inventory: flag;
        "BodyBag" => body_bag, set_body_bag: byte = 0;
        "Lockable" => lockable, set_lockable: flag;
        "Locked" => locked, set_locked: flag;
        /// Difficulty of the security skill check to open the lock
        "OpenLockDC" => open_lock_dc, set_open_lock_dc: byte = 0;
        "KeyRequired" => key_required, set_key_required: flag;
        /// Tag of the item that opens the lock
        "KeyName" => key_name, set_key_name: string;
        "AutoRemoveKey" => auto_remove_key, set_auto_remove_key: flag;
        "TrapDetectable" => trap_detectable, set_trap_detectable: flag;
        "TrapDetectDC" => trap_detect_dc, set_trap_detect_dc: byte = 0;
        "TrapDisarmable" => trap_disarmable, set_trap_disarmable: flag;
        "DisarmDC" => disarm_dc, set_disarm_dc: byte = 0;
        "TrapFlag" => trapped, set_trapped: flag;
        "TrapOneShot" => trap_one_shot, set_trap_one_shot: flag;
        /// Row of `traps.2da`
        "TrapType" => trap_type, set_trap_type: byte = 0;
        "OnClosed" => on_closed, set_on_closed: resref;
        "OnDamaged" => on_damaged, set_on_damaged: resref;
        "OnDeath" => on_death, set_on_death: resref;
        "OnDisarm" => on_disarm, set_on_disarm: resref;
        "OnEndDialogue" => on_end_dialogue, set_on_end_dialogue: resref;
        "OnHeartbeat" => on_heartbeat, set_on_heartbeat: resref;
        "OnInvDisturbed" => on_inventory_disturbed, set_on_inventory_disturbed: resref;
        "OnLock" => on_lock, set_on_lock: resref;
        "OnMeleeAttacked" => on_melee_attacked, set_on_melee_attacked: resref;
        "OnOpen" => on_open, set_on_open: resref;
        "OnSpellCastAt" => on_spell_cast_at, set_on_spell_cast_at: resref;
        "OnTrapTriggered" => on_trap_triggered, set_on_trap_triggered: resref;
        "OnUnlock" => on_unlock, set_on_unlock: resref;
        "OnUsed" => on_used, set_on_used: resref;
        "OnUserDefined" => on_user_defined, set_on_user_defined: resref;
        /// Palette category in the toolset
        "PaletteID" => palette_id, set_palette_id: byte = 0;
        "Comment" => comment, set_comment: string;
        /// Security check to relock, second game only
        "CloseLockDC" => close_lock_dc, set_close_lock_dc: opt_byte;
        /// Damage cannot take the object below one hit point, second game only
        "Min1HP" => min_one_hp, set_min_one_hp: opt_flag;
        /// Immune to explosives, second game only
        "NotBlastable" => not_blastable, set_not_blastable: opt_flag;
    }

    /// Items placed in the placeable
    pub fn items(&self) -> Result<Vec<InventoryItem>> {
        elements(&self.root, "ItemList")
    }

    /// Replace the contents
    pub fn set_items(&mut self, items: impl IntoIterator<Item = InventoryItem>) {
        let items: Vec<crate::GffStruct> = items.into_iter().map(Into::into).collect();
        self.root.set_field("ItemList", items);
    }

    /// Append an item, numbering it after the ones already present
    pub fn add_item(&mut self, resref: ResRef) -> Result<&mut Self> {
        let index = self.items()?.len() as u32;
        self.root
            .add_list_element("ItemList", index)?
            .set_field("InventoryRes", resref);
        Ok(self)
    }
}

impl InventoryItem {
    /// An entry for `resref`, numbered `index` in its list
    pub fn new(index: u32, resref: ResRef) -> Self {
        let mut root = crate::GffStruct::new(index);
        root.set_field("InventoryRes", resref);
        Self { root }
    }

    /// Position in the list as recorded by the toolset
    pub fn struct_id(&self) -> u32 {
        self.root.struct_id
    }

    template_fields! {
        /// Item blueprint
        "InventoryRes" => resref, set_resref: resref;
        "Repos_PosX" => position_x, set_position_x: word = 0;
        "Repos_Posy" => position_y, set_position_y: word = 0;
        /// Whether a creature drops the item on death
        "Dropable" => droppable, set_droppable: flag;
    }
}

#[cfg(test)]
mod test {
    use kotor_common::ResRef;
    use pretty_assertions::assert_eq;

    use crate::error::Result;
    use crate::templates::{InventoryItem, Template, Utp};
    use crate::types::{GffFieldType, GffValue};

    #[test]
    fn inventory() -> Result<()> {
        let mut chest = Utp::default();
        chest.set_has_inventory(true);
        chest
            .add_item(ResRef::new("g_i_credits001")?)?
            .add_item(ResRef::new("g_i_medeqpmnt01")?)?;

        let chest = Utp::decode(&chest.encode()?)?;
        let items = chest.items()?;
        assert!(chest.has_inventory()?);
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].struct_id(), 1);
        assert_eq!(items[1].resref()?.as_str(), "g_i_medeqpmnt01");

        Ok(())
    }

    #[test]
    fn set_items_stores_a_list() -> Result<()> {
        let mut chest = Utp::default();
        chest.set_items([
            InventoryItem::new(0, ResRef::new("g_i_credits001")?),
            InventoryItem::new(1, ResRef::new("g_i_adrnaline001")?),
        ]);

        let field = chest.as_struct().get_field("ItemList").map(GffValue::field_type);
        assert_eq!(field, Some(GffFieldType::List));

        let chest = Utp::decode(&chest.encode()?)?;
        assert_eq!(chest.items()?[1].resref()?.as_str(), "g_i_adrnaline001");

        Ok(())
    }

    #[test]
    fn second_game_fields_are_optional() -> Result<()> {
        let mut door = Utp::default();
        assert_eq!(door.close_lock_dc()?, None);
        assert_eq!(door.not_blastable()?, None);

        door.set_close_lock_dc(25);
        door.set_not_blastable(true);
        assert_eq!(door.close_lock_dc()?, Some(25));
        assert_eq!(door.not_blastable()?, Some(true));

        door.set_items([InventoryItem::new(0, ResRef::new("g_w_vbroswrd01")?)]);
        assert_eq!(door.items()?.len(), 1);

        door.as_struct_mut().set_field("CloseLockDC", GffValue::Int(3));
        assert!(door.close_lock_dc().is_err());

        Ok(())
    }
}
