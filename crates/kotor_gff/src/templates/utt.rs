//! Trigger blueprints (`.utt`)

use crate::templates::{gff_wrapper, template_fields};

gff_wrapper!(
    /// Trigger blueprint
    Utt,
    b"UTT "
);

impl Utt {
    /// Value of `Type` for a plain trigger
    pub const GENERIC: i32 = 0;
    /// Value of `Type` for an area transition
    pub const TRANSITION: i32 = 1;
    /// Value of `Type` for a trap
    pub const TRAP: i32 = 2;

    template_fields! {
        "TemplateResRef" => template_resref, set_template_resref: resref;
        "Tag" => tag, set_tag: string;
        "LocalizedName" => name, set_name: locstring;
        /// [`Utt::GENERIC`], [`Utt::TRANSITION`] or [`Utt::TRAP`]
        "Type" => kind, set_kind: int = 0;
        "Cursor" => cursor, set_cursor: byte = 0;
        "Faction" => faction, set_faction: dword = 0;
        "HighlightHeight" => highlight_height, set_highlight_height: float = 0.0;
        "LinkedTo" => linked_to, set_linked_to: string;
        "LinkedToFlags" => linked_to_flags, set_linked_to_flags: byte = 0;
        "LinkedToModule" => linked_to_module, set_linked_to_module: resref;
        "TransitionDestin" => transition_destination, set_transition_destination: locstring;
        "AutoRemoveKey" => auto_remove_key, set_auto_remove_key: flag;
        "KeyName" => key_name, set_key_name: string;
        "TrapDetectable" => trap_detectable, set_trap_detectable: flag;
        "TrapDetectDC" => trap_detect_dc, set_trap_detect_dc: byte = 0;
        "TrapDisarmable" => trap_disarmable, set_trap_disarmable: flag;
        "DisarmDC" => disarm_dc, set_disarm_dc: byte = 0;
        "TrapFlag" => trapped, set_trapped: flag;
        "TrapOneShot" => trap_one_shot, set_trap_one_shot: flag;
        "TrapType" => trap_type, set_trap_type: byte = 0;
        "ScriptHeartbeat" => on_heartbeat, set_on_heartbeat: resref;
        "ScriptOnEnter" => on_enter, set_on_enter: resref;
        "ScriptOnExit" => on_exit, set_on_exit: resref;
        "ScriptUserDefine" => on_user_defined, set_on_user_defined: resref;
        "OnDisarm" => on_disarm, set_on_disarm: resref;
        "OnTrapTriggered" => on_trap_triggered, set_on_trap_triggered: resref;
        "OnClick" => on_click, set_on_click: resref;
        "PaletteID" => palette_id, set_palette_id: byte = 0;
        "Comment" => comment, set_comment: string;
    }

    /// Whether the trigger is a trap
    pub fn is_trap(&self) -> crate::Result<bool> {
        Ok(self.kind()? == Self::TRAP)
    }
}

#[cfg(test)]
mod test {
    use kotor_common::ResRef;
    use pretty_assertions::assert_eq;

    use crate::error::Result;
    use crate::templates::{Template, Utt};

    #[test]
    fn trap_trigger() -> Result<()> {
        let mut trigger = Utt::default();
        trigger.set_kind(Utt::TRAP);
        trigger.set_trapped(true);
        trigger.set_on_enter(ResRef::new("k_trp_generic")?);

        let trigger = Utt::decode(&trigger.encode()?)?;
        assert!(trigger.is_trap()?);
        assert!(trigger.trapped()?);
        assert_eq!(trigger.on_enter()?.as_str(), "k_trp_generic");
        assert!(trigger.on_exit()?.is_blank());

        Ok(())
    }
}
