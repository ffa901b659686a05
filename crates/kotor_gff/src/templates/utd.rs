//! Door blueprints (`.utd`)

use crate::templates::{gff_wrapper, template_fields};

gff_wrapper!(
    /// Door blueprint
    Utd,
    b"UTD "
);

impl Utd {
    template_fields! {
        "TemplateResRef" => template_resref, set_template_resref: resref;
        "Tag" => tag, set_tag: string;
        "LocName" => name, set_name: locstring;
        "Description" => description, set_description: locstring;
        /// Row of `doortypes.2da`
        "GenericType" => generic_type, set_generic_type: byte = 0;
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
        "Interruptable" => interruptable, set_interruptable: flag;
        "Lockable" => lockable, set_lockable: flag;
        "Locked" => locked, set_locked: flag;
        "OpenLockDC" => open_lock_dc, set_open_lock_dc: byte = 0;
        "KeyRequired" => key_required, set_key_required: flag;
        "KeyName" => key_name, set_key_name: string;
        "AutoRemoveKey" => auto_remove_key, set_auto_remove_key: flag;
        /// Tag of the waypoint or door a transition leads to
        "LinkedTo" => linked_to, set_linked_to: string;
        /// 1 when linked to a door, 2 when linked to a waypoint
        "LinkedToFlags" => linked_to_flags, set_linked_to_flags: byte = 0;
        "LinkedToModule" => linked_to_module, set_linked_to_module: resref;
        "TransitionDestin" => transition_destination, set_transition_destination: locstring;
        "TrapDetectable" => trap_detectable, set_trap_detectable: flag;
        "TrapDetectDC" => trap_detect_dc, set_trap_detect_dc: byte = 0;
        "TrapDisarmable" => trap_disarmable, set_trap_disarmable: flag;
        "DisarmDC" => disarm_dc, set_disarm_dc: byte = 0;
        "TrapFlag" => trapped, set_trapped: flag;
        "TrapOneShot" => trap_one_shot, set_trap_one_shot: flag;
        "TrapType" => trap_type, set_trap_type: byte = 0;
        "OnClick" => on_click, set_on_click: resref;
        "OnClosed" => on_closed, set_on_closed: resref;
        "OnDamaged" => on_damaged, set_on_damaged: resref;
        "OnDeath" => on_death, set_on_death: resref;
        "OnDisarm" => on_disarm, set_on_disarm: resref;
        "OnFailToOpen" => on_fail_to_open, set_on_fail_to_open: resref;
        "OnHeartbeat" => on_heartbeat, set_on_heartbeat: resref;
        "OnLock" => on_lock, set_on_lock: resref;
        "OnMeleeAttacked" => on_melee_attacked, set_on_melee_attacked: resref;
        "OnOpen" => on_open, set_on_open: resref;
        "OnSpellCastAt" => on_spell_cast_at, set_on_spell_cast_at: resref;
        "OnTrapTriggered" => on_trap_triggered, set_on_trap_triggered: resref;
        "OnUnlock" => on_unlock, set_on_unlock: resref;
        "OnUserDefined" => on_user_defined, set_on_user_defined: resref;
        "PaletteID" => palette_id, set_palette_id: byte = 0;
        "Comment" => comment, set_comment: string;
        /// Second game only
        "CloseLockDC" => close_lock_dc, set_close_lock_dc: opt_byte;
        /// 0 closed, 1 and 2 open in either direction, 3 destroyed; second game only
        "OpenState" => open_state, set_open_state: opt_byte;
        "Min1HP" => min_one_hp, set_min_one_hp: opt_flag;
        "NotBlastable" => not_blastable, set_not_blastable: opt_flag;
    }
}
