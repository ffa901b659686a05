//! Item blueprints (`.uti`)

use crate::error::Result;
use crate::templates::{elements, gff_wrapper, template_fields};

gff_wrapper!(
    /// Item blueprint
    Uti,
    b"UTI "
);

gff_wrapper!(
    /// Property granted by an item, an element of `PropertiesList`
    UtiProperty
);

impl Uti {
    template_fields! {
        "TemplateResRef" => template_resref, set_template_resref: resref;
        /// Row of `baseitems.2da`
        "BaseItem" => base_item, set_base_item: int = 0;
        /// Name shown before the item is identified
        "LocalizedName" => name, set_name: locstring;
        "Description" => description, set_description: locstring;
        /// Description shown once identified
        "DescIdentified" => identified_description, set_identified_description: locstring;
        "Tag" => tag, set_tag: string;
        "Charges" => charges, set_charges: byte = 0;
        /// Base price in credits
        "Cost" => cost, set_cost: dword = 0;
        "AddCost" => additional_cost, set_additional_cost: dword = 0;
        "StackSize" => stack_size, set_stack_size: word = 1;
        "Stolen" => stolen, set_stolen: flag;
        "Plot" => plot, set_plot: flag;
        "Identified" => identified, set_identified: flag;
        "ModelVariation" => model_variation, set_model_variation: byte = 0;
        "BodyVariation" => body_variation, set_body_variation: byte = 0;
        "TextureVar" => texture_variation, set_texture_variation: byte = 0;
        "PaletteID" => palette_id, set_palette_id: byte = 0;
        "Comment" => comment, set_comment: string;
        /// Upgrade slots unlocked at the workbench, second game only
        "UpgradeLevel" => upgrade_level, set_upgrade_level: opt_byte;
    }

    /// Properties of the item
    pub fn properties(&self) -> Result<Vec<UtiProperty>> {
        elements(&self.root, "PropertiesList")
    }

    /// Replace the properties
    pub fn set_properties(&mut self, properties: impl IntoIterator<Item = UtiProperty>) {
        let properties: Vec<crate::GffStruct> = properties.into_iter().map(Into::into).collect();
        self.root.set_field("PropertiesList", properties);
    }

    /// Append a property
    pub fn add_property(&mut self, property: UtiProperty) -> Result<&mut Self> {
        *self.root.add_list_element("PropertiesList", 0)? = property.into();
        Ok(self)
    }
}

impl UtiProperty {
    /// A property of type `name` (row of `itempropdef.2da`) with the given subtype
    pub fn new(name: u16, subtype: u16) -> Self {
        let mut property = Self {
            root: crate::GffStruct::new(0),
        };
        property.set_name(name);
        property.set_subtype(subtype);
        property.set_chance_appear(100);
        property.set_param1(0xFF);
        property.set_uses_per_day(0xFF);
        property
    }

    template_fields! {
        "PropertyName" => name, set_name: word = 0;
        "Subtype" => subtype, set_subtype: word = 0;
        /// Row of `iprp_costtable.2da`
        "CostTable" => cost_table, set_cost_table: byte = 0;
        "CostValue" => cost_value, set_cost_value: word = 0;
        /// Row of `iprp_paramtable.2da`, 255 when unused
        "Param1" => param1, set_param1: byte = 0xFF;
        "Param1Value" => param1_value, set_param1_value: byte = 0;
        "ChanceAppear" => chance_appear, set_chance_appear: byte = 100;
        "UsesPerDay" => uses_per_day, set_uses_per_day: byte = 0xFF;
        /// Upgrade slot the property came from, second game only
        "UpgradeType" => upgrade_type, set_upgrade_type: opt_byte;
    }
}
