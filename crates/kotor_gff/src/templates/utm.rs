//! Merchant blueprints (`.utm`)

use kotor_common::ResRef;

use crate::error::Result;
use crate::templates::{elements, gff_wrapper, template_fields};

gff_wrapper!(
    /// Store blueprint
    Utm,
    b"UTM "
);

gff_wrapper!(
    /// Stock entry of a store
    UtmItem
);

impl Utm {
    /// Bit of `BuySellFlag` set when the store buys from the player
    pub const BUYS: u8 = 0x01;
    /// Bit of `BuySellFlag` set when the store sells to the player
    pub const SELLS: u8 = 0x02;

    template_fields! {
        /// Resource name of the blueprint itself
        "ResRef" => resref, set_resref: resref;
        "LocName" => name, set_name: locstring;
        "Tag" => tag, set_tag: string;
        /// Percentage applied to prices when selling to the player
        "MarkUp" => mark_up, set_mark_up: int = 100;
        /// Percentage applied to prices when buying from the player
        "MarkDown" => mark_down, set_mark_down: int = 100;
        "OnOpenStore" => on_open_store, set_on_open_store: resref;
        /// [`Utm::BUYS`] and [`Utm::SELLS`] bits
        "BuySellFlag" => buy_sell_flag, set_buy_sell_flag: byte = 0x03;
        "ID" => id, set_id: byte = 0;
        "Comment" => comment, set_comment: string;
    }

    /// Whether the player can sell here
    pub fn buys(&self) -> Result<bool> {
        Ok(self.buy_sell_flag()? & Self::BUYS != 0)
    }

    /// Whether the player can buy here
    pub fn sells(&self) -> Result<bool> {
        Ok(self.buy_sell_flag()? & Self::SELLS != 0)
    }

    /// Stock of the store
    pub fn items(&self) -> Result<Vec<UtmItem>> {
        elements(&self.root, "ItemList")
    }

    /// Add `resref` to the stock, numbering it after the entries already present
    pub fn add_item(&mut self, resref: ResRef, infinite: bool) -> Result<&mut Self> {
        let index = self.items()?.len() as u32;
        let item = self.root.add_list_element("ItemList", index)?;
        item.set_field("InventoryRes", resref);
        item.set_field("Infinite", infinite);
        Ok(self)
    }
}

impl UtmItem {
    template_fields! {
        /// Item blueprint
        "InventoryRes" => resref, set_resref: resref;
        /// Never runs out of stock
        "Infinite" => infinite, set_infinite: flag;
        "Repos_PosX" => position_x, set_position_x: word = 0;
        "Repos_Posy" => position_y, set_position_y: word = 0;
    }

    /// Position in the stock list
    pub fn struct_id(&self) -> u32 {
        self.root.struct_id
    }
}

#[cfg(test)]
mod test {
    use kotor_common::ResRef;
    use pretty_assertions::assert_eq;

    use crate::error::Result;
    use crate::templates::{Template, Utm};

    #[test]
    fn store_stock() -> Result<()> {
        let mut store = Utm::default();
        store.set_tag("dan_droid");
        store.set_mark_up(125);
        store.set_buy_sell_flag(Utm::SELLS);
        store
            .add_item(ResRef::new("g_i_medeqpmnt01")?, true)?
            .add_item(ResRef::new("g_w_blstrpstl001")?, false)?;

        let store = Utm::decode(&store.encode()?)?;
        assert_eq!(store.mark_up()?, 125);
        assert_eq!(store.mark_down()?, 100);
        assert!(store.sells()?);
        assert!(!store.buys()?);

        let items = store.items()?;
        assert_eq!(items.len(), 2);
        assert!(items[0].infinite()?);
        assert!(!items[1].infinite()?);
        assert_eq!(items[1].struct_id(), 1);
        assert_eq!(items[1].resref()?.as_str(), "g_w_blstrpstl001");

        Ok(())
    }
}
