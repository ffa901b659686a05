use std::path::PathBuf;

use kotor_2da::error::Result;
use kotor_2da::{Cell, ColumnSchema, ColumnType, TwoDA, TypedCell};
use kotor_common::ResRef;
use pretty_assertions::assert_eq;
use tracing_test::traced_test;

fn resource(name: &str) -> PathBuf {
    PathBuf::from(format!(
        "{}/resources/{name}",
        env!("CARGO_MANIFEST_DIR")
    ))
}

#[traced_test]
#[test]
fn parse_binary_2da() -> Result<()> {
    let data = std::fs::read(resource("portraits.2da")).map_err(kotor_common::Error::from)?;
    let table = TwoDA::decode(&data)?;

    assert_eq!(
        table.columns().collect::<Vec<_>>(),
        vec!["baseresref", "appearancenumber", "sex", "forpc"]
    );
    assert_eq!(table.row_count(), 4);
    assert_eq!(table.cell(1, "baseresref"), Some("po_pcarth"));
    assert_eq!(table.cell_raw(2, "baseresref"), Some(&Cell::Empty));
    assert_eq!(table.cell_as_int(3, "appearancenumber"), Ok(Some(16)));
    assert_eq!(table.cell_as_bool(0, "forpc"), Ok(Some(true)));
    assert_eq!(table.cell_as_bool(2, "forpc"), Ok(None));
    assert_eq!(table.find_row("baseresref", "po_pmission"), Some(3));

    Ok(())
}

#[traced_test]
#[test]
fn text_and_binary_agree() -> Result<()> {
    let binary = std::fs::read(resource("portraits.2da")).map_err(kotor_common::Error::from)?;
    let text = std::fs::read(resource("portraits_text.2da")).map_err(kotor_common::Error::from)?;

    assert_eq!(TwoDA::decode(&binary)?, TwoDA::decode(&text)?);

    Ok(())
}

#[test]
fn typed_rows() -> Result<()> {
    let data = std::fs::read(resource("portraits.2da")).map_err(kotor_common::Error::from)?;
    let table = TwoDA::decode(&data)?;

    let schema = ColumnSchema::new()
        .column("baseresref", ColumnType::ResRef)
        .column("appearancenumber", ColumnType::Integer)
        .column("sex", ColumnType::Integer)
        .column("forpc", ColumnType::Boolean);

    let row = table.typed_row(0, &schema)?;
    assert_eq!(
        row.value("baseresref"),
        Some(&TypedCell::ResRef(ResRef::new("po_pbas")?))
    );
    assert_eq!(row.int_or("appearancenumber", 0), -1);
    assert!(row.bool_or("forpc", false));

    let row = table.typed_row(2, &schema)?;
    assert_eq!(row.value("baseresref"), None);
    assert_eq!(row.int_or("sex", 2), 2);

    Ok(())
}

#[cfg(feature = "serde")]
#[test]
fn serde_round_trip() -> Result<()> {
    let text = std::fs::read(resource("portraits_text.2da")).map_err(kotor_common::Error::from)?;
    let table = TwoDA::decode(&text)?;

    let json = serde_json::to_string(&table).map_err(|e| {
        kotor_common::Error::from(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })?;
    let decoded: TwoDA = serde_json::from_str(&json).map_err(|e| {
        kotor_common::Error::from(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })?;

    assert_eq!(decoded, table);

    let ragged = r#"{"columns":["a","b"],"rows":[{"label":"0","cells":["x"]}]}"#;
    assert!(serde_json::from_str::<TwoDA>(ragged).is_err());

    Ok(())
}
