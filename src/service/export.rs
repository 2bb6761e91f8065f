use std::io;

use crate::models::ShoppingItem;

/// Write shopping items as CSV with a header row
pub fn write_items_csv<W: io::Write>(items: &[ShoppingItem], writer: W) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(["name", "quantity", "unit", "category", "source", "purchased"])?;

    for item in items {
        writer.write_record([
            item.name.clone(),
            item.quantity.to_string(),
            item.unit.clone(),
            item.category.clone(),
            item.source_type.as_str().to_string(),
            item.purchased.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceType;
    use bigdecimal::BigDecimal;
    use std::str::FromStr;

    #[test]
    fn writes_header_and_rows() {
        let items = vec![ShoppingItem {
            id: 1,
            list_id: 1,
            name: "Onions, red".to_string(),
            quantity: BigDecimal::from_str("350.0").unwrap(),
            unit: "g".to_string(),
            category: "produce".to_string(),
            source_type: SourceType::Recipe,
            purchased: false,
        }];

        let mut out = Vec::new();
        write_items_csv(&items, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "name,quantity,unit,category,source,purchased\n\"Onions, red\",350.0,g,produce,recipe,false\n"
        );
    }
}
