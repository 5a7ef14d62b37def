//! CLI command implementations.

pub mod customer;
pub mod job;
pub mod migrate;
pub mod storage_box;
pub mod view;

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;
use storage_hub_core::{BoxDraft, BoxId, Price};

/// A `--box` argument, parsed from `key=value` pairs separated by commas.
///
/// Keys: `id`, `number`, `color`, `size`, `price`, `contents`. Missing keys
/// are left blank; a missing price is zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoxArg(BoxDraft);

impl BoxArg {
    pub fn into_draft(self) -> BoxDraft {
        self.0
    }
}

/// Value parser for `--box`.
///
/// # Errors
///
/// Returns a message for an unknown key, a pair without `=`, or a price that
/// is not a decimal number.
pub fn parse_box(raw: &str) -> Result<BoxArg, String> {
    let mut draft = BoxDraft::default();
    for pair in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| format!("expected key=value, got `{pair}`"))?;
        let value = value.trim();
        match key.trim() {
            "id" => draft.id = (!value.is_empty()).then(|| BoxId::new(value)),
            "number" => draft.box_number = (!value.is_empty()).then(|| value.to_string()),
            "color" => draft.color = value.to_string(),
            "size" => draft.box_size = value.to_string(),
            "price" => {
                let amount = Decimal::from_str(value)
                    .map_err(|e| format!("invalid price `{value}`: {e}"))?;
                draft.price = Price::from(amount);
            }
            "contents" => draft.contents = value.to_string(),
            other => return Err(format!("unknown box field `{other}`")),
        }
    }
    Ok(BoxArg(draft))
}

/// Write a result to stdout as pretty JSON.
///
/// # Errors
///
/// Returns error if the value cannot be serialized.
#[allow(clippy::print_stdout)]
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_box_all_fields() {
        let raw = "id=b1, number=BX-1001, color=red, size=20x20, price=150.50, contents=labels";
        let draft = parse_box(raw).unwrap().into_draft();
        assert_eq!(draft.id, Some(BoxId::new("b1")));
        assert_eq!(draft.box_number.as_deref(), Some("BX-1001"));
        assert_eq!(draft.color, "red");
        assert_eq!(draft.box_size, "20x20");
        assert_eq!(draft.price, Price::from(Decimal::new(15050, 2)));
        assert_eq!(draft.contents, "labels");
    }

    #[test]
    fn test_parse_box_defaults() {
        let draft = parse_box("price=80").unwrap().into_draft();
        assert!(draft.id.is_none());
        assert!(draft.box_number.is_none());
        assert_eq!(draft.price, Price::from(Decimal::new(80, 0)));
    }

    #[test]
    fn test_parse_box_rejects_bad_input() {
        assert!(parse_box("weight=3").is_err());
        assert!(parse_box("price").is_err());
        assert!(parse_box("price=abc").is_err());
    }
}
