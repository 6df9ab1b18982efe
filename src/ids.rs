use chrono::Utc;
use uuid::Uuid;

/// Human-readable display code derived from a row's UUID. The UUID is the
/// real identifier; the code exists for invoices, support tickets and URLs.
pub fn display_code(prefix: &str, id: Uuid) -> String {
    let hex = id.simple().to_string();
    format!("{}-{}", prefix, &hex[..8].to_uppercase())
}

/// Order codes additionally carry the placement date, e.g. `ORD-20260825-1A2B3C4D`.
pub fn order_code(id: Uuid) -> String {
    let date = Utc::now().format("%Y%m%d");
    let hex = id.simple().to_string();
    format!("ORD-{}-{}", date, &hex[..8].to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_code_is_prefixed_and_short() {
        let id = Uuid::new_v4();
        let code = display_code("PRD", id);
        assert!(code.starts_with("PRD-"));
        assert_eq!(code.len(), 4 + 8);
    }

    #[test]
    fn order_code_embeds_date() {
        let code = order_code(Uuid::new_v4());
        let date = Utc::now().format("%Y%m%d").to_string();
        assert!(code.starts_with(&format!("ORD-{date}-")));
    }

    #[test]
    fn codes_differ_per_uuid() {
        assert_ne!(
            display_code("CAT", Uuid::new_v4()),
            display_code("CAT", Uuid::new_v4())
        );
    }
}
