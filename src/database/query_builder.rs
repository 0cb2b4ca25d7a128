//! SQL text for the AFE queries.
//!
//! Every caller-supplied value is bound as a positional `@Pn` parameter; only
//! constant GUIDs and typed integers (offset / limit) are inlined.

use std::fmt::Write;

use super::models::{ListFilter, Page, TextSearch};
use crate::eav::property_map::{summary, AFE_CLASS_GUIDS};

/// SQL Server caps a request at 2100 parameters; keep headroom for the rest of the query.
pub const MAX_AFE_NUMBERS: usize = 2000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlQuery {
    pub sql: String,
    pub params: Vec<String>,
}

/// A property left-joined onto the content row under `alias`
struct PropertyJoin {
    alias: &'static str,
    property_guid: &'static str,
    column: &'static str,
}

const SUMMARY_JOINS: &[PropertyJoin] = &[
    PropertyJoin { alias: "ps_status", property_guid: summary::STATUS, column: "status" },
    PropertyJoin { alias: "ps_type", property_guid: summary::AFE_TYPE, column: "type" },
    PropertyJoin { alias: "ps_area", property_guid: summary::AREA, column: "area" },
    PropertyJoin { alias: "ps_name", property_guid: summary::NAME, column: "name" },
    PropertyJoin { alias: "ps_surface", property_guid: summary::SURFACE_LOCATION, column: "surface_location" },
    PropertyJoin { alias: "ps_gross", property_guid: summary::GROSS_BUDGET, column: "gross_budget" },
    PropertyJoin { alias: "ps_net", property_guid: summary::NET_BUDGET, column: "net_budget" },
    PropertyJoin { alias: "ps_wi_pct", property_guid: summary::WORKING_INTEREST_PCT, column: "working_interest_pct" },
    PropertyJoin { alias: "ps_approval", property_guid: summary::APPROVAL_STATUS, column: "approval_status" },
    PropertyJoin { alias: "ps_created", property_guid: summary::DATE_CREATED, column: "date_created" },
    PropertyJoin { alias: "ps_company", property_guid: summary::COMPANY, column: "company" },
];

const CREATED_BY: &str = "CONCAT(creator_first.Value, ' ', creator_last.Value)";

/// Builds the shared list / search-text projection
struct SummaryQuery {
    conditions: Vec<String>,
    params: Vec<String>,
}

impl SummaryQuery {
    fn new() -> Self {
        Self {
            conditions: vec![format!("c.Class_Guid IN ({})", class_guid_list())],
            params: vec![],
        }
    }

    /// Register a bound value and return its placeholder
    fn param(&mut self, value: impl Into<String>) -> String {
        self.params.push(value.into());
        format!("@P{}", self.params.len())
    }

    fn condition(&mut self, sql: String) {
        self.conditions.push(sql);
    }

    fn build(self, page: Page) -> SqlQuery {
        let mut sql = String::from("SELECT\n  CONVERT(NVARCHAR(36), c.Content_Guid) AS content_guid,\n  c.Name AS afe_number");
        for join in SUMMARY_JOINS {
            let _ = write!(sql, ",\n  {}.Value AS {}", join.alias, join.column);
        }
        let _ = write!(sql, ",\n  {} AS created_by", CREATED_BY);

        sql.push_str("\nFROM tblContent c");
        for join in SUMMARY_JOINS {
            let _ = write!(
                sql,
                "\nLEFT JOIN tblProperty_Strings {alias} ON {alias}.Content_Guid = c.Content_Guid AND {alias}.Property_Guid = '{guid}'",
                alias = join.alias,
                guid = join.property_guid,
            );
        }
        for (alias, guid) in [
            ("creator_first", summary::CREATOR_FIRST_NAME),
            ("creator_last", summary::CREATOR_LAST_NAME),
        ] {
            let _ = write!(
                sql,
                "\nLEFT JOIN tblProperty_Strings {alias} ON {alias}.Content_Guid = c.Publisher_User_Guid AND {alias}.Property_Guid = '{guid}'",
            );
        }

        let _ = write!(sql, "\nWHERE {}", self.conditions.join("\n  AND "));
        let _ = write!(
            sql,
            "\nORDER BY ps_created.Value DESC, c.Name DESC\nOFFSET {} ROWS\nFETCH NEXT {} ROWS ONLY",
            page.offset, page.limit
        );

        SqlQuery { sql, params: self.params }
    }
}

fn class_guid_list() -> String {
    AFE_CLASS_GUIDS
        .iter()
        .map(|guid| format!("'{}'", guid))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Escape `LIKE` metacharacters so user text matches literally
pub fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '%' | '_' | '[' => {
                escaped.push('[');
                escaped.push(ch);
                escaped.push(']');
            }
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Paged AFE summaries, optionally restricted to one status
pub fn list_query(filter: &ListFilter) -> SqlQuery {
    let mut query = SummaryQuery::new();
    if let Some(status) = &filter.status {
        let p = query.param(status.as_str());
        query.condition(format!("ps_status.Value = {}", p));
    }
    query.build(filter.page)
}

/// Paged AFE summaries whose number, name, area or creator contains the search text
pub fn search_text_query(search: &TextSearch) -> SqlQuery {
    let mut query = SummaryQuery::new();
    let p = query.param(format!("%{}%", escape_like(&search.text)));
    query.condition(format!(
        "(c.Name LIKE {p} OR ps_name.Value LIKE {p} OR ps_area.Value LIKE {p} \
         OR creator_first.Value LIKE {p} OR creator_last.Value LIKE {p} OR {created_by} LIKE {p})",
        p = p,
        created_by = CREATED_BY,
    ));
    query.build(search.page)
}

/// Every property row of the AFEs with the given numbers
pub fn property_rows_query(afe_numbers: &[String]) -> SqlQuery {
    let params = afe_numbers.to_vec();
    let placeholders = (1..=params.len())
        .map(|i| format!("@P{}", i))
        .collect::<Vec<_>>()
        .join(", ");

    let sql = format!(
        "SELECT\n  CONVERT(NVARCHAR(36), c.Content_Guid) AS content_guid,\n  c.Name AS afe_number,\n  \
         CONVERT(NVARCHAR(36), ps.Property_Guid) AS property_guid,\n  ps.Value AS field_value\n\
         FROM tblContent c\n\
         LEFT JOIN tblProperty_Strings ps ON ps.Content_Guid = c.Content_Guid\n\
         WHERE c.Class_Guid IN ({})\n  AND c.Name IN ({})\n\
         ORDER BY c.Name, c.Content_Guid",
        class_guid_list(),
        placeholders,
    );

    SqlQuery { sql, params }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(limit: u32, offset: u32) -> Page {
        Page { limit, offset }
    }

    #[test]
    fn list_without_status_has_no_params() {
        let q = list_query(&ListFilter { status: None, page: page(50, 0) });
        assert!(q.params.is_empty());
        assert!(!q.sql.contains("@P"));
        assert!(q.sql.contains("OFFSET 0 ROWS\nFETCH NEXT 50 ROWS ONLY"));
        assert!(q.sql.contains("ORDER BY ps_created.Value DESC, c.Name DESC"));
    }

    #[test]
    fn list_binds_status_filter() {
        let q = list_query(&ListFilter { status: Some("Approved".to_string()), page: page(10, 20) });
        assert_eq!(q.params, vec!["Approved".to_string()]);
        assert!(q.sql.contains("ps_status.Value = @P1"));
        assert!(q.sql.contains("OFFSET 20 ROWS\nFETCH NEXT 10 ROWS ONLY"));
    }

    #[test]
    fn summary_queries_filter_by_class_whitelist() {
        let q = list_query(&ListFilter { status: None, page: page(5, 0) });
        for guid in AFE_CLASS_GUIDS {
            assert!(q.sql.contains(guid), "missing class {}", guid);
        }
    }

    #[test]
    fn search_text_joins_created_date_it_orders_by() {
        let q = search_text_query(&TextSearch { text: "Red Deer".to_string(), page: page(50, 0) });
        assert!(q.sql.contains("ORDER BY ps_created.Value DESC"));
        assert!(q.sql.contains(&format!("ps_created.Property_Guid = '{}'", summary::DATE_CREATED)));
    }

    #[test]
    fn search_text_reuses_one_bound_pattern() {
        let q = search_text_query(&TextSearch { text: "Red Deer".to_string(), page: page(50, 0) });
        assert_eq!(q.params, vec!["%Red Deer%".to_string()]);
        assert_eq!(q.sql.matches("LIKE @P1").count(), 6);
        assert!(!q.sql.contains("Red Deer"));
    }

    #[test]
    fn search_text_escapes_wildcards() {
        let q = search_text_query(&TextSearch { text: "100%_[a]".to_string(), page: page(50, 0) });
        assert_eq!(q.params, vec!["%100[%][_][[]a]%".to_string()]);
    }

    #[test]
    fn property_rows_bind_every_number() {
        let numbers = vec!["AFE-1".to_string(), "AFE-2".to_string(), "x'; DROP TABLE tblContent;--".to_string()];
        let q = property_rows_query(&numbers);
        assert_eq!(q.params, numbers);
        assert!(q.sql.contains("c.Name IN (@P1, @P2, @P3)"));
        assert!(!q.sql.contains("DROP TABLE"));
        assert!(!q.sql.contains("Property_Guid = '"));
    }
}
