/// Pagination window applied with `OFFSET .. FETCH NEXT ..`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: u32,
    pub offset: u32,
}

/// Filters for the AFE list query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListFilter {
    pub status: Option<String>,
    pub page: Page,
}

/// Free-text search across AFE number, name, area and creator names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSearch {
    pub text: String,
    pub page: Page,
}

/// One row of the summary projection; every property value is still raw text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryRow {
    pub content_guid: String,
    pub afe_number: Option<String>,
    pub status: Option<String>,
    pub afe_type: Option<String>,
    pub area: Option<String>,
    pub name: Option<String>,
    pub surface_location: Option<String>,
    pub gross_budget: Option<String>,
    pub net_budget: Option<String>,
    pub working_interest_pct: Option<String>,
    pub approval_status: Option<String>,
    pub date_created: Option<String>,
    pub company: Option<String>,
    pub created_by: Option<String>,
}

/// One content/property pair from the bulk detail query.
///
/// `property_guid` is `None` when the content row has no properties at all (left join).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyRow {
    pub content_guid: String,
    pub afe_number: Option<String>,
    pub property_guid: Option<String>,
    pub value: Option<String>,
}
