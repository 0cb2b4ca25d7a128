//! Attribute identifiers of the content database and the field names they map to.
//!
//! The content store keeps every AFE value in `tblProperty_Strings`, keyed by a
//! property GUID. The table below is the only place that knows which GUID means
//! what. It was assembled from observed data rather than a published schema, so
//! some names are loose (`originator` vs `originator_name`, `boolean_flag_N`).

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Content classes that hold AFE records
pub const AFE_CLASS_GUIDS: &[&str] = &[
    "55119960-A633-4AD8-810D-379049A25BE7",
    "1432A221-87A6-4C04-9CE9-5CE3DBB11125",
    "E6BF8767-C57B-4010-868C-B6FA0D99AAC9",
    "26B04FD9-8C60-4C21-A4A7-1EEE265C8D78",
    "1E50BFB1-2B93-4BCD-AB6B-27BC44D75E2A",
];

/// Property GUIDs joined by the summary (list / search-text) queries
pub mod summary {
    pub const STATUS: &str = "2A13D0BA-6756-4E39-A7A9-828D52E603A8";
    pub const AFE_TYPE: &str = "821378BD-083B-449D-814F-9CB3F8317B33";
    pub const AREA: &str = "BEEC4906-50CD-47AA-B9AB-BA9ECD867C69";
    pub const NAME: &str = "C0B60CE9-8A89-4303-B699-C4C389095A30";
    pub const SURFACE_LOCATION: &str = "89EB0825-83C8-4E65-A674-D93DA2258EB6";
    pub const GROSS_BUDGET: &str = "031F3106-118D-440C-8487-4FCDDB6AE45A";
    pub const NET_BUDGET: &str = "11A4FF9F-A703-432E-9D41-67B6DB44F857";
    pub const WORKING_INTEREST_PCT: &str = "6E3A4E36-4C74-4620-8B9B-C0A7B7754AB8";
    pub const APPROVAL_STATUS: &str = "8932EB93-DC6F-486F-A322-0E42FFB49CA0";
    pub const DATE_CREATED: &str = "EE38FF03-9C22-4DFB-89E4-8953BC2611E4";
    pub const COMPANY: &str = "08575A2C-5B4A-4D1D-9459-003D6FCCDEDA";

    /// Stored on the publisher's user content row, not on the AFE
    pub const CREATOR_FIRST_NAME: &str = "A52BB910-4798-4916-816F-CA895F78DD55";
    pub const CREATOR_LAST_NAME: &str = "C15AEF9B-52D6-4052-8BF6-92F92B85A4DE";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Decimal text converted to a JSON number on output
    Number,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyField {
    pub guid: &'static str,
    pub field: &'static str,
    pub kind: FieldKind,
}

const fn text(guid: &'static str, field: &'static str) -> PropertyField {
    PropertyField { guid, field, kind: FieldKind::Text }
}

const fn number(guid: &'static str, field: &'static str) -> PropertyField {
    PropertyField { guid, field, kind: FieldKind::Number }
}

/// Detail field layout, in output order
pub static PROPERTY_FIELDS: &[PropertyField] = &[
    // Identifiers
    text("18923387-E8BA-45E7-AE7F-ABEA2C7C0E62", "afe_number_full"),
    text("B752F427-C4D7-4E86-94BA-67346D790D5F", "afe_number_base"),
    // Header
    text("08575A2C-5B4A-4D1D-9459-003D6FCCDEDA", "company"),
    text("C0B60CE9-8A89-4303-B699-C4C389095A30", "name"),
    text("821378BD-083B-449D-814F-9CB3F8317B33", "afe_type"),
    text("419B8872-E9C9-4EBE-8BCB-58783F5DE96A", "is_preliminary"),
    text("C55E4ED1-41FB-42F5-968A-D0C9195D3897", "operator"),
    text("157B539D-0BD4-4E82-A032-EECCB0181A45", "province"),
    text("BEEC4906-50CD-47AA-B9AB-BA9ECD867C69", "area"),
    text("38C19027-7E69-45DE-901E-85091DF9AD35", "expenditure_line"),
    text("89EB0825-83C8-4E65-A674-D93DA2258EB6", "surface_location"),
    text("52E32478-CD61-4E71-ABEA-870BADB108D7", "cost_center"),
    text("A986BA3D-6266-48DF-8D96-7DAA539A8104", "managing_org"),
    text("06B6DE12-1573-4A5C-810C-402C1A686631", "managing_org_id"),
    text("C35A8269-3EBD-43CE-8E5D-C3A862441587", "qbyte_reference"),
    text("4DF2C006-C3D8-4D23-B235-96A46D80B85D", "project_name"),
    text("ED52424F-C301-43F9-A991-C05E4944D101", "justification"),
    // Key dates
    text("8D02DA53-DABF-4D28-8D0B-4E9F62D8D5AD", "fiscal_year"),
    text("EE38FF03-9C22-4DFB-89E4-8953BC2611E4", "date_created"),
    text("B65AC416-49C1-4ED8-8A8D-F7310D208AD7", "estimated_start"),
    text("27139ECE-4EF2-4402-ABEB-6E29357B769D", "estimated_completion"),
    text("AD9D3606-E1E9-44A2-887F-A79B0141019F", "submitted_for_approval"),
    // Totals
    number("6E3A4E36-4C74-4620-8B9B-C0A7B7754AB8", "working_interest_pct"),
    number("C1102A35-AC8F-4AF1-A21B-BF2D6E782CF9", "working_interest_ratio"),
    number("031F3106-118D-440C-8487-4FCDDB6AE45A", "gross_budget"),
    number("11A4FF9F-A703-432E-9D41-67B6DB44F857", "net_budget"),
    number("80434A42-7530-411E-BD67-78D3B49A5A5B", "total_gross"),
    number("51A1C179-9C32-4C71-A298-BC4633EA941C", "total_net"),
    // Workflow / approval
    text("8932EB93-DC6F-486F-A322-0E42FFB49CA0", "approval_status"),
    text("2A13D0BA-6756-4E39-A7A9-828D52E603A8", "afe_status_text"),
    text("F125D2FB-66F3-4405-BA23-54FA800AD3D9", "afe_status_lock"),
    // Percentages
    number("7B20F627-EB8C-4CFA-97BA-9CAFA4402F7F", "bpo_percent"),
    number("D61790B1-3FF0-4824-A280-B0A53C5BB5EE", "apo_percent"),
    // Detail view extras
    text("088F82A7-A7A7-43CC-A123-572C30271F37", "originator"),
    text("1A15F1F7-9312-4ADE-89AB-6BA428ABF36D", "originator_name"),
    text("DE3D08EE-6990-41C2-A8F6-A932491360C3", "operator_afe_number"),
    text("064A103F-131D-4ED8-AA1C-F8D3D94676DC", "province_code"),
    text("53619C9B-1ED7-4F25-8058-10F686EC9E06", "afe_supplement_type"),
    text("4B1E9761-B506-4CF9-883C-2E8A05CF41DC", "afe_supplement_id"),
    number("55B8021F-2DF6-4532-AE96-47FDC0AF1C09", "percentage_100"),
    number("5ABE7EB2-3EB5-4687-B02A-48C7D3C02EF8", "amount_100000"),
    text("A67E05AC-2850-4F23-ADD2-488CE4968060", "is_active_flag"),
    text("FBBA6BA8-F07D-4DD8-A3E9-71A7FE60C1E9", "boolean_flag_1"),
    text("37C821E4-3378-407A-B4FD-851B50CBEAF7", "boolean_flag_2"),
    text("D94B9621-9E3C-4082-8C50-68090E2B795E", "boolean_flag_3"),
    text("636149C1-0C4E-42A2-B6E2-FCE402F0A151", "boolean_flag_4"),
    text("E97E642D-E110-4C6C-A54A-F268E2C2D373", "boolean_flag_5"),
    number("4B85D2F4-E3C3-4821-A3D6-FFB95A97AF01", "percentage_field"),
    text("7E4A247D-FC0F-4B83-99BA-9E954361FD1E", "linked_content_guid"),
    text("52C9B580-91BE-4DA3-95BB-7A65C1995CF5", "linked_guid_2"),
    text("28AAD120-7E14-46D4-9BEE-8D3494EC01E3", "sequence_number"),
    text("E3223C16-759F-400C-9008-109CD1FD4298", "zero_value"),
    text("D502D598-7891-4C24-B6F2-37BF500BA05F", "zero_value_2"),
];

/// GUID (upper-case) -> index into `PROPERTY_FIELDS`
static FIELD_INDEX: Lazy<HashMap<&'static str, usize>> = Lazy::new(|| {
    PROPERTY_FIELDS
        .iter()
        .enumerate()
        .map(|(idx, field)| (field.guid, idx))
        .collect()
});

/// Look up a property GUID; matching is case-insensitive.
///
/// Returns the field's position in `PROPERTY_FIELDS` together with the field.
pub fn lookup(property_guid: &str) -> Option<(usize, &'static PropertyField)> {
    let guid = property_guid.trim();
    let idx = match FIELD_INDEX.get(guid) {
        Some(idx) => *idx,
        None => *FIELD_INDEX.get(guid.to_ascii_uppercase().as_str())?,
    };
    Some((idx, &PROPERTY_FIELDS[idx]))
}
