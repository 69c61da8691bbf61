//! The closed commodity-group vocabulary.
//!
//! One list feeds both the extraction prompt and selection widgets.

/// The 50 known commodity groups, in canonical order.
pub const COMMODITY_GROUPS: [&str; 50] = [
    "Accommodation Rentals",
    "Membership Fees",
    "Workplace Safety",
    "Consulting",
    "Financial Services",
    "Fleet Management",
    "Recruitment Services",
    "Professional Development",
    "Miscellaneous Services",
    "Insurance",
    "Electrical Engineering",
    "Facility Management Services",
    "Security",
    "Renovations",
    "Office Equipment",
    "Energy Management",
    "Maintenance",
    "Cafeteria and Kitchenettes",
    "Cleaning",
    "Audio and Visual Production",
    "Books/Videos/CDs",
    "Printing Costs",
    "Software Development for Publishing",
    "Material Costs",
    "Shipping for Production",
    "Digital Product Development",
    "Pre-production",
    "Post-production Costs",
    "Hardware",
    "IT Services",
    "Software",
    "Courier, Express, and Postal Services",
    "Warehousing and Material Handling",
    "Transportation Logistics",
    "Delivery Services",
    "Advertising",
    "Outdoor Advertising",
    "Marketing Agencies",
    "Direct Mail",
    "Customer Communication",
    "Online Marketing",
    "Events",
    "Promotional Materials",
    "Warehouse and Operational Equipment",
    "Production Machinery",
    "Spare Parts",
    "Internal Transportation",
    "Production Materials",
    "Consumables",
    "Maintenance and Repairs",
];

/// Exact (case- and spelling-sensitive) vocabulary membership.
pub fn is_commodity_group(label: &str) -> bool {
    COMMODITY_GROUPS.contains(&label)
}

/// Vocabulary in alphabetical order, as shown in dropdowns.
pub fn sorted() -> Vec<&'static str> {
    let mut groups = COMMODITY_GROUPS.to_vec();
    groups.sort_unstable();
    groups
}

/// Vocabulary joined for inclusion in a prompt.
pub fn prompt_list() -> String {
    COMMODITY_GROUPS.join(", ")
}
