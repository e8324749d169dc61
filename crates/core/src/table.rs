//! In-memory filtering and pagination of already-loaded tables.
//!
//! Tables are small (one tenant's products, members or shipments), so
//! filters are linear scans. Page parameters come from the browser URL
//! (`?page=2&size=20&id=...`); `id` deep-links to a row, which selects the
//! page containing it and marks the row expanded.

use serde::{Deserialize, Serialize};

use crate::member::Member;
use crate::product::Product;
use crate::shipment::Shipment;

/// Default rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Largest page size accepted from a URL.
pub const MAX_PAGE_SIZE: usize = 100;

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

/// A record that can be shown in a filterable table.
pub trait TableRow {
    fn row_id(&self) -> &str;

    /// Display value of a column, or `None` when the row has no such value.
    fn column_value(&self, column: &str) -> Option<String>;
}

impl TableRow for Product {
    fn row_id(&self) -> &str {
        &self.id
    }

    fn column_value(&self, column: &str) -> Option<String> {
        use crate::category::AttributeKey;
        match column {
            "name" => Some(self.display_name()),
            "category" => Some(self.category().to_string()),
            "status" => Some(self.status.as_str().to_string()),
            "condition" => Some(self.condition.as_str().to_string()),
            "location" => self.location.map(|l| l.to_string()),
            "assignedMember" => self.assigned_member.clone(),
            "assignedEmail" => self.assigned_email.clone(),
            "serialNumber" => self.serial_number.clone(),
            "brand" => self.attributes.get(AttributeKey::Brand).map(str::to_string),
            "model" => self.attributes.get(AttributeKey::Model).map(str::to_string),
            _ => None,
        }
    }
}

impl TableRow for Member {
    fn row_id(&self) -> &str {
        &self.id
    }

    fn column_value(&self, column: &str) -> Option<String> {
        match column {
            "fullName" => Some(self.full_name()),
            "email" => Some(self.email.clone()),
            "team" => self.team.as_ref().map(|t| t.name.clone()),
            "country" => self.country.clone(),
            "city" => self.city.clone(),
            "products" => Some(self.products.len().to_string()),
            _ => None,
        }
    }
}

impl TableRow for Shipment {
    fn row_id(&self) -> &str {
        &self.id
    }

    fn column_value(&self, column: &str) -> Option<String> {
        match column {
            "orderId" => self.order_id.clone(),
            "status" => Some(self.shipment_status.as_str().to_string()),
            "origin" => Some(self.origin.display_name()),
            "destination" => Some(self.destination.display_name()),
            "originDate" => Some(self.origin_date.to_string()),
            "destinationDate" => Some(self.destination_date.to_string()),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnFilter {
    /// Keep rows whose column equals one of `values` (case-insensitive).
    OneOf { column: String, values: Vec<String> },
    /// Keep rows whose column contains `needle` (case-insensitive).
    Contains { column: String, needle: String },
    /// Keep rows where any of `columns` contains `needle`.
    Search { columns: Vec<String>, needle: String },
}

impl ColumnFilter {
    pub fn matches<T: TableRow + ?Sized>(&self, row: &T) -> bool {
        match self {
            Self::OneOf { values, .. } if values.is_empty() => true,
            Self::OneOf { column, values } => row
                .column_value(column)
                .is_some_and(|v| values.iter().any(|x| x.eq_ignore_ascii_case(&v))),
            Self::Contains { column, needle } => contains(row.column_value(column), needle),
            Self::Search { columns, needle } => {
                needle.trim().is_empty()
                    || columns.iter().any(|c| contains(row.column_value(c), needle))
            }
        }
    }

    pub fn column(&self) -> Option<&str> {
        match self {
            Self::OneOf { column, .. } | Self::Contains { column, .. } => Some(column),
            Self::Search { .. } => None,
        }
    }
}

fn contains(value: Option<String>, needle: &str) -> bool {
    let needle = needle.trim().to_lowercase();
    needle.is_empty() || value.is_some_and(|v| v.to_lowercase().contains(&needle))
}

/// Rows passing every filter, in their original order.
pub fn filter_rows<'a, T: TableRow>(rows: &'a [T], filters: &[ColumnFilter]) -> Vec<&'a T> {
    rows.iter()
        .filter(|row| filters.iter().all(|f| f.matches(*row)))
        .collect()
}

/// Distinct values of a column, sorted, for building filter dropdowns.
pub fn column_options<T: TableRow>(rows: &[T], column: &str) -> Vec<String> {
    let mut values: Vec<String> = rows.iter().filter_map(|r| r.column_value(column)).collect();
    values.sort();
    values.dedup();
    values
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// Page parameters parsed from a URL query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageParams {
    /// 1-based page number.
    pub page: usize,
    pub size: usize,
    /// Row to deep-link to.
    pub focus_id: Option<String>,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: 1,
            size: DEFAULT_PAGE_SIZE,
            focus_id: None,
        }
    }
}

/// Raw query parameters before defaults and clamping.
#[derive(Debug, Default, Deserialize)]
struct RawPageQuery {
    page: Option<String>,
    size: Option<String>,
    #[serde(rename = "pageSize")]
    page_size: Option<String>,
    id: Option<String>,
}

#[derive(Serialize)]
struct PageQuery<'a> {
    page: usize,
    size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
}

impl PageParams {
    /// Parse `page`, `size` (or `pageSize`) and `id` from a query string.
    /// Values are percent-decoded. Missing or malformed values fall back
    /// to the defaults.
    pub fn from_query(query: &str) -> Self {
        let raw: RawPageQuery =
            serde_urlencoded::from_str(query.trim_start_matches('?')).unwrap_or_default();

        let mut params = Self::default();
        if let Some(page) = raw.page.and_then(|v| v.parse::<usize>().ok()) {
            params.page = page.max(1);
        }
        if let Some(size) = raw
            .size
            .or(raw.page_size)
            .and_then(|v| v.parse::<usize>().ok())
        {
            params.size = size.clamp(1, MAX_PAGE_SIZE);
        }
        params.focus_id = raw.id.filter(|id| !id.is_empty());
        params
    }

    pub fn to_query(&self) -> String {
        let query = PageQuery {
            page: self.page,
            size: self.size,
            id: self.focus_id.as_deref(),
        };
        serde_urlencoded::to_string(&query).unwrap_or_default()
    }
}

/// One page of a filtered table.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a, T> {
    pub items: Vec<&'a T>,
    pub page: usize,
    pub size: usize,
    pub total: usize,
    pub total_pages: usize,
    /// Row to render expanded, when the URL deep-linked to it.
    pub expanded_id: Option<String>,
}

/// Slice `rows` into the requested page.
///
/// A `focus_id` present in `rows` overrides `page` with the page holding
/// it. A page past the end is clamped to the last page.
pub fn paginate<'a, T: TableRow>(rows: &[&'a T], params: &PageParams) -> Page<'a, T> {
    let size = params.size.clamp(1, MAX_PAGE_SIZE);
    let total = rows.len();
    let total_pages = total.div_ceil(size).max(1);

    let focus = params
        .focus_id
        .as_deref()
        .and_then(|id| rows.iter().position(|r| r.row_id() == id));
    let page = match focus {
        Some(index) => index / size + 1,
        None => params.page.clamp(1, total_pages),
    };

    let start = (page - 1) * size;
    let items = rows.iter().skip(start).take(size).copied().collect();

    Page {
        items,
        page,
        size,
        total,
        total_pages,
        expanded_id: focus.map(|i| rows[i].row_id().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Location;
    use crate::product::fixtures::{delivered_to, laptop};
    use crate::status::ProductStatus;

    fn products(n: usize) -> Vec<Product> {
        (0..n)
            .map(|i| {
                if i % 2 == 0 {
                    laptop(&format!("p{i}"))
                } else {
                    delivered_to(&format!("p{i}"), "ana@acme.io", "Ana Diaz")
                }
            })
            .collect()
    }

    #[test]
    fn parses_query_parameters() {
        let p = PageParams::from_query("?page=3&pageSize=25&id=s42");
        assert_eq!(p.page, 3);
        assert_eq!(p.size, 25);
        assert_eq!(p.focus_id.as_deref(), Some("s42"));
    }

    #[test]
    fn malformed_query_uses_defaults() {
        let p = PageParams::from_query("page=zero&size=-4&foo");
        assert_eq!(p, PageParams::default());
        assert_eq!(PageParams::from_query("size=5000").size, MAX_PAGE_SIZE);
    }

    #[test]
    fn focus_id_is_percent_decoded() {
        let p = PageParams::from_query("?page=1&id=65f1%2Dab");
        assert_eq!(p.focus_id.as_deref(), Some("65f1-ab"));

        let p = PageParams::from_query("id=Ana%20Diaz%2Fp1");
        assert_eq!(p.focus_id.as_deref(), Some("Ana Diaz/p1"));
    }

    #[test]
    fn query_round_trips_an_encoded_id() {
        let params = PageParams {
            page: 2,
            size: 20,
            focus_id: Some("a&b=c".into()),
        };
        let query = params.to_query();
        assert_eq!(query, "page=2&size=20&id=a%26b%3Dc");
        assert_eq!(PageParams::from_query(&query), params);
    }

    #[test]
    fn one_of_filter_matches_status() {
        let rows = products(6);
        let filters = vec![ColumnFilter::OneOf {
            column: "status".into(),
            values: vec![ProductStatus::Delivered.as_str().into()],
        }];
        let kept = filter_rows(&rows, &filters);
        assert_eq!(kept.len(), 3);
        assert!(kept.iter().all(|p| p.location == Some(Location::Employee)));
    }

    #[test]
    fn search_is_case_insensitive_across_columns() {
        let rows = products(4);
        let filters = vec![ColumnFilter::Search {
            columns: vec!["name".into(), "assignedMember".into()],
            needle: "ANA".into(),
        }];
        assert_eq!(filter_rows(&rows, &filters).len(), 2);
    }

    #[test]
    fn empty_filters_keep_everything() {
        let rows = products(4);
        let filters = vec![
            ColumnFilter::OneOf {
                column: "status".into(),
                values: vec![],
            },
            ColumnFilter::Contains {
                column: "serialNumber".into(),
                needle: " ".into(),
            },
        ];
        assert_eq!(filter_rows(&rows, &filters).len(), 4);
    }

    #[test]
    fn paginates_and_clamps() {
        let rows = products(25);
        let all = filter_rows(&rows, &[]);
        let page = paginate(&all, &PageParams { page: 9, size: 10, focus_id: None });
        assert_eq!(page.page, 3);
        assert_eq!(page.items.len(), 5);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn focus_id_selects_its_page() {
        let rows = products(25);
        let all = filter_rows(&rows, &[]);
        let page = paginate(
            &all,
            &PageParams {
                page: 1,
                size: 10,
                focus_id: Some("p17".into()),
            },
        );
        assert_eq!(page.page, 2);
        assert_eq!(page.expanded_id.as_deref(), Some("p17"));
        assert!(page.items.iter().any(|p| p.id == "p17"));
    }

    #[test]
    fn empty_table_has_one_page() {
        let rows: Vec<Product> = Vec::new();
        let all = filter_rows(&rows, &[]);
        let page = paginate(&all, &PageParams::default());
        assert_eq!(page.total_pages, 1);
        assert!(page.items.is_empty());
    }

    #[test]
    fn column_options_are_sorted_and_unique() {
        let rows = products(4);
        assert_eq!(
            column_options(&rows, "location"),
            vec!["Employee".to_string(), "Our office".to_string()]
        );
    }
}
