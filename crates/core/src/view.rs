//! State shared by the screens of one view: selection, expanded rows and
//! product table filters.

use crate::table::{ColumnFilter, PageParams};
use crate::types::EntityId;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    selected_member: Option<EntityId>,
    expanded_shipment: Option<EntityId>,
    product_filters: Vec<ColumnFilter>,
    product_page: PageParams,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_member(&self) -> Option<&str> {
        self.selected_member.as_deref()
    }

    pub fn select_member(&mut self, member_id: Option<EntityId>) {
        self.selected_member = member_id;
    }

    pub fn expanded_shipment(&self) -> Option<&str> {
        self.expanded_shipment.as_deref()
    }

    /// Expand a shipment row, or collapse it when it is already expanded.
    pub fn toggle_shipment(&mut self, shipment_id: &str) {
        if self.expanded_shipment.as_deref() == Some(shipment_id) {
            self.expanded_shipment = None;
        } else {
            self.expanded_shipment = Some(shipment_id.to_string());
        }
    }

    /// Deep-link into the shipments table from URL query parameters.
    pub fn open_shipments_url(&mut self, query: &str) -> PageParams {
        let params = PageParams::from_query(query);
        if let Some(id) = &params.focus_id {
            self.expanded_shipment = Some(id.clone());
        }
        params
    }

    pub fn product_filters(&self) -> &[ColumnFilter] {
        &self.product_filters
    }

    /// Add a filter, replacing any existing filter on the same column.
    /// Changing filters sends the table back to its first page.
    pub fn set_product_filter(&mut self, filter: ColumnFilter) {
        match filter.column() {
            Some(column) => self
                .product_filters
                .retain(|f| f.column() != Some(column)),
            None => self.product_filters.retain(|f| f.column().is_some()),
        }
        self.product_filters.push(filter);
        self.product_page.page = 1;
    }

    pub fn clear_product_filters(&mut self) {
        self.product_filters.clear();
        self.product_page.page = 1;
    }

    pub fn product_page(&self) -> &PageParams {
        &self.product_page
    }

    pub fn set_product_page(&mut self, page: PageParams) {
        self.product_page = page;
    }

    /// Drop selections that point at records which no longer exist.
    pub fn forget(&mut self, entity_id: &str) {
        if self.selected_member.as_deref() == Some(entity_id) {
            self.selected_member = None;
        }
        if self.expanded_shipment.as_deref() == Some(entity_id) {
            self.expanded_shipment = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggling_a_shipment_collapses_it() {
        let mut view = ViewState::new();
        view.toggle_shipment("s1");
        assert_eq!(view.expanded_shipment(), Some("s1"));
        view.toggle_shipment("s2");
        assert_eq!(view.expanded_shipment(), Some("s2"));
        view.toggle_shipment("s2");
        assert_eq!(view.expanded_shipment(), None);
    }

    #[test]
    fn url_deep_link_expands_shipment() {
        let mut view = ViewState::new();
        let params = view.open_shipments_url("page=1&size=20&id=s7");
        assert_eq!(params.size, 20);
        assert_eq!(view.expanded_shipment(), Some("s7"));
    }

    #[test]
    fn filters_replace_same_column_and_reset_page() {
        let mut view = ViewState::new();
        view.set_product_page(PageParams {
            page: 4,
            ..PageParams::default()
        });
        view.set_product_filter(ColumnFilter::OneOf {
            column: "status".into(),
            values: vec!["Available".into()],
        });
        view.set_product_filter(ColumnFilter::OneOf {
            column: "status".into(),
            values: vec!["Delivered".into()],
        });
        view.set_product_filter(ColumnFilter::Search {
            columns: vec!["name".into()],
            needle: "mac".into(),
        });

        assert_eq!(view.product_filters().len(), 2);
        assert_eq!(view.product_page().page, 1);
    }

    #[test]
    fn forgetting_a_member_clears_selection() {
        let mut view = ViewState::new();
        view.select_member(Some("m1".into()));
        view.forget("m1");
        assert_eq!(view.selected_member(), None);
    }
}
