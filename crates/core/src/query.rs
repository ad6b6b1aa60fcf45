//! Client-side list filtering for admin views.
//!
//! A [`ListQuery`] combines a case-insensitive substring search over a
//! record's searchable fields with an optional exact-match category filter
//! (order status, user role). Both must hold for a record to be visible.

use crate::models::{Order, User};
use crate::types::{OrderStatus, Role};

/// A record that can be searched and filtered in a list view.
pub trait Searchable {
    /// The categorical value the exact-match filter compares against.
    type Category: Copy + PartialEq;

    /// Fields the text search looks at.
    fn search_fields(&self) -> Vec<&str>;

    /// The record's category.
    fn category(&self) -> Self::Category;
}

impl Searchable for User {
    type Category = Role;

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.email.as_str()]
    }

    fn category(&self) -> Role {
        self.role
    }
}

impl Searchable for Order {
    type Category = OrderStatus;

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.order_number.as_str()];
        if let Some(email) = self.customer_email() {
            fields.push(email);
        }
        fields
    }

    fn category(&self) -> OrderStatus {
        self.status
    }
}

/// Search text plus an optional category filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery<C> {
    search: String,
    category: Option<C>,
}

impl<C> Default for ListQuery<C> {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: None,
        }
    }
}

impl<C: Copy + PartialEq> ListQuery<C> {
    /// A query that matches everything.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Set the search text. Surrounding whitespace is ignored.
    #[must_use]
    pub fn search(mut self, text: &str) -> Self {
        self.search = text.trim().to_lowercase();
        self
    }

    /// Restrict to one category.
    #[must_use]
    pub fn category(mut self, category: Option<C>) -> Self {
        self.category = category;
        self
    }

    /// Current (normalized) search text.
    #[must_use]
    pub fn search_text(&self) -> &str {
        &self.search
    }

    /// Current category filter.
    #[must_use]
    pub const fn category_filter(&self) -> Option<C> {
        self.category
    }

    /// Whether a record passes both the search and the category filter.
    pub fn matches<T>(&self, record: &T) -> bool
    where
        T: Searchable<Category = C>,
    {
        let category_ok = self.category.is_none_or(|c| record.category() == c);
        let search_ok = self.search.is_empty()
            || record
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&self.search));
        category_ok && search_ok
    }

    /// Visible records, in their original order.
    pub fn apply<'a, T>(&self, records: &'a [T]) -> Vec<&'a T>
    where
        T: Searchable<Category = C>,
    {
        records.iter().filter(|r| self.matches(*r)).collect()
    }
}
