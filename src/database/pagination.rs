use serde::{Deserialize, Serialize};

use crate::database::manager::DatabaseError;

/// Raw `?page=&size=&sort=field,dir` query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub sort: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub column: &'static str,
    pub descending: bool,
}

impl SortOrder {
    pub const NEWEST_FIRST: SortOrder = SortOrder {
        column: "created_at",
        descending: true,
    };

    pub fn to_sql(&self) -> String {
        format!("{} {}", self.column, if self.descending { "DESC" } else { "ASC" })
    }
}

/// A validated page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    pub sort: SortOrder,
}

impl PageRequest {
    /// Resolve raw parameters against a sortable-field whitelist of
    /// `(api field, column)` pairs.
    pub fn resolve(
        params: &PageParams,
        sortable: &[(&'static str, &'static str)],
        default_size: u32,
        max_size: u32,
    ) -> Result<Self, DatabaseError> {
        let size = params.size.unwrap_or(default_size).clamp(1, max_size.max(1));
        let sort = match params.sort.as_deref().map(str::trim) {
            None | Some("") => SortOrder::NEWEST_FIRST,
            Some(raw) => parse_sort(raw, sortable)?,
        };

        Ok(Self {
            page: params.page.unwrap_or(0),
            size,
            sort,
        })
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.size)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.size)
    }
}

fn parse_sort(raw: &str, sortable: &[(&'static str, &'static str)]) -> Result<SortOrder, DatabaseError> {
    let mut parts = raw.splitn(2, ',');
    let field = parts.next().unwrap_or_default().trim();
    let descending = match parts.next().map(|d| d.trim().to_ascii_lowercase()) {
        None => false,
        Some(dir) if dir == "asc" => false,
        Some(dir) if dir == "desc" => true,
        Some(_) => return Err(DatabaseError::InvalidSort(raw.to_string())),
    };

    sortable
        .iter()
        .find(|(name, _)| *name == field)
        .map(|&(_, column)| SortOrder { column, descending })
        .ok_or_else(|| DatabaseError::InvalidSort(field.to_string()))
}

/// One page of results in the Spring Data wire shape.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: i64,
    pub total_pages: i64,
    pub number: u32,
    pub size: u32,
    pub number_of_elements: usize,
    pub first: bool,
    pub last: bool,
    pub empty: bool,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, total_elements: i64, request: &PageRequest) -> Self {
        let size = i64::from(request.size.max(1));
        let total_pages = (total_elements + size - 1) / size;
        let number_of_elements = content.len();

        Self {
            empty: content.is_empty(),
            content,
            total_elements,
            total_pages,
            number: request.page,
            size: request.size,
            number_of_elements,
            first: request.page == 0,
            last: i64::from(request.page) + 1 >= total_pages,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            number: self.number,
            size: self.size,
            number_of_elements: self.number_of_elements,
            first: self.first,
            last: self.last,
            empty: self.empty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SORTABLE: &[(&str, &str)] = &[("name", "name"), ("createdAt", "created_at")];

    fn params(page: Option<u32>, size: Option<u32>, sort: Option<&str>) -> PageParams {
        PageParams {
            page,
            size,
            sort: sort.map(str::to_string),
        }
    }

    #[test]
    fn defaults_to_first_page_newest_first() {
        let request = PageRequest::resolve(&PageParams::default(), SORTABLE, 20, 100).unwrap();
        assert_eq!(request.page, 0);
        assert_eq!(request.size, 20);
        assert_eq!(request.sort, SortOrder::NEWEST_FIRST);
        assert_eq!(request.sort.to_sql(), "created_at DESC");
    }

    #[test]
    fn size_is_clamped_to_maximum() {
        let request = PageRequest::resolve(&params(Some(3), Some(1000), None), SORTABLE, 20, 100).unwrap();
        assert_eq!(request.size, 100);
        assert_eq!(request.offset(), 300);

        let request = PageRequest::resolve(&params(None, Some(0), None), SORTABLE, 20, 100).unwrap();
        assert_eq!(request.size, 1);
    }

    #[test]
    fn sort_maps_api_field_to_column() {
        let request = PageRequest::resolve(&params(None, None, Some("createdAt,asc")), SORTABLE, 20, 100).unwrap();
        assert_eq!(request.sort.to_sql(), "created_at ASC");

        let request = PageRequest::resolve(&params(None, None, Some("name,DESC")), SORTABLE, 20, 100).unwrap();
        assert_eq!(request.sort.to_sql(), "name DESC");
    }

    #[test]
    fn unknown_sort_fields_are_rejected() {
        let err = PageRequest::resolve(&params(None, None, Some("password;drop")), SORTABLE, 20, 100);
        assert!(matches!(err, Err(DatabaseError::InvalidSort(_))));

        let err = PageRequest::resolve(&params(None, None, Some("name,sideways")), SORTABLE, 20, 100);
        assert!(matches!(err, Err(DatabaseError::InvalidSort(_))));
    }

    #[test]
    fn page_metadata() {
        let request = PageRequest::resolve(&params(Some(1), Some(10), None), SORTABLE, 20, 100).unwrap();
        let page = Page::new(vec![1, 2, 3], 13, &request);
        assert_eq!(page.total_pages, 2);
        assert!(!page.first);
        assert!(page.last);
        assert_eq!(page.number_of_elements, 3);

        let empty: Page<i32> = Page::new(vec![], 0, &request);
        assert!(empty.empty);
        assert_eq!(empty.total_pages, 0);
        assert!(empty.last);
    }

    #[test]
    fn page_serializes_in_camel_case() {
        let request = PageRequest::resolve(&PageParams::default(), SORTABLE, 20, 100).unwrap();
        let json = serde_json::to_value(Page::new(vec!["a"], 1, &request).map(str::to_uppercase)).unwrap();
        assert_eq!(json["content"][0], "A");
        assert_eq!(json["totalElements"], 1);
        assert_eq!(json["numberOfElements"], 1);
    }
}
