//! Fixed-size page slicing for listing results.

use crate::service::error::SchedulingError;
use std::num::NonZeroU32;

/// Page selection for listing calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageRequest {
    /// No pagination requested; the full sequence is returned.
    #[default]
    All,
    /// 1-based page number.
    Page(NonZeroU32),
}

impl PageRequest {
    /// Parses a raw `page` parameter. Absent or blank means `All`.
    ///
    /// # Errors
    /// - `InvalidPage` for non-numeric input or values below 1.
    pub fn parse(raw: Option<&str>) -> Result<Self, SchedulingError> {
        let Some(value) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
            return Ok(Self::All);
        };
        value
            .parse::<NonZeroU32>()
            .map(Self::Page)
            .map_err(|_| SchedulingError::InvalidPage(value.to_string()))
    }
}

/// Returns the elements at zero-based offsets `[(p-1)k, min(pk, N))`.
///
/// Pages past the end yield an empty vector.
pub fn paginate<T>(items: Vec<T>, request: PageRequest, page_size: NonZeroU32) -> Vec<T> {
    let PageRequest::Page(page) = request else {
        return items;
    };

    let size = usize::try_from(page_size.get()).unwrap_or(usize::MAX);
    let skip = usize::try_from(page.get() - 1)
        .unwrap_or(usize::MAX)
        .saturating_mul(size);
    items.into_iter().skip(skip).take(size).collect()
}

#[cfg(test)]
mod tests {
    use super::{paginate, PageRequest};
    use crate::service::error::SchedulingError;
    use std::num::NonZeroU32;

    fn nz(value: u32) -> NonZeroU32 {
        NonZeroU32::new(value).unwrap()
    }

    #[test]
    fn pages_slice_three_items_by_two() {
        let items = vec!["a", "b", "c"];
        assert_eq!(
            paginate(items.clone(), PageRequest::Page(nz(1)), nz(2)),
            vec!["a", "b"]
        );
        assert_eq!(paginate(items.clone(), PageRequest::Page(nz(2)), nz(2)), vec!["c"]);
        assert!(paginate(items.clone(), PageRequest::Page(nz(3)), nz(2)).is_empty());
        assert_eq!(paginate(items, PageRequest::All, nz(2)), vec!["a", "b", "c"]);
    }

    #[test]
    fn exact_multiple_has_no_trailing_page() {
        let items = vec![1, 2, 3, 4];
        assert_eq!(paginate(items.clone(), PageRequest::Page(nz(2)), nz(2)), vec![3, 4]);
        assert!(paginate(items, PageRequest::Page(nz(3)), nz(2)).is_empty());
    }

    #[test]
    fn huge_page_number_is_empty_not_overflow() {
        assert!(paginate(vec![1], PageRequest::Page(nz(u32::MAX)), nz(u32::MAX)).is_empty());
    }

    #[test]
    fn parse_handles_absent_valid_and_invalid_values() {
        assert_eq!(PageRequest::parse(None).unwrap(), PageRequest::All);
        assert_eq!(PageRequest::parse(Some("")).unwrap(), PageRequest::All);
        assert_eq!(PageRequest::parse(Some("2")).unwrap(), PageRequest::Page(nz(2)));
        assert!(matches!(
            PageRequest::parse(Some("0")),
            Err(SchedulingError::InvalidPage(value)) if value == "0"
        ));
        assert!(matches!(
            PageRequest::parse(Some("-1")),
            Err(SchedulingError::InvalidPage(_))
        ));
        assert!(matches!(
            PageRequest::parse(Some("two")),
            Err(SchedulingError::InvalidPage(_))
        ));
    }
}
