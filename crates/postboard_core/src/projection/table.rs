//! Table projection: flat rows with derived status, free-text filter and a
//! stable single-field sort.

use crate::model::date::{parse_display_date, parse_display_time};
use crate::model::grouping::{GroupingId, GroupingSet};
use crate::model::post::Post;
use serde::Serialize;
use std::cmp::Ordering;

/// One table row: a post annotated with the id of the grouping holding it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    #[serde(flatten)]
    pub post: Post,
    pub status: GroupingId,
}

/// Sortable table columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Title,
    Description,
    Date,
    Time,
    Platforms,
    Author,
    Likes,
    Notes,
    Image,
    Status,
    AutoPost,
}

impl SortField {
    /// Parses a field name as used by the UI (`title`, `autoPost`, ...).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "id" => Some(Self::Id),
            "title" => Some(Self::Title),
            "description" => Some(Self::Description),
            "date" => Some(Self::Date),
            "time" => Some(Self::Time),
            "platforms" => Some(Self::Platforms),
            "author" => Some(Self::Author),
            "likes" => Some(Self::Likes),
            "notes" => Some(Self::Notes),
            "image" => Some(Self::Image),
            "status" => Some(Self::Status),
            "autopost" | "auto_post" => Some(Self::AutoPost),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl TableSort {
    pub fn asc(field: SortField) -> Self {
        Self {
            field,
            direction: SortDirection::Asc,
        }
    }

    /// Header-click behavior: the active field flips direction, any other
    /// field starts ascending.
    pub fn toggle(current: Option<Self>, field: SortField) -> Self {
        match current {
            Some(sort) if sort.field == field => Self {
                field,
                direction: sort.direction.reversed(),
            },
            _ => Self::asc(field),
        }
    }
}

/// Table view parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableQuery {
    /// Case-insensitive substring matched against title, author and
    /// description. Blank matches every row.
    pub filter: String,
    pub sort: Option<TableSort>,
}

impl Default for TableQuery {
    fn default() -> Self {
        Self {
            filter: String::new(),
            sort: Some(TableSort::asc(SortField::Date)),
        }
    }
}

/// Flattens the set into rows in canonical order.
pub fn table_rows(set: &GroupingSet) -> Vec<TableRow> {
    set.posts_with_grouping()
        .map(|(grouping_id, post)| TableRow {
            post: post.clone(),
            status: grouping_id.clone(),
        })
        .collect()
}

/// Builds the filtered and sorted table.
///
/// Sorting is stable: rows comparing equal keep canonical order. String
/// fields (including `id`) compare case-insensitively; `date` and `time`
/// compare by parsed value with unparseable values after parseable ones
/// (ascending). `platforms` compares the tag lists element by element.
pub fn table_projection(set: &GroupingSet, query: &TableQuery) -> Vec<TableRow> {
    let needle = query.filter.trim().to_lowercase();
    let mut rows = table_rows(set)
        .into_iter()
        .filter(|row| needle.is_empty() || matches_filter(&row.post, &needle))
        .collect::<Vec<_>>();

    if let Some(sort) = query.sort {
        rows.sort_by(|a, b| {
            let ordering = compare_rows(a, b, sort.field);
            match sort.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
    }
    rows
}

fn matches_filter(post: &Post, needle: &str) -> bool {
    [&post.title, &post.author, &post.description]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

fn compare_rows(a: &TableRow, b: &TableRow, field: SortField) -> Ordering {
    match field {
        SortField::Id => compare_text(&a.post.id, &b.post.id),
        SortField::Title => compare_text(&a.post.title, &b.post.title),
        SortField::Description => compare_text(&a.post.description, &b.post.description),
        SortField::Author => compare_text(&a.post.author, &b.post.author),
        SortField::Notes => compare_text(&a.post.notes, &b.post.notes),
        SortField::Image => compare_text(&a.post.image, &b.post.image),
        SortField::Status => compare_text(&a.status, &b.status),
        SortField::Platforms => a
            .post
            .platforms
            .iter()
            .map(|platform| platform.as_str())
            .cmp(b.post.platforms.iter().map(|platform| platform.as_str())),
        SortField::Likes => a.post.likes.cmp(&b.post.likes),
        SortField::AutoPost => a.post.auto_post.cmp(&b.post.auto_post),
        SortField::Date => compare_parsed(
            parse_display_date(&a.post.date),
            parse_display_date(&b.post.date),
        )
        .then_with(|| compare_text(&a.post.date, &b.post.date)),
        SortField::Time => compare_parsed(
            parse_display_time(&a.post.time),
            parse_display_time(&b.post.time),
        )
        .then_with(|| compare_text(&a.post.time, &b.post.time)),
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

fn compare_parsed<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_active_field_and_resets_other_fields() {
        let date_asc = TableSort::asc(SortField::Date);
        assert_eq!(
            TableSort::toggle(Some(date_asc), SortField::Date).direction,
            SortDirection::Desc
        );
        assert_eq!(
            TableSort::toggle(Some(date_asc), SortField::Title),
            TableSort::asc(SortField::Title)
        );
        assert_eq!(
            TableSort::toggle(None, SortField::Likes),
            TableSort::asc(SortField::Likes)
        );
    }

    #[test]
    fn sort_field_parse_accepts_ui_names() {
        assert_eq!(SortField::parse("autoPost"), Some(SortField::AutoPost));
        assert_eq!(SortField::parse(" Date "), Some(SortField::Date));
        assert_eq!(SortField::parse("Platforms"), Some(SortField::Platforms));
        assert_eq!(SortField::parse("id"), Some(SortField::Id));
        assert_eq!(SortField::parse("colour"), None);
    }

    #[test]
    fn compare_parsed_puts_missing_values_last() {
        assert_eq!(compare_parsed(Some(1), None), Ordering::Less);
        assert_eq!(compare_parsed::<i32>(None, None), Ordering::Equal);
    }
}
