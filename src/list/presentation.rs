// src/list/presentation.rs
//! What a list view shows for a given status.
//!
//! Pure functions of the flags and the item count, so any renderer (a
//! terminal, a widget toolkit, a test) can share the same visibility rules.

use super::status::StatusFlags;

/// Visibility of every part of a list view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Presentation {
    /// Full-screen loading indicator.
    pub show_loading: bool,
    /// Error placeholder with a retry affordance.
    pub show_error: bool,
    /// The item rows themselves.
    pub show_items: bool,
    /// "Nothing here" placeholder.
    pub show_empty: bool,
    /// Spinner below the last row while the next page loads.
    pub show_footer_spinner: bool,
    /// Pull-to-refresh spinner.
    pub show_refresh_spinner: bool,
}

impl Presentation {
    pub fn derive(status: StatusFlags, item_count: usize) -> Self {
        let hidden = status.reloading || status.erroring;
        Self {
            show_loading: status.reloading,
            show_error: status.erroring,
            show_items: !hidden,
            show_empty: !hidden && item_count == 0,
            show_footer_spinner: status.loading_more,
            show_refresh_spinner: status.refreshing,
        }
    }
}

/// Whether displaying the row at `index` should ask for the next page.
pub fn should_prefetch(index: usize, item_count: usize, distance: usize) -> bool {
    index.saturating_add(distance) >= item_count
}

/// True on the step where a refresh finished, the moment to end a
/// pull-to-refresh gesture.
pub fn refresh_ended(previous: StatusFlags, next: StatusFlags) -> bool {
    previous.refreshing && !next.refreshing
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn flags(reloading: bool, refreshing: bool, loading_more: bool, erroring: bool) -> StatusFlags {
        StatusFlags {
            reloading,
            refreshing,
            loading_more,
            erroring,
        }
    }

    #[test]
    fn test_reloading_hides_items_behind_loader() {
        let view = Presentation::derive(flags(true, false, false, false), 0);
        assert!(view.show_loading);
        assert!(!view.show_items);
        assert!(!view.show_empty);
    }

    #[test]
    fn test_error_placeholder_replaces_items() {
        let view = Presentation::derive(flags(false, false, false, true), 12);
        assert_eq!(
            view,
            Presentation {
                show_error: true,
                ..Presentation::default()
            }
        );
    }

    #[test]
    fn test_empty_placeholder_only_when_settled_without_items() {
        assert!(Presentation::derive(StatusFlags::default(), 0).show_empty);
        assert!(!Presentation::derive(StatusFlags::default(), 3).show_empty);
        assert!(Presentation::derive(flags(false, true, false, false), 0).show_empty);
    }

    #[test]
    fn test_spinners_follow_their_flags() {
        let view = Presentation::derive(flags(false, true, true, false), 5);
        assert!(view.show_items);
        assert!(view.show_footer_spinner);
        assert!(view.show_refresh_spinner);
    }

    #[test]
    fn test_prefetch_near_the_end() {
        assert!(!should_prefetch(0, 10, 2));
        assert!(!should_prefetch(7, 10, 2));
        assert!(should_prefetch(8, 10, 2));
        assert!(should_prefetch(9, 10, 2));
        assert!(should_prefetch(0, 1, 2));
        assert!(should_prefetch(0, 0, 0));
    }

    #[test]
    fn test_refresh_edge() {
        let refreshing = flags(false, true, false, false);
        let idle = StatusFlags::default();
        assert!(refresh_ended(refreshing, idle));
        assert!(!refresh_ended(idle, refreshing));
        assert!(!refresh_ended(refreshing, refreshing));
    }
}
