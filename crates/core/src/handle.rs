//! URL handle (slug) generation for product titles.

/// Build a URL-safe handle from a product name.
///
/// Lowercases, keeps alphanumeric characters, and collapses every other
/// run of characters into a single `-`. Leading and trailing separators
/// are trimmed. An empty or fully non-alphanumeric name yields an empty
/// handle.
///
/// # Examples
///
/// ```
/// use onec_bridge_core::handle::handle_from_name;
///
/// assert_eq!(handle_from_name("Steel Bolt M8"), "steel-bolt-m8");
/// assert_eq!(handle_from_name("  Premium -- Widget!  "), "premium-widget");
/// ```
pub fn handle_from_name(name: &str) -> String {
    let mut handle = String::with_capacity(name.len());
    let mut pending_separator = false;

    for ch in name.chars() {
        if ch.is_alphanumeric() {
            if pending_separator && !handle.is_empty() {
                handle.push('-');
            }
            pending_separator = false;
            for lower in ch.to_lowercase() {
                handle.push(lower);
            }
        } else {
            pending_separator = true;
        }
    }

    handle
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_hyphenates() {
        assert_eq!(handle_from_name("Steel Bolt M8"), "steel-bolt-m8");
    }

    #[test]
    fn collapses_separator_runs() {
        assert_eq!(handle_from_name("A  --  B"), "a-b");
    }

    #[test]
    fn trims_leading_and_trailing_separators() {
        assert_eq!(handle_from_name("  widget  "), "widget");
        assert_eq!(handle_from_name("!widget!"), "widget");
    }

    #[test]
    fn keeps_non_latin_letters() {
        assert_eq!(handle_from_name("Болт стальной"), "болт-стальной");
    }

    #[test]
    fn degenerate_names_yield_empty_handle() {
        assert_eq!(handle_from_name(""), "");
        assert_eq!(handle_from_name("!!!"), "");
    }
}
