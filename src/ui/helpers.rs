use anyhow::Error;

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}

/// Vertical scroll needed so that `row` stays inside a viewport `height` rows
/// tall.
pub(crate) fn scroll_to_show(row: u16, height: u16) -> u16 {
    if height == 0 {
        return row;
    }
    row.saturating_sub(height - 1)
}

#[cfg(test)]
mod tests {
    use anyhow::Context;

    use super::*;

    #[test]
    fn surface_error_picks_innermost_cause() {
        let err = Err::<(), _>(std::io::Error::other("disk full"))
            .context("failed to save note")
            .unwrap_err();
        assert_eq!(surface_error(&err), "disk full");
    }

    #[test]
    fn scroll_only_when_row_falls_outside() {
        assert_eq!(scroll_to_show(3, 10), 0);
        assert_eq!(scroll_to_show(9, 10), 0);
        assert_eq!(scroll_to_show(12, 10), 3);
    }
}
