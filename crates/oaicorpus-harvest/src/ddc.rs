//! Dewey class number extraction from free-text subject labels.

/// Finds the first Dewey-shaped number in `text`.
///
/// A single left-to-right scan accumulates runs of digits and dots; a
/// run is accepted when its integer part is exactly three digits long
/// (so "684.08" and "530" match, "12.5" and "1234" do not). Returns the
/// first accepted run.
pub fn extract_ddc(text: &str) -> Option<String> {
    let mut run = String::new();
    for c in text.chars().chain(std::iter::once(' ')) {
        if c.is_ascii_digit() || c == '.' {
            run.push(c);
            continue;
        }
        if !run.is_empty() {
            if is_dewey_shaped(&run) {
                return Some(run);
            }
            run.clear();
        }
    }
    None
}

fn is_dewey_shaped(run: &str) -> bool {
    match run.split_once('.') {
        Some((integer, _)) => integer.len() == 3,
        None => run.len() == 3,
    }
}

#[cfg(test)]
mod tests {
    use super::extract_ddc;

    #[test]
    fn number_embedded_in_text_is_found() {
        assert_eq!(
            extract_ddc("woodworking 684.08 techniques"),
            Some("684.08".to_string())
        );
    }

    #[test]
    fn short_integer_part_is_rejected() {
        assert_eq!(extract_ddc("12.5"), None);
    }

    #[test]
    fn bare_three_digit_class_is_accepted() {
        assert_eq!(extract_ddc("530"), Some("530".to_string()));
    }

    #[test]
    fn text_without_numbers_yields_nothing() {
        assert_eq!(extract_ddc("no numbers here"), None);
    }

    #[test]
    fn first_valid_run_wins() {
        assert_eq!(
            extract_ddc("12 then 620.1 then 004"),
            Some("620.1".to_string())
        );
    }

    #[test]
    fn four_digit_runs_are_not_dewey() {
        assert_eq!(extract_ddc("ISBN 9783 and year 2021"), None);
    }

    #[test]
    fn only_the_integer_part_is_constrained() {
        // Anything after the first dot rides along with the run.
        assert_eq!(
            extract_ddc("version 620.1.3 of the schema"),
            Some("620.1.3".to_string())
        );
        assert_eq!(extract_ddc("530."), Some("530.".to_string()));
    }

    #[test]
    fn trailing_number_at_end_of_text_is_found() {
        assert_eq!(extract_ddc("physics 530"), Some("530".to_string()));
    }
}
