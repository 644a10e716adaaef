//! `MM:SS` formatting for timer displays.

/// Format whole seconds as `MM:SS`.
///
/// The sign is dropped unless `show_sign` is set and `seconds` is negative,
/// in which case the result is prefixed with `-`. Minutes are zero-padded to
/// two digits and keep growing past `99`.
pub fn format_time(seconds: i64, show_sign: bool) -> String {
    let abs = seconds.unsigned_abs();
    let text = format!("{:02}:{:02}", abs / 60, abs % 60);
    if show_sign && seconds < 0 {
        format!("-{text}")
    } else {
        text
    }
}

/// Format textual input, treating anything non-numeric as zero.
pub fn format_time_input(input: &str, show_sign: bool) -> String {
    let seconds = match input.trim().parse::<i64>() {
        Ok(s) => s,
        Err(_) => {
            tracing::debug!("non-numeric time input {input:?}, formatting as zero");
            0
        }
    };
    format_time(seconds, show_sign)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn formats_known_values() {
        assert_eq!(format_time(0, false), "00:00");
        assert_eq!(format_time(125, false), "02:05");
        assert_eq!(format_time(1500, false), "25:00");
        assert_eq!(format_time(6000, false), "100:00");
    }

    #[test]
    fn sign_only_when_requested() {
        assert_eq!(format_time(-61, false), "01:01");
        assert_eq!(format_time(-61, true), "-01:01");
        assert_eq!(format_time(61, true), "01:01");
        assert_eq!(format_time(0, true), "00:00");
    }

    #[test]
    fn non_numeric_input_is_zero() {
        assert_eq!(format_time_input("abc", true), "00:00");
        assert_eq!(format_time_input("", false), "00:00");
        assert_eq!(format_time_input(" -5 ", true), "-00:05");
    }

    #[test]
    fn extreme_values_do_not_overflow() {
        let s = format_time(i64::MIN, true);
        assert!(s.starts_with('-'));
    }

    proptest! {
        #[test]
        fn unsigned_format_ignores_sign(x in -1_000_000i64..1_000_000) {
            prop_assert_eq!(format_time(x, false), format_time(-x, false));
        }

        #[test]
        fn seconds_field_is_two_digits(x in 0i64..1_000_000) {
            let s = format_time(x, false);
            let (mins, secs) = s.split_once(':').unwrap();
            prop_assert_eq!(secs.len(), 2);
            prop_assert!(mins.len() >= 2);
            let back = mins.parse::<i64>().unwrap() * 60 + secs.parse::<i64>().unwrap();
            prop_assert_eq!(back, x);
        }
    }
}
