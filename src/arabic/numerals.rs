//! Arabic-Indic digits

const ARABIC_DIGITS: [char; 10] = ['٠', '١', '٢', '٣', '٤', '٥', '٦', '٧', '٨', '٩'];

/// Convert a number to its Arabic-Indic digit notation
pub fn to_arabic(num: u64) -> String {
    num.to_string()
        .bytes()
        .map(|b| ARABIC_DIGITS[usize::from(b - b'0')])
        .collect()
}

/// Convert Arabic-Indic digits back to ASCII digits
///
/// Returns `None` if the string contains anything other than Arabic-Indic
/// digits.
pub fn to_ascii(s: &str) -> Option<String> {
    s.chars()
        .map(|c| {
            ARABIC_DIGITS
                .iter()
                .position(|&d| d == c)
                .and_then(|i| char::from_digit(i as u32, 10))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_to_arabic() {
        assert_eq!(to_arabic(0), "٠");
        assert_eq!(to_arabic(7), "٧");
        assert_eq!(to_arabic(114), "١١٤");
        assert_eq!(to_arabic(286), "٢٨٦");
    }

    #[test]
    fn test_to_ascii() {
        assert_eq!(to_ascii("١١٤").as_deref(), Some("114"));
        assert_eq!(to_ascii("").as_deref(), Some(""));
        assert_eq!(to_ascii("1٢"), None);
    }

    proptest! {
        #[test]
        fn prop_roundtrip_preserves_digits(n in any::<u64>()) {
            let arabic = to_arabic(n);
            prop_assert_eq!(arabic.chars().count(), n.to_string().len());
            prop_assert_eq!(to_ascii(&arabic), Some(n.to_string()));
        }
    }
}
