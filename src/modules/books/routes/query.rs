use crate::modules::books::models::BookFilter;

/// Raw `GET /books` query string.
#[derive(Debug, Default)]
pub struct ListQuery {
    pub name: Option<String>,
    pub reading: Option<String>,
    pub finished: Option<String>,
}

impl ListQuery {
    /// Collect the known parameters from raw query pairs. The first
    /// occurrence of a repeated key wins; unknown keys are ignored.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "name" => &mut query.name,
                "reading" => &mut query.reading,
                "finished" => &mut query.finished,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }

    pub fn into_filter(self) -> BookFilter {
        BookFilter {
            name: self.name,
            reading: self.reading.as_deref().map(parse_flag),
            finished: self.finished.as_deref().map(parse_flag),
        }
    }
}

/// Interpret a query flag: non-zero numbers and `true` are truthy,
/// anything else is falsy.
pub fn parse_flag(token: &str) -> bool {
    let token = token.trim();
    if token.eq_ignore_ascii_case("true") {
        return true;
    }
    match token.parse::<f64>() {
        Ok(number) => number != 0.0 && !number.is_nan(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_flags() {
        assert!(!parse_flag("0"));
        assert!(parse_flag("1"));
        assert!(parse_flag("2"));
        assert!(parse_flag(" 1 "));
        assert!(!parse_flag("0.0"));
        assert!(!parse_flag("NaN"));
    }

    #[test]
    fn word_flags() {
        assert!(parse_flag("true"));
        assert!(parse_flag("TRUE"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag("yes"));
        assert!(!parse_flag(""));
    }

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn repeated_keys_keep_first_value() {
        let query = ListQuery::from_pairs(pairs(&[
            ("name", "a"),
            ("reading", "1"),
            ("name", "b"),
            ("reading", "0"),
            ("sort", "asc"),
        ]));
        assert_eq!(query.name.as_deref(), Some("a"));
        assert_eq!(query.reading.as_deref(), Some("1"));
        assert!(query.finished.is_none());
    }

    #[test]
    fn absent_parameters_stay_unset() {
        let filter = ListQuery {
            name: Some("harry".to_string()),
            reading: None,
            finished: Some("1".to_string()),
        }
        .into_filter();

        assert_eq!(filter.name.as_deref(), Some("harry"));
        assert_eq!(filter.reading, None);
        assert_eq!(filter.finished, Some(true));
    }
}
