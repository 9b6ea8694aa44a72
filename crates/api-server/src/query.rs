use domain::{Filter, FilterField};
use url::form_urlencoded;

/// Decodes list query parameters into a filter. Unknown parameters are
/// reported back instead of failing the decode; known ones are still applied.
pub fn decode_filter(raw_query: Option<&str>) -> (Filter, Vec<String>) {
    let mut filter = Filter::new();
    let mut problems = Vec::new();

    let Some(raw_query) = raw_query else {
        return (filter, problems);
    };

    for (key, value) in form_urlencoded::parse(raw_query.as_bytes()) {
        match FilterField::parse(&key) {
            Some(field) => filter.set(field, value.into_owned()),
            None => problems.push(format!("unknown parameter '{}'", key)),
        }
    }

    (filter, problems)
}
